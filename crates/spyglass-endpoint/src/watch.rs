//! Active property watches.
//!
//! One entry per successful `WatchProperty` request. The table lives
//! behind an `Rc<RefCell<_>>` shared with the adapter change callbacks,
//! which run on the UI thread during property-change processing; all
//! touchpoints are under the marshaler, so there is no cross-thread
//! access. Watches end with the endpoint (unwatch is implicit).

use std::collections::HashMap;

use spyglass_types::Handle;

use crate::adapter::SubscriptionToken;

/// One active watch.
#[derive(Debug, Clone)]
pub struct WatchEntry {
    pub watch_id: String,
    pub handle: Handle,
    pub property_name: String,
    /// The value reported by the last notification (or the initial read).
    pub last_value: String,
    pub token: SubscriptionToken,
}

/// All active watches for one endpoint session.
#[derive(Debug, Default)]
pub struct WatchTable {
    entries: HashMap<String, WatchEntry>,
    next_id: u64,
}

impl WatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next watch ID (`watch_<hex>`).
    pub fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("watch_{:x}", self.next_id)
    }

    pub fn insert(&mut self, entry: WatchEntry) {
        self.entries.insert(entry.watch_id.clone(), entry);
    }

    /// Record a change: returns the previous value and stores the new one.
    /// `None` when the watch ID is unknown (entry raced removal).
    pub fn record_change(&mut self, watch_id: &str, new_value: &str) -> Option<String> {
        let entry = self.entries.get_mut(watch_id)?;
        let old = std::mem::replace(&mut entry.last_value, new_value.to_string());
        Some(old)
    }

    pub fn get(&self, watch_id: &str) -> Option<&WatchEntry> {
        self.entries.get(watch_id)
    }

    /// Subscription tokens of all active watches, for shutdown cleanup.
    pub fn tokens(&self) -> Vec<SubscriptionToken> {
        self.entries.values().map(|e| e.token).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(table: &mut WatchTable, initial: &str) -> String {
        let watch_id = table.allocate_id();
        table.insert(WatchEntry {
            watch_id: watch_id.clone(),
            handle: Handle::element(1),
            property_name: "Text".into(),
            last_value: initial.into(),
            token: SubscriptionToken(1),
        });
        watch_id
    }

    #[test]
    fn ids_are_unique_and_hex() {
        let mut table = WatchTable::new();
        assert_eq!(table.allocate_id(), "watch_1");
        assert_eq!(table.allocate_id(), "watch_2");
    }

    #[test]
    fn record_change_returns_previous_value() {
        let mut table = WatchTable::new();
        let id = entry(&mut table, "A");
        assert_eq!(table.record_change(&id, "B").as_deref(), Some("A"));
        assert_eq!(table.record_change(&id, "C").as_deref(), Some("B"));
        assert_eq!(table.get(&id).unwrap().last_value, "C");
    }

    #[test]
    fn unknown_watch_id_is_ignored() {
        let mut table = WatchTable::new();
        assert_eq!(table.record_change("watch_99", "x"), None);
    }
}
