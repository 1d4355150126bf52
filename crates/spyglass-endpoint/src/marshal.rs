//! UI-thread marshaler.
//!
//! Target frameworks enforce a single dispatch thread for live object
//! access. The transport side therefore never touches the graph directly:
//! it packages each handler as a job, posts it onto the UI scheduler's
//! queue, and awaits the reply through a oneshot with a hard deadline.
//! A stalled UI thread costs exactly one deadline per request: the reader
//! keeps running, and the stale job's late reply lands in a dropped
//! receiver.
//!
//! The UI side is [`UiExecutor`]: host applications either drain it from
//! their dispatcher tick ([`pump`](UiExecutor::pump)) or dedicate a thread
//! to it ([`run`](UiExecutor::run)).

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use spyglass_types::InspectError;

use crate::adapter::ToolkitAdapter;
use crate::state::InspectorState;

/// A unit of work executed on the UI thread against session state.
pub type Job<A> = Box<dyn FnOnce(&mut InspectorState<A>) + Send>;

pub type JobSender<A> = mpsc::Sender<Job<A>>;
pub type JobReceiver<A> = mpsc::Receiver<Job<A>>;

/// Create the job channel between the transport and the UI scheduler.
pub fn job_channel<A: ToolkitAdapter + 'static>(buffer: usize) -> (JobSender<A>, JobReceiver<A>) {
    mpsc::channel(buffer)
}

/// Transport-side handle that posts work to the UI thread with a bounded
/// wait.
pub struct Marshaler<A: ToolkitAdapter + 'static> {
    tx: JobSender<A>,
    timeout: Duration,
}

impl<A: ToolkitAdapter + 'static> Clone for Marshaler<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            timeout: self.timeout,
        }
    }
}

impl<A: ToolkitAdapter + 'static> Marshaler<A> {
    pub fn new(tx: JobSender<A>, timeout: Duration) -> Self {
        Self { tx, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `work` on the UI thread and return its result, or
    /// [`InspectError::Timeout`] once the deadline passes.
    ///
    /// The deadline covers both submission and completion, so a full job
    /// queue behind a wedged scheduler cannot extend the wait. Work must
    /// not re-enter the marshaler: jobs are leaf operations from the
    /// transport's perspective.
    pub async fn run<T, F>(&self, work: F) -> Result<T, InspectError>
    where
        F: FnOnce(&mut InspectorState<A>) -> Result<T, InspectError> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job<A> = Box::new(move |state| {
            let _ = reply_tx.send(work(state));
        });

        let submit_and_wait = async {
            self.tx
                .send(job)
                .await
                .map_err(|_| InspectError::Handler("ui scheduler has shut down".into()))?;
            reply_rx
                .await
                .map_err(|_| InspectError::Handler("ui work was dropped before completing".into()))?
        };

        match tokio::time::timeout(self.timeout, submit_and_wait).await {
            Ok(result) => result,
            Err(_) => Err(InspectError::Timeout(self.timeout)),
        }
    }
}

/// UI-thread side of the job channel.
pub struct UiExecutor<A: ToolkitAdapter + 'static> {
    rx: JobReceiver<A>,
}

impl<A: ToolkitAdapter + 'static> UiExecutor<A> {
    pub fn new(rx: JobReceiver<A>) -> Self {
        Self { rx }
    }

    /// Drain all currently-queued jobs without blocking. Returns the
    /// number executed. Hosts call this from their dispatcher tick.
    pub fn pump(&mut self, state: &mut InspectorState<A>) -> usize {
        let mut executed = 0;
        while let Ok(job) = self.rx.try_recv() {
            job(state);
            executed += 1;
        }
        executed
    }

    /// Run jobs until the transport side shuts down. For hosts that give
    /// the endpoint a dedicated UI loop, and for tests.
    pub fn run(&mut self, state: &mut InspectorState<A>) {
        while let Some(job) = self.rx.blocking_recv() {
            job(state);
        }
    }
}
