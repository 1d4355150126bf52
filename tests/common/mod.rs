//! Shared harness for integration tests.
//!
//! Spins up a complete inspector endpoint (socket server on the test
//! runtime, mock toolkit on a dedicated UI thread) and hands back a
//! controller attached to it. The rendezvous PID is the test process's
//! own, so bridge-side liveness checks pass against a genuinely alive
//! process.
//!
//! Each integration test file compiles common/ as its own module, so not
//! every helper is used in every file.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use tokio::sync::watch;

use spyglass_bridge::{BridgeConfig, Controller};
use spyglass_endpoint::marshal::{job_channel, JobSender, UiExecutor};
use spyglass_endpoint::server::serve;
use spyglass_endpoint::testkit::MockToolkit;
use spyglass_endpoint::{InspectorState, Marshaler, Notifier};

/// A running endpoint plus the channels tests poke it through.
pub struct Harness {
    pub socket_dir: PathBuf,
    pub socket_path: PathBuf,
    pub pid: u32,
    pub notifier: Notifier,
    job_tx: JobSender<MockToolkit>,
    shutdown: watch::Sender<bool>,
    server: tokio::task::JoinHandle<Result<(), String>>,
    ui: Option<std::thread::JoinHandle<()>>,
    _dir: tempfile::TempDir,
}

/// Install a test subscriber once so `RUST_LOG=debug` surfaces endpoint
/// and bridge tracing during test runs.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Endpoint over the standard sample window fixture.
pub async fn spawn_harness() -> Harness {
    spawn_with(MockToolkit::sample_window, Duration::from_secs(5)).await
}

/// Endpoint over a custom toolkit, with an explicit UI-work deadline.
///
/// The factory runs on the UI thread: mock nodes never cross threads.
pub async fn spawn_with<F>(factory: F, ui_timeout: Duration) -> Harness
where
    F: FnOnce() -> MockToolkit + Send + 'static,
{
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir for sockets");
    let pid = std::process::id();
    let socket_path = dir.path().join(format!("wpf_inspector_{pid}.sock"));

    let (job_tx, job_rx) = job_channel::<MockToolkit>(64);
    let marshaler = Marshaler::new(job_tx.clone(), ui_timeout);
    let notifier = Notifier::new(64);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server_path = socket_path.clone();
    let server_notifier = notifier.clone();
    let server = tokio::spawn(async move {
        serve(
            &server_path,
            marshaler,
            server_notifier,
            shutdown_rx,
            Duration::from_millis(100),
        )
        .await
    });

    let ui_notifier = notifier.clone();
    let ui = std::thread::spawn(move || {
        let mut state = InspectorState::new(factory(), ui_notifier, 100);
        let mut executor = UiExecutor::new(job_rx);
        executor.run(&mut state);
    });

    for _ in 0..300 {
        if socket_path.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(socket_path.exists(), "endpoint socket never appeared");

    Harness {
        socket_dir: dir.path().to_path_buf(),
        socket_path,
        pid,
        notifier,
        job_tx,
        shutdown: shutdown_tx,
        server,
        ui: Some(ui),
        _dir: dir,
    }
}

impl Harness {
    /// Bridge configuration pointing at this harness's socket directory.
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            socket_dir: Some(self.socket_dir.clone()),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// A controller already attached to the harness endpoint.
    pub fn controller(&self) -> Controller {
        let mut controller = Controller::new(self.bridge_config());
        controller
            .attach_pid(self.pid)
            .expect("test process should be alive");
        controller
    }

    /// Run a closure on the endpoint's UI thread (e.g. to mutate the mock
    /// tree or inject trace lines).
    pub async fn ui_job<F>(&self, job: F)
    where
        F: FnOnce(&mut InspectorState<MockToolkit>) + Send + 'static,
    {
        self.job_tx
            .send(Box::new(job))
            .await
            .expect("ui loop should be running");
    }

    /// Stop the endpoint and join both sides.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        let _ = self.server.await;
        // Dropping the last job sender lets the UI loop drain out.
        drop(self.job_tx);
        if let Some(ui) = self.ui.take() {
            ui.join().expect("ui thread panicked");
        }
    }
}
