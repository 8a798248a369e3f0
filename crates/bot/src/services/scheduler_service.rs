use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use common::models::ScanReport;
use common::{Destination, ReportSink};
use strategy::PairScanner;

pub const AUTO_UPDATE_HEADER: &str = "📅 Auto Signal Update";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

struct ActiveRun {
    id: Uuid,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct SchedulerState {
    active: Option<ActiveRun>,
    // A stopped loop may still be finishing its last scan.
    retiring: Option<(Uuid, JoinHandle<()>)>,
    destination: Option<Destination>,
}

/// Runs the basket scan on a fixed interval and pushes each report to one destination.
///
/// At most one loop exists at a time: every transition happens while holding
/// the state lock, so concurrent `start` calls cannot both observe `Idle`, and
/// `start` waits for a stopped loop to exit before spawning the next one.
pub struct AutoSignalScheduler {
    scanner: Arc<PairScanner>,
    sink: Arc<dyn ReportSink>,
    interval: Duration,
    state: Mutex<SchedulerState>,
}

impl AutoSignalScheduler {
    pub fn new(scanner: Arc<PairScanner>, sink: Arc<dyn ReportSink>, interval: Duration) -> Self {
        Self {
            scanner,
            sink,
            interval,
            state: Mutex::new(SchedulerState::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn start(&self, destination: Destination) -> StartOutcome {
        let mut state = self.state.lock().await;
        if let Some(run) = &state.active {
            debug!("Auto signal loop {} already active", run.id);
            return StartOutcome::AlreadyRunning;
        }

        if let Some((old_id, handle)) = state.retiring.take() {
            debug!("Waiting for stopped loop {} to exit", old_id);
            if let Err(e) = handle.await {
                warn!("Stopped loop {} ended abnormally: {}", old_id, e);
            }
        }

        let id = Uuid::new_v4();
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(Self::run_loop(
            id,
            self.scanner.clone(),
            self.sink.clone(),
            destination,
            self.interval,
            stop_rx,
        ));

        state.destination = Some(destination);
        state.active = Some(ActiveRun {
            id,
            stop_tx,
            handle,
        });

        info!(
            "Auto signal loop {} started for chat {} (every {:?})",
            id, destination, self.interval
        );
        StartOutcome::Started
    }

    pub async fn stop(&self) -> StopOutcome {
        let mut state = self.state.lock().await;
        let Some(run) = state.active.take() else {
            return StopOutcome::NotRunning;
        };

        // The loop may already be gone, in which case nobody is listening.
        let _ = run.stop_tx.send(true);
        state.retiring = Some((run.id, run.handle));
        info!("Auto signal loop {} stopped", run.id);
        StopOutcome::Stopped
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.active.is_some()
    }

    pub async fn destination(&self) -> Option<Destination> {
        self.state.lock().await.destination
    }

    async fn run_loop(
        id: Uuid,
        scanner: Arc<PairScanner>,
        sink: Arc<dyn ReportSink>,
        destination: Destination,
        interval: Duration,
        mut stop_rx: watch::Receiver<bool>,
    ) {
        loop {
            if *stop_rx.borrow_and_update() {
                break;
            }

            let iteration =
                AssertUnwindSafe(Self::run_iteration(&scanner, sink.as_ref(), destination))
                    .catch_unwind()
                    .await;
            if let Err(panic) = iteration {
                error!("⚠️ Auto signal error in loop {}: {}", id, panic_message(panic.as_ref()));
            }

            tokio::select! {
                _ = time::sleep(interval) => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        debug!("Scheduler for loop {} dropped", id);
                        break;
                    }
                }
            }
        }
        debug!("Auto signal loop {} exited", id);
    }

    async fn run_iteration(scanner: &PairScanner, sink: &dyn ReportSink, destination: Destination) {
        let report = scanner.scan().await;
        let text = render_auto_update(&report);

        match sink.deliver(destination, &text).await {
            Ok(()) => info!("✅ Auto signals sent successfully."),
            Err(e) => error!("⚠️ Auto signal delivery failed: {}", e),
        }
    }
}

pub fn render_auto_update(report: &ScanReport) -> String {
    format!("{}\n\n{}", AUTO_UPDATE_HEADER, report)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
