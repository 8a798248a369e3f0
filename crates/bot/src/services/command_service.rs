use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use common::models::ScanReport;
use common::{DeliveryError, Destination, ReportSink};
use strategy::PairScanner;

use crate::services::{AutoSignalScheduler, StartOutcome, StopOutcome};

pub const FETCHING_NOTICE: &str = "📊 Fetching live market data...";

/// Entry points the chat layer calls into. Manual scans run independently of
/// the automatic loop and may overlap with it.
pub struct CommandCenter {
    scheduler: Arc<AutoSignalScheduler>,
    scanner: Arc<PairScanner>,
    sink: Arc<dyn ReportSink>,
}

impl CommandCenter {
    pub fn new(
        scheduler: Arc<AutoSignalScheduler>,
        scanner: Arc<PairScanner>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            scheduler,
            scanner,
            sink,
        }
    }

    /// Returns the reply for the requesting chat.
    pub async fn on_start(&self, destination: Destination) -> String {
        match self.scheduler.start(destination).await {
            StartOutcome::Started => format!(
                "🤖 Bot started! Auto signals every {}.\nUse /stop to stop.",
                describe_interval(self.scheduler.interval())
            ),
            StartOutcome::AlreadyRunning => {
                if let Some(active) = self.scheduler.destination().await {
                    debug!("Auto updates already going to chat {}", active);
                }
                "✅ Auto signal updates are already running!".to_string()
            }
        }
    }

    pub async fn on_stop(&self) -> String {
        match self.scheduler.stop().await {
            StopOutcome::Stopped => "🛑 Auto signal updates stopped.".to_string(),
            StopOutcome::NotRunning => "⚠️ Auto updates are not running.".to_string(),
        }
    }

    /// Sends a progress notice, scans the basket and delivers the full report.
    pub async fn on_manual_scan(&self, destination: Destination) -> Result<ScanReport, DeliveryError> {
        info!("Manual scan requested by chat {}", destination);
        self.sink.deliver(destination, FETCHING_NOTICE).await?;

        let report = self.scanner.scan().await;
        self.sink.deliver(destination, &report.to_string()).await?;
        Ok(report)
    }
}

fn describe_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    match secs {
        60 => "minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "second".to_string(),
        s => format!("{} seconds", s),
    }
}
