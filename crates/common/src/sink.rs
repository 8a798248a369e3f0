use std::fmt;

use async_trait::async_trait;

use crate::errors::DeliveryError;

/// Opaque identifier of the chat a report is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination(pub i64);

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound notification channel for rendered reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(&self, destination: Destination, text: &str) -> Result<(), DeliveryError>;
}
