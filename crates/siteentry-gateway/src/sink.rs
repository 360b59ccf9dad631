//! External sinks that durably record a submitted form.

use std::time::Duration;

use async_trait::async_trait;
use siteentry_core::{FormKind, Payload};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink rejected submission: {0}")]
    Rejected(String),

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
}

/// Backend that receives a complete payload. One call per submission; the
/// gateway never retries.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn deliver(&self, kind: FormKind, payload: &Payload) -> Result<(), SinkError>;
}

/// Placeholder backend: logs the payload, waits, and reports success.
pub struct LogSink {
    delay: Duration,
}

impl LogSink {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl Sink for LogSink {
    async fn deliver(&self, kind: FormKind, payload: &Payload) -> Result<(), SinkError> {
        info!(form = %kind, sheet = kind.sheet_name(), "received form data");
        for (field, value) in &payload.scalars {
            info!(form = %kind, field = %field, value = %value, "scalar");
        }
        for file in &payload.files {
            info!(
                form = %kind,
                field = %file.field,
                "{} ({} bytes)",
                file.filename,
                file.bytes.len()
            );
        }
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
