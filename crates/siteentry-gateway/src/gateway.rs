use std::sync::Arc;
use std::time::Duration;

use siteentry_core::config::{SinkConfig, SiteConfig};
use siteentry_core::{FormKind, FormValues, Payload, definition, validate};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{LogSink, Sink, SubmissionOutcome};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("sink '{0}' is not available in this build")]
    SinkUnavailable(&'static str),
}

/// Packages form values and delegates them to a [`Sink`].
///
/// Every call to [`submit`](Self::submit) reports exactly one outcome and
/// makes at most one sink call; the payload is never partial.
#[derive(Clone)]
pub struct Gateway {
    sink: Arc<dyn Sink>,
    revalidate: bool,
}

impl Gateway {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self {
            sink,
            revalidate: true,
        }
    }

    /// Toggle the gateway's own validation pass. On by default so attachments
    /// are checked again even when the caller skipped client-side checks.
    pub fn with_revalidation(mut self, revalidate: bool) -> Self {
        self.revalidate = revalidate;
        self
    }

    /// Build a gateway for the sink named in `config`.
    pub fn from_config(config: &SiteConfig) -> Result<Self, GatewayError> {
        let sink: Arc<dyn Sink> = match &config.sink {
            SinkConfig::Log { delay_ms } => Arc::new(LogSink::new(Duration::from_millis(*delay_ms))),
            #[cfg(feature = "http")]
            SinkConfig::Http { base_url } => Arc::new(crate::HttpSink::new(base_url.clone())),
            #[cfg(not(feature = "http"))]
            SinkConfig::Http { .. } => return Err(GatewayError::SinkUnavailable("http")),
        };
        Ok(Self::new(sink).with_revalidation(config.gateway.revalidate))
    }

    pub async fn submit(&self, kind: FormKind, values: &FormValues) -> SubmissionOutcome {
        let definition = definition(kind);

        if self.revalidate {
            let result = validate(definition, values);
            if !result.is_submittable() {
                warn!(
                    form = %kind,
                    invalid_fields = result.len(),
                    "gateway rejected submission that failed validation"
                );
                return SubmissionOutcome::error(kind.failure_message());
            }
        }

        let payload = match Payload::project(definition, values) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(form = %kind, error = %e, "could not build payload");
                return SubmissionOutcome::error(kind.failure_message());
            }
        };

        info!(
            form = %kind,
            scalars = payload.scalars.len(),
            files = payload.files.len(),
            file_bytes = payload.total_file_bytes(),
            "delivering submission"
        );
        match self.sink.deliver(kind, &payload).await {
            Ok(()) => {
                info!(form = %kind, "submission accepted");
                SubmissionOutcome::success(kind.success_message())
            }
            Err(e) => {
                error!(form = %kind, error = %e, "submission failed");
                SubmissionOutcome::error(kind.failure_message())
            }
        }
    }
}
