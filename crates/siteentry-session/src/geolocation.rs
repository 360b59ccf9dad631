//! Single-shot geolocation capture over the platform's position query.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use siteentry_core::{GeoCapture, GeoError, Position};
use tracing::{info, warn};

/// Platform location capability.
#[async_trait]
pub trait Locator: Send + Sync {
    async fn current_position(&self) -> Result<Position, GeoError>;
}

/// Locator pinned to one position. Used by the CLI and for site kiosks
/// whose location is known up front.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Position);

#[async_trait]
impl Locator for FixedLocator {
    async fn current_position(&self) -> Result<Position, GeoError> {
        Ok(self.0)
    }
}

/// Wraps an optional [`Locator`]. Each [`capture`](Self::capture) makes
/// exactly one locator call: no retry, no caching, no timeout.
#[derive(Clone)]
pub struct GeolocationService {
    locator: Option<Arc<dyn Locator>>,
}

impl GeolocationService {
    pub fn new(locator: Arc<dyn Locator>) -> Self {
        Self {
            locator: Some(locator),
        }
    }

    /// A service on a platform without any location capability.
    pub fn unsupported() -> Self {
        Self { locator: None }
    }

    pub fn fixed(position: Position) -> Self {
        Self::new(Arc::new(FixedLocator(position)))
    }

    pub async fn capture(&self) -> Result<GeoCapture, GeoError> {
        let Some(locator) = &self.locator else {
            warn!("geolocation requested but no locator is available");
            return Err(GeoError::Unsupported);
        };

        match locator.current_position().await {
            Ok(position) => {
                let capture = GeoCapture::new(position, Utc::now());
                info!(
                    latitude = capture.latitude,
                    longitude = capture.longitude,
                    "position captured"
                );
                Ok(capture)
            }
            Err(e) => {
                warn!(error = %e, "position query failed");
                Err(e)
            }
        }
    }
}
