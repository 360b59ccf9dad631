//! Shared fixtures for session tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use siteentry_core::{FieldValue, FileAttachment, FormKind, FormValues, Payload};
use siteentry_gateway::{Gateway, Sink, SinkError};

/// Counts deliveries and fails the first `fail_first` of them.
#[derive(Default)]
pub struct CountingSink {
    calls: AtomicUsize,
    fail_first: usize,
}

impl CountingSink {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn gateway() -> (Arc<CountingSink>, Gateway) {
        Self::failing_first(0)
    }

    pub fn failing_first(n: usize) -> (Arc<CountingSink>, Gateway) {
        let sink = Arc::new(CountingSink {
            calls: AtomicUsize::new(0),
            fail_first: n,
        });
        let gateway = Gateway::new(sink.clone());
        (sink, gateway)
    }
}

#[async_trait]
impl Sink for CountingSink {
    async fn deliver(&self, _kind: FormKind, _payload: &Payload) -> Result<(), SinkError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            Err(SinkError::Rejected("sheet unavailable".into()))
        } else {
            Ok(())
        }
    }
}

pub fn valid_materials() -> FormValues {
    let photo = |name: &str| {
        FieldValue::file(FileAttachment::new(name, "image/jpeg", vec![0u8; 2048]))
    };
    FormValues::new()
        .with("dateTime", FieldValue::text("2024-03-01T08:30"))
        .with("vehicleRegistration", FieldValue::text("ABC-123"))
        .with("personnelName", FieldValue::text("Sam Lee"))
        .with("grossWeight", FieldValue::text("12500"))
        .with("vehiclePhotoFront", photo("front.jpg"))
        .with("vehiclePhotoBack", photo("back.jpg"))
        .with("materialDetails", FieldValue::text("Crushed concrete, 12 tonnes"))
}
