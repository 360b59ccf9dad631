//! HTTP sink that posts submissions to a backend as multipart form data.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use siteentry_core::{FormKind, Payload};
use tracing::info;

use crate::{Sink, SinkError};

/// Posts each submission to `{base_url}/api/forms/{kind}`.
pub struct HttpSink {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSink {
    /// `base_url` should be like `http://localhost:4000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, kind: FormKind) -> String {
        format!("{}/api/forms/{}", self.base_url, kind)
    }

    fn build_form(kind: FormKind, payload: &Payload) -> Result<Form, SinkError> {
        let mut form = Form::new().text("sheet", kind.sheet_name());
        for (field, value) in &payload.scalars {
            form = form.text(field.clone(), value.clone());
        }
        for file in &payload.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.filename.clone())
                .mime_str(&file.media_type)?;
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn deliver(&self, kind: FormKind, payload: &Payload) -> Result<(), SinkError> {
        let url = self.url_for(kind);
        let form = Self::build_form(kind, payload)?;

        info!(url = %url, files = payload.files.len(), "posting submission");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SinkError::Server {
                status: status.as_u16(),
                body,
            });
        }

        info!(url = %url, status = status.as_u16(), "submission stored");
        Ok(())
    }
}
