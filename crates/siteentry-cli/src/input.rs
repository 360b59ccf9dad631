//! Loads form values from a JSON file.
//!
//! ```json
//! {
//!   "name": "Jane Doe",
//!   "dateOfBirth": "1990-04-12",
//!   "drivingLicenseFront": { "path": "scans/front.jpg" },
//!   "drivingLicenseBack": { "path": "scans/back.bin", "mediaType": "image/png" }
//! }
//! ```
//!
//! File paths are resolved relative to the JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use siteentry_core::{FieldValue, FileAttachment};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    File(RawFile),
    Files(Vec<RawFile>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    path: PathBuf,
    media_type: Option<String>,
}

pub fn load_values(path: &Path) -> anyhow::Result<Vec<(String, FieldValue)>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading values from {}", path.display()))?;
    let raw: BTreeMap<String, RawValue> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let base = path.parent().unwrap_or(Path::new("."));

    raw.into_iter()
        .map(|(field, value)| -> anyhow::Result<(String, FieldValue)> {
            let value = match value {
                RawValue::Text(s) => FieldValue::Text(s),
                RawValue::File(file) => FieldValue::file(read_attachment(base, file)?),
                RawValue::Files(files) => FieldValue::Files(
                    files
                        .into_iter()
                        .map(|f| read_attachment(base, f))
                        .collect::<anyhow::Result<_>>()?,
                ),
            };
            Ok((field, value))
        })
        .collect()
}

fn read_attachment(base: &Path, raw: RawFile) -> anyhow::Result<FileAttachment> {
    let path = base.join(&raw.path);
    let bytes =
        std::fs::read(&path).with_context(|| format!("reading attachment {}", path.display()))?;
    let filename = raw
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let media_type = raw
        .media_type
        .unwrap_or_else(|| guess_media_type(&raw.path).to_string());
    Ok(FileAttachment::new(filename, media_type, bytes))
}

/// Media type from the file extension, as a browser file input reports it.
pub fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
