//! Typed projection from form values to the transport payload a sink receives.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, TimeZone, Utc};

use crate::{CoreError, FieldKind, FieldValue, FormDefinition, FormValues};

/// One attachment, carried as raw bytes with its original name and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub scalars: BTreeMap<String, String>,
    pub files: Vec<FilePart>,
}

impl Payload {
    /// Project `values` onto the fields of `definition`.
    ///
    /// All or nothing: any field that cannot be projected fails the whole
    /// payload. Optional fields without a value are left out. Dates become
    /// ISO 8601 UTC strings with millisecond precision.
    pub fn project(definition: &FormDefinition, values: &FormValues) -> Result<Self, CoreError> {
        for (name, _) in values.iter() {
            definition.require_field(name)?;
        }

        let mut payload = Payload::default();
        for spec in definition.fields() {
            let value = match values.get(spec.name) {
                Some(v) if !(v.is_blank() && !spec.required) => v,
                _ if !spec.required => continue,
                _ => return Err(CoreError::MissingField(spec.name.to_string())),
            };

            match spec.kind {
                FieldKind::File => {
                    let FieldValue::Files(files) = value else {
                        return Err(value_kind(spec.name, "a single file"));
                    };
                    let [file] = files.as_slice() else {
                        return Err(value_kind(spec.name, "a single file"));
                    };
                    payload.files.push(FilePart {
                        field: spec.name.to_string(),
                        filename: file.filename.clone(),
                        media_type: file.media_type.clone(),
                        bytes: file.bytes.clone(),
                    });
                }
                FieldKind::Date => {
                    let date = value
                        .to_date()
                        .ok_or_else(|| value_kind(spec.name, "a calendar date"))?;
                    let iso = Utc
                        .from_utc_datetime(&date)
                        .to_rfc3339_opts(SecondsFormat::Millis, true);
                    payload.scalars.insert(spec.name.to_string(), iso);
                }
                _ => {
                    let text = value
                        .as_text()
                        .ok_or_else(|| value_kind(spec.name, "a text value"))?;
                    payload.scalars.insert(spec.name.to_string(), text.to_string());
                }
            }
        }
        Ok(payload)
    }

    pub fn total_file_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes.len() as u64).sum()
    }
}

fn value_kind(field: &str, expected: &'static str) -> CoreError {
    CoreError::ValueKind {
        field: field.to_string(),
        expected,
    }
}
