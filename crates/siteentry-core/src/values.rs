//! Live field values for one form session.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::FormDefinition;

/// A single uploaded file as the browser hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub filename: String,
    /// Media type declared by the client, e.g. `image/png`.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDateTime),
    /// File inputs can hold several selections; only exactly one is valid.
    Files(Vec<FileAttachment>),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn file(attachment: FileAttachment) -> Self {
        FieldValue::Files(vec![attachment])
    }

    /// Calendar date at midnight. Returns `None` for impossible dates.
    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(FieldValue::Date)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for the empty string and for an empty file list.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Date(_) => false,
            FieldValue::Files(files) => files.is_empty(),
        }
    }

    /// Resolve a date-bearing value: typed dates pass through, text is parsed.
    pub fn to_date(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => parse_date(s),
            FieldValue::Files(_) => None,
        }
    }
}

/// Parse the date formats a browser date/datetime input or an API client
/// can produce: RFC 3339, `YYYY-MM-DDTHH:MM[:SS]`, or a bare `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Field name to current value. Unset fields are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values a freshly opened (or reset) form starts with.
    pub fn from_defaults(definition: &FormDefinition) -> Self {
        let values = definition
            .fields()
            .iter()
            .filter_map(|spec| {
                spec.default
                    .as_ref()
                    .map(|v| (spec.name.to_string(), v.clone()))
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(name.into(), value)
    }

    pub fn unset(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Builder-style `set`, handy when assembling values in one expression.
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FormKind, definition};

    #[test]
    fn parse_date_formats() {
        let midnight = FieldValue::date(1990, 4, 12).and_then(|v| v.to_date()).unwrap();
        assert_eq!(parse_date("1990-04-12"), Some(midnight));
        assert_eq!(
            parse_date("2024-03-01T08:30").map(|d| d.to_string()),
            Some("2024-03-01 08:30:00".to_string())
        );
        assert_eq!(
            parse_date("2024-03-01T08:30:00.000Z").map(|d| d.to_string()),
            Some("2024-03-01 08:30:00".to_string())
        );
    }

    #[test]
    fn parse_date_rejects_impossible_dates() {
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("   "), None);
        assert!(FieldValue::date(2023, 13, 1).is_none());
    }

    #[test]
    fn defaults_seed_text_fields_only() {
        let values = FormValues::from_defaults(definition(FormKind::Induction));
        assert_eq!(values.get("name"), Some(&FieldValue::text("")));
        assert_eq!(values.get("phone"), Some(&FieldValue::text("")));
        assert!(values.get("dateOfBirth").is_none());
        assert!(values.get("drivingLicenseFront").is_none());
    }

    #[test]
    fn blank_values() {
        assert!(FieldValue::text("  ").is_blank());
        assert!(FieldValue::Files(vec![]).is_blank());
        assert!(!FieldValue::text("x").is_blank());
    }

    #[test]
    fn attachment_size_is_byte_length() {
        let file = FileAttachment::new("a.png", "image/png", vec![0; 42]);
        assert_eq!(file.size(), 42);
    }
}
