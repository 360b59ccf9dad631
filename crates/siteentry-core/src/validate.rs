//! Pure validation of form values against a definition.

use crate::schema::{FileConstraint, Rule};
use crate::{FieldSpec, FieldValue, FormDefinition, FormValues};

pub const FILE_REQUIRED: &str = "File is required.";
pub const FILE_TOO_LARGE: &str = "Max file size is 5MB.";
pub const FILE_TYPE: &str = ".jpg, .jpeg, .png and .webp files are accepted.";
pub const INVALID_DATE: &str = "Invalid date.";

/// Errors collected for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub required: bool,
    /// At most one entry except for file fields, whose sub-checks each report.
    pub messages: Vec<String>,
}

/// Field errors in definition order. Empty means every field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    issues: Vec<FieldIssue>,
}

impl ValidationResult {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// A form can be submitted when no required field has an error.
    pub fn is_submittable(&self) -> bool {
        !self.issues.iter().any(|i| i.required)
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.issues
            .iter()
            .find(|i| i.field == field)
            .map(|i| i.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_error(&self, field: &str) -> bool {
        !self.messages(field).is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|i| i.field.as_str())
    }
}

/// Check every field of `definition` against `values`.
///
/// Values for names the definition does not know are ignored here; the
/// payload projection rejects them.
pub fn validate(definition: &FormDefinition, values: &FormValues) -> ValidationResult {
    let issues = definition
        .fields()
        .iter()
        .filter_map(|spec| {
            let messages = check_field(spec, values.get(spec.name));
            (!messages.is_empty()).then(|| FieldIssue {
                field: spec.name.to_string(),
                required: spec.required,
                messages,
            })
        })
        .collect();
    ValidationResult { issues }
}

fn check_field(spec: &FieldSpec, value: Option<&FieldValue>) -> Vec<String> {
    if !spec.required && value.is_none_or(FieldValue::is_blank) {
        return Vec::new();
    }

    match &spec.rule {
        Rule::MinLength { min, message } => {
            let len = value
                .and_then(FieldValue::as_text)
                .map(|s| s.trim().chars().count())
                .unwrap_or(0);
            if len == 0 || len < *min {
                vec![message.to_string()]
            } else {
                Vec::new()
            }
        }
        Rule::Pattern { regex, message } => {
            let ok = value
                .and_then(FieldValue::as_text)
                .is_some_and(|s| regex.is_match(s));
            if ok { Vec::new() } else { vec![message.to_string()] }
        }
        Rule::Date { required } => match value {
            None => vec![required.to_string()],
            Some(v) if v.is_blank() => vec![required.to_string()],
            Some(v) => match v.to_date() {
                Some(_) => Vec::new(),
                None => vec![INVALID_DATE.to_string()],
            },
        },
        Rule::Present { message } => {
            let present = value
                .and_then(FieldValue::as_text)
                .is_some_and(|s| !s.trim().is_empty());
            if present { Vec::new() } else { vec![message.to_string()] }
        }
        Rule::File(constraint) => check_files(constraint, value),
    }
}

fn check_files(constraint: &FileConstraint, value: Option<&FieldValue>) -> Vec<String> {
    let files = match value {
        Some(FieldValue::Files(files)) => files.as_slice(),
        _ => &[],
    };
    let first = files.first();

    // Each sub-check reports on its own; an absent file fails all three.
    let mut messages = Vec::new();
    if files.len() != 1 {
        messages.push(FILE_REQUIRED.to_string());
    }
    if first.is_none_or(|f| f.size() > constraint.max_bytes) {
        messages.push(FILE_TOO_LARGE.to_string());
    }
    if first.is_none_or(|f| !constraint.accepts(&f.media_type)) {
        messages.push(FILE_TYPE.to_string());
    }
    messages
}
