use thiserror::Error;

use crate::FormKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown form kind: {0}")]
    UnknownFormKind(String),

    #[error("unknown field '{field}' on the {kind} form")]
    UnknownField { kind: FormKind, field: String },

    #[error("duplicate field '{0}' in form definition")]
    DuplicateField(String),

    #[error("required field '{0}' has no value")]
    MissingField(String),

    #[error("field '{field}' expects {expected}")]
    ValueKind {
        field: String,
        expected: &'static str,
    },
}
