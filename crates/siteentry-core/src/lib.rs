//! Core types for the site-entry forms: form kinds, field schemas,
//! validation, transport payloads, and shared configuration.

pub mod config;
mod error;
pub mod geo;
pub mod kind;
pub mod payload;
pub mod route;
pub mod schema;
pub mod validate;
pub mod values;

pub use config::{ConfigError, SiteConfig};
pub use error::CoreError;
pub use geo::{GeoCapture, GeoError, Position, format_location};
pub use kind::FormKind;
pub use payload::{FilePart, Payload};
pub use route::{Navigator, page_title};
pub use schema::{FieldKind, FieldSpec, FormDefinition, definition, get_definition};
pub use validate::{FieldIssue, ValidationResult, validate};
pub use values::{FieldValue, FileAttachment, FormValues};
