//! Declarative field definitions for each form kind.
//!
//! Definitions are built once on first use and never mutated. Field names
//! double as the keys of the transport payload, so they keep the casing the
//! backend sheets already use.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::{CoreError, FieldValue, FormKind};

/// Largest accepted attachment: 5 MiB.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

pub const PHONE_PATTERN: &str = r"^\+?[0-9]{10,14}$";

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("phone regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Phone,
    Date,
    NumberString,
    LongText,
    File,
    DerivedTimestamp,
    DerivedLocation,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Phone => "phone",
            FieldKind::Date => "date",
            FieldKind::NumberString => "number-string",
            FieldKind::LongText => "long-text",
            FieldKind::File => "file",
            FieldKind::DerivedTimestamp => "derived-timestamp",
            FieldKind::DerivedLocation => "derived-location",
        }
    }

    /// Kinds filled in by the session itself rather than typed by the user.
    pub fn is_derived(self) -> bool {
        matches!(self, FieldKind::DerivedTimestamp | FieldKind::DerivedLocation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConstraint {
    pub max_bytes: u64,
    pub accepted_types: &'static [&'static str],
}

impl Default for FileConstraint {
    fn default() -> Self {
        Self {
            max_bytes: MAX_FILE_SIZE,
            accepted_types: ACCEPTED_IMAGE_TYPES,
        }
    }
}

impl FileConstraint {
    pub fn accepts(&self, media_type: &str) -> bool {
        self.accepted_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(media_type.trim()))
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    /// Trimmed value must have at least `min` characters.
    MinLength { min: usize, message: &'static str },
    Pattern { regex: Regex, message: &'static str },
    /// A constructible calendar date; `required` is reported when absent.
    Date { required: &'static str },
    /// Any non-blank string.
    Present { message: &'static str },
    File(FileConstraint),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub rule: Rule,
    pub default: Option<FieldValue>,
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, kind: FieldKind, rule: Rule) -> Self {
        let default = match kind {
            FieldKind::Text | FieldKind::Phone | FieldKind::NumberString | FieldKind::LongText => {
                Some(FieldValue::text(""))
            }
            _ => None,
        };
        Self {
            name,
            label,
            kind,
            required: true,
            rule,
            default,
        }
    }

    pub fn text(name: &'static str, label: &'static str, min: usize, message: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text, Rule::MinLength { min, message })
    }

    pub fn long_text(
        name: &'static str,
        label: &'static str,
        min: usize,
        message: &'static str,
    ) -> Self {
        Self::new(name, label, FieldKind::LongText, Rule::MinLength { min, message })
    }

    pub fn phone(name: &'static str, label: &'static str) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Phone,
            Rule::Pattern {
                regex: (*PHONE).clone(),
                message: "Invalid phone number.",
            },
        )
    }

    pub fn date(name: &'static str, label: &'static str, required: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date, Rule::Date { required })
    }

    pub fn number_string(name: &'static str, label: &'static str, message: &'static str) -> Self {
        Self::new(name, label, FieldKind::NumberString, Rule::Present { message })
    }

    pub fn file(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::File, Rule::File(FileConstraint::default()))
    }

    pub fn derived_timestamp(name: &'static str, label: &'static str, message: &'static str) -> Self {
        Self::new(name, label, FieldKind::DerivedTimestamp, Rule::Present { message })
    }

    pub fn derived_location(name: &'static str, label: &'static str, message: &'static str) -> Self {
        Self::new(name, label, FieldKind::DerivedLocation, Rule::Present { message })
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Ordered field list for one form kind.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    kind: FormKind,
    fields: Vec<FieldSpec>,
}

impl FormDefinition {
    /// Build a definition, rejecting duplicate field names.
    pub fn new(kind: FormKind, fields: Vec<FieldSpec>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for spec in &fields {
            if !seen.insert(spec.name) {
                return Err(CoreError::DuplicateField(spec.name.to_string()));
            }
        }
        Ok(Self { kind, fields })
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Like [`field`](Self::field), but unknown names are an error.
    pub fn require_field(&self, name: &str) -> Result<&FieldSpec, CoreError> {
        self.field(name).ok_or_else(|| CoreError::UnknownField {
            kind: self.kind,
            field: name.to_string(),
        })
    }
}

// ── Field names shared with the session ──

pub const CHECK_IN_TIME: &str = "checkInTime";
pub const CHECK_IN_LOCATION: &str = "checkInLocation";
pub const CHECK_OUT_TIME: &str = "checkOutTime";
pub const CHECK_OUT_LOCATION: &str = "checkOutLocation";

// ── Built-in definitions ──

static INDUCTION: LazyLock<FormDefinition> = LazyLock::new(|| FormDefinition {
    kind: FormKind::Induction,
    fields: vec![
        FieldSpec::text("name", "Full Name", 2, "Name must be at least 2 characters."),
        FieldSpec::phone("phone", "Phone Number"),
        FieldSpec::date("dateOfBirth", "Date of Birth", "Date of birth is required."),
        FieldSpec::text("address", "Address", 5, "Address must be at least 5 characters."),
        FieldSpec::text(
            "drivingLicenseNumber",
            "Driving License Number",
            1,
            "Driving license number is required.",
        ),
        FieldSpec::file("drivingLicenseFront", "Driving License (Front)"),
        FieldSpec::file("drivingLicenseBack", "Driving License (Back)"),
        FieldSpec::text(
            "whiteCardNumber",
            "White Card Number",
            1,
            "White card number is required.",
        ),
        FieldSpec::file("whiteCardFront", "White Card (Front)"),
        FieldSpec::file("whiteCardBack", "White Card (Back)"),
        FieldSpec::text(
            "emergencyContactName",
            "Emergency Contact Name",
            2,
            "Emergency contact name is required.",
        ),
        FieldSpec::phone("emergencyContactPhone", "Emergency Contact Phone"),
    ],
});

static DAILY_LOG: LazyLock<FormDefinition> = LazyLock::new(|| FormDefinition {
    kind: FormKind::DailyLog,
    fields: vec![
        FieldSpec::derived_timestamp(CHECK_IN_TIME, "Check-In Time", "Check-in time is required."),
        FieldSpec::derived_location(
            CHECK_IN_LOCATION,
            "Check-In Location",
            "Check-in location is required.",
        ),
        FieldSpec::derived_timestamp(
            CHECK_OUT_TIME,
            "Check-Out Time",
            "Check-out time is required.",
        ),
        FieldSpec::derived_location(
            CHECK_OUT_LOCATION,
            "Check-Out Location",
            "Check-out location is required.",
        ),
    ],
});

static MATERIALS_REGISTER: LazyLock<FormDefinition> = LazyLock::new(|| FormDefinition {
    kind: FormKind::MaterialsRegister,
    fields: vec![
        FieldSpec::date("dateTime", "Date and Time", "Date and time are required."),
        FieldSpec::text(
            "vehicleRegistration",
            "Vehicle Registration",
            1,
            "Vehicle registration is required.",
        ),
        FieldSpec::text("personnelName", "Personnel Name", 2, "Personnel name is required."),
        FieldSpec::number_string("grossWeight", "Gross Weight (kg)", "Gross weight is required."),
        FieldSpec::file("vehiclePhotoFront", "Vehicle Photo (Front)"),
        FieldSpec::file("vehiclePhotoBack", "Vehicle Photo (Back)"),
        FieldSpec::long_text(
            "materialDetails",
            "Material Details",
            10,
            "Material details must be at least 10 characters.",
        ),
    ],
});

/// Static definition for a known form kind.
pub fn definition(kind: FormKind) -> &'static FormDefinition {
    match kind {
        FormKind::Induction => &INDUCTION,
        FormKind::DailyLog => &DAILY_LOG,
        FormKind::MaterialsRegister => &MATERIALS_REGISTER,
    }
}

/// Definition by identifier, e.g. `"materials-register"`.
pub fn get_definition(kind: &str) -> Result<&'static FormDefinition, CoreError> {
    match kind.parse() {
        Ok(parsed) => Ok(definition(parsed)),
        Err(e) => {
            warn!(kind, "unknown form kind");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_definitions_have_unique_names() {
        for kind in FormKind::ALL {
            let def = definition(kind);
            assert_eq!(def.kind(), kind);
            let rebuilt = FormDefinition::new(kind, def.fields().to_vec());
            assert!(rebuilt.is_ok(), "{kind} has duplicate field names");
        }
    }

    #[test]
    fn builtin_field_counts() {
        assert_eq!(definition(FormKind::Induction).fields().len(), 12);
        assert_eq!(definition(FormKind::DailyLog).fields().len(), 4);
        assert_eq!(definition(FormKind::MaterialsRegister).fields().len(), 7);
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = FormDefinition::new(
            FormKind::Induction,
            vec![
                FieldSpec::text("name", "Name", 2, "too short"),
                FieldSpec::phone("name", "Phone"),
            ],
        )
        .unwrap_err();
        assert_eq!(err, CoreError::DuplicateField("name".into()));
    }

    #[test]
    fn get_definition_by_identifier() {
        let def = get_definition("daily-login").unwrap();
        assert_eq!(def.kind(), FormKind::DailyLog);
        assert!(matches!(
            get_definition("timesheet"),
            Err(CoreError::UnknownFormKind(_))
        ));
    }

    #[test]
    fn field_kinds_match_form_layouts() {
        let materials = definition(FormKind::MaterialsRegister);
        assert_eq!(materials.field("grossWeight").unwrap().kind, FieldKind::NumberString);
        assert_eq!(materials.field("materialDetails").unwrap().kind, FieldKind::LongText);
        let daily = definition(FormKind::DailyLog);
        assert!(daily.fields().iter().all(|f| f.kind.is_derived()));
    }

    #[test]
    fn require_field_reports_kind() {
        let err = definition(FormKind::DailyLog)
            .require_field("name")
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownField {
                kind: FormKind::DailyLog,
                field: "name".into()
            }
        );
    }

    #[test]
    fn file_constraint_media_types() {
        let c = FileConstraint::default();
        assert!(c.accepts("image/webp"));
        assert!(c.accepts("IMAGE/PNG"));
        assert!(!c.accepts("application/pdf"));
        assert_eq!(c.max_bytes, 5_242_880);
    }
}
