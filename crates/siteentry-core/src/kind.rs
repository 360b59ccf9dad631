//! The three site-entry form kinds and their fixed per-kind metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Induction,
    DailyLog,
    MaterialsRegister,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [
        FormKind::Induction,
        FormKind::DailyLog,
        FormKind::MaterialsRegister,
    ];

    /// Stable identifier used on the command line and in sink URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Induction => "induction",
            FormKind::DailyLog => "daily-log",
            FormKind::MaterialsRegister => "materials-register",
        }
    }

    /// Route the page shell serves this form on.
    pub fn route(self) -> &'static str {
        match self {
            FormKind::Induction => "/induction",
            FormKind::DailyLog => "/daily-login",
            FormKind::MaterialsRegister => "/materials-register",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::Induction => "Site Induction Form",
            FormKind::DailyLog => "Daily Site Log",
            FormKind::MaterialsRegister => "Materials Register Form",
        }
    }

    /// Backend sheet that submissions of this kind are appended to.
    pub fn sheet_name(self) -> &'static str {
        match self {
            FormKind::Induction => "Induction",
            FormKind::DailyLog => "DailyLogins",
            FormKind::MaterialsRegister => "MaterialsRegister",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::Induction => "Induction form submitted successfully.",
            FormKind::DailyLog => "Daily log submitted successfully.",
            FormKind::MaterialsRegister => "Materials register submitted successfully.",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            FormKind::Induction => "Failed to submit induction form.",
            FormKind::DailyLog => "Failed to submit daily log.",
            FormKind::MaterialsRegister => "Failed to submit materials register.",
        }
    }

    /// Look up the form served on `route`, if any.
    pub fn from_route(route: &str) -> Option<FormKind> {
        FormKind::ALL.into_iter().find(|k| k.route() == route)
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "induction" => Ok(FormKind::Induction),
            "daily-log" | "daily-login" => Ok(FormKind::DailyLog),
            "materials-register" => Ok(FormKind::MaterialsRegister),
            _ => Err(CoreError::UnknownFormKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifiers_and_aliases() {
        assert_eq!("induction".parse::<FormKind>(), Ok(FormKind::Induction));
        assert_eq!("daily-log".parse::<FormKind>(), Ok(FormKind::DailyLog));
        assert_eq!("daily-login".parse::<FormKind>(), Ok(FormKind::DailyLog));
        assert_eq!(
            " Materials-Register ".parse::<FormKind>(),
            Ok(FormKind::MaterialsRegister)
        );
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        assert_eq!(
            "payroll".parse::<FormKind>(),
            Err(CoreError::UnknownFormKind("payroll".into()))
        );
    }

    #[test]
    fn display_matches_identifier() {
        for kind in FormKind::ALL {
            assert_eq!(kind.to_string().parse::<FormKind>(), Ok(kind));
        }
    }

    #[test]
    fn route_lookup() {
        assert_eq!(FormKind::from_route("/daily-login"), Some(FormKind::DailyLog));
        assert_eq!(FormKind::from_route("/"), None);
    }
}
