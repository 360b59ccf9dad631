//! Terminal rendering for forms, validation results, captures, and notices.

use siteentry_core::{FormKind, GeoCapture, ValidationResult, definition, page_title};
use siteentry_gateway::SubmissionOutcome;
use siteentry_session::{Notice, NoticeLevel};

pub fn print_forms() {
    for kind in FormKind::ALL {
        let def = definition(kind);
        println!("=== {} ===", page_title(kind.route()));
        println!("  {:<26} {}", "id", kind);
        println!("  {:<26} {}", "route", kind.route());
        println!("  {:<26} {}", "sheet", kind.sheet_name());
        println!("  fields ({}):", def.fields().len());
        for spec in def.fields() {
            let req = if spec.required { "" } else { " (optional)" };
            println!("    {:<24} {}{}", spec.name, spec.kind.as_str(), req);
        }
        println!();
    }
}

pub fn print_validation(kind: FormKind, result: &ValidationResult) {
    if result.is_empty() {
        println!("{}: all fields valid", kind.title());
        return;
    }
    println!("{}: {} field(s) need attention", kind.title(), result.len());
    for issue in result.issues() {
        let marker = if issue.required { "!" } else { "?" };
        for message in &issue.messages {
            println!("  {marker} {:<24} {}", issue.field, message);
        }
    }
}

pub fn print_capture(label: &str, capture: &GeoCapture) {
    println!("{label}");
    println!("  {:<26} {}", "time", capture.timestamp_iso());
    println!("  {:<26} {}", "location", capture.location());
}

pub fn print_outcome(outcome: &SubmissionOutcome) {
    println!("[{}] {}", outcome.status, outcome.message);
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => eprintln!("{notice}"),
            NoticeLevel::Destructive => eprintln!("! {notice}"),
        }
    }
}
