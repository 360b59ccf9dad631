//! Export-to-document: render whatever the form currently shows.
//!
//! Export never validates and never feeds back into the session; a target
//! that fails is logged and otherwise ignored.

use std::fmt;
use std::path::{Path, PathBuf};

use siteentry_core::FieldValue;
use tracing::{info, warn};

use crate::FormSession;

/// Labelled rows of the form as currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        for (label, value) in &self.rows {
            writeln!(f, "  {label:<26} {value}")?;
        }
        Ok(())
    }
}

/// Platform document/print pipeline.
pub trait DocumentTarget {
    fn render(&self, snapshot: &Snapshot) -> std::io::Result<()>;
}

/// Writes the snapshot as plain text to a file.
pub struct TextFileTarget {
    path: PathBuf,
}

impl TextFileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentTarget for TextFileTarget {
    fn render(&self, snapshot: &Snapshot) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, snapshot.to_string())
    }
}

impl FormSession {
    pub fn snapshot(&self) -> Snapshot {
        let rows = self
            .definition()
            .fields()
            .iter()
            .map(|spec| {
                let shown = self.values().get(spec.name).map(display).unwrap_or_default();
                (spec.label.to_string(), shown)
            })
            .collect();
        Snapshot {
            title: self.kind().title().to_string(),
            rows,
        }
    }

    /// Render the current view to `target`. Failures are logged only.
    pub fn export(&self, target: &dyn DocumentTarget) {
        match target.render(&self.snapshot()) {
            Ok(()) => info!(form = %self.kind(), "form exported"),
            Err(e) => warn!(form = %self.kind(), error = %e, "export failed"),
        }
    }
}

fn display(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Date(d) => d.format("%Y-%m-%d %H:%M").to_string(),
        FieldValue::Files(files) => files
            .iter()
            .map(|f| format!("{} ({} bytes)", f.filename, f.size()))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
