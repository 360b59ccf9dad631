//! Site configuration: which sink receives submissions, whether the gateway
//! re-validates, and where exported documents go.
//!
//! ```toml
//! [sink]
//! kind = "http"
//! base_url = "http://localhost:4000"
//!
//! [gateway]
//! revalidate = true
//!
//! [export]
//! dir = "exports"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl SiteConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Log the payload and report success after `delay_ms`.
    Log {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },
    /// POST a multipart form to `{base_url}/api/forms/{kind}`.
    Http { base_url: String },
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::Log {
            delay_ms: default_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Re-run validation inside the gateway before anything reaches the sink.
    #[serde(default = "default_true")]
    pub revalidate: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { revalidate: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SiteConfig::from_toml("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.sink, SinkConfig::Log { delay_ms: 1000 });
        assert!(config.gateway.revalidate);
        assert_eq!(config.export.dir, PathBuf::from("exports"));
    }

    #[test]
    fn http_sink_section() {
        let config = SiteConfig::from_toml(
            r#"
            [sink]
            kind = "http"
            base_url = "http://localhost:4000"

            [gateway]
            revalidate = false
            "#,
        )
        .unwrap();
        assert_eq!(
            config.sink,
            SinkConfig::Http {
                base_url: "http://localhost:4000".into()
            }
        );
        assert!(!config.gateway.revalidate);
    }

    #[test]
    fn log_sink_delay_override() {
        let config = SiteConfig::from_toml("[sink]\nkind = \"log\"\ndelay_ms = 0\n").unwrap();
        assert_eq!(config.sink, SinkConfig::Log { delay_ms: 0 });
    }

    #[test]
    fn unknown_sink_kind_is_parse_error() {
        let err = SiteConfig::from_toml("[sink]\nkind = \"carrier-pigeon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let config = SiteConfig {
            sink: SinkConfig::Http {
                base_url: "https://sheets.example".into(),
            },
            gateway: GatewayConfig { revalidate: false },
            export: ExportConfig {
                dir: PathBuf::from("/tmp/site-exports"),
            },
        };
        let text = config.to_toml().unwrap();
        assert_eq!(SiteConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(&path, "[export]\ndir = \"out\"\n").unwrap();
        let config = SiteConfig::from_file(&path).unwrap();
        assert_eq!(config.export.dir, PathBuf::from("out"));

        let missing = SiteConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
