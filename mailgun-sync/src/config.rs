//! Configuration management for mailgun-sync
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Command-line flags (applied by the caller after loading)
//! 2. Environment variables (`MAILGUN_` prefix)
//! 3. The file passed with `--config`, otherwise `./mailgun-sync.toml`
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # mailgun-sync.toml
//! domain = "mg.example.com"
//! username = "api"
//! api_base = "https://api.eu.mailgun.net"
//! templates_dir = "./mailgun-templates"
//! timeout_secs = 30
//! ```
//!
//! The API key is normally supplied through `MAILGUN_API_KEY` rather than
//! written to the file.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{SyncError, SyncResult};

/// Local config file picked up when no `--config` path is given
pub const DEFAULT_CONFIG_FILE: &str = "mailgun-sync.toml";

/// Mailgun's US API host
pub const DEFAULT_API_BASE: &str = "https://api.mailgun.net";

/// Complete mailgun-sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Mailgun private API key
    #[serde(deserialize_with = "optional_scalar_string")]
    pub api_key: Option<String>,

    /// Sending domain the templates belong to
    #[serde(deserialize_with = "optional_scalar_string")]
    pub domain: Option<String>,

    /// Basic-auth username
    #[serde(deserialize_with = "scalar_string")]
    pub username: String,

    /// API host, e.g. `https://api.eu.mailgun.net` for the EU region
    #[serde(deserialize_with = "scalar_string")]
    pub api_base: String,

    /// Directory holding the top-level templates
    pub templates_dir: PathBuf,

    /// Directory holding partials (defaults to `<templates_dir>/partials`)
    pub partials_dir: Option<PathBuf>,

    /// Global HTTP timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            domain: None,
            username: "api".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            templates_dir: PathBuf::from("mailgun-templates"),
            partials_dir: None,
            timeout_secs: None,
        }
    }
}

impl SyncConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    ///
    /// When `path` is `None`, `./mailgun-sync.toml` is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if:
    /// - An explicitly requested config file does not exist
    /// - The config file cannot be parsed
    /// - A value has the wrong type
    pub fn load(path: Option<&Path>) -> SyncResult<Self> {
        let mut figment = Self::defaults()?;

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(SyncError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let local_config = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local_config.exists() {
                    figment = figment.merge(Toml::file(local_config));
                }
            }
        }

        // MAILGUN_API_KEY -> api_key, MAILGUN_DOMAIN -> domain, ...
        figment = figment.merge(Env::prefixed("MAILGUN_").lowercase(true));

        Self::from_figment(&figment)
    }

    /// Figment seeded with the built-in defaults
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if the defaults cannot be serialized.
    pub fn defaults() -> SyncResult<Figment> {
        let defaults = toml::to_string(&Self::default())
            .map_err(|e| SyncError::Config(e.to_string()))?;
        Ok(Figment::new().merge(Toml::string(&defaults)))
    }

    /// Extract a configuration from an assembled figment
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if extraction fails.
    pub fn from_figment(figment: &Figment) -> SyncResult<Self> {
        Ok(figment.extract()?)
    }

    /// Resolved partials directory
    #[must_use]
    pub fn partials_dir(&self) -> PathBuf {
        self.partials_dir
            .clone()
            .unwrap_or_else(|| self.templates_dir.join("partials"))
    }

    /// HTTP timeout, if one is configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Any scalar a provider may hand back for a string setting
///
/// The env provider parses values, so `MAILGUN_API_KEY=123456` arrives as an
/// integer and `MAILGUN_USERNAME=true` as a bool.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Bool(bool),
    UInt(u64),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Str(s) => s,
            other => other.to_string(),
        }
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layered(toml: &str) -> SyncConfig {
        let figment = SyncConfig::defaults().unwrap().merge(Toml::string(toml));
        SyncConfig::from_figment(&figment).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.username, "api");
        assert_eq!(config.api_base, "https://api.mailgun.net");
        assert_eq!(config.templates_dir, PathBuf::from("mailgun-templates"));
        assert!(config.api_key.is_none());
        assert!(config.domain.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_partials_dir_defaults_under_templates() {
        let config = layered(r#"templates_dir = "emails""#);
        assert_eq!(config.partials_dir(), PathBuf::from("emails/partials"));
    }

    #[test]
    fn test_partials_dir_override() {
        let config = layered(
            r#"
            templates_dir = "emails"
            partials_dir = "shared/fragments"
            "#,
        );
        assert_eq!(config.partials_dir(), PathBuf::from("shared/fragments"));
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let config = layered(
            r#"
            domain = "mg.example.com"
            api_base = "https://api.eu.mailgun.net"
            timeout_secs = 15
            "#,
        );
        assert_eq!(config.domain.as_deref(), Some("mg.example.com"));
        assert_eq!(config.api_base, "https://api.eu.mailgun.net");
        assert_eq!(config.username, "api");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        let figment = SyncConfig::defaults()
            .unwrap()
            .merge(Toml::string(r#"timeout_secs = "soon""#));
        let err = SyncConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_env_overrides_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                domain = "file.example.com"
                templates_dir = "emails"
                "#,
            )?;
            jail.set_env("MAILGUN_DOMAIN", "env.example.com");

            let config = SyncConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.domain.as_deref(), Some("env.example.com"));
            assert_eq!(config.templates_dir, PathBuf::from("emails"));
            Ok(())
        });
    }

    #[test]
    fn test_numeric_env_values_load_as_strings() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MAILGUN_API_KEY", "123456789");
            jail.set_env("MAILGUN_DOMAIN", "42");
            jail.set_env("MAILGUN_USERNAME", "true");
            jail.set_env("MAILGUN_TIMEOUT_SECS", "20");

            let config = SyncConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.api_key.as_deref(), Some("123456789"));
            assert_eq!(config.domain.as_deref(), Some("42"));
            assert_eq!(config.username, "true");
            assert_eq!(config.timeout(), Some(Duration::from_secs(20)));
            Ok(())
        });
    }

    #[test]
    fn test_numeric_file_values_load_as_strings() {
        let config = layered(
            r#"
            api_key = 987654
            username = false
            "#,
        );
        assert_eq!(config.api_key.as_deref(), Some("987654"));
        assert_eq!(config.username, "false");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = SyncConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
