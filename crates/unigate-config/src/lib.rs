//! Configuration for the unigate middleware.
//!
//! Layers serialized defaults, an optional TOML file and `UNIGATE_`
//! environment variables (figment), then validates the result once into an
//! immutable [`GateConfig`]. A missing required setting is a startup error,
//! never a request-time one.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use unigate_api::{ControllerPlatform, TlsMode, TransportConfig};
use unigate_core::{InventoryReader, LegacyConnector, NatsKvBridge, SessionParams};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{field}'")]
    Missing { field: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Raw settings ────────────────────────────────────────────────────

/// Controller platform selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformSetting {
    /// Probe the controller on each session.
    #[default]
    Auto,
    UnifiOs,
    Classic,
}

impl PlatformSetting {
    fn resolve(self) -> Option<ControllerPlatform> {
        match self {
            Self::Auto => None,
            Self::UnifiOs => Some(ControllerPlatform::UnifiOs),
            Self::Classic => Some(ControllerPlatform::ClassicController),
        }
    }
}

/// Settings as read from file and environment, before validation.
#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,

    /// Controller base URL (e.g., "https://192.168.1.1").
    pub base_url: Option<String>,

    /// NATS server holding the inventory bucket (e.g., "nats://127.0.0.1:4222").
    pub cache_url: Option<String>,

    /// Controller account used for block/unblock.
    pub username: Option<String>,

    /// Password (plaintext; prefer `password_env` or `UNIGATE_PASSWORD`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    pub site: String,

    pub platform: PlatformSetting,

    /// Accept self-signed controller certificates. Ignored when `ca_cert` is set.
    pub insecure: bool,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Controller request timeout in seconds.
    pub timeout: u64,

    /// Key/value bucket the inventory is published to.
    pub bucket: String,

    /// Key of the active-clients snapshot inside `bucket`.
    pub key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            base_url: None,
            cache_url: None,
            username: None,
            password: None,
            password_env: None,
            site: "default".into(),
            platform: PlatformSetting::Auto,
            // local controllers are typically self-signed
            insecure: true,
            ca_cert: None,
            timeout: 30,
            bucket: unigate_core::inventory::DEFAULT_BUCKET.into(),
            key: unigate_core::inventory::ACTIVE_KEY.into(),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "unigate", "unigate").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("unigate");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load settings from defaults, the TOML file at `path` (or the default
/// path), and `UNIGATE_*` environment variables, in increasing priority.
/// A missing file is not an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("UNIGATE_"))
        .extract()?;

    Ok(settings)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { field })
}

impl Settings {
    /// Password from `password_env` if set and present, else the plaintext
    /// `password` setting (which `UNIGATE_PASSWORD` also feeds).
    fn resolve_password(&self) -> Result<SecretString, ConfigError> {
        if let Some(ref env_name) = self.password_env {
            if let Ok(val) = std::env::var(env_name) {
                if !val.is_empty() {
                    return Ok(SecretString::from(val));
                }
            }
        }

        match self.password {
            Some(ref pw) if !pw.is_empty() => Ok(SecretString::from(pw.clone())),
            _ => Err(ConfigError::Missing { field: "password" }),
        }
    }

    fn tls_mode(&self) -> TlsMode {
        if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        }
    }

    /// Check every required field and produce the immutable runtime config.
    pub fn validate(self) -> Result<GateConfig, ConfigError> {
        let password = self.resolve_password()?;
        let tls = self.tls_mode();

        let base_url_raw = required(self.base_url, "base_url")?;
        let base_url: Url = base_url_raw.parse().map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {base_url_raw}"),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("expected http or https, got '{}'", base_url.scheme()),
            });
        }

        let cache_url = required(self.cache_url, "cache_url")?;
        let username = required(self.username, "username")?;

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let site = required(Some(self.site), "site")?;
        let bucket = required(Some(self.bucket), "bucket")?;
        let key = required(Some(self.key), "key")?;

        Ok(GateConfig {
            listen: self.listen,
            base_url,
            cache_url,
            username,
            password,
            site,
            platform: self.platform.resolve(),
            transport: TransportConfig {
                tls,
                timeout: Duration::from_secs(self.timeout),
                cookie_jar: None,
            },
            bucket,
            key,
        })
    }
}

// ── Validated config ────────────────────────────────────────────────

/// Provisioned middleware configuration. Read-only once built.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub listen: SocketAddr,
    pub base_url: Url,
    pub cache_url: String,
    pub username: String,
    pub password: SecretString,
    pub site: String,
    /// `None` means auto-detect.
    pub platform: Option<ControllerPlatform>,
    pub transport: TransportConfig,
    pub bucket: String,
    pub key: String,
}

impl GateConfig {
    pub fn session_params(&self) -> SessionParams {
        SessionParams {
            endpoint: self.base_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    pub fn connector(&self) -> LegacyConnector {
        LegacyConnector::new(self.site.clone(), self.platform, self.transport.clone())
    }

    pub fn inventory_reader(&self) -> InventoryReader<NatsKvBridge> {
        InventoryReader::new(
            NatsKvBridge::new(self.cache_url.clone()),
            self.bucket.clone(),
            self.key.clone(),
        )
    }
}

/// Effective settings with the password masked.
impl fmt::Display for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "listen = \"{}\"", self.listen)?;
        writeln!(f, "base_url = \"{}\"", self.base_url)?;
        writeln!(f, "cache_url = \"{}\"", self.cache_url)?;
        writeln!(f, "username = \"{}\"", self.username)?;
        writeln!(f, "password = \"****\"")?;
        writeln!(f, "site = \"{}\"", self.site)?;
        let platform = match self.platform {
            None => "auto",
            Some(ControllerPlatform::UnifiOs) => "unifi-os",
            Some(ControllerPlatform::ClassicController) => "classic",
        };
        writeln!(f, "platform = \"{platform}\"")?;
        match self.transport.tls {
            TlsMode::System => writeln!(f, "tls = \"system\"")?,
            TlsMode::CustomCa(ref ca) => writeln!(f, "ca_cert = \"{}\"", ca.display())?,
            TlsMode::DangerAcceptInvalid => writeln!(f, "insecure = true")?,
        }
        writeln!(f, "timeout = {}", self.transport.timeout.as_secs())?;
        writeln!(f, "bucket = \"{}\"", self.bucket)?;
        write!(f, "key = \"{}\"", self.key)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const FULL: &str = r#"
        base_url = "https://192.168.1.1"
        cache_url = "nats://127.0.0.1:4222"
        username = "gate"
        password = "file-secret"
    "#;

    fn load(jail: &Jail) -> figment::error::Result<Settings> {
        let path = jail.directory().join("unigate.toml");
        load_settings(Some(&path)).map_err(|e| e.to_string().into())
    }

    #[test]
    fn file_values_over_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("unigate.toml", FULL)?;
            let config = load(jail)?.validate().map_err(|e| e.to_string())?;

            assert_eq!(config.base_url.as_str(), "https://192.168.1.1/");
            assert_eq!(config.username, "gate");
            assert_eq!(config.password.expose_secret(), "file-secret");
            assert_eq!(config.site, "default");
            assert_eq!(config.bucket, "unifi");
            assert_eq!(config.key, "active");
            assert_eq!(config.platform, None);
            assert_eq!(config.transport.tls, TlsMode::DangerAcceptInvalid);
            assert_eq!(config.listen, SocketAddr::from(([127, 0, 0, 1], 8080)));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("unigate.toml", FULL)?;
            jail.set_env("UNIGATE_USERNAME", "ops");
            jail.set_env("UNIGATE_PASSWORD", "env-secret");
            jail.set_env("UNIGATE_PLATFORM", "unifi-os");
            jail.set_env("UNIGATE_LISTEN", "0.0.0.0:9000");

            let config = load(jail)?.validate().map_err(|e| e.to_string())?;

            assert_eq!(config.username, "ops");
            assert_eq!(config.password.expose_secret(), "env-secret");
            assert_eq!(config.platform, Some(ControllerPlatform::UnifiOs));
            assert_eq!(config.listen, SocketAddr::from(([0, 0, 0, 0], 9000)));
            Ok(())
        });
    }

    #[test]
    fn password_env_indirection() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "unigate.toml",
                r#"
                base_url = "https://192.168.1.1"
                cache_url = "nats://127.0.0.1:4222"
                username = "gate"
                password_env = "GATE_CONTROLLER_PW"
                "#,
            )?;
            jail.set_env("GATE_CONTROLLER_PW", "indirect");

            let config = load(jail)?.validate().map_err(|e| e.to_string())?;
            assert_eq!(config.password.expose_secret(), "indirect");
            Ok(())
        });
    }

    #[test]
    fn missing_fields_fail_at_provisioning() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "unigate.toml",
                r#"
                base_url = "https://192.168.1.1"
                username = "gate"
                password = "pw"
                "#,
            )?;
            let err = load(jail)?.validate().err().ok_or("expected error")?;
            assert!(matches!(err, ConfigError::Missing { field: "cache_url" }));
            Ok(())
        });
    }

    #[test]
    fn blank_username_counts_as_missing() {
        Jail::expect_with(|jail| {
            jail.create_file("unigate.toml", FULL)?;
            jail.set_env("UNIGATE_USERNAME", "  ");
            let err = load(jail)?.validate().err().ok_or("expected error")?;
            assert!(matches!(err, ConfigError::Missing { field: "username" }));
            Ok(())
        });
    }

    #[test]
    fn rejects_non_http_base_url() {
        let settings = Settings {
            base_url: Some("ftp://controller".into()),
            cache_url: Some("nats://127.0.0.1:4222".into()),
            username: Some("gate".into()),
            password: Some("pw".into()),
            ..Settings::default()
        };
        let err = settings.validate().err();
        assert!(
            matches!(err, Some(ConfigError::Validation { ref field, .. }) if field == "base_url")
        );
    }

    #[test]
    fn ca_cert_wins_over_insecure() {
        let settings = Settings {
            ca_cert: Some(PathBuf::from("/etc/unigate/ca.pem")),
            ..Settings::default()
        };
        assert_eq!(
            settings.tls_mode(),
            TlsMode::CustomCa(PathBuf::from("/etc/unigate/ca.pem"))
        );
        let strict = Settings {
            insecure: false,
            ..Settings::default()
        };
        assert_eq!(strict.tls_mode(), TlsMode::System);
    }

    #[test]
    fn display_masks_password() {
        let config = Settings {
            base_url: Some("https://192.168.1.1".into()),
            cache_url: Some("nats://127.0.0.1:4222".into()),
            username: Some("gate".into()),
            password: Some("hunter2".into()),
            ..Settings::default()
        }
        .validate()
        .unwrap_or_else(|e| panic!("validation failed: {e}"));

        let rendered = config.to_string();
        assert!(rendered.contains("password = \"****\""));
        assert!(!rendered.contains("hunter2"));
    }
}
