//! Configuration for the ilofan CLI.
//!
//! Layered settings (defaults, optional TOML file, `ILO_*` environment),
//! the environment-backed [`EnvResolver`], and translation to
//! `ilofan_core::ControllerConfig`.

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
use tracing::debug;

use ilofan_core::{
    ControllerConfig, CoreError, CredentialResolver, Credentials, KexAlgorithm, SessionOptions,
    TlsMode, TransportConfig,
};

/// Prefix of every environment variable the settings read.
pub const ENV_PREFIX: &str = "ILO_";

/// Overrides the config file location when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "ILOFAN_CONFIG";

/// Keys read verbatim from the environment. Figment would otherwise parse
/// `ILO_PASSWORD=12345678` as an integer.
const VERBATIM_KEYS: [&str; 3] = ["host", "username", "password"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Everything the CLI can be configured with.
///
/// Field names double as the lowercased `ILO_*` variable names:
/// `ssh_port` is `ILO_SSH_PORT`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Controller address, optionally `host:port` for HTTPS.
    pub host: Option<String>,

    pub username: Option<String>,

    /// Plaintext password. Prefer `ILO_PASSWORD` over writing it to disk.
    pub password: Option<String>,

    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Seconds, applied to both the HTTPS request and the SSH session.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed controller certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// PEM bundle to trust instead of the system roots.
    pub ca_cert: Option<PathBuf>,

    /// Key exchange algorithms offered to the SSH server, in order.
    #[serde(default)]
    pub kex: Vec<String>,

    /// Override the Redfish base URL (reverse proxies, emulators).
    pub redfish_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            ssh_port: default_ssh_port(),
            timeout: default_timeout(),
            insecure: default_insecure(),
            ca_cert: None,
            kex: Vec::new(),
            redfish_url: None,
        }
    }
}

fn default_ssh_port() -> u16 {
    22
}
fn default_timeout() -> u64 {
    30
}
fn default_insecure() -> bool {
    true
}

impl Settings {
    /// Copy with the password masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".into()),
            ..self.clone()
        }
    }

    /// Translate to the connection policy the controller facade expects.
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let tls = match (&self.ca_cert, self.insecure) {
            (Some(path), _) => TlsMode::CustomCa(path.clone()),
            (None, true) => TlsMode::DangerAcceptInvalid,
            (None, false) => TlsMode::System,
        };

        let kex = self
            .kex
            .iter()
            .map(|name| {
                name.parse::<KexAlgorithm>()
                    .map_err(|reason| ConfigError::Validation {
                        field: "kex".into(),
                        reason,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let redfish_url = self
            .redfish_url
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                url::Url::parse(raw).map_err(|e| ConfigError::Validation {
                    field: "redfish_url".into(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let timeout = Duration::from_secs(self.timeout);
        let session = SessionOptions {
            port: self.ssh_port,
            timeout,
            ..SessionOptions::default()
        }
        .with_kex(kex);

        Ok(ControllerConfig {
            transport: TransportConfig { tls, timeout },
            session,
            redfish_url,
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: explicit override, then `ILOFAN_CONFIG`,
/// then the platform config directory.
pub fn settings_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "ilofan", "ilofan").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ilofan");
    p
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load settings from defaults, then `path` if it exists, then `ILO_*`.
///
/// Credential variables are taken as plain strings whatever they look like.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&VERBATIM_KEYS));

    for key in VERBATIM_KEYS {
        let var = format!("{ENV_PREFIX}{}", key.to_ascii_uppercase());
        if let Ok(value) = std::env::var(&var) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }

    Ok(figment.extract()?)
}

/// Serialize settings to TOML at `path`, creating parent directories.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Reads credentials from the environment, falling back to the config
/// file. Re-reads both on every call.
#[derive(Debug, Clone)]
pub struct EnvResolver {
    path: PathBuf,
}

impl EnvResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialResolver for EnvResolver {
    fn resolve(&self) -> Result<Credentials, CoreError> {
        let settings = load_settings(&self.path)?;
        credentials_from(settings)
    }
}

/// Empty or whitespace-only values count as missing.
fn credentials_from(settings: Settings) -> Result<Credentials, CoreError> {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let host = present(settings.host);
    let username = present(settings.username);
    let password = present(settings.password);

    match (host, username, password) {
        (Some(host), Some(username), Some(password)) => {
            debug!(host = %host, "credentials resolved");
            Ok(Credentials::new(host, username, SecretString::from(password)))
        }
        (host, username, password) => {
            let names = [
                ("HOST", host.is_none()),
                ("USERNAME", username.is_none()),
                ("PASSWORD", password.is_none()),
            ]
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| format!("{ENV_PREFIX}{name}"))
            .collect();
            Err(CoreError::MissingConfig { names })
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    fn missing_names(result: Result<Credentials, CoreError>) -> Vec<String> {
        match result {
            Err(CoreError::MissingConfig { names }) => names,
            other => panic!("expected MissingConfig, got: {other:?}"),
        }
    }

    #[test]
    fn resolves_from_environment() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ILO_HOST", "10.0.0.5");
            jail.set_env("ILO_USERNAME", "Administrator");
            jail.set_env("ILO_PASSWORD", "s3cret");

            let creds = EnvResolver::new("absent.toml")
                .resolve()
                .expect("credentials");
            assert_eq!(creds.host, "10.0.0.5");
            assert_eq!(creds.username, "Administrator");
            Ok(())
        });
    }

    #[test]
    fn numeric_and_boolean_passwords_stay_strings() {
        for password in ["12345678", "true", "[abc]", "1.5"] {
            Jail::expect_with(|jail| {
                jail.clear_env();
                jail.set_env("ILO_HOST", "10.0.0.5");
                jail.set_env("ILO_USERNAME", "1001");
                jail.set_env("ILO_PASSWORD", password);

                let creds = EnvResolver::new("absent.toml")
                    .resolve()
                    .expect("credentials");
                assert_eq!(creds.username, "1001");
                assert_eq!(creds.password.expose_secret(), password);
                Ok(())
            });
        }
    }

    #[test]
    fn environment_credentials_override_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "config.toml",
                r#"
                    host = "file-host"
                    username = "file-user"
                    password = "file-pass"
                "#,
            )?;
            jail.set_env("ILO_PASSWORD", "false");

            let settings = load_settings(Path::new("config.toml")).expect("settings");
            assert_eq!(settings.host.as_deref(), Some("file-host"));
            assert_eq!(settings.password.as_deref(), Some("false"));
            Ok(())
        });
    }

    #[test]
    fn one_missing_variable_is_named_alone() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ILO_HOST", "10.0.0.5");
            jail.set_env("ILO_USERNAME", "Administrator");

            let names = missing_names(EnvResolver::new("absent.toml").resolve());
            assert_eq!(names, vec!["ILO_PASSWORD"]);
            Ok(())
        });
    }

    #[test]
    fn all_missing_variables_are_named_in_order() {
        Jail::expect_with(|jail| {
            jail.clear_env();

            let names = missing_names(EnvResolver::new("absent.toml").resolve());
            assert_eq!(names, vec!["ILO_HOST", "ILO_USERNAME", "ILO_PASSWORD"]);
            Ok(())
        });
    }

    #[test]
    fn empty_values_count_as_missing() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ILO_HOST", "");
            jail.set_env("ILO_USERNAME", "Administrator");
            jail.set_env("ILO_PASSWORD", "s3cret");

            let names = missing_names(EnvResolver::new("absent.toml").resolve());
            assert_eq!(names, vec!["ILO_HOST"]);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "config.toml",
                r#"
                    host = "file-host"
                    username = "file-user"
                    password = "file-pass"
                    ssh_port = 2222
                "#,
            )?;
            jail.set_env("ILO_HOST", "env-host");
            jail.set_env("ILO_TIMEOUT", "5");

            let settings = load_settings(Path::new("config.toml")).expect("settings");
            assert_eq!(settings.host.as_deref(), Some("env-host"));
            assert_eq!(settings.username.as_deref(), Some("file-user"));
            assert_eq!(settings.ssh_port, 2222);
            assert_eq!(settings.timeout, 5);
            assert!(settings.insecure);
            Ok(())
        });
    }

    #[test]
    fn defaults_without_file_or_environment() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let settings = load_settings(Path::new("absent.toml")).expect("settings");
            assert_eq!(settings, Settings::default());
            Ok(())
        });
    }

    #[test]
    fn controller_config_translation() {
        let settings = Settings {
            ssh_port: 2222,
            timeout: 7,
            insecure: false,
            kex: vec!["curve25519-sha256".into()],
            ..Settings::default()
        };
        let config = settings.controller_config().expect("config");
        assert_eq!(config.transport.tls, TlsMode::System);
        assert_eq!(config.transport.timeout, Duration::from_secs(7));
        assert_eq!(config.session.port, 2222);
        assert_eq!(config.session.kex, vec![KexAlgorithm::Curve25519Sha256]);
        assert!(config.redfish_url.is_none());

        let with_ca = Settings {
            ca_cert: Some("/etc/ilo-ca.pem".into()),
            ..Settings::default()
        };
        assert_eq!(
            with_ca.controller_config().expect("config").transport.tls,
            TlsMode::CustomCa("/etc/ilo-ca.pem".into())
        );
    }

    #[test]
    fn unknown_kex_is_rejected() {
        let settings = Settings {
            kex: vec!["diffie-hellman-group1-sha1".into()],
            ..Settings::default()
        };
        let err = settings.controller_config().expect_err("unknown kex");
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "kex"));
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let settings = Settings {
            host: Some("ilo.lab".into()),
            username: Some("Administrator".into()),
            ..Settings::default()
        };
        save_settings(&settings, &path).expect("save");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains("host = \"ilo.lab\""));
        assert!(!written.contains("password"));
    }

    #[test]
    fn redacted_masks_password() {
        let settings = Settings {
            password: Some("s3cret".into()),
            ..Settings::default()
        };
        assert_eq!(settings.redacted().password.as_deref(), Some("********"));
        assert_eq!(Settings::default().redacted().password, None);
    }
}
