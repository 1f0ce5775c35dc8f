use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://userapi-n3qd.onrender.com/api/users";
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3000;
const LOCAL_CONFIG_FILE: &str = "user_console.toml";

/// How the list is brought up to date once a mutation has been acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Issue one list request after the mutation response arrives.
    #[default]
    Reload,
    /// Splice the mutation response into the rendered list without another
    /// request.
    ApplyResponse,
}

impl FromStr for RefreshPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reload" => Ok(Self::Reload),
            "apply" | "apply_response" => Ok(Self::ApplyResponse),
            other => Err(ConfigError::InvalidValue {
                key: "refresh_policy",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub notification_ttl_ms: u64,
    pub refresh_policy: RefreshPolicy,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
            refresh_policy: RefreshPolicy::default(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    notification_ttl_ms: Option<u64>,
    refresh_policy: Option<RefreshPolicy>,
    request_timeout_secs: Option<u64>,
}

/// Resolves settings from defaults, then a TOML file, then `USER_CONSOLE_*`
/// environment variables. An explicitly requested file must exist; the
/// implicit locations are skipped when absent.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };
    if let Some(path) = path {
        if explicit_path.is_some() || path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            apply_file(&mut settings, &path, &raw)?;
            debug!(path = %path.display(), "loaded config file");
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join("user_console").join("config.toml"))
}

fn apply_file(settings: &mut Settings, path: &Path, raw: &str) -> Result<(), ConfigError> {
    let file: FileSettings = toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(v) = file.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file.notification_ttl_ms {
        settings.notification_ttl_ms = v;
    }
    if let Some(v) = file.refresh_policy {
        settings.refresh_policy = v;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    Ok(())
}

/// Environment overrides. Values that fail to parse are logged and ignored.
pub fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = read("USER_CONSOLE_API_BASE_URL") {
        settings.api_base_url = v.trim().to_string();
    }
    if let Some(v) = read("USER_CONSOLE_NOTIFICATION_TTL_MS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.notification_ttl_ms = parsed,
            Err(err) => warn!(value = %v, "ignoring USER_CONSOLE_NOTIFICATION_TTL_MS: {err}"),
        }
    }
    if let Some(v) = read("USER_CONSOLE_REFRESH") {
        match v.parse::<RefreshPolicy>() {
            Ok(policy) => settings.refresh_policy = policy,
            Err(err) => warn!("ignoring USER_CONSOLE_REFRESH: {err}"),
        }
    }
    if let Some(v) = read("USER_CONSOLE_REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(err) => warn!(value = %v, "ignoring USER_CONSOLE_REQUEST_TIMEOUT_SECS: {err}"),
        }
    }
}
