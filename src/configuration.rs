use std::path::Path;
use std::time::Duration;

use config::Source;
use secrecy::Secret;
use serde::Deserialize;
use url::Url;

use crate::domain::RetentionWindow;
use crate::utils::error_chain_fmt;
use crate::xrpc_client::XrpcClient;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variables with this prefix override keys from the file,
/// e.g. `SKYSWEEP_PASSWORD` or `SKYSWEEP_DAYCOUNT`.
pub const ENV_PREFIX: &str = "SKYSWEEP";

#[derive(Debug)]
pub struct Settings {
    pub handle: String,
    pub password: Secret<String>,
    pub base_url: Url,
    pub retention: RetentionWindow,
    pub timeout: Option<Duration>,
}

impl Settings {
    pub fn client(&self) -> Result<XrpcClient, reqwest::Error> {
        XrpcClient::new(self.base_url.clone(), self.timeout)
    }
}

// Keys are matched after lowercasing, so `baseURL` in the file and
// `SKYSWEEP_BASEURL` in the environment name the same setting.
#[derive(Deserialize)]
struct RawSettings {
    handle: String,
    password: Secret<String>,
    #[serde(rename = "baseurl", default)]
    base_url: String,
    #[serde(rename = "daycount", default)]
    day_count: Option<u32>,
    #[serde(rename = "timeoutseconds", default)]
    timeout_seconds: Option<u64>,
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration.")]
    Read(#[from] config::ConfigError),

    #[error("baseURL is not set in the configuration.")]
    MissingBaseUrl,

    #[error("baseURL is not a valid URL.")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("baseURL must use http or https, got '{0}'.")]
    UnsupportedScheme(String),
}

impl std::fmt::Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub fn get_config() -> Result<Settings, ConfigError> {
    get_config_from(Path::new(CONFIG_FILE))
}

pub fn get_config_from(path: &Path) -> Result<Settings, ConfigError> {
    let file = config::File::from(path)
        .format(config::FileFormat::Json)
        .required(true);
    build_settings(file, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

/// Layers `env` over `file`. Both sides are keyed in lowercase before the
/// merge so an override replaces the file value instead of sitting next to it.
fn build_settings<S>(file: S, env: config::Environment) -> Result<Settings, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let mut merged = lowercase_keys(&file)?;
    merged.extend(lowercase_keys(&env)?);

    let raw = config::Value::new(None, config::ValueKind::Table(merged))
        .try_deserialize::<RawSettings>()?;
    Settings::try_from(raw)
}

fn lowercase_keys(
    source: &dyn Source,
) -> Result<config::Map<String, config::Value>, config::ConfigError> {
    Ok(source
        .collect()?
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect())
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let base_url = parse_base_url(&raw.base_url)?;

        // Zero is how an unset dayCount has always been read.
        let days = match raw.day_count {
            None | Some(0) => RetentionWindow::DEFAULT_DAYS,
            Some(days) => days,
        };

        Ok(Self {
            handle: raw.handle,
            password: raw.password,
            base_url,
            retention: RetentionWindow::from_days(days),
            timeout: raw.timeout_seconds.map(Duration::from_secs),
        })
    }
}

/// Parses the XRPC base URL, making sure its path ends in `/` so method
/// names can be joined onto it.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let mut url = Url::parse(trimmed)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
