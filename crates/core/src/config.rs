use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::RegionId;
use crate::session::SessionIdentity;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: SecretString,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub associate_id: String,
    pub franchise_id: String,
    pub default_region: Option<String>,
}

impl SessionConfig {
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            associate_id: self.associate_id.clone(),
            franchise_id: self.franchise_id.clone(),
            default_region: self.default_region.clone().map(RegionId),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub page_size: u32,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub associate_id: Option<String>,
    pub franchise_id: Option<String>,
    pub default_region: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8080/api/v1".to_string(),
                token: String::new().into(),
                timeout_secs: 30,
            },
            session: SessionConfig {
                associate_id: String::new(),
                franchise_id: String::new(),
                default_region: None,
            },
            search: SearchConfig { debounce_ms: 300, page_size: 10 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    session: Option<SessionPatch>,
    search: Option<SearchPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    base_url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionPatch {
    associate_id: Option<String>,
    franchise_id: Option<String>,
    default_region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPatch {
    debounce_ms: Option<u64>,
    page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("dealdesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(token_value) = api.token {
                self.api.token = token_value.into();
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = timeout_secs;
            }
        }

        if let Some(session) = patch.session {
            if let Some(associate_id) = session.associate_id {
                self.session.associate_id = associate_id;
            }
            if let Some(franchise_id) = session.franchise_id {
                self.session.franchise_id = franchise_id;
            }
            if let Some(default_region) = session.default_region {
                self.session.default_region = Some(default_region);
            }
        }

        if let Some(search) = patch.search {
            if let Some(debounce_ms) = search.debounce_ms {
                self.search.debounce_ms = debounce_ms;
            }
            if let Some(page_size) = search.page_size {
                self.search.page_size = page_size;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DEALDESK_API_BASE_URL") {
            self.api.base_url = value;
        }
        if let Some(value) = read_env("DEALDESK_API_TOKEN") {
            self.api.token = value.into();
        }
        if let Some(value) = read_env("DEALDESK_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_u64("DEALDESK_API_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("DEALDESK_SESSION_ASSOCIATE_ID") {
            self.session.associate_id = value;
        }
        if let Some(value) = read_env("DEALDESK_SESSION_FRANCHISE_ID") {
            self.session.franchise_id = value;
        }
        if let Some(value) = read_env("DEALDESK_SESSION_DEFAULT_REGION") {
            self.session.default_region = Some(value);
        }

        if let Some(value) = read_env("DEALDESK_SEARCH_DEBOUNCE_MS") {
            self.search.debounce_ms = parse_u64("DEALDESK_SEARCH_DEBOUNCE_MS", &value)?;
        }
        if let Some(value) = read_env("DEALDESK_SEARCH_PAGE_SIZE") {
            self.search.page_size = parse_u32("DEALDESK_SEARCH_PAGE_SIZE", &value)?;
        }

        let log_level =
            read_env("DEALDESK_LOGGING_LEVEL").or_else(|| read_env("DEALDESK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("DEALDESK_LOGGING_FORMAT").or_else(|| read_env("DEALDESK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_base_url) = overrides.api_base_url {
            self.api.base_url = api_base_url;
        }
        if let Some(api_token) = overrides.api_token {
            self.api.token = api_token.into();
        }
        if let Some(associate_id) = overrides.associate_id {
            self.session.associate_id = associate_id;
        }
        if let Some(franchise_id) = overrides.franchise_id {
            self.session.franchise_id = franchise_id;
        }
        if let Some(default_region) = overrides.default_region {
            self.session.default_region = Some(default_region);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api(&self.api)?;
        validate_session(&self.session)?;
        validate_search(&self.search)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("dealdesk.toml"), PathBuf::from("config/dealdesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn validate_api(api: &ApiConfig) -> Result<(), ConfigError> {
    let base_url = api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::Validation(
            "api.base_url must be an http(s) URL".to_string(),
        ));
    }

    if api.token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "api.token is required. Generate one under Console > Settings > API Access".to_string(),
        ));
    }

    if api.timeout_secs == 0 || api.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "api.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_session(session: &SessionConfig) -> Result<(), ConfigError> {
    if session.associate_id.trim().is_empty() {
        return Err(ConfigError::Validation("session.associate_id is required".to_string()));
    }
    if session.franchise_id.trim().is_empty() {
        return Err(ConfigError::Validation("session.franchise_id is required".to_string()));
    }
    Ok(())
}

fn validate_search(search: &SearchConfig) -> Result<(), ConfigError> {
    if search.debounce_ms > 5_000 {
        return Err(ConfigError::Validation(
            "search.debounce_ms must be at most 5000".to_string(),
        ));
    }
    if search.page_size == 0 || search.page_size > 100 {
        return Err(ConfigError::Validation(
            "search.page_size must be in range 1..=100".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let allowed = ["trace", "debug", "info", "warn", "error"];
    if !allowed.contains(&logging.level.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of {allowed:?}"
        )));
    }
    Ok(())
}
