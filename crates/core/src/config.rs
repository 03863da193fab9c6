use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub recognizer: RecognizerConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Conversational-language recognizer credentials. The recognizer is
/// optional: with none of the fields set the bot runs in unconfigured mode
/// and collects every slot through prompts.
#[derive(Clone, Debug, Default)]
pub struct RecognizerConfig {
    pub project_name: Option<String>,
    pub deployment_name: Option<String>,
    pub api_key: Option<SecretString>,
    pub api_host: Option<String>,
    pub timeout_secs: u64,
}

impl RecognizerConfig {
    pub fn is_configured(&self) -> bool {
        let filled = |value: &Option<String>| {
            value.as_deref().map(|value| !value.trim().is_empty()).unwrap_or(false)
        };
        let key_filled = self
            .api_key
            .as_ref()
            .map(|key| !key.expose_secret().trim().is_empty())
            .unwrap_or(false);

        filled(&self.project_name)
            && filled(&self.deployment_name)
            && filled(&self.api_host)
            && key_filled
    }
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: SecretString,
    pub index_name: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub health_check_port: u16,
    pub graceful_shutdown_secs: u64,
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

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub search_endpoint: Option<String>,
    pub search_api_key: Option<String>,
    pub search_index_name: Option<String>,
    pub recognizer_project_name: Option<String>,
    pub recognizer_deployment_name: Option<String>,
    pub recognizer_api_key: Option<String>,
    pub recognizer_api_host: Option<String>,
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
            recognizer: RecognizerConfig { timeout_secs: 30, ..RecognizerConfig::default() },
            search: SearchConfig {
                endpoint: String::new(),
                api_key: String::new().into(),
                index_name: "executions-index".to_string(),
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                health_check_port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
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

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("statusbot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(recognizer) = patch.recognizer {
            if let Some(project_name) = recognizer.project_name {
                self.recognizer.project_name = Some(project_name);
            }
            if let Some(deployment_name) = recognizer.deployment_name {
                self.recognizer.deployment_name = Some(deployment_name);
            }
            if let Some(recognizer_api_key_value) = recognizer.api_key {
                self.recognizer.api_key = Some(secret_value(recognizer_api_key_value));
            }
            if let Some(api_host) = recognizer.api_host {
                self.recognizer.api_host = Some(api_host);
            }
            if let Some(timeout_secs) = recognizer.timeout_secs {
                self.recognizer.timeout_secs = timeout_secs;
            }
        }

        if let Some(search) = patch.search {
            if let Some(endpoint) = search.endpoint {
                self.search.endpoint = endpoint;
            }
            if let Some(search_api_key_value) = search.api_key {
                self.search.api_key = secret_value(search_api_key_value);
            }
            if let Some(index_name) = search.index_name {
                self.search.index_name = index_name;
            }
            if let Some(timeout_secs) = search.timeout_secs {
                self.search.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(health_check_port) = server.health_check_port {
                self.server.health_check_port = health_check_port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
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
        if let Some(value) = read_env("STATUSBOT_RECOGNIZER_PROJECT_NAME") {
            self.recognizer.project_name = Some(value);
        }
        if let Some(value) = read_env("STATUSBOT_RECOGNIZER_DEPLOYMENT_NAME") {
            self.recognizer.deployment_name = Some(value);
        }
        if let Some(value) = read_env("STATUSBOT_RECOGNIZER_API_KEY") {
            self.recognizer.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("STATUSBOT_RECOGNIZER_API_HOST") {
            self.recognizer.api_host = Some(value);
        }
        if let Some(value) = read_env("STATUSBOT_RECOGNIZER_TIMEOUT_SECS") {
            self.recognizer.timeout_secs = parse_u64("STATUSBOT_RECOGNIZER_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("STATUSBOT_SEARCH_ENDPOINT") {
            self.search.endpoint = value;
        }
        if let Some(value) = read_env("STATUSBOT_SEARCH_API_KEY") {
            self.search.api_key = secret_value(value);
        }
        if let Some(value) = read_env("STATUSBOT_SEARCH_INDEX_NAME") {
            self.search.index_name = value;
        }
        if let Some(value) = read_env("STATUSBOT_SEARCH_TIMEOUT_SECS") {
            self.search.timeout_secs = parse_u64("STATUSBOT_SEARCH_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("STATUSBOT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("STATUSBOT_SERVER_HEALTH_CHECK_PORT") {
            self.server.health_check_port =
                parse_u16("STATUSBOT_SERVER_HEALTH_CHECK_PORT", &value)?;
        }
        if let Some(value) = read_env("STATUSBOT_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("STATUSBOT_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("STATUSBOT_LOGGING_LEVEL").or_else(|| read_env("STATUSBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("STATUSBOT_LOGGING_FORMAT").or_else(|| read_env("STATUSBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.search_endpoint {
            self.search.endpoint = endpoint;
        }
        if let Some(search_api_key) = overrides.search_api_key {
            self.search.api_key = secret_value(search_api_key);
        }
        if let Some(index_name) = overrides.search_index_name {
            self.search.index_name = index_name;
        }
        if let Some(project_name) = overrides.recognizer_project_name {
            self.recognizer.project_name = Some(project_name);
        }
        if let Some(deployment_name) = overrides.recognizer_deployment_name {
            self.recognizer.deployment_name = Some(deployment_name);
        }
        if let Some(recognizer_api_key) = overrides.recognizer_api_key {
            self.recognizer.api_key = Some(secret_value(recognizer_api_key));
        }
        if let Some(api_host) = overrides.recognizer_api_host {
            self.recognizer.api_host = Some(api_host);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_recognizer(&self.recognizer)?;
        validate_search(&self.search)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("statusbot.toml"), PathBuf::from("config/statusbot.toml")]
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

fn validate_recognizer(recognizer: &RecognizerConfig) -> Result<(), ConfigError> {
    if recognizer.timeout_secs == 0 || recognizer.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "recognizer.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    let any_set = recognizer.project_name.is_some()
        || recognizer.deployment_name.is_some()
        || recognizer.api_key.is_some()
        || recognizer.api_host.is_some();
    if any_set && !recognizer.is_configured() {
        return Err(ConfigError::Validation(
            "recognizer is partially configured; set all of recognizer.project_name, \
             recognizer.deployment_name, recognizer.api_key and recognizer.api_host, or none \
             of them"
                .to_string(),
        ));
    }

    if let Some(api_host) = recognizer.api_host.as_deref() {
        if !api_host.starts_with("http://") && !api_host.starts_with("https://") {
            return Err(ConfigError::Validation(
                "recognizer.api_host must start with http:// or https://".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_search(search: &SearchConfig) -> Result<(), ConfigError> {
    let endpoint = search.endpoint.trim();
    if endpoint.is_empty() {
        return Err(ConfigError::Validation(
            "search.endpoint is required (the execution index base URL)".to_string(),
        ));
    }
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::Validation(
            "search.endpoint must start with http:// or https://".to_string(),
        ));
    }

    if search.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation("search.api_key is required".to_string()));
    }

    if search.index_name.trim().is_empty() {
        return Err(ConfigError::Validation("search.index_name must not be empty".to_string()));
    }

    if search.timeout_secs == 0 || search.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "search.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.health_check_port == 0 {
        return Err(ConfigError::Validation(
            "server.health_check_port must be greater than zero".to_string(),
        ));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    recognizer: Option<RecognizerPatch>,
    search: Option<SearchPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizerPatch {
    project_name: Option<String>,
    deployment_name: Option<String>,
    api_key: Option<String>,
    api_host: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPatch {
    endpoint: Option<String>,
    api_key: Option<String>,
    index_name: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    health_check_port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
