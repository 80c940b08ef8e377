use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::providers::ProviderConfig;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "CAREER_CODE_CONFIG";

/// Prefix for environment overrides, e.g. `CAREER_CODE_SESSION__SECRET`.
pub const ENV_PREFIX: &str = "CAREER_CODE_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    pub session: SessionConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Config {
    pub fn into_latest(self) -> ConfigV1 {
        match self {
            Config::ConfigV1(c) => c,
        }
    }
}

/// Builds the figment used by [`load_config`]: the YAML file first, then
/// `CAREER_CODE_*` environment variables on top.
pub fn config_figment(path: &str) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["config"]))
}

/// Load config from the YAML file named by `CAREER_CODE_CONFIG`, or
/// "config.yaml" in the current directory.
pub fn load_config() -> Result<ConfigV1, figment::Error> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    config_figment(&path)
        .extract::<Config>()
        .map(Config::into_latest)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Settings for the locally issued session token and its cookie.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SessionConfig {
    pub secret: String,
    /// Lifetime of an issued token, in seconds.
    #[serde(default = "default_session_exp")]
    pub exp: i64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub secure: bool,
}

fn default_session_exp() -> i64 {
    24 * 60 * 60
}

fn default_cookie_name() -> String {
    "token".to_string()
}

/// Browser origins allowed to call the API with credentials.
#[derive(Deserialize, Serialize, Debug, Default, Clone, JsonSchema)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}
