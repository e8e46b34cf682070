use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs};

#[derive(Deserialize, Debug)]
pub struct SSLConfig {
    pub private_key_file: PathBuf,
    pub certificate_chain_file: PathBuf,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    #[serde(default)]
    pub signups_enabled: bool,
    pub honeycomb_api_key: Option<String>,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    pub ssl: Option<SSLConfig>,
}

fn default_max_pool_size() -> u32 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    10_000
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_owned()
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path).context("Unable to read config file")?;
        Config::parse(&config)
    }

    pub fn parse(config: &str) -> Result<Config, anyhow::Error> {
        toml::from_str(config).context("Unable to parse config")
    }

    /// Reads the config from environment variables. Only `DATABASE_URL` is required.
    pub fn from_env() -> Result<Config, anyhow::Error> {
        let database_url = read_env("DATABASE_URL")?;
        let signups_enabled = match env::var("SIGNUPS_ENABLED") {
            Ok(value) => value
                .parse()
                .context("Unable to parse SIGNUPS_ENABLED value")?,
            Err(_) => false,
        };
        let max_pool_size = match env::var("MAX_POOL_SIZE") {
            Ok(value) => value.parse().context("Unable to parse MAX_POOL_SIZE value")?,
            Err(_) => default_max_pool_size(),
        };
        let cache_ttl_secs = match env::var("CACHE_TTL_SECS") {
            Ok(value) => value
                .parse()
                .context("Unable to parse CACHE_TTL_SECS value")?,
            Err(_) => default_cache_ttl_secs(),
        };
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|origins| split_origins(&origins))
            .unwrap_or_default();

        let config = Config {
            database_url,
            max_pool_size,
            signups_enabled,
            honeycomb_api_key: env::var("HONEYCOMB_API_KEY").ok(),
            allowed_origins,
            cache_ttl_secs,
            cache_max_entries: default_cache_max_entries(),
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| default_bind_address()),
            ssl: None,
        };
        Ok(config)
    }
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

fn read_env(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).with_context(|| format!("Unable to read env var: {}", key))
}
