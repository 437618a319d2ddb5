use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL; recipes are kept in memory when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// API key for the OpenAI-compatible generation backend
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Base URL of the generation backend
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Chat model used for recipe generation
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Upper bound on a single upstream generation call, in seconds
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    /// Token ceiling for one completion; must fit 3-5 full recipes
    #[serde(default = "default_generation_max_tokens")]
    pub generation_max_tokens: u32,

    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f32,

    /// Comma-separated list of allowed CORS origins; any origin when unset
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    60
}

fn default_generation_max_tokens() -> u32 {
    4000
}

fn default_generation_temperature() -> f32 {
    0.7
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// The API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
