use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.30;
pub const DEFAULT_API_BASE: &str = "https://web-production-2845d.up.railway.app";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub embeddings: EmbeddingConfig,
    pub search: SearchConfig,
    pub exporter: ExporterConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
    pub match_function: String,
    pub page_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: "ict_chunks".to_string(),
            match_function: "match_ict_chunks".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key: None,
            base_url: providers::openai::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub match_threshold: f32,
    pub match_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            match_count: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub bulk_output: String,
    pub query_output: String,
    pub concurrency: usize,
    /// Cap on the per-concept source list in the bulk document.
    pub max_listed_sources: usize,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            bulk_output: "ict_wisdom.json".to_string(),
            query_output: "ict_query_wisdom.json".to_string(),
            concurrency: 4,
            max_listed_sources: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    pub port: u16,
    pub api_base: String,
    pub result_limit: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            api_base: DEFAULT_API_BASE.to_string(),
            result_limit: 10,
        }
    }
}

impl AppConfig {
    /// Overlays the well-known deployment variables on top of file settings.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SUPABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_KEY") {
            self.database.api_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.embeddings.api_key = Some(key);
        }
        if let Some(base) = lookup("OPENAI_BASE_URL") {
            self.embeddings.base_url = base;
        }
        if let Some(base) = lookup("CORTEX_API_BASE") {
            self.web.api_base = base;
        }
        if let Some(port) = lookup("PORT") {
            self.web.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    /// Database URL and key, or the first one missing.
    pub fn database_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let url = non_empty(self.database.url.as_deref()).ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let key =
            non_empty(self.database.api_key.as_deref()).ok_or(ConfigError::Missing("SUPABASE_KEY"))?;
        Ok((url, key))
    }

    pub fn embedding_api_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.embeddings.api_key.as_deref()).ok_or(ConfigError::Missing("OPENAI_API_KEY"))
    }

    /// Checks everything the query exporter needs before any request is made.
    pub fn validate_for_queries(&self) -> Result<(), ConfigError> {
        self.database_credentials()?;
        if self.embeddings.provider == "openai" {
            self.embedding_api_key()?;
        }
        if self.exporter.concurrency == 0 {
            return Err(ConfigError::Invalid {
                name: "exporter.concurrency",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_for_bulk(&self) -> Result<(), ConfigError> {
        self.database_credentials()?;
        if self.database.page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "database.page_size",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Loads the optional TOML file, then `CORTEX__SECTION__KEY` overrides, then
/// the deployment variables (`SUPABASE_URL`, `PORT`, ...).
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(config::Environment::with_prefix("CORTEX").separator("__"));
    let cfg = settings.build().map_err(ConfigError::from)?;
    let mut app: AppConfig = cfg.try_deserialize().map_err(ConfigError::from)?;
    app.apply_env(|key| std::env::var(key).ok())?;
    Ok(app)
}
