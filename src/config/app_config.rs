use serde::Deserialize;

use crate::domain::llm::DEFAULT_MAX_TOKENS;
use crate::domain::search::DEFAULT_NUM_RESULTS;
use crate::infrastructure::workflow::{NodeRuntimeConfig, WorkflowExecutorConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Workflow engine limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-node time limit; unset means no limit
    pub node_timeout_ms: Option<u64>,
    /// Completion budget for generation calls
    pub max_tokens: u32,
    /// Results requested from web search
    pub web_search_results: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_timeout_ms: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            web_search_results: DEFAULT_NUM_RESULTS,
        }
    }
}

impl EngineConfig {
    pub fn executor_config(&self) -> WorkflowExecutorConfig {
        WorkflowExecutorConfig {
            node_timeout_ms: self.node_timeout_ms,
            runtime: NodeRuntimeConfig {
                max_tokens: self.max_tokens,
                web_search_results: self.web_search_results,
            },
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `APP__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
