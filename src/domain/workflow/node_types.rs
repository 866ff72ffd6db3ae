//! Workflow node type definitions
//!
//! Each node kind carries only the configuration relevant to it. Configuration is
//! checked when a node is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::WorkflowError;

pub const DEFAULT_TOP_K: u32 = 5;
pub const DEFAULT_EMBEDDING_MODEL: &str = "openai";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const MAX_TEMPERATURE: f32 = 2.0;

/// The four node types a workflow can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    UserQuery,
    KnowledgeBase,
    LlmEngine,
    Output,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserQuery => "userQuery",
            Self::KnowledgeBase => "knowledgeBase",
            Self::LlmEngine => "llmEngine",
            Self::Output => "output",
        }
    }

    /// Whether this node transforms data (retrieval or generation)
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::KnowledgeBase | Self::LlmEngine)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "userQuery" => Ok(Self::UserQuery),
            "knowledgeBase" => Ok(Self::KnowledgeBase),
            "llmEngine" => Ok(Self::LlmEngine),
            "output" => Ok(Self::Output),
            other => Err(WorkflowError::invalid_definition(format!(
                "unknown node type '{}'",
                other
            ))),
        }
    }
}

/// A node's type together with its configuration
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Entry point, passes the user query through
    UserQuery,

    /// Retrieves document chunks for the query
    KnowledgeBase(KnowledgeBaseConfig),

    /// Generates a response with a language model
    LlmEngine(LlmEngineConfig),

    /// Terminal node holding the final response
    Output,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::UserQuery => NodeType::UserQuery,
            Self::KnowledgeBase(_) => NodeType::KnowledgeBase,
            Self::LlmEngine(_) => NodeType::LlmEngine,
            Self::Output => NodeType::Output,
        }
    }

    /// Build a node kind from its type and raw JSON configuration.
    ///
    /// Fields unrelated to the node type are ignored. A missing or `null`
    /// configuration yields the defaults.
    pub fn from_config(node_type: NodeType, config: Option<Value>) -> Result<Self, WorkflowError> {
        let config = config.filter(|c| !c.is_null());

        let kind = match node_type {
            NodeType::UserQuery => Self::UserQuery,
            NodeType::Output => Self::Output,
            NodeType::KnowledgeBase => {
                let config: KnowledgeBaseConfig = parse_config(config)?;
                config.validate()?;
                Self::KnowledgeBase(config)
            }
            NodeType::LlmEngine => {
                let config: LlmEngineConfig = parse_config(config)?;
                config.validate()?;
                Self::LlmEngine(config)
            }
        };

        Ok(kind)
    }

    /// Configuration as JSON, for serialization
    pub fn config_value(&self) -> Option<Value> {
        match self {
            Self::KnowledgeBase(config) => serde_json::to_value(config).ok(),
            Self::LlmEngine(config) => serde_json::to_value(config).ok(),
            Self::UserQuery | Self::Output => None,
        }
    }
}

fn parse_config<T>(config: Option<Value>) -> Result<T, WorkflowError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match config {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| WorkflowError::invalid_definition(e.to_string())),
        None => Ok(T::default()),
    }
}

/// Knowledge base retrieval configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseConfig {
    /// Document IDs to restrict retrieval to; empty means all documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,

    #[serde(default, alias = "top_k", skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(default, alias = "embedding_model", skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

impl KnowledgeBaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(mut self, documents: Vec<String>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Document filter, `None` when no documents were selected
    pub fn document_filter(&self) -> Option<&[String]> {
        self.documents
            .as_deref()
            .filter(|documents| !documents.is_empty())
    }

    pub fn top_k(&self) -> u32 {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }

    pub fn embedding_model(&self) -> &str {
        self.embedding_model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_EMBEDDING_MODEL)
    }

    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.top_k == Some(0) {
            return Err(WorkflowError::invalid_definition(
                "topK must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Language model provider used by an LLM engine node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    #[default]
    OpenAi,
    Gemini,
}

impl LlmProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for LlmProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web search backend used by an LLM engine node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebSearchProvider {
    #[default]
    SerpApi,
    Brave,
}

impl WebSearchProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SerpApi => "serpapi",
            Self::Brave => "brave",
        }
    }
}

impl fmt::Display for WebSearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// LLM engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmEngineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<LlmProviderKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, alias = "system_prompt", skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, alias = "use_web_search", skip_serializing_if = "Option::is_none")]
    pub use_web_search: Option<bool>,

    #[serde(
        default,
        alias = "web_search_provider",
        skip_serializing_if = "Option::is_none"
    )]
    pub web_search_provider: Option<WebSearchProvider>,
}

impl LlmEngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: LlmProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_web_search(mut self, provider: WebSearchProvider) -> Self {
        self.use_web_search = Some(true);
        self.web_search_provider = Some(provider);
        self
    }

    pub fn provider(&self) -> LlmProviderKind {
        self.provider.unwrap_or_default()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref().filter(|p| !p.is_empty())
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn uses_web_search(&self) -> bool {
        self.use_web_search.unwrap_or(false)
    }

    pub fn web_search_provider(&self) -> WebSearchProvider {
        self.web_search_provider.unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), WorkflowError> {
        if let Some(temperature) = self.temperature {
            if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
                return Err(WorkflowError::invalid_definition(format!(
                    "temperature must be between 0.0 and {}, got {}",
                    MAX_TEMPERATURE, temperature
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_type_round_trip_names() {
        for node_type in [
            NodeType::UserQuery,
            NodeType::KnowledgeBase,
            NodeType::LlmEngine,
            NodeType::Output,
        ] {
            assert_eq!(node_type.as_str().parse::<NodeType>().unwrap(), node_type);
            assert_eq!(
                serde_json::to_value(node_type).unwrap(),
                json!(node_type.as_str())
            );
        }
    }

    #[test]
    fn test_unknown_node_type() {
        let err = "webhook".parse::<NodeType>().unwrap_err();
        assert!(err.to_string().contains("unknown node type 'webhook'"));
    }

    #[test]
    fn test_knowledge_base_defaults() {
        let kind = NodeKind::from_config(NodeType::KnowledgeBase, None).unwrap();
        let NodeKind::KnowledgeBase(config) = kind else {
            panic!("expected knowledge base");
        };

        assert_eq!(config.top_k(), 5);
        assert_eq!(config.embedding_model(), "openai");
        assert!(config.document_filter().is_none());
    }

    #[test]
    fn test_knowledge_base_snake_case_aliases() {
        let kind = NodeKind::from_config(
            NodeType::KnowledgeBase,
            Some(json!({"documents": ["doc-1"], "top_k": 3, "embedding_model": "gemini"})),
        )
        .unwrap();
        let NodeKind::KnowledgeBase(config) = kind else {
            panic!("expected knowledge base");
        };

        assert_eq!(config.top_k(), 3);
        assert_eq!(config.embedding_model(), "gemini");
        assert_eq!(config.document_filter(), Some(&["doc-1".to_string()][..]));
    }

    #[test]
    fn test_empty_document_list_means_no_filter() {
        let config = KnowledgeBaseConfig::new().with_documents(vec![]);
        assert!(config.document_filter().is_none());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let result = NodeKind::from_config(NodeType::KnowledgeBase, Some(json!({"topK": 0})));
        assert!(result.unwrap_err().to_string().contains("topK"));
    }

    #[test]
    fn test_irrelevant_config_is_ignored() {
        let kind = NodeKind::from_config(
            NodeType::UserQuery,
            Some(json!({"temperature": 9.0, "topK": 0})),
        )
        .unwrap();
        assert_eq!(kind, NodeKind::UserQuery);

        let kind = NodeKind::from_config(
            NodeType::KnowledgeBase,
            Some(json!({"systemPrompt": "ignored", "apiKey": "secret"})),
        )
        .unwrap();
        assert_eq!(kind, NodeKind::KnowledgeBase(KnowledgeBaseConfig::default()));
    }

    #[test]
    fn test_llm_engine_defaults() {
        let config = LlmEngineConfig::new();

        assert_eq!(config.provider(), LlmProviderKind::OpenAi);
        assert_eq!(config.temperature(), 0.7);
        assert!(!config.uses_web_search());
        assert_eq!(config.web_search_provider(), WebSearchProvider::SerpApi);
        assert!(config.model().is_none());
        assert!(config.system_prompt().is_none());
    }

    #[test]
    fn test_llm_engine_parsing() {
        let kind = NodeKind::from_config(
            NodeType::LlmEngine,
            Some(json!({
                "provider": "gemini",
                "model": "gemini-1.5-flash",
                "system_prompt": "Be brief",
                "temperature": 0.0,
                "use_web_search": true,
                "web_search_provider": "brave"
            })),
        )
        .unwrap();
        let NodeKind::LlmEngine(config) = kind else {
            panic!("expected llm engine");
        };

        assert_eq!(config.provider(), LlmProviderKind::Gemini);
        assert_eq!(config.model(), Some("gemini-1.5-flash"));
        assert_eq!(config.system_prompt(), Some("Be brief"));
        assert_eq!(config.temperature(), 0.0);
        assert!(config.uses_web_search());
        assert_eq!(config.web_search_provider(), WebSearchProvider::Brave);
    }

    #[test]
    fn test_llm_engine_rejects_unknown_provider() {
        let result =
            NodeKind::from_config(NodeType::LlmEngine, Some(json!({"provider": "claude"})));
        assert!(result.is_err());
    }

    #[test]
    fn test_llm_engine_rejects_out_of_range_temperature() {
        let result =
            NodeKind::from_config(NodeType::LlmEngine, Some(json!({"temperature": 3.5})));
        assert!(result.unwrap_err().to_string().contains("temperature"));
    }

    #[test]
    fn test_empty_strings_fall_back_to_defaults() {
        let config = LlmEngineConfig::new().with_model("").with_system_prompt("");
        assert!(config.model().is_none());
        assert!(config.system_prompt().is_none());

        let config = KnowledgeBaseConfig::new().with_embedding_model("");
        assert_eq!(config.embedding_model(), "openai");
    }

    #[test]
    fn test_config_value_serializes_only_set_fields() {
        let kind = NodeKind::KnowledgeBase(KnowledgeBaseConfig::new().with_top_k(3));
        assert_eq!(kind.config_value(), Some(json!({"topK": 3})));
        assert_eq!(NodeKind::Output.config_value(), None);
    }
}
