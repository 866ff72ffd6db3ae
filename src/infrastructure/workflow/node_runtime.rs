//! Per-node behaviour
//!
//! Turns a node and its gathered inputs into the node's output by calling the
//! retrieval, generation and web search collaborators.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::knowledge_base::{RetrievalRequest, RetrievalSearch, SearchHit};
use crate::domain::llm::{GenerationRequest, Generator, DEFAULT_MAX_TOKENS};
use crate::domain::search::{
    format_search_results_as_context, WebSearch, WebSearchRequest, DEFAULT_NUM_RESULTS,
};
use crate::domain::workflow::{
    first_present, str_field, KnowledgeBaseConfig, LlmEngineConfig, Node, NodeData, NodeKind,
    WorkflowError,
};

/// Limits applied to collaborator calls
#[derive(Debug, Clone, Copy)]
pub struct NodeRuntimeConfig {
    /// Completion budget for every generation call
    pub max_tokens: u32,

    /// Number of results requested from web search
    pub web_search_results: u32,
}

impl Default for NodeRuntimeConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            web_search_results: DEFAULT_NUM_RESULTS,
        }
    }
}

/// Runs a single node against its collaborators
#[derive(Clone)]
pub struct NodeRuntime {
    retrieval: Arc<dyn RetrievalSearch>,
    generator: Arc<dyn Generator>,
    web_search: Arc<dyn WebSearch>,
    config: NodeRuntimeConfig,
}

impl fmt::Debug for NodeRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRuntime")
            .field("retrieval", &self.retrieval.provider_type())
            .field("generator", &self.generator.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

impl NodeRuntime {
    pub fn new(
        retrieval: Arc<dyn RetrievalSearch>,
        generator: Arc<dyn Generator>,
        web_search: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            retrieval,
            generator,
            web_search,
            config: NodeRuntimeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: NodeRuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute `node` with the given inputs
    pub async fn run(&self, node: &Node, inputs: &NodeData) -> Result<NodeData, WorkflowError> {
        match node.kind() {
            NodeKind::UserQuery => Ok(self.run_user_query(inputs)),
            NodeKind::KnowledgeBase(config) => self.run_knowledge_base(config, inputs).await,
            NodeKind::LlmEngine(config) => self.run_llm_engine(config, inputs).await,
            NodeKind::Output => Ok(self.run_output(inputs)),
        }
    }

    fn run_user_query(&self, inputs: &NodeData) -> NodeData {
        let mut output = NodeData::new();
        output.insert("query".into(), json!(str_field(inputs, "query")));
        output
    }

    async fn run_knowledge_base(
        &self,
        config: &KnowledgeBaseConfig,
        inputs: &NodeData,
    ) -> Result<NodeData, WorkflowError> {
        let query = str_field(inputs, "query");

        let mut request = RetrievalRequest::new(query)
            .with_top_k(config.top_k())
            .with_embedding_model(config.embedding_model());
        if let Some(ids) = config.document_filter() {
            request = request.with_document_ids(ids.to_vec());
        }

        let hits = self
            .retrieval
            .search(request)
            .await
            .map_err(|e| WorkflowError::node_execution(e.to_string()))?;

        debug!(
            provider = self.retrieval.provider_type(),
            hits = hits.len(),
            "Knowledge base search complete"
        );

        let mut output = NodeData::new();
        output.insert("query".into(), json!(query));
        output.insert("context".into(), json!(hits_as_context(&hits)));
        output.insert("searchResults".into(), json!(hits));
        Ok(output)
    }

    async fn run_llm_engine(
        &self,
        config: &LlmEngineConfig,
        inputs: &NodeData,
    ) -> Result<NodeData, WorkflowError> {
        let query = str_field(inputs, "query");
        let mut context = str_field(inputs, "context").to_string();

        if config.uses_web_search() {
            let request = WebSearchRequest::new(query, config.web_search_provider())
                .with_num_results(self.config.web_search_results);
            let response = self.web_search.search(request).await;

            if response.success {
                let block = format_search_results_as_context(&response.results);
                if !block.is_empty() {
                    context = if context.is_empty() {
                        block
                    } else {
                        format!("{context}\n\n{block}")
                    };
                }
            } else {
                warn!(
                    provider = %config.web_search_provider(),
                    error = response.error.as_deref().unwrap_or("unknown error"),
                    "Web search failed, continuing without results"
                );
            }
        }

        let mut request = GenerationRequest::new(query)
            .with_context(context)
            .with_provider(config.provider())
            .with_temperature(config.temperature())
            .with_max_tokens(self.config.max_tokens);
        if let Some(prompt) = config.system_prompt() {
            request = request.with_system_prompt(prompt);
        }
        if let Some(model) = config.model() {
            request = request.with_model(model);
        }

        let result = self.generator.generate(request).await;
        if !result.success {
            return Err(WorkflowError::llm(
                result.error.as_deref().unwrap_or("unknown error"),
            ));
        }

        let mut output = NodeData::new();
        output.insert("query".into(), json!(query));
        output.insert(
            "response".into(),
            json!(result.response.unwrap_or_default()),
        );
        output.insert(
            "llmMetadata".into(),
            json!({
                "provider": result.provider,
                "model": result.model,
                "usage": result.usage,
            }),
        );
        Ok(output)
    }

    fn run_output(&self, inputs: &NodeData) -> NodeData {
        let response = first_present(inputs, &["response", "context"])
            .cloned()
            .unwrap_or_else(|| json!(""));
        let query = first_present(inputs, &["query"])
            .cloned()
            .unwrap_or_else(|| json!(""));

        let mut output = NodeData::new();
        output.insert("response".into(), response);
        output.insert("query".into(), query);
        output
    }
}

/// Join hits into one context block, one `[From name]` section per hit
fn hits_as_context(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("[From {}]:\n{}", hit.document_name, hit.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
