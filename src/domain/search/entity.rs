use serde::{Deserialize, Serialize};

use crate::domain::workflow::WebSearchProvider;

/// Number of results requested per search
pub const DEFAULT_NUM_RESULTS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchRequest {
    pub query: String,
    pub num_results: u32,
    pub provider: WebSearchProvider,
}

impl WebSearchRequest {
    pub fn new(query: impl Into<String>, provider: WebSearchProvider) -> Self {
        Self {
            query: query.into(),
            num_results: DEFAULT_NUM_RESULTS,
            provider,
        }
    }

    pub fn with_num_results(mut self, num_results: u32) -> Self {
        self.num_results = num_results;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl WebSearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Outcome of a web search; failures are reported with `success = false`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<WebSearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebSearchResponse {
    pub fn success(results: Vec<WebSearchResult>) -> Self {
        Self {
            success: true,
            results,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Render search results as a numbered context block.
///
/// Returns an empty string when there are no results.
pub fn format_search_results_as_context(results: &[WebSearchResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut parts = Vec::with_capacity(results.len() + 1);
    parts.push("Web Search Results:\n".to_string());
    for (i, result) in results.iter().enumerate() {
        parts.push(format!(
            "{}. {}\n   URL: {}\n   {}\n",
            i + 1,
            result.title,
            result.url,
            result.snippet
        ));
    }
    parts.join("\n")
}
