//! Web search used when no search credentials are available

use async_trait::async_trait;
use tracing::debug;

use crate::domain::search::{WebSearch, WebSearchRequest, WebSearchResponse};
use crate::domain::workflow::WebSearchProvider;

/// Reports the missing API key for whichever provider is asked
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredWebSearch;

impl UnconfiguredWebSearch {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WebSearch for UnconfiguredWebSearch {
    async fn search(&self, request: WebSearchRequest) -> WebSearchResponse {
        debug!(provider = %request.provider, "Web search requested without credentials");

        WebSearchResponse::failure(match request.provider {
            WebSearchProvider::SerpApi => "SerpAPI key not configured",
            WebSearchProvider::Brave => "Brave API key not configured",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_keys() {
        let search = UnconfiguredWebSearch::new();

        let response = search
            .search(WebSearchRequest::new("q", WebSearchProvider::SerpApi))
            .await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("SerpAPI key not configured"));

        let response = search
            .search(WebSearchRequest::new("q", WebSearchProvider::Brave))
            .await;
        assert_eq!(response.error.as_deref(), Some("Brave API key not configured"));
    }
}
