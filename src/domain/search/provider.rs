use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{WebSearchRequest, WebSearchResponse};

/// Live web search backend (SerpAPI, Brave).
///
/// Never returns an error; failures are `WebSearchResponse::failure`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, request: WebSearchRequest) -> WebSearchResponse;
}
