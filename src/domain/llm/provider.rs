use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{GenerationRequest, GenerationResult};

/// Chat-completion backend used by `llmEngine` nodes.
///
/// Never returns an error: a failed call is a `GenerationResult` with
/// `success = false`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> GenerationResult;

    /// Provider name, used in logs
    fn provider_name(&self) -> &'static str;
}
