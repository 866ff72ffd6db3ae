//! Generator used when no provider credentials are available

use async_trait::async_trait;
use tracing::warn;

use crate::domain::llm::{GenerationRequest, GenerationResult, Generator};
use crate::domain::workflow::LlmProviderKind;

/// Default chat model per provider
pub fn default_model(provider: LlmProviderKind) -> &'static str {
    match provider {
        LlmProviderKind::OpenAi => "gpt-4o-mini",
        LlmProviderKind::Gemini => "gemini-1.5-flash",
    }
}

fn missing_key_message(provider: LlmProviderKind) -> &'static str {
    match provider {
        LlmProviderKind::OpenAi => "OpenAI API key not configured",
        LlmProviderKind::Gemini => "Google API key not configured",
    }
}

/// Fails every call with the provider's missing-credential message
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

impl UnconfiguredGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Generator for UnconfiguredGenerator {
    async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        let model = request
            .model
            .unwrap_or_else(|| default_model(request.provider).to_string());
        let message = missing_key_message(request.provider);

        warn!(provider = %request.provider, %model, "{}", message);

        GenerationResult::failure(message, request.provider.as_str(), model)
    }

    fn provider_name(&self) -> &'static str {
        "unconfigured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_missing_openai_key() {
        let result = UnconfiguredGenerator::new()
            .generate(GenerationRequest::new("q"))
            .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("OpenAI API key not configured"));
        assert_eq!(result.provider, "openai");
        assert_eq!(result.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_reports_missing_google_key() {
        let request = GenerationRequest::new("q")
            .with_provider(LlmProviderKind::Gemini)
            .with_model("gemini-1.5-pro");

        let result = UnconfiguredGenerator::new().generate(request).await;

        assert_eq!(result.error.as_deref(), Some("Google API key not configured"));
        assert_eq!(result.provider, "gemini");
        assert_eq!(result.model, "gemini-1.5-pro");
    }
}
