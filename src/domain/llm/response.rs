use serde::{Deserialize, Serialize};

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Outcome of a generation call.
///
/// Failures are data: `success` is false and `error` carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl GenerationResult {
    pub fn success(
        response: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            response: Some(response.into()),
            error: None,
            provider: provider.into(),
            model: model.into(),
            usage: None,
        }
    }

    pub fn failure(
        error: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
            provider: provider.into(),
            model: model.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_total() {
        let usage = Usage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn test_success_and_failure() {
        let ok = GenerationResult::success("hi", "openai", "gpt-4o-mini")
            .with_usage(Usage::new(1, 2));
        assert!(ok.success);
        assert_eq!(ok.response.as_deref(), Some("hi"));
        assert_eq!(ok.usage.map(|u| u.total_tokens), Some(3));

        let err = GenerationResult::failure("rate limited", "openai", "gpt-4o-mini");
        assert!(!err.success);
        assert!(err.response.is_none());
        assert_eq!(err.error.as_deref(), Some("rate limited"));
    }
}
