//! LLM domain - text generation collaborator

mod provider;
mod request;
mod response;

pub use provider::Generator;
pub use request::{GenerationRequest, DEFAULT_MAX_TOKENS};
pub use response::{GenerationResult, Usage};

#[cfg(test)]
pub use provider::mock;
