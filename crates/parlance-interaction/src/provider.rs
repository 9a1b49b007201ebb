//! AI-provider collaborator interface.
//!
//! The provider is an opaque capability: the coding-assist handler hands it
//! a prompt and gets text back. Provider transports (HTTP, CLI, local
//! models) belong to the surrounding application; unavailability is mapped
//! to a domain-handler failure, never a pipeline error.

use crate::error::CollaboratorError;
use async_trait::async_trait;

/// Options forwarded with a provider invocation.
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// An opaque text-generation capability.
#[async_trait]
pub trait ProviderAgent: Send + Sync {
    /// Generates text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Unavailable`] when the provider is down.
    async fn invoke(&self, prompt: &str, options: &InvokeOptions) -> Result<String, CollaboratorError>;
}

/// A canned provider returning a fixed response.
///
/// Used in tests and as a stand-in where no provider is wired up.
pub struct StaticProviderAgent {
    response: String,
}

impl StaticProviderAgent {
    /// Creates a provider that always returns `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ProviderAgent for StaticProviderAgent {
    async fn invoke(&self, _prompt: &str, _options: &InvokeOptions) -> Result<String, CollaboratorError> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_returns_fixed_response() {
        let provider = StaticProviderAgent::new("fn main() {}");
        let response = provider.invoke("write main", &InvokeOptions::default()).await.unwrap();
        assert_eq!(response, "fn main() {}");
    }
}
