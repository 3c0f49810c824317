use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::cli::ProviderKind;
use crate::config::{Config, Credentials};
use crate::errors::ProviderError;
use crate::wire::{ComposedPrompt, FailureKind, GenerationResult, Limits};

pub mod anthropic;
pub mod openai;

/// One text-in/text-out call against a hosted model.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(
        &self,
        prompt: &str,
        api_key: &str,
        limits: &Limits,
    ) -> Result<String, ProviderError>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(kind: ProviderKind, cfg: &Config) -> Result<DynProvider> {
    match kind {
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic::new(
            cfg.api_base.clone(),
            cfg.anthropic_version.clone(),
            cfg.timeout_secs,
        )?)),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(
            cfg.api_base.clone(),
            cfg.timeout_secs,
        )?)),
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map a non-success HTTP status and its body onto a provider error.
/// Both supported APIs wrap failures as `{"error": {"message": ...}}`.
pub fn classify_status(status: u16, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let detail = if detail.is_empty() { format!("HTTP {status}") } else { detail };
    match status {
        401 | 403 => ProviderError::Unauthorized(detail),
        429 => ProviderError::RateLimited(detail),
        _ => ProviderError::Other(format!("service error ({status}): {detail}")),
    }
}

/// Sends composed prompts and folds every outcome into a `GenerationResult`.
/// Single attempt per call; the caller decides whether to try again.
pub struct GenerationClient {
    provider: DynProvider,
}

impl GenerationClient {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn generate(
        &self,
        prompt: ComposedPrompt,
        credentials: &Credentials,
        limits: &Limits,
    ) -> GenerationResult {
        let Some(api_key) = credentials.api_key() else {
            tracing::warn!(provider = self.provider.name(), "no API key configured");
            return GenerationResult::failed(
                FailureKind::InvalidCredentials,
                "No API key configured. Set one in the config file, the environment, or with --api-key.",
            );
        };

        tracing::info!(
            provider = self.provider.name(),
            model = %limits.model,
            prompt_chars = prompt.text().len(),
            "sending generation request"
        );

        let result = match self.provider.complete(prompt.text(), api_key, limits).await {
            Ok(text) if text.trim().is_empty() => GenerationResult::failed(
                FailureKind::TransientServiceError,
                "The service returned an empty response. Please try again.",
            ),
            Ok(text) => GenerationResult::Generated { text },
            Err(ProviderError::Unauthorized(detail)) => GenerationResult::failed(
                FailureKind::InvalidCredentials,
                format!("Invalid API key. Please check your API key. ({detail})"),
            ),
            Err(ProviderError::RateLimited(detail)) => GenerationResult::failed(
                FailureKind::RateLimited,
                format!("Rate limit exceeded. Please wait a moment and try again. ({detail})"),
            ),
            Err(ProviderError::Other(detail)) => {
                let detail = if detail.trim().is_empty() {
                    "unknown error".to_string()
                } else {
                    detail
                };
                GenerationResult::failed(
                    FailureKind::TransientServiceError,
                    format!("Generation failed: {detail}"),
                )
            }
        };

        if let Some(f) = result.failure() {
            tracing::warn!(kind = ?f.kind, "generation failed: {}", f.message);
        }
        result
    }
}
