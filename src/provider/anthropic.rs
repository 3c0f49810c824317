use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{classify_status, Provider};
use crate::errors::ProviderError;
use crate::wire::Limits;

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";

/// Anthropic Messages API.
pub struct Anthropic {
    client: Client,
    api_base: String,
    api_version: String,
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

impl Anthropic {
    pub fn new(api_base: Option<String>, api_version: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;
        Ok(Self {
            client,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_version,
        })
    }
}

/// Concatenate the text blocks of a Messages response.
fn extract_text(body: &str) -> Result<String, ProviderError> {
    let parsed: MsgResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Other(format!("anthropic response parse error: {e}")))?;
    Ok(parsed
        .content
        .into_iter()
        .filter(|b| b.r#type == "text")
        .map(|b| b.text)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[async_trait]
impl Provider for Anthropic {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(
        &self,
        prompt: &str,
        api_key: &str,
        limits: &Limits,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let body = MsgRequest {
            model: &limits.model,
            max_tokens: limits.max_tokens,
            messages: vec![Msg { role: "user", content: prompt }],
        };

        tracing::debug!(%url, "anthropic: POST");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = text.len(), "anthropic: response");

        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &text));
        }
        extract_text(&text)
    }
}
