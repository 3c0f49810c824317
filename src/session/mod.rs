//! Per-session state. Everything a user session mutates lives here and is
//! passed explicitly into each operation; nothing is shared between
//! sessions.

use crate::config::Credentials;
use crate::context::CompanyContext;
use crate::errors::ComposeError;
use crate::history::{HistoryEntry, SessionHistory};
use crate::prompt;
use crate::provider::GenerationClient;
use crate::registry::Registry;
use crate::wire::{ComposedPrompt, GenerationRequest, Limits};

pub struct Session<'r> {
    registry: &'r Registry,
    company: CompanyContext,
    credentials: Credentials,
    limits: Limits,
    history: SessionHistory,
}

impl<'r> Session<'r> {
    pub fn new(
        registry: &'r Registry,
        company: CompanyContext,
        credentials: Credentials,
        limits: Limits,
    ) -> Self {
        Self { registry, company, credentials, limits, history: SessionHistory::new() }
    }

    /// Replace the startup credential for the rest of this session.
    pub fn override_api_key(&mut self, key: impl Into<String>) {
        self.credentials = Credentials::new(key);
        tracing::info!(set = self.credentials.is_set(), "API key overridden for session");
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn company(&self) -> &CompanyContext {
        &self.company
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn compose(&self, request: &GenerationRequest) -> Result<ComposedPrompt, ComposeError> {
        prompt::compose(request, self.registry, &self.company)
    }

    /// Compose, call the service, record the attempt. Composition errors are
    /// returned before any call is made and leave the history untouched;
    /// every attempt that reaches the client is recorded, failed or not.
    pub async fn submit(
        &mut self,
        client: &GenerationClient,
        request: &GenerationRequest,
    ) -> Result<&HistoryEntry, ComposeError> {
        let prompt = self.compose(request)?;
        let summary = request.summary();
        let result = client.generate(prompt, &self.credentials, &self.limits).await;

        let idx = self.history.len();
        self.history.append(HistoryEntry::new(summary, result));
        Ok(&self.history.list_all()[idx])
    }
}
