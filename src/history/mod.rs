use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::wire::{GenerationResult, RequestSummary};

/// One past generation attempt. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub request: RequestSummary,
    pub result: GenerationResult,
    pub created_at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(request: RequestSummary, result: GenerationResult) -> Self {
        Self { id: Uuid::new_v4(), request, result, created_at: Local::now() }
    }
}

/// Append-only, in-memory record of a session's generation attempts.
#[derive(Debug, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        tracing::debug!(id = %entry.id, kind = ?entry.request.kind, "history append");
        self.entries.push(entry);
    }

    /// Oldest first.
    pub fn list_all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        tracing::info!(dropped = self.entries.len(), "history cleared");
        self.entries.clear();
    }
}
