use quorum_types::{SearchParams, ThreadSummary, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong while loading threads";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a text query is sent
    pub debounce_ms: u64,
    pub page_size: u32,
    /// Issue the first page request as soon as the controller starts
    pub fetch_on_start: bool,
    /// Shown in place of any fetch failure
    pub error_message: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            page_size: DEFAULT_PAGE_SIZE,
            fetch_on_start: true,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    pub fn with_fetch_on_start(mut self, enabled: bool) -> Self {
        self.fetch_on_start = enabled;
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Idle → Loading → (Ready | Errored); any filter change or load-more goes back to Loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchStatus {
    Idle,
    Loading,
    Ready,
    Errored { message: String },
}

/// What the view renders: current filters, status and the merged result pages
#[derive(Debug, Clone, Serialize)]
pub struct SearchSnapshot {
    pub params: SearchParams,
    pub status: SearchStatus,
    pub threads: Vec<ThreadSummary>,
    /// False once a page shorter than the page size came back
    pub has_more: bool,
    /// Generation of the most recently issued request
    pub generation: u64,
}

impl SearchSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.status == SearchStatus::Ready
    }

    /// Settled with zero results; distinct from the error state
    pub fn is_empty(&self) -> bool {
        self.is_ready() && self.threads.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SearchStatus::Errored { message } => Some(message),
            _ => None,
        }
    }

    pub fn can_load_more(&self) -> bool {
        self.is_ready() && self.has_more
    }
}
