use quorum_client::{debounce, Debounced, ForumApi, ForumError};
use quorum_types::{SearchParams, Thread, ThreadSummary};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::state::{SearchConfig, SearchSnapshot, SearchStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search controller has stopped")]
    Stopped,
}

/// Input events for the controller task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Already-debounced text query
    SetQuery(String),
    ToggleTag(String),
    SetTags(Vec<String>),
    SetAuthor(Option<String>),
    SetDateRange {
        from: Option<String>,
        to: Option<String>,
    },
    /// Lower date bound only; the upper bound is kept
    SetFromDate(Option<String>),
    /// Upper date bound only; the lower bound is kept
    SetToDate(Option<String>),
    LoadMore,
    /// Re-fetch the current filters from the first page
    Refresh,
    Shutdown,
}

struct FetchOutcome {
    generation: u64,
    append: bool,
    limit: u32,
    result: Result<Vec<Thread>, ForumError>,
}

/// Owns the search state and is the only thing that mutates it
///
/// Runs as a single task fed by a command channel. Each fetch is spawned with
/// the generation number current at issue time, and a completed fetch is only
/// applied when its generation is still the latest; slower responses to
/// superseded filters are dropped.
pub struct SearchController {
    api: Arc<dyn ForumApi>,
    config: SearchConfig,
    params: SearchParams,
    status: SearchStatus,
    threads: Vec<ThreadSummary>,
    has_more: bool,
    generation: u64,
    state_tx: watch::Sender<SearchSnapshot>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl SearchController {
    /// Start the controller task and return its handle
    pub fn spawn(api: Arc<dyn ForumApi>, config: SearchConfig) -> SearchHandle {
        let params = SearchParams::new().with_limit(config.page_size);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchSnapshot {
            params: params.clone(),
            status: SearchStatus::Idle,
            threads: Vec::new(),
            has_more: false,
            generation: 0,
        });

        let query_tx = command_tx.clone();
        let query = debounce(config.debounce(), move |query: String| {
            if query_tx.send(SearchCommand::SetQuery(query)).is_err() {
                tracing::debug!("Dropping debounced query, controller stopped");
            }
        });

        let controller = Self {
            api,
            config,
            params,
            status: SearchStatus::Idle,
            threads: Vec::new(),
            has_more: false,
            generation: 0,
            state_tx,
            outcome_tx,
        };
        let task = tokio::spawn(controller.run(command_rx, outcome_rx));

        SearchHandle {
            commands: command_tx,
            state: state_rx,
            query,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SearchCommand>,
        mut outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
    ) {
        tracing::debug!(limit = self.params.limit(), "Search controller started");
        if self.config.fetch_on_start {
            self.fetch(false);
        }

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SearchCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(outcome) = outcomes.recv() => self.apply(outcome),
            }
        }

        tracing::debug!(generation = self.generation, "Search controller stopped");
    }

    fn handle_command(&mut self, command: SearchCommand) {
        match command {
            SearchCommand::LoadMore => match self.status {
                SearchStatus::Ready if self.has_more => {
                    self.params.next_page();
                    self.fetch(true);
                }
                // Results were cleared by the failure, start over from the first page
                SearchStatus::Errored { .. } => {
                    self.params.first_page();
                    self.fetch(false);
                }
                _ => {
                    tracing::debug!(status = ?self.status, has_more = self.has_more, "Ignoring load more");
                }
            },
            SearchCommand::Refresh => {
                self.params.first_page();
                self.fetch(false);
            }
            SearchCommand::Shutdown => {}
            SearchCommand::SetQuery(query) => self.change_filters(|p| p.set_query(query)),
            SearchCommand::ToggleTag(tag_id) => self.change_filters(|p| {
                p.toggle_tag(&tag_id);
            }),
            SearchCommand::SetTags(tags) => self.change_filters(|p| p.set_tags(tags)),
            SearchCommand::SetAuthor(author) => self.change_filters(|p| p.set_author(author)),
            SearchCommand::SetDateRange { from, to } => {
                self.change_filters(|p| p.set_date_range(from, to))
            }
            SearchCommand::SetFromDate(from) => self.change_filters(|p| p.set_from_date(from)),
            SearchCommand::SetToDate(to) => self.change_filters(|p| p.set_to_date(to)),
        }
    }

    /// Apply a filter mutation; offset goes back to 0 and a new first page is fetched
    fn change_filters(&mut self, mutate: impl FnOnce(&mut SearchParams)) {
        let before = self.params.clone();
        mutate(&mut self.params);

        // Same filters already loaded or in flight
        let settled = matches!(self.status, SearchStatus::Ready | SearchStatus::Loading);
        if self.params == before && settled {
            tracing::debug!("Filters unchanged, skipping fetch");
            return;
        }
        self.fetch(false);
    }

    fn fetch(&mut self, append: bool) {
        self.generation += 1;
        self.status = SearchStatus::Loading;
        self.publish();

        let generation = self.generation;
        let params = self.params.clone();
        let api = Arc::clone(&self.api);
        let outcome_tx = self.outcome_tx.clone();

        tracing::debug!(
            generation,
            append,
            offset = params.offset(),
            query = params.query().unwrap_or(""),
            tags = params.tags().len(),
            "Fetching threads"
        );

        tokio::spawn(async move {
            let result = api.search_threads(&params).await;
            let _ = outcome_tx.send(FetchOutcome {
                generation,
                append,
                limit: params.limit(),
                result,
            });
        });
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation,
                latest = self.generation,
                "Discarding stale search response"
            );
            return;
        }

        match outcome.result {
            Ok(threads) => {
                let page_len = threads.len();
                let incoming = threads.into_iter().map(ThreadSummary::from);
                if outcome.append {
                    let seen: HashSet<String> = self.threads.iter().map(|t| t.id.clone()).collect();
                    self.threads
                        .extend(incoming.filter(|thread| !seen.contains(&thread.id)));
                } else {
                    self.threads = incoming.collect();
                }
                self.has_more = page_len >= outcome.limit as usize;
                self.status = SearchStatus::Ready;
                tracing::debug!(
                    generation = outcome.generation,
                    page_len,
                    total = self.threads.len(),
                    "Search results applied"
                );
            }
            Err(e) => {
                tracing::warn!(generation = outcome.generation, error = %e, "Thread search failed");
                self.threads.clear();
                self.has_more = false;
                self.status = SearchStatus::Errored {
                    message: self.config.error_message.clone(),
                };
            }
        }

        self.publish();
    }

    fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            params: self.params.clone(),
            status: self.status.clone(),
            threads: self.threads.clone(),
            has_more: self.has_more,
            generation: self.generation,
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.snapshot());
    }
}

/// Caller-side handle: sends commands, observes snapshots
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<SearchCommand>,
    state: watch::Receiver<SearchSnapshot>,
    query: Debounced<String>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    /// Debounced: only the last query within the quiet period is sent
    pub fn set_query(&self, query: impl Into<String>) {
        self.query.call(query.into());
    }

    /// Bypass the debounce, dropping any pending query
    pub fn set_query_now(&self, query: impl Into<String>) -> Result<(), SearchError> {
        self.query.cancel();
        self.send(SearchCommand::SetQuery(query.into()))
    }

    pub fn toggle_tag(&self, tag_id: impl Into<String>) -> Result<(), SearchError> {
        self.send(SearchCommand::ToggleTag(tag_id.into()))
    }

    pub fn set_tags(&self, tags: Vec<String>) -> Result<(), SearchError> {
        self.send(SearchCommand::SetTags(tags))
    }

    pub fn set_author(&self, author_id: Option<String>) -> Result<(), SearchError> {
        self.send(SearchCommand::SetAuthor(author_id))
    }

    pub fn set_date_range(
        &self,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<(), SearchError> {
        self.send(SearchCommand::SetDateRange { from, to })
    }

    pub fn set_from_date(&self, from: Option<String>) -> Result<(), SearchError> {
        self.send(SearchCommand::SetFromDate(from))
    }

    pub fn set_to_date(&self, to: Option<String>) -> Result<(), SearchError> {
        self.send(SearchCommand::SetToDate(to))
    }

    pub fn load_more(&self) -> Result<(), SearchError> {
        self.send(SearchCommand::LoadMore)
    }

    pub fn refresh(&self) -> Result<(), SearchError> {
        self.send(SearchCommand::Refresh)
    }

    pub fn send(&self, command: SearchCommand) -> Result<(), SearchError> {
        self.commands.send(command).map_err(|_| SearchError::Stopped)
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Wait for the next published state
    pub async fn changed(&mut self) -> Result<SearchSnapshot, SearchError> {
        self.state.changed().await.map_err(|_| SearchError::Stopped)?;
        Ok(self.state.borrow_and_update().clone())
    }

    /// Wait until a published state satisfies `predicate`
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&SearchSnapshot) -> bool,
    ) -> Result<SearchSnapshot, SearchError> {
        let snapshot = self
            .state
            .wait_for(predicate)
            .await
            .map_err(|_| SearchError::Stopped)?;
        Ok(snapshot.clone())
    }

    /// Independent receiver for a render loop
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.clone()
    }

    pub async fn shutdown(self) {
        self.query.cancel();
        let _ = self.commands.send(SearchCommand::Shutdown);
        if let Err(e) = self.task.await {
            tracing::error!("Search controller task failed: {}", e);
        }
    }
}
