use async_trait::async_trait;
use quorum_types::{CreateReplyRequest, CreateThreadRequest, Reply, SearchParams, Tag, Thread};

use crate::error::Result;

/// Forum endpoints the UI layer talks to
///
/// Implemented by [`crate::HttpForumClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait ForumApi: Send + Sync {
    /// `GET /forum/threads/search`
    async fn search_threads(&self, params: &SearchParams) -> Result<Vec<Thread>>;

    /// `GET /forum/tags`
    async fn list_tags(&self) -> Result<Vec<Tag>>;

    /// `GET /forum/threads/{id}`
    async fn get_thread(&self, thread_id: &str) -> Result<Thread>;

    /// `GET /forum/threads/{id}/replies`
    async fn list_replies(&self, thread_id: &str) -> Result<Vec<Reply>>;

    /// `POST /forum/threads/{id}/replies`
    async fn create_reply(&self, thread_id: &str, request: &CreateReplyRequest) -> Result<Reply>;

    /// `POST /forum/threads`
    async fn create_thread(&self, request: &CreateThreadRequest) -> Result<Thread>;
}
