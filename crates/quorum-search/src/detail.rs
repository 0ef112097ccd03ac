use quorum_client::{ForumApi, Result};
use quorum_types::{Reply, ReplyDraft, Thread, ThreadDraft};
use std::sync::Arc;

/// One thread with its replies
pub struct ThreadDetail {
    api: Arc<dyn ForumApi>,
    thread: Thread,
    replies: Vec<Reply>,
}

impl ThreadDetail {
    /// Fetch the thread and its replies concurrently
    pub async fn load(api: Arc<dyn ForumApi>, thread_id: &str) -> Result<Self> {
        let (thread, replies) =
            futures::try_join!(api.get_thread(thread_id), api.list_replies(thread_id))?;
        tracing::debug!(thread_id, replies = replies.len(), "Thread loaded");
        Ok(Self {
            api,
            thread,
            replies,
        })
    }

    /// Validate and post a new thread. Search results should be refreshed afterwards.
    pub async fn create(api: Arc<dyn ForumApi>, draft: &ThreadDraft) -> Result<Self> {
        let request = draft.validate()?;
        let thread = api.create_thread(&request).await?;
        tracing::info!(thread_id = %thread.id, "Thread created");
        Ok(Self {
            api,
            thread,
            replies: Vec::new(),
        })
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    /// Validate, post, then re-fetch the reply list
    pub async fn post_reply(&mut self, content: &str) -> Result<Reply> {
        let request = ReplyDraft::new(content).validate()?;
        let reply = self.api.create_reply(&self.thread.id, &request).await?;
        tracing::info!(thread_id = %self.thread.id, reply_id = %reply.id, "Reply posted");
        self.reload_replies().await?;
        Ok(reply)
    }

    pub async fn reload_replies(&mut self) -> Result<()> {
        self.replies = self.api.list_replies(&self.thread.id).await?;
        Ok(())
    }
}
