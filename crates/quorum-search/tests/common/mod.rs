#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use quorum_client::{ForumApi, ForumError, Result};
use quorum_types::{
    CreateReplyRequest, CreateThreadRequest, Reply, SearchParams, Tag, Thread,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type DelayFn = Box<dyn Fn(&SearchParams) -> Duration + Send + Sync>;

/// In-memory forum: `total` threads, paged by offset/limit, labelled by filter
pub struct FakeForum {
    pub total: usize,
    pub fail: AtomicBool,
    pub searches: Mutex<Vec<SearchParams>>,
    pub tag_calls: AtomicUsize,
    pub replies: Mutex<Vec<Reply>>,
    pub created: Mutex<Vec<CreateThreadRequest>>,
    delay: DelayFn,
}

impl FakeForum {
    pub fn with_total(total: usize) -> Self {
        Self {
            total,
            fail: AtomicBool::new(false),
            searches: Mutex::new(Vec::new()),
            tag_calls: AtomicUsize::new(0),
            replies: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            delay: Box::new(|_| Duration::from_millis(10)),
        }
    }

    pub fn with_delay(
        mut self,
        delay: impl Fn(&SearchParams) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.delay = Box::new(delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn last_search(&self) -> SearchParams {
        self.searches.lock().unwrap().last().cloned().unwrap()
    }

    /// "all", the query text, or the joined tag ids
    pub fn label(params: &SearchParams) -> String {
        if let Some(query) = params.query() {
            query.to_string()
        } else if !params.tags().is_empty() {
            params.tags().join("+")
        } else {
            "all".to_string()
        }
    }
}

pub fn thread(id: &str, title: &str) -> Thread {
    Thread {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("Content of {}", title),
        author_id: "author-1".to_string(),
        tags: Vec::new(),
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[async_trait]
impl ForumApi for FakeForum {
    async fn search_threads(&self, params: &SearchParams) -> Result<Vec<Thread>> {
        self.searches.lock().unwrap().push(params.clone());
        tokio::time::sleep((self.delay)(params)).await;

        if self.fail.load(Ordering::SeqCst) {
            return Err(ForumError::Status {
                status: 500,
                body: "database unavailable".to_string(),
            });
        }

        let label = Self::label(params);
        let start = params.offset() as usize;
        let end = (start + params.limit() as usize).min(self.total);
        Ok((start.min(end)..end)
            .map(|i| thread(&format!("{}-{}", label, i), &format!("{} #{}", label, i)))
            .collect())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.tag_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(ForumError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(vec![Tag::new("t1", "backend"), Tag::new("t2", "Frontend")])
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Thread> {
        if thread_id == "missing" {
            return Err(ForumError::Status {
                status: 404,
                body: "Thread not found".to_string(),
            });
        }
        Ok(thread(thread_id, "Detail"))
    }

    async fn list_replies(&self, _thread_id: &str) -> Result<Vec<Reply>> {
        Ok(self.replies.lock().unwrap().clone())
    }

    async fn create_reply(&self, thread_id: &str, request: &CreateReplyRequest) -> Result<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let reply = Reply {
            id: format!("r{}", replies.len() + 1),
            thread_id: thread_id.to_string(),
            content: request.content.clone(),
            author_id: "author-1".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        replies.push(reply.clone());
        Ok(reply)
    }

    async fn create_thread(&self, request: &CreateThreadRequest) -> Result<Thread> {
        self.created.lock().unwrap().push(request.clone());
        Ok(thread("new-thread", &request.title))
    }
}
