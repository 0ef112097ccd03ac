use quorum_client::{ForumApi, ForumError, Result};
use quorum_types::Tag;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Tag vocabulary, fetched once and reused for filtering
///
/// Concurrent first callers share one request. A failed fetch leaves the
/// cache empty so the next call retries.
pub struct TagCatalog {
    api: Arc<dyn ForumApi>,
    tags: OnceCell<Vec<Tag>>,
}

impl TagCatalog {
    pub fn new(api: Arc<dyn ForumApi>) -> Self {
        Self {
            api,
            tags: OnceCell::new(),
        }
    }

    pub async fn tags(&self) -> Result<&[Tag]> {
        let tags = self
            .tags
            .get_or_try_init(|| async {
                let tags = self.api.list_tags().await?;
                tracing::debug!(count = tags.len(), "Tag catalog loaded");
                Ok::<_, ForumError>(tags)
            })
            .await?;
        Ok(tags.as_slice())
    }

    /// Tags if already loaded, without fetching
    pub fn cached(&self) -> Option<&[Tag]> {
        self.tags.get().map(Vec::as_slice)
    }

    pub async fn name_of(&self, tag_id: &str) -> Result<Option<&str>> {
        Ok(self
            .tags()
            .await?
            .iter()
            .find(|tag| tag.id == tag_id)
            .map(|tag| tag.name.as_str()))
    }

    /// Look up by id first, then by case-insensitive name
    pub async fn resolve(&self, id_or_name: &str) -> Result<Option<&Tag>> {
        let tags = self.tags().await?;
        Ok(tags.iter().find(|tag| tag.id == id_or_name).or_else(|| {
            tags.iter()
                .find(|tag| tag.name.eq_ignore_ascii_case(id_or_name))
        }))
    }
}
