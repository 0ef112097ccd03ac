use serde::{Deserialize, Serialize};

/// Page size used by the forum listing when nothing else is configured
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page the server will return
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filter and pagination state for `GET /forum/threads/search`
///
/// Fields are private so the pagination rule holds: every filter setter
/// resets `offset` to 0, and only [`SearchParams::next_page`] advances it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_date: Option<String>,
    limit: u32,
    offset: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: None,
            tags: Vec::new(),
            author_id: None,
            from_date: None,
            to_date: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size, clamped to `1..=MAX_PAGE_SIZE`
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_PAGE_SIZE);
        self.offset = 0;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    pub fn with_tag(mut self, tag_id: impl Into<String>) -> Self {
        let tag_id = tag_id.into();
        if !self.tags.contains(&tag_id) {
            self.tags.push(tag_id);
        }
        self.offset = 0;
        self
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author_id.as_deref()
    }

    pub fn from_date(&self) -> Option<&str> {
        self.from_date.as_deref()
    }

    pub fn to_date(&self) -> Option<&str> {
        self.to_date.as_deref()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Whitespace-only input clears the query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        let trimmed = query.trim();
        self.query = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.offset = 0;
    }

    /// Flip membership of `tag_id`. Returns `true` when the tag is now selected.
    pub fn toggle_tag(&mut self, tag_id: &str) -> bool {
        self.offset = 0;
        if let Some(pos) = self.tags.iter().position(|t| t == tag_id) {
            self.tags.remove(pos);
            false
        } else {
            self.tags.push(tag_id.to_string());
            true
        }
    }

    /// Replace the whole tag selection, dropping duplicates but keeping order
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.clear();
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self.offset = 0;
    }

    pub fn set_author(&mut self, author_id: Option<String>) {
        self.author_id = author_id.filter(|a| !a.trim().is_empty());
        self.offset = 0;
    }

    pub fn set_date_range(&mut self, from: Option<String>, to: Option<String>) {
        self.from_date = from.filter(|d| !d.trim().is_empty());
        self.to_date = to.filter(|d| !d.trim().is_empty());
        self.offset = 0;
    }

    /// Change only the lower bound, keeping `to_date`
    pub fn set_from_date(&mut self, from: Option<String>) {
        self.from_date = from.filter(|d| !d.trim().is_empty());
        self.offset = 0;
    }

    /// Change only the upper bound, keeping `from_date`
    pub fn set_to_date(&mut self, to: Option<String>) {
        self.to_date = to.filter(|d| !d.trim().is_empty());
        self.offset = 0;
    }

    /// Move to the next page: `offset += limit`
    pub fn next_page(&mut self) {
        self.offset = self.offset.saturating_add(self.limit);
    }

    pub fn first_page(&mut self) {
        self.offset = 0;
    }

    /// Query-string pairs in the order the server expects them.
    ///
    /// Absent filters are omitted; each selected tag becomes its own `tags` pair.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(6 + self.tags.len());
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        for tag in &self.tags {
            pairs.push(("tags", tag.clone()));
        }
        if let Some(author) = &self.author_id {
            pairs.push(("authorId", author.clone()));
        }
        if let Some(from) = &self.from_date {
            pairs.push(("fromDate", from.clone()));
        }
        if let Some(to) = &self.to_date {
            pairs.push(("toDate", to.clone()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}
