use crate::commands::{self, Command, HELP};
use crate::render;
use anyhow::Result;
use chrono::Utc;
use quorum_client::{ForumApi, ForumError};
use quorum_search::{SearchHandle, SearchSnapshot, TagCatalog, ThreadDetail};
use quorum_types::ThreadDraft;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    List,
    Thread,
}

/// Line-oriented front end over the search controller
pub struct App<W: Write> {
    api: Arc<dyn ForumApi>,
    search: SearchHandle,
    catalog: TagCatalog,
    view: View,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(api: Arc<dyn ForumApi>, search: SearchHandle, out: W) -> Self {
        Self {
            catalog: TagCatalog::new(api.clone()),
            api,
            search,
            view: View::List,
            out,
        }
    }

    pub fn search(&mut self) -> &mut SearchHandle {
        &mut self.search
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Read commands until EOF or `:quit`, redrawing the list as results settle
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut updates = self.search.subscribe();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let command = match commands::parse(&line) {
                        Ok(Some(command)) => command,
                        Ok(None) => continue,
                        Err(e) => {
                            writeln!(self.out, "{}", e)?;
                            continue;
                        }
                    };
                    if self.execute(command).await? == Flow::Quit {
                        break;
                    }
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        tracing::warn!("Search controller stopped");
                        break;
                    }
                    let snapshot = updates.borrow_and_update().clone();
                    if self.view == View::List {
                        self.draw_list(&snapshot)?;
                    }
                }
            }
            self.out.flush()?;
        }

        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        tracing::debug!(?command, "Executing command");

        match command {
            Command::Query(text) => {
                self.view = View::List;
                self.search.set_query(text);
            }
            Command::Clear => {
                self.view = View::List;
                self.search.set_query_now("")?;
            }
            Command::Tag(name) => match self.resolve_tag(&name).await {
                Ok(Some(id)) => {
                    self.view = View::List;
                    self.search.toggle_tag(id)?;
                }
                Ok(None) => writeln!(self.out, "Unknown tag '{}', see :tags", name)?,
                Err(e) => self.report(&e)?,
            },
            Command::Tags => {
                let selected = self.search.snapshot().params.tags().to_vec();
                let rendered = self
                    .catalog
                    .tags()
                    .await
                    .map(|tags| render::render_tags(tags, &selected));
                match rendered {
                    Ok(text) => write!(self.out, "{}", text)?,
                    Err(e) => self.report(&e)?,
                }
            }
            Command::Author(author) => {
                self.view = View::List;
                self.search.set_author(author)?;
            }
            Command::From(from) => {
                self.view = View::List;
                self.search.set_from_date(from)?;
            }
            Command::To(to) => {
                self.view = View::List;
                self.search.set_to_date(to)?;
            }
            Command::More => {
                self.view = View::List;
                let snapshot = self.search.snapshot();
                if snapshot.can_load_more() || snapshot.error().is_some() {
                    self.search.load_more()?;
                } else {
                    writeln!(self.out, "Nothing more to load")?;
                }
            }
            Command::Refresh => {
                self.view = View::List;
                self.search.refresh()?;
            }
            Command::Open(thread_id) => {
                match ThreadDetail::load(self.api.clone(), &thread_id).await {
                    Ok(detail) => self.draw_thread(&detail)?,
                    Err(e) if e.is_not_found() => {
                        writeln!(self.out, "Thread '{}' not found", thread_id)?
                    }
                    Err(e) => self.report(&e)?,
                }
            }
            Command::Reply { thread_id, content } => {
                let result = async {
                    let mut detail = ThreadDetail::load(self.api.clone(), &thread_id).await?;
                    detail.post_reply(&content).await?;
                    Ok::<_, ForumError>(detail)
                }
                .await;
                match result {
                    Ok(detail) => self.draw_thread(&detail)?,
                    Err(e) => self.report(&e)?,
                }
            }
            Command::New {
                title,
                content,
                tags,
            } => self.create_thread(title, content, tags).await?,
            Command::Show => {
                self.view = View::List;
                let snapshot = self.search.snapshot();
                self.draw_list(&snapshot)?;
            }
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    async fn create_thread(
        &mut self,
        title: String,
        content: String,
        tags: Vec<String>,
    ) -> Result<()> {
        let mut tag_ids = Vec::with_capacity(tags.len());
        for name in &tags {
            match self.resolve_tag(name).await {
                Ok(Some(id)) => tag_ids.push(id),
                Ok(None) => {
                    writeln!(self.out, "Unknown tag '{}', see :tags", name)?;
                    return Ok(());
                }
                Err(e) => return self.report(&e),
            }
        }

        let draft = ThreadDraft::new(title, content).with_tags(tag_ids);
        match ThreadDetail::create(self.api.clone(), &draft).await {
            Ok(detail) => {
                writeln!(self.out, "Created thread {}", detail.thread().id)?;
                // Listed results are stale once a thread exists
                self.search.refresh()?;
                self.draw_thread(&detail)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    /// Tag id for an id or case-insensitive name
    async fn resolve_tag(&self, id_or_name: &str) -> Result<Option<String>, ForumError> {
        let tag = self.catalog.resolve(id_or_name).await?;
        Ok(tag.map(|t| t.id.clone()))
    }

    fn draw_list(&mut self, snapshot: &SearchSnapshot) -> Result<()> {
        write!(self.out, "{}", render::render_list(snapshot, Utc::now()))?;
        Ok(())
    }

    fn draw_thread(&mut self, detail: &ThreadDetail) -> Result<()> {
        self.view = View::Thread;
        write!(
            self.out,
            "{}",
            render::render_thread(detail.thread(), detail.replies(), Utc::now())
        )?;
        Ok(())
    }

    fn report(&mut self, error: &ForumError) -> Result<()> {
        tracing::warn!("Request failed: {}", error);
        let message = match error {
            ForumError::Validation(e) => e.to_string(),
            e if e.is_unauthorized() => "Not signed in, set QUORUM_TOKEN or credentials".to_string(),
            e => format!("Request failed: {}", e),
        };
        writeln!(self.out, "{}", message)?;
        Ok(())
    }

    pub async fn shutdown(self) -> W {
        self.search.shutdown().await;
        self.out
    }
}
