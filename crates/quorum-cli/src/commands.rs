use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use thiserror::Error;

pub const HELP: &str = "\
Type to search. Commands:
  :tag <id|name>        toggle a tag filter
  :tags                 list available tags
  :author [id]          filter by author (no id clears)
  :from [date]          created on/after date (YYYY-MM-DD or RFC 3339)
  :to [date]            created on/before date
  :clear                clear the text query
  :more                 load the next page
  :refresh              reload from the first page
  :open <thread-id>     show a thread and its replies
  :reply <thread-id> <text>
  :new <title> | <content> [| tag,tag]
  :show                 redraw the list
  :help                 this text
  :quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Clear,
    Tag(String),
    Tags,
    Author(Option<String>),
    From(Option<String>),
    To(Option<String>),
    More,
    Refresh,
    Open(String),
    Reply { thread_id: String, content: String },
    New {
        title: String,
        content: String,
        tags: Vec<String>,
    },
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command ':{0}', try :help")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid date '{0}', expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Some(Command::Query(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let arg_opt = (!arg.is_empty()).then(|| arg.to_string());

    let command = match name {
        "tag" => Command::Tag(arg_opt.ok_or(ParseError::Usage(":tag <id|name>"))?),
        "tags" => Command::Tags,
        "author" => Command::Author(arg_opt),
        "from" => Command::From(arg_opt.map(|d| normalize_date(&d, false)).transpose()?),
        "to" => Command::To(arg_opt.map(|d| normalize_date(&d, true)).transpose()?),
        "clear" => Command::Clear,
        "more" => Command::More,
        "refresh" => Command::Refresh,
        "open" => Command::Open(arg_opt.ok_or(ParseError::Usage(":open <thread-id>"))?),
        "reply" => {
            let (thread_id, content) = arg
                .split_once(char::is_whitespace)
                .ok_or(ParseError::Usage(":reply <thread-id> <text>"))?;
            Command::Reply {
                thread_id: thread_id.to_string(),
                content: content.trim().to_string(),
            }
        }
        "new" => parse_new(arg)?,
        "show" => Command::Show,
        "help" | "h" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_new(arg: &str) -> Result<Command, ParseError> {
    const USAGE: &str = ":new <title> | <content> [| tag,tag]";
    let mut parts = arg.splitn(3, '|').map(str::trim);
    let title = parts.next().filter(|t| !t.is_empty()).ok_or(ParseError::Usage(USAGE))?;
    let content = parts.next().ok_or(ParseError::Usage(USAGE))?;
    let tags = parts
        .next()
        .map(|t| {
            t.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(Command::New {
        title: title.to_string(),
        content: content.to_string(),
        tags,
    })
}

/// RFC 3339 passes through; a bare date becomes the start (or end) of that UTC day
pub fn normalize_date(input: &str, end_of_day: bool) -> Result<String, ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(input.to_string()))?;
    let (h, m, s) = if end_of_day { (23, 59, 59) } else { (0, 0, 0) };
    let datetime = date
        .and_hms_opt(h, m, s)
        .ok_or_else(|| ParseError::InvalidDate(input.to_string()))?;
    Ok(datetime
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true))
}
