use chrono::{DateTime, Utc};
use quorum_search::{SearchSnapshot, SearchStatus};
use quorum_types::{Reply, Tag, Thread};
use std::fmt::Write;

pub const LOADING: &str = "Loading...";
pub const NO_THREADS: &str = "No threads found";
pub const LOAD_MORE: &str = "Load more (:more)";
pub const NO_REPLIES: &str = "No replies yet";

/// Thread list: loading, error, empty state or rows
pub fn render_list(snapshot: &SearchSnapshot, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let filters = describe_filters(snapshot);
    if !filters.is_empty() {
        let _ = writeln!(out, "[{}]", filters);
    }

    match &snapshot.status {
        SearchStatus::Idle => {}
        SearchStatus::Loading => {
            let _ = writeln!(out, "{}", LOADING);
        }
        SearchStatus::Errored { message } => {
            let _ = writeln!(out, "! {}", message);
        }
        SearchStatus::Ready if snapshot.threads.is_empty() => {
            let _ = writeln!(out, "{}", NO_THREADS);
        }
        SearchStatus::Ready => {
            for thread in &snapshot.threads {
                let _ = writeln!(
                    out,
                    "* {}  ({})  [{}]",
                    thread.title,
                    relative_time(thread.created_at, now),
                    thread.id
                );
                let _ = writeln!(out, "    {}", thread.preview);
                if !thread.tags.is_empty() {
                    let _ = writeln!(out, "    {}", tag_badges(&thread.tags));
                }
            }
            if snapshot.has_more {
                let _ = writeln!(out, "-- {} --", LOAD_MORE);
            }
        }
    }

    out
}

fn describe_filters(snapshot: &SearchSnapshot) -> String {
    let params = &snapshot.params;
    let mut parts = Vec::new();
    if let Some(query) = params.query() {
        parts.push(format!("query: \"{}\"", query));
    }
    if !params.tags().is_empty() {
        parts.push(format!("tags: {}", params.tags().join(", ")));
    }
    if let Some(author) = params.author_id() {
        parts.push(format!("author: {}", author));
    }
    if let Some(from) = params.from_date() {
        parts.push(format!("from: {}", from));
    }
    if let Some(to) = params.to_date() {
        parts.push(format!("to: {}", to));
    }
    parts.join(" | ")
}

fn tag_badges(tags: &[Tag]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t.name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tag vocabulary with the current selection marked
pub fn render_tags(tags: &[Tag], selected: &[String]) -> String {
    if tags.is_empty() {
        return "No tags defined\n".to_string();
    }
    let mut out = String::new();
    for tag in tags {
        let mark = if selected.contains(&tag.id) { "x" } else { " " };
        let _ = writeln!(out, "[{}] {}  ({})", mark, tag.name, tag.id);
    }
    out
}

pub fn render_thread(thread: &Thread, replies: &[Reply], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", thread.title);
    let _ = writeln!(
        out,
        "by {}, {}",
        thread.author_id,
        relative_time(thread.created_at, now)
    );
    if !thread.tags.is_empty() {
        let _ = writeln!(out, "{}", tag_badges(&thread.tags));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", thread.content);
    let _ = writeln!(out);
    let _ = writeln!(out, "-- Replies ({}) --", replies.len());
    if replies.is_empty() {
        let _ = writeln!(out, "{}", NO_REPLIES);
    }
    for reply in replies {
        let _ = writeln!(
            out,
            "> {} ({}, {})",
            reply.content,
            reply.author_id,
            relative_time(reply.created_at, now)
        );
    }
    out
}

/// Human distance between `then` and `now`, e.g. "about 3 hours ago"
///
/// Same buckets as date-fns `formatDistance`. Calendar months are
/// approximated by the average month length.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTES_IN_DAY: u64 = 1_440;
    const MINUTES_IN_MONTH: u64 = 43_200;
    const MINUTES_IN_AVERAGE_MONTH: u64 = 43_830;

    let seconds = (now - then).num_seconds();
    let future = seconds < 0;
    let minutes = (seconds.unsigned_abs() + 30) / 60;

    let distance = match minutes {
        0 => "less than a minute".to_string(),
        1..=44 => plural(minutes, "minute"),
        45..=89 => "about 1 hour".to_string(),
        90..=1_439 => format!("about {}", plural((minutes + 30) / 60, "hour")),
        1_440..=2_519 => "1 day".to_string(),
        2_520..=43_199 => {
            plural((minutes + MINUTES_IN_DAY / 2) / MINUTES_IN_DAY, "day")
        }
        43_200..=86_399 => format!(
            "about {}",
            plural((minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH, "month")
        ),
        _ => {
            let months = minutes / MINUTES_IN_AVERAGE_MONTH;
            if months < 12 {
                plural(
                    (minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH,
                    "month",
                )
            } else {
                let years = months / 12;
                match months % 12 {
                    0..=2 => format!("about {}", plural(years, "year")),
                    3..=8 => format!("over {}", plural(years, "year")),
                    _ => format!("almost {}", plural(years + 1, "year")),
                }
            }
        }
    };

    if future {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quorum_types::{SearchParams, ThreadSummary};

    fn snapshot(status: SearchStatus, threads: Vec<ThreadSummary>) -> SearchSnapshot {
        SearchSnapshot {
            params: SearchParams::new(),
            status,
            threads,
            has_more: false,
            generation: 1,
        }
    }

    fn summary(id: &str, created_at: DateTime<Utc>) -> ThreadSummary {
        ThreadSummary {
            id: id.to_string(),
            title: format!("Title {}", id),
            preview: "Preview".to_string(),
            tags: vec![Tag::new("g", "planning")],
            created_at,
        }
    }

    #[test]
    fn test_empty_state_distinct_from_error() {
        let empty = render_list(&snapshot(SearchStatus::Ready, vec![]), Utc::now());
        assert!(empty.contains(NO_THREADS));

        let failed = render_list(
            &snapshot(
                SearchStatus::Errored {
                    message: "Something went wrong".into(),
                },
                vec![],
            ),
            Utc::now(),
        );
        assert!(failed.contains("Something went wrong"));
        assert!(!failed.contains(NO_THREADS));
    }

    #[test]
    fn test_loading_hides_rows() {
        let now = Utc::now();
        let out = render_list(&snapshot(SearchStatus::Loading, vec![summary("a", now)]), now);
        assert!(out.contains(LOADING));
        assert!(!out.contains("Title a"));
    }

    #[test]
    fn test_rows_and_load_more() {
        let now = Utc::now();
        let mut snap = snapshot(
            SearchStatus::Ready,
            vec![summary("a", now - Duration::hours(3))],
        );
        snap.has_more = true;
        let out = render_list(&snap, now);

        assert!(out.contains("Title a"));
        assert!(out.contains("about 3 hours ago"));
        assert!(out.contains("#planning"));
        assert!(out.contains(LOAD_MORE));
    }

    #[test]
    fn test_filters_header() {
        let mut snap = snapshot(SearchStatus::Ready, vec![]);
        snap.params = SearchParams::new().with_query("deploy").with_tag("t1");
        let out = render_list(&snap, Utc::now());
        assert!(out.starts_with("[query: \"deploy\" | tags: t1]"));
    }

    #[test]
    fn test_render_tags_marks_selection() {
        let tags = vec![Tag::new("t1", "backend"), Tag::new("t2", "frontend")];
        let out = render_tags(&tags, &["t2".to_string()]);
        assert!(out.contains("[ ] backend"));
        assert!(out.contains("[x] frontend"));
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(10), now), "less than a minute ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(1), now), "about 1 hour ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_time(now - Duration::days(40), now), "about 1 month ago");
        assert_eq!(relative_time(now - Duration::days(800), now), "about 2 years ago");
        assert_eq!(relative_time(now + Duration::minutes(5), now), "in 5 minutes");
    }

    #[test]
    fn test_relative_time_matches_format_distance_buckets() {
        let now = Utc::now();
        let ago = |d: Duration| relative_time(now - d, now);

        assert_eq!(ago(Duration::seconds(29)), "less than a minute ago");
        assert_eq!(ago(Duration::seconds(30)), "1 minute ago");
        assert_eq!(ago(Duration::seconds(89)), "1 minute ago");
        assert_eq!(ago(Duration::seconds(90)), "2 minutes ago");
        assert_eq!(ago(Duration::minutes(44)), "44 minutes ago");
        assert_eq!(ago(Duration::minutes(45)), "about 1 hour ago");
        assert_eq!(ago(Duration::minutes(90)), "about 2 hours ago");
        assert_eq!(ago(Duration::hours(30)), "1 day ago");
        assert_eq!(ago(Duration::hours(42)), "2 days ago");
        assert_eq!(ago(Duration::days(50)), "about 2 months ago");
        assert_eq!(ago(Duration::days(150)), "5 months ago");
        assert_eq!(ago(Duration::days(400)), "about 1 year ago");
        assert_eq!(ago(Duration::days(500)), "over 1 year ago");
        assert_eq!(ago(Duration::days(700)), "almost 2 years ago");
    }
}
