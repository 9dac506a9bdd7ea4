use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::App;
use crate::config::AppConfig;
use crate::model::{DiaryEntry, EntryDate};
use crate::store::EntryStore;

const SNIPPET_CHARS: usize = 72;

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show entries carrying this tag (repeat to require several)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    /// Limit the number of entries printed
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print entries as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Day to print, as YYYY-MM-DD
    pub date: String,
}

pub fn run_tui(app: &mut App) -> Result<()> {
    app.run()
}

/// Store the non-interactive commands read from.
pub fn session_store(config: &AppConfig) -> EntryStore {
    if config.seed_samples {
        EntryStore::with_samples()
    } else {
        EntryStore::new()
    }
}

pub fn list_entries(config: Arc<AppConfig>, args: ListArgs) -> Result<()> {
    let store = session_store(&config);
    let output = render_list(&store, &args, config.preview_lines as usize)?;
    print!("{output}");
    Ok(())
}

pub fn show_entry(config: Arc<AppConfig>, args: ShowArgs) -> Result<()> {
    let store = session_store(&config);
    let output = render_show(&store, &args)?;
    print!("{output}");
    Ok(())
}

pub fn list_tags(config: Arc<AppConfig>) -> Result<()> {
    let store = session_store(&config);
    print!("{}", format_tag_universe(&store));
    Ok(())
}

fn render_list(store: &EntryStore, args: &ListArgs, preview_lines: usize) -> Result<String> {
    let mut entries = store.list(&args.tags);
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }
    tracing::debug!(
        filter = ?args.tags,
        matched = entries.len(),
        "listing diary entries"
    );
    if args.json {
        let mut json =
            serde_json::to_string_pretty(&entries).context("serializing entries as json")?;
        json.push('\n');
        return Ok(json);
    }
    Ok(format_entries(&entries, preview_lines))
}

fn render_show(store: &EntryStore, args: &ShowArgs) -> Result<String> {
    let date: EntryDate = args
        .date
        .parse()
        .with_context(|| format!("reading date argument `{}`", args.date))?;
    Ok(match store.find_by_date(date) {
        Some(entry) => format_entry(entry),
        None => format!("No entry for {date}\n"),
    })
}

fn format_entries(entries: &[&DiaryEntry], preview_lines: usize) -> String {
    if entries.is_empty() {
        return "No entries found.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(&mut out, "{}  {}", entry.date, display_title(entry));
        if !entry.tags.is_empty() {
            let _ = writeln!(&mut out, "    tags    {}", format_tags(&entry.tags));
        }
        if let Some(snippet) = build_snippet(entry, preview_lines) {
            let _ = writeln!(&mut out, "    {snippet}");
        }
        out.push('\n');
    }
    out
}

fn format_entry(entry: &DiaryEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "{} ({})", entry.date.long_label(), entry.date);
    let _ = writeln!(&mut out, "{}", display_title(entry));
    if !entry.tags.is_empty() {
        let _ = writeln!(&mut out, "tags: {}", format_tags(&entry.tags));
    }
    if !entry.content.is_empty() {
        out.push('\n');
        let _ = writeln!(&mut out, "{}", entry.content);
    }
    out
}

fn format_tag_universe(store: &EntryStore) -> String {
    let tags = store.known_tags();
    if tags.is_empty() {
        return "No tags yet.\n".to_string();
    }
    let mut out = String::new();
    for tag in tags {
        let count = store.iter().filter(|entry| entry.has_tag(&tag)).count();
        let _ = writeln!(&mut out, "#{tag} ({count})");
    }
    out
}

fn display_title(entry: &DiaryEntry) -> &str {
    if entry.title.is_empty() {
        "(untitled)"
    } else {
        &entry.title
    }
}

fn build_snippet(entry: &DiaryEntry, preview_lines: usize) -> Option<String> {
    let preview = entry.preview(preview_lines);
    if preview.is_empty() {
        return None;
    }
    let joined = preview.replace('\n', " ");
    let mut snippet: String = joined.chars().take(SNIPPET_CHARS).collect();
    if joined.chars().count() > SNIPPET_CHARS {
        snippet.push('…');
    }
    Some(snippet)
}

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult<T = ()> = Result<T>;

    fn date(s: &str) -> EntryDate {
        s.parse().expect("valid date")
    }

    fn small_store() -> EntryStore {
        let mut store = EntryStore::new();
        store.upsert_by_date(
            date("2024-03-01"),
            "Spring errands",
            "Bought seeds.\n\nPlanted tomatoes.",
            vec!["garden".into(), "home".into()],
        );
        store.upsert_by_date(
            date("2024-03-03"),
            "",
            "Long walk by the river.",
            vec!["garden".into()],
        );
        store.upsert_by_date(date("2024-03-02"), "Quiet day", "", vec!["home".into()]);
        store
    }

    #[test]
    fn list_prints_newest_first_with_snippets() -> TestResult {
        let output = render_list(&small_store(), &ListArgs::default(), 2)?;
        insta::assert_snapshot!(output, @r###"
        2024-03-03  (untitled)
            tags    #garden
            Long walk by the river.

        2024-03-02  Quiet day
            tags    #home

        2024-03-01  Spring errands
            tags    #garden #home
            Bought seeds. Planted tomatoes.
        "###);
        Ok(())
    }

    #[test]
    fn list_requires_every_tag_and_honours_limit() -> TestResult {
        let args = ListArgs {
            tags: vec!["garden".into(), "home".into()],
            ..ListArgs::default()
        };
        let output = render_list(&small_store(), &args, 1)?;
        insta::assert_snapshot!(output, @r###"
        2024-03-01  Spring errands
            tags    #garden #home
            Bought seeds.
        "###);

        let args = ListArgs {
            limit: Some(1),
            ..ListArgs::default()
        };
        let output = render_list(&small_store(), &args, 0)?;
        assert!(output.starts_with("2024-03-03  (untitled)\n"));
        assert!(!output.contains("Quiet day"));
        Ok(())
    }

    #[test]
    fn list_reports_no_matches() -> TestResult {
        let args = ListArgs {
            tags: vec!["travel".into()],
            ..ListArgs::default()
        };
        assert_eq!(render_list(&small_store(), &args, 2)?, "No entries found.\n");
        Ok(())
    }

    #[test]
    fn list_json_carries_plain_dates() -> TestResult {
        let args = ListArgs {
            tags: vec!["design".into()],
            json: true,
            ..ListArgs::default()
        };
        let output = render_list(&EntryStore::with_samples(), &args, 2)?;
        let parsed: serde_json::Value = serde_json::from_str(&output)?;
        let entries = parsed.as_array().expect("array of entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["date"], "2024-06-22");
        assert_eq!(entries[0]["title"], "Collaborating with the Design Team");
        Ok(())
    }

    #[test]
    fn seeded_snippets_are_truncated() -> TestResult {
        let args = ListArgs {
            tags: vec!["teamwork".into()],
            ..ListArgs::default()
        };
        let output = render_list(&EntryStore::with_samples(), &args, 2)?;
        assert!(output.contains(
            "    Today was a great day for collaboration. I spent the afternoon working c…\n"
        ));
        Ok(())
    }

    #[test]
    fn show_prints_full_entry() -> TestResult {
        let args = ShowArgs {
            date: "2024-03-01".into(),
        };
        let output = render_show(&small_store(), &args)?;
        insta::assert_snapshot!(output, @r###"
        Friday, March 1 2024 (2024-03-01)
        Spring errands
        tags: #garden #home

        Bought seeds.

        Planted tomatoes.
        "###);
        Ok(())
    }

    #[test]
    fn show_reports_missing_day() -> TestResult {
        let args = ShowArgs {
            date: "2024-03-09".into(),
        };
        assert_eq!(
            render_show(&small_store(), &args)?,
            "No entry for 2024-03-09\n"
        );
        Ok(())
    }

    #[test]
    fn show_rejects_malformed_dates() {
        let args = ShowArgs {
            date: "03/09/2024".into(),
        };
        let err = render_show(&small_store(), &args).expect_err("bad date");
        assert!(err.to_string().contains("reading date argument `03/09/2024`"));
    }

    #[test]
    fn tags_lists_universe_with_counts() {
        insta::assert_snapshot!(format_tag_universe(&small_store()), @r###"
        #garden (2)
        #home (2)
        "###);
        assert_eq!(format_tag_universe(&EntryStore::new()), "No tags yet.\n");
    }
}
