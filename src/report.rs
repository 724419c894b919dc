//! Text and CSV renderings of an analysis result.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::AnalysisResult;

const CSV_HEADER: &str = "Category,Item,Value,Date";
const EXPORTED_CONTRIBUTORS: usize = 10;
const EXPORTED_COMMITS: usize = 20;
const MAX_MESSAGE_CHARS: usize = 100;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Quote a CSV field when it holds a separator, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

fn push_row(out: &mut String, category: &str, item: &str, value: &str, date: &str) {
    let _ = writeln!(
        out,
        "{},{},{},{}",
        escape_field(category),
        escape_field(item),
        escape_field(value),
        escape_field(date)
    );
}

/// Metadata rows as (label, value) pairs, in display order.
pub fn metadata_rows(result: &AnalysisResult) -> Vec<(&'static str, String)> {
    let meta = &result.metadata;
    let or_none = |value: &Option<String>| value.clone().unwrap_or_else(|| "None".to_string());
    vec![
        ("Name", meta.name.clone()),
        ("Full Name", meta.full_name.clone()),
        ("Description", or_none(&meta.description)),
        ("Stars", meta.stars.to_string()),
        ("Forks", meta.forks.to_string()),
        ("Open Issues", meta.open_issues.to_string()),
        ("Watchers", meta.watchers.to_string()),
        ("Size (KB)", meta.size_kb.to_string()),
        ("Created", meta.created_at.format(DATE_FORMAT).to_string()),
        ("Last Updated", meta.updated_at.format(DATE_FORMAT).to_string()),
        ("Language", or_none(&meta.language)),
        ("Default Branch", or_none(&meta.default_branch)),
        ("License", or_none(&meta.license)),
        ("Topics", meta.topics.join(", ")),
        ("URL", or_none(&meta.html_url)),
    ]
}

/// Build the CSV report. `generated_at` stamps the metadata and contributor rows.
pub fn csv_report<Tz: TimeZone>(result: &AnalysisResult, generated_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = generated_at.format(DATE_FORMAT).to_string();
    let mut out = String::new();
    let _ = writeln!(out, "{CSV_HEADER}");

    for (item, value) in metadata_rows(result) {
        push_row(&mut out, "Metadata", item, &value, &stamp);
    }
    for contributor in result.top_contributors.iter().take(EXPORTED_CONTRIBUTORS) {
        push_row(
            &mut out,
            "Contributors",
            &contributor.login,
            &contributor.contributions.to_string(),
            &stamp,
        );
    }
    for commit in result.commits.iter().take(EXPORTED_COMMITS) {
        push_row(
            &mut out,
            "Commits",
            &commit.sha,
            &truncate_message(&commit.message),
            &commit.timestamp.format(DATE_FORMAT).to_string(),
        );
    }
    out
}

/// Report file name for a given local time, `github_analysis_YYYYMMDD_HHMMSS.csv`.
pub fn report_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("github_analysis_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Write the CSV report into `dir`, creating it when needed.
pub fn write_csv_report(result: &AnalysisResult, dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(&now));
    std::fs::write(&path, csv_report(result, &now))?;
    tracing::info!(path = %path.display(), "wrote CSV report");
    Ok(path)
}

/// Plain-text summary printed in headless mode.
pub fn text_summary(result: &AnalysisResult, recent_commits: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Repository: {}", result.repository);
    for (label, value) in metadata_rows(result) {
        let _ = writeln!(out, "  {label:<15} {value}");
    }

    let _ = writeln!(out, "\nTop contributors:");
    if result.top_contributors.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (rank, contributor) in result.top_contributors.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<24} {:>6}  {}",
            rank + 1,
            contributor.login,
            contributor.contributions,
            contributor.kind
        );
    }

    let _ = writeln!(out, "\nLanguages:");
    if result.language_percentages.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    let mut languages: Vec<_> = result.language_percentages.iter().collect();
    languages.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (language, percent) in languages {
        let _ = writeln!(out, "  {language:<24} {percent:>5.1}%");
    }

    let _ = writeln!(out, "\nActivity:");
    let _ = writeln!(
        out,
        "  {} commits fetched{}",
        result.commits.len(),
        if result.commits_truncated {
            " (history truncated)"
        } else {
            ""
        }
    );
    if let (Some((first, _)), Some((last, _))) =
        (result.commits_by_day.first(), result.commits_by_day.last())
    {
        let _ = writeln!(out, "  active from {first} to {last}");
    }
    match &result.statistics {
        Some(stats) => {
            let source = if result.weekly_activity_derived {
                "derived from commits"
            } else {
                "from GitHub"
            };
            let _ = writeln!(out, "  weekly statistics ({source}):");
            let _ = writeln!(
                out,
                "    average {:.2}, median {:.1}",
                stats.average_weekly, stats.median_weekly
            );
            let _ = writeln!(
                out,
                "    highest {}, lowest {}, std dev {:.2}",
                stats.highest_weekly, stats.lowest_weekly, stats.std_dev
            );
            let _ = writeln!(out, "    recent trend: {}", stats.trend);
        }
        None => {
            let _ = writeln!(out, "  no weekly activity");
        }
    }

    if recent_commits > 0 && !result.commits.is_empty() {
        let _ = writeln!(out, "\nRecent commits:");
        for commit in result.commits.iter().take(recent_commits) {
            let _ = writeln!(
                out,
                "  {} {} {:<16} {}",
                commit.short_sha(),
                commit.timestamp.format("%Y-%m-%d"),
                commit.author,
                commit.summary()
            );
        }
    }

    let _ = writeln!(out, "\nAnalysis took {:.2}s", result.elapsed_time);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{commit, sample_result};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_truncate_message() {
        let long = "x".repeat(150);
        assert_eq!(truncate_message(&long), format!("{}...", "x".repeat(100)));
        assert_eq!(truncate_message(&"y".repeat(100)), "y".repeat(100));
        // Multi-byte characters are counted as characters
        let accented = "é".repeat(101);
        assert_eq!(
            truncate_message(&accented),
            format!("{}...", "é".repeat(100))
        );
    }

    #[test]
    fn test_csv_report_layout() {
        let result = sample_result();
        let csv = csv_report(&result, &generated());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Category,Item,Value,Date");
        assert_eq!(lines[1], "Metadata,Name,widgets,2024-04-01 08:30:00");
        assert!(lines.contains(
            &"Metadata,Description,\"Widgets, sprockets, and more\",2024-04-01 08:30:00"
        ));
        assert!(lines.contains(&"Contributors,alice,120,2024-04-01 08:30:00"));

        let metadata = lines.iter().filter(|l| l.starts_with("Metadata,")).count();
        let contributors = lines
            .iter()
            .filter(|l| l.starts_with("Contributors,"))
            .count();
        let commits = lines.iter().filter(|l| l.starts_with("Commits,")).count();
        assert_eq!(metadata, metadata_rows(&result).len());
        assert_eq!(contributors, 4);
        assert_eq!(commits, 20);
    }

    #[test]
    fn test_csv_report_commit_rows() {
        let mut result = sample_result();
        result.commits = vec![commit("alice", generated(), &format!("fix: {}", "z".repeat(120)))];

        let csv = csv_report(&result, &generated());
        let row = csv.lines().last().unwrap();
        assert!(row.starts_with(
            "Commits,2c4e6a8b0d1f3e5a7c9b2d4f6a8c0e1b3d5f7a9c,fix: z"
        ));
        assert!(row.ends_with("...,2024-04-01 08:30:00"));
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name(&generated()),
            "github_analysis_20240401_083000.csv"
        );
    }

    #[test]
    fn test_write_csv_report() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("reports");
        let result = sample_result();

        let path = write_csv_report(&result, &target).unwrap();
        assert!(path.starts_with(&target));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("github_analysis_") && name.ends_with(".csv"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(CSV_HEADER));
    }

    #[test]
    fn test_text_summary() {
        let result = sample_result();
        let summary = text_summary(&result, 3);

        assert!(summary.starts_with("Repository: octo/widgets\n"));
        assert!(summary.contains("Top contributors:"));
        assert!(summary.contains("alice"));
        assert!(summary.contains("Rust"));
        assert!(summary.contains("60 commits fetched"));
        assert!(summary.contains("derived from commits"));
        assert_eq!(summary.matches("change ").count(), 3);
    }
}
