//! Wire shapes of GitHub responses and their conversion into typed records.
//!
//! Every field the API might omit is optional here, so a missing value turns
//! into a `MalformedRecord` naming the field instead of an opaque decode
//! error. Collections convert all-or-nothing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{
    CommitRecord, ContributorRecord, LanguageBreakdown, RepositoryMetadata, WeeklyActivity,
};

#[derive(Debug, Deserialize)]
pub struct RawRepository {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub open_issues_count: Option<u64>,
    pub watchers_count: Option<u64>,
    pub size: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub language: Option<String>,
    pub default_branch: Option<String>,
    pub license: Option<RawLicense>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawLicense {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCommit {
    pub sha: Option<String>,
    pub commit: Option<RawCommitDetail>,
    /// The linked GitHub account; `null` when the author email matches no account
    pub author: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
pub struct RawCommitDetail {
    pub author: Option<RawGitActor>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawGitActor {
    pub name: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub login: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawContributor {
    pub login: Option<String>,
    pub contributions: Option<u64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawWeek {
    /// Unix timestamp of the Sunday starting the week
    pub week: Option<i64>,
    pub total: Option<u32>,
    #[serde(default)]
    pub days: Vec<u32>,
}

fn parse_timestamp(field: &str, value: Option<&str>) -> Result<DateTime<Utc>> {
    let value = value.ok_or_else(|| Error::missing(field))?;
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::malformed(field, format!("is not an RFC 3339 timestamp: {e}")))
}

/// Convert the repository object.
pub fn metadata_from_raw(raw: RawRepository) -> Result<RepositoryMetadata> {
    let name = raw
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::missing("name"))?;
    let created_at = parse_timestamp("created_at", raw.created_at.as_deref())?;
    let updated_at = parse_timestamp("updated_at", raw.updated_at.as_deref())?;

    Ok(RepositoryMetadata {
        full_name: raw.full_name.unwrap_or_else(|| name.clone()),
        name,
        description: raw.description.filter(|d| !d.trim().is_empty()),
        stars: raw.stargazers_count.ok_or_else(|| Error::missing("stargazers_count"))?,
        forks: raw.forks_count.ok_or_else(|| Error::missing("forks_count"))?,
        open_issues: raw
            .open_issues_count
            .ok_or_else(|| Error::missing("open_issues_count"))?,
        watchers: raw.watchers_count.unwrap_or_default(),
        size_kb: raw.size.unwrap_or_default(),
        created_at,
        updated_at,
        language: raw.language,
        default_branch: raw.default_branch,
        license: raw.license.and_then(|l| l.name),
        topics: raw.topics,
        html_url: raw.html_url,
    })
}

fn commit_from_raw(index: usize, raw: RawCommit) -> Result<CommitRecord> {
    let field = |name: &str| format!("commits[{index}].{name}");

    let sha = raw
        .sha
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::missing(field("sha")))?;
    let detail = raw.commit.ok_or_else(|| Error::missing(field("commit")))?;
    let git_author = detail
        .author
        .ok_or_else(|| Error::missing(field("commit.author")))?;
    let timestamp = parse_timestamp(&field("commit.author.date"), git_author.date.as_deref())?;
    let message = detail
        .message
        .ok_or_else(|| Error::missing(field("commit.message")))?;

    let author = raw
        .author
        .and_then(|user| user.login)
        .filter(|login| !login.is_empty())
        .or(git_author.name.filter(|name| !name.is_empty()))
        .ok_or_else(|| Error::missing(field("commit.author.name")))?;

    Ok(CommitRecord {
        sha,
        author,
        timestamp,
        message,
    })
}

/// Convert a commit list, failing on the first malformed element.
pub fn commits_from_raw(raw: Vec<RawCommit>) -> Result<Vec<CommitRecord>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, commit)| commit_from_raw(index, commit))
        .collect()
}

/// Convert a contributor list, failing on the first malformed element.
pub fn contributors_from_raw(raw: Vec<RawContributor>) -> Result<Vec<ContributorRecord>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, contributor)| {
            let login = contributor
                .login
                .filter(|login| !login.is_empty())
                .ok_or_else(|| Error::missing(format!("contributors[{index}].login")))?;
            let contributions = contributor.contributions.ok_or_else(|| {
                Error::missing(format!("contributors[{index}].contributions"))
            })?;
            Ok(ContributorRecord {
                login,
                contributions,
                kind: contributor.kind.unwrap_or_else(|| "User".to_string()),
            })
        })
        .collect()
}

/// Convert the language object; every value must be a non-negative byte count.
pub fn languages_from_raw(raw: HashMap<String, serde_json::Value>) -> Result<LanguageBreakdown> {
    raw.into_iter()
        .map(|(language, bytes)| {
            let count = bytes.as_u64().ok_or_else(|| {
                Error::malformed(
                    format!("languages.{language}"),
                    format!("is not a byte count: {bytes}"),
                )
            })?;
            Ok((language, count))
        })
        .collect()
}

/// Convert the weekly commit activity list.
pub fn weekly_activity_from_raw(raw: Vec<RawWeek>) -> Result<Vec<WeeklyActivity>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, week)| {
            let timestamp = week
                .week
                .ok_or_else(|| Error::missing(format!("weeks[{index}].week")))?;
            let week_start: NaiveDate = DateTime::<Utc>::from_timestamp(timestamp, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    Error::malformed(format!("weeks[{index}].week"), "is out of range")
                })?;
            let total = week
                .total
                .ok_or_else(|| Error::missing(format!("weeks[{index}].total")))?;

            let mut days = [0u32; 7];
            if !week.days.is_empty() {
                if week.days.len() != 7 {
                    return Err(Error::malformed(
                        format!("weeks[{index}].days"),
                        format!("has {} entries, expected 7", week.days.len()),
                    ));
                }
                days.copy_from_slice(&week.days);
            }

            Ok(WeeklyActivity {
                week_start,
                total,
                days,
            })
        })
        .collect()
}
