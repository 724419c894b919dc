//! # Common Types
//!
//! This module contains the records produced by the GitHub client and the
//! summaries derived from them during one analysis run.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// An owner/name pair identifying a GitHub repository.
///
/// Construct it with [`RepositoryRef::parse`] or [`RepositoryRef::new`]; both
/// reject an empty owner or name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRef {
    pub(crate) owner: String,
    pub(crate) name: String,
}

impl RepositoryRef {
    /// The account or organization owning the repository.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Snapshot of repository metadata, fetched once per analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryMetadata {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub watchers: u64,
    /// Repository size in kilobytes, as reported by GitHub
    pub size_kb: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Primary language, if GitHub detected one
    pub language: Option<String>,
    pub default_branch: Option<String>,
    pub license: Option<String>,
    pub topics: Vec<String>,
    pub html_url: Option<String>,
}

/// A single commit from the commit list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub sha: String,
    /// GitHub login when the commit is linked to an account, otherwise the git author name
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl CommitRecord {
    /// The abbreviated SHA shown in tables and reports.
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// A contributor and the number of contributions GitHub attributes to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorRecord {
    pub login: String,
    pub contributions: u64,
    /// Account type (`User`, `Bot`, ...)
    pub kind: String,
}

/// Language name to number of bytes of code written in it.
pub type LanguageBreakdown = BTreeMap<String, u64>;

/// Commit totals for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyActivity {
    /// First day (Sunday) of the week, UTC
    pub week_start: NaiveDate,
    pub total: u32,
    /// Commits per day, Sunday first
    pub days: [u32; 7],
}

/// Direction of commit activity over the most recent weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityTrend {
    Increasing,
    Decreasing,
    /// Fewer than two weeks of data
    Insufficient,
}

impl fmt::Display for ActivityTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityTrend::Increasing => "Increasing",
            ActivityTrend::Decreasing => "Decreasing",
            ActivityTrend::Insufficient => "Not enough data",
        };
        f.write_str(label)
    }
}

/// Summary statistics over weekly commit totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoStatistics {
    pub total_commits: usize,
    pub average_weekly: f64,
    pub median_weekly: f64,
    pub highest_weekly: u32,
    pub lowest_weekly: u32,
    /// Population standard deviation of the weekly totals
    pub std_dev: f64,
    pub trend: ActivityTrend,
}

/// One bar of the weekly commit distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower bound
    pub start: f64,
    /// Exclusive upper bound, inclusive for the last bin
    pub end: f64,
    pub count: usize,
}

/// Stages of an analysis run, reported while it is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    FetchingMetadata,
    FetchingActivity,
    Aggregating,
    Complete,
}

impl AnalysisStage {
    /// Progress fraction in `0.0..=1.0`.
    pub fn fraction(self) -> f32 {
        match self {
            AnalysisStage::FetchingMetadata => 0.25,
            AnalysisStage::FetchingActivity => 0.5,
            AnalysisStage::Aggregating => 0.75,
            AnalysisStage::Complete => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalysisStage::FetchingMetadata => "Fetching repository metadata...",
            AnalysisStage::FetchingActivity => "Fetching commits, contributors and languages...",
            AnalysisStage::Aggregating => "Aggregating statistics...",
            AnalysisStage::Complete => "Analysis complete!",
        }
    }
}

/// The result of analyzing a GitHub repository.
///
/// This struct contains the typed records fetched from the API together with
/// every series and summary derived from them.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// The repository that was analyzed
    pub repository: RepositoryRef,
    pub metadata: RepositoryMetadata,
    /// Commits, newest first
    pub commits: Vec<CommitRecord>,
    /// Whether the commit history stopped at the page cap
    pub commits_truncated: bool,
    /// All contributors in the order GitHub returned them
    pub contributors: Vec<ContributorRecord>,
    /// Contributors ranked by contribution count
    pub top_contributors: Vec<ContributorRecord>,
    pub languages: LanguageBreakdown,
    pub language_percentages: BTreeMap<String, f64>,
    /// Chronological commit counts per UTC day
    pub commits_by_day: Vec<(NaiveDate, usize)>,
    /// Chronological commit counts per ISO week (keyed by Monday)
    pub commits_by_week: Vec<(NaiveDate, usize)>,
    /// Weekly activity from GitHub's statistics, or derived from commits
    pub weekly_activity: Vec<WeeklyActivity>,
    /// Whether `weekly_activity` was derived from the commit list
    pub weekly_activity_derived: bool,
    pub statistics: Option<RepoStatistics>,
    /// Wall-clock time of the run in seconds
    pub elapsed_time: f64,
}
