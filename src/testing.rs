//! Fixtures shared by unit tests across modules.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::analysis::{summarize, FetchedData};
use crate::github::CommitHistory;
use crate::types::{
    AnalysisResult, CommitRecord, ContributorRecord, RepositoryMetadata, RepositoryRef,
};

pub(crate) fn commit(author: &str, timestamp: DateTime<Utc>, message: &str) -> CommitRecord {
    CommitRecord {
        sha: "2c4e6a8b0d1f3e5a7c9b2d4f6a8c0e1b3d5f7a9c".to_string(),
        author: author.to_string(),
        timestamp,
        message: message.to_string(),
    }
}

pub(crate) fn contributor(login: &str, contributions: u64) -> ContributorRecord {
    ContributorRecord {
        login: login.to_string(),
        contributions,
        kind: "User".to_string(),
    }
}

pub(crate) fn metadata() -> RepositoryMetadata {
    let created = Utc.with_ymd_and_hms(2020, 5, 4, 12, 0, 0).unwrap();
    RepositoryMetadata {
        name: "widgets".to_string(),
        full_name: "octo/widgets".to_string(),
        description: Some("Widgets, sprockets, and more".to_string()),
        stars: 1234,
        forks: 56,
        open_issues: 7,
        watchers: 1234,
        size_kb: 2048,
        created_at: created,
        updated_at: created + Duration::days(1000),
        language: Some("Rust".to_string()),
        default_branch: Some("main".to_string()),
        license: Some("MIT".to_string()),
        topics: vec!["cli".to_string(), "github".to_string()],
        html_url: Some("https://github.com/octo/widgets".to_string()),
    }
}

/// A result with a few months of commits and derived weekly activity.
pub(crate) fn sample_result() -> AnalysisResult {
    let latest = Utc.with_ymd_and_hms(2024, 3, 28, 15, 0, 0).unwrap();
    let records = (0..60)
        .map(|i| {
            let author = ["alice", "bob", "carol"][i % 3];
            commit(author, latest - Duration::hours(i as i64 * 29), &format!("change {i}"))
        })
        .collect();

    let data = FetchedData {
        metadata: metadata(),
        history: CommitHistory {
            records,
            truncated: false,
        },
        contributors: vec![
            contributor("alice", 120),
            contributor("bob", 80),
            contributor("carol", 80),
            contributor("dependabot[bot]", 12),
        ],
        languages: [
            ("Rust".to_string(), 90_000),
            ("Shell".to_string(), 6_000),
            ("Dockerfile".to_string(), 4_000),
        ]
        .into_iter()
        .collect(),
        activity: None,
    };

    let repository = RepositoryRef::new("octo", "widgets").unwrap();
    summarize(repository, data, 10)
}
