mod client;
mod records;
mod reference;

use std::fmt;

pub use client::{CommitHistory, GitHubClient};

/// The GitHub REST endpoints queried for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /repos/{owner}/{repo}`
    Metadata,
    /// `GET /repos/{owner}/{repo}/commits`
    Commits,
    /// `GET /repos/{owner}/{repo}/contributors`
    Contributors,
    /// `GET /repos/{owner}/{repo}/languages`
    Languages,
    /// `GET /repos/{owner}/{repo}/stats/commit_activity`
    CommitActivity,
}

impl Endpoint {
    /// Path below the API root for `repo`.
    pub fn path(self, repo: &crate::types::RepositoryRef) -> String {
        let base = format!("/repos/{}/{}", repo.owner(), repo.name());
        match self {
            Endpoint::Metadata => base,
            Endpoint::Commits => format!("{base}/commits"),
            Endpoint::Contributors => format!("{base}/contributors"),
            Endpoint::Languages => format!("{base}/languages"),
            Endpoint::CommitActivity => format!("{base}/stats/commit_activity"),
        }
    }

    /// Whether the endpoint returns a paginated list.
    pub fn is_paginated(self) -> bool {
        matches!(self, Endpoint::Commits | Endpoint::Contributors)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Metadata => "repository metadata",
            Endpoint::Commits => "commits",
            Endpoint::Contributors => "contributors",
            Endpoint::Languages => "languages",
            Endpoint::CommitActivity => "commit activity",
        };
        f.write_str(name)
    }
}
