pub mod metrics;
mod pipeline;

#[cfg(test)]
mod tests;

pub use metrics::{
    commits_by_day, commits_by_week, language_percentages, top_contributors, weekly_from_commits,
    weekly_histogram, weekly_statistics,
};
pub use pipeline::{analyze_repo_async, analyze_repository, summarize, FetchedData};
