use std::time::Instant;
use tokio::sync::mpsc;

use super::metrics;
use crate::config::Config;
use crate::error::Result;
use crate::github::{CommitHistory, GitHubClient};
use crate::types::{
    AnalysisResult, AnalysisStage, ContributorRecord, LanguageBreakdown, RepositoryMetadata,
    RepositoryRef, WeeklyActivity,
};

/// Everything fetched from GitHub for one run, before aggregation.
#[derive(Debug, Clone)]
pub struct FetchedData {
    pub metadata: RepositoryMetadata,
    pub history: CommitHistory,
    pub contributors: Vec<ContributorRecord>,
    pub languages: LanguageBreakdown,
    /// GitHub's weekly statistics, when they were ready
    pub activity: Option<Vec<WeeklyActivity>>,
}

async fn report(progress: &Option<mpsc::Sender<AnalysisStage>>, stage: AnalysisStage) {
    tracing::debug!(stage = stage.label(), "analysis progress");
    if let Some(tx) = progress {
        // The receiver going away only means nobody is watching
        let _ = tx.send(stage).await;
    }
}

/// Derive every series and summary from fetched records.
pub fn summarize(repository: RepositoryRef, data: FetchedData, top_n: usize) -> AnalysisResult {
    let FetchedData {
        metadata,
        history,
        contributors,
        languages,
        activity,
    } = data;

    let (weekly_activity, weekly_activity_derived) = match activity {
        Some(weeks) => (weeks, false),
        None => (metrics::weekly_from_commits(&history.records), true),
    };

    AnalysisResult {
        top_contributors: metrics::top_contributors(&contributors, top_n),
        language_percentages: metrics::language_percentages(&languages),
        commits_by_day: metrics::commits_by_day(&history.records),
        commits_by_week: metrics::commits_by_week(&history.records),
        statistics: metrics::weekly_statistics(history.records.len(), &weekly_activity),
        repository,
        metadata,
        commits: history.records,
        commits_truncated: history.truncated,
        contributors,
        languages,
        weekly_activity,
        weekly_activity_derived,
        elapsed_time: 0.0,
    }
}

/// Fetch and aggregate everything shown for `repository`.
///
/// Metadata is requested first so a missing repository fails before any
/// other request is made; the remaining endpoints are fetched concurrently.
pub async fn analyze_repository(
    client: &GitHubClient,
    repository: RepositoryRef,
    top_n: usize,
    progress: Option<mpsc::Sender<AnalysisStage>>,
) -> Result<AnalysisResult> {
    let start_time = Instant::now();
    tracing::info!(%repository, "starting analysis");

    report(&progress, AnalysisStage::FetchingMetadata).await;
    let metadata = client.repository(&repository).await?;

    report(&progress, AnalysisStage::FetchingActivity).await;
    let (history, contributors, languages, activity) = futures::try_join!(
        client.commits(&repository),
        client.contributors(&repository),
        client.languages(&repository),
        client.commit_activity(&repository),
    )?;

    if history.truncated {
        tracing::warn!(
            %repository,
            commits = history.records.len(),
            "commit history truncated at the page limit"
        );
    }
    if activity.is_none() {
        tracing::warn!(%repository, "weekly statistics unavailable, deriving them from commits");
    }

    report(&progress, AnalysisStage::Aggregating).await;
    let data = FetchedData {
        metadata,
        history,
        contributors,
        languages,
        activity,
    };
    let mut result = summarize(repository, data, top_n);
    result.elapsed_time = start_time.elapsed().as_secs_f64();

    report(&progress, AnalysisStage::Complete).await;
    tracing::info!(
        repository = %result.repository,
        commits = result.commits.len(),
        contributors = result.contributors.len(),
        elapsed = result.elapsed_time,
        "analysis complete"
    );
    Ok(result)
}

/// Analyze a repository given as a URL or `owner/name`.
pub async fn analyze_repo_async(
    input: String,
    config: Config,
    progress: Option<mpsc::Sender<AnalysisStage>>,
) -> Result<AnalysisResult> {
    let repository = RepositoryRef::parse(&input)?;
    let client = GitHubClient::new(&config.github)?;
    analyze_repository(&client, repository, config.display.top_contributors, progress).await
}
