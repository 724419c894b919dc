use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use super::records::{
    commits_from_raw, contributors_from_raw, languages_from_raw, metadata_from_raw,
    weekly_activity_from_raw, RawCommit, RawContributor, RawRepository, RawWeek,
};
use super::Endpoint;
use crate::config::GitHubConfig;
use crate::error::{Error, Result};
use crate::types::{
    CommitRecord, ContributorRecord, LanguageBreakdown, RepositoryMetadata, RepositoryRef,
    WeeklyActivity,
};

const API_VERSION: &str = "2022-11-28";

/// Commits fetched for a repository.
#[derive(Debug, Clone, Default)]
pub struct CommitHistory {
    /// Newest first, as GitHub returns them
    pub records: Vec<CommitRecord>,
    /// The page cap stopped the walk while more pages remained
    pub truncated: bool,
}

/// Items collected from a paginated list endpoint.
struct Listing<T> {
    items: Vec<T>,
    truncated: bool,
}

/// GitHub REST API client.
///
/// Holds no state between calls besides the connection pool; every method
/// issues fresh requests.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    per_page: u8,
    page_limit: Option<u32>,
}

impl GitHubClient {
    /// Create a client from explicit settings. The token, when present, is
    /// sent as a bearer token on every request.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        if config.has_token() {
            let token = config.token.as_deref().unwrap_or_default().trim();
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                Error::Config("API token contains characters not allowed in a header".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            page_limit: config.page_limit(),
        })
    }

    fn url(&self, repo: &RepositoryRef, endpoint: Endpoint) -> String {
        format!("{}{}", self.api_base, endpoint.path(repo))
    }

    async fn send(&self, endpoint: Endpoint, url: &str, first_page: bool) -> Result<Response> {
        tracing::debug!(%endpoint, url, "GET");
        let mut request = self.http.get(url);
        if first_page && endpoint.is_paginated() {
            request = request.query(&[("per_page", self.per_page)]);
        }
        request.send().await.map_err(|e| transport_error(endpoint, &e))
    }

    /// Pass 2xx responses through; turn everything else into the matching error.
    async fn ensure_success(
        &self,
        repo: &RepositoryRef,
        endpoint: Endpoint,
        response: Response,
    ) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

        let error = failure_for_status(repo, endpoint, status, &headers, &message);
        tracing::debug!(%endpoint, status = status.as_u16(), %error, "request failed");
        Err(error)
    }

    /// Fetch one page of an endpoint as raw JSON.
    ///
    /// Responses without a body (`202 Accepted`, `204 No Content`) yield
    /// `Value::Null`.
    pub async fn fetch(
        &self,
        repo: &RepositoryRef,
        endpoint: Endpoint,
    ) -> Result<serde_json::Value> {
        let response = self.send(endpoint, &self.url(repo, endpoint), true).await?;
        let response = self.ensure_success(repo, endpoint, response).await?;
        if matches!(response.status(), StatusCode::ACCEPTED | StatusCode::NO_CONTENT) {
            return Ok(serde_json::Value::Null);
        }
        decode(endpoint, response).await
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        repo: &RepositoryRef,
        endpoint: Endpoint,
    ) -> Result<Listing<T>> {
        let mut url = self.url(repo, endpoint);
        let mut items = Vec::new();
        let mut pages = 0u32;
        let mut truncated = false;

        loop {
            let response = self.send(endpoint, &url, pages == 0).await?;

            // An empty git repository has no commit list
            if endpoint == Endpoint::Commits && response.status() == StatusCode::CONFLICT {
                tracing::info!(%repo, "repository is empty");
                break;
            }

            let response = self.ensure_success(repo, endpoint, response).await?;
            if response.status() == StatusCode::NO_CONTENT {
                break;
            }

            let next = next_page_link(response.headers());
            let page: Vec<T> = decode(endpoint, response).await?;
            pages += 1;
            tracing::debug!(%endpoint, page = pages, items = page.len(), "page received");
            items.extend(page);

            match next {
                Some(next) if self.page_limit.is_some_and(|limit| pages >= limit) => {
                    tracing::warn!(
                        %endpoint,
                        pages,
                        next = %next,
                        "stopping at page limit, results are incomplete"
                    );
                    truncated = true;
                    break;
                }
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(Listing { items, truncated })
    }

    /// Repository metadata.
    pub async fn repository(&self, repo: &RepositoryRef) -> Result<RepositoryMetadata> {
        let endpoint = Endpoint::Metadata;
        let response = self.send(endpoint, &self.url(repo, endpoint), true).await?;
        let response = self.ensure_success(repo, endpoint, response).await?;
        let raw: RawRepository = decode(endpoint, response).await?;
        metadata_from_raw(raw)
    }

    /// Commit history on the default branch, newest first.
    pub async fn commits(&self, repo: &RepositoryRef) -> Result<CommitHistory> {
        let listing = self.fetch_list::<RawCommit>(repo, Endpoint::Commits).await?;
        Ok(CommitHistory {
            records: commits_from_raw(listing.items)?,
            truncated: listing.truncated,
        })
    }

    /// Contributors as GitHub lists them.
    ///
    /// Unlike commits, contributor counts come precomputed from GitHub, so a
    /// truncated list still carries exact counts for everyone on it.
    pub async fn contributors(&self, repo: &RepositoryRef) -> Result<Vec<ContributorRecord>> {
        let listing = self
            .fetch_list::<RawContributor>(repo, Endpoint::Contributors)
            .await?;
        contributors_from_raw(listing.items)
    }

    /// Bytes of code per language.
    pub async fn languages(&self, repo: &RepositoryRef) -> Result<LanguageBreakdown> {
        let endpoint = Endpoint::Languages;
        let response = self.send(endpoint, &self.url(repo, endpoint), true).await?;
        let response = self.ensure_success(repo, endpoint, response).await?;
        let raw: HashMap<String, serde_json::Value> = decode(endpoint, response).await?;
        languages_from_raw(raw)
    }

    /// Weekly commit totals for the last year.
    ///
    /// Returns `None` while GitHub is still computing the statistics
    /// (`202 Accepted`) or when it answers without data.
    pub async fn commit_activity(
        &self,
        repo: &RepositoryRef,
    ) -> Result<Option<Vec<WeeklyActivity>>> {
        let body = self.fetch(repo, Endpoint::CommitActivity).await?;
        match body {
            serde_json::Value::Array(weeks) if !weeks.is_empty() => {
                let raw: Vec<RawWeek> = serde_json::from_value(serde_json::Value::Array(weeks))
                    .map_err(|e| {
                        Error::malformed(
                            format!("{} response", Endpoint::CommitActivity),
                            format!("could not be decoded: {e}"),
                        )
                    })?;
                weekly_activity_from_raw(raw).map(Some)
            }
            _ => {
                tracing::debug!(%repo, "commit activity statistics not available yet");
                Ok(None)
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(endpoint: Endpoint, response: Response) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(endpoint, &e))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        Error::malformed(format!("{endpoint} response"), format!("could not be decoded: {e}"))
    })
}

fn transport_error(endpoint: Endpoint, err: &reqwest::Error) -> Error {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    Error::RequestFailed {
        endpoint,
        status: err.status().map(|s| s.as_u16()),
        message,
    }
}

/// Map a non-success response onto the error taxonomy.
pub(crate) fn failure_for_status(
    repo: &RepositoryRef,
    endpoint: Endpoint,
    status: StatusCode,
    headers: &HeaderMap,
    message: &str,
) -> Error {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let retry_after = header(RETRY_AFTER.as_str())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .or_else(|| {
            let reset = header("x-ratelimit-reset")?.trim().parse::<i64>().ok()?;
            let wait = (reset - Utc::now().timestamp()).max(0);
            Some(Duration::from_secs(wait.unsigned_abs()))
        });

    let exhausted = header("x-ratelimit-remaining").is_some_and(|v| v.trim() == "0");
    let secondary = header(RETRY_AFTER.as_str()).is_some();

    match status {
        StatusCode::NOT_FOUND => Error::RepositoryNotFound(repo.to_string()),
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited { retry_after },
        StatusCode::FORBIDDEN if exhausted || secondary => Error::RateLimited { retry_after },
        _ => Error::RequestFailed {
            endpoint,
            status: Some(status.as_u16()),
            message: message.to_string(),
        },
    }
}

/// Target of the `rel="next"` entry in a `Link` header.
pub(crate) fn next_page_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        if !parts.any(|param| param.trim() == r#"rel="next""#) {
            return None;
        }
        target
            .strip_prefix('<')?
            .strip_suffix('>')
            .map(str::to_string)
    })
}
