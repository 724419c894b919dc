use url::Url;

use crate::error::{Error, Result};
use crate::types::RepositoryRef;

const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

impl RepositoryRef {
    /// Build a reference from its parts, checking both are usable in an API path.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let name = name.into();
        let input = format!("{owner}/{name}");

        if owner.is_empty() {
            return Err(invalid(&input, "owner is empty"));
        }
        if name.is_empty() {
            return Err(invalid(&input, "repository name is empty"));
        }
        if !owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid(&input, "owner may only contain letters, digits and '-'"));
        }
        if name == "." || name == ".." {
            return Err(invalid(&input, "repository name is reserved"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(invalid(
                &input,
                "repository name may only contain letters, digits, '-', '_' and '.'",
            ));
        }

        Ok(Self { owner, name })
    }

    /// Parse a repository URL or an `owner/name` string.
    ///
    /// Accepted forms:
    /// - `https://github.com/owner/name` (optionally with `.git`, a trailing
    ///   slash, or further path segments such as `/tree/main`)
    /// - `github.com/owner/name`
    /// - `git@github.com:owner/name.git`
    /// - `owner/name`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid(input, "no repository given"));
        }

        if let Some(path) = trimmed.strip_prefix("git@github.com:") {
            return Self::from_segments(input, path.split('/'), true);
        }

        if trimmed.contains("://") {
            return Self::from_url(input, trimmed);
        }

        // Hosts are case-insensitive, as `Url` treats them
        let lowered = trimmed.to_ascii_lowercase();
        if GITHUB_HOSTS
            .iter()
            .any(|host| lowered.starts_with(&format!("{host}/")))
        {
            return Self::from_url(input, &format!("https://{trimmed}"));
        }

        Self::from_segments(input, trimmed.trim_end_matches('/').split('/'), true)
    }

    fn from_url(input: &str, candidate: &str) -> Result<Self> {
        let url = Url::parse(candidate).map_err(|e| invalid(input, &format!("not a URL: {e}")))?;

        match url.host_str() {
            Some(host) if GITHUB_HOSTS.contains(&host) => {}
            Some(host) => return Err(invalid(input, &format!("'{host}' is not github.com"))),
            None => return Err(invalid(input, "URL has no host")),
        }

        let segments = url
            .path_segments()
            .ok_or_else(|| invalid(input, "URL has no path"))?
            .filter(|segment| !segment.is_empty());

        Self::from_segments(input, segments, false)
    }

    /// Takes the first two segments; with `exact`, any further segment is an error.
    fn from_segments<'a>(
        input: &str,
        mut segments: impl Iterator<Item = &'a str>,
        exact: bool,
    ) -> Result<Self> {
        let owner = segments.next().unwrap_or_default();
        let name = segments.next().unwrap_or_default();

        if owner.is_empty() || name.is_empty() {
            return Err(invalid(input, "expected owner/name"));
        }
        if exact && segments.next().is_some() {
            return Err(invalid(input, "expected exactly owner/name"));
        }

        let name = name.strip_suffix(".git").unwrap_or(name);
        Self::new(owner, name).map_err(|e| match e {
            Error::InvalidReference { reason, .. } => invalid(input, &reason),
            other => other,
        })
    }
}

fn invalid(input: &str, reason: &str) -> Error {
    Error::InvalidReference {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
