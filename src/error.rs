use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// A repository URL that could not be understood. Always fatal, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlParseError {
    #[error("URL is empty")]
    Empty,

    #[error("invalid URL (no scheme): {0}")]
    NoScheme(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("unsupported host: {0}")]
    UnsupportedHost(String),

    #[error("GitHub URL must include owner/repo: {0}")]
    GitHubPath(String),

    #[error("Azure DevOps URL must match {expected}: {url}")]
    AzureDevOpsPath {
        expected: &'static str,
        url: String,
    },
}

/// Failure talking to the GitHub REST API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitHubError {
    #[error("Repository not found. Check the URL, or provide a token for private repos.")]
    NotFound,

    #[error("Authentication failed. Check your GitHub token.")]
    AuthFailed,

    #[error("Access denied. The token may lack permissions, or rate limit exceeded.")]
    AccessDenied,

    #[error("GitHub API rate limit exceeded. Resets in {} seconds.", reset_wait(.reset_at))]
    RateLimited { reset_at: u64 },

    #[error("GitHub request failed: {0}")]
    Http(String),
}

/// Failure talking to the Azure DevOps REST API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AzureDevOpsError {
    #[error("Repository not found. Check the URL, or provide a PAT for private repos.")]
    NotFound,

    #[error("Authentication failed. Check your Personal Access Token.")]
    AuthFailed,

    #[error("Access denied. The PAT may lack permissions.")]
    AccessDenied,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Azure DevOps request failed: {0}")]
    Http(String),
}

/// Provider-level failure, either flavor. The common currency of the
/// `RepoProvider` trait and the fetch orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    AzureDevOps(#[from] AzureDevOpsError),
}

impl ProviderError {
    /// Rate-limit errors abort a fetch pass outright: never retried and
    /// never recorded as a per-file error.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ProviderError::GitHub(GitHubError::RateLimited { .. }))
    }

    /// Unix timestamp at which the quota resets, when known.
    pub fn rate_limit_reset(&self) -> Option<u64> {
        match self {
            ProviderError::GitHub(GitHubError::RateLimited { reset_at }) => Some(*reset_at),
            _ => None,
        }
    }
}

/// Transport-level HTTP failure (connect, timeout, invalid response).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HttpError(pub String);

fn reset_wait(reset_at: &u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    reset_at.saturating_sub(now)
}
