use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::UrlParseError;
use crate::types::{ProviderKind, RepoInfo};

// version=GBmy/branch or version=GBmain&other=x
static AZDO_BRANCH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"version=GB(.+?)(?:&|$)").unwrap());

/// Parse a repository URL and detect the hosting provider.
///
/// Supported forms:
///   - `https://github.com/owner/repo`
///   - `https://github.com/owner/repo/tree/branch/with/slashes`
///   - `https://dev.azure.com/org/project/_git/repo[?version=GBbranch]`
///   - `https://org.visualstudio.com/project/_git/repo[?version=GBbranch]`
pub fn parse_repo_url(raw: &str) -> Result<RepoInfo, UrlParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlParseError::Empty);
    }

    let parsed = Url::parse(trimmed).map_err(|_| UrlParseError::NoScheme(trimmed.to_string()))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(UrlParseError::UnsupportedScheme(scheme.to_string()));
    }

    let host = parsed.host_str().unwrap_or("");
    let path = parsed.path().trim_matches('/');
    let query = parsed.query().unwrap_or("");

    if host == "github.com" {
        parse_github(path, trimmed)
    } else if host == "dev.azure.com" {
        parse_azure_devops(path, query, trimmed)
    } else if let Some(org) = host.strip_suffix(".visualstudio.com") {
        parse_azure_devops_legacy(org, host, path, query, trimmed)
    } else {
        Err(UrlParseError::UnsupportedHost(host.to_string()))
    }
}

// path: owner/repo[/tree/branch[/...]]
fn parse_github(path: &str, raw_url: &str) -> Result<RepoInfo, UrlParseError> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(UrlParseError::GitHubPath(raw_url.to_string()));
    }

    let owner = parts[0];
    let repo = parts[1].strip_suffix(".git").unwrap_or(parts[1]);

    // Everything after /tree/ is the branch name; branch names may contain
    // slashes, so the capture is greedy to the end of the path.
    let branch = if parts.len() >= 4 && parts[2] == "tree" {
        Some(parts[3..].join("/"))
    } else {
        None
    };

    Ok(RepoInfo {
        provider: ProviderKind::GitHub,
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch,
        project: None,
        api_host: "github.com".to_string(),
        raw_url: raw_url.to_string(),
    })
}

// path: org/project/_git/repo
fn parse_azure_devops(path: &str, query: &str, raw_url: &str) -> Result<RepoInfo, UrlParseError> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 4 || parts[2] != "_git" {
        return Err(UrlParseError::AzureDevOpsPath {
            expected: "org/project/_git/repo",
            url: raw_url.to_string(),
        });
    }

    Ok(RepoInfo {
        provider: ProviderKind::AzureDevOps,
        owner: parts[0].to_string(),
        repo: parts[3].to_string(),
        branch: extract_azdo_branch(query),
        project: Some(parts[1].to_string()),
        api_host: "dev.azure.com".to_string(),
        raw_url: raw_url.to_string(),
    })
}

// Legacy form: the org is the subdomain, path: project/_git/repo
fn parse_azure_devops_legacy(
    org: &str,
    host: &str,
    path: &str,
    query: &str,
    raw_url: &str,
) -> Result<RepoInfo, UrlParseError> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 3 || parts[1] != "_git" {
        return Err(UrlParseError::AzureDevOpsPath {
            expected: "project/_git/repo",
            url: raw_url.to_string(),
        });
    }

    Ok(RepoInfo {
        provider: ProviderKind::AzureDevOps,
        owner: org.to_string(),
        repo: parts[2].to_string(),
        branch: extract_azdo_branch(query),
        project: Some(parts[0].to_string()),
        api_host: host.to_string(),
        raw_url: raw_url.to_string(),
    })
}

/// Branch from an Azure DevOps query string, `None` if the URL names none.
/// Never returns an empty string.
fn extract_azdo_branch(query: &str) -> Option<String> {
    AZDO_BRANCH_PATTERN
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_basic() {
        let info = parse_repo_url("https://github.com/owner/repo").unwrap();
        assert_eq!(info.provider, ProviderKind::GitHub);
        assert_eq!(info.owner, "owner");
        assert_eq!(info.repo, "repo");
        assert_eq!(info.branch, None);
        assert_eq!(info.project, None);
    }

    #[test]
    fn test_github_with_branch() {
        let info = parse_repo_url("https://github.com/owner/repo/tree/main").unwrap();
        assert_eq!(info.branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_github_branch_with_slashes() {
        let info = parse_repo_url("https://github.com/owner/repo/tree/feature/my-branch").unwrap();
        assert_eq!(info.branch.as_deref(), Some("feature/my-branch"));
    }

    #[test]
    fn test_github_dot_git_suffix() {
        let info = parse_repo_url("https://github.com/owner/repo.git").unwrap();
        assert_eq!(info.repo, "repo");
    }

    #[test]
    fn test_github_trailing_slash() {
        let info = parse_repo_url("https://github.com/owner/repo/").unwrap();
        assert_eq!(info.repo, "repo");
    }

    #[test]
    fn test_whitespace_stripped() {
        let info = parse_repo_url("  https://github.com/owner/repo  ").unwrap();
        assert_eq!(info.repo, "repo");
        assert_eq!(info.raw_url, "https://github.com/owner/repo");
    }

    #[test]
    fn test_github_bare_tree_segment_is_not_a_branch() {
        let info = parse_repo_url("https://github.com/owner/repo/tree").unwrap();
        assert_eq!(info.branch, None);
    }

    #[test]
    fn test_azure_devops_new_format() {
        let info = parse_repo_url("https://dev.azure.com/org/project/_git/repo").unwrap();
        assert_eq!(info.provider, ProviderKind::AzureDevOps);
        assert_eq!(info.owner, "org");
        assert_eq!(info.project.as_deref(), Some("project"));
        assert_eq!(info.repo, "repo");
        assert_eq!(info.branch, None);
    }

    #[test]
    fn test_azure_devops_new_format_with_branch() {
        let info =
            parse_repo_url("https://dev.azure.com/org/project/_git/repo?version=GBmain").unwrap();
        assert_eq!(info.owner, "org");
        assert_eq!(info.project.as_deref(), Some("project"));
        assert_eq!(info.repo, "repo");
        assert_eq!(info.branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_azure_devops_branch_stops_at_ampersand() {
        let info = parse_repo_url(
            "https://dev.azure.com/org/project/_git/repo?version=GBdev&path=/src",
        )
        .unwrap();
        assert_eq!(info.branch.as_deref(), Some("dev"));
    }

    #[test]
    fn test_azure_devops_empty_branch_is_none() {
        let info =
            parse_repo_url("https://dev.azure.com/org/project/_git/repo?version=GB").unwrap();
        assert_eq!(info.branch, None);
    }

    #[test]
    fn test_azure_devops_legacy_format() {
        let info = parse_repo_url("https://myorg.visualstudio.com/project/_git/repo").unwrap();
        assert_eq!(info.provider, ProviderKind::AzureDevOps);
        assert_eq!(info.owner, "myorg");
        assert_eq!(info.project.as_deref(), Some("project"));
        assert_eq!(info.repo, "repo");
        assert_eq!(info.api_host, "myorg.visualstudio.com");
    }

    #[test]
    fn test_azure_devops_legacy_with_branch() {
        let info =
            parse_repo_url("https://myorg.visualstudio.com/project/_git/repo?version=GBdev")
                .unwrap();
        assert_eq!(info.branch.as_deref(), Some("dev"));
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(parse_repo_url(""), Err(UrlParseError::Empty));
        assert_eq!(parse_repo_url("   "), Err(UrlParseError::Empty));
    }

    #[test]
    fn test_no_scheme() {
        assert!(matches!(
            parse_repo_url("github.com/owner/repo"),
            Err(UrlParseError::NoScheme(_))
        ));
    }

    #[test]
    fn test_unsupported_scheme() {
        assert!(matches!(
            parse_repo_url("ftp://github.com/owner/repo"),
            Err(UrlParseError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_unsupported_host() {
        assert!(matches!(
            parse_repo_url("https://gitlab.com/owner/repo"),
            Err(UrlParseError::UnsupportedHost(_))
        ));
    }

    #[test]
    fn test_github_missing_repo() {
        assert!(matches!(
            parse_repo_url("https://github.com/owner"),
            Err(UrlParseError::GitHubPath(_))
        ));
    }

    #[test]
    fn test_azure_devops_bad_path() {
        assert!(matches!(
            parse_repo_url("https://dev.azure.com/org/project/repo"),
            Err(UrlParseError::AzureDevOpsPath { .. })
        ));
        assert!(matches!(
            parse_repo_url("https://myorg.visualstudio.com/project/repo"),
            Err(UrlParseError::AzureDevOpsPath { .. })
        ));
    }
}
