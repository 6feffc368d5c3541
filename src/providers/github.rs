use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::{GitHubError, ProviderError};
use crate::http::{HttpResponse, HttpTransport, ReqwestTransport, USER_AGENT};
use crate::providers::RepoProvider;
use crate::types::{FileEntry, RepoInfo};

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";

#[derive(Deserialize)]
struct RepoResponse {
    default_branch: String,
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    tree: Vec<TreeItem>,
}

#[derive(Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    sha: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

/// GitHub REST API v3 provider.
pub struct GitHubProvider {
    transport: Box<dyn HttpTransport>,
}

impl GitHubProvider {
    pub fn new(token: Option<&str>) -> Self {
        let mut headers = vec![
            (
                "Accept".to_string(),
                "application/vnd.github+json".to_string(),
            ),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        GitHubProvider {
            transport: Box::new(ReqwestTransport::new(headers)),
        }
    }

    pub fn with_transport(transport: Box<dyn HttpTransport>) -> Self {
        GitHubProvider { transport }
    }

    /// Quota exhaustion wins over whatever the status code says, so every
    /// response goes through this check before any other interpretation.
    fn check_rate_limit(response: &HttpResponse) -> Result<(), GitHubError> {
        if let Some(remaining) = response.header("X-RateLimit-Remaining") {
            if remaining.trim().parse::<u64>().ok() == Some(0) {
                let reset_at = response
                    .header("X-RateLimit-Reset")
                    .and_then(|value| value.trim().parse().ok())
                    .unwrap_or(0);
                return Err(GitHubError::RateLimited { reset_at });
            }
        }
        Ok(())
    }

    fn api_get(&self, path: &str, query: &[(&str, &str)]) -> Result<HttpResponse, GitHubError> {
        let url = format!("{}{}", API_BASE, path);
        let response = self
            .transport
            .get(&url, query, &[])
            .map_err(|err| GitHubError::Http(err.to_string()))?;
        Self::check_rate_limit(&response)?;

        match response.status {
            404 => Err(GitHubError::NotFound),
            401 => Err(GitHubError::AuthFailed),
            403 => Err(GitHubError::AccessDenied),
            _ if !response.is_success() => Err(GitHubError::Http(format!(
                "HTTP {} for {}",
                response.status, url
            ))),
            _ => Ok(response),
        }
    }

    fn default_branch(&self, repo: &RepoInfo) -> Result<String, GitHubError> {
        let response = self.api_get(&format!("/repos/{}/{}", repo.owner, repo.repo), &[])?;
        let data: RepoResponse = response
            .json()
            .map_err(|err| GitHubError::Http(err.to_string()))?;
        Ok(data.default_branch)
    }

    fn tree(&self, repo: &RepoInfo, reference: &str) -> Result<TreeResponse, GitHubError> {
        let response = self.api_get(
            &format!("/repos/{}/{}/git/trees/{}", repo.owner, repo.repo, reference),
            &[("recursive", "1")],
        )?;
        response
            .json()
            .map_err(|err| GitHubError::Http(err.to_string()))
    }

    /// Recovery path for repositories too large for one recursive listing:
    /// keep the root blobs, then list each root-level subdirectory by object
    /// id and re-root its blobs under the subdirectory path. A subtree that
    /// fails to list is dropped and the listing stays partial.
    fn list_truncated(&self, repo: &RepoInfo, initial: TreeResponse) -> Vec<FileEntry> {
        let mut files = Vec::new();
        let mut subdirs: Vec<(String, String)> = Vec::new();

        for item in initial.tree {
            if item.kind == "blob" {
                files.push(FileEntry::new(item.path, item.size));
            } else if item.kind == "tree" {
                subdirs.push((item.path, item.sha));
            }
        }

        for (dir_path, sha) in subdirs {
            let subtree = match self.tree(repo, &sha) {
                Ok(subtree) => subtree,
                Err(err) => {
                    log::warn!("skipping subtree {}: {}", dir_path, err);
                    continue;
                }
            };
            for item in subtree.tree {
                if item.kind == "blob" {
                    files.push(FileEntry::new(format!("{}/{}", dir_path, item.path), item.size));
                }
            }
        }

        files
    }
}

impl RepoProvider for GitHubProvider {
    fn get_default_branch(&self, repo: &RepoInfo) -> Result<String, ProviderError> {
        Ok(self.default_branch(repo)?)
    }

    fn list_files(&self, repo: &RepoInfo) -> Result<Vec<FileEntry>, ProviderError> {
        let branch = match &repo.branch {
            Some(branch) => branch.clone(),
            None => self.default_branch(repo)?,
        };

        let data = self.tree(repo, &branch)?;
        if data.truncated {
            log::warn!(
                "tree listing for {} is truncated; walking subdirectories individually",
                repo.display_name()
            );
            return Ok(self.list_truncated(repo, data));
        }

        Ok(data
            .tree
            .into_iter()
            .filter(|item| item.kind == "blob")
            .map(|item| FileEntry::new(item.path, item.size))
            .collect())
    }

    fn fetch_file_content(
        &self,
        repo: &RepoInfo,
        entry: &FileEntry,
    ) -> Result<String, ProviderError> {
        let branch = repo.branch.as_deref().unwrap_or("main");

        // Raw CDN first: fast, and not counted against the API quota.
        let raw_url = format!(
            "{}/{}/{}/{}/{}",
            RAW_BASE, repo.owner, repo.repo, branch, entry.path
        );
        if let Ok(response) = self.transport.get(&raw_url, &[], &[]) {
            Self::check_rate_limit(&response)?;
            if response.status == 200 {
                return Ok(response.text());
            }
        }

        // Contents API fallback, required for private repositories.
        let response = self.api_get(
            &format!("/repos/{}/{}/contents/{}", repo.owner, repo.repo, entry.path),
            &[("ref", branch)],
        )?;
        let data: ContentsResponse = response
            .json()
            .map_err(|err| GitHubError::Http(err.to_string()))?;

        if data.encoding == "base64" {
            // GitHub wraps base64 payloads with newlines.
            let compact: String = data.content.split_whitespace().collect();
            let bytes = BASE64
                .decode(compact.as_bytes())
                .map_err(|err| GitHubError::Http(format!("invalid base64 content: {}", err)))?;
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }
        Ok(data.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{json_response, text_response, with_header, FakeTransport};
    use crate::types::ProviderKind;
    use serde_json::json;

    fn repo_info(branch: Option<&str>) -> RepoInfo {
        RepoInfo {
            provider: ProviderKind::GitHub,
            owner: "testowner".to_string(),
            repo: "testrepo".to_string(),
            branch: branch.map(str::to_string),
            project: None,
            api_host: "github.com".to_string(),
            raw_url: "https://github.com/testowner/testrepo".to_string(),
        }
    }

    fn provider(transport: FakeTransport) -> GitHubProvider {
        GitHubProvider::with_transport(Box::new(transport))
    }

    #[test]
    fn test_get_default_branch() {
        let transport = FakeTransport::new().on(
            "/repos/testowner/testrepo",
            json_response(200, json!({"default_branch": "main"})),
        );
        let branch = provider(transport)
            .get_default_branch(&repo_info(None))
            .unwrap();
        assert_eq!(branch, "main");
    }

    #[test]
    fn test_status_mapping() {
        for (status, expected) in [
            (404, GitHubError::NotFound),
            (401, GitHubError::AuthFailed),
            (403, GitHubError::AccessDenied),
        ] {
            let transport = FakeTransport::new().on(
                "/repos/testowner/testrepo",
                json_response(status, json!({"message": "nope"})),
            );
            let err = provider(transport)
                .get_default_branch(&repo_info(None))
                .unwrap_err();
            assert_eq!(err, ProviderError::GitHub(expected));
        }
    }

    #[test]
    fn test_list_files_keeps_blobs_only() {
        let transport = FakeTransport::new().on(
            "git/trees/main",
            json_response(
                200,
                json!({
                    "sha": "abc",
                    "truncated": false,
                    "tree": [
                        {"type": "blob", "path": "README.md", "size": 100, "sha": "s1"},
                        {"type": "blob", "path": "src/main.py", "size": 200, "sha": "s2"},
                        {"type": "tree", "path": "src", "sha": "s3"},
                        {"type": "blob", "path": "logo.png", "size": 5000, "sha": "s4"},
                    ],
                }),
            ),
        );
        let files = provider(transport).list_files(&repo_info(Some("main"))).unwrap();

        assert_eq!(files.len(), 3);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "src/main.py", "logo.png"]);

        let png = files.iter().find(|f| f.path == "logo.png").unwrap();
        assert!(png.is_binary);
        let py = files.iter().find(|f| f.path == "src/main.py").unwrap();
        assert!(!py.is_binary);
        assert_eq!(py.language_hint, "python");
        assert_eq!(py.size, 200);
    }

    #[test]
    fn test_list_files_resolves_default_branch() {
        let transport = FakeTransport::new()
            .on(
                "git/trees/develop",
                json_response(200, json!({"sha": "abc", "truncated": false, "tree": []})),
            )
            .on(
                "/repos/testowner/testrepo",
                json_response(200, json!({"default_branch": "develop"})),
            );
        let files = provider(transport).list_files(&repo_info(None)).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_resolve_branch_returns_updated_copy() {
        let transport = FakeTransport::new().on(
            "/repos/testowner/testrepo",
            json_response(200, json!({"default_branch": "develop"})),
        );
        let info = repo_info(None);
        let resolved = provider(transport).resolve_branch(&info).unwrap();
        assert_eq!(resolved.branch.as_deref(), Some("develop"));
        assert_eq!(info.branch, None);
    }

    #[test]
    fn test_truncated_tree_walks_subdirectories() {
        let transport = FakeTransport::new()
            .on(
                "git/trees/main",
                json_response(
                    200,
                    json!({
                        "sha": "root",
                        "truncated": true,
                        "tree": [
                            {"type": "blob", "path": "README.md", "size": 10, "sha": "b1"},
                            {"type": "tree", "path": "src", "sha": "srcsha"},
                            {"type": "tree", "path": "docs", "sha": "docssha"},
                        ],
                    }),
                ),
            )
            .on(
                "git/trees/srcsha",
                json_response(
                    200,
                    json!({
                        "sha": "srcsha",
                        "truncated": false,
                        "tree": [
                            {"type": "blob", "path": "main.py", "size": 20, "sha": "b2"},
                            {"type": "blob", "path": "util.py", "size": 30, "sha": "b3"},
                        ],
                    }),
                ),
            )
            .on_error("git/trees/docssha", "connection reset");
        let files = provider(transport).list_files(&repo_info(Some("main"))).unwrap();

        // docs/ failed and is simply omitted; the listing stays partial.
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "src/main.py", "src/util.py"]);
    }

    #[test]
    fn test_fetch_content_via_raw_cdn() {
        let transport = FakeTransport::new().on(
            "raw.githubusercontent.com/testowner/testrepo/main/README.md",
            text_response(200, "# Hello"),
        );
        let entry = FileEntry::new("README.md", 7);
        let content = provider(transport)
            .fetch_file_content(&repo_info(Some("main")), &entry)
            .unwrap();
        assert_eq!(content, "# Hello");
    }

    #[test]
    fn test_fetch_content_falls_back_to_contents_api() {
        // cHJpbnQoJ2hpJyk= is base64 for print('hi')
        let transport = FakeTransport::new()
            .on(
                "raw.githubusercontent.com",
                text_response(404, "Not Found"),
            )
            .on(
                "/contents/src/app.py",
                json_response(
                    200,
                    json!({"content": "cHJpbnQo\nJ2hpJyk=\n", "encoding": "base64"}),
                ),
            );
        let entry = FileEntry::new("src/app.py", 11);
        let content = provider(transport)
            .fetch_file_content(&repo_info(Some("main")), &entry)
            .unwrap();
        assert_eq!(content, "print('hi')");
    }

    #[test]
    fn test_rate_limit_wins_over_200_status() {
        let response = with_header(
            with_header(text_response(200, "body"), "X-RateLimit-Remaining", "0"),
            "X-RateLimit-Reset",
            "1700000000",
        );
        let transport = FakeTransport::new().on("raw.githubusercontent.com", response);
        let entry = FileEntry::new("README.md", 4);
        let err = provider(transport)
            .fetch_file_content(&repo_info(Some("main")), &entry)
            .unwrap_err();

        assert!(err.is_rate_limit());
        assert_eq!(err.rate_limit_reset(), Some(1700000000));
    }

    #[test]
    fn test_remaining_quota_is_not_a_rate_limit() {
        let response = with_header(
            json_response(200, json!({"default_branch": "main"})),
            "X-RateLimit-Remaining",
            "42",
        );
        let transport = FakeTransport::new().on("/repos/testowner/testrepo", response);
        assert!(provider(transport).get_default_branch(&repo_info(None)).is_ok());
    }
}
