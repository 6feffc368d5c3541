use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::{AzureDevOpsError, ProviderError};
use crate::http::{HttpResponse, HttpTransport, ReqwestTransport, USER_AGENT};
use crate::providers::RepoProvider;
use crate::types::{FileEntry, RepoInfo};

const API_VERSION: &str = "7.1-preview.1";

#[derive(Deserialize)]
struct RepositoryResponse {
    #[serde(rename = "defaultBranch")]
    default_branch: Option<String>,
}

#[derive(Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    value: Vec<Item>,
}

#[derive(Deserialize)]
struct Item {
    #[serde(default)]
    path: String,
    #[serde(rename = "isFolder", default)]
    is_folder: bool,
    #[serde(default)]
    size: u64,
    #[serde(rename = "contentMetadata")]
    content_metadata: Option<ContentMetadata>,
}

#[derive(Deserialize)]
struct ContentMetadata {
    #[serde(rename = "isBinary", default)]
    is_binary: bool,
}

/// Azure DevOps REST API provider, covering both `dev.azure.com` and the
/// legacy `*.visualstudio.com` URL forms (the API host is the same).
pub struct AzureDevOpsProvider {
    transport: Box<dyn HttpTransport>,
}

impl AzureDevOpsProvider {
    pub fn new(pat: Option<&str>) -> Self {
        let mut headers = vec![("User-Agent".to_string(), USER_AGENT.to_string())];
        if let Some(pat) = pat {
            // Basic auth with an empty username and the PAT as password.
            let credentials = BASE64.encode(format!(":{}", pat));
            headers.push(("Authorization".to_string(), format!("Basic {}", credentials)));
        }
        AzureDevOpsProvider {
            transport: Box::new(ReqwestTransport::new(headers)),
        }
    }

    pub fn with_transport(transport: Box<dyn HttpTransport>) -> Self {
        AzureDevOpsProvider { transport }
    }

    fn api_base(repo: &RepoInfo) -> String {
        format!(
            "https://dev.azure.com/{}/{}/_apis/git/repositories/{}",
            repo.owner,
            repo.project.as_deref().unwrap_or(""),
            repo.repo
        )
    }

    fn api_get(
        &self,
        repo: &RepoInfo,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, AzureDevOpsError> {
        let url = format!("{}{}", Self::api_base(repo), path);
        let mut query: Vec<(&str, &str)> = query.to_vec();
        query.push(("api-version", API_VERSION));

        let response = self
            .transport
            .get(&url, &query, &[])
            .map_err(|err| AzureDevOpsError::Http(err.to_string()))?;

        match response.status {
            404 => Err(AzureDevOpsError::NotFound),
            401 => Err(AzureDevOpsError::AuthFailed),
            403 => Err(AzureDevOpsError::AccessDenied),
            _ if !response.is_success() => Err(AzureDevOpsError::Http(format!(
                "HTTP {} for {}",
                response.status, url
            ))),
            _ => Ok(response),
        }
    }

    fn default_branch(&self, repo: &RepoInfo) -> Result<String, AzureDevOpsError> {
        let response = self.api_get(repo, "", &[])?;
        let data: RepositoryResponse = response
            .json()
            .map_err(|err| AzureDevOpsError::Http(err.to_string()))?;

        let branch = data
            .default_branch
            .unwrap_or_else(|| "refs/heads/main".to_string());
        Ok(branch
            .strip_prefix("refs/heads/")
            .unwrap_or(branch.as_str())
            .to_string())
    }
}

impl RepoProvider for AzureDevOpsProvider {
    fn get_default_branch(&self, repo: &RepoInfo) -> Result<String, ProviderError> {
        Ok(self.default_branch(repo)?)
    }

    fn list_files(&self, repo: &RepoInfo) -> Result<Vec<FileEntry>, ProviderError> {
        let branch = match &repo.branch {
            Some(branch) => branch.clone(),
            None => self.default_branch(repo)?,
        };

        let query = [
            ("recursionLevel", "Full"),
            ("versionDescriptor.version", branch.as_str()),
            ("versionDescriptor.versionType", "branch"),
        ];
        let response = self.api_get(repo, "/items", &query)?;
        let data: ItemsResponse = response
            .json()
            .map_err(|err| AzureDevOpsError::Http(err.to_string()))?;

        let mut files = Vec::new();
        for item in data.value {
            if item.is_folder {
                continue;
            }
            let path = item.path.trim_start_matches('/').to_string();
            if path.is_empty() {
                continue;
            }

            let mut entry = FileEntry::new(path, item.size);
            // The service's own verdict beats the extension heuristic.
            if let Some(meta) = item.content_metadata {
                if meta.is_binary {
                    entry.is_binary = true;
                }
            }
            files.push(entry);
        }
        Ok(files)
    }

    fn fetch_file_content(
        &self,
        repo: &RepoInfo,
        entry: &FileEntry,
    ) -> Result<String, ProviderError> {
        let branch = repo.branch.as_deref().unwrap_or("main");
        let item_path = format!("/{}", entry.path);
        let url = format!("{}/items", Self::api_base(repo));
        let query = [
            ("path", item_path.as_str()),
            ("versionDescriptor.version", branch),
            ("versionDescriptor.versionType", "branch"),
            ("includeContent", "true"),
            ("api-version", API_VERSION),
        ];

        let response = self
            .transport
            .get(&url, &query, &[("Accept", "application/octet-stream")])
            .map_err(|err| AzureDevOpsError::Http(err.to_string()))?;

        if response.status == 404 {
            return Err(AzureDevOpsError::FileNotFound(entry.path.clone()).into());
        }
        if !response.is_success() {
            return Err(AzureDevOpsError::Http(format!(
                "HTTP {} for {}",
                response.status, url
            ))
            .into());
        }
        Ok(response.text())
    }
}
