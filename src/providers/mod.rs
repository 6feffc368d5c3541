mod azure_devops;
mod github;

pub use azure_devops::AzureDevOpsProvider;
pub use github::GitHubProvider;

use crate::error::ProviderError;
use crate::types::{FileEntry, ProviderKind, RepoInfo};

/// Capability set shared by the hosting services: branch resolution, file
/// enumeration, and single-file content retrieval. The fetch orchestrator in
/// [`crate::fetch`] drives `fetch_file_content` across a whole listing.
pub trait RepoProvider {
    /// Name of the repository's default branch.
    fn get_default_branch(&self, repo: &RepoInfo) -> Result<String, ProviderError>;

    /// Every regular file reachable on the repository's branch. Resolves the
    /// default branch internally when `repo.branch` is `None`; use
    /// [`RepoProvider::resolve_branch`] first to make the resolution visible.
    fn list_files(&self, repo: &RepoInfo) -> Result<Vec<FileEntry>, ProviderError>;

    /// Content of one file as text.
    fn fetch_file_content(
        &self,
        repo: &RepoInfo,
        entry: &FileEntry,
    ) -> Result<String, ProviderError>;

    /// Copy of `repo` with the branch filled in, resolving the default
    /// branch when the URL named none. The input is never mutated.
    fn resolve_branch(&self, repo: &RepoInfo) -> Result<RepoInfo, ProviderError> {
        if repo.branch.is_some() {
            return Ok(repo.clone());
        }
        let branch = self.get_default_branch(repo)?;
        log::debug!(
            "resolved default branch {} for {}",
            branch,
            repo.display_name()
        );
        Ok(repo.with_branch(branch))
    }
}

/// Concrete provider for a parsed repository reference. `credential` is a
/// GitHub token or an Azure DevOps PAT depending on the provider kind; it is
/// held for the lifetime of the provider and never persisted.
pub fn create_provider(repo: &RepoInfo, credential: Option<&str>) -> Box<dyn RepoProvider> {
    match repo.provider {
        ProviderKind::GitHub => Box::new(GitHubProvider::new(credential)),
        ProviderKind::AzureDevOps => Box::new(AzureDevOpsProvider::new(credential)),
    }
}
