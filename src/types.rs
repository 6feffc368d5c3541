/// Which hosting service a repository lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    GitHub,
    AzureDevOps,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::GitHub => write!(f, "github"),
            ProviderKind::AzureDevOps => write!(f, "azure_devops"),
        }
    }
}

/// A parsed repository reference.
///
/// `branch` is the branch the URL asked for; when the URL names no branch it
/// stays `None` until a provider resolves the default branch via
/// `RepoProvider::resolve_branch`, which returns an updated copy rather than
/// mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub provider: ProviderKind,
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
    /// Azure DevOps only.
    pub project: Option<String>,
    pub api_host: String,
    pub raw_url: String,
}

impl RepoInfo {
    /// "owner/repo", the form shown in headings and log lines.
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Copy of this reference with the branch filled in.
    pub fn with_branch(&self, branch: impl Into<String>) -> RepoInfo {
        RepoInfo {
            branch: Some(branch.into()),
            ..self.clone()
        }
    }
}

/// One regular file in a repository listing. Directories never appear.
///
/// `path` is forward-slash separated and relative, with no leading slash.
/// `content` stays `None` until the fetch orchestrator populates it; binary
/// and oversize files keep `None` forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
    pub is_binary: bool,
    pub content: Option<String>,
    pub language_hint: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let is_binary = crate::filter::is_binary_by_extension(&path);
        let language_hint = crate::filter::get_language_hint(&path).to_string();
        FileEntry {
            path,
            size,
            is_binary,
            content: None,
            language_hint,
        }
    }
}

/// Running totals for one fetch pass, yielded after every processed file.
///
/// Counts only grow. A file is counted exactly once, in exactly one of
/// {binary skip, size skip, success, error}; files removed by the regex path
/// filter are never counted at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchProgress {
    pub total_files: usize,
    pub fetched_files: usize,
    pub skipped_binary: usize,
    pub current_file: String,
    pub errors: Vec<String>,
}

impl FetchProgress {
    pub fn new(total_files: usize) -> Self {
        FetchProgress {
            total_files,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_branch_leaves_original_alone() {
        let info = RepoInfo {
            provider: ProviderKind::GitHub,
            owner: "owner".to_string(),
            repo: "repo".to_string(),
            branch: None,
            project: None,
            api_host: "github.com".to_string(),
            raw_url: "https://github.com/owner/repo".to_string(),
        };

        let resolved = info.with_branch("main");
        assert_eq!(resolved.branch.as_deref(), Some("main"));
        assert_eq!(info.branch, None);
        assert_eq!(resolved.owner, "owner");
    }

    #[test]
    fn test_file_entry_detects_binary_and_language() {
        let entry = FileEntry::new("src/main.rs", 120);
        assert!(!entry.is_binary);
        assert_eq!(entry.language_hint, "rust");

        let image = FileEntry::new("assets/logo.png", 4096);
        assert!(image.is_binary);
        assert_eq!(image.language_hint, "");
    }
}
