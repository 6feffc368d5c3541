//! Convert a GitHub or Azure DevOps repository into a single Markdown
//! document: an ASCII file tree followed by the contents of every text file.

pub mod cli;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod http;
pub mod providers;
pub mod render;
pub mod repo_url;
pub mod tree;
pub mod types;

pub use error::{AzureDevOpsError, GitHubError, ProviderError, UrlParseError};
pub use fetch::{fetch_all_files, FetchSession};
pub use providers::{create_provider, AzureDevOpsProvider, GitHubProvider, RepoProvider};
pub use render::render_markdown;
pub use repo_url::parse_repo_url;
pub use tree::build_tree;
pub use types::{FetchProgress, FileEntry, ProviderKind, RepoInfo};
