use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "repomark",
    version,
    about = "Convert a GitHub or Azure DevOps repository into a single Markdown document"
)]
pub struct Args {
    /// Repository URL, e.g. https://github.com/owner/repo
    pub url: String,

    /// Output file path (defaults to <owner>_<repo>.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// GitHub token, for private repositories and a higher rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Azure DevOps Personal Access Token, for private repositories
    #[arg(long, env = "AZURE_DEVOPS_PAT", hide_env_values = true)]
    pub pat: Option<String>,

    /// Skip files larger than this many bytes; 0 includes everything
    #[arg(long, default_value_t = 1_000_000)]
    pub max_file_size: u64,

    /// Comma-separated regex patterns; only matching paths are included
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Print the document to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Log retry and fallback activity
    #[arg(short, long)]
    pub verbose: bool,
}
