use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};

use crate::fetch::fetch_all_files;
use crate::filter::{
    compile_patterns, matches_any_pattern, parse_pattern_input, validate_patterns,
};
use crate::providers::create_provider;
use crate::render::render_markdown;
use crate::repo_url::parse_repo_url;
use crate::types::{FetchProgress, ProviderKind};

use super::args::Args;

static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "");

pub fn run_convert(args: &Args) -> Result<()> {
    // Validate filter patterns before touching the network.
    let patterns = parse_pattern_input(args.filter.as_deref().unwrap_or(""));
    let pattern_errors = validate_patterns(&patterns);
    if !pattern_errors.is_empty() {
        for error in &pattern_errors {
            eprintln!("{} {}", style("invalid regex:").red(), error);
        }
        bail!("invalid filter pattern(s)");
    }
    let compiled = compile_patterns(&patterns);

    let repo_info = parse_repo_url(&args.url).context("invalid repository URL")?;

    let credential = match repo_info.provider {
        ProviderKind::GitHub => args.token.as_deref(),
        ProviderKind::AzureDevOps => args.pat.as_deref(),
    };
    let provider = create_provider(&repo_info, credential);
    let repo_display = repo_info.display_name();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Fetching file list for {}...", repo_display));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let listing = provider
        .resolve_branch(&repo_info)
        .and_then(|resolved| Ok((provider.list_files(&resolved)?, resolved)));
    spinner.finish_and_clear();
    let (mut files, repo_info) = listing?;

    if files.is_empty() {
        println!("{}No files found in the repository.", INFO);
        return Ok(());
    }

    let mut filtered_out = 0;
    if !compiled.is_empty() {
        let before = files.len();
        files.retain(|file| matches_any_pattern(&file.path, &compiled));
        filtered_out = before - files.len();
    }
    if files.is_empty() {
        println!("{}No files matched the filter patterns.", INFO);
        return Ok(());
    }

    let text_count = files.iter().filter(|file| !file.is_binary).count();
    let mut summary = format!(
        "Found {} files ({} text, {} binary/skipped)",
        style(files.len()).green(),
        text_count,
        files.len() - text_count
    );
    if filtered_out > 0 {
        summary.push_str(&format!(", {} excluded by filter", filtered_out));
    }
    println!("{}{}", INFO, summary);

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
            .unwrap(),
    );

    let mut last = FetchProgress::new(files.len());
    let mut aborted = None;
    for item in fetch_all_files(
        provider.as_ref(),
        &repo_info,
        &mut files,
        args.max_file_size,
    ) {
        match item {
            Ok(progress) => {
                bar.set_position(progress.fetched_files as u64);
                bar.set_message(progress.current_file.clone());
                last = progress;
            }
            Err(err) => {
                aborted = Some(err);
                break;
            }
        }
    }
    bar.finish_and_clear();

    if let Some(err) = aborted {
        if err.is_rate_limit() {
            eprintln!(
                "{}",
                style(
                    "Tip: add a GitHub token (--token or GITHUB_TOKEN) to raise the \
                     rate limit from 60 to 5,000 requests per hour."
                )
                .dim()
            );
        }
        return Err(err.into());
    }

    if !last.errors.is_empty() {
        println!(
            "\n{}{} file(s) failed to fetch:",
            WARNING,
            style(last.errors.len()).yellow()
        );
        for error in last.errors.iter().take(10) {
            println!("  - {}", style(error).red());
        }
        if last.errors.len() > 10 {
            println!("  ... and {} more", last.errors.len() - 10);
        }
    }

    let markdown = render_markdown(&repo_display, &files);

    if args.stdout {
        println!("{}", markdown);
        return Ok(());
    }

    let output_path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!("{}_{}.md", repo_info.owner, repo_info.repo))
    });
    fs::write(&output_path, &markdown)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    let included = files
        .iter()
        .filter(|file| !file.is_binary && file.content.is_some())
        .count();
    println!(
        "\n{}Wrote {} ({} files included, {} skipped, {} errors)",
        SUCCESS,
        style(output_path.display()).green(),
        included,
        last.skipped_binary,
        last.errors.len()
    );

    Ok(())
}
