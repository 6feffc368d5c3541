use crate::error::ProviderError;
use crate::providers::RepoProvider;
use crate::types::{FetchProgress, FileEntry, RepoInfo};

/// Pull-based fetch pass over a file listing.
///
/// One [`FetchProgress`] snapshot is yielded per input file, in input order,
/// whether the file was fetched, skipped, or failed. The caller paces the
/// work by pulling; dropping the iterator abandons the remaining files.
/// A rate-limit error is yielded as the `Err` item and ends the iteration.
pub struct FetchSession<'a> {
    provider: &'a dyn RepoProvider,
    repo: &'a RepoInfo,
    files: std::slice::IterMut<'a, FileEntry>,
    max_file_size: u64,
    progress: FetchProgress,
    done: bool,
}

/// Fetch content for every file in `files`, yielding progress after each.
///
/// Binary files, and files over `max_file_size` bytes (0 means unlimited),
/// are counted as skipped without any network traffic. A failed fetch is
/// retried once; a second failure is recorded as `"<path>: <error>"` in the
/// snapshot's `errors` and the pass moves on. Successful fetches land in the
/// entry's `content`.
pub fn fetch_all_files<'a>(
    provider: &'a dyn RepoProvider,
    repo: &'a RepoInfo,
    files: &'a mut [FileEntry],
    max_file_size: u64,
) -> FetchSession<'a> {
    let progress = FetchProgress::new(files.len());
    FetchSession {
        provider,
        repo,
        files: files.iter_mut(),
        max_file_size,
        progress,
        done: false,
    }
}

impl Iterator for FetchSession<'_> {
    type Item = Result<FetchProgress, ProviderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let entry = self.files.next()?;
        self.progress.current_file = entry.path.clone();

        let oversize = self.max_file_size > 0 && entry.size > self.max_file_size;
        if entry.is_binary || oversize {
            self.progress.skipped_binary += 1;
        } else if let Err(err) =
            fetch_entry_with_retry(self.provider, self.repo, entry, &mut self.progress)
        {
            self.done = true;
            return Some(Err(err));
        }

        self.progress.fetched_files += 1;
        Some(Ok(self.progress.clone()))
    }
}

fn fetch_entry_with_retry(
    provider: &dyn RepoProvider,
    repo: &RepoInfo,
    entry: &mut FileEntry,
    progress: &mut FetchProgress,
) -> Result<(), ProviderError> {
    let first = match provider.fetch_file_content(repo, entry) {
        Ok(content) => {
            entry.content = Some(content);
            return Ok(());
        }
        Err(err) if err.is_rate_limit() => return Err(err),
        Err(err) => err,
    };

    log::debug!("retrying {} after error: {}", entry.path, first);
    match provider.fetch_file_content(repo, entry) {
        Ok(content) => {
            entry.content = Some(content);
            Ok(())
        }
        Err(err) if err.is_rate_limit() => Err(err),
        Err(err) => {
            progress.errors.push(format!("{}: {}", entry.path, err));
            Ok(())
        }
    }
}
