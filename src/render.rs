use crate::filter::get_language_hint;
use crate::tree::build_tree;
use crate::types::FileEntry;

/// Assemble the final Markdown document: repository heading, ASCII file
/// tree, then every fetched file inside a language-tagged code fence.
///
/// Only non-binary files whose content was actually fetched are included.
/// An empty string counts as fetched; `None` means the fetch was skipped or
/// failed and the file is left out entirely. Content is embedded verbatim,
/// no escaping.
pub fn render_markdown(repo_display_name: &str, files: &[FileEntry]) -> String {
    let text_files: Vec<&FileEntry> = files
        .iter()
        .filter(|file| !file.is_binary && file.content.is_some())
        .collect();
    let paths: Vec<String> = text_files.iter().map(|file| file.path.clone()).collect();

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("# Repository: {}\n", repo_display_name));

    parts.push("## File Structure\n".to_string());
    parts.push("```".to_string());
    parts.push(build_tree(&paths));
    parts.push("```\n".to_string());

    parts.push("## Files\n".to_string());
    for file in text_files {
        let lang = if file.language_hint.is_empty() {
            get_language_hint(&file.path)
        } else {
            file.language_hint.as_str()
        };
        parts.push(format!("### `{}`\n", file.path));
        parts.push(format!("```{}", lang));
        parts.push(file.content.clone().unwrap_or_default());
        parts.push("```\n".to_string());
    }

    parts.join("\n")
}
