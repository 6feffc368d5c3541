use std::collections::HashSet;

use once_cell::sync::Lazy;

const SNIFF_WINDOW: usize = 8192;

// Extensions that are definitely binary, skipped without downloading.
static BINARY_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        // Images
        ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".svg", ".webp", ".tiff",
        // Compiled / executables
        ".exe", ".dll", ".so", ".dylib", ".o", ".obj", ".class", ".pyc", ".pyo",
        // Archives
        ".zip", ".tar", ".gz", ".bz2", ".xz", ".7z", ".rar", ".jar", ".war",
        // Media
        ".mp3", ".mp4", ".avi", ".mov", ".wav", ".flac", ".ogg", ".mkv", ".webm",
        // Fonts
        ".ttf", ".otf", ".woff", ".woff2", ".eot",
        // Documents (binary)
        ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
        // Databases
        ".db", ".sqlite", ".sqlite3",
        // Other
        ".bin", ".dat", ".lock", ".ds_store",
    ])
});

/// Whether a path looks binary from its extension alone.
///
/// Case-insensitive and depends only on the substring after the last dot;
/// paths with no extension are assumed text.
pub fn is_binary_by_extension(path: &str) -> bool {
    let ext = match path.rfind('.') {
        Some(pos) => path[pos..].to_ascii_lowercase(),
        None => return false,
    };
    BINARY_EXTENSIONS.contains(ext.as_str())
}

/// Whether content looks binary: a NUL byte anywhere in the first 8 KB.
///
/// Heuristic sniff for the cases where no extension is available to judge by.
pub fn is_binary_by_content(data: &[u8]) -> bool {
    data[..data.len().min(SNIFF_WINDOW)].contains(&0)
}
