use regex::Regex;

/// Split a comma-separated string into individual pattern strings.
///
/// Whitespace around each pattern is stripped; empty segments are dropped.
pub fn parse_pattern_input(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Error messages for the patterns that fail to compile, one per pattern.
/// An empty result means every pattern is valid.
///
/// Purely informational: execution goes through [`compile_patterns`], which
/// shares the same compiler so the two cannot disagree.
pub fn validate_patterns(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .filter_map(|pattern| {
            Regex::new(pattern)
                .err()
                .map(|err| format!("`{}` — {}", pattern, err))
        })
        .collect()
}

/// Compile pattern strings, silently dropping the ones that fail. Never
/// fails itself.
pub fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
}

/// Whether a path matches any compiled pattern, anywhere in the path
/// (search, not full match). An empty pattern list matches every path.
pub fn matches_any_pattern(path: &str, compiled: &[Regex]) -> bool {
    compiled.is_empty() || compiled.iter().any(|pattern| pattern.is_match(path))
}
