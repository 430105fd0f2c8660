use std::{fs, io, path::Path};

/// Split pattern-file text into patterns: one per line, `#` starts a comment
/// line, blank lines are dropped. Leading `!` is kept for the matcher.
pub fn parse_patterns(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

pub fn read_pattern_file(path: &Path) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_patterns(&text))
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;
