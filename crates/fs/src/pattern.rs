use glob::MatchOptions;

use crate::error::{Result, WalkError};

/// Characters that end the literal prefix of a pattern. `{` is matched
/// literally but still ends the prefix, which only makes the index more
/// conservative.
const WILDCARD_CHARS: &[char] = &['*', '?', '[', '{', '\\'];

/// Characters the glob engine treats as syntax; literal ones are wrapped in
/// a one-character class.
const GLOB_META: &[char] = &['*', '?', '[', ']'];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled, cleaned glob matched against slash-separated relative paths.
/// `*` and `?` never match `/`.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    text: String,
    negated: bool,
    segments: usize,
    prefix_len: usize,
    matcher: glob::Pattern,
}

impl Pattern {
    /// Parse an include pattern. Blank lines yield `None`.
    pub(crate) fn include(raw: &str) -> Result<Option<Self>> {
        Self::parse(raw, false)
    }

    /// Parse an exclude pattern; a leading `!` marks a negation.
    pub(crate) fn exclude(raw: &str) -> Result<Option<Self>> {
        Self::parse(raw, true)
    }

    fn parse(raw: &str, allow_negation: bool) -> Result<Option<Self>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let (negated, body) = match trimmed.strip_prefix('!') {
            Some(rest) if allow_negation => (true, rest),
            _ => (false, trimmed),
        };
        if body.is_empty() {
            return Err(WalkError::Pattern {
                pattern: raw.to_owned(),
                reason: "negation has nothing to negate".to_owned(),
            });
        }

        let text = clean(body);
        let invalid = |reason: String| WalkError::Pattern {
            pattern: raw.to_owned(),
            reason,
        };
        let translated = to_glob(&text).map_err(|reason| invalid(reason.to_owned()))?;
        let matcher = glob::Pattern::new(&translated).map_err(|e| invalid(e.msg.to_owned()))?;

        Ok(Some(Pattern {
            segments: text.split('/').count(),
            prefix_len: text.find(WILDCARD_CHARS).unwrap_or(text.len()),
            text,
            negated,
            matcher,
        }))
    }

    #[inline]
    pub(crate) fn negated(&self) -> bool {
        self.negated
    }

    /// The literal text before the first wildcard.
    #[inline]
    pub(crate) fn prefix(&self) -> &str {
        &self.text[..self.prefix_len]
    }

    #[inline]
    pub(crate) fn is_match(&self, path: &str) -> bool {
        self.matcher.matches_with(path, MATCH_OPTIONS)
    }

    /// Like [`Pattern::is_match`], but a pattern with `n` segments also
    /// matches any path whose first `n` segments it matches, so `build`
    /// covers `build/out/app`.
    pub(crate) fn matches_path_or_ancestor(&self, path: &str) -> bool {
        if self.is_match(path) {
            return true;
        }
        ancestor_with_segments(path, self.segments).is_some_and(|a| self.is_match(a))
    }

    /// Could any path below `dir` be matched by this pattern, judging by its
    /// literal prefix alone? Errs on the side of `true`.
    pub(crate) fn may_match_below(&self, dir: &str) -> bool {
        prefix_compatible(self.prefix(), dir)
    }
}

/// True when the paths below `dir` and `prefix` agree on their common
/// leading bytes, i.e. some descendant of `dir` could start with `prefix`.
pub(crate) fn prefix_compatible(prefix: &str, dir: &str) -> bool {
    let (prefix, dir) = (prefix.as_bytes(), dir.as_bytes());

    // Descendants all look like "dir/...".
    let common = prefix.len().min(dir.len() + 1);
    let head = &prefix[..common];
    if head.len() <= dir.len() {
        return head == &dir[..head.len()];
    }
    head[..dir.len()] == *dir && head[dir.len()] == b'/'
}

/// The strict ancestor of `path` made of its first `segments` segments.
fn ancestor_with_segments(path: &str, segments: usize) -> Option<&str> {
    let parent = &path[..path.rfind('/')?];

    let mut seen = 0;
    for (i, b) in parent.bytes().enumerate() {
        if b == b'/' {
            seen += 1;
            if seen == segments {
                return Some(&parent[..i]);
            }
        }
    }
    (seen + 1 == segments).then_some(parent)
}

/// Rewrite shell-glob syntax (`\` escapes, `[^...]` classes, `**` inside a
/// segment) into the dialect of the `glob` crate, which matches per
/// character and has no escape character.
fn to_glob(text: &str) -> std::result::Result<String, &'static str> {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or("trailing backslash")?;
                push_literal(&mut out, escaped);
            }
            '[' => push_class(&mut out, &mut chars)?,
            '*' => {
                let mut run = 1;
                while chars.next_if_eq(&'*').is_some() {
                    run += 1;
                }
                // `**` only spans directories as a whole segment.
                let whole_segment = (out.is_empty() || out.ends_with('/'))
                    && chars.peek().is_none_or(|&next| next == '/');
                out.push_str(if run > 1 && whole_segment { "**" } else { "*" });
            }
            _ => push_literal(&mut out, c),
        }
    }
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if GLOB_META.contains(&c) {
        out.push('[');
        out.push(c);
        out.push(']');
    } else {
        out.push(c);
    }
}

/// Copy a `[...]` class whose opening bracket was already consumed.
fn push_class(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> std::result::Result<(), &'static str> {
    let negated = chars.next_if(|&c| c == '!' || c == '^').is_some();

    let mut members = String::new();
    let mut close_bracket = false;
    let mut dash = false;
    let mut first = true;
    loop {
        let c = chars.next().ok_or("unclosed character class")?;
        match c {
            ']' if first => close_bracket = true,
            ']' => break,
            '\\' => match chars.next().ok_or("unclosed character class")? {
                ']' => close_bracket = true,
                '-' => dash = true,
                escaped => members.push(escaped),
            },
            _ => members.push(c),
        }
        first = false;
    }

    // The engine only reads `]` as a member in first position, `-` in last
    // position, and a leading `!` as negation.
    if !negated && !close_bracket && members.starts_with('!') {
        members.remove(0);
        members.push('!');
    }
    out.push('[');
    if negated {
        out.push('!');
    }
    if close_bracket {
        out.push(']');
    }
    out.push_str(&members);
    if dash {
        out.push('-');
    }
    out.push(']');
    Ok(())
}

/// Lexically clean a pattern: drop `.` and empty segments, fold `..` into
/// its parent where possible, and strip leading and trailing slashes. The
/// result is always relative to the walk root.
pub(crate) fn clean(pattern: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in pattern.split('/') {
        match seg {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            _ => parts.push(seg),
        }
    }

    if parts.is_empty() {
        ".".to_owned()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
