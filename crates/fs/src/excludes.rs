use crate::{error::Result, pattern::Pattern};

/// Ordered deny-list with `!` re-inclusion rules.
///
/// Every pattern is evaluated in order and the last one that matches decides:
/// a plain pattern excludes, a negated one re-includes.
#[derive(Debug, Clone, Default)]
pub struct ExcludeMatcher {
    patterns: Vec<Pattern>,
    has_negations: bool,
}

impl ExcludeMatcher {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(raw.len());
        for p in raw {
            if let Some(pattern) = Pattern::exclude(p.as_ref())? {
                patterns.push(pattern);
            }
        }
        let has_negations = patterns.iter().any(Pattern::negated);

        Ok(ExcludeMatcher {
            patterns,
            has_negations,
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[inline]
    pub fn has_negations(&self) -> bool {
        self.has_negations
    }

    /// Whether `path` is excluded.
    pub fn is_excluded(&self, path: &str) -> bool {
        let mut excluded = false;
        for pattern in &self.patterns {
            if pattern.matches_path_or_ancestor(path) {
                excluded = !pattern.negated();
            }
        }
        excluded
    }

    /// Whether some negation could re-include a path below `dir`. When this
    /// is false an excluded directory can be pruned outright.
    pub fn negation_may_reach_below(&self, dir: &str) -> bool {
        self.patterns
            .iter()
            .filter(|p| p.negated())
            .any(|p| p.may_match_below(dir))
    }
}

#[cfg(test)]
#[path = "excludes_tests.rs"]
mod tests;
