use log::trace;

use crate::{error::Result, excludes::ExcludeMatcher, pattern::Pattern};

/// What the walker should do with one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Build and deliver a record.
    Emit,
    /// No record, but a directory is still descended into.
    Skip,
    /// No record and nothing below a directory is visited.
    PruneSubtree,
}

/// Include and exclude filtering for a single walk.
///
/// Holds per-walk bookkeeping (the last directory that matched an include
/// pattern), so a filter must not be shared between walks.
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    includes: Vec<Pattern>,
    excludes: ExcludeMatcher,
    last_included_dir: Option<String>,
}

impl PatternFilter {
    /// `None` or an empty include list admits everything; `None` or an empty
    /// exclude list rejects nothing.
    pub fn new<S: AsRef<str>>(includes: Option<&[S]>, excludes: Option<&[S]>) -> Result<Self> {
        let mut compiled = Vec::new();
        for raw in includes.unwrap_or_default() {
            if let Some(pattern) = Pattern::include(raw.as_ref())? {
                compiled.push(pattern);
            }
        }

        let excludes = match excludes {
            Some(raw) => ExcludeMatcher::new(raw)?,
            None => ExcludeMatcher::default(),
        };

        Ok(PatternFilter {
            includes: compiled,
            excludes,
            last_included_dir: None,
        })
    }

    /// Decide the fate of `path` (slash-separated, relative to the root).
    /// Entries must be fed in pre-order.
    pub fn decide(&mut self, path: &str, is_dir: bool) -> Verdict {
        match self.include_stage(path, is_dir) {
            Verdict::Emit => self.exclude_stage(path, is_dir),
            verdict => verdict,
        }
    }

    fn include_stage(&mut self, path: &str, is_dir: bool) -> Verdict {
        if self.includes.is_empty() || self.inside_included_dir(path) {
            return Verdict::Emit;
        }

        if self.includes.iter().any(|p| p.is_match(path)) {
            if is_dir {
                self.last_included_dir = Some(path.to_owned());
            }
            return Verdict::Emit;
        }

        if !is_dir {
            return Verdict::Skip;
        }

        // A directory on the way to a possible match is kept, and emitted so
        // consumers see the parents of the matches below it.
        if self.includes.iter().any(|p| p.may_match_below(path)) {
            Verdict::Emit
        } else {
            trace!("[filter] no include pattern can match below {path}");
            Verdict::PruneSubtree
        }
    }

    fn exclude_stage(&self, path: &str, is_dir: bool) -> Verdict {
        if self.excludes.is_empty() || !self.excludes.is_excluded(path) {
            return Verdict::Emit;
        }

        if !is_dir {
            return Verdict::Skip;
        }

        if self.excludes.has_negations() && self.excludes.negation_may_reach_below(path) {
            Verdict::Skip
        } else {
            Verdict::PruneSubtree
        }
    }

    fn inside_included_dir(&self, path: &str) -> bool {
        self.last_included_dir.as_deref().is_some_and(|dir| {
            path.len() > dir.len() && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
        })
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
