use std::fmt;

use crate::{
    enrich::{Enricher, platform_enrichers},
    normalize::PermissionPolicy,
    record::StatRecord,
};

/// Per-record veto applied after filtering. Returning `false` drops the
/// record; a rejected directory is still descended into.
pub type AcceptFn = Box<dyn Fn(&StatRecord) -> bool>;

/// Everything a single walk needs besides the root and the sink.
///
/// Options are consumed by the walk: enrichers keep per-walk state (such as
/// the hardlink table) and must not leak into the next one.
pub struct WalkOptions {
    /// Allow-list globs; `None` or empty admits everything.
    pub include_patterns: Option<Vec<String>>,
    /// Deny-list globs, `!` prefix to re-include; `None` or empty excludes
    /// nothing.
    pub exclude_patterns: Option<Vec<String>>,
    pub accept: Option<AcceptFn>,
    pub enrichers: Vec<Box<dyn Enricher>>,
    pub permissions: PermissionPolicy,
}

impl WalkOptions {
    /// No patterns, no enrichers, host permission policy.
    pub fn bare() -> Self {
        Self {
            enrichers: Vec::new(),
            ..Self::default()
        }
    }

    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_patterns
            .get_or_insert_with(Vec::new)
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .get_or_insert_with(Vec::new)
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn accept(mut self, f: impl Fn(&StatRecord) -> bool + 'static) -> Self {
        self.accept = Some(Box::new(f));
        self
    }

    pub fn enricher(mut self, enricher: impl Enricher + 'static) -> Self {
        self.enrichers.push(Box::new(enricher));
        self
    }

    pub fn permissions(mut self, policy: PermissionPolicy) -> Self {
        self.permissions = policy;
        self
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            include_patterns: None,
            exclude_patterns: None,
            accept: None,
            enrichers: platform_enrichers(),
            permissions: PermissionPolicy::for_host(),
        }
    }
}

impl fmt::Debug for WalkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkOptions")
            .field("include_patterns", &self.include_patterns)
            .field("exclude_patterns", &self.exclude_patterns)
            .field("accept", &self.accept.as_ref().map(|_| "..."))
            .field("enrichers", &self.enrichers.len())
            .field("permissions", &self.permissions)
            .finish()
    }
}
