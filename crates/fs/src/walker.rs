use std::{
    ffi::OsString,
    fs::Metadata,
    path::{Path, PathBuf},
    vec,
};

use log::{debug, trace, warn};

use crate::{
    cancel::CancellationToken,
    config::{AcceptFn, WalkOptions},
    enrich::Enricher,
    error::{BoxError, Result, WalkError, is_vanished},
    filter::{PatternFilter, Verdict},
    fsys::{OsFs, WalkFs},
    normalize::{PermissionPolicy, normalize},
    record::StatRecord,
    resolve::resolve_root_with,
};

/// Counters describing a finished walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    /// Entries below the root that were stat'ed.
    pub visited: usize,
    pub emitted: usize,
    /// Filtered out without pruning (directories were still descended).
    pub skipped: usize,
    pub pruned: usize,
    /// Dropped by the accept hook.
    pub rejected: usize,
    /// Gone between listing and stat.
    pub vanished: usize,
    /// Names that are not valid UTF-8; dropped along with their subtrees.
    pub invalid_names: usize,
}

/// Walk `root` on the host filesystem, handing every surviving record to
/// `sink` in lexical pre-order. The root itself is never emitted.
pub fn walk<S>(
    root: impl AsRef<Path>,
    options: WalkOptions,
    cancel: &CancellationToken,
    sink: S,
) -> Result<WalkStats>
where
    S: FnMut(&str, &StatRecord) -> std::result::Result<(), BoxError>,
{
    Walker::new().run(root.as_ref(), options, cancel, sink)
}

/// Single-threaded tree walker over a [`WalkFs`].
#[derive(Debug, Default, Clone)]
pub struct Walker<F = OsFs> {
    fs: F,
}

impl Walker<OsFs> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: WalkFs> Walker<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn run<S>(
        &self,
        root: &Path,
        options: WalkOptions,
        cancel: &CancellationToken,
        sink: S,
    ) -> Result<WalkStats>
    where
        S: FnMut(&str, &StatRecord) -> std::result::Result<(), BoxError>,
    {
        let root = resolve_root_with(&self.fs, root)?;

        let WalkOptions {
            include_patterns,
            exclude_patterns,
            accept,
            enrichers,
            permissions,
        } = options;
        let filter = PatternFilter::new(include_patterns.as_deref(), exclude_patterns.as_deref())?;

        debug!("[walk] starting at {}", root.display());

        let mut pass = Pass {
            fs: &self.fs,
            filter,
            accept,
            enrichers,
            permissions,
            cancel,
            sink,
            stats: WalkStats::default(),
        };
        pass.traverse(root)?;

        debug!("[walk] finished: {:?}", pass.stats);
        Ok(pass.stats)
    }
}

/// A directory whose entries are being visited.
struct Frame {
    dir: PathBuf,
    rel: String,
    names: vec::IntoIter<OsString>,
}

/// State owned by one traversal.
struct Pass<'a, F, S> {
    fs: &'a F,
    filter: PatternFilter,
    accept: Option<AcceptFn>,
    enrichers: Vec<Box<dyn Enricher>>,
    permissions: PermissionPolicy,
    cancel: &'a CancellationToken,
    sink: S,
    stats: WalkStats,
}

impl<F, S> Pass<'_, F, S>
where
    F: WalkFs,
    S: FnMut(&str, &StatRecord) -> std::result::Result<(), BoxError>,
{
    fn traverse(&mut self, root: PathBuf) -> Result<()> {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.open_dir(root, String::new())? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(name) = frame.names.next() else {
                stack.pop();
                continue;
            };

            let Some(rel) = join_rel(&frame.rel, &name) else {
                warn!(
                    "[walk] skipping non UTF-8 name {:?} in {}",
                    name,
                    frame.dir.display()
                );
                self.stats.invalid_names += 1;
                continue;
            };
            let full = frame.dir.join(&name);

            if self.visit(&full, &rel)?
                && let Some(child) = self.open_dir(full, rel)?
            {
                stack.push(child);
            }
        }
        Ok(())
    }

    /// List a directory we are about to descend into. Names are sorted so
    /// the walk order is lexical.
    fn open_dir(&mut self, dir: PathBuf, rel: String) -> Result<Option<Frame>> {
        self.cancel.check()?;

        let mut names = match self.fs.read_dir_names(&dir) {
            Ok(names) => names,
            Err(e) if is_vanished(&e) && !rel.is_empty() => {
                trace!("[walk] directory vanished before listing: {rel}");
                self.stats.vanished += 1;
                return Ok(None);
            }
            Err(source) => return Err(WalkError::io(dir, source)),
        };
        names.sort_unstable();

        Ok(Some(Frame {
            dir,
            rel,
            names: names.into_iter(),
        }))
    }

    /// Handle one entry. Returns whether the walk should descend into it.
    fn visit(&mut self, full: &Path, rel: &str) -> Result<bool> {
        let meta = match self.fs.symlink_metadata(full) {
            Ok(meta) => meta,
            Err(e) if is_vanished(&e) => {
                trace!("[walk] entry vanished before stat: {rel}");
                self.stats.vanished += 1;
                return Ok(false);
            }
            Err(source) => return Err(WalkError::io(full, source)),
        };
        self.stats.visited += 1;

        // Symlinks are never followed, so only real directories are walked.
        let is_dir = meta.is_dir();

        match self.filter.decide(rel, is_dir) {
            Verdict::PruneSubtree => {
                trace!("[walk] pruned {rel}");
                self.stats.pruned += 1;
                return Ok(false);
            }
            Verdict::Skip => {
                self.stats.skipped += 1;
                return Ok(is_dir);
            }
            Verdict::Emit => {}
        }

        let Some(record) = self.build_record(full, rel, &meta)? else {
            return Ok(false);
        };

        self.cancel.check()?;

        if let Some(accept) = &self.accept
            && !accept(&record)
        {
            self.stats.rejected += 1;
            return Ok(is_dir);
        }

        (self.sink)(&record.path, &record).map_err(|source| WalkError::Sink {
            path: record.path.clone(),
            source,
        })?;
        self.stats.emitted += 1;

        Ok(is_dir)
    }

    /// Normalize and enrich. `None` means the entry vanished midway.
    fn build_record(&mut self, full: &Path, rel: &str, meta: &Metadata) -> Result<Option<StatRecord>> {
        let mut record = match normalize(self.fs, full, rel, meta, self.permissions) {
            Ok(record) => record,
            Err(e) if is_vanished(&e) => {
                self.stats.vanished += 1;
                return Ok(None);
            }
            Err(source) => return Err(WalkError::io(full, source)),
        };

        for enricher in &mut self.enrichers {
            match enricher.enrich(full, meta, &mut record) {
                Ok(()) => {}
                Err(e) if is_vanished(&e) => {
                    trace!("[walk] entry vanished while loading metadata: {rel}");
                    self.stats.vanished += 1;
                    return Ok(None);
                }
                Err(source) => {
                    return Err(WalkError::Metadata {
                        path: rel.to_owned(),
                        source,
                    });
                }
            }
        }

        Ok(Some(record))
    }
}

/// Append `name` to a slash-separated relative path. `None` when the name
/// is not valid UTF-8.
fn join_rel(parent: &str, name: &OsString) -> Option<String> {
    let name = name.to_str()?;
    if parent.is_empty() {
        return Some(name.to_owned());
    }

    let mut rel = String::with_capacity(parent.len() + 1 + name.len());
    rel.push_str(parent);
    rel.push('/');
    rel.push_str(name);
    Some(rel)
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
