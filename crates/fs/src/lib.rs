//! Ordered, filtered metadata walks of a directory tree.
//!
//! [`walk`] resolves a root, visits everything below it in lexical pre-order
//! and hands one [`StatRecord`] per surviving entry to a sink. Include and
//! exclude globs decide what survives; directories that provably cannot
//! contain a surviving entry are never listed.

mod cancel;
mod config;
mod enrich;
mod error;
mod excludes;
mod filter;
mod fsys;
mod normalize;
mod pattern;
mod record;
mod resolve;
mod walker;

pub use cancel::CancellationToken;
pub use config::{AcceptFn, WalkOptions};
#[cfg(unix)]
pub use enrich::{UnixIdentity, Xattrs};
pub use enrich::{Enricher, platform_enrichers};
pub use error::{BoxError, Result, WalkError};
pub use excludes::ExcludeMatcher;
pub use filter::{PatternFilter, Verdict};
pub use fsys::{OsFs, WalkFs};
pub use normalize::PermissionPolicy;
pub use record::{FileMode, StatRecord};
pub use resolve::resolve_root;
pub use walker::{WalkStats, Walker, walk};
