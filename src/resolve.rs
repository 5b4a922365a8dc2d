//! Route resolution.
//!
//! Maps a requested route back to the one source file that answers it. The
//! lookup runs in two stages:
//!
//! 1. **Directory → index**: a route naming a directory is answered by the
//!    directory's `index.*` page (`/blog` → `blog/index.html`).
//! 2. **Extensionless → page**: a route naming no public file is answered by
//!    a sibling page with the same stem (`/about` → `about.md`). An excluded
//!    file of that name does not block the lookup: `/notes.meta` finds
//!    `notes.meta.md` even next to `notes.meta`.
//!
//! Paths that cannot exist at all (overlong or NUL-carrying segments) are
//! plain misses, not I/O failures.
//!
//! Asset routes always carry their real extension, so they name an existing
//! file and pass straight through both stages.
//!
//! ## Ambiguity
//!
//! When several pages match (`index.html` and `index.md` in one directory, or
//! `about.md` next to `about.j2`) the lexicographically first file name wins
//! and the collision is logged. Route enumeration walks siblings in the same
//! order, so an enumerated route always resolves to the file it came from.
//!
//! Every call touches the filesystem. There is no cache to go stale.

use crate::classify::{Kind, SourceEntry, classify, classify_with};
use crate::error::SiteError;
use crate::routes::Route;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Locate the source file answering `route` under `root`.
///
/// Fails with [`SiteError::NotFound`] when nothing answers the route or when
/// the only candidate is excluded (private, hidden, or metadata).
pub fn resolve(root: &Path, route: &Route) -> Result<SourceEntry, SiteError> {
    let not_found = || SiteError::NotFound(route.to_string());
    let mut candidate = root.join(route.to_relative_path());

    if candidate.is_dir()
        && let Some(index) = first_page_named(root, &candidate, "index")?
    {
        candidate = index;
    }

    // An excluded file (`notes.meta`) must not shadow a page whose stem
    // carries the same name (`notes.meta.md`).
    let is_public_file = candidate.is_file() && classify(root, &candidate)?.is_public_file();
    if !is_public_file {
        if candidate == root {
            return Err(not_found());
        }
        let (Some(parent), Some(name)) = (candidate.parent(), candidate.file_name()) else {
            return Err(not_found());
        };
        let name = name.to_string_lossy().into_owned();
        candidate = first_page_named(root, parent, &name)?.ok_or_else(not_found)?;
    }

    let kind = classify(root, &candidate)?;
    if !kind.is_public_file() {
        return Err(not_found());
    }

    debug!(%route, path = %candidate.display(), ?kind, "resolved");
    Ok(SourceEntry {
        path: candidate,
        kind,
    })
}

/// The lexicographically first public page in `dir` whose stem is `stem`.
///
/// Only single-extension matches count: `about.md` matches `about`, while
/// `about.old.md` does not (its own route is `/about.old`).
fn first_page_named(root: &Path, dir: &Path, stem: &str) -> Result<Option<PathBuf>, SiteError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if cannot_exist(err.kind()) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some() && p.file_stem().is_some_and(|s| s == stem))
        .filter(|p| p.is_file() && classify_with(root, p, false, true).is_page())
        .collect();
    matches.sort();

    if matches.len() > 1 {
        warn!(
            dir = %dir.display(),
            stem,
            candidates = ?matches,
            "several pages match, using the first by name"
        );
    }
    Ok(matches.into_iter().next())
}

/// Errors meaning the directory is absent or could never exist, as opposed
/// to one that exists but cannot be read.
fn cannot_exist(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::NotFound
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::InvalidFilename
            | io::ErrorKind::InvalidInput
    )
}
