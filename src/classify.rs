//! Path classification.
//!
//! Decides, for one filesystem entry under the site root, whether it is a
//! public page, a public asset, or excluded from the site altogether. Every
//! other stage (route enumeration, resolution, navigation) goes through
//! [`classify`] so the live server and the static export share one policy.
//!
//! ## Rules
//!
//! Applied in order, relative to the root:
//!
//! 1. Base name starts with `.` → [`Kind::Excluded`] (dotfiles, `.git/`, config)
//! 2. Any ancestor directory starts with `_` → [`Kind::Excluded`] (`_theme/`, `_site/`)
//! 3. Suffix `.meta` → [`Kind::Excluded`]
//! 4. Suffix `.html`, `.md` or `.j2` → [`Kind::Page`]
//! 5. Any other regular file → [`Kind::Asset`]
//!
//! Directories never become pages or assets. They are [`Kind::Directory`]
//! when the walk may descend into them, and for directories rule 2 also looks
//! at the directory's own name, so `_theme/` itself is excluded.
//!
//! Classification is never cached: the filesystem is the source of truth.

use crate::error::SiteError;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Page sub-kind, one per supported content suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// `.html`: served verbatim.
    Html,
    /// `.md`: passed through the template capability.
    Markdown,
    /// `.j2`: passed through the template capability.
    Template,
}

impl PageKind {
    /// Map a file extension to a page kind, ignoring ASCII case.
    pub fn from_extension(ext: &str) -> Option<PageKind> {
        if ext.eq_ignore_ascii_case("html") {
            Some(PageKind::Html)
        } else if ext.eq_ignore_ascii_case("md") {
            Some(PageKind::Markdown)
        } else if ext.eq_ignore_ascii_case("j2") {
            Some(PageKind::Template)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Page(PageKind),
    Asset,
    /// A directory the walk may descend into.
    Directory,
    /// Never reachable through any public route.
    Excluded,
}

impl Kind {
    pub fn is_page(self) -> bool {
        matches!(self, Kind::Page(_))
    }

    /// Pages and assets: the kinds that back a route.
    pub fn is_public_file(self) -> bool {
        matches!(self, Kind::Page(_) | Kind::Asset)
    }
}

/// A classified filesystem path backing a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub kind: Kind,
}

/// Classify `path`, which is expected to live under `root`.
///
/// Paths outside the root are always excluded. Fails with
/// [`SiteError::NotFound`] if the entry does not exist.
pub fn classify(root: &Path, path: &Path) -> Result<Kind, SiteError> {
    let meta = fs::metadata(path)
        .map_err(|_| SiteError::NotFound(path.display().to_string()))?;
    Ok(classify_with(root, path, meta.is_dir(), meta.is_file()))
}

/// Same rules as [`classify`], for callers that already hold the metadata
/// (a directory walk, for instance).
pub(crate) fn classify_with(root: &Path, path: &Path, is_dir: bool, is_file: bool) -> Kind {
    let Ok(rel) = path.strip_prefix(root) else {
        return Kind::Excluded;
    };
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    // The root itself.
    let Some((name, ancestors)) = parts.split_last() else {
        return if is_dir { Kind::Directory } else { Kind::Excluded };
    };

    if name.starts_with('.') {
        return Kind::Excluded;
    }
    if ancestors.iter().any(|part| part.starts_with('_')) {
        return Kind::Excluded;
    }

    if is_dir {
        return if name.starts_with('_') {
            Kind::Excluded
        } else {
            Kind::Directory
        };
    }

    let ext = path.extension().map(|e| e.to_string_lossy());
    match ext.as_deref() {
        Some(e) if e.eq_ignore_ascii_case("meta") => Kind::Excluded,
        Some(e) => match PageKind::from_extension(e) {
            Some(page) => Kind::Page(page),
            None if is_file => Kind::Asset,
            None => Kind::Excluded,
        },
        None if is_file => Kind::Asset,
        None => Kind::Excluded,
    }
}

/// Whether a directory walk must skip this directory and everything below it.
pub fn is_excluded_dir(root: &Path, dir: &Path) -> bool {
    classify_with(root, dir, true, false) == Kind::Excluded
}
