//! Route enumeration.
//!
//! Walks the site root and yields every public route. The walk is lazy and
//! never memoized: each call to [`enumerate`] re-reads the filesystem, so a
//! long-running server always sees the current tree.
//!
//! ## Mapping
//!
//! ```text
//! root/index.html            →  /
//! root/blog/index.md         →  /blog
//! root/about.md              →  /about
//! root/blog/first-post.j2    →  /blog/first-post
//! root/assets/style.css      →  /assets/style.css
//! root/_theme/base.html      →  (none: private)
//! root/notes.meta            →  (none: metadata)
//! ```
//!
//! Siblings are visited in file-name order, so the sequence is deterministic
//! for a fixed filesystem state. When two files claim the same route
//! (`about.md` next to `about/index.html`) the first one in walk order wins
//! and the duplicate is logged, not yielded.

use crate::classify::{Kind, classify_with, is_excluded_dir};
use crate::error::SiteError;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A public URI path. Always starts with `/`, never ends with one (except
/// for the root route itself), and never contains empty, `.` or `..`
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    pub fn root() -> Route {
        Route("/".to_string())
    }

    /// Normalize a raw request path into a route.
    ///
    /// Duplicate and trailing slashes are dropped, `.` segments are ignored
    /// and `..` pops the previous segment without ever climbing above `/`.
    pub fn new(raw: &str) -> Route {
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
        Route(format!("/{}", segments.join("/")))
    }

    /// Build a route from a path relative to the site root.
    pub fn from_relative(rel: &Path) -> Route {
        let segments: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Route(format!("/{}", segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The route without its leading slash, as a relative filesystem path.
    pub fn to_relative_path(&self) -> PathBuf {
        self.0.split('/').filter(|s| !s.is_empty()).collect()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Route {
    fn from(raw: &str) -> Self {
        Route::new(raw)
    }
}

/// The route a classified file is published under, if any.
///
/// Pages lose their extension and `index.*` pages collapse onto their
/// directory; assets keep their full relative path.
pub fn route_for(root: &Path, path: &Path, kind: Kind) -> Option<Route> {
    let rel = path.strip_prefix(root).ok()?;
    match kind {
        Kind::Page(_) => {
            if path.file_stem()? == "index" {
                Some(Route::from_relative(rel.parent()?))
            } else {
                Some(Route::from_relative(&rel.with_extension("")))
            }
        }
        Kind::Asset => Some(Route::from_relative(rel)),
        Kind::Directory | Kind::Excluded => None,
    }
}

/// Enumerate every public route under `root`.
pub fn enumerate(root: &Path) -> Routes {
    Routes {
        root: root.to_path_buf(),
        walker: WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter(),
        seen: HashSet::new(),
    }
}

/// Lazy iterator returned by [`enumerate`].
pub struct Routes {
    root: PathBuf,
    walker: walkdir::IntoIter,
    seen: HashSet<Route>,
}

impl Iterator for Routes {
    type Item = Result<Route, SiteError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err.into())),
            };
            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();
            let kind = classify_with(
                &self.root,
                entry.path(),
                file_type.is_dir(),
                file_type.is_file(),
            );

            if !kind.is_public_file() {
                if file_type.is_dir() && is_excluded_dir(&self.root, entry.path()) {
                    debug!(path = %entry.path().display(), "skipping excluded directory");
                    self.walker.skip_current_dir();
                }
                continue;
            }

            let Some(route) = route_for(&self.root, entry.path(), kind) else {
                continue;
            };
            if !self.seen.insert(route.clone()) {
                warn!(
                    %route,
                    path = %entry.path().display(),
                    "route already claimed by an earlier file, skipping"
                );
                continue;
            }
            return Some(Ok(route));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_index_maps_to_slash() {
        let site = SiteFixture::new().file("index.html", "<h1>home</h1>");
        assert_eq!(sorted_routes(site.root()), vec!["/"]);
    }

    #[test]
    fn nested_index_maps_to_directory() {
        let site = SiteFixture::new()
            .file("blog/index.md", "")
            .file("blog/deep/index.j2", "");
        assert_eq!(sorted_routes(site.root()), vec!["/blog", "/blog/deep"]);
    }

    #[test]
    fn pages_lose_extension_assets_keep_it() {
        let site = SiteFixture::new()
            .file("about.md", "")
            .file("blog/first-post.j2", "")
            .file("assets/style.css", "")
            .file("assets/logo.png", "");
        assert_eq!(
            sorted_routes(site.root()),
            vec![
                "/about",
                "/assets/logo.png",
                "/assets/style.css",
                "/blog/first-post",
            ]
        );
    }

    #[test]
    fn excluded_entries_never_produce_routes() {
        let site = SiteFixture::new()
            .file("index.html", "")
            .file("_theme/base.html", "")
            .file("_theme/nested/partial.j2", "")
            .file(".hidden.html", "")
            .file(".git/config", "")
            .file("gallery/photo.jpg.meta", "")
            .file("gallery/photo.jpg", "");
        assert_eq!(sorted_routes(site.root()), vec!["/", "/gallery/photo.jpg"]);
    }

    #[test]
    fn duplicate_route_is_yielded_once() {
        let site = SiteFixture::new()
            .file("about.md", "")
            .file("about/index.html", "");
        assert_eq!(sorted_routes(site.root()), vec!["/about"]);
    }

    #[test]
    fn enumeration_is_restartable() {
        let site = SiteFixture::new().file("a.md", "").file("b.md", "");
        let first = sorted_routes(site.root());

        std::fs::write(site.root().join("c.md"), "").unwrap();
        let second = sorted_routes(site.root());

        assert_eq!(first, vec!["/a", "/b"]);
        assert_eq!(second, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn enumeration_order_is_deterministic() {
        let site = SiteFixture::new()
            .file("z.md", "")
            .file("a/index.html", "")
            .file("m.css", "");
        let first: Vec<Route> = enumerate(site.root()).map(Result::unwrap).collect();
        let second: Vec<Route> = enumerate(site.root()).map(Result::unwrap).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_root_has_no_routes() {
        let site = SiteFixture::new();
        assert!(sorted_routes(site.root()).is_empty());
    }

    // =========================================================================
    // Route normalization
    // =========================================================================

    #[test]
    fn route_new_normalizes_slashes() {
        assert_eq!(Route::new("").as_str(), "/");
        assert_eq!(Route::new("/").as_str(), "/");
        assert_eq!(Route::new("//blog///post/").as_str(), "/blog/post");
        assert_eq!(Route::new("about").as_str(), "/about");
    }

    #[test]
    fn route_new_never_climbs_above_root() {
        assert_eq!(Route::new("/../../etc/passwd").as_str(), "/etc/passwd");
        assert_eq!(Route::new("/blog/./../about").as_str(), "/about");
    }

    #[test]
    fn route_relative_path_drops_leading_slash() {
        assert_eq!(
            Route::new("/assets/style.css").to_relative_path(),
            PathBuf::from("assets").join("style.css")
        );
        assert_eq!(Route::root().to_relative_path(), PathBuf::new());
    }
}
