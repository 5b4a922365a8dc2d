//! Navigation tree.
//!
//! Turns the public directory structure into a hierarchy of [`Page`] nodes
//! that templates can walk to render site-wide menus. The tree is built once
//! per site load from a fresh directory listing and is read-only afterwards.
//!
//! ## Shape
//!
//! ```text
//! root/
//! ├── index.html          # absorbed by the root route, not a node
//! ├── about.md            → Page { name: "about", uri: "/about" }
//! ├── blog/               → Page { name: "blog",  uri: "/blog", children: [...] }
//! │   ├── index.md        # absorbed by /blog
//! │   └── first-post.j2   →     Page { name: "first-post", uri: "/blog/first-post" }
//! ├── assets/             → Page { name: "assets", uri: "/assets" }
//! │   └── style.css       # assets are not navigation targets
//! └── _theme/             # private: never a node
//! ```
//!
//! Every non-excluded directory becomes a page, whether or not anything
//! below it is a page. Content files other than `index.*` become leaf pages.
//! Siblings are ordered by file name.

use crate::classify::{Kind, classify_with};
use crate::error::SiteError;
use crate::routes::{Route, route_for};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Navigation node for one directory or content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// File stem for content files, directory name for directories.
    pub name: String,
    pub uri: Route,
    #[serde(default)]
    pub children: Vec<Page>,
}

impl Page {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Build the navigation tree for `root`.
pub fn build_tree(root: &Path) -> Result<Vec<Page>, SiteError> {
    build_level(root, root)
}

/// Pages for the contents of `dir`.
fn build_level(root: &Path, dir: &Path) -> Result<Vec<Page>, SiteError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();

    let mut pages = Vec::new();

    for path in entries {
        let kind = classify_with(root, &path, path.is_dir(), path.is_file());
        match kind {
            Kind::Directory => {
                let children = build_level(root, &path)?;
                let Ok(rel) = path.strip_prefix(root) else {
                    continue;
                };
                pages.push(Page {
                    name: file_name(&path),
                    uri: Route::from_relative(rel),
                    children,
                });
            }
            Kind::Page(_) => {
                if path.file_stem().is_some_and(|s| s == "index") {
                    continue;
                }
                let Some(uri) = route_for(root, &path, kind) else {
                    continue;
                };
                pages.push(Page {
                    name: path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    uri,
                    children: Vec::new(),
                });
            }
            Kind::Asset | Kind::Excluded => {}
        }
    }

    Ok(pages)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
