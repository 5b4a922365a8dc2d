//! Shared test utilities for the treesite test suite.
//!
//! Provides a temp-dir site builder and a few extractors so tests can describe
//! a content tree inline and assert on routes without boilerplate.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fixture = SiteFixture::new()
//!     .file("index.html", "<h1>Home</h1>")
//!     .file("blog/first-post.md", "# First");
//!
//! assert_eq!(sorted_routes(fixture.root()), vec!["/", "/blog/first-post"]);
//! let site = fixture.open();
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::routes::enumerate;
use crate::site::Site;

// =========================================================================
// Fixture setup
// =========================================================================

/// A site root in a temp directory, removed on drop.
pub struct SiteFixture {
    dir: TempDir,
}

impl SiteFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write a text file at `rel`, creating parent directories.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        self.bytes(rel, contents.as_bytes())
    }

    /// Write a binary file at `rel`, creating parent directories.
    pub fn bytes(self, rel: &str, contents: &[u8]) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        self
    }

    /// Create an empty directory at `rel`.
    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(rel)).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Open the fixture as a site with the stock engine. Panics on failure.
    pub fn open(&self) -> Site {
        Site::open(self.root()).unwrap_or_else(|e| panic!("failed to open fixture site: {e}"))
    }
}

// =========================================================================
// Extractors
// =========================================================================

/// All routes under `root` as sorted strings.
pub fn sorted_routes(root: &Path) -> Vec<String> {
    let mut routes: Vec<String> = enumerate(root)
        .map(|r| r.unwrap().as_str().to_string())
        .collect();
    routes.sort();
    routes
}

/// Read a text file. Panics with the path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}
