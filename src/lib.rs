//! # Treesite
//!
//! A file-tree static site generator. The directory you point it at *is* the
//! site: every public file answers exactly one URL route, and the same
//! resolve-and-render path feeds both a live development server and a static
//! export.
//!
//! # Architecture: One Path, Two Consumers
//!
//! ```text
//!             ┌─ enumerate ─→ Route ─┐
//! root/  ─────┤                      ├─→ resolve ─→ SourceEntry ─→ render ─→ RenderedOutput
//!             └─ HTTP request path ──┘                                │
//!                                                 build: write to _site/ ◄┤
//!                                                 serve: HTTP response ◄──┘
//! ```
//!
//! Route enumeration and route resolution are two views of one mapping:
//! every route [`routes::enumerate`] yields resolves back to the file that
//! produced it. The server and the exporter never diverge because neither
//! has its own lookup logic.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`classify`] | Decides whether a path is a page, an asset, a directory, or excluded |
//! | [`routes`] | The [`routes::Route`] type and enumeration of every public route |
//! | [`resolve`] | Route → backing source file, including index and extension lookup |
//! | [`render`] | Source file → bytes plus content type |
//! | [`template`] | Template engine seam and the stock minijinja engine |
//! | [`nav`] | Navigation tree passed to every template |
//! | [`site`] | A loaded site root tying the stages together |
//! | [`build`] | Static export into an output directory |
//! | [`serve`] | Development HTTP server |
//! | [`config`] | `.treesite.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//! | [`error`] | The crate-wide [`error::SiteError`] |
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Site
//!
//! There is no manifest and no front matter. Public files map to routes by
//! path; `index.*` files stand for their directory; page extensions are
//! dropped from the URL. Anything under a directory whose name starts with
//! `_`, any dotfile, and any `.meta` file is never published. The theme
//! directory (`_theme/` by default) and the export directory (`_site/`) live
//! inside the root and are hidden by that same rule.
//!
//! ## Runtime Templates
//!
//! Pages are rendered with [minijinja](https://docs.rs/minijinja) at request
//! time, loading layouts from the theme directory. Site authors edit
//! templates without recompiling anything. Markdown is converted through a
//! `markdown` filter so a theme decides where converted content lands.
//!
//! ## No Caching
//!
//! The dev server resolves and renders on every request. Edits show up on
//! reload without a file watcher. Only the navigation tree is snapshotted when
//! the site is opened.

pub mod build;
pub mod classify;
pub mod config;
pub mod error;
pub mod nav;
pub mod output;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod serve;
pub mod site;
pub mod template;

pub use error::SiteError;
pub use routes::Route;
pub use site::Site;

#[cfg(test)]
pub(crate) mod test_helpers;
