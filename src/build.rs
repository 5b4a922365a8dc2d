//! Static export.
//!
//! Materializes every route of a [`Site`] into an output directory, using the
//! exact resolve and render path the dev server uses, so export and live
//! serving agree byte for byte.
//!
//! ## Output Structure
//!
//! ```text
//! _site/
//! ├── index.html               # route /
//! ├── about/index.html         # route /about        (page: text output)
//! ├── blog/index.html          # route /blog
//! ├── blog/first-post/index.html
//! └── assets/style.css         # route /assets/style.css (asset: raw bytes)
//! ```
//!
//! The output directory is deleted first, recursively. There is no
//! partial-failure recovery: the first resolve, render or write error aborts
//! the build and leaves the directory half-populated. Re-running `build`
//! starts from a clean slate.

use crate::error::SiteError;
use crate::render::RenderedOutput;
use crate::routes::Route;
use crate::site::Site;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One route written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenRoute {
    pub route: Route,
    pub source: PathBuf,
    pub output: PathBuf,
}

/// What a completed build wrote, pages and assets in route order.
#[derive(Debug, Default, Serialize)]
pub struct BuildSummary {
    pub output_dir: PathBuf,
    pub pages: Vec<WrittenRoute>,
    pub assets: Vec<WrittenRoute>,
}

impl BuildSummary {
    pub fn total(&self) -> usize {
        self.pages.len() + self.assets.len()
    }
}

/// Export every route of `site` into `output_dir`.
///
/// Fails with [`SiteError::InvalidOutput`] if cleaning `output_dir` would
/// delete the site root.
pub fn build(site: &Site, output_dir: &Path) -> Result<BuildSummary, SiteError> {
    let output_dir = absolute_output_dir(output_dir)?;
    if site.root().starts_with(&output_dir) {
        return Err(SiteError::InvalidOutput(output_dir));
    }

    if output_dir.exists() {
        info!(output = %output_dir.display(), "cleaning output directory");
        fs::remove_dir_all(&output_dir)?;
    }
    fs::create_dir_all(&output_dir)?;

    // Snapshot before writing anything: an output directory inside the root
    // must never feed the walk.
    let mut routes: Vec<Route> = site.routes().collect::<Result<_, _>>()?;
    routes.sort();

    let mut summary = BuildSummary {
        output_dir: output_dir.clone(),
        ..BuildSummary::default()
    };

    for route in routes {
        let entry = site.resolve(&route)?;
        let rendered = site.render(&entry)?;
        let target = output_path(&output_dir, &route, &rendered);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, rendered.as_bytes())?;
        debug!(%route, output = %target.display(), "wrote");

        let written = WrittenRoute {
            route,
            source: entry.path,
            output: target,
        };
        if rendered.is_text() {
            summary.pages.push(written);
        } else {
            summary.assets.push(written);
        }
    }

    info!(
        pages = summary.pages.len(),
        assets = summary.assets.len(),
        output = %output_dir.display(),
        "build complete"
    );
    Ok(summary)
}

/// Where a rendered route lands: `<route>/index.html` for text,
/// `<route>` for binary payloads.
pub fn output_path(output_dir: &Path, route: &Route, rendered: &RenderedOutput) -> PathBuf {
    let base = output_dir.join(route.to_relative_path());
    if rendered.is_text() {
        base.join("index.html")
    } else {
        base
    }
}

fn absolute_output_dir(output_dir: &Path) -> Result<PathBuf, SiteError> {
    if output_dir.exists() {
        Ok(output_dir.canonicalize()?)
    } else {
        Ok(std::path::absolute(output_dir)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Payload;
    use crate::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn text() -> RenderedOutput {
        RenderedOutput {
            payload: Payload::Text(String::new()),
            content_type: "text/html".to_string(),
        }
    }

    fn binary() -> RenderedOutput {
        RenderedOutput {
            payload: Payload::Binary(Vec::new()),
            content_type: "text/css".to_string(),
        }
    }

    #[test]
    fn output_path_layout() {
        let out = Path::new("/out");
        assert_eq!(
            output_path(out, &Route::root(), &text()),
            PathBuf::from("/out/index.html")
        );
        assert_eq!(
            output_path(out, &Route::new("/blog/post"), &text()),
            PathBuf::from("/out/blog/post/index.html")
        );
        assert_eq!(
            output_path(out, &Route::new("/assets/style.css"), &binary()),
            PathBuf::from("/out/assets/style.css")
        );
    }

    #[test]
    fn build_writes_pages_and_assets() {
        let fixture = SiteFixture::new()
            .file("index.html", "<h1>Home</h1>")
            .file("about.md", "About {{ tree|length }}")
            .file("blog/index.html", "<h1>Blog</h1>")
            .file("assets/style.css", "body {}")
            .file("_theme/base.html", "private");
        let site = fixture.open();
        let out = fixture.root().join("_site");

        let summary = build(&site, &out).unwrap();

        assert_eq!(read(&out.join("index.html")), "<h1>Home</h1>");
        assert_eq!(read(&out.join("about/index.html")), "About 3");
        assert_eq!(read(&out.join("blog/index.html")), "<h1>Blog</h1>");
        assert_eq!(read(&out.join("assets/style.css")), "body {}");
        assert!(!out.join("_theme").exists());
        assert_eq!(summary.pages.len(), 3);
        assert_eq!(summary.assets.len(), 1);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn build_cleans_previous_output() {
        let fixture = SiteFixture::new().file("index.html", "home");
        let site = fixture.open();
        let out = fixture.root().join("_site");
        fs::create_dir_all(out.join("stale")).unwrap();
        fs::write(out.join("stale/index.html"), "old").unwrap();

        build(&site, &out).unwrap();

        assert!(!out.join("stale").exists());
        assert!(out.join("index.html").exists());
    }

    #[test]
    fn build_outside_root() {
        let fixture = SiteFixture::new().file("site/index.html", "home");
        let site = Site::open(fixture.root().join("site")).unwrap();
        let out = fixture.root().join("dist");

        build(&site, &out).unwrap();
        assert_eq!(read(&out.join("index.html")), "home");
    }

    #[test]
    fn refuses_to_clean_the_root() {
        let fixture = SiteFixture::new().file("site/index.html", "home");
        let site = Site::open(fixture.root().join("site")).unwrap();

        let same = build(&site, site.root());
        let parent = build(&site, fixture.root());

        assert!(matches!(same, Err(SiteError::InvalidOutput(_))));
        assert!(matches!(parent, Err(SiteError::InvalidOutput(_))));
        assert!(site.root().join("index.html").exists());
    }

    #[test]
    fn render_failure_aborts_build() {
        let fixture = SiteFixture::new()
            .file("a.html", "fine")
            .file("b.j2", "{% for %}");
        let site = fixture.open();
        let out = fixture.root().join("_site");

        let err = build(&site, &out).unwrap_err();
        assert!(matches!(err, SiteError::Render { .. }));
        // Routes are processed in order, so /a made it out before /b failed.
        assert!(out.join("a/index.html").exists());
    }
}
