//! Content rendering.
//!
//! Turns a resolved [`SourceEntry`] into served bytes plus a content type.
//! The dispatch is a closed table over [`Kind`]:
//!
//! | Kind | Strategy | Content type |
//! |------|----------|--------------|
//! | `Page(Html)` | file text verbatim | `text/html` |
//! | `Page(Markdown)` | template capability | `text/html` |
//! | `Page(Template)` | template capability | `text/html` |
//! | `Asset` | raw bytes | guessed from extension, else `application/octet-stream` |
//!
//! Adding a content kind means one new [`PageKind`] variant and one new row
//! in [`strategy_for`].

use crate::classify::{Kind, PageKind, SourceEntry};
use crate::error::SiteError;
use crate::nav::Page;
use crate::template::{RenderContext, TemplateEngine};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const HTML: &str = "text/html";

/// Served payload. Text is produced for pages, bytes for assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

/// Rendered body and its content type. Produced per request or build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub payload: Payload,
    pub content_type: String,
}

impl RenderedOutput {
    pub fn is_text(&self) -> bool {
        matches!(self.payload, Payload::Text(_))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.payload {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self.payload {
            Payload::Text(text) => text.into_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Passthrough,
    Templated,
    Asset,
}

fn strategy_for(kind: Kind) -> Option<Strategy> {
    match kind {
        Kind::Page(PageKind::Html) => Some(Strategy::Passthrough),
        Kind::Page(PageKind::Markdown | PageKind::Template) => Some(Strategy::Templated),
        Kind::Asset => Some(Strategy::Asset),
        Kind::Directory | Kind::Excluded => None,
    }
}

/// Render a resolved entry.
///
/// `tree` is passed as context to template renders.
pub fn render(
    entry: &SourceEntry,
    engine: &dyn TemplateEngine,
    tree: &[Page],
) -> Result<RenderedOutput, SiteError> {
    let Some(strategy) = strategy_for(entry.kind) else {
        return Err(SiteError::NotFound(entry.path.display().to_string()));
    };
    debug!(path = %entry.path.display(), ?strategy, "rendering");

    match strategy {
        Strategy::Passthrough => Ok(RenderedOutput {
            payload: Payload::Text(fs::read_to_string(&entry.path)?),
            content_type: HTML.to_string(),
        }),
        Strategy::Templated => {
            let source = fs::read_to_string(&entry.path)?;
            let text = engine
                .render(&source, &RenderContext { tree })
                .map_err(|message| SiteError::Render {
                    path: entry.path.clone(),
                    message,
                })?;
            Ok(RenderedOutput {
                payload: Payload::Text(text),
                content_type: HTML.to_string(),
            })
        }
        Strategy::Asset => Ok(RenderedOutput {
            payload: Payload::Binary(fs::read(&entry.path)?),
            content_type: guess_content_type(&entry.path),
        }),
    }
}

/// MIME type for a path, from its extension.
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Route;
    use crate::test_helpers::*;

    fn entry(path: &Path, kind: Kind) -> SourceEntry {
        SourceEntry {
            path: path.to_path_buf(),
            kind,
        }
    }

    fn echo(text: &str, _: &RenderContext<'_>) -> Result<String, String> {
        Ok(format!("<rendered>{text}</rendered>"))
    }

    fn failing(_: &str, _: &RenderContext<'_>) -> Result<String, String> {
        Err("unexpected end of input".to_string())
    }

    #[test]
    fn html_is_served_verbatim() {
        let site = SiteFixture::new().file("index.html", "<h1>{{ not rendered }}</h1>");
        let out = render(
            &entry(&site.root().join("index.html"), Kind::Page(PageKind::Html)),
            &failing,
            &[],
        )
        .unwrap();

        assert_eq!(out.payload, Payload::Text("<h1>{{ not rendered }}</h1>".to_string()));
        assert_eq!(out.content_type, "text/html");
    }

    #[test]
    fn markdown_and_templates_go_through_engine() {
        let site = SiteFixture::new()
            .file("about.md", "# About")
            .file("home.j2", "{{ x }}");

        let md = render(
            &entry(&site.root().join("about.md"), Kind::Page(PageKind::Markdown)),
            &echo,
            &[],
        )
        .unwrap();
        let j2 = render(
            &entry(&site.root().join("home.j2"), Kind::Page(PageKind::Template)),
            &echo,
            &[],
        )
        .unwrap();

        assert_eq!(md.payload, Payload::Text("<rendered># About</rendered>".to_string()));
        assert_eq!(j2.payload, Payload::Text("<rendered>{{ x }}</rendered>".to_string()));
        assert_eq!(md.content_type, "text/html");
        assert!(j2.is_text());
    }

    #[test]
    fn engine_receives_navigation_tree() {
        let site = SiteFixture::new().file("home.j2", "");
        let tree = vec![Page {
            name: "about".to_string(),
            uri: Route::new("/about"),
            children: vec![],
        }];
        let engine = |_: &str, ctx: &RenderContext<'_>| -> Result<String, String> {
            Ok(ctx.tree.iter().map(|p| p.uri.to_string()).collect())
        };

        let out = render(
            &entry(&site.root().join("home.j2"), Kind::Page(PageKind::Template)),
            &engine,
            &tree,
        )
        .unwrap();
        assert_eq!(out.as_bytes(), b"/about");
    }

    #[test]
    fn template_failure_is_render_error() {
        let site = SiteFixture::new().file("broken.j2", "{% for %}");
        let err = render(
            &entry(&site.root().join("broken.j2"), Kind::Page(PageKind::Template)),
            &failing,
            &[],
        )
        .unwrap_err();

        match err {
            SiteError::Render { path, message } => {
                assert!(path.ends_with("broken.j2"));
                assert_eq!(message, "unexpected end of input");
            }
            other => panic!("expected render error, got {other:?}"),
        }
    }

    #[test]
    fn assets_are_raw_bytes_with_guessed_type() {
        let site = SiteFixture::new()
            .file("assets/style.css", "body { color: red }")
            .bytes("assets/logo.png", &[0x89, b'P', b'N', b'G']);

        let css = render(&entry(&site.root().join("assets/style.css"), Kind::Asset), &echo, &[])
            .unwrap();
        let png = render(&entry(&site.root().join("assets/logo.png"), Kind::Asset), &echo, &[])
            .unwrap();

        assert_eq!(css.content_type, "text/css");
        assert_eq!(css.payload, Payload::Binary(b"body { color: red }".to_vec()));
        assert_eq!(png.content_type, "image/png");
        assert_eq!(png.as_bytes(), &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        let site = SiteFixture::new().file("data.zzunknown", "x").file("LICENSE", "MIT");
        let unknown = render(&entry(&site.root().join("data.zzunknown"), Kind::Asset), &echo, &[])
            .unwrap();
        let bare = render(&entry(&site.root().join("LICENSE"), Kind::Asset), &echo, &[]).unwrap();
        assert_eq!(unknown.content_type, "application/octet-stream");
        assert_eq!(bare.content_type, "application/octet-stream");
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let site = SiteFixture::new();
        let err = render(
            &entry(&site.root().join("gone.html"), Kind::Page(PageKind::Html)),
            &echo,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, SiteError::Io(_)));
    }

    #[test]
    fn excluded_entries_are_not_rendered() {
        let site = SiteFixture::new().file("_theme/base.html", "");
        let err = render(
            &entry(&site.root().join("_theme/base.html"), Kind::Excluded),
            &echo,
            &[],
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
