//! Template capability.
//!
//! The renderer treats templating as an opaque capability: template text and
//! a context go in, a string comes out. [`TemplateEngine`] is that seam.
//! [`JinjaEngine`] is the stock implementation, built on MiniJinja.
//!
//! ## What the Jinja engine provides
//!
//! - Templates under the theme directory (`_theme/` by default) are loadable
//!   by name, so pages can `{% extends "base.html" %}` or `{% include %}`.
//! - A built-in `navigation` template renders the navigation tree as nested
//!   `<ul>` lists: `{% include "navigation" %}`.
//! - A `markdown` filter converts Markdown with pulldown-cmark. The core never
//!   parses Markdown itself; a `.md` page opts in with
//!   `{% filter markdown %}...{% endfilter %}`, usually inside a theme block.
//! - Theme templates named `*.html` or `*.xml` are auto-escaped. Page text
//!   rendered from a string is not.
//!
//! Closures with the right signature are engines too, which keeps tests and
//! embedders free of any theme setup.

use crate::nav::Page;
use minijinja::{AutoEscape, Environment, Value, context, path_loader};
use pulldown_cmark::{Options, Parser, html};
use std::path::Path;

/// Context handed to every template render.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Site-wide navigation tree.
    pub tree: &'a [Page],
}

/// Renders template text against a context.
///
/// Failures are reported as a message; the renderer wraps them in
/// [`SiteError::Render`](crate::error::SiteError::Render) with the page path.
pub trait TemplateEngine {
    fn render(&self, template: &str, context: &RenderContext<'_>) -> Result<String, String>;
}

impl<F> TemplateEngine for F
where
    F: Fn(&str, &RenderContext<'_>) -> Result<String, String>,
{
    fn render(&self, template: &str, context: &RenderContext<'_>) -> Result<String, String> {
        self(template, context)
    }
}

const NAVIGATION: &str = r#"<ul>
{%- for page in tree recursive %}
    <li>
        <a href="{{ page.uri|urlencode }}">{{ page.name|e }}</a>
        {%- if page.children -%}
            <ul>{{ loop(page.children) }}</ul>
        {%- endif %}
    </li>
{%- endfor %}
</ul>"#;

/// MiniJinja-backed engine with a theme directory loader.
pub struct JinjaEngine {
    env: Environment<'static>,
}

impl JinjaEngine {
    /// Fails only if the built-in templates do not compile.
    pub fn new(theme_dir: &Path) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_loader(path_loader(theme_dir.to_path_buf()));
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".html") || name.ends_with(".xml") {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        env.add_filter("markdown", markdown_filter);
        env.add_template("navigation", NAVIGATION)?;
        Ok(Self { env })
    }
}

impl TemplateEngine for JinjaEngine {
    fn render(&self, template: &str, context: &RenderContext<'_>) -> Result<String, String> {
        self.env
            .render_str(template, context! { tree => context.tree })
            .map_err(|err| {
                let mut message = err.to_string();
                let mut source = std::error::Error::source(&err);
                while let Some(cause) = source {
                    message.push_str(&format!(": {cause}"));
                    source = std::error::Error::source(cause);
                }
                message
            })
    }
}

fn markdown_filter(text: &str) -> Value {
    let parser = Parser::new_ext(text, Options::all());
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    Value::from_safe_string(out)
}
