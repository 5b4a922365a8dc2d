//! CLI output formatting.
//!
//! Output is route-centric: every line leads with the public route, and the
//! backing source file follows as an indented `Source:` line. This reads as
//! an inventory of what the site exposes while still letting users trace each
//! route back to a file.
//!
//! ## Routes
//!
//! ```text
//! Pages
//! 001 /
//!     Source: index.html
//! 002 /about
//!     Source: about.md
//!
//! Assets
//! 001 /assets/style.css
//!     Source: assets/style.css
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 / → index.html
//! 002 /about → about/index.html
//! 003 /assets/style.css → assets/style.css
//!
//! Built 2 pages, 1 asset into _site
//! ```
//!
//! Each `format_*` function returns lines and does no I/O; the `print_*`
//! wrappers write them to stdout.

use crate::build::BuildSummary;
use crate::classify::SourceEntry;
use crate::routes::Route;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display `path` relative to `base` when possible.
fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format a route listing, pages first, then assets.
pub fn format_routes(root: &Path, entries: &[(Route, SourceEntry)]) -> Vec<String> {
    let mut lines = Vec::new();
    let (pages, assets): (Vec<_>, Vec<_>) =
        entries.iter().partition(|(_, entry)| entry.kind.is_page());

    for (heading, group) in [("Pages", pages), ("Assets", assets)] {
        if group.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(heading.to_string());
        for (i, (route, entry)) in group.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), route));
            lines.push(format!(
                "{}Source: {}",
                indent(1),
                relative(&entry.path, root)
            ));
        }
    }

    if lines.is_empty() {
        lines.push("No routes".to_string());
    }
    lines
}

pub fn print_routes(root: &Path, entries: &[(Route, SourceEntry)]) {
    for line in format_routes(root, entries) {
        println!("{}", line);
    }
}

/// Format the result of a build.
pub fn format_build_summary(summary: &BuildSummary) -> Vec<String> {
    let mut written: Vec<_> = summary.pages.iter().chain(&summary.assets).collect();
    written.sort_by(|a, b| a.route.cmp(&b.route));

    let mut lines: Vec<String> = written
        .iter()
        .enumerate()
        .map(|(i, w)| {
            format!(
                "{} {} → {}",
                format_index(i + 1),
                w.route,
                relative(&w.output, &summary.output_dir)
            )
        })
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Built {}, {} into {}",
        plural(summary.pages.len(), "page"),
        plural(summary.assets.len(), "asset"),
        summary.output_dir.display()
    ));
    lines
}

pub fn print_build_summary(summary: &BuildSummary) {
    for line in format_build_summary(summary) {
        println!("{}", line);
    }
}

/// Format the outcome of `check`: one line per failing route, then a tally.
pub fn format_check(checked: usize, failures: &[(Route, String)]) -> Vec<String> {
    let mut lines: Vec<String> = failures
        .iter()
        .map(|(route, err)| format!("FAIL {route}: {err}"))
        .collect();
    if failures.is_empty() {
        lines.push(format!("Checked {}, all render", plural(checked, "route")));
    } else {
        lines.push(format!(
            "Checked {}, {} failed",
            plural(checked, "route"),
            failures.len()
        ));
    }
    lines
}

pub fn print_check(checked: usize, failures: &[(Route, String)]) {
    for line in format_check(checked, failures) {
        println!("{}", line);
    }
}
