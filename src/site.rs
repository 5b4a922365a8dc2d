//! A site instance: one validated root plus everything loaded from it.
//!
//! The root is fixed at construction and passed explicitly to every stage;
//! nothing is derived from the process working directory. The navigation
//! tree is snapshotted once here and stays read-only, while routes are
//! resolved against the live filesystem on every call.

use crate::classify::SourceEntry;
use crate::config::{self, SiteConfig};
use crate::error::SiteError;
use crate::nav::{self, Page};
use crate::render::{self, RenderedOutput};
use crate::resolve;
use crate::routes::{self, Route, Routes};
use crate::template::{JinjaEngine, TemplateEngine};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct Site {
    root: PathBuf,
    config: SiteConfig,
    tree: Vec<Page>,
    engine: Box<dyn TemplateEngine>,
}

impl Site {
    /// Open the site at `root` with the stock Jinja engine.
    ///
    /// Fails with [`SiteError::InvalidRoot`] before touching anything else if
    /// `root` is not an existing directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Site, SiteError> {
        let root = validate_root(root.as_ref())?;
        let config = config::load_config(&root)?;
        let theme_dir = root.join(&config.theme_dir);
        let engine = JinjaEngine::new(&theme_dir).map_err(|err| SiteError::Render {
            path: theme_dir.clone(),
            message: err.to_string(),
        })?;
        Self::assemble(root, config, Box::new(engine))
    }

    /// Open the site at `root` with a caller-supplied template engine.
    pub fn open_with_engine(
        root: impl AsRef<Path>,
        engine: impl TemplateEngine + 'static,
    ) -> Result<Site, SiteError> {
        let root = validate_root(root.as_ref())?;
        let config = config::load_config(&root)?;
        Self::assemble(root, config, Box::new(engine))
    }

    fn assemble(
        root: PathBuf,
        config: SiteConfig,
        engine: Box<dyn TemplateEngine>,
    ) -> Result<Site, SiteError> {
        let tree = nav::build_tree(&root)?;
        info!(root = %root.display(), top_level_pages = tree.len(), "site loaded");
        Ok(Site {
            root,
            config,
            tree,
            engine,
        })
    }

    /// Absolute, canonical site root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Navigation tree snapshotted at load time.
    pub fn tree(&self) -> &[Page] {
        &self.tree
    }

    /// Every public route, re-walked on each call.
    pub fn routes(&self) -> Routes {
        routes::enumerate(&self.root)
    }

    pub fn resolve(&self, route: &Route) -> Result<SourceEntry, SiteError> {
        resolve::resolve(&self.root, route)
    }

    pub fn render(&self, entry: &SourceEntry) -> Result<RenderedOutput, SiteError> {
        render::render(entry, self.engine.as_ref(), &self.tree)
    }

    /// Resolve then render: what the HTTP boundary calls per request.
    pub fn serve(&self, route: &Route) -> Result<RenderedOutput, SiteError> {
        let entry = self.resolve(route)?;
        self.render(&entry)
    }

    /// The configured output directory, made absolute against the root.
    pub fn default_output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }
}

fn validate_root(root: &Path) -> Result<PathBuf, SiteError> {
    if !root.is_dir() {
        return Err(SiteError::InvalidRoot(root.to_path_buf()));
    }
    root.canonicalize()
        .map_err(|_| SiteError::InvalidRoot(root.to_path_buf()))
}
