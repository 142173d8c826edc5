//! smg-rs: a small static site generator
//!
//! Markdown pages and posts with YAML front matter are enriched with
//! navigation, authorship, canonical URLs, output paths and (for posts)
//! dates and reading times, then rendered through named Tera templates
//! into `{dist}/{slug}/index.html`.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod fs;
pub mod generator;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// Configuration file looked up in the base directory
pub const CONFIG_FILE: &str = "smg.yml";

/// The main application handle
#[derive(Debug, Clone)]
pub struct Smg {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory; globs and `dist` resolve against it
    pub base_dir: PathBuf,
    /// Output directory
    pub dist_dir: PathBuf,
}

impl Smg {
    /// Create a new instance from a directory, reading `smg.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Create a new instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Result<Self> {
        config.validate()?;
        let base_dir = base_dir.as_ref().to_path_buf();
        let dist_dir = base_dir.join(&config.paths.dist);

        Ok(Self {
            config,
            base_dir,
            dist_dir,
        })
    }

    /// Build the site, returning every path written
    pub async fn generate(&self) -> Result<Vec<PathBuf>> {
        generator::Generator::new(self).generate().await
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        if self.dist_dir.exists() {
            std::fs::remove_dir_all(&self.dist_dir).map_err(|e| Error::io(&self.dist_dir, e))?;
            tracing::info!("Deleted: {:?}", self.dist_dir);
        }
        Ok(())
    }
}
