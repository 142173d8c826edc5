//! Content loader - reads pages and posts matched by the configured globs

use std::path::Path;

use super::transform::sort_by_reverse_date;
use super::{Document, Enricher, FrontMatter, Page, Post};
use crate::error::Result;
use crate::fs::{read_all, resolve_globs};
use crate::Smg;

/// Loads and enriches content files
pub struct ContentLoader<'a> {
    smg: &'a Smg,
    enricher: Enricher,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(smg: &'a Smg) -> Self {
        let enricher = Enricher::new(&smg.config, smg.dist_dir.clone());
        Self { smg, enricher }
    }

    /// Load the configured pages
    pub async fn load_pages(&self) -> Result<Vec<Page>> {
        self.pages(&self.smg.config.paths.pages).await
    }

    /// Load the configured posts, newest first
    pub async fn load_posts(&self) -> Result<Vec<Post>> {
        self.posts(&self.smg.config.paths.posts).await
    }

    /// Read every file matched by `globs` and run it through the page stages
    pub async fn pages(&self, globs: &[String]) -> Result<Vec<Page>> {
        let paths = resolve_globs(&self.smg.base_dir, globs)?;
        tracing::debug!("{:?} matched {} files", globs, paths.len());

        let files = read_all(paths).await?;
        files
            .iter()
            .map(|(path, text)| self.load_page(path, text))
            .collect()
    }

    /// Pages over the same globs, extended by the post stages and sorted
    pub async fn posts(&self, globs: &[String]) -> Result<Vec<Post>> {
        let posts = self
            .pages(globs)
            .await?
            .into_iter()
            .map(|page| self.enricher.post(page))
            .collect::<Result<Vec<_>>>()?;

        Ok(sort_by_reverse_date(posts))
    }

    fn load_page(&self, path: &Path, text: &str) -> Result<Page> {
        let (fm, body) = FrontMatter::parse(path, text, &self.smg.config.delims.yaml)?;
        let page = self.enricher.page(Document::new(path, fm, body))?;
        tracing::debug!("Loaded {:?} as {} ({})", path, page.slug, page.template);
        Ok(page)
    }
}
