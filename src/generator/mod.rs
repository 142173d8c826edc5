//! Generator module - runs one full build
//!
//! Pages and posts are loaded, merged pages-first, and every record whose
//! template asks for it receives the shared post collection. Each record is
//! then rendered by its named template and the HTML written to its path.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::content::loader::ContentLoader;
use crate::content::{Entry, Page, Post, Record};
use crate::error::{Error, Result};
use crate::fs::write_all;
use crate::templates::{TemplateLoader, TemplateRegistry, TeraLoader};
use crate::Smg;

/// Static site generator
pub struct Generator<'a> {
    smg: &'a Smg,
    loader: &'a dyn TemplateLoader,
}

impl<'a> Generator<'a> {
    /// Create a generator compiling templates with Tera
    pub fn new(smg: &'a Smg) -> Self {
        Self::with_loader(smg, &TeraLoader)
    }

    /// Create a generator with a custom template loader
    pub fn with_loader(smg: &'a Smg, loader: &'a dyn TemplateLoader) -> Self {
        Self { smg, loader }
    }

    /// Build the whole site and return the written paths in render order
    pub async fn generate(&self) -> Result<Vec<PathBuf>> {
        let config = &self.smg.config;
        let content_loader = ContentLoader::new(self.smg);

        let (pages, posts) =
            tokio::try_join!(content_loader.load_pages(), content_loader.load_posts())?;
        tracing::info!("Loaded {} pages and {} posts", pages.len(), posts.len());

        let posts: Arc<[Post]> = posts.into();
        let content = merge(pages, &posts);
        let records = inject_posts(&config.need_posts, content, &posts);

        let templates =
            TemplateRegistry::load(&self.smg.base_dir, &config.paths.templates, self.loader)
                .await?;
        tracing::info!("Loaded {} templates", templates.len());
        check_need_posts(&config.need_posts, &templates)?;

        let outputs = render(&records, &templates)?;
        write_all(outputs).await
    }
}

/// Pages followed by posts, each group in its own order
pub fn merge(pages: Vec<Page>, posts: &[Post]) -> Vec<Entry> {
    pages
        .into_iter()
        .map(Entry::Page)
        .chain(posts.iter().cloned().map(Entry::Post))
        .collect()
}

/// Attach `posts` to every entry whose template is in `need`.
///
/// All injected records share the one collection; other entries are wrapped
/// as they are.
pub fn inject_posts(need: &BTreeSet<String>, content: Vec<Entry>, posts: &Arc<[Post]>) -> Vec<Record> {
    content
        .into_iter()
        .map(|entry| {
            let wants_posts = need.contains(entry.template());
            Record {
                entry,
                posts: wants_posts.then(|| Arc::clone(posts)),
            }
        })
        .collect()
}

/// Every `needPosts` name must be a loaded template
pub fn check_need_posts(need: &BTreeSet<String>, templates: &TemplateRegistry) -> Result<()> {
    match need.iter().find(|name| !templates.contains(name)) {
        Some(name) => Err(Error::UnknownNeedsPosts { name: name.clone() }),
        None => Ok(()),
    }
}

/// Pair each record's output path with its rendered HTML
pub fn render(records: &[Record], templates: &TemplateRegistry) -> Result<Vec<(PathBuf, String)>> {
    records
        .iter()
        .map(|record| {
            let entry = &record.entry;
            let template =
                templates
                    .get(entry.template())
                    .ok_or_else(|| Error::TemplateNotFound {
                        name: entry.template().to_string(),
                        slug: entry.slug().to_string(),
                    })?;
            let html = template.render(record)?;
            tracing::debug!("Rendered {} with {}", entry.slug(), entry.template());
            Ok((entry.path().to_path_buf(), html))
        })
        .collect()
}
