//! Metadata enrichment stages
//!
//! Each stage takes a record by value and hands back the enriched one. Stage
//! order is fixed: later stages read fields that earlier ones set.
//!
//! Pages: split preview, markdown, nav, author, template, canonical, path.
//! Posts: the page stages, then reading time, date object, date string,
//! date number, and finally a reverse-date sort over the whole collection.

use std::path::{Path, PathBuf};

use super::date::{month_day_year, parse_posted};
use super::document::{Body, DateOb, Document, Page, Post, PostDraft};
use super::MarkdownRenderer;
use crate::config::{Author, NavLink, SiteConfig};
use crate::error::Result;

/// Output file name every slug resolves to
pub const INDEX_FILE: &str = "index.html";

/// Slug of the site root
pub const ROOT_SLUG: &str = "/";

/// Split the body at the first `delim` into preview and content
pub fn split_preview(mut doc: Document, delim: &str) -> Document {
    if let Some((preview, content)) = doc.content.as_str().split_once(delim) {
        let (preview, content) = (preview.to_string(), content.to_string());
        doc.preview = Some(Body::Markdown(preview));
        doc.content = Body::Markdown(content);
    }
    doc
}

/// Render markdown in `preview` and `content`; absent fields stay absent
pub fn render_markdown(mut doc: Document, markdown: &MarkdownRenderer) -> Document {
    let render = |body: Body| match body {
        Body::Markdown(text) if !text.is_empty() => Body::Html(markdown.render(&text)),
        Body::Markdown(text) => Body::Html(text),
        html => html,
    };
    doc.preview = doc.preview.map(render);
    doc.content = render(doc.content);
    doc
}

/// Set the site navigation, replacing anything already there
pub fn add_nav(mut doc: Document, nav: &[NavLink]) -> Document {
    doc.nav = Some(nav.to_vec());
    doc
}

/// Fill in the default author unless the document names one
pub fn add_author(mut doc: Document, author: &Author) -> Document {
    if doc.author.is_none() {
        doc.author = Some(author.clone());
    }
    doc
}

/// Fill in the default template unless the document names one
pub fn default_template(mut doc: Document, template: &str) -> Document {
    if doc.template.is_none() {
        doc.template = Some(template.to_string());
    }
    doc
}

/// Canonical URL: the bare host for the root slug, otherwise host + slug
pub fn make_canonical(host: &str, slug: &str) -> String {
    if slug == ROOT_SLUG {
        host.to_string()
    } else {
        format!("{}{}", host, slug)
    }
}

pub fn add_canonical(mut doc: Document, host: &str) -> Document {
    doc.canonical = Some(make_canonical(host, &doc.slug));
    doc
}

/// Output path: `{dist}/{slug}/index.html`
pub fn make_path(dist: &Path, slug: &str) -> PathBuf {
    // a leading '/' would make `join` discard `dist`
    let relative = slug.trim_start_matches('/');
    dist.join(relative).join(INDEX_FILE)
}

pub fn add_path(mut doc: Document, dist: &Path) -> Document {
    doc.path = Some(make_path(dist, &doc.slug));
    doc
}

/// Minutes to read `text` at `wpm` words per minute, rounded up
pub fn reading_time(text: &str, wpm: usize) -> usize {
    text.split_whitespace().count().div_ceil(wpm)
}

/// Start a post from a finished page with its reading time
pub fn add_reading_time(page: Page, wpm: usize) -> PostDraft {
    let ert = reading_time(&page.content, wpm);
    let mut draft = PostDraft::new(page);
    draft.ert = Some(ert);
    draft
}

pub fn add_date_object(mut draft: PostDraft) -> PostDraft {
    let parsed = draft.page.posted.as_deref().and_then(parse_posted);
    draft.date_ob = Some(match parsed {
        Some(date) => DateOb::Dated(date),
        None => {
            tracing::warn!(
                "Post {:?} has no usable `posted` date ({:?}), treating it as undated",
                draft.page.slug,
                draft.page.posted
            );
            DateOb::Undated
        }
    });
    draft
}

pub fn add_date_string(mut draft: PostDraft) -> PostDraft {
    if let Some(DateOb::Dated(date)) = draft.date_ob {
        draft.date = Some(month_day_year(&date));
    }
    draft
}

pub fn add_date_number(mut draft: PostDraft) -> PostDraft {
    if let Some(DateOb::Dated(date)) = draft.date_ob {
        draft.date_num = Some(date.timestamp_millis());
    }
    draft
}

/// Newest first; ties keep input order, undated posts go last
pub fn sort_by_reverse_date(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.date_num().cmp(&a.date_num()));
    posts
}

/// The configured stage chain
pub struct Enricher {
    preview_delim: String,
    markdown: MarkdownRenderer,
    nav: Vec<NavLink>,
    author: Author,
    template: String,
    hostname: String,
    dist: PathBuf,
    wpm: usize,
}

impl Enricher {
    /// Create an enricher writing under `dist`
    pub fn new(config: &SiteConfig, dist: PathBuf) -> Self {
        Self {
            preview_delim: config.delims.preview.clone(),
            markdown: MarkdownRenderer::new(),
            nav: config.nav.clone(),
            author: config.default_author.clone(),
            template: config.default_template.clone(),
            hostname: config.hostname.clone(),
            dist,
            wpm: config.wpm,
        }
    }

    /// Run the page stages
    pub fn page(&self, doc: Document) -> Result<Page> {
        let doc = split_preview(doc, &self.preview_delim);
        let doc = render_markdown(doc, &self.markdown);
        let doc = add_nav(doc, &self.nav);
        let doc = add_author(doc, &self.author);
        let doc = default_template(doc, &self.template);
        let doc = add_canonical(doc, &self.hostname);
        let doc = add_path(doc, &self.dist);
        doc.finish()
    }

    /// Run the post stages over a finished page
    pub fn post(&self, page: Page) -> Result<Post> {
        let draft = add_reading_time(page, self.wpm);
        let draft = add_date_object(draft);
        let draft = add_date_string(draft);
        let draft = add_date_number(draft);
        draft.finish()
    }
}
