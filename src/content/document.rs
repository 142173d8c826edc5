//! Document records, from freshly parsed source to render-ready record
//!
//! A file becomes a [`Document`], which the page stages fill in until
//! [`Document::finish`] turns it into a [`Page`]. Posts extend a finished
//! page through a [`PostDraft`] into a [`Post`]. Templates only ever see a
//! [`Record`], which wraps a finished [`Entry`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::FrontMatter;
use crate::config::{Author, NavLink};
use crate::error::{Error, Result};

/// Keys the pipeline owns; front matter cannot shadow them through `extra`
const RESERVED_KEYS: [&str; 11] = [
    "content",
    "preview",
    "nav",
    "canonical",
    "path",
    "posts",
    "ert",
    "dateOb",
    "date",
    "dateNum",
    "source",
];

/// A body segment, either still markdown or already rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Markdown(String),
    Html(String),
}

impl Body {
    pub fn as_str(&self) -> &str {
        match self {
            Body::Markdown(s) | Body::Html(s) => s,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, Body::Html(_))
    }
}

/// A document on its way through the page stages
#[derive(Debug, Clone)]
pub struct Document {
    /// File the document was read from
    pub source: PathBuf,
    pub slug: String,
    pub template: Option<String>,
    pub author: Option<Author>,
    pub nav: Option<Vec<NavLink>>,
    pub content: Body,
    pub preview: Option<Body>,
    pub canonical: Option<String>,
    pub path: Option<PathBuf>,
    pub posted: Option<String>,
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Document {
    /// Build a document from parsed front matter and its markdown body
    pub fn new(source: &Path, fm: FrontMatter, body: &str) -> Self {
        let slug = fm.slug.unwrap_or_else(|| slug_from_path(source));
        let mut extra = fm.extra;
        extra.retain(|key, _| {
            let reserved = RESERVED_KEYS.contains(&key.as_str());
            if reserved {
                tracing::debug!("Ignoring reserved front-matter key {:?} in {:?}", key, source);
            }
            !reserved
        });

        Self {
            source: source.to_path_buf(),
            slug,
            template: fm.template,
            author: fm.author,
            nav: None,
            content: Body::Markdown(body.to_string()),
            preview: None,
            canonical: None,
            path: None,
            posted: fm.posted,
            extra,
        }
    }

    /// Check that every page stage has run and produce the finished page
    pub fn finish(self) -> Result<Page> {
        let slug = self.slug;
        let missing = |field: &'static str| Error::Incomplete {
            slug: slug.clone(),
            field,
        };

        let content = match self.content {
            Body::Html(html) => html,
            Body::Markdown(_) => return Err(missing("content")),
        };
        let preview = match self.preview {
            Some(Body::Html(html)) => Some(html),
            Some(Body::Markdown(_)) => return Err(missing("preview")),
            None => None,
        };

        Ok(Page {
            template: self.template.ok_or_else(|| missing("template"))?,
            author: self.author.ok_or_else(|| missing("author"))?,
            nav: self.nav.ok_or_else(|| missing("nav"))?,
            canonical: self.canonical.ok_or_else(|| missing("canonical"))?,
            path: self.path.ok_or_else(|| missing("path"))?,
            content,
            preview,
            posted: self.posted,
            source: self.source,
            extra: self.extra,
            slug,
        })
    }
}

/// Slug for a file that does not declare one: `index` maps to the root
fn slug_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if stem == "index" {
        "/".to_string()
    } else {
        format!("/{}", slug::slugify(stem))
    }
}

/// A fully enriched page
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub slug: String,
    pub template: String,
    pub author: Author,
    pub nav: Vec<NavLink>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub canonical: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted: Option<String>,
    #[serde(skip)]
    pub source: PathBuf,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// The resolved date of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostDate {
    Dated {
        date_ob: DateTime<Utc>,
        /// `month/day/year`
        date: String,
        /// Epoch milliseconds, the sort key
        date_num: i64,
    },
    /// `posted` was missing or could not be parsed
    Undated,
}

impl Serialize for PostDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PostDate", 3)?;
        match self {
            PostDate::Dated {
                date_ob,
                date,
                date_num,
            } => {
                state.serialize_field("dateOb", date_ob)?;
                state.serialize_field("date", date)?;
                state.serialize_field("dateNum", date_num)?;
            }
            PostDate::Undated => {
                state.serialize_field("dateOb", &None::<DateTime<Utc>>)?;
                state.serialize_field("date", &None::<String>)?;
                state.serialize_field("dateNum", &None::<i64>)?;
            }
        }
        state.end()
    }
}

/// The date object stage's result, before string and number are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOb {
    Dated(DateTime<Utc>),
    Undated,
}

/// A finished page moving through the post stages
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub page: Page,
    pub ert: Option<usize>,
    pub date_ob: Option<DateOb>,
    pub date: Option<String>,
    pub date_num: Option<i64>,
}

impl PostDraft {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            ert: None,
            date_ob: None,
            date: None,
            date_num: None,
        }
    }

    /// Check that every post stage has run and produce the finished post
    pub fn finish(self) -> Result<Post> {
        let missing = |field: &'static str| Error::Incomplete {
            slug: self.page.slug.clone(),
            field,
        };

        let ert = self.ert.ok_or_else(|| missing("ert"))?;
        let date = match self.date_ob.ok_or_else(|| missing("dateOb"))? {
            DateOb::Undated => PostDate::Undated,
            DateOb::Dated(date_ob) => PostDate::Dated {
                date_ob,
                date: self.date.clone().ok_or_else(|| missing("date"))?,
                date_num: self.date_num.ok_or_else(|| missing("dateNum"))?,
            },
        };

        Ok(Post {
            page: self.page,
            ert,
            date,
        })
    }
}

/// A fully enriched post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub page: Page,
    /// Estimated reading time in minutes
    pub ert: usize,
    #[serde(flatten)]
    pub date: PostDate,
}

impl Post {
    /// Sort key; undated posts have none
    pub fn date_num(&self) -> Option<i64> {
        match self.date {
            PostDate::Dated { date_num, .. } => Some(date_num),
            PostDate::Undated => None,
        }
    }
}

/// One element of the merged content collection
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Page(Page),
    Post(Post),
}

impl Entry {
    pub fn page(&self) -> &Page {
        match self {
            Entry::Page(page) => page,
            Entry::Post(post) => &post.page,
        }
    }

    pub fn template(&self) -> &str {
        &self.page().template
    }

    pub fn path(&self) -> &Path {
        &self.page().path
    }

    pub fn slug(&self) -> &str {
        &self.page().slug
    }
}

/// What a template render function receives
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    #[serde(flatten)]
    pub entry: Entry,
    /// The shared, sorted post collection, for templates that asked for it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Arc<[Post]>>,
}

impl From<Entry> for Record {
    fn from(entry: Entry) -> Self {
        Self { entry, posts: None }
    }
}
