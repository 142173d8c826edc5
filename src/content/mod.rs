//! Content module - handles pages, posts, and content processing

mod date;
pub mod document;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod transform;

pub use document::{Body, Document, Entry, Page, Post, PostDate, Record};
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use transform::Enricher;
