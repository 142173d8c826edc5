//! Template registry - maps template names to render functions
//!
//! A template's name is its file stem: `templates/page.html` registers as
//! `page`. Compiling the files is the job of a [`TemplateLoader`]; the
//! default [`TeraLoader`] puts every matched file into one shared Tera
//! instance so templates can extend and include each other by file name.

mod filters;

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tera::{Context, Tera};

use crate::content::Record;
use crate::error::{Error, Result};
use crate::fs::{read_all, resolve_globs};

/// Turns a fully enriched record into HTML
pub trait Render: Send + Sync {
    fn render(&self, record: &Record) -> Result<String>;
}

impl<F> Render for F
where
    F: Fn(&Record) -> Result<String> + Send + Sync,
{
    fn render(&self, record: &Record) -> Result<String> {
        self(record)
    }
}

/// A template file read from disk
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub name: String,
    pub path: PathBuf,
    pub text: String,
}

/// Compiles template sources into render functions
pub trait TemplateLoader {
    /// One render function per source, in source order
    fn load(&self, sources: &[TemplateSource]) -> Result<Vec<Box<dyn Render>>>;
}

/// Registry name for a template path
pub fn template_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

struct Registered {
    source: PathBuf,
    render: Box<dyn Render>,
}

/// Name to render function mapping, built once per build
#[derive(Default)]
pub struct TemplateRegistry {
    templates: IndexMap<String, Registered>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `globs` under `base_dir`, read the files and compile them with `loader`
    pub async fn load(
        base_dir: &Path,
        globs: &[String],
        loader: &dyn TemplateLoader,
    ) -> Result<Self> {
        let paths = resolve_globs(base_dir, globs)?;

        let mut claimed: IndexMap<String, PathBuf> = IndexMap::new();
        let mut sources = Vec::with_capacity(paths.len());
        for (path, text) in read_all(paths).await? {
            let Some(name) = template_name(&path) else {
                tracing::warn!("Skipping template with unusable file name: {:?}", path);
                continue;
            };
            if let Some(first) = claimed.get(&name) {
                return Err(Error::DuplicateTemplate {
                    name,
                    first: first.clone(),
                    second: path,
                });
            }
            claimed.insert(name.clone(), path.clone());
            sources.push(TemplateSource { name, path, text });
        }

        let mut registry = Self::new();
        let renders = loader.load(&sources)?;
        for (source, render) in sources.into_iter().zip(renders) {
            tracing::debug!("Registered template {} from {:?}", source.name, source.path);
            registry.templates.insert(
                source.name,
                Registered {
                    source: source.path,
                    render,
                },
            );
        }

        Ok(registry)
    }

    fn check_unique(&self, name: &str, path: &Path) -> Result<()> {
        match self.templates.get(name) {
            Some(existing) => Err(Error::DuplicateTemplate {
                name: name.to_string(),
                first: existing.source.clone(),
                second: path.to_path_buf(),
            }),
            None => Ok(()),
        }
    }

    /// Register a render function under `name`; names must be unique
    pub fn insert<R>(&mut self, name: &str, source: impl Into<PathBuf>, render: R) -> Result<()>
    where
        R: Render + 'static,
    {
        let source = source.into();
        self.check_unique(name, &source)?;
        self.templates.insert(
            name.to_string(),
            Registered {
                source,
                render: Box::new(render),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Render> {
        self.templates.get(name).map(|t| t.render.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names in load order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Compiles every source into one shared Tera instance
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraLoader;

impl TemplateLoader for TeraLoader {
    fn load(&self, sources: &[TemplateSource]) -> Result<Vec<Box<dyn Render>>> {
        let mut tera = Tera::default();
        // Records carry rendered HTML; escaping it would break the output
        tera.autoescape_on(vec![]);
        filters::register(&mut tera);

        let files: Vec<(String, &str)> = sources
            .iter()
            .map(|s| (file_name(&s.path, &s.name), s.text.as_str()))
            .collect();
        tera.add_raw_templates(files).map_err(|source| Error::Template {
            name: "templates".to_string(),
            source,
        })?;

        let tera = Arc::new(tera);
        Ok(sources
            .iter()
            .map(|s| {
                Box::new(TeraTemplate {
                    tera: Arc::clone(&tera),
                    name: s.name.clone(),
                    file: file_name(&s.path, &s.name),
                }) as Box<dyn Render>
            })
            .collect())
    }
}

fn file_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(fallback)
        .to_string()
}

/// One named template inside a shared Tera instance
struct TeraTemplate {
    tera: Arc<Tera>,
    name: String,
    file: String,
}

impl Render for TeraTemplate {
    fn render(&self, record: &Record) -> Result<String> {
        let to_error = |source| Error::Template {
            name: self.name.clone(),
            source,
        };
        let context = Context::from_serialize(record).map_err(to_error)?;
        self.tera.render(&self.file, &context).map_err(to_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Author;
    use crate::content::{Entry, Page};
    use std::fs;
    use tempfile::TempDir;

    fn record(title: &str) -> Record {
        let mut extra = IndexMap::new();
        extra.insert("title".to_string(), serde_yaml::Value::from(title));
        Record::from(Entry::Page(Page {
            slug: "/a".to_string(),
            template: "page".to_string(),
            author: Author::default(),
            nav: Vec::new(),
            content: "<p>body</p>".to_string(),
            preview: None,
            canonical: "http://x.com/a".to_string(),
            path: PathBuf::from("dist/a/index.html"),
            posted: None,
            source: PathBuf::from("content/a.md"),
            extra,
        }))
    }

    #[test]
    fn test_template_name() {
        assert_eq!(
            template_name(Path::new("templates/page.html")).as_deref(),
            Some("page")
        );
        assert_eq!(
            template_name(Path::new("t/index.html.tera")).as_deref(),
            Some("index.html")
        );
    }

    #[test]
    fn test_insert_closure_and_render() {
        let mut registry = TemplateRegistry::new();
        registry
            .insert("page", "page.rs", |r: &Record| -> Result<String> {
                Ok(format!("<main>{}</main>", r.entry.page().content))
            })
            .unwrap();
        let html = registry.get("page").unwrap().render(&record("A")).unwrap();
        assert_eq!(html, "<main><p>body</p></main>");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut registry = TemplateRegistry::new();
        let noop = |_: &Record| -> Result<String> { Ok(String::new()) };
        registry.insert("page", "a/page.html", noop).unwrap();
        let err = registry.insert("page", "b/page.html", noop).unwrap_err();
        assert!(matches!(err, Error::DuplicateTemplate { .. }));
    }

    #[tokio::test]
    async fn test_load_tera_templates() {
        let dir = TempDir::new().unwrap();
        let tpl = dir.path().join("templates");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(
            tpl.join("base.html"),
            "<title>{{ title }}</title>{% block body %}{% endblock body %}",
        )
        .unwrap();
        fs::write(
            tpl.join("page.html"),
            r#"{% extends "base.html" %}{% block body %}{{ content }}{% endblock body %}"#,
        )
        .unwrap();

        let registry =
            TemplateRegistry::load(dir.path(), &["templates/*.html".to_string()], &TeraLoader)
                .await
                .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["base", "page"]);

        let html = registry
            .get("page")
            .unwrap()
            .render(&record("Hello"))
            .unwrap();
        assert_eq!(html, "<title>Hello</title><p>body</p>");
    }

    #[tokio::test]
    async fn test_load_rejects_same_stem() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a/page.html"), "a").unwrap();
        fs::write(dir.path().join("b/page.html"), "b").unwrap();

        let result = TemplateRegistry::load(
            dir.path(),
            &["a/*.html".to_string(), "b/*.html".to_string()],
            &TeraLoader,
        )
        .await;
        assert!(matches!(result, Err(Error::DuplicateTemplate { .. })));
    }

    #[tokio::test]
    async fn test_tera_syntax_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.html"), "{% if %}").unwrap();
        let result = TemplateRegistry::load(dir.path(), &["*.html".to_string()], &TeraLoader).await;
        assert!(matches!(result, Err(Error::Template { .. })));
    }
}
