//! Site configuration (smg.yml)

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Accepts either a single glob string or a list of globs
fn string_or_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a glob or a list of globs")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> std::result::Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut globs = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                globs.push(item);
            }
            Ok(globs)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Templates that receive the full, sorted post collection
    pub need_posts: BTreeSet<String>,
    pub nav: Vec<NavLink>,
    pub default_author: Author,
    pub hostname: String,
    pub default_template: String,
    pub paths: PathsConfig,
    pub delims: DelimsConfig,
    /// Words per minute for the reading-time estimate
    pub wpm: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            need_posts: BTreeSet::new(),
            nav: Vec::new(),
            default_author: Author::default(),
            hostname: "http://example.com".to_string(),
            default_template: "page".to_string(),
            paths: PathsConfig::default(),
            delims: DelimsConfig::default(),
            wpm: 200,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject option values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.wpm == 0 {
            return Err(Error::Config("wpm must be greater than zero".to_string()));
        }
        if self.delims.yaml.is_empty() || self.delims.preview.is_empty() {
            return Err(Error::Config("delimiters must not be empty".to_string()));
        }
        if self.default_template.is_empty() {
            return Err(Error::Config("defaultTemplate must not be empty".to_string()));
        }
        Ok(())
    }
}

/// A site navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub text: String,
    pub link: String,
}

impl NavLink {
    pub fn new(text: &str, link: &str) -> Self {
        Self {
            text: text.to_string(),
            link: link.to_string(),
        }
    }
}

/// Document author, from front matter or `defaultAuthor`.
///
/// Written either as a map or as a bare name: `author: Jane Doe`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Author {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct AuthorFields {
    name: String,
    link: Option<String>,
    email: Option<String>,
}

impl<'de> Deserialize<'de> for Author {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct NameOrFields;

        impl<'de> Visitor<'de> for NameOrFields {
            type Value = Author;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an author name or a map with name, link and email")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Author::named(value))
            }

            fn visit_map<M>(self, map: M) -> std::result::Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let fields = AuthorFields::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(Author {
                    name: fields.name,
                    link: fields.link,
                    email: fields.email,
                })
            }
        }

        deserializer.deserialize_any(NameOrFields)
    }
}

/// Input globs and the output root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub dist: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub pages: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub posts: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub templates: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dist: "dist".to_string(),
            pages: vec!["content/*.md".to_string()],
            posts: vec!["content/posts/*.md".to_string()],
            templates: vec!["templates/*.html".to_string()],
        }
    }
}

/// Front-matter and preview delimiters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimsConfig {
    pub yaml: String,
    pub preview: String,
}

impl Default for DelimsConfig {
    fn default() -> Self {
        Self {
            yaml: "---".to_string(),
            preview: "<!-- more -->".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.default_template, "page");
        assert_eq!(config.wpm, 200);
        assert_eq!(config.delims.yaml, "---");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
needPosts: [index]
nav:
  - text: Home
    link: /
  - text: About
    link: /about
defaultAuthor:
  name: Bob Loblaw
  email: bob@bobloblawlawblog.com
hostname: http://bobloblawlawblog.com
paths:
  dist: ./public
  posts:
    - content/posts/*.md
    - content/archive/*.md
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.need_posts.contains("index"));
        assert_eq!(config.nav[1], NavLink::new("About", "/about"));
        assert_eq!(config.default_author.name, "Bob Loblaw");
        assert_eq!(config.default_author.link, None);
        assert_eq!(config.hostname, "http://bobloblawlawblog.com");
        assert_eq!(config.paths.dist, "./public");
        assert_eq!(config.paths.posts.len(), 2);
        // untouched keys keep their defaults
        assert_eq!(config.paths.pages, vec!["content/*.md"]);
        assert_eq!(config.default_template, "page");
    }

    #[test]
    fn test_single_glob_string() {
        let config: SiteConfig = serde_yaml::from_str("paths:\n  templates: tpl/*.html\n").unwrap();
        assert_eq!(config.paths.templates, vec!["tpl/*.html"]);
    }

    #[test]
    fn test_author_as_bare_name() {
        let config: SiteConfig = serde_yaml::from_str("defaultAuthor: Jane Doe\n").unwrap();
        assert_eq!(config.default_author, Author::named("Jane Doe"));

        let author: Author = serde_yaml::from_str("name: Ada\nlink: http://ada.dev\n").unwrap();
        assert_eq!(author.name, "Ada");
        assert_eq!(author.link.as_deref(), Some("http://ada.dev"));
        assert_eq!(author.email, None);
    }

    #[test]
    fn test_zero_wpm_rejected() {
        let config = SiteConfig {
            wpm: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
