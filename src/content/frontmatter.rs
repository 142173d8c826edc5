//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::config::Author;
use crate::error::{Error, Result};

/// Keeps any YAML value of `posted` as text for the date stage to judge
///
/// `posted: 2016-01-15` and `posted: "2016-01-15"` both arrive as a string,
/// a bare year as a number. Values that are no date at all (`true`, lists,
/// maps) are kept too and end up undated instead of failing the build.
fn posted_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yaml::Value;

    let text = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(
            serde_yaml::to_string(&other)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        ),
    };
    Ok(text)
}

/// An `author` that is neither a name nor a map is dropped, so the
/// default author fills in
fn lenient_author<'de, D>(deserializer: D) -> std::result::Result<Option<Author>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_yaml::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    match Author::deserialize(value.clone()) {
        Ok(author) => Ok(Some(author)),
        Err(e) => {
            tracing::warn!("Ignoring unusable author {:?}: {}", value, e);
            Ok(None)
        }
    }
}

/// Front-matter data from a page or post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub slug: Option<String>,
    pub template: Option<String>,
    #[serde(deserialize_with = "lenient_author")]
    pub author: Option<Author>,
    /// Raw publication date of a post, parsed later by the post stages
    #[serde(deserialize_with = "posted_text")]
    pub posted: Option<String>,

    /// Any other key (title, description, ...)
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split `content` into front matter and body.
    ///
    /// The block opens with a line equal to `delim` at the very start of the
    /// file and closes at the next line equal to `delim`. Files that do not
    /// open with the delimiter have no metadata. An unclosed block or invalid
    /// YAML is an error.
    pub fn parse<'a>(path: &Path, content: &'a str, delim: &str) -> Result<(Self, &'a str)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(rest) = content.strip_prefix(delim) else {
            return Ok((FrontMatter::default(), content));
        };
        let Some(rest) = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
        else {
            // e.g. a longer horizontal rule, not a metadata block
            return Ok((FrontMatter::default(), content));
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end_matches(['\n', '\r']) == delim {
                let yaml = &rest[..offset];
                let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);

                if yaml.trim().is_empty() {
                    return Ok((FrontMatter::default(), body));
                }

                let fm = serde_yaml::from_str::<FrontMatter>(yaml).map_err(|e| {
                    Error::FrontMatter {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }
                })?;
                return Ok((fm, body));
            }
            offset += line.len();
        }

        Err(Error::FrontMatter {
            path: path.to_path_buf(),
            message: format!("no closing `{}` line", delim),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<(FrontMatter, &str)> {
        FrontMatter::parse(Path::new("test.md"), content, "---")
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
slug: /hello-world
title: Hello World
posted: 2024-01-15
author:
  name: Ada
  email: ada@example.com
---

This is the content.
"#;

        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.slug.as_deref(), Some("/hello-world"));
        assert_eq!(fm.posted.as_deref(), Some("2024-01-15"));
        assert_eq!(fm.author.unwrap().name, "Ada");
        assert_eq!(
            fm.extra.get("title").and_then(|v| v.as_str()),
            Some("Hello World")
        );
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo metadata here.";
        let (fm, body) = parse(content).unwrap();
        assert!(fm.slug.is_none());
        assert!(fm.extra.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = parse("---\n---\nBody").unwrap();
        assert!(fm.template.is_none());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_horizontal_rule_is_not_frontmatter() {
        let content = "-----\n\nText";
        let (fm, body) = parse(content).unwrap();
        assert!(fm.slug.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_numeric_posted() {
        let (fm, _) = parse("---\nposted: 2016\n---\n").unwrap();
        assert_eq!(fm.posted.as_deref(), Some("2016"));
    }

    #[test]
    fn test_non_date_posted_is_kept() {
        let (fm, _) = parse("---\nposted: true\n---\n").unwrap();
        assert_eq!(fm.posted.as_deref(), Some("true"));

        let (fm, _) = parse("---\nposted: [2016, 1]\n---\n").unwrap();
        assert!(fm.posted.is_some());

        let (fm, _) = parse("---\nposted:\n---\n").unwrap();
        assert!(fm.posted.is_none());
    }

    #[test]
    fn test_author_forms() {
        let (fm, _) = parse("---\nauthor: Jane Doe\n---\n").unwrap();
        assert_eq!(fm.author, Some(Author::named("Jane Doe")));

        let (fm, _) = parse("---\nauthor: [a, b]\n---\n").unwrap();
        assert!(fm.author.is_none());
    }

    #[test]
    fn test_custom_delimiter() {
        let (fm, body) =
            FrontMatter::parse(Path::new("a.md"), "+++\nslug: /a\n+++\nBody", "+++").unwrap();
        assert_eq!(fm.slug.as_deref(), Some("/a"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unterminated_frontmatter_is_error() {
        let err = parse("---\nslug: /a\nno end").unwrap_err();
        assert!(matches!(err, Error::FrontMatter { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let err = parse("---\nslug: [unclosed\n---\nBody").unwrap_err();
        assert!(matches!(err, Error::FrontMatter { .. }));
    }
}
