//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG: &str = r#"# Pages and posts rendered with these templates also get the post list
needPosts:
  - index

nav:
  - text: Home
    link: /
  - text: About
    link: /about

defaultAuthor:
  name: John Doe
  link: http://example.com/john
  email: john@example.com

hostname: http://example.com
defaultTemplate: page

paths:
  dist: dist
  pages: content/*.md
  posts: content/posts/*.md
  templates: templates/*.html

delims:
  yaml: "---"
  preview: "<!-- more -->"

wpm: 200
"#;

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en-us">
<head>
  <meta charset="utf-8">
  <title>{{ title | default(value="") }}</title>
  <link rel="canonical" href="{{ canonical }}">
</head>
<body>
  <nav>{% for item in nav %}<a href="{{ item.link }}">{{ item.text }}</a> {% endfor %}</nav>
  {% block body %}{% endblock body %}
  <footer>{{ author.name }}</footer>
</body>
</html>
"#;

const PAGE_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block body %}
<section class="content">
  {% if date %}<p class="meta">{{ date }} &middot; {{ ert }} min read</p>{% endif %}
  {{ content }}
</section>
{% endblock body %}
"#;

const INDEX_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block body %}
<section class="content">{{ content }}</section>
<ul class="posts">
{% for post in posts %}
  <li>
    <a href="{{ post.slug }}">{{ post.title | default(value=post.slug) }}</a>
    {% if post.date %}<time>{{ post.date }}</time>{% endif %}
    {% if post.preview %}{{ post.preview }}{% endif %}
  </li>
{% endfor %}
</ul>
{% endblock body %}
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("templates"))?;

    fs::write(&config_path, CONFIG)?;
    fs::write(target_dir.join("templates/base.html"), BASE_TEMPLATE)?;
    fs::write(target_dir.join("templates/page.html"), PAGE_TEMPLATE)?;
    fs::write(target_dir.join("templates/index.html"), INDEX_TEMPLATE)?;

    fs::write(
        target_dir.join("content/index.md"),
        "---\nslug: /\ntemplate: index\ntitle: Home\n---\n\nWelcome to your new site.\n",
    )?;
    fs::write(
        target_dir.join("content/about.md"),
        "---\nslug: /about\ntitle: About\n---\n\nAll about this site.\n",
    )?;

    let today = chrono::Local::now().format("%Y-%m-%d");
    fs::write(
        target_dir.join("content/posts/hello-world.md"),
        format!(
            "---\nslug: /hello-world\ntitle: Hello World\nposted: {}\n---\n\n\
             This is your first post.\n\n<!-- more -->\n\n\
             Create another with `smg-rs new \"My New Post\"`, then run `smg-rs generate`.\n",
            today
        ),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Smg;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }

    #[tokio::test]
    async fn test_scaffold_builds() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let smg = Smg::new(dir.path()).unwrap();
        let written = smg.generate().await.unwrap();
        assert_eq!(written.len(), 3);

        let index = fs::read_to_string(smg.dist_dir.join("index.html")).unwrap();
        assert!(index.contains(r#"<a href="/hello-world">Hello World</a>"#));
        assert!(index.contains("<p>This is your first post.</p>"));
        assert!(index.contains(r#"<link rel="canonical" href="http://example.com">"#));

        let post = fs::read_to_string(smg.dist_dir.join("hello-world/index.html")).unwrap();
        assert!(post.contains("1 min read"));
    }
}
