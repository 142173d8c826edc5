//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::PostDate;
use crate::templates::{TemplateRegistry, TeraLoader};
use crate::Smg;

/// List pages, posts or templates
pub async fn run(smg: &Smg, content_type: &str, json: bool) -> Result<()> {
    let loader = ContentLoader::new(smg);

    match content_type {
        "page" | "pages" => {
            let pages = loader.load_pages().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pages)?);
                return Ok(());
            }
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}] -> {}", page.slug, page.template, page.path.display());
            }
        }
        "post" | "posts" => {
            let posts = loader.load_posts().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = match &post.date {
                    PostDate::Dated { date, .. } => date.as_str(),
                    PostDate::Undated => "undated",
                };
                println!("  {} - {} ({} min)", date, post.page.slug, post.ert);
            }
        }
        "template" | "templates" => {
            let templates =
                TemplateRegistry::load(&smg.base_dir, &smg.config.paths.templates, &TeraLoader)
                    .await?;
            let names: Vec<_> = templates.names().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
                return Ok(());
            }
            println!("Templates ({}):", names.len());
            for name in names {
                let marker = if smg.config.need_posts.contains(name) {
                    " (posts)"
                } else {
                    ""
                };
                println!("  {}{}", name, marker);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: page, post, template",
                content_type
            );
        }
    }

    Ok(())
}
