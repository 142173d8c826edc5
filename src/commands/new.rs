//! Create a new post or page

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::fs::glob_root;
use crate::Smg;

/// Create a new post or page, returning the file written
pub fn create(smg: &Smg, title: &str, layout: &str) -> Result<PathBuf> {
    let paths = &smg.config.paths;
    let patterns = match layout {
        "post" => &paths.posts,
        "page" => &paths.pages,
        _ => anyhow::bail!("Unknown layout: {}. Available: post, page", layout),
    };
    let Some(pattern) = patterns.first() else {
        anyhow::bail!("No {} path configured", layout);
    };

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}", title);
    }

    let target_dir = smg.base_dir.join(glob_root(pattern));
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let delim = &smg.config.delims.yaml;
    let mut content = format!("{}\nslug: /{}\ntitle: {:?}\n", delim, slug, title);
    if layout == "post" {
        let today = chrono::Local::now().format("%Y-%m-%d");
        content.push_str(&format!("posted: {}\n", today));
    }
    content.push_str(delim);
    content.push('\n');

    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Run the new command
pub fn run(smg: &Smg, title: &str, layout: &str) -> Result<()> {
    let path = create(smg, title, layout)?;
    println!("Created: {:?}", path);
    Ok(())
}
