//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::fs::glob_root;
use crate::{Smg, CONFIG_FILE};

/// Quiet period before a change triggers another build
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Build the whole site once
pub async fn run(smg: &Smg) -> Result<Vec<PathBuf>> {
    let start = Instant::now();

    let written = smg.generate().await?;

    tracing::info!(
        "Generated {} files in {:.2}s",
        written.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(written)
}

/// Directories whose changes should trigger a rebuild
fn watch_dirs(smg: &Smg) -> BTreeSet<PathBuf> {
    let paths = &smg.config.paths;
    paths
        .pages
        .iter()
        .chain(&paths.posts)
        .chain(&paths.templates)
        .map(|pattern| smg.base_dir.join(glob_root(pattern)))
        .filter(|dir| dir.is_dir())
        .collect()
}

/// Directories to drop from and add to the watcher when moving from
/// `watched` to `wanted`
fn watch_changes(
    watched: &BTreeSet<PathBuf>,
    wanted: &BTreeSet<PathBuf>,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let stale = watched.difference(wanted).cloned().collect();
    let fresh = wanted.difference(watched).cloned().collect();
    (stale, fresh)
}

/// Watch content, templates and config, rebuilding everything on change
pub async fn watch(smg: &Smg) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    let mut watched = watch_dirs(smg);
    for dir in &watched {
        tracing::debug!("Watching {:?}", dir);
        watcher.watch(dir, notify::RecursiveMode::Recursive)?;
    }

    let config_path = smg.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();
    let mut smg = smg.clone();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                // writes to dist would otherwise retrigger the build
                if event.paths.iter().all(|p| p.starts_with(&smg.dist_dir)) {
                    continue;
                }
                if last_rebuild.elapsed() <= DEBOUNCE {
                    continue;
                }

                tracing::info!("Change detected, regenerating...");
                if event.paths.iter().any(|p| p.ends_with(CONFIG_FILE)) {
                    match Smg::new(&smg.base_dir) {
                        Ok(reloaded) => {
                            smg = reloaded;
                            let wanted = watch_dirs(&smg);
                            let (stale, fresh) = watch_changes(&watched, &wanted);
                            for dir in stale {
                                tracing::debug!("No longer watching {:?}", dir);
                                if let Err(e) = watcher.unwatch(&dir) {
                                    tracing::debug!("Unwatch {:?}: {}", dir, e);
                                }
                            }
                            for dir in fresh {
                                tracing::debug!("Watching {:?}", dir);
                                if let Err(e) = watcher.watch(&dir, notify::RecursiveMode::Recursive) {
                                    tracing::warn!("Cannot watch {:?}: {}", dir, e);
                                }
                            }
                            watched = wanted;
                        }
                        Err(e) => tracing::error!("Failed to reload {}: {}", CONFIG_FILE, e),
                    }
                }
                if let Err(e) = run(&smg).await {
                    tracing::error!("Generation failed: {:?}", e);
                }
                last_rebuild = Instant::now();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
