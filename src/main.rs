//! CLI entry point for smg-rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smg_rs::{commands, Smg};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "smg-rs")]
#[command(version)]
#[command(about = "A small static site generator for markdown pages and posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or page
    New {
        /// Layout to use (post, page)
        #[arg(short, long, default_value = "post")]
        layout: String,

        /// Title of the new content
        title: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Remove the output folder
    Clean,

    /// List site content
    List {
        /// Type of content to list (page, post, template)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // reported here only; returning the error would print it again
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:?}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "smg_rs=debug,info" } else { "smg_rs=info" };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Site handle for the base directory, config included
fn open(base_dir: &Path) -> Result<Smg> {
    Smg::new(base_dir).with_context(|| format!("Cannot load site in {:?}", base_dir))
}

async fn run(cli: Cli) -> Result<()> {
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = base_dir.join(folder);
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }
        Commands::New { layout, title } => {
            let smg = open(&base_dir)?;
            tracing::debug!("Creating {} {:?}", layout, title);
            commands::new::run(&smg, &title, &layout)?;
        }
        Commands::Generate { watch } => {
            let smg = open(&base_dir)?;
            commands::generate::run(&smg).await?;
            if watch {
                commands::generate::watch(&smg).await?;
            }
        }
        Commands::Clean => commands::clean::run(&open(&base_dir)?)?,
        Commands::List { r#type, json } => {
            commands::list::run(&open(&base_dir)?, &r#type, json).await?;
        }
        Commands::Version => println!("smg-rs {}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cli(dir: &Path, args: &[&str]) -> Cli {
        let cwd = dir.to_string_lossy().to_string();
        let mut argv = vec!["smg-rs", "--cwd", cwd.as_str()];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[tokio::test]
    async fn test_run_returns_build_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("smg.yml"), "wpm: 0\n").unwrap();

        let err = run(cli(dir.path(), &["generate"])).await.unwrap_err();
        assert!(format!("{:?}", err).contains("wpm"));
    }

    #[tokio::test]
    async fn test_run_init_then_generate() {
        let dir = TempDir::new().unwrap();
        run(cli(dir.path(), &["init"])).await.unwrap();
        run(cli(dir.path(), &["g"])).await.unwrap();
        assert!(dir.path().join("dist/index.html").exists());
    }
}
