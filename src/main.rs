//! CLI entry point for sandpress

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sandpress")]
#[command(version)]
#[command(about = "Load, normalize and inspect a Markdown blog catalog", long_about = None)]
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
    /// List catalog content
    #[command(alias = "ls")]
    List {
        /// Type of content to list (article, category, tag, issue)
        #[arg(default_value = "article")]
        r#type: String,

        /// Narrow articles to `category:<slug>` or `tag:<slug>`
        #[arg(short, long)]
        filter: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single article by slug
    Show {
        /// Article slug
        slug: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Reload the catalog whenever the content directory changes
    #[command(alias = "w")]
    Watch,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "sandpress=debug,info"
    } else {
        "sandpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List {
            r#type,
            filter,
            json,
        } => {
            let site = sandpress::Sandpress::new(&base_dir)?;
            let catalog = site.load_catalog().await;
            sandpress::commands::list::run(&catalog, &r#type, filter.as_deref(), json)?;
        }

        Commands::Show { slug, json } => {
            let site = sandpress::Sandpress::new(&base_dir)?;
            let catalog = site.load_catalog().await;
            sandpress::commands::show::run(&catalog, &slug, json)?;
        }

        Commands::Watch => {
            let site = sandpress::Sandpress::new(&base_dir)?;
            tracing::info!("Watching {:?}", site.content_dir);
            sandpress::commands::watch::run(&site).await?;
        }

        Commands::Version => {
            println!("sandpress version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
