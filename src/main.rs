//! CLI entry point for ogcard

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ogcard")]
#[command(version)]
#[command(about = "Incremental social preview image generator for static blogs", long_about = None)]
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
    /// Generate card images for every post
    #[command(alias = "g")]
    Generate {
        /// Re-render every post even when the cache is valid
        #[arg(short, long)]
        force: bool,

        /// Watch the posts directory and regenerate on change
        #[arg(short, long)]
        watch: bool,
    },

    /// Remove generated images, the cache, and the data file
    Clean,

    /// List posts and their card cache status
    List,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "ogcard=debug,info"
    } else {
        "ogcard=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Generate { force, watch } => {
            let site = ogcard::Site::new(&base_dir)?;

            // The pipeline only sees the resolved boolean; CI sets OG_FORCE
            let force = force
                || std::env::var("OG_FORCE")
                    .map(|v| v == "true")
                    .unwrap_or(false);

            site.generate(force)?;
            println!("Generated successfully!");

            if watch {
                ogcard::commands::generate::watch(&site)?;
            }
        }

        Commands::Clean => {
            let site = ogcard::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let site = ogcard::Site::new(&base_dir)?;
            ogcard::commands::list::run(&site)?;
        }

        Commands::Version => {
            println!("ogcard version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
