//! coursedb CLI
//!
//! Command-line tools for the course platform.
//!
//! # Commands
//!
//! - `deploy` - Deploy a course manifest into the store
//! - `courses` - List stored courses
//! - `curriculum` - Show the assembled curriculum of a course
//! - `token` - Mint a publisher token

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Course platform command-line tools.
#[derive(Parser)]
#[command(name = "coursedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store snapshot file
    #[arg(global = true, short, long, default_value = "courses.cdb")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a course manifest into the store
    Deploy {
        /// Slug of the course to deploy
        slug: String,

        /// Path to the JSON manifest (course plus sections)
        manifest: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List stored courses
    Courses {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the assembled curriculum of a course
    Curriculum {
        /// Course slug
        slug: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Mint a publisher token
    Token {
        /// Publisher name embedded in the token
        #[arg(short, long)]
        subject: String,

        /// Shared secret the server validates against
        #[arg(long)]
        secret: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Deploy {
            slug,
            manifest,
            format,
        } => {
            commands::deploy::run(&cli.path, &slug, &manifest, &format)?;
        }
        Commands::Courses { format } => {
            commands::courses::run(&cli.path, &format)?;
        }
        Commands::Curriculum { slug, format } => {
            commands::curriculum::run(&cli.path, &slug, &format)?;
        }
        Commands::Token { subject, secret } => {
            commands::token::run(&subject, secret.into_bytes())?;
        }
        Commands::Version => {
            println!("coursedb CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
