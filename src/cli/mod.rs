//! CLI module - Command-line interface for anicatalog

mod commands;

use clap::{ArgGroup, Parser, Subcommand};

use crate::models::Section;

/// anicatalog - Anime catalog with tokenized episode playback
#[derive(Parser)]
#[command(name = "anicatalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API until Ctrl+C
    #[command(alias = "daemon")]
    Serve,

    /// Parse catalog text and upsert it into the store
    Ingest {
        /// Catalog file to ingest instead of the configured sources
        #[arg(long, requires = "section")]
        file: Option<String>,
        /// Section the file belongs to, or the configured sources to ingest
        #[arg(long)]
        section: Option<Section>,
        /// Parse and report without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// List catalog entries
    #[command(alias = "ls", alias = "l")]
    #[command(group(ArgGroup::new("filter").args(["airing", "finished"])))]
    List {
        /// Only titles still airing
        #[arg(long)]
        airing: bool,
        /// Only finished titles
        #[arg(long)]
        finished: bool,
    },

    /// Issue a playback token for an episode reference
    Token {
        /// Episode reference, e.g. naruto-1-1
        reference: String,
    },

    /// Resolve a playback token to its video URL
    Resolve {
        /// Token as printed by `token`
        token: String,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
