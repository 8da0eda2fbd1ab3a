//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "muse")]
#[command(about = "Publish one comic a day from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Creator password for commands that change the site
    #[arg(long, global = true, env = "MUSE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Where entries and images are stored, relative to the site root
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Schedule a new entry on a free date
    Publish {
        /// Date to publish on (e.g., today, tomorrow, next monday, 2025-01-17)
        #[arg(short, long)]
        date: String,

        #[arg(short, long)]
        title: String,

        /// Episode label shown on the title card
        #[arg(short, long)]
        episode: String,

        /// Title card image file, or an http(s) URL used as-is
        #[arg(long)]
        title_image: String,

        /// Comic image file, or an http(s) URL used as-is
        #[arg(long)]
        comic_image: String,

        #[arg(long, default_value = "")]
        character: String,

        #[arg(long, default_value = "")]
        concept: String,
    },

    /// Move an entry to another free date
    Reschedule {
        from: String,
        to: String,
    },

    /// Delete an entry and its images
    Remove {
        date: String,
    },

    /// Show today's entry
    Today,

    /// Show the entry for a date
    Show {
        date: String,
    },

    /// List past entries, newest first
    Archive,

    /// List entries, including future ones
    List {
        /// Only entries strictly before this date
        #[arg(long)]
        before: Option<String>,

        /// Stop after this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rebuild the date index from the records on disk
    Reindex,
}

impl Commands {
    /// Whether the command changes stored entries or site settings
    pub fn is_writer(&self) -> bool {
        matches!(
            self,
            Commands::Publish { .. }
                | Commands::Reschedule { .. }
                | Commands::Remove { .. }
                | Commands::Reindex
                | Commands::Config { value: Some(_), .. }
        )
    }
}
