use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line client for the hiking club site widgets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the site config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print raw HTML fragments instead of plain text
    #[arg(long, default_value_t = false)]
    pub html: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the AI trail finder for a suggestion
    Suggest {
        /// Difficulty checkbox value (repeatable)
        #[arg(short, long = "difficulty")]
        difficulties: Vec<String>,

        /// Vibe checkbox value (repeatable)
        #[arg(short = 'b', long = "vibe")]
        vibes: Vec<String>,

        /// Proxy URL
        #[arg(long, env = "TRAILFINDER_PROXY_URL")]
        proxy_url: Option<String>,
    },

    /// Estimate hike time and difficulty
    Calculate {
        /// Distance in km
        #[arg(short, long)]
        distance: String,

        /// Elevation gain in m
        #[arg(short, long, default_value = "")]
        elevation: String,

        /// slow, moderate or fast
        #[arg(short, long, default_value = "moderate")]
        pace: String,
    },

    /// List upcoming club hikes
    Hikes,
}
