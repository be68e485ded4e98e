use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "segcut")]
#[command(author, version, about = "Split audio files into named segments")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by `plan` and `split` to build the segment timeline.
#[derive(clap::Args)]
pub struct PlanArgs {
    /// Media file to segment
    #[arg(required = true)]
    pub input: PathBuf,

    /// Segment length, seconds or HH:MM:SS (defaults to the config value)
    #[arg(short, long)]
    pub length: Option<String>,

    /// Keep locked segments as anchors when the script regenerates
    #[arg(long)]
    pub keep_locked: bool,

    /// Command script (JSON or TOML) applied after generation
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Use this duration in seconds instead of probing the file
    #[arg(long)]
    pub duration: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to the config value)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to the config value)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the segments a file would be cut into
    Plan {
        #[command(flatten)]
        plan: PlanArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cut a file into its planned segments
    Split {
        #[command(flatten)]
        plan: PlanArgs,

        /// Output directory (defaults to the config value)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also pack the parts into a zip archive
        #[arg(long)]
        zip: bool,

        /// Print the cut list without running ffmpeg
        #[arg(long)]
        dry_run: bool,
    },

    /// Concatenate files in order into one file
    Join {
        /// Files to join
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (.mp3 is appended when missing)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the mp3 files in a directory with their durations
    List {
        /// Directory to scan
        #[arg(required = true)]
        dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Probe a media file's duration
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
