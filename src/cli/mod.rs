use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vidscribe",
    about = "Vidscribe - Extract timed-caption transcripts and metadata from YouTube videos",
    version,
    long_about = "A CLI tool for extracting caption transcripts and descriptive metadata from YouTube videos. Tries an ordered chain of extraction strategies and always produces a usable result, even when no captions exist."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract transcript and metadata from a video URL or bare id
    Extract {
        /// Video URL (watch, short link, embed, shorts) or bare 11-character id
        #[arg(value_name = "URL_OR_ID")]
        input: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Preferred caption languages, overriding the configured list
        #[arg(short, long, value_name = "LANG", value_delimiter = ',')]
        languages: Vec<String>,
    },

    /// Resolve an input string to its canonical video id
    Resolve {
        /// Video URL or bare id
        #[arg(value_name = "URL_OR_ID")]
        input: String,
    },

    /// Show or edit extraction settings
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List the transcript strategies in the order they are tried
    Strategies,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text: metadata header plus transcript
    Text,
    /// Pretty-printed JSON matching the extraction wire shape
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
