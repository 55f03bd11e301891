use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidscribe::cli::{Cli, Commands};
use vidscribe::config::Config;
use vidscribe::extract::ContentExtractor;
use vidscribe::resolver;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "vidscribe=debug"
    } else {
        "vidscribe=info"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().await?;

    match cli.command {
        Commands::Extract {
            input,
            output,
            format,
            languages,
        } => {
            let mut config = config;
            if !languages.is_empty() {
                config.extraction.languages = languages;
            }

            let extractor = ContentExtractor::new(&config)?;

            tracing::info!("Starting extraction for: {}", input);

            let progress = if cli.quiet {
                None
            } else {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} [{elapsed_precise}] {msg}")
                        .unwrap(),
                );
                spinner.enable_steady_tick(std::time::Duration::from_millis(100));
                spinner.set_message("Extracting transcript and metadata...");
                Some(spinner)
            };

            let result = extractor.extract(&input).await;

            if let Some(spinner) = progress {
                spinner.finish_and_clear();
            }

            let content = result?;

            match output {
                Some(path) => {
                    vidscribe::output::save_to_file(&content, &path, &format).await?;
                    println!("Extraction saved to: {}", path.display());
                }
                None => {
                    vidscribe::output::print_to_console(&content, &format)?;
                }
            }

            if content.transcript.is_empty() {
                eprintln!("Note: no captions could be retrieved; the transcript field carries guidance instead.");
            }
        }
        Commands::Resolve { input } => {
            let id = resolver::resolve(&input)?;
            println!("{}", id);
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.interactive_setup().await?;
            }
        }
        Commands::Strategies => {
            let extractor = ContentExtractor::new(&config)?;
            println!("Transcript strategies, in the order they are tried:");
            for (index, name) in extractor.strategy_names().iter().enumerate() {
                println!("  {}. {}", index + 1, name);
            }
        }
    }

    Ok(())
}
