//! cut-videos
//!
//! Cuts the same time window out of a set of videos, or turns a set of
//! images into one clip, by driving ffmpeg and ffprobe.
//!
//! # Usage
//!
//! ```bash
//! cut-videos convert --dir ~/clips holiday.mp4 talk.mkv --start 1-30 --end 2- --video h264 --audio aac
//! cut-videos probe ~/clips/holiday.mp4
//! cut-videos options
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cut_videos::app::container::{AppContainer, DefaultAppContainer};
use cut_videos::cli::{commands, Cli, Commands};
use cut_videos::config_initialization::load_configuration;
use cut_videos::utils::logging::{init_logging, is_valid_level, LogFormat};

/// Main entry point for the cut-videos CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        if !is_valid_level(level) {
            anyhow::bail!("Invalid log level: {}", level);
        }
        config.log_level = level.clone();
    }
    if let Commands::Convert(args) = &cli.command {
        if args.no_reveal {
            config.reveal_output = false;
        }
    }

    let format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(&config.log_level, format);

    info!("Starting cut-videos");
    let container = DefaultAppContainer::new(&config);

    // Execute the requested command
    match cli.command {
        Commands::Convert(args) => commands::convert(&container, &config, args).await?,
        Commands::Probe(args) => commands::probe(&container, args).await?,
        Commands::Options(args) => commands::options(container.option_tables(), args)?,
    }

    Ok(())
}
