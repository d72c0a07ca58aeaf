//! CLI module for cut-videos
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, OptionsArgs, ProbeArgs};

/// Cut and convert videos and image sequences with ffmpeg
///
/// Trims every input to the same window, re-encodes it with the selected
/// video and audio options and writes the result next to the input.
#[derive(Parser)]
#[command(name = "cut-videos")]
#[command(about = "Cut and convert videos and image sequences with ffmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./cut-videos.toml when present)
    #[arg(long, global = true, env = "CUT_VIDEOS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level, overrides the configuration
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Cut and convert a set of files
    Convert(ConvertArgs),
    /// Show the metadata a conversion relies on
    Probe(ProbeArgs),
    /// List the available video and audio options
    Options(OptionsArgs),
}
