//! Command-line argument definitions for the staticmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Only `--config-file` is required; clap prints usage and
//! exits non-zero when it is missing.

use clap::{ArgAction, Parser};

use staticmap::DEFAULT_FILE_NAME;

/// Command-line arguments for the staticmap tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
pub struct Args {
    /// Path to the configuration file (JSON)
    #[arg(short = 'f', long)]
    pub config_file: String,

    /// Path to folder containing exported KML files (not supported, ignored)
    #[arg(short, long)]
    pub input_folder: Option<String>,

    /// Path to folder to place generated images, overrides the config file
    #[arg(short, long)]
    pub output_folder: Option<String>,

    /// Disables colored logging output
    #[arg(long)]
    pub disable_color: bool,

    /// Enables debug logging levels
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub debug: bool,

    /// Map center, as a place name or "lat,lng"
    #[arg(long)]
    pub center: Option<String>,

    /// Map zoom level (0-21)
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Image size in pixels, as WIDTHxHEIGHT
    #[arg(long)]
    pub size: Option<String>,

    /// Base name of the output file, without extension
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    pub name: String,

    /// Outputs the current version of the staticmap CLI
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: (),
}
