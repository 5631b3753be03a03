//! CLI logic for the staticmap tool.
//!
//! This module turns parsed [`Args`] into a [`Pipeline`] and runs it
//! against the Google Maps Static API.

pub mod error_adapter;

mod args;

pub use args::Args;

use std::path::PathBuf;

use env_logger::{Env, WriteStyle};
use log::{LevelFilter, info, warn};

use staticmap::{GoogleMapsClient, MapProvider, Pipeline, StaticMapError, load_config};

/// Run the staticmap CLI application
///
/// Loads the configuration file, fetches one map from the Google Maps
/// Static API and writes it as a JPEG.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StaticMapError` for:
/// - Configuration loading errors
/// - Invalid request parameters
/// - Directory creation errors
/// - Client construction and request errors
/// - File creation and encoding errors
pub fn run(args: &Args) -> Result<PathBuf, StaticMapError> {
    let pipeline = build_pipeline(args)?;
    let client = GoogleMapsClient::new(pipeline.config().api_key())?;
    run_pipeline(&pipeline, &client)
}

/// Run the CLI against an arbitrary map provider.
///
/// # Errors
///
/// Same as [`run`], except that client construction is the caller's
/// concern.
pub fn run_with(args: &Args, provider: &impl MapProvider) -> Result<PathBuf, StaticMapError> {
    let pipeline = build_pipeline(args)?;
    run_pipeline(&pipeline, provider)
}

/// Build the pipeline described by the config file and command-line
/// overrides.
///
/// Command-line values take precedence over the config file.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the resulting
/// request is invalid.
pub fn build_pipeline(args: &Args) -> Result<Pipeline, StaticMapError> {
    if let Some(input_folder) = &args.input_folder {
        warn!(input_folder = input_folder.as_str(); "KML input is not supported, ignoring --input-folder");
    }

    let mut config = load_config(&args.config_file)?;
    if let Some(output_folder) = &args.output_folder {
        info!(output_folder = output_folder.as_str(); "Overriding output directory from command line");
        config = config.with_output_directory(output_folder.as_str());
    }

    // Layered onto the config before the request is built, so a flag can
    // replace a file value that would not validate
    if let Some(center) = &args.center {
        config = config.with_center(center.as_str());
    }
    if let Some(zoom) = args.zoom {
        config = config.with_zoom(zoom);
    }
    if let Some(size) = &args.size {
        config = config.with_size(size.as_str());
    }

    Ok(Pipeline::new(config)?.with_file_name(args.name.as_str()))
}

/// Build the logger for `args`, reading filters from `RUST_LOG`.
///
/// `--debug` only sets the default level; an explicit `RUST_LOG` wins.
pub fn logger_builder(args: &Args) -> env_logger::Builder {
    logger_builder_from_env(args, Env::default())
}

fn logger_builder_from_env(args: &Args, env: Env<'_>) -> env_logger::Builder {
    let default_level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::from_env(env.default_filter_or(default_level.as_str()));
    if args.disable_color {
        builder.write_style(WriteStyle::Never);
    }
    builder
}

fn run_pipeline(pipeline: &Pipeline, provider: &impl MapProvider) -> Result<PathBuf, StaticMapError> {
    info!(
        output_dir = pipeline.config().output_directory(),
        file_name = pipeline.file_name();
        "Processing static map"
    );

    let path = pipeline.run(provider)?;

    info!(output_file = path.display().to_string(); "Map image exported successfully");

    Ok(path)
}
