//! Staticmap - fetch rendered maps from the Google Maps Static API and
//! store them as JPEG files.
//!
//! The work is a single linear [`Pipeline`]: make sure the output
//! directory exists, request one map image, and write it to
//! `<output_dir>/<name>.jpg`. Every step returns a [`StaticMapError`]
//! instead of terminating, so the caller decides how to exit.

pub mod client;
pub mod config;
pub mod output_dir;
pub mod request;
pub mod writer;

mod error;

pub use client::{GoogleMapsClient, MapProvider};
pub use config::{ApiConfig, load_config};
pub use error::{ClientError, ConfigError, RequestError, StaticMapError};
pub use request::{MapSize, MapType, StaticMapRequest};
pub use reqwest::StatusCode;

use std::path::PathBuf;

use log::{debug, info};

/// Base name of the written image when none is given.
pub const DEFAULT_FILE_NAME: &str = "image1";

/// Fetch-and-persist pipeline for one static map.
///
/// # Examples
///
/// ```rust,no_run
/// use staticmap::{ApiConfig, GoogleMapsClient, Pipeline};
///
/// let config = ApiConfig::new("my-api-key", "maps");
/// let client = GoogleMapsClient::new(config.api_key()).expect("Failed to build client");
///
/// let pipeline = Pipeline::new(config).expect("Invalid request");
/// let path = pipeline.run(&client).expect("Failed to fetch map");
/// println!("wrote {}", path.display());
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ApiConfig,
    request: StaticMapRequest,
    file_name: String,
}

impl Pipeline {
    /// Create a pipeline for the request described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::InvalidRequest`] if the request fields in
    /// `config` are malformed.
    pub fn new(config: ApiConfig) -> Result<Self, StaticMapError> {
        let request = config.map_request()?;
        Ok(Self {
            config,
            request,
            file_name: DEFAULT_FILE_NAME.to_string(),
        })
    }

    /// Replace the map request.
    pub fn with_request(mut self, request: StaticMapRequest) -> Self {
        self.request = request;
        self
    }

    /// Set the base name of the output file, without extension.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn request(&self) -> &StaticMapRequest {
        &self.request
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Run the pipeline against `provider` and return the written path.
    ///
    /// Nothing is written unless the provider returns an image.
    ///
    /// # Errors
    ///
    /// Returns the first error from validation, directory creation, the
    /// provider, or the JPEG writer.
    pub fn run(&self, provider: &impl MapProvider) -> Result<PathBuf, StaticMapError> {
        writer::validate_file_name(&self.file_name)?;
        self.request.validate()?;

        let dir = self.config.output_directory();
        info!(
            output_dir = dir,
            center = self.request.center(),
            zoom = self.request.zoom(),
            size:% = self.request.size();
            "Fetching static map"
        );

        let status = output_dir::ensure_dir(dir)?;
        debug!(status:?; "Output directory ready");

        let image = provider.static_map(&self.request)?;

        writer::write_jpeg(dir, &self.file_name, image)
    }
}
