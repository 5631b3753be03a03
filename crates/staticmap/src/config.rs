//! Configuration file loading.
//!
//! The configuration is a JSON object with PascalCase keys:
//!
//! ```json
//! { "APIKey": "...", "OutputDirectory": "maps" }
//! ```
//!
//! The request keys `Center`, `Zoom`, `Size`, `Scale`, `MapType`,
//! `Language` and `Region` are optional and fall back to the defaults of
//! [`StaticMapRequest`].
//!
//! # Example
//!
//! ```
//! # use staticmap::config::ApiConfig;
//! let config = ApiConfig::new("key", "/tmp/out");
//! assert_eq!(config.output_directory(), "/tmp/out");
//! ```

use std::{fmt, fs, path::Path};

use log::{debug, info};
use serde::Deserialize;

use crate::{
    ConfigError, StaticMapError,
    request::{MapSize, MapType, StaticMapRequest},
};

/// API configuration loaded from the JSON configuration file.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiConfig {
    #[serde(rename = "APIKey")]
    api_key: String,

    output_directory: String,

    center: Option<String>,
    zoom: Option<u8>,
    size: Option<String>,
    scale: Option<u8>,
    map_type: Option<MapType>,
    language: Option<String>,
    region: Option<String>,
}

impl ApiConfig {
    /// Creates a configuration with only the required fields set.
    pub fn new(api_key: impl Into<String>, output_directory: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            output_directory: output_directory.into(),
            center: None,
            zoom: None,
            size: None,
            scale: None,
            map_type: None,
            language: None,
            region: None,
        }
    }

    /// Replaces the output directory.
    pub fn with_output_directory(mut self, output_directory: impl Into<String>) -> Self {
        self.output_directory = output_directory.into();
        self
    }

    /// Replaces the map center. Values set this way win over the file,
    /// including values that would not have validated.
    pub fn with_center(mut self, center: impl Into<String>) -> Self {
        self.center = Some(center.into());
        self
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Replaces the map size, given as `WIDTHxHEIGHT`. Parsed by
    /// [`map_request`](Self::map_request).
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn output_directory(&self) -> &str {
        &self.output_directory
    }

    /// Builds the map request described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::InvalidRequest`] if the configured size is
    /// malformed or the resulting request fails validation.
    pub fn map_request(&self) -> Result<StaticMapRequest, StaticMapError> {
        let mut request = StaticMapRequest::default();

        if let Some(center) = &self.center {
            request = request.with_center(center.as_str());
        }
        if let Some(zoom) = self.zoom {
            request = request.with_zoom(zoom);
        }
        if let Some(size) = &self.size {
            request = request.with_size(size.parse::<MapSize>()?);
        }
        if let Some(scale) = self.scale {
            request = request.with_scale(scale);
        }
        if let Some(map_type) = self.map_type {
            request = request.with_map_type(map_type);
        }
        if let Some(language) = &self.language {
            request = request.with_language(language.as_str());
        }
        if let Some(region) = &self.region {
            request = request.with_region(region.as_str());
        }

        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Validation("APIKey must not be empty".to_string()));
        }
        if self.output_directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "OutputDirectory must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// Hand-written so the API key stays out of debug logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("output_directory", &self.output_directory)
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("size", &self.size)
            .field("scale", &self.scale)
            .field("map_type", &self.map_type)
            .field("language", &self.language)
            .field("region", &self.region)
            .finish()
    }
}

/// Load the configuration from a JSON file
///
/// # Arguments
///
/// * `path` - Path to the JSON configuration file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - JSON parsing fails or the shape doesn't match
/// - `APIKey` or `OutputDirectory` is empty
pub fn load_config(path: impl AsRef<Path>) -> Result<ApiConfig, StaticMapError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading configuration");

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: ApiConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
        line: e.line(),
        column: e.column(),
        src: content.clone(),
    })?;
    config.validate()?;

    debug!(config:?; "Configuration loaded");

    Ok(config)
}
