//! Static map request model.
//!
//! A [`StaticMapRequest`] describes one rendered map image: where it is
//! centered, how far it is zoomed in and how many pixels it spans. The
//! optional fields map one-to-one onto the Static Maps API query
//! parameters of the same name.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::StaticMapError;

/// Center used when neither the config file nor the command line sets one.
pub const DEFAULT_CENTER: &str = "Berkeley";

/// Zoom level used when none is configured.
pub const DEFAULT_ZOOM: u8 = 14;

/// Largest zoom level the service renders.
pub const MAX_ZOOM: u8 = 21;

/// Largest width or height, in pixels, the service accepts.
pub const MAX_DIMENSION: u32 = 640;

/// Pixel size of a map image, written as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapSize {
    width: u32,
    height: u32,
}

impl MapSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for MapSize {
    fn default() -> Self {
        Self::new(400, 400)
    }
}

impl fmt::Display for MapSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for MapSize {
    type Err = StaticMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StaticMapError::InvalidRequest(format!("size {s:?} is not WIDTHxHEIGHT"));

        let (width, height) = s.trim().split_once('x').ok_or_else(invalid)?;
        // u32::from_str would also take a leading '+'
        let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(width) || !is_digits(height) {
            return Err(invalid());
        }
        let width = width.parse().map_err(|_| invalid())?;
        let height = height.parse().map_err(|_| invalid())?;

        Ok(Self::new(width, height))
    }
}

/// Base map style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Roadmap,
    Satellite,
    Terrain,
    Hybrid,
}

impl MapType {
    /// Returns the query parameter value for this map type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Roadmap => "roadmap",
            MapType::Satellite => "satellite",
            MapType::Terrain => "terrain",
            MapType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for a single rendered map image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMapRequest {
    center: String,
    zoom: u8,
    size: MapSize,
    scale: Option<u8>,
    map_type: Option<MapType>,
    language: Option<String>,
    region: Option<String>,
}

impl Default for StaticMapRequest {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER.to_string(),
            zoom: DEFAULT_ZOOM,
            size: MapSize::default(),
            scale: None,
            map_type: None,
            language: None,
            region: None,
        }
    }
}

impl StaticMapRequest {
    /// Creates a request with the given center, zoom and size and no
    /// optional parameters.
    pub fn new(center: impl Into<String>, zoom: u8, size: MapSize) -> Self {
        Self {
            center: center.into(),
            zoom,
            size,
            ..Self::default()
        }
    }

    pub fn with_center(mut self, center: impl Into<String>) -> Self {
        self.center = center.into();
        self
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_size(mut self, size: MapSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_map_type(mut self, map_type: MapType) -> Self {
        self.map_type = Some(map_type);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn center(&self) -> &str {
        &self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn size(&self) -> MapSize {
        self.size
    }

    pub fn scale(&self) -> Option<u8> {
        self.scale
    }

    pub fn map_type(&self) -> Option<MapType> {
        self.map_type
    }

    /// Checks the request against the limits of the Static Maps API.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::InvalidRequest`] if the center is blank,
    /// the zoom is above [`MAX_ZOOM`], either dimension is outside
    /// `1..=MAX_DIMENSION` or the scale is not 1 or 2.
    pub fn validate(&self) -> Result<(), StaticMapError> {
        if self.center.trim().is_empty() {
            return Err(StaticMapError::InvalidRequest(
                "center must not be empty".to_string(),
            ));
        }

        if self.zoom > MAX_ZOOM {
            return Err(StaticMapError::InvalidRequest(format!(
                "zoom {} is above the maximum of {MAX_ZOOM}",
                self.zoom
            )));
        }

        let dimensions = 1..=MAX_DIMENSION;
        if !dimensions.contains(&self.size.width) || !dimensions.contains(&self.size.height) {
            return Err(StaticMapError::InvalidRequest(format!(
                "size {} must be between 1x1 and {MAX_DIMENSION}x{MAX_DIMENSION}",
                self.size
            )));
        }

        match self.scale {
            None | Some(1 | 2) => {}
            Some(scale) => {
                return Err(StaticMapError::InvalidRequest(format!(
                    "scale {scale} must be 1 or 2"
                )));
            }
        }

        Ok(())
    }

    /// Returns the query parameters describing this request, without the
    /// API key.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("center", self.center.clone()),
            ("zoom", self.zoom.to_string()),
            ("size", self.size.to_string()),
        ];

        if let Some(scale) = self.scale {
            pairs.push(("scale", scale.to_string()));
        }
        if let Some(map_type) = self.map_type {
            pairs.push(("maptype", map_type.to_string()));
        }
        if let Some(language) = &self.language {
            pairs.push(("language", language.clone()));
        }
        if let Some(region) = &self.region {
            pairs.push(("region", region.clone()));
        }

        pairs
    }
}
