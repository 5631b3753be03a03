//! Error types for static map operations.
//!
//! [`StaticMapError`] is returned by every step of the pipeline. The
//! nested [`ConfigError`], [`ClientError`] and [`RequestError`] enums keep
//! the failure details of each step apart so callers can tell them apart.

use std::{io, path::PathBuf};

use image::ImageError;
use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for static map operations.
#[derive(Debug, Error)]
pub enum StaticMapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Invalid map request: {0}")]
    InvalidRequest(String),

    #[error("Failed to decode map image: {0}")]
    Decode(#[source] ImageError),

    #[error("Failed to encode JPEG image: {0}")]
    Encode(#[source] ImageError),

    #[error("Invalid output file name: {0:?}")]
    InvalidFileName(String),

    #[error("Output path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to create file {}: {source}", path.display())]
    CreateFile { path: PathBuf, source: io::Error },
}

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON or a shape that doesn't match [`ApiConfig`](crate::ApiConfig).
    /// Carries the file content and 1-based position so the CLI can point at it.
    #[error("Failed to parse JSON configuration: {message}")]
    Parse {
        message: String,
        src: String,
        line: usize,
        column: usize,
    },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while constructing the maps client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API key is empty")]
    EmptyApiKey,

    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Errors raised while talking to the maps service.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Transport failure. The URL is stripped so the API key never ends up
    /// in a log line.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Maps service responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ConfigError {
    /// Byte offset of a parse error within its source, if this is one.
    pub fn parse_offset(&self) -> Option<usize> {
        let Self::Parse {
            src, line, column, ..
        } = self
        else {
            return None;
        };

        let line_start: usize = src
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        Some((line_start + column.saturating_sub(1)).min(src.len()))
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
