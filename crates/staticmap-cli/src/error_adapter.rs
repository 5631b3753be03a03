//! Error adapter for converting StaticMapError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's rich diagnostic formatting used in the CLI. Every variant gets
//! a stable code and, where there is something useful to say, a help line.
//! Configuration parse errors also carry the JSON source so miette can
//! point at the offending position.

use std::{error::Error, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use staticmap::{ClientError, ConfigError, RequestError, StaticMapError, StatusCode};

/// Adapter wrapping a [`StaticMapError`] for miette rendering.
pub struct ErrorAdapter<'a>(pub &'a StaticMapError);

impl ErrorAdapter<'_> {
    fn config_error(&self) -> Option<&ConfigError> {
        match self.0 {
            StaticMapError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            StaticMapError::Io(_) => "staticmap::io",
            StaticMapError::Config(ConfigError::Parse { .. }) => "staticmap::config::parse",
            StaticMapError::Config(ConfigError::MissingFile(_)) => "staticmap::config::missing",
            StaticMapError::Config(ConfigError::Validation(_)) => "staticmap::config::invalid",
            StaticMapError::Client(_) => "staticmap::client",
            StaticMapError::Request(RequestError::Http(_)) => "staticmap::request::http",
            StaticMapError::Request(RequestError::Status { .. }) => "staticmap::request::status",
            StaticMapError::InvalidRequest(_) => "staticmap::request::invalid",
            StaticMapError::Decode(_) => "staticmap::decode",
            StaticMapError::Encode(_) => "staticmap::encode",
            StaticMapError::InvalidFileName(_) => "staticmap::output::name",
            StaticMapError::NotADirectory(_) | StaticMapError::CreateDir { .. } => {
                "staticmap::output::dir"
            }
            StaticMapError::CreateFile { .. } => "staticmap::output::file",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            StaticMapError::Config(ConfigError::Parse { .. }) => {
                r#"expected a JSON object like {"APIKey": "...", "OutputDirectory": "..."}"#
            }
            StaticMapError::Config(ConfigError::MissingFile(_)) => {
                "check the path passed to --config-file"
            }
            StaticMapError::Config(ConfigError::Validation(_))
            | StaticMapError::Client(ClientError::EmptyApiKey) => {
                "set a non-empty APIKey and OutputDirectory in the configuration file"
            }
            StaticMapError::Request(RequestError::Status { status, .. })
                if *status == StatusCode::FORBIDDEN =>
            {
                "check that the API key is valid and the Static Maps API is enabled for it"
            }
            StaticMapError::InvalidRequest(_) => {
                "zoom must be 0-21, size at most 640x640 and scale 1 or 2"
            }
            StaticMapError::InvalidFileName(_) => "--name must be a plain file name",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.config_error()? {
            ConfigError::Parse { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let err = self.config_error()?;
        let offset = err.parse_offset()?;
        let span = SourceSpan::new(offset.into(), 0);
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span),
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn parse_error() -> StaticMapError {
        StaticMapError::Config(ConfigError::Parse {
            message: "expected value at line 1 column 11".to_string(),
            src: r#"{"APIKey": }"#.to_string(),
            line: 1,
            column: 11,
        })
    }

    #[test]
    fn test_codes_per_variant() {
        let err = StaticMapError::Config(ConfigError::MissingFile(PathBuf::from("c.json")));
        let adapter = ErrorAdapter(&err);
        assert_eq!(
            adapter.code().unwrap().to_string(),
            "staticmap::config::missing"
        );

        let err = StaticMapError::InvalidRequest("zoom".to_string());
        assert_eq!(
            ErrorAdapter(&err).code().unwrap().to_string(),
            "staticmap::request::invalid"
        );
    }

    #[test]
    fn test_display_matches_error() {
        let err = StaticMapError::InvalidFileName("a/b".to_string());
        assert_eq!(ErrorAdapter(&err).to_string(), err.to_string());
    }

    #[test]
    fn test_forbidden_status_has_help() {
        let err = StaticMapError::Request(RequestError::Status {
            status: StatusCode::FORBIDDEN,
            body: "The provided API key is invalid.".to_string(),
        });
        let help = ErrorAdapter(&err).help().unwrap().to_string();
        assert!(help.contains("API key"));
    }

    #[test]
    fn test_parse_error_points_into_source() {
        let err = parse_error();
        let adapter = ErrorAdapter(&err);

        assert!(adapter.source_code().is_some());
        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 10);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_non_parse_errors_have_no_labels() {
        let err = StaticMapError::Client(ClientError::EmptyApiKey);
        let adapter = ErrorAdapter(&err);
        assert!(adapter.source_code().is_none());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_render_includes_code_and_help() {
        let err = parse_error();
        let mut rendered = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut rendered, &ErrorAdapter(&err))
            .unwrap();

        assert!(rendered.contains("staticmap::config::parse"));
        assert!(rendered.contains("OutputDirectory"));
    }
}
