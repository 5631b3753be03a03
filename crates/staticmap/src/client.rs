//! Google Maps Static API client.
//!
//! [`MapProvider`] is the seam between the pipeline and the network.
//! [`GoogleMapsClient`] implements it with one blocking HTTP request per
//! call; there is no retry, backoff or explicit timeout.

use image::DynamicImage;
use log::{debug, info};
#[cfg(test)]
use mockall::automock;
use reqwest::blocking::Client;

use crate::{ClientError, RequestError, StaticMapError, request::StaticMapRequest};

/// Static Maps API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Source of rendered map images.
#[cfg_attr(test, automock)]
pub trait MapProvider {
    /// Fetches the map described by `request` and returns the decoded image.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the service cannot be
    /// reached or rejects the request, or the response is not an image.
    fn static_map(&self, request: &StaticMapRequest) -> Result<DynamicImage, StaticMapError>;
}

/// Blocking client for the Google Maps Static API.
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsClient {
    /// Create a client authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EmptyApiKey`] if the key is blank and
    /// [`ClientError::Build`] if the HTTP client cannot be initialized.
    pub fn new(api_key: impl Into<String>) -> Result<Self, StaticMapError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::EmptyApiKey.into());
        }

        let client = Client::builder()
            .user_agent(concat!("staticmap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ClientError::Build(err.without_url()))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Send requests to `base_url` instead of [`DEFAULT_BASE_URL`].
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl MapProvider for GoogleMapsClient {
    fn static_map(&self, request: &StaticMapRequest) -> Result<DynamicImage, StaticMapError> {
        request.validate()?;

        let mut query = request.query_pairs();
        debug!(url = self.base_url.as_str(), query:?; "Requesting static map");
        query.push(("key", self.api_key.clone()));

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .map_err(RequestError::from)?;

        let status = response.status();
        if !status.is_success() {
            // The service explains rejections (bad key, quota) in a plain text body
            let body = match response.text() {
                Ok(body) => body.trim().to_string(),
                Err(err) => {
                    debug!(status:% = status, err:% = err.without_url(); "Failed to read error response body");
                    String::new()
                }
            };
            return Err(RequestError::Status { status, body }.into());
        }

        let bytes = response.bytes().map_err(RequestError::from)?;
        let image = image::load_from_memory(&bytes).map_err(StaticMapError::Decode)?;

        info!(
            width = image.width(),
            height = image.height(),
            bytes = bytes.len();
            "Received map image"
        );

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Cursor, Write},
        net::TcpListener,
        thread::{self, JoinHandle},
    };

    use image::{GenericImageView, ImageFormat, Rgb, RgbImage};
    use reqwest::StatusCode;

    use super::*;
    use crate::request::MapSize;

    /// Serves a single HTTP response and returns the request line it received.
    fn serve_once(status: &str, content_type: &str, body: Vec<u8>) -> (String, JoinHandle<String>) {
        let mut response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(&body);
        serve_raw(response)
    }

    /// Accepts one connection, answers with `response` verbatim and closes.
    fn serve_raw(response: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
        let url = format!("http://{}/maps/api/staticmap", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }

            stream.write_all(&response).unwrap();
            stream.flush().unwrap();

            request_line
        });

        (url, handle)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([1, 2, 3])));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_empty_api_key_fails_construction() {
        let result = GoogleMapsClient::new("  ");
        assert!(matches!(
            result,
            Err(StaticMapError::Client(ClientError::EmptyApiKey))
        ));
    }

    #[test]
    fn test_default_base_url() {
        let client = GoogleMapsClient::new("k").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_static_map_decodes_image_and_sends_query() {
        let (url, server) = serve_once("200 OK", "image/png", png_bytes(12, 8));
        let client = GoogleMapsClient::new("secret").unwrap().with_base_url(url);

        let image = client
            .static_map(&StaticMapRequest::default())
            .expect("request should succeed");
        assert_eq!(image.dimensions(), (12, 8));

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /maps/api/staticmap?"));
        assert!(request_line.contains("center=Berkeley"));
        assert!(request_line.contains("zoom=14"));
        assert!(request_line.contains("size=400x400"));
        assert!(request_line.contains("key=secret"));
    }

    #[test]
    fn test_error_status_is_reported_with_body() {
        let body = b"The provided API key is invalid.".to_vec();
        let (url, server) = serve_once("403 Forbidden", "text/plain", body);
        let client = GoogleMapsClient::new("bad").unwrap().with_base_url(url);

        let result = client.static_map(&StaticMapRequest::default());
        server.join().unwrap();

        match result {
            Err(StaticMapError::Request(RequestError::Status { status, body })) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(body, "The provided API key is invalid.");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_error_body_still_reports_status() {
        // Promises more body than it sends, so reading the body fails
        let response =
            b"HTTP/1.1 403 Forbidden\r\nContent-Type: text/plain\r\nContent-Length: 100\r\nConnection: close\r\n\r\nThe provided"
                .to_vec();
        let (url, server) = serve_raw(response);
        let client = GoogleMapsClient::new("bad").unwrap().with_base_url(url);

        let result = client.static_map(&StaticMapRequest::default());
        server.join().unwrap();

        match result {
            Err(StaticMapError::Request(RequestError::Status { status, body })) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert!(body.is_empty());
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_image_body_is_decode_error() {
        let (url, server) = serve_once("200 OK", "text/html", b"<html></html>".to_vec());
        let client = GoogleMapsClient::new("k").unwrap().with_base_url(url);

        let result = client.static_map(&StaticMapRequest::default());
        server.join().unwrap();

        assert!(matches!(result, Err(StaticMapError::Decode(_))));
    }

    #[test]
    fn test_invalid_request_is_rejected_before_sending() {
        // Nothing listens here; validation must fail first
        let client = GoogleMapsClient::new("k")
            .unwrap()
            .with_base_url("http://127.0.0.1:9/unused");
        let request = StaticMapRequest::default().with_size(MapSize::new(0, 0));

        let result = client.static_map(&request);
        assert!(matches!(result, Err(StaticMapError::InvalidRequest(_))));
    }

    #[test]
    fn test_connection_failure_hides_api_key() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let client = GoogleMapsClient::new("very-secret-key")
            .unwrap()
            .with_base_url(url);
        let result = client.static_map(&StaticMapRequest::default());

        match result {
            Err(err @ StaticMapError::Request(RequestError::Http(_))) => {
                assert!(!err.to_string().contains("very-secret-key"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
