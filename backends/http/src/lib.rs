#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `swaprpc-http`: HTTP Transport Backend
//!
//! This crate provides the HTTP POST implementation of the
//! [`transport::Transport`] trait used to reach Electrum and Bitcoin Core
//! wallet daemons.
//!
//! ## Overview
//!
//! - Implements [`HttpTransport`], a thin wrapper over [`reqwest::Client`]
//! - Supports unauthenticated, basic-authenticated and cookie-file
//!   authenticated endpoints
//! - Returns the response body untouched; envelope parsing happens in the
//!   dispatcher
//!
//! ## Example
//! ```no_run
//! use swaprpc_http::HttpTransport;
//! use transport::Transport;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = HttpTransport::with_auth("http://localhost:7777", "user", "pass");
//! let body = br#"{"jsonrpc":"1.0","method":"getfeerate","params":[],"id":1}"#;
//! let raw = transport.send(body.to_vec()).await.unwrap();
//! println!("{}", String::from_utf8_lossy(&raw));
//! # });
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use config::ConnectionConfig;
use reqwest::header::CONTENT_TYPE;
use transport::{Transport, TransportError};

/// A concrete implementation of the [`Transport`] trait using HTTP POST.
///
/// `HttpTransport` performs no envelope parsing. Bitcoin Core answers
/// failed calls with a non-2xx status and a JSON error body, so the body is
/// returned whatever the status; only a failure status with an empty body is
/// reported as a [`TransportError::Http`].
#[derive(Clone)]
pub struct HttpTransport {
    /// The underlying HTTP client used to perform requests.
    client: reqwest::Client,
    /// The full URL of the JSON-RPC endpoint (e.g. `http://localhost:7777`).
    url: String,
    /// Optional basic authentication credentials `(username, password)`.
    auth: Option<(String, String)>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.url)
            .field("authenticated", &self.auth.is_some())
            .finish()
    }
}

impl HttpTransport {
    /// Constructs a new `HttpTransport` targeting the provided URL.
    ///
    /// This variant does **not** use authentication.
    ///
    /// # Example
    /// ```
    /// use swaprpc_http::HttpTransport;
    /// use transport::Transport;
    ///
    /// let transport = HttpTransport::new("http://localhost:7777");
    /// assert_eq!(transport.endpoint(), "http://localhost:7777");
    /// ```
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), url: url.into(), auth: None }
    }

    /// Constructs a new `HttpTransport` with basic authentication.
    pub fn with_auth(
        url: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        let url = url.into();
        tracing::trace!(%url, "initializing authenticated HTTP transport");
        Self { client: reqwest::Client::new(), url, auth: Some((user.into(), pass.into())) }
    }

    /// Constructs a new `HttpTransport` using credentials from a cookie file.
    ///
    /// The cookie file format is a single line containing `username:password`.
    ///
    /// # Errors
    /// Returns `TransportError::Other` if:
    /// - The cookie file cannot be read
    /// - The cookie file is empty or doesn't contain a colon
    pub fn from_cookie_file(
        url: impl Into<String>,
        cookie_path: impl AsRef<Path>,
    ) -> Result<Self, TransportError> {
        let file = File::open(cookie_path.as_ref()).map_err(|e| {
            TransportError::Other(format!("Failed to read cookie file: {}", e))
        })?;

        let line = BufReader::new(file)
            .lines()
            .next()
            .ok_or_else(|| TransportError::Other("Cookie file is empty".to_string()))?
            .map_err(|e| TransportError::Other(format!("Failed to read cookie file: {}", e)))?;

        let (user, pass) = line.split_once(':').ok_or_else(|| {
            TransportError::Other("Invalid cookie file format: missing colon".to_string())
        })?;

        Ok(Self::with_auth(url, user, pass))
    }

    /// Constructs the transport described by a `[connection]` section.
    ///
    /// A cookie file takes precedence over `user`/`pass`; with neither set
    /// the endpoint is called without authentication.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self, TransportError> {
        let url = config.url();
        let transport = match &config.cookie_file {
            Some(cookie) => Self::from_cookie_file(url, cookie)?,
            None if !config.user.is_empty() => Self::with_auth(url, &config.user, &config.pass),
            None => Self::new(url),
        };
        match config.timeout() {
            Some(timeout) => transport.with_timeout(timeout),
            None => Ok(transport),
        }
    }

    /// Abort requests that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, TransportError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// POSTs the request bytes and returns the response body.
    ///
    /// # Errors
    /// - [`TransportError::Http`] if the request fails, or the status is a
    ///   failure and the body is empty
    /// - [`TransportError::Serialization`] if the body cannot be read
    async fn send(&self, request: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        tracing::trace!(url = %self.url, bytes = request.len(), "POST");
        let mut req =
            self.client.post(&self.url).header(CONTENT_TYPE, "application/json").body(request);
        if let Some((u, p)) = &self.auth {
            req = req.basic_auth(u, Some(p));
        }
        let resp = req.send().await.map_err(|e| {
            tracing::error!("HTTP Transport - Request failed: {}", e);
            TransportError::Http(e.to_string())
        })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| {
            tracing::error!("HTTP Transport - Failed to read body: {}", e);
            TransportError::Serialization(e.to_string())
        })?;

        if !status.is_success() {
            if body.is_empty() {
                return Err(TransportError::Http(status.to_string()));
            }
            tracing::debug!(%status, "failure status with body; passing body through");
        }
        Ok(body.to_vec())
    }

    /// Returns the configured JSON-RPC endpoint URL.
    fn endpoint(&self) -> &str { &self.url }
}
