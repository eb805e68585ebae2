#![warn(missing_docs)]
//! # sitecheck-client
//!
//! ## Purpose
//! Normalizes user-entered URLs and executes the single `/analyze` call
//! against the remote legitimacy service with timeout, cancellation, and
//! failure classification.
//!
//! ## Responsibilities
//! - Canonicalize free-text input into an absolute HTTP(S) URL.
//! - Validate endpoint policy for the configured service base URL.
//! - Issue exactly one POST per analysis, bounded by a hard deadline.
//! - Classify failures into the user-facing error taxonomy.
//!
//! ## Data flow
//! Normalized URL -> [`AnalysisTransport::analyze`] -> lenient contract decode
//! -> lifecycle controller.
//!
//! ## Ownership and lifetimes
//! The HTTP client and configuration are owned by [`HttpAnalysisClient`];
//! callers hold it behind `Arc<dyn AnalysisTransport>` so tests can inject a
//! scripted transport.
//!
//! ## Error model
//! All transport outcomes map to [`AnalysisError`]; malformed 2xx bodies are
//! recovered inside the call via the contract fallback object and never
//! surface as failures.
//!
//! ## Security and privacy notes
//! Only the submitted URL leaves the process; request and response bodies are
//! never logged verbatim.

use std::time::Duration;

use async_trait::async_trait;
use sitecheck_contract::{AnalyzeRequest, AnalyzeResponse, decode_response, extract_error_message};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Hard deadline for one analysis call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Path of the single analysis endpoint, relative to the base URL.
pub const ANALYZE_PATH: &str = "/analyze";

/// Canonicalizes free-text user input into an absolute URL.
///
/// Trims surrounding whitespace; empty input stays empty (the caller treats
/// that as a validation failure and never dispatches it). Input that already
/// carries a URI scheme is returned unchanged; everything else is prefixed
/// with `https://`. Pure, no I/O.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if has_uri_scheme(trimmed) {
        return trimmed.to_string();
    }

    format!("https://{trimmed}")
}

/// RFC 3986 scheme prefix: `[a-zA-Z][a-zA-Z0-9+.-]*:`.
fn has_uri_scheme(candidate: &str) -> bool {
    let Some((scheme, _)) = candidate.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        }
        _ => false,
    }
}

/// Validated client configuration for the analysis service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    analyze_endpoint: Url,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a validated configuration with the default 90 s deadline.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidEndpoint`] when the base URL does not
    /// parse or does not use http/https.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, AnalysisError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|error| AnalysisError::InvalidEndpoint(format!("invalid base url: {error}")))?;

        if base_url.scheme() != "https" && base_url.scheme() != "http" {
            return Err(AnalysisError::InvalidEndpoint(
                "base url must use http or https".to_string(),
            ));
        }

        // Join textually so a base with a path prefix (for example `/api`)
        // keeps that prefix.
        let joined = format!("{}{ANALYZE_PATH}", base_url.as_str().trim_end_matches('/'));
        let analyze_endpoint = Url::parse(&joined).map_err(|error| {
            AnalysisError::InvalidEndpoint(format!("invalid analyze endpoint: {error}"))
        })?;

        Ok(Self {
            base_url,
            analyze_endpoint,
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    /// Overrides the request deadline (tests use short deadlines).
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Returns the configured service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the resolved `/analyze` endpoint.
    pub fn analyze_endpoint(&self) -> &Url {
        &self.analyze_endpoint
    }

    /// Returns the configured request deadline.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Abstract analysis transport.
///
/// The lifecycle controller depends only on this trait; production code uses
/// [`HttpAnalysisClient`] while tests inject scripted transports.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Executes one analysis call for an already-normalized URL.
    ///
    /// Implementations must resolve promptly with
    /// [`AnalysisError::Superseded`] once `cancel` fires, releasing any
    /// underlying transfer.
    async fn analyze(
        &self,
        request: &AnalyzeRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalyzeResponse, AnalysisError>;
}

/// HTTP transport for the analysis service.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpAnalysisClient {
    /// Creates an HTTP client for the configured service.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Sends the call and classifies the HTTP outcome.
    ///
    /// Runs without a deadline; [`AnalysisTransport::analyze`] wraps it with
    /// the configured timeout and the cancellation race.
    async fn dispatch(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        let response = self
            .http
            .post(self.config.analyze_endpoint().clone())
            .json(request)
            .send()
            .await
            .map_err(|error| AnalysisError::Network {
                detail: error.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| AnalysisError::Network {
                detail: error.to_string(),
            })?;

        if !status.is_success() {
            // The error body may be JSON with a message, or anything else.
            let decoded = decode_response(&body);
            let message = extract_error_message(&decoded)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));
            tracing::warn!(status = status.as_u16(), "analysis request rejected");
            return Err(AnalysisError::Application {
                status: status.as_u16(),
                message,
            });
        }

        Ok(decode_response(&body))
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysisClient {
    async fn analyze(
        &self,
        request: &AnalyzeRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalyzeResponse, AnalysisError> {
        tracing::debug!(url = %request.url, "dispatching analysis request");

        // Dropping the dispatch future aborts the underlying transfer, so
        // both deadline expiry and supersession actively cancel the call.
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(url = %request.url, "analysis call superseded");
                Err(AnalysisError::Superseded)
            }
            outcome = tokio::time::timeout(self.config.request_timeout(), self.dispatch(request)) => {
                match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!(url = %request.url, "analysis call exceeded deadline");
                        Err(AnalysisError::timeout(self.config.request_timeout()))
                    }
                }
            }
        }
    }
}

/// Classified analysis-call failures.
///
/// `Display` strings are the user-facing messages surfaced by the lifecycle
/// controller.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The call exceeded the configured deadline and was aborted.
    #[error("Request timed out. The analysis can take up to {budget_secs} seconds. Please try again.")]
    Timeout {
        /// Configured deadline in whole seconds, rounded up (at least 1).
        budget_secs: u64,
    },
    /// Transport-level failure; no response was received.
    #[error("Network or server error. Try again or analyze another URL.")]
    Network {
        /// Underlying transport detail, kept out of the user-facing text.
        detail: String,
    },
    /// Well-formed HTTP response outside the success range.
    #[error("{message}")]
    Application {
        /// HTTP status code of the rejected response.
        status: u16,
        /// Message extracted from the payload, or a status-derived default.
        message: String,
    },
    /// A newer submission cancelled this call.
    #[error("request superseded by a newer submission")]
    Superseded,
    /// The configured base URL violates endpoint policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl AnalysisError {
    /// Builds a [`AnalysisError::Timeout`] describing the given deadline.
    pub fn timeout(deadline: Duration) -> Self {
        let mut budget_secs = deadline.as_secs();
        if deadline.subsec_nanos() > 0 || budget_secs == 0 {
            budget_secs += 1;
        }
        Self::Timeout { budget_secs }
    }
}
