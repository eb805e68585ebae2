#![warn(missing_docs)]
//! # sitecheck-app binary
//!
//! One-shot CLI entry point: submits a single URL and prints the rendered
//! report.

use std::sync::Arc;

use sitecheck_app::{LifecycleController, app_version, render::render_report};
use sitecheck_client::{ClientConfig, HttpAnalysisClient};
use tracing_subscriber::EnvFilter;

/// Dev-default address of the analysis service.
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// CLI entry point.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(url) = std::env::args().nth(1) else {
        eprintln!("sitecheck-app {}", app_version());
        eprintln!("usage: sitecheck-app <url>   (SITECHECK_API_BASE_URL overrides the service address)");
        std::process::exit(2);
    };

    let base_url = std::env::var("SITECHECK_API_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    let config = match ClientConfig::new(&base_url) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("invalid SITECHECK_API_BASE_URL: {error}");
            std::process::exit(1);
        }
    };

    let controller = LifecycleController::new(Arc::new(HttpAnalysisClient::new(config)));
    controller.submit(&url).await;

    print!("{}", render_report(&controller.snapshot()));
}
