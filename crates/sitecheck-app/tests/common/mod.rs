//! Shared fixtures for app integration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sitecheck_client::{AnalysisError, AnalysisTransport};
use sitecheck_contract::{AnalyzeRequest, AnalyzeResponse, decode_response};
use tokio_util::sync::CancellationToken;

/// Scripted outcome for one URL.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum ScriptedOutcome {
    /// Resolve with this payload.
    Respond(AnalyzeResponse),
    /// Fail with a timeout classification.
    Timeout,
    /// Fail with a network classification.
    Network,
}

/// In-memory transport keyed by normalized URL.
///
/// Honors cancellation like the real client unless built with
/// [`MockTransport::ignoring_cancel`], which models a slow transport whose
/// late outcome must still be dropped by the controller.
pub struct MockTransport {
    calls: AtomicUsize,
    honor_cancel: bool,
    script: Mutex<HashMap<String, (Duration, ScriptedOutcome)>>,
}

impl MockTransport {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            honor_cancel: true,
            script: Mutex::new(HashMap::new()),
        }
    }

    #[allow(dead_code)]
    pub fn ignoring_cancel() -> Self {
        Self {
            honor_cancel: false,
            ..Self::new()
        }
    }

    #[allow(dead_code)]
    pub fn respond(&self, url: &str, response: AnalyzeResponse) {
        self.respond_after(url, Duration::ZERO, response);
    }

    #[allow(dead_code)]
    pub fn respond_after(&self, url: &str, delay: Duration, response: AnalyzeResponse) {
        self.script
            .lock()
            .expect("script lock")
            .insert(url.to_string(), (delay, ScriptedOutcome::Respond(response)));
    }

    #[allow(dead_code)]
    pub fn fail_with(&self, url: &str, outcome: ScriptedOutcome) {
        self.script
            .lock()
            .expect("script lock")
            .insert(url.to_string(), (Duration::ZERO, outcome));
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisTransport for MockTransport {
    async fn analyze(
        &self,
        request: &AnalyzeRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalyzeResponse, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (delay, outcome) = self
            .script
            .lock()
            .expect("script lock")
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| panic!("no scripted outcome for {}", request.url));

        if self.honor_cancel {
            tokio::select! {
                _ = cancel.cancelled() => return Err(AnalysisError::Superseded),
                _ = tokio::time::sleep(delay) => {}
            }
        } else {
            tokio::time::sleep(delay).await;
        }

        match outcome {
            ScriptedOutcome::Respond(response) => Ok(response),
            ScriptedOutcome::Timeout => Err(AnalysisError::timeout(Duration::from_secs(90))),
            ScriptedOutcome::Network => Err(AnalysisError::Network {
                detail: "connection refused".to_string(),
            }),
        }
    }
}

/// Scored response fixture mirroring the service's demo payload.
#[allow(dead_code)]
pub fn scored_response() -> AnalyzeResponse {
    decode_response(
        r#"{
            "status": "ok",
            "overall_score": 72,
            "subscores": { "formatting": 85, "relevance": 70, "sources": 65, "risk": 68 },
            "risks": [
                {
                    "severity": "HIGH",
                    "code": "NO_HTTPS",
                    "title": "Site does not enforce HTTPS on all pages",
                    "evidence": [
                        { "message": "HTTP used on login page", "url": "http://example.com/login" }
                    ]
                },
                {
                    "severity": "MED",
                    "code": "WEAK_CONTACT",
                    "title": "Contact page lacks physical address",
                    "evidence": [ { "snippet": "Only email found; no street address or phone." } ]
                },
                {
                    "severity": "LOW",
                    "code": "OLD_COPYRIGHT",
                    "title": "Copyright year may be outdated",
                    "evidence": [ { "message": "Footer shows 2022" } ]
                }
            ],
            "missing_pages": ["privacy policy", "Terms of Service"],
            "pages_analyzed": [
                { "url": "https://example.com/", "status_code": 200, "title": "Example Domain" },
                { "url": "https://example.com/about", "status_code": 200, "title": "About Us" }
            ],
            "domain_info": { "registrar": "Example Registrar", "created": "2020-01-15" },
            "security_info": { "ssl_grade": "B", "hsts": false },
            "threat_intel": { "blacklists": [], "reputation": "neutral" },
            "limitations": ["Only 3 pages could be fetched within time limit."],
            "analysis_limited": true,
            "debug": {
                "scoring": {
                    "website_type": "company",
                    "weights": { "formatting": 0.3, "relevance": 0.3, "sources": 0.2, "risk": 0.2 }
                }
            }
        }"#,
    )
}

/// Minimal successful response with the given score.
#[allow(dead_code)]
pub fn ok_response(score: f64) -> AnalyzeResponse {
    decode_response(&format!(r#"{{"status":"ok","overall_score":{score}}}"#))
}
