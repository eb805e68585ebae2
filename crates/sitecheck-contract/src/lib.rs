#![warn(missing_docs)]
//! # sitecheck-contract
//!
//! ## Purpose
//! Defines the wire schema for the remote legitimacy-analysis service and the
//! lenient decoding helpers used by the client.
//!
//! ## Responsibilities
//! - Model the analysis response payload with independently optional fields.
//! - Decode untrusted JSON bodies without ever failing (malformed input
//!   degrades to a minimal fallback object).
//! - Provide explicit nested-path access into the opaque `debug` section.
//!
//! ## Data flow
//! Raw HTTP body -> [`decode_response`] -> [`AnalyzeResponse`] consumed by the
//! report interpreter and the lifecycle controller.
//!
//! ## Ownership and lifetimes
//! Decoded values are owned structs to avoid borrowing from transient network
//! buffers.
//!
//! ## Error model
//! This crate favors tolerant decoding over recoverable errors: unknown enum
//! values map to safe variants and parse failures yield
//! [`AnalyzeResponse::fallback`].
//!
//! ## Security and privacy notes
//! Payloads carry only public analysis output for the submitted URL; no
//! credentials or tokens pass through this crate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outbound request payload: the normalized URL to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Absolute HTTP(S) URL, already normalized by the client.
    pub url: String,
}

/// Top-level analysis outcome reported by the service.
///
/// Unknown wire values and a missing field both decode to [`Error`], so a
/// drifted server enum can never produce an unclassifiable response.
///
/// [`Error`]: AnalyzeStatus::Error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzeStatus {
    /// Analysis completed and produced a score.
    Ok,
    /// Analysis was not applicable (for example, the site was unreachable).
    Na,
    /// Analysis failed.
    #[default]
    #[serde(other)]
    Error,
}

/// Risk importance tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskSeverity {
    /// Strong legitimacy concern.
    High,
    /// Moderate concern.
    Med,
    /// Minor concern.
    Low,
    /// Signal could not be confirmed; unknown wire tiers land here.
    #[default]
    #[serde(other)]
    Uncertain,
}

/// Classification of the analyzed site's purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteType {
    /// Interactive tool or service.
    Functional,
    /// Data/statistics publication.
    Statistical,
    /// News or historical content.
    NewsHistorical,
    /// Company presence site.
    Company,
}

impl WebsiteType {
    /// Parses a loose wire candidate (for example from the `debug` section).
    ///
    /// Returns `None` for unrecognized values so weaker fallback sources can
    /// still be consulted.
    pub fn from_wire(candidate: &str) -> Option<Self> {
        match candidate {
            "functional" => Some(Self::Functional),
            "statistical" => Some(Self::Statistical),
            "news_historical" => Some(Self::NewsHistorical),
            "company" => Some(Self::Company),
            _ => None,
        }
    }
}

/// The four component scores contributing to the overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscores {
    /// Writing/formatting quality, 0..=100.
    #[serde(default)]
    pub formatting: f64,
    /// Content relevance, 0..=100.
    #[serde(default)]
    pub relevance: f64,
    /// Source credibility, 0..=100.
    #[serde(default)]
    pub sources: f64,
    /// Risk posture (higher is safer), 0..=100.
    #[serde(default)]
    pub risk: f64,
}

/// Supporting evidence attached to one risk item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Page where the evidence was observed.
    #[serde(default)]
    pub url: Option<String>,
    /// Quoted page fragment.
    #[serde(default)]
    pub snippet: Option<String>,
    /// Analyzer note when no fragment applies.
    #[serde(default)]
    pub message: Option<String>,
}

/// One categorized risk reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    /// Importance tier.
    #[serde(default)]
    pub severity: RiskSeverity,
    /// Stable machine code (for example `NO_HTTPS`).
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable headline.
    #[serde(default)]
    pub title: String,
    /// Free-form elaboration.
    #[serde(default)]
    pub notes: Option<String>,
    /// Supporting evidence, possibly empty.
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
}

/// One crawled page summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    /// Page URL.
    #[serde(default)]
    pub url: String,
    /// HTTP status observed during the crawl.
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Page title when one was extracted.
    #[serde(default)]
    pub title: Option<String>,
}

/// The untrusted analysis response payload.
///
/// Every field is independently optional on the wire; absent fields decode to
/// empty/`None` defaults so the interpreter never has to guard against a
/// failed decode. Error payloads reuse this envelope and may carry `message`
/// or `error` strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Analysis outcome. Missing or unknown values decode to
    /// [`AnalyzeStatus::Error`].
    #[serde(default)]
    pub status: AnalyzeStatus,
    /// Overall legitimacy score in `[0,100]`, or null when not computed.
    #[serde(default)]
    pub overall_score: Option<f64>,
    /// Top-level website-type candidate, carried loosely; the interpreter
    /// owns recognition and fallback.
    #[serde(default)]
    pub website_type: Option<String>,
    /// Component scores; absent hides the subscores panel.
    #[serde(default)]
    pub subscores: Option<Subscores>,
    /// Categorized risks in server-reported order.
    #[serde(default)]
    pub risks: Vec<RiskItem>,
    /// Free-text labels for expected-but-absent page types.
    #[serde(default)]
    pub missing_pages: Vec<String>,
    /// Whether the analysis was cut short.
    #[serde(default)]
    pub analysis_limited: bool,
    /// Free-text limitation descriptions.
    #[serde(default)]
    pub limitations: Vec<String>,
    /// Pages fetched during the crawl.
    #[serde(default)]
    pub pages_analyzed: Vec<PageSummary>,
    /// Opaque registrar/domain facts, rendered verbatim when non-empty.
    #[serde(default)]
    pub domain_info: Option<Map<String, Value>>,
    /// Opaque TLS/security facts, rendered verbatim when non-empty.
    #[serde(default)]
    pub security_info: Option<Map<String, Value>>,
    /// Opaque reputation/blacklist facts, rendered verbatim when non-empty.
    #[serde(default)]
    pub threat_intel: Option<Map<String, Value>>,
    /// Opaque diagnostic section; may nest `website_type` and
    /// `scoring.weights`.
    #[serde(default)]
    pub debug: Option<Value>,
    /// Human-readable error text on failure payloads.
    #[serde(default)]
    pub message: Option<String>,
    /// Alternate error text field used by older service builds.
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    /// Minimal object substituted for malformed or empty success bodies.
    pub fn fallback() -> Self {
        Self {
            status: AnalyzeStatus::Error,
            overall_score: None,
            ..Self::default()
        }
    }
}

/// Decodes a raw response body, recovering malformed input locally.
///
/// Invalid JSON and blank bodies yield [`AnalyzeResponse::fallback`] rather
/// than an error; callers never see a decode failure.
pub fn decode_response(raw: &str) -> AnalyzeResponse {
    if raw.trim().is_empty() {
        return AnalyzeResponse::fallback();
    }

    serde_json::from_str(raw).unwrap_or_else(|_| AnalyzeResponse::fallback())
}

/// Extracts a human-readable error message from a failure payload.
///
/// Tries `message` first, then `error`; blank strings count as absent.
pub fn extract_error_message(response: &AnalyzeResponse) -> Option<&str> {
    fn non_blank(field: &Option<String>) -> Option<&str> {
        field
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    non_blank(&response.message).or_else(|| non_blank(&response.error))
}

/// Walks an optional nested path through a JSON object tree.
///
/// Returns `None` as soon as any step is absent or not an object, so callers
/// can read deep duck-typed fields without shape guarantees.
pub fn nested_value<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Nested-path access that additionally requires a string leaf.
pub fn nested_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    nested_value(root, path)?.as_str()
}

#[cfg(test)]
mod tests {
    //! Unit tests for tolerant decoding and nested access.

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_status_decodes_to_error() {
        let decoded = decode_response(r#"{"status":"paused","overall_score":50}"#);
        assert_eq!(decoded.status, AnalyzeStatus::Error);
        assert_eq!(decoded.overall_score, Some(50.0));
    }

    #[test]
    fn missing_fields_decode_to_defaults() {
        let decoded = decode_response(r#"{"status":"ok","overall_score":72}"#);
        assert_eq!(decoded.status, AnalyzeStatus::Ok);
        assert!(decoded.risks.is_empty());
        assert!(decoded.subscores.is_none());
        assert!(!decoded.analysis_limited);
    }

    #[test]
    fn malformed_body_recovers_to_fallback() {
        assert_eq!(decode_response("not json at all"), AnalyzeResponse::fallback());
        assert_eq!(decode_response("   "), AnalyzeResponse::fallback());
        assert_eq!(decode_response("").status, AnalyzeStatus::Error);
    }

    #[test]
    fn unknown_severity_decodes_to_uncertain() {
        let decoded = decode_response(
            r#"{"status":"ok","overall_score":10,"risks":[{"severity":"CATASTROPHIC","title":"x"}]}"#,
        );
        assert_eq!(decoded.risks[0].severity, RiskSeverity::Uncertain);
    }

    #[test]
    fn error_message_prefers_message_over_error_field() {
        let mut response = AnalyzeResponse::fallback();
        response.error = Some("older field".to_string());
        assert_eq!(extract_error_message(&response), Some("older field"));

        response.message = Some("newer field".to_string());
        assert_eq!(extract_error_message(&response), Some("newer field"));

        response.message = Some("   ".to_string());
        assert_eq!(extract_error_message(&response), Some("older field"));
    }

    #[test]
    fn nested_access_degrades_at_every_level() {
        let root: Value = serde_json::json!({
            "scoring": { "website_type": "company", "weights": { "risk": 0.2 } }
        });

        assert_eq!(nested_str(&root, &["scoring", "website_type"]), Some("company"));
        assert!(nested_value(&root, &["scoring", "weights", "risk"]).is_some());
        assert!(nested_str(&root, &["scoring", "missing"]).is_none());
        assert!(nested_str(&root, &["scoring", "weights", "risk", "deep"]).is_none());
    }
}
