//! Integration tests for end-to-end view-model projection.

mod common;

use std::sync::Arc;

use common::{MockTransport, scored_response};
use pretty_assertions::assert_eq;
use sitecheck_app::{LifecycleController, Phase};
use sitecheck_contract::{RiskSeverity, WebsiteType, decode_response};
use sitecheck_report::{ResolvedWebsiteType, ScoreBucket, WeightEntry};

async fn submit_and_snapshot(
    response: sitecheck_contract::AnalyzeResponse,
    raw_url: &str,
    scripted_url: &str,
) -> sitecheck_app::Snapshot {
    let transport = Arc::new(MockTransport::new());
    transport.respond(scripted_url, response);
    let controller = LifecycleController::new(transport);
    controller.submit(raw_url).await;
    controller.snapshot()
}

#[tokio::test]
async fn view_model_projection_tests_full_payload_resolves_every_panel() {
    let snapshot =
        submit_and_snapshot(scored_response(), "example.com", "https://example.com").await;

    assert_eq!(snapshot.phase, Phase::Success);
    let view = snapshot.view.expect("scored response yields a view");

    assert_eq!(view.score, Some(72));
    assert_eq!(view.score_bucket, Some(ScoreBucket::Mixed));
    assert_eq!(
        view.website_type,
        ResolvedWebsiteType::Known(WebsiteType::Company)
    );
    assert_eq!(
        view.weight_entries,
        vec![
            WeightEntry { label: "Formatting", percent: 30 },
            WeightEntry { label: "Relevance", percent: 30 },
            WeightEntry { label: "Sources", percent: 20 },
            WeightEntry { label: "Risk", percent: 20 },
        ]
    );
    assert_eq!(
        view.missing_page_labels,
        vec!["Privacy".to_string(), "Terms".to_string()]
    );
    assert!(view.analysis_limited);
    assert!(view.has_pages);
    assert!(view.has_domain_info);
    assert!(view.has_security_info);
    assert!(view.has_threat_intel);
    assert!(view.has_scoring);

    let severities: Vec<RiskSeverity> =
        view.risk_groups.iter().map(|group| group.severity).collect();
    assert_eq!(
        severities,
        vec![RiskSeverity::High, RiskSeverity::Med, RiskSeverity::Low]
    );
}

#[tokio::test]
async fn view_model_projection_tests_groups_reorder_low_before_high_input() {
    let response = decode_response(
        r#"{
            "status": "ok",
            "overall_score": 30,
            "risks": [
                { "severity": "LOW", "title": "minor" },
                { "severity": "HIGH", "title": "major" }
            ]
        }"#,
    );

    let snapshot = submit_and_snapshot(response, "example.com", "https://example.com").await;
    let view = snapshot.view.expect("view present");

    assert_eq!(view.risk_groups.len(), 2);
    assert_eq!(view.risk_groups[0].severity, RiskSeverity::High);
    assert_eq!(view.risk_groups[0].items[0].title, "major");
    assert_eq!(view.risk_groups[1].severity, RiskSeverity::Low);
    assert_eq!(view.risk_groups[1].items[0].title, "minor");
}

#[tokio::test]
async fn view_model_projection_tests_null_score_still_succeeds() {
    let response = decode_response(r#"{"status":"ok","overall_score":null}"#);
    let snapshot = submit_and_snapshot(response, "example.com", "https://example.com").await;

    assert_eq!(snapshot.phase, Phase::Success);
    let view = snapshot.view.expect("view present");
    assert_eq!(view.score, None);
    assert_eq!(view.score_bucket, None);
    assert!(!view.has_scoring);
}
