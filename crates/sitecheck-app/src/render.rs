//! Plain-text rendering of a lifecycle snapshot.
//!
//! A pure consumer of the view model: nothing here inspects the raw payload
//! or mutates controller state. Section visibility follows the view-model
//! flags.

use serde_json::{Map, Value};
use sitecheck_report::ViewModel;

use crate::{Phase, Snapshot};

/// Shown in place of a numeric score when none is defined.
pub const SCORE_NOT_AVAILABLE: &str = "not available";

/// Renders one snapshot as a plain-text report.
pub fn render_report(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    match snapshot.phase {
        Phase::Idle => out.push_str("Enter a URL to analyze.\n"),
        Phase::Loading => out.push_str("Analyzing...\n"),
        Phase::Error => {
            out.push_str("Analysis failed\n");
            if let Some(message) = &snapshot.error {
                push_line(&mut out, message);
            }
        }
        Phase::Success | Phase::NotApplicable => {
            if let Some(url) = &snapshot.last_url {
                push_line(&mut out, &format!("Analyzed: {url}"));
            }
            if let Some(view) = &snapshot.view {
                render_view(&mut out, view, snapshot.phase);
            }
        }
    }

    out
}

fn render_view(out: &mut String, view: &ViewModel, phase: Phase) {
    if phase == Phase::NotApplicable {
        push_line(out, "Analysis not applicable for this site.");
        for limitation in &view.limitation_messages {
            push_line(out, &format!("  - {limitation}"));
        }
        return;
    }

    out.push('\n');
    push_line(out, "Overall legitimacy score");
    match view.score {
        Some(score) => {
            push_line(out, &format!("  {score} / 100"));
            if let Some(bucket) = view.score_bucket {
                push_line(out, &format!("  {}", bucket.label()));
            }
        }
        None => push_line(out, &format!("  {SCORE_NOT_AVAILABLE}")),
    }

    if view.has_scoring {
        out.push('\n');
        push_line(out, &format!("Website type: {}", view.website_type.label()));
        for weight in &view.weight_entries {
            push_line(out, &format!("  {} weight: {}%", weight.label, weight.percent));
        }
    }

    if let Some(entries) = &view.subscore_entries {
        out.push('\n');
        push_line(out, "Subscores");
        for entry in entries {
            // Bars render clamped even if the service sends out-of-range values.
            let clamped = entry.value.clamp(0.0, 100.0);
            push_line(out, &format!("  {:<12} {clamped:>5.1}", entry.label));
        }
    }

    if !view.risk_groups.is_empty() {
        out.push('\n');
        push_line(out, "Risks & warnings");
        for group in &view.risk_groups {
            push_line(out, &format!("  {:?} ({})", group.severity, group.items.len()));
            for item in &group.items {
                let code = item.code.as_deref().unwrap_or("-");
                push_line(out, &format!("    [{code}] {}", item.title));
                for evidence in &item.evidence {
                    if let Some(text) = evidence.snippet.as_deref().or(evidence.message.as_deref()) {
                        push_line(out, &format!("      > {text}"));
                    }
                }
            }
        }
    }

    if !view.missing_page_labels.is_empty() {
        out.push('\n');
        push_line(out, "Missing pages");
        push_line(out, &format!("  {}", view.missing_page_labels.join(", ")));
    }

    if view.analysis_limited || !view.limitation_messages.is_empty() {
        out.push('\n');
        push_line(out, "Limitations");
        for limitation in &view.limitation_messages {
            push_line(out, &format!("  - {limitation}"));
        }
    }

    render_details(out, view);
}

fn render_details(out: &mut String, view: &ViewModel) {
    if !view.has_pages && !view.has_domain_info && !view.has_security_info && !view.has_threat_intel
    {
        return;
    }

    out.push('\n');
    push_line(out, "Technical details");

    if view.has_pages {
        push_line(out, "  Pages analyzed");
        for page in &view.pages {
            let mut line = format!("    {}", page.url);
            if let Some(title) = &page.title {
                line.push_str(&format!(" | {title}"));
            }
            if let Some(status_code) = page.status_code {
                line.push_str(&format!(" | HTTP {status_code}"));
            }
            push_line(out, &line);
        }
    }

    if view.has_domain_info {
        render_json_block(out, "Domain info", &view.domain_info);
    }
    if view.has_security_info {
        render_json_block(out, "Security info", &view.security_info);
    }
    if view.has_threat_intel {
        render_json_block(out, "Threat intel", &view.threat_intel);
    }
}

fn render_json_block(out: &mut String, title: &str, data: &Map<String, Value>) {
    push_line(out, &format!("  {title}"));
    let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
    for line in pretty.lines() {
        push_line(out, &format!("    {line}"));
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
