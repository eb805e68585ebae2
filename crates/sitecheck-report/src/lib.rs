#![warn(missing_docs)]
//! # sitecheck-report
//!
//! ## Purpose
//! Derives the fully-resolved, UI-ready view model from the loosely-typed
//! analysis response.
//!
//! ## Responsibilities
//! - Bucket the overall score into risk tiers.
//! - Resolve the website type through its multi-source fallback chain.
//! - Partition risks by severity in fixed display order.
//! - Map missing-page labels through the known-label synonym table.
//! - Compute per-panel visibility flags.
//!
//! ## Data flow
//! [`AnalyzeResponse`] -> [`interpret`] -> [`ViewModel`] consumed read-only by
//! the presentation layer.
//!
//! ## Ownership and lifetimes
//! The view model owns all its data; it is rebuilt fresh for every response
//! and never mutated in place.
//!
//! ## Error model
//! [`interpret`] is pure and total. Unrecognized or missing fields degrade to
//! safe defaults; no input can make it fail.
//!
//! ## Security and privacy notes
//! Opaque detail maps are carried through verbatim for rendering; nothing is
//! interpreted or executed from them.

use serde_json::{Map, Value};
use sitecheck_contract::{
    AnalyzeResponse, AnalyzeStatus, PageSummary, RiskItem, RiskSeverity, Subscores, WebsiteType,
    nested_str, nested_value,
};

/// Fixed severity display order for risk groups.
pub const SEVERITY_ORDER: [RiskSeverity; 4] = [
    RiskSeverity::High,
    RiskSeverity::Med,
    RiskSeverity::Low,
    RiskSeverity::Uncertain,
];

/// The four subscore axes with their display labels, in fixed order.
pub const SUBSCORE_AXES: [(&str, &str); 4] = [
    ("formatting", "Formatting"),
    ("relevance", "Relevance"),
    ("sources", "Sources"),
    ("risk", "Risk"),
];

/// Risk tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBucket {
    /// Score in `[80,100]`.
    LowRisk,
    /// Score in `[50,80)`.
    Mixed,
    /// Score below 50.
    HighRisk,
}

impl ScoreBucket {
    /// Buckets a score, or `None` when no bucket is defined.
    ///
    /// A bucket exists iff the analysis completed (`status == ok`) and the
    /// score is a finite number in `[0,100]`.
    pub fn classify(status: AnalyzeStatus, score: Option<f64>) -> Option<Self> {
        if status != AnalyzeStatus::Ok {
            return None;
        }

        let value = score?;
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return None;
        }

        Some(if value < 50.0 {
            Self::HighRisk
        } else if value < 80.0 {
            Self::Mixed
        } else {
            Self::LowRisk
        })
    }

    /// Display label for the bucket.
    pub fn label(self) -> &'static str {
        match self {
            Self::LowRisk => "Low risk",
            Self::Mixed => "Mixed signals",
            Self::HighRisk => "High risk",
        }
    }
}

/// Website type after fallback resolution: a known variant or an explicit
/// unclassified sentinel, never absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedWebsiteType {
    /// A recognized classification.
    Known(WebsiteType),
    /// No fallback source supplied a recognized value.
    Unclassified,
}

impl ResolvedWebsiteType {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Known(WebsiteType::Functional) => "Functional",
            Self::Known(WebsiteType::Statistical) => "Statistical",
            Self::Known(WebsiteType::NewsHistorical) => "News / historical",
            Self::Known(WebsiteType::Company) => "Company",
            Self::Unclassified => "Unclassified",
        }
    }

    /// Returns `true` when resolution produced a recognized variant.
    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// One labeled subscore value.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscoreEntry {
    /// Display label (for example `Formatting`).
    pub label: &'static str,
    /// Score value in `[0,100]` as supplied.
    pub value: f64,
}

/// Risks of one severity tier, in original server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskGroup {
    /// Shared severity of all items in this group.
    pub severity: RiskSeverity,
    /// Member risks; never empty.
    pub items: Vec<RiskItem>,
}

/// One scoring-weight percentage for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightEntry {
    /// Subscore axis label.
    pub label: &'static str,
    /// Weight as a whole percent, rounded to nearest.
    pub percent: u32,
}

/// Fully-resolved projection of one analysis response.
///
/// Built fresh by [`interpret`] for every response; immutable once computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Resolved analysis status.
    pub status: AnalyzeStatus,
    /// Overall score as an integer, when a finite score was supplied.
    pub score: Option<i64>,
    /// Risk bucket; defined iff `status == ok` and the score is finite and
    /// in range.
    pub score_bucket: Option<ScoreBucket>,
    /// Website type after fallback resolution.
    pub website_type: ResolvedWebsiteType,
    /// Ordered subscore entries; present only when subscores were supplied.
    pub subscore_entries: Option<Vec<SubscoreEntry>>,
    /// Risks partitioned by severity in fixed order; empty tiers omitted.
    pub risk_groups: Vec<RiskGroup>,
    /// Missing-page badges after known-label lookup.
    pub missing_page_labels: Vec<String>,
    /// Limitation messages, verbatim.
    pub limitation_messages: Vec<String>,
    /// Whether the analysis was cut short.
    pub analysis_limited: bool,
    /// Scoring-weight percentages; empty when the service reported none.
    pub weight_entries: Vec<WeightEntry>,
    /// Crawled page summaries for the technical-details panel.
    pub pages: Vec<PageSummary>,
    /// Opaque domain facts, rendered verbatim.
    pub domain_info: Map<String, Value>,
    /// Opaque security facts, rendered verbatim.
    pub security_info: Map<String, Value>,
    /// Opaque threat-intel facts, rendered verbatim.
    pub threat_intel: Map<String, Value>,
    /// Show the pages-analyzed section.
    pub has_pages: bool,
    /// Show the domain-info section.
    pub has_domain_info: bool,
    /// Show the security-info section.
    pub has_security_info: bool,
    /// Show the threat-intel section.
    pub has_threat_intel: bool,
    /// Show the scoring section (website type resolved or weights present).
    pub has_scoring: bool,
}

/// Derives the view model from one analysis response.
///
/// Pure and total: unrecognized or missing fields degrade to safe defaults.
pub fn interpret(raw: &AnalyzeResponse) -> ViewModel {
    let website_type = resolve_website_type(raw);
    let weight_entries = weight_entries(raw.debug.as_ref());
    let has_scoring = website_type.is_known() || !weight_entries.is_empty();

    ViewModel {
        status: raw.status,
        score: raw.overall_score.filter(|value| value.is_finite()).map(|value| value.round() as i64),
        score_bucket: ScoreBucket::classify(raw.status, raw.overall_score),
        website_type,
        subscore_entries: raw.subscores.as_ref().map(subscore_entries),
        risk_groups: group_risks(&raw.risks),
        missing_page_labels: raw.missing_pages.iter().map(|page| missing_page_label(page)).collect(),
        limitation_messages: raw.limitations.clone(),
        analysis_limited: raw.analysis_limited,
        weight_entries,
        pages: raw.pages_analyzed.clone(),
        domain_info: raw.domain_info.clone().unwrap_or_default(),
        security_info: raw.security_info.clone().unwrap_or_default(),
        threat_intel: raw.threat_intel.clone().unwrap_or_default(),
        has_pages: !raw.pages_analyzed.is_empty(),
        has_domain_info: non_empty(raw.domain_info.as_ref()),
        has_security_info: non_empty(raw.security_info.as_ref()),
        has_threat_intel: non_empty(raw.threat_intel.as_ref()),
        has_scoring,
    }
}

/// Resolves the website type through the ordered fallback chain:
/// top-level field, `debug.website_type`, `debug.scoring.website_type`,
/// then the unclassified sentinel.
///
/// Blank and unrecognized candidates are skipped so weaker sources can still
/// win; resolution is deterministic and never fails.
pub fn resolve_website_type(raw: &AnalyzeResponse) -> ResolvedWebsiteType {
    let debug = raw.debug.as_ref();
    let candidates = [
        raw.website_type.as_deref(),
        debug.and_then(|value| nested_str(value, &["website_type"])),
        debug.and_then(|value| nested_str(value, &["scoring", "website_type"])),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Some(known) = WebsiteType::from_wire(candidate.trim()) {
            return ResolvedWebsiteType::Known(known);
        }
    }

    ResolvedWebsiteType::Unclassified
}

/// Maps one missing-page label through the known-label synonym table.
///
/// Lookup is case-insensitive and whitespace-trimmed; unmatched entries pass
/// through verbatim.
pub fn missing_page_label(page: &str) -> String {
    let key = page.trim().to_ascii_lowercase();
    let known = match key.as_str() {
        "contact" => "Contact",
        "about" => "About",
        "privacy" | "privacy policy" => "Privacy",
        "terms" | "terms of service" | "terms of use" => "Terms",
        _ => return page.to_string(),
    };
    known.to_string()
}

fn subscore_entries(subscores: &Subscores) -> Vec<SubscoreEntry> {
    let values = [
        subscores.formatting,
        subscores.relevance,
        subscores.sources,
        subscores.risk,
    ];

    SUBSCORE_AXES
        .into_iter()
        .zip(values)
        .map(|((_, label), value)| SubscoreEntry { label, value })
        .collect()
}

fn group_risks(risks: &[RiskItem]) -> Vec<RiskGroup> {
    SEVERITY_ORDER
        .into_iter()
        .filter_map(|severity| {
            let items: Vec<RiskItem> = risks
                .iter()
                .filter(|risk| risk.severity == severity)
                .cloned()
                .collect();
            (!items.is_empty()).then_some(RiskGroup { severity, items })
        })
        .collect()
}

/// Converts `debug.scoring.weights` fractions into display percentages.
///
/// Emits the four axes in fixed order when the weights mapping is present,
/// defaulting absent axes to 0 %; emits nothing when the mapping itself is
/// absent or empty.
fn weight_entries(debug: Option<&Value>) -> Vec<WeightEntry> {
    let weights = debug
        .and_then(|value| nested_value(value, &["scoring", "weights"]))
        .and_then(Value::as_object)
        .filter(|map| !map.is_empty());

    let Some(weights) = weights else {
        return Vec::new();
    };

    SUBSCORE_AXES
        .into_iter()
        .map(|(key, label)| {
            let fraction = weights.get(key).and_then(Value::as_f64).unwrap_or(0.0);
            WeightEntry {
                label,
                percent: (fraction * 100.0).round() as u32,
            }
        })
        .collect()
}

fn non_empty(map: Option<&Map<String, Value>>) -> bool {
    map.is_some_and(|map| !map.is_empty())
}
