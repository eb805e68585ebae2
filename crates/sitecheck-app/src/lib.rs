#![warn(missing_docs)]
//! # sitecheck-app
//!
//! ## Purpose
//! Coordinates the analysis request lifecycle: normalize, dispatch, interpret,
//! and expose the resulting state to the presentation layer.
//!
//! ## Responsibilities
//! - Drive the `Idle -> Loading -> Success | NotApplicable | Error` state
//!   machine with `submit`, `reset`, and `retry` commands.
//! - Guarantee last-submission-wins ordering: a superseded call can never
//!   overwrite a newer state.
//! - Surface every failure as a user-facing message; no raw error escapes to
//!   the presentation layer.
//!
//! ## Data flow
//! `submit(raw_url)` -> [`normalize_url`] -> [`AnalysisTransport::analyze`] ->
//! [`interpret`] -> [`Snapshot`] observed read-only by rendering code.
//!
//! ## Ownership and lifetimes
//! The controller is a clonable handle over one owned state cell; the cell is
//! the only mutable state in the system and the controller is its sole
//! mutator.
//!
//! ## Error model
//! Transport failures arrive as [`AnalysisError`] and resolve to the `Error`
//! phase with their display message. Validation failures short-circuit before
//! any network call.
//!
//! ## Security and privacy notes
//! Only submitted URLs are logged; response bodies are not.

pub mod render;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sitecheck_client::{AnalysisError, AnalysisTransport, normalize_url};
use sitecheck_contract::{AnalyzeRequest, AnalyzeStatus, extract_error_message};
use sitecheck_report::{ViewModel, interpret};
use tokio_util::sync::CancellationToken;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("SITECHECK_VERSION");

/// Message surfaced when the submitted URL is empty after normalization.
pub const VALIDATION_MESSAGE: &str = "Enter a URL to analyze.";

/// Message for `status: error` payloads that carry no message of their own.
pub const DEFAULT_ERROR_MESSAGE: &str =
    "Something went wrong. Try again or analyze another URL.";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Lifecycle phase observed by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// No analysis submitted yet, or state was reset.
    #[default]
    Idle,
    /// One call is in flight.
    Loading,
    /// Analysis completed with `status: ok`.
    Success,
    /// Analysis completed with `status: na`.
    NotApplicable,
    /// Validation, transport, or application failure.
    Error,
}

/// Atomic read-only view of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Interpreted view model, when the last call completed with a payload.
    pub view: Option<ViewModel>,
    /// Classified error message, when in the `Error` phase.
    pub error: Option<String>,
    /// Last normalized URL submitted to the service.
    pub last_url: Option<String>,
}

struct Cell {
    phase: Phase,
    view: Option<ViewModel>,
    error: Option<String>,
    last_url: Option<String>,
    /// Monotonic submission counter; an outcome applies only when the
    /// generation it was issued under is still current.
    generation: u64,
    /// Token for the in-flight call, if any.
    cancel: Option<CancellationToken>,
}

/// Finite-state machine driving the analysis request lifecycle.
///
/// Clonable handle; all clones share one state cell. At most one call is in
/// flight: a newer `submit` cancels the pending call's token and bumps the
/// generation so the older outcome is dropped on arrival.
#[derive(Clone)]
pub struct LifecycleController {
    transport: Arc<dyn AnalysisTransport>,
    cell: Arc<Mutex<Cell>>,
}

impl LifecycleController {
    /// Creates a controller in the `Idle` phase.
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        Self {
            transport,
            cell: Arc::new(Mutex::new(Cell {
                phase: Phase::Idle,
                view: None,
                error: None,
                last_url: None,
                generation: 0,
                cancel: None,
            })),
        }
    }

    /// Normalizes and submits one URL for analysis.
    ///
    /// Empty input resolves to the `Error` phase with [`VALIDATION_MESSAGE`]
    /// and no network call. Otherwise the controller enters `Loading`,
    /// cancels any pending call, awaits the transport, and applies the
    /// outcome only if no newer submission or reset happened meanwhile.
    pub async fn submit(&self, raw_url: &str) {
        let normalized = normalize_url(raw_url);
        if normalized.is_empty() {
            let mut cell = self.lock_cell();
            if let Some(pending) = cell.cancel.take() {
                pending.cancel();
            }
            cell.generation += 1;
            cell.phase = Phase::Error;
            cell.view = None;
            cell.error = Some(VALIDATION_MESSAGE.to_string());
            return;
        }

        let (generation, cancel) = {
            let mut cell = self.lock_cell();
            if let Some(pending) = cell.cancel.take() {
                pending.cancel();
            }
            cell.generation += 1;
            let token = CancellationToken::new();
            cell.cancel = Some(token.clone());
            cell.phase = Phase::Loading;
            cell.view = None;
            cell.error = None;
            cell.last_url = Some(normalized.clone());
            (cell.generation, token)
        };

        tracing::info!(url = %normalized, "submitting analysis request");
        let request = AnalyzeRequest { url: normalized };
        let outcome = self.transport.analyze(&request, &cancel).await;

        let mut cell = self.lock_cell();
        if cell.generation != generation {
            // A newer submission or a reset owns the state now.
            return;
        }
        cell.cancel = None;

        match outcome {
            Ok(response) => {
                let view = interpret(&response);
                match response.status {
                    AnalyzeStatus::Ok => {
                        cell.phase = Phase::Success;
                        cell.view = Some(view);
                    }
                    AnalyzeStatus::Na => {
                        cell.phase = Phase::NotApplicable;
                        cell.view = Some(view);
                    }
                    AnalyzeStatus::Error => {
                        cell.phase = Phase::Error;
                        cell.view = None;
                        cell.error = Some(
                            extract_error_message(&response)
                                .map(str::to_string)
                                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
                        );
                    }
                }
            }
            Err(AnalysisError::Superseded) => {}
            Err(error) => {
                tracing::warn!(%error, "analysis request failed");
                cell.phase = Phase::Error;
                cell.view = None;
                cell.error = Some(error.to_string());
            }
        }
    }

    /// Cancels any pending call and returns to `Idle`, clearing the stored
    /// view model, error message, and last submitted URL.
    pub fn reset(&self) {
        let mut cell = self.lock_cell();
        if let Some(pending) = cell.cancel.take() {
            pending.cancel();
        }
        cell.generation += 1;
        cell.phase = Phase::Idle;
        cell.view = None;
        cell.error = None;
        cell.last_url = None;
    }

    /// Re-submits the last URL; legal only from the `Error` phase with a
    /// recorded URL, otherwise a no-op.
    pub async fn retry(&self) {
        let last_url = {
            let cell = self.lock_cell();
            if cell.phase != Phase::Error {
                return;
            }
            cell.last_url.clone()
        };

        if let Some(url) = last_url {
            self.submit(&url).await;
        }
    }

    /// Takes an atomic read-only snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let cell = self.lock_cell();
        Snapshot {
            phase: cell.phase,
            view: cell.view.clone(),
            error: cell.error.clone(),
            last_url: cell.last_url.clone(),
        }
    }

    fn lock_cell(&self) -> MutexGuard<'_, Cell> {
        // A poisoned cell only means a panic mid-transition elsewhere; the
        // state itself stays usable.
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
