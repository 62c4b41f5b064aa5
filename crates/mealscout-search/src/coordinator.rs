//! Fetch coordination for incremental search.
//!
//! The coordinator is a synchronous state machine. It decides which fetch to
//! issue next and folds settled fetches back into the page window and the
//! rendered result set. It never performs I/O itself; the
//! [`SearchLoader`](crate::SearchLoader) runs the fetches it hands out.
//!
//! ```text
//! IDLE ──term change / sentinel──▶ LOADING ──settle──▶ IDLE
//!                                                       │ returned < requested
//!                                                       ▼
//!                                                   EXHAUSTED (until term change)
//! ```
//!
//! Every fetch is identified by a [`FetchTicket`]. Only the ticket that is
//! currently outstanding may change state; a response carrying any other
//! ticket is stale and dropped.
//!
//! A sentinel that becomes visible while a fetch is outstanding is not lost:
//! if it is still in view when that fetch grows the window, the next
//! incremental fetch is handed out with the settlement.

use mealscout_client::RecipeSummary;
use serde::Serialize;
use tracing::{debug, trace};

use crate::sentinel::Sentinel;
use crate::window::{PageWindow, WindowUpdate};

/// Why a fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// First fetch for a debounced term.
    Initial,
    /// Larger fetch triggered by the sentinel.
    More,
}

/// Identity of one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchTicket {
    pub seq: u64,
    pub term: String,
    pub size: usize,
    pub kind: FetchKind,
}

/// Coarse state of the whole feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    Idle,
    Loading,
    Exhausted,
}

/// Result of feeding a settled fetch into the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Results replaced; the window grew or became exhausted. `next` is
    /// the follow-up fetch when the sentinel is still in view.
    Loaded {
        count: usize,
        update: WindowUpdate,
        next: Option<FetchTicket>,
    },
    /// The fetch failed; results and window are untouched.
    Failed { kind: FetchKind },
    /// The ticket no longer matches the outstanding fetch.
    Stale,
}

/// Serializable snapshot of the query state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub debounced_term: String,
    pub page_size: usize,
    pub has_more: bool,
    pub phase: FetchPhase,
}

/// What the view layer should render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchView {
    /// First fetch for the term is outstanding; nothing to show yet.
    Loading { term: String },
    /// The first fetch for the term failed.
    Failed { term: String, message: String },
    /// The last successful fetch returned nothing.
    Empty { term: String },
    Results {
        term: String,
        recipes: Vec<RecipeSummary>,
        /// An incremental fetch is outstanding
        loading_more: bool,
        /// The sentinel is rendered
        has_more: bool,
        /// Message of a failed incremental fetch, retryable
        inline_error: Option<String>,
    },
}

impl SearchView {
    pub fn term(&self) -> &str {
        match self {
            SearchView::Loading { term }
            | SearchView::Failed { term, .. }
            | SearchView::Empty { term }
            | SearchView::Results { term, .. } => term,
        }
    }

    /// Recipes currently rendered.
    pub fn recipes(&self) -> &[RecipeSummary] {
        match self {
            SearchView::Results { recipes, .. } => recipes,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
struct Failure {
    ticket: FetchTicket,
    message: String,
}

/// Decides when to fetch and how settled fetches change state.
#[derive(Debug, Clone)]
pub struct FetchCoordinator {
    window: PageWindow,
    sentinel: Sentinel,
    term: String,
    next_seq: u64,
    in_flight: Option<FetchTicket>,
    /// `None` until the first successful fetch for the current term
    results: Option<Vec<RecipeSummary>>,
    failure: Option<Failure>,
}

impl FetchCoordinator {
    pub fn new(window: PageWindow) -> Self {
        Self {
            window,
            sentinel: Sentinel::new(),
            term: String::new(),
            next_seq: 0,
            in_flight: None,
            results: None,
            failure: None,
        }
    }

    /// The debounced term settled on a new value.
    ///
    /// Resets the window, drops rendered results and supersedes any
    /// outstanding fetch. Always returns the initial fetch for the term.
    pub fn term_changed(&mut self, term: impl Into<String>) -> FetchTicket {
        self.term = term.into();
        self.window.reset();
        self.sentinel.reset();
        self.results = None;
        self.failure = None;

        if let Some(ref superseded) = self.in_flight {
            debug!(seq = superseded.seq, term = %superseded.term, "Superseding outstanding fetch");
        }

        let size = self.window.page_size();
        self.issue(FetchKind::Initial, size)
    }

    /// Sentinel visibility changed. Returns the incremental fetch to run, if
    /// this report triggers one.
    pub fn sentinel(&mut self, visible: bool) -> Option<FetchTicket> {
        if !self.sentinel.observe(visible) {
            return None;
        }

        if let Some(ref ticket) = self.in_flight {
            trace!(seq = ticket.seq, "Sentinel ignored while loading");
            return None;
        }

        // The marker only exists below a rendered, non-exhausted list
        if self.results.is_none() || !self.window.has_more() {
            trace!("Sentinel ignored without more results");
            return None;
        }

        let size = self.window.next_size();
        Some(self.issue(FetchKind::More, size))
    }

    /// Re-issue the last failed fetch with the same term and size.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.in_flight.is_some() {
            return None;
        }

        let failure = self.failure.take()?;
        debug!(
            term = %failure.ticket.term,
            size = failure.ticket.size,
            "Retrying failed fetch"
        );
        Some(self.issue(failure.ticket.kind, failure.ticket.size))
    }

    /// Fold a settled fetch into state. `Err` carries the remote message.
    pub fn settle(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<RecipeSummary>, String>,
    ) -> Settlement {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(
                seq = ticket.seq,
                term = %ticket.term,
                size = ticket.size,
                "Discarding stale response"
            );
            return Settlement::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(recipes) => {
                let count = recipes.len();
                let update = self.window.record(ticket.size, count);
                debug!(term = %ticket.term, requested = ticket.size, count, ?update, "Fetch settled");

                self.results = Some(recipes);
                self.failure = None;

                let next = match update {
                    WindowUpdate::Grew { .. } if self.sentinel.is_visible() => {
                        let size = self.window.next_size();
                        debug!(term = %ticket.term, size, "Sentinel still visible, loading more");
                        Some(self.issue(FetchKind::More, size))
                    }
                    _ => None,
                };
                Settlement::Loaded { count, update, next }
            }
            Err(message) => {
                self.failure = Some(Failure {
                    ticket: ticket.clone(),
                    message,
                });
                Settlement::Failed { kind: ticket.kind }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn phase(&self) -> FetchPhase {
        if self.in_flight.is_some() {
            FetchPhase::Loading
        } else if !self.window.has_more() {
            FetchPhase::Exhausted
        } else {
            FetchPhase::Idle
        }
    }

    pub fn state(&self) -> QueryState {
        QueryState {
            debounced_term: self.term.clone(),
            page_size: self.window.page_size(),
            has_more: self.window.has_more(),
            phase: self.phase(),
        }
    }

    /// Project the current state for rendering.
    pub fn view(&self) -> SearchView {
        let term = self.term.clone();

        match self.results {
            None => match self.failure {
                Some(ref failure) if self.in_flight.is_none() => SearchView::Failed {
                    term,
                    message: failure.message.clone(),
                },
                _ => SearchView::Loading { term },
            },
            Some(ref recipes) if recipes.is_empty() => SearchView::Empty { term },
            Some(ref recipes) => SearchView::Results {
                term,
                recipes: recipes.clone(),
                loading_more: self.in_flight.is_some(),
                has_more: self.window.has_more(),
                inline_error: self.failure.as_ref().map(|f| f.message.clone()),
            },
        }
    }

    fn issue(&mut self, kind: FetchKind, size: usize) -> FetchTicket {
        self.next_seq += 1;
        self.failure = None;

        let ticket = FetchTicket {
            seq: self.next_seq,
            term: self.term.clone(),
            size,
            kind,
        };
        debug!(seq = ticket.seq, term = %ticket.term, size, ?kind, "Issuing fetch");

        self.in_flight = Some(ticket.clone());
        ticket
    }
}

impl Default for FetchCoordinator {
    fn default() -> Self {
        Self::new(PageWindow::default())
    }
}
