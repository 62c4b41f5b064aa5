//! Async driver for incremental search.
//!
//! [`SearchLoader::spawn`] starts a task that owns the debouncer and the
//! [`FetchCoordinator`]. Keystrokes, sentinel reports and retries arrive over
//! an mpsc channel; fetches run as spawned tasks and report back over a
//! second channel; the rendered state is published through a watch channel.
//!
//! Dropping the [`LoaderHandle`] cancels the task and any fetch still in
//! flight.

use std::sync::Arc;
use std::time::Duration;

use mealscout_client::{ApiError, RecipeApi, RecipeSummary};
use mealscout_config::SearchConfig;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::coordinator::{FetchCoordinator, FetchPhase, FetchTicket, QueryState, SearchView, Settlement};
use crate::debounce::Debouncer;
use crate::error::LoaderError;
use crate::location::SearchLocation;
use crate::window::{PageWindow, WindowUpdate};

/// Capacity of the event and completion channels.
const CHANNEL_CAPACITY: usize = 64;

/// Loader tuning.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub debounce: Duration,
    pub page_size: usize,
    pub page_increment: usize,
    /// Term searched as soon as the loader starts
    pub initial_term: String,
    /// Page URL kept in sync with the debounced term
    pub location: Option<SearchLocation>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(mealscout_config::DEFAULT_DEBOUNCE_MS),
            page_size: mealscout_config::DEFAULT_PAGE_SIZE,
            page_increment: mealscout_config::DEFAULT_PAGE_SIZE,
            initial_term: String::new(),
            location: None,
        }
    }
}

impl LoaderOptions {
    /// Options from the `[search]` section, with `base_url` as the location.
    pub fn from_config(config: &SearchConfig) -> Result<Self, LoaderError> {
        let location = SearchLocation::parse(&config.base_url)?;

        Ok(Self {
            debounce: config.debounce(),
            page_size: config.page_size,
            page_increment: config.page_increment,
            initial_term: location.term(),
            location: Some(location),
        })
    }

    /// Start from a URL; its `q` parameter becomes the initial term.
    pub fn with_url(mut self, url: &str) -> Result<Self, LoaderError> {
        let location = SearchLocation::parse(url)?;
        self.initial_term = location.term();
        self.location = Some(location);
        Ok(self)
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.initial_term = term.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Input to the loader task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderEvent {
    /// The raw search box content changed.
    Input(String),
    /// The end-of-list sentinel entered or left the viewport.
    Sentinel(bool),
    /// Re-run the last failed fetch.
    Retry,
}

/// State published after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderSnapshot {
    /// Raw input, possibly not yet debounced
    pub term: String,
    pub query: QueryState,
    pub view: SearchView,
    /// Shareable URL for the debounced term
    pub location: Option<String>,
    /// A keystroke is waiting out the debounce delay
    pub typing: bool,
    /// Fetches issued since start
    pub fetches: u64,
    #[serde(skip)]
    processed: u64,
}

impl LoaderSnapshot {
    /// Nothing is pending: no debounce timer, no outstanding fetch.
    pub fn is_settled(&self) -> bool {
        !self.typing && self.query.phase != FetchPhase::Loading
    }

    pub fn recipes(&self) -> &[RecipeSummary] {
        self.view.recipes()
    }
}

#[derive(Debug)]
struct Completed {
    ticket: FetchTicket,
    outcome: Result<Vec<RecipeSummary>, ApiError>,
}

/// The loader task state.
pub struct SearchLoader {
    api: Arc<dyn RecipeApi>,
    coordinator: FetchCoordinator,
    debouncer: Debouncer<String>,
    location: Option<SearchLocation>,
    term: String,
    events: mpsc::Receiver<LoaderEvent>,
    completed_tx: mpsc::Sender<Completed>,
    completed_rx: mpsc::Receiver<Completed>,
    snapshots: watch::Sender<LoaderSnapshot>,
    cancel: CancellationToken,
    input_closed: bool,
    processed: u64,
    fetches: u64,
}

impl SearchLoader {
    /// Start a loader on the current tokio runtime.
    ///
    /// The initial term is fetched immediately without waiting for the
    /// debounce delay.
    pub fn spawn(api: Arc<dyn RecipeApi>, options: LoaderOptions) -> LoaderHandle {
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (completed_tx, completed_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        // The first fetch is issued before the task starts so the published
        // state is already LOADING when the handle is returned
        let window = PageWindow::new(options.page_size, options.page_increment);
        let mut coordinator = FetchCoordinator::new(window);
        let first = coordinator.term_changed(options.initial_term.clone());
        let location = options
            .location
            .map(|l| l.with_term(&options.initial_term));

        let initial = SnapshotParts {
            term: &options.initial_term,
            coordinator: &coordinator,
            location: location.as_ref(),
            typing: false,
            fetches: 0,
            processed: 0,
        }
        .build();
        let (snapshots_tx, snapshots_rx) = watch::channel(initial);

        let loader = SearchLoader {
            api,
            coordinator,
            debouncer: Debouncer::with_settled(options.debounce, options.initial_term.clone()),
            location,
            term: options.initial_term,
            events: events_rx,
            completed_tx,
            completed_rx,
            snapshots: snapshots_tx,
            cancel: cancel.clone(),
            input_closed: false,
            processed: 0,
            fetches: 0,
        };

        let task = tokio::spawn(loader.run(first));

        LoaderHandle {
            events: Some(events_tx),
            snapshots: snapshots_rx,
            cancel,
            task: Some(task),
            sent: 0,
        }
    }

    async fn run(mut self, first: FetchTicket) {
        info!(term = %self.term, source = %self.api.source(), "Search loader started");

        self.dispatch(first);
        self.publish();

        loop {
            let deadline = self.debouncer.deadline();
            let quiet = sleep_until(deadline.unwrap_or_else(Instant::now));

            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    debug!("Search loader cancelled");
                    break;
                }
                Some(done) = self.completed_rx.recv() => self.on_completed(done),
                _ = quiet, if deadline.is_some() => {
                    if let Some(term) = self.debouncer.poll(Instant::now()) {
                        self.apply_term(term);
                    }
                }
                event = self.events.recv(), if !self.input_closed => match event {
                    Some(event) => {
                        self.on_event(event);
                        self.processed += 1;
                    }
                    None => self.on_input_closed(),
                },
            }

            self.publish();

            if self.input_closed && !self.debouncer.is_pending() && !self.coordinator.is_loading() {
                break;
            }
        }

        info!(fetches = self.fetches, "Search loader stopped");
    }

    fn on_event(&mut self, event: LoaderEvent) {
        trace!(?event, "Loader event");

        match event {
            LoaderEvent::Input(term) => {
                self.term = term.clone();
                self.debouncer.push(term, Instant::now());
            }
            LoaderEvent::Sentinel(visible) => {
                if let Some(ticket) = self.coordinator.sentinel(visible) {
                    self.dispatch(ticket);
                }
            }
            LoaderEvent::Retry => match self.coordinator.retry() {
                Some(ticket) => self.dispatch(ticket),
                None => debug!("Nothing to retry"),
            },
        }
    }

    /// The handle let go of the input. A keystroke still waiting out the
    /// delay is searched now; the loop ends once that fetch settles.
    fn on_input_closed(&mut self) {
        debug!("Loader input closed");
        self.input_closed = true;

        if let Some(term) = self.debouncer.flush() {
            self.apply_term(term);
        }
    }

    fn on_completed(&mut self, done: Completed) {
        let Completed { ticket, outcome } = done;
        let message = outcome.as_ref().err().map(ToString::to_string);

        match self.coordinator.settle(&ticket, outcome.map_err(|e| e.to_string())) {
            Settlement::Loaded {
                count,
                update: WindowUpdate::Exhausted { .. },
                ..
            } => {
                info!(term = %ticket.term, count, "All results loaded");
            }
            Settlement::Loaded {
                next: Some(next), ..
            } => self.dispatch(next),
            Settlement::Loaded { .. } | Settlement::Stale => {}
            Settlement::Failed { kind } => {
                warn!(
                    term = %ticket.term,
                    size = ticket.size,
                    ?kind,
                    error = message.as_deref().unwrap_or_default(),
                    "Recipe search failed"
                );
            }
        }
    }

    fn apply_term(&mut self, term: String) {
        if let Some(ref location) = self.location {
            let updated = location.with_term(&term);
            debug!(url = %updated, "Search location updated");
            self.location = Some(updated);
        }

        let ticket = self.coordinator.term_changed(term);
        self.dispatch(ticket);
    }

    fn dispatch(&mut self, ticket: FetchTicket) {
        self.fetches += 1;

        let api = Arc::clone(&self.api);
        let completed = self.completed_tx.clone();
        let cancel = self.cancel.child_token();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return,
                outcome = api.search_recipes(&ticket.term, ticket.size) => outcome,
            };

            // The loader may already be gone; its interest went with it
            let _ = completed.send(Completed { ticket, outcome }).await;
        });
    }

    fn publish(&self) {
        let snapshot = SnapshotParts {
            term: &self.term,
            coordinator: &self.coordinator,
            location: self.location.as_ref(),
            typing: self.debouncer.is_pending(),
            fetches: self.fetches,
            processed: self.processed,
        }
        .build();

        self.snapshots.send_replace(snapshot);
    }
}

struct SnapshotParts<'a> {
    term: &'a str,
    coordinator: &'a FetchCoordinator,
    location: Option<&'a SearchLocation>,
    typing: bool,
    fetches: u64,
    processed: u64,
}

impl SnapshotParts<'_> {
    fn build(self) -> LoaderSnapshot {
        LoaderSnapshot {
            term: self.term.to_string(),
            query: self.coordinator.state(),
            view: self.coordinator.view(),
            location: self.location.map(|l| l.to_string()),
            typing: self.typing,
            fetches: self.fetches,
            processed: self.processed,
        }
    }
}

/// Handle to a running [`SearchLoader`].
pub struct LoaderHandle {
    events: Option<mpsc::Sender<LoaderEvent>>,
    snapshots: watch::Receiver<LoaderSnapshot>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    /// Events handed to the task, matched against `LoaderSnapshot::processed`
    sent: u64,
}

impl LoaderHandle {
    /// Send one event to the loader.
    pub async fn send(&mut self, event: LoaderEvent) -> Result<(), LoaderError> {
        let events = self.events.as_ref().ok_or(LoaderError::Closed)?;
        events.send(event).await.map_err(|_| LoaderError::Closed)?;
        self.sent += 1;
        Ok(())
    }

    /// The search box now reads `term`.
    pub async fn input(&mut self, term: impl Into<String>) -> Result<(), LoaderError> {
        self.send(LoaderEvent::Input(term.into())).await
    }

    pub async fn sentinel(&mut self, visible: bool) -> Result<(), LoaderError> {
        self.send(LoaderEvent::Sentinel(visible)).await
    }

    /// Scroll the sentinel into view and past it again: one trigger
    /// candidate that does not keep loading once the fetch settles.
    pub async fn reach_end(&mut self) -> Result<(), LoaderError> {
        self.sentinel(true).await?;
        self.sentinel(false).await
    }

    pub async fn retry(&mut self) -> Result<(), LoaderError> {
        self.send(LoaderEvent::Retry).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> LoaderSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<LoaderSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until every event sent so far has been handled and nothing is
    /// pending.
    pub async fn settled(&self) -> Result<LoaderSnapshot, LoaderError> {
        let target = self.sent;
        let mut snapshots = self.snapshots.clone();

        let snapshot = snapshots
            .wait_for(|s| s.processed >= target && s.is_settled())
            .await
            .map_err(|_| LoaderError::Closed)?;

        Ok(snapshot.clone())
    }

    /// Close the input and wait for the loader to finish. A pending
    /// keystroke is searched immediately rather than dropped.
    pub async fn finish(mut self) -> Result<LoaderSnapshot, LoaderError> {
        self.events.take();

        if let Some(task) = self.task.take() {
            task.await.map_err(|_| LoaderError::Closed)?;
        }

        Ok(self.snapshot())
    }

    /// Stop the loader, dropping interest in any in-flight fetch.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Search loader task failed: {}", e);
            }
        }
    }
}

impl Drop for LoaderHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
