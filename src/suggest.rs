//! Debounced place search with a floating suggestion panel.
//!
//! [`SuggestInput`] is a headless controller for an address field. The host
//! feeds it keystrokes and clock ticks, performs the searches it asks for,
//! and draws whatever [`SuggestInput::view`] returns on an overlay layer.
//!
//! ```text
//! Idle --(>= 3 chars)--> Debouncing --(quiet period)--> Fetching
//! Fetching --> Open(suggestions) | EmptyResults | Error
//! Open --(select)--> Idle
//! any --(keystroke)--> Idle | Debouncing
//! ```
//!
//! Every issued search carries a sequence number and only the latest one may
//! change visible state, so a slow earlier response never overwrites a newer
//! one. Selecting a suggestion rewrites the query text; the one-shot
//! selection token makes the resulting change event a no-op instead of a new
//! search.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::geo::GeoPoint;
use crate::overlay::{DropdownGeometry, EventKind, ListenOptions, Subscription, WindowEvents};
use crate::places::Suggestion;
use crate::traits::{Anchor, PlacesSearch};

/// Quiet-period timer. Each `schedule` pushes the deadline out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once per schedule, when `now` reached the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestState {
    Idle,
    Debouncing,
    Fetching,
    Open,
    Error,
    EmptyResults,
}

/// A search the host should run, then report back via
/// [`SuggestInput::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// What to draw for the input this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestView<'a> {
    pub query: &'a str,
    /// Panel rows; empty unless the panel is open.
    pub items: &'a [Suggestion],
    /// Error or "no results" text shown under the input.
    pub message: Option<&'a str>,
    /// Where to place the panel; `None` means do not draw it.
    pub geometry: Option<DropdownGeometry>,
}

type SelectCallback = Box<dyn FnMut(GeoPoint)>;

pub struct SuggestInput {
    config: SearchConfig,
    anchor: Rc<dyn Anchor>,
    events: WindowEvents,
    on_select: Option<SelectCallback>,

    query: String,
    state: SuggestState,
    suggestions: Vec<Suggestion>,
    message: Option<String>,

    debounce: Debouncer,
    last_seq: u64,
    in_flight: Option<u64>,
    selection_token: Option<String>,

    geometry: Rc<Cell<Option<DropdownGeometry>>>,
    subscription: Option<Subscription>,
    mounted: bool,
}

impl SuggestInput {
    pub fn new(config: SearchConfig, anchor: Rc<dyn Anchor>, events: WindowEvents) -> Self {
        let debounce = Debouncer::new(config.debounce());
        Self {
            config,
            anchor,
            events,
            on_select: None,
            query: String::new(),
            state: SuggestState::Idle,
            suggestions: Vec::new(),
            message: None,
            debounce,
            last_seq: 0,
            in_flight: None,
            selection_token: None,
            geometry: Rc::new(Cell::new(None)),
            subscription: None,
            mounted: true,
        }
    }

    /// Called with the chosen point whenever a suggestion is selected.
    pub fn on_select<F>(mut self, callback: F) -> Self
    where
        F: FnMut(GeoPoint) + 'static,
    {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SuggestState {
        self.state
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.state == SuggestState::Open && !self.suggestions.is_empty()
    }

    /// Whether scroll/resize listeners are currently attached.
    pub fn is_tracking(&self) -> bool {
        self.subscription.is_some()
    }

    /// Panel position, only while the panel is open and tracked.
    pub fn geometry(&self) -> Option<DropdownGeometry> {
        if self.is_open() && self.is_tracking() {
            self.geometry.get()
        } else {
            None
        }
    }

    pub fn view(&self) -> SuggestView<'_> {
        let geometry = self.geometry();
        SuggestView {
            query: &self.query,
            items: if geometry.is_some() { self.suggestions.as_slice() } else { &[] },
            message: self.message(),
            geometry,
        }
    }

    /// Handles a change of the input text.
    pub fn set_query(&mut self, text: &str, now: Instant) {
        if !self.mounted {
            return;
        }
        if let Some(token) = self.selection_token.take() {
            if token == text {
                self.query = token;
                return;
            }
        }

        self.query = text.to_string();
        self.in_flight = None;
        self.message = None;
        self.suggestions.clear();

        if text.trim().chars().count() < self.config.min_query_chars {
            self.debounce.cancel();
            self.state = SuggestState::Idle;
        } else {
            self.debounce.schedule(now);
            self.state = SuggestState::Debouncing;
        }
        self.sync_overlay();
    }

    /// Issues a search once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        if !self.mounted || !self.debounce.fire(now) {
            return None;
        }

        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        self.state = SuggestState::Fetching;

        let request = SearchRequest {
            seq: self.last_seq,
            query: self.query.trim().to_string(),
        };
        tracing::debug!(seq = request.seq, query = %request.query, "issuing places search");
        Some(request)
    }

    /// Applies the outcome of search `seq`.
    ///
    /// Returns `false` when the response was discarded because a newer
    /// search was issued, the query changed, a suggestion was selected, or
    /// the input was unmounted.
    pub fn complete(&mut self, seq: u64, result: Result<Vec<Suggestion>, SearchError>) -> bool {
        if !self.mounted || self.in_flight != Some(seq) {
            tracing::debug!(seq, latest = self.last_seq, "discarding stale places response");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(suggestions) if suggestions.is_empty() => {
                self.suggestions.clear();
                self.message = Some(self.config.empty_message.clone());
                self.state = SuggestState::EmptyResults;
            }
            Ok(suggestions) => {
                self.suggestions = suggestions;
                self.message = None;
                self.state = SuggestState::Open;
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "places search failed");
                self.suggestions.clear();
                self.message = Some(err.user_message());
                self.state = SuggestState::Error;
            }
        }

        self.sync_overlay();
        true
    }

    /// Runs a due search synchronously against `service`.
    ///
    /// Returns `true` if a search was issued and its result applied.
    pub fn tick<S>(&mut self, now: Instant, service: &S) -> bool
    where
        S: PlacesSearch + ?Sized,
    {
        match self.poll(now) {
            Some(request) => {
                let result = service.search(&request.query);
                self.complete(request.seq, result)
            }
            None => false,
        }
    }

    /// Picks suggestion `index` from the open panel.
    pub fn select(&mut self, index: usize) -> Option<Suggestion> {
        if !self.is_open() {
            return None;
        }
        let suggestion = self.suggestions.get(index)?.clone();

        if let Some(callback) = self.on_select.as_mut() {
            callback(suggestion.position);
        }

        self.query = suggestion.label.clone();
        self.selection_token = Some(suggestion.label.clone());
        self.reset_search();
        self.sync_overlay();

        Some(suggestion)
    }

    /// Blur-equivalent: closes the panel and forgets pending work.
    pub fn close(&mut self) {
        self.reset_search();
        self.message = None;
        self.sync_overlay();
    }

    /// Tears the input down. Pending timers and in-flight searches are
    /// ignored from now on and listeners are detached.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.reset_search();
        self.subscription = None;
        self.geometry.set(None);
    }

    fn reset_search(&mut self) {
        self.debounce.cancel();
        self.in_flight = None;
        self.suggestions.clear();
        self.state = SuggestState::Idle;
    }

    /// Attaches listeners while the panel is open with items, detaches them
    /// otherwise.
    fn sync_overlay(&mut self) {
        let wanted = self.mounted && self.is_open();

        if !wanted {
            if self.subscription.take().is_some() {
                tracing::debug!("detaching suggestion panel listeners");
            }
            self.geometry.set(None);
            return;
        }
        if self.subscription.is_some() {
            return;
        }

        let gap = self.config.dropdown_gap_px;
        match DropdownGeometry::from_anchor(&*self.anchor, gap) {
            Ok(geometry) => self.geometry.set(Some(geometry)),
            Err(err) => {
                tracing::debug!(error = %err, "not opening suggestion panel");
                self.suggestions.clear();
                self.state = SuggestState::Idle;
                self.geometry.set(None);
                return;
            }
        }

        let anchor = Rc::clone(&self.anchor);
        let cell = Rc::clone(&self.geometry);
        self.subscription = Some(self.events.subscribe(
            &[
                (EventKind::Scroll, ListenOptions { capture: true }),
                (EventKind::Resize, ListenOptions::default()),
            ],
            move |_event| match DropdownGeometry::from_anchor(&*anchor, gap) {
                Ok(geometry) => cell.set(Some(geometry)),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping suggestion panel reposition");
                    cell.set(None);
                }
            },
        ));
    }
}
