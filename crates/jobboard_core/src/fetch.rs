//! Fetch controller state: which request is current, and what it has produced.
//!
//! Every activation gets a new generation. Only a result tagged with the
//! generation that is currently in flight is ever applied; everything else
//! (superseded, detached, cancelled) is dropped without touching state.
use board_logging::{board_debug, board_info, board_warn};

use url::Url;

use crate::Item;

/// Monotonic tag distinguishing successive fetch attempts.
pub type FetchGeneration = u64;

/// User-visible message for any failed fetch.
pub const GENERIC_FETCH_ERROR: &str = "API call failed";

/// User-visible message when the target URL cannot be requested at all.
pub const INVALID_URL_ERROR: &str = "Invalid URL";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchState {
    pub data: Vec<Item>,
    pub loading: bool,
    pub error: Option<String>,
    pub bytes_received: Option<u64>,
    pub last_updated: Option<String>,
}

/// A request the caller must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: FetchGeneration,
    pub url: String,
}

/// What the caller must do to honour an activation. Cancellation comes first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchTicket {
    pub cancel: Option<FetchGeneration>,
    pub start: Option<FetchRequest>,
}

impl FetchTicket {
    pub fn is_empty(&self) -> bool {
        self.cancel.is_none() && self.start.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchController {
    url: Option<String>,
    generation: FetchGeneration,
    in_flight: Option<FetchGeneration>,
    /// Bumped on every applied success; keys the reconciler cache.
    revision: u64,
    state: FetchState,
}

impl FetchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn generation(&self) -> FetchGeneration {
        self.generation
    }

    pub fn in_flight(&self) -> Option<FetchGeneration> {
        self.in_flight
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Points the controller at `url`. The ticket is empty when the URL is unchanged
    /// and already loading or loaded. A URL that cannot be requested cancels whatever
    /// is in flight and surfaces an error without starting a request.
    pub fn activate(&mut self, url: &str) -> FetchTicket {
        let Some(url) = normalize_url(url) else {
            board_warn!("Rejected fetch URL {:?}", url);
            let cancel = self.abandon();
            self.url = None;
            self.state.loading = false;
            self.state.bytes_received = None;
            self.state.error = Some(INVALID_URL_ERROR.to_string());
            return FetchTicket {
                cancel,
                start: None,
            };
        };
        if self.url.as_deref() == Some(url.as_str())
            && (self.in_flight.is_some() || self.revision > 0)
        {
            return FetchTicket::default();
        }
        self.url = Some(url);
        self.begin()
    }

    /// Re-issues the request for the current URL. Stale data stays visible meanwhile.
    pub fn refresh(&mut self) -> FetchTicket {
        if self.url.is_none() {
            return FetchTicket::default();
        }
        self.begin()
    }

    /// Consumer teardown. Returns the generation to cancel, if any was in flight.
    pub fn detach(&mut self) -> Option<FetchGeneration> {
        let cancel = self.abandon();
        self.state.loading = false;
        self.state.bytes_received = None;
        cancel
    }

    pub fn apply_progress(&mut self, generation: FetchGeneration, bytes: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.state.bytes_received = Some(bytes);
        true
    }

    pub fn apply_success(
        &mut self,
        generation: FetchGeneration,
        items: Vec<Item>,
        fetched_at: String,
    ) -> bool {
        if !self.is_current(generation) {
            board_debug!("Discarding stale fetch result generation={}", generation);
            return false;
        }
        board_info!(
            "Fetch generation={} loaded {} items",
            generation,
            items.len()
        );
        self.in_flight = None;
        self.revision += 1;
        self.state = FetchState {
            data: items,
            loading: false,
            error: None,
            bytes_received: None,
            last_updated: Some(fetched_at),
        };
        true
    }

    /// Records a failure for the current request. Previously loaded data is kept.
    pub fn apply_failure(&mut self, generation: FetchGeneration, detail: &str) -> bool {
        if !self.is_current(generation) {
            board_debug!("Discarding stale fetch failure generation={}", generation);
            return false;
        }
        board_warn!("Fetch generation={} failed: {}", generation, detail);
        self.in_flight = None;
        self.state.loading = false;
        self.state.bytes_received = None;
        self.state.error = Some(GENERIC_FETCH_ERROR.to_string());
        true
    }

    /// Cancellation is never an error and never mutates the visible state.
    pub fn apply_cancelled(&mut self, generation: FetchGeneration) -> bool {
        board_debug!("Fetch generation={} cancelled", generation);
        false
    }

    fn is_current(&self, generation: FetchGeneration) -> bool {
        self.in_flight == Some(generation)
    }

    fn begin(&mut self) -> FetchTicket {
        let cancel = self.abandon();
        let generation = self.generation;
        self.in_flight = Some(generation);
        self.state.loading = true;
        self.state.error = None;
        self.state.bytes_received = None;
        FetchTicket {
            cancel,
            start: Some(FetchRequest {
                generation,
                url: self.url.clone().unwrap_or_default(),
            }),
        }
    }

    /// Moves to a fresh generation so nothing issued before can apply.
    fn abandon(&mut self) -> Option<FetchGeneration> {
        self.generation += 1;
        self.in_flight.take()
    }
}

/// Canonical form of an http(s) URL, or `None` when it cannot be fetched.
/// Equivalent spellings (host case, surrounding whitespace) compare equal.
pub fn normalize_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    match parsed.scheme() {
        "http" | "https" if parsed.host().is_some() => Some(parsed.to_string()),
        _ => None,
    }
}
