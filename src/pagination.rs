//! Incremental page loading for one browsing session.
//!
//! [`PaginationController`] owns the accumulated submission list and the
//! loading/`has_more` flags, and enforces the ordering rules around them:
//!
//! ```text
//! Idle ──reload──▶ LoadingFirst ──ok──▶ Ready ◀──ok── LoadingMore
//!                       │                 │               ▲
//!                      err            near bottom         │
//!                       ▼              + has_more ────────┘
//!                     Error ◀────────────err
//! ```
//!
//! The controller is sans-IO: every load is started by a method that returns a
//! [`LoadTicket`] describing the request to perform, and finished by handing
//! the ticket back to [`PaginationController::complete`] with the outcome.
//! Completions may arrive in any order relative to issuance; a ticket whose
//! generation no longer matches the controller's is a stale response from a
//! previous session and is dropped, so a slow old request can never overwrite
//! a newer session's results. [`BrowseSession`] is the async driver that wires
//! a controller to a [`SubmissionSource`].

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::{self, FetchError, SubmissionSource};
use crate::models::{PageRequest, Submission, SubmissionsPage};
use crate::session::SessionState;

/// Items requested per page, for both endpoints.
pub const PAGE_SIZE: usize = 25;

/// How close to the bottom of the rendered list (in pixels) the viewport must
/// be before a scroll probe triggers the next page.
pub const SCROLL_LOAD_THRESHOLD_PX: f64 = 600.0;

/// Which load a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    FirstPage,
    NextPage,
}

/// A load the controller has started and expects a completion for.
///
/// Carries the generation it was issued under; completions for an older
/// generation are dropped.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    kind: LoadKind,
    pub request: PageRequest,
}

/// Observable phase of the controller, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingFirst,
    Ready,
    LoadingMore,
    Error,
}

/// State machine for incremental loading of one session's submissions.
pub struct PaginationController {
    session: SessionState,
    generation: u64,
    items: Vec<Submission>,
    seen_ids: HashSet<String>,
    started: bool,
    is_loading_first: bool,
    is_loading_next: bool,
    has_more: bool,
    last_error: Option<FetchError>,
    /// The exact request that last failed, kept for retry.
    failed: Option<(LoadKind, PageRequest)>,
}

impl PaginationController {
    /// A fresh controller in `Idle`; nothing is fetched until [`reload`]
    /// (or [`warp`]) is called.
    ///
    /// [`reload`]: PaginationController::reload
    /// [`warp`]: PaginationController::warp
    pub fn new(session: SessionState) -> Self {
        Self {
            session,
            generation: 0,
            items: Vec::new(),
            seen_ids: HashSet::new(),
            started: false,
            is_loading_first: false,
            is_loading_next: false,
            has_more: true,
            last_error: None,
            failed: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Accumulated submissions, in server-returned order, deduplicated by id.
    pub fn items(&self) -> &[Submission] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading_first_page(&self) -> bool {
        self.is_loading_first
    }

    pub fn is_loading_next_page(&self) -> bool {
        self.is_loading_next
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading_first {
            Phase::LoadingFirst
        } else if self.is_loading_next {
            Phase::LoadingMore
        } else if self.last_error.is_some() {
            Phase::Error
        } else if self.started {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// Start a first-page load for the current session.
    ///
    /// Clears the accumulated items, resets `has_more`, bumps the generation
    /// (invalidating any in-flight load), and returns the offset-0 ticket.
    pub fn reload(&mut self) -> LoadTicket {
        self.generation += 1;
        self.items.clear();
        self.seen_ids.clear();
        self.has_more = true;
        self.last_error = None;
        self.failed = None;
        self.is_loading_first = true;
        self.is_loading_next = false;
        let request = client::build_page_request(&self.session, PAGE_SIZE, 0);
        debug!(
            subreddit = %request.subreddit,
            anchor = request.anchor_timestamp,
            generation = self.generation,
            "first page load"
        );
        LoadTicket {
            generation: self.generation,
            kind: LoadKind::FirstPage,
            request,
        }
    }

    /// Replace the session and start over. The only way session parameters
    /// change; scrolling never does this.
    pub fn warp(&mut self, session: SessionState) -> LoadTicket {
        self.session = session;
        self.reload()
    }

    /// Scroll probe from the presentation layer: start a next-page load if the
    /// viewport is near the bottom and one is warranted.
    pub fn maybe_load_next(&mut self, distance_to_bottom_px: f64) -> Option<LoadTicket> {
        if distance_to_bottom_px > SCROLL_LOAD_THRESHOLD_PX {
            return None;
        }
        self.request_next_page()
    }

    /// Explicit next-page trigger.
    ///
    /// Returns `None` unless the controller is `Ready` with more data: an
    /// exhausted, loading, errored, or not-yet-started controller issues
    /// nothing, which also makes repeated triggers idempotent while a load is
    /// in flight.
    pub fn request_next_page(&mut self) -> Option<LoadTicket> {
        if !self.started
            || !self.has_more
            || self.is_loading_first
            || self.is_loading_next
            || self.last_error.is_some()
        {
            return None;
        }
        self.is_loading_next = true;
        let request = client::build_page_request(&self.session, PAGE_SIZE, self.items.len());
        debug!(offset = request.offset, "next page load");
        Some(LoadTicket {
            generation: self.generation,
            kind: LoadKind::NextPage,
            request,
        })
    }

    /// Re-issue the exact request that last failed, if any.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        let (kind, request) = self.failed.clone()?;
        self.last_error = None;
        match kind {
            LoadKind::FirstPage => self.is_loading_first = true,
            LoadKind::NextPage => self.is_loading_next = true,
        }
        debug!(?kind, offset = request.offset, "retrying failed load");
        Some(LoadTicket {
            generation: self.generation,
            kind,
            request,
        })
    }

    /// Apply the outcome of a load started by one of the methods above.
    ///
    /// Stale completions (ticket generation behind the controller's, i.e. the
    /// session changed while the request was in flight) are dropped without
    /// touching any state. A next-page failure keeps the already-accumulated
    /// items; only the incremental page is lost.
    pub fn complete(&mut self, ticket: &LoadTicket, result: Result<SubmissionsPage, FetchError>) {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "dropping stale page response"
            );
            return;
        }

        match ticket.kind {
            LoadKind::FirstPage => {
                if !self.is_loading_first {
                    return;
                }
                self.is_loading_first = false;
                self.started = true;
                match result {
                    Ok(page) => {
                        let returned = page.submissions.len();
                        self.items.clear();
                        self.seen_ids.clear();
                        self.append_deduplicated(page.submissions);
                        self.has_more = returned == ticket.request.limit;
                        self.last_error = None;
                        self.failed = None;
                    }
                    Err(error) => {
                        warn!(%error, "first page load failed");
                        self.last_error = Some(error);
                        self.failed = Some((LoadKind::FirstPage, ticket.request.clone()));
                    }
                }
            }
            LoadKind::NextPage => {
                if !self.is_loading_next {
                    return;
                }
                self.is_loading_next = false;
                match result {
                    Ok(page) => {
                        let returned = page.submissions.len();
                        self.append_deduplicated(page.submissions);
                        self.has_more = returned == ticket.request.limit;
                        self.last_error = None;
                        self.failed = None;
                    }
                    Err(error) => {
                        warn!(%error, "next page load failed, keeping accumulated items");
                        self.last_error = Some(error);
                        self.failed = Some((LoadKind::NextPage, ticket.request.clone()));
                    }
                }
            }
        }
    }

    /// The service does not guarantee id uniqueness across pages; repeats are
    /// skipped here rather than surfaced twice.
    fn append_deduplicated(&mut self, submissions: Vec<Submission>) {
        for submission in submissions {
            if self.seen_ids.insert(submission.id.clone()) {
                self.items.push(submission);
            }
        }
    }
}

/// Async driver binding a [`PaginationController`] to a [`SubmissionSource`].
///
/// This is what the presentation layer holds: it issues tickets, awaits the
/// source, and feeds completions back into the controller.
pub struct BrowseSession<S: SubmissionSource> {
    source: Arc<S>,
    controller: PaginationController,
}

impl<S: SubmissionSource> BrowseSession<S> {
    pub fn new(source: Arc<S>, session: SessionState) -> Self {
        Self {
            source,
            controller: PaginationController::new(session),
        }
    }

    pub fn controller(&self) -> &PaginationController {
        &self.controller
    }

    /// Load (or re-load) the first page for the current session.
    pub async fn load_first_page(&mut self) {
        let ticket = self.controller.reload();
        self.run(ticket).await;
    }

    /// Warp to a new session and load its first page.
    pub async fn warp(&mut self, session: SessionState) {
        let ticket = self.controller.warp(session);
        self.run(ticket).await;
    }

    /// Scroll probe; returns whether a next-page request was issued.
    pub async fn load_next_page(&mut self, distance_to_bottom_px: f64) -> bool {
        match self.controller.maybe_load_next(distance_to_bottom_px) {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Re-issue the last failed request, if any.
    pub async fn retry(&mut self) -> bool {
        match self.controller.retry() {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    async fn run(&mut self, ticket: LoadTicket) {
        let result = self.source.fetch_page(&ticket.request).await;
        self.controller.complete(&ticket, result);
    }
}
