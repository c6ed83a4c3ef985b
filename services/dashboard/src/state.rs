//! Presentation state and request ordering
//!
//! The pipeline is a pure function of parameters; everything that changes
//! between interactions lives in [`DashboardState`]. Each started request
//! takes a new generation number and its envelope is applied only if no
//! newer request started in the meantime. The in-flight fetch of a
//! superseded request still runs to completion; its result is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sentiment_types::envelope::ResultEnvelope;
use sentiment_types::query::QueryParams;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::pipeline::Pipeline;
use crate::source::SentimentSource;
use crate::view::ViewMode;

/// Proof that a request was started, tagged with its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    params: QueryParams,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn params(&self) -> QueryParams {
        self.params
    }
}

/// What happened to a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The envelope replaced the visible one.
    Applied,
    /// Same parameters as the last request and no refresh asked for.
    Skipped,
    /// A newer request started before this one resolved.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    envelope: Option<ResultEnvelope>,
    view_mode: ViewMode,
    /// Parameters of the most recently started request.
    params: QueryParams,
    last_applied: Option<QueryParams>,
    generation: u64,
    loading: bool,
}

impl DashboardState {
    pub fn new(params: QueryParams, view_mode: ViewMode) -> Self {
        Self {
            envelope: None,
            view_mode,
            params,
            last_applied: None,
            generation: 0,
            loading: false,
        }
    }

    /// Start a request for `params` unless it would repeat the last one.
    ///
    /// The comparison and the update of the last-applied value happen in
    /// this single call, so a caller holding `&mut self` cannot interleave
    /// another request between them.
    pub fn begin_request(&mut self, params: QueryParams, force_refresh: bool) -> Option<RequestTicket> {
        if !force_refresh && self.last_applied == Some(params) {
            debug!(
                desc = params.sort_descending,
                limit = params.limit,
                "Parameters unchanged; skipping fetch"
            );
            return None;
        }

        self.generation += 1;
        self.params = params;
        self.last_applied = Some(params);
        self.loading = true;

        Some(RequestTicket {
            generation: self.generation,
            params,
        })
    }

    /// Apply `envelope` if `ticket` belongs to the newest request.
    pub fn complete(&mut self, ticket: RequestTicket, envelope: ResultEnvelope) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale_generation = ticket.generation,
                current_generation = self.generation,
                "Discarding superseded result"
            );
            return false;
        }

        self.envelope = Some(envelope);
        self.loading = false;
        true
    }

    pub fn envelope(&self) -> Option<&ResultEnvelope> {
        self.envelope.as_ref()
    }

    pub fn params(&self) -> QueryParams {
        self.params
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(QueryParams::default(), ViewMode::default())
    }
}

/// A pipeline plus the state it feeds.
///
/// The state lock is held only to start and to complete a request, never
/// across the fetch itself.
pub struct Dashboard<S> {
    pipeline: Pipeline<S>,
    state: Mutex<DashboardState>,
}

impl<S: SentimentSource> Dashboard<S> {
    pub fn new(pipeline: Pipeline<S>, state: DashboardState) -> Self {
        Self {
            pipeline,
            state: Mutex::new(state),
        }
    }

    pub fn pipeline(&self) -> &Pipeline<S> {
        &self.pipeline
    }

    /// Load `params`, discarding the result if a newer load started first.
    pub async fn load(&self, params: QueryParams, force_refresh: bool) -> LoadOutcome {
        match self.begin(params, force_refresh) {
            Some(ticket) => self.run(ticket).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Start a request without awaiting it.
    pub fn begin(&self, params: QueryParams, force_refresh: bool) -> Option<RequestTicket> {
        self.lock().begin_request(params, force_refresh)
    }

    /// Re-fetch the current parameters even though they are unchanged.
    pub fn begin_refresh(&self) -> Option<RequestTicket> {
        let mut state = self.lock();
        let params = state.params();
        state.begin_request(params, true)
    }

    pub fn begin_toggle_sort(&self) -> Option<RequestTicket> {
        let mut state = self.lock();
        let params = state.params().with_sort_toggled();
        state.begin_request(params, false)
    }

    pub fn begin_set_limit(&self, limit: i64) -> Option<RequestTicket> {
        let mut state = self.lock();
        let params = state.params().with_limit(limit);
        state.begin_request(params, false)
    }

    /// Run a started request and apply its envelope if still current.
    pub async fn run(&self, ticket: RequestTicket) -> LoadOutcome {
        let envelope = self.pipeline.acquire(&ticket.params()).await;

        if self.lock().complete(ticket, envelope) {
            LoadOutcome::Applied
        } else {
            LoadOutcome::Superseded
        }
    }

    /// Switching views never refetches.
    pub fn toggle_view(&self) -> ViewMode {
        let mut state = self.lock();
        let mode = state.view_mode().toggled();
        state.set_view_mode(mode);
        mode
    }

    /// Read the state under the lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        // No critical section can leave the state half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: SentimentSource + 'static> Dashboard<S> {
    /// Run a started request on the runtime so the caller keeps handling
    /// input while it is in flight.
    pub fn spawn(self: &Arc<Self>, ticket: RequestTicket) -> JoinHandle<LoadOutcome> {
        let dashboard = Arc::clone(self);
        tokio::spawn(async move { dashboard.run(ticket).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> ResultEnvelope {
        ResultEnvelope::live(Vec::new())
    }

    #[test]
    fn test_first_request_always_starts() {
        let mut state = DashboardState::default();
        let ticket = state.begin_request(QueryParams::default(), false).unwrap();
        assert_eq!(ticket.generation(), 1);
        assert!(state.is_loading());
    }

    #[test]
    fn test_unchanged_params_are_skipped() {
        let mut state = DashboardState::default();
        let params = QueryParams::new(true, 20);
        let ticket = state.begin_request(params, false).unwrap();
        assert!(state.complete(ticket, envelope()));

        assert!(state.begin_request(params, false).is_none());
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn test_forced_refresh_runs_with_same_params() {
        let mut state = DashboardState::default();
        let params = QueryParams::new(true, 20);
        state.begin_request(params, false).unwrap();

        let ticket = state.begin_request(params, true).unwrap();
        assert_eq!(ticket.generation(), 2);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut state = DashboardState::default();
        let a = state.begin_request(QueryParams::new(false, 10), false).unwrap();
        let b = state.begin_request(QueryParams::new(false, 20), false).unwrap();

        assert!(state.complete(b, envelope()));
        assert!(!state.is_loading());
        assert!(!state.complete(a, ResultEnvelope::missing_data()));
        assert!(state.envelope().unwrap().notice.is_none());
        assert_eq!(state.params(), QueryParams::new(false, 20));
    }

    #[test]
    fn test_stale_ticket_does_not_clear_loading() {
        let mut state = DashboardState::default();
        let a = state.begin_request(QueryParams::new(false, 10), false).unwrap();
        let _b = state.begin_request(QueryParams::new(false, 20), false).unwrap();

        assert!(!state.complete(a, envelope()));
        assert!(state.is_loading());
        assert!(state.envelope().is_none());
    }

    #[test]
    fn test_view_mode_is_independent_of_requests() {
        let mut state = DashboardState::new(QueryParams::default(), ViewMode::Table);
        state.set_view_mode(ViewMode::Cards);
        assert_eq!(state.view_mode(), ViewMode::Cards);
        assert_eq!(state.generation(), 0);
    }
}
