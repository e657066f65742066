//! Search session state
//!
//! One owned state object shared by the debounce gate, pagination sequencer,
//! result accumulator and selection holder. All transitions here are
//! synchronous; the async controller drives them from its event loop.

use crate::api::catalog::StockItem;
use crate::error::SearchError;
use tracing::{debug, warn};

/// Pagination sequencer phase for the current query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// No fetch outstanding; further pages may exist
    Idle,
    /// A fetch is in flight; viewport triggers are ignored
    Loading,
    /// A short or failed page ended pagination for this query
    Exhausted,
}

/// A fetch the controller should issue, tagged with the epoch it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub epoch: u64,
    pub query: String,
    pub page: u32,
}

/// Outcome of a query change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction {
    /// Schedule a debounced page-0 fetch for this epoch
    Schedule { epoch: u64 },
    /// Blank query: list cleared, any pending timer must be cancelled
    ClearedBlank,
}

/// Read-only view of the session published to display collaborators
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub query: String,
    pub results: Vec<StockItem>,
    pub selection: Option<StockItem>,
    pub loading: bool,
    pub exhausted: bool,
    pub search_failed: bool,
}

/// Mutable state of one search session
#[derive(Debug)]
pub struct SessionState {
    query: String,
    /// Zero-based index of the next page to fetch for `query`
    page: u32,
    page_size: usize,
    results: Vec<StockItem>,
    has_more: bool,
    phase: FetchPhase,
    selection: Option<StockItem>,
    /// Bumped on every query change; stale completions are dropped
    epoch: u64,
    search_failed: bool,
}

impl SessionState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            page: 0,
            page_size,
            results: Vec::new(),
            has_more: true,
            phase: FetchPhase::Idle,
            selection: None,
            epoch: 0,
            search_failed: false,
        }
    }

    /// Apply a query change from user input.
    ///
    /// Clears the selection immediately, invalidates all in-flight fetches
    /// and reinitializes pagination. Blank queries bypass the debounce: the
    /// result list is emptied on the spot and no fetch is scheduled.
    pub fn query_changed(&mut self, query: String) -> QueryAction {
        self.selection = None;
        self.epoch += 1;
        self.page = 0;
        self.has_more = true;
        self.phase = FetchPhase::Idle;
        self.search_failed = false;
        self.query = query;

        if self.query.trim().is_empty() {
            self.results.clear();
            QueryAction::ClearedBlank
        } else {
            QueryAction::Schedule { epoch: self.epoch }
        }
    }

    /// The debounce timer for `epoch` elapsed; produce the page-0 fetch.
    ///
    /// A timer that outlived its epoch yields nothing.
    pub fn debounce_fired(&mut self, epoch: u64) -> Option<FetchRequest> {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "ignoring expired debounce timer");
            return None;
        }
        if self.query.trim().is_empty() {
            return None;
        }

        self.page = 0;
        self.phase = FetchPhase::Loading;
        Some(FetchRequest {
            epoch: self.epoch,
            query: self.query.clone(),
            page: 0,
        })
    }

    /// The viewport sensor reported the last rendered item became visible.
    ///
    /// Produces the next-page fetch unless a fetch is already in flight,
    /// pagination is exhausted, or no page has completed yet for this query
    /// (the sensor may fire while the page-0 fetch is still pending).
    pub fn end_of_list_visible(&mut self) -> Option<FetchRequest> {
        if self.phase != FetchPhase::Idle || !self.has_more || self.page == 0 {
            return None;
        }

        self.phase = FetchPhase::Loading;
        Some(FetchRequest {
            epoch: self.epoch,
            query: self.query.clone(),
            page: self.page,
        })
    }

    /// Apply a completed fetch. Returns false when the completion was stale
    /// and discarded.
    pub fn fetch_completed(
        &mut self,
        epoch: u64,
        page: u32,
        outcome: Result<Vec<StockItem>, SearchError>,
    ) -> bool {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, page, "discarding stale response");
            return false;
        }

        match outcome {
            Ok(items) => {
                self.has_more = items.len() >= self.page_size;
                if page == 0 {
                    self.results = items;
                } else {
                    self.results.extend(items);
                }
                self.page = page + 1;
                self.phase = if self.has_more {
                    FetchPhase::Idle
                } else {
                    FetchPhase::Exhausted
                };
                self.search_failed = false;
            },
            Err(err) => {
                warn!(query = %self.query, page, error = %err, "search fetch failed");
                // A failed later page must never empty the list the user is
                // already looking at.
                if page == 0 {
                    self.results.clear();
                    self.search_failed = true;
                }
                self.has_more = false;
                self.phase = FetchPhase::Exhausted;
            },
        }
        true
    }

    /// Set the selection. Orthogonal to pagination state.
    pub fn select(&mut self, item: StockItem) {
        self.selection = Some(item);
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[StockItem] {
        &self.results
    }

    pub fn selection(&self) -> Option<&StockItem> {
        self.selection.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            query: self.query.clone(),
            results: self.results.clone(),
            selection: self.selection.clone(),
            loading: self.phase == FetchPhase::Loading,
            exhausted: self.phase == FetchPhase::Exhausted,
            search_failed: self.search_failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> StockItem {
        StockItem {
            stock_id: id.to_string(),
            stock_name: format!("{id} Corp"),
            nation_type: "한국".to_string(),
            market: "KOSPI".to_string(),
        }
    }

    fn ids(state: &SessionState) -> Vec<&str> {
        state.results().iter().map(|s| s.stock_id.as_str()).collect()
    }

    /// Drive a query all the way to an applied page-0 result.
    fn search(state: &mut SessionState, query: &str, items: Vec<StockItem>) {
        let QueryAction::Schedule { epoch } = state.query_changed(query.to_string()) else {
            panic!("expected a scheduled fetch for {query:?}");
        };
        let request = state.debounce_fired(epoch).unwrap();
        assert_eq!(request.page, 0);
        assert!(state.fetch_completed(epoch, 0, Ok(items)));
    }

    #[test]
    fn test_pages_accumulate_in_order() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A"), item("B")]);
        assert_eq!(ids(&state), ["A", "B"]);
        assert!(state.has_more());

        let request = state.end_of_list_visible().unwrap();
        assert_eq!(request.page, 1);
        assert!(state.fetch_completed(request.epoch, 1, Ok(vec![item("C"), item("D")])));
        assert_eq!(ids(&state), ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_new_query_replaces_results() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A"), item("B")]);
        search(&mut state, "kak", vec![item("E")]);
        assert_eq!(ids(&state), ["E"]);
    }

    #[test]
    fn test_short_page_exhausts_pagination() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A")]);
        assert!(!state.has_more());
        assert_eq!(state.phase(), FetchPhase::Exhausted);
        // The sensor may keep firing; nothing more is fetched this query.
        assert!(state.end_of_list_visible().is_none());
        assert!(state.end_of_list_visible().is_none());
    }

    #[test]
    fn test_duplicate_triggers_while_loading_ignored() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A"), item("B")]);

        let request = state.end_of_list_visible().unwrap();
        // Sensor fires again while the page-1 fetch is outstanding.
        assert!(state.end_of_list_visible().is_none());

        assert!(state.fetch_completed(request.epoch, 1, Ok(vec![item("C"), item("D")])));
        // Back to Idle, the next trigger asks for page 2.
        let request = state.end_of_list_visible().unwrap();
        assert_eq!(request.page, 2);
    }

    #[test]
    fn test_sensor_ignored_before_first_page() {
        let mut state = SessionState::new(2);
        state.query_changed("sam".to_string());
        // Page 0 has not completed yet; a viewport signal must not fetch.
        assert!(state.end_of_list_visible().is_none());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut state = SessionState::new(2);
        search(&mut state, "AAA", vec![item("A"), item("B")]);
        let request = state.end_of_list_visible().unwrap();
        let old_epoch = request.epoch;

        // Query changes while the page-1 fetch is in flight.
        search(&mut state, "BBB", vec![item("E")]);

        assert!(!state.fetch_completed(old_epoch, 1, Ok(vec![item("C"), item("D")])));
        assert_eq!(ids(&state), ["E"]);
    }

    #[test]
    fn test_expired_debounce_timer_yields_nothing() {
        let mut state = SessionState::new(2);
        let QueryAction::Schedule { epoch } = state.query_changed("sam".to_string()) else {
            panic!("expected schedule");
        };
        state.query_changed("sams".to_string());
        assert!(state.debounce_fired(epoch).is_none());
    }

    #[test]
    fn test_selection_cleared_on_every_query_change() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A")]);
        state.select(item("A"));
        assert!(state.selection().is_some());

        state.query_changed("samsu".to_string());
        assert!(state.selection().is_none());

        // Even retyping the same text resets the selection.
        search(&mut state, "sam", vec![item("A")]);
        state.select(item("A"));
        state.query_changed("sam".to_string());
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_selection_orthogonal_to_pagination() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A"), item("B")]);
        state.select(item("B"));
        assert_eq!(ids(&state), ["A", "B"]);
        assert!(state.has_more());
        assert_eq!(state.phase(), FetchPhase::Idle);
    }

    #[test]
    fn test_blank_query_bypasses_debounce() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A"), item("B")]);

        let action = state.query_changed("   ".to_string());
        assert_eq!(action, QueryAction::ClearedBlank);
        assert!(state.results().is_empty());
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_page_zero_failure_clears_list() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A"), item("B")]);

        let QueryAction::Schedule { epoch } = state.query_changed("kak".to_string()) else {
            panic!("expected schedule");
        };
        state.debounce_fired(epoch).unwrap();
        let failure = SearchError::Malformed("truncated body".to_string());
        assert!(state.fetch_completed(epoch, 0, Err(failure)));

        assert!(state.results().is_empty());
        assert!(state.snapshot().search_failed);
        assert_eq!(state.phase(), FetchPhase::Exhausted);
    }

    #[test]
    fn test_later_page_failure_keeps_list() {
        let mut state = SessionState::new(2);
        search(&mut state, "sam", vec![item("A"), item("B")]);

        let request = state.end_of_list_visible().unwrap();
        let failure = SearchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.fetch_completed(request.epoch, 1, Err(failure)));

        // Existing results survive; pagination just stops.
        assert_eq!(ids(&state), ["A", "B"]);
        assert!(!state.snapshot().search_failed);
        assert!(state.end_of_list_visible().is_none());
    }

    #[test]
    fn test_retyping_recovers_after_failure() {
        let mut state = SessionState::new(2);
        let QueryAction::Schedule { epoch } = state.query_changed("sam".to_string()) else {
            panic!("expected schedule");
        };
        state.debounce_fired(epoch).unwrap();
        let failure = SearchError::Malformed("bad".to_string());
        state.fetch_completed(epoch, 0, Err(failure));
        assert!(state.snapshot().search_failed);

        search(&mut state, "samsung", vec![item("A")]);
        assert_eq!(ids(&state), ["A"]);
        assert!(!state.snapshot().search_failed);
    }
}
