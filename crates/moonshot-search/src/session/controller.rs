//! Async search session controller
//!
//! A single event loop owns the [`SessionState`] and drives the debounce
//! gate, the paginated fetcher and the accumulator. Inputs arrive through a
//! cloneable [`SessionHandle`]; display collaborators observe the session
//! through a `watch` channel of [`SessionSnapshot`]s and never mutate state
//! directly.
//!
//! Fetches run as spawned tasks tagged with the epoch and page they were
//! issued for; completions are funneled back into the loop and applied in
//! arrival order, with stale epochs dropped.

use crate::api::catalog::{CatalogSource, StockItem};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::session::debounce::DebounceGate;
use crate::session::state::{FetchRequest, QueryAction, SessionSnapshot, SessionState};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::debug;

/// Events processed by the controller loop.
///
/// The first group comes from collaborators via [`SessionHandle`]; the
/// `DebounceFired` and `FetchCompleted` variants are internal.
#[derive(Debug)]
pub enum SessionEvent {
    /// The search text changed (one event per keystroke)
    QueryChanged(String),
    /// The viewport sensor saw the last rendered item
    EndOfListVisible,
    /// The user picked an item from the result list
    Select(StockItem),
    /// Drop the current selection
    ClearSelection,
    /// Tear the session down; pending timers are cancelled
    Shutdown,
    /// A debounce quiet interval elapsed
    DebounceFired { epoch: u64 },
    /// A spawned fetch finished
    FetchCompleted {
        epoch: u64,
        page: u32,
        outcome: Result<Vec<StockItem>>,
    },
}

/// Cloneable input seam for the session.
///
/// The viewport-visibility sensor subscribes by holding a handle and calling
/// [`SessionHandle::end_of_list_visible`] once per intersection event; the
/// input box forwards keystrokes through [`SessionHandle::query_changed`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Forward a query change (call once per keystroke)
    pub fn query_changed(&self, query: impl Into<String>) {
        let _ = self.events.send(SessionEvent::QueryChanged(query.into()));
    }

    /// Signal that the last rendered item entered the viewport
    pub fn end_of_list_visible(&self) {
        let _ = self.events.send(SessionEvent::EndOfListVisible);
    }

    /// Select an item; observable by the prediction collaborator
    pub fn select(&self, item: StockItem) {
        let _ = self.events.send(SessionEvent::Select(item));
    }

    /// Clear the selection
    pub fn clear_selection(&self) {
        let _ = self.events.send(SessionEvent::ClearSelection);
    }

    /// Stop the controller loop
    pub fn shutdown(&self) {
        let _ = self.events.send(SessionEvent::Shutdown);
    }
}

/// Owns the session state and processes events until shutdown
pub struct SearchController {
    state: SessionState,
    gate: DebounceGate,
    catalog: Arc<dyn CatalogSource>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    /// Clone handed to spawned timers and fetch tasks
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SearchController {
    /// Build a controller plus its input handle and snapshot receiver
    pub fn new(
        config: &SearchConfig,
        catalog: Arc<dyn CatalogSource>,
    ) -> (Self, SessionHandle, watch::Receiver<SessionSnapshot>) {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (snapshots, snapshots_rx) = watch::channel(SessionSnapshot::default());

        let controller = Self {
            state: SessionState::new(config.page_size),
            gate: DebounceGate::new(config.debounce),
            catalog,
            events,
            events_tx: events_tx.clone(),
            snapshots,
        };
        let handle = SessionHandle { events: events_tx };
        (controller, handle, snapshots_rx)
    }

    /// Run the event loop until [`SessionEvent::Shutdown`] arrives
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            if !self.handle_event(event) {
                break;
            }
            let _ = self.snapshots.send(self.state.snapshot());
        }
        // Teardown: a pending timer must not fire afterwards.
        self.gate.cancel();
    }

    /// Process one event. Returns false on shutdown.
    fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::QueryChanged(query) => match self.state.query_changed(query) {
                QueryAction::Schedule { epoch } => {
                    self.gate.schedule(epoch, self.events_tx.clone());
                },
                QueryAction::ClearedBlank => {
                    self.gate.cancel();
                },
            },
            SessionEvent::DebounceFired { epoch } => {
                if let Some(request) = self.state.debounce_fired(epoch) {
                    self.spawn_fetch(request);
                }
            },
            SessionEvent::EndOfListVisible => {
                if let Some(request) = self.state.end_of_list_visible() {
                    self.spawn_fetch(request);
                }
            },
            SessionEvent::FetchCompleted {
                epoch,
                page,
                outcome,
            } => {
                self.state.fetch_completed(epoch, page, outcome);
            },
            SessionEvent::Select(item) => {
                debug!(stock_id = %item.stock_id, "item selected");
                self.state.select(item);
            },
            SessionEvent::ClearSelection => {
                self.state.clear_selection();
            },
            SessionEvent::Shutdown => return false,
        }
        true
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        debug!(query = %request.query, page = request.page, "issuing search fetch");
        let catalog = Arc::clone(&self.catalog);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = catalog.fetch_page(&request.query, request.page).await;
            // The loop may be gone already; a dead channel just drops this.
            let _ = events.send(SessionEvent::FetchCompleted {
                epoch: request.epoch,
                page: request.page,
                outcome,
            });
        });
    }
}
