//! The incremental search session: debounce gate, pagination sequencer,
//! result accumulator and selection state behind one event loop.

pub mod controller;
pub mod debounce;
pub mod state;

pub use controller::{SearchController, SessionEvent, SessionHandle};
pub use debounce::DebounceGate;
pub use state::{FetchPhase, FetchRequest, QueryAction, SessionSnapshot, SessionState};
