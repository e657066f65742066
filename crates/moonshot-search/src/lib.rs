//! Incremental stock catalog search and selection
//!
//! This crate turns raw keystroke input into a correctly-ordered,
//! cancellable, paginated sequence of catalog requests and exposes a single
//! observable selection for dependent views. It provides:
//!
//! - A debounce/cancellation gate that collapses keystroke bursts into one
//!   trailing page-0 fetch of the latest query
//! - A paginated fetcher for the catalog search endpoint
//! - A pagination sequencer driven by a viewport-visibility signal
//! - A result accumulator (replace on page 0, append otherwise)
//! - Selection state, reset on every query change
//! - A thin client for the remote prediction endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use moonshot_search::{CatalogClient, SearchConfig, SearchController};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SearchConfig::default();
//!     let catalog = Arc::new(CatalogClient::new(&config)?);
//!     let (controller, handle, mut snapshots) =
//!         SearchController::new(&config, catalog);
//!     tokio::spawn(controller.run());
//!
//!     handle.query_changed("삼성");
//!     snapshots.changed().await?;
//!     for stock in &snapshots.borrow().results {
//!         println!("{} {}", stock.stock_id, stock.stock_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod session;

// Re-export main types for convenience
pub use api::{CatalogClient, CatalogSource, ChartPoint, Prediction, PredictionClient, StockItem};
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use session::{SearchController, SessionHandle, SessionSnapshot};
