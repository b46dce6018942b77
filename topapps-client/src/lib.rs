//! # Top Apps Client
//!
//! Terminal rendition of the top apps dashboard: an infinite list of app
//! cards backed by the Top Apps API.
//!
//! ## Modules
//!
//! - `source`: Page and stats sources, and the HTTP client implementing them
//! - `feed`: Infinite-list state machine
//! - `view`: Card and list view models
//! - `render`: Plain-text output
//! - `config`: Environment-driven configuration
//! - `mock`: In-memory source for tests and demos

pub mod config;
pub mod feed;
pub mod mock;
pub mod render;
pub mod source;
pub mod view;

pub use feed::{AppFeed, FetchOutcome};
pub use source::{HttpApi, PageSource, StatsSource};
pub use view::FeedView;
