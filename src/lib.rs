pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod hooks;
pub mod identity;
pub mod markdown;
pub mod models;
pub mod pluralize;
pub mod state;
pub mod storage;
pub mod store;

pub use app::router;
pub use client::{HttpStatsApi, LocalOptions, LocalStatsApi, StatsApi, StatsClient};
pub use config::{Config, StoreKind};
pub use errors::{AppError, StoreError};
pub use state::AppState;
pub use store::{CounterStore, FileStore, MemoryStore};
