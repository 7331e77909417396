pub mod alerts;
pub mod config;
pub mod format;
pub mod logging;
pub mod models;
pub mod proxy_server;
pub mod tools;
pub mod vm_client;
pub mod watcher;

// Re-exports for convenience
pub use alerts::{map_raw_to_card, AlertCard, Tone};
pub use models::{LiveAlertsResp, RawAlert, TradesResp, VmTrade, WatchlistResp};
pub use vm_client::VmClient;
