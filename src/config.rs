use std::time::Duration;

// -----------------------------------------------
// VM API UPSTREAM
// -----------------------------------------------
pub const DEFAULT_VM_API_BASE: &str = "http://136.114.207.90:8000";

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// FEED / PROXY TUNING
// -----------------------------------------------
pub const LIVE_ALERTS_LIMIT: usize = 100;
pub const DEFAULT_SNOOZE_MINUTES: u64 = 30;
pub const DEFAULT_POLL_SECS: u64 = 15;

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Base URL of the VM alerts/trades API
pub fn vm_api_base() -> String {
    std::env::var("S97_VM_API_BASE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_VM_API_BASE.to_string())
}

/// Get the execution mode from environment or default to server
pub fn execution_mode() -> String {
    std::env::var("S97_MODE").unwrap_or_else(|_| "server".to_string())
}

/// Get port from environment or default
pub fn port() -> u16 {
    std::env::var("S97_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000)
}

/// Dashboard poll interval; clamped so a bad value cannot hammer the VM
pub fn poll_interval() -> Duration {
    let secs = std::env::var("S97_POLL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_POLL_SECS)
        .max(5)
        .min(300);
    Duration::from_secs(secs)
}
