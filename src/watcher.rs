use crate::config;
use crate::models::{RawAlert, TradesResp, VmTrade, WatchlistResp};
use crate::vm_client::VmClient;
use anyhow::Result;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

// -----------------------------------------------
// POLLING LIFECYCLE
// -----------------------------------------------

/// Owns one poll loop: a liveness flag plus the task handle.
/// Dropping the handle does not stop the loop; call `shutdown`.
pub struct PollHandle {
    live: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn shutdown(self) {
        self.live.store(false, Ordering::Release);
        self.task.abort();
    }
}

/// Latest snapshot of one dashboard view
#[derive(Debug, Clone)]
pub struct FeedState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub ticks: u64,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            ticks: 0,
        }
    }
}

/// One polled dashboard view. Fetches immediately, then on every interval.
/// Last response wins; a failed poll keeps the previous snapshot and records
/// the error, and the next tick is the implicit retry.
pub struct Feed<T> {
    state: Arc<RwLock<FeedState<T>>>,
    handle: PollHandle,
}

impl<T: Send + Sync + 'static> Feed<T> {
    pub fn spawn<F, Fut>(name: &'static str, every: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let state: Arc<RwLock<FeedState<T>>> = Arc::new(RwLock::new(FeedState::default()));
        let live = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn({
            let state = Arc::clone(&state);
            let live = Arc::clone(&live);
            async move {
                let mut ticker = tokio::time::interval(every);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    let result = fetch().await;

                    // A response that lands after teardown is stale; drop it.
                    if !live.load(Ordering::Acquire) {
                        break;
                    }

                    let mut st = state.write().await;
                    st.ticks += 1;
                    match result {
                        Ok(data) => {
                            st.data = Some(data);
                            st.error = None;
                        }
                        Err(e) => {
                            tracing::warn!(feed = name, "poll failed: {e:#}");
                            st.error = Some(e.to_string());
                        }
                    }
                }
            }
        });

        Self {
            state,
            handle: PollHandle { live, task },
        }
    }

    pub async fn snapshot(&self) -> FeedState<T>
    where
        T: Clone,
    {
        self.state.read().await.clone()
    }

    pub fn shutdown(self) {
        self.handle.shutdown();
    }
}

// -----------------------------------------------
// DASHBOARD VIEW FEEDS
// -----------------------------------------------

pub fn alerts_feed(client: Arc<VmClient>, every: Duration) -> Feed<Vec<RawAlert>> {
    Feed::spawn("live-alerts", every, move || {
        let client = Arc::clone(&client);
        async move {
            Ok(client
                .live_alerts(config::LIVE_ALERTS_LIMIT)
                .await?
                .alerts)
        }
    })
}

pub fn watchlist_feed(client: Arc<VmClient>, every: Duration) -> Feed<WatchlistResp> {
    Feed::spawn("watchlist", every, move || {
        let client = Arc::clone(&client);
        async move { client.watchlist().await }
    })
}

pub fn trades_feed(client: Arc<VmClient>, every: Duration) -> Feed<Vec<VmTrade>> {
    Feed::spawn("active-trades", every, move || {
        let client = Arc::clone(&client);
        async move {
            let resp: TradesResp = client.active_trades().await?;
            Ok(resp.trades)
        }
    })
}

pub fn performance_feed(client: Arc<VmClient>, every: Duration) -> Feed<Value> {
    Feed::spawn("performance", every, move || {
        let client = Arc::clone(&client);
        async move { client.performance().await }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::AtomicU32;

    #[tokio::test]
    async fn test_feed_polls_and_stores_latest() {
        let calls = Arc::new(AtomicU32::new(0));
        let feed = Feed::spawn("test", Duration::from_millis(10), {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) }
            }
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        let snap = feed.snapshot().await;
        assert!(snap.ticks >= 2);
        assert_eq!(snap.data, Some(snap.ticks as u32));
        assert_eq!(snap.error, None);
        feed.shutdown();
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_previous_data() {
        let calls = Arc::new(AtomicU32::new(0));
        let feed = Feed::spawn("test", Duration::from_millis(10), {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n == 0 {
                        Ok("first".to_string())
                    } else {
                        Err(anyhow!("VM API error: 500 oops"))
                    }
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        let snap = feed.snapshot().await;
        assert_eq!(snap.data.as_deref(), Some("first"));
        assert_eq!(snap.error.as_deref(), Some("VM API error: 500 oops"));
        feed.shutdown();
    }

    #[tokio::test]
    async fn test_shutdown_stops_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let feed = Feed::spawn("test", Duration::from_millis(10), {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        feed.shutdown();
        let after = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        // At most one already-in-flight tick may land after shutdown
        assert!(calls.load(Ordering::SeqCst) <= after + 1);
    }
}
