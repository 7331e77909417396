use crate::config;
use crate::models::{LiveAlertsResp, TradesResp, WatchlistResp};
use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde_json::{json, Value};

// -----------------------------------------------
// CLIENT WRAPPER FOR THE VM ALERTS/TRADES API
// -----------------------------------------------
pub struct VmClient {
    http: Client,
    base_url: String,
}

impl VmClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config::HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(config::vm_api_base())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the body as text; non-2xx becomes a uniform error string that the
    /// proxy layer surfaces verbatim. No retries: the next poll is the retry.
    async fn read_body(res: reqwest::Response) -> Result<String> {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            bail!("VM API error: {} {}", status.as_u16(), text);
        }
        Ok(text)
    }

    /// Empty bodies parse as the given default instead of failing
    fn parse_or(text: &str, empty_default: Value) -> Result<Value> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(empty_default);
        }
        serde_json::from_str(trimmed).map_err(|e| anyhow!("Cannot reach VM API (bad JSON: {e})"))
    }

    async fn get_value(&self, path: &str) -> Result<Value> {
        tracing::debug!(path, "GET upstream");
        let res = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| anyhow!("Cannot reach VM API ({e})"))?;
        let text = Self::read_body(res).await?;
        Self::parse_or(&text, json!({}))
    }

    async fn post_value(&self, path: &str, body: &Value) -> Result<Value> {
        tracing::debug!(path, "POST upstream");
        let res = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow!("Cannot reach VM API ({e})"))?;
        let text = Self::read_body(res).await?;
        // Mutation endpoints often reply with an empty 200
        Self::parse_or(&text, json!({ "ok": true }))
    }

    // -----------------------------------------------
    // ALERTS
    // -----------------------------------------------

    pub async fn live_alerts_value(&self, limit: usize) -> Result<Value> {
        self.get_value(&format!("/alerts/live?limit={limit}")).await
    }

    pub async fn live_alerts(&self, limit: usize) -> Result<LiveAlertsResp> {
        let value = self.live_alerts_value(limit).await?;
        serde_json::from_value(value).context("Failed to parse live alerts")
    }

    pub async fn take_alert(&self, body: &Value) -> Result<Value> {
        self.post_value("/alerts/take", body).await
    }

    pub async fn dismiss_alert(&self, body: &Value) -> Result<Value> {
        self.post_value("/alerts/dismiss", body).await
    }

    pub async fn snooze_alert(&self, body: &Value) -> Result<Value> {
        self.post_value("/alerts/snooze", body).await
    }

    // -----------------------------------------------
    // WATCHLIST / TRADES
    // -----------------------------------------------

    pub async fn watchlist_value(&self) -> Result<Value> {
        self.get_value("/watchlist/live").await
    }

    pub async fn watchlist(&self) -> Result<WatchlistResp> {
        let value = self.watchlist_value().await?;
        serde_json::from_value(value).context("Failed to parse watchlist")
    }

    pub async fn active_trades_value(&self) -> Result<Value> {
        self.get_value("/trades/active").await
    }

    pub async fn active_trades(&self) -> Result<TradesResp> {
        let value = self.active_trades_value().await?;
        serde_json::from_value(value).context("Failed to parse active trades")
    }

    pub async fn close_trade(&self, body: &Value) -> Result<Value> {
        self.post_value("/trades/close", body).await
    }

    // -----------------------------------------------
    // PERFORMANCE
    // -----------------------------------------------

    pub async fn performance(&self) -> Result<Value> {
        self.get_value("/api/performance").await
    }
}
