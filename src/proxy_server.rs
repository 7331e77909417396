use crate::config;
use crate::tools::{distance, max_gain, option_picker, option_risk, risk_guard};
use crate::vm_client::VmClient;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

#[derive(Clone)]
pub struct AppState {
    client: Arc<VmClient>,
}

impl AppState {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client: Arc::new(VmClient::from_env()?),
        })
    }

    pub fn with_client(client: VmClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn bad_gateway(payload: Value) -> Response {
    (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
}

/// Merge `ok: true` into an upstream object without clobbering an existing
/// `ok` field; non-object bodies get wrapped.
fn merged_ok(body: Value) -> Value {
    match body {
        Value::Object(mut map) => {
            map.entry("ok").or_insert(json!(true));
            Value::Object(map)
        }
        other => json!({ "ok": true, "data": other }),
    }
}

// -----------------------------------------------
// ALERT PROXIES
// -----------------------------------------------

/// GET /api/live-alerts - Pass the scored alert feed through
async fn live_alerts(State(state): State<AppState>) -> Response {
    match state.client.live_alerts_value(config::LIVE_ALERTS_LIMIT).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            tracing::warn!("live-alerts proxy failed: {e:#}");
            bad_gateway(json!({ "alerts": [], "error": e.to_string() }))
        }
    }
}

/// POST /api/take-alert - Forward { alert } to the VM
async fn take_alert(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    match state.client.take_alert(&body).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => bad_gateway(json!({ "ok": false, "error": e.to_string() })),
    }
}

/// POST /api/dismiss-alert - Forward { alert } to the VM
async fn dismiss_alert(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    match state.client.dismiss_alert(&body).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => bad_gateway(json!({ "ok": false, "error": e.to_string() })),
    }
}

/// POST /api/snooze-alert - Forward { alert, minutes } to the VM
async fn snooze_alert(State(state): State<AppState>, Json(mut body): Json<Value>) -> Response {
    if let Value::Object(map) = &mut body {
        map.entry("minutes")
            .or_insert(json!(config::DEFAULT_SNOOZE_MINUTES));
    }
    match state.client.snooze_alert(&body).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => bad_gateway(json!({ "ok": false, "error": e.to_string() })),
    }
}

// -----------------------------------------------
// WATCHLIST / TRADES / PERFORMANCE PROXIES
// -----------------------------------------------

/// GET /api/watchlist-live - Live watchlist symbols
async fn watchlist_live(State(state): State<AppState>) -> Response {
    match state.client.watchlist_value().await {
        Ok(body) => Json(merged_ok(body)).into_response(),
        Err(e) => bad_gateway(json!({ "ok": false, "items": [], "error": e.to_string() })),
    }
}

/// GET /api/active-trades - Trades the user marked as taken
async fn active_trades(State(state): State<AppState>) -> Response {
    match state.client.active_trades_value().await {
        Ok(body) => Json(merged_ok(body)).into_response(),
        Err(e) => bad_gateway(json!({ "ok": false, "trades": [], "error": e.to_string() })),
    }
}

/// POST /api/close-trade - Forward { trade_id, alert_key, symbol }
async fn close_trade(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    match state.client.close_trade(&body).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => bad_gateway(json!({ "ok": false, "error": e.to_string() })),
    }
}

/// GET /api/performance-summary - Counters from /api/performance
async fn performance_summary(State(state): State<AppState>) -> Response {
    match state.client.performance().await {
        Ok(body) => Json(merged_ok(body)).into_response(),
        Err(e) => bad_gateway(json!({ "summary": null, "ok": false, "error": e.to_string() })),
    }
}

/// GET /api/debug-env - Which upstream the proxy resolved
async fn debug_env() -> Json<Value> {
    Json(json!({
        "S97_VM_API_BASE": std::env::var("S97_VM_API_BASE").ok(),
        "S97_MODE": std::env::var("S97_MODE").ok(),
    }))
}

// -----------------------------------------------
// CALCULATOR ENDPOINTS
// -----------------------------------------------
// These never fail: bad numeric input degrades to the calculator's own
// unrated/empty result shape.

/// POST /api/tools/option-risk
async fn tool_option_risk(
    Json(input): Json<option_risk::OptionContractInput>,
) -> Json<option_risk::OptionRiskReport> {
    Json(option_risk::score_contract(&input))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RiskGuardRequest {
    mode: risk_guard::RiskMode,
    #[serde(flatten)]
    input: risk_guard::RiskGuardInput,
}

/// POST /api/tools/risk-guard
async fn tool_risk_guard(Json(req): Json<RiskGuardRequest>) -> Json<risk_guard::RiskGuardReport> {
    Json(risk_guard::evaluate(&req.input, req.mode))
}

/// POST /api/tools/option-picker
async fn tool_option_picker(
    Json(req): Json<option_picker::PickerRequest>,
) -> Json<Vec<option_picker::RankedRow>> {
    Json(option_picker::rank(&req))
}

/// POST /api/tools/distance
async fn tool_distance(
    Json(req): Json<distance::DistanceRequest>,
) -> Json<distance::DistanceReport> {
    Json(distance::compare_to_hit(&req))
}

/// POST /api/tools/max-gain
async fn tool_max_gain(Json(input): Json<max_gain::MaxGainInput>) -> Json<max_gain::MaxGainReport> {
    Json(max_gain::project(&input))
}

// -----------------------------------------------
// SERVER SETUP
// -----------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/live-alerts", get(live_alerts))
        .route("/api/take-alert", post(take_alert))
        .route("/api/dismiss-alert", post(dismiss_alert))
        .route("/api/snooze-alert", post(snooze_alert))
        .route("/api/watchlist-live", get(watchlist_live))
        .route("/api/active-trades", get(active_trades))
        .route("/api/close-trade", post(close_trade))
        .route("/api/performance-summary", get(performance_summary))
        .route("/api/debug-env", get(debug_env))
        .route("/api/tools/option-risk", post(tool_option_risk))
        .route("/api/tools/risk-guard", post(tool_risk_guard))
        .route("/api/tools/option-picker", post(tool_option_picker))
        .route("/api/tools/distance", post(tool_distance))
        .route("/api/tools/max-gain", post(tool_max_gain))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<()> {
    let state = AppState::from_env()?;
    tracing::info!(upstream = state.client.base_url(), "proxying to VM API");

    let app = router(state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("🚀 Signal Desk proxy running on http://{}", addr);
    println!("📋 Available endpoints:");
    println!("   GET  /api/live-alerts");
    println!("   POST /api/take-alert");
    println!("   POST /api/dismiss-alert");
    println!("   POST /api/snooze-alert");
    println!("   GET  /api/watchlist-live");
    println!("   GET  /api/active-trades");
    println!("   POST /api/close-trade");
    println!("   GET  /api/performance-summary");
    println!("   GET  /api/debug-env");
    println!("   POST /api/tools/option-risk");
    println!("   POST /api/tools/risk-guard");
    println!("   POST /api/tools/option-picker");
    println!("   POST /api/tools/distance");
    println!("   POST /api/tools/max-gain");
    println!();

    axum::serve(listener, app).await?;
    Ok(())
}
