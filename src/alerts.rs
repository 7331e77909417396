use crate::models::RawAlert;
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

/// Direction tone of an alert card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Up,
    Down,
    Flat,
}

/// Display-ready card built from one raw alert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertCard {
    pub symbol: String,
    pub tone: Tone,
    pub direction_text: String,
    pub entry_time: String,
    pub forecast_time: String,
    pub forecast_pct: Option<f64>,
    pub signal: Option<String>,
    pub raw_hit_price: Option<f64>,
    pub forecast_confidence: Option<f64>,
    pub rule_label: Option<String>,
    pub direction_rule_view: Option<String>,
}

const UP_WORDS: [&str; 4] = ["UP", "CALL", "LONG", "SUNRISE"];
const DOWN_WORDS: [&str; 4] = ["DOWN", "PUT", "SHORT", "SNOWFALL"];

fn first_nonempty<'a>(primary: Option<&'a str>, fallback: Option<&'a str>) -> &'a str {
    [primary, fallback]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or("")
}

/// Classify an alert as up/down/flat from its direction fields.
/// The rule direction wins over the plain direction column.
pub fn deduce_tone(rule_direction: Option<&str>, direction: Option<&str>) -> Tone {
    let d = first_nonempty(rule_direction, direction).to_uppercase();
    if UP_WORDS.iter().any(|w| d.contains(w)) {
        Tone::Up
    } else if DOWN_WORDS.iter().any(|w| d.contains(w)) {
        Tone::Down
    } else {
        Tone::Flat
    }
}

/// Human direction line shown on the card
pub fn pretty_direction(rule_direction: Option<&str>, direction: Option<&str>) -> String {
    let raw = first_nonempty(rule_direction, direction);
    let d = raw.to_uppercase();
    if d.contains("UP") || d.contains("CALL") || d.contains("SUNRISE") {
        "Up move (CALL / Sunrise bias)".to_string()
    } else if d.contains("DOWN") || d.contains("PUT") || d.contains("SNOWFALL") {
        "Down move (PUT / Snowfall bias)".to_string()
    } else if !raw.is_empty() {
        raw.to_string()
    } else {
        "Neutral / not set".to_string()
    }
}

/// Prefer the feed's pre-formatted 12-hour label; fall back to the ISO
/// timestamp; empty when neither parses.
pub fn format_time_label(label_12h: Option<&str>, iso: Option<&str>) -> String {
    if let Some(t) = label_12h {
        if !t.trim().is_empty() {
            return t.to_string();
        }
    }

    let Some(iso) = iso else {
        return String::new();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return dt.format("%m/%d/%Y %I:%M %p").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%m/%d/%Y %I:%M %p").to_string();
    }
    String::new()
}

/// Best-effort stable identity for an alert across refreshes
pub fn alert_key(raw: &RawAlert) -> String {
    let pct = raw
        .forecast_pct
        .map(|v| v.to_string())
        .unwrap_or_default();

    [
        raw.symbol.as_deref().unwrap_or(""),
        first_nonempty(raw.forecast_time.as_deref(), raw.forecast_time_12h_ct.as_deref()),
        raw.entry_time_12h_ct.as_deref().unwrap_or(""),
        first_nonempty(
            raw.direction_rule_direction.as_deref(),
            raw.direction.as_deref(),
        ),
        &pct,
    ]
    .join("|")
}

/// Reshape one raw alert into its display card
pub fn map_raw_to_card(raw: &RawAlert) -> AlertCard {
    AlertCard {
        symbol: raw.symbol.clone().unwrap_or_else(|| "?".to_string()),
        tone: deduce_tone(
            raw.direction_rule_direction.as_deref(),
            raw.direction.as_deref(),
        ),
        direction_text: pretty_direction(
            raw.direction_rule_direction.as_deref(),
            raw.direction.as_deref(),
        ),
        entry_time: format_time_label(raw.entry_time_12h_ct.as_deref(), None),
        forecast_time: format_time_label(
            raw.forecast_time_12h_ct.as_deref(),
            raw.forecast_time.as_deref(),
        ),
        forecast_pct: raw.forecast_pct,
        signal: raw.signal.clone(),
        raw_hit_price: raw.raw_hit_price,
        forecast_confidence: raw.forecast_confidence,
        rule_label: raw.rule_label.clone(),
        direction_rule_view: raw.direction_rule_view.clone(),
    }
}
