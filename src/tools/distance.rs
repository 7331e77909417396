use crate::format;
use serde::{Deserialize, Serialize};

/// Display tone for the entry-quality bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Good,
    Ok,
    Neutral,
    Warn,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveExplanation {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DistanceRequest {
    pub symbol: Option<String>,
    pub raw_hit_price: Option<f64>,
    pub current_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceReport {
    pub symbol: Option<String>,
    pub pct_diff: Option<f64>,
    pub move_text: Option<String>,
    pub explanation: Option<MoveExplanation>,
}

/// Percentage move from the forecast hit price to the current price.
/// None unless both prices are present and non-zero.
pub fn distance_pct(raw_hit: Option<f64>, current: Option<f64>) -> Option<f64> {
    match (raw_hit, current) {
        (Some(hit), Some(cur)) if hit != 0.0 && cur != 0.0 => Some((cur - hit) / hit * 100.0),
        _ => None,
    }
}

/// Classify the move into one of five qualitative bands.
/// Band order matters: ±0.5% is inclusive for "very close".
pub fn classify_move(pct_diff: f64) -> MoveExplanation {
    if pct_diff <= -5.0 {
        MoveExplanation {
            title: "Much better price than the alert",
            subtitle: "Current price is clearly lower than the forecast hit price. If everything else still looks good, this is a cheaper entry than the original alert.",
            tone: Tone::Good,
        }
    } else if pct_diff < -1.0 {
        MoveExplanation {
            title: "Slightly better price than the alert",
            subtitle: "Current price is a bit lower than the hit price. You are getting a small discount compared to the original alert.",
            tone: Tone::Ok,
        }
    } else if pct_diff.abs() <= 0.5 {
        MoveExplanation {
            title: "Very close to the alert price",
            subtitle: "Current price is almost the same as the hit price. Your entry is basically the same as the original alert.",
            tone: Tone::Neutral,
        }
    } else if pct_diff < 3.0 {
        MoveExplanation {
            title: "A little more expensive than the alert",
            subtitle: "Current price is above the hit price. You are paying a bit more than the original alert saw.",
            tone: Tone::Warn,
        }
    } else {
        MoveExplanation {
            title: "Much more expensive than the alert",
            subtitle: "Current price is clearly above the hit price. This is a more aggressive entry and may be higher-risk.",
            tone: Tone::Bad,
        }
    }
}

/// Full comparison: empty report when either price is absent
pub fn compare_to_hit(request: &DistanceRequest) -> DistanceReport {
    let pct_diff = distance_pct(request.raw_hit_price, request.current_price);
    DistanceReport {
        symbol: request.symbol.clone(),
        pct_diff,
        move_text: pct_diff.map(format::fmt_signed_pct),
        explanation: pct_diff.map(classify_move),
    }
}
