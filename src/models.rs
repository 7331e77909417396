use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Numeric columns in the scored-forecast feed arrive as JSON numbers or
/// strings depending on which stage of the pipeline produced them.
pub fn num_or_str<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
        Other(Value),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Str(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// One scored alert as delivered by the VM `/alerts/live` feed.
/// Every column is optional; the feed schema grows over time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAlert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_rule_direction: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_time_12h_ct: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_time_12h_ct: Option<String>,

    /// ISO fallback when the pre-formatted time is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_time: Option<String>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub forecast_pct: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub raw_hit_price: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub forecast_confidence: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_rule: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_rule_view: Option<String>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub flow_score: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub edge_z: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub edge_p: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub sub4_risk: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub lda_edge_p: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub lda_sub4_p: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub tail_concord3: Option<f64>,

    #[serde(
        rename = "tail_concordX",
        deserialize_with = "num_or_str",
        skip_serializing_if = "Option::is_none"
    )]
    pub tail_concord_x: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub tail_guard_score: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub success7d_prob: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub success7d_low: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub success7d_high: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub success7d_n_eff: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub success7d_cal: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub direction_score: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub tp1_pct: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub tp2_pct: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub stop_pct: Option<f64>,

    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub trail_trigger_pct: Option<f64>,
}

/// Response shape of `/alerts/live`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveAlertsResp {
    pub alerts: Vec<RawAlert>,
}

/// Response shape of `/watchlist/live`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchlistResp {
    pub ok: Option<bool>,
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One taken trade as tracked by the VM
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VmTrade {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_key: Option<String>,

    /// Unix seconds
    #[serde(deserialize_with = "num_or_str", skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// The original alert payload, kept verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Value>,
}

/// Response shape of `/trades/active`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TradesResp {
    pub ok: Option<bool>,
    pub trades: Vec<VmTrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_alert_accepts_string_and_number_columns() {
        let json = r#"{
            "symbol": "AAPL",
            "direction_rule_direction": "UP",
            "forecast_pct": "5",
            "raw_hit_price": 195.25,
            "forecast_confidence": "  4.5 ",
            "tail_concordX": "0.81"
        }"#;

        let alert: RawAlert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.symbol.as_deref(), Some("AAPL"));
        assert_eq!(alert.forecast_pct, Some(5.0));
        assert_eq!(alert.raw_hit_price, Some(195.25));
        assert_eq!(alert.forecast_confidence, Some(4.5));
        assert_eq!(alert.tail_concord_x, Some(0.81));
        assert_eq!(alert.flow_score, None);
    }

    #[test]
    fn test_raw_alert_tolerates_junk_values() {
        let json = r#"{ "forecast_pct": "n/a", "edge_z": null, "sub4_risk": {} }"#;
        let alert: RawAlert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.forecast_pct, None);
        assert_eq!(alert.edge_z, None);
        assert_eq!(alert.sub4_risk, None);
    }

    #[test]
    fn test_live_alerts_resp_defaults_to_empty() {
        let resp: LiveAlertsResp = serde_json::from_str("{}").unwrap();
        assert!(resp.alerts.is_empty());
    }

    #[test]
    fn test_trades_resp_keeps_alert_payload() {
        let json = r#"{
            "ok": true,
            "trades": [{
                "trade_id": "t-1",
                "taken_at": 1765300000,
                "alert": { "symbol": "PLTR", "direction": "CALL" }
            }]
        }"#;
        let resp: TradesResp = serde_json::from_str(json).unwrap();
        assert_eq!(resp.trades.len(), 1);
        let trade = &resp.trades[0];
        assert_eq!(trade.taken_at, Some(1_765_300_000.0));
        assert_eq!(trade.alert.as_ref().unwrap()["symbol"], "PLTR");
    }
}
