use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One candidate contract for the same underlying
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerRow {
    pub label: String,
    pub expiration: Option<NaiveDate>,
    pub strike: Option<f64>,
    pub ask: Option<f64>,
    pub delta: Option<f64>,
    pub theta: Option<f64>,
    /// Explicit breakeven override; defaults to strike + ask
    pub breakeven: Option<f64>,
    /// Fraction or percentage; values above 1 are treated as percentages
    pub chance_of_profit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerRequest {
    pub underlying_price: Option<f64>,
    /// Reference date for days-to-expiry; today when omitted
    pub as_of: Option<NaiveDate>,
    pub rows: Vec<PickerRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub label: String,
    /// None when the row cannot be scored
    pub score: Option<i32>,
    pub verdict: String,
    pub days_to_expiry: Option<i64>,
    pub breakeven: Option<f64>,
    pub move_to_breakeven_pct: Option<f64>,
    pub moneyness_pct: Option<f64>,
}

const UNSCORED_PROMPT: &str = "Add underlying price, strike, ask and expiry to score this row.";

fn verdict_for(score: i32) -> &'static str {
    if score <= -5 {
        "Very risky / lottery ticket"
    } else if score < 5 {
        "Mixed — keep size small"
    } else if score < 10 {
        "Pretty solid"
    } else {
        "Cleanest choice"
    }
}

fn score_row(underlying: Option<f64>, as_of: NaiveDate, row: &PickerRow) -> RankedRow {
    let dte = row.expiration.map(|d| (d - as_of).num_days());
    let breakeven = row.breakeven.or_else(|| match (row.strike, row.ask) {
        (Some(k), Some(a)) => Some(k + a),
        _ => None,
    });

    let scorable = matches!(underlying, Some(u) if u > 0.0)
        && row.strike.is_some()
        && row.ask.is_some()
        && dte.is_some()
        && matches!(breakeven, Some(b) if b.is_finite());

    if !scorable {
        return RankedRow {
            label: row.label.clone(),
            score: None,
            verdict: UNSCORED_PROMPT.to_string(),
            days_to_expiry: dte,
            breakeven,
            move_to_breakeven_pct: None,
            moneyness_pct: None,
        };
    }

    let u = underlying.unwrap();
    let be = breakeven.unwrap();
    let dte = dte.unwrap();
    let strike = row.strike.unwrap();

    let move_pct = (be - u) / u * 100.0;
    let money_pct = (strike - u) / u * 100.0;

    let mut score = 0;

    score += if dte < 0 {
        -100 // already expired
    } else if dte < 3 {
        -5
    } else if (7..=45).contains(&dte) {
        4
    } else {
        1
    };

    let delta = row.delta.unwrap_or(0.0);
    score += if (0.5..=0.7).contains(&delta) {
        4
    } else if (0.4..0.5).contains(&delta) || (delta > 0.7 && delta <= 0.8) {
        2
    } else if delta < 0.25 {
        -6
    } else {
        -2
    };

    score += if (-5.0..=2.0).contains(&money_pct) {
        3
    } else if (-10.0..=5.0).contains(&money_pct) {
        1
    } else if money_pct > 5.0 {
        -3
    } else {
        -1
    };

    score += if move_pct <= 2.0 {
        3
    } else if move_pct <= 5.0 {
        1
    } else {
        -2
    };

    let theta = row.theta.unwrap_or(0.0);
    score += if theta > -0.05 {
        2
    } else if theta < -0.1 {
        -2
    } else {
        0
    };

    if let Some(raw) = row.chance_of_profit {
        let chance = if raw > 1.0 { raw / 100.0 } else { raw };
        score += if chance >= 0.45 {
            2
        } else if chance < 0.2 {
            -2
        } else {
            0
        };
    }

    RankedRow {
        label: row.label.clone(),
        score: Some(score),
        verdict: verdict_for(score).to_string(),
        days_to_expiry: Some(dte),
        breakeven: Some(be),
        move_to_breakeven_pct: Some(move_pct),
        moneyness_pct: Some(money_pct),
    }
}

/// Rank candidate contracts best-to-worst for clean compounding.
/// Unscored rows sort last; their relative order is preserved.
pub fn rank(request: &PickerRequest) -> Vec<RankedRow> {
    let as_of = request
        .as_of
        .unwrap_or_else(|| Local::now().date_naive());

    let mut ranked: Vec<RankedRow> = request
        .rows
        .iter()
        .map(|row| score_row(request.underlying_price, as_of, row))
        .collect();

    ranked.sort_by(|a, b| match (a.score, b.score) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn request(rows: Vec<PickerRow>) -> PickerRequest {
        PickerRequest {
            underlying_price: Some(100.0),
            as_of: Some(date("2025-12-01")),
            rows,
        }
    }

    fn atm_call() -> PickerRow {
        PickerRow {
            label: "100C".to_string(),
            expiration: Some(date("2025-12-31")),
            strike: Some(100.0),
            ask: Some(2.0),
            delta: Some(0.6),
            theta: Some(-0.03),
            breakeven: None,
            chance_of_profit: None,
        }
    }

    #[test]
    fn test_atm_call_is_cleanest_choice() {
        let ranked = rank(&request(vec![atm_call()]));
        let row = &ranked[0];
        // dte 30 (+4), delta 0.6 (+4), moneyness 0 (+3), 2% to breakeven (+3),
        // theta -0.03 (+2)
        assert_eq!(row.score, Some(16));
        assert_eq!(row.verdict, "Cleanest choice");
        assert_eq!(row.days_to_expiry, Some(30));
        assert_eq!(row.breakeven, Some(102.0));
        assert_eq!(row.move_to_breakeven_pct, Some(2.0));
        assert_eq!(row.moneyness_pct, Some(0.0));
    }

    #[test]
    fn test_expired_row_scores_as_lottery() {
        let mut row = atm_call();
        row.label = "expired".to_string();
        row.expiration = Some(date("2025-11-30"));
        let ranked = rank(&request(vec![row]));
        assert!(ranked[0].score.unwrap() <= -5);
        assert_eq!(ranked[0].verdict, "Very risky / lottery ticket");
    }

    #[test]
    fn test_missing_strike_is_unscored_and_sorts_last() {
        let mut broken = atm_call();
        broken.label = "no-strike".to_string();
        broken.strike = None;

        let ranked = rank(&request(vec![broken, atm_call()]));
        assert_eq!(ranked[0].label, "100C");
        assert!(ranked[0].score.is_some());
        assert_eq!(ranked[1].label, "no-strike");
        assert_eq!(ranked[1].score, None);
        assert_eq!(ranked[1].verdict, UNSCORED_PROMPT);
    }

    #[test]
    fn test_unscored_rows_keep_relative_order() {
        let mut first = atm_call();
        first.label = "a".to_string();
        first.ask = None;
        let mut second = atm_call();
        second.label = "b".to_string();
        second.expiration = None;

        let ranked = rank(&request(vec![first, second]));
        assert_eq!(ranked[0].label, "a");
        assert_eq!(ranked[1].label, "b");
    }

    #[test]
    fn test_breakeven_override_wins() {
        let mut row = atm_call();
        row.breakeven = Some(104.0);
        let ranked = rank(&request(vec![row]));
        assert_eq!(ranked[0].breakeven, Some(104.0));
        assert_eq!(ranked[0].move_to_breakeven_pct, Some(4.0));
    }

    #[test]
    fn test_chance_of_profit_accepts_percent_or_fraction() {
        let mut as_pct = atm_call();
        as_pct.chance_of_profit = Some(50.0);
        let mut as_frac = atm_call();
        as_frac.chance_of_profit = Some(0.5);

        let a = rank(&request(vec![as_pct]));
        let b = rank(&request(vec![as_frac]));
        assert_eq!(a[0].score, Some(18));
        assert_eq!(a[0].score, b[0].score);

        let mut slim = atm_call();
        slim.chance_of_profit = Some(0.1);
        let c = rank(&request(vec![slim]));
        assert_eq!(c[0].score, Some(14));
    }

    #[test]
    fn test_far_otm_thin_delta_penalized() {
        let row = PickerRow {
            label: "far-otm".to_string(),
            expiration: Some(date("2025-12-31")),
            strike: Some(120.0),
            ask: Some(0.5),
            delta: Some(0.1),
            theta: Some(-0.2),
            breakeven: None,
            chance_of_profit: None,
        };
        let ranked = rank(&request(vec![row]));
        // dte +4, delta -6, moneyness +20% -3, move 20.5% -2, theta -2
        assert_eq!(ranked[0].score, Some(-9));
        assert_eq!(ranked[0].verdict, "Very risky / lottery ticket");
    }

    #[test]
    fn test_sorted_descending_by_score() {
        let mut weekly = atm_call();
        weekly.label = "weekly".to_string();
        weekly.expiration = Some(date("2025-12-02")); // dte 1 -> -5

        let ranked = rank(&request(vec![weekly, atm_call()]));
        assert_eq!(ranked[0].label, "100C");
        assert!(ranked[0].score.unwrap() > ranked[1].score.unwrap());
    }

    #[test]
    fn test_idempotent() {
        let req = request(vec![atm_call()]);
        assert_eq!(rank(&req), rank(&req));
    }
}
