use super::option_risk::OptionSide;
use serde::{Deserialize, Serialize};

/// Inputs for the max-gain projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxGainInput {
    pub side: OptionSide,
    /// Hit-bar high (calls) or low (puts)
    pub hit_price: f64,
    pub entry_price: f64,
    /// Max-growth-D7 percentage; 4 when not supplied
    pub max_growth_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaxGainReport {
    pub target: f64,
    pub edge_from_hit_pct: f64,
    pub edge_from_entry_pct: f64,
    /// How far entry already chased (positive) or dipped (negative) vs hit
    pub early_move_pct: f64,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Project the model target and the edge left from the current entry.
/// Both prices must be positive; otherwise everything stays zero.
pub fn project(input: &MaxGainInput) -> MaxGainReport {
    let mg = if input.max_growth_pct != 0.0 {
        input.max_growth_pct
    } else {
        4.0
    };
    let hit = input.hit_price;
    let entry = input.entry_price;

    if !(hit > 0.0) || !(entry > 0.0) {
        return MaxGainReport::default();
    }

    let (target, edge_from_hit, edge_from_entry) = match input.side {
        OptionSide::Call => {
            let target = hit * (1.0 + mg / 100.0);
            (
                target,
                (target / hit - 1.0) * 100.0,
                (target / entry - 1.0) * 100.0,
            )
        }
        OptionSide::Put => {
            let target = hit * (1.0 - mg / 100.0);
            (
                target,
                (hit / target - 1.0) * 100.0,
                (entry / target - 1.0) * 100.0,
            )
        }
    };

    MaxGainReport {
        target: finite_or_zero(target),
        edge_from_hit_pct: finite_or_zero(edge_from_hit),
        edge_from_entry_pct: finite_or_zero(edge_from_entry),
        early_move_pct: finite_or_zero((entry / hit - 1.0) * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_at_hit_price() {
        let report = project(&MaxGainInput {
            side: OptionSide::Call,
            hit_price: 25.0,
            entry_price: 25.0,
            max_growth_pct: 4.0,
        });
        assert_eq!(report.target, 26.0);
        assert!((report.edge_from_hit_pct - 4.0).abs() < 1e-9);
        assert!((report.edge_from_entry_pct - 4.0).abs() < 1e-9);
        assert_eq!(report.early_move_pct, 0.0);
    }

    #[test]
    fn test_call_after_chase() {
        // Entered 2% above the hit bar: less edge left
        let report = project(&MaxGainInput {
            side: OptionSide::Call,
            hit_price: 25.0,
            entry_price: 25.5,
            max_growth_pct: 4.0,
        });
        assert!((report.edge_from_entry_pct - (26.0 / 25.5 - 1.0) * 100.0).abs() < 1e-9);
        assert!((report.early_move_pct - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_put_target_below_hit() {
        let report = project(&MaxGainInput {
            side: OptionSide::Put,
            hit_price: 25.0,
            entry_price: 25.0,
            max_growth_pct: 4.0,
        });
        assert_eq!(report.target, 24.0);
        assert!((report.edge_from_hit_pct - (25.0 / 24.0 - 1.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_growth_defaults_to_four_percent() {
        let report = project(&MaxGainInput {
            side: OptionSide::Call,
            hit_price: 100.0,
            entry_price: 100.0,
            max_growth_pct: 0.0,
        });
        assert_eq!(report.target, 104.0);
    }

    #[test]
    fn test_missing_prices_stay_zero() {
        let report = project(&MaxGainInput {
            side: OptionSide::Call,
            hit_price: 0.0,
            entry_price: 25.0,
            max_growth_pct: 4.0,
        });
        assert_eq!(report, MaxGainReport::default());
    }

    #[test]
    fn test_full_discount_put_does_not_divide_by_zero() {
        let report = project(&MaxGainInput {
            side: OptionSide::Put,
            hit_price: 25.0,
            entry_price: 25.0,
            max_growth_pct: 100.0,
        });
        assert_eq!(report.target, 0.0);
        assert_eq!(report.edge_from_hit_pct, 0.0);
    }
}
