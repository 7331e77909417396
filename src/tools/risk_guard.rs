use serde::{Deserialize, Serialize};

/// How much risk the trader has opted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskMode {
    #[default]
    Low,
    Medium,
    High,
}

/// Basic fundamentals/liquidity figures for one stock.
/// Missing or zero fields degrade to neutral contributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskGuardInput {
    pub market_cap: f64,
    /// Signed; negative means unprofitable
    pub pe: f64,
    pub dividend_yield_pct: f64,
    pub avg_volume: f64,
    pub volume: f64,
    pub week52_high: f64,
    pub week52_low: f64,
    pub current_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Safe,
    Caution,
    Avoid,
}

/// Cautionary note, shown with a click-to-expand explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardNote {
    GoodLiquidity,
    OkLiquidity,
    WeakIntradayVolume,
    SmallCap,
    LargeCapStability,
    ReasonablePe,
    VeryHighPe,
    Unprofitable,
    Near52wLow,
    Near52wHigh,
}

impl GuardNote {
    pub fn label(&self) -> &'static str {
        match self {
            GuardNote::GoodLiquidity => "Good liquidity: active vs average",
            GuardNote::OkLiquidity => "OK liquidity",
            GuardNote::WeakIntradayVolume => "Weak intraday volume vs average",
            GuardNote::SmallCap => "Small cap: treat as speculative",
            GuardNote::LargeCapStability => "Large cap stability",
            GuardNote::ReasonablePe => "Reasonable P/E",
            GuardNote::VeryHighPe => "Very high P/E (priced for perfection)",
            GuardNote::Unprofitable => "Unprofitable: speculative",
            GuardNote::Near52wLow => "Near 52w low: could be value or broken; confirm trend",
            GuardNote::Near52wHigh => "Near 52w high: momentum zone",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            GuardNote::GoodLiquidity => {
                "Stock usually trades solid volume and today is active. Easier fills."
            }
            GuardNote::OkLiquidity => {
                "Tradable, but don't oversize. Spread/liquidity are acceptable."
            }
            GuardNote::WeakIntradayVolume => {
                "Today is quieter than normal. Consider smaller size."
            }
            GuardNote::SmallCap => {
                "Smaller company; price can move faster and react to news."
            }
            GuardNote::LargeCapStability => {
                "Bigger company; usually more stable and harder to manipulate."
            }
            GuardNote::ReasonablePe => {
                "Price vs. earnings looks normal; nothing wild at first glance."
            }
            GuardNote::VeryHighPe => {
                "Priced for big growth; disappointments can hit hard."
            }
            GuardNote::Unprofitable => "Losing money; more story-driven and volatile.",
            GuardNote::Near52wLow => {
                "Close to yearly low; check chart/news whether it's basing or breaking."
            }
            GuardNote::Near52wHigh => {
                "Close to yearly high; momentum strong but pullbacks can be sharp."
            }
        }
    }
}

/// Hard block: the stock fails the mode outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardFlag {
    ThinVolume,
    MicroCap,
    NegativeEarningsLowMode,
    ExtremeDividendYield,
}

impl GuardFlag {
    pub fn label(&self) -> &'static str {
        match self {
            GuardFlag::ThinVolume => "Very low average volume (<150k)",
            GuardFlag::MicroCap => "Micro-cap < $100M (very high risk)",
            GuardFlag::NegativeEarningsLowMode => "Negative earnings in Low Risk mode",
            GuardFlag::ExtremeDividendYield => "Extreme dividend yield (>10%)",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            GuardFlag::ThinVolume => {
                "Thinly traded; hard to get in/out without moving price."
            }
            GuardFlag::MicroCap => "Tiny company; moves fast and is easier to manipulate.",
            GuardFlag::NegativeEarningsLowMode => "Low-risk mode prefers profitable companies.",
            GuardFlag::ExtremeDividendYield => {
                "Very high yield can be a stress signal, not a free lunch."
            }
        }
    }
}

/// Label + expanded explanation, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteLine {
    pub label: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskGuardReport {
    pub score: i32,
    pub verdict: Verdict,
    pub liquidity_ratio: f64,
    pub notes: Vec<NoteLine>,
    pub red_flags: Vec<NoteLine>,
}

/// Additive pre-filter: does this stock fit the selected risk mode?
pub fn evaluate(input: &RiskGuardInput, mode: RiskMode) -> RiskGuardReport {
    let mut score: i32 = 0;
    let mut notes: Vec<GuardNote> = Vec::new();
    let mut red_flags: Vec<GuardFlag> = Vec::new();

    let liquidity_ratio = if input.avg_volume > 0.0 {
        input.volume / input.avg_volume
    } else {
        0.0
    };

    if input.avg_volume < 150_000.0 {
        red_flags.push(GuardFlag::ThinVolume);
        score -= 3;
    } else if input.avg_volume >= 1_000_000.0 && liquidity_ratio >= 0.15 {
        score += 2;
        notes.push(GuardNote::GoodLiquidity);
    } else if input.avg_volume >= 300_000.0 && liquidity_ratio >= 0.1 {
        score += 1;
        notes.push(GuardNote::OkLiquidity);
    } else {
        score -= 1;
        notes.push(GuardNote::WeakIntradayVolume);
    }

    if input.market_cap < 100_000_000.0 {
        red_flags.push(GuardFlag::MicroCap);
        score -= 3;
    } else if input.market_cap < 300_000_000.0 {
        score -= 1;
        notes.push(GuardNote::SmallCap);
    } else if input.market_cap >= 5_000_000_000.0 {
        score += 2;
        notes.push(GuardNote::LargeCapStability);
    } else if input.market_cap >= 1_000_000_000.0 {
        score += 1;
    }

    if input.pe > 0.0 {
        if input.pe >= 5.0 && input.pe <= 40.0 {
            score += 1;
            notes.push(GuardNote::ReasonablePe);
        } else if input.pe > 80.0 {
            score -= 1;
            notes.push(GuardNote::VeryHighPe);
        }
    } else if input.pe < 0.0 {
        if mode == RiskMode::Low {
            red_flags.push(GuardFlag::NegativeEarningsLowMode);
            score -= 2;
        } else {
            score -= 1;
            notes.push(GuardNote::Unprofitable);
        }
    }

    if input.dividend_yield_pct > 10.0 {
        red_flags.push(GuardFlag::ExtremeDividendYield);
        score -= 2;
    }

    if input.week52_high > input.week52_low && input.current_price > 0.0 {
        let pos = (input.current_price - input.week52_low)
            / (input.week52_high - input.week52_low);
        if pos < 0.05 {
            notes.push(GuardNote::Near52wLow);
        } else if pos > 0.95 {
            notes.push(GuardNote::Near52wHigh);
        }
    }

    let has_red = !red_flags.is_empty();
    let verdict = match mode {
        RiskMode::Low => {
            if has_red || score < 2 {
                Verdict::Avoid
            } else {
                Verdict::Safe
            }
        }
        RiskMode::Medium => {
            if has_red && score < 0 {
                Verdict::Avoid
            } else if score >= 1 {
                Verdict::Safe
            } else {
                Verdict::Caution
            }
        }
        RiskMode::High => {
            if has_red && score < -3 {
                Verdict::Avoid
            } else if score >= 0 {
                Verdict::Safe
            } else {
                Verdict::Caution
            }
        }
    };

    RiskGuardReport {
        score,
        verdict,
        liquidity_ratio,
        notes: notes
            .iter()
            .map(|n| NoteLine {
                label: n.label(),
                detail: n.explanation(),
            })
            .collect(),
        red_flags: red_flags
            .iter()
            .map(|f| NoteLine {
                label: f.label(),
                detail: f.explanation(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_small_cap() -> RiskGuardInput {
        RiskGuardInput {
            market_cap: 256_420_000.0,
            pe: -19.3,
            dividend_yield_pct: 0.0,
            avg_volume: 6_780_000.0,
            volume: 53_070.0,
            week52_high: 18.15,
            week52_low: 1.62,
            current_price: 8.22,
        }
    }

    #[test]
    fn test_quiet_small_cap_avoided_in_low_mode() {
        let report = evaluate(&quiet_small_cap(), RiskMode::Low);
        // weak intraday volume -1, small cap -1, negative earnings flag -2
        assert_eq!(report.score, -4);
        assert_eq!(report.verdict, Verdict::Avoid);
        assert_eq!(
            report.red_flags,
            vec![NoteLine {
                label: GuardFlag::NegativeEarningsLowMode.label(),
                detail: GuardFlag::NegativeEarningsLowMode.explanation(),
            }]
        );
        let labels: Vec<&str> = report.notes.iter().map(|n| n.label).collect();
        assert_eq!(
            labels,
            vec![
                "Weak intraday volume vs average",
                "Small cap: treat as speculative",
            ]
        );
        assert!((report.liquidity_ratio - 53_070.0 / 6_780_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_thin_volume_always_avoided_in_low_mode() {
        // Otherwise-perfect large cap: thin volume alone must dominate
        let input = RiskGuardInput {
            market_cap: 50_000_000_000.0,
            pe: 20.0,
            dividend_yield_pct: 1.0,
            avg_volume: 100_000.0,
            volume: 90_000.0,
            week52_high: 120.0,
            week52_low: 80.0,
            current_price: 100.0,
        };
        let report = evaluate(&input, RiskMode::Low);
        assert_eq!(report.verdict, Verdict::Avoid);
        assert!(report
            .red_flags
            .iter()
            .any(|f| f.label == GuardFlag::ThinVolume.label()));
    }

    #[test]
    fn test_healthy_large_cap_is_safe() {
        let input = RiskGuardInput {
            market_cap: 50_000_000_000.0,
            pe: 22.0,
            dividend_yield_pct: 1.5,
            avg_volume: 5_000_000.0,
            volume: 2_000_000.0,
            week52_high: 120.0,
            week52_low: 80.0,
            current_price: 100.0,
        };
        // good liquidity +2, large cap +2, reasonable P/E +1
        let report = evaluate(&input, RiskMode::Low);
        assert_eq!(report.score, 5);
        assert_eq!(report.verdict, Verdict::Safe);
        assert!(report.red_flags.is_empty());
    }

    #[test]
    fn test_medium_mode_verdict_table() {
        // score 0, no flags -> Caution
        let neutral = RiskGuardInput {
            market_cap: 2_000_000_000.0, // +1
            pe: 0.0,
            dividend_yield_pct: 0.0,
            avg_volume: 200_000.0, // weak intraday -1
            volume: 10_000.0,
            week52_high: 0.0,
            week52_low: 0.0,
            current_price: 0.0,
        };
        assert_eq!(evaluate(&neutral, RiskMode::Medium).verdict, Verdict::Caution);

        // flags plus negative score -> Avoid
        let blocked = RiskGuardInput {
            market_cap: 50_000_000.0,
            avg_volume: 200_000.0,
            volume: 1_000.0,
            ..Default::default()
        };
        assert_eq!(evaluate(&blocked, RiskMode::Medium).verdict, Verdict::Avoid);
    }

    #[test]
    fn test_high_mode_tolerates_flags_at_small_deficit() {
        // Micro-cap flag (-3) plus good liquidity (+2) -> score -1, not < -3
        let input = RiskGuardInput {
            market_cap: 50_000_000.0,
            pe: 0.0,
            dividend_yield_pct: 0.0,
            avg_volume: 2_000_000.0,
            volume: 500_000.0,
            week52_high: 0.0,
            week52_low: 0.0,
            current_price: 0.0,
        };
        let report = evaluate(&input, RiskMode::High);
        assert_eq!(report.score, -1);
        assert_eq!(report.verdict, Verdict::Caution);
    }

    #[test]
    fn test_52_week_position_notes() {
        let mut input = quiet_small_cap();
        input.current_price = 1.7; // pos ~0.005
        let report = evaluate(&input, RiskMode::High);
        assert!(report
            .notes
            .iter()
            .any(|n| n.label == GuardNote::Near52wLow.label()));

        input.current_price = 18.0; // pos ~0.99
        let report = evaluate(&input, RiskMode::High);
        assert!(report
            .notes
            .iter()
            .any(|n| n.label == GuardNote::Near52wHigh.label()));
    }

    #[test]
    fn test_extreme_dividend_yield_flags() {
        let mut input = quiet_small_cap();
        input.dividend_yield_pct = 12.0;
        let report = evaluate(&input, RiskMode::High);
        assert!(report
            .red_flags
            .iter()
            .any(|f| f.label == GuardFlag::ExtremeDividendYield.label()));
    }

    #[test]
    fn test_idempotent() {
        let input = quiet_small_cap();
        assert_eq!(
            evaluate(&input, RiskMode::Medium),
            evaluate(&input, RiskMode::Medium)
        );
    }
}
