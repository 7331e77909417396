use serde::{Deserialize, Serialize};

/// Contract side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    #[default]
    #[serde(alias = "CALL")]
    Call,
    #[serde(alias = "PUT")]
    Put,
}

/// Market data for a single option contract, as entered on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionContractInput {
    pub underlying_price: f64,
    pub strike: f64,
    pub premium: f64,
    pub side: OptionSide,
    pub days_to_expiry: f64,
    pub implied_vol_pct: f64,
    pub bid: f64,
    pub ask: f64,
    pub bid_size: f64,
    pub ask_size: f64,
    pub open_interest: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    #[serde(rename = "Low risk")]
    Low,
    #[serde(rename = "Medium risk")]
    Medium,
    #[serde(rename = "High risk")]
    High,
    #[serde(rename = "—")]
    Unrated,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low risk",
            RiskTier::Medium => "Medium risk",
            RiskTier::High => "High risk",
            RiskTier::Unrated => "—",
        }
    }
}

/// One itemized reason line on the risk card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reason {
    pub label: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionRiskReport {
    /// 0..=100, higher is riskier
    pub score: u32,
    pub tier: RiskTier,
    pub decision: String,
    pub reasons: Vec<Reason>,
}

const PROMPT: &str = "Fill the fields to evaluate this contract.";

fn clamp01(v: f64) -> f64 {
    v.max(0.0).min(1.0)
}

/// Score a contract: 0 = clean, 100 = built against you.
/// Price, strike and premium must all be positive; anything else degrades
/// to an unrated report rather than an error.
pub fn score_contract(input: &OptionContractInput) -> OptionRiskReport {
    let p = input.underlying_price;
    let strike = input.strike;
    let premium = input.premium;

    if !(p > 0.0) || !(strike > 0.0) || !(premium > 0.0) {
        return OptionRiskReport {
            score: 0,
            tier: RiskTier::Unrated,
            decision: PROMPT.to_string(),
            reasons: Vec::new(),
        };
    }

    let breakeven = match input.side {
        OptionSide::Call => strike + premium,
        OptionSide::Put => strike - premium,
    };
    // Positive = price must move toward breakeven (up for calls, down for puts)
    let be_dist_pct = match input.side {
        OptionSide::Call => (breakeven - p) / p * 100.0,
        OptionSide::Put => (p - breakeven) / p * 100.0,
    };

    let spread = if input.ask > 0.0 && input.bid >= 0.0 {
        (input.ask - input.bid) / input.ask
    } else {
        0.5
    };

    let be_risk = clamp01((be_dist_pct - 5.0) / 25.0);
    let time_risk = clamp01((21.0 - input.days_to_expiry) / 21.0);
    let iv_risk = clamp01((input.implied_vol_pct - 60.0) / 140.0);
    let illiquid = if input.bid_size + input.ask_size < 200.0 || input.open_interest < 500.0 {
        1.0
    } else {
        0.0
    };
    let spread_risk = clamp01((spread - 0.15) / 0.25);
    let liq_risk = clamp01(0.6 * spread_risk + 0.4 * illiquid);
    let delta_risk = clamp01((0.35 - input.delta.abs()) / 0.35);

    let risk = 0.3 * be_risk + 0.2 * time_risk + 0.2 * iv_risk + 0.2 * liq_risk + 0.1 * delta_risk;
    let score = (risk * 100.0).round() as u32;

    let tier = if score < 35 {
        RiskTier::Low
    } else if score < 70 {
        RiskTier::Medium
    } else {
        RiskTier::High
    };

    let decision = if score <= 25 {
        "Safer choice. Contract looks reasonable; normal planned size can be OK if the thesis makes sense."
    } else if score <= 45 {
        "OK, smaller size. A few warnings. Use less size than usual."
    } else if score <= 65 {
        "Risky. Only small, tightly managed size."
    } else if score <= 85 {
        "Very risky. Treat as lotto; only what you can fully lose."
    } else {
        "Skip. Contract is built poorly; look for a cleaner one."
    };

    let be_comment = if be_dist_pct <= 10.0 {
        "easy to reach vs many contracts (safer)."
    } else if be_dist_pct <= 25.0 {
        "doable but needs a solid move."
    } else {
        "a big jump; very aggressive."
    };

    let time_comment = if input.days_to_expiry >= 21.0 {
        "plenty of time; lowers risk."
    } else if input.days_to_expiry >= 10.0 {
        "some time left; moderate."
    } else {
        "very little time; aggressive."
    };

    let iv_comment = if input.implied_vol_pct <= 60.0 {
        "normal; price not overly pumped."
    } else if input.implied_vol_pct <= 120.0 {
        "elevated; be more selective."
    } else {
        "very high; premium can decay fast."
    };

    let spread_pct = spread * 100.0;
    let liq_comment = if spread_pct <= 10.0 && input.open_interest >= 500.0 {
        "easy fills; healthy."
    } else if spread_pct <= 25.0 && input.open_interest >= 100.0 {
        "tradable but expect some slippage."
    } else {
        "thin/wide; slippage risk is real."
    };

    let delta_comment = if input.delta.abs() >= 0.55 {
        "moves strongly with stock."
    } else if input.delta.abs() >= 0.3 {
        "balanced responsiveness."
    } else {
        "barely reacts; more lotto-style."
    };

    let reasons = vec![
        Reason {
            label: "Break-even distance",
            detail: format!(
                "Needs ~{be_dist_pct:.1}% move just to break even — {be_comment}"
            ),
        },
        Reason {
            label: "Time remaining",
            detail: format!(
                "{:.0} day(s) to expiry — {time_comment}",
                input.days_to_expiry
            ),
        },
        Reason {
            label: "Contract cost (IV)",
            detail: format!(
                "~{:.0}% implied vol — {iv_comment}",
                input.implied_vol_pct
            ),
        },
        Reason {
            label: "Liquidity",
            detail: format!(
                "Spread ~{spread_pct:.1}% with OI {:.0} — {liq_comment}",
                input.open_interest
            ),
        },
        Reason {
            label: "Delta",
            detail: format!("{:.2} — {delta_comment}", input.delta),
        },
    ];

    OptionRiskReport {
        score,
        tier,
        decision: decision.to_string(),
        reasons,
    }
}
