//! Display formatting for dashboard numbers.

/// Parse a user-entered number, tolerating `$`, commas, `%` and whitespace.
/// Returns 0.0 when nothing parseable remains.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Format a metric value with 3 decimals, em dash when missing.
pub fn fmt_metric(v: Option<f64>) -> String {
    match v {
        Some(n) if n.is_finite() => format!("{n:.3}"),
        _ => "—".to_string(),
    }
}

/// Format a 0..1 fraction as a percentage with 1 decimal.
pub fn fmt_percent(v: Option<f64>) -> String {
    match v {
        Some(n) if n.is_finite() => format!("{:.1}%", n * 100.0),
        _ => "—".to_string(),
    }
}

/// Format an `a / b` pair, collapsing to a single dash when both are missing.
pub fn fmt_pair(a: Option<f64>, b: Option<f64>, as_percent: bool) -> String {
    let one = |v| if as_percent { fmt_percent(v) } else { fmt_metric(v) };
    let (va, vb) = (one(a), one(b));
    if va == "—" && vb == "—" {
        "—".to_string()
    } else {
        format!("{va} / {vb}")
    }
}

/// Signed percentage with explicit plus, 2 decimals.
pub fn fmt_signed_pct(v: f64) -> String {
    format!("{}{:.2}%", if v >= 0.0 { "+" } else { "" }, v)
}

/// Dollar price with 2 decimals; negative zero collapses to zero.
pub fn fmt_price(v: f64) -> String {
    if !v.is_finite() {
        return "--".to_string();
    }
    let s = format!("{v:.2}");
    let s = if s == "-0.00" { "0.00".to_string() } else { s };
    format!("${s}")
}
