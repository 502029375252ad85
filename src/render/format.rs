//! Display formatting for numeric cells.

/// Format an effect size or p-value for display.
///
/// - missing/non-finite: empty string
/// - `|x| < 1e-3` or `|x| >= 1e4`: exponential with two fraction digits (`1.23e-5`, `4.50e+4`)
/// - otherwise: up to six fraction digits, trailing zeros trimmed
pub fn format_number(x: f64) -> String {
    if !x.is_finite() {
        return String::new();
    }
    // Avoid "-0.00e+0".
    let x = if x == 0.0 { 0.0 } else { x };
    let abs = x.abs();
    if abs < 1e-3 || abs >= 1e4 {
        format_exponential(x)
    } else {
        let fixed = format!("{x:.6}");
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn format_exponential(x: f64) -> String {
    let raw = format!("{x:.2e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
        None => raw,
    }
}

/// Format a sample size; unknown sizes are blank.
pub fn format_count(n: Option<u64>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}
