//! Display formatting for large magnitudes and money values.

const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;
const THOUSAND: f64 = 1e3;

/// Abbreviate `num` with the largest applicable unit (K, M, B), two decimals.
///
/// Thresholds compare the signed value, so negative numbers never pick up a
/// suffix: `-5_000.0` formats as `"-5000.00"`.
pub fn format_large_number(num: f64) -> String {
    if num >= BILLION {
        format!("{:.2}B", num / BILLION)
    } else if num >= MILLION {
        format!("{:.2}M", num / MILLION)
    } else if num >= THOUSAND {
        format!("{:.2}K", num / THOUSAND)
    } else {
        format!("{:.2}", num)
    }
}

/// `$1234.50`
pub fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}

/// Ratio to percent: `0.2534` → `"25.34%"`.
pub fn format_ratio_pct(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Signed percent change: `1.5` → `"+1.50%"`.
pub fn format_change_pct(pct: f64) -> String {
    format!("{:+.2}%", pct)
}
