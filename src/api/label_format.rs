/// Formats a magnitude with metric-style suffixes (K, M, B, T, Q).
///
/// `precision` bounds the number of fractional digits; trailing zeros are
/// trimmed, so `1230.0` with precision 2 renders as `"1.23K"` and `999.0` as
/// `"999"`. NaN renders as an empty string.
#[must_use]
pub fn human_readable(num: f64, precision: usize) -> String {
    if num.is_nan() {
        return String::new();
    }

    const SUFFIXES: [&str; 6] = ["", "K", "M", "B", "T", "Q"];

    let sign = if num.is_sign_negative() { "-" } else { "" };
    let mut magnitude = num.abs();
    let mut tier = 0;
    while magnitude >= 1000.0 && tier < SUFFIXES.len() - 1 {
        magnitude /= 1000.0;
        tier += 1;
    }

    let scale = 10_f64.powi(precision as i32);
    let rounded = (magnitude * scale).round() / scale;
    // Rounding can push a value back over the threshold (999.999 -> 1000).
    if rounded >= 1000.0 && tier < SUFFIXES.len() - 1 {
        return format!("{sign}1{}", SUFFIXES[tier + 1]);
    }

    format!("{sign}{rounded}{}", SUFFIXES[tier])
}
