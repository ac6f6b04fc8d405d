/// Reads one raw form field as a number.
///
/// Empty, non-numeric and non-finite text ("", "-", "NaN", "inf") all
/// yield `None`; callers treat that as "still typing", not as an error.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
