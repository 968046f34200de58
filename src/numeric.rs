use lazy_static::lazy_static;
use regex::Regex;

/// Parses the leading decimal number of `raw`, ignoring whatever follows it.
///
/// `"4.5kg"` gives `4.5`, `"-"` and `""` give `None`. Catalog cells and form
/// inputs are free text, so a strict `str::parse` would reject values that
/// are perfectly readable.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    lazy_static! {
        static ref LEADING_NUMBER_RE: Regex =
            Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap();
    }
    let caps = LEADING_NUMBER_RE.captures(raw)?;
    caps.get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Digits inspected past the requested precision to detect an exact half.
const TIE_DIGITS: usize = 30;

/// Formats with a fixed number of decimals, rounding exact halves away from zero.
///
/// Only the stored binary value counts: `57.05` is held as `57.0499...` and
/// therefore formats as `"57.0"` at one decimal.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let expanded = format!("{:.*}", digits + TIE_DIGITS, value.abs());
    let tail = &expanded[expanded.len() - TIE_DIGITS..];
    if tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0') {
        let scale = 10f64.powi(digits as i32);
        let up = ((value.abs() * scale).trunc() + 1.0) / scale;
        return format!("{:.*}", digits, up.copysign(value));
    }
    format!("{:.*}", digits, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leading_numbers() {
        assert_eq!(parse_leading_number("85"), Some(85.0));
        assert_eq!(parse_leading_number(" 4.5kg"), Some(4.5));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("1e2"), Some(100.0));
        assert_eq!(parse_leading_number("-3"), Some(-3.0));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number("kg4"), None);
    }

    #[test]
    fn to_fixed_rounds_halves_away_from_zero() {
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(160.5, 0), "161");
        assert_eq!(to_fixed(197.98989, 1), "198.0");
        assert_eq!(to_fixed(160.0, 0), "160");
        assert_eq!(to_fixed(-2.5, 0), "-3");
    }

    #[test]
    fn to_fixed_rounds_the_stored_value_not_its_decimal_literal() {
        assert_eq!(to_fixed(0.15, 1), "0.1");
        assert_eq!(to_fixed(81.5 * 70.0 / 100.0, 1), "57.0");
        assert_eq!(to_fixed(71.5 * 70.0 / 100.0, 1), "50.0");
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }
}
