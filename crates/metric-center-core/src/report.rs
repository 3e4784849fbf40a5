//! Result reporting
//!
//! The text form is two lines, the point and then its radius:
//!
//! ```text
//! 0 (0.0000,0.0000)
//! 1.0000
//! ```
//!
//! Numbers carry five significant digits, see [`format_significant`].

use crate::candidate::CandidateResult;
use crate::error::{Error, Result};
use crate::point::PointSet;
use serde::Serialize;
use std::fmt;

/// Significant digits used for every number in the text report
pub const SIGNIFICANT_DIGITS: usize = 5;

/// How a report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Two-line human readable form
    #[default]
    Text,
    /// One JSON object
    Json,
}

/// The metric center with its coordinates and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Report {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Report {
    /// Look up the winning point of `result` in `points`
    pub fn new(result: &CandidateResult, points: &PointSet) -> Result<Self> {
        let point = points.get(result.point_index).ok_or(Error::IndexOutOfRange {
            index: result.point_index,
            len: points.len(),
        })?;
        Ok(Self {
            index: result.point_index,
            x: point.x,
            y: point.y,
            radius: result.radius,
        })
    }

    /// Serialize as a JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Render in `format`
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => self.to_json(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({},{})\n{}",
            self.index,
            format_significant(self.x, SIGNIFICANT_DIGITS),
            format_significant(self.y, SIGNIFICANT_DIGITS),
            format_significant(self.radius, SIGNIFICANT_DIGITS)
        )
    }
}

/// Text report for `result`
pub fn report(result: &CandidateResult, points: &PointSet) -> Result<String> {
    Report::new(result, points).map(|report| report.to_string())
}

/// Format `value` with `digits` significant digits, `%g` style
///
/// The value is rounded half-up on its exact binary expansion, so a tie
/// such as `10000.5` goes away from zero. Values whose rounded magnitude
/// lies in `[1e-4, 10^digits)` are written in plain decimal notation,
/// everything else as `d.dddde±XX`. Trailing zeros are kept.
///
/// ```
/// use metric_center_core::report::format_significant;
///
/// assert_eq!(format_significant(1.0, 5), "1.0000");
/// assert_eq!(format_significant(123456.0, 5), "1.2346e+05");
/// assert_eq!(format_significant(0.000012345, 5), "1.2345e-05");
/// ```
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);

    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits - 1, value);
    }

    let Some((mantissa, exponent)) = round_half_up(value.abs(), digits) else {
        return format!("{:.*e}", digits - 1, value);
    };
    let sign = if value < 0.0 { "-" } else { "" };

    if (-4..digits as i32).contains(&exponent) {
        format!("{sign}{}", plain_notation(&mantissa, exponent))
    } else {
        let (lead, rest) = mantissa.split_at(1);
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let point = if rest.is_empty() { "" } else { "." };
        format!("{sign}{lead}{point}{rest}e{exp_sign}{:02}", exponent.unsigned_abs())
    }
}

/// Largest number of significant digits in the exact expansion of an `f64`
const EXACT_DIGITS: usize = 800;

/// First `digits` significant digits of `magnitude` after half-up rounding,
/// with the decimal exponent of the leading digit
fn round_half_up(magnitude: f64, digits: usize) -> Option<(String, i32)> {
    let exact = format!("{:.*e}", EXACT_DIGITS, magnitude);
    let (mantissa, exponent) = exact.split_once('e')?;
    let mut exponent: i32 = exponent.parse().ok()?;

    let all: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    let mut kept = all.get(..digits)?.to_vec();

    if all.get(digits).is_some_and(|&next| next >= b'5') {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            // 9.99.. rounded into the next power of ten
            kept.insert(0, b'1');
            kept.truncate(digits);
            exponent += 1;
        }
    }

    String::from_utf8(kept).ok().map(|kept| (kept, exponent))
}

/// Place the decimal point in `mantissa`, whose first digit has weight
/// `10^exponent`
fn plain_notation(mantissa: &str, exponent: i32) -> String {
    if exponent < 0 {
        let zeros = "0".repeat(exponent.unsigned_abs() as usize - 1);
        return format!("0.{zeros}{mantissa}");
    }

    let (integer, fraction) = mantissa.split_at((exponent as usize + 1).min(mantissa.len()));
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn test_decimal_range() {
        assert_eq!(format_significant(1.0, 5), "1.0000");
        assert_eq!(format_significant(2f64.sqrt(), 5), "1.4142");
        assert_eq!(format_significant(-3.25, 5), "-3.2500");
        assert_eq!(format_significant(12.5, 5), "12.500");
        assert_eq!(format_significant(99999.0, 5), "99999");
        assert_eq!(format_significant(0.00012345, 5), "0.00012345");
    }

    #[test]
    fn test_scientific_range() {
        assert_eq!(format_significant(123456.0, 5), "1.2346e+05");
        assert_eq!(format_significant(99999.7, 5), "1.0000e+05");
        assert_eq!(format_significant(0.000012345, 5), "1.2345e-05");
        assert_eq!(format_significant(-2.5e-7, 5), "-2.5000e-07");
        assert_eq!(format_significant(1e100, 5), "1.0000e+100");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_significant(0.0, 5), "0.0000");
        assert_eq!(format_significant(f64::NAN, 5), "NaN");
        assert_eq!(format_significant(f64::INFINITY, 5), "Infinity");
        assert_eq!(format_significant(f64::NEG_INFINITY, 5), "-Infinity");
    }

    #[test]
    fn test_other_precisions() {
        assert_eq!(format_significant(3.14159, 3), "3.14");
        assert_eq!(format_significant(1234.0, 3), "1.23e+03");
        assert_eq!(format_significant(7.0, 0), "7");
    }

    #[test]
    fn test_ties_round_half_up() {
        assert_eq!(format_significant(10000.5, 5), "10001");
        assert_eq!(format_significant(1.03125, 5), "1.0313");
        assert_eq!(format_significant(-1.03125, 5), "-1.0313");
        assert_eq!(format_significant(0.5, 0), "0.5");
        assert_eq!(format_significant(2.5, 1), "3");
        assert_eq!(format_significant(123455.0, 5), "1.2346e+05");
    }

    #[test]
    fn test_rounding_carries_into_next_power() {
        assert_eq!(format_significant(99999.5, 5), "1.0000e+05");
        assert_eq!(format_significant(9.96875, 2), "10");
        assert_eq!(format_significant(99.5, 2), "1.0e+02");
        assert_eq!(format_significant(0.000099999999, 5), "0.00010000");
    }

    #[test]
    fn test_text_report() {
        let points = PointSet::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]).unwrap();
        let text = report(&CandidateResult::new(0, 1.0), &points).unwrap();
        assert_eq!(text, "0 (0.0000,0.0000)\n1.0000");
    }

    #[test]
    fn test_json_report() {
        let points = PointSet::new(vec![Point::new(0.5, -2.0), Point::new(1.0, 0.0)]).unwrap();
        let report = Report::new(&CandidateResult::new(0, 2.0615528128088303), &points).unwrap();

        let json: serde_json::Value = serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["index"], 0);
        assert_eq!(json["x"], 0.5);
        assert_eq!(json["y"], -2.0);
        assert_eq!(json["radius"], 2.0615528128088303);
    }

    #[test]
    fn test_unknown_index() {
        let points = PointSet::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).unwrap();
        assert!(matches!(
            Report::new(&CandidateResult::new(5, 1.0), &points),
            Err(Error::IndexOutOfRange { index: 5, len: 2 })
        ));
    }
}
