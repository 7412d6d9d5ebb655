//! Significant-figure rounding shared by every source's output

use serde::{Serialize, Serializer};
use std::fmt;

/// Significant digits used for every displayed impact
pub const SIG_FIGS: usize = 3;

/// A displayed number: either formatted to significant digits or passed
/// through untouched (zero, NaN and infinities).
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Raw(f64),
    Rounded(String),
}

impl Figure {
    pub fn is_raw(&self) -> bool {
        matches!(self, Figure::Raw(_))
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Figure::Raw(v) => write!(f, "{}", v),
            Figure::Rounded(s) => f.write_str(s),
        }
    }
}

impl Serialize for Figure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Figure::Raw(v) => serializer.serialize_f64(*v),
            Figure::Rounded(s) => serializer.serialize_str(s),
        }
    }
}

/// Round `x` to `figs` significant digits using general (`%g`-style)
/// formatting. Zero and non-finite values are returned as-is.
pub fn round_to_sig_figs(x: f64, figs: usize) -> Figure {
    if x == 0.0 || !x.is_finite() {
        return Figure::Raw(x);
    }
    Figure::Rounded(format_general(x, figs))
}

/// Shorthand for [`round_to_sig_figs`] with [`SIG_FIGS`]
pub fn sig(x: f64) -> Figure {
    round_to_sig_figs(x, SIG_FIGS)
}

fn format_general(x: f64, figs: usize) -> String {
    let precision = figs.max(1);

    // The exponent must come from the already-rounded value: 999.7 at three
    // digits is 1.00e3, not 9.997e2.
    let scientific = format!("{:.*e}", precision - 1, x);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounded(x: f64) -> String {
        sig(x).to_string()
    }

    #[test]
    fn test_general_formatting() {
        assert_eq!(rounded(123456.0), "1.23e+05");
        assert_eq!(rounded(123.456), "123");
        assert_eq!(rounded(100.0), "100");
        assert_eq!(rounded(1234.0), "1.23e+03");
        assert_eq!(rounded(0.4), "0.4");
        assert_eq!(rounded(0.4 * 200.0 / 1000.0), "0.08");
        assert_eq!(rounded(0.000123456), "0.000123");
        assert_eq!(rounded(0.0000123456), "1.23e-05");
        assert_eq!(rounded(-2.71828), "-2.72");
    }

    #[test]
    fn test_rounding_can_bump_exponent() {
        assert_eq!(rounded(999.7), "1e+03");
        assert_eq!(rounded(9.9999), "10");
    }

    #[test]
    fn test_zero_and_nan_pass_through() {
        assert_eq!(sig(0.0), Figure::Raw(0.0));
        assert_eq!(sig(0.0).to_string(), "0");
        match sig(f64::NAN) {
            Figure::Raw(v) => assert!(v.is_nan()),
            other => panic!("NaN must not be formatted, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_precision() {
        assert_eq!(round_to_sig_figs(3.14159, 5).to_string(), "3.1416");
        assert_eq!(round_to_sig_figs(3.14159, 1).to_string(), "3");
    }
}
