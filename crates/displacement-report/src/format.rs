//! Locale-style number formatting
//!
//! Formatting rules are carried by an explicit [`NumberFormat`] value that
//! callers pass around.

use displacement_core::{Error, Result};

/// Fixed-precision decimal formatting with digit grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Digits after the decimal separator
    pub decimals: usize,
    pub decimal_separator: char,
    /// Separator inserted every three integer digits, if any
    pub grouping_separator: Option<char>,
}

impl Default for NumberFormat {
    /// Spanish convention: `1.234,5678`
    fn default() -> Self {
        Self {
            decimals: 4,
            decimal_separator: ',',
            grouping_separator: Some('.'),
        }
    }
}

impl NumberFormat {
    /// Plain `1234.5678` style
    pub fn plain(decimals: usize) -> Self {
        Self {
            decimals,
            decimal_separator: '.',
            grouping_separator: None,
        }
    }

    /// Format a real number with exactly `decimals` fractional digits
    ///
    /// Fails with [`Error::Render`] for NaN and infinities.
    pub fn format(&self, value: f64) -> Result<String> {
        if !value.is_finite() {
            return Err(Error::Render(format!("cannot format non-finite value {value}")));
        }

        let fixed = format!("{:.*}", self.decimals, value);
        let (sign, digits) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (integer, fraction) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (digits, None),
        };

        let mut out = String::with_capacity(fixed.len() + integer.len() / 3);
        out.push_str(sign);
        out.push_str(&self.group(integer));
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        Ok(out)
    }

    /// Format a count without a decimal point or grouping
    pub fn format_count(&self, value: usize) -> String {
        value.to_string()
    }

    fn group(&self, integer: &str) -> String {
        let Some(separator) = self.grouping_separator else {
            return integer.to_string();
        };
        let len = integer.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(separator);
            }
            out.push(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format(0.05).unwrap(), "0,0500");
        assert_eq!(fmt.format(-3.4975).unwrap(), "-3,4975");
        assert_eq!(fmt.format(1234.56789).unwrap(), "1.234,5679");
        assert_eq!(fmt.format(-1234567.0).unwrap(), "-1.234.567,0000");
        assert_eq!(fmt.format(100.0).unwrap(), "100,0000");
    }

    #[test]
    fn test_plain_format() {
        let fmt = NumberFormat::plain(2);
        assert_eq!(fmt.format(1234.5).unwrap(), "1234.50");
        assert_eq!(NumberFormat::plain(0).format(7.4).unwrap(), "7");
    }

    #[test]
    fn test_counts_have_no_decimal_point() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format_count(12), "12");
        assert_eq!(fmt.format_count(1500), "1500");
    }

    #[test]
    fn test_non_finite_is_render_error() {
        let fmt = NumberFormat::default();
        assert!(matches!(fmt.format(f64::NAN), Err(Error::Render(_))));
        assert!(matches!(fmt.format(f64::INFINITY), Err(Error::Render(_))));
    }
}
