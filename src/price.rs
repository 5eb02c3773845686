// 💴 Price - Validated price input
// Only positive integers that fit the digit template are accepted

use std::fmt;
use thiserror::Error;

use crate::template::DigitTemplate;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("no price entered")]
    Empty,

    #[error("price must contain digits only, got {0:?}")]
    NotNumeric(String),

    #[error("price must be greater than zero")]
    NotPositive,

    #[error("price has {digits} digits, at most {max} are supported")]
    TooLarge { digits: usize, max: usize },
}

// ============================================================================
// PRICE
// ============================================================================

/// A positive integer price, stored as its digit-only representation
/// (no separators, no leading zeros).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Price {
    digits: String,
}

impl Price {
    /// Parse user input into a price.
    ///
    /// Leading zeros are dropped, so `"007"` becomes `7`.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(PriceError::NotNumeric(trimmed.to_string()));
        }

        let significant = trimmed.trim_start_matches('0');
        if significant.is_empty() {
            return Err(PriceError::NotPositive);
        }

        let max = DigitTemplate::standard().digit_slot_count();
        if significant.len() > max {
            return Err(PriceError::TooLarge {
                digits: significant.len(),
                max,
            });
        }

        Ok(Price {
            digits: significant.to_string(),
        })
    }

    /// Digit-only representation, most significant first
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    pub fn value(&self) -> u64 {
        // At most 10 ASCII digits, always fits
        self.digits
            .bytes()
            .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'))
    }

    /// Digits grouped by thousands: `1234567` → `1,234,567`
    pub fn grouped(&self) -> String {
        let len = self.digits.len();
        let mut out = String::with_capacity(len + len / 3);

        for (i, c) in self.digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }

        out
    }

    /// Number of thousands separators the grouped form carries
    pub fn separator_count(&self) -> usize {
        (self.digits.len() - 1) / 3
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Price::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_price() {
        let price = Price::parse("1234").unwrap();
        assert_eq!(price.digits(), "1234");
        assert_eq!(price.digit_count(), 4);
        assert_eq!(price.value(), 1234);
    }

    #[test]
    fn test_parse_trims_whitespace_and_leading_zeros() {
        let price = Price::parse("  007 ").unwrap();
        assert_eq!(price.digits(), "7");
        assert_eq!(price.value(), 7);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("   "), Err(PriceError::Empty));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(Price::parse("12a"), Err(PriceError::NotNumeric(_))));
        assert!(matches!(Price::parse("-5"), Err(PriceError::NotNumeric(_))));
        assert!(matches!(Price::parse("12.5"), Err(PriceError::NotNumeric(_))));
        assert!(matches!(Price::parse("1,000"), Err(PriceError::NotNumeric(_))));
        assert!(matches!(Price::parse("1e3"), Err(PriceError::NotNumeric(_))));
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert_eq!(Price::parse("0"), Err(PriceError::NotPositive));
        assert_eq!(Price::parse("0000"), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_parse_capacity() {
        let max = Price::parse("9999999999").unwrap();
        assert_eq!(max.value(), 9_999_999_999);

        assert_eq!(
            Price::parse("10000000000"),
            Err(PriceError::TooLarge { digits: 11, max: 10 })
        );
    }

    #[test]
    fn test_grouped() {
        assert_eq!(Price::parse("5").unwrap().grouped(), "5");
        assert_eq!(Price::parse("500").unwrap().grouped(), "500");
        assert_eq!(Price::parse("1234").unwrap().grouped(), "1,234");
        assert_eq!(Price::parse("1000000").unwrap().grouped(), "1,000,000");
        assert_eq!(Price::parse("9876543210").unwrap().grouped(), "9,876,543,210");
    }

    #[test]
    fn test_separator_count() {
        assert_eq!(Price::parse("123").unwrap().separator_count(), 0);
        assert_eq!(Price::parse("12345").unwrap().separator_count(), 1);
        assert_eq!(Price::parse("1234567").unwrap().separator_count(), 2);
        assert_eq!(Price::parse("1234567890").unwrap().separator_count(), 3);
    }
}
