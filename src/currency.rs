// 💱 Currency - Selected currency and its display symbol

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::price::Price;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown currency {0:?} (expected JPY or USD)")]
pub struct UnknownCurrency(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Jpy,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Jpy, Currency::Usd];

    pub fn symbol(&self) -> char {
        match self {
            Currency::Jpy => '¥',
            Currency::Usd => '$',
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Jpy => "JPY",
            Currency::Usd => "USD",
        }
    }

    /// Locale tag associated with the currency (informational only)
    pub fn locale(&self) -> &'static str {
        match self {
            Currency::Jpy => "ja-JP",
            Currency::Usd => "en-US",
        }
    }

    /// Next currency in the selector
    pub fn toggle(&self) -> Self {
        match self {
            Currency::Jpy => Currency::Usd,
            Currency::Usd => Currency::Jpy,
        }
    }

    /// Final display text for a price: `¥1,234`
    pub fn format(&self, price: &Price) -> String {
        format!("{}{}", self.symbol(), price.grouped())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JPY" => Ok(Currency::Jpy),
            "USD" => Ok(Currency::Usd),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(Currency::Jpy.symbol(), '¥');
        assert_eq!(Currency::Usd.symbol(), '$');
        assert_eq!(Currency::default(), Currency::Jpy);
    }

    #[test]
    fn test_parse_code_case_insensitive() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" JPY ".parse::<Currency>().unwrap(), Currency::Jpy);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_toggle_cycles() {
        assert_eq!(Currency::Jpy.toggle(), Currency::Usd);
        assert_eq!(Currency::Usd.toggle().toggle(), Currency::Usd);
    }

    #[test]
    fn test_format() {
        let price = Price::parse("12345").unwrap();
        assert_eq!(Currency::Jpy.format(&price), "¥12,345");
        assert_eq!(Currency::Usd.format(&price), "$12,345");
    }
}
