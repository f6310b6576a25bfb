//! Pricing vocabulary
//!
//! Adjustment expressions, rounding rules and tax modes. Rules store their
//! adjustment as a string (`"120%"` = percentage multiplier, `"-50"` =
//! absolute delta); parsing into the tagged [`Adjustment`] value happens
//! once at the data boundary so downstream code never string-sniffs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rounding rule for computed prices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundRule {
    Up,
    Down,
    Round,
}

/// Whether a store's stored prices already include tax
///
/// Controls the marketplace price conversion: `Exclude` stores get their EC
/// price multiplied by `1 + tax_rate`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxMode {
    #[default]
    Include,
    Exclude,
}

/// Which computed price field an error or history point refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PriceKind {
    Sell,
    Buy,
    Ec,
}

impl fmt::Display for PriceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceKind::Sell => write!(f, "sell"),
            PriceKind::Buy => write!(f, "buy"),
            PriceKind::Ec => write!(f, "ec"),
        }
    }
}

/// A parsed adjustment expression
///
/// `Percent(120)` means "120% of the base"; `Delta(-50)` means "base minus
/// 50 currency units". The two representations are deliberately kept as one
/// tagged type so every call site handles both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Percentage multiplier (value 120 = 120% of base)
    Percent(Decimal),
    /// Absolute delta added to the base
    Delta(Decimal),
}

/// Raised when a stored adjustment expression is neither a valid percentage
/// nor a valid delta
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid adjustment expression: {0:?}")]
pub struct AdjustmentParseError(pub String);

impl FromStr for Adjustment {
    type Err = AdjustmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AdjustmentParseError(s.to_string()));
        }

        if let Some(percent) = trimmed.strip_suffix('%') {
            percent
                .trim()
                .parse::<Decimal>()
                .map(Adjustment::Percent)
                .map_err(|_| AdjustmentParseError(s.to_string()))
        } else {
            trimmed
                .parse::<Decimal>()
                .map(Adjustment::Delta)
                .map_err(|_| AdjustmentParseError(s.to_string()))
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::Percent(percent) => write!(f, "{percent}%"),
            Adjustment::Delta(delta) => write!(f, "{delta}"),
        }
    }
}

impl Adjustment {
    /// Parse an optional stored expression; `None` stays `None`
    pub fn parse_opt(raw: Option<&str>) -> Result<Option<Self>, AdjustmentParseError> {
        raw.map(str::parse).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn parses_percentage() {
        assert_eq!(
            "120%".parse::<Adjustment>().unwrap(),
            Adjustment::Percent(Decimal::from(120))
        );
    }

    #[test]
    fn parses_fractional_percentage() {
        assert_eq!(
            "87.5%".parse::<Adjustment>().unwrap(),
            Adjustment::Percent("87.5".parse().unwrap())
        );
    }

    #[test]
    fn parses_negative_delta() {
        assert_eq!(
            "-50".parse::<Adjustment>().unwrap(),
            Adjustment::Delta(Decimal::from(-50))
        );
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        assert_eq!(
            " 30 ".parse::<Adjustment>().unwrap(),
            Adjustment::Delta(Decimal::from(30))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("ten percent".parse::<Adjustment>().is_err());
        assert!("%".parse::<Adjustment>().is_err());
        assert!("".parse::<Adjustment>().is_err());
    }

    #[test]
    fn parse_opt_passes_none_through() {
        assert_eq!(Adjustment::parse_opt(None).unwrap(), None);
        assert_eq!(
            Adjustment::parse_opt(Some("110%")).unwrap(),
            Some(Adjustment::Percent(Decimal::from(110)))
        );
        assert!(Adjustment::parse_opt(Some("??")).is_err());
    }

    #[test]
    fn display_round_trips() {
        for raw in ["120%", "-50", "87.5%"] {
            let parsed: Adjustment = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
    }
}
