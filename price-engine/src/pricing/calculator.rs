//! Price Calculator
//!
//! Pure arithmetic for the two-stage price adjustment and the marketplace
//! (EC) conversion. Uses rust_decimal internally so the two stages compound
//! without float drift; only the final result is truncated to an integer
//! currency amount. Both functions are total — bad inputs degrade, they
//! never error.

use rust_decimal::prelude::*;
use shared::types::{Adjustment, RoundRule, TaxMode};

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Truncate a Decimal to an integer currency amount (toward negative
/// infinity, matching the legacy FLOOR)
#[inline]
fn to_amount(value: Decimal) -> i64 {
    value.floor().to_i64().unwrap_or_default()
}

/// Apply one adjustment stage to a price
fn apply_stage(price: Decimal, adjust: Option<&Adjustment>) -> Decimal {
    match adjust {
        Some(Adjustment::Percent(percent)) => price * percent / Decimal::ONE_HUNDRED,
        Some(Adjustment::Delta(delta)) => price + delta,
        None => price,
    }
}

/// Round a price to the given rank
///
/// An absent rule behaves like `round`: half away from zero, matching the
/// legacy engine's ROUND.
fn round_to_rank(price: Decimal, rule: Option<RoundRule>, rank: i64) -> Decimal {
    let rank = Decimal::from(rank);
    let quotient = price / rank;
    let rounded = match rule {
        Some(RoundRule::Up) => quotient.ceil(),
        Some(RoundRule::Down) => quotient.floor(),
        _ => quotient.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
    };
    rounded * rank
}

/// Two-stage adjusted price
///
/// Stage 1 is the resolved override rate's adjustment, stage 2 the store's
/// blanket adjustment; each is either a percentage multiplier or an
/// absolute delta, and absence is identity. Rounding applies only when the
/// product allows it and a rank is configured; otherwise the result is
/// floored. An absent base yields 0.
pub fn adjusted_price(
    base: Option<i64>,
    adjust: Option<&Adjustment>,
    round_rule: Option<RoundRule>,
    round_rank: Option<i64>,
    allow_round: bool,
    specific_adjust: Option<&Adjustment>,
) -> i64 {
    let Some(base) = base else {
        return 0;
    };

    let stage1 = apply_stage(Decimal::from(base), adjust);
    let stage2 = apply_stage(stage1, specific_adjust);

    match round_rank.filter(|rank| *rank > 0) {
        Some(rank) if allow_round => to_amount(round_to_rank(stage2, round_rule, rank)),
        _ => to_amount(stage2),
    }
}

/// Marketplace (EC) sell price
///
/// An absent adjustment here is a no-op *multiplier* (100%), not the
/// identity *addend* the sell/buy calculator uses — callers must not
/// confuse the two. Tax-exclusive stores get the price converted to
/// tax-inclusive. An absent round rule (or rank) floors.
pub fn ec_adjusted_price(
    sell_price: Option<i64>,
    ec_adjust_percent: Option<i64>,
    round_rule: Option<RoundRule>,
    round_rank: Option<i64>,
    tax_rate: Option<f64>,
    tax_mode: TaxMode,
) -> i64 {
    let base = Decimal::from(sell_price.unwrap_or(0));
    let mut adjusted =
        base * Decimal::from(ec_adjust_percent.unwrap_or(100)) / Decimal::ONE_HUNDRED;

    if tax_mode == TaxMode::Exclude {
        adjusted *= Decimal::ONE + to_decimal(tax_rate.unwrap_or(0.0));
    }

    match (round_rule, round_rank.filter(|rank| *rank > 0)) {
        (Some(rule), Some(rank)) => to_amount(round_to_rank(adjusted, Some(rule), rank)),
        _ => to_amount(adjusted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent(value: i64) -> Adjustment {
        Adjustment::Percent(Decimal::from(value))
    }

    fn delta(value: i64) -> Adjustment {
        Adjustment::Delta(Decimal::from(value))
    }

    // ==================== Basic Tests ====================

    #[test]
    fn test_absent_base_yields_zero() {
        assert_eq!(
            adjusted_price(None, Some(&percent(120)), Some(RoundRule::Up), Some(10), true, None),
            0
        );
    }

    #[test]
    fn test_unmodified_base_is_floored() {
        // No adjustments, rounding disallowed
        assert_eq!(adjusted_price(Some(999), None, Some(RoundRule::Up), Some(10), false, None), 999);
    }

    #[test]
    fn test_two_stage_cascade_with_round_up() {
        // 1000 * 120% = 1200, minus 50 = 1150, already a multiple of 10
        assert_eq!(
            adjusted_price(
                Some(1000),
                Some(&percent(120)),
                Some(RoundRule::Up),
                Some(10),
                true,
                Some(&delta(-50)),
            ),
            1150
        );
    }

    #[test]
    fn test_percentage_then_floor() {
        // 999 * 110% = 1098.9, no rounding -> 1098
        assert_eq!(adjusted_price(Some(999), Some(&percent(110)), None, None, true, None), 1098);
    }

    #[test]
    fn test_delta_stage_only() {
        assert_eq!(adjusted_price(Some(500), Some(&delta(30)), None, None, false, None), 530);
    }

    #[test]
    fn test_stage_two_applies_to_stage_one_result() {
        // 200 + 100 = 300, then 50% of 300 = 150
        assert_eq!(
            adjusted_price(Some(200), Some(&delta(100)), None, None, false, Some(&percent(50))),
            150
        );
    }

    #[test]
    fn test_negative_result_preserved() {
        // 100 - 150 = -50; legacy engine does not clamp
        assert_eq!(adjusted_price(Some(100), Some(&delta(-150)), None, None, false, None), -50);
    }

    // ==================== Rounding Tests ====================

    #[test]
    fn test_round_up_to_rank() {
        assert_eq!(adjusted_price(Some(1001), None, Some(RoundRule::Up), Some(10), true, None), 1010);
    }

    #[test]
    fn test_round_down_to_rank() {
        assert_eq!(
            adjusted_price(Some(1009), None, Some(RoundRule::Down), Some(10), true, None),
            1000
        );
    }

    #[test]
    fn test_round_nearest_half_away_from_zero() {
        // 1005 / 10 = 100.5 -> 101 -> 1010
        assert_eq!(
            adjusted_price(Some(1005), None, Some(RoundRule::Round), Some(10), true, None),
            1010
        );
        assert_eq!(
            adjusted_price(Some(1004), None, Some(RoundRule::Round), Some(10), true, None),
            1000
        );
    }

    #[test]
    fn test_missing_rule_defaults_to_round() {
        assert_eq!(adjusted_price(Some(1005), None, None, Some(10), true, None), 1010);
    }

    #[test]
    fn test_rank_disabled_floors() {
        // allow_round without a rank still floors
        assert_eq!(adjusted_price(Some(1005), None, Some(RoundRule::Up), None, true, None), 1005);
    }

    #[test]
    fn test_round_up_bounds() {
        // up: result >= unrounded and within one rank of it
        for base in (1..500).step_by(7) {
            let result = adjusted_price(Some(base), None, Some(RoundRule::Up), Some(100), true, None);
            assert!(result >= base, "up rounded {result} below base {base}");
            assert!(result - base < 100, "up rounded {result} more than a rank above {base}");
        }
    }

    #[test]
    fn test_round_down_bounds() {
        for base in (1..500).step_by(7) {
            let result =
                adjusted_price(Some(base), None, Some(RoundRule::Down), Some(100), true, None);
            assert!(result <= base);
            assert!(base - result < 100);
        }
    }

    #[test]
    fn test_round_nearest_bounds() {
        // round: within half a rank of the unrounded value
        for base in (1..500).step_by(7) {
            let result =
                adjusted_price(Some(base), None, Some(RoundRule::Round), Some(100), true, None);
            assert!((result - base).abs() <= 50);
        }
    }

    #[test]
    fn test_monotonic_in_base() {
        let mut prev = i64::MIN;
        for base in (0..2000).step_by(13) {
            let result = adjusted_price(
                Some(base),
                Some(&percent(85)),
                Some(RoundRule::Round),
                Some(10),
                true,
                Some(&delta(-20)),
            );
            assert!(result >= prev, "result regressed at base {base}");
            prev = result;
        }
    }

    #[test]
    fn test_cascade_precision_no_drift() {
        // 3333 * 33.33% must stay exact in decimal: 1110.8889 -> floor 1110
        let stage1 = Adjustment::Percent("33.33".parse().unwrap());
        assert_eq!(adjusted_price(Some(3333), Some(&stage1), None, None, false, None), 1110);
    }

    // ==================== EC Tests ====================

    #[test]
    fn test_ec_default_multiplier_tax_exclusive() {
        // Absent percent is a no-op multiplier; EXCLUDE converts to tax-inclusive
        assert_eq!(
            ec_adjusted_price(Some(1000), None, None, None, Some(0.1), TaxMode::Exclude),
            1100
        );
    }

    #[test]
    fn test_ec_default_multiplier_tax_inclusive() {
        assert_eq!(
            ec_adjusted_price(Some(1000), None, None, None, Some(0.1), TaxMode::Include),
            1000
        );
    }

    #[test]
    fn test_ec_percent_applied() {
        assert_eq!(
            ec_adjusted_price(Some(1000), Some(90), None, None, None, TaxMode::Include),
            900
        );
    }

    #[test]
    fn test_ec_absent_sell_price_is_zero() {
        assert_eq!(ec_adjusted_price(None, Some(120), None, None, Some(0.1), TaxMode::Exclude), 0);
    }

    #[test]
    fn test_ec_rounds_with_rank() {
        // 999 * 100% = 999, round up to rank 100 -> 1000
        assert_eq!(
            ec_adjusted_price(Some(999), None, Some(RoundRule::Up), Some(100), None, TaxMode::Include),
            1000
        );
    }

    #[test]
    fn test_ec_missing_rule_floors() {
        // 1234 * 110% = 1357.4 -> floor, rank ignored without a rule
        assert_eq!(
            ec_adjusted_price(Some(1234), Some(110), None, Some(100), None, TaxMode::Include),
            1357
        );
    }

    #[test]
    fn test_ec_tax_then_round() {
        // 980 * 1.08 = 1058.4, round down to 10 -> 1050
        assert_eq!(
            ec_adjusted_price(
                Some(980),
                None,
                Some(RoundRule::Down),
                Some(10),
                Some(0.08),
                TaxMode::Exclude
            ),
            1050
        );
    }
}
