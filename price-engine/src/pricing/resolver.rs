//! Rate Resolver
//!
//! Selects at most one override rate for a product from the candidate set.
//! The legacy tie-break — genre then group, raw identifiers descending,
//! nulls last — is preserved verbatim for compatibility; candidates sharing
//! the winner's exact scope tuple are flagged as ambiguous instead of being
//! silently collapsed.

use crate::db::models::OverrideRate;
use std::cmp::Ordering;
use surrealdb::RecordId;

/// Outcome of rate resolution for one product
#[derive(Debug)]
pub struct RateResolution<'a> {
    /// The winning rate, if any candidate matched
    pub winner: Option<&'a OverrideRate>,
    /// More than one candidate matched at the winner's exact scope
    pub ambiguous: bool,
}

/// Check whether a rate's scope matches a product
///
/// A null group/genre on the rate is a wildcard. A product without a
/// condition option matches nothing.
pub fn matches_scope(
    rate: &OverrideRate,
    condition_option: Option<&RecordId>,
    group_id: Option<i64>,
    genre_id: Option<i64>,
) -> bool {
    let Some(option) = condition_option else {
        return false;
    };
    if &rate.condition_option != option {
        return false;
    }
    if rate.group_id.is_some() && rate.group_id != group_id {
        return false;
    }
    if rate.genre_id.is_some() && rate.genre_id != genre_id {
        return false;
    }
    true
}

/// Descending order with nulls last, matching the legacy `ORDER BY ... DESC`
/// over nullable columns
fn desc_nulls_last(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Resolve the single applicable rate for a product
///
/// Candidates are ordered by `genre_id` descending, then `group_id`
/// descending, and the first wins; a trailing id comparison keeps the pick
/// deterministic when two candidates share the exact scope tuple. That tie
/// is also reported so data-integrity tooling can surface it.
pub fn resolve_rate<'a>(
    rates: &'a [OverrideRate],
    condition_option: Option<&RecordId>,
    group_id: Option<i64>,
    genre_id: Option<i64>,
) -> RateResolution<'a> {
    let mut candidates: Vec<&OverrideRate> = rates
        .iter()
        .filter(|rate| matches_scope(rate, condition_option, group_id, genre_id))
        .collect();

    candidates.sort_by(|a, b| {
        desc_nulls_last(a.genre_id, b.genre_id)
            .then_with(|| desc_nulls_last(a.group_id, b.group_id))
            .then_with(|| a.id_string().cmp(&b.id_string()))
    });

    let ambiguous = matches!(
        (candidates.first(), candidates.get(1)),
        (Some(first), Some(second))
            if first.genre_id == second.genre_id && first.group_id == second.group_id
    );

    RateResolution {
        winner: candidates.first().copied(),
        ambiguous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_rate(
        key: &str,
        option: &str,
        group_id: Option<i64>,
        genre_id: Option<i64>,
    ) -> OverrideRate {
        OverrideRate {
            id: Some(RecordId::from_table_key("condition_option_rate", key)),
            condition_option: RecordId::from_table_key("condition_option", option),
            group_id,
            genre_id,
            auto_sell_price_adjustment: Some("110%".into()),
            auto_buy_price_adjustment: None,
            is_active: true,
        }
    }

    fn option_id(key: &str) -> RecordId {
        RecordId::from_table_key("condition_option", key)
    }

    #[test]
    fn test_wildcard_rate_matches_any_group_and_genre() {
        let rate = make_rate("r1", "near_mint", None, None);
        assert!(matches_scope(&rate, Some(&option_id("near_mint")), Some(3), Some(7)));
        assert!(matches_scope(&rate, Some(&option_id("near_mint")), None, None));
    }

    #[test]
    fn test_option_mismatch_excluded() {
        let rate = make_rate("r1", "near_mint", None, None);
        assert!(!matches_scope(&rate, Some(&option_id("damaged")), None, None));
    }

    #[test]
    fn test_no_condition_option_matches_nothing() {
        let rate = make_rate("r1", "near_mint", None, None);
        assert!(!matches_scope(&rate, None, Some(3), Some(7)));
    }

    #[test]
    fn test_scoped_rate_requires_exact_group() {
        let rate = make_rate("r1", "near_mint", Some(3), None);
        assert!(matches_scope(&rate, Some(&option_id("near_mint")), Some(3), None));
        assert!(!matches_scope(&rate, Some(&option_id("near_mint")), Some(4), None));
        assert!(!matches_scope(&rate, Some(&option_id("near_mint")), None, None));
    }

    #[test]
    fn test_empty_candidates_resolve_to_none() {
        let resolution = resolve_rate(&[], Some(&option_id("near_mint")), None, None);
        assert!(resolution.winner.is_none());
        assert!(!resolution.ambiguous);
    }

    #[test]
    fn test_genre_scoped_beats_wildcard() {
        // Legacy ordering: genre_id DESC with nulls last, so the genre-scoped
        // rate wins over the default (all-null) rate
        let rates = vec![
            make_rate("default", "near_mint", None, None),
            make_rate("genre7", "near_mint", None, Some(7)),
        ];
        let resolution = resolve_rate(&rates, Some(&option_id("near_mint")), Some(3), Some(7));
        assert_eq!(resolution.winner.unwrap().id_string(), "condition_option_rate:genre7");
        assert!(!resolution.ambiguous);
    }

    #[test]
    fn test_genre_outranks_group() {
        let rates = vec![
            make_rate("group3", "near_mint", Some(3), None),
            make_rate("genre7", "near_mint", None, Some(7)),
        ];
        let resolution = resolve_rate(&rates, Some(&option_id("near_mint")), Some(3), Some(7));
        assert_eq!(resolution.winner.unwrap().id_string(), "condition_option_rate:genre7");
    }

    #[test]
    fn test_higher_genre_id_wins() {
        // The questionable legacy behavior: raw numeric identifier ordering
        let rates = vec![
            make_rate("low", "near_mint", None, Some(2)),
            make_rate("high", "near_mint", None, Some(9)),
        ];
        // Both wildcards on group; only genre 9 matches a genre-9 item
        let resolution = resolve_rate(&rates, Some(&option_id("near_mint")), None, Some(9));
        assert_eq!(resolution.winner.unwrap().id_string(), "condition_option_rate:high");
    }

    #[test]
    fn test_exact_scope_tie_is_ambiguous_but_deterministic() {
        let rates = vec![
            make_rate("b", "near_mint", Some(3), Some(7)),
            make_rate("a", "near_mint", Some(3), Some(7)),
        ];
        let resolution = resolve_rate(&rates, Some(&option_id("near_mint")), Some(3), Some(7));
        assert!(resolution.ambiguous);
        // Trailing id comparison keeps the pick stable regardless of input order
        assert_eq!(resolution.winner.unwrap().id_string(), "condition_option_rate:a");
    }

    #[test]
    fn test_non_matching_scoped_rates_excluded() {
        let rates = vec![
            make_rate("other_group", "near_mint", Some(99), None),
            make_rate("default", "near_mint", None, None),
        ];
        let resolution = resolve_rate(&rates, Some(&option_id("near_mint")), Some(3), None);
        assert_eq!(resolution.winner.unwrap().id_string(), "condition_option_rate:default");
        assert!(!resolution.ambiguous);
    }
}
