//! Rule selection
//!
//! The top-level decision function: filter the rule set down to candidates
//! whose site and field conditions hold, then rank them into a total order
//! so exactly one winner comes out for any input.
//!
//! Ranking chain, most significant first:
//! 1. site match type weight (url > host > domain > regex)
//! 2. site pattern literalness (longer, less-wildcarded wins)
//! 3. user priority, descending
//! 4. declaration order (`sort_order`), ascending
//!
//! The sort is stable, so rules that tie on the whole chain keep their
//! input order, but a unique `sort_order` already breaks every tie.

use std::cmp::Ordering;

use crate::field::{field_matches, ConditionEvaluator};
use crate::site::{pattern_literalness, site_matches, specificity_weight};
use crate::types::{FieldDescriptor, MatchResult, Rule};

/// Compare two candidate rules; `Ordering::Less` means `a` ranks better.
fn compare_candidates(a: &Rule, b: &Rule) -> Ordering {
    specificity_weight(b.site_match_type)
        .cmp(&specificity_weight(a.site_match_type))
        .then_with(|| {
            pattern_literalness(&b.site_pattern).cmp(&pattern_literalness(&a.site_pattern))
        })
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.sort_order.cmp(&b.sort_order))
}

/// Select the rule that should fill `field` on the page at `page_url`.
///
/// Disabled and malformed rules are skipped silently; a pattern that fails
/// to compile disqualifies only its own rule. The returned candidates are
/// ranked best-first and the winner, when present, is the first of them.
pub fn select_rule<'a>(
    field: &FieldDescriptor,
    rules: &'a [Rule],
    page_url: &str,
    evaluator: &dyn ConditionEvaluator,
) -> MatchResult<'a> {
    let mut candidates: Vec<&'a Rule> = rules
        .iter()
        .filter(|rule| rule.enabled && rule.is_matchable())
        .filter(|rule| site_matches(page_url, rule))
        .filter(|rule| field_matches(field, rule, page_url, evaluator))
        .collect();

    candidates.sort_by(|a, b| compare_candidates(a, b));

    MatchResult {
        winner: candidates.first().copied(),
        candidates,
    }
}
