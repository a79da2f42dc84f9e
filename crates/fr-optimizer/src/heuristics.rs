//! Per-rule and pairwise heuristics
//!
//! Simplification hints, the quadratic overlap scan and unused-rule
//! detection. The overlap site check (`equal or either side has a
//! wildcard`) is deliberately coarse; it errs toward flagging.

use fr_core::pattern::{has_wildcards, match_pattern};
use fr_core::types::{FieldKind, Rule, SiteMatchType};

use crate::suggestion::{Suggestion, SuggestionAction, SuggestionKind, SuggestionPriority};

// =============================================================================
// Simplification
// =============================================================================

pub(crate) fn find_simplifications(rules: &[&Rule]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for rule in rules {
        if rule.site_match_type == SiteMatchType::Host {
            if let Some(stripped) = rule.site_pattern.strip_prefix("www.") {
                if !stripped.is_empty() {
                    let mut suggestion = Suggestion::new(
                        SuggestionKind::Simplify,
                        SuggestionPriority::Low,
                        SuggestionAction::Update,
                        "Simplifiable site pattern",
                        format!(
                            "Rule {} matches host \"{}\"; a domain rule on \"{stripped}\" also covers the bare domain",
                            rule.id, rule.site_pattern
                        ),
                        format!("Switch to a domain rule on \"{stripped}\""),
                        vec![rule.id.clone()],
                    );
                    suggestion.proposed_site_pattern = Some(stripped.to_string());
                    suggestion.proposed_site_match_type = Some(SiteMatchType::Domain);
                    suggestions.push(suggestion);
                }
            }
        }

        if let Some(proposed) = generalized_field_pattern(rule) {
            let mut suggestion = Suggestion::new(
                SuggestionKind::Simplify,
                SuggestionPriority::Low,
                SuggestionAction::Update,
                "Generalizable field pattern",
                format!(
                    "Rule {} matches the exact {} \"{}\", which sites often rename",
                    rule.id, rule.field_kind, rule.field_pattern
                ),
                format!("Generalize the field pattern to \"{proposed}\""),
                vec![rule.id.clone()],
            );
            suggestion.proposed_field_pattern = Some(proposed);
            suggestion.proposed_field_use_regex = Some(false);
            suggestions.push(suggestion);
        }
    }

    suggestions
}

/// A literal field pattern with `_` or `-` separators generalizes to a
/// wildcard over its last segment, e.g. `billing_email` to `*email`.
fn generalized_field_pattern(rule: &Rule) -> Option<String> {
    if rule.uses_field_regex()
        || rule.field_kind == FieldKind::Selector
        || has_wildcards(&rule.field_pattern)
    {
        return None;
    }
    let last = rule
        .field_pattern
        .rsplit(['_', '-'])
        .next()
        .filter(|last| !last.is_empty() && last.len() < rule.field_pattern.len())?;
    Some(format!("*{last}"))
}

// =============================================================================
// Overlap scan
// =============================================================================

fn sites_could_overlap(a: &Rule, b: &Rule) -> bool {
    a.site_pattern == b.site_pattern
        || has_wildcards(&a.site_pattern)
        || has_wildcards(&b.site_pattern)
}

fn fields_overlap(a: &Rule, b: &Rule) -> bool {
    match_pattern(&a.field_pattern, &b.field_pattern, b.uses_field_regex())
        || match_pattern(&b.field_pattern, &a.field_pattern, a.uses_field_regex())
}

/// Pairwise scan for rules that can both claim the same field. Quadratic on
/// purpose: rule sets are small and every pair must be inspected.
pub(crate) fn find_overlaps(rules: &[&Rule]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (i, a) in rules.iter().enumerate() {
        for b in &rules[i + 1..] {
            if a.field_kind != b.field_kind {
                continue;
            }
            if !sites_could_overlap(a, b) || !fields_overlap(a, b) {
                continue;
            }
            suggestions.push(Suggestion::new(
                SuggestionKind::Overlap,
                SuggestionPriority::Medium,
                SuggestionAction::Review,
                "Overlapping rules",
                format!(
                    "Rules {} (\"{}\") and {} (\"{}\") can both claim the same {} field",
                    a.id, a.field_pattern, b.id, b.field_pattern, a.field_kind
                ),
                "Review which rule should win, or narrow one of the patterns",
                vec![a.id.clone(), b.id.clone()],
            ));
        }
    }

    suggestions
}

// =============================================================================
// Unused rules
// =============================================================================

const DAY_MS: i64 = 86_400_000;
const UNUSED_IDLE_DAYS: i64 = 30;
const UNUSED_MIN_AGE_DAYS: i64 = 7;

/// Rules that were never used, or not used for 30 days, and are at least a
/// week old. Rules without a creation timestamp are skipped; imported
/// records often lack one and would all be flagged on day one.
pub(crate) fn find_unused(rules: &[&Rule], now_ms: i64) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for rule in rules {
        if rule.created <= 0 || now_ms - rule.created < UNUSED_MIN_AGE_DAYS * DAY_MS {
            continue;
        }
        let description = match rule.last_used {
            None => format!("Rule {} has never filled a field", rule.id),
            Some(last_used) => {
                let idle_days = (now_ms - last_used) / DAY_MS;
                if idle_days < UNUSED_IDLE_DAYS {
                    continue;
                }
                format!("Rule {} last filled a field {idle_days} days ago", rule.id)
            }
        };
        suggestions.push(Suggestion::new(
            SuggestionKind::Unused,
            SuggestionPriority::Low,
            SuggestionAction::Delete,
            "Unused rule",
            description,
            format!("Delete rule {} if it is no longer needed", rule.id),
            vec![rule.id.clone()],
        ));
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, site: &str, field: &str) -> Rule {
        Rule::new(id, site, SiteMatchType::Host, FieldKind::Name, field, "v")
    }

    fn refs(rules: &[Rule]) -> Vec<&Rule> {
        rules.iter().collect()
    }

    #[test]
    fn test_www_host_rule_simplifies_to_domain() {
        let rules = vec![rule("a", "www.example.com", "email")];
        let suggestions = find_simplifications(&refs(&rules));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(
            suggestions[0].proposed_site_pattern.as_deref(),
            Some("example.com")
        );
        assert_eq!(
            suggestions[0].proposed_site_match_type,
            Some(SiteMatchType::Domain)
        );
    }

    #[test]
    fn test_separator_field_pattern_generalizes() {
        let rules = vec![rule("a", "example.com", "billing_email")];
        let suggestions = find_simplifications(&refs(&rules));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(
            suggestions[0].proposed_field_pattern.as_deref(),
            Some("*email")
        );
    }

    #[test]
    fn test_plain_field_pattern_left_alone() {
        let rules = vec![rule("a", "example.com", "email")];
        assert!(find_simplifications(&refs(&rules)).is_empty());
    }

    #[test]
    fn test_wildcard_field_pattern_left_alone() {
        let rules = vec![rule("a", "example.com", "*_email")];
        assert!(find_simplifications(&refs(&rules)).is_empty());
    }

    #[test]
    fn test_overlap_via_wildcard_field() {
        let rules = vec![
            rule("a", "example.com", "user*"),
            rule("b", "example.com", "username"),
        ];
        let suggestions = find_overlaps(&refs(&rules));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Overlap);
        assert_eq!(suggestions[0].affected_rule_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let rules = vec![
            rule("a", "example.com", "user*"),
            rule("b", "example.com", "username"),
        ];
        let reversed: Vec<&Rule> = rules.iter().rev().collect();
        let forward = find_overlaps(&refs(&rules));
        let backward = find_overlaps(&reversed);
        assert_eq!(forward.len(), backward.len());
        let mut forward_ids = forward[0].affected_rule_ids.clone();
        let mut backward_ids = backward[0].affected_rule_ids.clone();
        forward_ids.sort();
        backward_ids.sort();
        assert_eq!(forward_ids, backward_ids);
    }

    #[test]
    fn test_no_overlap_across_different_literal_sites() {
        let rules = vec![
            rule("a", "alpha.com", "user*"),
            rule("b", "beta.com", "username"),
        ];
        assert!(find_overlaps(&refs(&rules)).is_empty());
    }

    #[test]
    fn test_wildcard_site_enables_overlap() {
        let rules = vec![
            rule("a", "*.example.com", "user*"),
            rule("b", "login.example.com", "username"),
        ];
        assert_eq!(find_overlaps(&refs(&rules)).len(), 1);
    }

    #[test]
    fn test_different_field_kinds_never_overlap() {
        let mut other = rule("b", "example.com", "user*");
        other.field_kind = FieldKind::Id;
        let rules = vec![rule("a", "example.com", "user*"), other];
        assert!(find_overlaps(&refs(&rules)).is_empty());
    }

    #[test]
    fn test_never_used_old_rule_is_flagged() {
        let now = 100 * DAY_MS;
        let mut r = rule("a", "example.com", "email");
        r.created = now - 10 * DAY_MS;
        let rules = vec![r];
        let suggestions = find_unused(&refs(&rules), now);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Unused);
        assert_eq!(suggestions[0].action, SuggestionAction::Delete);
    }

    #[test]
    fn test_recently_used_rule_is_not_flagged() {
        let now = 100 * DAY_MS;
        let mut r = rule("a", "example.com", "email");
        r.created = now - 90 * DAY_MS;
        r.last_used = Some(now - 5 * DAY_MS);
        let rules = vec![r];
        assert!(find_unused(&refs(&rules), now).is_empty());
    }

    #[test]
    fn test_fresh_rule_gets_a_grace_period() {
        let now = 100 * DAY_MS;
        let mut r = rule("a", "example.com", "email");
        r.created = now - 2 * DAY_MS;
        let rules = vec![r];
        assert!(find_unused(&refs(&rules), now).is_empty());
    }

    #[test]
    fn test_long_idle_rule_is_flagged() {
        let now = 100 * DAY_MS;
        let mut r = rule("a", "example.com", "email");
        r.created = now - 90 * DAY_MS;
        r.last_used = Some(now - 45 * DAY_MS);
        let rules = vec![r];
        let suggestions = find_unused(&refs(&rules), now);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].description.contains("45 days"));
    }

    #[test]
    fn test_rule_without_created_timestamp_is_skipped() {
        let rules = vec![rule("a", "example.com", "email")];
        assert!(find_unused(&refs(&rules), 100 * DAY_MS).is_empty());
    }
}
