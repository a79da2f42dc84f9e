//! Duplicate and merge detection
//!
//! The grouping analyses: exact duplicates, combinable rules, cross-site
//! duplicates and value-based merges. Combinable-rule and cross-site
//! detection overlap in purpose but group on different keys; both are kept
//! because they surface different subsets to the user.

use fr_core::pattern::{find_common_substrings, find_common_suffix};
use fr_core::types::{ElementType, FieldKind, Rule, SiteMatchType};
use fr_core::url::base_domain;

use crate::suggestion::{Suggestion, SuggestionAction, SuggestionKind, SuggestionPriority};

/// Group rules by a key, preserving first-seen order of both groups and
/// members. Rule sets are small enough that a linear key scan beats pulling
/// in hashing and losing insertion order.
fn group_by<'a, K, F>(rules: &[&'a Rule], key_fn: F) -> Vec<(K, Vec<&'a Rule>)>
where
    K: PartialEq,
    F: Fn(&Rule) -> K,
{
    let mut groups: Vec<(K, Vec<&'a Rule>)> = Vec::new();
    for &rule in rules {
        let key = key_fn(rule);
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(rule),
            None => groups.push((key, vec![rule])),
        }
    }
    groups
}

fn distinct_site_patterns<'a>(members: &[&'a Rule]) -> Vec<&'a str> {
    let mut sites: Vec<&str> = Vec::new();
    for member in members {
        if !sites.contains(&member.site_pattern.as_str()) {
            sites.push(&member.site_pattern);
        }
    }
    sites
}

fn ids_of(members: &[&Rule]) -> Vec<String> {
    members.iter().map(|r| r.id.clone()).collect()
}

// =============================================================================
// Common site pattern
// =============================================================================

const MIN_SHARED_SUFFIX_LEN: usize = 5;

/// Try to find one site pattern that covers every given site.
///
/// Strips a leading `www.`; if everything reduces to the same registrable
/// domain, that domain (as a domain-type pattern) is the answer. Otherwise a
/// shared literal suffix longer than four characters becomes a `*suffix`
/// host pattern. Anything else is a refusal: fabricating a broader wildcard
/// would overmatch.
pub(crate) fn common_site_pattern(sites: &[&str]) -> Option<(String, SiteMatchType)> {
    let first = sites.first()?;
    let stripped: Vec<&str> = sites
        .iter()
        .map(|site| site.strip_prefix("www.").unwrap_or(site))
        .collect();

    let domain = base_domain(stripped[0]);
    if !domain.is_empty() && stripped.iter().all(|site| base_domain(site) == domain) {
        return Some((domain.to_string(), SiteMatchType::Domain));
    }

    let suffix = find_common_suffix(sites);
    if suffix.len() >= MIN_SHARED_SUFFIX_LEN && suffix.len() < first.len() {
        return Some((format!("*{suffix}"), SiteMatchType::Host));
    }

    None
}

// =============================================================================
// Exact duplicates
// =============================================================================

pub(crate) fn find_exact_duplicates(rules: &[&Rule]) -> Vec<Suggestion> {
    let groups = group_by(rules, |r| {
        (
            r.site_pattern.clone(),
            r.site_match_type,
            r.field_kind,
            r.field_pattern.clone(),
            r.value.clone(),
        )
    });

    let mut suggestions = Vec::new();
    for (_, members) in groups {
        if members.len() < 2 {
            continue;
        }
        let keeper = members[0];
        for extra in &members[1..] {
            suggestions.push(Suggestion::new(
                SuggestionKind::Duplicate,
                SuggestionPriority::High,
                SuggestionAction::Delete,
                "Duplicate rule",
                format!(
                    "Rules {} and {} fill {} \"{}\" on {} with the same value",
                    keeper.id, extra.id, keeper.field_kind, keeper.field_pattern, keeper.site_pattern
                ),
                format!("Delete rule {} and keep rule {}", extra.id, keeper.id),
                vec![keeper.id.clone(), extra.id.clone()],
            ));
        }
    }
    suggestions
}

// =============================================================================
// Combinable rules
// =============================================================================

pub(crate) fn find_combinable_rules(rules: &[&Rule]) -> Vec<Suggestion> {
    let groups = group_by(rules, |r| {
        (r.field_kind, r.field_pattern.clone(), r.value.clone())
    });

    let mut suggestions = Vec::new();
    for ((field_kind, field_pattern, _), members) in groups {
        let sites = distinct_site_patterns(&members);
        if sites.len() < 2 {
            continue;
        }
        let Some((pattern, match_type)) = common_site_pattern(&sites) else {
            continue;
        };
        // A proposal identical to an existing member is not a combination;
        // the cross-site analysis reports that shape instead.
        if sites.iter().any(|site| *site == pattern) {
            continue;
        }

        let mut suggestion = Suggestion::new(
            SuggestionKind::Combine,
            SuggestionPriority::Medium,
            SuggestionAction::Combine,
            "Combinable rules",
            format!(
                "{} rules fill {} \"{}\" with the same value across {}",
                members.len(),
                field_kind,
                field_pattern,
                sites.join(", ")
            ),
            format!("Replace them with a single {match_type} rule on \"{pattern}\""),
            ids_of(&members),
        );
        suggestion.proposed_site_pattern = Some(pattern);
        suggestion.proposed_site_match_type = Some(match_type);
        suggestions.push(suggestion);
    }
    suggestions
}

// =============================================================================
// Cross-site duplicates
// =============================================================================

pub(crate) fn find_cross_site_duplicates(rules: &[&Rule]) -> Vec<Suggestion> {
    let groups = group_by(rules, |r| {
        (r.field_pattern.clone(), r.value.clone(), r.field_kind)
    });

    let mut suggestions = Vec::new();
    for ((field_pattern, _, field_kind), members) in groups {
        let sites = distinct_site_patterns(&members);
        if sites.len() < 2 {
            continue;
        }

        let description = format!(
            "The same {} \"{}\" mapping is repeated on {} sites",
            field_kind,
            field_pattern,
            sites.len()
        );

        match common_site_pattern(&sites) {
            Some((pattern, match_type)) => {
                let mut suggestion = Suggestion::new(
                    SuggestionKind::CrossSiteDuplicate,
                    SuggestionPriority::Medium,
                    SuggestionAction::Combine,
                    "Cross-site duplicate",
                    description,
                    format!("Combine into one {match_type} rule on \"{pattern}\""),
                    ids_of(&members),
                );
                suggestion.proposed_site_pattern = Some(pattern);
                suggestion.proposed_site_match_type = Some(match_type);
                suggestions.push(suggestion);
            }
            None => {
                suggestions.push(Suggestion::new(
                    SuggestionKind::CrossSiteDuplicate,
                    SuggestionPriority::Medium,
                    SuggestionAction::Review,
                    "Cross-site duplicate",
                    description,
                    "Consider one rule with a broader domain pattern covering these sites",
                    ids_of(&members),
                ));
            }
        }
    }
    suggestions
}

// =============================================================================
// Value-based merges
// =============================================================================

pub(crate) fn find_value_merges(rules: &[&Rule]) -> Vec<Suggestion> {
    let text_rules: Vec<&Rule> = rules
        .iter()
        .copied()
        .filter(|r| matches!(r.element_type, ElementType::Text | ElementType::Textarea))
        .filter(|r| r.field_kind != FieldKind::Selector)
        .collect();

    let groups = group_by(&text_rules, |r| {
        (r.site_pattern.clone(), r.value.clone(), r.field_kind)
    });

    let mut suggestions = Vec::new();
    for ((site_pattern, _, field_kind), members) in groups {
        let mut patterns: Vec<&str> = Vec::new();
        for member in &members {
            if !patterns.contains(&member.field_pattern.as_str()) {
                patterns.push(&member.field_pattern);
            }
        }
        if patterns.len() < 2 {
            continue;
        }

        let any_regex = members.iter().any(|r| r.uses_field_regex());
        let shared = if any_regex {
            // Substring wildcards cannot be spliced into regex patterns.
            None
        } else {
            find_common_substrings(&patterns)
                .into_iter()
                .find(|sub| patterns.iter().all(|p| p.contains(sub.as_str())))
        };

        let (proposed, use_regex) = match shared {
            Some(sub) => (format!("*{sub}*"), false),
            None => (format!("({})", patterns.join("|")), true),
        };

        let mut suggestion = Suggestion::new(
            SuggestionKind::ValueMerge,
            SuggestionPriority::Medium,
            SuggestionAction::Combine,
            "Mergeable field patterns",
            format!(
                "{} {} patterns on {} fill the same value",
                patterns.len(),
                field_kind,
                site_pattern
            ),
            format!("Merge into a single pattern \"{proposed}\""),
            ids_of(&members),
        );
        suggestion.proposed_field_pattern = Some(proposed);
        suggestion.proposed_field_use_regex = Some(use_regex);
        suggestions.push(suggestion);
    }
    suggestions
}
