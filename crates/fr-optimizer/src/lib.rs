//! FillRule Optimizer
//!
//! Static analysis over a whole rule set, with no field data involved.
//! Feeds the extension's "clean up my rules" panel: exact duplicates,
//! combinable and cross-site rules, mergeable values, simplification hints,
//! pairwise overlaps and unused rules.
//!
//! # Architecture
//!
//! Every analysis is a pure function from `&[&Rule]` to suggestions;
//! [`analyze_rules_at`] runs them in a fixed order and sorts the combined
//! output by priority, then by kind. The clock is a parameter so reports
//! are reproducible; [`analyze_rules`] is the wall-clock convenience.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use fr_core::pattern::has_wildcards;
use fr_core::types::{Rule, SiteMatchType};

mod dedupe;
mod heuristics;
mod suggestion;

pub use suggestion::{Suggestion, SuggestionAction, SuggestionKind, SuggestionPriority};

// =============================================================================
// Report
// =============================================================================

/// Full analyzer output: rule-set statistics plus the sorted suggestions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub total_rules: usize,
    pub enabled_rules: usize,
    pub disabled_rules: usize,
    pub unused_rules: usize,
    pub regex_rules: usize,
    pub wildcard_rules: usize,
    pub critical_issues: usize,
    pub optimization_opportunities: usize,
    pub minor_improvements: usize,
    pub suggestions: Vec<Suggestion>,
}

fn uses_regex(rule: &Rule) -> bool {
    rule.uses_field_regex() || rule.site_match_type == SiteMatchType::Regex
}

fn uses_wildcards(rule: &Rule) -> bool {
    (rule.site_match_type != SiteMatchType::Regex && has_wildcards(&rule.site_pattern))
        || (!rule.uses_field_regex() && has_wildcards(&rule.field_pattern))
}

// =============================================================================
// Entry points
// =============================================================================

/// Analyze a rule set against the given clock (epoch milliseconds).
///
/// Rules opted out via `ignore_optimization` are invisible to every
/// analysis but still counted in the report statistics.
pub fn analyze_rules_at(rules: &[Rule], now_ms: i64) -> AnalysisReport {
    let eligible: Vec<&Rule> = rules.iter().filter(|r| !r.ignore_optimization).collect();

    let mut suggestions = Vec::new();
    suggestions.extend(dedupe::find_exact_duplicates(&eligible));
    suggestions.extend(dedupe::find_combinable_rules(&eligible));
    suggestions.extend(dedupe::find_cross_site_duplicates(&eligible));
    suggestions.extend(dedupe::find_value_merges(&eligible));
    suggestions.extend(heuristics::find_overlaps(&eligible));
    suggestions.extend(heuristics::find_simplifications(&eligible));
    suggestions.extend(heuristics::find_unused(&eligible, now_ms));

    // Stable sort: equal-rank kinds keep the emission order above.
    suggestions.sort_by_key(|s| (s.priority, s.kind.rank()));

    let unused_rules = suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::Unused)
        .count();
    let count_priority = |priority: SuggestionPriority| {
        suggestions.iter().filter(|s| s.priority == priority).count()
    };
    let critical_issues = count_priority(SuggestionPriority::High);
    let optimization_opportunities = count_priority(SuggestionPriority::Medium);
    let minor_improvements = count_priority(SuggestionPriority::Low);

    let report = AnalysisReport {
        total_rules: rules.len(),
        enabled_rules: rules.iter().filter(|r| r.enabled).count(),
        disabled_rules: rules.iter().filter(|r| !r.enabled).count(),
        unused_rules,
        regex_rules: rules.iter().filter(|r| uses_regex(r)).count(),
        wildcard_rules: rules.iter().filter(|r| uses_wildcards(r)).count(),
        critical_issues,
        optimization_opportunities,
        minor_improvements,
        suggestions,
    };
    log::debug!(
        "analyzed {} rules: {} suggestions",
        report.total_rules,
        report.suggestions.len()
    );
    report
}

/// Analyze a rule set against the system clock.
pub fn analyze_rules(rules: &[Rule]) -> AnalysisReport {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    analyze_rules_at(rules, now_ms)
}
