//! Field matching
//!
//! Decides whether a single detected form field satisfies one rule. DOM
//! checks (structural selectors, selector-existence conditions) cannot run
//! inside the engine, so they go through the [`ConditionEvaluator`] seam
//! that the content script implements against the live page.

use crate::pattern::match_pattern;
use crate::types::{ConditionType, ElementType, FieldDescriptor, FieldKind, Rule};

// =============================================================================
// Condition Evaluator
// =============================================================================

/// Page-side collaborator for checks the engine cannot do on its own.
pub trait ConditionEvaluator {
    /// Evaluate a rule's runtime condition against the page.
    /// `ConditionType::None` is short-circuited by the caller and never
    /// reaches this method.
    fn condition_holds(&self, condition: ConditionType, value: &str, page_url: &str) -> bool;

    /// Test whether the live element behind `field` satisfies a structural
    /// CSS selector. Invalid selectors must be reported as non-matching.
    fn selector_matches(&self, field: &FieldDescriptor, selector: &str) -> bool;
}

/// Evaluator that can answer URL conditions purely from the URL string.
///
/// Selector checks need a DOM and are reported as non-matching; the CLI and
/// tests use this, the extension swaps in a DOM-backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlOnlyEvaluator;

impl ConditionEvaluator for UrlOnlyEvaluator {
    fn condition_holds(&self, condition: ConditionType, value: &str, page_url: &str) -> bool {
        match condition {
            ConditionType::None => true,
            ConditionType::UrlContains => {
                page_url.to_lowercase().contains(&value.to_lowercase())
            }
            ConditionType::UrlRegex => match_pattern(page_url, value, true),
            ConditionType::SelectorExists => false,
        }
    }

    fn selector_matches(&self, _field: &FieldDescriptor, _selector: &str) -> bool {
        false
    }
}

// =============================================================================
// Field Matching
// =============================================================================

/// Test a detected field against one rule.
pub fn field_matches(
    field: &FieldDescriptor,
    rule: &Rule,
    page_url: &str,
    evaluator: &dyn ConditionEvaluator,
) -> bool {
    // `Text` is the pre-element-type default and matches any element kind.
    if rule.element_type != ElementType::Text && rule.element_type != field.element_type {
        return false;
    }

    if rule.condition_type != ConditionType::None
        && !evaluator.condition_holds(rule.condition_type, &rule.condition_value, page_url)
    {
        return false;
    }

    if rule.field_kind == FieldKind::Selector {
        return evaluator.selector_matches(field, &rule.field_pattern);
    }

    if rule.field_kind != field.identifier_kind {
        return false;
    }

    match_pattern(
        &field.identifier_value,
        &rule.field_pattern,
        rule.uses_field_regex(),
    )
}
