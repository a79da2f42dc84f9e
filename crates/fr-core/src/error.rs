//! Rule validation diagnostics
//!
//! The matching engine itself never fails: broken rules just stop matching.
//! These checks exist for the editing surfaces (rules page, CLI `validate`)
//! that want to tell the user *why* a rule will never fire.

use thiserror::Error;

use crate::pattern::validate_regex;
use crate::types::{FieldKind, Rule, SiteMatchType};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule {id}: site pattern is empty")]
    EmptySitePattern { id: String },

    #[error("rule {id}: field pattern is empty")]
    EmptyFieldPattern { id: String },

    #[error("rule {id}: invalid site regex: {message}")]
    InvalidSiteRegex { id: String, message: String },

    #[error("rule {id}: invalid field regex: {message}")]
    InvalidFieldRegex { id: String, message: String },

    #[error("rule {id}: regex matching does not apply to selector fields")]
    RegexOnSelectorField { id: String },

    #[error("duplicate rule id {id}")]
    DuplicateId { id: String },
}

/// Validate a single rule record.
pub fn validate_rule(rule: &Rule) -> Result<(), RuleError> {
    if rule.site_pattern.is_empty() {
        return Err(RuleError::EmptySitePattern {
            id: rule.id.clone(),
        });
    }
    if rule.field_pattern.is_empty() {
        return Err(RuleError::EmptyFieldPattern {
            id: rule.id.clone(),
        });
    }

    if rule.site_match_type == SiteMatchType::Regex {
        let check = validate_regex(&rule.site_pattern);
        if !check.valid {
            return Err(RuleError::InvalidSiteRegex {
                id: rule.id.clone(),
                message: check.error.unwrap_or_default(),
            });
        }
    }

    if rule.field_kind == FieldKind::Selector {
        if rule.field_use_regex {
            return Err(RuleError::RegexOnSelectorField {
                id: rule.id.clone(),
            });
        }
    } else if rule.field_use_regex {
        let check = validate_regex(&rule.field_pattern);
        if !check.valid {
            return Err(RuleError::InvalidFieldRegex {
                id: rule.id.clone(),
                message: check.error.unwrap_or_default(),
            });
        }
    }

    Ok(())
}

/// Validate a whole rule set, including cross-rule id uniqueness.
/// Returns every problem found rather than stopping at the first.
pub fn validate_rule_set(rules: &[Rule]) -> Vec<RuleError> {
    let mut errors = Vec::new();
    let mut seen_ids: Vec<&str> = Vec::with_capacity(rules.len());

    for rule in rules {
        if seen_ids.contains(&rule.id.as_str()) {
            errors.push(RuleError::DuplicateId {
                id: rule.id.clone(),
            });
        } else {
            seen_ids.push(&rule.id);
        }

        if let Err(err) = validate_rule(rule) {
            errors.push(err);
        }
    }

    errors
}
