//! FillRule Core Library
//!
//! This crate provides the rule matching engine for the FillRule form
//! autofiller. Given the rule set a user has authored and a descriptor for
//! one detected form field, it decides which rule (if any) should fill that
//! field.
//!
//! # Architecture
//!
//! Everything here is synchronous and pure: rules and field descriptors come
//! in as plain data, a decision comes out, and nothing is mutated or
//! persisted. Storage, DOM scanning and value injection live in the
//! surrounding extension and are reached only through the
//! [`field::ConditionEvaluator`] seam. The single piece of shared state is a
//! bounded compiled-pattern cache inside the `pattern` module.
//!
//! # Modules
//!
//! - `types`: rule and field records, match-type vocabulary
//! - `pattern`: wildcard/regex compilation, pattern cache, literal analysis
//! - `url`: allocation-free host and domain extraction
//! - `site`: site matching and specificity weights
//! - `field`: per-field matching and the condition evaluator seam
//! - `select`: candidate ranking and winner selection
//! - `error`: validation diagnostics for editing surfaces

pub mod error;
pub mod field;
pub mod pattern;
pub mod select;
pub mod site;
pub mod types;
pub mod url;

// Re-export commonly used items
pub use error::{validate_rule, validate_rule_set, RuleError};
pub use field::{field_matches, ConditionEvaluator, UrlOnlyEvaluator};
pub use pattern::{has_wildcards, match_pattern, validate_regex};
pub use select::select_rule;
pub use site::{site_matches, specificity_weight};
pub use types::{
    rules_in_profile, ConditionType, ElementType, FieldDescriptor, FieldKind, MatchResult, Rule,
    SiteMatchType,
};
