//! Suggestion records produced by the analyzer
//!
//! Serialized camelCase/kebab-case so the extension's suggestion list can
//! render them directly; the apply-suggestion mutator in the UI turns the
//! `action` into concrete store operations.

use serde::Serialize;

use fr_core::types::SiteMatchType;

/// What kind of finding a suggestion reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    Duplicate,
    Combine,
    CrossSiteDuplicate,
    ValueMerge,
    Overlap,
    Simplify,
    Unused,
}

impl SuggestionKind {
    /// Position in the report's fixed kind ordering. Cross-site duplicates
    /// and value merges share a rank, so the stable sort keeps them in the
    /// order the analyses emitted them.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Self::Duplicate => 0,
            Self::Combine => 1,
            Self::CrossSiteDuplicate | Self::ValueMerge => 2,
            Self::Overlap => 3,
            Self::Simplify => 4,
            Self::Unused => 5,
        }
    }
}

/// How urgent a suggestion is. Declaration order doubles as sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

/// What the user should do about a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionAction {
    Delete,
    Combine,
    Update,
    Review,
}

/// One analyzer finding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub priority: SuggestionPriority,
    pub action: SuggestionAction,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub affected_rule_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_site_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_site_match_type: Option<SiteMatchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_field_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_field_use_regex: Option<bool>,
}

impl Suggestion {
    /// Start a suggestion with no proposed replacements.
    pub(crate) fn new(
        kind: SuggestionKind,
        priority: SuggestionPriority,
        action: SuggestionAction,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
        affected_rule_ids: Vec<String>,
    ) -> Self {
        Self {
            kind,
            priority,
            action,
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            affected_rule_ids,
            proposed_site_pattern: None,
            proposed_site_match_type: None,
            proposed_field_pattern: None,
            proposed_field_use_regex: None,
        }
    }
}
