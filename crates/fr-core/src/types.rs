//! Core type definitions for FillRule
//!
//! These types mirror the JSON records the extension keeps in its rule
//! store, so serde renames follow the storage format (camelCase fields,
//! lowercase tag strings).

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Match-type vocabulary
// =============================================================================

/// How a rule's site pattern is tested against the page URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteMatchType {
    /// Wildcard match against the hostname
    Host,
    /// Wildcard match against the registrable domain (last two labels)
    Domain,
    /// Wildcard match against the full URL
    Url,
    /// Regular-expression match against the full URL
    Regex,
}

/// DOM element kinds a rule can be limited to.
///
/// `Text` doubles as "any": rules authored before the field existed carry
/// the default and must keep matching every element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    #[default]
    Text,
    Checkbox,
    Radio,
    Select,
    Textarea,
    Contenteditable,
    Macro,
}

/// Which attribute of a detected field the field pattern is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "data-name")]
    DataName,
    #[serde(rename = "data-id")]
    DataId,
    #[serde(rename = "placeholder")]
    Placeholder,
    #[serde(rename = "aria-label")]
    AriaLabel,
    /// The field pattern is a structural CSS selector evaluated against the
    /// live element, bypassing the pattern matcher entirely.
    #[serde(rename = "selector")]
    Selector,
}

/// Extra runtime gate evaluated against the page, independent of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionType {
    #[default]
    None,
    UrlContains,
    UrlRegex,
    SelectorExists,
}

impl fmt::Display for SiteMatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Domain => write!(f, "domain"),
            Self::Url => write!(f, "url"),
            Self::Regex => write!(f, "regex"),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Id => write!(f, "id"),
            Self::DataName => write!(f, "data-name"),
            Self::DataId => write!(f, "data-id"),
            Self::Placeholder => write!(f, "placeholder"),
            Self::AriaLabel => write!(f, "aria-label"),
            Self::Selector => write!(f, "selector"),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Checkbox => write!(f, "checkbox"),
            Self::Radio => write!(f, "radio"),
            Self::Select => write!(f, "select"),
            Self::Textarea => write!(f, "textarea"),
            Self::Contenteditable => write!(f, "contenteditable"),
            Self::Macro => write!(f, "macro"),
        }
    }
}

// =============================================================================
// Rule
// =============================================================================

/// A user-authored site + field -> value mapping.
///
/// The engine only reads rules; all mutation happens in the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub site_pattern: String,
    pub site_match_type: SiteMatchType,
    #[serde(default)]
    pub element_type: ElementType,
    pub field_kind: FieldKind,
    pub field_pattern: String,
    #[serde(default)]
    pub field_use_regex: bool,
    pub value: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub condition_type: ConditionType,
    #[serde(default)]
    pub condition_value: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub profile_id: String,
    /// User opt-out: the optimizer never reports on this rule.
    #[serde(default)]
    pub ignore_optimization: bool,
    /// Creation timestamp, epoch milliseconds.
    #[serde(default)]
    pub created: i64,
    /// Last time this rule filled a field, epoch milliseconds.
    #[serde(default)]
    pub last_used: Option<i64>,
}

fn default_true() -> bool {
    true
}

impl Rule {
    /// Create a rule with defaults matching a fresh storage record.
    pub fn new(
        id: impl Into<String>,
        site_pattern: impl Into<String>,
        site_match_type: SiteMatchType,
        field_kind: FieldKind,
        field_pattern: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            site_pattern: site_pattern.into(),
            site_match_type,
            element_type: ElementType::Text,
            field_kind,
            field_pattern: field_pattern.into(),
            field_use_regex: false,
            value: value.into(),
            enabled: true,
            priority: 0,
            condition_type: ConditionType::None,
            condition_value: String::new(),
            sort_order: 0,
            profile_id: String::new(),
            ignore_optimization: false,
            created: 0,
            last_used: None,
        }
    }

    #[must_use]
    pub fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    #[must_use]
    pub fn with_regex_field(mut self) -> Self {
        self.field_use_regex = self.field_kind != FieldKind::Selector;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition_type: ConditionType, value: impl Into<String>) -> Self {
        self.condition_type = condition_type;
        self.condition_value = value.into();
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether the rule carries enough data to ever match a field.
    /// Malformed rules are skipped silently during selection.
    pub fn is_matchable(&self) -> bool {
        !self.site_pattern.is_empty() && !self.field_pattern.is_empty()
    }

    /// Selector-kind rules never use regex field matching.
    pub fn uses_field_regex(&self) -> bool {
        self.field_use_regex && self.field_kind != FieldKind::Selector
    }
}

/// Restrict a rule set to one profile. Rules with an empty `profile_id`
/// belong to every profile.
pub fn rules_in_profile<'a>(rules: &'a [Rule], profile_id: &str) -> Vec<&'a Rule> {
    rules
        .iter()
        .filter(|r| r.profile_id.is_empty() || r.profile_id == profile_id)
        .collect()
}

// =============================================================================
// Field Descriptor
// =============================================================================

/// Snapshot of one detected form element, produced by the DOM scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(default)]
    pub element_type: ElementType,
    pub identifier_kind: FieldKind,
    pub identifier_value: String,
    /// Opaque handle for the live element, forwarded to the condition
    /// evaluator for structural selector tests. The engine never inspects it.
    #[serde(default)]
    pub element_ref: Option<String>,
}

impl FieldDescriptor {
    pub fn new(
        element_type: ElementType,
        identifier_kind: FieldKind,
        identifier_value: impl Into<String>,
    ) -> Self {
        Self {
            element_type,
            identifier_kind,
            identifier_value: identifier_value.into(),
            element_ref: None,
        }
    }
}

// =============================================================================
// Match Result
// =============================================================================

/// Outcome of selecting a rule for one field.
///
/// `candidates` holds every enabled rule whose site and field conditions
/// held, ranked best-first; the winner is always the first candidate. More
/// than one candidate means the UI may flag a conflict.
#[derive(Debug, Clone, Default)]
pub struct MatchResult<'a> {
    pub winner: Option<&'a Rule>,
    pub candidates: Vec<&'a Rule>,
}

impl<'a> MatchResult<'a> {
    /// No rule applied.
    pub fn none() -> Self {
        Self::default()
    }

    /// True when several rules matched and the tie-break chain decided.
    pub fn is_conflict(&self) -> bool {
        self.candidates.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults() {
        let rule = Rule::new(
            "r1",
            "example.com",
            SiteMatchType::Domain,
            FieldKind::Name,
            "email",
            "a@x.com",
        );
        assert!(rule.enabled);
        assert_eq!(rule.element_type, ElementType::Text);
        assert_eq!(rule.condition_type, ConditionType::None);
        assert!(rule.is_matchable());
    }

    #[test]
    fn test_matchable_requires_patterns() {
        let mut rule = Rule::new("r1", "", SiteMatchType::Host, FieldKind::Name, "email", "v");
        assert!(!rule.is_matchable());
        rule.site_pattern = "example.com".to_string();
        rule.field_pattern = String::new();
        assert!(!rule.is_matchable());
    }

    #[test]
    fn test_selector_rules_never_use_regex() {
        let rule = Rule::new(
            "r1",
            "example.com",
            SiteMatchType::Host,
            FieldKind::Selector,
            "input[type=email]",
            "v",
        )
        .with_regex_field();
        assert!(!rule.uses_field_regex());
    }

    #[test]
    fn test_rule_json_round_trip() {
        let json = r#"{
            "id": "abc",
            "sitePattern": "*.example.com",
            "siteMatchType": "host",
            "fieldKind": "aria-label",
            "fieldPattern": "Last name",
            "value": "Doe",
            "priority": 5
        }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.field_kind, FieldKind::AriaLabel);
        assert_eq!(rule.site_match_type, SiteMatchType::Host);
        assert!(rule.enabled);
        assert_eq!(rule.priority, 5);
        assert_eq!(rule.last_used, None);
    }

    #[test]
    fn test_rules_in_profile() {
        let rules = vec![
            Rule::new("a", "x.com", SiteMatchType::Host, FieldKind::Name, "f", "v"),
            {
                let mut r = Rule::new("b", "x.com", SiteMatchType::Host, FieldKind::Name, "f", "v");
                r.profile_id = "work".to_string();
                r
            },
            {
                let mut r = Rule::new("c", "x.com", SiteMatchType::Host, FieldKind::Name, "f", "v");
                r.profile_id = "home".to_string();
                r
            },
        ];
        let scoped = rules_in_profile(&rules, "work");
        let ids: Vec<&str> = scoped.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
