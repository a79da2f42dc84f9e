//! Site matching
//!
//! Decides whether a rule applies to the current page at all, and assigns
//! each match type the specificity weight the ranker uses.

use crate::pattern::match_pattern;
use crate::types::{Rule, SiteMatchType};
use crate::url::{base_domain, extract_host};

/// Test a rule's site pattern against the page URL.
/// Unparseable URLs never match.
pub fn site_matches(page_url: &str, rule: &Rule) -> bool {
    match rule.site_match_type {
        SiteMatchType::Url => match_pattern(page_url, &rule.site_pattern, false),
        SiteMatchType::Regex => match_pattern(page_url, &rule.site_pattern, true),
        SiteMatchType::Host => match extract_host(page_url) {
            Some(host) => match_pattern(host, &rule.site_pattern, false),
            None => false,
        },
        SiteMatchType::Domain => match extract_host(page_url) {
            Some(host) => match_pattern(base_domain(host), &rule.site_pattern, false),
            None => false,
        },
    }
}

/// Specificity weight of a site match type. A full-URL rule is considered
/// more precise than a host rule, which beats a registrable-domain rule;
/// regex rules rank last because their reach is unbounded.
#[inline]
pub fn specificity_weight(match_type: SiteMatchType) -> u8 {
    match match_type {
        SiteMatchType::Url => 4,
        SiteMatchType::Host => 3,
        SiteMatchType::Domain => 2,
        SiteMatchType::Regex => 1,
    }
}

/// Literalness score of a pattern: longer, less-wildcarded patterns score
/// higher. Discriminates between rules of the same site match type.
#[inline]
pub fn pattern_literalness(pattern: &str) -> i64 {
    let wildcards = pattern.chars().filter(|c| *c == '*' || *c == '?').count() as i64;
    pattern.chars().count() as i64 - 10 * wildcards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldKind;

    fn site_rule(pattern: &str, match_type: SiteMatchType) -> Rule {
        Rule::new("r", pattern, match_type, FieldKind::Name, "field", "value")
    }

    #[test]
    fn test_host_match() {
        let rule = site_rule("www.example.com", SiteMatchType::Host);
        assert!(site_matches("https://www.example.com/login", &rule));
        assert!(!site_matches("https://example.com/login", &rule));
    }

    #[test]
    fn test_host_wildcard() {
        let rule = site_rule("*.example.com", SiteMatchType::Host);
        assert!(site_matches("https://app.example.com/", &rule));
        assert!(!site_matches("https://example.com/", &rule));
    }

    #[test]
    fn test_domain_match_covers_subdomains() {
        let rule = site_rule("example.com", SiteMatchType::Domain);
        assert!(site_matches("https://www.example.com/", &rule));
        assert!(site_matches("https://deep.sub.example.com/", &rule));
        assert!(!site_matches("https://example.org/", &rule));
    }

    #[test]
    fn test_url_match() {
        let rule = site_rule("https://example.com/checkout*", SiteMatchType::Url);
        assert!(site_matches("https://example.com/checkout/step1", &rule));
        assert!(!site_matches("https://example.com/cart", &rule));
    }

    #[test]
    fn test_regex_match() {
        let rule = site_rule(r"https://(www\.)?example\.com/", SiteMatchType::Regex);
        assert!(site_matches("https://www.example.com/", &rule));
        assert!(site_matches("https://example.com/", &rule));
    }

    #[test]
    fn test_unparseable_url_never_matches() {
        let rule = site_rule("*", SiteMatchType::Host);
        assert!(!site_matches("not a url", &rule));
    }

    #[test]
    fn test_weights_are_ordered() {
        assert!(specificity_weight(SiteMatchType::Url) > specificity_weight(SiteMatchType::Host));
        assert!(specificity_weight(SiteMatchType::Host) > specificity_weight(SiteMatchType::Domain));
        assert!(
            specificity_weight(SiteMatchType::Domain) > specificity_weight(SiteMatchType::Regex)
        );
    }

    #[test]
    fn test_literalness_penalizes_wildcards() {
        assert!(pattern_literalness("login.example.com") > pattern_literalness("*.example.com"));
        assert!(pattern_literalness("user_name") > pattern_literalness("user*"));
    }
}
