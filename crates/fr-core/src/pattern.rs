//! Pattern compilation and evaluation
//!
//! User patterns come in two flavors: wildcard syntax (`*` and `?`) and raw
//! regular expressions. Both compile down to a case-insensitive [`Regex`];
//! compiled patterns are cached in a fixed-capacity ring so that scanning
//! hundreds of fields against the same rule set does not recompile anything.
//!
//! A compile failure is never an error at this layer: it is logged once and
//! the failure sentinel is cached, so the pattern simply matches nothing.

use std::sync::Mutex;

use regex::{Regex, RegexBuilder};

// =============================================================================
// Compiled-pattern cache
// =============================================================================

const PATTERN_CACHE_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternMode {
    Wildcard,
    Regex,
}

struct CacheSlot {
    pattern: String,
    mode: PatternMode,
    /// `None` records a compile failure so broken patterns are not retried.
    compiled: Option<Regex>,
}

/// Fixed-capacity pattern cache with FIFO eviction.
///
/// A ring of slots: while the ring is filling, new entries append; once it
/// is full, `next` walks the ring overwriting the oldest insertion. Lookups
/// scan linearly, which is cheap at this capacity.
struct PatternCache {
    slots: Vec<CacheSlot>,
    next: usize,
}

impl PatternCache {
    const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next: 0,
        }
    }

    fn get(&self, pattern: &str, mode: PatternMode) -> Option<Option<Regex>> {
        self.slots
            .iter()
            .find(|slot| slot.mode == mode && slot.pattern == pattern)
            .map(|slot| slot.compiled.clone())
    }

    fn insert(&mut self, pattern: String, mode: PatternMode, compiled: Option<Regex>) {
        let slot = CacheSlot {
            pattern,
            mode,
            compiled,
        };
        if self.slots.len() < PATTERN_CACHE_CAP {
            self.slots.push(slot);
        } else {
            log::debug!("pattern cache full, evicting slot {}", self.next);
            self.slots[self.next] = slot;
            self.next = (self.next + 1) % PATTERN_CACHE_CAP;
        }
    }
}

static PATTERN_CACHE: Mutex<PatternCache> = Mutex::new(PatternCache::new());

fn compiled(pattern: &str, mode: PatternMode) -> Option<Regex> {
    if let Some(hit) = PATTERN_CACHE.lock().unwrap().get(pattern, mode) {
        return hit;
    }

    let source = match mode {
        PatternMode::Wildcard => wildcard_to_regex(pattern),
        PatternMode::Regex => pattern.to_string(),
    };

    let result = match RegexBuilder::new(&source).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(err) => {
            log::warn!("pattern {pattern:?} failed to compile: {err}");
            None
        }
    };

    PATTERN_CACHE
        .lock()
        .unwrap()
        .insert(pattern.to_string(), mode, result.clone());

    result
}

// =============================================================================
// Matching
// =============================================================================

/// Test `text` against a rule pattern.
///
/// In wildcard mode, exact equality short-circuits before any compilation.
/// Invalid regexes match nothing and never propagate an error.
pub fn match_pattern(text: &str, pattern: &str, use_regex: bool) -> bool {
    if use_regex {
        return compiled(pattern, PatternMode::Regex)
            .map(|re| re.is_match(text))
            .unwrap_or(false);
    }

    if text == pattern {
        return true;
    }

    compiled(pattern, PatternMode::Wildcard)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// True if `pattern` contains wildcard metacharacters.
#[inline]
pub fn has_wildcards(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Outcome of a regex validity probe, for UI feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexValidation {
    pub valid: bool,
    pub error: Option<String>,
}

/// Check whether `pattern` compiles as a regex, without caching.
pub fn validate_regex(pattern: &str) -> RegexValidation {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(_) => RegexValidation {
            valid: true,
            error: None,
        },
        Err(err) => RegexValidation {
            valid: false,
            error: Some(err.to_string()),
        },
    }
}

/// Convert a wildcard pattern to an anchored regex source.
/// `*` matches any run of characters, `?` exactly one.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            '\\' | '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' => {
                source.push('\\');
                source.push(ch);
            }
            _ => source.push(ch),
        }
    }
    source.push('$');
    source
}

// =============================================================================
// Literal analysis (used by the optimizer)
// =============================================================================

/// Longest literal prefix shared by every string. Empty input yields `""`.
pub fn find_common_prefix<S: AsRef<str>>(strings: &[S]) -> String {
    let Some(first) = strings.first() else {
        return String::new();
    };
    let mut prefix = first.as_ref().to_string();
    for s in &strings[1..] {
        let s = s.as_ref();
        while !s.starts_with(prefix.as_str()) {
            prefix.pop();
            if prefix.is_empty() {
                return prefix;
            }
        }
    }
    prefix
}

/// Longest literal suffix shared by every string. Empty input yields `""`.
pub fn find_common_suffix<S: AsRef<str>>(strings: &[S]) -> String {
    let Some(first) = strings.first() else {
        return String::new();
    };
    let mut suffix = first.as_ref();
    for s in &strings[1..] {
        let s = s.as_ref();
        while !s.ends_with(suffix) {
            let mut chars = suffix.chars();
            chars.next();
            suffix = chars.as_str();
            if suffix.is_empty() {
                return String::new();
            }
        }
    }
    suffix.to_string()
}

const SUBSTRING_MIN_LEN: usize = 3;
const SUBSTRING_MAX_RESULTS: usize = 5;

/// Substrings of length >= 3 that appear in at least half of the inputs,
/// most widely shared first, longest within the same count, capped to five.
pub fn find_common_substrings<S: AsRef<str>>(strings: &[S]) -> Vec<String> {
    if strings.is_empty() {
        return Vec::new();
    }
    let needed = strings.len().div_ceil(2);

    let mut counts: Vec<(String, usize)> = Vec::new();
    for s in strings {
        let s = s.as_ref();
        let boundaries: Vec<usize> = s
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(s.len()))
            .collect();

        // Dedupe within one string so repeats only count once per input.
        let mut seen: Vec<&str> = Vec::new();
        for a in 0..boundaries.len() {
            for b in a + 1..boundaries.len() {
                let sub = &s[boundaries[a]..boundaries[b]];
                if sub.chars().count() >= SUBSTRING_MIN_LEN && !seen.contains(&sub) {
                    seen.push(sub);
                }
            }
        }

        for sub in seen {
            match counts.iter_mut().find(|(existing, _)| existing == sub) {
                Some((_, count)) => *count += 1,
                None => counts.push((sub.to_string(), 1)),
            }
        }
    }

    let mut hits: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= needed)
        .collect();
    hits.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then(b.0.len().cmp(&a.0.len()))
            .then(a.0.cmp(&b.0))
    });
    hits.truncate(SUBSTRING_MAX_RESULTS);
    hits.into_iter().map(|(sub, _)| sub).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_short_circuits() {
        assert!(match_pattern("username", "username", false));
        assert!(match_pattern("", "", false));
    }

    #[test]
    fn test_wildcard_star() {
        assert!(match_pattern("username", "user*", false));
        assert!(match_pattern("user", "user*", false));
        assert!(!match_pattern("admin", "user*", false));
        assert!(match_pattern("my_email_field", "*email*", false));
    }

    #[test]
    fn test_wildcard_question_mark() {
        assert!(match_pattern("user1", "user?", false));
        assert!(!match_pattern("user12", "user?", false));
        assert!(!match_pattern("user", "user?", false));
    }

    #[test]
    fn test_wildcard_is_case_insensitive() {
        assert!(match_pattern("UserName", "user*", false));
        assert!(match_pattern("EMAIL", "email", false));
    }

    #[test]
    fn test_wildcard_escapes_metacharacters() {
        assert!(match_pattern("a.b", "a.b", false));
        assert!(!match_pattern("axb", "a.b", false));
        assert!(match_pattern("price[0]", "price[?]", false));
    }

    #[test]
    fn test_regex_mode() {
        assert!(match_pattern("abc123", "\\d+", true));
        assert!(!match_pattern("abcdef", "\\d+", true));
        assert!(match_pattern("Email-Address", "^email", true));
    }

    #[test]
    fn test_invalid_regex_never_matches() {
        assert!(!match_pattern("anything", "[", true));
        // Second call exercises the cached failure sentinel.
        assert!(!match_pattern("anything", "[", true));
    }

    #[test]
    fn test_has_wildcards() {
        assert!(!has_wildcards("user"));
        assert!(has_wildcards("user*"));
        assert!(has_wildcards("user?"));
    }

    #[test]
    fn test_validate_regex() {
        assert!(validate_regex("\\d+").valid);
        let invalid = validate_regex("[");
        assert!(!invalid.valid);
        assert!(invalid.error.is_some());
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(find_common_prefix(&["shipping", "ship", "shipment"]), "ship");
        assert_eq!(find_common_prefix(&["abc", "xyz"]), "");
        assert_eq!(find_common_prefix::<&str>(&[]), "");
    }

    #[test]
    fn test_common_suffix() {
        assert_eq!(
            find_common_suffix(&["example.com", "www.example.com"]),
            "example.com"
        );
        assert_eq!(find_common_suffix(&["abc", "xyz"]), "");
        assert_eq!(find_common_suffix::<&str>(&[]), "");
    }

    #[test]
    fn test_common_substrings() {
        let subs = find_common_substrings(&["user_email", "contact_email", "email_backup"]);
        // "email" appears in all three and is the longest such substring.
        assert_eq!(subs[0], "email");
    }

    #[test]
    fn test_common_substrings_threshold() {
        // "zzz" appears in only one of three inputs: below the 50% bar.
        let subs = find_common_substrings(&["zzzfield", "name", "mail"]);
        assert!(!subs.contains(&"zzz".to_string()));
    }

    #[test]
    fn test_cache_eviction_keeps_matching() {
        // Push well past capacity, then verify early patterns still match
        // after being recompiled through the refilled ring.
        for i in 0..250 {
            let pattern = format!("field{i}*");
            assert!(match_pattern(&format!("field{i}_x"), &pattern, false));
        }
        assert!(match_pattern("field0_x", "field0*", false));
    }
}
