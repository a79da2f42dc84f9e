//! Browser-side smoke tests, run with `wasm-pack test --headless`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use fr_wasm::{analyze_rules_js, match_pattern_js, select_rule_js};

wasm_bindgen_test_configure!(run_in_browser);

const RULES: &str = r#"[
    {
        "id": "r1",
        "sitePattern": "example.com",
        "siteMatchType": "domain",
        "fieldKind": "name",
        "fieldPattern": "email",
        "value": "a@x.com"
    }
]"#;

#[wasm_bindgen_test]
fn select_rule_round_trips_json() {
    let field = r#"{"identifierKind": "name", "identifierValue": "email"}"#;
    let out = select_rule_js(RULES, field, "https://www.example.com/").unwrap();
    assert!(out.contains("\"r1\""));
}

#[wasm_bindgen_test]
fn analyze_rules_round_trips_json() {
    let out = analyze_rules_js(RULES).unwrap();
    assert!(out.contains("\"totalRules\":1"));
}

#[wasm_bindgen_test]
fn pattern_matching_is_available() {
    assert!(match_pattern_js("username", "user*", false));
    assert!(!match_pattern_js("anything", "[", true));
}
