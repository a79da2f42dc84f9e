//! WebAssembly bindings for FillRule
//!
//! The extension talks to the engine in JSON: rule sets and field
//! descriptors come in as strings, decisions and reports go back out as
//! strings. DOM-dependent condition checks stay in the content script, so
//! the bindings always run with the URL-only evaluator.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use fr_core::{
    select_rule, validate_rule_set, FieldDescriptor, Rule, UrlOnlyEvaluator,
};
use fr_optimizer::analyze_rules;

/// Selection outcome in the shape the extension expects.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectOutcome<'a> {
    winner: Option<&'a Rule>,
    candidate_ids: Vec<&'a str>,
    conflict: bool,
}

fn parse_rules(rules_json: &str) -> Result<Vec<Rule>, String> {
    serde_json::from_str(rules_json).map_err(|e| format!("invalid rules JSON: {e}"))
}

fn select_rule_str(rules_json: &str, field_json: &str, page_url: &str) -> Result<String, String> {
    let rules = parse_rules(rules_json)?;
    let field: FieldDescriptor =
        serde_json::from_str(field_json).map_err(|e| format!("invalid field JSON: {e}"))?;

    let result = select_rule(&field, &rules, page_url, &UrlOnlyEvaluator);
    let outcome = SelectOutcome {
        winner: result.winner,
        candidate_ids: result.candidates.iter().map(|r| r.id.as_str()).collect(),
        conflict: result.is_conflict(),
    };
    serde_json::to_string(&outcome).map_err(|e| format!("failed to serialize outcome: {e}"))
}

fn analyze_rules_str(rules_json: &str) -> Result<String, String> {
    let rules = parse_rules(rules_json)?;
    let report = analyze_rules(&rules);
    serde_json::to_string(&report).map_err(|e| format!("failed to serialize report: {e}"))
}

fn validate_rules_str(rules_json: &str) -> Result<String, String> {
    let rules = parse_rules(rules_json)?;
    let messages: Vec<String> = validate_rule_set(&rules)
        .iter()
        .map(|e| e.to_string())
        .collect();
    serde_json::to_string(&messages).map_err(|e| format!("failed to serialize errors: {e}"))
}

fn to_js_err(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Decide which rule fills one field, as JSON:
/// `{"winner": Rule|null, "candidateIds": [...], "conflict": bool}`.
#[wasm_bindgen]
pub fn select_rule_js(rules_json: &str, field_json: &str, page_url: &str) -> Result<String, JsValue> {
    select_rule_str(rules_json, field_json, page_url).map_err(to_js_err)
}

/// Run the optimizer and return the full analysis report as JSON.
#[wasm_bindgen]
pub fn analyze_rules_js(rules_json: &str) -> Result<String, JsValue> {
    analyze_rules_str(rules_json).map_err(to_js_err)
}

/// Validate a rule set; returns a JSON array of problem messages,
/// empty when the set is clean.
#[wasm_bindgen]
pub fn validate_rules_js(rules_json: &str) -> Result<String, JsValue> {
    validate_rules_str(rules_json).map_err(to_js_err)
}

/// Test one string against one pattern, for live feedback in the editor.
#[wasm_bindgen]
pub fn match_pattern_js(text: &str, pattern: &str, use_regex: bool) -> bool {
    fr_core::match_pattern(text, pattern, use_regex)
}

/// Check a regex pattern; returns `{valid, error}` for the editor.
#[wasm_bindgen]
pub fn validate_regex_js(pattern: &str) -> JsValue {
    let check = fr_core::validate_regex(pattern);
    let result = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&result, &"valid".into(), &JsValue::from(check.valid));
    if let Some(error) = check.error {
        let _ = js_sys::Reflect::set(&result, &"error".into(), &JsValue::from_str(&error));
    }
    result.into()
}

/// Hostname of a URL, or `null` when it has none.
#[wasm_bindgen]
pub fn extract_host_js(url: &str) -> Option<String> {
    fr_core::url::extract_host(url).map(|h| h.to_string())
}

/// Registrable (two-label) domain of a host.
#[wasm_bindgen]
pub fn base_domain_js(host: &str) -> String {
    fr_core::url::base_domain(host).to_string()
}
