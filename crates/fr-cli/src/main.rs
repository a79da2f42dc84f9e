//! FillRule CLI
//!
//! CLI tool for analyzing exported rule sets and probing rule selection
//! outside the browser.

use std::fs;

use clap::{Parser, Subcommand};

use fr_core::{
    rules_in_profile, select_rule, validate_rule_set, ElementType, FieldDescriptor, FieldKind,
    Rule, UrlOnlyEvaluator,
};
use fr_optimizer::analyze_rules;

#[derive(Parser)]
#[command(name = "fr-cli")]
#[command(about = "FillRule rule-set analyzer and matching probe")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the optimizer over an exported rule set
    Analyze {
        /// Rules JSON file (the extension's export format)
        #[arg(short, long)]
        input: String,

        /// Print the full report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Ask which rule would fill one field on one page
    Probe {
        /// Rules JSON file
        #[arg(short, long)]
        input: String,

        /// Page URL the field lives on
        #[arg(short, long)]
        url: String,

        /// Field identifier kind (name, id, data-name, data-id, placeholder, aria-label, selector)
        #[arg(short, long, value_parser = parse_field_kind)]
        kind: FieldKind,

        /// Field identifier value, e.g. the input's name attribute
        #[arg(short, long)]
        value: String,

        /// Element type (text, checkbox, radio, select, textarea, contenteditable, macro)
        #[arg(short, long, value_parser = parse_element_type, default_value = "text")]
        element: ElementType,

        /// Restrict matching to one profile
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Validate every rule in an exported rule set
    Validate {
        /// Rules JSON file
        #[arg(short, long)]
        input: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze { input, json } => cmd_analyze(&input, json),
        Commands::Probe {
            input,
            url,
            kind,
            value,
            element,
            profile,
        } => cmd_probe(&input, &url, kind, &value, element, profile.as_deref()),
        Commands::Validate { input } => cmd_validate(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn parse_field_kind(s: &str) -> Result<FieldKind, String> {
    match s {
        "name" => Ok(FieldKind::Name),
        "id" => Ok(FieldKind::Id),
        "data-name" => Ok(FieldKind::DataName),
        "data-id" => Ok(FieldKind::DataId),
        "placeholder" => Ok(FieldKind::Placeholder),
        "aria-label" => Ok(FieldKind::AriaLabel),
        "selector" => Ok(FieldKind::Selector),
        other => Err(format!("unknown field kind '{other}'")),
    }
}

fn parse_element_type(s: &str) -> Result<ElementType, String> {
    match s {
        "text" => Ok(ElementType::Text),
        "checkbox" => Ok(ElementType::Checkbox),
        "radio" => Ok(ElementType::Radio),
        "select" => Ok(ElementType::Select),
        "textarea" => Ok(ElementType::Textarea),
        "contenteditable" => Ok(ElementType::Contenteditable),
        "macro" => Ok(ElementType::Macro),
        other => Err(format!("unknown element type '{other}'")),
    }
}

fn load_rules(path: &str) -> Result<Vec<Rule>, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read '{path}': {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse '{path}': {e}"))
}

fn cmd_analyze(input: &str, json: bool) -> Result<(), String> {
    let rules = load_rules(input)?;
    let report = analyze_rules(&rules);

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!("Analyzed '{input}'");
    println!("  Rules:       {} ({} enabled, {} disabled)",
        report.total_rules, report.enabled_rules, report.disabled_rules);
    println!("  Regex:       {}", report.regex_rules);
    println!("  Wildcard:    {}", report.wildcard_rules);
    println!("  Findings:    {} critical, {} opportunities, {} minor",
        report.critical_issues, report.optimization_opportunities, report.minor_improvements);

    if report.suggestions.is_empty() {
        println!("\nNo suggestions; the rule set is clean.");
        return Ok(());
    }

    println!();
    for suggestion in &report.suggestions {
        println!(
            "[{:?}] {} (rules: {})",
            suggestion.priority,
            suggestion.title,
            suggestion.affected_rule_ids.join(", ")
        );
        println!("  {}", suggestion.description);
        println!("  => {}", suggestion.recommendation);
    }

    Ok(())
}

fn cmd_probe(
    input: &str,
    url: &str,
    kind: FieldKind,
    value: &str,
    element: ElementType,
    profile: Option<&str>,
) -> Result<(), String> {
    let rules = load_rules(input)?;
    let scoped: Vec<Rule> = match profile {
        Some(profile) => rules_in_profile(&rules, profile)
            .into_iter()
            .cloned()
            .collect(),
        None => rules,
    };

    let field = FieldDescriptor::new(element, kind, value);
    let result = select_rule(&field, &scoped, url, &UrlOnlyEvaluator);

    match result.winner {
        Some(winner) => {
            println!("Winner: rule {} fills \"{}\"", winner.id, winner.value);
            println!("  Site:  {} ({})", winner.site_pattern, winner.site_match_type);
            println!("  Field: {} {} \"{}\"", winner.field_kind,
                if winner.uses_field_regex() { "regex" } else { "pattern" },
                winner.field_pattern);
        }
        None => println!("No rule matches this field."),
    }

    if result.is_conflict() {
        println!("\n{} candidates matched (best first):", result.candidates.len());
        for candidate in &result.candidates {
            println!(
                "  {} site=\"{}\" ({}) priority={} order={}",
                candidate.id,
                candidate.site_pattern,
                candidate.site_match_type,
                candidate.priority,
                candidate.sort_order
            );
        }
    }

    Ok(())
}

fn cmd_validate(input: &str) -> Result<(), String> {
    let rules = load_rules(input)?;
    let errors = validate_rule_set(&rules);

    if errors.is_empty() {
        println!("'{input}' is valid ({} rules)", rules.len());
        return Ok(());
    }

    for error in &errors {
        eprintln!("  {error}");
    }
    Err(format!("{} problem(s) in '{input}'", errors.len()))
}
