//! Rules command - list the DQ rule registry or look up one rule.

use cleanflow::rules::{
    all_rules, rule_definition, rule_meta, rules_by_severity, RuleDefinition, RuleMeta,
};
use cleanflow::Severity;
use colored::{ColoredString, Colorize};

pub fn run(
    rule_id: Option<String>,
    severity: Option<Severity>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(rule_id) = rule_id {
        let meta = rule_meta(Some(rule_id.as_str()));
        let known = rule_definition(&rule_id).is_some();

        if json_output {
            let value = serde_json::json!({
                "id": rule_id,
                "known": known,
                "name": meta.name,
                "severity": meta.severity,
                "description": meta.description,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            print_rule(&rule_id.to_uppercase(), &meta);
            if !known {
                println!("  {}", "Not in the rule registry.".dimmed());
            }
        }
        return Ok(());
    }

    let rules: Vec<&RuleDefinition> = match severity {
        Some(severity) => rules_by_severity(severity).collect(),
        None => all_rules().iter().collect(),
    };

    if json_output {
        let values: Vec<_> = rules
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "name": r.name,
                    "severity": r.severity,
                    "description": r.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    println!(
        "{} {} rules",
        "Registry:".cyan().bold(),
        rules.len().to_string().white().bold()
    );
    println!();
    for rule in rules {
        print_rule(rule.id, &RuleMeta::from(rule));
    }

    Ok(())
}

fn print_rule(id: &str, meta: &RuleMeta) {
    println!(
        "  {:<4} {:<9} {}",
        id.white().bold(),
        severity_label(meta.severity),
        meta.name
    );
    println!("       {}", meta.description.dimmed());
}

pub(crate) fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => severity.label().red().bold(),
        Severity::Warning => severity.label().yellow(),
        Severity::Info => severity.label().blue(),
    }
}
