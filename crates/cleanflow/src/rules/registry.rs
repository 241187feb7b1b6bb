//! Static registry of DQ rule metadata.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::meta::{RuleDefinition, RuleId, RuleMeta, Severity};

macro_rules! rule {
    ($id:literal, $name:literal, $severity:ident, $description:literal) => {
        RuleDefinition {
            id: $id,
            name: $name,
            severity: Severity::$severity,
            description: $description,
        }
    };
}

/// Every rule the DQ engine can report, in id order.
pub static RULES: [RuleDefinition; 34] = [
    rule!("R1", "Required field missing", Critical, "A mandatory column is empty or absent."),
    rule!("R2", "Invalid date", Critical, "The value cannot be parsed as a calendar date."),
    rule!("R3", "Date format normalized", Info, "The date was rewritten to ISO 8601 (YYYY-MM-DD)."),
    rule!("R4", "Future date", Warning, "The date lies after the processing date."),
    rule!("R5", "Invalid number", Critical, "The value is not a valid number."),
    rule!("R6", "Negative amount", Warning, "A monetary amount is below zero where only credits are expected."),
    rule!("R7", "Amount out of range", Warning, "The amount exceeds the configured range for this column."),
    rule!("R8", "Invalid currency code", Critical, "The currency is not a recognized ISO 4217 code."),
    rule!("R9", "Number format normalized", Info, "Thousand separators or currency symbols were removed from a number."),
    rule!("R10", "Whitespace trimmed", Info, "Leading or trailing whitespace was removed."),
    rule!("R11", "Case normalized", Info, "Letter case was normalized to the canonical form."),
    rule!("R12", "Duplicate record", Critical, "The row duplicates another row on its key columns."),
    rule!("R13", "Duplicate identifier", Critical, "The identifier is already used by another row."),
    rule!("R14", "Invalid email", Warning, "The value is not a well-formed email address."),
    rule!("R15", "Invalid phone number", Warning, "The value is not a well-formed phone number."),
    rule!("R16", "Phone number normalized", Info, "The phone number was rewritten to E.164 format."),
    rule!("R17", "Invalid tax identifier", Critical, "The tax or VAT identifier fails its checksum or format."),
    rule!("R18", "Unknown account code", Critical, "The account code does not exist in the chart of accounts."),
    rule!("R19", "Unbalanced entry", Critical, "Debits and credits of the journal entry do not balance."),
    rule!("R20", "Unknown vendor", Warning, "The vendor does not match any known vendor record."),
    rule!("R21", "Unknown customer", Warning, "The customer does not match any known customer record."),
    rule!("R22", "Invalid quantity", Warning, "The quantity is zero, negative, or not a whole number where required."),
    rule!("R23", "Unit price mismatch", Warning, "Quantity times unit price does not equal the line total."),
    rule!("R24", "Tax calculation mismatch", Warning, "The tax amount does not match the rate applied to the base amount."),
    rule!("R25", "Invalid country code", Warning, "The country is not a recognized ISO 3166 code."),
    rule!("R26", "Country normalized", Info, "The country name was mapped to its ISO 3166 code."),
    rule!("R27", "Invalid postal code", Warning, "The postal code does not match the format for its country."),
    rule!("R28", "Value not in allowed set", Warning, "The value is not one of the permitted values for this column."),
    rule!("R29", "Boolean normalized", Info, "A yes/no style value was normalized to true or false."),
    rule!("R30", "Text too long", Warning, "The value exceeds the maximum length for this column."),
    rule!("R31", "Control characters removed", Info, "Non-printable characters were stripped from the value."),
    rule!("R32", "Encoding repaired", Info, "Mis-encoded characters were repaired to valid UTF-8."),
    rule!("R33", "Placeholder value", Warning, "The value is a placeholder such as N/A, TBD or 0000."),
    rule!("R34", "Referential integrity violation", Critical, "The value references a record that does not exist."),
];

static INDEX: Lazy<HashMap<RuleId, &'static RuleDefinition>> = Lazy::new(|| {
    RULES
        .iter()
        .filter_map(|rule| RuleId::parse(rule.id).map(|id| (id, rule)))
        .collect()
});

/// Fallback description for ids not in the registry.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Fallback name when no id is given.
pub const UNKNOWN_RULE: &str = "Unknown rule";

/// Look up a rule definition by id, case-insensitively.
pub fn rule_definition(rule_id: &str) -> Option<&'static RuleDefinition> {
    RuleId::parse(rule_id).and_then(|id| INDEX.get(&id).copied())
}

/// Display metadata for a rule id.
///
/// Unknown or absent ids resolve to an `info` fallback named after the
/// uppercased id (or `"Unknown rule"`); this never fails.
///
/// ```
/// use cleanflow::rules::{rule_meta, Severity};
///
/// assert_eq!(rule_meta(Some("r1")).severity, Severity::Critical);
/// assert_eq!(rule_meta(Some("R99")).name, "R99");
/// assert_eq!(rule_meta(None).name, "Unknown rule");
/// ```
pub fn rule_meta(rule_id: Option<&str>) -> RuleMeta {
    let upper = rule_id.map(str::to_uppercase).unwrap_or_default();
    match rule_definition(&upper) {
        Some(def) => RuleMeta::from(def),
        None => RuleMeta {
            name: if upper.is_empty() {
                UNKNOWN_RULE.to_string()
            } else {
                upper
            },
            severity: Severity::Info,
            description: NO_DESCRIPTION.to_string(),
        },
    }
}

/// Severity for a rule id, `Info` when unknown.
pub fn rule_severity(rule_id: Option<&str>) -> Severity {
    rule_id
        .and_then(rule_definition)
        .map(|def| def.severity)
        .unwrap_or(Severity::Info)
}

/// All rules in id order.
pub fn all_rules() -> &'static [RuleDefinition] {
    &RULES
}

/// Rules with the given severity, in id order.
pub fn rules_by_severity(severity: Severity) -> impl Iterator<Item = &'static RuleDefinition> {
    RULES.iter().filter(move |rule| rule.severity == severity)
}
