//! DQ rule metadata: identifiers, severity tiers and the static registry.
//!
//! The registry is built once on first use and never mutated. Lookups are
//! total: an unknown id still yields displayable metadata.

mod meta;
mod registry;

pub use meta::{RuleDefinition, RuleId, RuleMeta, Severity};
pub use registry::{
    all_rules, rule_definition, rule_meta, rule_severity, rules_by_severity, NO_DESCRIPTION,
    RULES, UNKNOWN_RULE,
};
