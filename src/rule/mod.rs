//! Rules: ordered sets of triggers that must all match a transaction.
//!
//! Rules are validated when they are saved or loaded from a rule file, then
//! evaluated against transactions by the [RuleEvaluator].

mod db;
mod evaluator;
mod file;
mod models;

pub use db::{
    create_rule, create_rule_tables, delete_rule, get_all_rules, get_rule, update_rule_triggers,
};
pub use evaluator::{RuleApplication, RuleEvaluator, RuleMatch};
pub use file::parse_rule_file;
pub use models::{Rule, RuleDefinition, RuleId};
