//! [![github]](https://github.com/AnthonyDickson/budgeteur-rs)&ensp;
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//!
//! <br>
//!
//! The rule engine behind Budgeteur, a web app for managing your budget and
//! personal finances.
//!
//! Users write rules made of triggers such as "description ends with X" or
//! "amount is more than Y". This library decides, for each transaction, which
//! rules fire. It also refuses to save any trigger that would match every
//! transaction, so stored rules always mean something.
//!
//! ```
//! use std::sync::Arc;
//!
//! use budgeteur_rules::{
//!     AmountParser, RuleDefinition, RuleEvaluator, TracingLog, TransactionRecord, TriggerConfig,
//!     TriggerFactory, TriggerKind,
//! };
//!
//! let factory = TriggerFactory::new(Arc::new(TracingLog), AmountParser::default());
//! let evaluator = RuleEvaluator::new(Arc::new(TracingLog), AmountParser::default());
//!
//! let rule = RuleDefinition::new(
//!     "Bills",
//!     vec![TriggerConfig::new(TriggerKind::DescriptionEnds, "payment")],
//! )
//! .build(1, &factory)
//! .unwrap();
//!
//! let record = TransactionRecord::build(1, "-120.00", "Grocery Store Payment");
//! assert!(evaluator.evaluate(&rule, &record));
//! ```

#![warn(missing_docs)]

mod amount;
mod diagnostics;
mod rule;
mod transaction;
mod transaction_csv;
mod trigger;

#[cfg(test)]
mod test_utils;

pub use amount::{AmountParseError, AmountParser, magnitude};
pub use diagnostics::{DiagnosticLog, MalformedInputWarning, TracingLog, TriggerVerdict};
pub use rule::{
    Rule, RuleApplication, RuleDefinition, RuleEvaluator, RuleId, RuleMatch, create_rule,
    create_rule_tables, delete_rule, get_all_rules, get_rule, parse_rule_file,
    update_rule_triggers,
};
pub use transaction::{TransactionId, TransactionRecord};
pub use transaction_csv::parse_transactions_csv;
pub use trigger::{
    Trigger, TriggerConfig, TriggerFactory, TriggerKind, Vacuity, vacuity_reason,
    will_match_everything,
};

/// A trigger or rule configuration that cannot be saved.
///
/// These errors are shown to the rule author when they save a rule. They are
/// never produced while evaluating rules against transactions.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The trigger has no value to compare against.
    #[error("a {0} trigger needs a value")]
    MissingValue(TriggerKind),

    /// The trigger value would match every transaction.
    ///
    /// For example, every description ends with the empty string and every
    /// transaction amount is more than zero.
    #[error("a {kind} trigger with the value \"{value}\" would match every transaction")]
    MatchesEverything {
        /// The kind of the rejected trigger.
        kind: TriggerKind,
        /// The rejected value.
        value: String,
    },

    /// An amount trigger was given a value that is not a decimal number.
    #[error("\"{value}\" is not a valid amount for a {kind} trigger")]
    InvalidAmount {
        /// The kind of the rejected trigger.
        kind: TriggerKind,
        /// The rejected value.
        value: String,
    },

    /// The trigger type is not one of the known [TriggerKind]s.
    #[error("\"{0}\" is not a known trigger type")]
    UnknownTriggerKind(String),

    /// A rule must have at least one trigger.
    #[error("a rule needs at least one trigger")]
    EmptyRule,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A trigger or rule was rejected when it was created or loaded.
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigurationError),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Tried to update a rule that does not exist
    #[error("tried to update a rule that is not in the database")]
    UpdateMissingRule,

    /// Tried to delete a rule that does not exist
    #[error("tried to delete a rule that is not in the database")]
    DeleteMissingRule,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// The rule file is not a JSON list of rules.
    #[error("Could not parse the rule file: {0}")]
    InvalidRuleFile(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
