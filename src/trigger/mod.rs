//! Triggers: single user-configured predicates evaluated against a transaction.
//!
//! Each [Trigger] is built by the [TriggerFactory] from a [TriggerKind] and a
//! raw value. The factory validates the value once, so evaluation never fails:
//! a transaction the trigger cannot make sense of simply does not match.

mod factory;
mod kind;
mod text;
mod vacuity;

pub use factory::TriggerFactory;
pub use kind::TriggerKind;
pub use vacuity::{Vacuity, vacuity_reason, will_match_everything};

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AmountParser, TransactionRecord,
    amount::magnitude,
    diagnostics::{DiagnosticLog, MalformedInputWarning, TriggerVerdict},
};

use kind::{AmountComparison, TextComparison, TextField};

/// A trigger as entered by a rule author, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// The kind of comparison to perform.
    #[serde(rename = "type")]
    pub kind: TriggerKind,
    /// The value to compare against. A missing value is always rejected.
    #[serde(default)]
    pub value: Option<String>,
    /// Ignore the triggers that follow this one in the rule.
    #[serde(default)]
    pub stop_processing: bool,
}

impl TriggerConfig {
    /// Create a config with a value and without `stop_processing`.
    pub fn new(kind: TriggerKind, value: &str) -> Self {
        Self {
            kind,
            value: Some(value.to_owned()),
            stop_processing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Matcher {
    Text {
        field: TextField,
        comparison: TextComparison,
        /// The case-folded search string.
        search: String,
    },
    Amount {
        comparison: AmountComparison,
        threshold: Decimal,
    },
}

/// A validated trigger bound to its value.
///
/// Triggers can only be created through a [TriggerFactory], which guarantees
/// that the value parses and does not match every transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    kind: TriggerKind,
    value: String,
    stop_processing: bool,
    matcher: Matcher,
}

impl Trigger {
    /// The kind of comparison this trigger performs.
    pub fn kind(&self) -> TriggerKind {
        self.kind
    }

    /// The configured value, with surrounding whitespace removed.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the triggers after this one in a rule are ignored.
    pub fn stop_processing(&self) -> bool {
        self.stop_processing
    }

    /// The configuration this trigger was built from, for storage.
    pub fn to_config(&self) -> TriggerConfig {
        TriggerConfig {
            kind: self.kind,
            value: Some(self.value.clone()),
            stop_processing: self.stop_processing,
        }
    }

    /// Returns `true` if `record` satisfies this trigger.
    ///
    /// Text triggers compare case-insensitively. Amount triggers compare the
    /// magnitude of the transaction amount; an amount that `amounts` cannot
    /// parse is reported to `log` and does not match.
    pub fn triggered(
        &self,
        record: &TransactionRecord,
        amounts: &AmountParser,
        log: &dyn DiagnosticLog,
    ) -> bool {
        match &self.matcher {
            Matcher::Text {
                field,
                comparison,
                search,
            } => {
                let field_value = text::fold_case(field.read(record));
                let matched = text::compare(*comparison, &field_value, search);

                log.trigger_evaluated(&TriggerVerdict {
                    kind: self.kind,
                    transaction_id: record.id,
                    field_value: Cow::Borrowed(&field_value),
                    trigger_value: Cow::Borrowed(search),
                    relation: comparison.relation(matched),
                    matched,
                });

                matched
            }
            Matcher::Amount {
                comparison,
                threshold,
            } => {
                let Ok(amount) = amounts.parse(&record.amount) else {
                    log.malformed_input(&MalformedInputWarning {
                        kind: self.kind,
                        transaction_id: record.id,
                        amount: &record.amount,
                    });

                    return false;
                };

                let amount = magnitude(amount);
                let matched = match comparison {
                    AmountComparison::Less => amount < *threshold,
                    AmountComparison::More => amount > *threshold,
                    AmountComparison::Exactly => amount == *threshold,
                };

                log.trigger_evaluated(&TriggerVerdict {
                    kind: self.kind,
                    transaction_id: record.id,
                    field_value: Cow::Owned(amount.to_string()),
                    trigger_value: Cow::Borrowed(&self.value),
                    relation: comparison.relation(matched),
                    matched,
                });

                matched
            }
        }
    }
}
