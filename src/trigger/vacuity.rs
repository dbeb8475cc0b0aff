//! Detection of trigger configurations that would match every transaction.
//!
//! A trigger "matches everything" when its value places no restriction on the
//! transactions it accepts, e.g. a description trigger with an empty search
//! string, or "amount is more than 0". Such triggers are rejected when a rule is
//! saved, so stored rules are always restrictive and evaluation never has to
//! check for them.

use rust_decimal::Decimal;

use crate::{
    AmountParser,
    diagnostics::DiagnosticLog,
    trigger::{
        TriggerKind,
        kind::{AmountComparison, TriggerFamily},
    },
};

/// Why a trigger configuration would match every transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Vacuity {
    /// No value was configured, so the trigger cannot restrict anything.
    #[error("a trigger with a null value matches every transaction")]
    NullValue,

    /// The empty string starts, ends, and is contained in every text.
    #[error("\"\" as a value matches every transaction")]
    EmptyText,

    /// Every transaction amount is more than a threshold of zero or less.
    #[error("every transaction amount is more than {0}")]
    NonPositiveThreshold(Decimal),
}

/// Classify why `raw_value` would make a trigger of `kind` match every transaction.
///
/// Returns `None` when the configuration is restrictive. Amount values that
/// cannot be parsed are not vacuous, they are rejected by the
/// [TriggerFactory](crate::TriggerFactory) as invalid instead.
pub fn vacuity_reason(
    kind: TriggerKind,
    raw_value: Option<&str>,
    amounts: &AmountParser,
) -> Option<Vacuity> {
    let Some(value) = raw_value else {
        return Some(Vacuity::NullValue);
    };

    match kind.family() {
        TriggerFamily::Text { .. } if value.trim().is_empty() => Some(Vacuity::EmptyText),
        TriggerFamily::Text { .. } => None,
        TriggerFamily::Amount(AmountComparison::More) => match amounts.parse(value) {
            Ok(threshold) if threshold <= Decimal::ZERO => {
                Some(Vacuity::NonPositiveThreshold(threshold))
            }
            _ => None,
        },
        // Amounts are unbounded, so no threshold admits every transaction.
        TriggerFamily::Amount(AmountComparison::Less | AmountComparison::Exactly) => None,
    }
}

/// Returns `true` if a trigger of `kind` configured with `raw_value` would
/// match every transaction.
///
/// Rejections are reported to `log` with the reason. Restrictive values return
/// `false` without logging.
pub fn will_match_everything(
    kind: TriggerKind,
    raw_value: Option<&str>,
    amounts: &AmountParser,
    log: &dyn DiagnosticLog,
) -> bool {
    match vacuity_reason(kind, raw_value, amounts) {
        Some(reason) => {
            log.trigger_rejected(kind, &reason.to_string());
            true
        }
        None => false,
    }
}
