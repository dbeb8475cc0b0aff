//! Diagnostic logging for trigger evaluation and trigger configuration.
//!
//! The rule engine never logs through a global facade directly. Instead the
//! [TriggerFactory](crate::TriggerFactory) and [RuleEvaluator](crate::RuleEvaluator)
//! are handed a [DiagnosticLog] when they are created. [TracingLog] forwards
//! everything to `tracing`, which is what the application uses.

use std::borrow::Cow;

use crate::{TransactionId, rule::RuleId, trigger::TriggerKind};

/// The outcome of evaluating one trigger against one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerVerdict<'a> {
    /// The kind of trigger that was evaluated.
    pub kind: TriggerKind,
    /// The transaction the trigger was evaluated against.
    pub transaction_id: TransactionId,
    /// The value read from the transaction, after normalisation.
    pub field_value: Cow<'a, str>,
    /// The configured trigger value, after normalisation.
    pub trigger_value: Cow<'a, str>,
    /// How the two values relate, e.g. "ends with" or "is not more than".
    pub relation: &'static str,
    /// Whether the trigger matched.
    pub matched: bool,
}

impl TriggerVerdict<'_> {
    /// A human readable explanation of the verdict for audit logs.
    pub fn rationale(&self) -> String {
        format!(
            "\"{}\" {} \"{}\"",
            self.field_value, self.relation, self.trigger_value
        )
    }
}

/// A transaction amount that could not be read while evaluating an amount trigger.
///
/// The trigger treats the transaction as not matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedInputWarning<'a> {
    /// The kind of trigger that was evaluated.
    pub kind: TriggerKind,
    /// The transaction with the malformed amount.
    pub transaction_id: TransactionId,
    /// The raw amount text.
    pub amount: &'a str,
}

/// A sink for the engine's diagnostic events.
///
/// Implementations are shared between threads evaluating different
/// transactions, so each call must write its event as a single unit.
pub trait DiagnosticLog: Send + Sync {
    /// Called once for every trigger evaluated against a transaction.
    fn trigger_evaluated(&self, verdict: &TriggerVerdict<'_>);

    /// Called when a transaction amount cannot be parsed.
    fn malformed_input(&self, warning: &MalformedInputWarning<'_>);

    /// Called when a trigger configuration is rejected.
    fn trigger_rejected(&self, kind: TriggerKind, reason: &str);

    /// Called once for every rule evaluated against a transaction.
    fn rule_evaluated(&self, rule_id: RuleId, transaction_id: TransactionId, matched: bool);
}

/// A [DiagnosticLog] that emits `tracing` events.
///
/// Verdicts are logged at the `debug` level, malformed amounts at `warn` and
/// rejected configurations at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl DiagnosticLog for TracingLog {
    fn trigger_evaluated(&self, verdict: &TriggerVerdict<'_>) {
        tracing::debug!(
            trigger = %verdict.kind,
            transaction_id = verdict.transaction_id,
            matched = verdict.matched,
            "RuleTrigger {} for transaction #{}: {}, return {}.",
            verdict.kind,
            verdict.transaction_id,
            verdict.rationale(),
            verdict.matched
        );
    }

    fn malformed_input(&self, warning: &MalformedInputWarning<'_>) {
        tracing::warn!(
            trigger = %warning.kind,
            transaction_id = warning.transaction_id,
            "RuleTrigger {} for transaction #{}: could not read the amount \"{}\", return false.",
            warning.kind,
            warning.transaction_id,
            warning.amount
        );
    }

    fn trigger_rejected(&self, kind: TriggerKind, reason: &str) {
        tracing::error!(trigger = %kind, "Cannot use {kind}: {reason}");
    }

    fn rule_evaluated(&self, rule_id: RuleId, transaction_id: TransactionId, matched: bool) {
        tracing::debug!(
            rule_id,
            transaction_id,
            matched,
            "Rule #{rule_id} for transaction #{transaction_id}: return {matched}."
        );
    }
}
