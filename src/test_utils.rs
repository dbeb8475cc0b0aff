//! Helpers shared by the unit tests.

use std::sync::{Arc, Mutex};

use crate::{
    AmountParser, RuleEvaluator, TransactionId,
    diagnostics::{DiagnosticLog, MalformedInputWarning, TriggerVerdict},
    rule::RuleId,
    trigger::{Trigger, TriggerFactory, TriggerKind},
};

/// A [DiagnosticLog] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    verdicts: Mutex<Vec<(TriggerKind, TransactionId, bool, String)>>,
    malformed_amounts: Mutex<Vec<(TransactionId, String)>>,
    rejections: Mutex<Vec<(TriggerKind, String)>>,
    rules: Mutex<Vec<(RuleId, TransactionId, bool)>>,
}

impl RecordingLog {
    pub fn verdicts(&self) -> Vec<(TriggerKind, TransactionId, bool, String)> {
        self.verdicts.lock().unwrap().clone()
    }

    pub fn malformed_amounts(&self) -> Vec<(TransactionId, String)> {
        self.malformed_amounts.lock().unwrap().clone()
    }

    pub fn rejections(&self) -> Vec<(TriggerKind, String)> {
        self.rejections.lock().unwrap().clone()
    }

    pub fn rules(&self) -> Vec<(RuleId, TransactionId, bool)> {
        self.rules.lock().unwrap().clone()
    }
}

impl DiagnosticLog for RecordingLog {
    fn trigger_evaluated(&self, verdict: &TriggerVerdict<'_>) {
        self.verdicts.lock().unwrap().push((
            verdict.kind,
            verdict.transaction_id,
            verdict.matched,
            verdict.rationale(),
        ));
    }

    fn malformed_input(&self, warning: &MalformedInputWarning<'_>) {
        self.malformed_amounts
            .lock()
            .unwrap()
            .push((warning.transaction_id, warning.amount.to_owned()));
    }

    fn trigger_rejected(&self, kind: TriggerKind, reason: &str) {
        self.rejections
            .lock()
            .unwrap()
            .push((kind, reason.to_owned()));
    }

    fn rule_evaluated(&self, rule_id: RuleId, transaction_id: TransactionId, matched: bool) {
        self.rules
            .lock()
            .unwrap()
            .push((rule_id, transaction_id, matched));
    }
}

/// A factory that logs to a throwaway [RecordingLog].
pub fn factory() -> TriggerFactory {
    TriggerFactory::new(Arc::new(RecordingLog::default()), AmountParser::default())
}

/// An evaluator that logs to `log`.
pub fn evaluator(log: Arc<RecordingLog>) -> RuleEvaluator {
    RuleEvaluator::new(log, AmountParser::default())
}

/// Build a trigger, panicking if the value is rejected.
pub fn trigger(kind: TriggerKind, value: &str) -> Trigger {
    factory()
        .create(kind, Some(value), false)
        .expect("Could not create test trigger")
}
