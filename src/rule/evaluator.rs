use std::{collections::HashSet, num::NonZeroUsize, sync::Arc, thread};

use serde::Serialize;

use crate::{
    AmountParser, TransactionId, TransactionRecord,
    diagnostics::DiagnosticLog,
    rule::models::{Rule, RuleId},
};

/// The rules that fired for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    /// The transaction the rules fired for.
    pub transaction_id: TransactionId,
    /// The rules that fired, in the order they were applied.
    pub rule_ids: Vec<RuleId>,
}

/// Result of applying rules to a batch of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleApplication {
    /// The transactions that at least one rule fired for, in input order.
    pub matches: Vec<RuleMatch>,
    /// Number of transactions that at least one rule fired for.
    pub transactions_matched: usize,
    /// Number of distinct rules that fired.
    pub rules_fired: usize,
}

impl RuleApplication {
    /// Creates an empty result with no matches.
    pub fn empty() -> Self {
        Self {
            matches: Vec::new(),
            transactions_matched: 0,
            rules_fired: 0,
        }
    }

    fn from_matches(matches: Vec<RuleMatch>) -> Self {
        let rules_fired = matches
            .iter()
            .flat_map(|rule_match| rule_match.rule_ids.iter())
            .collect::<HashSet<_>>()
            .len();

        Self {
            transactions_matched: matches.len(),
            rules_fired,
            matches,
        }
    }
}

/// Decides whether rules fire for transactions.
///
/// Evaluation has no side effects other than the events sent to the
/// [DiagnosticLog], so one evaluator can be shared by many threads.
#[derive(Clone)]
pub struct RuleEvaluator {
    log: Arc<dyn DiagnosticLog>,
    amounts: AmountParser,
}

impl RuleEvaluator {
    /// Create an evaluator that reports verdicts to `log` and reads
    /// transaction amounts with `amounts`.
    pub fn new(log: Arc<dyn DiagnosticLog>, amounts: AmountParser) -> Self {
        Self { log, amounts }
    }

    /// Returns `true` if every trigger of `rule` matches `record`.
    ///
    /// Triggers are evaluated in order and evaluation stops at the first
    /// trigger that does not match.
    pub fn evaluate(&self, rule: &Rule, record: &TransactionRecord) -> bool {
        let matched = rule
            .triggers()
            .iter()
            .all(|trigger| trigger.triggered(record, &self.amounts, self.log.as_ref()));

        self.log.rule_evaluated(rule.id, record.id, matched);

        matched
    }

    /// The IDs of the active rules in `rules` that fire for `record`.
    ///
    /// Rules are applied in order. Once a rule with `stop_processing` fires,
    /// the remaining rules are skipped.
    pub fn matching_rules(&self, rules: &[Rule], record: &TransactionRecord) -> Vec<RuleId> {
        let mut rule_ids = Vec::new();

        for rule in rules.iter().filter(|rule| rule.active) {
            if !self.evaluate(rule, record) {
                continue;
            }

            rule_ids.push(rule.id);

            if rule.stop_processing {
                tracing::debug!(
                    "Rule #{} fired for transaction #{} and stops processing.",
                    rule.id,
                    record.id
                );
                break;
            }
        }

        rule_ids
    }

    /// Apply `rules` to each of `records`.
    pub fn apply_rules(&self, rules: &[Rule], records: &[TransactionRecord]) -> RuleApplication {
        if rules.is_empty() || records.is_empty() {
            return RuleApplication::empty();
        }

        RuleApplication::from_matches(self.match_records(rules, records))
    }

    /// Apply `rules` to each of `records`, sharding the records over up to
    /// `shards` threads.
    ///
    /// The result is the same as [RuleEvaluator::apply_rules].
    pub fn apply_rules_parallel(
        &self,
        rules: &[Rule],
        records: &[TransactionRecord],
        shards: NonZeroUsize,
    ) -> RuleApplication {
        if rules.is_empty() || records.is_empty() {
            return RuleApplication::empty();
        }

        if shards.get() == 1 {
            return self.apply_rules(rules, records);
        }

        let chunk_size = records.len().div_ceil(shards.get());

        let matches: Vec<RuleMatch> = thread::scope(|scope| {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || self.match_records(rules, chunk)))
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        RuleApplication::from_matches(matches)
    }

    fn match_records(&self, rules: &[Rule], records: &[TransactionRecord]) -> Vec<RuleMatch> {
        records
            .iter()
            .filter_map(|record| {
                let rule_ids = self.matching_rules(rules, record);

                (!rule_ids.is_empty()).then_some(RuleMatch {
                    transaction_id: record.id,
                    rule_ids,
                })
            })
            .collect()
    }
}
