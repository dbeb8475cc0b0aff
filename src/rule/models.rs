use serde::{Deserialize, Serialize};

use crate::{
    ConfigurationError,
    trigger::{Trigger, TriggerConfig, TriggerFactory},
};

/// Database identifier for a rule.
pub type RuleId = i64;

/// An ordered set of triggers that must all match for the rule to fire.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// The ID of the rule.
    pub id: RuleId,
    /// A short name for the rule shown to its author.
    pub title: String,
    /// Skip the rules after this one once it fires for a transaction.
    pub stop_processing: bool,
    /// Inactive rules are skipped when rules are applied to transactions.
    pub active: bool,
    triggers: Vec<Trigger>,
}

impl Rule {
    /// Create an active rule from its triggers.
    ///
    /// A trigger with `stop_processing` set ends the rule: the triggers after
    /// it are dropped.
    ///
    /// # Errors
    ///
    /// This function will return a [ConfigurationError::EmptyRule] if
    /// `triggers` is empty, since a rule without triggers would fire for every
    /// transaction.
    pub fn new(
        id: RuleId,
        title: &str,
        mut triggers: Vec<Trigger>,
    ) -> Result<Self, ConfigurationError> {
        if triggers.is_empty() {
            tracing::error!("Cannot create rule \"{title}\" without any triggers.");
            return Err(ConfigurationError::EmptyRule);
        }

        if let Some(last) = triggers.iter().position(Trigger::stop_processing) {
            let ignored = triggers.len() - (last + 1);

            if ignored > 0 {
                tracing::warn!(
                    "Rule \"{title}\" has {ignored} trigger(s) after a trigger that stops processing, \
                    these will be ignored."
                );
                triggers.truncate(last + 1);
            }
        }

        Ok(Self {
            id,
            title: title.to_owned(),
            stop_processing: false,
            active: true,
            triggers,
        })
    }

    /// Set whether later rules are skipped once this rule fires.
    pub fn with_stop_processing(mut self, stop_processing: bool) -> Self {
        self.stop_processing = stop_processing;
        self
    }

    /// Set whether the rule is applied to transactions.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// The triggers evaluated for this rule, in order.
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// The configuration of each trigger, in order.
    pub fn trigger_configs(&self) -> Vec<TriggerConfig> {
        self.triggers.iter().map(Trigger::to_config).collect()
    }
}

fn default_active() -> bool {
    true
}

/// A rule as written by its author, before its triggers are validated.
///
/// This is the format used in rule files and when saving a new rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// A short name for the rule.
    pub title: String,
    /// The triggers that must all match.
    pub triggers: Vec<TriggerConfig>,
    /// Skip the rules after this one once it fires for a transaction.
    #[serde(default)]
    pub stop_processing: bool,
    /// Whether the rule is applied to transactions.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl RuleDefinition {
    /// Create an active definition from a title and trigger configurations.
    pub fn new(title: &str, triggers: Vec<TriggerConfig>) -> Self {
        Self {
            title: title.to_owned(),
            triggers,
            stop_processing: false,
            active: true,
        }
    }

    /// Validate the triggers with `factory` and build the rule.
    ///
    /// # Errors
    ///
    /// Returns the first [ConfigurationError] found in the triggers, or
    /// [ConfigurationError::EmptyRule] if there are none.
    pub fn build(&self, id: RuleId, factory: &TriggerFactory) -> Result<Rule, ConfigurationError> {
        let triggers = factory.create_all(&self.triggers)?;

        Ok(Rule::new(id, &self.title, triggers)?
            .with_stop_processing(self.stop_processing)
            .with_active(self.active))
    }
}
