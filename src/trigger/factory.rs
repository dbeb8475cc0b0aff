use std::sync::Arc;

use crate::{
    AmountParser, ConfigurationError,
    diagnostics::DiagnosticLog,
    trigger::{
        Matcher, Trigger, TriggerConfig, TriggerKind,
        kind::TriggerFamily,
        text::fold_case,
        vacuity::will_match_everything,
    },
};

/// Builds validated [Trigger]s from rule author input.
///
/// This is the only way to construct a [Trigger]. Every value is checked with
/// [will_match_everything] and parsed for its kind before the trigger exists.
#[derive(Clone)]
pub struct TriggerFactory {
    log: Arc<dyn DiagnosticLog>,
    amounts: AmountParser,
}

impl TriggerFactory {
    /// Create a factory that reports rejected values to `log` and reads
    /// amount values with `amounts`.
    pub fn new(log: Arc<dyn DiagnosticLog>, amounts: AmountParser) -> Self {
        Self { log, amounts }
    }

    /// Create a trigger of `kind` bound to `value`.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [ConfigurationError::MissingValue] if `value` is `None`,
    /// - [ConfigurationError::MatchesEverything] if `value` would match every transaction,
    /// - [ConfigurationError::InvalidAmount] if `kind` compares amounts and `value` is not a decimal.
    pub fn create(
        &self,
        kind: TriggerKind,
        value: Option<&str>,
        stop_processing: bool,
    ) -> Result<Trigger, ConfigurationError> {
        if will_match_everything(kind, value, &self.amounts, self.log.as_ref()) {
            return Err(match value {
                None => ConfigurationError::MissingValue(kind),
                Some(value) => ConfigurationError::MatchesEverything {
                    kind,
                    value: value.to_owned(),
                },
            });
        }

        let Some(value) = value.map(str::trim) else {
            return Err(ConfigurationError::MissingValue(kind));
        };

        let matcher = match kind.family() {
            TriggerFamily::Text { field, comparison } => Matcher::Text {
                field,
                comparison,
                search: fold_case(value),
            },
            TriggerFamily::Amount(comparison) => {
                let threshold = self.amounts.parse(value).map_err(|error| {
                    self.log.trigger_rejected(kind, &error.to_string());

                    ConfigurationError::InvalidAmount {
                        kind,
                        value: value.to_owned(),
                    }
                })?;

                Matcher::Amount {
                    comparison,
                    threshold,
                }
            }
        };

        Ok(Trigger {
            kind,
            value: value.to_owned(),
            stop_processing,
            matcher,
        })
    }

    /// Create a trigger from a stored or submitted configuration.
    ///
    /// # Errors
    ///
    /// See [TriggerFactory::create].
    pub fn from_config(&self, config: &TriggerConfig) -> Result<Trigger, ConfigurationError> {
        self.create(config.kind, config.value.as_deref(), config.stop_processing)
    }

    /// Create a trigger for each configuration, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// See [TriggerFactory::create].
    pub fn create_all(&self, configs: &[TriggerConfig]) -> Result<Vec<Trigger>, ConfigurationError> {
        configs
            .iter()
            .map(|config| self.from_config(config))
            .collect()
    }
}
