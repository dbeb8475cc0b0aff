use std::io::Read;

use crate::{
    Error,
    rule::models::{Rule, RuleDefinition},
    trigger::TriggerFactory,
};

/// Read a JSON list of rule definitions and validate every trigger.
///
/// Rules are numbered from 1 in the order they appear in the file.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidRuleFile] if `reader` does not contain a JSON list of rules,
/// - [Error::InvalidConfiguration] if any rule has an invalid trigger.
pub fn parse_rule_file<R: Read>(reader: R, factory: &TriggerFactory) -> Result<Vec<Rule>, Error> {
    let definitions: Vec<RuleDefinition> =
        serde_json::from_reader(reader).map_err(|error| Error::InvalidRuleFile(error.to_string()))?;

    definitions
        .iter()
        .zip(1..)
        .map(|(definition, id)| {
            definition.build(id, factory).map_err(|error| {
                tracing::error!("Rule \"{}\" is invalid: {error}", definition.title);
                Error::from(error)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{ConfigurationError, Error, test_utils::factory, trigger::TriggerKind};

    use super::parse_rule_file;

    #[test]
    fn parses_rules_in_order() {
        let json = r#"[
            {"title": "Coffee", "triggers": [
                {"type": "description_starts", "value": "starbucks"},
                {"type": "amount_less", "value": "20"}
            ]},
            {"title": "Rent", "stop_processing": true, "triggers": [
                {"type": "to_account_is", "value": "Landlord Ltd"}
            ]}
        ]"#;

        let rules = parse_rule_file(json.as_bytes(), &factory()).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, 1);
        assert_eq!(rules[0].title, "Coffee");
        assert_eq!(rules[0].triggers().len(), 2);
        assert_eq!(rules[1].id, 2);
        assert!(rules[1].stop_processing);
        assert_eq!(rules[1].triggers()[0].kind(), TriggerKind::ToAccountIs);
    }

    #[test]
    fn invalid_json_is_rejected() {
        let result = parse_rule_file("{ not json".as_bytes(), &factory());

        assert!(matches!(result, Err(Error::InvalidRuleFile(_))));
    }

    #[test]
    fn unknown_trigger_type_is_rejected() {
        let json = r#"[{"title": "Odd", "triggers": [{"type": "moon_phase", "value": "full"}]}]"#;

        let result = parse_rule_file(json.as_bytes(), &factory());

        assert!(matches!(result, Err(Error::InvalidRuleFile(_))));
    }

    #[test]
    fn vacuous_trigger_is_rejected() {
        let json = r#"[{"title": "All", "triggers": [{"type": "amount_more", "value": "0"}]}]"#;

        let result = parse_rule_file(json.as_bytes(), &factory());

        assert_eq!(
            result,
            Err(Error::InvalidConfiguration(
                ConfigurationError::MatchesEverything {
                    kind: TriggerKind::AmountMore,
                    value: "0".to_owned()
                }
            ))
        );
    }

    #[test]
    fn rule_without_triggers_is_rejected() {
        let json = r#"[{"title": "Empty", "triggers": []}]"#;

        let result = parse_rule_file(json.as_bytes(), &factory());

        assert_eq!(
            result,
            Err(Error::InvalidConfiguration(ConfigurationError::EmptyRule))
        );
    }
}
