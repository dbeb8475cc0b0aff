//! Storage of rules and their triggers in SQLite.
//!
//! Every write goes through the [TriggerFactory], so a trigger that would match
//! every transaction never reaches the database.

use std::str::FromStr;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    rule::models::{Rule, RuleDefinition, RuleId},
    trigger::{TriggerConfig, TriggerFactory, TriggerKind},
};

/// Create the `rule` and `rule_trigger` tables if they do not exist.
pub fn create_rule_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS rule (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                rule_order INTEGER NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                stop_processing INTEGER NOT NULL DEFAULT 0
            );",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS rule_trigger (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rule_id INTEGER NOT NULL,
                trigger_order INTEGER NOT NULL,
                trigger_type TEXT NOT NULL,
                trigger_value TEXT NOT NULL,
                stop_processing INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(rule_id) REFERENCES rule(id) ON UPDATE CASCADE ON DELETE CASCADE
            );",
        (),
    )?;

    // Create index for foreign key to improve query performance
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_rule_trigger_rule_id ON rule_trigger(rule_id)",
        (),
    )?;

    Ok(())
}

/// Validate `definition` and save it as a new rule after all existing rules.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidConfiguration] if any trigger is invalid, in which case
///   nothing is written,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_rule(
    definition: &RuleDefinition,
    factory: &TriggerFactory,
    connection: &Connection,
) -> Result<Rule, Error> {
    let mut rule = definition.build(0, factory)?;

    let transaction = connection.unchecked_transaction()?;

    transaction.execute(
        "INSERT INTO rule (title, rule_order, active, stop_processing)
         VALUES (?1, (SELECT COALESCE(MAX(rule_order), 0) + 1 FROM rule), ?2, ?3);",
        (&rule.title, rule.active, rule.stop_processing),
    )?;

    rule.id = transaction.last_insert_rowid();
    insert_triggers(rule.id, &rule.trigger_configs(), &transaction)?;

    transaction.commit()?;

    Ok(rule)
}

/// Retrieve a rule and its triggers by `rule_id`.
///
/// # Errors
/// This function will return an:
/// - [Error::NotFound] if there is no rule with `rule_id`,
/// - [Error::InvalidConfiguration] if a stored trigger is no longer valid,
/// - [Error::SqlError] if there is some other SQL error.
pub fn get_rule(
    rule_id: RuleId,
    factory: &TriggerFactory,
    connection: &Connection,
) -> Result<Rule, Error> {
    let row = connection
        .prepare("SELECT id, title, active, stop_processing FROM rule WHERE id = :id;")?
        .query_row(&[(":id", &rule_id)], map_rule_row)?;

    build_rule(row, factory, connection)
}

/// Retrieve all rules in the order they are applied.
///
/// # Errors
/// This function will return an error if there is an SQL error or a stored
/// trigger is no longer valid.
pub fn get_all_rules(factory: &TriggerFactory, connection: &Connection) -> Result<Vec<Rule>, Error> {
    let rows = connection
        .prepare(
            "SELECT id, title, active, stop_processing FROM rule ORDER BY rule_order ASC, id ASC;",
        )?
        .query_map([], map_rule_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|row| build_rule(row, factory, connection))
        .collect()
}

/// Replace the triggers of a rule, validating the new triggers first.
///
/// # Errors
/// This function will return an:
/// - [Error::UpdateMissingRule] if there is no rule with `rule_id`,
/// - [Error::InvalidConfiguration] if any trigger is invalid, in which case
///   the stored rule is unchanged,
/// - [Error::SqlError] if there is some other SQL error.
pub fn update_rule_triggers(
    rule_id: RuleId,
    triggers: &[TriggerConfig],
    factory: &TriggerFactory,
    connection: &Connection,
) -> Result<Rule, Error> {
    let row = connection
        .prepare("SELECT id, title, active, stop_processing FROM rule WHERE id = :id;")?
        .query_row(&[(":id", &rule_id)], map_rule_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingRule,
            error => error.into(),
        })?;

    let rule = RuleDefinition {
        title: row.title,
        triggers: triggers.to_vec(),
        stop_processing: row.stop_processing,
        active: row.active,
    }
    .build(rule_id, factory)?;

    let transaction = connection.unchecked_transaction()?;
    transaction.execute("DELETE FROM rule_trigger WHERE rule_id = ?1", [rule_id])?;
    insert_triggers(rule_id, &rule.trigger_configs(), &transaction)?;
    transaction.commit()?;

    Ok(rule)
}

/// Delete a rule and its triggers.
///
/// # Errors
/// This function will return an error if there is an SQL error or if the rule doesn't exist.
pub fn delete_rule(rule_id: RuleId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    transaction.execute("DELETE FROM rule_trigger WHERE rule_id = ?1", [rule_id])?;
    let rows_affected = transaction.execute("DELETE FROM rule WHERE id = ?1", [rule_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRule);
    }

    transaction.commit()?;

    Ok(())
}

struct RuleRow {
    id: RuleId,
    title: String,
    active: bool,
    stop_processing: bool,
}

fn map_rule_row(row: &Row) -> Result<RuleRow, rusqlite::Error> {
    Ok(RuleRow {
        id: row.get(0)?,
        title: row.get(1)?,
        active: row.get(2)?,
        stop_processing: row.get(3)?,
    })
}

fn build_rule(row: RuleRow, factory: &TriggerFactory, connection: &Connection) -> Result<Rule, Error> {
    let triggers = get_trigger_configs(row.id, connection)?;

    let rule = RuleDefinition {
        title: row.title,
        triggers,
        stop_processing: row.stop_processing,
        active: row.active,
    }
    .build(row.id, factory)
    .inspect_err(|error| tracing::error!("Stored rule #{} is invalid: {error}", row.id))?;

    Ok(rule)
}

fn get_trigger_configs(
    rule_id: RuleId,
    connection: &Connection,
) -> Result<Vec<TriggerConfig>, Error> {
    let rows = connection
        .prepare(
            "SELECT trigger_type, trigger_value, stop_processing FROM rule_trigger
             WHERE rule_id = :rule_id ORDER BY trigger_order ASC, id ASC;",
        )?
        .query_map(&[(":rule_id", &rule_id)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(trigger_type, value, stop_processing)| -> Result<TriggerConfig, Error> {
            Ok(TriggerConfig {
                kind: TriggerKind::from_str(&trigger_type)?,
                value: Some(value),
                stop_processing,
            })
        })
        .collect()
}

fn insert_triggers(
    rule_id: RuleId,
    triggers: &[TriggerConfig],
    connection: &Connection,
) -> Result<(), Error> {
    let mut statement = connection.prepare(
        "INSERT INTO rule_trigger (rule_id, trigger_order, trigger_type, trigger_value, stop_processing)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for (order, trigger) in triggers.iter().enumerate() {
        statement.execute((
            rule_id,
            order as i64,
            trigger.kind.as_str(),
            trigger.value.as_deref().unwrap_or_default(),
            trigger.stop_processing,
        ))?;
    }

    Ok(())
}
