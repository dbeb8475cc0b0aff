//! The read-only view of a transaction that rules are evaluated against.

use serde::{Deserialize, Serialize};

/// Alias for the integer type used for transaction IDs in the database.
pub type TransactionId = i64;

/// An expense or income as seen by the rule engine.
///
/// The engine only reads these records, it never changes them. The amount is
/// kept as the text stored by the persistence layer so that a malformed amount
/// only affects the amount triggers evaluated against it.
///
/// To create a new `TransactionRecord`, use [TransactionRecord::build].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// The ID of the transaction, used in diagnostics.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// The amount of money spent or earned, as a decimal string.
    ///
    /// Positive values represent income, negative values represent expenses.
    pub amount: String,
    /// The name of the account the money came from.
    pub source_account: Option<String>,
    /// The name of the account the money went to.
    pub destination_account: Option<String>,
    /// Free-form notes attached to the transaction.
    pub notes: Option<String>,
}

impl TransactionRecord {
    /// Create a record with a description and amount.
    ///
    /// Optional fields can be set with the chained setters, e.g.
    ///
    /// ```
    /// use budgeteur_rules::TransactionRecord;
    ///
    /// let record = TransactionRecord::build(1, "-45.99", "Coffee shop purchase")
    ///     .source_account("Everyday")
    ///     .notes("with Sam");
    ///
    /// assert_eq!(record.notes.as_deref(), Some("with Sam"));
    /// ```
    pub fn build(id: TransactionId, amount: &str, description: &str) -> Self {
        Self {
            id,
            description: Some(description.to_owned()),
            amount: amount.to_owned(),
            source_account: None,
            destination_account: None,
            notes: None,
        }
    }

    /// Remove the description, as if the persistence layer had none.
    pub fn without_description(mut self) -> Self {
        self.description = None;
        self
    }

    /// Set the source account name.
    pub fn source_account(mut self, name: &str) -> Self {
        self.source_account = Some(name.to_owned());
        self
    }

    /// Set the destination account name.
    pub fn destination_account(mut self, name: &str) -> Self {
        self.destination_account = Some(name.to_owned());
        self
    }

    /// Set the notes.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_owned());
        self
    }
}
