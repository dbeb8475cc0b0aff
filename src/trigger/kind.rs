//! The closed set of trigger kinds and the comparison each one performs.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, TransactionRecord};

/// The kind of comparison a trigger performs.
///
/// Serialized with the snake case identifiers stored in the database,
/// e.g. `description_ends` or `amount_more`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// The description starts with the trigger value.
    DescriptionStarts,
    /// The description ends with the trigger value.
    DescriptionEnds,
    /// The description contains the trigger value.
    DescriptionContains,
    /// The description is the trigger value.
    DescriptionIs,
    /// The source account name starts with the trigger value.
    FromAccountStarts,
    /// The source account name ends with the trigger value.
    FromAccountEnds,
    /// The source account name contains the trigger value.
    FromAccountContains,
    /// The source account name is the trigger value.
    FromAccountIs,
    /// The destination account name starts with the trigger value.
    ToAccountStarts,
    /// The destination account name ends with the trigger value.
    ToAccountEnds,
    /// The destination account name contains the trigger value.
    ToAccountContains,
    /// The destination account name is the trigger value.
    ToAccountIs,
    /// The notes start with the trigger value.
    NotesStart,
    /// The notes end with the trigger value.
    NotesEnd,
    /// The notes contain the trigger value.
    NotesContain,
    /// The notes are the trigger value.
    NotesAre,
    /// The amount is less than the trigger value.
    AmountLess,
    /// The amount is more than the trigger value.
    AmountMore,
    /// The amount is exactly the trigger value.
    AmountExactly,
}

/// The transaction text fields that text triggers can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextField {
    Description,
    SourceAccount,
    DestinationAccount,
    Notes,
}

impl TextField {
    /// Read the field from `record`, treating a missing value as empty.
    pub(crate) fn read(self, record: &TransactionRecord) -> &str {
        let value = match self {
            TextField::Description => &record.description,
            TextField::SourceAccount => &record.source_account,
            TextField::DestinationAccount => &record.destination_account,
            TextField::Notes => &record.notes,
        };

        value.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextComparison {
    Starts,
    Ends,
    Contains,
    Is,
}

impl TextComparison {
    pub(crate) fn relation(self, matched: bool) -> &'static str {
        match (self, matched) {
            (TextComparison::Starts, true) => "starts with",
            (TextComparison::Starts, false) => "does not start with",
            (TextComparison::Ends, true) => "ends with",
            (TextComparison::Ends, false) => "does not end with",
            (TextComparison::Contains, true) => "contains",
            (TextComparison::Contains, false) => "does not contain",
            (TextComparison::Is, true) => "is",
            (TextComparison::Is, false) => "is not",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AmountComparison {
    Less,
    More,
    Exactly,
}

impl AmountComparison {
    pub(crate) fn relation(self, matched: bool) -> &'static str {
        match (self, matched) {
            (AmountComparison::Less, true) => "is less than",
            (AmountComparison::Less, false) => "is not less than",
            (AmountComparison::More, true) => "is more than",
            (AmountComparison::More, false) => "is not more than",
            (AmountComparison::Exactly, true) => "is exactly",
            (AmountComparison::Exactly, false) => "is not exactly",
        }
    }
}

/// Which value a trigger kind reads and how it compares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TriggerFamily {
    Text {
        field: TextField,
        comparison: TextComparison,
    },
    Amount(AmountComparison),
}

impl TriggerKind {
    /// Every trigger kind, in the order they are shown to rule authors.
    pub const ALL: [TriggerKind; 19] = [
        TriggerKind::DescriptionStarts,
        TriggerKind::DescriptionEnds,
        TriggerKind::DescriptionContains,
        TriggerKind::DescriptionIs,
        TriggerKind::FromAccountStarts,
        TriggerKind::FromAccountEnds,
        TriggerKind::FromAccountContains,
        TriggerKind::FromAccountIs,
        TriggerKind::ToAccountStarts,
        TriggerKind::ToAccountEnds,
        TriggerKind::ToAccountContains,
        TriggerKind::ToAccountIs,
        TriggerKind::NotesStart,
        TriggerKind::NotesEnd,
        TriggerKind::NotesContain,
        TriggerKind::NotesAre,
        TriggerKind::AmountLess,
        TriggerKind::AmountMore,
        TriggerKind::AmountExactly,
    ];

    /// The identifier used for this kind in storage and rule files.
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerKind::DescriptionStarts => "description_starts",
            TriggerKind::DescriptionEnds => "description_ends",
            TriggerKind::DescriptionContains => "description_contains",
            TriggerKind::DescriptionIs => "description_is",
            TriggerKind::FromAccountStarts => "from_account_starts",
            TriggerKind::FromAccountEnds => "from_account_ends",
            TriggerKind::FromAccountContains => "from_account_contains",
            TriggerKind::FromAccountIs => "from_account_is",
            TriggerKind::ToAccountStarts => "to_account_starts",
            TriggerKind::ToAccountEnds => "to_account_ends",
            TriggerKind::ToAccountContains => "to_account_contains",
            TriggerKind::ToAccountIs => "to_account_is",
            TriggerKind::NotesStart => "notes_start",
            TriggerKind::NotesEnd => "notes_end",
            TriggerKind::NotesContain => "notes_contain",
            TriggerKind::NotesAre => "notes_are",
            TriggerKind::AmountLess => "amount_less",
            TriggerKind::AmountMore => "amount_more",
            TriggerKind::AmountExactly => "amount_exactly",
        }
    }

    /// Whether this kind compares text (as opposed to amounts).
    pub fn is_text(self) -> bool {
        matches!(self.family(), TriggerFamily::Text { .. })
    }

    pub(crate) fn family(self) -> TriggerFamily {
        use TextComparison::{Contains, Ends, Is, Starts};
        use TextField::{Description, DestinationAccount, Notes, SourceAccount};

        let text = |field, comparison| TriggerFamily::Text { field, comparison };

        match self {
            TriggerKind::DescriptionStarts => text(Description, Starts),
            TriggerKind::DescriptionEnds => text(Description, Ends),
            TriggerKind::DescriptionContains => text(Description, Contains),
            TriggerKind::DescriptionIs => text(Description, Is),
            TriggerKind::FromAccountStarts => text(SourceAccount, Starts),
            TriggerKind::FromAccountEnds => text(SourceAccount, Ends),
            TriggerKind::FromAccountContains => text(SourceAccount, Contains),
            TriggerKind::FromAccountIs => text(SourceAccount, Is),
            TriggerKind::ToAccountStarts => text(DestinationAccount, Starts),
            TriggerKind::ToAccountEnds => text(DestinationAccount, Ends),
            TriggerKind::ToAccountContains => text(DestinationAccount, Contains),
            TriggerKind::ToAccountIs => text(DestinationAccount, Is),
            TriggerKind::NotesStart => text(Notes, Starts),
            TriggerKind::NotesEnd => text(Notes, Ends),
            TriggerKind::NotesContain => text(Notes, Contains),
            TriggerKind::NotesAre => text(Notes, Is),
            TriggerKind::AmountLess => TriggerFamily::Amount(AmountComparison::Less),
            TriggerKind::AmountMore => TriggerFamily::Amount(AmountComparison::More),
            TriggerKind::AmountExactly => TriggerFamily::Amount(AmountComparison::Exactly),
        }
    }
}

impl Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TriggerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownTriggerKind(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::{ConfigurationError, TransactionRecord};

    use super::{TextField, TriggerKind};

    #[test]
    fn identifiers_round_trip() {
        for kind in TriggerKind::ALL {
            assert_eq!(TriggerKind::from_str(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn serde_uses_identifiers() {
        for kind in TriggerKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();

            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        assert_eq!(
            TriggerKind::from_str("description_rhymes_with"),
            Err(ConfigurationError::UnknownTriggerKind(
                "description_rhymes_with".to_owned()
            ))
        );
    }

    #[test]
    fn only_amount_kinds_are_not_text() {
        let amount_kinds: Vec<_> = TriggerKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_text())
            .collect();

        assert_eq!(
            amount_kinds,
            [
                TriggerKind::AmountLess,
                TriggerKind::AmountMore,
                TriggerKind::AmountExactly
            ]
        );
    }

    #[test]
    fn missing_text_field_reads_as_empty() {
        let record = TransactionRecord::build(1, "1", "rent").without_description();

        assert_eq!(TextField::Description.read(&record), "");
        assert_eq!(TextField::Notes.read(&record), "");
    }
}
