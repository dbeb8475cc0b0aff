//! Reading transaction records from CSV files.

use std::io::Read;

use serde::Deserialize;

use crate::{Error, TransactionId, TransactionRecord};

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: TransactionId,
    #[serde(default)]
    description: Option<String>,
    amount: String,
    #[serde(default)]
    source_account: Option<String>,
    #[serde(default)]
    destination_account: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl From<CsvRow> for TransactionRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            amount: row.amount,
            source_account: row.source_account,
            destination_account: row.destination_account,
            notes: row.notes,
        }
    }
}

/// Parses transactions from CSV data with a header row.
///
/// The columns `id` and `amount` are required. The columns `description`,
/// `source_account`, `destination_account` and `notes` are optional, and empty
/// cells are read as missing values. Amounts are not parsed here, a malformed
/// amount only affects the amount triggers evaluated against it.
///
/// Returns `Error::InvalidCsv` if a row cannot be read.
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<TransactionRecord>, Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<CsvRow>()
        .map(|row| {
            row.map(TransactionRecord::from).map_err(|error| {
                tracing::debug!("Could not parse CSV row: {error}");
                Error::InvalidCsv(error.to_string())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{Error, TransactionRecord};

    use super::parse_transactions_csv;

    #[test]
    fn parses_required_and_optional_columns() {
        let text = "id,description,amount,source_account,destination_account,notes\n\
            1,Starbucks Downtown,-4.50,Everyday,,\n\
            2,,2500.00,Employer,Everyday,March salary\n";

        let records = parse_transactions_csv(text.as_bytes()).unwrap();

        assert_eq!(
            records,
            [
                TransactionRecord::build(1, "-4.50", "Starbucks Downtown").source_account("Everyday"),
                TransactionRecord::build(2, "2500.00", "")
                    .without_description()
                    .source_account("Employer")
                    .destination_account("Everyday")
                    .notes("March salary"),
            ]
        );
    }

    #[test]
    fn optional_columns_can_be_omitted() {
        let text = "id,amount,description\n7, -12.00 , Bus fare \n";

        let records = parse_transactions_csv(text.as_bytes()).unwrap();

        assert_eq!(records, [TransactionRecord::build(7, "-12.00", "Bus fare")]);
    }

    #[test]
    fn malformed_amount_is_kept_as_text() {
        let text = "id,description,amount\n3,Mystery,twelve\n";

        let records = parse_transactions_csv(text.as_bytes()).unwrap();

        assert_eq!(records[0].amount, "twelve");
    }

    #[test]
    fn missing_id_is_rejected() {
        let text = "id,description,amount\n,Mystery,12\n";

        let result = parse_transactions_csv(text.as_bytes());

        assert!(matches!(result, Err(Error::InvalidCsv(_))));
    }

    #[test]
    fn missing_amount_column_is_rejected() {
        let text = "id,description\n1,Mystery\n";

        let result = parse_transactions_csv(text.as_bytes());

        assert!(matches!(result, Err(Error::InvalidCsv(_))));
    }
}
