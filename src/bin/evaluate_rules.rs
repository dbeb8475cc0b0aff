use std::{error::Error, fs::File, io, num::NonZeroUsize, path::PathBuf, process::exit, sync::Arc};

use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use budgeteur_rules::{
    AmountParser, Rule, RuleEvaluator, TracingLog, TriggerFactory, create_rule_tables,
    get_all_rules, parse_rule_file, parse_transactions_csv,
};

/// Apply budgeteur rules to a CSV file of transactions and print the rules
/// that fire for each transaction as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a CSV file of transactions with the columns `id`,
    /// `amount` and optionally `description`, `source_account`,
    /// `destination_account` and `notes`.
    #[arg(long, short)]
    transactions: PathBuf,

    /// File path to a JSON file containing a list of rules.
    #[arg(long, short, conflicts_with = "db_path", required_unless_present = "db_path")]
    rules: Option<PathBuf>,

    /// File path to an SQLite database to load the rules from.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// The minimum level of log messages to print, overridden by `RUST_LOG`.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// The number of threads to split the transactions between.
    #[arg(long, default_value_t = NonZeroUsize::MIN)]
    shards: NonZeroUsize,

    /// The character separating whole and fractional parts of amounts.
    #[arg(long, default_value_t = '.')]
    decimal_separator: char,

    /// The character grouping thousands in amounts.
    #[arg(long, default_value_t = ',')]
    thousands_separator: char,

    /// Read amounts without thousands separators, e.g. `1234.56`.
    #[arg(long, conflicts_with = "thousands_separator")]
    no_thousands_separator: bool,
}

impl Args {
    fn amount_parser(&self) -> AmountParser {
        let thousands_separator = (!self.no_thousands_separator).then_some(self.thousands_separator);

        AmountParser::new(self.decimal_separator, thousands_separator)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_level);

    let amounts = args.amount_parser();
    let factory = TriggerFactory::new(Arc::new(TracingLog), amounts);
    let evaluator = RuleEvaluator::new(Arc::new(TracingLog), amounts);

    let rules = match load_rules(&args, &factory) {
        Ok(rules) => rules,
        Err(error) => {
            eprintln!("Could not load rules: {error}");
            exit(1);
        }
    };

    let transactions = match File::open(&args.transactions)
        .map_err(Box::<dyn Error>::from)
        .and_then(|file| parse_transactions_csv(file).map_err(Box::<dyn Error>::from))
    {
        Ok(transactions) => transactions,
        Err(error) => {
            eprintln!("Could not load transactions from {:#?}: {error}", args.transactions);
            exit(1);
        }
    };

    tracing::info!(
        "Applying {} rules to {} transactions",
        rules.len(),
        transactions.len()
    );

    let application = evaluator.apply_rules_parallel(&rules, &transactions, args.shards);

    tracing::info!(
        "{} rules fired for {} transactions",
        application.rules_fired,
        application.transactions_matched
    );

    serde_json::to_writer_pretty(io::stdout().lock(), &application)?;
    println!();

    Ok(())
}

fn load_rules(args: &Args, factory: &TriggerFactory) -> Result<Vec<Rule>, Box<dyn Error>> {
    if let Some(db_path) = &args.db_path {
        let connection = Connection::open(db_path)?;
        create_rule_tables(&connection)?;
        return Ok(get_all_rules(factory, &connection)?);
    }

    match &args.rules {
        Some(rules_path) => Ok(parse_rule_file(File::open(rules_path)?, factory)?),
        None => Err("either --rules or --db-path must be given".into()),
    }
}

fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use budgeteur_rules::AmountParser;
    use clap::Parser;

    use super::Args;

    fn parse_args(extra: &[&str]) -> Result<Args, clap::Error> {
        let mut args = vec!["evaluate_rules", "--transactions", "in.csv", "--rules", "rules.json"];
        args.extend_from_slice(extra);

        Args::try_parse_from(args)
    }

    #[test]
    fn thousands_separator_defaults_to_comma() {
        let args = parse_args(&[]).unwrap();

        assert_eq!(args.amount_parser(), AmountParser::default());
    }

    #[test]
    fn thousands_separator_can_be_turned_off() {
        let args = parse_args(&["--no-thousands-separator"]).unwrap();

        assert_eq!(args.amount_parser(), AmountParser::new('.', None));
        assert!(args.amount_parser().parse("1,234").is_err());
    }

    #[test]
    fn custom_separators() {
        let args = parse_args(&["--decimal-separator", ",", "--thousands-separator", "."]).unwrap();

        assert_eq!(args.amount_parser(), AmountParser::new(',', Some('.')));
    }

    #[test]
    fn disabling_and_setting_thousands_separator_conflict() {
        let result = parse_args(&["--no-thousands-separator", "--thousands-separator", "'"]);

        assert!(result.is_err());
    }

    #[test]
    fn rules_and_db_path_conflict() {
        let result = parse_args(&["--db-path", "rules.db"]);

        assert!(result.is_err());
    }
}
