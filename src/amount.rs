//! Conversion of amount strings into exact decimal values.
//!
//! Amounts arrive as text from the database, CSV statements and the rule editor.
//! They are never converted to binary floating point, so comparisons such as
//! "amount is exactly 0.10" behave the way a person reading the statement expects.

use rust_decimal::Decimal;

/// The error returned when a string cannot be read as a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid decimal amount")]
pub struct AmountParseError(pub String);

/// Parses amount strings using a configurable number format.
///
/// The default format uses `.` as the decimal separator and accepts `,` as a
/// thousands separator, e.g. `-1,234.56`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountParser {
    decimal_separator: char,
    thousands_separator: Option<char>,
}

impl Default for AmountParser {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            thousands_separator: Some(','),
        }
    }
}

impl AmountParser {
    /// Create a parser for a number format.
    ///
    /// A thousands separator equal to the decimal separator is ignored.
    pub fn new(decimal_separator: char, thousands_separator: Option<char>) -> Self {
        Self {
            decimal_separator,
            thousands_separator: thousands_separator
                .filter(|separator| *separator != decimal_separator),
        }
    }

    /// Parse `text` as an exact decimal.
    ///
    /// Surrounding whitespace is ignored. The amount may start with a single
    /// `+` or `-`. Thousands separators are only accepted between groups of
    /// three digits in the whole part, e.g. `1,234,567.89`.
    ///
    /// # Errors
    ///
    /// Returns an [AmountParseError] if `text` is empty, is not a number, has a
    /// misplaced separator, or has more precision than a [Decimal] can hold.
    pub fn parse(&self, text: &str) -> Result<Decimal, AmountParseError> {
        let error = || AmountParseError(text.to_owned());
        let trimmed = text.trim();

        let (sign, unsigned) = match trimmed.chars().next() {
            Some('-') => ("-", &trimmed[1..]),
            Some('+') => ("", &trimmed[1..]),
            _ => ("", trimmed),
        };

        let (whole, fraction) = match unsigned.split_once(self.decimal_separator) {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (unsigned, None),
        };

        let whole = self.whole_digits(whole).ok_or_else(error)?;

        let normalised = match fraction {
            Some(fraction) if is_digits(fraction) => format!("{sign}{whole}.{fraction}"),
            Some(_) => return Err(error()),
            None => format!("{sign}{whole}"),
        };

        Decimal::from_str_exact(&normalised).map_err(|_| error())
    }

    /// The digits of the whole part of an amount with any thousands
    /// separators removed, or `None` if the separators are misplaced.
    fn whole_digits(&self, whole: &str) -> Option<String> {
        let Some(separator) = self.thousands_separator else {
            return is_digits(whole).then(|| whole.to_owned());
        };

        let mut groups = whole.split(separator);
        let first = groups.next().unwrap_or_default();

        if !is_digits(first) {
            return None;
        }

        let mut digits = first.to_owned();

        for group in groups {
            if first.len() > 3 || group.len() != 3 || !is_digits(group) {
                return None;
            }

            digits.push_str(group);
        }

        Some(digits)
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

/// The size of an amount regardless of its direction.
///
/// The sign of a bookkeeping amount only records whether money came in or went
/// out, so amount triggers compare magnitudes.
pub fn magnitude(amount: Decimal) -> Decimal {
    amount.abs()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::{AmountParseError, AmountParser, magnitude};

    fn decimal(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn parses_plain_amounts() {
        let parser = AmountParser::default();

        assert_eq!(parser.parse("45.99"), Ok(decimal("45.99")));
        assert_eq!(parser.parse("-45.99"), Ok(decimal("-45.99")));
        assert_eq!(parser.parse("+12"), Ok(decimal("12")));
        assert_eq!(parser.parse("  0.10 "), Ok(decimal("0.1")));
    }

    #[test]
    fn parses_thousands_separators() {
        let parser = AmountParser::default();

        assert_eq!(parser.parse("-1,234.56"), Ok(decimal("-1234.56")));
    }

    #[test]
    fn parses_grouped_thousands() {
        let parser = AmountParser::default();

        assert_eq!(parser.parse("1,234,567.89"), Ok(decimal("1234567.89")));
        assert_eq!(parser.parse("999,000"), Ok(decimal("999000")));
        assert_eq!(parser.parse("1234567"), Ok(decimal("1234567")));
    }

    #[test]
    fn thousands_separator_can_be_disabled() {
        let parser = AmountParser::new('.', None);

        assert_eq!(parser.parse("1234.5"), Ok(decimal("1234.5")));
        assert_eq!(
            parser.parse("1,234.5"),
            Err(AmountParseError("1,234.5".to_owned()))
        );
    }

    #[test]
    fn parses_european_format() {
        let parser = AmountParser::new(',', Some('.'));

        assert_eq!(parser.parse("1.234,56"), Ok(decimal("1234.56")));
        assert_eq!(parser.parse("-0,5"), Ok(decimal("-0.5")));
    }

    #[test]
    fn ignores_thousands_separator_equal_to_decimal_separator() {
        let parser = AmountParser::new(',', Some(','));

        assert_eq!(parser.parse("12,5"), Ok(decimal("12.5")));
    }

    #[test]
    fn rejects_malformed_amounts() {
        let parser = AmountParser::default();

        for text in [
            "", "   ", "+", "-", "abc", "12.3.4", "1_000", "--5", "+-5", "-+5", "NaN", "1e5", "5.",
            ".5", "1,5", "1,2,3", ",5", "1,,,0.5", "1234,567", "1,234,56", "12 345",
        ] {
            assert_eq!(
                parser.parse(text),
                Err(AmountParseError(text.to_owned())),
                "expected {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn keeps_exact_precision() {
        let parser = AmountParser::default();

        let sum = parser.parse("0.1").unwrap() + parser.parse("0.2").unwrap();

        assert_eq!(sum, parser.parse("0.3").unwrap());
    }

    #[test]
    fn magnitude_drops_sign() {
        assert_eq!(magnitude(decimal("-10.50")), decimal("10.5"));
        assert_eq!(magnitude(decimal("10.50")), decimal("10.5"));
        assert_eq!(magnitude(Decimal::ZERO), Decimal::ZERO);
    }
}
