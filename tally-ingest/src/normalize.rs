//! Candidate → Transaction normalization.

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::str::FromStr;
use tally_core::{StatementFormat, Transaction};

use crate::types::Candidate;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%b %d %Y", "%B %d, %Y", "%B %d %Y", "%d/%m/%Y"];

/// Parse free-form statement date text.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse an amount string into its magnitude.
///
/// Everything but digits, `.`, `-` and `+` is dropped first, so currency
/// symbols and group separators are tolerated.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();
    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(unsigned).ok().map(|d| d.abs())
}

/// Outcome of normalizing one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Parsed(Transaction),
    /// Date text was unreadable; `today` was used instead
    DateDefaulted(Transaction),
    /// Amount text was not a number; candidate dropped
    Dropped,
}

/// Turns candidates into transactions tagged with their source format.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    source: StatementFormat,
    today: NaiveDate,
}

impl Normalizer {
    /// `today` stands in for dates that cannot be parsed.
    pub fn new(source: StatementFormat, today: NaiveDate) -> Self {
        Self { source, today }
    }

    pub fn normalize(&self, candidate: &Candidate) -> Normalized {
        let Some(amount) = parse_amount(&candidate.raw_amount) else {
            warn!(
                "dropping {:?}: amount {:?} is not a number",
                candidate.description, candidate.raw_amount
            );
            return Normalized::Dropped;
        };

        let build = |date| {
            Transaction::new(
                date,
                candidate.description.clone(),
                amount,
                candidate.direction,
                self.source,
            )
        };

        match parse_date(&candidate.raw_date) {
            Some(date) => Normalized::Parsed(build(date)),
            None => {
                warn!(
                    "unreadable date {:?} for {:?}, using {}",
                    candidate.raw_date, candidate.description, self.today
                );
                Normalized::DateDefaulted(build(self.today))
            }
        }
    }
}
