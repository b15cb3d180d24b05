//! HDFC Bank statement-of-account extractor
//!
//! Expected row layout after line reconstruction:
//!   Date      Narration            Chq./Ref.No.  Value Dt  Withdrawal  Deposit   Closing Balance
//!   18/05/24  ATM WDL-SECTOR 17    0000412345    18/05/24  350.00                12,450.00
//!
//! Empty withdrawal/deposit cells produce no token, so the column a value sat
//! in can only be recovered from its x position.

use log::debug;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;
use tally_core::{StatementFormat, TransactionType};

use super::Extractor;
use crate::columns::{ColumnMap, ColumnZone, ThresholdColumns};
use crate::lines::Line;
use crate::token::TextToken;
use crate::types::{Candidate, Extraction};

fn row_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{2})$").expect("row date regex"))
}

fn money_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d,]+\.\d{2}$").expect("money regex"))
}

/// "18/05/24" -> "2024-05-18". Two-digit years are taken as 20YY.
fn reorder_date(raw: &str) -> Option<String> {
    let caps = row_date_re().captures(raw.trim())?;
    Some(format!("20{}-{}-{}", &caps[3], &caps[2], &caps[1]))
}

fn magnitude(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(&cleaned).ok()
}

pub struct BankStatementExtractor {
    columns: Box<dyn ColumnMap>,
}

impl Default for BankStatementExtractor {
    fn default() -> Self {
        Self::new(Box::new(ThresholdColumns::default()))
    }
}

impl BankStatementExtractor {
    pub fn new(columns: Box<dyn ColumnMap>) -> Self {
        Self { columns }
    }

    fn row(&self, line: &Line, raw_date: String) -> Option<Candidate> {
        let cells: Vec<&TextToken> = line.non_blank().collect();
        if cells.len() < 3 {
            return None;
        }

        let amounts: Vec<&TextToken> = cells[2..]
            .iter()
            .copied()
            .filter(|t| money_re().is_match(t.text.trim()))
            .collect();
        // Last is the closing balance; the one before it is the movement
        if amounts.len() < 2 {
            return None;
        }
        let amount = amounts[amounts.len() - 2];

        let value = magnitude(&amount.text)?;
        if value.is_zero() {
            return None;
        }

        let direction = match self.columns.zone(amount.x) {
            ColumnZone::Debit => TransactionType::Expense,
            ColumnZone::Credit => TransactionType::Income,
        };

        Some(Candidate {
            raw_date,
            raw_amount: amount.text.trim().to_string(),
            description: cells[1].text.trim().to_string(),
            direction,
        })
    }
}

impl Extractor for BankStatementExtractor {
    fn format(&self) -> StatementFormat {
        StatementFormat::BankStatement
    }

    fn extract(&self, lines: &[Line]) -> Extraction {
        let mut out = Extraction::default();

        for line in lines {
            let Some(first) = line.first() else { continue };
            let Some(raw_date) = reorder_date(&first.text) else {
                continue;
            };
            let candidate = self.row(line, raw_date);
            if candidate.is_none() {
                debug!("row without usable amount: {:?}", line.text());
            }
            out.matched(candidate);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::line_of;

    fn atm_row(amount_x: f64) -> Line {
        line_of(
            200.0,
            &[
                ("18/05/24", 30.0),
                ("ATM WDL", 80.0),
                ("0000412345", 230.0),
                ("18/05/24", 330.0),
                ("350.00", amount_x),
                ("12,450.00", 540.0),
            ],
        )
    }

    #[test]
    fn test_debit_column_is_expense() {
        let ex = BankStatementExtractor::default().extract(&[atm_row(400.0)]);
        assert_eq!(ex.candidates.len(), 1);
        let c = &ex.candidates[0];
        assert_eq!(c.raw_date, "2024-05-18");
        assert_eq!(c.raw_amount, "350.00");
        assert_eq!(c.description, "ATM WDL");
        assert_eq!(c.direction, TransactionType::Expense);
    }

    #[test]
    fn test_credit_column_is_income() {
        let ex = BankStatementExtractor::default().extract(&[atm_row(480.0)]);
        assert_eq!(ex.candidates[0].direction, TransactionType::Income);
    }

    #[test]
    fn test_injected_column_map() {
        struct Everything;
        impl ColumnMap for Everything {
            fn zone(&self, _x: f64) -> ColumnZone {
                ColumnZone::Credit
            }
        }
        let ex = BankStatementExtractor::new(Box::new(Everything)).extract(&[atm_row(100.0)]);
        assert_eq!(ex.candidates[0].direction, TransactionType::Income);
    }

    #[test]
    fn test_balance_only_row_is_skipped() {
        let line = line_of(200.0, &[("19/05/24", 30.0), ("INTEREST", 80.0), ("12,450.00", 540.0)]);
        let ex = BankStatementExtractor::default().extract(&[line]);
        assert!(ex.candidates.is_empty());
        assert_eq!(ex.rows_matched, 1);
        assert_eq!(ex.rows_skipped, 1);
    }

    #[test]
    fn test_zero_amount_is_skipped() {
        let line = line_of(
            200.0,
            &[("20/05/24", 30.0), ("REVERSAL", 80.0), ("0.00", 400.0), ("12,450.00", 540.0)],
        );
        let ex = BankStatementExtractor::default().extract(&[line]);
        assert!(ex.candidates.is_empty());
    }

    #[test]
    fn test_non_date_rows_ignored() {
        let lines = vec![
            line_of(50.0, &[("Date", 30.0), ("Narration", 80.0), ("Withdrawal Amt.", 400.0)]),
            line_of(60.0, &[("Opening Balance", 30.0), ("1,000.00", 400.0), ("12,800.00", 540.0)]),
            line_of(70.0, &[("2024-05-18", 30.0), ("X", 80.0), ("1.00", 400.0), ("2.00", 540.0)]),
        ];
        let ex = BankStatementExtractor::default().extract(&lines);
        assert_eq!(ex, Extraction::default());
    }

    #[test]
    fn test_blank_cells_do_not_shift_description() {
        let line = line_of(
            200.0,
            &[("21/05/24", 30.0), (" ", 60.0), ("NEFT CR-ACME", 80.0), ("5,000.00", 470.0), ("17,450.00", 540.0)],
        );
        let ex = BankStatementExtractor::default().extract(&[line]);
        let c = &ex.candidates[0];
        assert_eq!(c.description, "NEFT CR-ACME");
        assert_eq!(c.raw_amount, "5,000.00");
        assert_eq!(c.direction, TransactionType::Income);
    }

    #[test]
    fn test_reorder_date() {
        assert_eq!(reorder_date("01/12/23").as_deref(), Some("2023-12-01"));
        assert_eq!(reorder_date("1/12/23"), None);
    }
}
