//! Statement totals

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::transaction::{Transaction, TransactionType};

/// Income, expense and net balance over a set of transactions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    /// income - expense
    pub balance: Decimal,
}

impl Totals {
    pub fn from_transactions<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Totals::default();
        for t in txns {
            match t.kind {
                TransactionType::Income => totals.income += t.amount,
                TransactionType::Expense => totals.expense += t.amount,
            }
        }
        totals.balance = totals.income - totals.expense;
        totals
    }

    /// Totals per calendar month, oldest month first
    pub fn by_month<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Vec<MonthTotals> {
        let mut months: BTreeMap<(i32, u32), Vec<&Transaction>> = BTreeMap::new();
        for t in txns {
            months.entry((t.date.year(), t.date.month())).or_default().push(t);
        }
        months
            .into_iter()
            .map(|((year, month), txns)| MonthTotals {
                year,
                month,
                totals: Totals::from_transactions(txns),
            })
            .collect()
    }
}

/// Totals for one calendar month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MonthTotals {
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub totals: Totals,
}

impl MonthTotals {
    /// "2024-05"
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}
