//! Normalized transaction records produced by statement extraction

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of money movement. The amount itself is always a magnitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// Statement layouts the engine knows how to read.
///
/// Detection is global to a document, so this doubles as the provenance tag
/// on every transaction extracted from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatementFormat {
    /// Payment-app activity export (Google Pay)
    #[serde(rename = "gpay")]
    PaymentApp,
    /// Bank ledger statement (HDFC Bank / "statement of account")
    #[serde(rename = "hdfc")]
    BankStatement,
}

impl StatementFormat {
    /// Short source tag written into exported records
    pub fn tag(&self) -> &'static str {
        match self {
            StatementFormat::PaymentApp => "gpay",
            StatementFormat::BankStatement => "hdfc",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            StatementFormat::PaymentApp => "Google Pay",
            StatementFormat::BankStatement => "HDFC Bank statement",
        }
    }
}

/// A transaction recovered from a statement document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Calendar date of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Non-empty description
    pub description: String,
    /// Non-negative magnitude; `kind` carries the sign
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Statement format the record was extracted from
    pub source: StatementFormat,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        kind: TransactionType,
        source: StatementFormat,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount: amount.abs(),
            kind,
            source,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Positive for income, negative for expense
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}
