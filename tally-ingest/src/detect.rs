//! Statement format detection by lexical signature.

use log::debug;
use tally_core::StatementFormat;

use crate::error::{IngestError, Result};
use crate::lines::Line;

/// Checked in order; the first format with a matching phrase wins.
const SIGNATURES: &[(StatementFormat, &[&str])] = &[
    (StatementFormat::PaymentApp, &["google pay", "google payment"]),
    (StatementFormat::BankStatement, &["hdfc bank", "statement of account"]),
];

/// Pick the statement format for a whole document.
pub fn detect_format(lines: &[Line]) -> Result<StatementFormat> {
    let full_text = lines
        .iter()
        .flat_map(|l| l.tokens())
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    for (format, phrases) in SIGNATURES {
        if let Some(phrase) = phrases.iter().find(|p| full_text.contains(*p)) {
            debug!("detected {} via {:?}", format.label(), phrase);
            return Ok(*format);
        }
    }

    Err(IngestError::UnsupportedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::line_of;

    #[test]
    fn test_detects_payment_app() {
        let lines = vec![line_of(10.0, &[("Transaction statement", 10.0), ("GOOGLE PAY", 300.0)])];
        assert_eq!(detect_format(&lines).unwrap(), StatementFormat::PaymentApp);
    }

    #[test]
    fn test_detects_bank_statement() {
        let lines = vec![
            line_of(10.0, &[("HDFC BANK Ltd.", 10.0)]),
            line_of(30.0, &[("Statement of account", 10.0)]),
        ];
        assert_eq!(detect_format(&lines).unwrap(), StatementFormat::BankStatement);
    }

    #[test]
    fn test_phrase_may_span_tokens() {
        let lines = vec![line_of(10.0, &[("Statement", 10.0), ("of", 80.0), ("Account", 100.0)])];
        assert_eq!(detect_format(&lines).unwrap(), StatementFormat::BankStatement);
    }

    #[test]
    fn test_payment_app_checked_first() {
        let lines = vec![line_of(10.0, &[("HDFC Bank", 10.0), ("via Google Pay", 200.0)])];
        assert_eq!(detect_format(&lines).unwrap(), StatementFormat::PaymentApp);
        // Deterministic across calls
        assert_eq!(detect_format(&lines).unwrap(), StatementFormat::PaymentApp);
    }

    #[test]
    fn test_unknown_document_is_unsupported() {
        let lines = vec![line_of(10.0, &[("Chase", 10.0), ("Account Summary", 100.0)])];
        assert!(matches!(detect_format(&lines), Err(IngestError::UnsupportedFormat)));
        assert!(matches!(detect_format(&[]), Err(IngestError::UnsupportedFormat)));
    }
}
