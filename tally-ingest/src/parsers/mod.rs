//! Format-specific extractors.
//!
//! Exactly one extractor runs per document, chosen from the detected
//! [`StatementFormat`]. Supporting a new layout means one new extractor plus
//! one signature in [`crate::detect`].

pub mod bank_statement;
pub mod payment_app;

pub use bank_statement::BankStatementExtractor;
pub use payment_app::PaymentAppExtractor;

use tally_core::StatementFormat;

use crate::columns::{ColumnMap, ThresholdColumns};
use crate::engine::ParserConfig;
use crate::lines::Line;
use crate::types::Extraction;

/// Scans reconstructed lines and emits transaction candidates.
pub trait Extractor {
    fn format(&self) -> StatementFormat;
    fn extract(&self, lines: &[Line]) -> Extraction;
}

/// Build the extractor for a detected format.
///
/// `page_width` is the first page's width, used only when the config asks for
/// the column boundary to follow the page size.
pub fn extractor_for(
    format: StatementFormat,
    config: &ParserConfig,
    page_width: Option<f64>,
) -> Box<dyn Extractor> {
    match format {
        StatementFormat::PaymentApp => Box::new(PaymentAppExtractor::new(config.payment_window)),
        StatementFormat::BankStatement => {
            let columns: Box<dyn ColumnMap> = match page_width {
                Some(w) if config.scale_columns_to_page && w > 0.0 => {
                    Box::new(ThresholdColumns::for_page_width(w))
                }
                _ => Box::new(ThresholdColumns::new(config.credit_column_x)),
            };
            Box::new(BankStatementExtractor::new(columns))
        }
    }
}
