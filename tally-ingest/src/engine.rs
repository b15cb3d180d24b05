//! Document-level pipeline: tokens → lines → format → candidates → transactions.

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tally_core::{StatementFormat, Transaction};

use crate::columns::DEFAULT_CREDIT_FROM_X;
use crate::detect::detect_format;
use crate::error::{IngestError, Result};
use crate::lines::{DEFAULT_LINE_TOLERANCE, Line, LineBuilder};
use crate::normalize::{Normalized, Normalizer};
use crate::parsers::extractor_for;
use crate::parsers::payment_app::DEFAULT_AMOUNT_WINDOW;
use crate::token::{PageTokens, TextToken, TokenSource};

/// Tunables for line grouping and column inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Max vertical gap (layout units) between tokens on one line
    pub line_tolerance: f64,
    /// Lines searched for a payment-app amount, anchor included
    pub payment_window: usize,
    /// Bank statement: amounts at or right of this x are credits
    pub credit_column_x: f64,
    /// Bank statement: derive the boundary from the page width instead
    pub scale_columns_to_page: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            line_tolerance: DEFAULT_LINE_TOLERANCE,
            payment_window: DEFAULT_AMOUNT_WINDOW,
            credit_column_x: DEFAULT_CREDIT_FROM_X,
            scale_columns_to_page: false,
        }
    }
}

/// Counts describing how much of a document turned into transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub pages: usize,
    pub tokens: usize,
    pub lines: usize,
    /// Anchors / date rows the extractor recognized
    pub rows_matched: usize,
    /// Recognized rows that yielded no amount
    pub rows_skipped: usize,
    /// Candidates whose amount failed to parse
    pub candidates_dropped: usize,
    /// Transactions whose date fell back to the parse day
    pub dates_defaulted: usize,
}

/// Result of a successful parse. May hold zero transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub format: StatementFormat,
    /// In document order
    pub transactions: Vec<Transaction>,
    pub report: ParseReport,
}

impl ParseOutcome {
    /// Format was recognized but nothing survived extraction
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Flatten pages into one document-space token list.
///
/// Each page's y is shifted by the heights of the pages before it so that
/// rows from page 2 sort after every row of page 1.
fn stack_pages(pages: &[PageTokens]) -> Vec<TextToken> {
    let mut tokens = Vec::with_capacity(pages.iter().map(|p| p.tokens.len()).sum());
    let mut offset = 0.0;
    for page in pages {
        tokens.extend(page.tokens.iter().map(|t| TextToken {
            y: t.y + offset,
            ..t.clone()
        }));
        offset += page.height;
    }
    tokens
}

/// Stateless statement parser; one instance can parse any number of documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementParser {
    config: ParserConfig,
}

impl StatementParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read every page from `source` in order, then parse.
    ///
    /// The first page error aborts the document.
    pub fn parse_source<S: TokenSource + ?Sized>(&self, source: &mut S, today: NaiveDate) -> Result<ParseOutcome> {
        let pages = read_all(source)?;
        self.parse_pages(&pages, today)
    }

    /// Detect the statement format without extracting anything.
    pub fn detect_source<S: TokenSource + ?Sized>(&self, source: &mut S) -> Result<StatementFormat> {
        let pages = read_all(source)?;
        self.detect_pages(&pages)
    }

    pub fn detect_pages(&self, pages: &[PageTokens]) -> Result<StatementFormat> {
        let (lines, _) = self.reconstruct(pages)?;
        detect_format(&lines)
    }

    /// Parse already-read pages. `today` replaces unreadable dates.
    pub fn parse_pages(&self, pages: &[PageTokens], today: NaiveDate) -> Result<ParseOutcome> {
        let (lines, tokens) = self.reconstruct(pages)?;
        let mut report = ParseReport {
            pages: pages.len(),
            tokens,
            lines: lines.len(),
            ..ParseReport::default()
        };

        let format = detect_format(&lines)?;
        let page_width = pages.first().map(|p| p.width);
        let extractor = extractor_for(format, &self.config, page_width);
        let extraction = extractor.extract(&lines);
        report.rows_matched = extraction.rows_matched;
        report.rows_skipped = extraction.rows_skipped;

        let normalizer = Normalizer::new(extractor.format(), today);
        let mut transactions = Vec::with_capacity(extraction.candidates.len());
        for candidate in &extraction.candidates {
            match normalizer.normalize(candidate) {
                Normalized::Parsed(t) => transactions.push(t),
                Normalized::DateDefaulted(t) => {
                    report.dates_defaulted += 1;
                    transactions.push(t);
                }
                Normalized::Dropped => report.candidates_dropped += 1,
            }
        }

        info!(
            "{}: {} transactions ({} rows matched, {} skipped, {} dropped)",
            format.label(),
            transactions.len(),
            report.rows_matched,
            report.rows_skipped,
            report.candidates_dropped
        );

        Ok(ParseOutcome {
            format,
            transactions,
            report,
        })
    }

    /// Stack pages and group them into lines. Also returns the token count.
    fn reconstruct(&self, pages: &[PageTokens]) -> Result<(Vec<Line>, usize)> {
        let tokens = stack_pages(pages);
        if tokens.iter().all(|t| t.is_blank()) {
            return Err(IngestError::EmptyDocument);
        }
        let count = tokens.len();

        let lines = LineBuilder::new(self.config.line_tolerance).build(tokens);
        debug!("{} tokens on {} pages -> {} lines", count, pages.len(), lines.len());
        Ok((lines, count))
    }
}

fn read_all<S: TokenSource + ?Sized>(source: &mut S) -> Result<Vec<PageTokens>> {
    let mut pages = Vec::with_capacity(source.page_count());
    for index in 0..source.page_count() {
        pages.push(source.read_page(index)?);
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemorySource;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let parser = StatementParser::default();
        let pages = vec![PageTokens::new(600.0, 800.0, vec![TextToken::new("  ", 0.0, 0.0)])];
        assert!(matches!(parser.parse_pages(&pages, today()), Err(IngestError::EmptyDocument)));
        assert!(matches!(parser.parse_pages(&[], today()), Err(IngestError::EmptyDocument)));
    }

    #[test]
    fn test_source_error_aborts() {
        struct Broken;
        impl TokenSource for Broken {
            fn page_count(&self) -> usize {
                2
            }
            fn read_page(&mut self, index: usize) -> Result<PageTokens> {
                if index == 0 {
                    Ok(PageTokens::new(600.0, 800.0, vec![TextToken::new("Google Pay", 10.0, 10.0)]))
                } else {
                    Err(IngestError::Source {
                        page: index,
                        message: "truncated stream".to_string(),
                    })
                }
            }
        }
        let err = StatementParser::default().parse_source(&mut Broken, today()).unwrap_err();
        assert!(matches!(err, IngestError::Source { page: 1, .. }));
    }

    #[test]
    fn test_scaled_columns_follow_page_width() {
        let row = |amount_x: f64| {
            vec![
                TextToken::new("HDFC BANK", 30.0, 10.0),
                TextToken::new("18/05/24", 30.0, 100.0),
                TextToken::new("ATM WDL", 80.0, 100.0),
                TextToken::new("350.00", amount_x, 100.0),
                TextToken::new("12450.00", 760.0, 100.0),
            ]
        };
        let config = ParserConfig {
            scale_columns_to_page: true,
            ..ParserConfig::default()
        };
        let parser = StatementParser::new(config);

        // 800-wide page puts the boundary at 600
        let mut source = MemorySource::new(vec![PageTokens::new(800.0, 1000.0, row(500.0))]);
        let outcome = parser.parse_source(&mut source, today()).unwrap();
        assert!(outcome.transactions[0].is_expense());

        let outcome = StatementParser::default()
            .parse_pages(&[PageTokens::new(800.0, 1000.0, row(500.0))], today())
            .unwrap();
        assert!(outcome.transactions[0].is_income());
    }

    #[test]
    fn test_pages_stack_vertically() {
        let pages = vec![
            PageTokens::new(600.0, 800.0, vec![TextToken::new("a", 0.0, 700.0)]),
            PageTokens::new(600.0, 800.0, vec![TextToken::new("b", 0.0, 10.0)]),
        ];
        let ys: Vec<_> = stack_pages(&pages).iter().map(|t| t.y).collect();
        assert_eq!(ys, vec![700.0, 810.0]);
    }

    #[test]
    fn test_detect_reads_pages_in_order() {
        // The phrase only reads correctly when page 2 follows page 1.
        let pages = vec![
            PageTokens::new(600.0, 800.0, vec![TextToken::new("Google", 30.0, 700.0)]),
            PageTokens::new(600.0, 800.0, vec![TextToken::new("Pay", 30.0, 10.0)]),
        ];
        let parser = StatementParser::default();
        assert_eq!(parser.detect_pages(&pages).unwrap(), StatementFormat::PaymentApp);

        let mut source = MemorySource::new(pages);
        assert_eq!(parser.detect_source(&mut source).unwrap(), StatementFormat::PaymentApp);
    }

    #[test]
    fn test_detect_rejects_empty_document() {
        let pages = vec![PageTokens::new(600.0, 800.0, Vec::new())];
        assert!(matches!(
            StatementParser::default().detect_pages(&pages),
            Err(IngestError::EmptyDocument)
        ));
    }

    #[test]
    fn test_config_defaults_from_partial_toml_shape() {
        let config: ParserConfig = serde_json::from_str(r#"{"line_tolerance": 3.5}"#).unwrap();
        assert_eq!(config.line_tolerance, 3.5);
        assert_eq!(config.payment_window, 4);
        assert_eq!(config.credit_column_x, 450.0);
        assert!(!config.scale_columns_to_page);
    }
}
