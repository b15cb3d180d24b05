//! tally-ingest: turns position-tagged statement text into normalized transactions.
//!
//! Pipeline: [`TokenSource`] → [`lines::LineBuilder`] → [`detect::detect_format`]
//! → one [`parsers::Extractor`] → [`normalize::Normalizer`].

pub mod columns;
pub mod detect;
pub mod engine;
pub mod error;
pub mod lines;
pub mod normalize;
pub mod parsers;
pub mod token;
pub mod types;

pub use columns::{ColumnMap, ColumnZone, ThresholdColumns};
pub use detect::detect_format;
pub use engine::{ParseOutcome, ParseReport, ParserConfig, StatementParser};
pub use error::{IngestError, Result};
pub use lines::{Line, LineBuilder, DEFAULT_LINE_TOLERANCE};
pub use token::{JsonTokenSource, MemorySource, PageTokens, TextToken, TokenSource};
pub use types::{Candidate, Extraction};

pub use tally_core::{StatementFormat, Transaction, TransactionType};
