//! Token sources: positioned text fragments, page by page.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{IngestError, Result};

/// One fragment of text on a rendered page.
///
/// `y` grows downward. Sources working in a bottom-up space (PDF user space)
/// must flip it, see [`TextToken::from_bottom_up`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextToken {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TextToken {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Build a token from a bottom-up baseline position.
    pub fn from_bottom_up(
        text: impl Into<String>,
        x: f64,
        baseline_y: f64,
        width: f64,
        height: f64,
        page_height: f64,
    ) -> Self {
        Self::new(text, x, page_height - baseline_y).with_size(width, height)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// All tokens of one page plus the page geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTokens {
    pub width: f64,
    pub height: f64,
    pub tokens: Vec<TextToken>,
}

impl PageTokens {
    pub fn new(width: f64, height: f64, tokens: Vec<TextToken>) -> Self {
        Self {
            width,
            height,
            tokens,
        }
    }
}

/// Supplies a document's pages in order.
///
/// The engine calls `read_page(0)`, `read_page(1)`, ... sequentially and stops
/// at the first error.
pub trait TokenSource {
    fn page_count(&self) -> usize;
    fn read_page(&mut self, index: usize) -> Result<PageTokens>;
}

fn out_of_range(page: usize) -> IngestError {
    IngestError::Source {
        page,
        message: "page index out of range".to_string(),
    }
}

/// Token source over pages that are already in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<PageTokens>,
}

impl MemorySource {
    pub fn new(pages: Vec<PageTokens>) -> Self {
        Self { pages }
    }
}

impl TokenSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn read_page(&mut self, index: usize) -> Result<PageTokens> {
        self.pages.get(index).cloned().ok_or_else(|| out_of_range(index))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum Origin {
    #[default]
    TopDown,
    BottomUp,
}

#[derive(Debug, Deserialize)]
struct DumpToken {
    text: String,
    x: f64,
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

#[derive(Debug, Deserialize)]
struct DumpPage {
    #[serde(default)]
    width: f64,
    height: f64,
    #[serde(default)]
    origin: Origin,
    #[serde(default)]
    tokens: Vec<DumpToken>,
}

#[derive(Debug, Deserialize)]
struct Dump {
    pages: Vec<DumpPage>,
}

/// Reads a JSON token dump, as produced by a text-content pass over a PDF.
///
/// ```json
/// {"pages": [{"width": 595, "height": 842, "origin": "bottom-up",
///             "tokens": [{"text": "Jan 5, 2024", "x": 40, "y": 700}]}]}
/// ```
#[derive(Debug)]
pub struct JsonTokenSource {
    pages: Vec<DumpPage>,
}

impl JsonTokenSource {
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: Dump = serde_json::from_str(json)?;
        Ok(Self { pages: dump.pages })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        Self::from_json(&s)
    }
}

impl TokenSource for JsonTokenSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn read_page(&mut self, index: usize) -> Result<PageTokens> {
        let page = self.pages.get(index).ok_or_else(|| out_of_range(index))?;

        let tokens = page
            .tokens
            .iter()
            .map(|t| match page.origin {
                Origin::TopDown => TextToken::new(t.text.clone(), t.x, t.y).with_size(t.width, t.height),
                Origin::BottomUp => {
                    TextToken::from_bottom_up(t.text.clone(), t.x, t.y, t.width, t.height, page.height)
                }
            })
            .collect();

        Ok(PageTokens::new(page.width, page.height, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_up_is_flipped() {
        let t = TextToken::from_bottom_up("Total", 10.0, 800.0, 30.0, 9.0, 842.0);
        assert_eq!(t.y, 42.0);
        assert_eq!(t.width, 30.0);
    }

    #[test]
    fn test_json_dump_pages() {
        let json = r#"{"pages": [
            {"width": 600, "height": 800, "origin": "bottom-up",
             "tokens": [{"text": "Google Pay", "x": 20, "y": 780, "width": 60, "height": 10}]},
            {"width": 600, "height": 800,
             "tokens": [{"text": "Jan 5, 2024", "x": 20, "y": 40}]}
        ]}"#;
        let mut src = JsonTokenSource::from_json(json).unwrap();
        assert_eq!(src.page_count(), 2);

        let first = src.read_page(0).unwrap();
        assert_eq!(first.tokens[0].y, 20.0);
        assert_eq!(first.width, 600.0);

        let second = src.read_page(1).unwrap();
        assert_eq!(second.tokens[0].y, 40.0);
        assert_eq!(second.tokens[0].height, 0.0);

        assert!(matches!(src.read_page(2), Err(IngestError::Source { page: 2, .. })));
    }

    #[test]
    fn test_malformed_dump_is_rejected() {
        let err = JsonTokenSource::from_json(r#"{"pages": [{"tokens": []}]}"#).unwrap_err();
        assert!(matches!(err, IngestError::Json(_)));
    }
}
