//! Geometric line reconstruction.
//!
//! Tokens carry no row structure of their own. A row is recovered by sorting
//! on (y, x) and cutting a new line whenever the next token sits more than
//! `tolerance` below the y that opened the current line.

use crate::token::TextToken;

/// Vertical distance, in layout units, still considered the same row
pub const DEFAULT_LINE_TOLERANCE: f64 = 5.0;

/// One reconstructed visual row, tokens ordered left to right
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    y: f64,
    tokens: Vec<TextToken>,
}

impl Line {
    /// The y coordinate of the token that opened this line
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn tokens(&self) -> &[TextToken] {
        &self.tokens
    }

    /// Leftmost token
    pub fn first(&self) -> Option<&TextToken> {
        self.tokens.first()
    }

    /// Token texts joined with single spaces
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Tokens whose text is not whitespace-only
    pub fn non_blank(&self) -> impl Iterator<Item = &TextToken> {
        self.tokens.iter().filter(|t| !t.is_blank())
    }

    fn finish(mut self) -> Self {
        self.tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBuilder {
    tolerance: f64,
}

impl Default for LineBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_TOLERANCE)
    }
}

impl LineBuilder {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Cluster tokens from every page into ordered lines.
    ///
    /// Every token lands in exactly one line; no empty line is emitted.
    pub fn build(&self, mut tokens: Vec<TextToken>) -> Vec<Line> {
        tokens.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

        let mut lines: Vec<Line> = Vec::new();
        for token in tokens {
            let same_row = lines
                .last()
                .is_some_and(|line| (token.y - line.y).abs() <= self.tolerance);
            match lines.last_mut() {
                Some(line) if same_row => line.tokens.push(token),
                _ => lines.push(Line {
                    y: token.y,
                    tokens: vec![token],
                }),
            }
        }

        lines.into_iter().map(Line::finish).collect()
    }
}

#[cfg(test)]
pub(crate) fn line_of(y: f64, cells: &[(&str, f64)]) -> Line {
    Line {
        y,
        tokens: cells.iter().map(|(s, x)| TextToken::new(*s, *x, y)).collect(),
    }
}
