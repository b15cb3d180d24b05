//! Google Pay activity statement extractor
//!
//! Records are loose blocks rather than table rows:
//!   Jan 5, 2024      Paid to Coffee Shop
//!   10:42 AM         UPI Transaction ID: 4012...
//!                                                  ₹250.00
//!
//! A line holding a "Mon D, YYYY" token anchors a record; the amount is the
//! first currency token within the anchor line and the few lines after it.

use log::debug;
use regex::Regex;
use std::sync::OnceLock;
use tally_core::{StatementFormat, TransactionType};

use super::Extractor;
use crate::lines::Line;
use crate::types::{Candidate, Extraction};

/// Anchor line plus the three lines after it
pub const DEFAULT_AMOUNT_WINDOW: usize = 4;

const PLACEHOLDER_DESCRIPTION: &str = "Google Pay Transaction";

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][a-z]{2}\s\d{1,2},?\s\d{4}$").expect("date regex"))
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-+]?₹?\s?[\d,]+\.\d{2}$").expect("amount regex"))
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b\d{1,2}:\d{2}\s?[AP]M\b").expect("time regex"))
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)paid to|received from").expect("marker regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAppExtractor {
    window: usize,
}

impl Default for PaymentAppExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_AMOUNT_WINDOW)
    }
}

impl PaymentAppExtractor {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    fn record_at(&self, lines: &[Line], i: usize, date: &str) -> Option<Candidate> {
        let end = (i + self.window).min(lines.len());

        let (j, amount_text) = (i..end).find_map(|j| {
            lines[j]
                .tokens()
                .iter()
                .find(|t| amount_re().is_match(t.text.trim()))
                .map(|t| (j, t.text.trim().to_string()))
        })?;

        let raw_amount: String = amount_text
            .chars()
            .filter(|c| *c != '₹' && *c != ',' && !c.is_whitespace())
            .collect();

        // Only the line carrying the amount speaks for the direction
        let received = lines[j].text().to_lowercase().contains("received");
        let direction = if raw_amount.contains('+') || received {
            TransactionType::Income
        } else {
            TransactionType::Expense
        };

        Some(Candidate {
            raw_date: date.to_string(),
            raw_amount,
            description: describe(lines, i, date, &amount_text),
            direction,
        })
    }
}

/// Description: the anchor line minus its date, else the next line, stripped
/// of amount, time and "Paid to"/"Received from". If nothing survives, the
/// line two ahead gets the same cleanup.
fn describe(lines: &[Line], i: usize, date: &str, amount_text: &str) -> String {
    let text_at = |k: usize| lines.get(k).map(|l| l.text().trim().to_string()).unwrap_or_default();

    let mut raw = lines[i].text().replacen(date, "", 1).trim().to_string();
    if raw.is_empty() {
        raw = text_at(i + 1);
    }

    let mut cleaned = clean_description(&raw, amount_text);
    if cleaned.is_empty() {
        cleaned = clean_description(&text_at(i + 2), amount_text);
    }

    if cleaned.is_empty() {
        PLACEHOLDER_DESCRIPTION.to_string()
    } else {
        cleaned
    }
}

fn clean_description(raw: &str, amount_text: &str) -> String {
    let raw = raw.replace(amount_text, " ");
    let raw = time_re().replace_all(&raw, " ");
    let raw = marker_re().replace_all(&raw, " ");
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Extractor for PaymentAppExtractor {
    fn format(&self) -> StatementFormat {
        StatementFormat::PaymentApp
    }

    fn extract(&self, lines: &[Line]) -> Extraction {
        let mut out = Extraction::default();

        for (i, line) in lines.iter().enumerate() {
            let Some(date_token) = line.tokens().iter().find(|t| date_re().is_match(t.text.trim())) else {
                continue;
            };
            let date = date_token.text.trim();
            let candidate = self.record_at(lines, i, date);
            if candidate.is_none() {
                debug!("no amount within {} lines of anchor {:?}", self.window, date);
            }
            out.matched(candidate);
        }

        out
    }
}
