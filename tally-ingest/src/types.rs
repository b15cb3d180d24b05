use tally_core::TransactionType;

/// Raw fields pulled from one statement row, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Free-form date text as it appeared (or was reordered) in the row
    pub raw_date: String,
    /// Amount text, possibly carrying a sign or currency symbol
    pub raw_amount: String,
    pub description: String,
    pub direction: TransactionType,
}

/// Output of one extractor pass over a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub candidates: Vec<Candidate>,
    /// Anchors (payment app) or date rows (bank) that were recognized
    pub rows_matched: usize,
    /// Recognized rows that produced no candidate
    pub rows_skipped: usize,
}

impl Extraction {
    pub(crate) fn matched(&mut self, candidate: Option<Candidate>) {
        self.rows_matched += 1;
        match candidate {
            Some(c) => self.candidates.push(c),
            None => self.rows_skipped += 1,
        }
    }
}
