//! Horizontal column zones for ledger-style statements.

/// Which amount column a horizontal position falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnZone {
    /// Withdrawal column
    Debit,
    /// Deposit column
    Credit,
}

/// Classifies x positions into debit/credit columns for one document family.
pub trait ColumnMap: Send + Sync {
    fn zone(&self, x: f64) -> ColumnZone;
}

/// Layout width the default boundary was measured against
const REFERENCE_PAGE_WIDTH: f64 = 600.0;
/// Default debit/credit boundary on the reference page
pub const DEFAULT_CREDIT_FROM_X: f64 = 450.0;

/// Single vertical boundary: left of it is debit, at or right of it is credit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdColumns {
    credit_from_x: f64,
}

impl Default for ThresholdColumns {
    fn default() -> Self {
        Self::new(DEFAULT_CREDIT_FROM_X)
    }
}

impl ThresholdColumns {
    pub fn new(credit_from_x: f64) -> Self {
        Self { credit_from_x }
    }

    /// Scale the default boundary to a page of the given width.
    pub fn for_page_width(width: f64) -> Self {
        Self::new(DEFAULT_CREDIT_FROM_X / REFERENCE_PAGE_WIDTH * width)
    }

    pub fn credit_from_x(&self) -> f64 {
        self.credit_from_x
    }
}

impl ColumnMap for ThresholdColumns {
    fn zone(&self, x: f64) -> ColumnZone {
        if x < self.credit_from_x {
            ColumnZone::Debit
        } else {
            ColumnZone::Credit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary_is_credit() {
        let cols = ThresholdColumns::default();
        assert_eq!(cols.zone(449.9), ColumnZone::Debit);
        assert_eq!(cols.zone(450.0), ColumnZone::Credit);
        assert_eq!(cols.zone(520.0), ColumnZone::Credit);
    }

    #[test]
    fn test_scaled_to_page_width() {
        let a4_landscape = ThresholdColumns::for_page_width(842.0);
        assert!((a4_landscape.credit_from_x() - 631.5).abs() < 1e-9);
        assert_eq!(a4_landscape.zone(600.0), ColumnZone::Debit);
        assert_eq!(ThresholdColumns::for_page_width(600.0), ThresholdColumns::default());
    }
}
