use crate::core::{ColumnSet, RawRow, Result, Row};

/// Tabular result handed over by a statement facade.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: ColumnSet,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(columns: ColumnSet, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Splits into the column labels and a forward-only cursor of named rows.
    ///
    /// Cells are paired with labels by position; a short row simply lacks the
    /// trailing labels.
    pub fn into_rows(self) -> (ColumnSet, impl Iterator<Item = Result<RawRow>>) {
        let columns = self.columns;
        let labels = columns.clone();
        let rows = self.rows.into_iter().map(move |row| {
            let mut raw = RawRow::with_capacity(row.len());
            for (label, value) in labels.iter().zip(row) {
                if !raw.contains_key(label) {
                    raw.insert(label, value);
                }
            }
            Ok(raw)
        });
        (columns, rows)
    }
}
