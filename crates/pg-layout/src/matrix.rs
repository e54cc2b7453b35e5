// ABOUTME: Growable cell occupancy grid for the block packer.
// ABOUTME: Fixed column count, rows appended on demand, one filled flag per cell.

/// Row-major occupancy matrix. Every row has `columns` cells, so the matrix is
/// always rectangular; rows are only ever appended within a pass.
#[derive(Debug, Clone, Default)]
pub struct BlockMatrix {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl BlockMatrix {
    pub fn new(columns: usize) -> Self {
        let mut matrix = Self::default();
        matrix.reset(columns);
        matrix
    }

    /// Empty the matrix and start over with a single unfilled row
    pub fn reset(&mut self, columns: usize) {
        self.cells.clear();
        self.columns = columns;
        self.rows = 0;
        self.ensure_rows(0);
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Append unfilled rows until `through_row` is a valid row index.
    ///
    /// Returns false, leaving the matrix untouched, when the cell count would
    /// not fit in `usize`.
    pub fn ensure_rows(&mut self, through_row: usize) -> bool {
        if through_row < self.rows {
            return true;
        }
        let Some(rows) = through_row.checked_add(1) else {
            return false;
        };
        let Some(len) = rows.checked_mul(self.columns) else {
            return false;
        };
        self.rows = rows;
        self.cells.resize(len, false);
        true
    }

    /// Rows past the current bound count as unfilled
    pub fn is_filled(&self, column: usize, row: usize) -> bool {
        column < self.columns && row < self.rows && self.cells[row * self.columns + column]
    }

    /// True if the block starting at (`column`, `row`) lies inside the column
    /// bound and none of its cells are filled
    pub fn fits(&self, column: usize, row: usize, col_span: usize, row_span: usize) -> bool {
        let Some(col_end) = column.checked_add(col_span) else {
            return false;
        };
        if col_end > self.columns {
            return false;
        }
        let row_end = row.saturating_add(row_span).min(self.rows);
        (row..row_end).all(|r| (column..col_end).all(|c| !self.is_filled(c, r)))
    }

    /// Mark the block filled, growing rows first. Callers check `fits` first.
    ///
    /// Returns false without filling anything when the block reaches past the
    /// column bound or its rows cannot be addressed.
    pub fn occupy(&mut self, column: usize, row: usize, col_span: usize, row_span: usize) -> bool {
        if col_span == 0 || row_span == 0 {
            return true;
        }
        let (Some(col_end), Some(row_end)) =
            (column.checked_add(col_span), row.checked_add(row_span))
        else {
            return false;
        };
        if col_end > self.columns || !self.ensure_rows(row_end - 1) {
            return false;
        }
        for r in row..row_end {
            for c in column..col_end {
                let cell = &mut self.cells[r * self.columns + c];
                debug_assert!(!*cell, "cell ({c}, {r}) occupied twice");
                *cell = true;
            }
        }
        true
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|filled| **filled).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_leaves_one_empty_row() {
        let mut matrix = BlockMatrix::new(3);
        matrix.occupy(0, 0, 2, 3);
        matrix.reset(4);

        assert_eq!(matrix.columns(), 4);
        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.filled_count(), 0);
    }

    #[test]
    fn ensure_rows_keeps_existing_flags() {
        let mut matrix = BlockMatrix::new(2);
        matrix.occupy(1, 0, 1, 1);
        matrix.ensure_rows(4);

        assert_eq!(matrix.rows(), 5);
        assert!(matrix.is_filled(1, 0));
        assert!(!matrix.is_filled(0, 0));
        assert!(!matrix.is_filled(1, 4));
    }

    #[test]
    fn fits_respects_column_bound() {
        let matrix = BlockMatrix::new(3);
        assert!(matrix.fits(0, 0, 3, 1));
        assert!(matrix.fits(1, 0, 2, 1));
        assert!(!matrix.fits(2, 0, 2, 1));
        assert!(!matrix.fits(0, 0, usize::MAX, 1));
    }

    #[test]
    fn fits_treats_missing_rows_as_empty() {
        let mut matrix = BlockMatrix::new(2);
        matrix.occupy(0, 0, 1, 2);

        assert!(!matrix.fits(0, 1, 1, 3));
        assert!(matrix.fits(1, 0, 1, 10));
        assert!(matrix.fits(0, 2, 2, 2));
        assert_eq!(matrix.rows(), 2);
    }

    #[test]
    fn occupy_grows_rows() {
        let mut matrix = BlockMatrix::new(3);
        matrix.occupy(1, 0, 2, 3);

        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.filled_count(), 6);
        assert!(matrix.is_filled(2, 2));
        assert!(!matrix.is_filled(0, 2));
    }

    #[test]
    fn unaddressable_blocks_are_refused() {
        let mut matrix = BlockMatrix::new(2);

        assert!(!matrix.occupy(0, 1, 1, usize::MAX));
        assert!(!matrix.occupy(1, 0, 2, 1));
        assert!(!matrix.ensure_rows(usize::MAX));
        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.filled_count(), 0);
    }

    #[test]
    fn zero_columns_never_fit() {
        let matrix = BlockMatrix::new(0);
        assert!(!matrix.fits(0, 0, 1, 1));
        assert!(!matrix.is_filled(0, 0));
    }
}
