use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Stateful forward search over a dense grid.
///
/// The cursor remembers where the previous match left off, so repeated
/// calls walk through successive hits in row-major order. A miss resets
/// the cursor to the origin; the caller decides whether to scan again
/// from there (there is no wrap within a single call).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindCursor {
    row: usize,
    col: usize,
}

impl FindCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next position the scan will examine.
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Start the next scan from the origin.
    pub fn reset(&mut self) {
        self.row = 0;
        self.col = 0;
    }

    /// Scan row-major from the cursor for a non-empty cell whose value
    /// contains `query`. On a hit, returns the position and advances the
    /// cursor to the position just past it; on a miss, resets the cursor
    /// and returns `None`. An empty query never matches.
    pub fn find_next(
        &mut self,
        grid: &Grid,
        query: &str,
        match_case: bool,
    ) -> Option<(usize, usize)> {
        if query.is_empty() {
            return None;
        }
        let needle = if match_case {
            query.to_string()
        } else {
            query.to_lowercase()
        };

        let (start_row, start_col) = (self.row, self.col);
        for row in start_row..grid.rows {
            let first_col = if row == start_row { start_col } else { 0 };
            for col in first_col..grid.cols {
                let value = grid.value(row, col);
                if value.is_empty() {
                    continue;
                }
                let haystack = if match_case {
                    value
                } else {
                    value.to_lowercase()
                };
                if haystack.contains(&needle) {
                    // Resume just past the match, wrapping at the row end.
                    self.row = row;
                    self.col = col + 1;
                    if self.col >= grid.cols {
                        self.col = 0;
                        self.row = row + 1;
                    }
                    return Some((row, col));
                }
            }
        }

        self.reset();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        let mut grid = Grid::new(10, 10);
        grid.set_value(0, 0, "Product").unwrap();
        grid.set_value(0, 1, "Price").unwrap();
        grid.set_value(1, 0, "Laptop").unwrap();
        grid.set_value(1, 1, "999.99").unwrap();
        grid.set_value(2, 0, "Mouse").unwrap();
        grid
    }

    #[test]
    fn test_find_advances_cursor_past_match() {
        let grid = sample_grid();
        let mut cursor = FindCursor::new();
        assert_eq!(cursor.find_next(&grid, "Laptop", false), Some((1, 0)));
        assert_eq!(cursor.position(), (1, 1));
    }

    #[test]
    fn test_no_further_match_resets_cursor() {
        let grid = sample_grid();
        let mut cursor = FindCursor::new();
        assert_eq!(cursor.find_next(&grid, "laptop", false), Some((1, 0)));
        assert_eq!(cursor.find_next(&grid, "laptop", false), None);
        assert_eq!(cursor.position(), (0, 0));
        // After the reset the same query hits again from the top.
        assert_eq!(cursor.find_next(&grid, "laptop", false), Some((1, 0)));
    }

    #[test]
    fn test_case_sensitive_search() {
        let grid = sample_grid();
        let mut cursor = FindCursor::new();
        assert_eq!(cursor.find_next(&grid, "laptop", true), None);
        assert_eq!(cursor.find_next(&grid, "Laptop", true), Some((1, 0)));
    }

    #[test]
    fn test_substring_match() {
        let grid = sample_grid();
        let mut cursor = FindCursor::new();
        // "Pr" occurs in both "Product" and "Price", row-major order.
        assert_eq!(cursor.find_next(&grid, "Pr", true), Some((0, 0)));
        assert_eq!(cursor.find_next(&grid, "Pr", true), Some((0, 1)));
        assert_eq!(cursor.find_next(&grid, "Pr", true), None);
    }

    #[test]
    fn test_match_in_last_column_wraps_cursor_to_next_row() {
        let mut grid = Grid::new(3, 3);
        grid.set_value(0, 2, "edge").unwrap();
        let mut cursor = FindCursor::new();
        assert_eq!(cursor.find_next(&grid, "edge", false), Some((0, 2)));
        assert_eq!(cursor.position(), (1, 0));
    }

    #[test]
    fn test_match_in_bottom_right_cell() {
        let mut grid = Grid::new(2, 2);
        grid.set_value(1, 1, "end").unwrap();
        let mut cursor = FindCursor::new();
        assert_eq!(cursor.find_next(&grid, "end", false), Some((1, 1)));
        // Cursor lands past the grid; the next call misses and resets.
        assert_eq!(cursor.position(), (2, 0));
        assert_eq!(cursor.find_next(&grid, "end", false), None);
        assert_eq!(cursor.position(), (0, 0));
    }

    #[test]
    fn test_empty_query_never_matches() {
        let grid = sample_grid();
        let mut cursor = FindCursor::new();
        assert_eq!(cursor.find_next(&grid, "", false), None);
        assert_eq!(cursor.position(), (0, 0));
    }

    #[test]
    fn test_empty_cells_are_skipped() {
        let mut grid = Grid::new(3, 3);
        // An occupied-but-empty cell (formatting only) must not match "".
        grid.toggle_bold(0, 0).unwrap();
        grid.set_value(2, 2, "hit").unwrap();
        let mut cursor = FindCursor::new();
        assert_eq!(cursor.find_next(&grid, "hit", false), Some((2, 2)));
    }
}
