use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cell::GridCell;
use crate::error::{Error, Result};
use crate::template::FormatTemplate;

/// Floor dimensions for a freshly materialized grid.
pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 10;

/// A dense `rows x cols` grid backed by a sparse cell map.
///
/// Positions absent from the map read as default cells, so every in-range
/// address is observable exactly once. Writes outside the current bounds
/// are rejected; the bounds themselves move only through the structural
/// operations below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cells: HashMap<(usize, usize), GridCell>,
    pub rows: usize,
    pub cols: usize,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: HashMap::new(),
            rows,
            cols,
        }
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Get a cell by position (a default cell if unoccupied or out of range).
    pub fn cell(&self, row: usize, col: usize) -> GridCell {
        self.cells.get(&(row, col)).cloned().unwrap_or_default()
    }

    /// Raw textual value at a position (empty string if unoccupied).
    pub fn value(&self, row: usize, col: usize) -> String {
        self.cells
            .get(&(row, col))
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Mutable access to a cell, occupying the position if needed.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut GridCell> {
        self.check_bounds(row, col)?;
        Ok(self.cells.entry((row, col)).or_default())
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: &str) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.value = value.to_string();
        Ok(())
    }

    pub fn toggle_bold(&mut self, row: usize, col: usize) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.style.bold = !cell.style.bold;
        Ok(())
    }

    pub fn toggle_italic(&mut self, row: usize, col: usize) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.style.italic = !cell.style.italic;
        Ok(())
    }

    pub fn toggle_underline(&mut self, row: usize, col: usize) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.style.underline = !cell.style.underline;
        Ok(())
    }

    pub fn set_background(&mut self, row: usize, col: usize, color: &str) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.style.background = color.to_string();
        Ok(())
    }

    pub fn set_foreground(&mut self, row: usize, col: usize, color: &str) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.style.foreground = color.to_string();
        Ok(())
    }

    /// Copy a template's style onto a cell and record the reference.
    pub fn apply_template(&mut self, row: usize, col: usize, template: &FormatTemplate) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.style = template.style();
        cell.template = Some(template.id);
        Ok(())
    }

    /// Drop a cell's template reference, keeping the copied style.
    pub fn detach_template(&mut self, row: usize, col: usize) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.template = None;
        Ok(())
    }

    /// Reset a position to the default cell, keeping its storage identity
    /// so the next commit empties the persisted row instead of orphaning it.
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.check_bounds(row, col)?;
        if let Some(cell) = self.cells.get_mut(&(row, col)) {
            let persisted = cell.persisted;
            *cell = GridCell {
                persisted,
                ..GridCell::default()
            };
        }
        Ok(())
    }

    // =========================================================================
    // Structural operations
    // =========================================================================

    /// Append one row of default cells at the bottom.
    pub fn add_row(&mut self) {
        self.rows += 1;
    }

    /// Append one column of default cells at the right edge.
    pub fn add_col(&mut self) {
        self.cols += 1;
    }

    /// Remove the bottom row. Fails without mutating when it is the only row.
    pub fn remove_last_row(&mut self) -> Result<()> {
        if self.rows <= 1 {
            return Err(Error::LastRow);
        }
        self.rows -= 1;
        let rows = self.rows;
        self.cells.retain(|(r, _), _| *r < rows);
        Ok(())
    }

    /// Remove the rightmost column. Fails without mutating when it is the
    /// only column.
    pub fn remove_last_col(&mut self) -> Result<()> {
        if self.cols <= 1 {
            return Err(Error::LastColumn);
        }
        self.cols -= 1;
        let cols = self.cols;
        self.cells.retain(|(_, c), _| *c < cols);
        Ok(())
    }

    /// Place a loaded cell, growing the bounds to fit. Used when
    /// materializing from storage or importing a document.
    pub fn insert_loaded(&mut self, row: usize, col: usize, cell: GridCell) {
        if row >= self.rows {
            self.rows = row + 1;
        }
        if col >= self.cols {
            self.cols = col + 1;
        }
        self.cells.insert((row, col), cell);
    }

    /// Row-major iteration over every dense position.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    /// Number of occupied (non-synthesized) positions.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;
    use crate::template::TemplateId;
    use crate::workbook::WorkbookId;

    #[test]
    fn test_new_grid_is_all_defaults() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.rows, 3);
        assert_eq!(grid.cols, 3);
        assert_eq!(grid.occupied(), 0);
        assert!(grid.cell(2, 2).is_default());
        assert_eq!(grid.value(0, 0), "");
    }

    #[test]
    fn test_positions_cover_grid_exactly_once() {
        let grid = Grid::new(4, 3);
        let positions: Vec<_> = grid.positions().collect();
        assert_eq!(positions.len(), 12);
        assert_eq!(positions[0], (0, 0));
        assert_eq!(positions[2], (0, 2));
        assert_eq!(positions[3], (1, 0));
        assert_eq!(positions[11], (3, 2));
        let unique: std::collections::HashSet<_> = positions.iter().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn test_set_value_and_read_back() {
        let mut grid = Grid::new(10, 10);
        grid.set_value(1, 1, "999.99").unwrap();
        assert_eq!(grid.value(1, 1), "999.99");
        assert_eq!(grid.occupied(), 1);
    }

    #[test]
    fn test_set_value_out_of_bounds() {
        let mut grid = Grid::new(2, 2);
        let err = grid.set_value(2, 0, "x").unwrap_err();
        assert_eq!(
            err,
            Error::OutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 2
            }
        );
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_toggle_flags() {
        let mut grid = Grid::new(3, 3);
        grid.toggle_bold(0, 0).unwrap();
        assert!(grid.cell(0, 0).style.bold);
        grid.toggle_bold(0, 0).unwrap();
        assert!(!grid.cell(0, 0).style.bold);
        grid.toggle_italic(0, 1).unwrap();
        grid.toggle_underline(0, 1).unwrap();
        let cell = grid.cell(0, 1);
        assert!(cell.style.italic && cell.style.underline);
    }

    #[test]
    fn test_add_row_and_col_extend_bounds() {
        let mut grid = Grid::new(3, 3);
        grid.add_row();
        grid.add_col();
        assert_eq!(grid.rows, 4);
        assert_eq!(grid.cols, 4);
        // New positions read as defaults without any cell writes.
        assert!(grid.cell(3, 3).is_default());
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_remove_last_row_refused_on_single_row() {
        let mut grid = Grid::new(1, 5);
        grid.set_value(0, 0, "keep").unwrap();
        assert_eq!(grid.remove_last_row(), Err(Error::LastRow));
        assert_eq!(grid.rows, 1);
        assert_eq!(grid.value(0, 0), "keep");
    }

    #[test]
    fn test_remove_last_col_refused_on_single_col() {
        let mut grid = Grid::new(5, 1);
        assert_eq!(grid.remove_last_col(), Err(Error::LastColumn));
        assert_eq!(grid.cols, 1);
    }

    #[test]
    fn test_remove_row_evicts_trailing_cells_only() {
        let mut grid = Grid::new(3, 3);
        grid.set_value(0, 0, "top").unwrap();
        grid.set_value(2, 1, "bottom").unwrap();
        grid.remove_last_row().unwrap();
        assert_eq!(grid.rows, 2);
        assert_eq!(grid.value(0, 0), "top");
        assert_eq!(grid.occupied(), 1);
    }

    #[test]
    fn test_remove_col_evicts_trailing_cells_only() {
        let mut grid = Grid::new(3, 3);
        grid.set_value(1, 0, "left").unwrap();
        grid.set_value(1, 2, "right").unwrap();
        grid.remove_last_col().unwrap();
        assert_eq!(grid.cols, 2);
        assert_eq!(grid.value(1, 0), "left");
        assert_eq!(grid.occupied(), 1);
    }

    #[test]
    fn test_apply_and_detach_template() {
        let template = FormatTemplate {
            id: TemplateId(7),
            workbook: WorkbookId(1),
            name: "Highlight Style".to_string(),
            bold: true,
            italic: false,
            underline: false,
            background: "#FFFF00".to_string(),
            foreground: "#000000".to_string(),
            font_family: "Segoe UI".to_string(),
            font_size: 11.0,
        };
        let mut grid = Grid::new(3, 3);
        grid.apply_template(1, 1, &template).unwrap();
        let cell = grid.cell(1, 1);
        assert!(cell.style.bold);
        assert_eq!(cell.style.background, "#FFFF00");
        assert_eq!(cell.template, Some(TemplateId(7)));

        grid.detach_template(1, 1).unwrap();
        let cell = grid.cell(1, 1);
        assert_eq!(cell.template, None);
        // The copied style stays on the cell.
        assert!(cell.style.bold);
    }

    #[test]
    fn test_clear_cell_keeps_storage_identity() {
        let mut grid = Grid::new(3, 3);
        {
            let cell = grid.cell_mut(0, 0).unwrap();
            cell.value = "Product".to_string();
            cell.style.bold = true;
            cell.persisted = Some(CellId(42));
        }
        grid.clear_cell(0, 0).unwrap();
        let cell = grid.cell(0, 0);
        assert!(cell.is_default());
        assert_eq!(cell.persisted, Some(CellId(42)));
    }

    #[test]
    fn test_insert_loaded_grows_bounds() {
        let mut grid = Grid::new(10, 10);
        grid.insert_loaded(
            14,
            2,
            GridCell {
                value: "far".to_string(),
                ..GridCell::default()
            },
        );
        assert_eq!(grid.rows, 15);
        assert_eq!(grid.cols, 10);
        assert_eq!(grid.value(14, 2), "far");
    }
}
