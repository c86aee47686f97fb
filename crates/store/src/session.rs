//! Grid sessions: a dense in-memory grid synchronized with the sparse
//! persisted cell set of one worksheet.

use chrono::Utc;
use log::debug;

use dowell_engine::cell::{CellId, GridCell};
use dowell_engine::error::Error as GridError;
use dowell_engine::grid::{Grid, DEFAULT_COLS, DEFAULT_ROWS};
use dowell_engine::worksheet::{Worksheet, WorksheetId};

use crate::error::Result;
use crate::store::Store;

/// An editing session over one worksheet.
///
/// Opening a session materializes the persisted cells into a dense grid;
/// `commit` writes the whole grid back in one batch. Structural removals
/// touch the store immediately, everything else waits for `commit`.
#[derive(Debug)]
pub struct GridSession<'a> {
    store: &'a Store,
    worksheet: Worksheet,
    grid: Grid,
}

impl<'a> GridSession<'a> {
    /// Loads the worksheet's cells into a dense grid.
    ///
    /// Dimensions are the largest of the stored counts, the sparse maximum
    /// and the 10x10 floor, so every persisted cell stays addressable.
    /// Storage is not mutated.
    pub fn open(store: &'a Store, worksheet: WorksheetId) -> Result<GridSession<'a>> {
        let meta = store.worksheet(worksheet)?;
        let cells = store.cells_of(worksheet)?;

        let mut rows = meta.rows.max(DEFAULT_ROWS);
        let mut cols = meta.cols.max(DEFAULT_COLS);
        for cell in &cells {
            rows = rows.max(cell.row + 1);
            cols = cols.max(cell.col + 1);
        }

        let mut grid = Grid::new(rows, cols);
        for cell in cells {
            grid.insert_loaded(
                cell.row,
                cell.col,
                GridCell {
                    value: cell.value,
                    style: cell.style,
                    template: cell.template,
                    persisted: Some(cell.id),
                },
            );
        }
        debug!("opened worksheet {} as {}x{}", meta.id.0, rows, cols);

        Ok(GridSession {
            store,
            worksheet: meta,
            grid,
        })
    }

    /// The worksheet this session edits. Its `rows`/`cols` reflect the
    /// stored dimensions at open time; the grid is authoritative after.
    pub fn worksheet(&self) -> &Worksheet {
        &self.worksheet
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Appends a row in memory. Nothing is persisted until `commit`.
    pub fn add_row(&mut self) {
        self.grid.add_row();
    }

    /// Appends a column in memory. Nothing is persisted until `commit`.
    pub fn add_col(&mut self) {
        self.grid.add_col();
    }

    /// Drops the last row. Refused while only one row remains; otherwise
    /// the row's persisted cells are deleted before the grid shrinks, so
    /// the store never holds cells outside the dense bounds.
    pub fn remove_row(&mut self) -> Result<()> {
        if self.grid.rows <= 1 {
            return Err(GridError::LastRow.into());
        }
        self.store
            .delete_cells_in_row(self.worksheet.id, self.grid.rows - 1)?;
        self.grid.remove_last_row()?;
        Ok(())
    }

    /// Drops the last column. Same contract as `remove_row`.
    pub fn remove_col(&mut self) -> Result<()> {
        if self.grid.cols <= 1 {
            return Err(GridError::LastColumn.into());
        }
        self.store
            .delete_cells_in_column(self.worksheet.id, self.grid.cols - 1)?;
        self.grid.remove_last_col()?;
        Ok(())
    }

    /// Writes the whole grid back in one atomic batch. On any failure,
    /// the COMMIT statement included, the batch rolls back and the
    /// in-memory grid keeps its pre-commit state, so the commit can be
    /// retried on the same connection.
    pub fn commit(&mut self) -> Result<()> {
        self.store.begin_batch()?;
        let assigned = match self.commit_in_batch() {
            Ok(assigned) => assigned,
            Err(err) => {
                let _ = self.store.rollback_batch();
                return Err(err);
            }
        };
        if let Err(err) = self.store.commit_batch() {
            let _ = self.store.rollback_batch();
            return Err(err);
        }
        self.adopt_ids(assigned)
    }

    /// The body of `commit`, for callers composing a larger batch.
    ///
    /// Every persisted cell is overwritten with its in-memory state,
    /// unpersisted non-default cells are inserted, and default positions
    /// stay sparse. The stored dimensions, the worksheet's modified
    /// stamp and the workbook's last-saved stamp follow. Returns the
    /// ids the inserts were assigned, to hand to `adopt_ids` once the
    /// surrounding batch commits.
    pub fn commit_in_batch(&mut self) -> Result<Vec<(usize, usize, CellId)>> {
        let now = Utc::now();
        let mut assigned: Vec<(usize, usize, CellId)> = Vec::new();

        for (row, col) in self.grid.positions() {
            let cell = self.grid.cell(row, col);
            match cell.persisted {
                Some(id) => {
                    self.store
                        .update_cell(id, &cell.value, &cell.style, cell.template)?;
                }
                None if !cell.is_default() => {
                    let id = self.store.upsert_cell(
                        self.worksheet.id,
                        row,
                        col,
                        &cell.value,
                        &cell.style,
                        cell.template,
                    )?;
                    assigned.push((row, col, id));
                }
                None => {}
            }
        }

        self.store
            .set_dimensions(self.worksheet.id, self.grid.rows, self.grid.cols, now)?;
        self.store.touch_saved(self.worksheet.workbook, now)?;

        debug!(
            "wrote worksheet {}: {} inserted",
            self.worksheet.id.0,
            assigned.len()
        );
        Ok(assigned)
    }

    /// Marks freshly inserted cells as persisted under their assigned
    /// ids. Runs only after the batch that inserted them commits; until
    /// then the grid keeps treating the cells as unpersisted, so a
    /// rolled-back batch can simply be committed again.
    pub fn adopt_ids(&mut self, assigned: Vec<(usize, usize, CellId)>) -> Result<()> {
        for (row, col, id) in assigned {
            self.grid.cell_mut(row, col)?.persisted = Some(id);
        }
        Ok(())
    }
}
