use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workbook::WorkbookId;

/// Identifier of a persisted worksheet. Assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorksheetId(pub i64);

/// A named, ordered grid of cells within a workbook.
///
/// `rows`/`cols` are the authoritative dense dimensions: every persisted
/// cell of the worksheet lies inside them, and shrinking them evicts the
/// out-of-range cells first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: WorksheetId,
    pub workbook: WorkbookId,
    pub name: String,
    pub tab_order: i64,
    pub rows: usize,
    pub cols: usize,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}
