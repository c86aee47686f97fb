use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a persisted workbook. Assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkbookId(pub i64);

/// A named container of worksheets and format templates.
///
/// Worksheets and templates are owned (cascade-deleted with the
/// workbook); they point back here by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub id: WorkbookId,
    pub name: String,
    /// Path of the interchange file this workbook was last saved to.
    pub file_path: Option<String>,
    pub author: String,
    pub created: DateTime<Utc>,
    pub last_saved: DateTime<Utc>,
}
