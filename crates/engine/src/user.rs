use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workbook::WorkbookId;

/// Identifier of a persisted user account. Assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// An account a workbook can be shared with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created: DateTime<Utc>,
}

/// One grant of a workbook to a user.
///
/// The (user, workbook) pair is unique; re-sharing updates `can_edit`
/// instead of adding a second grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookShare {
    pub id: i64,
    pub user: UserId,
    pub workbook: WorkbookId,
    pub shared: DateTime<Utc>,
    pub can_edit: bool,
}
