//! Sample content for brand-new databases.

use log::debug;
use rusqlite::OptionalExtension;

use crate::error::Result;
use crate::store::Store;

// Matches the sample workbook the original application ships with.
const SEED: &str = r#"
BEGIN;

INSERT INTO workbooks (workbook_id, name, file_path, author, created_date, last_saved_date)
VALUES (1, 'Sample Workbook', NULL, 'DoWell User', '2025-01-01T12:00:00Z', '2025-01-01T12:00:00Z');

INSERT INTO format_templates (format_template_id, workbook_id, name, is_bold, is_italic, is_underline, background_color, foreground_color, font_family, font_size) VALUES
    (1, 1, 'Header Style', 1, 0, 0, '#4472C4', '#FFFFFF', 'Segoe UI', 12.0),
    (2, 1, 'Number Style', 0, 0, 0, '#F2F2F2', '#0000FF', 'Consolas', 11.0),
    (3, 1, 'Highlight Style', 1, 0, 0, '#FFFF00', '#000000', 'Segoe UI', 11.0);

INSERT INTO worksheets (worksheet_id, workbook_id, name, tab_order, row_count, column_count, created_date, modified_date) VALUES
    (1, 1, 'Sheet1', 1, 10, 10, '2025-01-01T12:00:00Z', '2025-01-01T12:00:00Z'),
    (2, 1, 'Sheet2', 2, 10, 10, '2025-01-01T12:00:00Z', '2025-01-01T12:00:00Z');

INSERT INTO cells (worksheet_id, row, col, value, is_bold, is_italic, is_underline, background_color, foreground_color, format_template_id) VALUES
    (1, 0, 0, 'Product', 1, 0, 0, '#4472C4', '#FFFFFF', 1),
    (1, 0, 1, 'Price', 1, 0, 0, '#4472C4', '#FFFFFF', 1),
    (1, 0, 2, 'Quantity', 1, 0, 0, '#4472C4', '#FFFFFF', 1),
    (1, 1, 0, 'Laptop', 0, 0, 0, '#FFFFFF', '#000000', NULL),
    (1, 1, 1, '999.99', 0, 0, 0, '#F2F2F2', '#0000FF', 2),
    (1, 1, 2, '5', 0, 0, 0, '#F2F2F2', '#0000FF', 2),
    (1, 2, 0, 'Mouse', 0, 0, 0, '#FFFFFF', '#000000', NULL),
    (1, 2, 1, '29.99', 0, 0, 0, '#F2F2F2', '#0000FF', 2),
    (1, 2, 2, '15', 0, 0, 0, '#F2F2F2', '#0000FF', 2);

INSERT INTO users (user_id, username, email, created_date) VALUES
    (1, 'admin', 'admin@dowell.com', '2024-01-01T10:00:00Z'),
    (2, 'user1', 'user1@dowell.com', '2024-01-01T10:00:00Z'),
    (3, 'user2', 'user2@dowell.com', '2024-01-01T10:00:00Z');

INSERT INTO workbook_shares (user_id, workbook_id, shared_date, can_edit) VALUES
    (1, 1, '2025-01-01T12:00:00Z', 1),
    (2, 1, '2025-01-01T12:00:00Z', 0);

COMMIT;
"#;

/// Seeds the sample workbook into a database that has never held one.
/// A marker row keeps this to a single application over the database's
/// lifetime, even if every workbook is later deleted.
pub(crate) fn seed_if_empty(store: &Store) -> Result<()> {
    let seeded: Option<String> = store
        .conn
        .query_row("SELECT value FROM meta WHERE key = 'seeded'", [], |row| {
            row.get(0)
        })
        .optional()?;
    if seeded.is_some() {
        return Ok(());
    }

    let workbooks: i64 =
        store
            .conn
            .query_row("SELECT COUNT(*) FROM workbooks", [], |row| row.get(0))?;
    if workbooks == 0 {
        store.conn.execute_batch(SEED)?;
        debug!("seeded sample workbook");
    }

    store
        .conn
        .execute("INSERT INTO meta (key, value) VALUES ('seeded', '1')", [])?;
    Ok(())
}
