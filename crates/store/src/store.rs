//! The persistence gateway over a rusqlite connection.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use dowell_engine::cell::{Cell, CellId, CellStyle};
use dowell_engine::template::{FormatTemplate, TemplateId, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use dowell_engine::user::{User, UserId, WorkbookShare};
use dowell_engine::workbook::{Workbook, WorkbookId};
use dowell_engine::worksheet::{Worksheet, WorksheetId};

use crate::error::{Error, Result};
use crate::seed;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workbooks (
    workbook_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    file_path TEXT,
    author TEXT NOT NULL DEFAULT '',
    created_date TEXT NOT NULL,
    last_saved_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS worksheets (
    worksheet_id INTEGER PRIMARY KEY,
    workbook_id INTEGER NOT NULL REFERENCES workbooks(workbook_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    tab_order INTEGER NOT NULL DEFAULT 0,
    row_count INTEGER NOT NULL,
    column_count INTEGER NOT NULL,
    created_date TEXT NOT NULL,
    modified_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS format_templates (
    format_template_id INTEGER PRIMARY KEY,
    workbook_id INTEGER NOT NULL REFERENCES workbooks(workbook_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    is_bold INTEGER NOT NULL DEFAULT 0,
    is_italic INTEGER NOT NULL DEFAULT 0,
    is_underline INTEGER NOT NULL DEFAULT 0,
    background_color TEXT NOT NULL DEFAULT '#FFFFFF',
    foreground_color TEXT NOT NULL DEFAULT '#000000',
    font_family TEXT NOT NULL DEFAULT 'default',
    font_size REAL NOT NULL DEFAULT 11.0
);

CREATE TABLE IF NOT EXISTS cells (
    cell_id INTEGER PRIMARY KEY,
    worksheet_id INTEGER NOT NULL REFERENCES worksheets(worksheet_id) ON DELETE CASCADE,
    row INTEGER NOT NULL,
    col INTEGER NOT NULL,
    value TEXT NOT NULL DEFAULT '',
    is_bold INTEGER NOT NULL DEFAULT 0,
    is_italic INTEGER NOT NULL DEFAULT 0,
    is_underline INTEGER NOT NULL DEFAULT 0,
    background_color TEXT NOT NULL DEFAULT '#FFFFFF',
    foreground_color TEXT NOT NULL DEFAULT '#000000',
    format_template_id INTEGER REFERENCES format_templates(format_template_id),
    UNIQUE (worksheet_id, row, col)
);

CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL DEFAULT '',
    created_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workbook_shares (
    share_id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    workbook_id INTEGER NOT NULL REFERENCES workbooks(workbook_id) ON DELETE CASCADE,
    shared_date TEXT NOT NULL,
    can_edit INTEGER NOT NULL DEFAULT 0,
    UNIQUE (user_id, workbook_id)
);
"#;

/// Field set for creating a format template.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub background: String,
    pub foreground: String,
    pub font_family: String,
    pub font_size: f64,
}

impl NewTemplate {
    /// Captures a cell's current flags and colors under a new name, the
    /// way "create template from cell" works. Font settings stay at their
    /// defaults.
    pub fn from_style(name: &str, style: &CellStyle) -> NewTemplate {
        NewTemplate {
            name: name.to_string(),
            bold: style.bold,
            italic: style.italic,
            underline: style.underline,
            background: style.background.clone(),
            foreground: style.foreground.clone(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Handle on one DoWell database.
#[derive(Debug)]
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Opens (creating if needed) a database file, applies the schema and
    /// seeds sample content when the database is brand new.
    pub fn open(path: &Path) -> Result<Store> {
        let conn = Connection::open(path)?;
        Store::init(conn)
    }

    /// In-memory database for tests and scratch work.
    pub fn open_in_memory() -> Result<Store> {
        let conn = Connection::open_in_memory()?;
        Store::init(conn)
    }

    fn init(conn: Connection) -> Result<Store> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Store { conn };
        store.ensure_schema()?;
        seed::seed_if_empty(&store)?;
        Ok(store)
    }

    /// Idempotent schema creation. Safe to run on every startup.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        debug!("schema ensured");
        Ok(())
    }

    // ==== Batches ====

    /// Starts an explicit transaction. Pair with `commit_batch` or
    /// `rollback_batch`; batches do not nest.
    pub fn begin_batch(&self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    pub fn commit_batch(&self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    pub fn rollback_batch(&self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Runs `f` inside a batch, committing on success and rolling back
    /// on error, a failed COMMIT included, so the connection is never
    /// left holding an open transaction.
    pub fn in_batch<T>(&self, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
        self.begin_batch()?;
        let value = match f(self) {
            Ok(value) => value,
            Err(err) => {
                let _ = self.rollback_batch();
                return Err(err);
            }
        };
        if let Err(err) = self.commit_batch() {
            let _ = self.rollback_batch();
            return Err(err);
        }
        Ok(value)
    }

    // ==== Workbooks ====

    pub fn create_workbook(&self, name: &str, author: &str) -> Result<Workbook> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO workbooks (name, file_path, author, created_date, last_saved_date)
             VALUES (?1, NULL, ?2, ?3, ?3)",
            params![name, author, now.to_rfc3339()],
        )?;
        self.workbook(WorkbookId(self.conn.last_insert_rowid()))
    }

    pub fn workbook(&self, id: WorkbookId) -> Result<Workbook> {
        self.conn
            .query_row(
                "SELECT workbook_id, name, file_path, author, created_date, last_saved_date
                 FROM workbooks WHERE workbook_id = ?1",
                params![id.0],
                workbook_from_row,
            )
            .optional()?
            .ok_or(Error::WorkbookNotFound(id.0))
    }

    pub fn list_workbooks(&self) -> Result<Vec<Workbook>> {
        let mut stmt = self.conn.prepare(
            "SELECT workbook_id, name, file_path, author, created_date, last_saved_date
             FROM workbooks ORDER BY workbook_id",
        )?;
        let rows = stmt.query_map([], workbook_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn rename_workbook(&self, id: WorkbookId, name: &str) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE workbooks SET name = ?2 WHERE workbook_id = ?1",
            params![id.0, name],
        )?;
        if n == 0 {
            return Err(Error::WorkbookNotFound(id.0));
        }
        Ok(())
    }

    /// Records where the workbook was last exported.
    pub fn set_file_path(&self, id: WorkbookId, path: &str) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE workbooks SET file_path = ?2 WHERE workbook_id = ?1",
            params![id.0, path],
        )?;
        if n == 0 {
            return Err(Error::WorkbookNotFound(id.0));
        }
        Ok(())
    }

    /// Bumps the workbook's last-saved timestamp.
    pub fn touch_saved(&self, id: WorkbookId, when: DateTime<Utc>) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE workbooks SET last_saved_date = ?2 WHERE workbook_id = ?1",
            params![id.0, when.to_rfc3339()],
        )?;
        if n == 0 {
            return Err(Error::WorkbookNotFound(id.0));
        }
        Ok(())
    }

    /// Deletes a workbook and everything it owns.
    pub fn delete_workbook(&self, id: WorkbookId) -> Result<()> {
        self.workbook(id)?;
        self.in_batch(|store| {
            // Cells reference format_templates without cascade, so they
            // go before the templates.
            store.conn.execute(
                "DELETE FROM cells WHERE worksheet_id IN
                     (SELECT worksheet_id FROM worksheets WHERE workbook_id = ?1)",
                params![id.0],
            )?;
            store.conn.execute(
                "DELETE FROM worksheets WHERE workbook_id = ?1",
                params![id.0],
            )?;
            store.conn.execute(
                "DELETE FROM format_templates WHERE workbook_id = ?1",
                params![id.0],
            )?;
            store.conn.execute(
                "DELETE FROM workbook_shares WHERE workbook_id = ?1",
                params![id.0],
            )?;
            store.conn.execute(
                "DELETE FROM workbooks WHERE workbook_id = ?1",
                params![id.0],
            )?;
            Ok(())
        })
    }

    // ==== Worksheets ====

    /// Adds a worksheet at the end of the tab order. `name` defaults to
    /// "SheetN".
    pub fn add_worksheet(
        &self,
        workbook: WorkbookId,
        name: Option<&str>,
        rows: usize,
        cols: usize,
    ) -> Result<Worksheet> {
        self.workbook(workbook)?;
        let next: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(tab_order), 0) + 1 FROM worksheets WHERE workbook_id = ?1",
            params![workbook.0],
            |row| row.get(0),
        )?;
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Sheet{}", next),
        };
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO worksheets (workbook_id, name, tab_order, row_count, column_count, created_date, modified_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![workbook.0, name, next, rows as i64, cols as i64, now],
        )?;
        self.worksheet(WorksheetId(self.conn.last_insert_rowid()))
    }

    pub fn worksheet(&self, id: WorksheetId) -> Result<Worksheet> {
        self.conn
            .query_row(
                "SELECT worksheet_id, workbook_id, name, tab_order, row_count, column_count, created_date, modified_date
                 FROM worksheets WHERE worksheet_id = ?1",
                params![id.0],
                worksheet_from_row,
            )
            .optional()?
            .ok_or(Error::WorksheetNotFound(id.0))
    }

    pub fn worksheets_of(&self, workbook: WorkbookId) -> Result<Vec<Worksheet>> {
        let mut stmt = self.conn.prepare(
            "SELECT worksheet_id, workbook_id, name, tab_order, row_count, column_count, created_date, modified_date
             FROM worksheets WHERE workbook_id = ?1 ORDER BY tab_order",
        )?;
        let rows = stmt.query_map(params![workbook.0], worksheet_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// First worksheet in tab order, if the workbook has any.
    pub fn first_worksheet(&self, workbook: WorkbookId) -> Result<Option<Worksheet>> {
        Ok(self
            .conn
            .query_row(
                "SELECT worksheet_id, workbook_id, name, tab_order, row_count, column_count, created_date, modified_date
                 FROM worksheets WHERE workbook_id = ?1 ORDER BY tab_order LIMIT 1",
                params![workbook.0],
                worksheet_from_row,
            )
            .optional()?)
    }

    pub fn rename_worksheet(&self, id: WorksheetId, name: &str) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE worksheets SET name = ?2, modified_date = ?3 WHERE worksheet_id = ?1",
            params![id.0, name, Utc::now().to_rfc3339()],
        )?;
        if n == 0 {
            return Err(Error::WorksheetNotFound(id.0));
        }
        Ok(())
    }

    /// Persists the dense grid dimensions.
    pub fn set_dimensions(
        &self,
        id: WorksheetId,
        rows: usize,
        cols: usize,
        modified: DateTime<Utc>,
    ) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE worksheets SET row_count = ?2, column_count = ?3, modified_date = ?4
             WHERE worksheet_id = ?1",
            params![id.0, rows as i64, cols as i64, modified.to_rfc3339()],
        )?;
        if n == 0 {
            return Err(Error::WorksheetNotFound(id.0));
        }
        Ok(())
    }

    /// Deletes a worksheet and its cells. The workbook's last worksheet
    /// cannot be deleted.
    pub fn delete_worksheet(&self, id: WorksheetId) -> Result<()> {
        let sheet = self.worksheet(id)?;
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM worksheets WHERE workbook_id = ?1",
            params![sheet.workbook.0],
            |row| row.get(0),
        )?;
        if count <= 1 {
            return Err(Error::LastWorksheet);
        }
        self.in_batch(|store| {
            store.conn.execute(
                "DELETE FROM cells WHERE worksheet_id = ?1",
                params![id.0],
            )?;
            store.conn.execute(
                "DELETE FROM worksheets WHERE worksheet_id = ?1",
                params![id.0],
            )?;
            Ok(())
        })
    }

    /// Removes every worksheet of the workbook except `keep`, cells
    /// included. Caller manages the batch.
    pub fn delete_other_worksheets(&self, workbook: WorkbookId, keep: WorksheetId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM cells WHERE worksheet_id IN
                 (SELECT worksheet_id FROM worksheets WHERE workbook_id = ?1 AND worksheet_id <> ?2)",
            params![workbook.0, keep.0],
        )?;
        self.conn.execute(
            "DELETE FROM worksheets WHERE workbook_id = ?1 AND worksheet_id <> ?2",
            params![workbook.0, keep.0],
        )?;
        Ok(())
    }

    // ==== Cells ====

    /// All persisted cells of a worksheet in row-major order.
    pub fn cells_of(&self, worksheet: WorksheetId) -> Result<Vec<Cell>> {
        let mut stmt = self.conn.prepare(
            "SELECT cell_id, worksheet_id, row, col, value, is_bold, is_italic, is_underline,
                    background_color, foreground_color, format_template_id
             FROM cells WHERE worksheet_id = ?1 ORDER BY row, col",
        )?;
        let rows = stmt.query_map(params![worksheet.0], cell_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Inserts or overwrites the cell at (row, col), returning its id.
    /// The UNIQUE (worksheet_id, row, col) index makes a second write to
    /// a position an overwrite rather than a duplicate.
    pub fn upsert_cell(
        &self,
        worksheet: WorksheetId,
        row: usize,
        col: usize,
        value: &str,
        style: &CellStyle,
        template: Option<TemplateId>,
    ) -> Result<CellId> {
        let id: i64 = self.conn.query_row(
            "INSERT INTO cells (worksheet_id, row, col, value, is_bold, is_italic, is_underline,
                                background_color, foreground_color, format_template_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (worksheet_id, row, col) DO UPDATE SET
                 value = excluded.value,
                 is_bold = excluded.is_bold,
                 is_italic = excluded.is_italic,
                 is_underline = excluded.is_underline,
                 background_color = excluded.background_color,
                 foreground_color = excluded.foreground_color,
                 format_template_id = excluded.format_template_id
             RETURNING cell_id",
            params![
                worksheet.0,
                row as i64,
                col as i64,
                value,
                style.bold,
                style.italic,
                style.underline,
                style.background,
                style.foreground,
                template.map(|t| t.0),
            ],
            |row| row.get(0),
        )?;
        Ok(CellId(id))
    }

    /// Overwrites every mutable field of an existing cell.
    pub fn update_cell(
        &self,
        id: CellId,
        value: &str,
        style: &CellStyle,
        template: Option<TemplateId>,
    ) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE cells SET value = ?2, is_bold = ?3, is_italic = ?4, is_underline = ?5,
                              background_color = ?6, foreground_color = ?7, format_template_id = ?8
             WHERE cell_id = ?1",
            params![
                id.0,
                value,
                style.bold,
                style.italic,
                style.underline,
                style.background,
                style.foreground,
                template.map(|t| t.0),
            ],
        )?;
        if n == 0 {
            return Err(Error::CellNotFound(id.0));
        }
        Ok(())
    }

    /// Deletes the persisted cells of one row, returning how many went.
    pub fn delete_cells_in_row(&self, worksheet: WorksheetId, row: usize) -> Result<usize> {
        let n = self.conn.execute(
            "DELETE FROM cells WHERE worksheet_id = ?1 AND row = ?2",
            params![worksheet.0, row as i64],
        )?;
        Ok(n)
    }

    /// Deletes the persisted cells of one column, returning how many went.
    pub fn delete_cells_in_column(&self, worksheet: WorksheetId, col: usize) -> Result<usize> {
        let n = self.conn.execute(
            "DELETE FROM cells WHERE worksheet_id = ?1 AND col = ?2",
            params![worksheet.0, col as i64],
        )?;
        Ok(n)
    }

    /// Clears every persisted cell of every worksheet of the workbook.
    /// Caller manages the batch.
    pub fn delete_all_cells(&self, workbook: WorkbookId) -> Result<usize> {
        let n = self.conn.execute(
            "DELETE FROM cells WHERE worksheet_id IN
                 (SELECT worksheet_id FROM worksheets WHERE workbook_id = ?1)",
            params![workbook.0],
        )?;
        Ok(n)
    }

    // ==== Format templates ====

    pub fn templates_of(&self, workbook: WorkbookId) -> Result<Vec<FormatTemplate>> {
        let mut stmt = self.conn.prepare(
            "SELECT format_template_id, workbook_id, name, is_bold, is_italic, is_underline,
                    background_color, foreground_color, font_family, font_size
             FROM format_templates WHERE workbook_id = ?1 ORDER BY format_template_id",
        )?;
        let rows = stmt.query_map(params![workbook.0], template_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn template(&self, id: TemplateId) -> Result<FormatTemplate> {
        self.conn
            .query_row(
                "SELECT format_template_id, workbook_id, name, is_bold, is_italic, is_underline,
                        background_color, foreground_color, font_family, font_size
                 FROM format_templates WHERE format_template_id = ?1",
                params![id.0],
                template_from_row,
            )
            .optional()?
            .ok_or(Error::TemplateNotFound(id.0))
    }

    pub fn insert_template(
        &self,
        workbook: WorkbookId,
        template: &NewTemplate,
    ) -> Result<FormatTemplate> {
        self.workbook(workbook)?;
        self.conn.execute(
            "INSERT INTO format_templates (workbook_id, name, is_bold, is_italic, is_underline,
                                           background_color, foreground_color, font_family, font_size)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                workbook.0,
                template.name,
                template.bold,
                template.italic,
                template.underline,
                template.background,
                template.foreground,
                template.font_family,
                template.font_size,
            ],
        )?;
        self.template(TemplateId(self.conn.last_insert_rowid()))
    }

    /// Deletes a template, detaching it from any cells that reference it.
    pub fn delete_template(&self, id: TemplateId) -> Result<()> {
        self.template(id)?;
        self.in_batch(|store| {
            store.conn.execute(
                "UPDATE cells SET format_template_id = NULL WHERE format_template_id = ?1",
                params![id.0],
            )?;
            store.conn.execute(
                "DELETE FROM format_templates WHERE format_template_id = ?1",
                params![id.0],
            )?;
            Ok(())
        })
    }

    /// Deletes every template of the workbook, nulling cell references
    /// first. Caller manages the batch.
    pub fn delete_all_templates(&self, workbook: WorkbookId) -> Result<usize> {
        self.conn.execute(
            "UPDATE cells SET format_template_id = NULL WHERE format_template_id IN
                 (SELECT format_template_id FROM format_templates WHERE workbook_id = ?1)",
            params![workbook.0],
        )?;
        let n = self.conn.execute(
            "DELETE FROM format_templates WHERE workbook_id = ?1",
            params![workbook.0],
        )?;
        Ok(n)
    }

    // ==== Users and sharing ====

    pub fn create_user(&self, username: &str, email: &str) -> Result<User> {
        self.conn.execute(
            "INSERT INTO users (username, email, created_date) VALUES (?1, ?2, ?3)",
            params![username, email, Utc::now().to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(self.conn.query_row(
            "SELECT user_id, username, email, created_date FROM users WHERE user_id = ?1",
            params![id],
            user_from_row,
        )?)
    }

    pub fn user_by_name(&self, username: &str) -> Result<User> {
        self.conn
            .query_row(
                "SELECT user_id, username, email, created_date FROM users WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, username, email, created_date FROM users ORDER BY user_id",
        )?;
        let rows = stmt.query_map([], user_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Shares a workbook with a user. Sharing the same pair again updates
    /// the edit flag instead of duplicating the row.
    pub fn share_workbook(
        &self,
        user: UserId,
        workbook: WorkbookId,
        can_edit: bool,
    ) -> Result<WorkbookShare> {
        self.workbook(workbook)?;
        Ok(self.conn.query_row(
            "INSERT INTO workbook_shares (user_id, workbook_id, shared_date, can_edit)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, workbook_id) DO UPDATE SET can_edit = excluded.can_edit
             RETURNING share_id, user_id, workbook_id, shared_date, can_edit",
            params![user.0, workbook.0, Utc::now().to_rfc3339(), can_edit],
            share_from_row,
        )?)
    }

    pub fn unshare_workbook(&self, user: UserId, workbook: WorkbookId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM workbook_shares WHERE user_id = ?1 AND workbook_id = ?2",
            params![user.0, workbook.0],
        )?;
        Ok(())
    }

    /// Shares of a workbook paired with the receiving username.
    pub fn shares_of(&self, workbook: WorkbookId) -> Result<Vec<(WorkbookShare, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.share_id, s.user_id, s.workbook_id, s.shared_date, s.can_edit, u.username
             FROM workbook_shares s JOIN users u ON u.user_id = s.user_id
             WHERE s.workbook_id = ?1 ORDER BY u.username",
        )?;
        let rows = stmt.query_map(params![workbook.0], |row| {
            let share = share_from_row(row)?;
            let username: String = row.get(5)?;
            Ok((share, username))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn parse_datetime(idx: usize, text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|when| when.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
        })
}

fn workbook_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Workbook> {
    let created: String = row.get(4)?;
    let saved: String = row.get(5)?;
    Ok(Workbook {
        id: WorkbookId(row.get(0)?),
        name: row.get(1)?,
        file_path: row.get(2)?,
        author: row.get(3)?,
        created: parse_datetime(4, &created)?,
        last_saved: parse_datetime(5, &saved)?,
    })
}

fn worksheet_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Worksheet> {
    let rows: i64 = row.get(4)?;
    let cols: i64 = row.get(5)?;
    let created: String = row.get(6)?;
    let modified: String = row.get(7)?;
    Ok(Worksheet {
        id: WorksheetId(row.get(0)?),
        workbook: WorkbookId(row.get(1)?),
        name: row.get(2)?,
        tab_order: row.get(3)?,
        rows: rows as usize,
        cols: cols as usize,
        created: parse_datetime(6, &created)?,
        modified: parse_datetime(7, &modified)?,
    })
}

fn cell_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Cell> {
    let cell_row: i64 = row.get(2)?;
    let cell_col: i64 = row.get(3)?;
    let template: Option<i64> = row.get(10)?;
    Ok(Cell {
        id: CellId(row.get(0)?),
        worksheet: WorksheetId(row.get(1)?),
        row: cell_row as usize,
        col: cell_col as usize,
        value: row.get(4)?,
        style: CellStyle {
            bold: row.get(5)?,
            italic: row.get(6)?,
            underline: row.get(7)?,
            background: row.get(8)?,
            foreground: row.get(9)?,
        },
        template: template.map(TemplateId),
    })
}

fn template_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FormatTemplate> {
    Ok(FormatTemplate {
        id: TemplateId(row.get(0)?),
        workbook: WorkbookId(row.get(1)?),
        name: row.get(2)?,
        bold: row.get(3)?,
        italic: row.get(4)?,
        underline: row.get(5)?,
        background: row.get(6)?,
        foreground: row.get(7)?,
        font_family: row.get(8)?,
        font_size: row.get(9)?,
    })
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created: String = row.get(3)?;
    Ok(User {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        created: parse_datetime(3, &created)?,
    })
}

fn share_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WorkbookShare> {
    let shared: String = row.get(3)?;
    Ok(WorkbookShare {
        id: row.get(0)?,
        user: UserId(row.get(1)?),
        workbook: WorkbookId(row.get(2)?),
        shared: parse_datetime(3, &shared)?,
        can_edit: row.get(4)?,
    })
}
