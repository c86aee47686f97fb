//! Export and import of workbook documents.
//!
//! Export is a straight read of persisted state. Import is destructive:
//! it parses and validates the whole document first, then replaces the
//! target workbook's cells, templates and surplus worksheets inside one
//! batch, so a malformed file never costs existing data.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use log::{debug, warn};

use dowell_engine::cell::{Cell, CellId, CellStyle, GridCell};
use dowell_engine::grid::{DEFAULT_COLS, DEFAULT_ROWS};
use dowell_engine::template::FormatTemplate;
use dowell_engine::workbook::WorkbookId;
use dowell_engine::worksheet::WorksheetId;
use dowell_store::session::GridSession;
use dowell_store::store::{NewTemplate, Store};

use crate::document::{CellDoc, Document, GridSizeDoc, TemplateDoc, WorkbookMeta};
use crate::error::{Error, Result};

/// Extensions the interchange format travels under.
const EXTENSIONS: [&str; 2] = ["dwl", "json"];

fn check_extension(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some(ext) if EXTENSIONS.contains(&ext) => Ok(()),
        _ => Err(Error::UnknownExtension(path.display().to_string())),
    }
}

/// Writes one worksheet of a workbook as a self-contained document and
/// records the file path and save time on the workbook.
///
/// Callers commit their session first; export reads only persisted state.
pub fn export_workbook(
    store: &Store,
    workbook: WorkbookId,
    worksheet: WorksheetId,
    path: &Path,
) -> Result<()> {
    check_extension(path)?;
    let meta = store.workbook(workbook)?;
    let sheet = store.worksheet(worksheet)?;
    let templates = store.templates_of(workbook)?;
    let cells = store.cells_of(worksheet)?;

    let document = Document {
        workbook: Some(WorkbookMeta {
            name: meta.name.clone(),
            author: meta.author.clone(),
            created: Some(meta.created),
            last_saved: Some(meta.last_saved),
        }),
        templates: templates.iter().map(template_to_doc).collect(),
        cells: cells.iter().map(cell_to_doc).collect(),
        grid_size: Some(GridSizeDoc {
            rows: sheet.rows,
            columns: sheet.cols,
        }),
    };

    let text = serde_json::to_string_pretty(&document)?;
    fs::write(path, text)?;

    store.set_file_path(workbook, &path.display().to_string())?;
    store.touch_saved(workbook, Utc::now())?;
    debug!("exported workbook {} to {}", workbook.0, path.display());
    Ok(())
}

/// Replaces the target workbook's content with a document's.
///
/// The surviving worksheet is the first in tab order (created fresh if
/// the workbook somehow has none); templates come back under fresh ids
/// with cell references remapped, dangling references dropped with a
/// warning. Returns the open session over the imported grid.
pub fn import_workbook<'a>(
    store: &'a Store,
    workbook: WorkbookId,
    path: &Path,
) -> Result<GridSession<'a>> {
    check_extension(path)?;
    let text = fs::read_to_string(path)?;
    // The whole document parses before anything is deleted.
    let document: Document = serde_json::from_str(&text)?;
    store.workbook(workbook)?;

    store.begin_batch()?;
    let (mut session, assigned) = match apply_document(store, workbook, &document) {
        Ok(applied) => applied,
        Err(err) => {
            let _ = store.rollback_batch();
            return Err(err);
        }
    };
    if let Err(err) = store.commit_batch() {
        let _ = store.rollback_batch();
        return Err(err.into());
    }
    // The cells in the session adopt their storage ids only now that the
    // replace actually committed.
    session.adopt_ids(assigned)?;
    debug!(
        "imported {} cells and {} templates into workbook {}",
        document.cells.len(),
        document.templates.len(),
        workbook.0
    );
    Ok(session)
}

fn apply_document<'a>(
    store: &'a Store,
    workbook: WorkbookId,
    document: &Document,
) -> Result<(GridSession<'a>, Vec<(usize, usize, CellId)>)> {
    store.delete_all_cells(workbook)?;
    store.delete_all_templates(workbook)?;

    let target = match store.first_worksheet(workbook)? {
        Some(sheet) => sheet,
        None => store.add_worksheet(workbook, None, DEFAULT_ROWS, DEFAULT_COLS)?,
    };
    store.delete_other_worksheets(workbook, target.id)?;

    let size = document.grid_size.unwrap_or(GridSizeDoc {
        rows: DEFAULT_ROWS,
        columns: DEFAULT_COLS,
    });
    store.set_dimensions(target.id, size.rows, size.columns, Utc::now())?;

    let mut ids: HashMap<i64, _> = HashMap::new();
    for doc in &document.templates {
        let inserted = store.insert_template(
            workbook,
            &NewTemplate {
                name: doc.name.clone(),
                bold: doc.bold,
                italic: doc.italic,
                underline: doc.underline,
                background: doc.background.clone(),
                foreground: doc.foreground.clone(),
                font_family: doc.font_family.clone(),
                font_size: doc.font_size,
            },
        )?;
        ids.insert(doc.id, inserted.id);
    }

    let mut session = GridSession::open(store, target.id)?;
    for doc in &document.cells {
        // Out-of-range positions grow the grid one row/column at a time.
        if doc.row >= session.grid().rows || doc.column >= session.grid().cols {
            warn!(
                "cell ({}, {}) lies outside the {}x{} grid; growing",
                doc.row,
                doc.column,
                session.grid().rows,
                session.grid().cols
            );
        }
        while doc.row >= session.grid().rows {
            session.add_row();
        }
        while doc.column >= session.grid().cols {
            session.add_col();
        }

        let template = match doc.template {
            Some(old) => match ids.get(&old) {
                Some(new) => Some(*new),
                None => {
                    warn!(
                        "cell ({}, {}) references unknown template {}; dropping the reference",
                        doc.row, doc.column, old
                    );
                    None
                }
            },
            None => None,
        };

        session.grid_mut().insert_loaded(
            doc.row,
            doc.column,
            GridCell {
                value: doc.value.clone(),
                style: CellStyle {
                    bold: doc.bold,
                    italic: doc.italic,
                    underline: doc.underline,
                    background: doc.background.clone(),
                    foreground: doc.foreground.clone(),
                },
                template,
                persisted: None,
            },
        );
    }

    let assigned = session.commit_in_batch()?;
    Ok((session, assigned))
}

fn template_to_doc(template: &FormatTemplate) -> TemplateDoc {
    TemplateDoc {
        id: template.id.0,
        name: template.name.clone(),
        bold: template.bold,
        italic: template.italic,
        underline: template.underline,
        background: template.background.clone(),
        foreground: template.foreground.clone(),
        font_family: template.font_family.clone(),
        font_size: template.font_size,
    }
}

fn cell_to_doc(cell: &Cell) -> CellDoc {
    CellDoc {
        row: cell.row,
        column: cell.col,
        value: cell.value.clone(),
        bold: cell.style.bold,
        italic: cell.style.italic,
        underline: cell.style.underline,
        background: cell.style.background.clone(),
        foreground: cell.style.foreground.clone(),
        template: cell.template.map(|t| t.0),
    }
}
