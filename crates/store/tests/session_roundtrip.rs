use tempfile::NamedTempFile;

use dowell_engine::workbook::WorkbookId;
use dowell_engine::worksheet::WorksheetId;
use dowell_store::session::GridSession;
use dowell_store::store::{NewTemplate, Store};

// -------------------------------------------------------------------------
// On-disk lifecycle
// -------------------------------------------------------------------------

#[test]
fn edits_survive_reopening_the_database_file() {
    let file = NamedTempFile::with_suffix(".db").unwrap();
    let path = file.path();

    {
        let store = Store::open(path).unwrap();
        let mut session = GridSession::open(&store, WorksheetId(1)).unwrap();
        session.grid_mut().set_value(3, 0, "Monitor").unwrap();
        session.grid_mut().set_value(3, 1, "349.00").unwrap();
        session.grid_mut().toggle_bold(3, 0).unwrap();
        session.add_row();
        session.commit().unwrap();
    }

    let store = Store::open(path).unwrap();
    let session = GridSession::open(&store, WorksheetId(1)).unwrap();
    assert_eq!(session.grid().rows, 11);
    assert_eq!(session.grid().value(3, 0), "Monitor");
    assert!(session.grid().cell(3, 0).style.bold);
    assert_eq!(session.grid().value(3, 1), "349.00");
    // The seeded content is still in place next to the new cells.
    assert_eq!(session.grid().value(0, 0), "Product");
    assert_eq!(store.cells_of(WorksheetId(1)).unwrap().len(), 11);
}

#[test]
fn reopening_does_not_reseed() {
    let file = NamedTempFile::with_suffix(".db").unwrap();
    let path = file.path();

    {
        Store::open(path).unwrap();
    }
    let store = Store::open(path).unwrap();

    assert_eq!(store.list_workbooks().unwrap().len(), 1);
    assert_eq!(store.cells_of(WorksheetId(1)).unwrap().len(), 9);
    assert_eq!(store.list_users().unwrap().len(), 3);
}

#[test]
fn structural_removal_is_visible_across_processes() {
    let file = NamedTempFile::with_suffix(".db").unwrap();
    let path = file.path();

    {
        let store = Store::open(path).unwrap();
        let mut session = GridSession::open(&store, WorksheetId(1)).unwrap();
        // Shrink until the Mouse row (row 2) falls off.
        for _ in 0..8 {
            session.remove_row().unwrap();
        }
        session.commit().unwrap();
    }

    let store = Store::open(path).unwrap();
    let session = GridSession::open(&store, WorksheetId(1)).unwrap();
    // Materialization floors at ten rows even though only two are stored.
    assert_eq!(session.grid().rows, 10);
    assert_eq!(session.worksheet().rows, 2);
    assert_eq!(store.cells_of(WorksheetId(1)).unwrap().len(), 6);
    assert_eq!(session.grid().value(2, 0), "");
}

#[test]
fn templates_round_trip_on_disk() {
    let file = NamedTempFile::with_suffix(".db").unwrap();
    let path = file.path();

    {
        let store = Store::open(path).unwrap();
        let style = {
            let session = GridSession::open(&store, WorksheetId(1)).unwrap();
            session.grid().cell(0, 0).style
        };
        store
            .insert_template(WorkbookId(1), &NewTemplate::from_style("Captured", &style))
            .unwrap();
    }

    let store = Store::open(path).unwrap();
    let templates = store.templates_of(WorkbookId(1)).unwrap();
    assert_eq!(templates.len(), 4);
    let captured = templates.iter().find(|t| t.name == "Captured").unwrap();
    assert!(captured.bold);
    assert_eq!(captured.background, "#4472C4");
    assert_eq!(captured.font_family, "default");
}

// -------------------------------------------------------------------------
// Two connections
// -------------------------------------------------------------------------

#[test]
fn commit_blocked_by_a_reader_rolls_back_and_retries() {
    let file = NamedTempFile::with_suffix(".db").unwrap();
    let store = Store::open(file.path()).unwrap();
    let blocker = Store::open(file.path()).unwrap();

    let mut session = GridSession::open(&store, WorksheetId(1)).unwrap();
    session.grid_mut().set_value(5, 5, "pending").unwrap();

    // A read transaction on a second connection lets every batched
    // statement through and fails the COMMIT itself.
    blocker.begin_batch().unwrap();
    blocker.cells_of(WorksheetId(1)).unwrap();

    assert!(session.commit().is_err());
    // The edit is still there and still unpersisted, so committing again
    // re-inserts it instead of updating a row that never existed.
    assert_eq!(session.grid().value(5, 5), "pending");
    assert!(session.grid().cell(5, 5).persisted.is_none());

    blocker.rollback_batch().unwrap();

    session.commit().unwrap();
    assert!(session.grid().cell(5, 5).persisted.is_some());
    let cells = store.cells_of(WorksheetId(1)).unwrap();
    assert_eq!(cells.len(), 10);
    assert!(cells
        .iter()
        .any(|c| c.row == 5 && c.col == 5 && c.value == "pending"));
}
