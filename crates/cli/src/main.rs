// DoWell CLI - headless workbook operations

mod exit_codes;
mod grid_render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use dowell_config::Settings;
use dowell_engine::cell::CellStyle;
use dowell_engine::error::Error as GridError;
use dowell_engine::find::FindCursor;
use dowell_engine::grid::Grid;
use dowell_engine::palette::{resolve_color, PALETTE};
use dowell_engine::refs::{cell_reference, parse_reference};
use dowell_engine::template::FormatTemplate;
use dowell_engine::workbook::WorkbookId;
use dowell_engine::worksheet::Worksheet;
use dowell_io::codec::{export_workbook, import_workbook};
use dowell_io::error::Error as IoError;
use dowell_store::error::Error as StoreError;
use dowell_store::session::GridSession;
use dowell_store::store::{NewTemplate, Store};

use exit_codes::{EXIT_ERROR, EXIT_INVARIANT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "dowell")]
#[command(about = "DoWell workbook editor (headless)")]
#[command(version)]
struct Cli {
    /// Database file (defaults to the configured path)
    #[arg(long, global = true, env = "DOWELL_DB", value_name = "PATH")]
    db: Option<PathBuf>,

    /// Workbook to operate on
    #[arg(long, short = 'w', global = true, default_value_t = 1, value_name = "ID")]
    workbook: i64,

    /// Worksheet name (defaults to the first tab)
    #[arg(long, short = 's', global = true, value_name = "NAME")]
    sheet: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database, with sample content, if it does not exist
    Init,

    /// Manage workbooks
    Workbooks {
        #[command(subcommand)]
        command: WorkbookCommands,
    },

    /// Manage worksheets of the selected workbook
    Sheets {
        #[command(subcommand)]
        command: SheetCommands,
    },

    /// Print the selected worksheet as a table
    Show,

    /// Set a cell's value
    #[command(after_help = "\
Examples:
  dowell set B3 'Quarterly Total'
  dowell set A1 Product --sheet Sheet2
  dowell set C2 15 --db inventory.db")]
    Set {
        /// Cell reference (A1 style)
        reference: String,

        /// New value
        value: String,
    },

    /// Print a cell's value
    Get {
        /// Cell reference (A1 style)
        reference: String,
    },

    /// Clear a cell's value and formatting
    Clear {
        /// Cell reference (A1 style)
        reference: String,
    },

    /// Inspect or change a cell's formatting
    #[command(after_help = "\
With no options the cell's current formatting is printed.

Examples:
  dowell style B3
  dowell style B3 --bold
  dowell style B3 --bg yellow --fg '#000080'
  dowell style B3 --template 'Header Style'
  dowell style B3 --detach")]
    Style {
        /// Cell reference (A1 style)
        reference: String,

        /// Toggle bold
        #[arg(long)]
        bold: bool,

        /// Toggle italic
        #[arg(long)]
        italic: bool,

        /// Toggle underline
        #[arg(long)]
        underline: bool,

        /// Background color (palette name or #RRGGBB)
        #[arg(long, value_name = "COLOR")]
        bg: Option<String>,

        /// Text color (palette name or #RRGGBB)
        #[arg(long, value_name = "COLOR")]
        fg: Option<String>,

        /// Apply a format template by name
        #[arg(long, value_name = "NAME")]
        template: Option<String>,

        /// Detach the cell's template, keeping its current colors
        #[arg(long, conflicts_with = "template")]
        detach: bool,
    },

    /// Append a row to the grid
    AddRow,

    /// Remove the last grid row and its cells
    RemoveRow,

    /// Append a column to the grid
    AddCol,

    /// Remove the last grid column and its cells
    RemoveCol,

    /// Search cell values for a substring
    #[command(after_help = "\
Examples:
  dowell find Laptop
  dowell find laptop --match-case
  dowell find 99 --all")]
    Find {
        /// Text to look for
        query: String,

        /// Case-sensitive comparison
        #[arg(long)]
        match_case: bool,

        /// Print every match instead of the first
        #[arg(long)]
        all: bool,
    },

    /// Write the selected worksheet to a .dwl/.json document
    #[command(after_help = "\
Examples:
  dowell export backup.dwl
  dowell export snapshot.json --sheet Sheet2")]
    Export {
        /// Output file (.dwl or .json)
        file: PathBuf,
    },

    /// Replace the workbook's content from a document
    #[command(after_help = "\
Import is destructive: the workbook keeps its first worksheet and loses
everything else before the document's cells and templates are loaded.

Examples:
  dowell import backup.dwl
  dowell import shared-grid.json --workbook 2")]
    Import {
        /// Input file (.dwl or .json)
        file: PathBuf,
    },

    /// Manage format templates
    #[command(after_help = "\
Examples:
  dowell templates list
  dowell templates create Totals --from B10
  dowell templates delete Totals")]
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// List the color palette accepted by --bg and --fg
    Palette,

    /// Manage workbook sharing
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum WorkbookCommands {
    /// List workbooks
    List,
    /// Create a workbook (the author comes from settings)
    Add { name: String },
    /// Rename a workbook
    Rename { id: i64, name: String },
    /// Delete a workbook and everything in it
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum SheetCommands {
    /// List the workbook's worksheets in tab order
    List,
    /// Add a worksheet (dimensions come from settings)
    Add { name: Option<String> },
    /// Rename the selected worksheet
    Rename { name: String },
    /// Delete the selected worksheet and its cells
    Remove,
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List the workbook's templates
    List,
    /// Create a template, optionally capturing a cell's formatting
    Create {
        name: String,

        /// Cell whose formatting to capture
        #[arg(long, value_name = "REF")]
        from: Option<String>,
    },
    /// Delete a template, detaching it from any cells
    Delete { name: String },
}

#[derive(Subcommand)]
enum ShareCommands {
    /// List who the workbook is shared with
    List,
    /// Share the workbook with a user
    Add {
        username: String,

        /// Allow the user to edit
        #[arg(long)]
        edit: bool,
    },
    /// Revoke a user's access
    Remove { username: String },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List users
    List,
    /// Register a user
    Add { username: String, email: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        db,
        workbook,
        sheet,
        command,
    } = cli;

    let command = match command {
        Some(command) => command,
        None => {
            eprintln!("Usage: dowell <command> [options]");
            eprintln!("       dowell --help for more information");
            return Ok(());
        }
    };

    let settings = Settings::load();
    let db_path = db.unwrap_or_else(|| settings.database_path());
    let workbook = WorkbookId(workbook);
    let store = open_store(&db_path)?;

    match command {
        Commands::Init => cmd_init(&store, &db_path),
        Commands::Workbooks { command } => match command {
            WorkbookCommands::List => cmd_workbooks_list(&store),
            WorkbookCommands::Add { name } => cmd_workbooks_add(&store, &settings, &name),
            WorkbookCommands::Rename { id, name } => {
                cmd_workbooks_rename(&store, WorkbookId(id), &name)
            }
            WorkbookCommands::Remove { id } => cmd_workbooks_remove(&store, WorkbookId(id)),
        },
        Commands::Sheets { command } => match command {
            SheetCommands::List => cmd_sheets_list(&store, workbook),
            SheetCommands::Add { name } => {
                cmd_sheets_add(&store, workbook, name.as_deref(), &settings)
            }
            SheetCommands::Rename { name } => cmd_sheets_rename(&store, workbook, &sheet, &name),
            SheetCommands::Remove => cmd_sheets_remove(&store, workbook, &sheet),
        },
        Commands::Show => cmd_show(&store, workbook, &sheet),
        Commands::Set { reference, value } => cmd_set(&store, workbook, &sheet, &reference, &value),
        Commands::Get { reference } => cmd_get(&store, workbook, &sheet, &reference),
        Commands::Clear { reference } => cmd_clear(&store, workbook, &sheet, &reference),
        Commands::Style {
            reference,
            bold,
            italic,
            underline,
            bg,
            fg,
            template,
            detach,
        } => cmd_style(
            &store,
            workbook,
            &sheet,
            &reference,
            StyleArgs {
                bold,
                italic,
                underline,
                bg,
                fg,
                template,
                detach,
            },
        ),
        Commands::AddRow => cmd_add_row(&store, workbook, &sheet),
        Commands::RemoveRow => cmd_remove_row(&store, workbook, &sheet),
        Commands::AddCol => cmd_add_col(&store, workbook, &sheet),
        Commands::RemoveCol => cmd_remove_col(&store, workbook, &sheet),
        Commands::Find {
            query,
            match_case,
            all,
        } => cmd_find(
            &store,
            workbook,
            &sheet,
            &query,
            match_case || settings.match_case,
            all,
        ),
        Commands::Export { file } => cmd_export(&store, workbook, &sheet, &file),
        Commands::Import { file } => cmd_import(&store, workbook, &file),
        Commands::Templates { command } => match command {
            TemplateCommands::List => cmd_templates_list(&store, workbook),
            TemplateCommands::Create { name, from } => {
                cmd_templates_create(&store, workbook, &sheet, &name, from.as_deref())
            }
            TemplateCommands::Delete { name } => cmd_templates_delete(&store, workbook, &name),
        },
        Commands::Palette => cmd_palette(),
        Commands::Share { command } => match command {
            ShareCommands::List => cmd_share_list(&store, workbook),
            ShareCommands::Add { username, edit } => {
                cmd_share_add(&store, workbook, &username, edit)
            }
            ShareCommands::Remove { username } => cmd_share_remove(&store, workbook, &username),
        },
        Commands::Users { command } => match command {
            UserCommands::List => cmd_users_list(&store),
            UserCommands::Add { username, email } => cmd_users_add(&store, &username, &email),
        },
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            code: exit_codes::EXIT_NOT_FOUND,
            message: msg.into(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self {
            code: exit_codes::store_exit_code(&err),
            message: err.to_string(),
            hint: None,
        }
    }
}

impl From<GridError> for CliError {
    fn from(err: GridError) -> Self {
        Self {
            code: exit_codes::grid_exit_code(&err),
            message: err.to_string(),
            hint: None,
        }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let hint = match &err {
            IoError::UnknownExtension(_) => {
                Some("interchange files end in .dwl or .json".to_string())
            }
            _ => None,
        };
        Self {
            code: exit_codes::io_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn open_store(path: &Path) -> Result<Store, CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                CliError::general(format!("cannot create {}: {}", parent.display(), err))
            })?;
        }
    }
    Ok(Store::open(path)?)
}

fn select_worksheet(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
) -> Result<Worksheet, CliError> {
    match sheet {
        Some(name) => store
            .worksheets_of(workbook)?
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CliError::not_found(format!("no worksheet named '{}'", name))),
        None => store
            .first_worksheet(workbook)?
            .ok_or_else(|| CliError::not_found(format!("workbook {} has no worksheets", workbook.0))),
    }
}

fn open_session<'a>(
    store: &'a Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
) -> Result<GridSession<'a>, CliError> {
    let worksheet = select_worksheet(store, workbook, sheet)?;
    Ok(GridSession::open(store, worksheet.id)?)
}

fn parse_ref(reference: &str) -> Result<(usize, usize), CliError> {
    parse_reference(reference).ok_or_else(|| {
        CliError::usage(format!("'{}' is not a cell reference", reference))
            .with_hint("references look like A1, B3 or AA10")
    })
}

fn check_position(grid: &Grid, row: usize, col: usize) -> Result<(), CliError> {
    if row >= grid.rows || col >= grid.cols {
        return Err(CliError {
            code: EXIT_INVARIANT,
            message: format!(
                "{} is outside the {}x{} grid",
                cell_reference(row, col),
                grid.rows,
                grid.cols
            ),
            hint: None,
        });
    }
    Ok(())
}

fn find_template_by_name(
    store: &Store,
    workbook: WorkbookId,
    name: &str,
) -> Result<FormatTemplate, CliError> {
    store
        .templates_of(workbook)?
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            CliError::not_found(format!("no template named '{}'", name))
                .with_hint("run 'dowell templates list'")
        })
}

fn resolve_color_arg(input: &str) -> Result<String, CliError> {
    resolve_color(input).ok_or_else(|| {
        CliError::usage(format!("'{}' is not a palette color or #RRGGBB value", input))
            .with_hint("run 'dowell palette' for the color list")
    })
}

fn style_flags(bold: bool, italic: bool, underline: bool) -> String {
    format!(
        "{}{}{}",
        if bold { 'B' } else { '-' },
        if italic { 'I' } else { '-' },
        if underline { 'U' } else { '-' },
    )
}

// ============================================================================
// init
// ============================================================================

fn cmd_init(store: &Store, path: &Path) -> Result<(), CliError> {
    let workbooks = store.list_workbooks()?;
    println!(
        "Database ready at {} ({} workbook{})",
        path.display(),
        workbooks.len(),
        if workbooks.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

// ============================================================================
// workbooks
// ============================================================================

fn cmd_workbooks_list(store: &Store) -> Result<(), CliError> {
    for workbook in store.list_workbooks()? {
        println!(
            "{:>4}  {:<24}  {:<16}  saved {}",
            workbook.id.0,
            workbook.name,
            workbook.author,
            workbook.last_saved.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn cmd_workbooks_add(store: &Store, settings: &Settings, name: &str) -> Result<(), CliError> {
    let workbook = store.create_workbook(name, &settings.author)?;
    println!("Created workbook '{}' (id {})", workbook.name, workbook.id.0);
    Ok(())
}

fn cmd_workbooks_rename(store: &Store, id: WorkbookId, name: &str) -> Result<(), CliError> {
    store.rename_workbook(id, name)?;
    println!("Renamed workbook {} to '{}'", id.0, name);
    Ok(())
}

fn cmd_workbooks_remove(store: &Store, id: WorkbookId) -> Result<(), CliError> {
    let workbook = store.workbook(id)?;
    store.delete_workbook(id)?;
    println!("Deleted workbook '{}'", workbook.name);
    Ok(())
}

// ============================================================================
// sheets
// ============================================================================

fn cmd_sheets_list(store: &Store, workbook: WorkbookId) -> Result<(), CliError> {
    for sheet in store.worksheets_of(workbook)? {
        println!(
            "{:>4}  {:<20}  {}x{}",
            sheet.tab_order, sheet.name, sheet.rows, sheet.cols
        );
    }
    Ok(())
}

fn cmd_sheets_add(
    store: &Store,
    workbook: WorkbookId,
    name: Option<&str>,
    settings: &Settings,
) -> Result<(), CliError> {
    let sheet = store.add_worksheet(
        workbook,
        name,
        settings.default_rows,
        settings.default_columns,
    )?;
    println!("Added worksheet '{}' ({}x{})", sheet.name, sheet.rows, sheet.cols);
    Ok(())
}

fn cmd_sheets_rename(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
    name: &str,
) -> Result<(), CliError> {
    let target = select_worksheet(store, workbook, sheet)?;
    store.rename_worksheet(target.id, name)?;
    println!("Renamed worksheet '{}' to '{}'", target.name, name);
    Ok(())
}

fn cmd_sheets_remove(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
) -> Result<(), CliError> {
    let target = select_worksheet(store, workbook, sheet)?;
    store.delete_worksheet(target.id)?;
    println!("Removed worksheet '{}'", target.name);
    Ok(())
}

// ============================================================================
// cells
// ============================================================================

fn cmd_show(store: &Store, workbook: WorkbookId, sheet: &Option<String>) -> Result<(), CliError> {
    let session = open_session(store, workbook, sheet)?;
    println!(
        "{} ({}x{})",
        session.worksheet().name,
        session.grid().rows,
        session.grid().cols
    );
    print!("{}", grid_render::render(session.grid()));
    Ok(())
}

fn cmd_set(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
    reference: &str,
    value: &str,
) -> Result<(), CliError> {
    let mut session = open_session(store, workbook, sheet)?;
    let (row, col) = parse_ref(reference)?;
    session.grid_mut().set_value(row, col, value)?;
    session.commit()?;
    println!("{} = {}", cell_reference(row, col), value);
    Ok(())
}

fn cmd_get(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
    reference: &str,
) -> Result<(), CliError> {
    let session = open_session(store, workbook, sheet)?;
    let (row, col) = parse_ref(reference)?;
    check_position(session.grid(), row, col)?;
    println!("{}", session.grid().value(row, col));
    Ok(())
}

fn cmd_clear(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
    reference: &str,
) -> Result<(), CliError> {
    let mut session = open_session(store, workbook, sheet)?;
    let (row, col) = parse_ref(reference)?;
    session.grid_mut().clear_cell(row, col)?;
    session.commit()?;
    println!("Cleared {}", cell_reference(row, col));
    Ok(())
}

struct StyleArgs {
    bold: bool,
    italic: bool,
    underline: bool,
    bg: Option<String>,
    fg: Option<String>,
    template: Option<String>,
    detach: bool,
}

impl StyleArgs {
    fn changes_nothing(&self) -> bool {
        !self.bold
            && !self.italic
            && !self.underline
            && self.bg.is_none()
            && self.fg.is_none()
            && self.template.is_none()
            && !self.detach
    }
}

fn cmd_style(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
    reference: &str,
    args: StyleArgs,
) -> Result<(), CliError> {
    let mut session = open_session(store, workbook, sheet)?;
    let (row, col) = parse_ref(reference)?;

    if args.changes_nothing() {
        check_position(session.grid(), row, col)?;
        let cell = session.grid().cell(row, col);
        let template = match cell.template {
            Some(id) => store.template(id)?.name,
            None => "none".to_string(),
        };
        println!(
            "{}: {}  bg {}  fg {}  template {}",
            cell_reference(row, col),
            style_flags(cell.style.bold, cell.style.italic, cell.style.underline),
            cell.style.background,
            cell.style.foreground,
            template
        );
        return Ok(());
    }

    if let Some(name) = &args.template {
        let template = find_template_by_name(store, workbook, name)?;
        session.grid_mut().apply_template(row, col, &template)?;
    }
    if args.bold {
        session.grid_mut().toggle_bold(row, col)?;
    }
    if args.italic {
        session.grid_mut().toggle_italic(row, col)?;
    }
    if args.underline {
        session.grid_mut().toggle_underline(row, col)?;
    }
    if let Some(input) = &args.bg {
        let color = resolve_color_arg(input)?;
        session.grid_mut().set_background(row, col, &color)?;
    }
    if let Some(input) = &args.fg {
        let color = resolve_color_arg(input)?;
        session.grid_mut().set_foreground(row, col, &color)?;
    }
    if args.detach {
        session.grid_mut().detach_template(row, col)?;
    }

    session.commit()?;
    println!("Styled {}", cell_reference(row, col));
    Ok(())
}

// ============================================================================
// structure
// ============================================================================

fn cmd_add_row(store: &Store, workbook: WorkbookId, sheet: &Option<String>) -> Result<(), CliError> {
    let mut session = open_session(store, workbook, sheet)?;
    session.add_row();
    session.commit()?;
    println!("Grid is now {}x{}", session.grid().rows, session.grid().cols);
    Ok(())
}

fn cmd_remove_row(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
) -> Result<(), CliError> {
    let mut session = open_session(store, workbook, sheet)?;
    session.remove_row()?;
    session.commit()?;
    println!("Grid is now {}x{}", session.grid().rows, session.grid().cols);
    Ok(())
}

fn cmd_add_col(store: &Store, workbook: WorkbookId, sheet: &Option<String>) -> Result<(), CliError> {
    let mut session = open_session(store, workbook, sheet)?;
    session.add_col();
    session.commit()?;
    println!("Grid is now {}x{}", session.grid().rows, session.grid().cols);
    Ok(())
}

fn cmd_remove_col(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
) -> Result<(), CliError> {
    let mut session = open_session(store, workbook, sheet)?;
    session.remove_col()?;
    session.commit()?;
    println!("Grid is now {}x{}", session.grid().rows, session.grid().cols);
    Ok(())
}

// ============================================================================
// find
// ============================================================================

fn cmd_find(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
    query: &str,
    match_case: bool,
    all: bool,
) -> Result<(), CliError> {
    if query.is_empty() {
        return Err(CliError::usage("the search text is empty"));
    }
    let session = open_session(store, workbook, sheet)?;
    let mut cursor = FindCursor::new();
    let mut matches = Vec::new();

    while let Some(position) = cursor.find_next(session.grid(), query, match_case) {
        matches.push(position);
        if !all {
            break;
        }
    }

    if matches.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for (row, col) in matches {
        println!(
            "{:<6}  {}",
            cell_reference(row, col),
            session.grid().value(row, col)
        );
    }
    Ok(())
}

// ============================================================================
// interchange
// ============================================================================

fn cmd_export(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
    file: &Path,
) -> Result<(), CliError> {
    let target = select_worksheet(store, workbook, sheet)?;
    let cells = store.cells_of(target.id)?.len();
    export_workbook(store, workbook, target.id, file)?;
    println!("Exported {} cells to {}", cells, file.display());
    Ok(())
}

fn cmd_import(store: &Store, workbook: WorkbookId, file: &Path) -> Result<(), CliError> {
    let session = import_workbook(store, workbook, file)?;
    println!(
        "Imported {}: '{}' is {}x{} ({} cells)",
        file.display(),
        session.worksheet().name,
        session.grid().rows,
        session.grid().cols,
        session.grid().occupied()
    );
    Ok(())
}

// ============================================================================
// templates and palette
// ============================================================================

fn cmd_templates_list(store: &Store, workbook: WorkbookId) -> Result<(), CliError> {
    for template in store.templates_of(workbook)? {
        println!(
            "{:>4}  {:<20}  {}  bg {}  fg {}  {} {}",
            template.id.0,
            template.name,
            style_flags(template.bold, template.italic, template.underline),
            template.background,
            template.foreground,
            template.font_family,
            template.font_size
        );
    }
    Ok(())
}

fn cmd_templates_create(
    store: &Store,
    workbook: WorkbookId,
    sheet: &Option<String>,
    name: &str,
    from: Option<&str>,
) -> Result<(), CliError> {
    let style = match from {
        Some(reference) => {
            let session = open_session(store, workbook, sheet)?;
            let (row, col) = parse_ref(reference)?;
            check_position(session.grid(), row, col)?;
            session.grid().cell(row, col).style
        }
        None => CellStyle::default(),
    };
    let template = store.insert_template(workbook, &NewTemplate::from_style(name, &style))?;
    println!("Created template '{}' (id {})", template.name, template.id.0);
    Ok(())
}

fn cmd_templates_delete(store: &Store, workbook: WorkbookId, name: &str) -> Result<(), CliError> {
    let template = find_template_by_name(store, workbook, name)?;
    store.delete_template(template.id)?;
    println!("Deleted template '{}'", template.name);
    Ok(())
}

fn cmd_palette() -> Result<(), CliError> {
    for color in PALETTE {
        println!("{:<12}  {}", color.name, color.hex);
    }
    Ok(())
}

// ============================================================================
// sharing and users
// ============================================================================

fn cmd_share_list(store: &Store, workbook: WorkbookId) -> Result<(), CliError> {
    for (share, username) in store.shares_of(workbook)? {
        println!(
            "{:<16}  {:<9}  since {}",
            username,
            if share.can_edit { "can edit" } else { "read only" },
            share.shared.format("%Y-%m-%d")
        );
    }
    Ok(())
}

fn cmd_share_add(
    store: &Store,
    workbook: WorkbookId,
    username: &str,
    edit: bool,
) -> Result<(), CliError> {
    let user = store.user_by_name(username)?;
    let share = store.share_workbook(user.id, workbook, edit)?;
    println!(
        "Shared with {} ({})",
        username,
        if share.can_edit { "can edit" } else { "read only" }
    );
    Ok(())
}

fn cmd_share_remove(store: &Store, workbook: WorkbookId, username: &str) -> Result<(), CliError> {
    let user = store.user_by_name(username)?;
    store.unshare_workbook(user.id, workbook)?;
    println!("Unshared {}", username);
    Ok(())
}

fn cmd_users_list(store: &Store) -> Result<(), CliError> {
    for user in store.list_users()? {
        println!("{:>4}  {:<16}  {}", user.id.0, user.username, user.email);
    }
    Ok(())
}

fn cmd_users_add(store: &Store, username: &str, email: &str) -> Result<(), CliError> {
    let user = store.create_user(username, email)?;
    println!("Created user {} (id {})", user.username, user.id.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::{EXIT_NOT_FOUND, EXIT_USAGE};
    use dowell_engine::worksheet::WorksheetId;

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn test_open_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dowell.db");
        let store = open_store(&path).unwrap();
        assert_eq!(store.list_workbooks().unwrap().len(), 1);
        assert!(path.exists());
    }

    #[test]
    fn test_select_worksheet_defaults_to_first_tab() {
        let store = store();
        let sheet = select_worksheet(&store, WorkbookId(1), &None).unwrap();
        assert_eq!(sheet.name, "Sheet1");
    }

    #[test]
    fn test_select_worksheet_by_name_ignores_case() {
        let store = store();
        let sheet = select_worksheet(&store, WorkbookId(1), &Some("sheet2".to_string())).unwrap();
        assert_eq!(sheet.name, "Sheet2");
    }

    #[test]
    fn test_select_worksheet_unknown_name() {
        let store = store();
        let err = select_worksheet(&store, WorkbookId(1), &Some("Nope".to_string())).unwrap_err();
        assert_eq!(err.code, EXIT_NOT_FOUND);
    }

    #[test]
    fn test_parse_ref_rejects_garbage() {
        assert_eq!(parse_ref("B3").unwrap(), (2, 1));
        assert_eq!(parse_ref("zz").unwrap_err().code, EXIT_USAGE);
    }

    #[test]
    fn test_set_then_reopen_sees_the_value() {
        let store = store();
        cmd_set(&store, WorkbookId(1), &None, "B2", "42").unwrap();
        let session = open_session(&store, WorkbookId(1), &None).unwrap();
        assert_eq!(session.grid().value(1, 1), "42");
    }

    #[test]
    fn test_clear_empties_a_seeded_cell() {
        let store = store();
        cmd_clear(&store, WorkbookId(1), &None, "A1").unwrap();
        let session = open_session(&store, WorkbookId(1), &None).unwrap();
        assert_eq!(session.grid().value(0, 0), "");
        assert!(!session.grid().cell(0, 0).style.bold);
    }

    #[test]
    fn test_style_toggles_and_colors_persist() {
        let store = store();
        cmd_style(
            &store,
            WorkbookId(1),
            &None,
            "D4",
            StyleArgs {
                bold: true,
                italic: false,
                underline: false,
                bg: Some("yellow".to_string()),
                fg: None,
                template: None,
                detach: false,
            },
        )
        .unwrap();

        let session = open_session(&store, WorkbookId(1), &None).unwrap();
        let cell = session.grid().cell(3, 3);
        assert!(cell.style.bold);
        assert_eq!(cell.style.background, "#FFFF00");
    }

    #[test]
    fn test_style_unknown_color_commits_nothing() {
        let store = store();
        let err = cmd_style(
            &store,
            WorkbookId(1),
            &None,
            "D4",
            StyleArgs {
                bold: true,
                italic: false,
                underline: false,
                bg: Some("chartreuse".to_string()),
                fg: None,
                template: None,
                detach: false,
            },
        )
        .unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);

        let session = open_session(&store, WorkbookId(1), &None).unwrap();
        assert!(!session.grid().cell(3, 3).style.bold);
    }

    #[test]
    fn test_style_applies_template_by_name() {
        let store = store();
        cmd_style(
            &store,
            WorkbookId(1),
            &None,
            "C5",
            StyleArgs {
                bold: false,
                italic: false,
                underline: false,
                bg: None,
                fg: None,
                template: Some("header style".to_string()),
                detach: false,
            },
        )
        .unwrap();

        let session = open_session(&store, WorkbookId(1), &None).unwrap();
        let cell = session.grid().cell(4, 2);
        assert!(cell.style.bold);
        assert_eq!(cell.style.background, "#4472C4");
        assert!(cell.template.is_some());
    }

    #[test]
    fn test_style_detach_drops_template_keeps_style() {
        let store = store();
        // A1 comes seeded with a template reference and a bold header style.
        cmd_style(
            &store,
            WorkbookId(1),
            &None,
            "A1",
            StyleArgs {
                bold: false,
                italic: false,
                underline: false,
                bg: None,
                fg: None,
                template: None,
                detach: true,
            },
        )
        .unwrap();

        let session = open_session(&store, WorkbookId(1), &None).unwrap();
        let cell = session.grid().cell(0, 0);
        assert!(cell.template.is_none());
        assert!(cell.style.bold);
        assert_eq!(cell.style.background, "#4472C4");
    }

    #[test]
    fn test_find_rejects_empty_query() {
        let store = store();
        let err = cmd_find(&store, WorkbookId(1), &None, "", false, false).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
    }

    #[test]
    fn test_remove_row_persists_dimensions() {
        let store = store();
        cmd_remove_row(&store, WorkbookId(1), &None).unwrap();
        assert_eq!(store.worksheet(WorksheetId(1)).unwrap().rows, 9);
    }

    #[test]
    fn test_template_created_from_cell_then_deleted() {
        let store = store();
        cmd_templates_create(&store, WorkbookId(1), &None, "Captured", Some("A1")).unwrap();

        let created = find_template_by_name(&store, WorkbookId(1), "captured").unwrap();
        assert!(created.bold);
        assert_eq!(created.background, "#4472C4");

        cmd_templates_delete(&store, WorkbookId(1), "Captured").unwrap();
        let err = find_template_by_name(&store, WorkbookId(1), "Captured").unwrap_err();
        assert_eq!(err.code, EXIT_NOT_FOUND);
    }

    #[test]
    fn test_share_add_requires_known_user() {
        let store = store();
        let err = cmd_share_add(&store, WorkbookId(1), "ghost", true).unwrap_err();
        assert_eq!(err.code, EXIT_NOT_FOUND);
    }
}
