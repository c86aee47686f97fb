//! Serde types for the interchange document.
//!
//! Field names are the wire contract and never change casing; everything
//! except cell positions is optional on the way in, with the documented
//! defaults substituted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dowell_engine::cell::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use dowell_engine::template::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

/// One exported workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "Workbook", default)]
    pub workbook: Option<WorkbookMeta>,
    #[serde(rename = "FormatTemplates", default)]
    pub templates: Vec<TemplateDoc>,
    #[serde(rename = "Cells")]
    pub cells: Vec<CellDoc>,
    #[serde(rename = "GridSize", default)]
    pub grid_size: Option<GridSizeDoc>,
}

/// Workbook metadata. Informational on import: the target workbook keeps
/// its own identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookMeta {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Author", default)]
    pub author: String,
    #[serde(rename = "CreatedDate", default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "LastSavedDate", default)]
    pub last_saved: Option<DateTime<Utc>>,
}

/// A format template with its persisted id, which import discards in
/// favor of freshly assigned ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDoc {
    #[serde(rename = "FormatTemplateId", default)]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "IsBold", default)]
    pub bold: bool,
    #[serde(rename = "IsItalic", default)]
    pub italic: bool,
    #[serde(rename = "IsUnderline", default)]
    pub underline: bool,
    #[serde(rename = "BackgroundColor", default = "default_background")]
    pub background: String,
    #[serde(rename = "ForegroundColor", default = "default_foreground")]
    pub foreground: String,
    #[serde(rename = "FontFamily", default = "default_font_family")]
    pub font_family: String,
    #[serde(rename = "FontSize", default = "default_font_size")]
    pub font_size: f64,
}

/// One cell. Only the position is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellDoc {
    #[serde(rename = "Row")]
    pub row: usize,
    #[serde(rename = "Column")]
    pub column: usize,
    #[serde(rename = "Value", default)]
    pub value: String,
    #[serde(rename = "IsBold", default)]
    pub bold: bool,
    #[serde(rename = "IsItalic", default)]
    pub italic: bool,
    #[serde(rename = "IsUnderline", default)]
    pub underline: bool,
    #[serde(rename = "BackgroundColor", default = "default_background")]
    pub background: String,
    #[serde(rename = "ForegroundColor", default = "default_foreground")]
    pub foreground: String,
    #[serde(
        rename = "FormatTemplateId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub template: Option<i64>,
}

/// Dense dimensions of the exported grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridSizeDoc {
    #[serde(rename = "Rows")]
    pub rows: usize,
    #[serde(rename = "Columns")]
    pub columns: usize,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_foreground() -> String {
    DEFAULT_FOREGROUND.to_string()
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_cell_takes_defaults() {
        let doc: CellDoc = serde_json::from_str(r#"{"Row": 2, "Column": 3}"#).unwrap();
        assert_eq!(doc.row, 2);
        assert_eq!(doc.column, 3);
        assert_eq!(doc.value, "");
        assert!(!doc.bold);
        assert_eq!(doc.background, "#FFFFFF");
        assert_eq!(doc.foreground, "#000000");
        assert!(doc.template.is_none());
    }

    #[test]
    fn test_cell_without_position_is_rejected() {
        let result = serde_json::from_str::<CellDoc>(r#"{"Value": "orphan"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_sparse_template_takes_font_defaults() {
        let doc: TemplateDoc =
            serde_json::from_str(r#"{"Name": "Plain", "IsBold": true}"#).unwrap();
        assert!(doc.bold);
        assert_eq!(doc.font_family, "default");
        assert_eq!(doc.font_size, 11.0);
        assert_eq!(doc.id, 0);
    }

    #[test]
    fn test_document_requires_cells_field() {
        let result = serde_json::from_str::<Document>(r#"{"GridSize": {"Rows": 4, "Columns": 4}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_wire_field_names() {
        let doc = CellDoc {
            row: 0,
            column: 1,
            value: "x".to_string(),
            bold: true,
            italic: false,
            underline: false,
            background: "#FFFFFF".to_string(),
            foreground: "#000000".to_string(),
            template: None,
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"Row\":0"));
        assert!(json.contains("\"Column\":1"));
        assert!(json.contains("\"IsBold\":true"));
        // Absent template references stay off the wire entirely.
        assert!(!json.contains("FormatTemplateId"));
    }
}
