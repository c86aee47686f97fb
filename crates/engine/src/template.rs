use serde::{Deserialize, Serialize};

use crate::cell::CellStyle;
use crate::workbook::WorkbookId;

/// Font used when a template does not specify one.
pub const DEFAULT_FONT_FAMILY: &str = "default";
/// Font size used when a template does not specify one.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Identifier of a persisted format template. Assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub i64);

/// A named, reusable style bundle owned by a workbook.
///
/// Cells reference templates by id; deleting a template nulls those
/// references rather than deleting the cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatTemplate {
    pub id: TemplateId,
    pub workbook: WorkbookId,
    pub name: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub background: String,
    pub foreground: String,
    pub font_family: String,
    pub font_size: f64,
}

impl FormatTemplate {
    /// The cell style this template applies.
    pub fn style(&self) -> CellStyle {
        CellStyle {
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            background: self.background.clone(),
            foreground: self.foreground.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_style_carries_all_attributes() {
        let template = FormatTemplate {
            id: TemplateId(1),
            workbook: WorkbookId(1),
            name: "Header Style".to_string(),
            bold: true,
            italic: false,
            underline: false,
            background: "#4472C4".to_string(),
            foreground: "#FFFFFF".to_string(),
            font_family: "Segoe UI".to_string(),
            font_size: 12.0,
        };
        let style = template.style();
        assert!(style.bold);
        assert!(!style.italic);
        assert_eq!(style.background, "#4472C4");
        assert_eq!(style.foreground, "#FFFFFF");
    }
}
