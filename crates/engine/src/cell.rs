use serde::{Deserialize, Serialize};

use crate::template::TemplateId;
use crate::worksheet::WorksheetId;

/// Fill color of a cell with no styling applied.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";
/// Text color of a cell with no styling applied.
pub const DEFAULT_FOREGROUND: &str = "#000000";

/// Identifier of a persisted cell row. Assigned by the store, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub i64);

/// Style attributes carried by every cell.
///
/// Colors are 7-character `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub background: String,
    pub foreground: String,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            background: DEFAULT_BACKGROUND.to_string(),
            foreground: DEFAULT_FOREGROUND.to_string(),
        }
    }
}

impl CellStyle {
    /// True when every attribute still has its default value.
    pub fn is_default(&self) -> bool {
        !self.bold
            && !self.italic
            && !self.underline
            && self.background == DEFAULT_BACKGROUND
            && self.foreground == DEFAULT_FOREGROUND
    }
}

/// A persisted cell: one occupied position of a worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub worksheet: WorksheetId,
    pub row: usize,
    pub col: usize,
    pub value: String,
    pub style: CellStyle,
    pub template: Option<TemplateId>,
}

/// One position of the dense in-memory grid.
///
/// `persisted` carries the storage id when the cell was loaded from the
/// store; freshly edited positions hold `None` until the next commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub value: String,
    pub style: CellStyle,
    pub template: Option<TemplateId>,
    pub persisted: Option<CellId>,
}

impl GridCell {
    /// True when the cell carries nothing worth persisting: empty value,
    /// default style, no template reference.
    pub fn is_default(&self) -> bool {
        self.value.is_empty() && self.style.is_default() && self.template.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_default() {
        assert!(CellStyle::default().is_default());
    }

    #[test]
    fn test_any_attribute_makes_style_non_default() {
        let mut style = CellStyle::default();
        style.bold = true;
        assert!(!style.is_default());

        let mut style = CellStyle::default();
        style.background = "#FFFF00".to_string();
        assert!(!style.is_default());

        let mut style = CellStyle::default();
        style.foreground = "#0000FF".to_string();
        assert!(!style.is_default());
    }

    #[test]
    fn test_grid_cell_default_detection() {
        let cell = GridCell::default();
        assert!(cell.is_default());

        let mut cell = GridCell::default();
        cell.value = "42".to_string();
        assert!(!cell.is_default());

        let mut cell = GridCell::default();
        cell.template = Some(TemplateId(3));
        assert!(!cell.is_default());
    }

    #[test]
    fn test_persisted_id_does_not_affect_default() {
        // A stored cell edited back to empty is still "default shaped";
        // commit updates it in place instead of inserting a duplicate.
        let cell = GridCell {
            persisted: Some(CellId(12)),
            ..GridCell::default()
        };
        assert!(cell.is_default());
    }
}
