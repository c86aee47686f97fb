//! The fixed color palette offered by the editor's color pickers.

/// A palette entry: a human name and its `#RRGGBB` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub hex: &'static str,
}

/// The fifteen picker colors, in menu order.
pub const PALETTE: [NamedColor; 15] = [
    NamedColor { name: "White", hex: "#FFFFFF" },
    NamedColor { name: "Black", hex: "#000000" },
    NamedColor { name: "Red", hex: "#FF0000" },
    NamedColor { name: "Green", hex: "#00FF00" },
    NamedColor { name: "Blue", hex: "#0000FF" },
    NamedColor { name: "Yellow", hex: "#FFFF00" },
    NamedColor { name: "Orange", hex: "#FFA500" },
    NamedColor { name: "Purple", hex: "#800080" },
    NamedColor { name: "Gray", hex: "#808080" },
    NamedColor { name: "Light Blue", hex: "#ADD8E6" },
    NamedColor { name: "Light Green", hex: "#90EE90" },
    NamedColor { name: "Light Gray", hex: "#D3D3D3" },
    NamedColor { name: "Pink", hex: "#FFC0CB" },
    NamedColor { name: "Brown", hex: "#A52A2A" },
    NamedColor { name: "Navy", hex: "#000080" },
];

/// Look up a palette color by name, ignoring case and spaces
/// ("lightblue" and "Light Blue" both match).
pub fn color_by_name(name: &str) -> Option<NamedColor> {
    let key: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    PALETTE
        .iter()
        .find(|c| c.name.replace(' ', "").to_lowercase() == key)
        .copied()
}

/// Resolve user color input: a palette name or a literal `#RRGGBB` value.
pub fn resolve_color(input: &str) -> Option<String> {
    if let Some(color) = color_by_name(input) {
        return Some(color.hex.to_string());
    }
    let input = input.trim();
    let is_hex = input.len() == 7
        && input.starts_with('#')
        && input[1..].chars().all(|c| c.is_ascii_hexdigit());
    if is_hex {
        Some(input.to_uppercase())
    } else {
        None
    }
}
