//! Plain-text grid rendering for terminal output.

use dowell_engine::grid::Grid;
use dowell_engine::refs::column_letters;

const MIN_WIDTH: usize = 8;
const MAX_WIDTH: usize = 20;

/// Render a grid as a column-lettered, row-numbered table.
pub fn render(grid: &Grid) -> String {
    let widths: Vec<usize> = (0..grid.cols).map(|col| column_width(grid, col)).collect();
    let label_width = grid.rows.to_string().len();
    let mut out = String::new();

    let mut header = " ".repeat(label_width);
    for (col, width) in widths.iter().enumerate() {
        header.push_str("  ");
        header.push_str(&pad(&column_letters(col), *width));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for row in 0..grid.rows {
        let mut line = format!("{:>width$}", row + 1, width = label_width);
        for (col, width) in widths.iter().enumerate() {
            line.push_str("  ");
            line.push_str(&pad(&grid.value(row, col), *width));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn column_width(grid: &Grid, col: usize) -> usize {
    let mut width = column_letters(col).len();
    for row in 0..grid.rows {
        width = width.max(grid.value(row, col).chars().count());
    }
    width.clamp(MIN_WIDTH, MAX_WIDTH)
}

fn pad(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        let mut grid = Grid::new(3, 2);
        grid.set_value(0, 0, "Product").unwrap();
        grid.set_value(0, 1, "Price").unwrap();
        grid.set_value(1, 0, "Laptop").unwrap();
        grid.set_value(1, 1, "999.99").unwrap();
        grid
    }

    #[test]
    fn test_header_and_row_labels() {
        let rendered = render(&sample_grid());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert!(lines[1].starts_with("1  Product"));
        assert!(lines[2].starts_with("2  Laptop"));
        assert!(lines[3].starts_with("3"));
    }

    #[test]
    fn test_columns_align() {
        let rendered = render(&sample_grid());
        let lines: Vec<&str> = rendered.lines().collect();
        let header_b = lines[0].find('B').unwrap();
        let price = lines[1].find("Price").unwrap();
        assert_eq!(header_b, price);
    }

    #[test]
    fn test_long_values_truncate() {
        let mut grid = Grid::new(1, 1);
        grid.set_value(0, 0, "a value much longer than the widest column")
            .unwrap();
        let rendered = render(&grid);
        let line = rendered.lines().nth(1).unwrap();
        assert!(line.contains("a value much longer"));
        assert!(!line.contains("widest"));
    }

    #[test]
    fn test_empty_grid_renders_labels_only() {
        let rendered = render(&Grid::new(2, 2));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(lines[1].trim(), "1");
        assert_eq!(lines[2].trim(), "2");
    }
}
