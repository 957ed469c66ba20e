use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned numeric cell.
pub fn value_cell(value: f64, precision: usize) -> Cell {
    Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right)
}

/// Creates a cell for a variance percentage with color coding. `None` is
/// shown as "-".
pub fn variance_cell(variance: Option<f64>) -> Cell {
    match variance {
        None => Cell::new("-")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        Some(v) => {
            let color = if v >= 0.0 { Color::Green } else { Color::Red };
            Cell::new(format!("{v:.2}%"))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }
    }
}

/// A separator line matching the terminal width.
pub fn separator() -> String {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    "─".repeat(term_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_cell_precision() {
        assert_eq!(value_cell(880.0, 2).content(), "880.00");
        assert_eq!(value_cell(1.23456, 0).content(), "1");
    }

    #[test]
    fn test_variance_cell() {
        assert_eq!(variance_cell(None).content(), "-");
        assert_eq!(variance_cell(Some(10.0)).content(), "10.00%");
        assert_eq!(variance_cell(Some(-6.25)).content(), "-6.25%");
    }
}
