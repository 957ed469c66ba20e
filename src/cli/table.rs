use super::ui;
use crate::core::BudgetTable;
use crate::core::config::DisplayConfig;
use comfy_table::Cell;

/// Renders the budget table with a grand total line underneath.
pub fn render(table: &BudgetTable, display: &DisplayConfig) -> String {
    let precision = display.precision;
    let value_header = match &display.currency {
        Some(currency) => format!("Value ({currency})"),
        None => "Value".to_string(),
    };

    let mut grid = ui::new_styled_table();
    grid.set_header(vec![
        ui::header_cell("Label"),
        ui::header_cell("Id"),
        ui::header_cell(&value_header),
        ui::header_cell("Original"),
        ui::header_cell("Variance (%)"),
    ]);

    for group in &table.groups {
        grid.add_row(vec![
            Cell::new(ui::style_text(&group.label, ui::StyleType::TotalLabel)),
            Cell::new(&group.id),
            ui::value_cell(group.value, precision),
            ui::value_cell(group.original_value, precision),
            ui::variance_cell(group.variance),
        ]);

        for child in &group.children {
            grid.add_row(vec![
                Cell::new(format!("-- {}", child.label)),
                Cell::new(ui::style_text(&child.id, ui::StyleType::Subtle)),
                ui::value_cell(child.value, precision),
                ui::value_cell(child.original_value, precision),
                ui::variance_cell(child.variance),
            ]);
        }
    }

    let mut output = grid.to_string();
    output.push_str(&format!(
        "\n\n{}: {}",
        ui::style_text("Grand Total", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{:.precision$}", table.grand_total()),
            ui::StyleType::TotalValue
        )
    ));
    output
}
