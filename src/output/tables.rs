use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::report::Cancellation;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn color_coded_outcome_cell(cancellation: &Cancellation) -> Cell {
    let cell = Cell::new(&cancellation.message);
    match (&cancellation.outcome, cancellation.succeeded) {
        (None, _) => cell.fg(TableColor::Yellow),
        (Some(_), true) => cell.fg(TableColor::Green),
        (Some(_), false) => cell.fg(TableColor::Red),
    }
}
