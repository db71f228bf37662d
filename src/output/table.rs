use comfy_table::{
    Cell, Color, ContentArrangement, Table, modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::results::Identifier;

/// Print the sessions of a results directory, newest first (`-l`).
pub(crate) fn print_session_table(ids: &[Identifier], use_color: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Label"),
            Cell::new("Date"),
            Cell::new("Folder"),
        ]);

    for id in ids {
        let label = if use_color {
            Cell::new(id.label()).fg(Color::Cyan)
        } else {
            Cell::new(id.label())
        };
        table.add_row(vec![
            label,
            Cell::new(id.date_time()),
            Cell::new(id.value()),
        ]);
    }

    println!("{table}");
    println!("\n  {} session(s)\n", ids.len());
}
