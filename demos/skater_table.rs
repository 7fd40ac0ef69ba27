/// Skater Table Example
///
/// This example demonstrates:
/// - Building a table from the built-in skater rows
/// - Filtering, sorting and the shareable query string
/// - Reopening a table from a shared link
/// - Rendering one scroll window

use stattable::mock::mock_skater_rows;
use stattable::{render_window, CategoricalKind, FilterOperator, Table, Viewport, Virtualizer};

fn main() {
    println!("=== StatTable Skater Example ===\n");

    // 1. Build the table
    println!("1. Loading skaters...");
    let mut table = Table::new(mock_skater_rows());
    table.on_query_change(|query| println!("   -> ?{}", query));
    println!("   {} rows across {} teams\n", table.len(), table.teams().len());

    // 2. Filter and sort
    println!("2. Centers with 40+ goals, most points first...");
    table.set_categorical_filter(CategoricalKind::Position, Some("C".to_string()));
    table
        .add_advanced_filter("goals", FilterOperator::Gte, 40.0)
        .unwrap();
    table.toggle_sort("points", false).unwrap();

    for (i, row) in table.rows().enumerate() {
        let goals = table.render_cell(i, "goals").unwrap();
        println!(
            "   {:<20} {:>3} G  {:>3} P  (goals: {:?})",
            row.full_name, row.goals, row.points, goals.intensity
        );
    }
    for chip in table.filter_chips() {
        println!("   [{}]", chip.label);
    }
    println!();

    // 3. Shared link
    println!("3. Opening the same view from its query string...");
    let shared = Table::from_query(mock_skater_rows(), table.query());
    println!("   identical state: {}\n", shared.state() == table.state());

    // 4. Render a window
    println!("4. Rendering a 200px window...");
    let virtualizer = Virtualizer::new(shared.len());
    let window = render_window(&shared, &virtualizer, Viewport::new(0.0, 200.0, 1024.0));
    let header: Vec<String> = window
        .header
        .iter()
        .map(|h| format!("{}{}", h.label, h.sort_indicator))
        .collect();
    println!("   {}", header.join(" | "));
    for row in &window.rows {
        let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        println!("   {}", cells.join(" | "));
    }

    println!("\n=== Example Complete ===");
}
