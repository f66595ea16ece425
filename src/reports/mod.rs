use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use glidetype::input::PredictionResult;

pub fn print_prediction(result: &PredictionResult) {
    if result.is_empty() {
        println!("\n(no prediction)");
        return;
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["#", "Word", "Score"]);

    for (i, (word, score)) in result.words.iter().zip(result.scores.iter()).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(word),
            Cell::new(format!("{:.4}", score)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
    if let Some(top) = result.top_prediction() {
        println!("→ {}", top);
    }
}
