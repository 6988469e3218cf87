//! Console rendering
//!
//! Per-category result tables, the overall statistics table, and the
//! success rate line.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::scope::Category;
use crate::validation::ValidationResult;

const CATEGORIES: [Category; 3] = [Category::Linux, Category::Windows, Category::Other];

/// Print one grid table per category that has results
pub fn print_results(results: &[ValidationResult]) {
    for category in CATEGORIES {
        let rows: Vec<&ValidationResult> =
            results.iter().filter(|r| r.category == category).collect();
        if rows.is_empty() {
            continue;
        }

        println!("\n{}", format!("{} Systems:", category).cyan());
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["IP Address", "Protocol", "Status", "Details"]);

        for result in rows {
            let glyph = result.outcome.glyph(&result.detail);
            let status = match glyph {
                "✓" => glyph.green().to_string(),
                "!" => glyph.yellow().to_string(),
                _ => glyph.red().to_string(),
            };
            table.add_row(vec![
                Cell::new(&result.address),
                Cell::new(result.protocol),
                Cell::new(status),
                Cell::new(&result.detail),
            ]);
        }
        println!("{}", table);
    }
}

/// Per-category totals plus the TOTAL row and success rate
pub fn print_statistics(results: &[ValidationResult]) {
    println!("\n{}", "[+] Overall Validation Statistics:".cyan());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["System Type", "Total", "Successful", "Failed"]);

    let mut total = 0usize;
    let mut successful = 0usize;
    for category in CATEGORIES {
        let rows: Vec<&ValidationResult> =
            results.iter().filter(|r| r.category == category).collect();
        let ok = rows.iter().filter(|r| r.outcome.is_success()).count();
        table.add_row(vec![
            category.to_string(),
            rows.len().to_string(),
            ok.to_string(),
            (rows.len() - ok).to_string(),
        ]);
        total += rows.len();
        successful += ok;
    }
    table.add_row(vec![
        "TOTAL".to_string(),
        total.to_string(),
        successful.to_string(),
        (total - successful).to_string(),
    ]);
    println!("{}", table);

    let rate = if total > 0 {
        successful as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    println!("\nOverall Success Rate: {:.1}%", rate);
}
