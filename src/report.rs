//! Plain-text rendering of previews and stats for the terminal.

use sheetxfer_core::{ColumnStats, Operation};
use sheetxfer_engine::engine::Preview;

/// Render a preview as a left-aligned table followed by a row-count line.
pub fn render_preview(preview: &Preview) -> String {
    let mut widths: Vec<usize> = preview.headers.iter().map(|h| h.chars().count()).collect();
    for row in &preview.rows {
        for (col, value) in row.iter().enumerate() {
            widths[col] = widths[col].max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_table_row(&mut out, &preview.headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_table_row(&mut out, &rule, &widths);
    for row in &preview.rows {
        push_table_row(&mut out, row, &widths);
    }

    if preview.is_truncated() {
        out.push_str(&format!(
            "Showing first {} rows of {} total\n",
            preview.rows.len(),
            preview.total_rows
        ));
    } else {
        let noun = if preview.total_rows == 1 { "row" } else { "rows" };
        out.push_str(&format!("{} {}\n", preview.total_rows, noun));
    }
    out
}

fn push_table_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

/// One line per operation, with the selected one marked.
///
/// Values are shown as a transfer would write them.
pub fn render_stats(stats: &ColumnStats, selected: Operation) -> String {
    let mut out = String::new();
    for op in Operation::ALL {
        let marker = if op == selected { "*" } else { " " };
        out.push_str(&format!(
            "{} {:<8}{}\n",
            marker,
            op.name(),
            stats.transfer_value(op)
        ));
    }
    out
}
