// src/table.rs

//! Table normalization: ragged input rows are squared off, financial cells
//! reformatted and column widths derived before pagination sees the table.

use serde::Serialize;

/// Caller-facing description of a table. Row zero is treated as the header.
#[derive(Debug, Clone, Serialize)]
pub struct TableSpec {
    pub title: String,
    pub rows: Vec<Vec<String>>,
    pub financial: bool,
    pub col_widths: Option<Vec<f32>>,
}

impl TableSpec {
    pub fn new(title: impl Into<String>, rows: Vec<Vec<String>>, financial: bool) -> Self {
        Self {
            title: title.into(),
            rows,
            financial,
            col_widths: None,
        }
    }
}

/// Normalized table ready for pagination: rectangular rows and one width per
/// column, both guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub title: String,
    pub col_widths: Vec<f32>,
    pub rows: Vec<Vec<String>>,
}

const POINTS_PER_CHAR: f32 = 10.8;
const MIN_COL_WIDTH: f32 = 108.0;
const MAX_COL_WIDTH: f32 = 216.0;
const FALLBACK_WIDTH: f32 = 432.0;

/// Build a rectangular layout from a spec. Never fails: degenerate input
/// collapses to a single message cell instead.
pub fn build_table(spec: &TableSpec) -> TableLayout {
    if spec.rows.is_empty() {
        return message_layout(&spec.title, "No data available");
    }
    let max_cols = spec.rows.iter().map(Vec::len).max().unwrap_or(0);
    if max_cols == 0 {
        return message_layout(&spec.title, "Error creating table");
    }

    let mut rows: Vec<Vec<String>> = spec
        .rows
        .iter()
        .map(|row| {
            let mut cells = row.clone();
            cells.resize(max_cols, String::new());
            cells
        })
        .collect();

    if spec.financial {
        for row in &mut rows {
            for cell in row.iter_mut() {
                let stripped = cell.trim().replace(['$', ','], "");
                if let Ok(value) = stripped.parse::<f64>() {
                    if value != 0.0 {
                        *cell = format_currency(value);
                    }
                }
            }
        }
    }

    let col_widths = match &spec.col_widths {
        Some(widths) if widths.len() == max_cols => widths.clone(),
        _ => derived_widths(&rows, max_cols),
    };

    TableLayout {
        title: spec.title.clone(),
        col_widths,
        rows,
    }
}

fn message_layout(title: &str, message: &str) -> TableLayout {
    TableLayout {
        title: title.to_string(),
        col_widths: vec![FALLBACK_WIDTH],
        rows: vec![vec![message.to_string()]],
    }
}

/// One width per column from the longest cell, clamped to a readable range.
fn derived_widths(rows: &[Vec<String>], max_cols: usize) -> Vec<f32> {
    (0..max_cols)
        .map(|col| {
            let chars = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            (chars as f32 * POINTS_PER_CHAR).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH)
        })
        .collect()
}

/// Currency rendering with thousands separators, e.g. `$1,234.50`. The sign
/// follows the dollar symbol for negative amounts.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn ragged_rows_are_padded() {
        let spec = TableSpec::new("t", rows(&[&["A", "B", "C"], &["1", "2"]]), false);
        let layout = build_table(&spec);
        assert_eq!(layout.rows[0], vec!["A", "B", "C"]);
        assert_eq!(layout.rows[1], vec!["1", "2", ""]);
        assert_eq!(layout.col_widths.len(), 3);
    }

    #[test]
    fn empty_table_collapses_to_message() {
        let layout = build_table(&TableSpec::new("t", vec![], false));
        assert_eq!(layout.rows, vec![vec!["No data available".to_string()]]);
    }

    #[test]
    fn all_empty_rows_collapse_to_error_cell() {
        let layout = build_table(&TableSpec::new("t", vec![vec![], vec![]], false));
        assert_eq!(layout.rows, vec![vec!["Error creating table".to_string()]]);
        assert_eq!(layout.col_widths, vec![432.0]);
    }

    #[test]
    fn rebuilding_a_spec_yields_the_same_layout() {
        let spec = TableSpec::new(
            "Costs",
            rows(&[&["Item", "Cost"], &["Widget", "1234.5"], &["Shim"]]),
            true,
        );
        let first = build_table(&spec);
        let second = build_table(&spec);
        assert_eq!(first.title, second.title);
        assert_eq!(first.col_widths, second.col_widths);
        assert_eq!(first.rows, second.rows);
    }

    #[test]
    fn financial_cells_become_currency() {
        let spec = TableSpec::new(
            "t",
            rows(&[&["Item", "Cost"], &["Widget", "1234.5"], &["Note", "n/a"]]),
            true,
        );
        let layout = build_table(&spec);
        assert_eq!(layout.rows[1][1], "$1,234.50");
        // non-numeric cells pass through untouched
        assert_eq!(layout.rows[2][1], "n/a");
    }

    #[test]
    fn zero_is_not_reformatted() {
        let spec = TableSpec::new("t", rows(&[&["h"], &["0"]]), true);
        let layout = build_table(&spec);
        assert_eq!(layout.rows[1][0], "0");
    }

    #[test]
    fn widths_are_clamped() {
        let long = "x".repeat(60);
        let spec = TableSpec::new("t", vec![vec!["a".to_string(), long]], false);
        let layout = build_table(&spec);
        assert_eq!(layout.col_widths[0], 108.0);
        assert_eq!(layout.col_widths[1], 216.0);
    }

    #[test]
    fn custom_widths_must_match_column_count() {
        let mut spec = TableSpec::new("t", rows(&[&["a", "b"]]), false);
        spec.col_widths = Some(vec![150.0, 150.0]);
        assert_eq!(build_table(&spec).col_widths, vec![150.0, 150.0]);

        spec.col_widths = Some(vec![150.0]);
        assert_eq!(build_table(&spec).col_widths.len(), 2);
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1000000.0), "$1,000,000.00");
        assert_eq!(format_currency(-5.2), "$-5.20");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(12.0), "$12.00");
    }
}
