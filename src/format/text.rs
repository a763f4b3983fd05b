//! Aligned plain-text tables.
//!
//! Columns are joined with ` | ` under a `-+-` divider. A column is as wide
//! as its header or its widest cell, capped at [`MAX_CELL_WIDTH`]; longer
//! cells are cut with `...`. Widths are unicode display widths.

use crate::format::Table;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a cell may display before truncation.
pub const MAX_CELL_WIDTH: usize = 40;

/// Truncate `value` to `max_len` display columns, ending in `...` when cut.
#[must_use]
pub fn truncate_cell(value: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let width = UnicodeWidthStr::width(value);
    if width <= max_len {
        return value.to_string();
    }

    if max_len <= 3 {
        return take_width(value, max_len);
    }

    let mut s = take_width(value, max_len - 3);
    s.push_str("...");
    s
}

fn take_width(value: &str, limit: usize) -> String {
    let mut w = 0;
    let mut s = String::new();
    for c in value.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if w + cw > limit {
            break;
        }
        w += cw;
        s.push(c);
    }
    s
}

fn pad(value: &str, width: usize) -> String {
    let shown = UnicodeWidthStr::width(value);
    let mut padded = value.to_string();
    padded.push_str(&" ".repeat(width.saturating_sub(shown)));
    padded
}

/// Column widths: max(header, min(cell, [`MAX_CELL_WIDTH`])).
#[must_use]
pub fn column_widths(table: &Table) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            table
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| UnicodeWidthStr::width(cell.as_str()).min(MAX_CELL_WIDTH))
                .fold(UnicodeWidthStr::width(header.as_str()), usize::max)
        })
        .collect()
}

/// Render a table as aligned text. Trailing padding is trimmed.
#[must_use]
pub fn render_table(table: &Table) -> String {
    let widths = column_widths(table);

    let header = table
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect::<Vec<_>>()
        .join(" | ");
    let divider = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = vec![header.trim_end().to_string(), divider];
    for row in &table.rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = row.get(i).map_or("", String::as_str);
                pad(&truncate_cell(cell, MAX_CELL_WIDTH), *w)
            })
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}
