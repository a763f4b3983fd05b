//! Markdown tables and lists.

use crate::format::Table;

/// Escape a value for use inside a Markdown table cell.
#[must_use]
pub fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// Render a pipe table with a `---` separator row.
#[must_use]
pub fn render_table(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(row_line(&table.headers));
    lines.push(format!(
        "|{}|",
        vec![" --- "; table.headers.len()].join("|")
    ));
    for row in &table.rows {
        lines.push(row_line(row));
    }
    lines.join("\n")
}

fn row_line(cells: &[String]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |", cells.join(" | "))
}

/// Bullet list; `empty` is emitted as a single bullet when there are no items.
#[must_use]
pub fn bullet_list(items: &[String], empty: &str) -> Vec<String> {
    if items.is_empty() {
        return vec![format!("- {empty}")];
    }
    items.iter().map(|item| format!("- {item}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let mut table = Table::new(&["Week", "Created"]);
        table.push_row(vec!["2026-02-02".into(), "1".into()]);
        assert_eq!(
            render_table(&table),
            "| Week | Created |\n| --- | --- |\n| 2026-02-02 | 1 |"
        );
    }

    #[test]
    fn test_pipes_and_newlines_escaped() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(bullet_list(&[], "None"), vec!["- None"]);
        assert_eq!(
            bullet_list(&["one".to_string()], "None"),
            vec!["- one"]
        );
    }
}
