//! Output formatting for `signal_catalog`.
//!
//! Every report renders through a [`Table`] in one of three formats:
//! - aligned plain text (see [`text`])
//! - Markdown tables and bullet lists (see [`markdown`])
//! - RFC 4180 CSV (see [`csv`]), which also exports and re-reads signal rows

pub mod csv;
pub mod markdown;
pub mod text;

use clap::ValueEnum;
use std::fmt;

/// Output format for tabular reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RenderFormat {
    #[default]
    Table,
    Markdown,
    Csv,
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Markdown => "markdown",
            Self::Csv => "csv",
        })
    }
}

/// A header row plus string cells, ready for any [`RenderFormat`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render without a trailing newline.
    #[must_use]
    pub fn render(&self, format: RenderFormat) -> String {
        match format {
            RenderFormat::Table => text::render_table(self),
            RenderFormat::Markdown => markdown::render_table(self),
            RenderFormat::Csv => csv::render_table(self),
        }
    }
}
