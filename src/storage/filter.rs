//! Typed list filters and their SQL rendering.
//!
//! A [`SignalFilter`] lowers to a placeholder-free list of [`Predicate`]s.
//! Each backend renders that list with its own placeholder style, always
//! binding user input as parameters.

use crate::model::{Severity, Status};

/// Placeholder dialect of a SQL backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `?` placeholders.
    Sqlite,
    /// `$1`, `$2`, ... placeholders.
    Postgres,
}

impl Dialect {
    /// Placeholder for the `n`th (1-based) bound parameter.
    #[must_use]
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Self::Sqlite => "?".to_string(),
            Self::Postgres => format!("${n}"),
        }
    }
}

/// Filterable signal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Category,
    Severity,
    Owner,
    Status,
    Notes,
    Source,
}

impl Column {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Category => "category",
            Self::Severity => "severity",
            Self::Owner => "owner",
            Self::Status => "status",
            Self::Notes => "notes",
            Self::Source => "source",
        }
    }
}

/// Columns covered by free-text search.
pub const SEARCH_COLUMNS: [Column; 3] = [Column::Title, Column::Notes, Column::Source];

/// One condition of a list query. Conditions are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = value`
    Equals { column: Column, value: String },
    /// Literal substring match in any of `columns`.
    Contains {
        columns: &'static [Column],
        needle: String,
    },
}

/// Filter options for listing signals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalFilter {
    pub status: Option<Status>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub severity: Option<Severity>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl SignalFilter {
    /// Filter selecting every open signal.
    #[must_use]
    pub fn open() -> Self {
        Self {
            status: Some(Status::Open),
            ..Self::default()
        }
    }

    /// Filter selecting every signal regardless of status.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Lower to predicates; absent or blank filters impose no constraint.
    #[must_use]
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(status) = self.status {
            predicates.push(Predicate::Equals {
                column: Column::Status,
                value: status.as_str().to_string(),
            });
        }
        if let Some(category) = non_blank(self.category.as_deref()) {
            predicates.push(Predicate::Equals {
                column: Column::Category,
                value: category.to_string(),
            });
        }
        if let Some(owner) = non_blank(self.owner.as_deref()) {
            predicates.push(Predicate::Equals {
                column: Column::Owner,
                value: owner.to_string(),
            });
        }
        if let Some(severity) = &self.severity {
            predicates.push(Predicate::Equals {
                column: Column::Severity,
                value: severity.as_str().to_string(),
            });
        }
        if let Some(search) = non_blank(self.search.as_deref()) {
            predicates.push(Predicate::Contains {
                columns: &SEARCH_COLUMNS,
                needle: search.to_string(),
            });
        }

        predicates
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A rendered `WHERE` fragment with its bound parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlFragment {
    /// Either empty or ` WHERE ...` (leading space included).
    pub clause: String,
    pub params: Vec<String>,
}

/// Render predicates into a parameterized `WHERE` clause.
///
/// `first_param` is the 1-based index of the first placeholder, so callers can
/// append further parameters (such as a limit) after the fragment.
#[must_use]
pub fn render_where(predicates: &[Predicate], dialect: Dialect, first_param: usize) -> SqlFragment {
    let mut conditions = Vec::with_capacity(predicates.len());
    let mut params = Vec::new();
    let mut next = first_param;

    for predicate in predicates {
        match predicate {
            Predicate::Equals { column, value } => {
                conditions.push(format!("{} = {}", column.as_str(), dialect.placeholder(next)));
                next += 1;
                params.push(value.clone());
            }
            Predicate::Contains { columns, needle } => {
                let pattern = format!("%{}%", escape_like(needle));
                let alternatives: Vec<String> = columns
                    .iter()
                    .map(|column| {
                        let rendered = format!(
                            "{} LIKE {} ESCAPE '\\'",
                            column.as_str(),
                            dialect.placeholder(next)
                        );
                        next += 1;
                        params.push(pattern.clone());
                        rendered
                    })
                    .collect();
                conditions.push(format!("({})", alternatives.join(" OR ")));
            }
        }
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    SqlFragment { clause, params }
}

/// Escape `LIKE` wildcards so the needle matches literally.
#[must_use]
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
