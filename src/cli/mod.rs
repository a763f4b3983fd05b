//! CLI definitions and entry point.

use crate::format::RenderFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Track operational signals and report on them (`SQLite` or PostgreSQL)
#[derive(Parser, Debug)]
#[command(name = "sigcat", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: .sigcat/signals.db or ./data/signals.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Storage backend (sqlite or postgres)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, global = true)]
    pub dsn: Option<String>,

    /// Signal table name
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the signal store
    Init,

    /// Add a signal
    Add(AddArgs),

    /// List signals
    List(ListArgs),

    /// Close a signal
    Close(NoteArgs),

    /// Reopen a closed signal
    Reopen(NoteArgs),

    /// Update fields on a signal
    Update(UpdateArgs),

    /// Show counts by status, category, severity and owner
    Summary,

    /// Export signals to CSV
    Export(ExportArgs),

    /// Generate a Markdown digest
    Digest(DigestArgs),

    /// Rank open signals by urgency
    Triage(TriageArgs),

    /// Show open workload per owner
    Workload(WorkloadArgs),

    /// Group open signals by due week
    Calendar(CalendarArgs),

    /// Check open signals for missing data
    Audit(AuditArgs),

    /// Show operational metrics
    Metrics(MetricsArgs),

    /// List open signals without recent updates
    Stale(StaleArgs),

    /// Show weekly created/closed trend
    Trend(TrendArgs),

    /// Show recent activity
    Activity(ActivityArgs),
}

/// Arguments for the add command.
#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Signal title
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub category: Option<String>,

    /// Severity (low, medium, high, critical)
    #[arg(long)]
    pub severity: Option<String>,

    #[arg(long)]
    pub owner: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Where the signal came from
    #[arg(long)]
    pub source: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}

/// Filters shared by list and export.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub owner: Option<String>,

    /// Severity (low, medium, high, critical)
    #[arg(long)]
    pub severity: Option<String>,

    /// Substring matched against title, notes and source
    #[arg(long)]
    pub search: Option<String>,

    /// Maximum rows to return
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Status to show (open or closed)
    #[arg(long, default_value = "open")]
    pub status: String,

    /// Show every status
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for close and reopen.
#[derive(Args, Debug, Clone, Default)]
pub struct NoteArgs {
    /// Signal ID
    pub id: i64,

    /// Note appended to the signal
    #[arg(long)]
    pub note: Option<String>,
}

/// Arguments for the update command.
#[derive(Args, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateArgs {
    /// Signal ID
    pub id: i64,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub clear_category: bool,

    /// Severity (low, medium, high, critical)
    #[arg(long)]
    pub severity: Option<String>,

    #[arg(long)]
    pub owner: Option<String>,

    #[arg(long)]
    pub clear_owner: bool,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub clear_due: bool,

    #[arg(long)]
    pub source: Option<String>,

    #[arg(long)]
    pub clear_source: bool,

    /// Comma-separated tags (replaces existing tags)
    #[arg(long)]
    pub tags: Option<String>,

    #[arg(long)]
    pub clear_tags: bool,

    /// Text appended to notes on a new line
    #[arg(long)]
    pub append_note: Option<String>,
}

/// Arguments for the export command.
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Status to export (default: all)
    #[arg(long)]
    pub status: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output CSV file path (default: stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the digest command.
#[derive(Args, Debug, Clone, Default)]
pub struct DigestArgs {
    /// Window in days for due-soon and recent signals
    #[arg(long)]
    pub days: Option<i64>,

    /// Maximum signals per section
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output Markdown file path (default: stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the triage command.
#[derive(Args, Debug, Clone, Default)]
pub struct TriageArgs {
    /// Due-soon window in days
    #[arg(long)]
    pub days: Option<i64>,

    /// Maximum signals to rank
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the workload command.
#[derive(Args, Debug, Clone, Default)]
pub struct WorkloadArgs {
    /// Due-soon window in days
    #[arg(long)]
    pub days: Option<i64>,

    #[arg(long, value_enum, default_value_t = RenderFormat::Table)]
    pub format: RenderFormat,

    /// Output file path (default: stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the calendar command.
#[derive(Args, Debug, Clone, Default)]
pub struct CalendarArgs {
    /// Horizon in days; later due dates are grouped together
    #[arg(long)]
    pub days: Option<i64>,

    /// Maximum signals per bucket
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = RenderFormat::Table)]
    pub format: RenderFormat,

    /// Output file path (default: stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the audit command.
#[derive(Args, Debug, Clone, Default)]
pub struct AuditArgs {
    /// Example signals shown per check
    #[arg(long)]
    pub limit: Option<usize>,

    /// Age in days at which a signal counts as aging
    #[arg(long)]
    pub stale_days: Option<i64>,
}

/// Arguments for the metrics command.
#[derive(Args, Debug, Clone, Default)]
pub struct MetricsArgs {
    /// Due-soon window in days
    #[arg(long)]
    pub days: Option<i64>,

    /// Oldest open signals to list
    #[arg(long)]
    pub limit: Option<usize>,

    /// Days without update before a signal counts as stale
    #[arg(long)]
    pub stale_days: Option<i64>,
}

/// Arguments for the stale command.
#[derive(Args, Debug, Clone, Default)]
pub struct StaleArgs {
    /// Days without update
    #[arg(long)]
    pub days: Option<i64>,

    /// Maximum signals to show
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the trend command.
#[derive(Args, Debug, Clone, Default)]
pub struct TrendArgs {
    /// Number of weeks to show
    #[arg(long)]
    pub weeks: Option<usize>,

    /// Last day of the trend (YYYY-MM-DD, default: today UTC)
    #[arg(long)]
    pub as_of: Option<String>,

    #[arg(long, value_enum, default_value_t = RenderFormat::Table)]
    pub format: RenderFormat,

    /// Output file path (default: stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the activity command.
#[derive(Args, Debug, Clone, Default)]
pub struct ActivityArgs {
    /// Window in days
    #[arg(long)]
    pub days: Option<i64>,

    /// Maximum feed entries
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = RenderFormat::Table)]
    pub format: RenderFormat,

    /// Output file path (default: stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}
