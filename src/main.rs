use clap::Parser;
use signal_catalog::cli::commands;
use signal_catalog::cli::{Cli, Commands};
use signal_catalog::config;
use signal_catalog::logging::init_logging;
use signal_catalog::{SignalError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = build_cli_overrides(&cli);
    let json = cli.json;

    let result = match &cli.command {
        Commands::Init => commands::init::execute(json, &overrides),
        Commands::Add(args) => commands::add::execute(args, json, &overrides),
        Commands::List(args) => commands::list::execute(args, json, &overrides),
        Commands::Close(args) => commands::close::execute(args, json, &overrides),
        Commands::Reopen(args) => commands::reopen::execute(args, json, &overrides),
        Commands::Update(args) => commands::update::execute(args, json, &overrides),
        Commands::Summary => commands::summary::execute(json, &overrides),
        Commands::Export(args) => commands::export::execute(args, json, &overrides),
        Commands::Digest(args) => commands::digest::execute(args, json, &overrides),
        Commands::Triage(args) => commands::triage::execute(args, json, &overrides),
        Commands::Workload(args) => commands::workload::execute(args, json, &overrides),
        Commands::Calendar(args) => commands::calendar::execute(args, json, &overrides),
        Commands::Audit(args) => commands::audit::execute(args, json, &overrides),
        Commands::Metrics(args) => commands::metrics::execute(args, json, &overrides),
        Commands::Stale(args) => commands::stale::execute(args, json, &overrides),
        Commands::Trend(args) => commands::trend::execute(args, json, &overrides),
        Commands::Activity(args) => commands::activity::execute(args, json, &overrides),
    };

    if let Err(e) = result {
        handle_error(&e, json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs a human-readable error with optional color.
fn handle_error(err: &SignalError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        db: cli.db.clone(),
        backend: cli.backend.clone(),
        dsn: cli.dsn.clone(),
        table: cli.table.clone(),
    }
}
