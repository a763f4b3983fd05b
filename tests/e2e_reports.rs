mod common;

use chrono::{Duration, Utc};
use common::cli::{SigcatWorkspace, extract_json_payload, run_sigcat};
use common::{SeedRow, seed_rows, test_log};
use serde_json::Value;
use signal_catalog::format::csv::parse_signals;
use std::fs;

const REPORTS: &[&[&str]] = &[
    &["summary"],
    &["digest"],
    &["triage"],
    &["workload"],
    &["calendar"],
    &["audit"],
    &["metrics"],
    &["stale"],
    &["trend"],
    &["activity"],
    &["export"],
    &["list"],
];

fn stamp(days_ago: i64) -> String {
    (Utc::now() - Duration::days(days_ago))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

fn due(days_from_now: i64) -> String {
    (Utc::now() + Duration::days(days_from_now))
        .date_naive()
        .to_string()
}

fn find_row(output: &str, week: &str) -> Vec<String> {
    output
        .lines()
        .find(|line| line.trim().starts_with(week))
        .map(|line| line.split('|').map(|p| p.trim().to_string()).collect())
        .unwrap_or_default()
}

#[test]
fn empty_table_reports_degrade_to_none() {
    let _log = test_log("empty_table_reports_degrade_to_none");
    let workspace = SigcatWorkspace::new();
    run_sigcat(&workspace, ["init"], "init");

    for args in REPORTS {
        let run = run_sigcat(&workspace, args.iter(), &format!("empty_{}", args[0]));
        assert_eq!(run.code(), Some(0), "{} failed: {}", args[0], run.stderr);
        let lowered = run.stdout.to_lowercase();
        assert!(
            lowered.contains("no ") || lowered.contains("(none)"),
            "{} printed no empty-state message: {}",
            args[0],
            run.stdout
        );
    }
}

#[test]
fn trend_counts_weekly_buckets() {
    let _log = test_log("trend_counts_weekly_buckets");
    let workspace = SigcatWorkspace::new();
    seed_rows(
        &workspace.db_path,
        &[
            SeedRow::closed("Test signal", "2026-02-02T10:00:00Z", "2026-02-05T12:00:00Z"),
            SeedRow::closed("Test signal", "2026-01-27T09:00:00Z", "2026-01-30T12:00:00Z"),
            SeedRow::open("Test signal", "2026-01-20T09:00:00Z"),
        ],
    );

    let run = run_sigcat(
        &workspace,
        ["trend", "--weeks", "3", "--as-of", "2026-02-08"],
        "trend",
    );
    assert!(run.status.success(), "trend failed: {}", run.stderr);

    let current = find_row(&run.stdout, "2026-02-02");
    let previous = find_row(&run.stdout, "2026-01-26");
    let oldest = find_row(&run.stdout, "2026-01-19");
    assert_eq!(current[1..4], ["1", "1", "0"]);
    assert_eq!(previous[1..4], ["1", "1", "0"]);
    assert_eq!(oldest[1..4], ["1", "0", "1"]);

    let bad = run_sigcat(&workspace, ["trend", "--as-of", "02/08/2026"], "trend_bad_date");
    assert_eq!(bad.code(), Some(4));
}

#[test]
fn activity_snapshot_counts() {
    let _log = test_log("activity_snapshot_counts");
    let workspace = SigcatWorkspace::new();

    let mut partner = SeedRow::open("Partner delay", &stamp(1));
    partner.owner = Some("Leah");
    partner.due_date = Some(due(2));
    let mut cycle = SeedRow::closed("Cycle closed", &stamp(10), &stamp(2));
    cycle.owner = Some("Diego");
    let mut overdue = SeedRow::open("Overdue outreach", &stamp(20));
    overdue.due_date = Some(due(-5));
    let fresh = SeedRow::open("Fresh update", &stamp(3));
    seed_rows(&workspace.db_path, &[partner, cycle, overdue, fresh]);

    let run = run_sigcat(&workspace, ["activity", "--days", "7", "--limit", "5"], "activity");
    assert!(run.status.success(), "activity failed: {}", run.stderr);
    for expected in [
        "Signals created: 2",
        "Signals updated/closed: 3",
        "Signals closed: 1",
        "Open overdue: 1",
        "Open due soon (next 7 days): 1",
    ] {
        assert!(run.stdout.contains(expected), "missing '{expected}' in {}", run.stdout);
    }

    let md = run_sigcat(
        &workspace,
        ["activity", "--format", "markdown", "--out", "reports/activity.md"],
        "activity_md",
    );
    assert!(md.status.success());
    let written = fs::read_to_string(workspace.root.join("reports/activity.md")).unwrap();
    assert!(written.contains("## Recent activity"));
    assert!(written.contains("Cycle closed"));
}

#[test]
fn triage_ranks_and_digest_writes_file() {
    let _log = test_log("triage_ranks_and_digest_writes_file");
    let workspace = SigcatWorkspace::new();

    let mut urgent = SeedRow::open("Critical overdue", &stamp(20));
    urgent.severity = Some("critical");
    urgent.due_date = Some(due(-5));
    let mut calm = SeedRow::open("Low priority", &stamp(1));
    calm.severity = Some("low");
    calm.owner = Some("Avery");
    calm.due_date = Some(due(30));
    seed_rows(&workspace.db_path, &[calm, urgent]);

    let triage = run_sigcat(&workspace, ["triage", "--days", "14"], "triage");
    assert!(triage.status.success(), "triage failed: {}", triage.stderr);
    let critical_line = triage.stdout.find("Critical overdue").unwrap();
    let low_line = triage.stdout.find("Low priority").unwrap();
    assert!(critical_line < low_line);
    assert!(triage.stdout.contains("overdue, unassigned, aging"));
    assert!(triage.stdout.contains("| 60 "));

    let digest = run_sigcat(&workspace, ["digest", "--out", "out/digest.md"], "digest");
    assert!(digest.status.success());
    assert!(digest.stdout.contains("Wrote digest to"));
    let body = fs::read_to_string(workspace.root.join("out/digest.md")).unwrap();
    assert!(body.starts_with("# Signal Digest"));
    assert!(body.contains("## Overdue Signals\n- [2] Critical overdue"));
}

#[test]
fn workload_and_calendar_formats() {
    let _log = test_log("workload_and_calendar_formats");
    let workspace = SigcatWorkspace::new();

    let mut a = SeedRow::open("Leah overdue", &stamp(4));
    a.owner = Some("Leah");
    a.due_date = Some(due(-1));
    let mut b = SeedRow::open("Leah later", &stamp(2));
    b.owner = Some("Leah");
    b.due_date = Some(due(60));
    let c = SeedRow::open("Nobody", &stamp(1));
    seed_rows(&workspace.db_path, &[a, b, c]);

    let csv = run_sigcat(&workspace, ["workload", "--format", "csv"], "workload_csv");
    assert!(csv.status.success());
    let lines: Vec<&str> = csv.stdout.lines().collect();
    assert_eq!(
        lines[0],
        "Owner,Open,Overdue,Due soon,Due later,No due,Avg age (d),High/Critical"
    );
    assert_eq!(lines[1], "Leah,2,1,0,1,0,3.0,0");
    assert_eq!(lines[2], "Unassigned,1,0,0,0,1,1.0,0");

    let calendar = run_sigcat(&workspace, ["calendar", "--format", "markdown"], "calendar_md");
    assert!(calendar.status.success());
    assert!(calendar.stdout.contains("- Overdue: 1"));
    assert!(calendar.stdout.contains("- Later: 1"));
    assert!(calendar.stdout.contains("- No due date: 1"));
}

#[test]
fn export_reads_back_field_for_field() {
    let _log = test_log("export_reads_back_field_for_field");
    let workspace = SigcatWorkspace::new();

    for args in [
        vec!["add", "--title", "Comma, \"quoted\" title", "--category", "partner", "--tags", "a,b"],
        vec!["add", "--title", "Plain", "--notes", "line one"],
        vec!["add", "--title", "Other", "--category", "ops"],
    ] {
        assert!(run_sigcat(&workspace, args, "add").status.success());
    }
    run_sigcat(&workspace, ["close", "2", "--note", "done"], "close");

    let run = run_sigcat(
        &workspace,
        ["export", "--out", "export/signals.csv", "--search", "e"],
        "export",
    );
    assert!(run.status.success(), "export failed: {}", run.stderr);
    assert!(run.stdout.contains("signals to"));

    let csv = fs::read_to_string(workspace.root.join("export/signals.csv")).unwrap();
    let exported = parse_signals(&csv).unwrap();

    let json = run_sigcat(&workspace, ["list", "--all", "--search", "e", "--json"], "list_json");
    let listed: Vec<signal_catalog::model::Signal> =
        serde_json::from_str(&extract_json_payload(&json.stdout)).unwrap();
    assert_eq!(exported, listed);
    assert!(exported.iter().any(|s| s.notes.as_deref() == Some("line one\n[Closed] done")));

    let header = csv.lines().next().unwrap();
    assert_eq!(
        header,
        "id,title,category,severity,owner,due_date,status,notes,source,tags,created_at,closed_at,updated_at"
    );
}

#[test]
fn metrics_and_stale_json() {
    let _log = test_log("metrics_and_stale_json");
    let workspace = SigcatWorkspace::new();

    let mut idle = SeedRow::open("Idle", &stamp(30));
    idle.updated_at = Some(stamp(20));
    let recent = SeedRow::open("Recent", &stamp(1));
    seed_rows(&workspace.db_path, &[idle, recent]);

    let stale = run_sigcat(&workspace, ["stale", "--days", "14", "--json"], "stale_json");
    let entries: Value = serde_json::from_str(&extract_json_payload(&stale.stdout)).unwrap();
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
    assert_eq!(entries[0]["signal"]["title"], "Idle");
    assert_eq!(entries[0]["idle_days"], 20);

    let metrics = run_sigcat(&workspace, ["metrics", "--json"], "metrics_json");
    let value: Value = serde_json::from_str(&extract_json_payload(&metrics.stdout)).unwrap();
    assert_eq!(value["open"], 2);
    assert_eq!(value["stale"], 1);
    assert_eq!(value["cycle_mean"], Value::Null);
}
