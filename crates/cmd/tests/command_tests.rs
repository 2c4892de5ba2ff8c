// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Command tests: run, list and query against the fixture ticket dataset
//! and the workspace query files, with stdout captured in a buffer.

use cmd::{OutputFormat, ReportContext, list_command, query_command, run_command};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn test_context(out_root: &Path) -> ReportContext {
    let root = workspace_root();
    ReportContext {
        config_path: Some(root.join("pipeline.yaml")),
        source: Some(
            root.join("crates")
                .join("pipeline")
                .join("tests")
                .join("data")
                .join("tickets.csv"),
        ),
        queries_dir: None,
        output_dir: Some(out_root.join("powerbi")),
    }
}

fn as_text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("utf8 output")
}

#[test]
fn test_run_prints_each_saved_file() {
    let tmp = tempdir().expect("tempdir");
    let ctx = test_context(tmp.path());

    let mut buf = Vec::new();
    let outputs = run_command(&ctx, &mut buf).expect("run");
    assert_eq!(outputs.len(), 5);

    let text = as_text(buf);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Saved kpi_ticket_volume.csv",
            "Saved kpi_priority_mix.csv",
            "Saved kpi_queue_concentration.csv",
            "Saved kpi_ticket_type_mix.csv",
            "Saved kpi_top_issues.csv",
        ]
    );
    assert!(tmp.path().join("powerbi").join("kpi_top_issues.csv").is_file());
}

#[test]
fn test_run_reports_missing_source() {
    let tmp = tempdir().expect("tempdir");
    let ctx = ReportContext {
        source: Some(tmp.path().join("absent.csv")),
        ..test_context(tmp.path())
    };

    let mut buf = Vec::new();
    let err = run_command(&ctx, &mut buf).expect_err("missing source");
    assert!(format!("{err:#}").contains("absent.csv"), "{err:#}");
    assert!(buf.is_empty());
}

#[test]
fn test_list_shows_kpis_in_order() {
    let tmp = tempdir().expect("tempdir");
    let ctx = test_context(tmp.path());

    let mut buf = Vec::new();
    list_command(&ctx, &mut buf).expect("list");
    let text = as_text(buf);

    assert!(text.starts_with("Source: "), "{text}");
    assert!(text.contains("(table dataset_tickets)"));
    let volume = text.find("kpi_ticket_volume.sql").expect("first kpi");
    let issues = text.find("kpi_top_recurring_issues.sql").expect("last kpi");
    assert!(volume < issues);
    assert!(text.contains("5. "));
    // Listing opens no session and writes nothing
    assert!(!tmp.path().join("powerbi").exists());
}

#[test]
fn test_query_count_and_csv() {
    let tmp = tempdir().expect("tempdir");
    let ctx = test_context(tmp.path());

    let mut buf = Vec::new();
    query_command(&ctx, "SELECT * FROM dataset_tickets", OutputFormat::Count, &mut buf)
        .expect("count");
    assert_eq!(as_text(buf).trim(), "12");

    let mut buf = Vec::new();
    query_command(
        &ctx,
        "SELECT language, COUNT(*) AS n FROM dataset_tickets GROUP BY language ORDER BY language",
        OutputFormat::Csv,
        &mut buf,
    )
    .expect("csv");
    assert_eq!(as_text(buf), "language,n\nde,3\nen,9\n");
}

#[test]
fn test_query_table_and_empty_result() {
    let tmp = tempdir().expect("tempdir");
    let ctx = test_context(tmp.path());

    let mut buf = Vec::new();
    query_command(
        &ctx,
        "SELECT queue FROM dataset_tickets WHERE priority = 'urgent'",
        OutputFormat::Table,
        &mut buf,
    )
    .expect("table");
    assert_eq!(as_text(buf).trim(), "No results found.");

    let mut buf = Vec::new();
    query_command(
        &ctx,
        "SELECT COUNT(DISTINCT queue) AS queues FROM dataset_tickets",
        OutputFormat::Table,
        &mut buf,
    )
    .expect("table");
    let text = as_text(buf);
    assert!(text.contains("queues"), "{text}");
    assert!(text.contains("| 5 "), "{text}");
}

#[test]
fn test_query_error_is_reported() {
    let tmp = tempdir().expect("tempdir");
    let ctx = test_context(tmp.path());

    let mut buf = Vec::new();
    let err = query_command(&ctx, "SELECT severity FROM dataset_tickets", OutputFormat::Table, &mut buf)
        .expect_err("undefined column");
    let kind = err
        .downcast_ref::<pipeline::PipelineError>()
        .map(pipeline::PipelineError::kind);
    assert_eq!(kind, Some(pipeline::ErrorKind::Query));
}
