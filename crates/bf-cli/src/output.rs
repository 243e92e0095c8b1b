//! Console output after a run

use bf_etl::{count_by_event_type, FraudReportRow, RunSummary, StepOutcome};

pub(crate) fn print_summary(summary: &RunSummary) {
    println!("Load for {} finished ({})", summary.run_date, summary.stage);
    for (file_type, rows) in &summary.staged {
        println!("  staged {file_type:<20} {rows:>8} rows");
    }
    for (step, outcome) in &summary.steps {
        let status = match outcome {
            StepOutcome::Applied => "done",
            StepOutcome::NotStaged => "skipped (no input)",
            StepOutcome::NoScript => "skipped (no script)",
        };
        println!("  {step:<28} {status}");
    }
    if !summary.archive_failures.is_empty() {
        println!(
            "  {} file(s) could not be archived, see log",
            summary.archive_failures.len()
        );
    }
}

pub(crate) fn print_report(rows: &[FraudReportRow]) {
    println!();
    if rows.is_empty() {
        println!("Fraud report: no events");
        return;
    }

    println!("Fraud report: {} event(s)", rows.len());
    for (event_type, n) in count_by_event_type(rows) {
        println!("  {event_type:<36} {n:>5}");
    }
    println!();
    for row in rows {
        println!("{}", format_row(row));
    }
}

fn format_row(row: &FraudReportRow) -> String {
    format!(
        "{}  {:<14} {:<36} {:<16} {}",
        row.event_dt.format("%Y-%m-%d %H:%M:%S"),
        row.passport.as_deref().unwrap_or("-"),
        row.fio.as_deref().unwrap_or("-"),
        row.phone.as_deref().unwrap_or("-"),
        row.event_type
    )
}
