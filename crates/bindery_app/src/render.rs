use std::fmt::Write;

use bindery_core::{
    AppViewModel, CheckState, JobOutcome, JobState, LogEntry, LogLevel, RowView,
};

use crate::layout::{CHECKBOX_COLUMNS, ROW_WIDTH};

const PREVIEW_LINES: usize = 20;

/// Full text rendering of every panel.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Raw files ({}) ==", view.raw_path);
    write_rows(&mut out, &view.raw_files);

    let _ = writeln!(out, "== Book folders ({}) ==", view.book_path);
    write_rows(&mut out, &view.books);

    match &view.open_book {
        Some(book) => {
            let _ = writeln!(out, "== Book files: {book} ==");
        }
        None => {
            let _ = writeln!(out, "== Book files ==");
        }
    }
    out.push_str(&render_derived(view));

    let _ = writeln!(out, "== Preview: {} ==", view.preview_title);
    for line in view.preview_text.lines().take(PREVIEW_LINES) {
        let _ = writeln!(out, "{line}");
    }

    let _ = writeln!(out, "== Queue ({}%) ==", view.progress.percent());
    for job in &view.jobs {
        let badge = match (&job.state, &job.outcome) {
            (JobState::Pending, _) => "pending".to_string(),
            (JobState::Done, Some(JobOutcome::Failure(failure))) => format!("failed: {failure}"),
            (JobState::Done, _) => "done".to_string(),
        };
        let _ = writeln!(out, "  {} [{badge}]", job.label);
    }
    out
}

/// The derived list laid out line by line: select-all row, then one line
/// per row, matching the geometry in `layout`.
pub fn render_derived(view: &AppViewModel) -> String {
    let mut out = String::new();
    let aggregate = match view.derived_summary.check_state {
        CheckState::All => "[x]",
        CheckState::Some => "[-]",
        CheckState::None => "[ ]",
    };
    let _ = writeln!(
        out,
        "{}",
        fit(&format!("{aggregate} Select all {}", view.derived_summary))
    );
    for (index, row) in view.derived.iter().enumerate() {
        let _ = writeln!(out, "{}", fit(&row_line(index + 1, row)));
    }
    if let Some(region) = view.drag_region {
        let _ = writeln!(
            out,
            "  selecting x {}..{} y {}..{}",
            region.left, region.right, region.top, region.bottom
        );
    }
    out
}

/// Log lines prefixed with a UTC `[HH:MM:SS]` stamp.
pub fn stamp_log(entries: &[LogEntry], now: chrono::DateTime<chrono::Utc>) -> Vec<String> {
    let stamp = now.format("%H:%M:%S");
    entries
        .iter()
        .map(|entry| {
            let marker = match entry.level {
                LogLevel::Info => "",
                LogLevel::Warn => "warning: ",
                LogLevel::Error => "error: ",
            };
            format!("[{stamp}] {marker}{}", entry.text)
        })
        .collect()
}

fn write_rows(out: &mut String, rows: &[RowView]) {
    if rows.is_empty() {
        out.push_str("  (empty)\n");
    }
    for (index, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "{}", row_line(index + 1, row));
    }
}

fn row_line(number: usize, row: &RowView) -> String {
    let check = if row.selected { "[x]" } else { "[ ]" };
    let pad = CHECKBOX_COLUMNS as usize - check.len();
    format!(
        "{check}{:pad$}{number:>3}. {}  {}",
        "",
        row.identity,
        row.meta,
        pad = pad
    )
}

fn fit(line: &str) -> String {
    line.chars().take(ROW_WIDTH as usize).collect()
}
