use crate::activity::LogEntry;
use crate::drag::Rect;
use crate::jobs::{JobId, JobOutcome, JobState, Progress};
use crate::summary::SelectionSummary;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub raw_path: String,
    pub book_path: String,
    pub raw_files: Vec<RowView>,
    pub books: Vec<RowView>,
    pub open_book: Option<String>,
    pub derived: Vec<RowView>,
    pub derived_summary: SelectionSummary,
    pub preview_title: String,
    pub preview_text: String,
    pub jobs: Vec<JobRowView>,
    pub progress: Progress,
    pub log: Vec<LogEntry>,
    /// Rectangle to draw while a drag is in progress.
    pub drag_region: Option<Rect>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub identity: String,
    pub selected: bool,
    pub meta: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub label: String,
    pub state: JobState,
    pub outcome: Option<JobOutcome>,
}
