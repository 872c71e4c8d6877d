use std::collections::HashMap;

use crate::activity::ActivityLog;
use crate::drag::DragRegionSelector;
use crate::jobs::{BatchId, JobQueue};
use crate::msg::DerivedEntry;
use crate::selection::{Item, SelectableCollection};
use crate::summary::SelectionSummary;
use crate::view_model::{AppViewModel, JobRowView, RowView};

pub const RAW_DIR: &str = "raw_book";
pub const BOOK_DIR: &str = "output_book";
pub const DEFAULT_ROOT_LABEL: &str = "root_folder";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Preview {
    pub(crate) title: Option<String>,
    pub(crate) text: String,
}

/// Everything the control surface shows, owned by the single update loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    root_label: String,
    pub(crate) raw: SelectableCollection,
    pub(crate) books: SelectableCollection,
    pub(crate) derived: SelectableCollection,
    pub(crate) open_book: Option<String>,
    /// Book whose listing was requested; it becomes `open_book` once listed.
    pub(crate) pending_book: Option<String>,
    pub(crate) current_derived: Option<String>,
    pub(crate) preview: Preview,
    pub(crate) queue: JobQueue,
    /// Names sent with each in-flight convert, kept apart from the queue so
    /// clearing it does not hide the response.
    pub(crate) convert_requests: HashMap<BatchId, Vec<String>>,
    pub(crate) log: ActivityLog,
    pub(crate) drag: DragRegionSelector,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            raw: SelectableCollection::new(),
            books: SelectableCollection::new(),
            derived: SelectableCollection::new(),
            open_book: None,
            pending_book: None,
            current_derived: None,
            preview: Preview::default(),
            queue: JobQueue::new(),
            convert_requests: HashMap::new(),
            log: ActivityLog::default(),
            drag: DragRegionSelector::new(),
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    pub fn raw_files(&self) -> &SelectableCollection {
        &self.raw
    }

    pub fn books(&self) -> &SelectableCollection {
        &self.books
    }

    pub fn derived_files(&self) -> &SelectableCollection {
        &self.derived
    }

    pub fn open_book(&self) -> Option<&str> {
        self.open_book.as_deref()
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.log
    }

    pub fn drag(&self) -> &DragRegionSelector {
        &self.drag
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            raw_path: format!("{}\\{}", self.root_label, RAW_DIR),
            book_path: format!("{}\\{}", self.root_label, BOOK_DIR),
            raw_files: rows(&self.raw, |_| "epub".to_string()),
            books: rows(&self.books, |_| "folder".to_string()),
            open_book: self.open_book.clone(),
            derived: rows(&self.derived, |item| {
                format!("{} chars", item.metric.unwrap_or(0))
            }),
            derived_summary: SelectionSummary::of(&self.derived),
            preview_title: self
                .preview
                .title
                .clone()
                .unwrap_or_else(|| "No file selected".to_string()),
            preview_text: self.preview.text.clone(),
            jobs: self
                .queue
                .jobs()
                .iter()
                .map(|job| JobRowView {
                    job_id: job.id,
                    label: job.label.clone(),
                    state: job.state,
                    outcome: job.outcome.clone(),
                })
                .collect(),
            progress: self.queue.overall_progress(),
            log: self.log.entries().to_vec(),
            drag_region: self.drag.live_region(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_root_label(&mut self, label: String) {
        self.root_label = label;
        self.mark_dirty();
    }

    pub(crate) fn replace_raw(&mut self, names: Vec<String>) {
        self.raw = SelectableCollection::from_items(names.into_iter().map(Item::new));
        self.mark_dirty();
    }

    pub(crate) fn replace_books(&mut self, names: Vec<String>) {
        self.books = SelectableCollection::from_items(names.into_iter().map(Item::new));
        self.mark_dirty();
    }

    /// Replaces the derived list, sorted by name.
    pub(crate) fn replace_derived(&mut self, mut entries: Vec<DerivedEntry>) {
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        self.derived = SelectableCollection::from_items(
            entries
                .into_iter()
                .map(|entry| Item::new(entry.name).with_metric(entry.count)),
        );
        self.mark_dirty();
    }

    pub(crate) fn clear_preview(&mut self) {
        self.current_derived = None;
        self.preview = Preview::default();
        self.mark_dirty();
    }

    /// Makes `book` the open book, replacing its derived list. Switching
    /// books drops the old preview and any drag.
    pub(crate) fn show_book(&mut self, book: String, entries: Vec<DerivedEntry>) {
        if self.open_book.as_deref() != Some(book.as_str()) {
            self.drag.cancel();
            self.clear_preview();
        }
        if self.pending_book.as_deref() == Some(book.as_str()) {
            self.pending_book = None;
        }
        self.open_book = Some(book);
        self.replace_derived(entries);
    }

    /// Forgets the open book together with its derived list and preview.
    pub(crate) fn close_book(&mut self) {
        self.open_book = None;
        self.pending_book = None;
        self.derived = SelectableCollection::new();
        self.drag.cancel();
        self.clear_preview();
    }
}

fn rows(collection: &SelectableCollection, meta: impl Fn(&Item) -> String) -> Vec<RowView> {
    collection
        .items()
        .iter()
        .map(|item| RowView {
            identity: item.identity.clone(),
            selected: item.selected,
            meta: meta(item),
        })
        .collect()
}
