//! Bindery core: selection model, drag selection, batch job tracking and the
//! pure update loop of the conversion control surface.
mod activity;
mod drag;
mod effect;
mod jobs;
mod msg;
mod selection;
mod state;
mod summary;
mod update;
mod validation;
mod view_model;

pub use activity::{ActivityLog, LogEntry, LogLevel};
pub use drag::{
    DragOutcome, DragRegionSelector, DragState, Point, PointerButton, PressTarget, Rect,
    RowBounds,
};
pub use effect::{DeleteTarget, Effect};
pub use jobs::{
    BatchId, BatchItem, ItemOutcome, Job, JobFailure, JobId, JobOutcome, JobQueue, JobState,
    Progress, ReconcileReport,
};
pub use msg::{DerivedEntry, Msg};
pub use selection::{Item, SelectableCollection};
pub use state::{AppState, BOOK_DIR, DEFAULT_ROOT_LABEL, RAW_DIR};
pub use summary::{CheckState, SelectionSummary};
pub use update::{init, update};
pub use validation::{epub_paths, ValidationError};
pub use view_model::{AppViewModel, JobRowView, RowView};
