use crate::drag::{Point, PointerButton, PressTarget, Rect};
use crate::effect::DeleteTarget;
use crate::jobs::{BatchId, ItemOutcome};

/// One derived file as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedEntry {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to reload the server root and every list.
    PickRootClicked,
    /// Server config arrived; `Ok(None)` keeps the current root label.
    ConfigLoaded(Result<Option<String>, String>),
    RefreshAllClicked,
    RefreshBooksClicked,
    RawListed(Result<Vec<String>, String>),
    BooksListed(Result<Vec<String>, String>),
    DerivedListed {
        book: String,
        result: Result<Vec<DerivedEntry>, String>,
    },
    RawToggled { identity: String, selected: bool },
    SelectAllRawClicked,
    /// User clicked a book row (outside its checkbox).
    BookClicked(String),
    DerivedToggled { identity: String, selected: bool },
    /// The aggregate checkbox above the derived list changed.
    DerivedSelectAllToggled(bool),
    /// User clicked a derived row (outside its checkbox).
    DerivedClicked(String),
    PreviewLoaded {
        book: String,
        path: String,
        result: Result<String, String>,
    },
    PointerPressed {
        button: PointerButton,
        target: PressTarget,
        point: Point,
    },
    PointerMoved(Point),
    /// Pointer released anywhere in the window. `rows` are the on-screen
    /// boxes of the derived rows at release time, in render order.
    PointerReleased { point: Point, rows: Vec<Rect> },
    ConvertClicked,
    ConvertFinished {
        batch: BatchId,
        result: Result<Vec<ItemOutcome>, String>,
    },
    MergeClicked,
    MergeFinished {
        batch: BatchId,
        book: String,
        result: Result<String, String>,
    },
    DeleteSelectedDerivedClicked,
    DeleteCurrentDerivedClicked,
    DeleteBookClicked,
    /// New file name for the single selected derived file. Empty cancels.
    RenameRequested(String),
    BookDeleted {
        book: String,
        result: Result<(), String>,
    },
    DerivedDeleted {
        book: String,
        target: DeleteTarget,
        result: Result<(), String>,
    },
    Renamed {
        book: String,
        new_name: String,
        result: Result<(), String>,
    },
    /// Local files offered for upload (drop zone or file picker).
    FilesDropped(Vec<String>),
    /// Upload settled; `Ok` carries the number of stored files.
    UploadFinished(Result<usize, String>),
    ClearQueueClicked,
    ClearLogClicked,
    NoOp,
}
