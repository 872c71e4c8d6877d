use crate::BatchId;

/// Requests for the I/O layer. Each one answers with a matching `Msg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadConfig,
    ListRaw,
    ListBooks,
    ListDerived { book: String },
    ReadDerived { book: String, path: String },
    Upload { paths: Vec<String> },
    Convert { batch: BatchId, names: Vec<String> },
    Merge { batch: BatchId, book: String, paths: Vec<String> },
    DeleteBook { book: String },
    DeleteDerived { book: String, target: DeleteTarget },
    Rename { book: String, path: String, new_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Single(String),
    Many(Vec<String>),
}

impl DeleteTarget {
    pub fn paths(&self) -> Vec<String> {
        match self {
            DeleteTarget::Single(path) => vec![path.clone()],
            DeleteTarget::Many(paths) => paths.clone(),
        }
    }
}
