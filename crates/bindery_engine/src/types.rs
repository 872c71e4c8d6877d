use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Caller-chosen id echoed back with batch results.
pub type BatchTicket = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub root_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawFile {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookDir {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DerivedFile {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

/// Per-file result of a conversion request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConvertResult {
    pub name: String,
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
}

impl ConvertResult {
    /// `None` on success, otherwise the best available reason.
    pub fn failure_reason(&self) -> Option<String> {
        if self.ok {
            return None;
        }
        let reason = self
            .error
            .as_deref()
            .filter(|text| !text.is_empty())
            .or(self.stderr.as_deref().filter(|text| !text.is_empty()))
            .unwrap_or("unknown error");
        Some(reason.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MergeResult {
    pub name: String,
}

/// Which derived files a delete request removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePaths {
    Single(String),
    Many(Vec<String>),
}

/// A local file read into memory for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Text shown to the operator: the server's own words for HTTP errors.
    pub fn detail(&self) -> String {
        match self.kind {
            FailureKind::HttpStatus(_) => self.message.clone(),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64 },
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes } => {
                write!(f, "response larger than {max_bytes} bytes")
            }
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ConfigLoaded(Result<ServiceConfig, ServiceError>),
    RawListed(Result<Vec<RawFile>, ServiceError>),
    BooksListed(Result<Vec<BookDir>, ServiceError>),
    DerivedListed {
        book: String,
        result: Result<Vec<DerivedFile>, ServiceError>,
    },
    PreviewLoaded {
        book: String,
        path: String,
        result: Result<String, ServiceError>,
    },
    Uploaded(Result<Vec<RawFile>, ServiceError>),
    Converted {
        ticket: BatchTicket,
        result: Result<Vec<ConvertResult>, ServiceError>,
    },
    Merged {
        ticket: BatchTicket,
        book: String,
        result: Result<MergeResult, ServiceError>,
    },
    BookDeleted {
        book: String,
        result: Result<(), ServiceError>,
    },
    DerivedDeleted {
        book: String,
        target: DeletePaths,
        result: Result<(), ServiceError>,
    },
    Renamed {
        book: String,
        new_name: String,
        result: Result<(), ServiceError>,
    },
}
