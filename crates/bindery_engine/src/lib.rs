//! Bindery engine: async access to the conversion service.
mod client;
mod engine;
mod types;
mod upload;

pub use client::{ConversionService, HttpService, ServiceSettings};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink, Request};
pub use types::{
    BatchTicket, BookDir, ConvertResult, DeletePaths, DerivedFile, EngineEvent, FailureKind,
    MergeResult, RawFile, ServiceConfig, ServiceError, UploadFile,
};
pub use upload::read_uploads;
