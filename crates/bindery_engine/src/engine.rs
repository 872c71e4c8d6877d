use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use bindery_logging::{bindery_info, bindery_warn};
use thiserror::Error;

use crate::client::{ConversionService, HttpService, ServiceSettings};
use crate::upload::read_uploads;
use crate::{BatchTicket, DeletePaths, EngineEvent, ServiceError};

/// Work the engine can run against the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadConfig,
    ListRaw,
    ListBooks,
    ListDerived { book: String },
    ReadDerived { book: String, path: String },
    Upload { paths: Vec<PathBuf> },
    Convert { ticket: BatchTicket, names: Vec<String> },
    Merge { ticket: BatchTicket, book: String, paths: Vec<String> },
    DeleteBook { book: String },
    DeleteDerived { book: String, target: DeletePaths },
    Rename { book: String, path: String, new_name: String },
}

/// Receives engine results, on an engine worker thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("service setup failed: {0}")]
    Service(#[from] ServiceError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Runs requests concurrently on a background tokio runtime.
///
/// Requests are independent: results are emitted in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Request>,
}

impl EngineHandle {
    pub fn connect(
        settings: ServiceSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let service = Arc::new(HttpService::new(settings)?);
        Self::new(service, sink)
    }

    pub fn new(
        service: Arc<dyn ConversionService>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<Request>();

        thread::spawn(move || {
            while let Ok(request) = cmd_rx.recv() {
                let service = service.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let event = handle_request(service.as_ref(), request).await;
                    sink.emit(event);
                });
            }
            runtime.shutdown_background();
        });

        Ok(Self { cmd_tx })
    }

    pub fn submit(&self, request: Request) {
        if self.cmd_tx.send(request).is_err() {
            bindery_warn!("engine thread has stopped; request dropped");
        }
    }
}

async fn handle_request(service: &dyn ConversionService, request: Request) -> EngineEvent {
    match request {
        Request::LoadConfig => EngineEvent::ConfigLoaded(service.config().await),
        Request::ListRaw => EngineEvent::RawListed(service.list_raw().await),
        Request::ListBooks => EngineEvent::BooksListed(service.list_books().await),
        Request::ListDerived { book } => {
            let result = service.list_derived(&book).await;
            EngineEvent::DerivedListed { book, result }
        }
        Request::ReadDerived { book, path } => {
            let result = service.read_derived(&book, &path).await;
            EngineEvent::PreviewLoaded { book, path, result }
        }
        Request::Upload { paths } => {
            let result = match read_uploads(paths.as_slice()).await {
                Ok(files) => {
                    bindery_info!("uploading {} file(s)", files.len());
                    service.upload(files).await
                }
                Err(err) => Err(err),
            };
            EngineEvent::Uploaded(result)
        }
        Request::Convert { ticket, names } => {
            bindery_info!("convert ticket={} files={}", ticket, names.len());
            let result = service.convert(&names).await;
            if let Err(err) = &result {
                bindery_warn!("convert ticket={} failed: {}", ticket, err);
            }
            EngineEvent::Converted { ticket, result }
        }
        Request::Merge {
            ticket,
            book,
            paths,
        } => {
            bindery_info!("merge ticket={} book={} files={}", ticket, book, paths.len());
            let result = service.merge(&book, &paths).await;
            EngineEvent::Merged {
                ticket,
                book,
                result,
            }
        }
        Request::DeleteBook { book } => {
            let result = service.delete_book(&book).await;
            EngineEvent::BookDeleted { book, result }
        }
        Request::DeleteDerived { book, target } => {
            let result = service.delete_derived(&book, &target).await;
            EngineEvent::DerivedDeleted {
                book,
                target,
                result,
            }
        }
        Request::Rename {
            book,
            path,
            new_name,
        } => {
            let result = service.rename(&book, &path, &new_name).await;
            EngineEvent::Renamed {
                book,
                new_name,
                result,
            }
        }
    }
}
