use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use bindery_engine::{
    BookDir, ChannelEventSink, ConversionService, ConvertResult, DeletePaths, DerivedFile,
    EngineEvent, EngineHandle, FailureKind, MergeResult, RawFile, Request, ServiceConfig,
    ServiceError, UploadFile,
};

/// Answers conversions from a fixed table and records every call.
#[derive(Default)]
struct FakeService {
    calls: Mutex<Vec<String>>,
    fail_convert: bool,
}

impl FakeService {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

fn unreachable_error() -> ServiceError {
    ServiceError {
        kind: FailureKind::Network,
        message: "connection refused".to_string(),
    }
}

#[async_trait::async_trait]
impl ConversionService for FakeService {
    async fn config(&self) -> Result<ServiceConfig, ServiceError> {
        self.record("config");
        Ok(ServiceConfig {
            root_label: Some("D:\\books".to_string()),
        })
    }

    async fn list_raw(&self) -> Result<Vec<RawFile>, ServiceError> {
        self.record("list_raw");
        Ok(vec![RawFile {
            name: "a.epub".to_string(),
        }])
    }

    async fn list_books(&self) -> Result<Vec<BookDir>, ServiceError> {
        self.record("list_books");
        Err(unreachable_error())
    }

    async fn list_derived(&self, book: &str) -> Result<Vec<DerivedFile>, ServiceError> {
        self.record(format!("list_derived {book}"));
        Ok(Vec::new())
    }

    async fn read_derived(&self, book: &str, path: &str) -> Result<String, ServiceError> {
        self.record(format!("read {book}/{path}"));
        Ok(String::new())
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<RawFile>, ServiceError> {
        self.record(format!("upload {}", files.len()));
        Ok(files
            .into_iter()
            .map(|file| RawFile { name: file.name })
            .collect())
    }

    async fn convert(&self, names: &[String]) -> Result<Vec<ConvertResult>, ServiceError> {
        self.record(format!("convert {}", names.join(",")));
        if self.fail_convert {
            return Err(unreachable_error());
        }
        Ok(names
            .iter()
            .skip(1)
            .map(|name| ConvertResult {
                name: name.clone(),
                ok: true,
                error: None,
                stderr: None,
            })
            .collect())
    }

    async fn merge(&self, book: &str, _paths: &[String]) -> Result<MergeResult, ServiceError> {
        Ok(MergeResult {
            name: format!("{book}.md"),
        })
    }

    async fn delete_book(&self, _book: &str) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn delete_derived(&self, _book: &str, _target: &DeletePaths) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn rename(&self, _book: &str, _path: &str, _new_name: &str) -> Result<(), ServiceError> {
        Ok(())
    }
}

fn start(service: Arc<FakeService>) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(service, Arc::new(ChannelEventSink::new(tx))).expect("engine");
    (engine, rx)
}

fn next_event(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    rx.recv_timeout(Duration::from_secs(5)).expect("engine event")
}

#[test]
fn convert_result_carries_ticket() {
    let service = Arc::new(FakeService::default());
    let (engine, rx) = start(service.clone());

    engine.submit(Request::Convert {
        ticket: 7,
        names: vec!["a.epub".to_string(), "b.epub".to_string()],
    });

    match next_event(&rx) {
        EngineEvent::Converted { ticket, result } => {
            assert_eq!(ticket, 7);
            let names: Vec<_> = result.unwrap().into_iter().map(|r| r.name).collect();
            assert_eq!(names, vec!["b.epub"]);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        service.calls.lock().unwrap().as_slice(),
        ["convert a.epub,b.epub".to_string()]
    );
}

#[test]
fn convert_transport_failure_is_reported() {
    let service = Arc::new(FakeService {
        fail_convert: true,
        ..FakeService::default()
    });
    let (engine, rx) = start(service);

    engine.submit(Request::Convert {
        ticket: 1,
        names: vec!["a.epub".to_string()],
    });

    match next_event(&rx) {
        EngineEvent::Converted { ticket, result } => {
            assert_eq!(ticket, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::Network);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn list_requests_produce_matching_events() {
    let service = Arc::new(FakeService::default());
    let (engine, rx) = start(service);

    engine.submit(Request::ListRaw);
    engine.submit(Request::ListBooks);
    engine.submit(Request::ListDerived {
        book: "Dune".to_string(),
    });

    let mut seen = Vec::new();
    for _ in 0..3 {
        match next_event(&rx) {
            EngineEvent::RawListed(result) => {
                assert_eq!(result.unwrap().len(), 1);
                seen.push("raw");
            }
            EngineEvent::BooksListed(result) => {
                assert!(result.is_err());
                seen.push("books");
            }
            EngineEvent::DerivedListed { book, result } => {
                assert_eq!(book, "Dune");
                assert!(result.unwrap().is_empty());
                seen.push("derived");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    seen.sort();
    assert_eq!(seen, vec!["books", "derived", "raw"]);
}

#[test]
fn upload_of_missing_file_fails_without_calling_service() {
    let service = Arc::new(FakeService::default());
    let (engine, rx) = start(service.clone());

    engine.submit(Request::Upload {
        paths: vec![PathBuf::from("/definitely/not/here.epub")],
    });

    match next_event(&rx) {
        EngineEvent::Uploaded(result) => {
            assert_eq!(result.unwrap_err().kind, FailureKind::Io);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(service.calls.lock().unwrap().is_empty());
}
