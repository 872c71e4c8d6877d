use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use bindery_core::{DeleteTarget, DerivedEntry, Effect, ItemOutcome, Msg};
use bindery_engine::{
    ConvertResult, DeletePaths, EngineError, EngineEvent, EngineHandle, EventSink, Request,
    ServiceError, ServiceSettings,
};
use bindery_logging::bindery_info;

use crate::app::Input;

/// Executes core effects on the engine; results come back as `Input::Msg`.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: ServiceSettings,
        input_tx: mpsc::Sender<Input>,
    ) -> Result<Self, EngineError> {
        let sink = Arc::new(MsgSink { tx: input_tx });
        let engine = EngineHandle::connect(settings, sink)?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            bindery_info!("effect {:?}", effect);
            self.engine.submit(to_request(effect));
        }
    }
}

struct MsgSink {
    tx: mpsc::Sender<Input>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Input::Msg(to_msg(event)));
    }
}

pub(crate) fn to_request(effect: Effect) -> Request {
    match effect {
        Effect::LoadConfig => Request::LoadConfig,
        Effect::ListRaw => Request::ListRaw,
        Effect::ListBooks => Request::ListBooks,
        Effect::ListDerived { book } => Request::ListDerived { book },
        Effect::ReadDerived { book, path } => Request::ReadDerived { book, path },
        Effect::Upload { paths } => Request::Upload {
            paths: paths.into_iter().map(PathBuf::from).collect(),
        },
        Effect::Convert { batch, names } => Request::Convert {
            ticket: batch,
            names,
        },
        Effect::Merge { batch, book, paths } => Request::Merge {
            ticket: batch,
            book,
            paths,
        },
        Effect::DeleteBook { book } => Request::DeleteBook { book },
        Effect::DeleteDerived { book, target } => Request::DeleteDerived {
            book,
            target: match target {
                DeleteTarget::Single(path) => DeletePaths::Single(path),
                DeleteTarget::Many(paths) => DeletePaths::Many(paths),
            },
        },
        Effect::Rename {
            book,
            path,
            new_name,
        } => Request::Rename {
            book,
            path,
            new_name,
        },
    }
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ConfigLoaded(result) => {
            Msg::ConfigLoaded(result.map(|config| config.root_label).map_err(detail))
        }
        EngineEvent::RawListed(result) => Msg::RawListed(
            result
                .map(|files| files.into_iter().map(|file| file.name).collect())
                .map_err(detail),
        ),
        EngineEvent::BooksListed(result) => Msg::BooksListed(
            result
                .map(|books| books.into_iter().map(|book| book.name).collect())
                .map_err(detail),
        ),
        EngineEvent::DerivedListed { book, result } => Msg::DerivedListed {
            book,
            result: result
                .map(|files| {
                    files
                        .into_iter()
                        .map(|file| DerivedEntry {
                            name: file.name,
                            count: file.count,
                        })
                        .collect()
                })
                .map_err(detail),
        },
        EngineEvent::PreviewLoaded { book, path, result } => Msg::PreviewLoaded {
            book,
            path,
            result: result.map_err(detail),
        },
        EngineEvent::Uploaded(result) => {
            Msg::UploadFinished(result.map(|files| files.len()).map_err(detail))
        }
        EngineEvent::Converted { ticket, result } => Msg::ConvertFinished {
            batch: ticket,
            result: result
                .map(|results| results.iter().map(item_outcome).collect())
                .map_err(detail),
        },
        EngineEvent::Merged {
            ticket,
            book,
            result,
        } => Msg::MergeFinished {
            batch: ticket,
            book,
            result: result.map(|merged| merged.name).map_err(detail),
        },
        EngineEvent::BookDeleted { book, result } => Msg::BookDeleted {
            book,
            result: result.map_err(detail),
        },
        EngineEvent::DerivedDeleted {
            book,
            target,
            result,
        } => Msg::DerivedDeleted {
            book,
            target: match target {
                DeletePaths::Single(path) => DeleteTarget::Single(path),
                DeletePaths::Many(paths) => DeleteTarget::Many(paths),
            },
            result: result.map_err(detail),
        },
        EngineEvent::Renamed {
            book,
            new_name,
            result,
        } => Msg::Renamed {
            book,
            new_name,
            result: result.map_err(detail),
        },
    }
}

fn item_outcome(result: &ConvertResult) -> ItemOutcome {
    match result.failure_reason() {
        None => ItemOutcome::success(result.name.clone()),
        Some(reason) => ItemOutcome::failure(result.name.clone(), reason),
    }
}

fn detail(err: ServiceError) -> String {
    err.detail()
}
