use crate::jobs::{BatchItem, ItemOutcome, JobFailure};
use crate::state::{BOOK_DIR, RAW_DIR};
use crate::validation::{check_rename, epub_paths, ValidationError};
use crate::{AppState, DeleteTarget, Effect, Msg};

/// Fresh state plus the effects that load the initial lists.
pub fn init() -> (AppState, Vec<Effect>) {
    let mut state = AppState::new();
    state.log.info(format!(
        "Ready. Using server root to load {RAW_DIR} and {BOOK_DIR}."
    ));
    state.mark_dirty();
    (state, vec![Effect::LoadConfig])
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let log_len = state.log.entries().len();
    let effects = match msg {
        Msg::PickRootClicked => vec![Effect::LoadConfig],
        Msg::ConfigLoaded(result) => {
            match result {
                Ok(Some(label)) => state.set_root_label(label),
                Ok(None) => {}
                Err(err) => state.log.warn(format!("Config load failed: {err}")),
            }
            let label = state.root_label().to_string();
            state.log.info(format!("Using server root: {label}"));
            refresh_all(&mut state)
        }
        Msg::RefreshAllClicked => refresh_all(&mut state),
        Msg::RefreshBooksClicked => vec![Effect::ListBooks],
        Msg::RawListed(result) => {
            match result {
                Ok(names) => {
                    state.replace_raw(names);
                    let count = state.raw.len();
                    state.log.info(format!("Loaded {count} raw epub files."));
                }
                Err(err) => state.log.error(format!("Raw list failed: {err}")),
            }
            Vec::new()
        }
        Msg::BooksListed(result) => {
            match result {
                Ok(names) => {
                    state.replace_books(names);
                    let count = state.books.len();
                    state.log.info(format!("Loaded {count} book folders."));
                }
                Err(err) => state.log.error(format!("Book list failed: {err}")),
            }
            Vec::new()
        }
        Msg::DerivedListed { book, result } => {
            let requested = state.pending_book.as_deref() == Some(book.as_str());
            let open = state.open_book.as_deref() == Some(book.as_str());
            if requested || open {
                match result {
                    Ok(entries) => {
                        state.show_book(book.clone(), entries);
                        if requested {
                            state.log.info(format!("Opened book: {book}"));
                        }
                    }
                    Err(err) => {
                        if requested {
                            state.pending_book = None;
                        }
                        state.log.error(format!("MD list failed: {err}"));
                    }
                }
            }
            Vec::new()
        }
        Msg::RawToggled { identity, selected } => {
            if state.raw.toggle_one(&identity, selected) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SelectAllRawClicked => {
            state.raw.toggle_all(true);
            state.mark_dirty();
            Vec::new()
        }
        Msg::BookClicked(book) => {
            state.pending_book = Some(book.clone());
            vec![Effect::ListDerived { book }]
        }
        Msg::DerivedToggled { identity, selected } => {
            if state.derived.toggle_one(&identity, selected) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DerivedSelectAllToggled(selected) => {
            state.derived.toggle_all(selected);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DerivedClicked(path) => {
            state.current_derived = Some(path.clone());
            state.preview.title = Some(path.clone());
            state.mark_dirty();
            match state.open_book.clone() {
                Some(book) => vec![Effect::ReadDerived { book, path }],
                None => Vec::new(),
            }
        }
        Msg::PreviewLoaded { book, path, result } => {
            let current = state.open_book.as_deref() == Some(book.as_str())
                && state.current_derived.as_deref() == Some(path.as_str());
            if current {
                match result {
                    Ok(text) => {
                        state.preview.text = text;
                        state.mark_dirty();
                    }
                    Err(err) => state.log.error(format!("Preview failed: {err}")),
                }
            }
            Vec::new()
        }
        Msg::PointerPressed {
            button,
            target,
            point,
        } => {
            if state.drag.press(button, target, point) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PointerMoved(point) => {
            if state.drag.pointer_moved(point).is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PointerReleased { point, rows } => {
            let AppState { drag, derived, .. } = &mut state;
            if drag.release(point, &rows, derived).is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ConvertClicked => convert_selected(&mut state),
        Msg::ConvertFinished { batch, result } => {
            let requested = state.convert_requests.remove(&batch).unwrap_or_default();
            match &result {
                Ok(outcomes) => log_convert_outcomes(&mut state, &requested, outcomes),
                Err(err) => state.log.error(format!("Conversion failed: {err}")),
            }
            let succeeded = result.is_ok();
            state.queue.reconcile(batch, result);
            state.mark_dirty();
            if succeeded {
                vec![Effect::ListRaw, Effect::ListBooks]
            } else {
                Vec::new()
            }
        }
        Msg::MergeClicked => merge_selected(&mut state),
        Msg::MergeFinished {
            batch,
            book,
            result,
        } => {
            let effects = match &result {
                Ok(name) => {
                    state.log.info(format!("Merged to merged/{name}"));
                    refresh_derived_if_open(&state, &book)
                }
                Err(err) => {
                    state.log.error(format!("Merge failed: {err}"));
                    Vec::new()
                }
            };
            state.queue.complete(batch, result.map(|_| ()));
            state.mark_dirty();
            effects
        }
        Msg::DeleteSelectedDerivedClicked => {
            let selected = state.derived.selected_identities();
            match (state.open_book.clone(), selected.is_empty()) {
                (None, _) => reject(&mut state, ValidationError::NoBookSelected),
                (Some(_), true) => reject(&mut state, ValidationError::NoDerivedSelected),
                (Some(book), false) => vec![Effect::DeleteDerived {
                    book,
                    target: DeleteTarget::Many(selected),
                }],
            }
        }
        Msg::DeleteCurrentDerivedClicked => {
            match (state.open_book.clone(), state.current_derived.clone()) {
                (Some(book), Some(path)) => vec![Effect::DeleteDerived {
                    book,
                    target: DeleteTarget::Single(path),
                }],
                _ => reject(&mut state, ValidationError::NoCurrentFile),
            }
        }
        Msg::DeleteBookClicked => match state.open_book.clone() {
            Some(book) => vec![Effect::DeleteBook { book }],
            None => reject(&mut state, ValidationError::NoBookSelected),
        },
        Msg::RenameRequested(new_name) => rename_selected(&mut state, new_name),
        Msg::BookDeleted { book, result } => match result {
            Ok(()) => {
                state.log.info(format!("Deleted book folder: {book}"));
                if state.pending_book.as_deref() == Some(book.as_str()) {
                    state.pending_book = None;
                }
                if state.open_book.as_deref() == Some(book.as_str()) {
                    state.close_book();
                }
                vec![Effect::ListBooks]
            }
            Err(err) => {
                state.log.error(format!("Delete book failed: {err}"));
                Vec::new()
            }
        },
        Msg::DerivedDeleted {
            book,
            target,
            result,
        } => match result {
            Ok(()) => {
                match &target {
                    DeleteTarget::Single(path) => {
                        state.log.info(format!("Deleted md: {path}"));
                        if state.current_derived.as_deref() == Some(path.as_str()) {
                            state.clear_preview();
                        }
                    }
                    DeleteTarget::Many(paths) => {
                        state.log.info(format!("Deleted {} md files.", paths.len()));
                        let previewed_gone = state
                            .current_derived
                            .as_ref()
                            .is_some_and(|current| paths.contains(current));
                        if previewed_gone {
                            state.clear_preview();
                        }
                    }
                }
                refresh_derived_if_open(&state, &book)
            }
            Err(err) => {
                state.log.error(format!("Delete md failed: {err}"));
                Vec::new()
            }
        },
        Msg::Renamed {
            book,
            new_name,
            result,
        } => match result {
            Ok(()) => {
                state.log.info(format!("Renamed to {new_name}"));
                refresh_derived_if_open(&state, &book)
            }
            Err(err) => {
                state.log.error(format!("Rename failed: {err}"));
                Vec::new()
            }
        },
        Msg::FilesDropped(paths) => match epub_paths(&paths) {
            Ok(paths) => vec![Effect::Upload { paths }],
            Err(err) => reject(&mut state, err),
        },
        Msg::UploadFinished(result) => match result {
            Ok(count) => {
                state
                    .log
                    .info(format!("Added {count} file(s) to {RAW_DIR}."));
                vec![Effect::ListRaw]
            }
            Err(err) => {
                state.log.error(format!("Upload failed: {err}"));
                Vec::new()
            }
        },
        Msg::ClearQueueClicked => {
            state.queue.clear();
            state.mark_dirty();
            Vec::new()
        }
        Msg::ClearLogClicked => {
            state.log.clear();
            state.mark_dirty();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    if state.log.entries().len() != log_len {
        state.mark_dirty();
    }
    (state, effects)
}

fn refresh_all(state: &mut AppState) -> Vec<Effect> {
    state.close_book();
    vec![Effect::ListRaw, Effect::ListBooks]
}

/// One line per reported item, then one per requested name the response
/// left out.
fn log_convert_outcomes(state: &mut AppState, requested: &[String], outcomes: &[ItemOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => state.log.info(format!("Converted {}", outcome.identity)),
            Err(reason) => state
                .log
                .warn(format!("Failed {}: {reason}", outcome.identity)),
        }
    }
    for name in requested {
        if !outcomes.iter().any(|outcome| &outcome.identity == name) {
            state
                .log
                .warn(format!("Failed {name}: {}", JobFailure::MissingOutcome));
        }
    }
}

fn refresh_derived_if_open(state: &AppState, book: &str) -> Vec<Effect> {
    if state.open_book() == Some(book) {
        vec![Effect::ListDerived {
            book: book.to_string(),
        }]
    } else {
        Vec::new()
    }
}

fn reject(state: &mut AppState, err: ValidationError) -> Vec<Effect> {
    state.log.warn(err.to_string());
    Vec::new()
}

fn convert_selected(state: &mut AppState) -> Vec<Effect> {
    let names = state.raw.selected_identities();
    if names.is_empty() {
        return reject(state, ValidationError::NoRawSelected);
    }
    let batch = state.queue.submit_batch(
        names
            .iter()
            .map(|name| BatchItem::new(name.clone(), format!("Convert {name}"))),
    );
    state.convert_requests.insert(batch, names.clone());
    state.mark_dirty();
    vec![Effect::Convert { batch, names }]
}

fn merge_selected(state: &mut AppState) -> Vec<Effect> {
    let Some(book) = state.open_book.clone() else {
        return reject(state, ValidationError::NoBookSelected);
    };
    let mut paths = state.derived.selected_identities();
    if paths.is_empty() {
        return reject(state, ValidationError::NoDerivedSelected);
    }
    paths.sort();
    let batch = state.queue.submit_batch([BatchItem::new(
        book.clone(),
        format!("Merge {} md files", paths.len()),
    )]);
    state.mark_dirty();
    vec![Effect::Merge { batch, book, paths }]
}

fn rename_selected(state: &mut AppState, new_name: String) -> Vec<Effect> {
    let Some(book) = state.open_book.clone() else {
        return reject(state, ValidationError::NoBookSelected);
    };
    let selected = state.derived.selected_identities();
    let [path] = selected.as_slice() else {
        return reject(state, ValidationError::RenameNeedsSingle);
    };
    let new_name = new_name.trim().to_string();
    if new_name.is_empty() {
        return Vec::new();
    }
    if let Err(err) = check_rename(&new_name) {
        return reject(state, err);
    }
    vec![Effect::Rename {
        book,
        path: path.clone(),
        new_name,
    }]
}
