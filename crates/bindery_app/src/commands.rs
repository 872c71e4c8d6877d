use bindery_core::{AppViewModel, Msg, Point, PointerButton, RowView};
use thiserror::Error;

use crate::layout;

pub const HELP: &str = "\
commands:
  show                      print every panel
  root                      reload server root and lists
  refresh | books           reload all lists | only book folders
  raw <n> on|off            toggle raw file n
  all-raw                   select every raw file
  convert                   convert selected raw files
  open <n>                  open book folder n
  md <n> on|off             toggle derived file n
  all-md on|off             toggle every derived file
  drag <x0> <y0> <x1> <y1>  rubber-band select derived rows (row n is line n)
  preview <n>               show derived file n
  merge | rename <name>     merge selected | rename the one selected file
  delete-md | delete-current | delete-book
  upload <path>...          upload .epub files
  clear-queue | clear-log | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("no {list} entry #{index}")]
    NoSuchRow { list: &'static str, index: usize },
}

/// Parses one input line. Row numbers are 1-based positions in `view`.
pub fn parse(line: &str, view: &AppViewModel) -> Result<Command, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(Command::Dispatch(Vec::new()));
    };
    let msgs = match (head, args) {
        ("quit" | "exit", _) => return Ok(Command::Quit),
        ("help", _) => return Ok(Command::Help),
        ("show", _) => return Ok(Command::Show),
        ("root", _) => vec![Msg::PickRootClicked],
        ("refresh", _) => vec![Msg::RefreshAllClicked],
        ("books", _) => vec![Msg::RefreshBooksClicked],
        ("all-raw", _) => vec![Msg::SelectAllRawClicked],
        ("convert", _) => vec![Msg::ConvertClicked],
        ("merge", _) => vec![Msg::MergeClicked],
        ("delete-md", _) => vec![Msg::DeleteSelectedDerivedClicked],
        ("delete-current", _) => vec![Msg::DeleteCurrentDerivedClicked],
        ("delete-book", _) => vec![Msg::DeleteBookClicked],
        ("clear-queue", _) => vec![Msg::ClearQueueClicked],
        ("clear-log", _) => vec![Msg::ClearLogClicked],
        ("raw", [index, flag]) => {
            let identity = row(&view.raw_files, "raw", index)?;
            vec![Msg::RawToggled {
                identity,
                selected: on_off(flag, "raw <n> on|off")?,
            }]
        }
        ("md", [index, flag]) => {
            let identity = row(&view.derived, "md", index)?;
            vec![Msg::DerivedToggled {
                identity,
                selected: on_off(flag, "md <n> on|off")?,
            }]
        }
        ("all-md", [flag]) => vec![Msg::DerivedSelectAllToggled(on_off(flag, "all-md on|off")?)],
        ("open", [index]) => vec![Msg::BookClicked(row(&view.books, "book", index)?)],
        ("preview", [index]) => vec![Msg::DerivedClicked(row(&view.derived, "md", index)?)],
        ("rename", [name]) => vec![Msg::RenameRequested(name.to_string())],
        ("upload", paths) if !paths.is_empty() => {
            vec![Msg::FilesDropped(paths.iter().map(|p| p.to_string()).collect())]
        }
        ("drag", [x0, y0, x1, y1]) => {
            let usage = "drag <x0> <y0> <x1> <y1>";
            let from = Point::new(number(x0, usage)?, number(y0, usage)?);
            let to = Point::new(number(x1, usage)?, number(y1, usage)?);
            drag_msgs(from, to, view.derived.len())
        }
        ("raw", _) => return Err(CommandError::Usage("raw <n> on|off")),
        ("md", _) => return Err(CommandError::Usage("md <n> on|off")),
        ("all-md", _) => return Err(CommandError::Usage("all-md on|off")),
        ("open", _) => return Err(CommandError::Usage("open <n>")),
        ("preview", _) => return Err(CommandError::Usage("preview <n>")),
        ("rename", _) => return Err(CommandError::Usage("rename <name>")),
        ("upload", _) => return Err(CommandError::Usage("upload <path>...")),
        ("drag", _) => return Err(CommandError::Usage("drag <x0> <y0> <x1> <y1>")),
        (other, _) => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Dispatch(msgs))
}

/// A press, one move and a release, as a pointer device would report them.
fn drag_msgs(from: Point, to: Point, row_count: usize) -> Vec<Msg> {
    vec![
        Msg::PointerPressed {
            button: PointerButton::Primary,
            target: layout::hit_test(from, row_count),
            point: from,
        },
        Msg::PointerMoved(to),
        Msg::PointerReleased {
            point: to,
            rows: layout::derived_row_bounds(row_count),
        },
    ]
}

fn row(rows: &[RowView], list: &'static str, index: &str) -> Result<String, CommandError> {
    let index: usize = index
        .parse()
        .map_err(|_| CommandError::Usage("row numbers start at 1"))?;
    index
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .map(|row| row.identity.clone())
        .ok_or(CommandError::NoSuchRow { list, index })
}

fn on_off(flag: &str, usage: &'static str) -> Result<bool, CommandError> {
    match flag {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn number(text: &str, usage: &'static str) -> Result<i32, CommandError> {
    text.parse().map_err(|_| CommandError::Usage(usage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_core::{PressTarget, Rect};

    fn view() -> AppViewModel {
        let rows = |names: &[&str]| -> Vec<RowView> {
            names
                .iter()
                .map(|name| RowView {
                    identity: name.to_string(),
                    selected: false,
                    meta: String::new(),
                })
                .collect()
        };
        AppViewModel {
            raw_files: rows(&["a.epub", "b.epub"]),
            books: rows(&["Dune"]),
            derived: rows(&["ch1.md", "ch2.md"]),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn toggles_resolve_row_numbers() {
        assert_eq!(
            parse("raw 2 on", &view()),
            Ok(Command::Dispatch(vec![Msg::RawToggled {
                identity: "b.epub".to_string(),
                selected: true,
            }]))
        );
        assert_eq!(
            parse("md 3 on", &view()),
            Err(CommandError::NoSuchRow {
                list: "md",
                index: 3
            })
        );
        assert_eq!(
            parse("raw 0 on", &view()),
            Err(CommandError::NoSuchRow {
                list: "raw",
                index: 0
            })
        );
    }

    #[test]
    fn drag_becomes_pointer_sequence() {
        let Ok(Command::Dispatch(msgs)) = parse("drag 10 1 12 2", &view()) else {
            panic!("drag should parse");
        };
        assert_eq!(msgs.len(), 3);
        assert_eq!(
            msgs[0],
            Msg::PointerPressed {
                button: PointerButton::Primary,
                target: PressTarget::Row,
                point: Point::new(10, 1),
            }
        );
        assert_eq!(
            msgs[2],
            Msg::PointerReleased {
                point: Point::new(12, 2),
                rows: vec![Rect::new(0, 1, 79, 1), Rect::new(0, 2, 79, 2)],
            }
        );
    }

    #[test]
    fn malformed_input_reports_usage() {
        assert_eq!(
            parse("all-md maybe", &view()),
            Err(CommandError::Usage("all-md on|off"))
        );
        assert_eq!(
            parse("frobnicate", &view()),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
        assert_eq!(parse("   ", &view()), Ok(Command::Dispatch(Vec::new())));
        assert_eq!(parse("quit", &view()), Ok(Command::Quit));
    }
}
