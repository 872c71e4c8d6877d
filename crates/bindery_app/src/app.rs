use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use bindery_core::{init, update, AppState, AppViewModel, Effect, LogEntry, Msg};
use bindery_logging::{bindery_info, bindery_warn};

use crate::commands::{self, Command, HELP};
use crate::config;
use crate::effects::EffectRunner;
use crate::logging;
use crate::render;

/// Everything the main loop reacts to.
pub enum Input {
    Line(String),
    Msg(Msg),
    Closed,
}

pub fn run() -> anyhow::Result<()> {
    let config_path = config::config_path();
    let config = config::load(&config_path)?;
    logging::initialize(config.log_destination);
    bindery_info!(
        "starting against {} (config {})",
        config.base_url,
        config_path.display()
    );

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    spawn_stdin_reader(input_tx.clone());
    let runner = EffectRunner::new(config.service_settings(), input_tx)
        .context("connecting to conversion service")?;

    let (state, effects) = init();
    let mut app = App::new(state);
    runner.run(effects);
    app.flush(true)?;

    while let Ok(input) = input_rx.recv() {
        match input {
            Input::Msg(msg) => {
                let effects = app.dispatch(msg);
                runner.run(effects);
                app.flush(false)?;
            }
            Input::Line(line) => match commands::parse(&line, &app.view) {
                Ok(Command::Dispatch(msgs)) => {
                    for msg in msgs {
                        let effects = app.dispatch(msg);
                        runner.run(effects);
                    }
                    app.flush(false)?;
                }
                Ok(Command::Show) => app.flush(true)?,
                Ok(Command::Help) => println!("{HELP}"),
                Ok(Command::Quit) => break,
                Err(err) => println!("{err}"),
            },
            Input::Closed => break,
        }
    }
    bindery_info!("shutting down");
    Ok(())
}

struct App {
    state: AppState,
    view: AppViewModel,
    printed_log: usize,
    needs_render: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        let view = state.view();
        Self {
            state,
            view,
            printed_log: 0,
            needs_render: false,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        if msg == Msg::ClearLogClicked {
            self.printed_log = 0;
        }
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.view = state.view();
            self.needs_render = true;
        }
        self.state = state;
        effects
    }

    /// Log entries added since the last call.
    fn take_unprinted_log(&mut self) -> Vec<LogEntry> {
        let start = self.printed_log.min(self.view.log.len());
        self.printed_log = self.view.log.len();
        self.view.log[start..].to_vec()
    }

    /// Prints log lines not shown yet and, when something changed or
    /// `force` is set, the panels.
    fn flush(&mut self, force: bool) -> anyhow::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        for line in render::stamp_log(&self.take_unprinted_log(), chrono::Utc::now()) {
            writeln!(out, "{line}")?;
        }

        if force || std::mem::take(&mut self.needs_render) {
            write!(out, "{}", render::render(&self.view))?;
        }
        out.flush()?;
        Ok(())
    }
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    bindery_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(Input::Closed);
    });
}
