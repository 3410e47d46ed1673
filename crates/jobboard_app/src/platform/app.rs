use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use board_logging::{board_debug, board_info, set_dispatch_seq};
use jobboard_core::{update, AppState, Msg};

use super::effects::EffectRunner;
use super::logging;
use super::ui::commands::{parse_command, Command, CommandError, HELP};
use super::ui::render::render;
use crate::cli::Cli;

/// How often engine events are drained when the user is idle.
const TICK: Duration = Duration::from_millis(75);

enum InputEvent {
    Line(String),
    Closed,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log, cli.log_level);
    board_info!(
        "Starting jobboard url={} page_size={}",
        cli.url,
        cli.page_size
    );

    let runner = EffectRunner::new(cli.fetch_settings()).context("starting fetch engine")?;
    let input_rx = spawn_input_reader().context("starting input reader")?;

    let mut app = App::new(AppState::with_page_size(cli.page_size), runner, io::stdout());
    writeln!(app.out, "{HELP}\n")?;
    app.dispatch(Msg::SourceChanged(cli.url))?;

    loop {
        match input_rx.recv_timeout(TICK) {
            Ok(InputEvent::Line(line)) => {
                if let Flow::Quit = app.handle_line(&line)? {
                    break;
                }
            }
            Ok(InputEvent::Closed) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => app.dispatch(Msg::Tick)?,
        }
        app.pump_engine()?;
    }

    app.dispatch(Msg::Detached)?;
    app.runner.shutdown();
    board_info!("jobboard exiting");
    Ok(())
}

/// Reads stdin on a helper thread so the event loop never blocks on the terminal.
fn spawn_input_reader() -> io::Result<mpsc::Receiver<InputEvent>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("jobboard-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(InputEvent::Line(line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(InputEvent::Closed);
        })?;
    Ok(rx)
}

struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    seq: u64,
}

impl<W: Write> App<W> {
    fn new(state: AppState, runner: EffectRunner, out: W) -> Self {
        Self {
            state,
            runner,
            out,
            seq: 0,
        }
    }

    /// Runs one message through the reducer, executes its effects, and renders if needed.
    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        self.seq += 1;
        set_dispatch_seq(self.seq);
        if !matches!(msg, Msg::Tick) {
            board_debug!("dispatch {:?}", MsgLabel(&msg));
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let render_needed = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);

        if render_needed {
            let text = render(&self.state.view());
            writeln!(self.out, "{text}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn pump_engine(&mut self) -> io::Result<()> {
        for msg in self.runner.drain() {
            self.dispatch(msg)?;
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                return Ok(Flow::Continue);
            }
        };

        let msg = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            Command::Search(text) => Msg::SearchChanged(text),
            Command::Facet(facet) => Msg::FacetSelected(facet),
            Command::NextPage => Msg::NextPage,
            Command::PreviousPage => Msg::PreviousPage,
            Command::Refresh => Msg::RefreshRequested,
            Command::ChangeUrl(url) => Msg::SourceChanged(url),
            Command::ToggleFavourite(position) => {
                let view = self.state.view();
                match view.rows.into_iter().find(|row| row.position == position) {
                    Some(row) => Msg::FavouriteToggled(row.id),
                    None => {
                        writeln!(self.out, "{}", CommandError::RowNotVisible(position))?;
                        return Ok(Flow::Continue);
                    }
                }
            }
        };
        self.dispatch(msg)?;
        Ok(Flow::Continue)
    }
}

/// Short form of a message for logs; fetched collections are summarized by length.
struct MsgLabel<'a>(&'a Msg);

impl std::fmt::Debug for MsgLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Msg::FetchSucceeded {
                generation, items, ..
            } => write!(
                f,
                "FetchSucceeded {{ generation: {generation}, items: {} }}",
                items.len()
            ),
            other => write!(f, "{other:?}"),
        }
    }
}
