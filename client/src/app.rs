//! The event loop: one owner of `AppState`, many in-flight requests.

use std::io::{BufRead, BufReader, Write};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use todo_core::{update, AppState, Effect, Msg, TodoClient};

use crate::effects::Effects;
use crate::input::{Command, HELP};
use crate::render::render;
use crate::transport::Transport;

#[derive(Debug)]
enum Event {
    Input(String),
    InputClosed,
    Msg(Msg),
}

/// Run against stdin until `quit`, or until stdin closes and every
/// outstanding request has answered.
pub fn run<T, W>(client: TodoClient, transport: T, out: W) -> anyhow::Result<()>
where
    T: Transport + 'static,
    W: Write,
{
    run_with_input(client, transport, BufReader::new(std::io::stdin()), out)
}

pub fn run_with_input<T, R, W>(
    client: TodoClient,
    transport: T,
    input: R,
    mut out: W,
) -> anyhow::Result<()>
where
    T: Transport + 'static,
    R: BufRead + Send + 'static,
    W: Write,
{
    let effects = Arc::new(Effects::new(client, transport));
    let (tx, rx) = mpsc::channel();

    let input_tx = tx.clone();
    thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if input_tx.send(Event::Input(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(Event::InputClosed);
    });

    let mut state = AppState::default();
    let mut in_flight = 0usize;
    let mut input_closed = false;

    if let Some(effect) = update(&mut state, Msg::Mounted) {
        dispatch(&effects, &tx, effect);
        in_flight += 1;
    }
    write!(out, "{}", render(&state, effects.base_url(), None))?;
    out.flush()?;

    while let Ok(event) = rx.recv() {
        let mut notice: Option<String> = None;
        let msgs = match event {
            Event::Input(line) => match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => {
                    notice = Some(HELP.to_string());
                    Vec::new()
                }
                Ok(command) => command.into_msgs(&state).unwrap_or_else(|err| {
                    notice = Some(err.to_string());
                    Vec::new()
                }),
                Err(err) => {
                    notice = Some(err.to_string());
                    Vec::new()
                }
            },
            Event::InputClosed => {
                input_closed = true;
                Vec::new()
            }
            Event::Msg(msg) => {
                in_flight -= 1;
                vec![msg]
            }
        };

        for msg in msgs {
            if let Some(effect) = update(&mut state, msg) {
                dispatch(&effects, &tx, effect);
                in_flight += 1;
            }
        }

        writeln!(out)?;
        write!(out, "{}", render(&state, effects.base_url(), notice.as_deref()))?;
        out.flush()?;

        if input_closed && in_flight == 0 {
            break;
        }
    }
    writeln!(out)?;
    Ok(())
}

/// Run `effect` on its own thread; the result comes back as one `Event::Msg`.
fn dispatch<T: Transport + 'static>(effects: &Arc<Effects<T>>, tx: &Sender<Event>, effect: Effect) {
    tracing::debug!(?effect, "dispatching");
    let effects = Arc::clone(effects);
    let tx = tx.clone();
    thread::spawn(move || {
        let msg = effects.perform(effect);
        let _ = tx.send(Event::Msg(msg));
    });
}
