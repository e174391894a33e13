//! Line input on a dedicated thread.
//!
//! rustyline blocks, so it runs on its own OS thread and forwards every
//! line over a channel. The async side can then wait for input and state
//! changes in the same `select!`.

use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use crate::helper;

const PROMPT: &str = ">> ";

#[derive(Debug)]
pub enum InputEvent {
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D
    Eof,
    Failed(String),
}

/// Starts the reader thread. It stops on EOF, on a read error, or once the
/// receiver is dropped.
pub fn spawn_reader() -> anyhow::Result<mpsc::Receiver<InputEvent>> {
    let mut editor = helper::editor()?;
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        loop {
            let event = match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    InputEvent::Line(line)
                }
                Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                Err(ReadlineError::Eof) => InputEvent::Eof,
                Err(e) => InputEvent::Failed(e.to_string()),
            };
            let last = matches!(event, InputEvent::Eof | InputEvent::Failed(_));
            if tx.blocking_send(event).is_err() || last {
                break;
            }
        }
    });

    Ok(rx)
}
