//! `contextqa chat`: the interactive REPL.
//!
//! Entering goes through the session guard. Without a session the REPL
//! asks for documents first; `/new` drops the session and asks again.

use anyhow::{anyhow, Result};
use contextqa_application::{
    start_new_upload, GuardDecision, MessageDispatcher, SessionGuard, SubmitOutcome,
};
use contextqa_core::chat::IgnoreReason;
use contextqa_core::SessionId;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::input::{self, InputEvent};
use super::{upload, AppContext};
use crate::view::TranscriptView;

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Quit,
    NewUpload,
    Help,
    Empty,
    Unknown(&'a str),
    Message(&'a str),
}

impl<'a> ReplCommand<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "quit" | "exit" => Self::Quit,
            "/new" => Self::NewUpload,
            "/help" => Self::Help,
            cmd if cmd.starts_with('/') => Self::Unknown(cmd),
            _ => Self::Message(line),
        }
    }
}

/// Splits a line of paths on whitespace. Single or double quotes keep a
/// path with spaces together.
fn split_paths(line: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut pending = false;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                pending = true;
            }
            (None, c) if c.is_whitespace() => {
                if pending {
                    paths.push(PathBuf::from(std::mem::take(&mut current)));
                    pending = false;
                }
            }
            (None, c) => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        paths.push(PathBuf::from(current));
    }
    paths
}

/// How a chat surface was left.
enum Exit {
    Quit,
    NewUpload,
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut input = input::spawn_reader()?;
    let guard = SessionGuard::new(Arc::clone(&ctx.store));

    loop {
        let session_id = match guard.enter() {
            GuardDecision::Granted(session_id) => session_id,
            GuardDecision::Redirect(_) => match prompt_upload(ctx, &mut input).await? {
                Some(session_id) => session_id,
                None => break,
            },
        };

        match chat_surface(ctx, &mut input, session_id).await? {
            Exit::Quit => break,
            Exit::NewUpload => continue,
        }
    }

    println!("{}", ctx.palette.success("Goodbye!"));
    Ok(())
}

/// The upload surface inside the REPL. `None` when the user quits.
async fn prompt_upload(
    ctx: &AppContext,
    input: &mut mpsc::Receiver<InputEvent>,
) -> Result<Option<SessionId>> {
    let initiator = ctx.upload_initiator();
    println!("{}", ctx.palette.banner());
    println!(
        "{}",
        ctx.palette.notice(
            "No active session. Enter the documents to upload, separated by spaces. \
             Quote a path that contains spaces."
        )
    );

    loop {
        match input.recv().await {
            None | Some(InputEvent::Eof) => return Ok(None),
            Some(InputEvent::Failed(e)) => return Err(anyhow!(e)),
            Some(InputEvent::Interrupted) => {
                println!("{}", ctx.palette.notice("CTRL-C detected. Type 'quit' to exit."));
            }
            Some(InputEvent::Line(line)) => {
                if matches!(ReplCommand::parse(&line), ReplCommand::Quit) {
                    return Ok(None);
                }
                let paths = split_paths(&line);
                if let Some(session_id) = upload::upload_paths(ctx, &initiator, &paths).await {
                    println!();
                    return Ok(Some(session_id));
                }
            }
        }
    }
}

/// Runs one chat surface until the user leaves it.
///
/// The dispatcher is shut down on every exit path, so a request still in
/// flight can no longer touch the transcript.
async fn chat_surface(
    ctx: &AppContext,
    input: &mut mpsc::Receiver<InputEvent>,
    session_id: SessionId,
) -> Result<Exit> {
    let dispatcher = MessageDispatcher::new(
        Arc::clone(&ctx.backend),
        session_id.clone(),
        Some(ctx.config.request_timeout()),
    );
    let mut updates = dispatcher.subscribe();
    let mut view = TranscriptView::new(ctx.palette);

    view.banner(&session_id);
    view.sync(&updates.borrow_and_update());

    let exit = loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(Exit::Quit);
                }
                let state = updates.borrow_and_update().clone();
                view.sync(&state);
            }
            event = input.recv() => match event {
                None | Some(InputEvent::Eof) => break Ok(Exit::Quit),
                Some(InputEvent::Failed(e)) => break Err(anyhow!(e)),
                Some(InputEvent::Interrupted) => {
                    view.notice("CTRL-C detected. Type 'quit' to exit.");
                }
                Some(InputEvent::Line(line)) => match ReplCommand::parse(&line) {
                    ReplCommand::Empty => {}
                    ReplCommand::Quit => break Ok(Exit::Quit),
                    ReplCommand::Help => view.help(),
                    ReplCommand::Unknown(cmd) => view.notice(&format!("Unknown command {}", cmd)),
                    ReplCommand::NewUpload => {
                        dispatcher.shutdown();
                        if let Err(e) = start_new_upload(ctx.store.as_ref()) {
                            break Err(e.into());
                        }
                        break Ok(Exit::NewUpload);
                    }
                    ReplCommand::Message(text) => match dispatcher.send(text) {
                        SubmitOutcome::Dispatched(_) => {}
                        SubmitOutcome::Ignored(IgnoreReason::Busy) => {
                            view.notice("Still waiting for the previous answer.");
                        }
                        SubmitOutcome::Ignored(reason) => {
                            tracing::debug!("[Chat] Input dropped: {:?}", reason);
                        }
                    },
                },
            },
        }
    };

    dispatcher.shutdown();
    exit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paths_keeps_quoted_spaces() {
        assert_eq!(
            split_paths(r#"report.pdf "Q3 results.pdf" 'my notes.md'"#),
            vec![
                PathBuf::from("report.pdf"),
                PathBuf::from("Q3 results.pdf"),
                PathBuf::from("my notes.md"),
            ]
        );
        assert_eq!(
            split_paths("  a.pdf\tb.pdf  "),
            vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]
        );
        assert!(split_paths("   ").is_empty());
    }

    #[test]
    fn test_parse_repl_commands() {
        assert_eq!(ReplCommand::parse("  quit "), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("exit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/new"), ReplCommand::NewUpload);
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("/plan"), ReplCommand::Unknown("/plan"));
        assert_eq!(
            ReplCommand::parse(" What is the refund policy? "),
            ReplCommand::Message(" What is the refund policy? ")
        );
    }
}
