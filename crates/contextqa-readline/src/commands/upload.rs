//! `contextqa upload`: index documents and start a session.

use anyhow::{bail, Result};
use contextqa_application::{UploadInitiator, UploadStatus};
use contextqa_core::{Route, SessionId};
use contextqa_interaction::read_upload_files;
use std::path::PathBuf;

use super::AppContext;
use crate::view;

pub async fn run(ctx: &AppContext, files: &[PathBuf]) -> Result<()> {
    let initiator = ctx.upload_initiator();

    if initiator.enter() == Some(Route::Chat) {
        println!(
            "{}",
            ctx.palette
                .notice("A session is already active. Run `contextqa reset` to upload new documents.")
        );
        return Ok(());
    }

    match upload_paths(ctx, &initiator, files).await {
        Some(session_id) => {
            println!(
                "{}",
                ctx.palette
                    .notice(&format!("Session {} ready. Run `contextqa chat` to ask questions.", session_id))
            );
            Ok(())
        }
        None => bail!("upload did not complete"),
    }
}

/// Reads `paths` and uploads them, printing status changes as they happen.
///
/// Failures are reported on screen; `None` means no session was created.
pub async fn upload_paths(
    ctx: &AppContext,
    initiator: &UploadInitiator,
    paths: &[PathBuf],
) -> Option<SessionId> {
    let files = match read_upload_files(paths).await {
        Ok(files) => files,
        Err(e) => {
            println!("{}", ctx.palette.error(&e.to_string()));
            return None;
        }
    };

    let mut status = initiator.subscribe();
    let upload = initiator.upload(&files);
    tokio::pin!(upload);

    let result = loop {
        tokio::select! {
            result = &mut upload => break result,
            Ok(()) = status.changed() => {
                let current: UploadStatus = status.borrow_and_update().clone();
                view::print_upload_status(&ctx.palette, &current);
            }
        }
    };

    // The final status can land together with the result
    if status.has_changed().unwrap_or(false) {
        let current = status.borrow_and_update().clone();
        view::print_upload_status(&ctx.palette, &current);
    }

    result.ok()
}
