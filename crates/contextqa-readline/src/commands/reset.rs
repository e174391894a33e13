//! `contextqa reset`: forget the active session.

use anyhow::Result;
use contextqa_application::start_new_upload;

use super::AppContext;

pub fn run(ctx: &AppContext) -> Result<()> {
    start_new_upload(ctx.store.as_ref())?;
    println!(
        "{}",
        ctx.palette
            .notice("Session cleared. Run `contextqa upload <FILES>` to start a new one.")
    );
    Ok(())
}
