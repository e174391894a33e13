//! `contextqa health`: check that the backend is reachable.

use anyhow::{bail, Result};

use super::AppContext;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let url = &ctx.config.api_url;
    match ctx.backend.health().await {
        Ok(reply) if reply.is_ok() => {
            println!("{}", ctx.palette.success(&format!("Backend at {} is up.", url)));
            Ok(())
        }
        Ok(reply) => bail!("Backend at {} reported status '{}'", url, reply.status),
        Err(e) => bail!("Backend at {} is unreachable: {}", url, e),
    }
}
