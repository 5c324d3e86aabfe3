//! `rhc tail`

use super::{interrupt_token, ssh_destination};
use crate::cli::AppArgs;
use crate::context::Context;

pub async fn run(
    ctx: &Context,
    target: &AppArgs,
    files: &str,
    opts: Option<&str>,
) -> anyhow::Result<()> {
    let application = ctx
        .application(target.namespace.as_deref(), &target.app)
        .await?;
    let destination = ssh_destination(&application)?;
    let remote = tail_command(files, opts);
    tracing::debug!(%destination, %remote, "tailing");

    let cancel = interrupt_token();
    let finished = ctx
        .runner
        .interactive_until(
            ctx.global.ssh_program(),
            &["-t", destination.as_str(), remote.as_str()],
            &cancel,
        )
        .await?;
    if !finished {
        eprintln!("Interrupted");
    }
    Ok(())
}

fn tail_command(files: &str, opts: Option<&str>) -> String {
    match opts.map(str::trim).filter(|o| !o.is_empty()) {
        Some(opts) => format!("tail -f {opts} {files}"),
        None => format!("tail -f {files}"),
    }
}
