//! `rhc snapshot`

use std::path::{Path, PathBuf};

use anyhow::bail;

use super::ssh_destination;
use crate::cli::{AppArgs, SnapshotCommand};
use crate::context::Context;

pub async fn run(ctx: &Context, command: SnapshotCommand) -> anyhow::Result<()> {
    match command {
        SnapshotCommand::Save { target, filepath } => {
            let (destination, path) = prepare(ctx, &target, filepath).await?;
            println!("Pulling down a snapshot to {}...", path.display());
            ctx.runner
                .output_to_file(
                    ctx.global.ssh_program(),
                    &[destination.as_str(), "snapshot"],
                    &path,
                )
                .await?;
            println!("Snapshot saved to {}", path.display());
        }
        SnapshotCommand::Restore { target, filepath } => {
            let (destination, path) = prepare(ctx, &target, filepath).await?;
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                bail!("Archive not found: {}", path.display());
            }
            println!("Restoring from {}...", path.display());
            let output = ctx
                .runner
                .input_from_file(
                    ctx.global.ssh_program(),
                    &[destination.as_str(), "restore INCLUDE_GIT"],
                    &path,
                )
                .await?;
            print!("{output}");
            println!("Restore complete");
        }
    }
    Ok(())
}

async fn prepare(
    ctx: &Context,
    target: &AppArgs,
    filepath: Option<PathBuf>,
) -> anyhow::Result<(String, PathBuf)> {
    let application = ctx
        .application(target.namespace.as_deref(), &target.app)
        .await?;
    let path = filepath.unwrap_or_else(|| default_archive(&application.name));
    Ok((ssh_destination(&application)?, path))
}

fn default_archive(app: &str) -> PathBuf {
    Path::new(".").join(format!("{app}.tar.gz"))
}
