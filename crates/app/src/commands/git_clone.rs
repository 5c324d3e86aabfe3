//! `rhc git-clone`

use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::AppArgs;
use crate::context::Context;

pub async fn run(ctx: &Context, target: &AppArgs, directory: Option<PathBuf>) -> anyhow::Result<()> {
    let application = ctx
        .application(target.namespace.as_deref(), &target.app)
        .await?;
    let url = application
        .git_url
        .as_deref()
        .with_context(|| format!("Application {} has no git repository", application.name))?;
    let directory = directory.unwrap_or_else(|| PathBuf::from(&application.name));
    let dir = directory.to_string_lossy().into_owned();

    ctx.runner.interactive("git", &["clone", url, dir.as_str()]).await?;
    for (key, value) in [
        ("rhc.app-name", application.name.as_str()),
        ("rhc.domain-name", application.domain_id.as_str()),
    ] {
        ctx.runner
            .output("git", &["-C", dir.as_str(), "config", key, value])
            .await?;
    }
    println!("Cloned {} into {dir}", application.name);
    Ok(())
}
