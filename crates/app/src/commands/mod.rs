//! Subcommand implementations

mod account;
mod app;
mod cartridge;
mod deployment;
mod domain;
mod env;
mod git_clone;
mod port_forward;
mod setup;
mod snapshot;
mod ssh;
mod sshkey;
mod tail;

use anyhow::Context as _;
use rhc_application::ParsedResponse;
use rhc_domain::{Application, Severity, parse_ssh_url};
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, Command};
use crate::context::Context;

/// Runs the parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::load(cli.global).await?;

    match cli.command {
        Command::Account => account::account(&ctx).await,
        Command::Server => account::server(&ctx).await,
        Command::Setup => setup::run(ctx).await,
        Command::Domain(command) => domain::run(&ctx, command).await,
        Command::App(command) => app::run(&ctx, command).await,
        Command::Cartridge(command) => cartridge::run(&ctx, command).await,
        Command::Env(command) => env::run(&ctx, command).await,
        Command::Sshkey(command) => sshkey::run(&ctx, command).await,
        Command::Deployment(command) => deployment::run(&ctx, command).await,
        Command::Ssh(args) => ssh::run(&ctx, args).await,
        Command::GitClone { target, directory } => {
            git_clone::run(&ctx, &target, directory).await
        }
        Command::Snapshot(command) => snapshot::run(&ctx, command).await,
        Command::Tail {
            target,
            files,
            opts,
        } => tail::run(&ctx, &target, &files, opts.as_deref()).await,
        Command::PortForward(target) => port_forward::run(&ctx, &target).await,
    }
}

/// A token cancelled on the first Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupted");
            child.cancel();
        }
    });
    token
}

/// Prints the informational and result messages of a response.
fn print_messages(response: &ParsedResponse) {
    for text in response.texts_with(&[Severity::Info, Severity::Result]) {
        println!("{text}");
    }
    for text in response.texts_with(&[Severity::Warning]) {
        eprintln!("Warning: {text}");
    }
}

/// `user@host` of an application's main gear.
fn ssh_destination(application: &Application) -> anyhow::Result<String> {
    let url = application
        .ssh_url
        .as_deref()
        .with_context(|| format!("Application {} has no SSH access", application.name))?;
    let (user, host) = parse_ssh_url(url)?;
    Ok(format!("{user}@{host}"))
}

/// Prints `label: value` when the value is present.
fn field(label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        println!("  {label:<16}{value}");
    }
}
