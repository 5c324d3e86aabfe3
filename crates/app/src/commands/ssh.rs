//! `rhc ssh`: interactive sessions and multi-gear commands

use std::io;
use std::sync::Arc;

use anyhow::bail;
use rhc_application::{MultiGearExecutor, MultiGearOptions, OutputMode};
use rhc_infrastructure::SshProcessShell;

use super::{interrupt_token, ssh_destination};
use crate::cli::SshArgs;
use crate::context::Context;

pub async fn run(ctx: &Context, args: SshArgs) -> anyhow::Result<()> {
    let application = ctx
        .application(args.target.namespace.as_deref(), &args.target.app)
        .await?;

    if !args.gears {
        let mut ssh_args = vec!["-t".to_string(), ssh_destination(&application)?];
        if !args.command.is_empty() {
            ssh_args.push(args.command.join(" "));
        }
        ctx.runner.interactive(ctx.global.ssh_program(), &ssh_args).await?;
        return Ok(());
    }

    if args.command.is_empty() {
        bail!("A command is required with --gears.");
    }
    let options = MultiGearOptions {
        limit: args.limit.max(1),
        mode: output_mode(&args),
    };
    let groups = ctx.client.gear_groups(&application).await?;
    let shell = SshProcessShell::new(ctx.global.ssh_program());
    let executor = MultiGearExecutor::new(Arc::new(shell), options);

    let cancel = interrupt_token();
    let report = executor
        .run(
            &args.command.join(" "),
            &groups,
            &mut io::stdout(),
            &mut io::stderr(),
            &cancel,
        )
        .await?;

    tracing::debug!(
        completed = report.completed.len(),
        failed = report.failed.len(),
        cancelled = report.cancelled,
        "multi-gear run finished"
    );
    if report.cancelled {
        eprintln!("Interrupted");
    }
    if !report.is_success() {
        bail!("The command could not be run on any gear of {}", application.name);
    }
    Ok(())
}

const fn output_mode(args: &SshArgs) -> OutputMode {
    if args.raw {
        OutputMode::Raw
    } else if args.always_prefix {
        OutputMode::AlwaysPrefix
    } else {
        OutputMode::Grouped
    }
}
