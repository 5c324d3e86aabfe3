//! Concurrent fan-out of one command across gears
//!
//! One task is spawned per gear and a semaphore bounds how many sessions
//! are open at once. Each task forwards its output lines, tagged with the
//! gear index, over a channel to a single collector that frames and writes
//! them. A gear that fails is reported and skipped; the others carry on.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use rhc_domain::{GearGroup, GearTarget};
use tokio::sync::Semaphore;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::format::{OutputMode, format_gear_output};
use crate::ports::{OutputStream, RemoteShell, RemoteShellError, ShellLine};

/// Default number of concurrent gear sessions.
pub const DEFAULT_LIMIT: usize = 5;

/// Options for a multi-gear run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiGearOptions {
    /// Maximum number of sessions open at once.
    pub limit: usize,
    /// Output framing.
    pub mode: OutputMode,
}

impl Default for MultiGearOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            mode: OutputMode::default(),
        }
    }
}

/// A gear whose session ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearOutcome {
    /// The gear.
    pub target: GearTarget,
    /// Remote exit status.
    pub exit_status: i32,
    /// Output lines in the order the gear produced them.
    pub lines: Vec<String>,
}

/// A gear that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearFailure {
    /// Gear UUID.
    pub gear_id: String,
    /// Display label.
    pub label: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of a multi-gear run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiGearReport {
    /// Gears whose sessions completed, in completion order.
    pub completed: Vec<GearOutcome>,
    /// Gears that could not be reached.
    pub failed: Vec<GearFailure>,
    /// True when the run was interrupted.
    pub cancelled: bool,
}

impl MultiGearReport {
    /// True when at least one gear session completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.completed.is_empty()
    }
}

#[derive(Debug)]
enum Event {
    Line(usize, ShellLine),
    Finished(usize, Result<i32, RemoteShellError>),
    Cancelled(usize),
}

/// Runs a command on every gear of a set of gear groups.
pub struct MultiGearExecutor<S> {
    shell: Arc<S>,
    options: MultiGearOptions,
}

impl<S: RemoteShell + 'static> MultiGearExecutor<S> {
    /// Creates an executor.
    #[must_use]
    pub const fn new(shell: Arc<S>, options: MultiGearOptions) -> Self {
        Self { shell, options }
    }

    /// SSH targets for every gear, plus the gears that have no usable SSH URL.
    #[must_use]
    pub fn targets(groups: &[GearGroup]) -> (Vec<GearTarget>, Vec<GearFailure>) {
        let mut targets = Vec::new();
        let mut failures = Vec::new();
        for group in groups {
            for gear in &group.gears {
                match GearTarget::for_gear(group, gear) {
                    Ok(target) => targets.push(target),
                    Err(e) => failures.push(GearFailure {
                        gear_id: gear.id.clone(),
                        label: gear.id.clone(),
                        reason: e.to_string(),
                    }),
                }
            }
        }
        (targets, failures)
    }

    /// Runs `command` on every gear and writes the framed output.
    ///
    /// Output is written as it arrives: raw mode passes stdout and stderr
    /// lines through, the framed modes tag or group them by gear. Warnings
    /// for skipped gears go to `err`. Cancelling `cancel` closes every open
    /// session, writes what was already received and ends the run.
    ///
    /// # Errors
    ///
    /// Returns an error only when writing to `out` or `err` fails.
    pub async fn run<O: Write, E: Write>(
        &self,
        command: &str,
        groups: &[GearGroup],
        out: &mut O,
        err: &mut E,
        cancel: &CancellationToken,
    ) -> io::Result<MultiGearReport> {
        let (targets, unreachable) = Self::targets(groups);
        let mut report = MultiGearReport::default();
        for failure in unreachable {
            self.skip(failure, &mut report, err)?;
        }

        let (events_tx, mut events) = mpsc::unbounded_channel();
        let semaphore = Arc::new(Semaphore::new(self.options.limit.max(1)));
        let mut tasks = JoinSet::new();
        for (index, target) in targets.iter().cloned().enumerate() {
            let shell = Arc::clone(&self.shell);
            let semaphore = Arc::clone(&semaphore);
            let events = events_tx.clone();
            let cancel = cancel.clone();
            let command = command.to_string();
            tasks.spawn(async move {
                let event = tokio::select! {
                    () = cancel.cancelled() => Event::Cancelled(index),
                    result = run_gear(shell.as_ref(), &semaphore, &target, &command, index, &events) => {
                        Event::Finished(index, result)
                    }
                };
                events.send(event).ok();
            });
        }
        drop(events_tx);
        tracing::debug!(
            gears = targets.len(),
            limit = self.options.limit,
            "running command on gears"
        );

        let mut output = FramedOutput::new(self.options.mode);
        while let Some(event) = events.recv().await {
            match event {
                Event::Line(index, line) => {
                    output.line(&targets[index].label, index, line, out, err)?;
                }
                Event::Finished(index, Ok(exit_status)) => {
                    let target = targets[index].clone();
                    let lines = output.finish(&target.label, index, out)?;
                    tracing::debug!(gear = %target.gear_id, exit_status, "gear session finished");
                    report.completed.push(GearOutcome {
                        target,
                        exit_status,
                        lines,
                    });
                }
                Event::Finished(index, Err(error)) => {
                    let target = &targets[index];
                    output.finish(&target.label, index, out)?;
                    let failure = GearFailure {
                        gear_id: target.gear_id.clone(),
                        label: target.label.clone(),
                        reason: error.to_string(),
                    };
                    self.skip(failure, &mut report, err)?;
                }
                Event::Cancelled(index) => {
                    output.finish(&targets[index].label, index, out)?;
                    report.cancelled = true;
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "gear task ended abnormally");
            }
        }
        Ok(report)
    }

    fn skip<E: Write>(
        &self,
        failure: GearFailure,
        report: &mut MultiGearReport,
        err: &mut E,
    ) -> io::Result<()> {
        tracing::warn!(gear = %failure.gear_id, reason = %failure.reason, "skipping gear");
        if self.options.mode != OutputMode::Raw {
            writeln!(err, "Unable to run the command on gear {}: {}", failure.label, failure.reason)?;
        }
        report.failed.push(failure);
        Ok(())
    }
}

/// Writes gear output as it arrives.
///
/// In grouped mode a gear's first line is held back until a second line
/// shows the output is a block; a block gets a `=== label` header, repeated
/// whenever another gear wrote in between. A lone line is written with an
/// inline tag once the gear ends.
struct FramedOutput {
    mode: OutputMode,
    lines: HashMap<usize, Vec<String>>,
    last_block: Option<usize>,
}

impl FramedOutput {
    fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            lines: HashMap::new(),
            last_block: None,
        }
    }

    fn line<O: Write, E: Write>(
        &mut self,
        label: &str,
        index: usize,
        line: ShellLine,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<()> {
        let lines = self.lines.entry(index).or_default();
        lines.push(line.text);
        let newest = &lines[lines.len() - 1..];

        match self.mode {
            OutputMode::Raw => match line.stream {
                OutputStream::Stdout => writeln!(out, "{}", newest[0])?,
                OutputStream::Stderr => writeln!(err, "{}", newest[0])?,
            },
            OutputMode::AlwaysPrefix => {
                for framed in format_gear_output(label, newest, self.mode) {
                    writeln!(out, "{framed}")?;
                }
            }
            OutputMode::Grouped => match lines.len() {
                1 => return Ok(()),
                2 => {
                    for framed in format_gear_output(label, lines, self.mode) {
                        writeln!(out, "{framed}")?;
                    }
                    self.last_block = Some(index);
                }
                _ => {
                    if self.last_block != Some(index) {
                        writeln!(out, "=== {label}")?;
                        self.last_block = Some(index);
                    }
                    writeln!(out, "{}", newest[0])?;
                }
            },
        }
        out.flush()
    }

    /// Writes a held-back line and returns everything the gear printed.
    fn finish<O: Write>(&mut self, label: &str, index: usize, out: &mut O) -> io::Result<Vec<String>> {
        let lines = self.lines.remove(&index).unwrap_or_default();
        if self.mode == OutputMode::Grouped && lines.len() == 1 {
            for framed in format_gear_output(label, &lines, self.mode) {
                writeln!(out, "{framed}")?;
            }
        }
        if self.last_block == Some(index) {
            self.last_block = None;
        }
        out.flush()?;
        Ok(lines)
    }
}

async fn run_gear<S: RemoteShell + ?Sized>(
    shell: &S,
    semaphore: &Semaphore,
    target: &GearTarget,
    command: &str,
    index: usize,
    events: &UnboundedSender<Event>,
) -> Result<i32, RemoteShellError> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|e| RemoteShellError::Spawn(e.to_string()))?;
    tracing::debug!(gear = %target.gear_id, destination = %target.destination(), "opening gear session");

    let (lines_tx, mut lines) = mpsc::unbounded_channel();
    let forward = async {
        while let Some(line) = lines.recv().await {
            if events.send(Event::Line(index, line)).is_err() {
                break;
            }
        }
    };
    let (result, ()) = tokio::join!(shell.execute(target, command, lines_tx), forward);
    result
}
