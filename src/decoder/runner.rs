//! Decoder process execution

use std::path::PathBuf;
use std::process::{Child, ExitStatus};
use std::time::Instant;

use super::command::{ChannelSelection, DecodeCommand};
use crate::error::{AtmosDecodeError, Result};

/// One decoder invocation producing one output file
#[derive(Debug, Clone)]
pub struct DecodeJob {
    pub output: PathBuf,
    pub channel: ChannelSelection,
    pub command: DecodeCommand,
}

#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub output: PathBuf,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub elapsed_secs: f64,
}

impl JobOutcome {
    fn new(job: &DecodeJob, status: ExitStatus, started: Instant) -> Self {
        let outcome = Self {
            output: job.output.clone(),
            exit_code: status.code(),
            success: status.success(),
            elapsed_secs: started.elapsed().as_secs_f64(),
        };
        if !outcome.success {
            log::warn!(
                "Decoder exited with {} for {}",
                outcome.exit_code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c)),
                outcome.output.display()
            );
        }
        outcome
    }
}

fn spawn(job: &DecodeJob) -> Result<Child> {
    log::debug!("Running: {}", job.command);
    job.command
        .to_command()
        .spawn()
        .map_err(|source| AtmosDecodeError::Spawn { program: job.command.program.clone(), source })
}

/// Run jobs one after another, waiting for each to finish.
pub fn run_sequential(jobs: &[DecodeJob]) -> Result<Vec<JobOutcome>> {
    let mut outcomes = Vec::with_capacity(jobs.len());
    for job in jobs {
        println!("Decoding \"{}\"", job.output.display());
        let started = Instant::now();
        let status = spawn(job)?.wait()?;
        outcomes.push(JobOutcome::new(job, status, started));
    }
    Ok(outcomes)
}

/// Launch every job at once, then wait on all of them.
///
/// Every started process is waited on before returning. A launch failure
/// takes precedence over a failed wait; otherwise the first wait error is
/// returned.
pub fn run_concurrent(jobs: &[DecodeJob]) -> Result<Vec<JobOutcome>> {
    let started = Instant::now();
    let mut children = Vec::with_capacity(jobs.len());
    let mut spawn_error = None;

    for job in jobs {
        match spawn(job) {
            Ok(child) => children.push((job, child)),
            Err(e) => {
                spawn_error = Some(e);
                break;
            }
        }
    }
    log::info!("Started {} decoder process(es)", children.len());

    let mut outcomes = Vec::with_capacity(children.len());
    let mut wait_error = None;
    for (job, mut child) in children {
        match child.wait() {
            Ok(status) => outcomes.push(JobOutcome::new(job, status, started)),
            Err(e) => {
                log::warn!("Failed to wait on decoder for {}: {}", job.output.display(), e);
                wait_error.get_or_insert(AtmosDecodeError::Io(e));
            }
        }
    }

    match spawn_error.or(wait_error) {
        Some(e) => Err(e),
        None => Ok(outcomes),
    }
}
