//! Runs a workflow's steps in order, one action thread at a time.
//!
//! Each step gets a [`Progress`] widget driven by the event loop. The action
//! runs on its own thread and talks to the loop only through its
//! [`ProgressHandle`]; the loop polls that slot and the thread's completion
//! once per tick. Steps never overlap.

use std::any::Any;
use std::thread;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::progress::ProgressHandle;
use super::report::RunReport;
use super::step::{FailureReason, StepOutcome, Workflow, WorkflowStep};
use crate::config::{Config, SpinnerStyle};
use crate::error::Result;
use crate::tui::widget::{Message, Progress};
use crate::tui::{EventLoop, Surface};

/// Run behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Keep going after a failed step instead of skipping the rest.
    pub continue_on_error: bool,
    pub spinner: SpinnerStyle,
    /// Show elapsed seconds next to running steps.
    pub show_elapsed: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions::from(&Config::default())
    }
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        Self {
            continue_on_error: config.continue_on_error,
            spinner: config.spinner,
            show_elapsed: config.show_elapsed,
        }
    }
}

/// Where the executor is in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    /// Index of the running step in execution order.
    Running(usize),
    Completed,
    Aborted,
}

#[derive(Debug)]
pub struct Executor {
    options: RunOptions,
    state: RunState,
}

impl Executor {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run every step and report the outcomes.
    ///
    /// A failed step ends the run unless `continue_on_error` is set; the
    /// steps it never reached are Skipped. If the user interrupts, the
    /// running step is marked `Failed(UserCancelled)`, the rest Skipped,
    /// and [`Error::UserCancelled`](crate::Error::UserCancelled) is
    /// returned. The outcomes stay readable on `workflow`.
    pub fn run<S: Surface>(
        &mut self,
        ev: &mut EventLoop<S>,
        workflow: &mut Workflow,
    ) -> Result<RunReport> {
        workflow.reset();
        self.state = RunState::Idle;
        let started = Instant::now();
        info!(
            workflow = workflow.name(),
            steps = workflow.step_count(),
            continue_on_error = self.options.continue_on_error,
            "Starting workflow"
        );

        let mut index = 0;
        let mut abort = None;
        let mut stopped = false;
        'phases: for phase in workflow.phases_mut() {
            if !phase.title().is_empty() && !phase.steps().is_empty() {
                info!(phase = phase.title(), "Running phase");
                let mut heading = Message::heading(format!("Running phase: {}", phase.title()));
                if let Err(e) = ev.show(&mut heading) {
                    abort = Some(e);
                    break 'phases;
                }
            }
            for step in phase.steps_mut() {
                self.state = RunState::Running(index);
                index += 1;
                if let Err(e) = self.run_step(ev, step) {
                    abort = Some(e);
                    break 'phases;
                }
                if step.outcome().is_failed() && !self.options.continue_on_error {
                    warn!(step = step.name(), "Step failed, skipping remaining steps");
                    stopped = true;
                    break 'phases;
                }
            }
        }
        workflow.skip_pending();

        let report = RunReport::from_workflow(workflow, started.elapsed());
        if let Some(e) = abort {
            self.state = RunState::Aborted;
            warn!(workflow = workflow.name(), "Workflow aborted: {}", e);
            return Err(e);
        }
        self.state = if stopped {
            RunState::Aborted
        } else {
            RunState::Completed
        };
        info!(
            workflow = workflow.name(),
            status = %report.status,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "{}",
            report.summary()
        );
        Ok(report)
    }

    fn run_step<S: Surface>(&self, ev: &mut EventLoop<S>, step: &mut WorkflowStep) -> Result<()> {
        step.set_outcome(StepOutcome::Running);
        info!(step = step.name(), "Step started");
        let started = Instant::now();

        let handle = ProgressHandle::new();
        let action = step.action();
        let worker_handle = handle.clone();
        let spawned = thread::Builder::new()
            .name(format!("step:{}", step.name()))
            .spawn(move || action(&worker_handle));
        let mut worker = match spawned {
            Ok(worker) => Some(worker),
            Err(e) => {
                warn!(step = step.name(), "Failed to start action thread: {}", e);
                step.set_outcome(StepOutcome::Failed(FailureReason::Error(e.to_string())));
                return Ok(());
            }
        };

        let mut progress = Progress::new(step.name(), true)
            .with_spinner(self.options.spinner)
            .with_interval(ev.tick_interval())
            .with_elapsed(self.options.show_elapsed);
        let mut finished = None;

        let driven = ev.drive(&mut progress, |progress| {
            if let Some(report) = handle.take_report() {
                progress.apply(report);
            }
            if !worker.as_ref().is_some_and(|w| w.is_finished()) {
                return Ok(());
            }
            let Some(done) = worker.take() else {
                return Ok(());
            };
            if let Some(report) = handle.take_report() {
                progress.apply(report);
            }
            let outcome = match done.join() {
                Ok(Ok(())) => StepOutcome::Succeeded,
                Ok(Err(e)) => StepOutcome::Failed(FailureReason::Error(e.reason().to_string())),
                Err(panic) => StepOutcome::Failed(FailureReason::Error(format!(
                    "action panicked: {}",
                    panic_message(panic.as_ref())
                ))),
            };
            match &outcome {
                StepOutcome::Failed(reason) => progress.fail(reason.to_string()),
                _ => progress.succeed(),
            }
            finished = Some(outcome);
            Ok(())
        });
        step.set_elapsed(started.elapsed());

        match driven {
            Ok(_) => {
                let outcome = finished.unwrap_or_else(|| {
                    StepOutcome::Failed(FailureReason::Error("action did not finish".into()))
                });
                match &outcome {
                    StepOutcome::Failed(reason) => {
                        warn!(step = step.name(), "Step failed: {}", reason)
                    }
                    _ => info!(
                        step = step.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Step succeeded"
                    ),
                }
                step.set_outcome(outcome);
                Ok(())
            }
            Err(e) => {
                handle.cancel();
                let reason = if e.is_cancelled() {
                    FailureReason::UserCancelled
                } else {
                    FailureReason::Error(e.to_string())
                };
                warn!(step = step.name(), "Step interrupted: {}", reason);
                debug!(step = step.name(), "Action thread left to observe cancellation");
                step.set_outcome(StepOutcome::Failed(reason));
                Err(e)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
