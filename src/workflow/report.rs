//! Run results.

use std::fmt;
use std::time::Duration;

use super::step::{FailureReason, StepOutcome, Workflow};
use crate::error::Error;

/// Aggregate result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every step succeeded.
    Succeeded,
    /// At least one step failed.
    Failed,
    /// The user interrupted the run.
    Cancelled,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Succeeded => write!(f, "succeeded"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One step as it stood at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub phase: String,
    pub name: String,
    pub outcome: StepOutcome,
    pub elapsed: Option<Duration>,
}

/// Everything the host needs after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub workflow: String,
    pub status: RunStatus,
    pub steps: Vec<StepRecord>,
    pub elapsed: Duration,
}

impl RunReport {
    /// Snapshot a workflow's step outcomes.
    pub fn from_workflow(workflow: &Workflow, elapsed: Duration) -> Self {
        let steps: Vec<StepRecord> = workflow
            .phases()
            .iter()
            .flat_map(|phase| {
                phase.steps().iter().map(|step| StepRecord {
                    phase: phase.title().to_string(),
                    name: step.name().to_string(),
                    outcome: step.outcome().clone(),
                    elapsed: step.elapsed(),
                })
            })
            .collect();

        Self {
            workflow: workflow.name().to_string(),
            status: aggregate(&steps),
            steps,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    /// Failed steps in run order.
    pub fn failures(&self) -> Vec<&StepRecord> {
        self.steps.iter().filter(|s| s.outcome.is_failed()).collect()
    }

    pub fn first_failure(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.outcome.is_failed())
    }

    /// The first failure as an error, if the run did not succeed.
    pub fn error(&self) -> Option<Error> {
        let failed = self.first_failure()?;
        Some(match &failed.outcome {
            StepOutcome::Failed(FailureReason::UserCancelled) => Error::UserCancelled,
            outcome => Error::StepFailed {
                step: failed.name.clone(),
                reason: match outcome {
                    StepOutcome::Failed(FailureReason::Error(reason)) => reason.clone(),
                    other => other.to_string(),
                },
            },
        })
    }

    pub fn outcome_of(&self, name: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.name == name).map(|s| &s.outcome)
    }

    /// Process exit code: 0 success, 1 failure, 130 interrupted.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Succeeded => 0,
            RunStatus::Failed => 1,
            RunStatus::Cancelled => 130,
        }
    }

    /// One-line tally, e.g. "3 succeeded, 1 failed, 2 skipped".
    pub fn summary(&self) -> String {
        let count = |pred: fn(&StepOutcome) -> bool| {
            self.steps.iter().filter(|s| pred(&s.outcome)).count()
        };
        format!(
            "{} succeeded, {} failed, {} skipped",
            count(|o| *o == StepOutcome::Succeeded),
            count(StepOutcome::is_failed),
            count(|o| *o == StepOutcome::Skipped),
        )
    }
}

/// Cancelled wins over Failed; Succeeded needs every step to have succeeded.
fn aggregate(steps: &[StepRecord]) -> RunStatus {
    if steps.iter().any(|s| s.outcome.is_cancelled()) {
        RunStatus::Cancelled
    } else if steps.iter().all(|s| s.outcome == StepOutcome::Succeeded) {
        RunStatus::Succeeded
    } else {
        RunStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: &[StepOutcome]) -> RunReport {
        let steps: Vec<StepRecord> = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| StepRecord {
                phase: "p".into(),
                name: format!("s{}", i),
                outcome: outcome.clone(),
                elapsed: None,
            })
            .collect();
        RunReport {
            workflow: "w".into(),
            status: aggregate(&steps),
            steps,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn exit_codes_follow_status() {
        assert_eq!(report(&[StepOutcome::Succeeded]).exit_code(), 0);
        let failed = StepOutcome::Failed(FailureReason::Error("x".into()));
        assert_eq!(report(&[failed, StepOutcome::Skipped]).exit_code(), 1);
        let cancelled = StepOutcome::Failed(FailureReason::UserCancelled);
        assert_eq!(report(&[cancelled]).exit_code(), 130);
    }

    #[test]
    fn summary_counts_outcomes() {
        let failed = StepOutcome::Failed(FailureReason::Error("x".into()));
        let r = report(&[
            StepOutcome::Succeeded,
            failed,
            StepOutcome::Skipped,
            StepOutcome::Skipped,
        ]);
        assert_eq!(r.summary(), "1 succeeded, 1 failed, 2 skipped");
        assert_eq!(r.first_failure().map(|s| s.name.as_str()), Some("s1"));
        assert_eq!(
            r.error().map(|e| e.to_string()).as_deref(),
            Some("Step 's1' failed: x")
        );
    }

    #[test]
    fn snapshot_of_fresh_workflow_is_not_success() {
        let mut workflow = Workflow::new("w");
        workflow.phase("p").step("a", |_| Ok(()));
        let r = RunReport::from_workflow(&workflow, Duration::ZERO);
        assert_eq!(r.status, RunStatus::Failed);
        assert_eq!(r.outcome_of("a"), Some(&StepOutcome::Pending));
        assert_eq!(r.steps[0].phase, "p");
    }

    #[test]
    fn empty_workflow_succeeds() {
        let r = RunReport::from_workflow(&Workflow::new("w"), Duration::ZERO);
        assert!(r.is_success());
        assert!(r.error().is_none());
    }
}
