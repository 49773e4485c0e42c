//! Workflow structure: steps grouped into phases.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::progress::ProgressHandle;

/// Why a step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The user interrupted the session while the step ran.
    UserCancelled,
    /// The action reported an error.
    Error(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::UserCancelled => write!(f, "cancelled by user"),
            FailureReason::Error(reason) => write!(f, "{}", reason),
        }
    }
}

/// Lifecycle of a step: Pending, then Running, then Succeeded or Failed.
/// Steps a fail-fast run never reaches end up Skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StepOutcome {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed(FailureReason),
    Skipped,
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, StepOutcome::Failed(FailureReason::UserCancelled))
    }

    /// Succeeded, Failed or Skipped.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepOutcome::Succeeded | StepOutcome::Failed(_) | StepOutcome::Skipped
        )
    }

    /// Transitions never go backward.
    pub fn can_become(&self, next: &StepOutcome) -> bool {
        matches!(
            (self, next),
            (StepOutcome::Pending, StepOutcome::Running)
                | (StepOutcome::Pending, StepOutcome::Skipped)
                | (StepOutcome::Running, StepOutcome::Succeeded)
                | (StepOutcome::Running, StepOutcome::Failed(_))
        )
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Pending => write!(f, "pending"),
            StepOutcome::Running => write!(f, "running"),
            StepOutcome::Succeeded => write!(f, "succeeded"),
            StepOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            StepOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Failure returned by a step action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError(String);

impl StepError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StepError {}

impl From<String> for StepError {
    fn from(reason: String) -> Self {
        Self(reason)
    }
}

impl From<&str> for StepError {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

impl From<std::io::Error> for StepError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<anyhow::Error> for StepError {
    fn from(err: anyhow::Error) -> Self {
        Self(format!("{:#}", err))
    }
}

/// What an action returns.
pub type ActionResult = std::result::Result<(), StepError>;

/// Host-supplied unit of work. Runs on its own thread and reports through
/// the handle it is given.
pub type Action = Arc<dyn Fn(&ProgressHandle) -> ActionResult + Send + Sync>;

/// One named unit of work.
pub struct WorkflowStep {
    name: String,
    action: Action,
    outcome: StepOutcome,
    elapsed: Option<Duration>,
}

impl WorkflowStep {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&ProgressHandle) -> ActionResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
            outcome: StepOutcome::Pending,
            elapsed: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outcome(&self) -> &StepOutcome {
        &self.outcome
    }

    /// Wall time the action ran, once it has run.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub(crate) fn action(&self) -> Action {
        Arc::clone(&self.action)
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = Some(elapsed);
    }

    /// Panics in debug builds on a backward transition.
    pub(crate) fn set_outcome(&mut self, next: StepOutcome) {
        debug_assert!(
            self.outcome.can_become(&next),
            "step '{}' cannot go from {} to {}",
            self.name,
            self.outcome,
            next
        );
        self.outcome = next;
    }

    fn reset(&mut self) {
        self.outcome = StepOutcome::Pending;
        self.elapsed = None;
    }
}

impl fmt::Debug for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowStep")
            .field("name", &self.name)
            .field("outcome", &self.outcome)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

/// A titled group of steps.
#[derive(Debug)]
pub struct Phase {
    title: String,
    steps: Vec<WorkflowStep>,
}

impl Phase {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [WorkflowStep] {
        &mut self.steps
    }
}

/// Ordered phases of steps, run phase by phase and step by step.
///
/// ```
/// use cybr_console::workflow::Workflow;
///
/// let mut workflow = Workflow::new("Deploy");
/// workflow
///     .phase("Build")
///     .step("Compile", |_| Ok(()))
///     .phase("Ship")
///     .step("Upload", |progress| {
///         progress.percent(100);
///         Ok(())
///     });
/// assert_eq!(workflow.step_count(), 2);
/// ```
#[derive(Debug)]
pub struct Workflow {
    name: String,
    phases: Vec<Phase>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phases: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a new phase; following steps are added to it.
    pub fn phase(&mut self, title: impl Into<String>) -> &mut Self {
        self.phases.push(Phase::new(title));
        self
    }

    /// Append a step to the current phase. Steps added before any phase
    /// land in an untitled one.
    pub fn step<F>(&mut self, name: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn(&ProgressHandle) -> ActionResult + Send + Sync + 'static,
    {
        if self.phases.is_empty() {
            self.phases.push(Phase::new(""));
        }
        if let Some(phase) = self.phases.last_mut() {
            phase.steps.push(WorkflowStep::new(name, action));
        }
        self
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub(crate) fn phases_mut(&mut self) -> &mut [Phase] {
        &mut self.phases
    }

    /// Every step in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &WorkflowStep> {
        self.phases.iter().flat_map(|p| p.steps.iter())
    }

    pub fn step_count(&self) -> usize {
        self.phases.iter().map(|p| p.steps.len()).sum()
    }

    /// Put every step back to Pending so the workflow can run again.
    pub fn reset(&mut self) {
        for step in self.phases.iter_mut().flat_map(|p| p.steps.iter_mut()) {
            step.reset();
        }
    }

    /// Mark every step that has not started as Skipped.
    pub(crate) fn skip_pending(&mut self) {
        for step in self.phases.iter_mut().flat_map(|p| p.steps.iter_mut()) {
            if step.outcome == StepOutcome::Pending {
                step.set_outcome(StepOutcome::Skipped);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_only_move_forward() {
        use StepOutcome::*;
        let failed = Failed(FailureReason::Error("x".into()));
        assert!(Pending.can_become(&Running));
        assert!(Pending.can_become(&Skipped));
        assert!(Running.can_become(&Succeeded));
        assert!(Running.can_become(&failed));
        assert!(!Succeeded.can_become(&Running));
        assert!(!failed.can_become(&Pending));
        assert!(!Running.can_become(&Pending));
        assert!(!Skipped.can_become(&Running));
        assert!(!Pending.can_become(&Succeeded));
    }

    #[test]
    #[should_panic(expected = "cannot go from")]
    #[cfg(debug_assertions)]
    fn backward_transition_panics_in_debug() {
        let mut step = WorkflowStep::new("a", |_| Ok(()));
        step.set_outcome(StepOutcome::Running);
        step.set_outcome(StepOutcome::Succeeded);
        step.set_outcome(StepOutcome::Running);
    }

    #[test]
    fn builder_groups_steps_by_phase() {
        let mut workflow = Workflow::new("w");
        workflow
            .step("loose", |_| Ok(()))
            .phase("One")
            .step("a", |_| Ok(()))
            .step("b", |_| Ok(()))
            .phase("Two")
            .step("c", |_| Ok(()));
        let titles: Vec<_> = workflow.phases().iter().map(Phase::title).collect();
        assert_eq!(titles, vec!["", "One", "Two"]);
        let names: Vec<_> = workflow.steps().map(WorkflowStep::name).collect();
        assert_eq!(names, vec!["loose", "a", "b", "c"]);
    }

    #[test]
    fn reset_returns_steps_to_pending() {
        let mut workflow = Workflow::new("w");
        workflow.phase("p").step("a", |_| Ok(())).step("b", |_| Ok(()));
        workflow.skip_pending();
        assert!(workflow.steps().all(|s| *s.outcome() == StepOutcome::Skipped));
        workflow.reset();
        assert!(workflow.steps().all(|s| *s.outcome() == StepOutcome::Pending));
    }

    #[test]
    fn step_errors_convert_from_common_types() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(StepError::from(io).reason(), "missing");
        let any = anyhow::anyhow!("inner").context("outer");
        assert_eq!(StepError::from(any).reason(), "outer: inner");
        assert_eq!(StepError::from("plain").to_string(), "plain");
    }

    #[test]
    fn failure_reasons_display() {
        assert_eq!(FailureReason::UserCancelled.to_string(), "cancelled by user");
        assert_eq!(
            StepOutcome::Failed(FailureReason::Error("disk full".into())).to_string(),
            "failed: disk full"
        );
    }
}
