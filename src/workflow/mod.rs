//! Workflows: phases of named steps run one after another, each shown as a
//! progress indicator while its action works on a separate thread.

pub mod executor;
pub mod manager;
pub mod progress;
pub mod report;
pub mod step;

pub use executor::{Executor, RunOptions, RunState};
pub use manager::WorkflowManager;
pub use progress::ProgressHandle;
pub use report::{RunReport, RunStatus, StepRecord};
pub use step::{
    Action, ActionResult, FailureReason, Phase, StepError, StepOutcome, Workflow, WorkflowStep,
};
