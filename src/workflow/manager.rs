//! Named workflows.

use tracing::info;

use super::executor::{Executor, RunOptions};
use super::report::RunReport;
use super::step::Workflow;
use crate::error::{Error, Result};
use crate::tui::{EventLoop, Surface};

/// Registry of workflows by name, in creation order.
#[derive(Debug, Default)]
pub struct WorkflowManager {
    workflows: Vec<Workflow>,
}

impl WorkflowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty workflow, replacing any with the same name.
    pub fn create(&mut self, name: impl Into<String>) -> &mut Workflow {
        let name = name.into();
        let index = match self.workflows.iter().position(|w| w.name() == name) {
            Some(index) => {
                info!(workflow = %name, "Replacing existing workflow");
                self.workflows[index] = Workflow::new(name);
                index
            }
            None => {
                self.workflows.push(Workflow::new(name));
                self.workflows.len() - 1
            }
        };
        &mut self.workflows[index]
    }

    pub fn get(&self, name: &str) -> Option<&Workflow> {
        self.workflows.iter().find(|w| w.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Workflow> {
        self.workflows.iter_mut().find(|w| w.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.workflows.iter().map(Workflow::name).collect()
    }

    /// Run a registered workflow.
    pub fn run<S: Surface>(
        &mut self,
        name: &str,
        ev: &mut EventLoop<S>,
        options: RunOptions,
    ) -> Result<RunReport> {
        let workflow = self
            .get_mut(name)
            .ok_or_else(|| Error::WorkflowNotFound(name.to_string()))?;
        Executor::new(options).run(ev, workflow)
    }
}
