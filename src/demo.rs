//! Built-in demonstration: a three-phase workflow and a tour of the widgets.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info};

use crate::error::Result;
use crate::tui::widget::{Checkbox, Message, Select, Table, TextInput, Tree, WidgetResult};
use crate::tui::{EventLoop, Surface};
use crate::workflow::{ActionResult, ProgressHandle, StepError, WorkflowManager};

/// Name the demo workflow is registered under.
pub const DEMO_WORKFLOW: &str = "Example Workflow";

/// A simulated step: `units` of work spread over `duration`.
#[derive(Debug, Clone, Copy)]
struct Simulated {
    name: &'static str,
    units: u32,
    duration: Duration,
    detail: Option<&'static str>,
}

const PHASES: &[(&str, &[Simulated])] = &[
    (
        "Initialization",
        &[
            Simulated::new("Setup environment", 50, 1000, None),
            Simulated::new("Create directories", 30, 1000, Some("/tmp/example")),
        ],
    ),
    (
        "Processing",
        &[
            Simulated::new("Process data", 100, 2000, Some("data.csv")),
            Simulated::new("Generate report", 75, 1500, None),
        ],
    ),
    (
        "Finalization",
        &[
            Simulated::new("Cleanup", 40, 1000, None),
            Simulated::new("Send notification", 25, 1000, Some("user@example.com")),
        ],
    ),
];

impl Simulated {
    const fn new(name: &'static str, units: u32, millis: u64, detail: Option<&'static str>) -> Self {
        Self {
            name,
            units,
            duration: Duration::from_millis(millis),
            detail,
        }
    }

    /// Work through the units, reporting after each one. With `fail` set
    /// the step gives up halfway.
    fn run(&self, progress: &ProgressHandle, fail: bool, pace: f64) -> ActionResult {
        let per_unit = self.duration.mul_f64(pace) / self.units.max(1);
        let message = match self.detail {
            Some(detail) => format!("{} ({})", self.name, detail),
            None => self.name.to_string(),
        };
        for done in 1..=self.units {
            if !progress.wait(per_unit) {
                debug!(step = self.name, "Cancelled mid-step");
                return Ok(());
            }
            if fail && done * 2 >= self.units {
                return Err(StepError::new(format!(
                    "{} failed at {}/{}",
                    self.name, done, self.units
                )));
            }
            let percent = (done * 100 / self.units.max(1)) as u8;
            progress.report(percent, format!("{} {}/{}", message, done, self.units));
        }
        Ok(())
    }
}

/// Register the demo workflow. `fail_step` forces the named step to fail;
/// `pace` scales every step's duration (1.0 is real time).
pub fn demo_workflow(manager: &mut WorkflowManager, fail_step: Option<&str>, pace: f64) {
    let workflow = manager.create(DEMO_WORKFLOW);
    for (title, steps) in PHASES {
        workflow.phase(*title);
        for sim in steps.iter().copied() {
            let fail = fail_step == Some(sim.name);
            workflow.step(sim.name, move |progress| sim.run(progress, fail, pace));
        }
    }
}

/// Walk through the interactive widgets, echoing each result below it.
/// Stops early with [`Error::UserCancelled`](crate::Error::UserCancelled)
/// on Ctrl-C; Esc on a single prompt just moves on.
pub fn showcase<S: Surface>(ev: &mut EventLoop<S>) -> Result<()> {
    let mut select = Select::new("Choose an option:", ["Option 1", "Option 2", "Option 3"])?;
    let result = ev.run(&mut select)?;
    echo(ev, &result)?;

    let mut checkbox = Checkbox::new("Select items:", ["Item 1", "Item 2", "Item 3", "Item 4"])?;
    let result = ev.run(&mut checkbox)?;
    echo(ev, &result)?;

    let mut table = Table::new(
        ["Name", "Age", "City"],
        [
            ["Alice", "30", "New York"],
            ["Bob", "25", "Los Angeles"],
            ["Charlie", "35", "Chicago"],
        ],
    )?
    .with_title("Sample Data");
    ev.show(&mut table)?;

    let mut tree = Tree::from_json("Project Structure", &sample_project());
    ev.show(&mut tree)?;

    let mut input = TextInput::new("Enter your thoughts on CybrConsole:").multiline();
    let result = ev.run(&mut input)?;
    echo(ev, &result)?;

    info!("Showcase finished");
    Ok(())
}

/// Sample layout shown by the tree widget.
pub fn sample_project() -> serde_json::Value {
    json!({
        "src": {
            "main.py": null,
            "utils": ["helper.py", "config.py"],
        },
        "tests": ["test_main.py", "test_utils.py"],
        "docs": ["README.md", "CONTRIBUTING.md"],
    })
}

fn echo<S: Surface>(ev: &mut EventLoop<S>, result: &WidgetResult) -> Result<()> {
    let mut line = match result {
        WidgetResult::Selected { label, .. } => Message::info(format!("You selected: {}", label)),
        WidgetResult::Checked { labels, .. } if labels.is_empty() => {
            Message::info("You selected: nothing")
        }
        WidgetResult::Checked { labels, .. } => {
            Message::info(format!("You selected: {}", labels.join(", ")))
        }
        WidgetResult::Text(text) if text.trim().is_empty() => Message::info("No thoughts shared"),
        WidgetResult::Text(text) => Message::success(format!("Thanks! You wrote: {}", text)),
        WidgetResult::Cancelled => Message::warning("Skipped"),
        WidgetResult::TreePath(_) | WidgetResult::Done => return Ok(()),
    };
    ev.show(&mut line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::{HeadlessSurface, Key};
    use crate::workflow::{FailureReason, RunOptions, RunStatus, StepOutcome};

    fn event_loop() -> EventLoop<HeadlessSurface> {
        EventLoop::new(HeadlessSurface::new(60, 80), Duration::from_millis(2)).unwrap()
    }

    #[test]
    fn demo_has_three_phases_of_two() {
        let mut manager = WorkflowManager::new();
        demo_workflow(&mut manager, None, 0.0);
        let workflow = manager.get(DEMO_WORKFLOW).unwrap();
        let titles: Vec<_> = workflow.phases().iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["Initialization", "Processing", "Finalization"]);
        assert!(workflow.phases().iter().all(|p| p.steps().len() == 2));
    }

    #[test]
    fn demo_runs_to_success() {
        let mut manager = WorkflowManager::new();
        demo_workflow(&mut manager, None, 0.0);
        let mut ev = event_loop();
        let report = manager
            .run(DEMO_WORKFLOW, &mut ev, RunOptions::default())
            .unwrap();
        assert_eq!(report.status, RunStatus::Succeeded);
        assert!(ev.surface().screen_text().contains("✔ Send notification"));
    }

    #[test]
    fn forced_failure_skips_the_rest() {
        let mut manager = WorkflowManager::new();
        demo_workflow(&mut manager, Some("Process data"), 0.0);
        let mut ev = event_loop();
        let report = manager
            .run(DEMO_WORKFLOW, &mut ev, RunOptions::default())
            .unwrap();
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(
            report.outcome_of("Process data"),
            Some(&StepOutcome::Failed(FailureReason::Error(
                "Process data failed at 50/100".into()
            )))
        );
        assert_eq!(report.outcome_of("Cleanup"), Some(&StepOutcome::Skipped));
    }

    #[test]
    fn showcase_echoes_choices() {
        let mut ev = event_loop();
        let keys = ev.surface().key_sender();
        keys.send(Key::Down);
        keys.send(Key::Enter);
        keys.send(Key::Space);
        keys.send(Key::Enter);
        keys.send_text("great");
        keys.send(Key::Submit);
        showcase(&mut ev).unwrap();

        let screen = ev.surface().screen_text();
        assert!(screen.contains("You selected: Option 2"));
        assert!(screen.contains("You selected: Item 1"));
        assert!(screen.contains("Sample Data"));
        assert!(screen.contains("Project Structure"));
        assert!(screen.contains("main.py"));
        assert!(screen.contains("Thanks! You wrote: great"));
    }

    #[test]
    fn showcase_stops_on_interrupt() {
        let mut ev = event_loop();
        ev.surface().key_sender().send(Key::Interrupt);
        assert!(showcase(&mut ev).unwrap_err().is_cancelled());
    }
}
