//! End-to-end workflow runs against the in-memory terminal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cybr_console::{
    Error, EventLoop, FailureReason, HeadlessSurface, Key, RunOptions, RunStatus, StepError,
    StepOutcome, WorkflowManager,
};

fn event_loop() -> EventLoop<HeadlessSurface> {
    EventLoop::new(HeadlessSurface::new(40, 80), Duration::from_millis(5)).unwrap()
}

fn outcomes(manager: &WorkflowManager, name: &str) -> Vec<StepOutcome> {
    manager
        .get(name)
        .unwrap()
        .steps()
        .map(|s| s.outcome().clone())
        .collect()
}

#[test]
fn fail_fast_stops_at_first_failure() {
    let mut manager = WorkflowManager::new();
    let ran_c = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran_c);
    manager
        .create("w")
        .phase("Only")
        .step("A", |_| Ok(()))
        .step("B", |_| Err(StepError::new("disk full")))
        .step("C", move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

    let mut ev = event_loop();
    let report = manager.run("w", &mut ev, RunOptions::default()).unwrap();

    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(
        outcomes(&manager, "w"),
        vec![
            StepOutcome::Succeeded,
            StepOutcome::Failed(FailureReason::Error("disk full".into())),
            StepOutcome::Skipped,
        ]
    );
    assert!(!ran_c.load(Ordering::SeqCst));

    let screen = ev.surface().screen_text();
    assert!(screen.contains("✔ A"));
    assert!(screen.contains("✖ B: disk full"));
    assert!(!screen.contains("C"));
}

#[test]
fn continue_on_error_runs_remaining_steps() {
    let mut manager = WorkflowManager::new();
    manager
        .create("w")
        .step("A", |_| Ok(()))
        .step("B", |_| Err(StepError::new("disk full")))
        .step("C", |_| Ok(()));

    let mut ev = event_loop();
    let options = RunOptions {
        continue_on_error: true,
        ..RunOptions::default()
    };
    let report = manager.run("w", &mut ev, options).unwrap();

    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.outcome_of("C"), Some(&StepOutcome::Succeeded));
    assert_eq!(report.summary(), "2 succeeded, 1 failed, 0 skipped");
    assert_eq!(report.failures().len(), 1);
}

fn interrupt_during_second_step(continue_on_error: bool) {
    let mut manager = WorkflowManager::new();
    let mut ev = event_loop();
    let keys = ev.surface().key_sender();
    let ran_c = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran_c);
    manager
        .create("w")
        .step("A", |_| Ok(()))
        .step("B", move |progress| {
            progress.report(30, "working");
            keys.send(Key::Interrupt);
            progress.wait(Duration::from_secs(10));
            Ok(())
        })
        .step("C", move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

    let options = RunOptions {
        continue_on_error,
        ..RunOptions::default()
    };
    let err = manager.run("w", &mut ev, options).unwrap_err();

    assert!(matches!(err, Error::UserCancelled));
    assert_eq!(
        outcomes(&manager, "w"),
        vec![
            StepOutcome::Succeeded,
            StepOutcome::Failed(FailureReason::UserCancelled),
            StepOutcome::Skipped,
        ]
    );
    assert!(!ran_c.load(Ordering::SeqCst));
    assert!(!ev.surface().is_active());
    assert_eq!(ev.surface().exit_count(), 1);
}

#[test]
fn interrupt_cancels_running_step_and_skips_the_rest() {
    interrupt_during_second_step(false);
}

#[test]
fn interrupt_ignores_continue_on_error() {
    interrupt_during_second_step(true);
}

#[test]
fn rerunning_by_name_starts_fresh() {
    let mut manager = WorkflowManager::new();
    manager.create("w").step("A", |_| Ok(()));
    let mut ev = event_loop();
    manager.run("w", &mut ev, RunOptions::default()).unwrap();
    let report = manager.run("w", &mut ev, RunOptions::default()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.steps.len(), 1);
}

#[test]
fn unknown_workflow_is_an_error() {
    let mut manager = WorkflowManager::new();
    let mut ev = event_loop();
    let err = manager
        .run("missing", &mut ev, RunOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::WorkflowNotFound(name) if name == "missing"));
}
