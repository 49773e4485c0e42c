//! Cybr Console - terminal building blocks for multi-step command-line tools
//!
//! This library provides:
//! - A terminal surface with raw-mode guarding and an in-memory stand-in
//! - A render buffer that repaints only the cells that changed
//! - Widgets: spinner/progress, select, checkbox, table, tree, text input,
//!   banner and status messages
//! - An event loop interleaving key input with animation ticks
//! - Workflows of phased steps run on worker threads with live progress,
//!   fail-fast or continue-on-error, and a run report

pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod os;
pub mod tui;
pub mod workflow;

pub use cli::Cli;
pub use config::{Config, ConfigError, SpinnerStyle};
pub use error::{Error, Result};
pub use tui::widget::{
    Banner, Checkbox, Message, MessageLevel, Progress, Select, Table, TextInput, Tree, TreeNode,
    Widget, WidgetResult,
};
pub use tui::{CrosstermSurface, EventLoop, HeadlessSurface, Key, KeySender, RenderBuffer, Surface};
pub use workflow::{
    ActionResult, Executor, FailureReason, ProgressHandle, RunOptions, RunReport, RunStatus,
    StepError, StepOutcome, Workflow, WorkflowManager,
};
