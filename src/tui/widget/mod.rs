//! Widgets: self-contained elements that produce frames and may take input.
//!
//! Every widget satisfies the same small protocol so the event loop can
//! drive any of them: [`Widget::tick`] renders the current state,
//! [`Widget::handle_input`] consumes a key, and [`Widget::is_complete`]
//! tells the loop when to stop.
//!
//! Passive widgets ([`Table`], [`Banner`], [`Message`], a display-mode
//! [`Tree`]) ignore input. [`Progress`] also ignores input and is completed
//! by whoever owns it.

pub mod banner;
pub mod checkbox;
pub mod progress;
pub mod select;
pub mod selection;
pub mod table;
pub mod text_input;
pub mod tree;

pub use banner::{Banner, Message, MessageLevel};
pub use checkbox::Checkbox;
pub use progress::{Percent, Progress, ProgressReport, ProgressStatus};
pub use select::Select;
pub use selection::Selectable;
pub use table::Table;
pub use text_input::TextInput;
pub use tree::{NodeId, Tree, TreeNode};

use std::time::Duration;

use super::event::Key;
use super::frame::Frame;
use super::terminal::TermSize;

/// Value a completed widget hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetResult {
    /// Select: the confirmed option.
    Selected { index: usize, label: String },
    /// Checkbox: selected options in ascending index order.
    Checked {
        indices: Vec<usize>,
        labels: Vec<String>,
    },
    /// Text input: the submitted text.
    Text(String),
    /// Tree browse mode: child indices from the root to the chosen node.
    TreePath(Vec<usize>),
    /// The user backed out with the cancel key.
    Cancelled,
    /// A passive widget or progress indicator finished.
    Done,
}

impl WidgetResult {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WidgetResult::Cancelled)
    }
}

/// What a key did to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    StillActive,
    Completed(WidgetResult),
}

/// The protocol shared by every widget.
pub trait Widget {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Advance animation by `elapsed` and render the current state to fit
    /// in `area`.
    fn tick(&mut self, elapsed: Duration, area: TermSize) -> Frame;

    /// Consume one key. Passive widgets keep the default no-op.
    fn handle_input(&mut self, _key: Key) -> InputOutcome {
        InputOutcome::StillActive
    }

    fn is_complete(&self) -> bool;
}
