//! Terminal UI engine
//!
//! Widgets render into [`Frame`]s; the [`RenderBuffer`] diffs each frame
//! against what is already on screen and paints the difference through a
//! [`Surface`]; the [`EventLoop`] interleaves key input with animation ticks.

pub mod buffer;
pub mod event;
pub mod event_loop;
pub mod frame;
pub mod headless;
pub mod style;
pub mod terminal;
pub mod theme;
pub mod widget;

pub use buffer::{CommitStats, RenderBuffer};
pub use event::Key;
pub use event_loop::EventLoop;
pub use frame::{Frame, Span};
pub use headless::{HeadlessSurface, KeySender, SurfaceOp};
pub use style::{Cell, Style};
pub use terminal::{CrosstermSurface, Surface, TermSize};
pub use theme::{Theme, theme};
pub use widget::{
    Banner, Checkbox, InputOutcome, Message, MessageLevel, NodeId, Percent, Progress,
    ProgressReport, ProgressStatus, Select, Selectable, Table, TextInput, Tree, TreeNode, Widget,
    WidgetResult,
};
