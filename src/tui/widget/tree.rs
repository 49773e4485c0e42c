//! Tree view backed by a node arena.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]; the root
//! is always id 0. A tree is render-only unless [`Tree::browse`] switches on
//! keyboard navigation.

use std::collections::HashSet;
use std::time::Duration;

use serde_json::Value;

use super::selection::{Selectable, Viewport};
use super::{InputOutcome, Widget, WidgetResult};
use crate::tui::event::Key;
use crate::tui::frame::{Frame, Span};
use crate::tui::terminal::TermSize;
use crate::tui::theme::theme;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Owned, nested description of a tree used to build a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add leaves with the given labels.
    pub fn leaves<I, T>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.children.extend(labels.into_iter().map(TreeNode::new));
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A visible row: the node plus the guide drawn before its label.
struct Row {
    id: NodeId,
    guide: String,
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    expanded: HashSet<NodeId>,
    cursor: NodeId,
    viewport: Viewport,
    browsing: bool,
    result: Option<WidgetResult>,
}

const ROOT: NodeId = NodeId(0);

impl Tree {
    /// Every branch starts expanded.
    pub fn new(root: TreeNode) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            expanded: HashSet::new(),
            cursor: ROOT,
            viewport: Viewport::default(),
            browsing: false,
            result: None,
        };
        tree.insert(root, None);
        tree.expanded = (0..tree.nodes.len())
            .map(NodeId)
            .filter(|&id| !tree.node(id).children.is_empty())
            .collect();
        tree
    }

    /// Objects become branches named by key, array elements attach to the
    /// enclosing parent, scalars become leaves. A `null` value adds nothing
    /// under its key.
    pub fn from_json(title: impl Into<String>, data: &Value) -> Self {
        let mut root = TreeNode::new(title);
        add_json(&mut root, data);
        Self::new(root)
    }

    /// Enable keyboard navigation. The tree then completes on Enter or Esc.
    pub fn browse(mut self) -> Self {
        self.browsing = true;
        self
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.node(id).label
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn cursor_node(&self) -> NodeId {
        self.cursor
    }

    /// Look up a node by child indices from the root.
    pub fn find(&self, path: &[usize]) -> Option<NodeId> {
        path.iter()
            .try_fold(ROOT, |id, &i| self.node(id).children.get(i).copied())
    }

    /// Child indices from the root to the cursor node.
    pub fn cursor_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut id = self.cursor;
        while let Some(parent) = self.node(id).parent {
            let index = self
                .node(parent)
                .children
                .iter()
                .position(|&c| c == id)
                .unwrap_or_default();
            path.push(index);
            id = parent;
        }
        path.reverse();
        path
    }

    /// Nodes in display order, skipping descendants of collapsed branches.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        self.rows().into_iter().map(|row| row.id).collect()
    }

    pub fn expand(&mut self, id: NodeId) {
        if !self.node(id).children.is_empty() {
            self.expanded.insert(id);
        }
    }

    /// Collapse a branch. A cursor hidden by the collapse moves onto it.
    pub fn collapse(&mut self, id: NodeId) {
        self.expanded.remove(&id);
        if self.is_ancestor(id, self.cursor) {
            self.cursor = id;
        }
    }

    pub fn toggle(&mut self, id: NodeId) {
        if self.is_expanded(id) {
            self.collapse(id);
        } else {
            self.expand(id);
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn insert(&mut self, node: TreeNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label: node.label,
            parent,
            children: Vec::new(),
        });
        for child in node.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        while let Some(parent) = self.node(id).parent {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    fn rows(&self) -> Vec<Row> {
        let mut rows = vec![Row {
            id: ROOT,
            guide: String::new(),
        }];
        if self.is_expanded(ROOT) {
            self.push_rows(ROOT, "", &mut rows);
        }
        rows
    }

    fn push_rows(&self, id: NodeId, prefix: &str, rows: &mut Vec<Row>) {
        let children = &self.node(id).children;
        for (i, &child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            rows.push(Row {
                id: child,
                guide: format!("{}{}", prefix, if last { "└── " } else { "├── " }),
            });
            if self.is_expanded(child) {
                let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
                self.push_rows(child, &nested, rows);
            }
        }
    }

    fn complete(&mut self, result: WidgetResult) -> InputOutcome {
        self.result = Some(result.clone());
        InputOutcome::Completed(result)
    }
}

fn add_json(parent: &mut TreeNode, data: &Value) {
    match data {
        Value::Object(map) => {
            for (key, value) in map {
                let mut node = TreeNode::new(key.clone());
                add_json(&mut node, value);
                parent.children.push(node);
            }
        }
        Value::Array(items) => {
            for item in items {
                add_json(parent, item);
            }
        }
        Value::Null => {}
        Value::String(s) => parent.children.push(TreeNode::new(s.clone())),
        other => parent.children.push(TreeNode::new(other.to_string())),
    }
}

/// Cursor moves over visible rows.
impl Selectable for Tree {
    fn count(&self) -> usize {
        self.visible_nodes().len()
    }

    fn cursor(&self) -> usize {
        self.visible_nodes()
            .iter()
            .position(|&id| id == self.cursor)
            .unwrap_or_default()
    }

    fn set_cursor(&mut self, index: usize) {
        if let Some(&id) = self.visible_nodes().get(index) {
            self.cursor = id;
        }
    }
}

impl Widget for Tree {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn tick(&mut self, _elapsed: Duration, area: TermSize) -> Frame {
        let show_cursor = self.browsing && self.result.is_none();
        let mut frame = Frame::new(area.cols);
        let mut rows = self.rows();
        if show_cursor {
            let cursor = rows.iter().position(|r| r.id == self.cursor).unwrap_or_default();
            let window = self.viewport.scroll(cursor, rows.len(), area.rows as usize);
            rows.truncate(window.end);
            rows.drain(..window.start);
        }
        for row in rows {
            let node = self.node(row.id);
            let style = if show_cursor && row.id == self.cursor {
                theme().cursor()
            } else if row.id == ROOT {
                theme().title()
            } else if node.children.is_empty() {
                theme().leaf()
            } else {
                theme().label()
            };

            let mut spans = Vec::new();
            if show_cursor {
                let pointer = if row.id == self.cursor { "❯ " } else { "  " };
                spans.push(Span::styled(pointer, theme().cursor()));
            }
            spans.push(Span::styled(row.guide, theme().border()));
            spans.push(Span::styled(&node.label, style));
            if !node.children.is_empty() && !self.is_expanded(row.id) {
                spans.push(Span::styled(
                    format!(" ▸ {}", node.children.len()),
                    theme().hint(),
                ));
            }
            frame.push_spans(&spans);
        }
        frame
    }

    fn handle_input(&mut self, key: Key) -> InputOutcome {
        if !self.browsing || self.result.is_some() {
            return InputOutcome::StillActive;
        }
        match key {
            k if k.is_up() => self.prev(),
            k if k.is_down() => self.next(),
            Key::Space => self.toggle(self.cursor),
            Key::Right | Key::Char('l') => self.expand(self.cursor),
            Key::Left | Key::Char('h') => {
                if self.is_expanded(self.cursor) {
                    self.collapse(self.cursor);
                } else if let Some(parent) = self.parent(self.cursor) {
                    self.cursor = parent;
                }
            }
            Key::Enter => return self.complete(WidgetResult::TreePath(self.cursor_path())),
            Key::Escape => return self.complete(WidgetResult::Cancelled),
            _ => {}
        }
        InputOutcome::StillActive
    }

    fn is_complete(&self) -> bool {
        !self.browsing || self.result.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project() -> Tree {
        Tree::from_json(
            "Project Structure",
            &json!({
                "src": {
                    "main.rs": null,
                    "utils": ["helper.rs", "config.rs"]
                },
                "tests": ["test_main.rs", "test_utils.rs"],
                "docs": ["README.md", "CONTRIBUTING.md"]
            }),
        )
    }

    #[test]
    fn renders_guides() {
        let mut tree = project();
        assert_eq!(
            tree.tick(Duration::ZERO, TermSize::new(24, 80)).to_lines(),
            vec![
                "Project Structure",
                "├── src",
                "│   ├── main.rs",
                "│   └── utils",
                "│       ├── helper.rs",
                "│       └── config.rs",
                "├── tests",
                "│   ├── test_main.rs",
                "│   └── test_utils.rs",
                "└── docs",
                "    ├── README.md",
                "    └── CONTRIBUTING.md",
            ]
        );
    }

    #[test]
    fn builder_nodes_land_in_arena_order() {
        let tree = Tree::new(
            TreeNode::new("root")
                .child(TreeNode::new("a").leaves(["a1", "a2"]))
                .child(TreeNode::new("b")),
        );
        assert_eq!(tree.len(), 5);
        let a2 = tree.find(&[0, 1]).unwrap();
        assert_eq!(tree.label(a2), "a2");
        assert_eq!(tree.parent(a2), tree.find(&[0]));
        assert!(tree.find(&[1, 0]).is_none());
    }

    #[test]
    fn json_scalars_become_leaves() {
        let tree = Tree::from_json("t", &json!({"n": 3, "flag": true, "list": [1, null]}));
        let n = tree.find(&[0]).unwrap();
        assert_eq!(tree.label(tree.children(n)[0]), "3");
        let list = tree.find(&[2]).unwrap();
        assert_eq!(tree.children(list).len(), 1);
    }

    #[test]
    fn display_mode_ignores_input() {
        let mut tree = project();
        assert!(tree.is_complete());
        assert_eq!(tree.handle_input(Key::Down), InputOutcome::StillActive);
        assert_eq!(tree.cursor_node(), tree.root());
    }

    #[test]
    fn collapse_hides_descendants() {
        let mut tree = project();
        let src = tree.find(&[0]).unwrap();
        assert_eq!(tree.visible_nodes().len(), 12);
        tree.collapse(src);
        assert_eq!(tree.visible_nodes().len(), 8);
        let lines = tree.tick(Duration::ZERO, TermSize::new(24, 80)).to_lines();
        assert_eq!(lines[1], "├── src ▸ 2");
    }

    #[test]
    fn browsing_scrolls_rows_to_the_cursor() {
        let mut tree = project().browse();
        tree.handle_input(Key::Up);
        let lines = tree.tick(Duration::ZERO, TermSize::new(4, 80)).to_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "❯     └── CONTRIBUTING.md");

        // display mode leaves clipping to the render buffer
        let mut shown = project();
        assert_eq!(shown.tick(Duration::ZERO, TermSize::new(4, 80)).height(), 12);
    }

    #[test]
    fn toggle_twice_restores_visible_rows() {
        let mut tree = project();
        let before = tree.visible_nodes();
        for id in before.clone() {
            tree.toggle(id);
            tree.toggle(id);
            assert_eq!(tree.visible_nodes(), before);
        }
    }

    #[test]
    fn browse_navigates_and_returns_path() {
        let mut tree = project().browse();
        assert!(!tree.is_complete());
        for _ in 0..3 {
            tree.handle_input(Key::Down);
        }
        assert_eq!(tree.label(tree.cursor_node()), "utils");
        assert_eq!(tree.cursor_path(), vec![0, 1]);
        let outcome = tree.handle_input(Key::Enter);
        assert_eq!(
            outcome,
            InputOutcome::Completed(WidgetResult::TreePath(vec![0, 1]))
        );
        assert!(tree.is_complete());
    }

    #[test]
    fn left_collapses_then_climbs() {
        let mut tree = project().browse();
        tree.handle_input(Key::Down);
        tree.handle_input(Key::Left);
        assert!(!tree.is_expanded(tree.cursor_node()));
        tree.handle_input(Key::Left);
        assert_eq!(tree.cursor_node(), tree.root());
    }

    #[test]
    fn collapsing_an_ancestor_pulls_cursor_up() {
        let mut tree = project().browse();
        let helper = tree.find(&[0, 1, 0]).unwrap();
        let visible = tree.visible_nodes();
        let index = visible.iter().position(|&id| id == helper).unwrap();
        tree.select(index);
        let src = tree.find(&[0]).unwrap();
        tree.collapse(src);
        assert_eq!(tree.cursor_node(), src);
    }

    #[test]
    fn up_from_root_wraps_to_last_visible() {
        let mut tree = project().browse();
        tree.handle_input(Key::Up);
        assert_eq!(tree.label(tree.cursor_node()), "CONTRIBUTING.md");
    }

    #[test]
    fn escape_cancels_browse() {
        let mut tree = project().browse();
        assert_eq!(
            tree.handle_input(Key::Escape),
            InputOutcome::Completed(WidgetResult::Cancelled)
        );
    }
}
