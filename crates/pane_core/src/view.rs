//! View-tree collaborator interface
//!
//! The engine never owns views. It asks the tree attached to a window for
//! hit tests, layout and rendering, and notifies it about pointer gestures.
//! Capture state (hot view, active view, active action) is owned by the
//! engine alone; trees only ever receive notifications about it.
//!
//! [`RectTree`] is a small reference tree of nested rectangles, useful for
//! tests and for applications that only need hit regions.

use std::any::Any;

use pane_platform::{GraphicsContext, Point, PointerAction, PointerPhase, Rect, Size};
use slotmap::{new_key_type, Key, SlotMap};

new_key_type! {
    /// Generation-checked identifier of a view inside a [`ViewTree`]
    pub struct ViewId;
}

impl ViewId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create from a raw u64 representation
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// A pointer event routed to a view tree
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerNotice {
    /// View the event is routed to (`None` when nothing was hit)
    pub target: Option<ViewId>,
    pub phase: PointerPhase,
    /// Action involved; `None` for movement without a capture
    pub action: Option<PointerAction>,
    /// Pointer position in window coordinates
    pub position: Point,
    /// View under the pointer when no capture is active
    pub hot: Option<ViewId>,
    /// View holding the capture
    pub active: Option<ViewId>,
}

/// A retained view tree attached to a window
pub trait ViewTree {
    /// Whether `view` is still part of the tree
    fn contains(&self, view: ViewId) -> bool;

    /// Deepest view at `point` accepting `action`
    ///
    /// With `action == None` any view qualifies (hover).
    fn hit_test(&self, point: Point, action: Option<PointerAction>) -> Option<ViewId>;

    /// Lay the tree out for a new window size
    fn layout(&mut self, size: Size);

    /// Render the tree into the window's graphics context
    fn render(&mut self, context: &mut dyn GraphicsContext);

    /// Begin, end or cancel of a pointer action
    ///
    /// Returns whether the tree's visuals changed.
    fn pointer_action(&mut self, notice: &PointerNotice) -> bool;

    /// Pointer movement, captured or not
    ///
    /// Returns whether the tree's visuals changed.
    fn pointer_movement(&mut self, notice: &PointerNotice) -> bool;

    /// Access the concrete tree type
    fn as_any(&self) -> &dyn Any;

    /// Access the concrete tree type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A tree with no views
///
/// Stands in for windows that have no tree attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyTree;

impl ViewTree for EmptyTree {
    fn contains(&self, _view: ViewId) -> bool {
        false
    }

    fn hit_test(&self, _point: Point, _action: Option<PointerAction>) -> Option<ViewId> {
        None
    }

    fn layout(&mut self, _size: Size) {}

    fn render(&mut self, _context: &mut dyn GraphicsContext) {}

    fn pointer_action(&mut self, _notice: &PointerNotice) -> bool {
        false
    }

    fn pointer_movement(&mut self, _notice: &PointerNotice) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// RectTree
// ============================================================================

#[derive(Clone, Debug)]
struct RectNode {
    /// Bounds relative to the parent
    bounds: Rect,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    accepts: [bool; PointerAction::COUNT],
    pressed: bool,
    hovered: bool,
}

impl RectNode {
    fn new(bounds: Rect, parent: Option<ViewId>) -> Self {
        Self {
            bounds,
            parent,
            children: Vec::new(),
            accepts: [true; PointerAction::COUNT],
            pressed: false,
            hovered: false,
        }
    }
}

/// A tree of nested rectangles
///
/// Later children are on top of earlier ones. The root follows the window
/// size on layout. Every notification received is recorded and can be
/// inspected with [`RectTree::notices`].
#[derive(Debug, Default)]
pub struct RectTree {
    nodes: SlotMap<ViewId, RectNode>,
    root: Option<ViewId>,
    notices: Vec<PointerNotice>,
    layout_size: Option<Size>,
    render_count: usize,
}

impl RectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree whose root covers `size`
    pub fn with_root(size: Size) -> (Self, ViewId) {
        let mut tree = Self::new();
        let root = tree.set_root(Rect::from_size(size));
        (tree, root)
    }

    /// Replace the whole tree with a single root view
    pub fn set_root(&mut self, bounds: Rect) -> ViewId {
        self.nodes.clear();
        let root = self.nodes.insert(RectNode::new(bounds, None));
        self.root = Some(root);
        root
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    /// Add a child on top of `parent`'s existing children
    pub fn add_child(&mut self, parent: ViewId, bounds: Rect) -> Option<ViewId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let child = self.nodes.insert(RectNode::new(bounds, Some(parent)));
        self.nodes.get_mut(parent)?.children.push(child);
        Some(child)
    }

    /// Remove a view and its whole subtree
    pub fn remove(&mut self, view: ViewId) -> bool {
        let Some(node) = self.nodes.remove(view) else {
            return false;
        };

        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|&c| c != view);
        }
        if self.root == Some(view) {
            self.root = None;
        }

        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.nodes.remove(child) {
                stack.extend(removed.children);
            }
        }
        true
    }

    /// Restrict which pointer actions a view accepts
    pub fn set_accepts(&mut self, view: ViewId, action: PointerAction, accepts: bool) {
        if let Some(node) = self.nodes.get_mut(view) {
            node.accepts[action.index()] = accepts;
        }
    }

    /// Bounds of a view in window coordinates
    pub fn absolute_bounds(&self, view: ViewId) -> Option<Rect> {
        let mut node = self.nodes.get(view)?;
        let mut bounds = node.bounds;
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            bounds = bounds.offset(parent.bounds.x, parent.bounds.y);
            node = parent;
        }
        Some(bounds)
    }

    pub fn is_pressed(&self, view: ViewId) -> bool {
        self.nodes.get(view).is_some_and(|n| n.pressed)
    }

    pub fn is_hovered(&self, view: ViewId) -> bool {
        self.nodes.get(view).is_some_and(|n| n.hovered)
    }

    /// Notifications received so far, oldest first
    pub fn notices(&self) -> &[PointerNotice] {
        &self.notices
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    /// Size passed to the most recent layout
    pub fn layout_size(&self) -> Option<Size> {
        self.layout_size
    }

    /// Number of render passes
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    fn hit_test_node(
        &self,
        view: ViewId,
        point: Point,
        action: Option<PointerAction>,
        parent_offset: (f32, f32),
    ) -> Option<ViewId> {
        let node = self.nodes.get(view)?;
        let bounds = node.bounds.offset(parent_offset.0, parent_offset.1);
        if !bounds.contains(point) {
            return None;
        }

        // Last child is on top
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_test_node(child, point, action, (bounds.x, bounds.y)) {
                return Some(hit);
            }
        }

        match action {
            Some(action) if !node.accepts[action.index()] => None,
            _ => Some(view),
        }
    }

    fn set_pressed(&mut self, view: Option<ViewId>, pressed: bool) -> bool {
        match view.and_then(|v| self.nodes.get_mut(v)) {
            Some(node) if node.pressed != pressed => {
                node.pressed = pressed;
                true
            }
            _ => false,
        }
    }
}

impl ViewTree for RectTree {
    fn contains(&self, view: ViewId) -> bool {
        self.nodes.contains_key(view)
    }

    fn hit_test(&self, point: Point, action: Option<PointerAction>) -> Option<ViewId> {
        self.hit_test_node(self.root?, point, action, (0.0, 0.0))
    }

    fn layout(&mut self, size: Size) {
        if let Some(root) = self.root.and_then(|r| self.nodes.get_mut(r)) {
            root.bounds.width = size.width;
            root.bounds.height = size.height;
        }
        self.layout_size = Some(size);
    }

    fn render(&mut self, _context: &mut dyn GraphicsContext) {
        self.render_count += 1;
    }

    fn pointer_action(&mut self, notice: &PointerNotice) -> bool {
        self.notices.push(*notice);
        match notice.phase {
            PointerPhase::Begin => self.set_pressed(notice.target, true),
            PointerPhase::End | PointerPhase::Cancel => self.set_pressed(notice.target, false),
            PointerPhase::Move => false,
        }
    }

    fn pointer_movement(&mut self, notice: &PointerNotice) -> bool {
        self.notices.push(*notice);
        let mut changed = false;
        for (view, node) in self.nodes.iter_mut() {
            let hovered = notice.hot == Some(view);
            if node.hovered != hovered {
                node.hovered = hovered;
                changed = true;
            }
        }
        changed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 400x300 root with two 100x100 children stacked vertically and a
    /// 50x50 grandchild inside the first child
    fn sample() -> (RectTree, ViewId, ViewId, ViewId, ViewId) {
        let (mut tree, root) = RectTree::with_root(Size::new(400.0, 300.0));
        let first = tree.add_child(root, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        let second = tree.add_child(root, Rect::new(0.0, 100.0, 100.0, 100.0)).unwrap();
        let inner = tree.add_child(first, Rect::new(25.0, 25.0, 50.0, 50.0)).unwrap();
        (tree, root, first, second, inner)
    }

    #[test]
    fn test_hit_test_deepest() {
        let (tree, root, first, second, inner) = sample();
        assert_eq!(tree.hit_test(Point::new(50.0, 50.0), None), Some(inner));
        assert_eq!(tree.hit_test(Point::new(5.0, 5.0), None), Some(first));
        assert_eq!(tree.hit_test(Point::new(50.0, 150.0), None), Some(second));
        assert_eq!(tree.hit_test(Point::new(300.0, 250.0), None), Some(root));
        assert_eq!(tree.hit_test(Point::new(450.0, 10.0), None), None);
    }

    #[test]
    fn test_hit_test_respects_accepted_actions() {
        let (mut tree, _, first, _, inner) = sample();
        tree.set_accepts(inner, PointerAction::Secondary, false);

        let point = Point::new(50.0, 50.0);
        assert_eq!(tree.hit_test(point, Some(PointerAction::Primary)), Some(inner));
        assert_eq!(tree.hit_test(point, Some(PointerAction::Secondary)), Some(first));
    }

    #[test]
    fn test_later_children_are_on_top() {
        let (mut tree, root) = RectTree::with_root(Size::new(100.0, 100.0));
        let below = tree.add_child(root, Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
        let above = tree.add_child(root, Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
        assert_ne!(below, above);
        assert_eq!(tree.hit_test(Point::new(10.0, 10.0), None), Some(above));
    }

    #[test]
    fn test_remove_subtree_invalidates_ids() {
        let (mut tree, _, first, second, inner) = sample();
        assert!(tree.remove(first));
        assert!(!tree.contains(first));
        assert!(!tree.contains(inner));
        assert!(tree.contains(second));
        assert!(!tree.remove(first));
    }

    #[test]
    fn test_absolute_bounds() {
        let (tree, _, _, _, inner) = sample();
        assert_eq!(tree.absolute_bounds(inner), Some(Rect::new(25.0, 25.0, 50.0, 50.0)));
    }

    #[test]
    fn test_layout_resizes_root() {
        let (mut tree, root, ..) = sample();
        tree.layout(Size::new(800.0, 600.0));
        assert_eq!(tree.layout_size(), Some(Size::new(800.0, 600.0)));
        assert_eq!(tree.hit_test(Point::new(700.0, 500.0), None), Some(root));
    }

    #[test]
    fn test_empty_tree() {
        let tree = EmptyTree;
        assert_eq!(tree.hit_test(Point::new(0.0, 0.0), None), None);
        assert!(!tree.contains(ViewId::default()));
    }
}
