//! Per-window pointer capture state machine
//!
//! A window is either idle or captured by exactly one pointer action. While
//! idle, movement updates the hot view (the view under the pointer). A begin
//! binds the active view found by hit-testing, and every later move, end or
//! cancel is routed to that view no matter where the pointer is.
//!
//! ```text
//!            begin(a)                 end(a) / cancel
//!   Idle  ------------>  Captured(a)  ---------------->  Idle
//!    |  ^                   |   ^
//!    +--+ move: hot         +---+ move: active view
//! ```
//!
//! View ids are weak: before routing to the stored active view the tree is
//! asked whether it still contains it, and a stale id is routed as "no view".

use pane_platform::{Point, PointerAction, PointerPhase};
use tracing::debug;

use crate::view::{PointerNotice, ViewId, ViewTree};

/// Capture state of one window
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CaptureState {
    /// No active gesture
    #[default]
    Idle,
    /// One pointer action is active, bound to `view`
    Captured {
        view: Option<ViewId>,
        action: PointerAction,
        /// Where the gesture started
        origin: Point,
    },
}

/// Result of feeding one event to the state machine
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// The event was not legal in the current state and changed nothing
    Ignored,
    /// The event was routed
    Routed {
        /// View the event was delivered to
        target: Option<ViewId>,
        /// Visible state changed; the window needs a redraw
        redraw: bool,
    },
}

impl Transition {
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Transition::Routed { redraw: true, .. })
    }
}

/// Per-window pointer state
#[derive(Clone, Debug)]
pub struct PointerCapture {
    state: CaptureState,
    hot: Option<ViewId>,
    position: Point,
    down: [bool; PointerAction::COUNT],
}

impl Default for PointerCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerCapture {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            hot: None,
            position: Point::OUTSIDE,
            down: [false; PointerAction::COUNT],
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.state, CaptureState::Captured { .. })
    }

    /// View under the pointer, as of the last uncaptured move
    pub fn hot(&self) -> Option<ViewId> {
        self.hot
    }

    /// View holding the capture
    pub fn active(&self) -> Option<ViewId> {
        match self.state {
            CaptureState::Captured { view, .. } => view,
            CaptureState::Idle => None,
        }
    }

    /// Action holding the capture
    pub fn active_action(&self) -> Option<PointerAction> {
        match self.state {
            CaptureState::Captured { action, .. } => Some(action),
            CaptureState::Idle => None,
        }
    }

    /// Start point of the current gesture
    pub fn origin(&self) -> Option<Point> {
        match self.state {
            CaptureState::Captured { origin, .. } => Some(origin),
            CaptureState::Idle => None,
        }
    }

    /// Last known pointer position ([`Point::OUTSIDE`] once it left)
    pub fn position(&self) -> Point {
        self.position
    }

    /// Whether the platform reported `action` as held down
    pub fn is_down(&self, action: PointerAction) -> bool {
        self.down[action.index()]
    }

    /// A pointer action started
    pub fn begin(
        &mut self,
        tree: &mut dyn ViewTree,
        action: PointerAction,
        position: Point,
    ) -> Transition {
        self.down[action.index()] = true;
        self.position = position;

        if let CaptureState::Captured {
            action: active_action,
            ..
        } = self.state
        {
            if active_action == action {
                debug!(?action, "ignoring duplicate pointer begin");
            } else {
                debug!(?action, ?active_action, "ignoring pointer begin during another capture");
            }
            return Transition::Ignored;
        }

        let view = tree.hit_test(position, Some(action));
        self.state = CaptureState::Captured {
            view,
            action,
            origin: position,
        };

        let notice = self.notice(view, PointerPhase::Begin, Some(action));
        tree.pointer_action(&notice);
        Transition::Routed {
            target: view,
            redraw: true,
        }
    }

    /// The pointer moved
    pub fn move_to(&mut self, tree: &mut dyn ViewTree, position: Point) -> Transition {
        self.position = position;

        match self.state {
            CaptureState::Captured { action, .. } => {
                let target = self.live_active(tree);
                let notice = self.notice(target, PointerPhase::Move, Some(action));
                let redraw = tree.pointer_movement(&notice);
                Transition::Routed { target, redraw }
            }
            CaptureState::Idle => {
                let hot = if position.is_outside() {
                    None
                } else {
                    tree.hit_test(position, None)
                };
                let hot_changed = hot != self.hot;
                self.hot = hot;

                let notice = self.notice(hot, PointerPhase::Move, None);
                let tree_changed = tree.pointer_movement(&notice);
                Transition::Routed {
                    target: hot,
                    redraw: hot_changed || tree_changed,
                }
            }
        }
    }

    /// A pointer action finished
    pub fn end(
        &mut self,
        tree: &mut dyn ViewTree,
        action: PointerAction,
        position: Point,
    ) -> Transition {
        self.down[action.index()] = false;
        self.position = position;

        match self.state {
            CaptureState::Captured {
                action: active_action,
                ..
            } if active_action == action => {
                let target = self.live_active(tree);
                let notice = self.notice(target, PointerPhase::End, Some(action));
                self.state = CaptureState::Idle;
                tree.pointer_action(&notice);
                Transition::Routed {
                    target,
                    redraw: true,
                }
            }
            CaptureState::Captured {
                action: active_action,
                ..
            } => {
                debug!(?action, ?active_action, "ignoring pointer end for inactive action");
                Transition::Ignored
            }
            CaptureState::Idle => {
                debug!(?action, "ignoring pointer end without capture");
                Transition::Ignored
            }
        }
    }

    /// The gesture was interrupted (pointer left, focus lost, touch cancel)
    pub fn cancel(&mut self, tree: &mut dyn ViewTree, position: Point) -> Transition {
        self.down = [false; PointerAction::COUNT];
        self.position = position;

        let CaptureState::Captured { action, .. } = self.state else {
            return Transition::Ignored;
        };

        let target = self.live_active(tree);
        let notice = self.notice(target, PointerPhase::Cancel, Some(action));
        self.state = CaptureState::Idle;
        tree.pointer_action(&notice);
        Transition::Routed {
            target,
            redraw: true,
        }
    }

    /// Active view, dropping it if the tree no longer contains it
    fn live_active(&mut self, tree: &dyn ViewTree) -> Option<ViewId> {
        let CaptureState::Captured { view, .. } = &mut self.state else {
            return None;
        };
        if let Some(stale) = view.filter(|v| !tree.contains(*v)) {
            debug!(view = stale.to_raw(), "active view left the tree");
            *view = None;
        }
        *view
    }

    fn notice(
        &self,
        target: Option<ViewId>,
        phase: PointerPhase,
        action: Option<PointerAction>,
    ) -> PointerNotice {
        PointerNotice {
            target,
            phase,
            action,
            position: self.position,
            hot: self.hot,
            active: self.active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{EmptyTree, RectTree};
    use pane_platform::{Rect, Size};

    const PRIMARY: PointerAction = PointerAction::Primary;
    const SECONDARY: PointerAction = PointerAction::Secondary;

    /// Root 200x200 with `left` at 0..100 and `right` at 100..200
    fn tree() -> (RectTree, ViewId, ViewId) {
        let (mut tree, root) = RectTree::with_root(Size::new(200.0, 200.0));
        let left = tree.add_child(root, Rect::new(0.0, 0.0, 100.0, 200.0)).unwrap();
        let right = tree.add_child(root, Rect::new(100.0, 0.0, 100.0, 200.0)).unwrap();
        (tree, left, right)
    }

    #[test]
    fn test_begin_captures_hit_view() {
        let (mut tree, left, _) = tree();
        let mut capture = PointerCapture::new();

        let transition = capture.begin(&mut tree, PRIMARY, Point::new(10.0, 10.0));
        assert_eq!(
            transition,
            Transition::Routed {
                target: Some(left),
                redraw: true
            }
        );
        assert_eq!(capture.active(), Some(left));
        assert_eq!(capture.active_action(), Some(PRIMARY));
        assert_eq!(capture.origin(), Some(Point::new(10.0, 10.0)));
        assert!(capture.is_down(PRIMARY));
        assert!(tree.is_pressed(left));
    }

    #[test]
    fn test_duplicate_begin_keeps_capture() {
        let (mut tree, left, _) = tree();
        let mut capture = PointerCapture::new();
        capture.begin(&mut tree, PRIMARY, Point::new(10.0, 10.0));
        let notices = tree.notices().len();

        let transition = capture.begin(&mut tree, PRIMARY, Point::new(150.0, 10.0));
        assert_eq!(transition, Transition::Ignored);
        assert_eq!(capture.active(), Some(left));
        assert_eq!(capture.origin(), Some(Point::new(10.0, 10.0)));
        assert_eq!(tree.notices().len(), notices);
    }

    #[test]
    fn test_begin_of_other_action_while_captured_is_ignored() {
        let (mut tree, left, _) = tree();
        let mut capture = PointerCapture::new();
        capture.begin(&mut tree, PRIMARY, Point::new(10.0, 10.0));

        assert_eq!(
            capture.begin(&mut tree, SECONDARY, Point::new(150.0, 10.0)),
            Transition::Ignored
        );
        assert_eq!(capture.active(), Some(left));
        assert_eq!(capture.active_action(), Some(PRIMARY));
        assert!(capture.is_down(SECONDARY));
    }

    #[test]
    fn test_captured_move_routes_to_active_view() {
        let (mut tree, left, right) = tree();
        let mut capture = PointerCapture::new();
        capture.begin(&mut tree, PRIMARY, Point::new(10.0, 10.0));

        let transition = capture.move_to(&mut tree, Point::new(150.0, 10.0));
        assert!(matches!(transition, Transition::Routed { target: Some(v), .. } if v == left));
        assert_ne!(Some(right), capture.active());

        let last = tree.notices().last().unwrap();
        assert_eq!(last.target, Some(left));
        assert_eq!(last.phase, PointerPhase::Move);
        assert_eq!(last.action, Some(PRIMARY));
    }

    #[test]
    fn test_idle_move_updates_hot() {
        let (mut tree, left, right) = tree();
        let mut capture = PointerCapture::new();

        let first = capture.move_to(&mut tree, Point::new(10.0, 10.0));
        assert_eq!(capture.hot(), Some(left));
        assert!(first.needs_redraw());

        let same = capture.move_to(&mut tree, Point::new(20.0, 10.0));
        assert_eq!(
            same,
            Transition::Routed {
                target: Some(left),
                redraw: false
            }
        );

        capture.move_to(&mut tree, Point::new(150.0, 10.0));
        assert_eq!(capture.hot(), Some(right));
        assert!(tree.is_hovered(right));
        assert!(!tree.is_hovered(left));
        assert!(!capture.is_captured());
    }

    #[test]
    fn test_end_releases_capture() {
        let (mut tree, left, _) = tree();
        let mut capture = PointerCapture::new();
        capture.begin(&mut tree, PRIMARY, Point::new(10.0, 10.0));

        let transition = capture.end(&mut tree, PRIMARY, Point::new(150.0, 10.0));
        assert_eq!(
            transition,
            Transition::Routed {
                target: Some(left),
                redraw: true
            }
        );
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(!capture.is_down(PRIMARY));
        assert!(!tree.is_pressed(left));

        let last = tree.notices().last().unwrap();
        assert_eq!(last.phase, PointerPhase::End);
        assert_eq!(last.active, Some(left));
    }

    #[test]
    fn test_mismatched_end_is_ignored() {
        let (mut tree, left, _) = tree();
        let mut capture = PointerCapture::new();
        capture.begin(&mut tree, PRIMARY, Point::new(10.0, 10.0));
        let before = capture.state();

        assert_eq!(
            capture.end(&mut tree, SECONDARY, Point::new(10.0, 10.0)),
            Transition::Ignored
        );
        assert_eq!(capture.state(), before);
        assert_eq!(capture.active(), Some(left));
    }

    #[test]
    fn test_end_without_capture_is_ignored() {
        let (mut tree, ..) = tree();
        let mut capture = PointerCapture::new();
        assert_eq!(
            capture.end(&mut tree, PRIMARY, Point::new(10.0, 10.0)),
            Transition::Ignored
        );
    }

    #[test]
    fn test_cancel_then_outside_move_clears_hot() {
        let (mut tree, left, _) = tree();
        let mut capture = PointerCapture::new();
        capture.move_to(&mut tree, Point::new(10.0, 10.0));
        capture.begin(&mut tree, PRIMARY, Point::new(10.0, 10.0));

        let transition = capture.cancel(&mut tree, Point::new(10.0, 10.0));
        assert!(transition.needs_redraw());
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(!tree.is_pressed(left));
        assert_eq!(tree.notices().last().unwrap().phase, PointerPhase::Cancel);
        assert_eq!(capture.hot(), Some(left));

        capture.move_to(&mut tree, Point::OUTSIDE);
        assert_eq!(capture.hot(), None);
        assert!(!tree.is_hovered(left));
    }

    #[test]
    fn test_cancel_while_idle_is_ignored() {
        let mut capture = PointerCapture::new();
        assert_eq!(
            capture.cancel(&mut EmptyTree, Point::new(1.0, 1.0)),
            Transition::Ignored
        );
    }

    #[test]
    fn test_stale_active_view_routes_to_nothing() {
        let (mut tree, left, _) = tree();
        let mut capture = PointerCapture::new();
        capture.begin(&mut tree, PRIMARY, Point::new(10.0, 10.0));
        tree.remove(left);

        let transition = capture.move_to(&mut tree, Point::new(20.0, 10.0));
        assert!(matches!(transition, Transition::Routed { target: None, .. }));
        assert_eq!(capture.active(), None);
        assert_eq!(capture.active_action(), Some(PRIMARY));

        // The gesture still ends normally
        assert!(capture.end(&mut tree, PRIMARY, Point::new(20.0, 10.0)).needs_redraw());
        assert!(!capture.is_captured());
    }

    #[test]
    fn test_begin_on_empty_area_still_captures_action() {
        let mut capture = PointerCapture::new();
        let transition = capture.begin(&mut EmptyTree, PRIMARY, Point::new(5.0, 5.0));
        assert_eq!(
            transition,
            Transition::Routed {
                target: None,
                redraw: true
            }
        );
        assert_eq!(capture.active_action(), Some(PRIMARY));
        assert!(capture.end(&mut EmptyTree, PRIMARY, Point::new(5.0, 5.0)).needs_redraw());
    }
}
