//! Per-window engine state

use pane_platform::{
    CodepointAssembler, Color, Cursor, Focus, KeyCode, Point, Size, Visibility, WindowConfig,
};
use rustc_hash::FxHashSet;

use crate::callbacks::Callbacks;
use crate::capture::PointerCapture;
use crate::redraw::RedrawState;
use crate::view::ViewTree;

/// Snapshot of a window's state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowInfo {
    pub size: Size,
    pub visibility: Visibility,
    pub focus: Focus,
    pub cursor: Cursor,
    pub background: Color,
    pub pointer_position: Point,
}

/// The window record kept in the registry
pub(crate) struct WindowState {
    pub title: String,
    pub size: Size,
    pub visibility: Visibility,
    pub focus: Focus,
    pub cursor: Cursor,
    pub background: Color,
    pub callbacks: Callbacks,
    pub views: Option<Box<dyn ViewTree>>,
    pub capture: PointerCapture,
    pub keys_down: FxHashSet<KeyCode>,
    pub text: CodepointAssembler,
    pub redraw: RedrawState,
}

impl WindowState {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            title: config.title.clone(),
            size: Size::new(config.width, config.height),
            visibility: if config.visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            },
            focus: Focus::Unfocused,
            cursor: config.cursor,
            background: config.background,
            callbacks: Callbacks::default(),
            views: None,
            capture: PointerCapture::new(),
            keys_down: FxHashSet::default(),
            text: CodepointAssembler::new(),
            redraw: RedrawState::default(),
        }
    }

    pub fn info(&self) -> WindowInfo {
        WindowInfo {
            size: self.size,
            visibility: self.visibility,
            focus: self.focus,
            cursor: self.cursor,
            background: self.background,
            pointer_position: self.capture.position(),
        }
    }
}
