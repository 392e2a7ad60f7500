//! DOM event translation (browser -> pane_platform)
//!
//! Plain values in, Pane events out, so the mapping is testable without a
//! browser.

use pane_platform::{InputEvent, KeyState, PointerAction, PointerEvent, VIRTUAL_KEYS};

/// `WheelEvent.deltaMode` values
pub const DOM_DELTA_PIXEL: u32 = 0;
pub const DOM_DELTA_LINE: u32 = 1;
pub const DOM_DELTA_PAGE: u32 = 2;

/// Pixels per scroll line
const PIXELS_PER_LINE: f64 = 100.0;
/// Lines per scroll page
const LINES_PER_PAGE: f64 = 10.0;

/// Convert `MouseEvent.button`
pub fn pointer_action(button: i16) -> Option<PointerAction> {
    match button {
        0 => Some(PointerAction::Primary),
        1 => Some(PointerAction::Tertiary),
        2 => Some(PointerAction::Secondary),
        3 => Some(PointerAction::Extended1),
        4 => Some(PointerAction::Extended2),
        _ => None,
    }
}

/// `mousedown`
pub fn mouse_down(button: i16, x: f32, y: f32) -> Option<PointerEvent> {
    pointer_action(button).map(|action| PointerEvent::Pressed { action, x, y })
}

/// `mouseup`
pub fn mouse_up(button: i16, x: f32, y: f32) -> Option<PointerEvent> {
    pointer_action(button).map(|action| PointerEvent::Released { action, x, y })
}

/// `wheel`, as lines
///
/// The DOM reports downward scrolling as positive; Pane follows the desktop
/// convention where positive means away from the user.
pub fn wheel_delta(delta_x: f64, delta_y: f64, delta_mode: u32) -> (f32, f32) {
    let (x, y) = match delta_mode {
        DOM_DELTA_PIXEL => (delta_x / PIXELS_PER_LINE, delta_y / PIXELS_PER_LINE),
        DOM_DELTA_LINE => (delta_x, delta_y),
        _ => (delta_x * LINES_PER_PAGE, delta_y * LINES_PER_PAGE),
    };
    (x as f32, -y as f32)
}

/// `keydown` / `keyup`, from `KeyboardEvent.keyCode`
pub fn key(key_code: u32, state: KeyState) -> Option<InputEvent> {
    VIRTUAL_KEYS
        .to_normalized(key_code)
        .map(|key| InputEvent::Key { key, state })
}

/// Text typed by a `keydown`, from `KeyboardEvent.key`
///
/// Named keys ("Enter", "ArrowLeft") and shortcuts produce no text.
pub fn key_text(key: &str, ctrl: bool, meta: bool) -> Option<&str> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(_), None) if !ctrl && !meta => Some(key),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pane_platform::KeyCode;

    #[test]
    fn test_mouse_buttons() {
        assert_eq!(pointer_action(0), Some(PointerAction::Primary));
        assert_eq!(pointer_action(1), Some(PointerAction::Tertiary));
        assert_eq!(pointer_action(2), Some(PointerAction::Secondary));
        assert_eq!(pointer_action(3), Some(PointerAction::Extended1));
        assert_eq!(pointer_action(4), Some(PointerAction::Extended2));
        assert_eq!(pointer_action(5), None);
        assert_eq!(pointer_action(-1), None);
    }

    #[test]
    fn test_mouse_events() {
        assert_eq!(
            mouse_down(2, 4.0, 5.0),
            Some(PointerEvent::Pressed {
                action: PointerAction::Secondary,
                x: 4.0,
                y: 5.0
            })
        );
        assert_eq!(
            mouse_up(0, 1.0, 1.0),
            Some(PointerEvent::Released {
                action: PointerAction::Primary,
                x: 1.0,
                y: 1.0
            })
        );
        assert_eq!(mouse_down(9, 0.0, 0.0), None);
    }

    #[test]
    fn test_wheel_modes() {
        assert_eq!(wheel_delta(0.0, 100.0, DOM_DELTA_PIXEL), (0.0, -1.0));
        assert_eq!(wheel_delta(50.0, 0.0, DOM_DELTA_PIXEL), (0.5, 0.0));
        assert_eq!(wheel_delta(0.0, -3.0, DOM_DELTA_LINE), (0.0, 3.0));
        assert_eq!(wheel_delta(0.0, 1.0, DOM_DELTA_PAGE), (0.0, -10.0));
    }

    #[test]
    fn test_keys_share_virtual_key_codes() {
        assert_eq!(
            key(27, KeyState::Pressed),
            Some(InputEvent::Key {
                key: KeyCode::Escape,
                state: KeyState::Pressed
            })
        );
        assert_eq!(
            key(112, KeyState::Released),
            Some(InputEvent::Key {
                key: KeyCode::F1,
                state: KeyState::Released
            })
        );
        // Letters arrive as text
        assert_eq!(key(65, KeyState::Pressed), None);
    }

    #[test]
    fn test_key_text() {
        assert_eq!(key_text("a", false, false), Some("a"));
        assert_eq!(key_text("\u{1F600}", false, false), Some("\u{1F600}"));
        assert_eq!(key_text("Enter", false, false), None);
        assert_eq!(key_text("c", true, false), None);
        assert_eq!(key_text("v", false, true), None);
        assert_eq!(key_text("", false, false), None);
    }
}
