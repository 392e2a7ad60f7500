//! Desktop input conversion (winit -> pane_platform)

use pane_platform::{Cursor, KeyCode, KeyState, Keymap, PointerAction};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase};
use winit::keyboard::{Key, NamedKey};
use winit::window::CursorIcon;

/// winit named keys
///
/// winit already folds left/right modifier variants into one logical key.
pub static NAMED_KEYS: Keymap<NamedKey> = Keymap::new(&[
    // General keys
    (NamedKey::Space, KeyCode::Space),
    (NamedKey::Backspace, KeyCode::Backspace),
    (NamedKey::Tab, KeyCode::Tab),
    (NamedKey::Clear, KeyCode::Clear),
    (NamedKey::Enter, KeyCode::Return),
    (NamedKey::Pause, KeyCode::Pause),
    (NamedKey::Escape, KeyCode::Escape),
    (NamedKey::Delete, KeyCode::Delete),
    // Modifier keys
    (NamedKey::Shift, KeyCode::Shift),
    (NamedKey::Control, KeyCode::Control),
    (NamedKey::Meta, KeyCode::Meta),
    (NamedKey::Alt, KeyCode::Alt),
    (NamedKey::Super, KeyCode::Super),
    (NamedKey::Hyper, KeyCode::Hyper),
    // Navigation keys
    (NamedKey::PageUp, KeyCode::PageUp),
    (NamedKey::PageDown, KeyCode::PageDown),
    (NamedKey::End, KeyCode::End),
    (NamedKey::Home, KeyCode::Home),
    (NamedKey::ArrowLeft, KeyCode::Left),
    (NamedKey::ArrowUp, KeyCode::Up),
    (NamedKey::ArrowRight, KeyCode::Right),
    (NamedKey::ArrowDown, KeyCode::Down),
    // Editing keys
    (NamedKey::Select, KeyCode::Select),
    (NamedKey::PrintScreen, KeyCode::Print),
    (NamedKey::Execute, KeyCode::Execute),
    (NamedKey::Insert, KeyCode::Insert),
    (NamedKey::Help, KeyCode::Help),
    // Function keys
    (NamedKey::F1, KeyCode::F1),
    (NamedKey::F2, KeyCode::F2),
    (NamedKey::F3, KeyCode::F3),
    (NamedKey::F4, KeyCode::F4),
    (NamedKey::F5, KeyCode::F5),
    (NamedKey::F6, KeyCode::F6),
    (NamedKey::F7, KeyCode::F7),
    (NamedKey::F8, KeyCode::F8),
    (NamedKey::F9, KeyCode::F9),
    (NamedKey::F10, KeyCode::F10),
    (NamedKey::F11, KeyCode::F11),
    (NamedKey::F12, KeyCode::F12),
    (NamedKey::F13, KeyCode::F13),
    (NamedKey::F14, KeyCode::F14),
    (NamedKey::F15, KeyCode::F15),
    (NamedKey::F16, KeyCode::F16),
    (NamedKey::F17, KeyCode::F17),
    (NamedKey::F18, KeyCode::F18),
    (NamedKey::F19, KeyCode::F19),
    (NamedKey::F20, KeyCode::F20),
    (NamedKey::F21, KeyCode::F21),
    (NamedKey::F22, KeyCode::F22),
    (NamedKey::F23, KeyCode::F23),
    (NamedKey::F24, KeyCode::F24),
]);

/// Convert a winit logical key; character keys arrive as text instead
pub fn convert_key(key: &Key) -> Option<KeyCode> {
    match key {
        Key::Named(named) => NAMED_KEYS.to_normalized(*named),
        _ => None,
    }
}

/// Convert winit element state to KeyState
pub fn convert_key_state(state: ElementState) -> KeyState {
    match state {
        ElementState::Pressed => KeyState::Pressed,
        ElementState::Released => KeyState::Released,
    }
}

/// Convert a winit mouse button; buttons beyond the five actions are dropped
pub fn convert_mouse_button(button: MouseButton) -> Option<PointerAction> {
    match button {
        MouseButton::Left => Some(PointerAction::Primary),
        MouseButton::Right => Some(PointerAction::Secondary),
        MouseButton::Middle => Some(PointerAction::Tertiary),
        MouseButton::Back => Some(PointerAction::Extended1),
        MouseButton::Forward => Some(PointerAction::Extended2),
        MouseButton::Other(_) => None,
    }
}

/// Scroll delta in lines
pub fn scroll_delta(delta: MouseScrollDelta) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(pos) => (pos.x as f32 / 10.0, pos.y as f32 / 10.0),
    }
}

/// Native cursor for a Pane cursor
pub fn cursor_icon(cursor: Cursor) -> CursorIcon {
    match cursor {
        Cursor::Arrow => CursorIcon::Default,
        Cursor::IBeam => CursorIcon::Text,
        Cursor::Hand => CursorIcon::Pointer,
        Cursor::Crosshair => CursorIcon::Crosshair,
        Cursor::SizeAll => CursorIcon::Move,
        Cursor::SizeNWSE => CursorIcon::NwseResize,
        Cursor::SizeNESW => CursorIcon::NeswResize,
        Cursor::SizeWE => CursorIcon::EwResize,
        Cursor::SizeNS => CursorIcon::NsResize,
    }
}

/// Convert a winit touch phase
pub fn convert_touch_phase(phase: TouchPhase) -> pane_platform::TouchPhase {
    match phase {
        TouchPhase::Started => pane_platform::TouchPhase::Started,
        TouchPhase::Moved => pane_platform::TouchPhase::Moved,
        TouchPhase::Ended => pane_platform::TouchPhase::Ended,
        TouchPhase::Cancelled => pane_platform::TouchPhase::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_named_keys_round_trip() {
        for &(named, key) in NAMED_KEYS.entries() {
            assert_eq!(NAMED_KEYS.to_normalized(named), Some(key));
            assert_eq!(NAMED_KEYS.to_native(key), Some(named));
        }
    }

    #[test]
    fn test_named_keys_cover_every_keycode() {
        for key in KeyCode::ALL {
            assert!(NAMED_KEYS.to_native(key).is_some(), "{key:?} has no winit key");
        }
        assert_eq!(NAMED_KEYS.entries().len(), KeyCode::ALL.len());
    }

    #[test]
    fn test_convert_key() {
        assert_eq!(convert_key(&Key::Named(NamedKey::Escape)), Some(KeyCode::Escape));
        assert_eq!(convert_key(&Key::Named(NamedKey::Enter)), Some(KeyCode::Return));
        assert_eq!(convert_key(&Key::Named(NamedKey::F25)), None);
        assert_eq!(convert_key(&Key::Character(SmolStr::new("a"))), None);
    }

    #[test]
    fn test_mouse_buttons() {
        assert_eq!(convert_mouse_button(MouseButton::Left), Some(PointerAction::Primary));
        assert_eq!(convert_mouse_button(MouseButton::Right), Some(PointerAction::Secondary));
        assert_eq!(convert_mouse_button(MouseButton::Middle), Some(PointerAction::Tertiary));
        assert_eq!(convert_mouse_button(MouseButton::Back), Some(PointerAction::Extended1));
        assert_eq!(convert_mouse_button(MouseButton::Forward), Some(PointerAction::Extended2));
        assert_eq!(convert_mouse_button(MouseButton::Other(9)), None);
    }

    #[test]
    fn test_scroll_delta() {
        assert_eq!(scroll_delta(MouseScrollDelta::LineDelta(0.0, -1.0)), (0.0, -1.0));
        assert_eq!(
            scroll_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(20.0, 40.0))),
            (2.0, 4.0)
        );
    }

    #[test]
    fn test_touch_phases() {
        assert_eq!(
            convert_touch_phase(TouchPhase::Started),
            pane_platform::TouchPhase::Started
        );
        assert_eq!(
            convert_touch_phase(TouchPhase::Cancelled),
            pane_platform::TouchPhase::Cancelled
        );
    }

    #[test]
    fn test_cursor_icons() {
        assert_eq!(cursor_icon(Cursor::Arrow), CursorIcon::Default);
        assert_eq!(cursor_icon(Cursor::IBeam), CursorIcon::Text);
        assert_eq!(cursor_icon(Cursor::SizeWE), CursorIcon::EwResize);
    }
}
