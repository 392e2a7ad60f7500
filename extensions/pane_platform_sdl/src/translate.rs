//! SDL event translation (SDL2 -> pane_platform)
//!
//! Works on raw SDL values so it is testable without linking SDL.

use pane_platform::{InputEvent, KeyState, PointerAction, PointerEvent, SDL_KEYS};
use tracing::trace;

const SDLK_SCANCODE_MASK: i32 = 1 << 30;

const SDLK_LCTRL: i32 = 224 | SDLK_SCANCODE_MASK;
const SDLK_LSHIFT: i32 = 225 | SDLK_SCANCODE_MASK;
const SDLK_LALT: i32 = 226 | SDLK_SCANCODE_MASK;
const SDLK_RCTRL: i32 = 228 | SDLK_SCANCODE_MASK;
const SDLK_RSHIFT: i32 = 229 | SDLK_SCANCODE_MASK;
const SDLK_RALT: i32 = 230 | SDLK_SCANCODE_MASK;

/// `SDL_BUTTON_*` values
pub const SDL_BUTTON_LEFT: u8 = 1;
pub const SDL_BUTTON_MIDDLE: u8 = 2;
pub const SDL_BUTTON_RIGHT: u8 = 3;
pub const SDL_BUTTON_X1: u8 = 4;
pub const SDL_BUTTON_X2: u8 = 5;

/// Fold right-hand modifiers onto their left-hand keycode
///
/// Right GUI is kept apart; it is the Super key.
pub fn fold_modifier(keycode: i32) -> i32 {
    match keycode {
        SDLK_RSHIFT => SDLK_LSHIFT,
        SDLK_RCTRL => SDLK_LCTRL,
        SDLK_RALT => SDLK_LALT,
        other => other,
    }
}

/// `SDL_KEYDOWN` / `SDL_KEYUP`
pub fn key(keycode: i32, state: KeyState) -> Option<InputEvent> {
    let key = SDL_KEYS.to_normalized(fold_modifier(keycode));
    if key.is_none() {
        trace!(keycode, "no normalized key");
    }
    key.map(|key| InputEvent::Key { key, state })
}

/// Convert an `SDL_BUTTON_*` value
pub fn pointer_action(button: u8) -> Option<PointerAction> {
    match button {
        SDL_BUTTON_LEFT => Some(PointerAction::Primary),
        SDL_BUTTON_MIDDLE => Some(PointerAction::Tertiary),
        SDL_BUTTON_RIGHT => Some(PointerAction::Secondary),
        SDL_BUTTON_X1 => Some(PointerAction::Extended1),
        SDL_BUTTON_X2 => Some(PointerAction::Extended2),
        _ => None,
    }
}

/// `SDL_MOUSEBUTTONDOWN`
pub fn mouse_down(button: u8, x: i32, y: i32) -> Option<PointerEvent> {
    pointer_action(button).map(|action| PointerEvent::Pressed {
        action,
        x: x as f32,
        y: y as f32,
    })
}

/// `SDL_MOUSEBUTTONUP`
pub fn mouse_up(button: u8, x: i32, y: i32) -> Option<PointerEvent> {
    pointer_action(button).map(|action| PointerEvent::Released {
        action,
        x: x as f32,
        y: y as f32,
    })
}

/// `SDL_MOUSEWHEEL`; SDL already reports lines
pub fn wheel(x: i32, y: i32, flipped: bool) -> InputEvent {
    let sign = if flipped { -1.0 } else { 1.0 };
    InputEvent::Scroll {
        delta_x: x as f32 * sign,
        delta_y: y as f32 * sign,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pane_platform::KeyCode;

    #[test]
    fn test_right_modifiers_fold_left() {
        for (right, key) in [
            (SDLK_RSHIFT, KeyCode::Shift),
            (SDLK_RCTRL, KeyCode::Control),
            (SDLK_RALT, KeyCode::Alt),
        ] {
            assert_eq!(
                super::key(right, KeyState::Pressed),
                Some(InputEvent::Key {
                    key,
                    state: KeyState::Pressed
                })
            );
        }
    }

    #[test]
    fn test_gui_keys_stay_distinct() {
        let lgui = 227 | SDLK_SCANCODE_MASK;
        let rgui = 231 | SDLK_SCANCODE_MASK;
        assert_eq!(fold_modifier(rgui), rgui);
        assert_eq!(
            key(lgui, KeyState::Pressed),
            Some(InputEvent::Key {
                key: KeyCode::Meta,
                state: KeyState::Pressed
            })
        );
        assert_eq!(
            key(rgui, KeyState::Released),
            Some(InputEvent::Key {
                key: KeyCode::Super,
                state: KeyState::Released
            })
        );
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            key(27, KeyState::Pressed),
            Some(InputEvent::Key {
                key: KeyCode::Escape,
                state: KeyState::Pressed
            })
        );
        // 'a' arrives through text input
        assert_eq!(key(97, KeyState::Pressed), None);
    }

    #[test]
    fn test_mouse_buttons() {
        assert_eq!(pointer_action(SDL_BUTTON_LEFT), Some(PointerAction::Primary));
        assert_eq!(pointer_action(SDL_BUTTON_MIDDLE), Some(PointerAction::Tertiary));
        assert_eq!(pointer_action(SDL_BUTTON_RIGHT), Some(PointerAction::Secondary));
        assert_eq!(pointer_action(SDL_BUTTON_X1), Some(PointerAction::Extended1));
        assert_eq!(pointer_action(SDL_BUTTON_X2), Some(PointerAction::Extended2));
        assert_eq!(pointer_action(0), None);
        assert_eq!(
            mouse_up(SDL_BUTTON_RIGHT, 3, 4),
            Some(PointerEvent::Released {
                action: PointerAction::Secondary,
                x: 3.0,
                y: 4.0
            })
        );
    }

    #[test]
    fn test_wheel_direction() {
        assert_eq!(
            wheel(0, 2, false),
            InputEvent::Scroll {
                delta_x: 0.0,
                delta_y: 2.0
            }
        );
        assert_eq!(
            wheel(1, 2, true),
            InputEvent::Scroll {
                delta_x: -1.0,
                delta_y: -2.0
            }
        );
    }
}
