//! Keycode translation between native key codes and [`KeyCode`]
//!
//! A [`Keymap`] is a fixed table of `(native, normalized)` pairs. Each table
//! is a bijection over the keys it defines, so translating a key to its
//! normalized code and back yields the original native code. Anything the
//! table does not list translates to `None`, which callers treat as "no
//! normalized key" rather than as an error.
//!
//! Platforms that distinguish left/right modifier variants fold them onto a
//! single native code before lookup (see the SDL backend).

use crate::input::KeyCode;

/// Bidirectional native <-> normalized keycode table
#[derive(Debug)]
pub struct Keymap<N: 'static> {
    entries: &'static [(N, KeyCode)],
}

impl<N> Keymap<N> {
    /// Create a keymap over a static table
    pub const fn new(entries: &'static [(N, KeyCode)]) -> Self {
        Self { entries }
    }

    /// All `(native, normalized)` pairs in table order
    pub fn entries(&self) -> &'static [(N, KeyCode)] {
        self.entries
    }
}

impl<N: Copy + PartialEq> Keymap<N> {
    /// Translate a native key code into a normalized key
    pub fn to_normalized(&self, native: N) -> Option<KeyCode> {
        self.entries
            .iter()
            .find(|(code, _)| *code == native)
            .map(|(_, key)| *key)
    }

    /// Translate a normalized key back into the native key code
    pub fn to_native(&self, key: KeyCode) -> Option<N> {
        self.entries
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(code, _)| *code)
    }
}

/// Win32 virtual-key codes
///
/// The DOM `KeyboardEvent.keyCode` uses the same numbering for every key in
/// this table, so the browser backend shares it.
pub static VIRTUAL_KEYS: Keymap<u32> = Keymap::new(&[
    // General keys
    (0x20, KeyCode::Space),
    (0x08, KeyCode::Backspace),
    (0x09, KeyCode::Tab),
    (0x0C, KeyCode::Clear),
    (0x0D, KeyCode::Return),
    (0x13, KeyCode::Pause),
    (0x1B, KeyCode::Escape),
    (0x2E, KeyCode::Delete),
    // Modifier keys (left Windows key is Meta, right Windows key is Super)
    (0x10, KeyCode::Shift),
    (0x11, KeyCode::Control),
    (0x5B, KeyCode::Meta),
    (0x12, KeyCode::Alt),
    (0x5C, KeyCode::Super),
    // Navigation keys
    (0x21, KeyCode::PageUp),
    (0x22, KeyCode::PageDown),
    (0x23, KeyCode::End),
    (0x24, KeyCode::Home),
    (0x25, KeyCode::Left),
    (0x26, KeyCode::Up),
    (0x27, KeyCode::Right),
    (0x28, KeyCode::Down),
    // Editing keys
    (0x29, KeyCode::Select),
    (0x2A, KeyCode::Print),
    (0x2B, KeyCode::Execute),
    (0x2D, KeyCode::Insert),
    (0x2F, KeyCode::Help),
    // Function keys
    (0x70, KeyCode::F1),
    (0x71, KeyCode::F2),
    (0x72, KeyCode::F3),
    (0x73, KeyCode::F4),
    (0x74, KeyCode::F5),
    (0x75, KeyCode::F6),
    (0x76, KeyCode::F7),
    (0x77, KeyCode::F8),
    (0x78, KeyCode::F9),
    (0x79, KeyCode::F10),
    (0x7A, KeyCode::F11),
    (0x7B, KeyCode::F12),
    (0x7C, KeyCode::F13),
    (0x7D, KeyCode::F14),
    (0x7E, KeyCode::F15),
    (0x7F, KeyCode::F16),
    (0x80, KeyCode::F17),
    (0x81, KeyCode::F18),
    (0x82, KeyCode::F19),
    (0x83, KeyCode::F20),
    (0x84, KeyCode::F21),
    (0x85, KeyCode::F22),
    (0x86, KeyCode::F23),
    (0x87, KeyCode::F24),
]);

/// Bit set on SDL keycodes derived from scancodes
const SDLK_SCANCODE_MASK: i32 = 1 << 30;

const fn sdl_scancode_key(scancode: i32) -> i32 {
    scancode | SDLK_SCANCODE_MASK
}

/// SDL2 `SDL_Keycode` values (left modifier variants)
pub static SDL_KEYS: Keymap<i32> = Keymap::new(&[
    // General keys
    (32, KeyCode::Space),
    (8, KeyCode::Backspace),
    (9, KeyCode::Tab),
    (sdl_scancode_key(156), KeyCode::Clear),
    (13, KeyCode::Return),
    (sdl_scancode_key(72), KeyCode::Pause),
    (27, KeyCode::Escape),
    (127, KeyCode::Delete),
    // Modifier keys (right GUI is Super)
    (sdl_scancode_key(225), KeyCode::Shift),
    (sdl_scancode_key(224), KeyCode::Control),
    (sdl_scancode_key(227), KeyCode::Meta),
    (sdl_scancode_key(226), KeyCode::Alt),
    (sdl_scancode_key(231), KeyCode::Super),
    // Navigation keys
    (sdl_scancode_key(75), KeyCode::PageUp),
    (sdl_scancode_key(78), KeyCode::PageDown),
    (sdl_scancode_key(77), KeyCode::End),
    (sdl_scancode_key(74), KeyCode::Home),
    (sdl_scancode_key(80), KeyCode::Left),
    (sdl_scancode_key(82), KeyCode::Up),
    (sdl_scancode_key(79), KeyCode::Right),
    (sdl_scancode_key(81), KeyCode::Down),
    // Editing keys
    (sdl_scancode_key(119), KeyCode::Select),
    (sdl_scancode_key(70), KeyCode::Print),
    (sdl_scancode_key(116), KeyCode::Execute),
    (sdl_scancode_key(73), KeyCode::Insert),
    (sdl_scancode_key(117), KeyCode::Help),
    // Function keys
    (sdl_scancode_key(58), KeyCode::F1),
    (sdl_scancode_key(59), KeyCode::F2),
    (sdl_scancode_key(60), KeyCode::F3),
    (sdl_scancode_key(61), KeyCode::F4),
    (sdl_scancode_key(62), KeyCode::F5),
    (sdl_scancode_key(63), KeyCode::F6),
    (sdl_scancode_key(64), KeyCode::F7),
    (sdl_scancode_key(65), KeyCode::F8),
    (sdl_scancode_key(66), KeyCode::F9),
    (sdl_scancode_key(67), KeyCode::F10),
    (sdl_scancode_key(68), KeyCode::F11),
    (sdl_scancode_key(69), KeyCode::F12),
    (sdl_scancode_key(104), KeyCode::F13),
    (sdl_scancode_key(105), KeyCode::F14),
    (sdl_scancode_key(106), KeyCode::F15),
    (sdl_scancode_key(107), KeyCode::F16),
    (sdl_scancode_key(108), KeyCode::F17),
    (sdl_scancode_key(109), KeyCode::F18),
    (sdl_scancode_key(110), KeyCode::F19),
    (sdl_scancode_key(111), KeyCode::F20),
    (sdl_scancode_key(112), KeyCode::F21),
    (sdl_scancode_key(113), KeyCode::F22),
    (sdl_scancode_key(114), KeyCode::F23),
    (sdl_scancode_key(115), KeyCode::F24),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_bijective<N: Copy + PartialEq + Eq + std::hash::Hash + std::fmt::Debug>(
        map: &Keymap<N>,
    ) {
        let natives: HashSet<N> = map.entries().iter().map(|(n, _)| *n).collect();
        let keys: HashSet<KeyCode> = map.entries().iter().map(|(_, k)| *k).collect();
        assert_eq!(natives.len(), map.entries().len(), "duplicate native code");
        assert_eq!(keys.len(), map.entries().len(), "duplicate normalized key");

        for &(native, key) in map.entries() {
            assert_eq!(map.to_normalized(native), Some(key));
            assert_eq!(map.to_native(key), Some(native));
        }
    }

    #[test]
    fn test_virtual_keys_round_trip() {
        assert_bijective(&VIRTUAL_KEYS);
    }

    #[test]
    fn test_sdl_keys_round_trip() {
        assert_bijective(&SDL_KEYS);
    }

    #[test]
    fn test_normalized_keys_round_trip_through_native() {
        for key in KeyCode::ALL {
            if let Some(native) = VIRTUAL_KEYS.to_native(key) {
                assert_eq!(VIRTUAL_KEYS.to_normalized(native), Some(key));
            }
            if let Some(native) = SDL_KEYS.to_native(key) {
                assert_eq!(SDL_KEYS.to_normalized(native), Some(key));
            }
        }
    }

    #[test]
    fn test_tables_cover_all_function_keys() {
        for key in KeyCode::ALL.iter().filter(|k| (0x41..=0x58).contains(&k.to_raw())) {
            assert!(VIRTUAL_KEYS.to_native(*key).is_some(), "{key:?}");
            assert!(SDL_KEYS.to_native(*key).is_some(), "{key:?}");
        }
    }

    #[test]
    fn test_unmapped_codes_yield_none() {
        // 'A' has no normalized key
        assert_eq!(VIRTUAL_KEYS.to_normalized(0x41), None);
        assert_eq!(VIRTUAL_KEYS.to_normalized(0), None);
        assert_eq!(SDL_KEYS.to_normalized('a' as i32), None);
        // Hyper has no virtual-key equivalent
        assert_eq!(VIRTUAL_KEYS.to_native(KeyCode::Hyper), None);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(VIRTUAL_KEYS.to_normalized(0x70), Some(KeyCode::F1));
        assert_eq!(VIRTUAL_KEYS.to_native(KeyCode::Escape), Some(0x1B));
        assert_eq!(SDL_KEYS.to_normalized(0x4000_003A), Some(KeyCode::F1));
        assert_eq!(SDL_KEYS.to_normalized(0x4000_0052), Some(KeyCode::Up));
    }
}
