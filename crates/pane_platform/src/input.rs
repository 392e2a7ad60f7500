//! Input event types for pointer and keyboard

// ============================================================================
// Pointer
// ============================================================================

/// The physical button or touch point that generated a pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// Left mouse button or the first touch point
    Primary,
    /// Right mouse button
    Secondary,
    /// Middle mouse button (scroll wheel click)
    Tertiary,
    /// First extra button (back / X1)
    Extended1,
    /// Second extra button (forward / X2)
    Extended2,
}

impl PointerAction {
    /// Number of distinct pointer actions
    pub const COUNT: usize = 5;

    /// All actions in declaration order
    pub const ALL: [PointerAction; Self::COUNT] = [
        PointerAction::Primary,
        PointerAction::Secondary,
        PointerAction::Tertiary,
        PointerAction::Extended1,
        PointerAction::Extended2,
    ];

    /// Dense index, usable for fixed-size per-action tables
    pub fn index(self) -> usize {
        match self {
            PointerAction::Primary => 0,
            PointerAction::Secondary => 1,
            PointerAction::Tertiary => 2,
            PointerAction::Extended1 => 3,
            PointerAction::Extended2 => 4,
        }
    }
}

/// Phase of a pointer gesture as seen by the view tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Begin,
    Move,
    End,
    Cancel,
}

/// Pointer events
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to position
    Moved {
        /// X position in window coordinates
        x: f32,
        /// Y position in window coordinates
        y: f32,
    },
    /// A pointer action started (button pressed / touch down)
    Pressed {
        action: PointerAction,
        x: f32,
        y: f32,
    },
    /// A pointer action finished (button released / touch up)
    Released {
        action: PointerAction,
        x: f32,
        y: f32,
    },
    /// The platform interrupted the gesture (e.g. touch cancel)
    Cancelled { x: f32, y: f32 },
    /// Pointer left the client area
    Left,
}

// ============================================================================
// Keyboard
// ============================================================================

/// Key press/release state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key was pressed
    Pressed,
    /// Key was released
    Released,
}

/// Normalized key codes
///
/// The numeric values are stable and grouped by category; zero is never a
/// valid key and is how "no key" is encoded when a raw value is required.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum KeyCode {
    // General keys
    Space = 0x01,
    Backspace = 0x02,
    Tab = 0x03,
    Clear = 0x04,
    Return = 0x05,
    Pause = 0x06,
    Escape = 0x07,
    Delete = 0x08,

    // Modifier keys
    Shift = 0x11,
    Control = 0x12,
    Meta = 0x13,
    Alt = 0x14,
    Super = 0x15,
    Hyper = 0x16,

    // Navigation keys
    PageUp = 0x21,
    PageDown = 0x22,
    End = 0x23,
    Home = 0x24,
    Left = 0x25,
    Up = 0x26,
    Right = 0x27,
    Down = 0x28,

    // Editing keys
    Select = 0x31,
    Print = 0x32,
    Execute = 0x33,
    Insert = 0x34,
    Help = 0x35,

    // Function keys
    F1 = 0x41,
    F2 = 0x42,
    F3 = 0x43,
    F4 = 0x44,
    F5 = 0x45,
    F6 = 0x46,
    F7 = 0x47,
    F8 = 0x48,
    F9 = 0x49,
    F10 = 0x4A,
    F11 = 0x4B,
    F12 = 0x4C,
    F13 = 0x4D,
    F14 = 0x4E,
    F15 = 0x4F,
    F16 = 0x50,
    F17 = 0x51,
    F18 = 0x52,
    F19 = 0x53,
    F20 = 0x54,
    F21 = 0x55,
    F22 = 0x56,
    F23 = 0x57,
    F24 = 0x58,
}

impl KeyCode {
    /// Every normalized key, in numeric order
    pub const ALL: [KeyCode; 51] = [
        KeyCode::Space,
        KeyCode::Backspace,
        KeyCode::Tab,
        KeyCode::Clear,
        KeyCode::Return,
        KeyCode::Pause,
        KeyCode::Escape,
        KeyCode::Delete,
        KeyCode::Shift,
        KeyCode::Control,
        KeyCode::Meta,
        KeyCode::Alt,
        KeyCode::Super,
        KeyCode::Hyper,
        KeyCode::PageUp,
        KeyCode::PageDown,
        KeyCode::End,
        KeyCode::Home,
        KeyCode::Left,
        KeyCode::Up,
        KeyCode::Right,
        KeyCode::Down,
        KeyCode::Select,
        KeyCode::Print,
        KeyCode::Execute,
        KeyCode::Insert,
        KeyCode::Help,
        KeyCode::F1,
        KeyCode::F2,
        KeyCode::F3,
        KeyCode::F4,
        KeyCode::F5,
        KeyCode::F6,
        KeyCode::F7,
        KeyCode::F8,
        KeyCode::F9,
        KeyCode::F10,
        KeyCode::F11,
        KeyCode::F12,
        KeyCode::F13,
        KeyCode::F14,
        KeyCode::F15,
        KeyCode::F16,
        KeyCode::F17,
        KeyCode::F18,
        KeyCode::F19,
        KeyCode::F20,
        KeyCode::F21,
        KeyCode::F22,
        KeyCode::F23,
        KeyCode::F24,
    ];

    /// Raw numeric value
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Look up a key by its raw numeric value
    pub fn from_raw(raw: u32) -> Option<KeyCode> {
        Self::ALL.iter().copied().find(|key| key.to_raw() == raw)
    }
}

// ============================================================================
// Input events
// ============================================================================

/// Input events
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer event (mouse or single touch point)
    Pointer(PointerEvent),
    /// Scroll/wheel event, in lines
    Scroll {
        /// Horizontal scroll delta
        delta_x: f32,
        /// Vertical scroll delta
        delta_y: f32,
    },
    /// A key changed state
    Key { key: KeyCode, state: KeyState },
    /// One UTF-16 code unit of text input
    ///
    /// Text always travels as code units so every backend goes through the
    /// same surrogate-pair assembly and control-character filtering.
    CodeUnit(u16),
}

impl InputEvent {
    /// Text input as a sequence of code-unit events
    pub fn text(text: &str) -> impl Iterator<Item = InputEvent> + '_ {
        text.encode_utf16().map(InputEvent::CodeUnit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycode_raw_round_trip() {
        for key in KeyCode::ALL {
            assert_eq!(KeyCode::from_raw(key.to_raw()), Some(key));
        }
        assert_eq!(KeyCode::from_raw(0), None);
        assert_eq!(KeyCode::from_raw(0x59), None);
    }

    #[test]
    fn test_keycode_all_is_sorted_and_unique() {
        let raws: Vec<u32> = KeyCode::ALL.iter().map(|k| k.to_raw()).collect();
        assert!(raws.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_pointer_action_index_is_dense() {
        for (i, action) in PointerAction::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }

    #[test]
    fn test_text_splits_into_code_units() {
        let units: Vec<_> = InputEvent::text("a\u{1F600}").collect();
        assert_eq!(
            units,
            vec![
                InputEvent::CodeUnit(0x61),
                InputEvent::CodeUnit(0xD83D),
                InputEvent::CodeUnit(0xDE00),
            ]
        );
    }
}
