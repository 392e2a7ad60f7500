//! Window configuration and window state vocabulary

/// Opaque identifier of a platform window
///
/// Backends pick the value (winit window id, canvas index, SDL window id);
/// the engine only uses it to find its own window record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub u64);

impl NativeHandle {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// RGBA color with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Window configuration
#[derive(Clone, Debug)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width in backend units
    pub width: f32,
    /// Initial height in backend units
    pub height: f32,
    /// Whether the window can be resized
    pub resizable: bool,
    /// Whether the window is shown immediately
    pub visible: bool,
    /// Color the draw surface is cleared to before the draw callback runs
    pub background: Color,
    /// Initial cursor shape
    pub cursor: Cursor,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pane".to_string(),
            width: 800.0,
            height: 600.0,
            resizable: true,
            visible: true,
            background: Color::default(),
            cursor: Cursor::default(),
        }
    }
}

impl WindowConfig {
    /// Create a new window configuration with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the window size
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set whether the window is resizable
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set whether the window starts visible
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the background color
    pub fn background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Set the initial cursor
    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }
}

/// Window visibility state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Minimized,
    Maximized,
    Fullscreen,
}

impl Visibility {
    /// Whether the window contents can be seen at all
    pub fn is_shown(self) -> bool {
        !matches!(self, Visibility::Hidden | Visibility::Minimized)
    }
}

/// Window focus state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Focus {
    Focused,
    #[default]
    Unfocused,
}

impl From<bool> for Focus {
    fn from(focused: bool) -> Self {
        if focused {
            Focus::Focused
        } else {
            Focus::Unfocused
        }
    }
}

/// Cursor shapes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Default arrow cursor
    #[default]
    Arrow,
    /// Text/I-beam cursor
    IBeam,
    /// Pointing hand (for clickable elements)
    Hand,
    /// Crosshair cursor
    Crosshair,
    /// Four-way move cursor
    SizeAll,
    /// Northwest-Southeast resize cursor
    SizeNWSE,
    /// Northeast-Southwest resize cursor
    SizeNESW,
    /// West-East resize cursor
    SizeWE,
    /// North-South resize cursor
    SizeNS,
}

impl Cursor {
    /// CSS `cursor` property value
    pub fn css_name(self) -> &'static str {
        match self {
            Cursor::Arrow => "default",
            Cursor::IBeam => "text",
            Cursor::Hand => "pointer",
            Cursor::Crosshair => "crosshair",
            Cursor::SizeAll => "move",
            Cursor::SizeNWSE => "nwse-resize",
            Cursor::SizeNESW => "nesw-resize",
            Cursor::SizeWE => "ew-resize",
            Cursor::SizeNS => "ns-resize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WindowConfig::new("Demo")
            .size(320.0, 240.0)
            .resizable(false)
            .cursor(Cursor::Hand);
        assert_eq!(config.title, "Demo");
        assert_eq!((config.width, config.height), (320.0, 240.0));
        assert!(!config.resizable);
        assert!(config.visible);
        assert_eq!(config.cursor, Cursor::Hand);
    }

    #[test]
    fn test_visibility_is_shown() {
        assert!(Visibility::Visible.is_shown());
        assert!(Visibility::Fullscreen.is_shown());
        assert!(!Visibility::Minimized.is_shown());
        assert!(!Visibility::Hidden.is_shown());
    }
}
