//! Host input boundary and the bridge into the GUI IO state

pub mod bridge;
pub mod clipboard;
#[cfg(feature = "glfw")]
pub mod glfw;
pub mod keymap;

pub use bridge::InputBridge;
pub use clipboard::HostClipboard;
pub use keymap::KeyMap;

use crate::foundation::math::Vec2;

/// Host keyboard keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// 0 key (top row)
    Num0,
    /// 1 key (top row)
    Num1,
    /// 2 key (top row)
    Num2,
    /// 3 key (top row)
    Num3,
    /// 4 key (top row)
    Num4,
    /// 5 key (top row)
    Num5,
    /// 6 key (top row)
    Num6,
    /// 7 key (top row)
    Num7,
    /// 8 key (top row)
    Num8,
    /// 9 key (top row)
    Num9,
    /// F1 key
    F1,
    /// F2 key
    F2,
    /// F3 key
    F3,
    /// F4 key
    F4,
    /// F5 key
    F5,
    /// F6 key
    F6,
    /// F7 key
    F7,
    /// F8 key
    F8,
    /// F9 key
    F9,
    /// F10 key
    F10,
    /// F11 key
    F11,
    /// F12 key
    F12,
    /// Space bar
    Space,
    /// Apostrophe
    Apostrophe,
    /// Comma
    Comma,
    /// Minus
    Minus,
    /// Period
    Period,
    /// Slash
    Slash,
    /// Semicolon
    Semicolon,
    /// Equal sign
    Equal,
    /// Left bracket
    LeftBracket,
    /// Backslash
    Backslash,
    /// Right bracket
    RightBracket,
    /// Grave accent
    GraveAccent,
    /// Escape key
    Escape,
    /// Enter key
    Enter,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Insert key
    Insert,
    /// Delete key
    Delete,
    /// Right arrow
    Right,
    /// Left arrow
    Left,
    /// Down arrow
    Down,
    /// Up arrow
    Up,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Home key
    Home,
    /// End key
    End,
    /// Caps lock
    CapsLock,
    /// Keypad enter
    KpEnter,
    /// Left shift
    LeftShift,
    /// Left control
    LeftControl,
    /// Left alt
    LeftAlt,
    /// Left super (OS) key
    LeftSuper,
    /// Right shift
    RightShift,
    /// Right control
    RightControl,
    /// Right alt
    RightAlt,
    /// Right super (OS) key
    RightSuper,
    /// Menu key
    Menu,
}

/// Host mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Fourth button (usually "back")
    Back,
    /// Fifth button (usually "forward")
    Forward,
}

impl MouseButton {
    /// Every button, in IO slot order
    pub const ALL: [Self; 5] = [Self::Left, Self::Right, Self::Middle, Self::Back, Self::Forward];

    /// Slot in [`IoState::mouse_down`](crate::gui::IoState::mouse_down)
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Anything the host can report as pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// A mouse button
    Mouse(MouseButton),
    /// A keyboard key
    Key(Key),
}

impl Button {
    /// Whether the button belongs to the mouse
    pub fn is_mouse(self) -> bool {
        matches!(self, Self::Mouse(_))
    }
}

impl From<MouseButton> for Button {
    fn from(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

impl From<Key> for Button {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

/// Host window input as seen by the bridge
///
/// Positions are in renderer space (bottom-left origin). Edge queries refer to
/// the host's own notion of "this frame".
pub trait HostInput {
    /// Button is currently down
    fn pressed(&self, button: Button) -> bool;

    /// Button went down this frame
    fn just_pressed(&self, button: Button) -> bool;

    /// Button went up this frame
    fn just_released(&self, button: Button) -> bool;

    /// Key auto-repeat fired this frame
    fn repeated(&self, button: Button) -> bool;

    /// Cursor position in renderer space
    fn mouse_position(&self) -> Vec2;

    /// Scroll since the previous frame (horizontal, vertical)
    fn mouse_scroll(&self) -> Vec2;

    /// Drawable area in pixels
    fn viewport_size(&self) -> Vec2;

    /// Text typed since the previous call; the host queue is drained
    fn typed(&mut self) -> String;

    /// Current clipboard text
    fn clipboard_text(&mut self) -> Option<String>;

    /// Replace the clipboard text
    fn set_clipboard_text(&mut self, text: &str);
}
