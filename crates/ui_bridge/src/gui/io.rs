//! GUI library IO state
//!
//! Owned by the GUI library and written once per frame by the input bridge.
//! Mouse coordinates are in GUI space (top-left origin, Y down).

use bitflags::bitflags;

/// Number of tracked mouse buttons (left, right, middle, back, forward)
pub const MOUSE_BUTTON_COUNT: usize = 5;

bitflags! {
    /// Modifier keys held this frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Either control key
        const CTRL = 1 << 0;
        /// Either shift key
        const SHIFT = 1 << 1;
        /// Either alt key
        const ALT = 1 << 2;
        /// Either super (OS) key
        const SUPER = 1 << 3;
    }
}

/// Keys the GUI library understands for navigation and editing shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GuiKey {
    /// Tab
    Tab,
    /// Left arrow
    LeftArrow,
    /// Right arrow
    RightArrow,
    /// Up arrow
    UpArrow,
    /// Down arrow
    DownArrow,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Home
    Home,
    /// End
    End,
    /// Insert
    Insert,
    /// Delete
    Delete,
    /// Backspace
    Backspace,
    /// Space
    Space,
    /// Enter
    Enter,
    /// Escape
    Escape,
    /// Keypad enter
    KeypadEnter,
    /// A (select all)
    A,
    /// C (copy)
    C,
    /// V (paste)
    V,
    /// X (cut)
    X,
    /// Y (redo)
    Y,
    /// Z (undo)
    Z,
}

impl GuiKey {
    /// Every key, in declaration order
    pub const ALL: [Self; 22] = [
        Self::Tab,
        Self::LeftArrow,
        Self::RightArrow,
        Self::UpArrow,
        Self::DownArrow,
        Self::PageUp,
        Self::PageDown,
        Self::Home,
        Self::End,
        Self::Insert,
        Self::Delete,
        Self::Backspace,
        Self::Space,
        Self::Enter,
        Self::Escape,
        Self::KeypadEnter,
        Self::A,
        Self::C,
        Self::V,
        Self::X,
        Self::Y,
        Self::Z,
    ];

    /// Number of keys
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index for per-key arrays
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A key transition pushed for the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key
    pub key: GuiKey,
    /// `true` on press, `false` on release
    pub down: bool,
}

/// Per-frame input and display state shared with the GUI library
#[derive(Debug, Clone, PartialEq)]
pub struct IoState {
    /// Display size in pixels
    pub display_size: [f32; 2],
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Mouse position in GUI space
    pub mouse_pos: [f32; 2],
    /// Level-triggered mouse button state
    pub mouse_down: [bool; MOUSE_BUTTON_COUNT],
    /// Scroll accumulated since the library last consumed it (horizontal, vertical)
    pub mouse_wheel: [f32; 2],
    /// Keys currently down, indexed by [`GuiKey::index`]
    pub keys_down: [bool; GuiKey::COUNT],
    /// Press/release transitions since the library last consumed them
    pub key_events: Vec<KeyEvent>,
    /// Modifier keys held this frame
    pub modifiers: KeyModifiers,
    /// Typed text since the library last consumed it
    pub input_characters: String,
    /// Set by the library when it wants mouse input for itself
    pub want_capture_mouse: bool,
    /// Set by the library when it wants keyboard input for itself
    pub want_capture_keyboard: bool,
}

impl Default for IoState {
    fn default() -> Self {
        Self {
            display_size: [0.0, 0.0],
            delta_time: 0.0,
            mouse_pos: [0.0, 0.0],
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            mouse_wheel: [0.0, 0.0],
            keys_down: [false; GuiKey::COUNT],
            key_events: Vec::new(),
            modifiers: KeyModifiers::empty(),
            input_characters: String::new(),
            want_capture_mouse: false,
            want_capture_keyboard: false,
        }
    }
}

impl IoState {
    /// Set the display size
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        self.display_size = [width, height];
    }

    /// Set the mouse position (GUI space)
    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.mouse_pos = [x, y];
    }

    /// Set one mouse button's down state; out-of-range buttons are ignored
    pub fn set_mouse_button_down(&mut self, button: usize, down: bool) {
        if let Some(slot) = self.mouse_down.get_mut(button) {
            *slot = down;
        }
    }

    /// Accumulate scroll; several host scroll events may land in one frame
    pub fn add_mouse_wheel_delta(&mut self, x: f32, y: f32) {
        self.mouse_wheel[0] += x;
        self.mouse_wheel[1] += y;
    }

    /// Record a key press edge
    pub fn key_press(&mut self, key: GuiKey) {
        self.keys_down[key.index()] = true;
        self.key_events.push(KeyEvent { key, down: true });
    }

    /// Record a key release edge
    pub fn key_release(&mut self, key: GuiKey) {
        self.keys_down[key.index()] = false;
        self.key_events.push(KeyEvent { key, down: false });
    }

    /// Whether a key is currently down
    pub fn is_key_down(&self, key: GuiKey) -> bool {
        self.keys_down[key.index()]
    }

    /// Append typed text
    pub fn add_input_characters(&mut self, text: &str) {
        self.input_characters.push_str(text);
    }

    /// Clear the per-frame accumulators after the library consumed them
    pub fn end_frame(&mut self) {
        self.mouse_wheel = [0.0, 0.0];
        self.key_events.clear();
        self.input_characters.clear();
    }
}
