//! GLFW host adapter
//!
//! Key and button conversions plus [`GlfwInput`], a [`HostInput`] fed from the
//! window's event queue.

use std::collections::HashSet;

use glfw::{Action, WindowEvent};

use super::{Button, HostInput, Key, MouseButton};
use crate::foundation::math::Vec2;

macro_rules! glfw_keys {
    ($($name:ident),* $(,)?) => {
        impl Key {
            /// Convert a GLFW key; keys the bridge does not know map to `None`
            pub fn from_glfw(key: glfw::Key) -> Option<Self> {
                match key {
                    $(glfw::Key::$name => Some(Self::$name),)*
                    _ => None,
                }
            }

            /// The GLFW key for this key
            pub fn to_glfw(self) -> glfw::Key {
                match self {
                    $(Self::$name => glfw::Key::$name,)*
                }
            }
        }
    };
}

glfw_keys!(
    A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z, Num0,
    Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9, F1, F2, F3, F4, F5, F6, F7, F8,
    F9, F10, F11, F12, Space, Apostrophe, Comma, Minus, Period, Slash, Semicolon, Equal,
    LeftBracket, Backslash, RightBracket, GraveAccent, Escape, Enter, Tab, Backspace,
    Insert, Delete, Right, Left, Down, Up, PageUp, PageDown, Home, End, CapsLock,
    KpEnter, LeftShift, LeftControl, LeftAlt, LeftSuper, RightShift, RightControl,
    RightAlt, RightSuper, Menu,
);

impl MouseButton {
    /// Convert a GLFW mouse button; buttons past the fifth map to `None`
    pub fn from_glfw(button: glfw::MouseButton) -> Option<Self> {
        match button {
            glfw::MouseButton::Button1 => Some(Self::Left),
            glfw::MouseButton::Button2 => Some(Self::Right),
            glfw::MouseButton::Button3 => Some(Self::Middle),
            glfw::MouseButton::Button4 => Some(Self::Back),
            glfw::MouseButton::Button5 => Some(Self::Forward),
            _ => None,
        }
    }
}

/// Host input assembled from GLFW window events
///
/// Feed every event through [`handle_event`](Self::handle_event), then call
/// [`end_frame`](Self::end_frame) after the frame consumed the edges.
#[derive(Debug)]
pub struct GlfwInput {
    down: HashSet<Button>,
    pressed_this_frame: HashSet<Button>,
    released_this_frame: HashSet<Button>,
    repeated_this_frame: HashSet<Button>,
    cursor: Vec2,
    scroll: Vec2,
    viewport: Vec2,
    typed: String,
    clipboard: Option<String>,
}

impl GlfwInput {
    /// Create an input tracker for a framebuffer of the given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            down: HashSet::new(),
            pressed_this_frame: HashSet::new(),
            released_this_frame: HashSet::new(),
            repeated_this_frame: HashSet::new(),
            cursor: Vec2::zeros(),
            scroll: Vec2::zeros(),
            viewport: Vec2::new(width, height),
            typed: String::new(),
            clipboard: None,
        }
    }

    /// Apply one window event
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::Key(key, _, action, _) => {
                if let Some(key) = Key::from_glfw(key) {
                    self.apply(Button::Key(key), action);
                }
            }
            WindowEvent::MouseButton(button, action, _) => {
                if let Some(button) = MouseButton::from_glfw(button) {
                    self.apply(Button::Mouse(button), action);
                }
            }
            // GLFW reports the cursor from the top-left corner
            WindowEvent::CursorPos(x, y) => {
                self.cursor = Vec2::new(x as f32, self.viewport.y - y as f32);
            }
            WindowEvent::Scroll(x, y) => {
                self.scroll += Vec2::new(x as f32, y as f32);
            }
            WindowEvent::Char(c) => self.typed.push(c),
            WindowEvent::FramebufferSize(width, height) => {
                self.viewport = Vec2::new(width as f32, height as f32);
            }
            _ => {}
        }
    }

    /// Clear per-frame edges and scroll
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
        self.repeated_this_frame.clear();
        self.scroll = Vec2::zeros();
    }

    fn apply(&mut self, button: Button, action: Action) {
        match action {
            Action::Press => {
                self.down.insert(button);
                self.pressed_this_frame.insert(button);
            }
            Action::Release => {
                self.down.remove(&button);
                self.released_this_frame.insert(button);
            }
            Action::Repeat => {
                self.repeated_this_frame.insert(button);
            }
        }
    }
}

impl HostInput for GlfwInput {
    fn pressed(&self, button: Button) -> bool {
        self.down.contains(&button)
    }

    fn just_pressed(&self, button: Button) -> bool {
        self.pressed_this_frame.contains(&button)
    }

    fn just_released(&self, button: Button) -> bool {
        self.released_this_frame.contains(&button)
    }

    fn repeated(&self, button: Button) -> bool {
        self.repeated_this_frame.contains(&button)
    }

    fn mouse_position(&self) -> Vec2 {
        self.cursor
    }

    fn mouse_scroll(&self) -> Vec2 {
        self.scroll
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn typed(&mut self) -> String {
        std::mem::take(&mut self.typed)
    }

    // Kept in-process; the window owns the system clipboard and is not
    // borrowed here.
    fn clipboard_text(&mut self) -> Option<String> {
        self.clipboard.clone()
    }

    fn set_clipboard_text(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_conversion_round_trip() {
        assert_eq!(Key::from_glfw(glfw::Key::Enter), Some(Key::Enter));
        assert_eq!(Key::KpEnter.to_glfw(), glfw::Key::KpEnter);
        assert_eq!(Key::from_glfw(glfw::Key::F20), None);
    }

    #[test]
    fn test_events_drive_edges() {
        let mut input = GlfwInput::new(100.0, 50.0);
        let left = Button::Mouse(MouseButton::Left);
        input.handle_event(&WindowEvent::MouseButton(glfw::MouseButton::Button1, Action::Press, glfw::Modifiers::empty()));
        input.handle_event(&WindowEvent::CursorPos(10.0, 20.0));
        input.handle_event(&WindowEvent::Scroll(0.0, 1.0));
        input.handle_event(&WindowEvent::Scroll(0.0, 2.0));

        assert!(input.just_pressed(left));
        assert!(input.pressed(left));
        assert_eq!(input.mouse_position(), Vec2::new(10.0, 30.0));
        assert_eq!(input.mouse_scroll(), Vec2::new(0.0, 3.0));

        input.end_frame();
        assert!(!input.just_pressed(left));
        assert!(input.pressed(left));
        assert_eq!(input.mouse_scroll(), Vec2::zeros());
    }
}
