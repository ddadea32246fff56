//! Input bridge
//!
//! Pushes the host's input snapshot into the GUI IO state once per frame and
//! answers host-side input queries only for devices the GUI did not claim.

use std::collections::HashSet;

use super::{Button, HostInput, Key, KeyMap, MouseButton};
use crate::foundation::math::Vec2;
use crate::gui::{IoState, KeyModifiers};
use crate::projection::CoordinateProjector;

/// Per-context input state
///
/// Key edges are derived from the bridge's own record of which keys were down
/// last frame, so a held key produces exactly one press.
#[derive(Debug, Default)]
pub struct InputBridge {
    keys_down: HashSet<Key>,
}

impl InputBridge {
    /// Create a bridge with no keys down
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the host input snapshot into `io`.
    ///
    /// Call once per frame before the GUI computes layout.
    pub fn prepare_io<H: HostInput + ?Sized>(
        &mut self,
        io: &mut IoState,
        host: &mut H,
        projector: &CoordinateProjector,
    ) {
        let viewport = projector.viewport();
        io.set_display_size(viewport.x, viewport.y);

        let scroll = host.mouse_scroll();
        io.add_mouse_wheel_delta(scroll.x, scroll.y);

        let mouse = projector.unproject(host.mouse_position());
        io.set_mouse_position(mouse.x, mouse.y);

        for button in MouseButton::ALL {
            io.set_mouse_button_down(button.index(), host.pressed(Button::Mouse(button)));
        }

        for (key, gui_key) in KeyMap::get().pairs() {
            let down = host.pressed(Button::Key(key));
            let was_down = self.keys_down.contains(&key);
            if down && !was_down {
                self.keys_down.insert(key);
                io.key_press(gui_key);
            } else if !down && was_down {
                self.keys_down.remove(&key);
                io.key_release(gui_key);
            }
        }

        io.modifiers = Self::modifiers(host);

        let typed = host.typed();
        if !typed.is_empty() {
            io.add_input_characters(&typed);
        }
    }

    /// Forget every held key (context teardown)
    pub fn reset(&mut self) {
        if !self.keys_down.is_empty() {
            log::debug!("Input bridge reset with {} keys held", self.keys_down.len());
        }
        self.keys_down.clear();
    }

    /// Whether the GUI claimed the device `button` belongs to this frame
    pub fn want_capture(io: &IoState, button: Button) -> bool {
        if button.is_mouse() {
            io.want_capture_mouse
        } else {
            io.want_capture_keyboard
        }
    }

    /// Host `just_pressed`, unless the GUI captured the device
    pub fn just_pressed<H: HostInput + ?Sized>(io: &IoState, host: &H, button: Button) -> bool {
        !Self::want_capture(io, button) && host.just_pressed(button)
    }

    /// Host `just_released`, unless the GUI captured the device
    pub fn just_released<H: HostInput + ?Sized>(io: &IoState, host: &H, button: Button) -> bool {
        !Self::want_capture(io, button) && host.just_released(button)
    }

    /// Host `pressed`, unless the GUI captured the device
    pub fn pressed<H: HostInput + ?Sized>(io: &IoState, host: &H, button: Button) -> bool {
        !Self::want_capture(io, button) && host.pressed(button)
    }

    /// Host `repeated`, unless the GUI captured the device
    pub fn repeated<H: HostInput + ?Sized>(io: &IoState, host: &H, button: Button) -> bool {
        !Self::want_capture(io, button) && host.repeated(button)
    }

    /// Host scroll, or zero while the GUI holds the mouse
    pub fn mouse_scroll<H: HostInput + ?Sized>(io: &IoState, host: &H) -> Vec2 {
        if io.want_capture_mouse {
            Vec2::zeros()
        } else {
            host.mouse_scroll()
        }
    }

    /// Either control key is down
    pub fn key_ctrl<H: HostInput + ?Sized>(host: &H) -> bool {
        either(host, Key::LeftControl, Key::RightControl)
    }

    /// Either shift key is down
    pub fn key_shift<H: HostInput + ?Sized>(host: &H) -> bool {
        either(host, Key::LeftShift, Key::RightShift)
    }

    /// Either alt key is down
    pub fn key_alt<H: HostInput + ?Sized>(host: &H) -> bool {
        either(host, Key::LeftAlt, Key::RightAlt)
    }

    /// Either super key is down
    pub fn key_super<H: HostInput + ?Sized>(host: &H) -> bool {
        either(host, Key::LeftSuper, Key::RightSuper)
    }

    fn modifiers<H: HostInput + ?Sized>(host: &H) -> KeyModifiers {
        let mut mods = KeyModifiers::empty();
        mods.set(KeyModifiers::CTRL, Self::key_ctrl(host));
        mods.set(KeyModifiers::SHIFT, Self::key_shift(host));
        mods.set(KeyModifiers::ALT, Self::key_alt(host));
        mods.set(KeyModifiers::SUPER, Self::key_super(host));
        mods
    }
}

fn either<H: HostInput + ?Sized>(host: &H, left: Key, right: Key) -> bool {
    host.pressed(Button::Key(left)) || host.pressed(Button::Key(right))
}
