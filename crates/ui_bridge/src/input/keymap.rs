//! Host key <-> GUI key table

use std::collections::HashMap;
use std::sync::OnceLock;

use super::Key;
use crate::gui::GuiKey;

const PAIRS: [(Key, GuiKey); GuiKey::COUNT] = [
    (Key::Tab, GuiKey::Tab),
    (Key::Left, GuiKey::LeftArrow),
    (Key::Right, GuiKey::RightArrow),
    (Key::Up, GuiKey::UpArrow),
    (Key::Down, GuiKey::DownArrow),
    (Key::PageUp, GuiKey::PageUp),
    (Key::PageDown, GuiKey::PageDown),
    (Key::Home, GuiKey::Home),
    (Key::End, GuiKey::End),
    (Key::Insert, GuiKey::Insert),
    (Key::Delete, GuiKey::Delete),
    (Key::Backspace, GuiKey::Backspace),
    (Key::Space, GuiKey::Space),
    (Key::Enter, GuiKey::Enter),
    (Key::Escape, GuiKey::Escape),
    (Key::KpEnter, GuiKey::KeypadEnter),
    (Key::A, GuiKey::A),
    (Key::C, GuiKey::C),
    (Key::V, GuiKey::V),
    (Key::X, GuiKey::X),
    (Key::Y, GuiKey::Y),
    (Key::Z, GuiKey::Z),
];

/// Bidirectional key table, built on first use and shared afterwards.
///
/// Host keys without a GUI counterpart are never pushed into the IO state.
#[derive(Debug)]
pub struct KeyMap {
    to_gui: HashMap<Key, GuiKey>,
    to_host: HashMap<GuiKey, Key>,
}

impl KeyMap {
    /// The process-wide table
    pub fn get() -> &'static Self {
        static MAP: OnceLock<KeyMap> = OnceLock::new();
        MAP.get_or_init(|| Self {
            to_gui: PAIRS.iter().copied().collect(),
            to_host: PAIRS.iter().map(|&(host, gui)| (gui, host)).collect(),
        })
    }

    /// GUI key for a host key
    pub fn to_gui(&self, key: Key) -> Option<GuiKey> {
        self.to_gui.get(&key).copied()
    }

    /// Host key for a GUI key
    pub fn to_host(&self, key: GuiKey) -> Option<Key> {
        self.to_host.get(&key).copied()
    }

    /// Every mapped pair
    pub fn pairs(&self) -> impl Iterator<Item = (Key, GuiKey)> {
        PAIRS.into_iter()
    }
}
