//! Clipboard adapter from the host window to the GUI library

use std::cell::RefCell;
use std::rc::Rc;

use super::HostInput;
use crate::gui::ClipboardBackend;

/// Forwards GUI copy/paste to a shared host window.
///
/// Access uses `try_borrow_mut`: while the host is borrowed elsewhere, reads
/// return `None` and writes are discarded with a warning.
pub struct HostClipboard<H> {
    host: Rc<RefCell<H>>,
}

impl<H: HostInput> HostClipboard<H> {
    /// Wrap a shared host
    pub fn new(host: Rc<RefCell<H>>) -> Self {
        Self { host }
    }
}

impl<H: HostInput> ClipboardBackend for HostClipboard<H> {
    fn get(&mut self) -> Option<String> {
        match self.host.try_borrow_mut() {
            Ok(mut host) => host.clipboard_text(),
            Err(_) => {
                log::warn!("Clipboard read skipped: host window is busy");
                None
            }
        }
    }

    fn set(&mut self, text: &str) {
        match self.host.try_borrow_mut() {
            Ok(mut host) => host.set_clipboard_text(text),
            Err(_) => log::warn!("Clipboard write of {} bytes skipped: host window is busy", text.len()),
        }
    }
}
