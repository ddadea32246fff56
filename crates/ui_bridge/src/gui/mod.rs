//! GUI library boundary
//!
//! The immediate-mode GUI library is an external collaborator. This module
//! defines what the bridge needs from it: the IO state, the font atlas
//! bitmap, the per-frame draw data and its runtime buffer layout.

pub mod draw_data;
pub mod io;
pub mod layout;

pub use draw_data::{DrawCallback, DrawCommand, DrawData, DrawList};
pub use io::{GuiKey, IoState, KeyModifiers, MOUSE_BUTTON_COUNT};
pub use layout::{IndexReader, RawVertex, RenderLayoutDescriptor, Rgba, VertexLayout, VertexReader};

use std::path::Path;

use crate::atlas::AtlasId;

/// Opaque texture handle the GUI library round-trips inside draw commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u64);

impl From<AtlasId> for TextureId {
    fn from(id: AtlasId) -> Self {
        Self(id.0)
    }
}

impl From<TextureId> for AtlasId {
    fn from(id: TextureId) -> Self {
        Self(id.0)
    }
}

/// Single-channel font atlas bitmap produced by the GUI font builder
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontTexture {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// One alpha byte per pixel, rows top to bottom
    pub pixels: Vec<u8>,
}

/// Clipboard access the GUI library calls for copy/paste
pub trait ClipboardBackend {
    /// Current clipboard text, if any
    fn get(&mut self) -> Option<String>;

    /// Replace the clipboard text
    fn set(&mut self, text: &str);
}

/// The immediate-mode GUI library as seen by the bridge
pub trait GuiContext {
    /// Shared IO state
    fn io(&self) -> &IoState;

    /// Shared IO state, writable by the input bridge
    fn io_mut(&mut self) -> &mut IoState;

    /// Add the library's built-in font to the font builder
    fn add_font_default(&mut self);

    /// Add a TrueType font from disk to the font builder
    fn add_font_from_file_ttf(&mut self, path: &Path, size_pixels: f32) -> Result<(), String>;

    /// Rasterize all added fonts into the font atlas
    fn build_fonts(&mut self) -> Result<(), String>;

    /// The font atlas bitmap as an alpha mask
    fn font_texture_alpha8(&self) -> FontTexture;

    /// Tell the library which texture id the font atlas lives under
    fn set_font_texture_id(&mut self, id: TextureId);

    /// Interleaved vertex layout of this library build
    fn vertex_buffer_layout(&self) -> VertexLayout;

    /// Size in bytes of one index
    fn index_size(&self) -> usize;

    /// Begin accumulating widgets for a frame
    fn new_frame(&mut self);

    /// Finalize the frame and return its draw data
    fn render(&mut self) -> &DrawData;

    /// Emit an image widget
    fn image(&mut self, texture: TextureId, size: [f32; 2]);

    /// Emit an image button widget, returning `true` when clicked
    fn image_button(&mut self, texture: TextureId, size: [f32; 2]) -> bool;

    /// Install the clipboard the library uses for copy/paste
    fn set_clipboard_backend(&mut self, backend: Box<dyn ClipboardBackend>);
}
