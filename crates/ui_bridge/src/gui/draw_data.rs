//! Per-frame draw data produced by the GUI library

use std::fmt;
use std::rc::Rc;

use super::TextureId;

/// Host hook attached to a draw command instead of geometry
pub type DrawCallback = Rc<dyn Fn(&DrawList, &DrawCommand)>;

/// One instruction: a run of indices drawn with one texture and one clip rect
#[derive(Clone)]
pub struct DrawCommand {
    /// Number of indices consumed from the list's index buffer
    pub element_count: usize,
    /// Clip rectangle `[x1, y1, x2, y2]` in GUI space; all zero disables clipping
    pub clip_rect: [f32; 4],
    /// Texture the GUI library believes it bound
    pub texture_id: TextureId,
    /// Custom rendering hook
    pub callback: Option<DrawCallback>,
}

impl DrawCommand {
    /// Geometry command
    pub fn new(element_count: usize, clip_rect: [f32; 4], texture_id: TextureId) -> Self {
        Self { element_count, clip_rect, texture_id, callback: None }
    }

    /// Callback command
    pub fn with_callback(callback: DrawCallback) -> Self {
        Self { element_count: 0, clip_rect: [0.0; 4], texture_id: TextureId::default(), callback: Some(callback) }
    }

    /// Whether the command carries a host callback
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCommand")
            .field("element_count", &self.element_count)
            .field("clip_rect", &self.clip_rect)
            .field("texture_id", &self.texture_id)
            .field("has_callback", &self.has_callback())
            .finish()
    }
}

/// Commands sharing one vertex buffer and one index buffer
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Interleaved vertices, decoded through the render layout
    pub vertex_bytes: Vec<u8>,
    /// Packed indices, `index_size` bytes each
    pub index_bytes: Vec<u8>,
    /// Commands in render order
    pub commands: Vec<DrawCommand>,
}

/// All draw lists of one frame, in render order
#[derive(Debug, Clone, Default)]
pub struct DrawData {
    /// Command lists
    pub lists: Vec<DrawList>,
}

impl DrawData {
    /// Total commands across all lists
    pub fn command_count(&self) -> usize {
        self.lists.iter().map(|l| l.commands.len()).sum()
    }

    /// Drop all lists, keeping allocations
    pub fn clear(&mut self) {
        self.lists.clear();
    }
}
