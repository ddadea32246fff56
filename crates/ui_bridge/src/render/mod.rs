//! Host renderer boundary
//!
//! Renderer-native triangle types, the [`UiRenderBackend`] trait the host
//! implements, and the translator that turns GUI draw data into triangles.

pub mod backend;
pub mod translator;

pub use backend::UiRenderBackend;
pub use translator::{DrawCommandTranslator, TranslateStats};

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Rect;

/// Vertex in renderer space with atlas UVs
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct UiVertex {
    /// Position in renderer space (bottom-left origin)
    pub position: [f32; 2],
    /// Texture coordinates normalized to the whole atlas
    pub uv: [f32; 2],
    /// RGBA color, channels in `[0, 1]`
    pub color: [f32; 4],
    /// Texture/color blend: 0 uses the texture as an alpha mask (font), 1
    /// samples it as a picture
    pub intensity: f32,
}

/// Scissor rectangle in renderer space
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ClipRect {
    /// Minimum corner
    pub min: [f32; 2],
    /// Maximum corner
    pub max: [f32; 2],
}

impl ClipRect {
    /// All zero: no clipping
    pub const NONE: Self = Self { min: [0.0; 2], max: [0.0; 2] };

    /// Whether clipping is disabled
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl From<Rect> for ClipRect {
    fn from(rect: Rect) -> Self {
        Self {
            min: [rect.min.x, rect.min.y],
            max: [rect.max.x, rect.max.y],
        }
    }
}

/// One textured triangle with its clip rectangle
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct UiTriangle {
    /// Corners in GUI index order
    pub vertices: [UiVertex; 3],
    /// Clip rectangle
    pub clip: ClipRect,
}

/// Reusable triangle buffer filled once per frame
#[derive(Debug, Default)]
pub struct TriangleBatch {
    triangles: Vec<UiTriangle>,
}

impl TriangleBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triangle
    pub fn push(&mut self, triangle: UiTriangle) {
        self.triangles.push(triangle);
    }

    /// Number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// No triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Drop all triangles, keeping the allocation
    pub fn clear(&mut self) {
        self.triangles.clear();
    }

    /// Drop triangles past `len`
    pub fn truncate(&mut self, len: usize) {
        self.triangles.truncate(len);
    }

    /// Triangles in draw order
    pub fn triangles(&self) -> &[UiTriangle] {
        &self.triangles
    }

    /// Raw bytes for direct upload into a vertex buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;

    #[test]
    fn test_triangle_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<UiVertex>(), 9 * 4);
        assert_eq!(std::mem::size_of::<UiTriangle>(), 3 * 9 * 4 + 4 * 4);
    }

    #[test]
    fn test_clip_rect_none() {
        assert!(ClipRect::NONE.is_none());
        let clip = ClipRect::from(Rect::from_corners(Vec2::new(1.0, 2.0), Vec2::new(0.0, 0.0)));
        assert!(!clip.is_none());
        assert_eq!(clip.min, [0.0, 0.0]);
        assert_eq!(clip.max, [1.0, 2.0]);
    }

    #[test]
    fn test_batch_bytes_track_len() {
        let mut batch = TriangleBatch::new();
        batch.push(UiTriangle::zeroed());
        batch.push(UiTriangle::zeroed());
        assert_eq!(batch.as_bytes().len(), 2 * std::mem::size_of::<UiTriangle>());
        batch.truncate(1);
        assert_eq!(batch.len(), 1);
        batch.clear();
        assert!(batch.is_empty());
    }
}
