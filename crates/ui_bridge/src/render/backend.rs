//! UI Render Backend Trait
//!
//! What the bridge needs from the host's 2D renderer: a single bound texture
//! (the shared atlas), a transform stack, and triangle submission.

use crate::atlas::AtlasPicture;
use crate::foundation::math::Mat3;

use super::UiTriangle;

/// Host 2D renderer as seen by the bridge
pub trait UiRenderBackend {
    /// Upload the atlas canvas, replacing the previously bound texture.
    ///
    /// Only called when [`AtlasPicture::generation`] changed since the last upload.
    fn upload_atlas(&mut self, picture: &AtlasPicture<'_>) -> Result<(), Box<dyn std::error::Error>>;

    /// Push a 2D affine transform applied to subsequent draws
    fn push_transform(&mut self, transform: Mat3) -> Result<(), Box<dyn std::error::Error>>;

    /// Draw triangles sampled from the last uploaded atlas
    ///
    /// # Arguments
    /// * `triangles` - Renderer-space triangles, each with its own clip rect
    fn draw_triangles(&mut self, triangles: &[UiTriangle]) -> Result<(), Box<dyn std::error::Error>>;

    /// Restore the transform active before the matching push
    fn pop_transform(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
