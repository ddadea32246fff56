//! Coordinate conversion between GUI space and renderer space
//!
//! The GUI library lays out in a top-left-origin, Y-down space; the host
//! renderer draws in a bottom-left-origin, Y-up space of the same size. The
//! two are related by a Y-flip anchored at the viewport center.

use crate::foundation::math::{Mat3, Point2, Rect, Vec2};

/// Affine Y-flip for the current viewport
///
/// Passed explicitly to every call that needs it instead of being looked up
/// from a process-wide "current context".
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateProjector {
    viewport: Vec2,
    forward: Mat3,
    inverse: Mat3,
}

impl CoordinateProjector {
    /// Create a projector for a viewport of the given size
    pub fn new(viewport: Vec2) -> Self {
        let (forward, inverse) = Self::flip_about_center(viewport);
        Self { viewport, forward, inverse }
    }

    /// Re-derive the transform if the viewport size changed.
    ///
    /// Returns `true` when it did.
    pub fn resize(&mut self, viewport: Vec2) -> bool {
        if viewport == self.viewport {
            return false;
        }
        *self = Self::new(viewport);
        true
    }

    /// Current viewport size
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// GUI space to renderer space
    pub fn matrix(&self) -> &Mat3 {
        &self.forward
    }

    /// Renderer space to GUI space
    pub fn inverse_matrix(&self) -> &Mat3 {
        &self.inverse
    }

    /// Map a GUI-space point into renderer space
    pub fn project(&self, p: Vec2) -> Vec2 {
        self.forward.transform_point(&Point2::from(p)).coords
    }

    /// Map a renderer-space point into GUI space
    pub fn unproject(&self, p: Vec2) -> Vec2 {
        self.inverse.transform_point(&Point2::from(p)).coords
    }

    /// Project both corners of a GUI-space rectangle and normalize the result
    pub fn project_rect(&self, a: Vec2, b: Vec2) -> Rect {
        Rect::from_corners(self.project(a), self.project(b))
    }

    fn flip_about_center(viewport: Vec2) -> (Mat3, Mat3) {
        let center = Point2::from(viewport * 0.5);
        let flip = Vec2::new(1.0, -1.0);
        // A mirror is its own inverse.
        let forward = Mat3::new_nonuniform_scaling_wrt_point(&flip, &center);
        let inverse = Mat3::new_nonuniform_scaling_wrt_point(&flip.map(|s| 1.0 / s), &center);
        (forward, inverse)
    }
}
