//! # UI Bridge
//!
//! Glue between an immediate-mode GUI library and a 2D renderer that only
//! understands triangle batches bound to a single texture.
//!
//! ## Pipeline
//!
//! - **Atlas packer** ([`atlas`]): one growable RGBA canvas shared by the GUI
//!   font atlas and any number of user images, addressed by id or alias.
//! - **Coordinate projector** ([`projection`]): Y-flip between the GUI's
//!   top-left origin and the renderer's bottom-left origin.
//! - **Input bridge** ([`input`]): pushes host input into the GUI IO state and
//!   arbitrates who owns an input event.
//! - **Draw command translator** ([`render`]): decodes the GUI's opaque
//!   vertex/index buffers into clipped, atlas-mapped triangles.
//! - **Frame lifecycle** ([`ui`]): `new_frame` → widgets → `draw`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ui_bridge::prelude::*;
//!
//! fn frame<G: GuiContext, H: HostInput, R: UiRenderBackend>(
//!     ui: &mut Ui<G>,
//!     host: &mut H,
//!     renderer: &mut R,
//! ) -> UiResult<()> {
//!     ui.new_frame(host)?;
//!     ui.image("player", 2.0)?;
//!     ui.draw(renderer)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod atlas;
pub mod projection;
pub mod gui;
pub mod render;
pub mod input;

mod error;
mod ui;

#[cfg(test)]
mod tests;

pub use error::{UiError, UiResult};
pub use ui::{FrameState, Ui, FONT_ALIAS};

/// Common imports for bridge users
pub mod prelude {
    pub use crate::{
        Ui, UiError, UiResult, FrameState,
        atlas::{AtlasId, AtlasKey, AtlasPacker, ImageData, PixelRect},
        config::{Config, UiConfig},
        gui::{GuiContext, IoState, TextureId},
        input::{Button, HostInput, Key, MouseButton},
        projection::CoordinateProjector,
        render::{UiRenderBackend, UiTriangle, UiVertex},
    };
}
