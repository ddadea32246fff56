//! Shared texture atlas
//!
//! One growable RGBA canvas holds the GUI font atlas and every user image.
//! Entries are addressed by a monotonically assigned [`AtlasId`] or by an
//! optional alias chosen by the user (e.g. `"default-font"`).

pub mod image;
pub mod packer;

pub use self::image::ImageData;
pub use packer::{AtlasPacker, AtlasPicture};

use std::fmt;

use thiserror::Error;

/// Result type for atlas operations
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Errors that can occur during atlas operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// No live entry matches the key
    #[error("No atlas entry for {0}")]
    NotFound(AtlasKey),

    /// The alias is already bound to another entry
    #[error("Alias '{0}' is already in use")]
    DuplicateAlias(String),

    /// Zero-area images cannot be packed
    #[error("Cannot insert an empty {0}x{1} image")]
    EmptyImage(u32, u32),

    /// The canvas would have to grow past the configured maximum
    #[error("Atlas cannot grow to fit {width}x{height} (max dimension {max})")]
    TooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Configured maximum side length
        max: u32,
    },

    /// Pixel buffer length does not match the stated dimensions
    #[error("Pixel buffer of {len} bytes does not match {width}x{height}x{channels}")]
    SizeMismatch {
        /// Stated width
        width: u32,
        /// Stated height
        height: u32,
        /// Bytes per pixel
        channels: u32,
        /// Actual buffer length
        len: usize,
    },

    /// Image decoding failed
    #[error("Failed to load image: {0}")]
    ImageLoad(String),
}

/// Stable identifier of an atlas entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtlasId(pub u64);

impl fmt::Display for AtlasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lookup key: either the numeric id or the user-chosen alias
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtlasKey {
    /// Numeric id
    Id(AtlasId),
    /// Alias
    Alias(String),
}

impl fmt::Display for AtlasKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Alias(alias) => write!(f, "alias '{alias}'"),
        }
    }
}

impl From<AtlasId> for AtlasKey {
    fn from(id: AtlasId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for AtlasKey {
    fn from(alias: &str) -> Self {
        Self::Alias(alias.to_string())
    }
}

impl From<String> for AtlasKey {
    fn from(alias: String) -> Self {
        Self::Alias(alias)
    }
}

impl From<&String> for AtlasKey {
    fn from(alias: &String) -> Self {
        Self::Alias(alias.clone())
    }
}

/// What kind of texture an entry holds
///
/// Replaces a pointer-sized handle with a tagged variant resolved through the
/// atlas id table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSource {
    /// GUI library font atlas (alpha mask)
    Font,
    /// Region cut out of a host sprite sheet
    Sprite,
    /// Standalone decoded image
    Image,
}

/// Rectangle in atlas pixel coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Create a rectangle
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// One past the right edge
    #[inline]
    pub const fn max_x(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom edge
    #[inline]
    pub const fn max_y(&self) -> u32 {
        self.y + self.height
    }

    /// Zero area
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether a `width`x`height` block fits inside
    #[inline]
    pub const fn fits(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }

    /// Whether the two rectangles share any pixel
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// Whether `other` lies completely inside `self`
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}

/// UV rectangle (normalized texture coords)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// Top-left UV
    pub min: [f32; 2],
    /// Bottom-right UV
    pub max: [f32; 2],
}

/// A live atlas entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasEntry {
    /// Stable id
    pub id: AtlasId,
    /// Optional secondary key
    pub alias: Option<String>,
    /// Region occupied in the canvas
    pub bounds: PixelRect,
    /// What the region holds
    pub source: TextureSource,
    /// Rows were stored vertically mirrored
    pub flipped: bool,
}
