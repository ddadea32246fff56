//! Image data for atlas insertion
//!
//! Decoding is delegated to the `image` crate; the atlas only ever sees
//! RGBA8 pixels.

use std::path::Path;

use super::{AtlasError, AtlasResult, PixelRect};

/// Bytes per RGBA8 pixel
pub const CHANNELS: u32 = 4;

/// Decoded RGBA8 image, rows stored top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Wrap an existing RGBA8 buffer, checking its length
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> AtlasResult<Self> {
        if data.len() != pixel_len(width, height, CHANNELS) {
            return Err(AtlasError::SizeMismatch { width, height, channels: CHANNELS, len: data.len() });
        }
        Ok(Self { data, width, height })
    }

    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> AtlasResult<Self> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        let img = ::image::open(path_ref)
            .map_err(|e| AtlasError::ImageLoad(format!("{}: {}", path_ref.display(), e)))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::info!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Load image from memory (useful for embedded resources)
    pub fn from_bytes(bytes: &[u8]) -> AtlasResult<Self> {
        let img = ::image::load_from_memory(bytes)
            .map_err(|e| AtlasError::ImageLoad(format!("in-memory image: {}", e)))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Loaded image {}x{} from memory", width, height);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Expand a single-channel alpha bitmap (the GUI font atlas) to RGBA.
    ///
    /// Color channels are white so the vertex color alone decides the tint.
    pub fn from_alpha8(width: u32, height: u32, alpha: &[u8]) -> AtlasResult<Self> {
        if alpha.len() != pixel_len(width, height, 1) {
            return Err(AtlasError::SizeMismatch { width, height, channels: 1, len: alpha.len() });
        }

        let data = alpha.iter().flat_map(|&a| [255, 255, 255, a]).collect();
        Ok(Self { data, width, height })
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = pixel_len(width, height, 1);
        let mut data = Vec::with_capacity(pixel_count * CHANNELS as usize);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
        }
    }

    /// Copy of this image with the row order reversed
    pub fn flipped_vertical(&self) -> Self {
        let row = self.row_len();
        let data = if row == 0 {
            Vec::new()
        } else {
            self.data.chunks_exact(row).rev().flatten().copied().collect()
        };
        Self { data, width: self.width, height: self.height }
    }

    /// Copy out the pixels inside `frame`
    pub fn sub_image(&self, frame: PixelRect) -> AtlasResult<Self> {
        let whole = PixelRect::new(0, 0, self.width, self.height);
        if !whole.contains_rect(&frame) {
            return Err(AtlasError::SizeMismatch {
                width: frame.max_x(),
                height: frame.max_y(),
                channels: CHANNELS,
                len: self.data.len(),
            });
        }

        let row = self.row_len();
        let start = frame.x as usize * CHANNELS as usize;
        let len = frame.width as usize * CHANNELS as usize;
        let mut data = Vec::with_capacity(len * frame.height as usize);
        for y in frame.y..frame.max_y() {
            let offset = y as usize * row + start;
            data.extend_from_slice(&self.data[offset..offset + len]);
        }

        Ok(Self { data, width: frame.width, height: frame.height })
    }

    /// Bytes per row
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * CHANNELS as usize
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Zero width or height
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA of the pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.row_len() + x as usize * CHANNELS as usize;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[inline]
fn pixel_len(width: u32, height: u32, channels: u32) -> usize {
    width as usize * height as usize * channels as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> ImageData {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        ImageData::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);

        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_from_rgba_rejects_wrong_length() {
        let err = ImageData::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, AtlasError::SizeMismatch { len: 15, .. }));
    }

    #[test]
    fn test_alpha8_expands_to_white() {
        let img = ImageData::from_alpha8(2, 1, &[0, 200]).unwrap();
        assert_eq!(img.pixel(0, 0), Some([255, 255, 255, 0]));
        assert_eq!(img.pixel(1, 0), Some([255, 255, 255, 200]));
    }

    #[test]
    fn test_flipped_vertical_reverses_rows() {
        let img = gradient(3, 2);
        let flipped = img.flipped_vertical();
        assert_eq!(flipped.pixel(2, 0), img.pixel(2, 1));
        assert_eq!(flipped.pixel(0, 1), img.pixel(0, 0));
        assert_eq!(flipped.flipped_vertical(), img);
    }

    #[test]
    fn test_sub_image_copies_frame() {
        let img = gradient(8, 8);
        let sub = img.sub_image(PixelRect::new(2, 3, 4, 2)).unwrap();
        assert_eq!((sub.width, sub.height), (4, 2));
        assert_eq!(sub.pixel(0, 0), Some([2, 3, 0, 255]));
        assert_eq!(sub.pixel(3, 1), Some([5, 4, 0, 255]));
    }

    #[test]
    fn test_sub_image_out_of_bounds() {
        let img = gradient(4, 4);
        assert!(img.sub_image(PixelRect::new(2, 2, 4, 1)).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ImageData::from_file("does/not/exist.png").unwrap_err();
        match err {
            AtlasError::ImageLoad(msg) => assert!(msg.contains("exist.png")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
