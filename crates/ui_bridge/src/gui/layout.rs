//! Descriptor-driven decoding of the GUI library's vertex and index buffers
//!
//! Field offsets and strides come from the library at runtime, so vertices
//! are read by byte offset rather than through a fixed `#[repr(C)]` struct.

use crate::{UiError, UiResult};

const VEC2_SIZE: usize = std::mem::size_of::<[f32; 2]>();
const COLOR_SIZE: usize = std::mem::size_of::<u32>();

/// Interleaved vertex layout reported by the GUI library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Bytes between consecutive vertices
    pub stride: usize,
    /// Offset of the `[f32; 2]` position
    pub position_offset: usize,
    /// Offset of the `[f32; 2]` texture coordinate
    pub uv_offset: usize,
    /// Offset of the packed 32-bit color
    pub color_offset: usize,
}

/// Everything needed to decode one draw list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLayoutDescriptor {
    /// Bytes between consecutive vertices
    pub vertex_stride: usize,
    /// Offset of the position field
    pub position_offset: usize,
    /// Offset of the UV field
    pub uv_offset: usize,
    /// Offset of the color field
    pub color_offset: usize,
    /// Bytes per index (2 or 4)
    pub index_size: usize,
}

impl RenderLayoutDescriptor {
    /// Combine the vertex layout with the index size
    pub fn from_parts(vertex: VertexLayout, index_size: usize) -> Self {
        Self {
            vertex_stride: vertex.stride,
            position_offset: vertex.position_offset,
            uv_offset: vertex.uv_offset,
            color_offset: vertex.color_offset,
            index_size,
        }
    }

    /// Reject layouts that cannot be decoded
    pub fn validate(&self) -> UiResult<()> {
        if self.vertex_stride == 0 {
            return Err(UiError::InvalidLayout("vertex stride is zero".into()));
        }

        let fields = [
            ("position", self.position_offset, VEC2_SIZE),
            ("uv", self.uv_offset, VEC2_SIZE),
            ("color", self.color_offset, COLOR_SIZE),
        ];
        for (name, offset, size) in fields {
            if offset + size > self.vertex_stride {
                return Err(UiError::InvalidLayout(format!(
                    "{name} field at offset {offset} ({size} bytes) exceeds stride {}",
                    self.vertex_stride
                )));
            }
        }

        if !matches!(self.index_size, 2 | 4) {
            return Err(UiError::InvalidLayout(format!(
                "unsupported index size {}",
                self.index_size
            )));
        }
        Ok(())
    }
}

/// RGBA color with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Rgba {
    /// Decode a packed `0xAABBGGRR` color (red in the lowest byte)
    pub fn from_packed_abgr(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Self::from_bytes([r, g, b, a])
    }

    /// Build from 8-bit channels
    pub fn from_bytes(rgba: [u8; 4]) -> Self {
        Self {
            r: f32::from(rgba[0]) / 255.0,
            g: f32::from(rgba[1]) / 255.0,
            b: f32::from(rgba[2]) / 255.0,
            a: f32::from(rgba[3]) / 255.0,
        }
    }

    /// As `[r, g, b, a]`
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Vertex fields as stored by the GUI library
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawVertex {
    /// GUI-space position
    pub position: [f32; 2],
    /// UV normalized to the source texture
    pub uv: [f32; 2],
    /// Packed `0xAABBGGRR` color
    pub color: u32,
}

/// Reads vertices out of an opaque interleaved buffer
#[derive(Debug, Clone, Copy)]
pub struct VertexReader<'a> {
    layout: &'a RenderLayoutDescriptor,
    bytes: &'a [u8],
}

impl<'a> VertexReader<'a> {
    /// Wrap a vertex buffer
    pub fn new(layout: &'a RenderLayoutDescriptor, bytes: &'a [u8]) -> Self {
        Self { layout, bytes }
    }

    /// Number of whole vertices in the buffer
    pub fn len(&self) -> usize {
        self.bytes.len() / self.layout.vertex_stride
    }

    /// Buffer holds no whole vertex
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode vertex `index`, or `None` if it lies past the buffer
    pub fn get(&self, index: usize) -> Option<RawVertex> {
        let base = index.checked_mul(self.layout.vertex_stride)?;
        let vertex = self.bytes.get(base..base.checked_add(self.layout.vertex_stride)?)?;

        Some(RawVertex {
            position: read_vec2(vertex, self.layout.position_offset)?,
            uv: read_vec2(vertex, self.layout.uv_offset)?,
            color: bytemuck::pod_read_unaligned(vertex.get(self.layout.color_offset..self.layout.color_offset + COLOR_SIZE)?),
        })
    }
}

/// Reads indices out of a packed 16- or 32-bit index buffer
#[derive(Debug, Clone, Copy)]
pub struct IndexReader<'a> {
    index_size: usize,
    bytes: &'a [u8],
}

impl<'a> IndexReader<'a> {
    /// Wrap an index buffer
    pub fn new(index_size: usize, bytes: &'a [u8]) -> Self {
        Self { index_size, bytes }
    }

    /// Number of whole indices in the buffer
    pub fn len(&self) -> usize {
        self.bytes.len() / self.index_size
    }

    /// Buffer holds no whole index
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at position `i`, or `None` past the end
    pub fn get(&self, i: usize) -> Option<usize> {
        let start = i.checked_mul(self.index_size)?;
        let raw = self.bytes.get(start..start + self.index_size)?;
        match self.index_size {
            2 => Some(usize::from(bytemuck::pod_read_unaligned::<u16>(raw))),
            4 => usize::try_from(bytemuck::pod_read_unaligned::<u32>(raw)).ok(),
            _ => None,
        }
    }
}

fn read_vec2(vertex: &[u8], offset: usize) -> Option<[f32; 2]> {
    vertex
        .get(offset..offset + VEC2_SIZE)
        .map(bytemuck::pod_read_unaligned)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The common 20-byte layout: pos, uv, color
    fn standard_layout() -> RenderLayoutDescriptor {
        RenderLayoutDescriptor {
            vertex_stride: 20,
            position_offset: 0,
            uv_offset: 8,
            color_offset: 16,
            index_size: 2,
        }
    }

    fn push_vertex(buf: &mut Vec<u8>, pos: [f32; 2], uv: [f32; 2], color: u32) {
        buf.extend_from_slice(bytemuck::bytes_of(&pos));
        buf.extend_from_slice(bytemuck::bytes_of(&uv));
        buf.extend_from_slice(&color.to_ne_bytes());
    }

    #[test]
    fn test_color_channel_reorder() {
        let c = Rgba::from_packed_abgr(0x4433_2211);
        assert_eq!(c, Rgba::from_bytes([0x11, 0x22, 0x33, 0x44]));

        let opaque_red = Rgba::from_packed_abgr(0xFF00_00FF);
        assert_eq!(opaque_red.to_array(), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_validate_accepts_standard_layout() {
        assert!(standard_layout().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_layouts() {
        let zero_stride = RenderLayoutDescriptor { vertex_stride: 0, ..standard_layout() };
        assert!(matches!(zero_stride.validate(), Err(UiError::InvalidLayout(_))));

        let color_outside = RenderLayoutDescriptor { color_offset: 17, ..standard_layout() };
        assert!(matches!(color_outside.validate(), Err(UiError::InvalidLayout(_))));

        let uv_outside = RenderLayoutDescriptor { uv_offset: 20, ..standard_layout() };
        assert!(matches!(uv_outside.validate(), Err(UiError::InvalidLayout(_))));

        let odd_index = RenderLayoutDescriptor { index_size: 3, ..standard_layout() };
        assert!(matches!(odd_index.validate(), Err(UiError::InvalidLayout(_))));
    }

    #[test]
    fn test_vertex_reader_uses_offsets() {
        let layout = standard_layout();
        let mut buf = Vec::new();
        push_vertex(&mut buf, [1.0, 2.0], [0.25, 0.5], 0xFF00_FF00);
        push_vertex(&mut buf, [3.0, 4.0], [0.75, 1.0], 0x8000_0000);

        let reader = VertexReader::new(&layout, &buf);
        assert_eq!(reader.len(), 2);
        let v = reader.get(1).unwrap();
        assert_eq!(v.position, [3.0, 4.0]);
        assert_eq!(v.uv, [0.75, 1.0]);
        assert_eq!(v.color, 0x8000_0000);
        assert!(reader.get(2).is_none());
    }

    #[test]
    fn test_vertex_reader_reordered_layout() {
        // color first, then uv, then position, with 4 bytes of padding
        let layout = RenderLayoutDescriptor {
            vertex_stride: 24,
            position_offset: 12,
            uv_offset: 4,
            color_offset: 0,
            index_size: 4,
        };
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x1234_5678u32.to_ne_bytes());
        buf.extend_from_slice(bytemuck::bytes_of(&[0.5f32, 0.5]));
        buf.extend_from_slice(bytemuck::bytes_of(&[9.0f32, 8.0]));
        buf.extend_from_slice(&[0; 4]);

        let v = VertexReader::new(&layout, &buf).get(0).unwrap();
        assert_eq!(v.position, [9.0, 8.0]);
        assert_eq!(v.uv, [0.5, 0.5]);
        assert_eq!(v.color, 0x1234_5678);
    }

    #[test]
    fn test_index_reader_sizes() {
        let small: Vec<u8> = [7u16, 65535].iter().flat_map(|i| i.to_ne_bytes()).collect();
        let reader = IndexReader::new(2, &small);
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.get(1), Some(65535));
        assert_eq!(reader.get(2), None);

        let wide: Vec<u8> = [70_000u32].iter().flat_map(|i| i.to_ne_bytes()).collect();
        assert_eq!(IndexReader::new(4, &wide).get(0), Some(70_000));
    }
}
