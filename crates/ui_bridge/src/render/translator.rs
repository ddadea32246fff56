//! Draw command translation
//!
//! Walks the GUI library's draw lists and produces renderer-space triangles:
//! vertices are decoded through the runtime layout, UVs are remapped from the
//! texture the GUI thinks it bound into the shared atlas, and every triangle
//! carries its command's projected clip rectangle.

use crate::atlas::{AtlasId, AtlasPacker, PixelRect};
use crate::foundation::math::{vec2, Vec2};
use crate::gui::{DrawCommand, DrawData, DrawList, IndexReader, RenderLayoutDescriptor, Rgba, TextureId, VertexReader};
use crate::projection::CoordinateProjector;
use crate::{UiError, UiResult};

use super::{ClipRect, TriangleBatch, UiTriangle, UiVertex};

/// Intensity for font glyphs: vertex color modulated by the atlas alpha
const FONT_INTENSITY: f32 = 0.0;
/// Intensity for pictures: the atlas texel is sampled as is
const PICTURE_INTENSITY: f32 = 1.0;

/// Per-frame translation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateStats {
    /// Draw lists visited
    pub lists: usize,
    /// Commands visited, callbacks included
    pub commands: usize,
    /// Commands forwarded to a host callback
    pub callbacks: usize,
    /// Triangles appended to the batch
    pub triangles: usize,
}

/// Everything a single command needs besides its own fields
struct CommandContext<'a> {
    atlas: &'a AtlasPacker,
    atlas_size: Vec2,
    font: TextureId,
    projector: &'a CoordinateProjector,
}

/// Converts GUI draw data into [`UiTriangle`]s
#[derive(Debug, Clone)]
pub struct DrawCommandTranslator {
    layout: RenderLayoutDescriptor,
}

impl DrawCommandTranslator {
    /// Create a translator for a layout, rejecting layouts that cannot be decoded
    pub fn new(layout: RenderLayoutDescriptor) -> UiResult<Self> {
        layout.validate()?;
        log::info!(
            "Draw translator ready: stride {}, pos@{}, uv@{}, color@{}, {}-byte indices",
            layout.vertex_stride,
            layout.position_offset,
            layout.uv_offset,
            layout.color_offset,
            layout.index_size
        );
        Ok(Self { layout })
    }

    /// Layout used for decoding
    pub fn layout(&self) -> &RenderLayoutDescriptor {
        &self.layout
    }

    /// Append the frame's triangles to `batch`.
    ///
    /// On error the batch is truncated back to its length before the call, so
    /// a failed frame never leaves partial geometry behind.
    pub fn translate(
        &self,
        data: &DrawData,
        atlas: &AtlasPacker,
        font: TextureId,
        projector: &CoordinateProjector,
        batch: &mut TriangleBatch,
    ) -> UiResult<TranslateStats> {
        let (width, height) = atlas.size();
        let ctx = CommandContext {
            atlas,
            atlas_size: Vec2::new(width as f32, height as f32),
            font,
            projector,
        };

        let start = batch.len();
        let mut stats = TranslateStats::default();
        for list in &data.lists {
            if let Err(err) = self.translate_list(list, &ctx, batch, &mut stats) {
                log::error!("Aborting UI frame after {} triangles: {}", batch.len() - start, err);
                batch.truncate(start);
                return Err(err);
            }
            stats.lists += 1;
        }

        log::debug!(
            "Translated {} lists, {} commands ({} callbacks) into {} triangles",
            stats.lists, stats.commands, stats.callbacks, stats.triangles
        );
        Ok(stats)
    }

    fn translate_list(
        &self,
        list: &DrawList,
        ctx: &CommandContext<'_>,
        batch: &mut TriangleBatch,
        stats: &mut TranslateStats,
    ) -> UiResult<()> {
        let vertices = VertexReader::new(&self.layout, &list.vertex_bytes);
        let indices = IndexReader::new(self.layout.index_size, &list.index_bytes);

        let mut offset = 0;
        for command in &list.commands {
            stats.commands += 1;

            let end = offset + command.element_count;
            if end > indices.len() {
                return Err(UiError::MalformedDrawData(format!(
                    "command reads indices {offset}..{end} but the list holds {}",
                    indices.len()
                )));
            }

            if let Some(callback) = &command.callback {
                callback(list, command);
                stats.callbacks += 1;
                offset = end;
                continue;
            }

            let whole = command.element_count / 3;
            if whole > 0 {
                let source = ctx.atlas.bounds_of(AtlasId::from(command.texture_id))?;
                let intensity = if command.texture_id == ctx.font { FONT_INTENSITY } else { PICTURE_INTENSITY };
                let clip = project_clip(command, ctx.projector);

                for t in 0..whole {
                    let first = offset + t * 3;
                    let mut corners = [UiVertex { position: [0.0; 2], uv: [0.0; 2], color: [0.0; 4], intensity }; 3];
                    for (k, corner) in corners.iter_mut().enumerate() {
                        *corner = self.decode_vertex(&vertices, &indices, first + k, &source, ctx, intensity)?;
                    }
                    batch.push(UiTriangle { vertices: corners, clip });
                }
                stats.triangles += whole;
            }

            if command.element_count % 3 != 0 {
                log::warn!("Ignoring {} trailing indices in draw command", command.element_count % 3);
            }
            offset = end;
        }
        Ok(())
    }

    fn decode_vertex(
        &self,
        vertices: &VertexReader<'_>,
        indices: &IndexReader<'_>,
        slot: usize,
        source: &PixelRect,
        ctx: &CommandContext<'_>,
        intensity: f32,
    ) -> UiResult<UiVertex> {
        let index = indices
            .get(slot)
            .ok_or_else(|| UiError::MalformedDrawData(format!("index slot {slot} is out of bounds")))?;
        let raw = vertices.get(index).ok_or_else(|| {
            UiError::MalformedDrawData(format!(
                "vertex {index} lies outside a buffer of {} vertices",
                vertices.len()
            ))
        })?;

        let position = ctx.projector.project(vec2(raw.position));
        Ok(UiVertex {
            position: [position.x, position.y],
            uv: remap_uv(raw.uv, source, ctx.atlas_size),
            color: Rgba::from_packed_abgr(raw.color).to_array(),
            intensity,
        })
    }
}

/// Map a UV normalized to a source texture into atlas UV space:
/// `(uv * source.size + source.min) / atlas_size`
pub fn remap_uv(uv: [f32; 2], source: &PixelRect, atlas_size: Vec2) -> [f32; 2] {
    [
        (uv[0] * source.width as f32 + source.x as f32) / atlas_size.x,
        (uv[1] * source.height as f32 + source.y as f32) / atlas_size.y,
    ]
}

fn project_clip(command: &DrawCommand, projector: &CoordinateProjector) -> ClipRect {
    let [x1, y1, x2, y2] = command.clip_rect;
    if command.clip_rect == [0.0; 4] {
        return ClipRect::NONE;
    }
    projector
        .project_rect(Vec2::new(x1, y1), Vec2::new(x2, y2))
        .into()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::atlas::{AtlasError, ImageData};

    fn layout() -> RenderLayoutDescriptor {
        RenderLayoutDescriptor {
            vertex_stride: 20,
            position_offset: 0,
            uv_offset: 8,
            color_offset: 16,
            index_size: 2,
        }
    }

    fn list(vertices: &[([f32; 2], [f32; 2], u32)], indices: &[u16], commands: Vec<DrawCommand>) -> DrawList {
        let mut vertex_bytes = Vec::new();
        for (pos, uv, color) in vertices {
            vertex_bytes.extend_from_slice(bytemuck::bytes_of(pos));
            vertex_bytes.extend_from_slice(bytemuck::bytes_of(uv));
            vertex_bytes.extend_from_slice(&color.to_le_bytes());
        }
        DrawList {
            vertex_bytes,
            index_bytes: indices.iter().flat_map(|i| i.to_le_bytes()).collect(),
            commands,
        }
    }

    fn triangle_list(texture: TextureId, clip: [f32; 4]) -> DrawList {
        list(
            &[
                ([10.0, 20.0], [0.0, 0.0], 0xFF00_00FF),
                ([30.0, 20.0], [1.0, 0.0], 0xFF00_FF00),
                ([10.0, 40.0], [0.0, 1.0], 0xFFFF_0000),
            ],
            &[0, 1, 2],
            vec![DrawCommand::new(3, clip, texture)],
        )
    }

    fn atlas_with_font() -> (AtlasPacker, TextureId) {
        let mut atlas = AtlasPacker::default();
        let id = atlas
            .insert_named("font", &ImageData::solid_color(16, 16, [255; 4]))
            .unwrap();
        (atlas, TextureId::from(id))
    }

    #[test]
    fn test_remap_uv_into_atlas() {
        let uv = remap_uv([0.5, 0.5], &PixelRect::new(10, 10, 20, 20), Vec2::new(100.0, 100.0));
        assert_relative_eq!(uv[0], 0.2);
        assert_relative_eq!(uv[1], 0.2);
    }

    #[test]
    fn test_single_font_triangle() {
        let (atlas, font) = atlas_with_font();
        let projector = CoordinateProjector::new(Vec2::new(100.0, 100.0));
        let translator = DrawCommandTranslator::new(layout()).unwrap();
        let data = DrawData { lists: vec![triangle_list(font, [0.0; 4])] };

        let mut batch = TriangleBatch::new();
        let stats = translator.translate(&data, &atlas, font, &projector, &mut batch).unwrap();

        assert_eq!(stats.triangles, 1);
        assert_eq!(batch.len(), 1);
        let tri = batch.triangles()[0];
        assert!(tri.clip.is_none());
        assert_eq!(tri.vertices[0].position, [10.0, 80.0]);
        assert_eq!(tri.vertices[1].position, [30.0, 80.0]);
        assert_eq!(tri.vertices[2].position, [10.0, 60.0]);
        assert_eq!(tri.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(tri.vertices[2].color, [0.0, 0.0, 1.0, 1.0]);
        for v in tri.vertices {
            assert_relative_eq!(v.intensity, 0.0);
        }
        // 16x16 font at the origin of a 256x256 canvas
        assert_relative_eq!(tri.vertices[1].uv[0], 16.0 / 256.0);
        assert_relative_eq!(tri.vertices[2].uv[1], 16.0 / 256.0);
    }

    #[test]
    fn test_picture_intensity_and_clip() {
        let (mut atlas, font) = atlas_with_font();
        let picture = TextureId::from(atlas.insert(&ImageData::solid_color(4, 4, [9; 4])).unwrap());
        let projector = CoordinateProjector::new(Vec2::new(100.0, 100.0));
        let translator = DrawCommandTranslator::new(layout()).unwrap();
        let data = DrawData { lists: vec![triangle_list(picture, [0.0, 0.0, 50.0, 25.0])] };

        let mut batch = TriangleBatch::new();
        translator.translate(&data, &atlas, font, &projector, &mut batch).unwrap();

        let tri = batch.triangles()[0];
        assert_relative_eq!(tri.vertices[0].intensity, 1.0);
        assert_eq!(tri.clip.min, [0.0, 75.0]);
        assert_eq!(tri.clip.max, [50.0, 100.0]);
    }

    #[test]
    fn test_unknown_texture_discards_frame() {
        let (atlas, font) = atlas_with_font();
        let projector = CoordinateProjector::new(Vec2::new(100.0, 100.0));
        let translator = DrawCommandTranslator::new(layout()).unwrap();
        let data = DrawData {
            lists: vec![triangle_list(font, [0.0; 4]), triangle_list(TextureId(99), [0.0; 4])],
        };

        let mut batch = TriangleBatch::new();
        let err = translator.translate(&data, &atlas, font, &projector, &mut batch).unwrap_err();
        assert!(matches!(err, UiError::Atlas(AtlasError::NotFound(_))));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_callbacks_are_forwarded_not_drawn() {
        let (atlas, font) = atlas_with_font();
        let projector = CoordinateProjector::new(Vec2::new(100.0, 100.0));
        let translator = DrawCommandTranslator::new(layout()).unwrap();

        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let mut draw_list = triangle_list(font, [0.0; 4]);
        draw_list
            .commands
            .insert(0, DrawCommand::with_callback(Rc::new(move |_: &DrawList, _: &DrawCommand| seen.set(seen.get() + 1))));
        let data = DrawData { lists: vec![draw_list] };

        let mut batch = TriangleBatch::new();
        let stats = translator.translate(&data, &atlas, font, &projector, &mut batch).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(stats.callbacks, 1);
        assert_eq!(stats.commands, 2);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_index_offset_runs_across_commands() {
        let (atlas, font) = atlas_with_font();
        let projector = CoordinateProjector::new(Vec2::new(100.0, 100.0));
        let translator = DrawCommandTranslator::new(layout()).unwrap();
        let draw_list = list(
            &[
                ([0.0, 0.0], [0.0, 0.0], 0),
                ([1.0, 0.0], [0.0, 0.0], 0),
                ([0.0, 1.0], [0.0, 0.0], 0),
                ([5.0, 5.0], [0.0, 0.0], 0),
            ],
            &[0, 1, 2, 3, 2, 1],
            vec![DrawCommand::new(3, [0.0; 4], font), DrawCommand::new(3, [0.0; 4], font)],
        );

        let mut batch = TriangleBatch::new();
        translator
            .translate(&DrawData { lists: vec![draw_list] }, &atlas, font, &projector, &mut batch)
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.triangles()[1].vertices[0].position, [5.0, 95.0]);
    }

    #[test]
    fn test_trailing_indices_ignored() {
        let (atlas, font) = atlas_with_font();
        let projector = CoordinateProjector::new(Vec2::new(100.0, 100.0));
        let translator = DrawCommandTranslator::new(layout()).unwrap();
        let mut draw_list = triangle_list(font, [0.0; 4]);
        draw_list.index_bytes.extend_from_slice(&0u16.to_le_bytes());
        draw_list.commands[0].element_count = 4;

        let mut batch = TriangleBatch::new();
        translator
            .translate(&DrawData { lists: vec![draw_list] }, &atlas, font, &projector, &mut batch)
            .unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_reads_are_malformed() {
        let (atlas, font) = atlas_with_font();
        let projector = CoordinateProjector::new(Vec2::new(100.0, 100.0));
        let translator = DrawCommandTranslator::new(layout()).unwrap();

        let mut too_many = triangle_list(font, [0.0; 4]);
        too_many.commands[0].element_count = 6;
        let mut bad_vertex = triangle_list(font, [0.0; 4]);
        bad_vertex.index_bytes[4..6].copy_from_slice(&7u16.to_le_bytes());

        for draw_list in [too_many, bad_vertex] {
            let mut batch = TriangleBatch::new();
            let err = translator
                .translate(&DrawData { lists: vec![draw_list] }, &atlas, font, &projector, &mut batch)
                .unwrap_err();
            assert!(matches!(err, UiError::MalformedDrawData(_)));
            assert!(batch.is_empty());
        }
    }

    #[test]
    fn test_invalid_layout_rejected_at_construction() {
        let bad = RenderLayoutDescriptor { vertex_stride: 0, ..layout() };
        assert!(matches!(DrawCommandTranslator::new(bad), Err(UiError::InvalidLayout(_))));
    }
}
