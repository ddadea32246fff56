//! Growable first-fit atlas packer
//!
//! Free space is a list of disjoint rectangles. Placement takes the first free
//! rectangle large enough and splits the leftover along the shorter axis
//! (guillotine). When nothing fits, the canvas doubles its smaller dimension,
//! keeping every existing pixel at the same coordinates, free rectangles on
//! the old edge are stretched into the new strip, and the insertion is
//! retried. Entries are never moved or evicted.

use std::collections::HashMap;

use super::image::{ImageData, CHANNELS};
use super::{
    AtlasEntry, AtlasError, AtlasId, AtlasKey, AtlasResult, PixelRect, TextureSource, UvRect,
};
use crate::config::AtlasConfig;

/// Borrowed view of the atlas canvas for upload to the host renderer
#[derive(Debug, Clone, Copy)]
pub struct AtlasPicture<'a> {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// RGBA8 rows, top to bottom
    pub pixels: &'a [u8],
    /// Bumped on every mutation; re-upload when it changes
    pub generation: u64,
}

/// Shared texture atlas
pub struct AtlasPacker {
    width: u32,
    height: u32,
    pixels: Vec<u8>,

    free: Vec<PixelRect>,
    entries: HashMap<AtlasId, AtlasEntry>,
    aliases: HashMap<String, AtlasId>,

    next_id: u64,
    generation: u64,
    config: AtlasConfig,
}

impl Default for AtlasPacker {
    fn default() -> Self {
        Self::new(AtlasConfig::default())
    }
}

impl AtlasPacker {
    /// Create an empty atlas; the canvas is allocated on first insertion
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            free: Vec::new(),
            entries: HashMap::new(),
            aliases: HashMap::new(),
            next_id: 1,
            generation: 0,
            config,
        }
    }

    /// Insert an image, returning a fresh id
    pub fn insert(&mut self, image: &ImageData) -> AtlasResult<AtlasId> {
        self.insert_with(None, TextureSource::Image, image, false)
    }

    /// Insert an image under an alias
    pub fn insert_named(&mut self, alias: &str, image: &ImageData) -> AtlasResult<AtlasId> {
        self.insert_with(Some(alias), TextureSource::Image, image, false)
    }

    /// Insert an image whose rows arrive bottom to top, mirroring it into the
    /// top-down canvas
    pub fn insert_flipped(&mut self, image: &ImageData) -> AtlasResult<AtlasId> {
        self.insert_with(None, TextureSource::Sprite, image, true)
    }

    /// [`insert_flipped`](Self::insert_flipped) under an alias
    pub fn insert_flipped_named(&mut self, alias: &str, image: &ImageData) -> AtlasResult<AtlasId> {
        self.insert_with(Some(alias), TextureSource::Sprite, image, true)
    }

    /// General insertion
    pub fn insert_with(
        &mut self,
        alias: Option<&str>,
        source: TextureSource,
        image: &ImageData,
        flipped: bool,
    ) -> AtlasResult<AtlasId> {
        if image.is_empty() {
            return Err(AtlasError::EmptyImage(image.width, image.height));
        }
        if let Some(alias) = alias {
            if self.aliases.contains_key(alias) {
                return Err(AtlasError::DuplicateAlias(alias.to_string()));
            }
        }

        let bounds = self.allocate(image.width, image.height)?;
        Ok(self.place(alias, source, image, flipped, bounds))
    }

    /// Overwrite an entry's pixels.
    ///
    /// Same size: written in place and the id is kept. Different size: the old
    /// region is released and the image is inserted again under the same alias
    /// and orientation, which yields a new id.
    pub fn replace(&mut self, key: impl Into<AtlasKey>, image: &ImageData) -> AtlasResult<AtlasId> {
        let key = key.into();
        let entry = self.entry(key)?.clone();

        if entry.bounds.width == image.width && entry.bounds.height == image.height {
            self.blit(entry.bounds, image, entry.flipped);
            self.generation += 1;
            return Ok(entry.id);
        }

        // The new region is allocated while the old entry still holds its
        // pixels, so a failed replace leaves the atlas untouched.
        if image.is_empty() {
            return Err(AtlasError::EmptyImage(image.width, image.height));
        }
        let bounds = self.allocate(image.width, image.height)?;

        self.remove(entry.id)?;
        Ok(self.place(entry.alias.as_deref(), entry.source, image, entry.flipped, bounds))
    }

    /// Release an entry's region
    pub fn remove(&mut self, key: impl Into<AtlasKey>) -> AtlasResult<AtlasEntry> {
        let id = self.resolve(&key.into())?;
        let entry = self
            .entries
            .remove(&id)
            .ok_or(AtlasError::NotFound(AtlasKey::Id(id)))?;

        if let Some(alias) = &entry.alias {
            self.aliases.remove(alias);
        }
        self.clear_region(entry.bounds);
        self.free.push(entry.bounds);
        self.generation += 1;
        Ok(entry)
    }

    /// Drop all entries and release the canvas. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.pixels.clear();
        self.free.clear();
        self.entries.clear();
        self.aliases.clear();
        self.generation += 1;
    }

    /// Id bound to an alias
    pub fn id_of(&self, alias: &str) -> AtlasResult<AtlasId> {
        self.aliases
            .get(alias)
            .copied()
            .ok_or_else(|| AtlasError::NotFound(AtlasKey::Alias(alias.to_string())))
    }

    /// Alias of an entry, if it has one
    pub fn alias_of(&self, id: AtlasId) -> AtlasResult<Option<&str>> {
        Ok(self.entry(id)?.alias.as_deref())
    }

    /// Pixel bounds of an entry
    pub fn bounds_of(&self, key: impl Into<AtlasKey>) -> AtlasResult<PixelRect> {
        Ok(self.entry(key)?.bounds)
    }

    /// Normalized UV rectangle of an entry in the current canvas
    pub fn uv_rect_of(&self, key: impl Into<AtlasKey>) -> AtlasResult<UvRect> {
        let bounds = self.bounds_of(key)?;
        let w = self.width as f32;
        let h = self.height as f32;
        Ok(UvRect {
            min: [bounds.x as f32 / w, bounds.y as f32 / h],
            max: [bounds.max_x() as f32 / w, bounds.max_y() as f32 / h],
        })
    }

    /// Full entry record
    pub fn entry(&self, key: impl Into<AtlasKey>) -> AtlasResult<&AtlasEntry> {
        let key = key.into();
        let id = self.resolve(&key)?;
        self.entries.get(&id).ok_or(AtlasError::NotFound(key))
    }

    /// Whether the key resolves to a live entry
    pub fn contains(&self, key: impl Into<AtlasKey>) -> bool {
        self.entry(key).is_ok()
    }

    /// Iterate over live entries (arbitrary order)
    pub fn entries(&self) -> impl Iterator<Item = &AtlasEntry> {
        self.entries.values()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No live entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canvas dimensions
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Mutation counter used as the dirty flag
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Canvas view for the host renderer
    pub fn picture(&self) -> AtlasPicture<'_> {
        AtlasPicture {
            width: self.width,
            height: self.height,
            pixels: &self.pixels,
            generation: self.generation,
        }
    }

    /// Copy pixels into an allocated region and record the entry
    fn place(
        &mut self,
        alias: Option<&str>,
        source: TextureSource,
        image: &ImageData,
        flipped: bool,
        bounds: PixelRect,
    ) -> AtlasId {
        self.blit(bounds, image, flipped);

        let id = AtlasId(self.next_id);
        self.next_id += 1;

        if let Some(alias) = alias {
            self.aliases.insert(alias.to_string(), id);
        }
        self.entries.insert(id, AtlasEntry {
            id,
            alias: alias.map(str::to_string),
            bounds,
            source,
            flipped,
        });
        self.generation += 1;

        log::debug!(
            "Atlas insert {} ({:?}) at {:?}, canvas {}x{}",
            id, alias, bounds, self.width, self.height
        );
        id
    }

    fn resolve(&self, key: &AtlasKey) -> AtlasResult<AtlasId> {
        match key {
            AtlasKey::Id(id) if self.entries.contains_key(id) => Ok(*id),
            AtlasKey::Id(_) => Err(AtlasError::NotFound(key.clone())),
            AtlasKey::Alias(alias) => self.id_of(alias),
        }
    }

    fn allocate(&mut self, width: u32, height: u32) -> AtlasResult<PixelRect> {
        let max = self.config.max_dimension;
        if width > max || height > max {
            return Err(AtlasError::TooLarge { width, height, max });
        }

        if self.width == 0 || self.height == 0 {
            let side = width
                .max(height)
                .max(self.config.initial_size)
                .next_power_of_two()
                .min(max);
            self.resize_canvas(side, side);
            self.free.push(PixelRect::new(0, 0, side, side));
        }

        loop {
            if let Some(index) = self.free.iter().position(|r| r.fits(width, height)) {
                return Ok(self.split_free(index, width, height));
            }
            self.grow(width, height)?;
        }
    }

    /// Take the top-left corner of a free rectangle and return the leftovers
    /// to the free list.
    fn split_free(&mut self, index: usize, width: u32, height: u32) -> PixelRect {
        let free = self.free.remove(index);
        let placed = PixelRect::new(free.x, free.y, width, height);

        let leftover_w = free.width - width;
        let leftover_h = free.height - height;

        let (right, below) = if leftover_w < leftover_h {
            (
                PixelRect::new(free.x + width, free.y, leftover_w, height),
                PixelRect::new(free.x, free.y + height, free.width, leftover_h),
            )
        } else {
            (
                PixelRect::new(free.x + width, free.y, leftover_w, free.height),
                PixelRect::new(free.x, free.y + height, width, leftover_h),
            )
        };

        for rect in [right, below] {
            if !rect.is_empty() {
                self.free.insert(index.min(self.free.len()), rect);
            }
        }
        placed
    }

    fn grow(&mut self, width: u32, height: u32) -> AtlasResult<()> {
        let max = self.config.max_dimension;
        let (old_w, old_h) = (self.width, self.height);

        let grow_width = old_w <= old_h;
        let (new_w, new_h) = if grow_width { (old_w * 2, old_h) } else { (old_w, old_h * 2) };
        if new_w > max || new_h > max {
            return Err(AtlasError::TooLarge { width, height, max });
        }

        self.resize_canvas(new_w, new_h);
        self.generation += 1;

        // Free space along the old edge is stretched across the new strip so
        // an image can span both.
        let mut covered = Vec::new();
        for rect in &mut self.free {
            if grow_width && rect.max_x() == old_w {
                rect.width += new_w - old_w;
                covered.push((rect.y, rect.max_y()));
            } else if !grow_width && rect.max_y() == old_h {
                rect.height += new_h - old_h;
                covered.push((rect.x, rect.max_x()));
            }
        }
        covered.sort_unstable();

        // The rest of the strip, between the stretched rectangles
        let edge_len = if grow_width { old_h } else { old_w };
        let mut cursor = 0;
        for (start, end) in covered.into_iter().chain(std::iter::once((edge_len, edge_len))) {
            if start > cursor {
                let gap = start - cursor;
                self.free.push(if grow_width {
                    PixelRect::new(old_w, cursor, new_w - old_w, gap)
                } else {
                    PixelRect::new(cursor, old_h, gap, new_h - old_h)
                });
            }
            cursor = cursor.max(end);
        }

        log::info!("Atlas grew from {}x{} to {}x{}", old_w, old_h, new_w, new_h);
        Ok(())
    }

    fn resize_canvas(&mut self, new_w: u32, new_h: u32) {
        let old_row = self.row_len();
        let new_row = new_w as usize * CHANNELS as usize;
        let mut pixels = vec![0; new_row * new_h as usize];

        if old_row > 0 {
            for (y, row) in self.pixels.chunks_exact(old_row).enumerate() {
                let start = y * new_row;
                pixels[start..start + old_row].copy_from_slice(row);
            }
        }

        self.pixels = pixels;
        self.width = new_w;
        self.height = new_h;
    }

    fn blit(&mut self, bounds: PixelRect, image: &ImageData, flipped: bool) {
        let row = self.row_len();
        let src_row = image.row_len();
        let x_offset = bounds.x as usize * CHANNELS as usize;

        for (y, src) in image.data.chunks_exact(src_row).enumerate() {
            let dst_y = if flipped {
                bounds.max_y() as usize - 1 - y
            } else {
                bounds.y as usize + y
            };
            let start = dst_y * row + x_offset;
            self.pixels[start..start + src_row].copy_from_slice(src);
        }
    }

    fn clear_region(&mut self, bounds: PixelRect) {
        let row = self.row_len();
        let x_offset = bounds.x as usize * CHANNELS as usize;
        let len = bounds.width as usize * CHANNELS as usize;
        for y in bounds.y..bounds.max_y() {
            let start = y as usize * row + x_offset;
            self.pixels[start..start + len].fill(0);
        }
    }

    fn row_len(&self) -> usize {
        self.width as usize * CHANNELS as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AtlasConfig {
        AtlasConfig { initial_size: 16, max_dimension: 256 }
    }

    fn assert_disjoint(atlas: &AtlasPacker) {
        let entries: Vec<_> = atlas.entries().collect();
        let (w, h) = atlas.size();
        let canvas = PixelRect::new(0, 0, w, h);
        for (i, a) in entries.iter().enumerate() {
            assert!(canvas.contains_rect(&a.bounds), "{:?} outside {}x{}", a.bounds, w, h);
            for b in &entries[i + 1..] {
                assert!(!a.bounds.overlaps(&b.bounds), "{:?} overlaps {:?}", a.bounds, b.bounds);
            }
        }
    }

    #[test]
    fn test_ids_unique_and_bounds_disjoint() {
        let mut atlas = AtlasPacker::new(small_config());
        let mut ids = Vec::new();
        for i in 0..40u32 {
            let img = ImageData::solid_color(3 + i % 7, 2 + i % 5, [i as u8, 0, 0, 255]);
            ids.push(atlas.insert(&img).unwrap());
        }

        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert_eq!(atlas.len(), 40);
        assert_disjoint(&atlas);
    }

    #[test]
    fn test_growth_is_monotonic_and_keeps_bounds() {
        let mut atlas = AtlasPacker::new(small_config());
        let mut placed = Vec::new();

        for i in 0..24u8 {
            let before = atlas.size();
            let img = ImageData::solid_color(10, 10, [i, i, i, 255]);
            let id = atlas.insert(&img).unwrap();
            let after = atlas.size();

            assert!(after.0 >= before.0 && after.1 >= before.1);
            placed.push((id, atlas.bounds_of(id).unwrap(), i));

            for (id, bounds, shade) in &placed {
                assert_eq!(atlas.bounds_of(*id).unwrap(), *bounds);
                let px = atlas.picture();
                let offset = (bounds.y as usize * px.width as usize + bounds.x as usize) * 4;
                assert_eq!(px.pixels[offset], *shade);
            }
        }
        assert_disjoint(&atlas);
    }

    #[test]
    fn test_first_insert_sizes_canvas_to_power_of_two() {
        let mut atlas = AtlasPacker::new(small_config());
        atlas.insert(&ImageData::solid_color(40, 12, [0; 4])).unwrap();
        assert_eq!(atlas.size(), (64, 64));
    }

    #[test]
    fn test_too_large_fails() {
        let mut atlas = AtlasPacker::new(AtlasConfig { initial_size: 16, max_dimension: 32 });
        let err = atlas.insert(&ImageData::solid_color(33, 1, [0; 4])).unwrap_err();
        assert!(matches!(err, AtlasError::TooLarge { .. }));

        atlas.insert(&ImageData::solid_color(32, 32, [0; 4])).unwrap();
        let err = atlas.insert(&ImageData::solid_color(1, 1, [0; 4])).unwrap_err();
        assert_eq!(err, AtlasError::TooLarge { width: 1, height: 1, max: 32 });
    }

    #[test]
    fn test_alias_lookup() {
        let mut atlas = AtlasPacker::default();
        let id = atlas.insert_named("player", &ImageData::solid_color(4, 4, [1; 4])).unwrap();

        assert_eq!(atlas.id_of("player").unwrap(), id);
        assert_eq!(atlas.alias_of(id).unwrap(), Some("player"));
        assert_eq!(atlas.bounds_of("player").unwrap(), atlas.bounds_of(id).unwrap());

        let err = atlas.id_of("enemy").unwrap_err();
        assert_eq!(err, AtlasError::NotFound(AtlasKey::Alias("enemy".into())));
        assert!(matches!(atlas.bounds_of(AtlasId(999)), Err(AtlasError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut atlas = AtlasPacker::default();
        let img = ImageData::solid_color(2, 2, [0; 4]);
        atlas.insert_named("a", &img).unwrap();
        assert_eq!(atlas.insert_named("a", &img).unwrap_err(), AtlasError::DuplicateAlias("a".into()));
    }

    #[test]
    fn test_empty_image_rejected() {
        let mut atlas = AtlasPacker::default();
        let err = atlas.insert(&ImageData::solid_color(0, 5, [0; 4])).unwrap_err();
        assert_eq!(err, AtlasError::EmptyImage(0, 5));
    }

    #[test]
    fn test_flipped_insert_mirrors_rows() {
        let mut atlas = AtlasPacker::default();
        let mut data = vec![0u8; 2 * 3 * 4];
        data[0] = 7; // top-left red
        let img = ImageData::from_rgba(2, 3, data).unwrap();
        let id = atlas.insert_flipped(&img).unwrap();

        let bounds = atlas.bounds_of(id).unwrap();
        let px = atlas.picture();
        let bottom = ((bounds.max_y() - 1) as usize * px.width as usize + bounds.x as usize) * 4;
        let top = (bounds.y as usize * px.width as usize + bounds.x as usize) * 4;
        assert_eq!(px.pixels[bottom], 7);
        assert_eq!(px.pixels[top], 0);
        assert_eq!(atlas.entry(id).unwrap().source, TextureSource::Sprite);
    }

    #[test]
    fn test_replace_same_size_keeps_id() {
        let mut atlas = AtlasPacker::default();
        let id = atlas.insert_named("font", &ImageData::solid_color(8, 8, [1; 4])).unwrap();
        let gen = atlas.generation();

        let new_id = atlas.replace("font", &ImageData::solid_color(8, 8, [9; 4])).unwrap();
        assert_eq!(new_id, id);
        assert!(atlas.generation() > gen);

        let bounds = atlas.bounds_of(id).unwrap();
        let px = atlas.picture();
        let offset = (bounds.y as usize * px.width as usize + bounds.x as usize) * 4;
        assert_eq!(px.pixels[offset], 9);
    }

    #[test]
    fn test_replace_other_size_changes_id() {
        let mut atlas = AtlasPacker::default();
        let id = atlas.insert_named("font", &ImageData::solid_color(8, 8, [1; 4])).unwrap();

        let new_id = atlas.replace(id, &ImageData::solid_color(16, 4, [2; 4])).unwrap();
        assert_ne!(new_id, id);
        assert_eq!(atlas.id_of("font").unwrap(), new_id);
        assert!(!atlas.contains(id));
        assert_eq!(atlas.bounds_of(new_id).unwrap().width, 16);
        assert_eq!(atlas.len(), 1);
    }

    #[test]
    fn test_growth_merges_free_space_along_old_edge() {
        let mut atlas = AtlasPacker::new(small_config());
        atlas.insert(&ImageData::solid_color(16, 16, [1; 4])).unwrap();

        let tall = atlas.insert(&ImageData::solid_color(10, 200, [2; 4])).unwrap();
        assert_eq!(atlas.size(), (256, 256));
        assert_eq!(atlas.bounds_of(tall).unwrap().height, 200);

        let wide = atlas.insert(&ImageData::solid_color(200, 10, [3; 4])).unwrap();
        assert_eq!(atlas.bounds_of(wide).unwrap().width, 200);
        assert_disjoint(&atlas);
    }

    #[test]
    fn test_growth_marks_canvas_dirty_even_when_insert_fails() {
        let mut atlas = AtlasPacker::new(AtlasConfig { initial_size: 16, max_dimension: 32 });
        atlas.insert(&ImageData::solid_color(16, 16, [1; 4])).unwrap();
        let gen = atlas.generation();

        // grows to 32x32 before running out of room
        assert!(atlas.insert(&ImageData::solid_color(32, 20, [0; 4])).is_err());
        assert_eq!(atlas.size(), (32, 32));
        assert!(atlas.generation() > gen);
    }

    #[test]
    fn test_failed_replace_keeps_entry() {
        let mut atlas = AtlasPacker::new(AtlasConfig { initial_size: 16, max_dimension: 32 });
        let id = atlas.insert_named("font", &ImageData::solid_color(8, 8, [5; 4])).unwrap();
        let bounds = atlas.bounds_of(id).unwrap();

        let err = atlas.replace("font", &ImageData::solid_color(64, 8, [6; 4])).unwrap_err();
        assert!(matches!(err, AtlasError::TooLarge { .. }));
        assert_eq!(atlas.id_of("font").unwrap(), id);
        assert_eq!(atlas.bounds_of(id).unwrap(), bounds);

        let px = atlas.picture();
        let offset = (bounds.y as usize * px.width as usize + bounds.x as usize) * 4;
        assert_eq!(px.pixels[offset], 5);
    }

    #[test]
    fn test_remove_frees_region_for_reuse() {
        let mut atlas = AtlasPacker::new(small_config());
        let a = atlas.insert(&ImageData::solid_color(16, 16, [1; 4])).unwrap();
        let bounds = atlas.bounds_of(a).unwrap();
        atlas.remove(a).unwrap();

        let b = atlas.insert(&ImageData::solid_color(16, 16, [2; 4])).unwrap();
        assert_ne!(a, b);
        assert_eq!(atlas.bounds_of(b).unwrap(), bounds);
    }

    #[test]
    fn test_clear_resets_canvas_but_not_ids() {
        let mut atlas = AtlasPacker::default();
        let first = atlas.insert_named("x", &ImageData::solid_color(4, 4, [0; 4])).unwrap();
        atlas.clear();

        assert!(atlas.is_empty());
        assert_eq!(atlas.size(), (0, 0));
        assert!(atlas.picture().pixels.is_empty());
        assert!(atlas.id_of("x").is_err());

        let second = atlas.insert_named("x", &ImageData::solid_color(4, 4, [0; 4])).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_uv_rect() {
        let mut atlas = AtlasPacker::new(AtlasConfig { initial_size: 64, max_dimension: 64 });
        let id = atlas.insert(&ImageData::solid_color(16, 32, [0; 4])).unwrap();
        let uv = atlas.uv_rect_of(id).unwrap();
        assert_eq!(uv.min, [0.0, 0.0]);
        assert_eq!(uv.max, [0.25, 0.5]);
    }
}
