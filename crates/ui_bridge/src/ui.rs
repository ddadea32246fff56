//! Frame lifecycle
//!
//! [`Ui`] owns every piece of the bridge and drives one frame at a time:
//! `new_frame` pushes input into the GUI, widgets are emitted, and `draw`
//! translates the GUI's draw data and hands the triangles to the renderer.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::atlas::{AtlasId, AtlasKey, AtlasPacker, ImageData, PixelRect, TextureSource};
use crate::config::UiConfig;
use crate::foundation::math::{Mat3, Vec2};
use crate::foundation::time::Timer;
use crate::gui::{ClipboardBackend, GuiContext, RenderLayoutDescriptor, TextureId};
use crate::input::{Button, HostClipboard, HostInput, InputBridge};
use crate::projection::CoordinateProjector;
use crate::render::{DrawCommandTranslator, TranslateStats, TriangleBatch, UiRenderBackend};
use crate::{UiError, UiResult};

/// Alias of the GUI font atlas inside the shared atlas
pub const FONT_ALIAS: &str = "default-font";

/// Where the UI is in its frame cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No frame started yet, or the context was shut down
    Idle,
    /// `new_frame` ran; widgets may be emitted
    FrameOpen,
    /// `draw` ran; the next call must be `new_frame`
    Rendered,
}

/// A GUI context bridged to a 2D triangle renderer
pub struct Ui<G: GuiContext> {
    gui: G,
    atlas: AtlasPacker,
    projector: CoordinateProjector,
    translator: DrawCommandTranslator,
    input: InputBridge,
    batch: TriangleBatch,
    timer: Timer,
    state: FrameState,

    /// Atlas entry holding the font; `None` until a font was built
    font_id: Option<AtlasId>,
    /// Atlas generation last handed to the renderer
    uploaded_generation: Option<u64>,

    config: UiConfig,
}

impl<G: GuiContext> Ui<G> {
    /// Bridge a GUI context.
    ///
    /// Validates the GUI's render layout and loads the configured fonts (or
    /// the built-in one). The atlas reaches the renderer on the first `draw`.
    pub fn new(mut gui: G, config: UiConfig) -> UiResult<Self> {
        log::info!("Initializing UI bridge...");

        let [width, height] = config.display_size;
        gui.io_mut().set_display_size(width, height);

        let layout = RenderLayoutDescriptor::from_parts(gui.vertex_buffer_layout(), gui.index_size());
        let translator = DrawCommandTranslator::new(layout)?;

        let mut ui = Self {
            gui,
            atlas: AtlasPacker::new(config.atlas),
            projector: CoordinateProjector::new(Vec2::new(width, height)),
            translator,
            input: InputBridge::new(),
            batch: TriangleBatch::new(),
            timer: Timer::new(),
            state: FrameState::Idle,
            font_id: None,
            uploaded_generation: None,
            config,
        };

        let fonts = ui.config.fonts.clone();
        for font in &fonts {
            ui.add_ttf_font(&font.path, font.size)?;
        }
        if fonts.is_empty() && ui.config.load_default_font {
            ui.load_default_font()?;
        }

        log::info!("UI bridge ready ({} fonts configured)", fonts.len());
        Ok(ui)
    }

    /// The bridged GUI context
    pub fn gui(&self) -> &G {
        &self.gui
    }

    /// The bridged GUI context, mutably
    pub fn gui_mut(&mut self) -> &mut G {
        &mut self.gui
    }

    /// Shared texture atlas
    pub fn atlas(&self) -> &AtlasPacker {
        &self.atlas
    }

    /// Shared texture atlas, mutably
    pub fn atlas_mut(&mut self) -> &mut AtlasPacker {
        &mut self.atlas
    }

    /// Current GUI <-> renderer projection
    pub fn projector(&self) -> &CoordinateProjector {
        &self.projector
    }

    /// Frame cycle state
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Atlas id of the font, once one was built
    pub fn font_id(&self) -> Option<AtlasId> {
        self.font_id
    }

    /// Configuration the bridge was created with
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Seconds between the last two `new_frame` calls
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Start a frame: timing, viewport, input, then the GUI's own frame start
    pub fn new_frame<H: HostInput + ?Sized>(&mut self, host: &mut H) -> UiResult<()> {
        if self.state == FrameState::FrameOpen {
            log::error!("new_frame called while a frame is open");
            return Err(UiError::Usage("new_frame called while a frame is already open".into()));
        }

        let delta_time = self.timer.update();
        let viewport = host.viewport_size();
        if self.projector.resize(viewport) {
            log::debug!("UI viewport resized to {}x{}", viewport.x, viewport.y);
        }

        let io = self.gui.io_mut();
        io.delta_time = delta_time;
        self.input.prepare_io(io, host, &self.projector);

        self.gui.new_frame();
        self.state = FrameState::FrameOpen;
        Ok(())
    }

    /// Finish the frame and draw it.
    ///
    /// Nothing reaches the renderer when translation fails. Once drawing
    /// starts, the pushed transform is popped even if drawing fails.
    pub fn draw<R: UiRenderBackend + ?Sized>(&mut self, renderer: &mut R) -> UiResult<TranslateStats> {
        match self.state {
            FrameState::FrameOpen => {}
            FrameState::Idle => {
                log::error!("draw called before new_frame");
                return Err(UiError::Usage("draw called without a preceding new_frame".into()));
            }
            FrameState::Rendered => {
                log::error!("draw called twice in one frame");
                return Err(UiError::Usage("draw called twice without an intervening new_frame".into()));
            }
        }
        self.state = FrameState::Rendered;

        let font = self.font_id.map(TextureId::from).unwrap_or_default();
        self.batch.clear();
        let data = self.gui.render();
        let stats = self
            .translator
            .translate(data, &self.atlas, font, &self.projector, &mut self.batch)?;

        self.upload_atlas(renderer)?;

        // The batch is already in renderer space; the override replaces the
        // host's camera for the duration of the UI draw.
        renderer.push_transform(Mat3::identity()).map_err(render_error)?;
        let drawn = renderer.draw_triangles(self.batch.triangles()).map_err(render_error);
        let popped = renderer.pop_transform().map_err(render_error);
        self.batch.clear();
        drawn?;
        popped?;

        Ok(stats)
    }

    fn upload_atlas<R: UiRenderBackend + ?Sized>(&mut self, renderer: &mut R) -> UiResult<()> {
        let picture = self.atlas.picture();
        if self.uploaded_generation == Some(picture.generation) || picture.width == 0 {
            return Ok(());
        }
        renderer.upload_atlas(&picture).map_err(render_error)?;
        log::debug!(
            "Uploaded {}x{} atlas (generation {})",
            picture.width, picture.height, picture.generation
        );
        self.uploaded_generation = Some(picture.generation);
        Ok(())
    }

    /// Add a region of a sprite sheet as a sprite.
    ///
    /// `frame` is in sheet pixels, top-left origin. Pixels coming from a
    /// bottom-up host picture go through
    /// [`AtlasPacker::insert_flipped_named`] instead.
    pub fn add_sprite(&mut self, alias: &str, sheet: &ImageData, frame: PixelRect) -> UiResult<AtlasId> {
        let image = sheet.sub_image(frame)?;
        let id = self.atlas.insert_with(Some(alias), TextureSource::Sprite, &image, false)?;
        log::info!("Added sprite '{}' as {} ({}x{})", alias, id, image.width, image.height);
        Ok(id)
    }

    /// Load an image file as a sprite aliased by its file stem
    /// (`"assets/ship.png"` becomes `"ship"`)
    pub fn add_sprite_from_file(&mut self, path: impl AsRef<Path>) -> UiResult<AtlasId> {
        let path = path.as_ref();
        let alias = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| UiError::Resource {
                path: path.to_path_buf(),
                reason: "file name has no usable stem".into(),
            })?;
        self.add_sprite_from_file_named(alias, path)
    }

    /// Load an image file as a sprite under an explicit alias
    pub fn add_sprite_from_file_named(&mut self, alias: &str, path: impl AsRef<Path>) -> UiResult<AtlasId> {
        let path = path.as_ref();
        let image = ImageData::from_file(path).map_err(|err| {
            log::error!("Failed to load sprite {:?}: {}", path, err);
            UiError::Resource { path: path.to_path_buf(), reason: err.to_string() }
        })?;
        let id = self.atlas.insert_with(Some(alias), TextureSource::Sprite, &image, false)?;
        log::info!("Loaded sprite '{}' from {:?} as {}", alias, path, id);
        Ok(id)
    }

    /// Add an already decoded image
    pub fn add_image(&mut self, alias: &str, image: &ImageData) -> UiResult<AtlasId> {
        Ok(self.atlas.insert_named(alias, image)?)
    }

    /// Remove a sprite or image; the font cannot be removed this way
    pub fn remove_texture(&mut self, key: impl Into<AtlasKey>) -> UiResult<()> {
        let key = key.into();
        if self.atlas.entry(key.clone())?.source == TextureSource::Font {
            return Err(UiError::Usage(format!("{key} is the font atlas")));
        }
        self.atlas.remove(key)?;
        Ok(())
    }

    /// Add a TrueType font and rebuild the font atlas
    pub fn add_ttf_font(&mut self, path: impl AsRef<Path>, size_pixels: f32) -> UiResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            log::error!("Font file {:?} does not exist", path);
            return Err(UiError::Resource {
                path: path.to_path_buf(),
                reason: "font file does not exist".into(),
            });
        }

        self.gui
            .add_font_from_file_ttf(path, size_pixels)
            .map_err(|reason| UiError::Resource { path: path.to_path_buf(), reason })?;
        log::info!("Added font {:?} at {}px", path, size_pixels);
        self.reload_font()
    }

    /// Add the GUI library's built-in font and rebuild the font atlas
    pub fn load_default_font(&mut self) -> UiResult<()> {
        self.gui.add_font_default();
        self.reload_font()
    }

    fn reload_font(&mut self) -> UiResult<()> {
        self.gui.build_fonts().map_err(|reason| {
            log::error!("Font atlas build failed: {}", reason);
            UiError::Library(reason)
        })?;

        let texture = self.gui.font_texture_alpha8();
        let image = ImageData::from_alpha8(texture.width, texture.height, &texture.pixels)?;
        let id = if self.atlas.contains(FONT_ALIAS) {
            self.atlas.replace(FONT_ALIAS, &image)?
        } else {
            self.atlas.insert_with(Some(FONT_ALIAS), TextureSource::Font, &image, false)?
        };

        self.font_id = Some(id);
        self.gui.set_font_texture_id(TextureId::from(id));
        log::info!("Font atlas {}x{} stored as {}", texture.width, texture.height, id);
        Ok(())
    }

    /// Emit an image widget for an atlas entry, scaled from its pixel size
    pub fn image(&mut self, key: impl Into<AtlasKey>, scale: f32) -> UiResult<()> {
        let (texture, size) = self.widget_texture(key.into(), scale)?;
        self.gui.image(texture, size);
        Ok(())
    }

    /// Emit an image button for an atlas entry; `true` when clicked
    pub fn image_button(&mut self, key: impl Into<AtlasKey>, scale: f32) -> UiResult<bool> {
        let (texture, size) = self.widget_texture(key.into(), scale)?;
        Ok(self.gui.image_button(texture, size))
    }

    fn widget_texture(&self, key: AtlasKey, scale: f32) -> UiResult<(TextureId, [f32; 2])> {
        if self.state != FrameState::FrameOpen {
            return Err(UiError::Usage(format!("widget for {key} emitted outside a frame")));
        }
        let entry = self.atlas.entry(key).map_err(|err| {
            log::error!("Widget references a missing texture: {}", err);
            UiError::Usage(err.to_string())
        })?;
        let size = [entry.bounds.width as f32 * scale, entry.bounds.height as f32 * scale];
        Ok((TextureId::from(entry.id), size))
    }

    /// Install the clipboard the GUI uses for copy/paste
    pub fn set_clipboard_backend(&mut self, backend: Box<dyn ClipboardBackend>) {
        self.gui.set_clipboard_backend(backend);
    }

    /// Route GUI copy/paste through a shared host window.
    ///
    /// The host must not be borrowed while the GUI runs widgets. A paste that
    /// finds it borrowed reads as an empty clipboard and a copy is dropped;
    /// both are logged at warn level.
    pub fn use_host_clipboard<H: HostInput + 'static>(&mut self, host: Rc<RefCell<H>>) {
        self.set_clipboard_backend(Box::new(HostClipboard::new(host)));
    }

    /// Whether the GUI claimed the device `button` belongs to
    pub fn want_capture(&self, button: impl Into<Button>) -> bool {
        InputBridge::want_capture(self.gui.io(), button.into())
    }

    /// Host `just_pressed`, unless the GUI captured the device
    pub fn just_pressed<H: HostInput + ?Sized>(&self, host: &H, button: impl Into<Button>) -> bool {
        InputBridge::just_pressed(self.gui.io(), host, button.into())
    }

    /// Host `just_released`, unless the GUI captured the device
    pub fn just_released<H: HostInput + ?Sized>(&self, host: &H, button: impl Into<Button>) -> bool {
        InputBridge::just_released(self.gui.io(), host, button.into())
    }

    /// Host `pressed`, unless the GUI captured the device
    pub fn pressed<H: HostInput + ?Sized>(&self, host: &H, button: impl Into<Button>) -> bool {
        InputBridge::pressed(self.gui.io(), host, button.into())
    }

    /// Host `repeated`, unless the GUI captured the device
    pub fn repeated<H: HostInput + ?Sized>(&self, host: &H, button: impl Into<Button>) -> bool {
        InputBridge::repeated(self.gui.io(), host, button.into())
    }

    /// Host scroll, or zero while the GUI holds the mouse
    pub fn mouse_scroll<H: HostInput + ?Sized>(&self, host: &H) -> Vec2 {
        InputBridge::mouse_scroll(self.gui.io(), host)
    }

    /// Either control key is down
    pub fn key_ctrl<H: HostInput + ?Sized>(&self, host: &H) -> bool {
        InputBridge::key_ctrl(host)
    }

    /// Either shift key is down
    pub fn key_shift<H: HostInput + ?Sized>(&self, host: &H) -> bool {
        InputBridge::key_shift(host)
    }

    /// Either alt key is down
    pub fn key_alt<H: HostInput + ?Sized>(&self, host: &H) -> bool {
        InputBridge::key_alt(host)
    }

    /// Either super key is down
    pub fn key_super<H: HostInput + ?Sized>(&self, host: &H) -> bool {
        InputBridge::key_super(host)
    }

    /// Tear down: drop every atlas entry and all input edge state
    pub fn shutdown(&mut self) {
        if self.state == FrameState::Idle && self.atlas.is_empty() {
            return;
        }
        self.atlas.clear();
        self.input.reset();
        self.timer.reset();
        self.batch.clear();
        self.font_id = None;
        self.uploaded_generation = None;
        self.state = FrameState::Idle;
        log::info!("UI bridge shut down");
    }
}

impl<G: GuiContext> Drop for Ui<G> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn render_error(err: Box<dyn std::error::Error>) -> UiError {
    log::error!("Renderer failed during UI draw: {}", err);
    UiError::Render(err.to_string())
}
