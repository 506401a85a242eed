//! Bitmap font
//!
//! Ties the descriptor, the glyph registry and the atlas pages together.
//! A font is opened from a descriptor path and loads in the background;
//! `ready()` settles exactly once, after the descriptor is parsed and every
//! page is decoded, or with the first error encountered.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::descriptor::{FontDefinition, FontDescriptor};
use super::glyph::{Glyph, GlyphRegistry};
use super::layout::{layout, GlyphBox};
use super::pages::AtlasPageSet;
use super::raster::RasterBuffer;
use crate::error::{FontError, Result};
use crate::loader::Loader;
use crate::utils::Rgba;

/// Loaded font content
#[derive(Debug)]
struct FontData {
    descriptor: FontDescriptor,
    glyphs: GlyphRegistry,
    pages: AtlasPageSet,
    color: Rgba,
}

/// Loading state (transitions once: Loading -> Ready | Failed)
#[derive(Debug)]
enum LoadState {
    Loading(JoinHandle<Result<FontData>>),
    Ready(FontData),
    Failed(FontError),
}

/// Bitmap font backed by one or more recolorable atlas pages
#[derive(Debug)]
pub struct BitmapFont {
    source: PathBuf,
    state: LoadState,
}

impl BitmapFont {
    /// Start loading the font described at `path`.
    ///
    /// Returns immediately; loading runs on a tokio task. Outside a tokio
    /// runtime the font is failed with [`FontError::Aborted`].
    pub fn open<L: Loader>(path: impl Into<PathBuf>, loader: Arc<L>) -> Self {
        let source = path.into();
        let task_path = source.clone();
        let state = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => LoadState::Loading(
                runtime.spawn(async move { load(&task_path, loader.as_ref()).await }),
            ),
            Err(e) => {
                warn!("Cannot load {} outside a tokio runtime: {}", source.display(), e);
                LoadState::Failed(FontError::Aborted(e.to_string()))
            }
        };
        Self { source, state }
    }

    /// Load `path` and wait until it is ready
    pub async fn load<L: Loader>(path: impl Into<PathBuf>, loader: Arc<L>) -> Result<Self> {
        let mut font = Self::open(path, loader);
        font.ready().await?;
        Ok(font)
    }

    /// Build a ready font from a descriptor and already decoded pages
    pub fn from_parts(definition: FontDefinition, pages: AtlasPageSet) -> Result<Self> {
        let source = PathBuf::new();
        let data = assemble(definition, pages)?;
        Ok(Self {
            source,
            state: LoadState::Ready(data),
        })
    }

    /// Wait for loading to settle.
    ///
    /// Resolves once; every later call returns the same outcome.
    pub async fn ready(&mut self) -> Result<()> {
        if let LoadState::Loading(handle) = &mut self.state {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(FontError::Aborted(e.to_string())),
            };
            self.state = match outcome {
                Ok(data) => {
                    info!(
                        "Font ready: {} ({} glyphs, {} pages)",
                        self.source.display(),
                        data.glyphs.len(),
                        data.pages.len()
                    );
                    LoadState::Ready(data)
                }
                Err(e) => {
                    warn!("Font failed to load: {}: {}", self.source.display(), e);
                    LoadState::Failed(e)
                }
            };
        }

        match &self.state {
            LoadState::Ready(_) => Ok(()),
            LoadState::Failed(e) => Err(e.clone()),
            LoadState::Loading(_) => Err(FontError::NotReady),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    /// Descriptor path this font was opened from
    pub fn source(&self) -> &Path {
        &self.source
    }

    fn data(&self) -> Result<&FontData> {
        match &self.state {
            LoadState::Ready(data) => Ok(data),
            LoadState::Failed(e) => Err(e.clone()),
            LoadState::Loading(_) => Err(FontError::NotReady),
        }
    }

    /// Glyph for `code`, None if unsupported or not loaded yet
    pub fn get_glyph(&self, code: u32) -> Option<&Glyph> {
        self.data().ok()?.glyphs.get(code)
    }

    /// Whether `code` has a glyph. Never blocks; false while loading.
    pub fn is_supported(&self, code: u32) -> bool {
        self.data().map_or(false, |d| d.glyphs.contains(code))
    }

    /// Current display color (opaque white until changed)
    pub fn color(&self) -> Rgba {
        self.data().map_or(Rgba::default(), |d| d.color)
    }

    /// Recolor every page.
    ///
    /// No-op when `color` equals the current color by value.
    pub fn set_color(&mut self, color: impl Into<Rgba>) -> Result<()> {
        let color = color.into();
        let data = match &mut self.state {
            LoadState::Ready(data) => data,
            LoadState::Failed(e) => return Err(e.clone()),
            LoadState::Loading(_) => return Err(FontError::NotReady),
        };
        if data.color == color {
            return Ok(());
        }
        debug!("Recoloring {} page(s): {} -> {}", data.pages.len(), data.color, color);
        data.pages.flood_color(color);
        data.color = color;
        Ok(())
    }

    pub fn descriptor(&self) -> Result<&FontDescriptor> {
        Ok(&self.data()?.descriptor)
    }

    pub fn page(&self, id: u32) -> Result<Option<&RasterBuffer>> {
        Ok(self.data()?.pages.get(id))
    }

    /// All pages in ascending id order
    pub fn pages(&self) -> Result<impl Iterator<Item = (u32, &RasterBuffer)>> {
        Ok(self.data()?.pages.iter())
    }

    /// Page `id` encoded as a PNG data URI, in the current color
    pub fn encoded_page(&self, id: u32) -> Result<Option<String>> {
        self.page(id)?.map(RasterBuffer::encode).transpose()
    }

    /// Placement box of `code` at `scale`
    pub fn layout(&self, code: u32, scale: f32) -> Result<GlyphBox> {
        let data = self.data()?;
        let glyph = data
            .glyphs
            .get(code)
            .ok_or(FontError::UnsupportedGlyph(code))?;
        // Pages are validated when assembled, so a missing one means a bug
        let page = data
            .pages
            .get(glyph.page_id)
            .ok_or(FontError::UnsupportedGlyph(code))?;
        Ok(layout(glyph, page.width(), page.height(), scale))
    }

    /// Width and height of `text` at `scale`.
    ///
    /// Width is the sum of the advances of supported characters; height is
    /// the line height.
    pub fn measure(&self, text: &str, scale: f32) -> Result<(f32, f32)> {
        let data = self.data()?;
        let width: f32 = text
            .chars()
            .filter_map(|c| data.glyphs.get(c as u32))
            .map(|g| g.x_advance * scale)
            .sum();
        Ok((width, data.descriptor.line_height * scale))
    }
}

impl Drop for BitmapFont {
    fn drop(&mut self) {
        if let LoadState::Loading(handle) = &self.state {
            handle.abort();
        }
    }
}

/// Fetch + parse the descriptor, then load its pages
async fn load<L: Loader + ?Sized>(path: &Path, loader: &L) -> Result<FontData> {
    let bytes = loader.fetch(path).await?;
    let text = String::from_utf8(bytes).map_err(|_| FontError::InvalidText {
        path: path.to_path_buf(),
    })?;
    let definition = FontDefinition::parse(&text, path)?;
    debug!(
        "Descriptor parsed: face={:?} lineHeight={} pages={} glyphs={}",
        definition.descriptor.face,
        definition.descriptor.line_height,
        definition.pages.len(),
        definition.glyphs.len()
    );
    let pages = AtlasPageSet::load(&definition.pages, loader).await?;
    assemble(definition, pages)
}

fn assemble(definition: FontDefinition, pages: AtlasPageSet) -> Result<FontData> {
    for page in &definition.pages {
        if pages.get(page.id).is_none() {
            return Err(FontError::fetch(&page.source_path, "page was not loaded"));
        }
    }
    Ok(FontData {
        descriptor: definition.descriptor,
        glyphs: definition.glyphs,
        pages,
        color: Rgba::default(),
    })
}
