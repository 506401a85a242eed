//! Atlas page set
//!
//! Loads every page a descriptor declares, in parallel, and only exists
//! once all of them decoded. The first failing page rejects the whole set
//! (fail-fast); a partially loaded set is never handed out.

use futures_util::future::try_join_all;
use log::{debug, info};
use std::collections::BTreeMap;

use super::descriptor::AtlasPageRef;
use super::raster::RasterBuffer;
use crate::error::Result;
use crate::loader::Loader;
use crate::utils::Rgba;

/// Decoded pages keyed by page id
#[derive(Debug, Clone, Default)]
pub struct AtlasPageSet {
    pages: BTreeMap<u32, RasterBuffer>,
}

impl AtlasPageSet {
    /// Fetch and decode all pages concurrently
    pub async fn load<L: Loader + ?Sized>(refs: &[AtlasPageRef], loader: &L) -> Result<Self> {
        // Owned refs keep the page futures free of borrowed closure args
        let loads = refs.iter().cloned().map(|page| async move {
            let bytes = loader.fetch(&page.source_path).await?;
            let raster = loader.decode(&bytes)?;
            debug!(
                "Page {} decoded: {}x{} ({})",
                page.id,
                raster.width(),
                raster.height(),
                page.source_path.display()
            );
            Ok::<_, crate::error::FontError>((page.id, raster))
        });

        let pages: BTreeMap<u32, RasterBuffer> = try_join_all(loads).await?.into_iter().collect();
        info!("Loaded {} atlas page(s)", pages.len());
        Ok(Self { pages })
    }

    /// Build from already decoded pages
    pub fn from_pages(pages: impl IntoIterator<Item = (u32, RasterBuffer)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&RasterBuffer> {
        self.pages.get(&id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &RasterBuffer)> {
        self.pages.iter().map(|(id, page)| (*id, page))
    }

    /// Flood every page with `color`
    pub fn flood_color(&mut self, color: Rgba) {
        for page in self.pages.values_mut() {
            page.flood_color(color);
        }
    }
}
