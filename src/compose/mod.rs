//! Offscreen composition of base, face and mouth layers into a previewable image.

pub(crate) mod decode;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    catalog::Catalog,
    foundation::{
        core::{Canvas, Offset},
        error::{RigError, RigResult},
    },
    selection::PortraitSelection,
};

/// Composited portrait surface.
#[derive(Clone, Debug)]
pub struct Preview {
    surface: image::RgbaImage,
}

impl Preview {
    pub fn surface(&self) -> &image::RgbaImage {
        &self.surface
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    pub fn to_png_bytes(&self) -> RigResult<Vec<u8>> {
        decode::encode_png(&self.surface)
    }
}

/// Renders selections onto a fixed-size transparent surface.
///
/// Only one pass runs at a time: a request that arrives while a pass is in progress is dropped
/// (`Ok(None)`), not queued.
pub struct Composer {
    canvas: Canvas,
    busy: AtomicBool,
}

/// Clears the busy flag on every exit path, failures included.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Composer {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            busy: AtomicBool::new(false),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub(crate) fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag: &self.busy })
    }

    #[tracing::instrument(skip(self, catalog, selection), fields(character = ?selection.character_id))]
    pub fn compose(
        &self,
        catalog: &dyn Catalog,
        selection: &PortraitSelection,
    ) -> RigResult<Option<Preview>> {
        let Some(_guard) = self.try_begin() else {
            tracing::debug!("composition already in progress; request dropped");
            return Ok(None);
        };

        if selection.base_path.is_empty() {
            return Err(RigError::validation("no character selected"));
        }

        let mut surface = image::RgbaImage::new(self.canvas.width, self.canvas.height);
        draw_layer(&mut surface, catalog, &selection.base_path, Offset::default())?;
        if selection.has_face() {
            draw_layer(&mut surface, catalog, &selection.face_path, selection.offset)?;
        }
        if selection.has_mouth() {
            draw_layer(&mut surface, catalog, &selection.mouth_path, selection.offset)?;
        }

        Ok(Some(Preview { surface }))
    }
}

fn draw_layer(
    surface: &mut image::RgbaImage,
    catalog: &dyn Catalog,
    rel_path: &str,
    at: Offset,
) -> RigResult<()> {
    let bytes = catalog.asset_bytes(rel_path)?;
    let layer = decode::decode_layer(&bytes)
        .map_err(|e| RigError::image(format!("layer '{rel_path}': {e}")))?;
    image::imageops::overlay(surface, &layer, at.x, at.y);
    Ok(())
}
