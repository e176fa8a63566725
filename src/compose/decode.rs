use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{RigError, RigResult};

pub fn decode_layer(bytes: &[u8]) -> RigResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode layer image from memory")
        .map_err(|e| RigError::image(format!("{e:#}")))?;
    Ok(dyn_img.to_rgba8())
}

pub fn encode_png(surface: &image::RgbaImage) -> RigResult<Vec<u8>> {
    let mut buf = Vec::new();
    surface
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode surface as png")
        .map_err(|e| RigError::image(format!("{e:#}")))?;
    Ok(buf)
}
