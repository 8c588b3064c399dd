use std::path::Path;

use glam::uvec2;
use image::{Rgb, RgbImage};
use skylut_core::Lut;

use crate::{Error, Result};

/// Scale applied to radiance tables (multiple scattering, sky) so that their
/// previews aren't almost black.
pub const RADIANCE_PREVIEW_SCALE: f32 = 5.0;

/// Converts given table into an 8-bit image, for inspection only.
///
/// The top row of the image holds `v = 1`, so that the sky-view table shows
/// up with the sky above the ground.
pub fn preview(lut: &Lut, scale: f32) -> RgbImage {
    let height = lut.height();

    RgbImage::from_fn(lut.width(), height, |x, y| {
        let texel = lut.get(uvec2(x, height - 1 - y)) * scale;

        Rgb(texel.to_array().map(quantize))
    })
}

pub fn write_preview(
    path: impl AsRef<Path>,
    lut: &Lut,
    scale: f32,
) -> Result<()> {
    let path = path.as_ref();

    log::debug!("Writing `{}`", path.display());

    preview(lut, scale).save(path).map_err(|source| Error::Image {
        path: path.to_owned(),
        source,
    })
}

fn quantize(val: f32) -> u8 {
    (val.clamp(0.0, 1.0) * 255.0).round() as u8
}
