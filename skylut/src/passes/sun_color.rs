use glam::{uvec2, UVec2, Vec3};
use skylut_core::{lerp, SunColorLut};

use crate::dispatch::dispatch;
use crate::{LutConfig, Result, SkyLutBuilder, SunColorSampling};

/// Computes color of the sky around the sun (or of the entire sky, see
/// [`SunColorSampling`]) for a range of the sun's altitudes.
///
/// Entry `i` of the table corresponds to the sun whose altitude's sine is
/// `lerp(-1.0, 1.0, i / (len - 1))`.
#[derive(Clone, Debug)]
pub struct SunColorLutBuilder<'a> {
    sky: &'a SkyLutBuilder<'a>,
    len: u32,
    sampling: SunColorSampling,
}

impl<'a> SunColorLutBuilder<'a> {
    pub fn new(
        sky: &'a SkyLutBuilder<'a>,
        config: &LutConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            sky,
            len: config.sun_color_len,
            sampling: config.sun_color_sampling,
        })
    }

    pub fn build(&self) -> SunColorLut {
        log::debug!(
            "Building sun-color LUT; len = {}, sampling = {:?}",
            self.len,
            self.sampling,
        );

        let lut = dispatch(uvec2(self.len, 1), |pos| {
            self.eval(self.sin_altitude(pos.x))
        });

        SunColorLut::new(lut)
    }

    pub fn sin_altitude(&self, idx: u32) -> f32 {
        let t = idx as f32 / (self.len.max(2) - 1) as f32;

        lerp(-1.0, 1.0, t)
    }

    /// Returns the averaged radiance for the sun at altitude described by
    /// given sine.
    pub fn eval(&self, sin_altitude: f32) -> Vec3 {
        let sun_altitude = sin_altitude.clamp(-1.0, 1.0).asin();
        let (origin, size) = self.window(sun_altitude);
        let region = self.sky.build_region(sun_altitude, origin, size);

        region.texels().iter().sum::<Vec3>() / (region.texels().len() as f32)
    }

    /// Returns the part of the sky table that gets averaged, as `(origin,
    /// size)` in texels.
    ///
    /// When the sun falls between texels, the window spans both of its
    /// neighbours, so it stays centred on the sun.
    pub fn window(&self, sun_altitude: f32) -> (UVec2, UVec2) {
        let resolution = self.sky.resolution();

        match self.sampling {
            SunColorSampling::AroundSun { radius } => {
                let sun_uv = self.sky.mapping().encode(0.0, sun_altitude);

                let sun_pos = sun_uv
                    * (resolution.max(UVec2::splat(2)) - 1).as_vec2();

                let lo = sun_pos.floor().as_uvec2().min(resolution - 1);
                let hi = sun_pos.ceil().as_uvec2().min(resolution - 1);

                let min = uvec2(
                    lo.x.saturating_sub(radius),
                    lo.y.saturating_sub(radius),
                );

                let max = (hi + radius).min(resolution - 1);

                (min, max - min + 1)
            }

            SunColorSampling::UpperHemisphere => {
                let horizon = resolution.y / 2;

                (uvec2(0, horizon), uvec2(resolution.x, resolution.y - horizon))
            }
        }
    }
}
