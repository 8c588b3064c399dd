use glam::{uvec2, UVec2};
use skylut_core::{ScatteringLut, SkyLut, SunColorLut, TransmittanceLut};

use crate::{Error, Result, SphereSampling};

/// Resolutions and quality settings of the generated tables.
///
/// The defaults are tuned for interactive use (quick to bake, visually close
/// to the production quality); see [`Self::production()`] for tables meant to
/// be shipped.
#[derive(Clone, Debug, PartialEq)]
pub struct LutConfig {
    pub transmittance_resolution: UVec2,

    /// Number of ray-marching steps per transmittance texel.
    pub transmittance_steps: u32,

    pub scattering_resolution: UVec2,

    /// Number of ray-marching steps per each sampled direction of a
    /// scattering texel.
    pub scattering_steps: u32,

    /// Directions integrated over for each scattering texel.
    pub scattering_sampling: SphereSampling,

    pub sky_resolution: UVec2,

    /// Number of ray-marching steps per sky texel.
    pub sky_steps: u32,

    /// Number of sun altitudes the sun-color table is generated for.
    pub sun_color_len: u32,

    pub sun_color_sampling: SunColorSampling,
}

impl LutConfig {
    pub fn interactive() -> Self {
        Self {
            transmittance_resolution: TransmittanceLut::RESOLUTION,
            transmittance_steps: 32,
            scattering_resolution: ScatteringLut::RESOLUTION,
            scattering_steps: 20,
            scattering_sampling: SphereSampling::Stratified { samples_sqrt: 8 },
            sky_resolution: SkyLut::RESOLUTION,
            sky_steps: 32,
            sun_color_len: SunColorLut::RESOLUTION.x,
            sun_color_sampling: Default::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            transmittance_steps: 1024,
            scattering_steps: 128,
            scattering_sampling: SphereSampling::Lattice { samples: 4096 },
            ..Self::interactive()
        }
    }

    pub fn with_transmittance(mut self, resolution: UVec2, steps: u32) -> Self {
        self.transmittance_resolution = resolution;
        self.transmittance_steps = steps;
        self
    }

    pub fn with_scattering(
        mut self,
        resolution: UVec2,
        steps: u32,
        sampling: SphereSampling,
    ) -> Self {
        self.scattering_resolution = resolution;
        self.scattering_steps = steps;
        self.scattering_sampling = sampling;
        self
    }

    pub fn with_sky(mut self, resolution: UVec2, steps: u32) -> Self {
        self.sky_resolution = resolution;
        self.sky_steps = steps;
        self
    }

    pub fn with_sun_color(
        mut self,
        len: u32,
        sampling: SunColorSampling,
    ) -> Self {
        self.sun_color_len = len;
        self.sun_color_sampling = sampling;
        self
    }

    pub fn sun_color_resolution(&self) -> UVec2 {
        uvec2(self.sun_color_len, 1)
    }

    pub fn validate(&self) -> Result<()> {
        fn check(cond: bool, msg: &'static str) -> Result<()> {
            if cond {
                Ok(())
            } else {
                Err(Error::InvalidConfig(msg))
            }
        }

        check(
            self.transmittance_resolution.min_element() > 0,
            "transmittance table must not be empty",
        )?;

        check(
            self.transmittance_steps > 0,
            "transmittance needs at least one step",
        )?;

        check(
            self.scattering_resolution.min_element() > 0,
            "scattering table must not be empty",
        )?;

        check(
            self.scattering_steps > 0,
            "scattering needs at least one step",
        )?;

        match self.scattering_sampling {
            SphereSampling::Stratified { samples_sqrt } => check(
                samples_sqrt > 0,
                "stratified sampling needs at least one sample",
            )?,

            SphereSampling::Lattice { samples } => check(
                samples >= 2,
                "lattice sampling needs at least two samples",
            )?,
        }

        check(
            self.sky_resolution.min_element() > 0,
            "sky table must not be empty",
        )?;

        check(self.sky_steps > 0, "sky needs at least one step")?;

        check(
            self.sun_color_len >= 2,
            "sun-color table needs at least two entries",
        )?;

        Ok(())
    }
}

impl Default for LutConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Which part of the sky is averaged into each entry of the sun-color table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SunColorSampling {
    /// Averages a window of sky texels centered at the sun's direction,
    /// reaching `radius` texels past the sun's texel (or past both texels the
    /// sun falls between); only that window is ray-marched.
    AroundSun { radius: u32 },

    /// Averages the entire sky above the horizon (the upper half of the sky
    /// table), giving an ambient sky-light tint.
    UpperHemisphere,
}

impl Default for SunColorSampling {
    fn default() -> Self {
        Self::AroundSun { radius: 2 }
    }
}
