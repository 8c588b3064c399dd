//! Finished lookup tables, each tied to the atmosphere it was generated for.
//!
//! Values of these types can only be obtained once the entire table has been
//! computed (or loaded), so a table is never read while it's still being
//! built.

use glam::{vec2, UVec2, Vec3};

use crate::{AtmosphereParameters, Lut, Ray, SkyViewMapping};

/// Transmittance from a point inside the atmosphere towards the sun.
///
/// - `u` encodes cosine of the sun's zenith angle, `cos = 2u - 1`,
/// - `v` encodes height, linearly from the ground up to the atmosphere's edge.
#[derive(Clone, Debug, PartialEq)]
pub struct TransmittanceLut {
    atmosphere: AtmosphereParameters,
    lut: Lut,
}

impl TransmittanceLut {
    pub const RESOLUTION: UVec2 = UVec2::new(256, 64);

    pub fn new(atmosphere: AtmosphereParameters, lut: Lut) -> Self {
        Self { atmosphere, lut }
    }

    pub fn atmosphere(&self) -> &AtmosphereParameters {
        &self.atmosphere
    }

    pub fn lut(&self) -> &Lut {
        &self.lut
    }

    pub fn into_lut(self) -> Lut {
        self.lut
    }

    /// Returns transmittance towards the sun as seen from given position,
    /// relative to the planet's center.
    pub fn sample_at(&self, pos: Vec3, sun_dir: Vec3) -> Vec3 {
        self.lut.sample(self.atmosphere.encode_sun_uv(pos, sun_dir))
    }

    /// Returns color of the sun as seen by an observer standing at given
    /// position, with the sun hidden behind the planet being black.
    pub fn sun(&self, pos: Vec3, sun_dir: Vec3) -> Vec3 {
        if Ray::new(pos, sun_dir).hits_sphere(self.atmosphere.ground_radius) {
            Vec3::ZERO
        } else {
            self.sample_at(pos, sun_dir)
        }
    }
}

/// Multiple-scattering contribution (orders two and above), parametrized the
/// same way as [`TransmittanceLut`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScatteringLut {
    atmosphere: AtmosphereParameters,
    lut: Lut,
}

impl ScatteringLut {
    pub const RESOLUTION: UVec2 = UVec2::new(32, 32);

    pub fn new(atmosphere: AtmosphereParameters, lut: Lut) -> Self {
        Self { atmosphere, lut }
    }

    pub fn atmosphere(&self) -> &AtmosphereParameters {
        &self.atmosphere
    }

    pub fn lut(&self) -> &Lut {
        &self.lut
    }

    pub fn into_lut(self) -> Lut {
        self.lut
    }

    pub fn sample_at(&self, pos: Vec3, sun_dir: Vec3) -> Vec3 {
        self.lut.sample(self.atmosphere.encode_sun_uv(pos, sun_dir))
    }
}

/// Radiance of the sky, as seen from [`SkyViewMapping::view_pos()`], for a
/// single altitude of the sun.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyLut {
    mapping: SkyViewMapping,
    sun_altitude: f32,
    lut: Lut,
}

impl SkyLut {
    pub const RESOLUTION: UVec2 = UVec2::new(256, 256);

    pub fn new(mapping: SkyViewMapping, sun_altitude: f32, lut: Lut) -> Self {
        Self {
            mapping,
            sun_altitude,
            lut,
        }
    }

    pub fn mapping(&self) -> &SkyViewMapping {
        &self.mapping
    }

    /// Altitude of the sun this table was generated for, in radians.
    pub fn sun_altitude(&self) -> f32 {
        self.sun_altitude
    }

    pub fn lut(&self) -> &Lut {
        &self.lut
    }

    pub fn into_lut(self) -> Lut {
        self.lut
    }

    /// Returns radiance coming from given direction, when the sun shines from
    /// `sun_dir`; only the sun's azimuth is taken from `sun_dir`.
    pub fn sample_dir(&self, ray_dir: Vec3, sun_dir: Vec3) -> Vec3 {
        self.lut.sample(self.mapping.encode_dir(ray_dir, sun_dir))
    }
}

/// Tint of the direct light, indexed by the sine of the sun's altitude.
#[derive(Clone, Debug, PartialEq)]
pub struct SunColorLut {
    lut: Lut,
}

impl SunColorLut {
    pub const RESOLUTION: UVec2 = UVec2::new(224, 1);

    pub fn new(lut: Lut) -> Self {
        Self { lut }
    }

    pub fn lut(&self) -> &Lut {
        &self.lut
    }

    pub fn into_lut(self) -> Lut {
        self.lut
    }

    /// Returns color for the sun at given altitude, described by its sine
    /// (`-1.0` = nadir, `1.0` = zenith).
    pub fn sample(&self, sin_altitude: f32) -> Vec3 {
        self.lut.sample(vec2(0.5 + 0.5 * sin_altitude, 0.5))
    }
}
