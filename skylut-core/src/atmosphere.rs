use bytemuck::{Pod, Zeroable};
use glam::{vec2, vec3, Vec2, Vec3};

use crate::F32Ext;

/// Physical description of the planet's atmosphere.
///
/// Lengths are in mega-meters and coefficients are per mega-meter, at the
/// reference (sea-level) density.
///
/// The layout is padding-free, so the parameters can be uploaded as-is
/// next to the tables.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct AtmosphereParameters {
    /// Radius of the planet.
    pub ground_radius: f32,

    /// Radius of the atmosphere's outer boundary.
    pub atmosphere_radius: f32,

    pub rayleigh_scattering: Vec3,
    pub rayleigh_absorption: f32,

    pub mie_scattering: f32,
    pub mie_absorption: f32,

    pub ozone_absorption: Vec3,

    /// Diffuse reflectance of the ground, used when a multiple-scattering ray
    /// hits the planet.
    pub ground_albedo: f32,
}

impl AtmosphereParameters {
    /// Radius of the planet, in mega-meters.
    pub const GROUND_RADIUS_MM: f32 = 6.360;

    /// Radius of the atmosphere, in mega-meters.
    pub const ATMOSPHERE_RADIUS_MM: f32 = 6.460;

    pub const RAYLEIGH_SCATTERING_BASE: Vec3 = vec3(5.802, 13.558, 33.1);
    pub const RAYLEIGH_ABSORPTION_BASE: f32 = 0.0;

    pub const MIE_SCATTERING_BASE: f32 = 3.996;
    pub const MIE_ABSORPTION_BASE: f32 = 4.4;

    pub const OZONE_ABSORPTION_BASE: Vec3 = vec3(0.650, 1.881, 0.085);

    pub const GROUND_ALBEDO: f32 = 0.3;

    /// Distance kept between the LUT's height domain and both spheres, so
    /// that positions decoded from the table never sit exactly on a boundary.
    pub const HEIGHT_EPSILON_MM: f32 = 1e-6;

    /// Earth's atmosphere.
    pub const EARTH: Self = Self {
        ground_radius: Self::GROUND_RADIUS_MM,
        atmosphere_radius: Self::ATMOSPHERE_RADIUS_MM,
        rayleigh_scattering: Self::RAYLEIGH_SCATTERING_BASE,
        rayleigh_absorption: Self::RAYLEIGH_ABSORPTION_BASE,
        mie_scattering: Self::MIE_SCATTERING_BASE,
        mie_absorption: Self::MIE_ABSORPTION_BASE,
        ozone_absorption: Self::OZONE_ABSORPTION_BASE,
        ground_albedo: Self::GROUND_ALBEDO,
    };

    /// Evaluates scattering and extinction coefficients at given position,
    /// relative to the planet's center.
    pub fn eval_medium(&self, pos: Vec3) -> Medium {
        let altitude_km =
            ((pos.length() - self.ground_radius) * 1000.0).max(-100.0);

        // Clamped so that positions below the ground don't blow up
        let rayleigh_density = (-altitude_km / 8.0).exp().min(10.0);
        let mie_density = (-altitude_km / 1.2).exp().min(10.0);

        let rayleigh_scattering = self.rayleigh_scattering * rayleigh_density;
        let rayleigh_absorption = self.rayleigh_absorption * rayleigh_density;

        let mie_scattering = self.mie_scattering * mie_density;
        let mie_absorption = self.mie_absorption * mie_density;

        let ozone_absorption = self.ozone_absorption
            * (1.0 - (altitude_km - 25.0).abs() / 15.0).max(0.0);

        let extinction = rayleigh_scattering
            + rayleigh_absorption
            + mie_scattering
            + mie_absorption
            + ozone_absorption;

        Medium {
            rayleigh_scattering,
            mie_scattering,
            extinction,
        }
    }

    /// Maps a normalized coordinate into a height within the atmosphere, as
    /// used by the transmittance and scattering tables.
    pub fn decode_height(&self, v: f32) -> f32 {
        let eps = Self::HEIGHT_EPSILON_MM;

        self.ground_radius
            + eps
            + v * (self.atmosphere_radius - self.ground_radius - 2.0 * eps)
    }

    /// Returns the normalized coordinates under which the transmittance and
    /// scattering tables store the value for given position and sun
    /// direction.
    pub fn encode_sun_uv(&self, pos: Vec3, sun_dir: Vec3) -> Vec2 {
        let height = pos.length();
        let up = pos / height;
        let sun_cos_zenith_angle = sun_dir.dot(up);

        vec2(
            (0.5 + 0.5 * sun_cos_zenith_angle).saturate(),
            ((height - self.ground_radius)
                / (self.atmosphere_radius - self.ground_radius))
                .saturate(),
        )
    }
}

impl Default for AtmosphereParameters {
    fn default() -> Self {
        Self::EARTH
    }
}

/// Coefficients of the atmosphere at a single point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Medium {
    pub rayleigh_scattering: Vec3,
    pub mie_scattering: f32,
    pub extinction: Vec3,
}

impl Medium {
    /// Scattering coefficient without any phase weighting.
    pub fn scattering(&self) -> Vec3 {
        self.rayleigh_scattering + self.mie_scattering
    }
}

/// Extinction below which [`integrate_segment()`] switches to its first-order
/// approximation.
pub const EXTINCTION_EPSILON: f32 = 1e-7;

/// Integrates a constant in-scattering `scattering` over a segment of length
/// `dt` inside a medium of constant `extinction`:
///
/// ```text
/// (S - S * exp(-extinction * dt)) / extinction
/// ```
///
/// Channels with (nearly) zero extinction fall back to `S * dt`, which is the
/// limit of the expression above.
pub fn integrate_segment(scattering: Vec3, extinction: Vec3, dt: f32) -> Vec3 {
    let transmittance = (-dt * extinction).exp();
    let integral = (scattering - scattering * transmittance)
        / extinction.max(Vec3::splat(EXTINCTION_EPSILON));

    Vec3::select(
        extinction.cmplt(Vec3::splat(EXTINCTION_EPSILON)),
        scattering * dt,
        integral,
    )
}
