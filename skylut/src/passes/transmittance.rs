use glam::{vec3, UVec2, Vec2, Vec3};
use skylut_core::{AtmosphereParameters, Lut, Ray, TransmittanceLut};

use super::sample_distance;
use crate::dispatch::dispatch;
use crate::{LutConfig, Result};

/// Computes how much of the sunlight reaches given point of the atmosphere.
#[derive(Clone, Debug)]
pub struct TransmittanceLutBuilder {
    atmosphere: AtmosphereParameters,
    resolution: UVec2,
    steps: u32,
}

impl TransmittanceLutBuilder {
    pub fn new(
        atmosphere: &AtmosphereParameters,
        config: &LutConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            atmosphere: *atmosphere,
            resolution: config.transmittance_resolution,
            steps: config.transmittance_steps,
        })
    }

    pub fn build(&self) -> TransmittanceLut {
        log::debug!(
            "Building transmittance LUT; resolution = {}, steps = {}",
            self.resolution,
            self.steps,
        );

        let lut = dispatch(self.resolution, |pos| {
            self.eval_texel(Lut::grid_uv(self.resolution, pos))
        });

        TransmittanceLut::new(self.atmosphere, lut)
    }

    pub fn eval_texel(&self, uv: Vec2) -> Vec3 {
        let sun_cos_theta = 2.0 * uv.x - 1.0;
        let sun_sin_theta =
            (1.0 - sun_cos_theta * sun_cos_theta).max(0.0).sqrt();

        let pos = vec3(0.0, self.atmosphere.decode_height(uv.y), 0.0);
        let sun_dir = vec3(0.0, sun_cos_theta, sun_sin_theta);

        self.eval(pos, sun_dir)
    }

    /// Returns transmittance along the ray from `pos` towards `sun_dir`, up
    /// to the atmosphere's boundary; it's exactly zero when the sun is hidden
    /// behind the planet.
    pub fn eval(&self, pos: Vec3, sun_dir: Vec3) -> Vec3 {
        let ray = Ray::new(pos, sun_dir);

        if ray.hits_sphere(self.atmosphere.ground_radius) {
            return Vec3::ZERO;
        }

        let t_max = ray
            .intersect_sphere(self.atmosphere.atmosphere_radius)
            .unwrap_or(0.0);

        let mut transmittance = Vec3::ONE;
        let mut t = 0.0;

        for step in 0..self.steps {
            let new_t = sample_distance(step, self.steps, t_max);
            let dt = new_t - t;

            t = new_t;

            let medium = self.atmosphere.eval_medium(ray.at(t));

            transmittance *= (-dt * medium.extinction).exp();
        }

        transmittance
    }
}
