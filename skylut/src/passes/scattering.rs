use std::sync::atomic::{AtomicU32, Ordering};

use glam::{vec3, UVec2, Vec2, Vec3};
use skylut_core::{
    integrate_segment, mie_phase, rayleigh_phase, AtmosphereParameters, Lut,
    Ray, ScatteringLut, TransmittanceLut,
};

use super::sample_distance;
use crate::dispatch::dispatch;
use crate::{LutConfig, Result, SphereSampling};

/// Computes the multiple-scattering contribution, following Hillaire's
/// "A Scalable and Production Ready Sky and Atmosphere Rendering Technique":
/// the second-order light is integrated over the sphere, and the higher
/// orders are approximated with a geometric series.
#[derive(Clone, Debug)]
pub struct ScatteringLutBuilder<'a> {
    transmittance: &'a TransmittanceLut,
    resolution: UVec2,
    steps: u32,
    sampling: SphereSampling,
}

impl<'a> ScatteringLutBuilder<'a> {
    /// Upper bound for the transfer factor; the geometric series diverges once
    /// it reaches one.
    pub const MAX_TRANSFER: f32 = 1.0 - 1e-4;

    pub fn new(
        transmittance: &'a TransmittanceLut,
        config: &LutConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            transmittance,
            resolution: config.scattering_resolution,
            steps: config.scattering_steps,
            sampling: config.scattering_sampling,
        })
    }

    fn atmosphere(&self) -> &AtmosphereParameters {
        self.transmittance.atmosphere()
    }

    pub fn build(&self) -> ScatteringLut {
        log::debug!(
            "Building scattering LUT; resolution = {}, steps = {}, \
             sampling = {:?}",
            self.resolution,
            self.steps,
            self.sampling,
        );

        let clamped = AtomicU32::new(0);

        let lut = dispatch(self.resolution, |pos| {
            let (pos, sun_dir) =
                self.decode_texel(Lut::grid_uv(self.resolution, pos));

            let (lum, transfer) = self.eval(pos, sun_dir);

            if transfer.cmpgt(Vec3::splat(Self::MAX_TRANSFER)).any() {
                clamped.fetch_add(1, Ordering::Relaxed);
            }

            Self::resolve(lum, transfer)
        });

        let clamped = clamped.into_inner();

        if clamped > 0 {
            log::warn!(
                "Multiple-scattering series diverged; texels = {}, \
                 clamped-to = {}",
                clamped,
                Self::MAX_TRANSFER,
            );
        }

        ScatteringLut::new(*self.atmosphere(), lut)
    }

    pub fn eval_texel(&self, uv: Vec2) -> Vec3 {
        let (pos, sun_dir) = self.decode_texel(uv);
        let (lum, transfer) = self.eval(pos, sun_dir);

        Self::resolve(lum, transfer)
    }

    fn decode_texel(&self, uv: Vec2) -> (Vec3, Vec3) {
        let sun_cos_theta = 2.0 * uv.x - 1.0;
        let sun_sin_theta =
            (1.0 - sun_cos_theta * sun_cos_theta).max(0.0).sqrt();

        let pos = vec3(0.0, self.atmosphere().decode_height(uv.y), 0.0);
        let sun_dir = vec3(0.0, sun_cos_theta, sun_sin_theta);

        (pos, sun_dir)
    }

    /// Sums the infinite series of scattering orders, `lum * (1 + f + f² +
    /// ...)`.
    pub fn resolve(lum: Vec3, transfer: Vec3) -> Vec3 {
        lum / (1.0 - transfer.min(Vec3::splat(Self::MAX_TRANSFER)))
    }

    /// Returns `(luminance, transfer factor)` of the second-order scattering
    /// at given point, averaged over all sampled directions.
    ///
    /// Directions are visited sequentially in a fixed order, so the result is
    /// reproducible bit-for-bit.
    pub fn eval(&self, pos: Vec3, sun_dir: Vec3) -> (Vec3, Vec3) {
        let atmosphere = self.atmosphere();
        let inv_samples = 1.0 / (self.sampling.len() as f32);

        let mut lum_total = Vec3::ZERO;
        let mut transfer = Vec3::ZERO;

        for ray_dir in self.sampling.directions() {
            let ray = Ray::new(pos, ray_dir);

            let ground_distance = ray
                .intersect_sphere(atmosphere.ground_radius)
                .filter(|t| *t > 0.0);

            let t_max = ground_distance.unwrap_or_else(|| {
                ray.intersect_sphere(atmosphere.atmosphere_radius)
                    .unwrap_or(0.0)
            });

            let cos_theta = ray_dir.dot(sun_dir);
            let mie_phase_value = mie_phase(cos_theta);
            let rayleigh_phase_value = rayleigh_phase(cos_theta);

            let mut lum = Vec3::ZERO;
            let mut lum_factor = Vec3::ZERO;
            let mut transmittance = Vec3::ONE;
            let mut t = 0.0;

            for step in 0..self.steps {
                let new_t = sample_distance(step, self.steps, t_max);
                let dt = new_t - t;

                t = new_t;

                let new_pos = ray.at(t);
                let medium = atmosphere.eval_medium(new_pos);

                lum_factor += transmittance
                    * integrate_segment(
                        medium.scattering(),
                        medium.extinction,
                        dt,
                    );

                let sun_transmittance =
                    self.transmittance.sample_at(new_pos, sun_dir);

                let in_scattering = (medium.rayleigh_scattering
                    * rayleigh_phase_value
                    + medium.mie_scattering * mie_phase_value)
                    * sun_transmittance;

                lum += transmittance
                    * integrate_segment(in_scattering, medium.extinction, dt);

                transmittance *= (-dt * medium.extinction).exp();
            }

            if let Some(ground_distance) = ground_distance {
                let hit_pos = ray.at(ground_distance).normalize()
                    * atmosphere.ground_radius;

                lum += transmittance
                    * atmosphere.ground_albedo
                    * self.transmittance.sample_at(hit_pos, sun_dir);
            }

            transfer += lum_factor * inv_samples;
            lum_total += lum * inv_samples;
        }

        (lum_total, transfer)
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, vec2};

    use super::*;
    use crate::{Error, TransmittanceLutBuilder};

    fn config() -> LutConfig {
        LutConfig::default()
            .with_transmittance(uvec2(64, 16), 32)
            .with_scattering(
                uvec2(8, 8),
                10,
                SphereSampling::Stratified { samples_sqrt: 4 },
            )
    }

    fn transmittance() -> TransmittanceLut {
        TransmittanceLutBuilder::new(&AtmosphereParameters::EARTH, &config())
            .unwrap()
            .build()
    }

    #[test]
    fn series_converges() {
        let transmittance = transmittance();
        let target =
            ScatteringLutBuilder::new(&transmittance, &config()).unwrap();

        let uvs = [
            vec2(0.0, 0.0),
            vec2(0.5, 0.0),
            vec2(1.0, 0.0),
            vec2(0.8, 1.0),
        ];

        for uv in uvs {
            let (pos, sun_dir) = target.decode_texel(uv);
            let (lum, transfer) = target.eval(pos, sun_dir);

            assert!(lum.is_finite(), "uv = {uv}");
            assert!(lum.cmpge(Vec3::ZERO).all(), "uv = {uv}");
            assert!(transfer.cmpge(Vec3::ZERO).all(), "uv = {uv}");
            assert!(transfer.cmplt(Vec3::ONE).all(), "uv = {uv}");
        }
    }

    #[test]
    fn texels_are_finite_and_non_negative() {
        let transmittance = transmittance();
        let lut = ScatteringLutBuilder::new(&transmittance, &config())
            .unwrap()
            .build();
        let (min, max) = lut.lut().bounds();

        assert_eq!(uvec2(8, 8), lut.lut().size());
        assert!(min.cmpge(Vec3::ZERO).all(), "min = {min}");
        assert!(max.is_finite(), "max = {max}");
        assert!(max.cmpgt(Vec3::ZERO).all(), "max = {max}");
    }

    #[test]
    fn sun_under_the_planet_gives_no_light() {
        let transmittance = transmittance();
        let target =
            ScatteringLutBuilder::new(&transmittance, &config()).unwrap();

        assert_eq!(Vec3::ZERO, target.eval_texel(vec2(0.0, 0.0)));
        assert_eq!(Vec3::ZERO, target.eval_texel(vec2(0.0, 1.0)));
    }

    #[test]
    fn resolve_clamps_diverging_series() {
        let lum = Vec3::ONE;

        let actual = ScatteringLutBuilder::resolve(lum, vec3(0.5, 1.0, 3.0));

        assert_eq!(2.0, actual.x);
        assert!(actual.y.is_finite());
        assert_eq!(actual.y, actual.z);
        assert!(actual.y > 0.0);
    }

    #[test]
    fn lattice_sampling_is_deterministic() {
        let config = config().with_scattering(
            uvec2(4, 4),
            8,
            SphereSampling::Lattice { samples: 64 },
        );

        let transmittance = transmittance();
        let target =
            ScatteringLutBuilder::new(&transmittance, &config).unwrap();

        assert_eq!(target.build(), target.build());
    }

    #[test]
    fn rejects_invalid_config() {
        let transmittance = transmittance();

        let config = config().with_scattering(
            uvec2(4, 4),
            8,
            SphereSampling::Lattice { samples: 1 },
        );

        assert!(matches!(
            ScatteringLutBuilder::new(&transmittance, &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
