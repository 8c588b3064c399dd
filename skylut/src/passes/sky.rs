use glam::{UVec2, Vec2, Vec3};
use skylut_core::{
    integrate_segment, mie_phase, rayleigh_phase, AtmosphereParameters, Lut,
    Ray, ScatteringLut, SkyLut, SkyViewMapping, TransmittanceLut,
};

use super::sample_distance;
use crate::dispatch::dispatch;
use crate::{LutConfig, Result};

/// Computes the sky's radiance, as seen from [`SkyViewMapping::view_pos()`],
/// for a given altitude of the sun.
#[derive(Clone, Debug)]
pub struct SkyLutBuilder<'a> {
    transmittance: &'a TransmittanceLut,
    scattering: &'a ScatteringLut,
    mapping: SkyViewMapping,
    resolution: UVec2,
    steps: u32,
}

impl<'a> SkyLutBuilder<'a> {
    pub fn new(
        transmittance: &'a TransmittanceLut,
        scattering: &'a ScatteringLut,
        config: &LutConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            transmittance,
            scattering,
            mapping: SkyViewMapping::new(transmittance.atmosphere()),
            resolution: config.sky_resolution,
            steps: config.sky_steps,
        })
    }

    fn atmosphere(&self) -> &AtmosphereParameters {
        self.transmittance.atmosphere()
    }

    pub fn mapping(&self) -> &SkyViewMapping {
        &self.mapping
    }

    pub fn resolution(&self) -> UVec2 {
        self.resolution
    }

    /// Builds the entire table for the sun at given altitude, in radians.
    pub fn build(&self, sun_altitude: f32) -> SkyLut {
        log::debug!(
            "Building sky LUT; resolution = {}, steps = {}, sun-altitude = {}",
            self.resolution,
            self.steps,
            sun_altitude,
        );

        let lut =
            self.build_region(sun_altitude, UVec2::ZERO, self.resolution);

        SkyLut::new(self.mapping, sun_altitude, lut)
    }

    /// Builds a `size`-sized fragment of the table, starting at texel
    /// `origin`; texels keep the coordinates they'd have in the full table.
    pub fn build_region(
        &self,
        sun_altitude: f32,
        origin: UVec2,
        size: UVec2,
    ) -> Lut {
        let sun_dir = SkyViewMapping::sun_dir(sun_altitude);

        dispatch(size, |pos| {
            let uv = Lut::grid_uv(self.resolution, origin + pos);

            self.eval_texel(uv, sun_dir)
        })
    }

    pub fn eval_texel(&self, uv: Vec2, sun_dir: Vec3) -> Vec3 {
        let (azimuth, altitude) = self.mapping.decode(uv);

        self.eval(SkyViewMapping::ray_dir(azimuth, altitude), sun_dir)
    }

    /// Returns radiance coming towards the observer from `ray_dir`.
    pub fn eval(&self, ray_dir: Vec3, sun_dir: Vec3) -> Vec3 {
        let atmosphere = self.atmosphere();
        let ray = Ray::new(self.mapping.view_pos(), ray_dir);

        let t_max = ray
            .intersect_sphere(atmosphere.ground_radius)
            .filter(|t| *t > 0.0)
            .or_else(|| ray.intersect_sphere(atmosphere.atmosphere_radius))
            .unwrap_or(0.0);

        let cos_theta = ray_dir.dot(sun_dir);
        let mie_phase_value = mie_phase(cos_theta);
        let rayleigh_phase_value = rayleigh_phase(cos_theta);

        let mut lum = Vec3::ZERO;
        let mut transmittance = Vec3::ONE;
        let mut t = 0.0;

        for step in 0..self.steps {
            let new_t = sample_distance(step, self.steps, t_max);
            let dt = new_t - t;

            t = new_t;

            let new_pos = ray.at(t);
            let medium = atmosphere.eval_medium(new_pos);

            let sun_transmittance =
                self.transmittance.sample_at(new_pos, sun_dir);

            let psi_ms = self.scattering.sample_at(new_pos, sun_dir);

            let rayleigh_in_scattering = medium.rayleigh_scattering
                * (rayleigh_phase_value * sun_transmittance + psi_ms);

            let mie_in_scattering = medium.mie_scattering
                * (mie_phase_value * sun_transmittance + psi_ms);

            lum += transmittance
                * integrate_segment(
                    rayleigh_in_scattering + mie_in_scattering,
                    medium.extinction,
                    dt,
                );

            transmittance *= (-dt * medium.extinction).exp();
        }

        lum
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec2};

    use super::*;
    use crate::{
        Error, ScatteringLutBuilder, SphereSampling, TransmittanceLutBuilder,
    };

    fn config() -> LutConfig {
        LutConfig::default()
            .with_transmittance(uvec2(64, 16), 32)
            .with_scattering(
                uvec2(8, 8),
                10,
                SphereSampling::Stratified { samples_sqrt: 4 },
            )
            .with_sky(uvec2(17, 16), 16)
    }

    fn luts() -> (TransmittanceLut, ScatteringLut) {
        let config = config();

        let transmittance =
            TransmittanceLutBuilder::new(&AtmosphereParameters::EARTH, &config)
                .unwrap()
                .build();

        let scattering = ScatteringLutBuilder::new(&transmittance, &config)
            .unwrap()
            .build();

        (transmittance, scattering)
    }

    #[test]
    fn texels_are_finite_and_non_negative() {
        let (transmittance, scattering) = luts();
        let sky = SkyLutBuilder::new(&transmittance, &scattering, &config())
            .unwrap()
            .build(0.3);

        let (min, max) = sky.lut().bounds();

        assert_eq!(uvec2(17, 16), sky.lut().size());
        assert_eq!(0.3, sky.sun_altitude());
        assert!(min.cmpge(Vec3::ZERO).all(), "min = {min}");
        assert!(max.is_finite(), "max = {max}");
        assert!(max.cmpgt(Vec3::ZERO).all(), "max = {max}");
    }

    #[test]
    fn radiance_is_symmetric_around_sun() {
        let (transmittance, scattering) = luts();
        let target =
            SkyLutBuilder::new(&transmittance, &scattering, &config())
                .unwrap();
        let lut = target.build(0.2);

        for y in 0..lut.lut().height() {
            for x in 0..lut.lut().width() {
                let a = lut.lut().get(uvec2(x, y));
                let b = lut.lut().get(uvec2(lut.lut().width() - 1 - x, y));

                for (a, b) in a.to_array().into_iter().zip(b.to_array()) {
                    assert_relative_eq!(
                        a,
                        b,
                        epsilon = 1e-6,
                        max_relative = 1e-3
                    );
                }
            }
        }
    }

    #[test]
    fn region_matches_full_table() {
        let (transmittance, scattering) = luts();
        let target =
            SkyLutBuilder::new(&transmittance, &scattering, &config())
                .unwrap();

        let full = target.build(0.5);
        let region = target.build_region(0.5, uvec2(3, 9), uvec2(4, 2));

        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(
                    full.lut().get(uvec2(3 + x, 9 + y)),
                    region.get(uvec2(x, y))
                );
            }
        }
    }

    #[test]
    fn sky_is_dark_when_sun_is_under_the_planet() {
        let (transmittance, scattering) = luts();
        let target =
            SkyLutBuilder::new(&transmittance, &scattering, &config())
                .unwrap();
        let sun_dir = SkyViewMapping::sun_dir(-0.5 * core::f32::consts::PI);

        let actual = target.eval_texel(vec2(0.5, 0.75), sun_dir);

        assert_relative_eq!(actual.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(actual.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(actual.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn daytime_sky_is_blue() {
        let (transmittance, scattering) = luts();
        let target =
            SkyLutBuilder::new(&transmittance, &scattering, &config())
                .unwrap();

        // Looking up, away from the sun
        let actual = target.eval(Vec3::Y, SkyViewMapping::sun_dir(0.8));

        assert!(actual.z > actual.y, "{actual}");
        assert!(actual.y > actual.x, "{actual}");
    }

    #[test]
    fn rejects_invalid_config() {
        let (transmittance, scattering) = luts();
        let config = config().with_sky(uvec2(17, 16), 0);

        assert!(matches!(
            SkyLutBuilder::new(&transmittance, &scattering, &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
