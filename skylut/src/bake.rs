use skylut_core::{
    AtmosphereParameters, ScatteringLut, SkyLut, SunColorLut, TransmittanceLut,
};

use crate::utils::{format_duration, measure};
use crate::{
    Atlas, LutConfig, Result, ScatteringLutBuilder, SkyLutBuilder,
    SunColorLutBuilder, TransmittanceLutBuilder,
};

/// Tables that get shipped alongside the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyLuts {
    pub transmittance: TransmittanceLut,
    pub scattering: ScatteringLut,
    pub sun_color: SunColorLut,
}

impl SkyLuts {
    /// Runs all of the passes, in order.
    pub fn bake(
        atmosphere: &AtmosphereParameters,
        config: &LutConfig,
    ) -> Result<Self> {
        config.validate()?;

        log::info!("Baking sky LUTs");

        let (transmittance, tt_transmittance) = measure(|| {
            TransmittanceLutBuilder::new(atmosphere, config)
                .map(|builder| builder.build())
        });

        let transmittance = transmittance?;

        log::info!(
            "Transmittance LUT baked; resolution = {}, tt = {}",
            transmittance.lut().size(),
            format_duration(tt_transmittance),
        );

        let (scattering, tt_scattering) = measure(|| {
            ScatteringLutBuilder::new(&transmittance, config)
                .map(|builder| builder.build())
        });

        let scattering = scattering?;

        log::info!(
            "Scattering LUT baked; resolution = {}, tt = {}",
            scattering.lut().size(),
            format_duration(tt_scattering),
        );

        let (sun_color, tt_sun_color) = measure(|| -> Result<_> {
            let sky = SkyLutBuilder::new(&transmittance, &scattering, config)?;

            Ok(SunColorLutBuilder::new(&sky, config)?.build())
        });

        let sun_color = sun_color?;

        log::info!(
            "Sun-color LUT baked; resolution = {}, tt = {}",
            sun_color.lut().size(),
            format_duration(tt_sun_color),
        );

        Ok(Self {
            transmittance,
            scattering,
            sun_color,
        })
    }

    /// Builds the sky-view table for given altitude of the sun, in radians.
    pub fn sky(
        &self,
        config: &LutConfig,
        sun_altitude: f32,
    ) -> Result<SkyLut> {
        let (sky, tt) = measure(|| {
            SkyLutBuilder::new(&self.transmittance, &self.scattering, config)
                .map(|builder| builder.build(sun_altitude))
        });

        let sky = sky?;

        log::info!(
            "Sky LUT baked; resolution = {}, sun-altitude = {}, tt = {}",
            sky.lut().size(),
            sun_altitude,
            format_duration(tt),
        );

        Ok(sky)
    }

    /// Packs transmittance and scattering into the layout expected by the
    /// renderer's data texture.
    pub fn atlas(&self) -> Result<Atlas> {
        Atlas::standard(&self.transmittance, &self.scattering)
    }
}
