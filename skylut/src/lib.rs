//! Bakes the sky lookup tables (transmittance, multiple scattering, sky-view
//! and sun color) on the CPU and encodes them into formats that renderers
//! can upload.
//!
//! ```no_run
//! use skylut::{AtmosphereParameters, LutConfig, SkyLuts};
//!
//! let config = LutConfig::default();
//! let luts = SkyLuts::bake(&AtmosphereParameters::EARTH, &config)?;
//!
//! skylut::write_lut("transmittance.bin", luts.transmittance.lut())?;
//! # Ok::<(), skylut::Error>(())
//! ```

mod bake;
mod config;
mod dispatch;
mod encoding;
mod error;
mod passes;
mod sphere_sampling;
mod utils;

pub use skylut_core::{
    AtmosphereParameters, Lut, ScatteringLut, SkyLut, SkyViewMapping,
    SunColorLut, TransmittanceLut,
};

pub use self::bake::*;
pub use self::config::*;
pub use self::encoding::*;
pub use self::error::*;
pub use self::passes::*;
pub use self::sphere_sampling::*;

pub mod prelude {
    pub use skylut_core::prelude::*;

    pub use crate::{
        Atlas, Error, LutConfig, Result, ScatteringLutBuilder, SkyLutBuilder,
        SkyLuts, SphereSampling, SunColorLutBuilder, SunColorSampling,
        TransmittanceLutBuilder,
    };
}
