//! Atmosphere model, geometry and lookup-table storage shared by the LUT
//! builders and by renderers sampling the baked tables.
//!
//! Thanks to:
//!
//! - https://www.shadertoy.com/view/slSXRW
//!   (Production Sky Rendering by AndrewHelmer)
//!
//! - https://github.com/sebh/UnrealEngineSkyAtmosphere

#![allow(clippy::manual_range_contains)]

mod atmosphere;
mod lut;
mod luts;
mod phase;
mod ray;
mod sky_view;
mod utils;

pub use self::atmosphere::*;
pub use self::lut::*;
pub use self::luts::*;
pub use self::phase::*;
pub use self::ray::*;
pub use self::sky_view::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;

    pub use crate::*;
}
