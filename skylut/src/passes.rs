mod scattering;
mod sky;
mod sun_color;
mod transmittance;

pub use self::scattering::*;
pub use self::sky::*;
pub use self::sun_color::*;
pub use self::transmittance::*;

/// Returns the distance of `step`-th sample along a ray marched over
/// `0..t_max`; samples are biased towards the beginning of each segment.
fn sample_distance(step: u32, steps: u32, t_max: f32) -> f32 {
    ((step as f32 + 0.3) / steps as f32) * t_max
}
