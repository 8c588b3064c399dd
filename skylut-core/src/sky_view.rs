use core::f32::consts::PI;

use glam::{vec2, vec3, Vec2, Vec3};

use crate::{AtmosphereParameters, F32Ext};

/// Mapping between the sky-view table's coordinates and view directions.
///
/// The table is rendered from a fixed viewpoint just above the ground, with
/// the sun placed at azimuth zero. Altitude is stored non-linearly, so that
/// more texels end up near the horizon, where the sky changes the fastest;
/// `v = 0.5` always maps onto the visible horizon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyViewMapping {
    view_pos: Vec3,
    horizon_angle: f32,
}

impl SkyViewMapping {
    /// Height of the observer above the ground, in mega-meters.
    ///
    /// This is a constant because the sky doesn't change that much when the
    /// camera is moving (unless one's travelling in a spaceship).
    pub const VIEW_HEIGHT_MM: f32 = 0.0002;

    pub fn new(atmosphere: &AtmosphereParameters) -> Self {
        let view_pos =
            vec3(0.0, atmosphere.ground_radius + Self::VIEW_HEIGHT_MM, 0.0);
        let height = view_pos.length();

        let horizon_angle = {
            let t = height.sqr() - atmosphere.ground_radius.sqr();
            let t = t.max(0.0).sqrt() / height;

            t.clamp(-1.0, 1.0).acos() - 0.5 * PI
        };

        Self {
            view_pos,
            horizon_angle,
        }
    }

    pub fn view_pos(&self) -> Vec3 {
        self.view_pos
    }

    /// Angle between the horizontal plane and the visible horizon; negative,
    /// since the observer is above the ground.
    pub fn horizon_angle(&self) -> f32 {
        self.horizon_angle
    }

    /// Returns `(azimuth, altitude)` stored at given coordinates.
    pub fn decode(&self, uv: Vec2) -> (f32, f32) {
        let azimuth = (uv.x - 0.5) * 2.0 * PI;

        let v = if uv.y < 0.5 {
            -(1.0 - 2.0 * uv.y).sqr()
        } else {
            (uv.y * 2.0 - 1.0).sqr()
        };

        (azimuth, v * 0.5 * PI + self.horizon_angle)
    }

    /// Inverse of [`Self::decode()`].
    pub fn encode(&self, azimuth: f32, altitude: f32) -> Vec2 {
        let v =
            ((altitude - self.horizon_angle) / (0.5 * PI)).clamp(-1.0, 1.0);
        let v = 0.5 + 0.5 * v.abs().sqrt().copysign(v);

        vec2((azimuth / (2.0 * PI) + 0.5).saturate(), v.saturate())
    }

    /// Returns direction of a ray looking at given azimuth and altitude.
    pub fn ray_dir(azimuth: f32, altitude: f32) -> Vec3 {
        let cos_altitude = altitude.cos();

        vec3(
            cos_altitude * azimuth.sin(),
            altitude.sin(),
            -cos_altitude * azimuth.cos(),
        )
    }

    /// Returns direction towards the sun placed at azimuth zero and given
    /// altitude.
    pub fn sun_dir(altitude: f32) -> Vec3 {
        Self::ray_dir(0.0, altitude)
    }

    /// Returns coordinates at which the table stores radiance coming from
    /// `ray_dir`, when the sun shines from `sun_dir`.
    ///
    /// Only the sun's azimuth is taken into account here; the table itself
    /// must have been generated for the sun's altitude.
    pub fn encode_dir(&self, ray_dir: Vec3, sun_dir: Vec3) -> Vec2 {
        let ray_dir = ray_dir.normalize();
        let altitude = ray_dir.y.clamp(-1.0, 1.0).asin();

        let azimuth = if ray_dir.x == 0.0 && ray_dir.z == 0.0 {
            0.0
        } else {
            let ray_azimuth = ray_dir.x.atan2(-ray_dir.z);

            let sun_azimuth = if sun_dir.x == 0.0 && sun_dir.z == 0.0 {
                0.0
            } else {
                sun_dir.x.atan2(-sun_dir.z)
            };

            wrap_angle(ray_azimuth - sun_azimuth)
        };

        self.encode(azimuth, altitude)
    }
}

/// Wraps given angle into `-PI..=PI`.
fn wrap_angle(angle: f32) -> f32 {
    let angle = (angle + PI).rem_euclid(2.0 * PI) - PI;

    if angle < -PI {
        angle + 2.0 * PI
    } else {
        angle
    }
}
