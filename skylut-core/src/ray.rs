use glam::{vec3, Vec3};

/// Ray in a frame centered at the planet's center.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Returns distance to the nearest forward intersection with a sphere of
    /// given radius, centered at the origin of the frame.
    ///
    /// When the ray starts inside the sphere, the exit point is returned; when
    /// it starts exactly on the sphere, the distance is zero.
    pub fn intersect_sphere(&self, radius: f32) -> Option<f32> {
        let b = self.origin.dot(self.direction);
        let c = self.origin.dot(self.origin) - radius * radius;

        if c == 0.0 {
            return Some(0.0);
        }

        if c > 0.0 && b > 0.0 {
            return None;
        }

        let discr = b * b - c;

        if discr < 0.0 {
            None
        } else if discr > b * b {
            Some(-b + discr.sqrt())
        } else {
            Some(-b - discr.sqrt())
        }
    }

    /// Returns whether this ray hits the sphere at a positive distance.
    pub fn hits_sphere(&self, radius: f32) -> bool {
        self.intersect_sphere(radius).map_or(false, |t| t > 0.0)
    }
}

/// Builds a unit vector from an azimuth `theta` (around the up axis) and the
/// cosine of a polar angle `phi` (measured from the up axis).
pub fn spherical_direction(theta: f32, cos_phi: f32) -> Vec3 {
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    let cos_theta = theta.cos();
    let sin_theta = theta.sin();

    vec3(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
}
