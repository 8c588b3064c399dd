use std::f32::consts::PI;

use glam::Vec3;
use skylut_core::spherical_direction;

/// Deterministic set of directions covering the whole sphere, used to
/// integrate the light scattered towards a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SphereSampling {
    /// `samples_sqrt²` directions laid out on a regular grid: uniform in
    /// azimuth and in the cosine of the polar angle.
    Stratified { samples_sqrt: u32 },

    /// Golden-ratio lattice (a spherical Fibonacci set).
    Lattice { samples: u32 },
}

impl SphereSampling {
    pub fn len(&self) -> usize {
        match *self {
            Self::Stratified { samples_sqrt } => {
                (samples_sqrt * samples_sqrt) as usize
            }
            Self::Lattice { samples } => samples as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the directions; each call yields the very same sequence.
    pub fn directions(&self) -> SphereDirections {
        SphereDirections {
            sampling: *self,
            idx: 0,
        }
    }

    fn direction(&self, idx: u32) -> Vec3 {
        match *self {
            Self::Stratified { samples_sqrt } => {
                let n = samples_sqrt as f32;
                let i = (idx / samples_sqrt) as f32;
                let j = (idx % samples_sqrt) as f32;

                let theta = 2.0 * PI * (i + 0.5) / n;
                let cos_phi = 1.0 - 2.0 * (j + 0.5) / n;

                spherical_direction(theta, cos_phi)
            }

            Self::Lattice { samples } => {
                // Computed in f64, since `idx * golden` quickly runs out of
                // fractional bits in f32
                let golden = (5.0f64.sqrt() - 1.0) / 2.0;
                let theta = (idx as f64 * golden).fract() as f32 * 2.0 * PI;
                let cos_phi =
                    2.0 * (idx as f32) / ((samples.max(2) - 1) as f32) - 1.0;

                spherical_direction(theta, cos_phi)
            }
        }
    }
}

/// Iterator returned from [`SphereSampling::directions()`].
#[derive(Clone, Debug)]
pub struct SphereDirections {
    sampling: SphereSampling,
    idx: u32,
}

impl Iterator for SphereDirections {
    type Item = Vec3;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx as usize >= self.sampling.len() {
            return None;
        }

        let dir = self.sampling.direction(self.idx);

        self.idx += 1;

        Some(dir)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.sampling.len() - self.idx as usize;

        (len, Some(len))
    }
}

impl ExactSizeIterator for SphereDirections {
    //
}
