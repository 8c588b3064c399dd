use core::f32::consts::PI;

/// Anisotropy of the Mie phase function.
pub const MIE_ANISOTROPY: f32 = 0.8;

/// Cornette-Shanks phase function, used for aerosols.
pub fn mie_phase(cos_theta: f32) -> f32 {
    const G: f32 = MIE_ANISOTROPY;
    const SCALE: f32 = 3.0 / (8.0 * PI);

    let num = (1.0 - G * G) * (1.0 + cos_theta * cos_theta);
    let denom = (2.0 + G * G) * (1.0 + G * G - 2.0 * G * cos_theta).powf(1.5);

    SCALE * num / denom
}

pub fn rayleigh_phase(cos_theta: f32) -> f32 {
    const K: f32 = 3.0 / (16.0 * PI);

    K * (1.0 + cos_theta * cos_theta)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Integrates given phase function over the whole sphere.
    fn integrate(phase: fn(f32) -> f32) -> f32 {
        const STEPS: usize = 10_000;

        let d_cos = 2.0 / STEPS as f32;

        (0..STEPS)
            .map(|i| {
                let cos_theta = -1.0 + (i as f32 + 0.5) * d_cos;

                2.0 * PI * phase(cos_theta) * d_cos
            })
            .sum()
    }

    #[test]
    fn rayleigh_is_normalized() {
        assert_relative_eq!(integrate(rayleigh_phase), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn mie_is_normalized() {
        assert_relative_eq!(integrate(mie_phase), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn mie_is_forward_peaked() {
        assert!(mie_phase(1.0) > 10.0 * mie_phase(0.0));
        assert!(mie_phase(0.0) > mie_phase(-1.0));
    }

    #[test]
    fn rayleigh_is_symmetric() {
        assert_relative_eq!(rayleigh_phase(0.7), rayleigh_phase(-0.7));
        assert_relative_eq!(rayleigh_phase(1.0), 2.0 * rayleigh_phase(0.0));
    }
}
