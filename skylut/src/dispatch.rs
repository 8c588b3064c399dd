use glam::{uvec2, UVec2, Vec3};
use rayon::prelude::*;
use skylut_core::Lut;

/// Evaluates `f` for each texel of a `size`-sized table, spreading the work
/// across rayon's thread pool.
///
/// Texels are independent from each other, so the result doesn't depend on
/// the number of threads or the order in which they pick up the work.
pub fn dispatch<F>(size: UVec2, f: F) -> Lut
where
    F: Fn(UVec2) -> Vec3 + Sync,
{
    let texels = (0..size.x * size.y)
        .into_par_iter()
        .map(|idx| f(uvec2(idx % size.x, idx / size.x)))
        .collect();

    Lut::new(size, texels)
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn matches_sequential_evaluation() {
        let f = |pos: UVec2| vec3(pos.x as f32, pos.y as f32, 1.0);

        let expected = Lut::from_fn(uvec2(37, 5), f);
        let actual = dispatch(uvec2(37, 5), f);

        assert_eq!(expected, actual);
    }

    #[test]
    fn single_texel() {
        let actual = dispatch(uvec2(1, 1), |_| Vec3::ONE);

        assert_eq!(&[Vec3::ONE], actual.texels());
    }
}
