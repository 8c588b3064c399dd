use derivative::Derivative;
use glam::{uvec2, vec2, UVec2, Vec2, Vec3};

/// Dense, row-major grid of RGB texels.
///
/// Texel `(x, y)` lives at index `y * width + x`; `x` follows the `u`
/// coordinate and `y` follows `v`.
#[derive(Clone, Derivative, PartialEq)]
#[derivative(Debug)]
pub struct Lut {
    size: UVec2,
    #[derivative(Debug = "ignore")]
    texels: Vec<Vec3>,
}

impl Lut {
    pub fn new(size: UVec2, texels: Vec<Vec3>) -> Self {
        assert!(size.x > 0);
        assert!(size.y > 0);
        assert_eq!((size.x * size.y) as usize, texels.len());

        Self { size, texels }
    }

    pub fn from_fn(size: UVec2, mut f: impl FnMut(UVec2) -> Vec3) -> Self {
        let texels = (0..size.y)
            .flat_map(|y| (0..size.x).map(move |x| uvec2(x, y)))
            .map(&mut f)
            .collect();

        Self::new(size, texels)
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn texels(&self) -> &[Vec3] {
        &self.texels
    }

    pub fn get(&self, pos: UVec2) -> Vec3 {
        self.texels[self.index(pos)]
    }

    pub fn index(&self, pos: UVec2) -> usize {
        assert!(pos.x < self.size.x && pos.y < self.size.y);

        (pos.y * self.size.x + pos.x) as usize
    }

    /// Returns coordinates of given texel in the domain used by the builders,
    /// where the first and the last texel lie exactly on `0.0` and `1.0`.
    pub fn grid_uv(size: UVec2, pos: UVec2) -> Vec2 {
        let max = (size.max(UVec2::splat(2)) - 1).as_vec2();

        pos.as_vec2() / max
    }

    /// Returns coordinates of given texel's center, as seen by
    /// [`Self::sample()`].
    pub fn texel_center_uv(&self, pos: UVec2) -> Vec2 {
        (pos.as_vec2() + 0.5) / self.size.as_vec2()
    }

    /// Samples this table with bilinear filtering.
    ///
    /// Coordinates outside of `0.0..=1.0` are clamped to the edge texels;
    /// the table never wraps around.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let coord = uv * self.size.as_vec2() - 0.5;
        let p0 = coord.floor();
        let t = coord - p0;

        let max = self.size.as_ivec2() - 1;
        let p0 = p0.as_ivec2();

        let x0 = p0.x.clamp(0, max.x) as u32;
        let x1 = (p0.x + 1).clamp(0, max.x) as u32;
        let y0 = p0.y.clamp(0, max.y) as u32;
        let y1 = (p0.y + 1).clamp(0, max.y) as u32;

        let s00 = self.get(uvec2(x0, y0));
        let s10 = self.get(uvec2(x1, y0));
        let s01 = self.get(uvec2(x0, y1));
        let s11 = self.get(uvec2(x1, y1));

        let weights = vec2(1.0 - t.x, t.x);

        (s00 * weights.x + s10 * weights.y) * (1.0 - t.y)
            + (s01 * weights.x + s11 * weights.y) * t.y
    }

    /// Returns the component-wise minimum and maximum of all texels.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.texels.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), texel| (min.min(*texel), max.max(*texel)),
        )
    }
}
