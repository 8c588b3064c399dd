use std::path::Path;

use derivative::Derivative;
use glam::{uvec2, UVec2, Vec4};
use skylut_core::{Lut, ScatteringLut, TransmittanceLut};

use super::binary::{encoded_len, write_bytes};
use crate::{Error, Result};

/// RGBA texture packing several tables together, so that the renderer can
/// bind all of them as a single resource.
///
/// Texels that don't belong to any table are left zeroed; texels of placed
/// tables have their alpha set to one.
#[derive(Clone, Derivative, PartialEq)]
#[derivative(Debug)]
pub struct Atlas {
    size: UVec2,
    #[derivative(Debug = "ignore")]
    texels: Vec<Vec4>,
}

impl Atlas {
    pub const SIZE: UVec2 = UVec2::new(256, 256);

    /// Rows above this one are reserved for tables provided by the renderer
    /// (color temperature, water absorption and water scattering).
    pub const TRANSMITTANCE_ORIGIN: UVec2 = UVec2::new(0, 3);

    pub const SCATTERING_ORIGIN: UVec2 = UVec2::new(
        0,
        Self::TRANSMITTANCE_ORIGIN.y + TransmittanceLut::RESOLUTION.y,
    );

    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            texels: vec![Vec4::ZERO; (size.x * size.y) as usize],
        }
    }

    /// Returns the atlas used by the renderer, with transmittance and
    /// scattering placed at their well-known positions.
    pub fn standard(
        transmittance: &TransmittanceLut,
        scattering: &ScatteringLut,
    ) -> Result<Self> {
        let mut this = Self::new(Self::SIZE);

        this.put(Self::TRANSMITTANCE_ORIGIN, transmittance.lut())?;
        this.put(Self::SCATTERING_ORIGIN, scattering.lut())?;

        Ok(this)
    }

    /// Copies given table into the atlas, with its texel `(0, 0)` landing at
    /// `origin`.
    pub fn put(&mut self, origin: UVec2, lut: &Lut) -> Result<()> {
        let end = origin + lut.size();

        if end.cmpgt(self.size).any() {
            return Err(Error::OutOfBounds {
                origin,
                size: lut.size(),
                bounds: self.size,
            });
        }

        for y in 0..lut.height() {
            for x in 0..lut.width() {
                let pos = uvec2(x, y);
                let idx = self.index(origin + pos);

                self.texels[idx] = lut.get(pos).extend(1.0);
            }
        }

        Ok(())
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn texels(&self) -> &[Vec4] {
        &self.texels
    }

    pub fn get(&self, pos: UVec2) -> Vec4 {
        self.texels[self.index(pos)]
    }

    fn index(&self, pos: UVec2) -> usize {
        assert!(pos.x < self.size.x && pos.y < self.size.y);

        (pos.y * self.size.x + pos.x) as usize
    }

    /// Returns the color channels, e.g. for previewing.
    pub fn rgb(&self) -> Lut {
        Lut::from_fn(self.size, |pos| self.get(pos).truncate())
    }

    /// Encodes the atlas the same way as [`super::encode_lut()`], just with
    /// four channels per texel.
    pub fn encode(&self) -> Vec<u8> {
        let bytes: Vec<u8> = bytemuck::cast_slice(&self.texels).to_vec();

        debug_assert_eq!(encoded_len(self.size, 4), bytes.len());

        bytes
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        write_bytes(path.as_ref(), &self.encode())
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec4, Vec3};

    use super::*;

    fn luts() -> (TransmittanceLut, ScatteringLut) {
        let atmosphere = Default::default();

        let transmittance = TransmittanceLut::new(
            atmosphere,
            Lut::from_fn(TransmittanceLut::RESOLUTION, |pos| {
                Vec3::splat(pos.x as f32)
            }),
        );

        let scattering = ScatteringLut::new(
            atmosphere,
            Lut::from_fn(ScatteringLut::RESOLUTION, |pos| {
                Vec3::splat(-(pos.y as f32))
            }),
        );

        (transmittance, scattering)
    }

    #[test]
    fn standard_layout() {
        let (transmittance, scattering) = luts();
        let target = Atlas::standard(&transmittance, &scattering).unwrap();

        assert_eq!(uvec2(0, 67), Atlas::SCATTERING_ORIGIN);

        // Reserved rows
        for y in 0..3 {
            for x in 0..256 {
                assert_eq!(Vec4::ZERO, target.get(uvec2(x, y)));
            }
        }

        // Transmittance
        assert_eq!(vec4(0.0, 0.0, 0.0, 1.0), target.get(uvec2(0, 3)));
        assert_eq!(vec4(255.0, 255.0, 255.0, 1.0), target.get(uvec2(255, 66)));

        // Scattering
        assert_eq!(vec4(0.0, 0.0, 0.0, 1.0), target.get(uvec2(0, 67)));
        assert_eq!(vec4(-31.0, -31.0, -31.0, 1.0), target.get(uvec2(31, 98)));

        // Leftovers
        assert_eq!(Vec4::ZERO, target.get(uvec2(32, 67)));
        assert_eq!(Vec4::ZERO, target.get(uvec2(0, 99)));
        assert_eq!(Vec4::ZERO, target.get(uvec2(255, 255)));
    }

    #[test]
    fn put_out_of_bounds() {
        let mut target = Atlas::new(uvec2(8, 8));
        let lut = Lut::new(uvec2(4, 4), vec![Vec3::ONE; 16]);

        target.put(uvec2(4, 4), &lut).unwrap();

        assert!(matches!(
            target.put(uvec2(5, 0), &lut),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn encode() {
        let (transmittance, scattering) = luts();
        let target = Atlas::standard(&transmittance, &scattering).unwrap();
        let bytes = target.encode();

        assert_eq!(256 * 256 * 4 * 4, bytes.len());

        // Alpha of texel (0, 3)
        let offset = 3 * 256 * 16 + 12;

        assert_eq!(&1.0f32.to_ne_bytes(), &bytes[offset..offset + 4]);
    }

    #[test]
    fn write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let target = Atlas::new(uvec2(2, 2));

        target.write(&path).unwrap();

        assert_eq!(64, std::fs::metadata(&path).unwrap().len());
        assert_eq!(uvec2(2, 2), target.rgb().size());
    }
}
