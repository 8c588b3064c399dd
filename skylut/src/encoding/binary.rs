//! Raw, header-less encoding of the tables.
//!
//! Texels are stored as native-endian `f32`s, row by row (from `v = 0` up),
//! with channels interleaved; this is the layout that can be uploaded as a
//! texture straight away.

use std::fs;
use std::path::Path;

use glam::{UVec2, Vec3};
use skylut_core::Lut;

use crate::{Error, Result};

/// Returns the number of bytes occupied by a `size`-sized table with given
/// number of `f32` channels.
pub fn encoded_len(size: UVec2, channels: usize) -> usize {
    (size.x as usize) * (size.y as usize) * channels * 4
}

pub fn encode_lut(lut: &Lut) -> Vec<u8> {
    bytemuck::cast_slice(lut.texels()).to_vec()
}

/// Decodes a table previously encoded with [`encode_lut()`]; `size` must be
/// provided by the caller, since the encoding doesn't carry it.
pub fn decode_lut(size: UVec2, bytes: &[u8]) -> Result<Lut> {
    let expected = encoded_len(size, 3);

    if size.min_element() == 0 || bytes.len() != expected {
        return Err(Error::SizeMismatch {
            size,
            channels: 3,
            expected,
            actual: bytes.len(),
        });
    }

    let texels = bytes
        .chunks_exact(std::mem::size_of::<Vec3>())
        .map(bytemuck::pod_read_unaligned)
        .collect();

    Ok(Lut::new(size, texels))
}

pub fn write_lut(path: impl AsRef<Path>, lut: &Lut) -> Result<()> {
    write_bytes(path.as_ref(), &encode_lut(lut))
}

pub fn read_lut(path: impl AsRef<Path>, size: UVec2) -> Result<Lut> {
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;

    decode_lut(size, &bytes)
}

pub(crate) fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    log::debug!("Writing `{}` ({} bytes)", path.display(), bytes.len());

    fs::write(path, bytes).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, vec3};

    use super::*;
    use crate::TransmittanceLut;

    fn target() -> Lut {
        Lut::from_fn(uvec2(3, 2), |pos| {
            vec3(pos.x as f32, pos.y as f32, 0.25 * (pos.x + pos.y) as f32)
        })
    }

    #[test]
    fn transmittance_size() {
        let lut = Lut::new(
            TransmittanceLut::RESOLUTION,
            vec![Vec3::ONE; 256 * 64],
        );

        assert_eq!(196_608, encode_lut(&lut).len());
        assert_eq!(196_608, encoded_len(TransmittanceLut::RESOLUTION, 3));
    }

    #[test]
    fn layout() {
        let bytes = encode_lut(&target());
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned)
            .collect();

        // Texel (1, 0), then texel (0, 1)
        assert_eq!(&[1.0f32, 0.0, 0.25], &floats[3..6]);
        assert_eq!(&[0.0f32, 1.0, 0.25], &floats[9..12]);
        assert_eq!(&1.0f32.to_ne_bytes(), &bytes[12..16]);
    }

    #[test]
    fn decode() {
        let lut = target();

        assert_eq!(lut, decode_lut(lut.size(), &encode_lut(&lut)).unwrap());
    }

    #[test]
    fn decode_rejects_size_mismatch() {
        let bytes = encode_lut(&target());

        let err = decode_lut(uvec2(3, 3), &bytes).unwrap_err();

        assert!(matches!(
            err,
            Error::SizeMismatch {
                expected: 108,
                actual: 72,
                ..
            }
        ));

        let err = decode_lut(uvec2(3, 2), &bytes[1..]).unwrap_err();

        assert!(matches!(err, Error::SizeMismatch { actual: 71, .. }));

        let err = decode_lut(uvec2(0, 2), &[]).unwrap_err();

        assert!(matches!(err, Error::SizeMismatch { .. }));
    }

    #[test]
    fn write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lut.bin");
        let lut = target();

        write_lut(&path, &lut).unwrap();

        assert_eq!(72, fs::metadata(&path).unwrap().len());
        assert_eq!(lut, read_lut(&path, lut.size()).unwrap());
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let err = read_lut(&path, uvec2(1, 1)).unwrap_err();

        assert!(matches!(err, Error::Io { path: p, .. } if p == path));
    }
}
