use std::io;
use std::path::PathBuf;

use glam::UVec2;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error(
        "expected {expected} bytes for a {size} table with {channels} \
         channels, got {actual}"
    )]
    SizeMismatch {
        size: UVec2,
        channels: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "{size} table placed at {origin} doesn't fit within {bounds} atlas"
    )]
    OutOfBounds {
        origin: UVec2,
        size: UVec2,
        bounds: UVec2,
    },

    #[error("couldn't access `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't encode `{path}`")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
