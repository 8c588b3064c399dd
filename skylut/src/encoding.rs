mod atlas;
mod binary;
mod preview;

pub use self::atlas::*;
pub use self::binary::*;
pub use self::preview::*;
