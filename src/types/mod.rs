//! Plain value types used by descriptors and backends.

mod common;
mod texture;

pub use common::Extent2d;
pub use texture::TextureFormat;
