//! Reader and writer for W3D chunked model/animation containers.
//!
//! The crate decodes files into plain owned values and encodes them back, bit-exact. It knows
//! nothing about any host scene graph; integrations build their objects from these values.
//!
//! Every structured value implements [`Chunk`]: its `body_size` is computed before writing and
//! checked against the bytes actually produced, so nested chunk headers always describe their
//! bodies exactly. Unknown chunks are skipped by their declared size.

#![forbid(unsafe_code)]

mod animation;
mod bounding_box;
mod channel;
pub mod chunk;
mod compressed_animation;
pub mod delta;
mod error;
mod file;
mod hierarchy;
mod hlod;
mod math;
mod mesh;
mod reader;
mod version;
mod writer;

pub use animation::*;
pub use bounding_box::*;
pub use channel::*;
pub use chunk::{Chunk, ChunkHeader, FixedElement, decode_chunk, encode_chunk, read_chunks};
pub use compressed_animation::*;
pub use delta::{AdaptiveDeltaBlock, AdaptiveDeltaData, BitWidth, DeltaScaleTable};
pub use error::*;
pub use file::*;
pub use hierarchy::*;
pub use hlod::*;
pub use math::*;
pub use mesh::*;
pub use reader::*;
pub use version::*;
pub use writer::*;

#[cfg(test)]
mod codec_tests;




#[cfg(test)]
mod model_tests;

#[cfg(test)]
mod file_tests;
