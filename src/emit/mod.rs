//! Emission of discovered references into the build's artifact set.
//!
//! [`AssetEmitter`] walks the reference list once, skipping whatever the
//! [`HandledAssetRegistry`] already knows about, and hands everything else to a [`BuildHost`]
//! under a name produced by the [`naming`] conventions.

mod emitter;
mod host;
pub mod naming;
mod registry;

pub use emitter::{AssetEmitter, output_path_for};
pub use host::{BuildHost, DirectoryHost, MemoryHost};
pub use registry::HandledAssetRegistry;
