#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod emit;
pub mod error;
pub mod locator;
pub mod manifest;
pub mod models;
pub mod plugin;

pub use config::PluginConfigFile;
pub use emit::{AssetEmitter, BuildHost, DirectoryHost, HandledAssetRegistry, MemoryHost};
pub use error::{AssetError, AssetErrorKind, ConfigError, ScanError};
pub use locator::{AssetLocator, ReferenceRule, ReferenceSource, StaticReferences};
pub use manifest::AssetManifest;
pub use models::{PassReport, ResolvedAsset};
pub use plugin::{AssetPass, PluginOptions, TemplateAssetPlugin};
