#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod export;
pub mod materials;
pub mod models;
pub mod project;
pub mod publish;
pub mod scene;
pub mod setdress;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use project::PublishLayout;
pub use publish::{AssetResolver, LocatorPolicy};
pub use scene::{MemoryNode, ParmValue, SceneNode};
pub use setdress::SetDressImporter;
