pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TestkitConfig;

pub use crate::adapters::{DirAssets, MemoryAssets, SqliteBackend, SupportOpenHelper};
pub use crate::core::copier::{write_to_file, write_to_file_with};
pub use crate::core::probe::{LeakProbe, ProbeSettings};
pub use crate::core::stager::FixtureStager;
pub use crate::core::{AssetSource, Backend, CopyStats, Database, ProbeKind, ProbeReport, RetryPolicy};
pub use crate::utils::error::{FixtureError, Result};
