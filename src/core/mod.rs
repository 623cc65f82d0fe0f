pub mod copier;
pub mod probe;
pub mod stager;

pub use crate::domain::model::{CopyStats, ProbeKind, ProbeReport, RetryPolicy};
pub use crate::domain::ports::{AssetSource, Backend, Database};
pub use crate::utils::error::Result;
