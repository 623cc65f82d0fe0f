use crate::utils::error::Result;
use std::io::Read;
use std::path::Path;

/// Resource lookup keyed by a relative name such as `assets/collection.anki2`.
pub trait AssetSource {
    /// Opens the resource for reading, or `None` when no such resource exists.
    fn open_resource(&self, key: &str) -> Option<Box<dyn Read + '_>>;
}

/// SQLite-compatible query surface handed out by a backend.
pub trait Database {
    fn query_scalar(&self, sql: &str) -> Result<i64>;
    fn execute(&self, sql: &str) -> Result<usize>;
    fn execute_batch(&self, sql: &str) -> Result<()>;
}

/// An opened backend. Dropping a handle must release everything it holds;
/// `close` does the same but reports failures.
pub trait Backend: Sized {
    fn open(path: &Path) -> Result<Self>;
    fn writable_database(&self) -> Result<Box<dyn Database + '_>>;
    fn close(self) -> Result<()>;
}
