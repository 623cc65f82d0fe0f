// Adapters layer: concrete asset sources and database backends.

pub mod assets;
pub mod sqlite;

pub use assets::{DirAssets, MemoryAssets};
pub use sqlite::{SqliteBackend, SupportDatabase, SupportOpenHelper};
