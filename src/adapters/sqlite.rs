//! SQLite file backend and the database adapter layered over it.

use crate::core::{Backend, Database};
use crate::utils::error::{FixtureError, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// A handle on one SQLite database file. The connection is released when the
/// handle is closed or dropped.
#[derive(Debug)]
pub struct SqliteBackend {
    conn: Connection,
    path: PathBuf,
}

impl SqliteBackend {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Backend for SqliteBackend {
    fn open(path: &Path) -> Result<Self> {
        // no SQLITE_OPEN_CREATE: opening a path that was never staged is an error
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::trace!("Opened backend {}", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    fn writable_database(&self) -> Result<Box<dyn Database + '_>> {
        Ok(Box::new(SupportOpenHelper::new(self).writable_database()))
    }

    fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| FixtureError::BackendError(e))?;
        tracing::trace!("Closed backend {}", path.display());
        Ok(())
    }
}

/// Hands out database adapters for a borrowed backend.
pub struct SupportOpenHelper<'a> {
    backend: &'a SqliteBackend,
}

impl<'a> SupportOpenHelper<'a> {
    pub fn new(backend: &'a SqliteBackend) -> Self {
        Self { backend }
    }

    pub fn writable_database(&self) -> SupportDatabase<'a> {
        SupportDatabase {
            conn: &self.backend.conn,
        }
    }
}

pub struct SupportDatabase<'a> {
    conn: &'a Connection,
}

impl Database for SupportDatabase<'_> {
    fn query_scalar(&self, sql: &str) -> Result<i64> {
        let value = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(value)
    }

    fn execute(&self, sql: &str) -> Result<usize> {
        Ok(self.conn.execute(sql, [])?)
    }

    fn execute_batch(&self, sql: &str) -> Result<()> {
        Ok(self.conn.execute_batch(sql)?)
    }
}
