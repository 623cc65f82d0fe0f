#![allow(dead_code)]

use rusqlite::Connection;
use std::io::{self, Read};
use std::path::Path;
use tempfile::TempDir;

pub const COLLECTION: &str = "initial_version_2_12_1.anki2";

/// A resource root holding `assets/<COLLECTION>`, a SQLite file with
/// `revlog_rows` rows in its revlog table.
pub fn asset_root_with_collection(revlog_rows: usize) -> TempDir {
    let root = TempDir::new().unwrap();
    let assets = root.path().join("assets");
    std::fs::create_dir(&assets).unwrap();
    write_collection(&assets.join(COLLECTION), revlog_rows);
    root
}

pub fn write_collection(path: &Path, revlog_rows: usize) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "create table col (id integer primary key, crt integer not null);
         create table revlog (id integer primary key, cid integer not null, ease integer not null);
         insert into col (crt) values (1600000000);",
    )
    .unwrap();
    for i in 0..revlog_rows {
        conn.execute(
            "insert into revlog (cid, ease) values (?1, ?2)",
            [i as i64, (i % 4 + 1) as i64],
        )
        .unwrap();
    }
}

/// Fails the first `failures` reads, then reads normally.
pub struct FlakyReader<R> {
    inner: R,
    failures_left: usize,
    pub failed_reads: usize,
}

impl<R> FlakyReader<R> {
    pub fn new(inner: R, failures: usize) -> Self {
        Self {
            inner,
            failures_left: failures,
            failed_reads: 0,
        }
    }
}

impl<R: Read> Read for FlakyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            self.failed_reads += 1;
            return Err(io::Error::new(io::ErrorKind::Other, "transient read failure"));
        }
        self.inner.read(buf)
    }
}
