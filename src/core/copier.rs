use crate::core::{CopyStats, RetryPolicy};
use crate::utils::error::{FixtureError, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

fn file_name_of(destination: &Path) -> String {
    destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| destination.display().to_string())
}

fn write_to_file_once<R: Read + ?Sized>(source: &mut R, destination: &Path) -> Result<CopyStats> {
    let copy = |source: &mut R| -> std::io::Result<CopyStats> {
        let file = File::create(destination)?;
        let start = Instant::now();
        let mut writer = BufWriter::new(file);
        let bytes = std::io::copy(source, &mut writer)?;
        writer.flush()?;
        Ok(CopyStats::new(bytes, start.elapsed()))
    };

    let stats = copy(source).map_err(|source| FixtureError::CopyFailed {
        file_name: file_name_of(destination),
        source,
    })?;

    tracing::debug!(
        "Copied {}KB to {} in {}s ({}KB/s)",
        stats.bytes / 1024,
        destination.display(),
        stats.elapsed.as_secs(),
        stats.speed_kb_per_sec
    );
    Ok(stats)
}

/// Copies `source` into `destination` using the default retry policy.
///
/// The source is borrowed, not consumed: closing it stays with the caller.
pub fn write_to_file<R: Read + ?Sized>(source: &mut R, destination: &Path) -> Result<CopyStats> {
    write_to_file_with(source, destination, &RetryPolicy::default())
}

/// Copies `source` into `destination`, retrying failed attempts.
///
/// A failed attempt may leave a partial file behind; the next attempt truncates
/// it. Retries resume from wherever the source's read position was left.
/// After the last attempt the error is returned prefixed with the file name.
pub fn write_to_file_with<R: Read + ?Sized>(
    source: &mut R,
    destination: &Path,
    policy: &RetryPolicy,
) -> Result<CopyStats> {
    let attempts = policy.effective_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match write_to_file_once(source, destination) {
            Ok(stats) => return Ok(stats),
            Err(e) if attempt >= attempts || !e.is_retryable() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    "Copy attempt {}/{} failed: {}; retrying in {:?}",
                    attempt,
                    attempts,
                    e,
                    policy.delay
                );
                std::thread::sleep(policy.delay);
            }
        }
    }
}
