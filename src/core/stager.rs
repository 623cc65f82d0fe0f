//! Staging of bundled test assets into per-test scratch directories.
//!
//! Bundled assets are not guaranteed to live on the file system (they may be
//! embedded, or packed in an archive), so anything that needs a real path to
//! open them, such as a database backend, works on a staged copy.

use crate::core::copier::write_to_file_with;
use crate::core::{AssetSource, CopyStats, RetryPolicy};
use crate::utils::error::{FixtureError, Result};
use crate::utils::validation::validate_asset_name;
use std::fs;
use std::path::{Path, PathBuf};

pub const ASSET_PREFIX: &str = "assets/";
const TEST_DIR_STEM: &str = "testfiles";

pub struct FixtureStager<A: AssetSource> {
    assets: A,
    cache_dir: PathBuf,
    retry: RetryPolicy,
}

impl<A: AssetSource> FixtureStager<A> {
    pub fn new(assets: A, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets,
            cache_dir: cache_dir.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Returns `<cache>/testfiles[-name]`, created if missing and emptied of
    /// whatever an earlier call left in it. A non-empty `name` must be a plain
    /// file name, so the directory always stays inside the cache.
    pub fn test_dir(&self, name: &str) -> Result<PathBuf> {
        let dir_name = if name.is_empty() {
            TEST_DIR_STEM.to_string()
        } else {
            validate_asset_name(name)?;
            format!("{}-{}", TEST_DIR_STEM, name)
        };
        let dir = self.cache_dir.join(dir_name);

        let scratch_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| FixtureError::ScratchDirError { path, source }
        };

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(scratch_err(&dir))?;
        }

        for entry in fs::read_dir(&dir).map_err(scratch_err(&dir))? {
            let path = entry.map_err(scratch_err(&dir))?.path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(scratch_err(&path))?;
        }

        Ok(dir)
    }

    /// Copies `assets/<name>` into its scratch directory and returns the
    /// absolute path of the copy.
    #[must_use = "the staged path is the only handle on the copied fixture"]
    pub fn test_file_path(&self, name: &str) -> Result<PathBuf> {
        self.stage(name).map(|(path, _)| path)
    }

    /// Like [`Self::test_file_path`], also returning the copy diagnostics.
    pub fn stage(&self, name: &str) -> Result<(PathBuf, CopyStats)> {
        validate_asset_name(name)?;

        let key = format!("{}{}", ASSET_PREFIX, name);
        let mut source = self
            .assets
            .open_resource(&key)
            .ok_or_else(|| FixtureError::AssetNotFound {
                name: name.to_string(),
            })?;

        let dir = self.test_dir(name)?;
        let destination = std::path::absolute(dir.join(name))?;

        let stats = write_to_file_with(&mut source, &destination, &self.retry)?;
        tracing::debug!("Staged {} at {}", key, destination.display());
        Ok((destination, stats))
    }
}
