use crate::core::stager::ASSET_PREFIX;
use crate::core::AssetSource;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// Resources laid out on disk under a root directory, so `assets/x` resolves
/// to `<root>/assets/x`.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn open_resource(&self, key: &str) -> Option<Box<dyn Read + '_>> {
        let path = self.root.join(key);
        if !path.is_file() {
            return None;
        }
        match File::open(&path) {
            Ok(file) => Some(Box::new(BufReader::new(file))),
            Err(e) => {
                tracing::warn!("Could not open resource {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Resources held in memory, e.g. fixtures compiled in with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    resources: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` as `assets/<name>`.
    pub fn with_asset(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&mut self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.resources
            .insert(format!("{}{}", ASSET_PREFIX, name), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn open_resource(&self, key: &str) -> Option<Box<dyn Read + '_>> {
        self.resources
            .get(key)
            .map(|bytes| Box::new(Cursor::new(bytes.as_slice())) as Box<dyn Read + '_>)
    }
}
