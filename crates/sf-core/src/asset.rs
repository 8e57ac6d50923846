use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Deserialize;
use sf_nbt::{Block, BlockPos, GenericBlockCollection, parse_compound};

use crate::error::{CoreError, CoreResult};

/// Where entities load external assets from.
pub trait AssetSource: fmt::Debug {
    /// Load a block model by path.
    fn load_model(&self, path: &str) -> CoreResult<GenericBlockCollection>;
}

/// An asset source with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn load_model(&self, path: &str) -> CoreResult<GenericBlockCollection> {
        Err(CoreError::Asset {
            path: path.to_string(),
            message: "no asset source configured".to_string(),
        })
    }
}

/// Models held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    models: BTreeMap<String, GenericBlockCollection>,
}

impl MemoryAssets {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_model(mut self, path: impl Into<String>, model: GenericBlockCollection) -> Self {
        self.insert(path, model);
        self
    }

    /// Add or replace a model.
    pub fn insert(&mut self, path: impl Into<String>, model: GenericBlockCollection) {
        self.models.insert(path.into(), model);
    }
}

impl AssetSource for MemoryAssets {
    fn load_model(&self, path: &str) -> CoreResult<GenericBlockCollection> {
        self.models.get(path).cloned().ok_or_else(|| CoreError::Asset {
            path: path.to_string(),
            message: "not found".to_string(),
        })
    }
}

/// Models read from JSON files under a directory.
///
/// A model file looks like
/// `{"blocks": [{"pos": [0, 0, 0], "name": "minecraft:stone", "properties": "{}"}]}`;
/// `properties` is optional SNBT.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    /// Read models relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[derive(Deserialize)]
struct ModelFile {
    blocks: Vec<ModelBlock>,
}

#[derive(Deserialize)]
struct ModelBlock {
    pos: [i32; 3],
    name: String,
    #[serde(default)]
    properties: Option<String>,
}

/// Parse a JSON model.
pub fn parse_model(path: &str, text: &str) -> CoreResult<GenericBlockCollection> {
    let asset_error = |message: String| CoreError::Asset {
        path: path.to_string(),
        message,
    };
    let file: ModelFile = serde_json::from_str(text).map_err(|e| asset_error(e.to_string()))?;
    file.blocks
        .into_iter()
        .map(|b| -> CoreResult<(BlockPos, Block)> {
            let mut block = Block::new(b.name);
            if let Some(props) = &b.properties {
                block = block.with_properties(
                    parse_compound(props).map_err(|e| asset_error(e.to_string()))?,
                );
            }
            let [x, y, z] = b.pos;
            Ok((BlockPos::new(x, y, z), block))
        })
        .collect()
}

impl AssetSource for DirAssets {
    fn load_model(&self, path: &str) -> CoreResult<GenericBlockCollection> {
        let full = self.root.join(path);
        let text = fs::read_to_string(&full).map_err(|e| CoreError::Asset {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        log::debug!("loaded model {}", full.display());
        parse_model(path, &text)
    }
}

// ---------------------------------------------------------------------------
// Model cache
// ---------------------------------------------------------------------------

/// Models loaded so far, keyed by path.
///
/// Bounds queries and the world pass read through the same cache, so a model
/// is loaded once until the cache is invalidated.
#[derive(Debug, Default)]
pub struct ModelCache {
    entries: Mutex<BTreeMap<String, Arc<GenericBlockCollection>>>,
    loads: AtomicUsize,
}

impl ModelCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The model at `path`, loading it from `assets` when missing.
    pub fn get_or_load(
        &self,
        path: &str,
        assets: &dyn AssetSource,
    ) -> CoreResult<Arc<GenericBlockCollection>> {
        let mut entries = self.lock();
        if let Some(model) = entries.get(path) {
            return Ok(Arc::clone(model));
        }
        let model = Arc::new(assets.load_model(path)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        entries.insert(path.to_string(), Arc::clone(&model));
        Ok(model)
    }

    /// Whether `path` is loaded.
    pub fn contains(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    /// Keep only the paths `keep` accepts.
    pub fn retain(&self, mut keep: impl FnMut(&str) -> bool) {
        self.lock().retain(|path, _| keep(path));
    }

    /// Forget everything, so the next use reads each model again.
    pub fn invalidate(&self) {
        self.lock().clear();
    }

    /// How many times a model was actually loaded.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Arc<GenericBlockCollection>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An asset source read through a [`ModelCache`].
#[derive(Debug, Clone, Copy)]
pub struct Models<'a> {
    assets: &'a dyn AssetSource,
    cache: &'a ModelCache,
}

impl<'a> Models<'a> {
    /// Load from `assets`, caching in `cache`.
    pub fn new(assets: &'a dyn AssetSource, cache: &'a ModelCache) -> Self {
        Self { assets, cache }
    }

    /// The model at `path`.
    pub fn load(&self, path: &str) -> CoreResult<Arc<GenericBlockCollection>> {
        self.cache.get_or_load(path, self.assets)
    }

    /// The uncached source.
    pub fn assets(&self) -> &'a dyn AssetSource {
        self.assets
    }
}
