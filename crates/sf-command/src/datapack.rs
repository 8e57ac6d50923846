use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use sf_nbt::CompoundTag;

use crate::command::Command;
use crate::error::{CommandError, CommandResult};
use crate::function::Function;
use crate::identifier::{Identifier, sanitize_segment};

/// Pack format written when none is configured.
pub const DEFAULT_PACK_FORMAT: u32 = 48;

/// First pack format that uses singular `function` directory names.
const SINGULAR_DIRS_FORMAT: u32 = 45;

/// The compiled logic: functions, load/tick registration and default storage.
///
/// Functions and storage are kept in identifier order so output is stable
/// regardless of insertion order.
#[derive(Debug, Clone)]
pub struct Datapack {
    namespace: String,
    description: String,
    pack_format: u32,
    functions: BTreeMap<Identifier, Function>,
    load: Vec<Identifier>,
    tick: Vec<Identifier>,
    default_storage: BTreeMap<Identifier, CompoundTag>,
    journal: Option<Vec<Change>>,
}

/// One undoable edit, recorded while a checkpoint is open.
#[derive(Debug, Clone)]
enum Change {
    Added(Identifier),
    Appended { id: Identifier, len: usize },
    Storage { key: Identifier, previous: Option<CompoundTag> },
}

/// A point a [`Datapack`] can be rolled back to.
///
/// Only edits made after the checkpoint are recorded, so rolling back costs
/// as much as the edits themselves.
#[derive(Debug)]
#[must_use]
pub struct Checkpoint {
    load: usize,
    tick: usize,
}

#[derive(Serialize)]
struct PackMeta<'a> {
    pack: PackInfo<'a>,
}

#[derive(Serialize)]
struct PackInfo<'a> {
    pack_format: u32,
    description: &'a str,
}

#[derive(Serialize)]
struct FunctionTag {
    values: Vec<String>,
}

impl Datapack {
    /// An empty datapack. `namespace` is sanitized into a valid identifier
    /// segment.
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: sanitize_segment(namespace),
            description: String::new(),
            pack_format: DEFAULT_PACK_FORMAT,
            functions: BTreeMap::new(),
            load: Vec::new(),
            tick: Vec::new(),
            default_storage: BTreeMap::new(),
            journal: None,
        }
    }

    /// Set the pack description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the pack format.
    pub fn with_pack_format(mut self, pack_format: u32) -> Self {
        self.pack_format = pack_format;
        self
    }

    /// The pack's own namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Pack description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Pack format.
    pub fn pack_format(&self) -> u32 {
        self.pack_format
    }

    /// An identifier in the pack's namespace.
    pub fn id(&self, path: &str) -> CommandResult<Identifier> {
        Identifier::new(self.namespace.clone(), path)
    }

    // -----------------------------------------------------------------------
    // Functions
    // -----------------------------------------------------------------------

    /// Add a function. Identifiers must be unique.
    pub fn add_function(&mut self, function: Function) -> CommandResult<()> {
        let id = function.id().clone();
        if self.functions.contains_key(&id) {
            return Err(CommandError::DuplicateFunction(id.to_string()));
        }
        self.record(|| Change::Added(id.clone()));
        self.functions.insert(id, function);
        Ok(())
    }

    /// Look up a function.
    pub fn function(&self, id: &Identifier) -> Option<&Function> {
        self.functions.get(id)
    }

    /// The function with this identifier, created empty if missing.
    ///
    /// Under a checkpoint only appends to an existing function can be undone.
    pub fn function_entry(&mut self, id: &Identifier) -> &mut Function {
        let change = match self.functions.get(id) {
            Some(existing) => Change::Appended {
                id: id.clone(),
                len: existing.commands().len(),
            },
            None => Change::Added(id.clone()),
        };
        self.record(|| change);
        self.functions
            .entry(id.clone())
            .or_insert_with(|| Function::new(id.clone()))
    }

    /// All functions in identifier order.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    /// `base` if unused, otherwise `base_2`, `base_3`, ... whichever is free.
    pub fn fresh_function_id(&self, base: &Identifier) -> CommandResult<Identifier> {
        if !self.functions.contains_key(base) {
            return Ok(base.clone());
        }
        let mut n = 2usize;
        loop {
            let candidate = Identifier::new(base.namespace(), format!("{}_{n}", base.path()))?;
            if !self.functions.contains_key(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    // -----------------------------------------------------------------------
    // Registration and storage
    // -----------------------------------------------------------------------

    /// Run `id` when the pack loads. Registering twice has no effect.
    pub fn register_load(&mut self, id: Identifier) {
        if !self.load.contains(&id) {
            self.load.push(id);
        }
    }

    /// Run `id` every tick. Registering twice has no effect.
    pub fn register_tick(&mut self, id: Identifier) {
        if !self.tick.contains(&id) {
            self.tick.push(id);
        }
    }

    /// Functions run on load, in registration order.
    pub fn load(&self) -> &[Identifier] {
        &self.load
    }

    /// Functions run every tick, in registration order.
    pub fn tick(&self) -> &[Identifier] {
        &self.tick
    }

    /// Merge a default snapshot into the storage at `key`.
    pub fn set_default_storage(&mut self, key: Identifier, nbt: &CompoundTag) {
        if self.journal.is_some() {
            let previous = self.default_storage.get(&key).cloned();
            self.record(|| Change::Storage {
                key: key.clone(),
                previous,
            });
        }
        self.default_storage.entry(key).or_default().merge(nbt);
    }

    /// Default storage snapshots by key.
    pub fn default_storage(&self) -> &BTreeMap<Identifier, CompoundTag> {
        &self.default_storage
    }

    /// `data merge storage` commands restoring every default snapshot.
    pub fn storage_init_commands(&self) -> Vec<Command> {
        self.default_storage
            .iter()
            .map(|(key, nbt)| Command::merge_storage(key.clone(), nbt.clone()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Checkpoints
    // -----------------------------------------------------------------------

    /// Start recording edits. A second call discards the previous record.
    pub fn checkpoint(&mut self) -> Checkpoint {
        self.journal = Some(Vec::new());
        Checkpoint {
            load: self.load.len(),
            tick: self.tick.len(),
        }
    }

    /// Keep every edit since `checkpoint`.
    pub fn commit(&mut self, _checkpoint: Checkpoint) {
        self.journal = None;
    }

    /// Undo every edit since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        let changes = self.journal.take().unwrap_or_default();
        log::debug!("rolling back {} datapack edits", changes.len());
        for change in changes.into_iter().rev() {
            match change {
                Change::Added(id) => {
                    self.functions.remove(&id);
                }
                Change::Appended { id, len } => {
                    if let Some(function) = self.functions.get_mut(&id) {
                        function.truncate(len);
                    }
                }
                Change::Storage { key, previous } => match previous {
                    Some(nbt) => {
                        self.default_storage.insert(key, nbt);
                    }
                    None => {
                        self.default_storage.remove(&key);
                    }
                },
            }
        }
        self.load.truncate(checkpoint.load);
        self.tick.truncate(checkpoint.tick);
    }

    fn record(&mut self, change: impl FnOnce() -> Change) {
        if let Some(journal) = &mut self.journal {
            journal.push(change());
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    fn function_dir(&self) -> &'static str {
        if self.pack_format >= SINGULAR_DIRS_FORMAT {
            "function"
        } else {
            "functions"
        }
    }

    /// Every file of the pack, keyed by relative path with `/` separators.
    pub fn render_files(&self) -> CommandResult<BTreeMap<String, String>> {
        let dir = self.function_dir();
        let mut files = BTreeMap::new();

        let meta = PackMeta {
            pack: PackInfo {
                pack_format: self.pack_format,
                description: &self.description,
            },
        };
        files.insert("pack.mcmeta".to_string(), serde_json::to_string_pretty(&meta)? + "\n");

        for function in self.functions.values() {
            let id = function.id();
            files.insert(
                format!("data/{}/{dir}/{}.mcfunction", id.namespace(), id.path()),
                function.render(),
            );
        }

        for (name, ids) in [("load", &self.load), ("tick", &self.tick)] {
            let tag = FunctionTag {
                values: ids.iter().map(ToString::to_string).collect(),
            };
            files.insert(
                format!("data/minecraft/tags/{dir}/{name}.json"),
                serde_json::to_string_pretty(&tag)? + "\n",
            );
        }
        Ok(files)
    }

    /// Write the pack under `root`, returning the number of files written.
    pub fn write_to(&self, root: &Path) -> CommandResult<usize> {
        let files = self.render_files()?;
        for (relative, contents) in &files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, contents)?;
        }
        log::info!("wrote {} datapack files to {}", files.len(), root.display());
        Ok(files.len())
    }
}
