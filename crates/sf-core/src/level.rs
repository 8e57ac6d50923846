use std::collections::BTreeSet;
use std::sync::Arc;

use sf_command::identifier::sanitize_segment;
use sf_nbt::{Bounds, CompoundTag};

use crate::asset::{AssetSource, ModelCache, Models, NoAssets};
use crate::attribute::Attribute;
use crate::dirty::DirtySet;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::io::Output;
use crate::schema::POSITION;
use crate::types::TypeRegistry;
use crate::vector::Vec3;

/// A level: metadata plus the ordered entity stack.
///
/// Stack order is compile order. In the world pass, later entities of the
/// same block pass overwrite earlier ones; in the logic pass, functions are
/// emitted in stack order.
///
/// Every mutation that can change compiled blocks returns the [`DirtySet`]
/// an incremental recompile has to redo. Models are loaded through a cache
/// shared by clones of the level and dropped when the asset source changes.
#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    pretty_name: String,
    description: String,
    level_data: CompoundTag,
    entities: Vec<Entity>,
    assets: Arc<dyn AssetSource>,
    models: Arc<ModelCache>,
}

impl Level {
    /// An empty level without assets.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            pretty_name: name.clone(),
            name,
            description: String::new(),
            level_data: CompoundTag::new(),
            entities: Vec::new(),
            assets: Arc::new(NoAssets),
            models: Arc::new(ModelCache::new()),
        }
    }

    /// Builder-style asset source.
    pub fn with_assets(mut self, assets: Arc<dyn AssetSource>) -> Self {
        self.set_assets(assets);
        self
    }

    /// Builder-style display name.
    pub fn with_pretty_name(mut self, pretty_name: impl Into<String>) -> Self {
        self.pretty_name = pretty_name.into();
        self
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the asset source.
    pub fn set_assets(&mut self, assets: Arc<dyn AssetSource>) {
        self.assets = assets;
        self.models = Arc::new(ModelCache::new());
    }

    /// Where models are loaded from.
    pub fn assets(&self) -> &dyn AssetSource {
        self.assets.as_ref()
    }

    /// The asset source read through the level's model cache.
    pub fn models(&self) -> Models<'_> {
        Models::new(self.assets.as_ref(), &self.models)
    }

    /// The level's model cache.
    pub fn model_cache(&self) -> &ModelCache {
        &self.models
    }

    /// Internal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Datapack namespace derived from the name.
    pub fn namespace(&self) -> String {
        let ns = sanitize_segment(&self.name);
        if ns.is_empty() { "level".to_string() } else { ns }
    }

    /// Display name.
    pub fn pretty_name(&self) -> &str {
        &self.pretty_name
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Extra data written to the level's `level.dat`.
    pub fn level_data(&self) -> &CompoundTag {
        &self.level_data
    }

    /// Mutable access to the level data.
    pub fn level_data_mut(&mut self) -> &mut CompoundTag {
        &mut self.level_data
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Look up an entity by exact name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    /// Entities in stack order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the level has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Position of an entity in the stack.
    pub fn stack_index(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.name() == name)
    }

    /// The entity's block bounds under this level's assets.
    pub fn entity_bounds(&self, entity: &Entity) -> CoreResult<Option<Bounds>> {
        entity.bounds(self.models())
    }

    fn index_of(&self, name: &str) -> CoreResult<usize> {
        self.stack_index(name)
            .ok_or_else(|| CoreError::EntityNotFound(name.to_string()))
    }

    fn dirty_of(&self, entity: &Entity) -> CoreResult<DirtySet> {
        Ok(self
            .entity_bounds(entity)?
            .map(|b| DirtySet::of_bounds(&b))
            .unwrap_or_default())
    }

    /// Drop cached models no entity reads any more.
    fn prune_models(&self) {
        let used: BTreeSet<String> = self
            .entities
            .iter()
            .flat_map(|e| e.kind().model_paths(e))
            .collect();
        self.models.retain(|path| used.contains(path));
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    /// A name no other entity uses, derived from `name`.
    ///
    /// Names are compared by their identifier form, so two entities never
    /// share a storage key or function directory. Collisions bump a trailing
    /// number (`door` becomes `door1`, `door9` becomes `door10`). The entity
    /// called `ignore` does not count as a collision.
    pub fn validate_name(&self, name: &str, ignore: Option<&str>) -> String {
        let taken = |candidate: &str| {
            let key = sanitize_segment(candidate);
            self.entities
                .iter()
                .any(|e| Some(e.name()) != ignore && sanitize_segment(e.name()) == key)
        };
        let mut candidate = if sanitize_segment(name).is_empty() {
            "entity".to_string()
        } else {
            name.to_string()
        };
        while taken(&candidate) {
            candidate = bump_suffix(&candidate);
        }
        candidate
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Push an entity onto the top of the stack.
    pub fn add_entity(&mut self, entity: Entity) -> CoreResult<DirtySet> {
        let index = self.entities.len();
        self.insert_entity(index, entity)
    }

    /// Insert an entity at a stack position.
    pub fn insert_entity(&mut self, index: usize, entity: Entity) -> CoreResult<DirtySet> {
        if index > self.entities.len() {
            return Err(CoreError::StackIndex {
                index,
                len: self.entities.len(),
            });
        }
        if self.validate_name(entity.name(), None) != entity.name() {
            return Err(CoreError::DuplicateName(entity.name().to_string()));
        }
        let dirty = self.dirty_of(&entity)?;
        log::debug!("added {} \"{}\"", entity.type_name(), entity.name());
        self.entities.insert(index, entity);
        Ok(dirty)
    }

    /// Create an entity of a registered type at `position`, under a free name
    /// derived from `name`. Returns the name actually used.
    pub fn new_entity(
        &mut self,
        registry: &TypeRegistry,
        type_name: &str,
        name: &str,
        position: Vec3,
    ) -> CoreResult<(String, DirtySet)> {
        let name = self.validate_name(name, None);
        let entity = Entity::new(registry.entity_kind(type_name), name.clone()).at(position);
        let dirty = self.add_entity(entity)?;
        Ok((name, dirty))
    }

    /// Remove an entity, returning it with the region it used to cover.
    pub fn remove_entity(&mut self, name: &str) -> CoreResult<(Entity, DirtySet)> {
        let index = self.index_of(name)?;
        let dirty = self.dirty_of(&self.entities[index]).unwrap_or_default();
        let entity = self.entities.remove(index);
        self.prune_models();
        log::debug!("removed \"{name}\"");
        Ok((entity, dirty))
    }

    /// Set one attribute. The dirty set covers both the old and new bounds.
    ///
    /// An edit that would push the entity's bounds out of block coordinates
    /// is undone and returned as an error.
    pub fn set_attribute(
        &mut self,
        entity: &str,
        name: &str,
        value: impl Into<Attribute>,
    ) -> CoreResult<DirtySet> {
        let index = self.index_of(entity)?;
        let mut dirty = self.dirty_of(&self.entities[index]).unwrap_or_default();
        let previous = self.entities[index].set_attribute(name, value);
        match self.dirty_of(&self.entities[index]) {
            Ok(after) => dirty.merge(after),
            Err(e) => {
                let target = &mut self.entities[index];
                match previous {
                    Some(value) => {
                        target.set_attribute(name, value);
                    }
                    None => {
                        target.remove_attribute(name);
                    }
                }
                return Err(e);
            }
        }
        self.prune_models();
        Ok(dirty)
    }

    /// Move an entity to a new position.
    pub fn move_entity(&mut self, entity: &str, position: Vec3) -> CoreResult<DirtySet> {
        self.set_attribute(entity, POSITION, position)
    }

    /// Move an entity to `index` in the stack.
    ///
    /// Only blocks where a reordered pair overlaps can change, so the dirty
    /// set is the union of those overlaps.
    pub fn move_in_stack(&mut self, name: &str, index: usize) -> CoreResult<DirtySet> {
        let from = self.index_of(name)?;
        if index >= self.entities.len() {
            return Err(CoreError::StackIndex {
                index,
                len: self.entities.len(),
            });
        }
        let before: Vec<String> = self.entities.iter().map(|e| e.name().to_string()).collect();
        let entity = self.entities.remove(from);
        self.entities.insert(index, entity);

        let old_index = |n: &str| before.iter().position(|b| b == n);
        let placed: Vec<(Option<usize>, Bounds)> = self
            .entities
            .iter()
            .filter_map(|e| {
                let bounds = self.entity_bounds(e).ok().flatten()?;
                Some((old_index(e.name()), bounds))
            })
            .collect();

        let mut dirty = DirtySet::new();
        for (i, (old_a, a)) in placed.iter().enumerate() {
            for (old_b, b) in &placed[i + 1..] {
                if old_a > old_b
                    && let Some(overlap) = a.intersection(b)
                {
                    dirty.add_bounds(&overlap);
                }
            }
        }
        Ok(dirty)
    }

    /// Rename an entity, returning the name actually used and the region
    /// whose blocks record the entity as their owner.
    ///
    /// With `refactor`, every output target and entity-reference attribute
    /// naming the old name is rewritten too.
    pub fn rename_entity(
        &mut self,
        old: &str,
        new: &str,
        refactor: bool,
    ) -> CoreResult<(String, DirtySet)> {
        let index = self.index_of(old)?;
        let new = self.validate_name(new, Some(old));
        self.entities[index].set_name(new.clone());
        let dirty = self.dirty_of(&self.entities[index]).unwrap_or_default();

        if refactor {
            let mut rewritten = 0;
            for entity in &mut self.entities {
                for output in entity.outputs_mut() {
                    if output.target == old {
                        output.target = new.clone();
                        rewritten += 1;
                    }
                }
                for attr in entity.attributes_mut() {
                    rewritten += attr.rename_references(old, &new);
                }
            }
            log::debug!("renamed \"{old}\" to \"{new}\" ({rewritten} references updated)");
        }
        Ok((new, dirty))
    }

    /// Append an output connection to an entity.
    pub fn add_output(&mut self, entity: &str, output: Output) -> CoreResult<()> {
        let index = self.index_of(entity)?;
        self.entities[index].add_output(output);
        Ok(())
    }

    /// Remove an output connection by position.
    pub fn remove_output(&mut self, entity: &str, index: usize) -> CoreResult<Output> {
        let at = self.index_of(entity)?;
        let len = self.entities[at].outputs().len();
        self.entities[at]
            .remove_output(index)
            .ok_or(CoreError::StackIndex { index, len })
    }

    /// Every section any entity covers.
    pub fn full_extent(&self) -> DirtySet {
        let mut dirty = DirtySet::new();
        for entity in &self.entities {
            dirty.merge(self.dirty_of(entity).unwrap_or_default());
        }
        dirty
    }
}

fn bump_suffix(name: &str) -> String {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &name[stem.len()..];
    match digits.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
        Some(next) => format!("{stem}{next}"),
        None => format!("{name}1"),
    }
}
