use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use sf_nbt::{Block, BlockPos, Bounds, CompoundTag};

use crate::asset::Models;
use crate::attribute::Attribute;
use crate::error::{CoreError, CoreResult};
use crate::io::Output;
use crate::kind::EntityKind;
use crate::schema::POSITION;
use crate::texture::BlockTexture;
use crate::vector::Vec3;

/// A named, typed object in a level.
#[derive(Clone)]
pub struct Entity {
    name: String,
    kind: Arc<dyn EntityKind>,
    attributes: BTreeMap<String, Attribute>,
    outputs: Vec<Output>,
}

impl Entity {
    /// A new entity with every attribute at its schema default.
    pub fn new(kind: Arc<dyn EntityKind>, name: impl Into<String>) -> Self {
        let mut attributes = kind.schema().defaults();
        attributes
            .entry(POSITION.to_string())
            .or_insert_with(|| Attribute::Vector(Vec3::default()));
        Self {
            name: name.into(),
            kind,
            attributes,
            outputs: Vec::new(),
        }
    }

    /// Builder-style attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Attribute>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style position.
    pub fn at(self, position: Vec3) -> Self {
        self.with_attribute(POSITION, position)
    }

    /// Builder-style output connection.
    pub fn with_output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    /// Name, unique within the level.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Registry name of the entity's type.
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// The entity's behavior.
    pub fn kind(&self) -> &Arc<dyn EntityKind> {
        &self.kind
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    /// Look up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Every attribute in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace an attribute wholesale, returning the old value.
    ///
    /// Inside a level, use [`Level::set_attribute`](crate::Level::set_attribute)
    /// so the affected region is reported.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Attribute>,
    ) -> Option<Attribute> {
        self.attributes.insert(name.into(), value.into())
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    pub(crate) fn attributes_mut(&mut self) -> impl Iterator<Item = &mut Attribute> {
        self.attributes.values_mut()
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.attribute(POSITION)
            .and_then(Attribute::as_vec3)
            .unwrap_or_default()
    }

    /// The block containing the position.
    pub fn block_pos(&self) -> BlockPos {
        self.position().block_pos()
    }

    /// Box of every block the entity may write, if it writes any.
    pub fn bounds(&self, models: Models<'_>) -> CoreResult<Option<Bounds>> {
        if self.kind.is_spatial() {
            self.kind.bounds(self, models)
        } else {
            Ok(None)
        }
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &'static str,
        get: impl FnOnce(&'a Attribute) -> Option<T>,
    ) -> CoreResult<T> {
        let attr = self.attribute(name);
        attr.and_then(get).ok_or_else(|| CoreError::AttributeType {
            entity: self.name.clone(),
            name: name.to_string(),
            expected,
            found: attr.map_or("nothing".to_string(), |a| a.type_name().to_string()),
        })
    }

    /// An `int_attribute` value.
    pub fn int(&self, name: &str) -> CoreResult<i32> {
        self.typed(name, "int_attribute", Attribute::as_int)
    }

    /// A `bool_attribute` value.
    pub fn bool(&self, name: &str) -> CoreResult<bool> {
        self.typed(name, "bool_attribute", Attribute::as_bool)
    }

    /// A `string_attribute` value.
    pub fn string(&self, name: &str) -> CoreResult<&str> {
        self.typed(name, "string_attribute", Attribute::as_str)
    }

    /// A `vector_attribute` value.
    pub fn vector(&self, name: &str) -> CoreResult<Vec3> {
        self.typed(name, "vector_attribute", Attribute::as_vec3)
    }

    /// A `block_attribute` value.
    pub fn block(&self, name: &str) -> CoreResult<&Block> {
        self.typed(name, "block_attribute", Attribute::as_block)
    }

    /// A `block_texture_attribute` value.
    pub fn texture(&self, name: &str) -> CoreResult<&BlockTexture> {
        self.typed(name, "block_texture_attribute", Attribute::as_texture)
    }

    /// An `nbt_attribute` value.
    pub fn nbt(&self, name: &str) -> CoreResult<&CompoundTag> {
        self.typed(name, "nbt_attribute", Attribute::as_nbt)
    }

    /// The value name of an `enum_attribute`.
    pub fn enum_value(&self, name: &str) -> CoreResult<&str> {
        self.typed(name, "enum_attribute", Attribute::as_enum_value)
    }

    /// The target of an `entity_attribute`.
    pub fn entity_ref(&self, name: &str) -> CoreResult<&str> {
        self.typed(name, "entity_attribute", Attribute::as_entity_ref)
    }

    // -----------------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------------

    /// Output connections in the order they were added.
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Add an output connection.
    pub fn add_output(&mut self, output: Output) {
        self.outputs.push(output);
    }

    /// Remove the output at `index`.
    pub fn remove_output(&mut self, index: usize) -> Option<Output> {
        (index < self.outputs.len()).then(|| self.outputs.remove(index))
    }

    pub(crate) fn outputs_mut(&mut self) -> &mut Vec<Output> {
        &mut self.outputs
    }

    /// Whether any connection fires on `trigger`.
    pub fn has_output(&self, trigger: &str) -> bool {
        self.outputs.iter().any(|o| o.matches(trigger))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("type", &self.type_name())
            .field("attributes", &self.attributes)
            .field("outputs", &self.outputs)
            .finish()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.type_name() == other.type_name()
            && self.attributes == other.attributes
            && self.outputs == other.outputs
    }
}
