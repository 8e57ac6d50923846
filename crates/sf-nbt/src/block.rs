use std::fmt;

use crate::tag::{CompoundTag, Tag};

/// Name of the block that "air-aware" overwrite policies treat as empty.
pub const AIR: &str = "minecraft:air";

/// A voxel value: a namespaced type id plus block-state properties.
///
/// Equality is structural: two blocks are equal when both the name and every
/// property match.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    name: String,
    properties: CompoundTag,
}

impl Block {
    /// A block with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: CompoundTag::new(),
        }
    }

    /// The air block.
    pub fn air() -> Self {
        Self::new(AIR)
    }

    /// Builder-style property set.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Tag>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Replace all properties.
    pub fn with_properties(mut self, properties: CompoundTag) -> Self {
        self.properties = properties;
        self
    }

    /// Namespaced type id, e.g. `minecraft:stone`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block-state properties.
    pub fn properties(&self) -> &CompoundTag {
        &self.properties
    }

    /// Whether this is `minecraft:air`.
    pub fn is_air(&self) -> bool {
        self.name == AIR
    }

    /// Block-state string as used by commands: `name[key=value,...]`.
    pub fn state_string(&self) -> String {
        if self.properties.is_empty() {
            return self.name.clone();
        }
        let props: Vec<String> = self
            .properties
            .iter()
            .map(|(k, v)| match v {
                Tag::String(s) => format!("{k}={s}"),
                other => format!("{k}={other}"),
            })
            .collect();
        format!("{}[{}]", self.name, props.join(","))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.state_string())
    }
}
