use std::fmt;

use sf_command::Command;
use sf_nbt::Bounds;

use crate::asset::Models;
use crate::attribute::Attribute;
use crate::context::{LogicContext, WorldContext};
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::schema::Schema;

/// A named input or output port, shown in editors and checked by `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortDecl {
    /// Port name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
}

impl PortDecl {
    /// Declare a port.
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }
}

/// One invocation of an input through an output connection.
#[derive(Debug, Clone, Copy)]
pub struct InputCall<'a> {
    /// Entity receiving the input.
    pub entity: &'a Entity,
    /// Input name.
    pub input: &'a str,
    /// Arguments attached to the connection.
    pub args: &'a [Attribute],
    /// Entity whose output fired.
    pub source: &'a Entity,
    /// Entity that started the chain.
    pub instigator: &'a Entity,
}

/// The behavior of one entity type.
///
/// Kinds are stateless; everything per-entity lives in the [`Entity`]'s
/// attributes. Entities that write blocks return `true` from
/// [`is_spatial`](EntityKind::is_spatial) and implement `bounds` and
/// `compile_world`; entities with game logic implement `compile_logic` and
/// `compile_input`.
pub trait EntityKind: fmt::Debug {
    /// Registry name, also the tag of the entity's node.
    fn type_name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str {
        ""
    }

    /// Declared attributes with their defaults.
    fn schema(&self) -> Schema {
        Schema::entity()
    }

    /// Inputs other entities may call.
    fn inputs(&self) -> Vec<PortDecl> {
        Vec::new()
    }

    /// Outputs this entity fires.
    fn outputs(&self) -> Vec<PortDecl> {
        Vec::new()
    }

    /// Commands that perform an input.
    fn compile_input(
        &self,
        call: &InputCall<'_>,
        _ctx: &mut LogicContext<'_>,
    ) -> CoreResult<Vec<Command>> {
        Err(CoreError::UnknownInput {
            entity: call.entity.name().to_string(),
            input: call.input.to_string(),
        })
    }

    /// Add the entity's functions and storage to the datapack.
    fn compile_logic(&self, _entity: &Entity, _ctx: &mut LogicContext<'_>) -> CoreResult<()> {
        Ok(())
    }

    /// Whether the entity writes blocks.
    fn is_spatial(&self) -> bool {
        false
    }

    /// World pass ordering; later passes overwrite earlier ones.
    fn block_pass(&self, entity: &Entity) -> i32 {
        entity
            .attribute("block_pass")
            .and_then(Attribute::as_int)
            .unwrap_or(0)
    }

    /// Box of every block the entity may write.
    ///
    /// `Ok(None)` when the extent is unknown, for example a missing model.
    /// Fails when the box does not fit in block coordinates.
    fn bounds(&self, _entity: &Entity, _models: Models<'_>) -> CoreResult<Option<Bounds>> {
        Ok(None)
    }

    /// Model paths the entity reads, so unused ones can leave the cache.
    fn model_paths(&self, _entity: &Entity) -> Vec<String> {
        Vec::new()
    }

    /// Write the entity's blocks.
    fn compile_world(&self, _entity: &Entity, _ctx: &mut WorldContext<'_>) -> CoreResult<()> {
        Ok(())
    }
}

/// Stand-in for an entity type that is not registered.
///
/// Keeps the type name so the entity is saved back unchanged; it contributes
/// nothing to a compile.
#[derive(Debug, Clone)]
pub struct UnknownKind {
    type_name: String,
}

impl UnknownKind {
    /// A placeholder for `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl EntityKind for UnknownKind {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn description(&self) -> &str {
        "unregistered entity type"
    }
}
