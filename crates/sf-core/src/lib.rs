//! The scene graph of a Scaffold level.
//!
//! A [`Level`] is an ordered stack of [`Entity`] values. Each entity has a
//! kind from the [`TypeRegistry`], a bag of typed [`Attribute`]s, and
//! [`Output`] connections that wire its events to other entities' inputs.
//! Level edits report the [`DirtySet`] of block sections they may change,
//! which the compiler uses for incremental rebuilds.

/// Model sources and the shared model cache.
pub mod asset;
/// Typed attribute values and the built-in attribute factories.
pub mod attribute;
/// Contexts handed to entity kinds during the world and logic passes.
pub mod context;
/// Sets of block sections that need recompiling.
pub mod dirty;
/// Entities: named, typed bags of attributes with output connections.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Output connections, target resolution and the static wiring graph.
pub mod io;
/// The behavior trait every entity type implements.
pub mod kind;
/// The ordered entity stack and its edit operations.
pub mod level;
/// The generic tree used by level files.
pub mod node;
/// Name-keyed registries.
pub mod registry;
/// Attribute declarations of entity kinds.
pub mod schema;
/// Level file encoding.
pub mod serialize;
/// Block textures: rules that pick a block per position.
pub mod texture;
/// The registry of attribute, entity and enum types.
pub mod types;
/// World-space vectors.
pub mod vector;

/// Re-export asset types.
pub use asset::{
    AssetSource, DirAssets, MemoryAssets, ModelCache, Models, NoAssets, parse_model,
};
/// Re-export attribute types.
pub use attribute::{Attribute, AttributeFactory};
/// Re-export context types.
pub use context::{Captures, LogicContext, WorldContext};
/// Re-export dirty-set type.
pub use dirty::DirtySet;
/// Re-export entity type.
pub use entity::Entity;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export wiring types.
pub use io::{
    DanglingOutput, Output, TARGET_INSTIGATOR, TARGET_SELF, TARGET_THIS, UndeclaredInput,
    WiringGraph, resolve_target,
};
/// Re-export kind types.
pub use kind::{EntityKind, InputCall, PortDecl, UnknownKind};
/// Re-export level type.
pub use level::Level;
/// Re-export tree node type.
pub use node::Node;
/// Re-export schema types.
pub use schema::{Field, POSITION, Schema};
/// Re-export block texture type.
pub use texture::BlockTexture;
/// Re-export type registry.
pub use types::TypeRegistry;
/// Re-export vector type.
pub use vector::Vec3;
