//! NBT values, SNBT text, and the palette-compressed block store.
//!
//! This crate knows nothing about entities or levels. The compiler writes
//! [`Block`]s into a [`BlockWorld`] and hands the finished store to whatever
//! codec persists it.

/// Block values: a type identifier plus a property compound.
pub mod block;
/// One 16-wide column of sections.
pub mod chunk;
/// Finite block collections (models, prefabs) that can be stamped into a world.
pub mod collection;
/// Error types used throughout the crate.
pub mod error;
/// Block, section, chunk and region coordinates plus axis-aligned bounds.
pub mod math;
/// Deduplicated value lists addressed by small indices.
pub mod palette;
/// The codec boundary between a [`BlockWorld`] and a persisted region.
pub mod region;
/// A 16x16x16 palette-compressed cube of blocks.
pub mod section;
/// SNBT (stringified NBT) lexer and parser.
pub mod snbt;
/// The NBT tag model and its SNBT rendering.
pub mod tag;
/// The sparse chunk map that owns every placed block.
pub mod world;

/// Re-export block types.
pub use block::Block;
/// Re-export collection types.
pub use collection::{BlockCollection, GenericBlockCollection};
/// Re-export error types.
pub use error::{NbtError, NbtResult};
/// Re-export coordinate types.
pub use math::{BlockPos, Bounds, ChunkPos, RegionPos, SectionPos};
/// Re-export SNBT entry points.
pub use snbt::{parse_compound, parse_snbt};
/// Re-export tag types.
pub use tag::{CompoundTag, Tag};
/// Re-export world types.
pub use world::{BlockWorld, OverwritePolicy};
