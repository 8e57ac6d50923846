use crate::math::{BlockPos, RegionPos};
use crate::snbt::SnbtError;

/// Alias for `Result<T, NbtError>`.
pub type NbtResult<T> = Result<T, NbtError>;

/// Errors raised by the NBT model, SNBT codec and block store.
#[derive(Debug, thiserror::Error)]
pub enum NbtError {
    /// SNBT text could not be lexed or parsed.
    #[error("malformed SNBT: {}", summarize(.0))]
    Snbt(Vec<SnbtError>),

    /// A compound was required but another tag kind was found.
    #[error("expected a compound tag, found {0}")]
    NotCompound(&'static str),

    /// A block was written above or below the world's height range.
    #[error("block position {0} is outside the world height")]
    OutOfBounds(BlockPos),

    /// Offsetting a position left the `i32` coordinate range.
    #[error("offset {offset} from {origin} leaves the coordinate range")]
    CoordinateOverflow {
        /// Position being offset.
        origin: BlockPos,
        /// Offset applied to it.
        offset: BlockPos,
    },

    /// A region snapshot does not exist.
    #[error("region {0} has no snapshot")]
    MissingRegion(RegionPos),

    /// Filesystem failure while reading or writing a region.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A region snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

fn summarize(errors: &[SnbtError]) -> String {
    match errors.first() {
        Some(first) if errors.len() > 1 => {
            format!("{first} (and {} more)", errors.len() - 1)
        }
        Some(first) => first.to_string(),
        None => "unknown error".to_string(),
    }
}
