/// Alias for `Result<T, CommandError>`.
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors raised while building command trees or writing a datapack.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// An identifier was not of the form `namespace:path`.
    #[error("invalid identifier \"{0}\"")]
    InvalidIdentifier(String),

    /// A target selector did not parse.
    #[error("invalid target selector \"{0}\"")]
    InvalidSelector(String),

    /// An NBT path was empty or unbalanced.
    #[error("invalid NBT path \"{0}\"")]
    InvalidNbtPath(String),

    /// A scoreboard objective name was empty or contained whitespace.
    #[error("invalid objective \"{0}\"")]
    InvalidObjective(String),

    /// A coordinate could not be parsed.
    #[error("invalid coordinate \"{0}\"")]
    InvalidCoordinate(String),

    /// Relative and local coordinates were mixed in one position.
    #[error("local coordinates cannot be mixed with other kinds: \"{0}\"")]
    MixedCoordinates(String),

    /// An integer range had its bounds reversed.
    #[error("invalid range {min}..{max}")]
    InvalidRange {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },

    /// A function with this identifier already exists in the datapack.
    #[error("duplicate function {0}")]
    DuplicateFunction(String),

    /// Filesystem failure while writing a datapack.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A manifest could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
