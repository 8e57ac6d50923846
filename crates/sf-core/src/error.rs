use sf_command::CommandError;
use sf_nbt::NbtError;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the registry, the scene graph and level persistence.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Embedded NBT inside a node could not be read. The file is corrupt.
    #[error("malformed NBT in <{tag}>: {message}")]
    MalformedNbt {
        /// Tag of the node holding the NBT.
        tag: String,
        /// What was wrong with it.
        message: String,
    },

    /// A node was missing a field or held an unparsable value.
    #[error("malformed <{tag}> node: {message}")]
    MalformedNode {
        /// Tag of the offending node.
        tag: String,
        /// What was wrong.
        message: String,
    },

    /// An enum attribute named an unregistered class or value.
    #[error("unknown enum value {class}::{value}")]
    UnknownEnum {
        /// Enum class name.
        class: String,
        /// Requested value.
        value: String,
    },

    /// No entity with this name exists in the level.
    #[error("entity not found: \"{0}\"")]
    EntityNotFound(String),

    /// An entity with the same name already exists.
    #[error("entity already exists: \"{0}\"")]
    DuplicateName(String),

    /// A stack index was past the end of the entity stack.
    #[error("stack index {index} out of range (stack has {len} entities)")]
    StackIndex {
        /// Requested index.
        index: usize,
        /// Stack length.
        len: usize,
    },

    /// An attribute had a different type than the entity kind expects.
    #[error("entity \"{entity}\": attribute \"{name}\" should be {expected}, found {found}")]
    AttributeType {
        /// Entity name.
        entity: String,
        /// Attribute name.
        name: String,
        /// Expected registry type name.
        expected: &'static str,
        /// Actual registry type name.
        found: String,
    },

    /// An output targeted an input the entity does not handle.
    #[error("entity \"{entity}\" has no input \"{input}\"")]
    UnknownInput {
        /// Target entity.
        entity: String,
        /// Requested input.
        input: String,
    },

    /// Output wiring re-entered an input that is already being compiled.
    #[error("wiring cycle: {}", .0.join(" -> "))]
    WiringCycle(Vec<String>),

    /// A model or other asset could not be loaded.
    #[error("asset \"{path}\": {message}")]
    Asset {
        /// Asset path.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// Block store failure.
    #[error(transparent)]
    Nbt(#[from] NbtError),

    /// Command construction failure.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A level file could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn malformed(tag: &str, message: impl Into<String>) -> Self {
        CoreError::MalformedNode {
            tag: tag.to_string(),
            message: message.into(),
        }
    }
}
