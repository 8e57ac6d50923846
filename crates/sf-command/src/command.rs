use std::fmt;

use sf_nbt::{Block, CompoundTag, Tag};

use crate::coords::Coordinates;
use crate::execute::ExecuteCommand;
use crate::identifier::Identifier;
use crate::path::NbtPath;
use crate::selector::TargetSelector;

/// One line of the command language.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A line passed through verbatim.
    Raw(String),
    /// `function <id>`
    Function(Identifier),
    /// `schedule function <id> <ticks>t replace|append`
    Schedule {
        /// Function to run later.
        function: Identifier,
        /// Delay in game ticks.
        ticks: u32,
        /// What happens to an already pending schedule.
        mode: ScheduleMode,
    },
    /// `schedule clear <id>`
    ScheduleClear(Identifier),
    /// `data ...`
    Data(DataCommand),
    /// `execute ... run ...`
    Execute(ExecuteCommand),
    /// `setblock <pos> <state> [keep]`
    SetBlock {
        /// Where to place the block.
        pos: Coordinates,
        /// Block state to place.
        block: Block,
        /// Whether an existing non-air block is left alone.
        keep: bool,
    },
    /// `teleport <targets> <destination>`
    Teleport {
        /// Who moves.
        target: TargetSelector,
        /// Where they go.
        destination: Coordinates,
    },
}

impl Command {
    /// A raw command line. A leading `/` and surrounding whitespace are
    /// dropped, and embedded newlines are folded into spaces so the result
    /// stays one line.
    pub fn raw(line: impl AsRef<str>) -> Self {
        let line = line.as_ref().trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let parts: Vec<&str> = line
            .split(['\n', '\r'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        Command::Raw(parts.join(" "))
    }

    /// `function <id>`
    pub fn function(id: Identifier) -> Self {
        Command::Function(id)
    }

    /// `schedule function <id> <ticks>t <mode>`
    pub fn schedule(function: Identifier, ticks: u32, mode: ScheduleMode) -> Self {
        Command::Schedule {
            function,
            ticks,
            mode,
        }
    }

    /// `setblock <pos> <state>`, replacing whatever is there.
    pub fn set_block(pos: Coordinates, block: Block) -> Self {
        Command::SetBlock {
            pos,
            block,
            keep: false,
        }
    }

    /// `teleport <target> <destination>`
    pub fn teleport(target: TargetSelector, destination: Coordinates) -> Self {
        Command::Teleport {
            target,
            destination,
        }
    }

    /// `data merge storage <id> <nbt>`
    pub fn merge_storage(storage: Identifier, nbt: CompoundTag) -> Self {
        Command::Data(DataCommand::Merge {
            target: DataTarget::Storage(storage),
            nbt,
        })
    }

    /// `data modify storage <id> <path> set value <tag>`
    pub fn set_storage(storage: Identifier, path: NbtPath, value: impl Into<Tag>) -> Self {
        Command::Data(DataCommand::Modify {
            target: DataTarget::Storage(storage),
            path,
            op: DataModifyOp::Set,
            source: DataSource::Value(value.into()),
        })
    }
}

impl From<ExecuteCommand> for Command {
    fn from(value: ExecuteCommand) -> Self {
        Command::Execute(value)
    }
}

impl From<DataCommand> for Command {
    fn from(value: DataCommand) -> Self {
        Command::Data(value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Raw(line) => f.write_str(line),
            Command::Function(id) => write!(f, "function {id}"),
            Command::Schedule {
                function,
                ticks,
                mode,
            } => write!(f, "schedule function {function} {ticks}t {mode}"),
            Command::ScheduleClear(id) => write!(f, "schedule clear {id}"),
            Command::Data(data) => write!(f, "{data}"),
            Command::Execute(exec) => write!(f, "{exec}"),
            Command::SetBlock { pos, block, keep } => {
                write!(f, "setblock {pos} {block}")?;
                if *keep {
                    f.write_str(" keep")?;
                }
                Ok(())
            }
            Command::Teleport {
                target,
                destination,
            } => write!(f, "teleport {target} {destination}"),
        }
    }
}

/// How `schedule function` treats an existing schedule of the same function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    /// Drop the pending run and schedule anew.
    Replace,
    /// Keep the pending run and add another.
    Append,
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleMode::Replace => "replace",
            ScheduleMode::Append => "append",
        })
    }
}

// ---------------------------------------------------------------------------
// data
// ---------------------------------------------------------------------------

/// Where a `data` command reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub enum DataTarget {
    /// `block X Y Z`
    Block(Coordinates),
    /// `entity SEL`
    Entity(TargetSelector),
    /// `storage ID`
    Storage(Identifier),
}

impl fmt::Display for DataTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataTarget::Block(pos) => write!(f, "block {pos}"),
            DataTarget::Entity(sel) => write!(f, "entity {sel}"),
            DataTarget::Storage(id) => write!(f, "storage {id}"),
        }
    }
}

/// The operation of `data modify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataModifyOp {
    /// Add to the end of a list.
    Append,
    /// Insert into a list at an index.
    Insert(i32),
    /// Merge into a compound.
    Merge,
    /// Add to the front of a list.
    Prepend,
    /// Replace the value.
    Set,
}

impl fmt::Display for DataModifyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataModifyOp::Append => f.write_str("append"),
            DataModifyOp::Insert(index) => write!(f, "insert {index}"),
            DataModifyOp::Merge => f.write_str("merge"),
            DataModifyOp::Prepend => f.write_str("prepend"),
            DataModifyOp::Set => f.write_str("set"),
        }
    }
}

/// The value side of `data modify`.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// `value <snbt>`
    Value(Tag),
    /// `from <target> [path]`
    From {
        /// Where to copy from.
        target: DataTarget,
        /// Optional path inside the source.
        path: Option<NbtPath>,
    },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Value(tag) => write!(f, "value {tag}"),
            DataSource::From { target, path: None } => write!(f, "from {target}"),
            DataSource::From {
                target,
                path: Some(path),
            } => write!(f, "from {target} {path}"),
        }
    }
}

/// A `data` command.
#[derive(Debug, Clone, PartialEq)]
pub enum DataCommand {
    /// `data get <target> [path] [scale]`
    Get {
        /// What to read.
        target: DataTarget,
        /// Optional path.
        path: Option<NbtPath>,
        /// Optional scale, only meaningful with a path.
        scale: Option<f64>,
    },
    /// `data merge <target> <nbt>`
    Merge {
        /// What to merge into.
        target: DataTarget,
        /// Compound merged into the target.
        nbt: CompoundTag,
    },
    /// `data modify <target> <path> <op> <source>`
    Modify {
        /// What to modify.
        target: DataTarget,
        /// Path inside the target.
        path: NbtPath,
        /// The modification.
        op: DataModifyOp,
        /// Where the new value comes from.
        source: DataSource,
    },
    /// `data remove <target> <path>`
    Remove {
        /// What to remove from.
        target: DataTarget,
        /// Path to remove.
        path: NbtPath,
    },
}

impl fmt::Display for DataCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataCommand::Get {
                target,
                path,
                scale,
            } => {
                write!(f, "data get {target}")?;
                if let Some(path) = path {
                    write!(f, " {path}")?;
                    if let Some(scale) = scale {
                        write!(f, " {scale}")?;
                    }
                }
                Ok(())
            }
            DataCommand::Merge { target, nbt } => write!(f, "data merge {target} {nbt}"),
            DataCommand::Modify {
                target,
                path,
                op,
                source,
            } => write!(f, "data modify {target} {path} {op} {source}"),
            DataCommand::Remove { target, path } => write!(f, "data remove {target} {path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_nbt::BlockPos;

    fn storage() -> Identifier {
        "lobby:timer1".parse().unwrap()
    }

    #[test]
    fn raw_is_one_line() {
        assert_eq!(Command::raw("  /say hi\nthere ").to_string(), "say hi there");
    }

    #[test]
    fn schedule_rendering() {
        let id: Identifier = "lobby:timer1/fire".parse().unwrap();
        assert_eq!(
            Command::schedule(id.clone(), 20, ScheduleMode::Replace).to_string(),
            "schedule function lobby:timer1/fire 20t replace"
        );
        assert_eq!(
            Command::ScheduleClear(id).to_string(),
            "schedule clear lobby:timer1/fire"
        );
    }

    #[test]
    fn setblock_and_teleport_rendering() {
        let lamp = Block::new("minecraft:redstone_lamp").with_property("lit", "true");
        assert_eq!(
            Command::set_block(Coordinates::relative(1.0, 0.0, -2.0), lamp.clone()).to_string(),
            "setblock ~1 ~ ~-2 minecraft:redstone_lamp[lit=true]"
        );
        let keep = Command::SetBlock {
            pos: Coordinates::block(BlockPos::new(4, 64, -3)),
            block: lamp,
            keep: true,
        };
        assert_eq!(keep.to_string(), "setblock 4 64 -3 minecraft:redstone_lamp[lit=true] keep");
        assert_eq!(
            Command::teleport(TargetSelector::all_players(), Coordinates::relative(0.0, 5.0, 0.0))
                .to_string(),
            "teleport @a ~ ~5 ~"
        );
    }

    #[test]
    fn data_merge_storage() {
        let cmd = Command::merge_storage(storage(), CompoundTag::new().with("enabled", true));
        assert_eq!(cmd.to_string(), "data merge storage lobby:timer1 {enabled:1b}");
    }

    #[test]
    fn data_modify_variants() {
        let path = NbtPath::parse("isTouching").unwrap();
        assert_eq!(
            Command::set_storage(storage(), path.clone(), false).to_string(),
            "data modify storage lobby:timer1 isTouching set value 0b"
        );
        let copy = DataCommand::Modify {
            target: DataTarget::Block(Coordinates::block(BlockPos::new(1, 2, 3))),
            path: path.clone(),
            op: DataModifyOp::Insert(0),
            source: DataSource::From {
                target: DataTarget::Entity(TargetSelector::sender()),
                path: Some(path),
            },
        };
        assert_eq!(
            copy.to_string(),
            "data modify block 1 2 3 isTouching insert 0 from entity @s isTouching"
        );
    }

    #[test]
    fn data_get_and_remove() {
        let get = DataCommand::Get {
            target: DataTarget::Storage(storage()),
            path: Some(NbtPath::parse("time").unwrap()),
            scale: Some(0.5),
        };
        assert_eq!(get.to_string(), "data get storage lobby:timer1 time 0.5");
        let remove = DataCommand::Remove {
            target: DataTarget::Storage(storage()),
            path: NbtPath::parse("time").unwrap(),
        };
        assert_eq!(remove.to_string(), "data remove storage lobby:timer1 time");
    }
}
