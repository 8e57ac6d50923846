use std::fmt;
use std::str::FromStr;

use sf_nbt::CompoundTag;

use crate::error::{CommandError, CommandResult};

/// An NBT path such as `Inventory[0].tag` or `isTouching`.
///
/// Only structure is checked: non-empty, no bare whitespace, balanced
/// brackets and quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NbtPath(String);

impl NbtPath {
    /// Validate path text.
    pub fn parse(text: &str) -> CommandResult<Self> {
        let invalid = || CommandError::InvalidNbtPath(text.to_string());
        if text.is_empty() {
            return Err(invalid());
        }
        let mut depth = 0i32;
        let mut quoted = false;
        let mut escaped = false;
        for c in text.chars() {
            if quoted {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => quoted = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => quoted = true,
                '[' | '{' => depth += 1,
                ']' | '}' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(invalid());
                    }
                }
                c if c.is_whitespace() && depth == 0 => return Err(invalid()),
                _ => {}
            }
        }
        if depth != 0 || quoted {
            return Err(invalid());
        }
        Ok(Self(text.to_string()))
    }

    /// A root path that matches when the compound is a subset of the data.
    pub fn matching(filter: &CompoundTag) -> Self {
        Self(filter.to_string())
    }

    /// The path text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for NbtPath {
    type Err = CommandError;

    fn from_str(s: &str) -> CommandResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for NbtPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// An inclusive integer range as used by `matches`: `3`, `1..5`, `..0`, `10..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    min: Option<i32>,
    max: Option<i32>,
}

impl IntRange {
    /// A range with optional bounds. Reversed bounds are rejected.
    pub fn new(min: Option<i32>, max: Option<i32>) -> CommandResult<Self> {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => Err(CommandError::InvalidRange { min: lo, max: hi }),
            _ => Ok(Self { min, max }),
        }
    }

    /// Exactly one value.
    pub fn exactly(value: i32) -> Self {
        Self {
            min: Some(value),
            max: Some(value),
        }
    }

    /// `value..`
    pub fn at_least(value: i32) -> Self {
        Self {
            min: Some(value),
            max: None,
        }
    }

    /// `..value`
    pub fn at_most(value: i32) -> Self {
        Self {
            min: None,
            max: Some(value),
        }
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{lo}"),
            (Some(lo), Some(hi)) => write!(f, "{lo}..{hi}"),
            (Some(lo), None) => write!(f, "{lo}.."),
            (None, Some(hi)) => write!(f, "..{hi}"),
            (None, None) => f.write_str(".."),
        }
    }
}
