//! SNBT is the text form of NBT used inside commands and level files.
//!
//! Lexing is done with `logos`, parsing with `chumsky`. Both stages report
//! byte spans so callers can render precise diagnostics.

/// Token definitions and the lexer.
pub mod lexer;
/// The SNBT grammar.
pub mod parser;

use std::fmt;

use crate::error::{NbtError, NbtResult};
use crate::tag::{CompoundTag, Tag};

/// A lex or parse problem with its byte range in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct SnbtError {
    /// Byte range of the offending input.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for SnbtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

/// Parse SNBT text into a tag.
pub fn parse_snbt(source: &str) -> NbtResult<Tag> {
    let (tokens, lex_errors) = lexer::lex(source);
    if !lex_errors.is_empty() {
        return Err(NbtError::Snbt(lex_errors));
    }
    parser::parse(&tokens).map_err(NbtError::Snbt)
}

/// Parse SNBT text that must describe a compound.
pub fn parse_compound(source: &str) -> NbtResult<CompoundTag> {
    match parse_snbt(source)? {
        Tag::Compound(c) => Ok(c),
        other => Err(NbtError::NotCompound(other.kind_name())),
    }
}
