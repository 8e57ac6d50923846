use std::fmt;
use std::str::FromStr;

use crate::error::{CommandError, CommandResult};

/// A validated target selector: `@a`, `@e[type=pig]`, or a player name.
///
/// The argument list inside `[...]` is kept as written; only its bracket and
/// quote balance is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSelector(String);

impl TargetSelector {
    /// `@s`, the executing entity.
    pub fn sender() -> Self {
        Self("@s".to_string())
    }

    /// `@a`, every player.
    pub fn all_players() -> Self {
        Self("@a".to_string())
    }

    /// `@e`, every entity.
    pub fn all_entities() -> Self {
        Self("@e".to_string())
    }

    /// `@p`, the nearest player.
    pub fn nearest_player() -> Self {
        Self("@p".to_string())
    }

    /// Validate selector text.
    pub fn parse(text: &str) -> CommandResult<Self> {
        let text = text.trim();
        let invalid = || CommandError::InvalidSelector(text.to_string());
        if let Some(rest) = text.strip_prefix('@') {
            let mut chars = rest.chars();
            if !matches!(chars.next(), Some('a' | 'e' | 'p' | 'r' | 's')) {
                return Err(invalid());
            }
            let args = chars.as_str();
            if args.is_empty() {
                return Ok(Self(text.to_string()));
            }
            if args.starts_with('[') && single_group(args) {
                return Ok(Self(text.to_string()));
            }
            return Err(invalid());
        }
        let player = !text.is_empty()
            && text.len() <= 16
            && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if player {
            Ok(Self(text.to_string()))
        } else {
            Err(invalid())
        }
    }

    /// The rendered selector.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `text` is one bracketed group: brackets balance, and the opening
/// bracket closes on the last character.
fn single_group(text: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let last = text.len().saturating_sub(1);
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                c if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth < 0 || (depth == 0 && i != last) {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && quote.is_none()
}

impl FromStr for TargetSelector {
    type Err = CommandError;

    fn from_str(s: &str) -> CommandResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
