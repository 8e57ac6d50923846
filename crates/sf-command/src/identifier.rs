use std::fmt;
use std::str::FromStr;

use crate::error::{CommandError, CommandResult};

/// A namespaced identifier such as `minecraft:stone` or `lobby:door/open`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    namespace: String,
    path: String,
}

fn namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.')
}

fn path_char(c: char) -> bool {
    namespace_char(c) || c == '/'
}

impl Identifier {
    /// Build an identifier from validated parts.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> CommandResult<Self> {
        let namespace = namespace.into();
        let path = path.into();
        let valid = !namespace.is_empty()
            && !path.is_empty()
            && namespace.chars().all(namespace_char)
            && path.chars().all(path_char)
            && !path.starts_with('/')
            && !path.ends_with('/')
            && !path.contains("//");
        if valid {
            Ok(Self { namespace, path })
        } else {
            Err(CommandError::InvalidIdentifier(format!("{namespace}:{path}")))
        }
    }

    /// The `minecraft` namespace, used when an identifier has none.
    pub fn minecraft(path: impl Into<String>) -> CommandResult<Self> {
        Self::new("minecraft", path)
    }

    /// Namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Path part.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// A nested identifier: `ns:path` + `seg` = `ns:path/seg`.
    pub fn child(&self, segment: &str) -> CommandResult<Self> {
        Self::new(self.namespace.clone(), format!("{}/{segment}", self.path))
    }
}

/// Turn free text into a valid identifier segment: lowercase, whitespace
/// removed, any other disallowed character replaced by `_`.
pub fn sanitize_segment(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .map(|c| if namespace_char(c) { c } else { '_' })
        .collect()
}

impl FromStr for Identifier {
    type Err = CommandError;

    fn from_str(s: &str) -> CommandResult<Self> {
        match s.split_once(':') {
            Some((ns, path)) => Self::new(ns, path),
            None => Self::minecraft(s),
        }
        .map_err(|_| CommandError::InvalidIdentifier(s.to_string()))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_with_and_without_namespace() {
        let id: Identifier = "lobby:door/open".parse().unwrap();
        assert_eq!(id.namespace(), "lobby");
        assert_eq!(id.path(), "door/open");
        assert_eq!("stone".parse::<Identifier>().unwrap().to_string(), "minecraft:stone");
    }

    #[test]
    fn rejects_uppercase_and_empty_parts() {
        assert!("Lobby:door".parse::<Identifier>().is_err());
        assert!("lobby:".parse::<Identifier>().is_err());
        assert!(":door".parse::<Identifier>().is_err());
        assert!("lobby:a//b".parse::<Identifier>().is_err());
        assert!("lobby:has space".parse::<Identifier>().is_err());
    }

    #[test]
    fn child_appends_segment() {
        let id = Identifier::new("lobby", "relay1").unwrap();
        assert_eq!(id.child("trigger").unwrap().to_string(), "lobby:relay1/trigger");
    }

    #[test]
    fn sanitize_lowercases_and_strips_whitespace() {
        assert_eq!(sanitize_segment("My Level"), "mylevel");
        assert_eq!(sanitize_segment("Door #2"), "door_2");
    }

    proptest! {
        #[test]
        fn sanitized_segments_are_valid_paths(text in "\\PC{1,24}") {
            let segment = sanitize_segment(&text);
            prop_assume!(!segment.is_empty());
            let id = Identifier::new("lobby", segment.clone()).unwrap();
            prop_assert_eq!(id.path(), segment.as_str());
        }
    }
}
