use std::collections::BTreeMap;
use std::fmt;

/// A single NBT value.
///
/// Rendering through [`fmt::Display`] produces SNBT that
/// [`parse_snbt`](crate::parse_snbt) reads back to an equal tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// Signed 8-bit integer, also used for booleans.
    Byte(i8),
    /// Signed 16-bit integer.
    Short(i16),
    /// Signed 32-bit integer.
    Int(i32),
    /// Signed 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of tags.
    List(Vec<Tag>),
    /// Named child tags.
    Compound(CompoundTag),
    /// Packed byte array.
    ByteArray(Vec<i8>),
    /// Packed int array.
    IntArray(Vec<i32>),
    /// Packed long array.
    LongArray(Vec<i64>),
}

impl Tag {
    /// Booleans are stored as bytes.
    pub fn bool(value: bool) -> Self {
        Tag::Byte(i8::from(value))
    }

    /// Human-readable kind name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Short(_) => "short",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::Float(_) => "float",
            Tag::Double(_) => "double",
            Tag::String(_) => "string",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
            Tag::ByteArray(_) => "byte array",
            Tag::IntArray(_) => "int array",
            Tag::LongArray(_) => "long array",
        }
    }

    /// Borrow the compound payload, if this is a compound.
    pub fn as_compound(&self) -> Option<&CompoundTag> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    /// Widen any integer tag to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Byte(v) => Some(i64::from(*v)),
            Tag::Short(v) => Some(i64::from(*v)),
            Tag::Int(v) => Some(i64::from(*v)),
            Tag::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for Tag {
    fn from(value: bool) -> Self {
        Tag::bool(value)
    }
}

impl From<i32> for Tag {
    fn from(value: i32) -> Self {
        Tag::Int(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::String(value)
    }
}

impl From<CompoundTag> for Tag {
    fn from(value: CompoundTag) -> Self {
        Tag::Compound(value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Byte(v) => write!(f, "{v}b"),
            Tag::Short(v) => write!(f, "{v}s"),
            Tag::Int(v) => write!(f, "{v}"),
            Tag::Long(v) => write!(f, "{v}L"),
            Tag::Float(v) => write!(f, "{v}f"),
            Tag::Double(v) => write!(f, "{v}d"),
            Tag::String(s) => write_quoted(f, s),
            Tag::List(items) => {
                f.write_str("[")?;
                write_joined(f, items.iter(), |f, t| write!(f, "{t}"))?;
                f.write_str("]")
            }
            Tag::Compound(c) => write!(f, "{c}"),
            Tag::ByteArray(items) => {
                f.write_str("[B;")?;
                write_joined(f, items.iter(), |f, v| write!(f, "{v}b"))?;
                f.write_str("]")
            }
            Tag::IntArray(items) => {
                f.write_str("[I;")?;
                write_joined(f, items.iter(), |f, v| write!(f, "{v}"))?;
                f.write_str("]")
            }
            Tag::LongArray(items) => {
                f.write_str("[L;")?;
                write_joined(f, items.iter(), |f, v| write!(f, "{v}L"))?;
                f.write_str("]")
            }
        }
    }
}

fn write_joined<T>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
    mut each: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        each(f, item)?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("\"")
}

/// Keys made only of these characters are written without quotes.
pub(crate) fn is_bare_word(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

// ---------------------------------------------------------------------------
// Compound
// ---------------------------------------------------------------------------

/// A compound tag. Keys are kept sorted so rendering is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundTag(BTreeMap<String, Tag>);

impl CompoundTag {
    /// An empty compound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Tag>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tag>) -> Option<Tag> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a child tag.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.get(key)
    }

    /// Remove a child tag.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.0.remove(key)
    }

    /// Whether a child exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the compound has no children.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Children in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into `self`. Nested compounds merge recursively; every
    /// other tag kind is replaced.
    pub fn merge(&mut self, other: &CompoundTag) {
        for (key, value) in &other.0 {
            match (self.0.get_mut(key), value) {
                (Some(Tag::Compound(existing)), Tag::Compound(incoming)) => {
                    existing.merge(incoming);
                }
                _ => {
                    self.0.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

impl FromIterator<(String, Tag)> for CompoundTag {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CompoundTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        write_joined(f, self.0.iter(), |f, (key, value)| {
            if is_bare_word(key) {
                f.write_str(key)?;
            } else {
                write_quoted(f, key)?;
            }
            write!(f, ":{value}")
        })?;
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_rendering() {
        assert_eq!(Tag::Byte(1).to_string(), "1b");
        assert_eq!(Tag::Short(-2).to_string(), "-2s");
        assert_eq!(Tag::Int(3).to_string(), "3");
        assert_eq!(Tag::Long(4).to_string(), "4L");
        assert_eq!(Tag::Float(1.5).to_string(), "1.5f");
        assert_eq!(Tag::Double(2.5).to_string(), "2.5d");
        assert_eq!(Tag::bool(false).to_string(), "0b");
    }

    #[test]
    fn strings_are_quoted_and_escaped() {
        let tag = Tag::from("say \"hi\" \\o/");
        assert_eq!(tag.to_string(), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn compound_keys_sorted() {
        let c = CompoundTag::new()
            .with("isTouching", false)
            .with("isDisabled", true);
        assert_eq!(c.to_string(), "{isDisabled:1b,isTouching:0b}");
    }

    #[test]
    fn odd_keys_are_quoted() {
        let c = CompoundTag::new().with("with space", 1);
        assert_eq!(c.to_string(), r#"{"with space":1}"#);
    }

    #[test]
    fn arrays_render_with_prefix() {
        assert_eq!(Tag::ByteArray(vec![1, 2]).to_string(), "[B;1b,2b]");
        assert_eq!(Tag::IntArray(vec![]).to_string(), "[I;]");
        assert_eq!(Tag::LongArray(vec![7]).to_string(), "[L;7L]");
    }

    #[test]
    fn merge_is_recursive() {
        let mut base = CompoundTag::new()
            .with("a", 1)
            .with("nested", CompoundTag::new().with("x", 1).with("y", 2));
        let patch = CompoundTag::new()
            .with("b", 2)
            .with("nested", CompoundTag::new().with("y", 3));
        base.merge(&patch);

        assert_eq!(base.get("a"), Some(&Tag::Int(1)));
        assert_eq!(base.get("b"), Some(&Tag::Int(2)));
        let nested = base.get("nested").and_then(Tag::as_compound).unwrap();
        assert_eq!(nested.get("x"), Some(&Tag::Int(1)));
        assert_eq!(nested.get("y"), Some(&Tag::Int(3)));
    }
}
