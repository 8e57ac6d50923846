use std::collections::BTreeMap;

use crate::attribute::Attribute;
use crate::vector::Vec3;

/// Name of the attribute every entity carries.
pub const POSITION: &str = "position";

/// One declared attribute of an entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Attribute name.
    pub name: String,
    /// Value a new entity starts with.
    pub default: Attribute,
}

/// The ordered attribute declarations of an entity kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// A schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema holding only the `position` field.
    pub fn entity() -> Self {
        Self::new().field(POSITION, Vec3::default())
    }

    /// Declare a field. Redeclaring a name replaces its default in place.
    pub fn field(mut self, name: impl Into<String>, default: impl Into<Attribute>) -> Self {
        let name = name.into();
        let default = default.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.default = default,
            None => self.fields.push(Field { name, default }),
        }
        self
    }

    /// Default for a field.
    pub fn default_of(&self, name: &str) -> Option<&Attribute> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.default)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Every default, keyed by name.
    pub fn defaults(&self) -> BTreeMap<String, Attribute> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_schema_has_position() {
        let s = Schema::entity().field("time", 20);
        assert_eq!(s.fields()[0].name, POSITION);
        assert_eq!(s.default_of("time"), Some(&Attribute::Int(20)));
    }

    #[test]
    fn redeclaring_keeps_order() {
        let s = Schema::new().field("a", 1).field("b", 2).field("a", 3);
        let names: Vec<_> = s.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(s.default_of("a"), Some(&Attribute::Int(3)));
    }
}
