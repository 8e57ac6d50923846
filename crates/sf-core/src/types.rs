use std::sync::Arc;

use crate::attribute::{Attribute, AttributeFactory, builtin_factories};
use crate::error::CoreResult;
use crate::kind::{EntityKind, UnknownKind};
use crate::node::Node;
use crate::registry::Registry;

/// Every attribute type, entity kind and enum class known to a session.
///
/// Built once at startup and passed by reference to whatever needs to create
/// or read entities.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    attributes: Registry<AttributeFactory>,
    entities: Registry<Arc<dyn EntityKind>>,
    enums: Registry<Vec<String>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            attributes: Registry::new("attribute type"),
            entities: Registry::new("entity type"),
            enums: Registry::new("enum class"),
        }
    }

    /// A registry holding the built-in attribute types and no entity kinds.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, factory) in builtin_factories() {
            registry.register_attribute(name, factory);
        }
        registry.register_enum("placeholder", ["value1", "value2"]);
        registry
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register an attribute type.
    pub fn register_attribute(&mut self, name: &str, factory: AttributeFactory) {
        self.attributes.register(name, factory);
    }

    /// Register an entity kind under its own type name.
    pub fn register_entity(&mut self, kind: Arc<dyn EntityKind>) {
        self.entities.register(kind.type_name().to_string(), kind);
    }

    /// Register an enum class and its values.
    pub fn register_enum<I, S>(&mut self, class: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums
            .register(class, values.into_iter().map(Into::into).collect());
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    /// Default instance of an attribute type. Unknown types yield an empty
    /// [`Attribute::Any`].
    pub fn create_attribute(&self, name: &str) -> Attribute {
        match self.attributes.lookup(name) {
            Some(factory) => (factory.create)(),
            None => Attribute::Any(Node::new(name)),
        }
    }

    /// Read an attribute from its node. Unknown types are kept verbatim as
    /// [`Attribute::Any`]; malformed known types are errors.
    pub fn deserialize_attribute(&self, node: &Node) -> CoreResult<Attribute> {
        match self.attributes.lookup(&node.tag) {
            Some(factory) => (factory.deserialize)(node, self),
            None => Ok(Attribute::Any(node.clone())),
        }
    }

    /// Registered attribute type names.
    pub fn attribute_types(&self) -> impl Iterator<Item = &str> {
        self.attributes.names()
    }

    // -----------------------------------------------------------------------
    // Entities and enums
    // -----------------------------------------------------------------------

    /// The kind registered for a type name. Unknown names yield an
    /// [`UnknownKind`] carrying the name.
    pub fn entity_kind(&self, name: &str) -> Arc<dyn EntityKind> {
        match self.entities.lookup(name) {
            Some(kind) => Arc::clone(kind),
            None => Arc::new(UnknownKind::new(name)),
        }
    }

    /// Whether an entity type is registered.
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains(name)
    }

    /// Registered entity kinds in name order.
    pub fn entity_kinds(&self) -> impl Iterator<Item = &Arc<dyn EntityKind>> {
        self.entities.iter().map(|(_, kind)| kind)
    }

    /// Values of an enum class.
    pub fn enum_values(&self, class: &str) -> Option<&[String]> {
        self.enums.get(class).map(Vec::as_slice)
    }

    /// Registered enum classes with their values, in class order.
    pub fn enums(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.enums.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Marker;

    impl EntityKind for Marker {
        fn type_name(&self) -> &str {
            "marker"
        }
    }

    #[test]
    fn builtin_attribute_types() {
        let r = TypeRegistry::new();
        let names: Vec<_> = r.attribute_types().collect();
        assert_eq!(names.len(), 13);
        assert!(names.contains(&"vector_attribute"));
        assert!(names.contains(&"block_texture_attribute"));
        assert_eq!(r.create_attribute("int_attribute"), Attribute::Int(0));
    }

    #[test]
    fn unknown_attribute_type_falls_back() {
        let r = TypeRegistry::new();
        assert_eq!(
            r.create_attribute("mystery"),
            Attribute::Any(Node::new("mystery"))
        );
    }

    #[test]
    fn unknown_entity_type_falls_back() {
        let mut r = TypeRegistry::new();
        r.register_entity(Arc::new(Marker));
        assert!(r.has_entity("marker"));
        assert_eq!(r.entity_kind("marker").type_name(), "marker");
        let fallback = r.entity_kind("plugin_thing");
        assert_eq!(fallback.type_name(), "plugin_thing");
        assert!(!fallback.is_spatial());
    }

    #[test]
    fn enums_register_values() {
        let mut r = TypeRegistry::new();
        r.register_enum("scope", ["players", "entities"]);
        assert_eq!(
            r.enum_values("scope"),
            Some(&["players".to_string(), "entities".to_string()][..])
        );
        assert!(r.enum_values("nope").is_none());
    }
}
