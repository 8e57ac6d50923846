use std::fmt;

use sf_nbt::{Block, CompoundTag, parse_compound};

use crate::error::{CoreError, CoreResult};
use crate::node::Node;
use crate::texture::BlockTexture;
use crate::types::TypeRegistry;
use crate::vector::Vec3;

/// Child element that carries SNBT text.
pub const NBT_TAG: &str = "nbt";

/// A typed value owned by an entity.
///
/// Every variant owns its data outright, so `clone()` is always a deep,
/// independent copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// `int_attribute`
    Int(i32),
    /// `long_attribute`
    Long(i64),
    /// `float_attribute`
    Float(f32),
    /// `double_attribute`
    Double(f64),
    /// `bool_attribute`
    Bool(bool),
    /// `string_attribute`
    String(String),
    /// `vector_attribute`
    Vector(Vec3),
    /// `entity_attribute`: the name of another entity.
    Entity(String),
    /// `enum_attribute`: a value of a registered enum class.
    Enum {
        /// Registered class name.
        class: String,
        /// One of the class's values.
        value: String,
    },
    /// `block_attribute`
    Block(Block),
    /// `nbt_attribute`
    Nbt(CompoundTag),
    /// `block_texture_attribute`
    Texture(BlockTexture),
    /// `list_attribute`
    List(Vec<Attribute>),
    /// An attribute of an unregistered type, kept verbatim so it survives a
    /// load and save.
    Any(Node),
}

/// Creates and reads one attribute type.
#[derive(Debug, Clone, Copy)]
pub struct AttributeFactory {
    /// Default instance.
    pub create: fn() -> Attribute,
    /// Read an instance from its node.
    pub deserialize: fn(&Node, &TypeRegistry) -> CoreResult<Attribute>,
}

impl Attribute {
    /// Registry name of this attribute's type.
    pub fn type_name(&self) -> &str {
        match self {
            Attribute::Int(_) => "int_attribute",
            Attribute::Long(_) => "long_attribute",
            Attribute::Float(_) => "float_attribute",
            Attribute::Double(_) => "double_attribute",
            Attribute::Bool(_) => "bool_attribute",
            Attribute::String(_) => "string_attribute",
            Attribute::Vector(_) => "vector_attribute",
            Attribute::Entity(_) => "entity_attribute",
            Attribute::Enum { .. } => "enum_attribute",
            Attribute::Block(_) => "block_attribute",
            Attribute::Nbt(_) => "nbt_attribute",
            Attribute::Texture(_) => "block_texture_attribute",
            Attribute::List(_) => "list_attribute",
            Attribute::Any(node) => &node.tag,
        }
    }

    /// Encode as a tree node tagged with the type name.
    pub fn serialize(&self) -> Node {
        let node = Node::new(self.type_name());
        match self {
            Attribute::Int(v) => node.with_attr("value", v),
            Attribute::Long(v) => node.with_attr("value", v),
            Attribute::Float(v) => node.with_attr("value", v),
            Attribute::Double(v) => node.with_attr("value", v),
            Attribute::Bool(v) => node.with_attr("value", v),
            Attribute::String(v) => node.with_attr("value", v),
            Attribute::Vector(v) => node
                .with_attr("x", v.x)
                .with_attr("y", v.y)
                .with_attr("z", v.z),
            Attribute::Entity(target) => node.with_attr("target", target),
            Attribute::Enum { class, value } => {
                node.with_attr("enum_class", class).with_attr("value", value)
            }
            Attribute::Block(block) => node
                .with_attr("block_name", block.name())
                .with_child(Node::new(NBT_TAG).with_text(block.properties().to_string())),
            Attribute::Nbt(nbt) => node.with_child(Node::new(NBT_TAG).with_text(nbt.to_string())),
            Attribute::Texture(texture) => node.with_child(texture.serialize()),
            Attribute::List(items) => items
                .iter()
                .fold(node, |node, item| node.with_child(item.serialize())),
            Attribute::Any(original) => original.clone(),
        }
    }

    /// The integer value of `Int` and in-range `Long` attributes.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Attribute::Int(v) => Some(*v),
            Attribute::Long(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// The value of a `Bool` attribute.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Attribute::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The value of a `String` attribute.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attribute::String(v) => Some(v),
            _ => None,
        }
    }

    /// The value of a `Vector` attribute.
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Attribute::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// The target of an `Entity` attribute.
    pub fn as_entity_ref(&self) -> Option<&str> {
        match self {
            Attribute::Entity(v) => Some(v),
            _ => None,
        }
    }

    /// The value name of an `Enum` attribute.
    pub fn as_enum_value(&self) -> Option<&str> {
        match self {
            Attribute::Enum { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The value of a `Block` attribute.
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Attribute::Block(v) => Some(v),
            _ => None,
        }
    }

    /// The value of an `Nbt` attribute.
    pub fn as_nbt(&self) -> Option<&CompoundTag> {
        match self {
            Attribute::Nbt(v) => Some(v),
            _ => None,
        }
    }

    /// The value of a `Texture` attribute.
    pub fn as_texture(&self) -> Option<&BlockTexture> {
        match self {
            Attribute::Texture(v) => Some(v),
            _ => None,
        }
    }

    /// The items of a `List` attribute.
    pub fn as_list(&self) -> Option<&[Attribute]> {
        match self {
            Attribute::List(v) => Some(v),
            _ => None,
        }
    }

    /// Replace every entity reference equal to `old` with `new`, recursing
    /// into lists. Returns the number of references changed.
    pub fn rename_references(&mut self, old: &str, new: &str) -> usize {
        match self {
            Attribute::Entity(target) if target == old => {
                *target = new.to_string();
                1
            }
            Attribute::List(items) => items
                .iter_mut()
                .map(|item| item.rename_references(old, new))
                .sum(),
            _ => 0,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Int(v) => write!(f, "{v}"),
            Attribute::Long(v) => write!(f, "{v}L"),
            Attribute::Float(v) => write!(f, "{v}f"),
            Attribute::Double(v) => write!(f, "{v}d"),
            Attribute::Bool(v) => write!(f, "{v}"),
            Attribute::String(v) => write!(f, "{v:?}"),
            Attribute::Vector(v) => write!(f, "{v}"),
            Attribute::Entity(v) => write!(f, "ref: {v}"),
            Attribute::Enum { class, value } => write!(f, "{class}::{value}"),
            Attribute::Block(b) => write!(f, "{}", b.state_string()),
            Attribute::Nbt(n) => write!(f, "{n}"),
            Attribute::Texture(BlockTexture::Single(b)) => write!(f, "{}", b.state_string()),
            Attribute::Texture(BlockTexture::Noise { seed, blocks, .. }) => {
                write!(f, "noise({seed}, {} blocks)", blocks.len())
            }
            Attribute::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Attribute::Any(node) => write!(f, "<{}>", node.tag),
        }
    }
}

impl From<i32> for Attribute {
    fn from(v: i32) -> Self {
        Attribute::Int(v)
    }
}

impl From<bool> for Attribute {
    fn from(v: bool) -> Self {
        Attribute::Bool(v)
    }
}

impl From<&str> for Attribute {
    fn from(v: &str) -> Self {
        Attribute::String(v.to_string())
    }
}

impl From<String> for Attribute {
    fn from(v: String) -> Self {
        Attribute::String(v)
    }
}

impl From<Vec3> for Attribute {
    fn from(v: Vec3) -> Self {
        Attribute::Vector(v)
    }
}

impl From<Block> for Attribute {
    fn from(v: Block) -> Self {
        Attribute::Block(v)
    }
}

impl From<BlockTexture> for Attribute {
    fn from(v: BlockTexture) -> Self {
        Attribute::Texture(v)
    }
}

impl From<CompoundTag> for Attribute {
    fn from(v: CompoundTag) -> Self {
        Attribute::Nbt(v)
    }
}

// ---------------------------------------------------------------------------
// Built-in factories
// ---------------------------------------------------------------------------

fn read_nbt(node: &Node, required: bool) -> CoreResult<CompoundTag> {
    let malformed = |message: String| CoreError::MalformedNbt {
        tag: node.tag.clone(),
        message,
    };
    match node.child(NBT_TAG) {
        Some(child) => {
            let text = child.text.as_deref().unwrap_or("{}");
            parse_compound(text).map_err(|e| malformed(e.to_string()))
        }
        None if required => Err(malformed("missing <nbt> child".to_string())),
        None => Ok(CompoundTag::new()),
    }
}

fn read_enum(node: &Node, registry: &TypeRegistry) -> CoreResult<Attribute> {
    let class = node.required_attr("enum_class")?;
    let value = node.required_attr("value")?;
    let known = registry
        .enum_values(class)
        .is_some_and(|values| values.iter().any(|v| v == value));
    if !known {
        return Err(CoreError::UnknownEnum {
            class: class.to_string(),
            value: value.to_string(),
        });
    }
    Ok(Attribute::Enum {
        class: class.to_string(),
        value: value.to_string(),
    })
}

/// Factories for every built-in attribute type, keyed by registry name.
pub fn builtin_factories() -> Vec<(&'static str, AttributeFactory)> {
    vec![
        (
            "int_attribute",
            AttributeFactory {
                create: || Attribute::Int(0),
                deserialize: |n, _| Ok(Attribute::Int(n.parse_attr("value")?)),
            },
        ),
        (
            "long_attribute",
            AttributeFactory {
                create: || Attribute::Long(0),
                deserialize: |n, _| Ok(Attribute::Long(n.parse_attr("value")?)),
            },
        ),
        (
            "float_attribute",
            AttributeFactory {
                create: || Attribute::Float(0.0),
                deserialize: |n, _| Ok(Attribute::Float(n.parse_attr("value")?)),
            },
        ),
        (
            "double_attribute",
            AttributeFactory {
                create: || Attribute::Double(0.0),
                deserialize: |n, _| Ok(Attribute::Double(n.parse_attr("value")?)),
            },
        ),
        (
            "bool_attribute",
            AttributeFactory {
                create: || Attribute::Bool(false),
                deserialize: |n, _| Ok(Attribute::Bool(n.parse_attr("value")?)),
            },
        ),
        (
            "string_attribute",
            AttributeFactory {
                create: || Attribute::String(String::new()),
                deserialize: |n, _| Ok(Attribute::String(n.attr("value").unwrap_or("").to_string())),
            },
        ),
        (
            "vector_attribute",
            AttributeFactory {
                create: || Attribute::Vector(Vec3::default()),
                deserialize: |n, _| {
                    Ok(Attribute::Vector(Vec3::new(
                        n.parse_attr("x")?,
                        n.parse_attr("y")?,
                        n.parse_attr("z")?,
                    )))
                },
            },
        ),
        (
            "entity_attribute",
            AttributeFactory {
                create: || Attribute::Entity(String::new()),
                deserialize: |n, _| Ok(Attribute::Entity(n.attr("target").unwrap_or("").to_string())),
            },
        ),
        (
            "enum_attribute",
            AttributeFactory {
                create: || Attribute::Enum {
                    class: "placeholder".to_string(),
                    value: "value1".to_string(),
                },
                deserialize: read_enum,
            },
        ),
        (
            "block_attribute",
            AttributeFactory {
                create: || Attribute::Block(Block::new("minecraft:stone")),
                deserialize: |n, _| {
                    let name = n.required_attr("block_name")?;
                    Ok(Attribute::Block(
                        Block::new(name).with_properties(read_nbt(n, false)?),
                    ))
                },
            },
        ),
        (
            "nbt_attribute",
            AttributeFactory {
                create: || Attribute::Nbt(CompoundTag::new()),
                deserialize: |n, _| Ok(Attribute::Nbt(read_nbt(n, true)?)),
            },
        ),
        (
            "block_texture_attribute",
            AttributeFactory {
                create: || Attribute::Texture(BlockTexture::default()),
                deserialize: |n, registry| {
                    let inner = n
                        .children
                        .first()
                        .ok_or_else(|| CoreError::malformed(&n.tag, "missing texture"))?;
                    Ok(Attribute::Texture(BlockTexture::deserialize(inner, registry)?))
                },
            },
        ),
        (
            "list_attribute",
            AttributeFactory {
                create: || Attribute::List(Vec::new()),
                deserialize: |n, registry| {
                    let items = n
                        .children
                        .iter()
                        .map(|child| registry.deserialize_attribute(child))
                        .collect::<CoreResult<Vec<_>>>()?;
                    Ok(Attribute::List(items))
                },
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sf_nbt::Tag;

    fn registry() -> TypeRegistry {
        let mut r = TypeRegistry::new();
        r.register_enum("scope", ["players", "entities"]);
        r
    }

    fn round_trip(attr: &Attribute) -> Attribute {
        registry().deserialize_attribute(&attr.serialize()).unwrap()
    }

    #[test]
    fn defaults_round_trip() {
        let r = registry();
        for name in r.attribute_types().collect::<Vec<_>>() {
            let attr = r.create_attribute(name);
            assert_eq!(round_trip(&attr), attr, "{name}");
        }
    }

    #[test]
    fn block_and_nbt_round_trip() {
        let block = Attribute::Block(
            Block::new("minecraft:oak_door")
                .with_property("half", "upper")
                .with_property("open", "false"),
        );
        assert_eq!(round_trip(&block), block);
        let nbt = Attribute::Nbt(
            CompoundTag::new()
                .with("Items", Tag::List(vec![Tag::Int(1), Tag::Int(2)]))
                .with("CustomName", "\"Chest\""),
        );
        assert_eq!(round_trip(&nbt), nbt);
    }

    #[test]
    fn enum_round_trip_and_validation() {
        let attr = Attribute::Enum {
            class: "scope".into(),
            value: "entities".into(),
        };
        assert_eq!(round_trip(&attr), attr);
        let bad = Node::new("enum_attribute")
            .with_attr("enum_class", "scope")
            .with_attr("value", "robots");
        assert!(matches!(
            registry().deserialize_attribute(&bad),
            Err(CoreError::UnknownEnum { .. })
        ));
    }

    #[test]
    fn malformed_nbt_is_a_hard_error() {
        let broken = Node::new("nbt_attribute").with_child(Node::new(NBT_TAG).with_text("{a:"));
        assert!(matches!(
            registry().deserialize_attribute(&broken),
            Err(CoreError::MalformedNbt { .. })
        ));
        let missing = Node::new("nbt_attribute");
        assert!(matches!(
            registry().deserialize_attribute(&missing),
            Err(CoreError::MalformedNbt { .. })
        ));
    }

    #[test]
    fn unknown_types_survive_verbatim() {
        let node = Node::new("plugin_attribute").with_attr("color", "red");
        let attr = registry().deserialize_attribute(&node).unwrap();
        assert_eq!(attr, Attribute::Any(node.clone()));
        assert_eq!(attr.serialize(), node);
        assert_eq!(attr.type_name(), "plugin_attribute");
    }

    #[test]
    fn clones_are_independent() {
        let original = Attribute::List(vec![Attribute::Nbt(CompoundTag::new().with("a", 1))]);
        let mut copy = original.clone();
        if let Attribute::List(items) = &mut copy {
            items.push(Attribute::Int(3));
            if let Attribute::Nbt(nbt) = &mut items[0] {
                nbt.insert("b", 2);
            }
        }
        assert_eq!(
            original,
            Attribute::List(vec![Attribute::Nbt(CompoundTag::new().with("a", 1))])
        );
    }

    #[test]
    fn rename_references_recurses() {
        let mut attr = Attribute::List(vec![
            Attribute::Entity("door".into()),
            Attribute::Entity("other".into()),
            Attribute::List(vec![Attribute::Entity("door".into())]),
        ]);
        assert_eq!(attr.rename_references("door", "gate"), 2);
        assert_eq!(
            attr.as_list().and_then(|l| l[0].as_entity_ref()),
            Some("gate")
        );
    }

    fn arb_scalar() -> impl Strategy<Value = Attribute> {
        prop_oneof![
            any::<i32>().prop_map(Attribute::Int),
            any::<i64>().prop_map(Attribute::Long),
            (-1.0e6f32..1.0e6).prop_map(Attribute::Float),
            (-1.0e12f64..1.0e12).prop_map(Attribute::Double),
            any::<bool>().prop_map(Attribute::Bool),
            "[ -~]{0,12}".prop_map(Attribute::String),
            "[a-z_]{0,8}".prop_map(Attribute::Entity),
            (-1000.0f32..1000.0, 0.0f32..256.0, -1000.0f32..1000.0)
                .prop_map(|(x, y, z)| Attribute::Vector(Vec3::new(x, y, z))),
            ("[a-z_]{1,8}", any::<i32>()).prop_map(|(k, v)| {
                Attribute::Nbt(CompoundTag::new().with(k, v))
            }),
            ("[a-z_]{1,8}", "[a-z]{1,5}").prop_map(|(name, prop)| {
                Attribute::Block(Block::new(format!("minecraft:{name}")).with_property("p", prop))
            }),
            (any::<i64>(), 0.01f64..10.0, prop::collection::vec("[a-z_]{1,8}", 0..4)).prop_map(
                |(seed, scale, names)| {
                    Attribute::Texture(BlockTexture::Noise {
                        seed,
                        scale,
                        blocks: names.into_iter().map(Block::new).collect(),
                    })
                }
            ),
        ]
    }

    fn arb_attribute() -> impl Strategy<Value = Attribute> {
        arb_scalar().prop_recursive(2, 12, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Attribute::List)
        })
    }

    proptest! {
        #[test]
        fn serialize_then_deserialize_is_identity(attr in arb_attribute()) {
            prop_assert_eq!(round_trip(&attr), attr);
        }
    }
}
