//! Level files: the level and its entities as a [`Node`] tree stored as JSON.
//!
//! ```text
//! level name=.. pretty_name=.. description=..
//! ├── level_data        (SNBT text)
//! └── entities
//!     └── <type> name=..
//!         ├── attributes
//!         │   └── <attribute type> name=.. ...
//!         └── outputs
//!             └── output trigger=.. target=.. input=.. delay=..
//!                 └── <attribute type> ...   (arguments)
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use sf_nbt::parse_compound;

use crate::asset::DirAssets;
use crate::attribute::Attribute;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::io::Output;
use crate::level::Level;
use crate::node::Node;
use crate::types::TypeRegistry;

const LEVEL: &str = "level";
const LEVEL_DATA: &str = "level_data";
const ENTITIES: &str = "entities";
const ATTRIBUTES: &str = "attributes";
const OUTPUTS: &str = "outputs";
const OUTPUT: &str = "output";
const NAME: &str = "name";

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

impl Entity {
    /// Encode the entity, every attribute included.
    pub fn to_node(&self) -> Node {
        let attributes = self.attributes().fold(Node::new(ATTRIBUTES), |node, (name, attr)| {
            node.with_child(attr.serialize().with_attr(NAME, name))
        });
        let outputs = self
            .outputs()
            .iter()
            .fold(Node::new(OUTPUTS), |node, output| node.with_child(output_to_node(output)));

        Node::new(self.type_name())
            .with_attr(NAME, self.name())
            .with_child(attributes)
            .with_child(outputs)
    }

    /// Decode an entity. Unregistered types and attribute types are kept
    /// verbatim.
    pub fn from_node(node: &Node, registry: &TypeRegistry) -> CoreResult<Entity> {
        let name = node.required_attr(NAME)?;
        let mut entity = Entity::new(registry.entity_kind(&node.tag), name);

        if let Some(attributes) = node.child(ATTRIBUTES) {
            for child in &attributes.children {
                let (attr_name, value) = read_named(child, registry)?;
                entity.set_attribute(attr_name, value);
            }
        }
        if let Some(outputs) = node.child(OUTPUTS) {
            for child in outputs.children.iter().filter(|c| c.tag == OUTPUT) {
                entity.add_output(output_from_node(child, registry)?);
            }
        }
        Ok(entity)
    }
}

fn read_named(node: &Node, registry: &TypeRegistry) -> CoreResult<(String, Attribute)> {
    let name = node.required_attr(NAME)?.to_string();
    let mut stripped = node.clone();
    stripped.attributes.remove(NAME);
    Ok((name, registry.deserialize_attribute(&stripped)?))
}

fn output_to_node(output: &Output) -> Node {
    let mut node = Node::new(OUTPUT)
        .with_attr("trigger", &output.trigger)
        .with_attr("target", &output.target)
        .with_attr("input", &output.input);
    if output.delay > 0 {
        node = node.with_attr("delay", output.delay);
    }
    output
        .args
        .iter()
        .fold(node, |node, arg| node.with_child(arg.serialize()))
}

fn output_from_node(node: &Node, registry: &TypeRegistry) -> CoreResult<Output> {
    let mut output = Output::new(
        node.required_attr("trigger")?,
        node.required_attr("target")?,
        node.required_attr("input")?,
    );
    if node.attr("delay").is_some() {
        output.delay = node.parse_attr("delay")?;
    }
    for arg in &node.children {
        output.args.push(registry.deserialize_attribute(arg)?);
    }
    Ok(output)
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

impl Level {
    /// Encode the level and its entity stack.
    pub fn to_node(&self) -> Node {
        let entities = self
            .entities()
            .fold(Node::new(ENTITIES), |node, e| node.with_child(e.to_node()));
        Node::new(LEVEL)
            .with_attr(NAME, self.name())
            .with_attr("pretty_name", self.pretty_name())
            .with_attr("description", self.description())
            .with_child(Node::new(LEVEL_DATA).with_text(self.level_data().to_string()))
            .with_child(entities)
    }

    /// Decode a level. The result has no assets attached.
    pub fn from_node(node: &Node, registry: &TypeRegistry) -> CoreResult<Level> {
        if node.tag != LEVEL {
            return Err(CoreError::malformed(
                &node.tag,
                format!("expected <{LEVEL}> at the root"),
            ));
        }
        let name = node.required_attr(NAME)?;
        let mut level = Level::new(name)
            .with_pretty_name(node.attr("pretty_name").unwrap_or(name))
            .with_description(node.attr("description").unwrap_or(""));

        if let Some(data) = node.child(LEVEL_DATA) {
            let text = data.text.as_deref().unwrap_or("{}");
            *level.level_data_mut() = parse_compound(text).map_err(|e| CoreError::MalformedNbt {
                tag: LEVEL_DATA.to_string(),
                message: e.to_string(),
            })?;
        }
        if let Some(entities) = node.child(ENTITIES) {
            for child in &entities.children {
                level.add_entity(Entity::from_node(child, registry)?)?;
            }
        }
        Ok(level)
    }

    /// Read a level file. Models resolve relative to the file's directory.
    pub fn load(path: &Path, registry: &TypeRegistry) -> CoreResult<Level> {
        let text = fs::read_to_string(path)?;
        let level = Level::from_node(&Node::from_json(&text)?, registry)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        log::info!(
            "loaded level \"{}\" ({} entities) from {}",
            level.name(),
            level.len(),
            path.display()
        );
        Ok(level.with_assets(Arc::new(DirAssets::new(dir))))
    }

    /// Write the level file.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let mut text = self.to_node().to_json()?;
        text.push('\n');
        fs::write(path, text)?;
        log::info!("saved level \"{}\" to {}", self.name(), path.display());
        Ok(())
    }
}
