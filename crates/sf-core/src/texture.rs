use noise::{NoiseFn, OpenSimplex};
use sf_nbt::{Block, BlockPos, Bounds, GenericBlockCollection};

use crate::attribute::Attribute;
use crate::error::{CoreError, CoreResult};
use crate::node::Node;
use crate::types::TypeRegistry;
use crate::vector::Vec3;

/// Node tag of a single-block texture.
pub const SINGLE_BLOCK: &str = "single_block";
/// Node tag of a noise texture.
pub const NOISE: &str = "noise";

/// A rule choosing a block for every position of a volume.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockTexture {
    /// The same block everywhere.
    Single(Block),
    /// One of `blocks`, picked by 3D simplex noise.
    Noise {
        /// Noise seed; only the low 32 bits are used.
        seed: i64,
        /// Multiplier applied to sample coordinates.
        scale: f64,
        /// Candidates from the lowest noise value to the highest.
        blocks: Vec<Block>,
    },
}

impl Default for BlockTexture {
    fn default() -> Self {
        BlockTexture::Single(Block::new("minecraft:stone"))
    }
}

impl BlockTexture {
    /// Node tag of this texture kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockTexture::Single(_) => SINGLE_BLOCK,
            BlockTexture::Noise { .. } => NOISE,
        }
    }

    /// Whether sample coordinates may be stretched by a brush's scale.
    pub fn supports_scaling(&self) -> bool {
        matches!(self, BlockTexture::Noise { .. })
    }

    /// Paint every position of `bounds`.
    ///
    /// Each position is shifted by `offset`, then divided by `scale` when the
    /// texture supports scaling. Zero scale components count as one.
    pub fn paint(&self, bounds: &Bounds, scale: Vec3, offset: Vec3) -> GenericBlockCollection {
        let sampler = Sampler::new(self);
        let mut out = GenericBlockCollection::new();
        for y in bounds.min.y..bounds.max.y {
            for z in bounds.min.z..bounds.max.z {
                for x in bounds.min.x..bounds.max.x {
                    let at = |v: i32, off: f32, s: f32| {
                        let shifted = f64::from(v) + f64::from(off);
                        if self.supports_scaling() && s != 0.0 {
                            shifted / f64::from(s)
                        } else {
                            shifted
                        }
                    };
                    let sample = [
                        at(x, offset.x, scale.x),
                        at(y, offset.y, scale.y),
                        at(z, offset.z, scale.z),
                    ];
                    out.set_block(BlockPos::new(x, y, z), sampler.block_at(sample));
                }
            }
        }
        out
    }

    /// Encode as a node tagged with the texture kind; parameters are named
    /// attribute children.
    pub fn serialize(&self) -> Node {
        let node = Node::new(self.type_name());
        match self {
            BlockTexture::Single(block) => {
                node.with_child(named("block", Attribute::Block(block.clone())))
            }
            BlockTexture::Noise {
                seed,
                scale,
                blocks,
            } => node
                .with_child(named("seed", Attribute::Long(*seed)))
                .with_child(named("scale", Attribute::Double(*scale)))
                .with_child(named(
                    "blocks",
                    Attribute::List(blocks.iter().cloned().map(Attribute::Block).collect()),
                )),
        }
    }

    /// Read a texture node.
    pub fn deserialize(node: &Node, registry: &TypeRegistry) -> CoreResult<Self> {
        let param = |name: &str| -> CoreResult<Attribute> {
            let child = node
                .children
                .iter()
                .find(|c| c.attr("name") == Some(name))
                .ok_or_else(|| CoreError::malformed(&node.tag, format!("missing \"{name}\"")))?;
            registry.deserialize_attribute(child)
        };
        let wrong = |name: &str| CoreError::malformed(&node.tag, format!("bad \"{name}\""));
        match node.tag.as_str() {
            SINGLE_BLOCK => match param("block")? {
                Attribute::Block(block) => Ok(BlockTexture::Single(block)),
                _ => Err(wrong("block")),
            },
            NOISE => {
                let seed = match param("seed")? {
                    Attribute::Long(v) => v,
                    Attribute::Int(v) => i64::from(v),
                    _ => return Err(wrong("seed")),
                };
                let scale = match param("scale")? {
                    Attribute::Double(v) => v,
                    Attribute::Float(v) => f64::from(v),
                    _ => return Err(wrong("scale")),
                };
                let blocks = match param("blocks")? {
                    Attribute::List(items) => items
                        .into_iter()
                        .map(|item| match item {
                            Attribute::Block(block) => Ok(block),
                            _ => Err(wrong("blocks")),
                        })
                        .collect::<CoreResult<Vec<_>>>()?,
                    _ => return Err(wrong("blocks")),
                };
                Ok(BlockTexture::Noise {
                    seed,
                    scale,
                    blocks,
                })
            }
            other => Err(CoreError::malformed(other, "unknown block texture")),
        }
    }
}

fn named(name: &str, value: Attribute) -> Node {
    value.serialize().with_attr("name", name)
}

/// A texture ready to sample, with its noise generator built once.
struct Sampler<'a> {
    texture: &'a BlockTexture,
    noise: Option<OpenSimplex>,
}

impl<'a> Sampler<'a> {
    fn new(texture: &'a BlockTexture) -> Self {
        let noise = match texture {
            BlockTexture::Noise { seed, .. } => Some(OpenSimplex::new(*seed as u32)),
            BlockTexture::Single(_) => None,
        };
        Self { texture, noise }
    }

    fn block_at(&self, [x, y, z]: [f64; 3]) -> Block {
        match (self.texture, &self.noise) {
            (BlockTexture::Noise { scale, blocks, .. }, Some(noise)) if !blocks.is_empty() => {
                let value = noise.get([x * scale, y * scale, z * scale]).clamp(-1.0, 1.0);
                let slot = ((value + 1.0) / 2.0 * blocks.len() as f64).floor() as usize;
                blocks[slot.min(blocks.len() - 1)].clone()
            }
            (BlockTexture::Single(block), _) => block.clone(),
            _ => Block::new("minecraft:stone"),
        }
    }
}
