use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use lumen_world::{AIR, VoxelId};

use super::config::{BlockDef, BlocksConfig};
use super::props::{OPAQUE_ABSORPTION, VoxelProperties, VoxelProps};
use super::Rgb;

const BUILTIN_BLOCKS: &str = include_str!("../assets/blocks.toml");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub id: VoxelId,
    pub name: String,
    pub solid: bool,
    pub blocks_skylight: bool,
    pub absorption: u8,
    pub emission: Rgb,
}

impl BlockType {
    #[inline]
    pub fn props(&self) -> VoxelProps {
        VoxelProps {
            emissive: (!self.emission.is_zero()).then_some(self.emission),
            absorption: self.absorption,
            blocks_skylight: self.blocks_skylight,
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    blocks: Vec<Option<BlockType>>,
    by_name: HashMap<String, VoxelId>,
    unknown_block_id: Option<VoxelId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry compiled from the palette shipped in `assets/blocks.toml`.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUILTIN_BLOCKS)
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_configs(cfg)
    }

    pub fn from_configs(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        for def in cfg.blocks {
            let ty = compile_block(def, reg.blocks.len() as VoxelId);
            let slot = ty.id as usize;
            if reg.blocks.len() <= slot {
                reg.blocks.resize(slot + 1, None);
            }
            if let Some(existing) = &reg.blocks[slot] {
                return Err(format!(
                    "block id {} assigned to both '{}' and '{}'",
                    ty.id, existing.name, ty.name
                )
                .into());
            }
            if reg.by_name.contains_key(&ty.name) {
                return Err(format!("block '{}' defined twice", ty.name).into());
            }
            reg.by_name.insert(ty.name.clone(), ty.id);
            reg.blocks[slot] = Some(ty);
        }
        reg.unknown_block_id = cfg
            .unknown_block
            .as_deref()
            .and_then(|name| reg.id_by_name(name));
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: VoxelId) -> Option<&BlockType> {
        self.blocks.get(id as usize).and_then(Option::as_ref)
    }

    pub fn id_by_name(&self, name: &str) -> Option<VoxelId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter().flatten()
    }
}

fn compile_block(def: BlockDef, next_id: VoxelId) -> BlockType {
    let id = def.id.unwrap_or(next_id);
    let solid = def.solid.unwrap_or(true);
    let blocks_skylight = def.blocks_skylight.unwrap_or(solid);
    let absorption = def
        .absorption
        .unwrap_or(if solid { OPAQUE_ABSORPTION } else { 0 })
        .min(OPAQUE_ABSORPTION);
    let emission = def.emission.map(Rgb::from).unwrap_or_default().clamped();
    BlockType {
        id,
        name: def.name,
        solid,
        blocks_skylight,
        absorption,
        emission,
    }
}

impl VoxelProperties for BlockRegistry {
    fn lookup(&self, id: VoxelId) -> VoxelProps {
        if id == AIR {
            return VoxelProps::AIR;
        }
        self.get(id)
            .or_else(|| self.unknown_block_id.and_then(|u| self.get(u)))
            .map(BlockType::props)
            .unwrap_or(VoxelProps::OPAQUE)
    }
}
