use serde::Deserialize;

// Top-level blocks config file
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    // Name of the block that ids missing from the table resolve to. If absent
    // or not found, unknown ids are treated as opaque and dark.
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub blocks_skylight: Option<bool>,
    // 0..=15; values above 15 are clamped when compiled
    #[serde(default)]
    pub absorption: Option<u8>,
    // [r, g, b] light levels
    #[serde(default)]
    pub emission: Option<[u8; 3]>,
}

impl BlockDef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            solid: None,
            blocks_skylight: None,
            absorption: None,
            emission: None,
        }
    }
}
