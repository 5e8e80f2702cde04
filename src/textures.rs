/// Shared texture table.
///
/// A "texture" in the terminal is a glyph and a tint.  The table owns every
/// glyph; entities only hold copyable [`TextureId`] handles, so copying an
/// entity never duplicates or frees anything.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AssetError;

/// Manifest compiled into the binary.
pub const DEFAULT_MANIFEST: &str = include_str!("../assets/textures.toml");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(u16);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tint {
    #[default]
    White,
    Grey,
    DarkGrey,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub symbol: char,
    #[serde(default)]
    pub tint: Tint,
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    textures: BTreeMap<String, Glyph>,
}

#[derive(Clone, Debug, Default)]
pub struct TextureTable {
    ids: HashMap<String, TextureId>,
    glyphs: Vec<Glyph>,
}

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest_str(text: &str) -> Result<Self, toml::de::Error> {
        let manifest: Manifest = toml::from_str(text)?;
        let mut table = TextureTable::new();
        for (name, glyph) in manifest.textures {
            table.insert(&name, glyph);
        }
        Ok(table)
    }

    pub fn load_manifest(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read texture manifest {}", path.display()))?;
        Self::from_manifest_str(&text)
            .with_context(|| format!("parse texture manifest {}", path.display()))
    }

    /// Register (or replace) a named glyph.
    pub fn insert(&mut self, name: &str, glyph: Glyph) -> TextureId {
        if let Some(&id) = self.ids.get(name) {
            self.glyphs[id.0 as usize] = glyph;
            return id;
        }
        let id = TextureId(self.glyphs.len() as u16);
        self.glyphs.push(glyph);
        self.ids.insert(name.to_string(), id);
        debug!(texture = name, "texture registered");
        id
    }

    pub fn load(&self, name: &str) -> Result<TextureId, AssetError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::UnknownTexture(name.to_string()))
    }

    /// Like [`TextureTable::load`], but logs a failure and yields `None` so
    /// the entity is simply not drawn.
    pub fn resolve(&self, name: &str) -> Option<TextureId> {
        match self.load(name) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(%err, "texture missing, entity will not be drawn");
                None
            }
        }
    }

    pub fn glyph(&self, id: TextureId) -> Option<&Glyph> {
        self.glyphs.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
