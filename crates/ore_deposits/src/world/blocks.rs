//! Block identifiers and the block registry seen by deposit generation.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numeric voxel identifier. `0` is air.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);

    #[inline]
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// Read-only view of the block registry.
pub trait BlockRegistry: Send + Sync {
    /// Resolves an exact block code.
    fn block_id(&self, code: &str) -> Option<BlockId>;

    /// Returns every block whose code matches `pattern`, together with its code.
    ///
    /// Patterns may contain a single `*` wildcard.
    fn search(&self, pattern: &str) -> Vec<(BlockId, String)>;

    /// Whether the top face of the block is solid, so something may rest on it.
    fn is_solid_on_top(&self, id: BlockId) -> bool;
}

/// Returns the text matched by the `*` of `pattern`, or `""` if `pattern` has no wildcard.
///
/// Returns `None` if `code` does not match.
pub fn wildcard_capture<'a>(pattern: &str, code: &'a str) -> Option<&'a str> {
    match pattern.split_once('*') {
        None => (pattern == code).then_some(""),
        Some((prefix, suffix)) => {
            if code.len() < prefix.len() + suffix.len() {
                return None;
            }
            if !code.starts_with(prefix) || !code.ends_with(suffix) {
                return None;
            }
            Some(&code[prefix.len()..code.len() - suffix.len()])
        }
    }
}

#[derive(Clone, Debug)]
struct PaletteEntry {
    code: String,
    solid_on_top: bool,
}

/// In-memory [`BlockRegistry`] with sequentially assigned ids.
#[derive(Clone, Debug)]
pub struct BlockPalette {
    entries: Vec<PaletteEntry>,
    by_code: HashMap<String, BlockId>,
}

impl BlockPalette {
    /// Creates a palette containing only air.
    pub fn new() -> Self {
        let mut palette = Self {
            entries: Vec::new(),
            by_code: HashMap::new(),
        };
        palette.register("air", false);
        palette
    }

    /// Registers a block, returning its id. Registering an existing code returns the existing id.
    pub fn register(&mut self, code: impl Into<String>, solid_on_top: bool) -> BlockId {
        let code = code.into();
        if let Some(id) = self.by_code.get(&code) {
            return *id;
        }
        let id = BlockId(self.entries.len() as u16);
        self.by_code.insert(code.clone(), id);
        self.entries.push(PaletteEntry { code, solid_on_top });
        id
    }

    /// Registers a block with a solid top face.
    pub fn solid(&mut self, code: impl Into<String>) -> BlockId {
        self.register(code, true)
    }

    /// Code of a registered block.
    pub fn code(&self, id: BlockId) -> Option<&str> {
        self.entries.get(id.0 as usize).map(|e| e.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BlockPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry for BlockPalette {
    fn block_id(&self, code: &str) -> Option<BlockId> {
        self.by_code.get(code).copied()
    }

    fn search(&self, pattern: &str) -> Vec<(BlockId, String)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| wildcard_capture(pattern, &e.code).is_some())
            .map(|(i, e)| (BlockId(i as u16), e.code.clone()))
            .collect()
    }

    fn is_solid_on_top(&self, id: BlockId) -> bool {
        self.entries
            .get(id.0 as usize)
            .is_some_and(|e| e.solid_on_top)
    }
}
