//! Block patterns in deposit attributes and their resolution into replacement tables.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;
use crate::world::{wildcard_capture, BlockId, BlockRegistry};

/// Placeholder in block codes that is replaced by each allowed grade.
pub const GRADE_PLACEHOLDER: &str = "{grade}";

/// A block pattern as written in deposit attributes.
///
/// For host blocks, `code` may contain one `*` and `name` names the captured part,
/// e.g. `code = "rock-*"`, `name = "rock"`. Replacement patterns refer to it as
/// `{rock}` and to the grade as `{grade}`, e.g. `"ore-{grade}-galena-{rock}"`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepositBlock {
    pub code: String,
    pub name: Option<String>,
    pub allowed_variants: Vec<String>,
}

impl DepositBlock {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    /// Sets the placeholder name bound to the wildcard capture.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the grade names substituted for `{grade}`.
    pub fn with_grades<I, S>(mut self, grades: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_variants = grades.into_iter().map(Into::into).collect();
        self
    }

    /// Number of grades; `0` means the pattern has a single ungraded block.
    pub fn max_grade(&self) -> usize {
        self.allowed_variants.len()
    }

    /// Expands the pattern for one host capture into one code per grade.
    fn expand(&self, placeholder: Option<&str>, capture: &str) -> Vec<String> {
        let base = match placeholder {
            Some(name) => self.code.replace(&format!("{{{name}}}"), capture),
            None => self.code.clone(),
        };
        if self.allowed_variants.is_empty() {
            return vec![base];
        }
        self.allowed_variants
            .iter()
            .map(|grade| base.replace(GRADE_PLACEHOLDER, grade))
            .collect()
    }
}

/// Replacement blocks for one host block, indexed by grade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedDepositBlock {
    pub blocks: Vec<BlockId>,
}

impl ResolvedDepositBlock {
    /// Block for a grade, falling back to the highest available grade.
    #[inline]
    pub fn for_grade(&self, grade: usize) -> Option<BlockId> {
        let last = self.blocks.len().checked_sub(1)?;
        Some(self.blocks[grade.min(last)])
    }
}

/// Host block id to replacement blocks.
pub type BlockTable = HashMap<BlockId, ResolvedDepositBlock>;

/// Resolves `target` against every block matching `host`.
///
/// Hosts whose expanded target codes do not exist are dropped with a warning; grades that
/// fail to resolve are skipped so the remaining grades keep their order.
pub fn resolve_block_table(
    registry: &dyn BlockRegistry,
    host: &DepositBlock,
    target: &DepositBlock,
    source: &str,
) -> BlockTable {
    let mut table = BlockTable::new();
    let hosts = registry.search(&host.code);
    if hosts.is_empty() {
        let err = Error::UnresolvedBlock {
            pattern: host.code.clone(),
        };
        warn!("Deposit in '{}': host {}.", source, err);
        return table;
    }

    for (host_id, host_code) in hosts {
        let capture = wildcard_capture(&host.code, &host_code).unwrap_or("");
        let mut blocks = Vec::new();
        for code in target.expand(host.name.as_deref(), capture) {
            match registry.block_id(&code) {
                Some(id) => blocks.push(id),
                None => {
                    let err = Error::UnresolvedBlock { pattern: code };
                    warn!("Deposit in '{}': {} (host '{}').", source, err, host_code);
                }
            }
        }
        if !blocks.is_empty() {
            table.insert(host_id, ResolvedDepositBlock { blocks });
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BlockPalette;

    fn palette() -> BlockPalette {
        let mut p = BlockPalette::new();
        p.solid("rock-granite");
        p.solid("rock-basalt");
        p.solid("ore-poor-galena-granite");
        p.solid("ore-rich-galena-granite");
        p.solid("ore-poor-galena-basalt");
        p.register("looseores-galena-granite", false);
        p
    }

    #[test]
    fn expands_wildcard_and_grades() {
        let p = palette();
        let host = DepositBlock::new("rock-*").named("rock");
        let place = DepositBlock::new("ore-{grade}-galena-{rock}").with_grades(["poor", "rich"]);
        let table = resolve_block_table(&p, &host, &place, "test");

        let granite = p.block_id("rock-granite").unwrap();
        let basalt = p.block_id("rock-basalt").unwrap();
        assert_eq!(
            table[&granite].blocks,
            vec![
                p.block_id("ore-poor-galena-granite").unwrap(),
                p.block_id("ore-rich-galena-granite").unwrap()
            ]
        );
        // Basalt has no rich grade; the poor grade is kept.
        assert_eq!(
            table[&basalt].blocks,
            vec![p.block_id("ore-poor-galena-basalt").unwrap()]
        );
    }

    #[test]
    fn hosts_without_any_target_are_dropped() {
        let p = palette();
        let host = DepositBlock::new("rock-*").named("rock");
        let surface = DepositBlock::new("looseores-galena-{rock}");
        let table = resolve_block_table(&p, &host, &surface, "test");
        assert_eq!(table.len(), 1);
        assert!(table.contains_key(&p.block_id("rock-granite").unwrap()));
    }

    #[test]
    fn unknown_host_pattern_yields_empty_table() {
        let p = palette();
        let table = resolve_block_table(
            &p,
            &DepositBlock::new("sand-*"),
            &DepositBlock::new("x"),
            "test",
        );
        assert!(table.is_empty());
    }

    #[test]
    fn grade_lookup_falls_back_to_last() {
        let resolved = ResolvedDepositBlock {
            blocks: vec![BlockId(4), BlockId(5)],
        };
        assert_eq!(resolved.for_grade(0), Some(BlockId(4)));
        assert_eq!(resolved.for_grade(7), Some(BlockId(5)));
        assert_eq!(ResolvedDepositBlock::default().for_grade(0), None);
    }
}
