//! Catalog of tile kinds that map descriptions may name
//!
//! Built once at start-up from `TileKind::ALL` and handed by reference to
//! whatever parses map descriptions.

use std::collections::HashMap;

use super::tile::TileKind;

#[derive(Debug, Clone)]
pub struct TileCatalog {
    by_id: HashMap<&'static str, TileKind>,
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TileCatalog {
    /// Every kind except the synthesized placeholders
    pub fn standard() -> Self {
        let by_id: HashMap<_, _> = TileKind::ALL
            .into_iter()
            .filter(|kind| !Self::is_synthesized(*kind))
            .map(|kind| (kind.id(), kind))
            .collect();
        debug_assert_eq!(
            by_id.len(),
            TileKind::ALL.len() - 2,
            "tile kind identifiers must be unique"
        );
        Self { by_id }
    }

    /// Kinds the map conjures for missing cells; never loadable
    pub fn is_synthesized(kind: TileKind) -> bool {
        matches!(kind, TileKind::Empty | TileKind::Boundary)
    }

    pub fn lookup(&self, id: &str) -> Option<TileKind> {
        self.by_id.get(id).copied()
    }

    /// Loadable identifiers, sorted
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
