//! Game map representation: regions and the borders between them.
//!
//! This module contains:
//! - Terrain types
//! - Regions with their border and lost-tribe flags
//! - The map itself, an undirected adjacency graph over region indices

use crate::assets::AssetsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Region identifier (index into the map's region list)
pub type RegionId = usize;

/// Marker that places a lost tribe on a region at the start of the game
pub const LOST_TRIBE_MARKER: &str = "Lost Tribe";

/// Type of terrain on a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Farmland,
    Forest,
    Hill,
    Lake,
    Sea,
    Swamp,
    Mountain,
    /// Any terrain name this engine has no special rules for
    #[serde(other)]
    Other,
}

impl Terrain {
    /// All known terrain types
    pub const ALL: [Terrain; 7] = [
        Terrain::Farmland,
        Terrain::Forest,
        Terrain::Hill,
        Terrain::Lake,
        Terrain::Sea,
        Terrain::Swamp,
        Terrain::Mountain,
    ];

    /// Seas and lakes
    pub fn is_water(&self) -> bool {
        matches!(self, Terrain::Sea | Terrain::Lake)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Farmland => "Farmland",
            Terrain::Forest => "Forest",
            Terrain::Hill => "Hill",
            Terrain::Lake => "Lake",
            Terrain::Sea => "Sea",
            Terrain::Swamp => "Swamp",
            Terrain::Mountain => "Mountain",
            Terrain::Other => "Other",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single region on the map.
///
/// `terrain`, `is_at_map_border` and `markers` never change after setup.
/// `has_lost_tribe` is cleared the first time the region is conquered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub terrain: Terrain,
    #[serde(default)]
    pub is_at_map_border: bool,
    #[serde(rename = "has_a_lost_tribe", default)]
    pub has_lost_tribe: bool,
    /// Free-form symbols printed on the region ("Cavern", "Mine", ...)
    #[serde(rename = "symbols", default)]
    pub markers: BTreeSet<String>,
}

impl Region {
    /// Create an inland region without a lost tribe
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            is_at_map_border: false,
            has_lost_tribe: false,
            markers: BTreeSet::new(),
        }
    }

    /// Mark the region as lying at the edge of the map
    pub fn at_border(mut self) -> Self {
        self.is_at_map_border = true;
        self
    }

    /// Put a lost tribe on the region
    pub fn with_lost_tribe(mut self) -> Self {
        self.has_lost_tribe = true;
        self
    }

    /// Add a marker symbol
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }
}

/// Serialized shape of the map in asset files
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawMap {
    tiles: Vec<Region>,
    tile_borders: Vec<(RegionId, RegionId)>,
}

/// The game map: an ordered list of regions plus an undirected border relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMap", into = "RawMap")]
pub struct Map {
    regions: Vec<Region>,
    borders: Vec<(RegionId, RegionId)>,
    /// Neighbours of each region
    adjacency: Vec<BTreeSet<RegionId>>,
}

impl Map {
    /// Build a map, rejecting borders that reference missing regions or
    /// connect a region to itself.
    pub fn new(
        mut regions: Vec<Region>,
        borders: Vec<(RegionId, RegionId)>,
    ) -> Result<Self, AssetsError> {
        let n_regions = regions.len();
        let mut adjacency = vec![BTreeSet::new(); n_regions];

        for &(a, b) in &borders {
            if a.max(b) >= n_regions {
                return Err(AssetsError::BorderOutOfRange { a, b, n_regions });
            }
            if a == b {
                return Err(AssetsError::SelfBorder { region: a });
            }
            adjacency[a].insert(b);
            adjacency[b].insert(a);
        }

        for region in &mut regions {
            if region.has_marker(LOST_TRIBE_MARKER) {
                region.has_lost_tribe = true;
            }
        }

        Ok(Self {
            regions,
            borders,
            adjacency,
        })
    }

    /// All regions in index order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Border pairs as given at construction
    pub fn borders(&self) -> &[(RegionId, RegionId)] {
        &self.borders
    }

    /// Neighbours of a region (empty for unknown regions)
    pub fn adjacent(&self, id: RegionId) -> impl Iterator<Item = RegionId> + '_ {
        self.adjacency.get(id).into_iter().flatten().copied()
    }

    /// Check whether two regions share a border
    pub fn are_adjacent(&self, a: RegionId, b: RegionId) -> bool {
        self.adjacency.get(a).is_some_and(|n| n.contains(&b))
    }
}

impl TryFrom<RawMap> for Map {
    type Error = AssetsError;

    fn try_from(raw: RawMap) -> Result<Self, Self::Error> {
        Map::new(raw.tiles, raw.tile_borders)
    }
}

impl From<Map> for RawMap {
    fn from(map: Map) -> Self {
        RawMap {
            tiles: map.regions,
            tile_borders: map.borders,
        }
    }
}
