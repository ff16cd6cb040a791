// assembly.rs - Flattening the pruned region graph into the indexed walkmap

use std::collections::HashMap;

use glam::{Vec2, Vec3, vec2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WalkmapError};
use crate::geometry::Rect;
use crate::region::{RegionArena, RegionId};
use crate::settings::WalkmapSettings;

/// A region as handed to serialization: geometry plus neighbour indices
/// into `Walkmap::regions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkRegion {
    /// (center X, surface height, center Z)
    pub position: Vec3,
    /// (width, depth)
    pub size: Vec2,
    /// Ascending indices of adjacent regions
    pub adjacent: Vec<usize>,
}

impl WalkRegion {
    pub fn footprint(&self) -> Rect {
        Rect::new(vec2(self.position.x, self.position.z), self.size)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Walkmap {
    pub settings: WalkmapSettings,
    pub regions: Vec<WalkRegion>,
}

impl Walkmap {
    pub fn empty(settings: WalkmapSettings) -> Self {
        Self {
            settings,
            regions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.regions.iter().map(|r| r.adjacent.len()).sum::<usize>() / 2
    }

    /// Check that every adjacency index is in range, not a self edge, and
    /// mirrored on the other end. Used on walkmaps read back from disk.
    pub fn validate(&self) -> Result<()> {
        for (index, region) in self.regions.iter().enumerate() {
            for &neighbor in &region.adjacent {
                let reason = if neighbor == index {
                    "region is adjacent to itself"
                } else if neighbor >= self.regions.len() {
                    "index out of range"
                } else if !self.regions[neighbor].adjacent.contains(&index) {
                    "edge is missing on the other end"
                } else {
                    continue;
                };
                return Err(WalkmapError::InvalidAdjacency {
                    region: index,
                    neighbor,
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// Number `regions` in order and express each region's adjacency through
/// those numbers. Every neighbour must itself be in `regions`.
pub fn assemble(arena: &RegionArena, regions: &[RegionId], settings: WalkmapSettings) -> Result<Walkmap> {
    let indices: HashMap<RegionId, usize> = regions
        .iter()
        .enumerate()
        .map(|(index, &id)| (id, index))
        .collect();

    let mut walk_regions = Vec::with_capacity(regions.len());
    for &id in regions {
        let region = arena.region(id)?;
        let mut adjacent = region
            .adjacent()
            .map(|neighbor| {
                indices
                    .get(&neighbor)
                    .copied()
                    .ok_or(WalkmapError::DanglingAdjacency { from: id, to: neighbor })
            })
            .collect::<Result<Vec<usize>>>()?;
        adjacent.sort_unstable();

        walk_regions.push(WalkRegion {
            position: region.position(),
            size: region.size(),
            adjacent,
        });
    }

    Ok(Walkmap {
        settings,
        regions: walk_regions,
    })
}
