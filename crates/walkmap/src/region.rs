// region.rs - Walkable regions and the arena that owns them
//
// Regions refer to each other by `RegionId`. The arena never reuses a slot,
// so an id either names the region it was issued for or nothing at all.

use std::collections::BTreeSet;
use std::fmt;

use glam::{Vec2, Vec3, vec2, vec3};

use crate::error::{Result, WalkmapError};
use crate::geometry::{Corners, Rect};
use crate::obstacle::Obstacle;

/// Handle to a region stored in a `RegionArena`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(u32);

impl RegionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One walkable rectangular patch.
///
/// `position` is (center X, surface height, center Z); `size` is
/// (width, depth). Corners are always derived from these two.
#[derive(Clone, Debug)]
pub struct Region {
    position: Vec3,
    size: Vec2,
    adjacent: BTreeSet<RegionId>,
    visited: bool,
}

impl Region {
    pub fn new(center: Vec2, size: Vec2, height: f32) -> Self {
        Self {
            position: vec3(center.x, height, center.y),
            size,
            adjacent: BTreeSet::new(),
            visited: false,
        }
    }

    /// Top face of `obstacle`
    pub fn from_obstacle(obstacle: &Obstacle) -> Self {
        Self::new(
            obstacle.footprint_center(),
            obstacle.footprint_size(),
            obstacle.top(),
        )
    }

    pub fn from_rect(rect: Rect, height: f32) -> Self {
        Self::new(rect.center, rect.size, height)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn height(&self) -> f32 {
        self.position.y
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(vec2(self.position.x, self.position.z), self.size)
    }

    pub fn corners(&self) -> Corners {
        self.footprint().corners()
    }

    pub fn is_degenerate(&self) -> bool {
        self.footprint().is_degenerate()
    }

    pub fn intersects(&self, other: &Region) -> bool {
        self.footprint().intersects(&other.footprint())
    }

    pub fn adjacent(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.adjacent.iter().copied()
    }

    pub fn adjacent_count(&self) -> usize {
        self.adjacent.len()
    }

    pub fn is_adjacent(&self, other: RegionId) -> bool {
        self.adjacent.contains(&other)
    }

    /// Set by the reachability pass
    pub fn visited(&self) -> bool {
        self.visited
    }
}

/// Owning store for every region created during a run
#[derive(Debug, Default)]
pub struct RegionArena {
    slots: Vec<Option<Region>>,
    live: usize,
}

impl RegionArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: Region) -> RegionId {
        let id = RegionId(self.slots.len() as u32);
        self.slots.push(Some(region));
        self.live += 1;
        id
    }

    /// Number of live regions
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Like `get`, but a missing region is an error
    pub fn region(&self, id: RegionId) -> Result<&Region> {
        self.get(id).ok_or(WalkmapError::DestroyedRegion(id))
    }

    fn region_mut(&mut self, id: RegionId) -> Result<&mut Region> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(WalkmapError::DestroyedRegion(id))
    }

    /// Live regions in creation order
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|r| (RegionId(i as u32), r)))
    }

    /// Make `a` and `b` adjacent to each other. Linking a region to itself is
    /// a no-op.
    pub fn link(&mut self, a: RegionId, b: RegionId) -> Result<()> {
        if a == b {
            return Ok(());
        }
        // Check both ends before touching either, so a failed link leaves no half edge.
        self.region(b)?;
        self.region_mut(a)?.adjacent.insert(b);
        self.region_mut(b)?.adjacent.insert(a);
        Ok(())
    }

    /// Remove the edge between `a` and `b`. Finding it on only one side means
    /// the graph was already corrupt.
    pub fn unlink(&mut self, a: RegionId, b: RegionId) -> Result<()> {
        let removed_ab = self.region_mut(a)?.adjacent.remove(&b);
        let removed_ba = self.region_mut(b)?.adjacent.remove(&a);
        debug_assert_eq!(removed_ab, removed_ba, "asymmetric adjacency between {} and {}", a, b);
        if removed_ab != removed_ba {
            let (from, to) = if removed_ab { (a, b) } else { (b, a) };
            return Err(WalkmapError::AsymmetricAdjacency { from, to });
        }
        Ok(())
    }

    /// Remove a region, detaching it from every neighbour first
    pub fn destroy(&mut self, id: RegionId) -> Result<Region> {
        let neighbors: Vec<RegionId> = self.region(id)?.adjacent().collect();
        for neighbor in neighbors {
            self.unlink(id, neighbor)?;
        }
        let region = self.slots[id.index()]
            .take()
            .ok_or(WalkmapError::DestroyedRegion(id))?;
        self.live -= 1;
        Ok(region)
    }

    pub(crate) fn set_visited(&mut self, id: RegionId, visited: bool) -> Result<()> {
        self.region_mut(id)?.visited = visited;
        Ok(())
    }

    pub(crate) fn clear_visited(&mut self) {
        for region in self.slots.iter_mut().flatten() {
            region.visited = false;
        }
    }

    /// Verify every edge is stored on both ends and points at a live region
    pub fn check_symmetry(&self) -> Result<()> {
        for (id, region) in self.iter() {
            for neighbor in region.adjacent() {
                let other = self.get(neighbor).ok_or(WalkmapError::DanglingAdjacency {
                    from: id,
                    to: neighbor,
                })?;
                if !other.is_adjacent(id) {
                    return Err(WalkmapError::AsymmetricAdjacency {
                        from: id,
                        to: neighbor,
                    });
                }
            }
        }
        Ok(())
    }
}
