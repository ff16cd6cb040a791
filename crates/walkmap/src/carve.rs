// carve.rs - Carving taller obstacles out of the regions beneath them
//
// Obstacles are processed lowest first. Each one's top face starts as a
// single region, which is split around every taller obstacle close enough
// above it to get in the player's way. Splits keep the adjacency graph
// consistent: edges of the replaced region move to the pieces that still
// touch the old neighbour.

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::nearly_le;
use crate::obstacle::Obstacle;
use crate::ordering::order_by_height;
use crate::region::{Region, RegionArena, RegionId};
use crate::settings::WalkmapSettings;

#[derive(Clone, Copy, Debug, Default)]
struct ObstacleState {
    /// Top-face region, created on first use
    base: Option<RegionId>,
    materialized: bool,
    /// Some lower region was linked to this obstacle's top by a step edge
    stepped_onto: bool,
}

pub struct Carver<'a> {
    obstacles: &'a [Obstacle],
    order: Vec<usize>,
    states: Vec<ObstacleState>,
    arena: RegionArena,
    settings: WalkmapSettings,
}

impl<'a> Carver<'a> {
    pub fn new(obstacles: &'a [Obstacle], settings: &WalkmapSettings) -> Self {
        Self {
            obstacles,
            order: order_by_height(obstacles),
            states: vec![ObstacleState::default(); obstacles.len()],
            arena: RegionArena::new(),
            settings: *settings,
        }
    }

    /// Obstacle indices in processing order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn arena(&self) -> &RegionArena {
        &self.arena
    }

    pub fn into_arena(self) -> RegionArena {
        self.arena
    }

    pub fn stepped_onto(&self, obstacle: usize) -> bool {
        self.states[obstacle].stepped_onto
    }

    pub fn stepped_onto_count(&self) -> usize {
        self.states.iter().filter(|s| s.stepped_onto).count()
    }

    /// The obstacle's top-face region, building it the first time it is asked
    /// for. Obstacles with a flat footprint have none.
    fn base_region(&mut self, obstacle: usize) -> Option<RegionId> {
        let state = &mut self.states[obstacle];
        if !state.materialized {
            state.materialized = true;
            let region = Region::from_obstacle(&self.obstacles[obstacle]);
            if region.is_degenerate() {
                debug!("Obstacle #{} has no footprint, skipping", obstacle);
            } else {
                state.base = Some(self.arena.insert(region));
            }
        }
        state.base
    }

    /// Carve the obstacle at position `rank` of the height order against
    /// everything above it. Returns the regions it ends up with.
    pub fn process_object(&mut self, rank: usize) -> Result<Vec<RegionId>> {
        let owner = self.order[rank];
        let Some(base) = self.base_region(owner) else {
            return Ok(Vec::new());
        };

        let regions = self.carve(owner, vec![base], rank + 1)?;
        debug!(
            "Obstacle #{} (top {:.3}) carved into {} region(s)",
            owner,
            self.obstacles[owner].top(),
            regions.len()
        );
        Ok(regions)
    }

    /// Split each of `regions` around the obstacles from `start` onwards in
    /// the height order.
    ///
    /// A region that hits an obstacle is replaced by its pieces, and the
    /// pieces continue the scan from the next obstacle. The scan position
    /// only moves forward, so the recursion is at most as deep as the
    /// obstacle list is long.
    pub fn carve(&mut self, owner: usize, regions: Vec<RegionId>, start: usize) -> Result<Vec<RegionId>> {
        let owner_top = self.obstacles[owner].top();
        let mut kept = Vec::with_capacity(regions.len());

        'regions: for region in regions {
            for rank in start..self.order.len() {
                let candidate = self.order[rank];

                // Too far overhead to block the player
                if self.obstacles[candidate].bottom() - owner_top >= self.settings.player_height {
                    continue;
                }

                let Some(notch) = self.base_region(candidate) else {
                    continue;
                };
                if !self.arena.region(region)?.intersects(self.arena.region(notch)?) {
                    continue;
                }

                let fragments = split(&mut self.arena, region, notch)?;
                trace!(
                    "Region {} split around obstacle #{} into {} fragment(s)",
                    region,
                    candidate,
                    fragments.len()
                );

                let rise = self.arena.region(notch)?.height() - self.arena.region(region)?.height();
                if !fragments.is_empty() && nearly_le(rise.abs(), self.settings.step_height) {
                    for &fragment in &fragments {
                        self.arena.link(fragment, notch)?;
                    }
                    self.states[candidate].stepped_onto = true;
                }

                migrate_adjacency(&mut self.arena, region, &fragments)?;
                self.arena.destroy(region)?;

                kept.extend(self.carve(owner, fragments, rank + 1)?);
                continue 'regions;
            }

            kept.push(region);
        }

        Ok(kept)
    }
}

/// Cut `notch`'s footprint out of `original`.
///
/// Returns new regions at `original`'s height, at most four, none of them
/// degenerate. Pieces that touch are linked to each other. If the two do not
/// intersect the result is a single copy of `original`. `original` itself is
/// left untouched.
pub fn split(arena: &mut RegionArena, original: RegionId, notch: RegionId) -> Result<Vec<RegionId>> {
    let source = arena.region(original)?;
    let height = source.height();
    let footprint = source.footprint();
    let notch = arena.region(notch)?.footprint();

    if !footprint.intersects(&notch) {
        return Ok(vec![arena.insert(Region::from_rect(footprint, height))]);
    }

    let mut fragments = Vec::with_capacity(4);
    for piece in footprint.pieces_around(&notch) {
        if piece.is_degenerate() {
            continue;
        }
        fragments.push(arena.insert(Region::from_rect(piece, height)));
    }

    // Ring in north, east, south, west order. Once a piece has been dropped its
    // two ring neighbours can sit on opposite sides of the notch, so only
    // pieces that actually touch are linked.
    if fragments.len() > 1 {
        for (i, &a) in fragments.iter().enumerate() {
            let b = fragments[(i + 1) % fragments.len()];
            if arena.region(a)?.intersects(arena.region(b)?) {
                arena.link(a, b)?;
            }
        }
    }

    Ok(fragments)
}

/// Move every edge of `old` onto the fragments that still touch the
/// neighbour on the other end.
fn migrate_adjacency(arena: &mut RegionArena, old: RegionId, fragments: &[RegionId]) -> Result<()> {
    let neighbors: Vec<RegionId> = arena.region(old)?.adjacent().collect();
    for neighbor in neighbors {
        arena.unlink(old, neighbor)?;
        for &fragment in fragments {
            if arena.region(fragment)?.intersects(arena.region(neighbor)?) {
                arena.link(fragment, neighbor)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, vec2, vec3};

    fn obstacle(position: Vec3, scale: Vec3) -> Obstacle {
        Obstacle::new(position, Vec3::ZERO, scale)
    }

    fn settings(player_height: f32, step_height: f32) -> WalkmapSettings {
        WalkmapSettings {
            player_height,
            step_height,
            ..Default::default()
        }
    }

    fn square(arena: &mut RegionArena, x: f32, z: f32, size: f32) -> RegionId {
        arena.insert(Region::new(vec2(x, z), vec2(size, size), 0.0))
    }

    #[test]
    fn test_split_without_overlap_copies_original() {
        let mut arena = RegionArena::new();
        let original = square(&mut arena, 0.0, 0.0, 2.0);
        let notch = square(&mut arena, 5.0, 0.0, 2.0);

        let fragments = split(&mut arena, original, notch).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_ne!(fragments[0], original);
        let copy = arena.region(fragments[0]).unwrap();
        assert_eq!(copy.footprint(), arena.region(original).unwrap().footprint());
        assert_eq!(copy.adjacent_count(), 0);
    }

    #[test]
    fn test_split_centered_notch_links_ring() {
        let mut arena = RegionArena::new();
        let original = square(&mut arena, 0.0, 0.0, 4.0);
        let notch = square(&mut arena, 0.0, 0.0, 2.0);

        let fragments = split(&mut arena, original, notch).unwrap();
        let [north, east, south, west] = fragments[..] else {
            panic!("expected four fragments, got {:?}", fragments);
        };

        let adjacent = |a: RegionId, b: RegionId| arena.region(a).unwrap().is_adjacent(b);
        assert!(adjacent(north, east));
        assert!(adjacent(east, south));
        assert!(adjacent(south, west));
        assert!(adjacent(west, north));
        assert!(!adjacent(north, south));
        assert!(!adjacent(east, west));
        assert!(arena.check_symmetry().is_ok());

        let area: f32 = fragments
            .iter()
            .map(|&f| arena.region(f).unwrap().footprint().area())
            .sum();
        assert_eq!(area, 12.0);
    }

    #[test]
    fn test_split_does_not_link_across_notch() {
        let mut arena = RegionArena::new();
        let original = square(&mut arena, 0.0, 0.0, 4.0);
        // Covers the east side for the middle band; the east piece vanishes
        let notch = square(&mut arena, 2.0, 0.0, 2.0);

        let fragments = split(&mut arena, original, notch).unwrap();
        let [north, south, west] = fragments[..] else {
            panic!("expected three fragments, got {:?}", fragments);
        };

        let region = |id: RegionId| arena.region(id).unwrap();
        assert!(!region(north).is_adjacent(south));
        assert!(region(south).is_adjacent(west));
        assert!(region(west).is_adjacent(north));
        assert_eq!(region(west).footprint().size, vec2(3.0, 2.0));
    }

    #[test]
    fn test_split_fully_covered_leaves_nothing() {
        let mut arena = RegionArena::new();
        let original = square(&mut arena, 0.0, 0.0, 2.0);
        let notch = square(&mut arena, 0.0, 0.0, 3.0);
        assert!(split(&mut arena, original, notch).unwrap().is_empty());
    }

    #[test]
    fn test_single_obstacle_keeps_its_footprint() {
        let obstacles = [obstacle(vec3(1.0, 0.0, 2.0), vec3(4.0, 1.0, 4.0))];
        let mut carver = Carver::new(&obstacles, &WalkmapSettings::default());
        let regions = carver.process_object(0).unwrap();
        assert_eq!(regions.len(), 1);

        let region = carver.arena().region(regions[0]).unwrap();
        assert_eq!(region.position(), vec3(1.0, 0.5, 2.0));
        assert_eq!(region.size(), vec2(4.0, 4.0));
    }

    #[test]
    fn test_obstacle_out_of_reach_overhead_is_ignored() {
        let obstacles = [
            obstacle(vec3(0.0, 0.0, 0.0), vec3(4.0, 1.0, 4.0)),
            // Bottom at 3.5, 3.0 above the floor's top
            obstacle(vec3(0.0, 4.0, 0.0), vec3(2.0, 1.0, 2.0)),
        ];
        let mut carver = Carver::new(&obstacles, &settings(3.0, 0.5));
        let regions = carver.process_object(0).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(
            carver.arena().region(regions[0]).unwrap().size(),
            vec2(4.0, 4.0)
        );
    }

    #[test]
    fn test_high_obstacle_carves_without_step() {
        let obstacles = [
            obstacle(vec3(0.0, 0.0, 0.0), vec3(4.0, 1.0, 4.0)),
            obstacle(vec3(0.0, 2.0, 0.0), vec3(2.0, 1.0, 2.0)),
        ];
        let mut carver = Carver::new(&obstacles, &settings(3.0, 0.5));
        let floor = carver.process_object(0).unwrap();
        assert_eq!(floor.len(), 4);
        assert!(!carver.stepped_onto(1));

        let top = carver.process_object(1).unwrap();
        assert_eq!(top.len(), 1);
        for &fragment in &floor {
            assert!(!carver.arena().region(fragment).unwrap().is_adjacent(top[0]));
        }
        assert_eq!(carver.arena().len(), 5);
    }

    #[test]
    fn test_step_links_fragments_to_obstacle_top() {
        let obstacles = [
            obstacle(vec3(0.0, 0.0, 0.0), vec3(4.0, 1.0, 4.0)),
            obstacle(vec3(0.0, 2.0, 0.0), vec3(2.0, 1.0, 2.0)),
        ];
        let mut carver = Carver::new(&obstacles, &settings(3.0, 2.5));
        let floor = carver.process_object(0).unwrap();
        let top = carver.process_object(1).unwrap();
        assert!(carver.stepped_onto(1));
        assert_eq!(carver.stepped_onto_count(), 1);

        for &fragment in &floor {
            assert!(carver.arena().region(fragment).unwrap().is_adjacent(top[0]));
        }
        assert_eq!(carver.arena().region(top[0]).unwrap().adjacent_count(), 4);
        assert!(carver.arena().check_symmetry().is_ok());
    }

    #[test]
    fn test_touching_floor_tiles_are_linked() {
        let obstacles = [
            obstacle(vec3(0.0, 0.0, 0.0), vec3(2.0, 1.0, 2.0)),
            obstacle(vec3(2.0, 0.0, 0.0), vec3(2.0, 1.0, 2.0)),
        ];
        let mut carver = Carver::new(&obstacles, &WalkmapSettings::default());
        let left = carver.process_object(0).unwrap();
        let right = carver.process_object(1).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(right.len(), 1);

        let region = carver.arena().region(left[0]).unwrap();
        assert_eq!(region.size(), vec2(2.0, 2.0));
        assert!(region.is_adjacent(right[0]));
    }

    #[test]
    fn test_adjacency_survives_carving_the_step() {
        let obstacles = [
            // Floor, top 0.5
            obstacle(vec3(0.0, 0.0, 0.0), vec3(8.0, 1.0, 8.0)),
            // Step, top 1.0
            obstacle(vec3(0.0, 0.5, 0.0), vec3(4.0, 1.0, 4.0)),
            // Pillar standing on the step, top 3.0
            obstacle(vec3(0.0, 1.5, 0.0), vec3(1.0, 3.0, 1.0)),
        ];
        let mut carver = Carver::new(&obstacles, &settings(2.0, 0.5));
        let floor = carver.process_object(0).unwrap();
        let step = carver.process_object(1).unwrap();
        assert_eq!(floor.len(), 4);
        assert_eq!(step.len(), 4);

        let arena = carver.arena();
        assert!(arena.check_symmetry().is_ok());
        for &f in &floor {
            let region = arena.region(f).unwrap();
            assert!(region.adjacent().any(|n| step.contains(&n)), "{} lost its step edge", f);
        }
    }
}
