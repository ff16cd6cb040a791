// reachability.rs - Flood fill over the region graph and pruning of what it misses

use tracing::debug;

use crate::error::Result;
use crate::region::{Region, RegionArena, RegionId};

/// Mark every region reachable from `seed` as visited and clear the mark on
/// all others. Returns the number of regions reached.
///
/// Uses an explicit work list; the graph is cyclic and can be far deeper
/// than the call stack.
pub fn flood_fill(arena: &mut RegionArena, seed: RegionId) -> Result<usize> {
    arena.clear_visited();

    let mut pending = vec![seed];
    let mut reached = 0;

    while let Some(id) = pending.pop() {
        let region = arena.region(id)?;
        if region.visited() {
            continue;
        }

        pending.extend(
            region
                .adjacent()
                .filter(|&n| arena.get(n).is_none_or(|r| !r.visited())),
        );
        arena.set_visited(id, true)?;
        reached += 1;
    }

    Ok(reached)
}

/// Split `regions` into the visited ones, which are returned in their
/// original order, and the rest, which are destroyed. Returns the kept
/// regions and the number destroyed.
pub fn prune_unreachable(arena: &mut RegionArena, regions: Vec<RegionId>) -> Result<(Vec<RegionId>, usize)> {
    let (kept, unreached): (Vec<RegionId>, Vec<RegionId>) = regions
        .into_iter()
        .partition(|&id| arena.get(id).is_some_and(Region::visited));

    for &id in &unreached {
        arena.destroy(id)?;
    }

    debug!("Pruned {} unreachable region(s), {} remain", unreached.len(), kept.len());
    Ok((kept, unreached.len()))
}
