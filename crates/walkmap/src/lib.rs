//! Walkmap generation from box-shaped level geometry.
//!
//! Every obstacle's top face is a candidate walkable surface. Taller
//! obstacles close enough overhead are carved out of it, surfaces within a
//! step of each other are linked, and everything not reachable from the
//! first surface is dropped. The result is a flat list of rectangles with
//! adjacency by index.

pub mod assembly;
pub mod carve;
pub mod error;
pub mod geometry;
pub mod obstacle;
pub mod ordering;
pub mod reachability;
pub mod region;
pub mod settings;

use serde::Serialize;
use tracing::{debug, info, warn};

pub use assembly::{WalkRegion, Walkmap};
pub use error::{Result, WalkmapError};
pub use obstacle::Obstacle;
pub use settings::WalkmapSettings;

use carve::Carver;
use reachability::{flood_fill, prune_unreachable};

/// Counts collected while generating a walkmap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WalkmapReport {
    pub obstacles: usize,
    /// Regions left after carving, before pruning
    pub carved_regions: usize,
    pub pruned_regions: usize,
    /// Obstacles whose top received at least one step edge
    pub stepped_onto: usize,
}

/// Build the walkmap for `obstacles`.
///
/// Obstacles must already be axis aligned and grown by the player radius.
/// No obstacles, or nothing left after pruning, gives an empty walkmap.
pub fn generate_walkmap(obstacles: &[Obstacle], settings: &WalkmapSettings) -> Result<(Walkmap, WalkmapReport)> {
    settings.validate()?;
    for (index, obstacle) in obstacles.iter().enumerate() {
        obstacle.validate(index)?;
    }

    let mut report = WalkmapReport {
        obstacles: obstacles.len(),
        ..Default::default()
    };

    if obstacles.is_empty() {
        warn!("No obstacles given, the walkmap is empty");
        return Ok((Walkmap::empty(*settings), report));
    }

    let mut carver = Carver::new(obstacles, settings);
    let mut regions = Vec::new();
    for rank in 0..obstacles.len() {
        regions.extend(carver.process_object(rank)?);
    }
    report.stepped_onto = carver.stepped_onto_count();

    let mut arena = carver.into_arena();
    arena.check_symmetry()?;

    regions.retain(|&id| arena.get(id).is_some_and(|r| !r.is_degenerate()));
    report.carved_regions = regions.len();

    let Some(&seed) = regions.first() else {
        warn!("Carving left no walkable regions, the walkmap is empty");
        return Ok((Walkmap::empty(*settings), report));
    };

    let reached = flood_fill(&mut arena, seed)?;
    debug!("Flood fill from region {} reached {} region(s)", seed, reached);
    let (regions, pruned) = prune_unreachable(&mut arena, regions)?;
    report.pruned_regions = pruned;

    let walkmap = assembly::assemble(&arena, &regions, *settings)?;

    info!(
        "Walkmap: {} obstacle(s) -> {} region(s), {} unreachable pruned, {} kept with {} edge(s)",
        report.obstacles,
        report.carved_regions,
        report.pruned_regions,
        walkmap.len(),
        walkmap.edge_count()
    );

    Ok((walkmap, report))
}
