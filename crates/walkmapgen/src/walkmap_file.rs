// walkmap_file.rs - .walkmap text format and JSON output
//
//   &[playerHeight,playerRadius,stepHeight,maxPlayerSpeed,heightSpeed]
//   $[x,y,z,width,depth,adjacent...]
//
// Regions appear in index order; adjacency entries are region indices.

use std::fmt::Write as _;

use glam::{vec2, vec3};
use walkmap::settings::NUM_SETTINGS;
use walkmap::{WalkRegion, Walkmap, WalkmapSettings};

use crate::blocks::{Block, BlockError, parse_blocks};

pub const REGION_BLOCK: char = '$';
pub const SETTINGS_BLOCK: char = '&';

/// Position (3) plus footprint (2)
const REGION_FLOATS: usize = 5;

/// Join values with the parameter delimiter
fn join<T: std::fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    let mut out = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", value);
    }
    out
}

pub fn settings_block(settings: &WalkmapSettings) -> String {
    format!("{}[{}]\n", SETTINGS_BLOCK, join(settings.to_array()))
}

pub fn write_walkmap(walkmap: &Walkmap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# walkmap");
    let _ = writeln!(out, "# {} region(s), {} edge(s)", walkmap.len(), walkmap.edge_count());
    out.push_str(&settings_block(&walkmap.settings));

    for region in &walkmap.regions {
        let p = region.position;
        let s = region.size;
        let geometry = join([p.x, p.y, p.z, s.x, s.y]);
        if region.adjacent.is_empty() {
            let _ = writeln!(out, "{}[{}]", REGION_BLOCK, geometry);
        } else {
            let _ = writeln!(out, "{}[{},{}]", REGION_BLOCK, geometry, join(&region.adjacent));
        }
    }
    out
}

pub fn write_walkmap_json(walkmap: &Walkmap) -> serde_json::Result<String> {
    serde_json::to_string_pretty(walkmap)
}

fn parse_region(block: &Block) -> Result<WalkRegion, BlockError> {
    let [x, y, z, width, depth] = block.floats::<REGION_FLOATS>(0)?;
    let adjacent = (REGION_FLOATS..block.params.len())
        .map(|i| block.number::<usize>(i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WalkRegion {
        position: vec3(x, y, z),
        size: vec2(width, depth),
        adjacent,
    })
}

/// Read a walkmap back. Adjacency must be in range and symmetric.
pub fn read_walkmap(input: &str) -> Result<Walkmap, BlockError> {
    let mut walkmap = Walkmap::default();

    for block in parse_blocks(input, &[REGION_BLOCK, SETTINGS_BLOCK])? {
        if block.kind == SETTINGS_BLOCK {
            let values = (0..block.params.len().min(NUM_SETTINGS))
                .map(|i| block.float(i))
                .collect::<Result<Vec<_>, _>>()?;
            walkmap.settings.apply_values(&values);
        } else {
            walkmap.regions.push(parse_region(&block)?);
        }
    }

    walkmap.validate()?;
    Ok(walkmap)
}
