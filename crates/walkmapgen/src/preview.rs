// preview.rs - Renderable .world description of walkmap regions
//
// Each region becomes a thin box object sitting just under its surface, so
// the walkmap can be inspected in any viewer that loads .world files.

use std::fmt::Write as _;

use walkmap::{Obstacle, WalkRegion, WalkmapSettings};

use crate::walkmap_file::settings_block;
use crate::world::OBJECT_BLOCK;

pub const PREVIEW_THICKNESS: f32 = 0.05;
pub const PREVIEW_MODEL: &str = "cube";
pub const PREVIEW_TEXTURE: &str = "walkmap";

/// Top faces of raw obstacles, shaped like walkmap regions without edges
pub fn obstacle_tops(obstacles: &[Obstacle]) -> Vec<WalkRegion> {
    obstacles
        .iter()
        .map(|o| WalkRegion {
            position: o.position.with_y(o.top()),
            size: o.footprint_size(),
            adjacent: Vec::new(),
        })
        .collect()
}

pub fn write_preview_world(regions: &[WalkRegion], settings: &WalkmapSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# walkmap preview, {} region(s)", regions.len());
    out.push_str(&settings_block(settings));

    for region in regions {
        let p = region.position;
        let _ = writeln!(
            out,
            "{}[{},{},{},0,0,0,{},{},{},{},{}]",
            OBJECT_BLOCK,
            p.x,
            p.y - PREVIEW_THICKNESS / 2.0,
            p.z,
            region.size.x,
            PREVIEW_THICKNESS,
            region.size.y,
            PREVIEW_MODEL,
            PREVIEW_TEXTURE,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;
    use glam::{Vec3, vec2, vec3};

    #[test]
    fn test_obstacle_tops() {
        let obstacles = [Obstacle::new(vec3(1.0, 0.0, 2.0), Vec3::ZERO, vec3(3.0, 1.0, 4.0))];
        let tops = obstacle_tops(&obstacles);
        assert_eq!(tops[0].position, vec3(1.0, 0.5, 2.0));
        assert_eq!(tops[0].size, vec2(3.0, 4.0));
        assert!(tops[0].adjacent.is_empty());
    }

    #[test]
    fn test_preview_is_a_loadable_world() {
        let regions = [WalkRegion {
            position: vec3(1.0, 0.5, 2.0),
            size: vec2(3.0, 4.0),
            adjacent: vec![],
        }];
        let text = write_preview_world(&regions, &WalkmapSettings::default());
        let world = World::parse(&text).unwrap();

        assert_eq!(world.settings, Some(WalkmapSettings::default().to_array().to_vec()));
        assert_eq!(world.objects.len(), 1);
        let object = &world.objects[0];
        assert_eq!(object.scale, vec3(3.0, PREVIEW_THICKNESS, 4.0));
        assert!((object.position.y + PREVIEW_THICKNESS / 2.0 - 0.5).abs() < 1e-6);
        assert_eq!(object.model.as_deref(), Some(PREVIEW_MODEL));
        assert_eq!(object.texture.as_deref(), Some(PREVIEW_TEXTURE));
    }
}
