// world.rs - .world level description reader
//
// Block kinds:
//   $[px,py,pz, rx,ry,rz, sx,sy,sz, model, texture]   object (strings optional)
//   @[name, ox,oy,oz, sx,sy,sz]                        footprint template for a model
//   &[playerHeight, playerRadius, stepHeight, maxPlayerSpeed, heightSpeed]
//
// Rotations are in degrees. Only quarter turns are supported: every rotation
// is snapped to the nearest one and folded into the box extents.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use glam::{Vec3, vec3};
use tracing::{debug, warn};
use walkmap::Obstacle;
use walkmap::settings::NUM_SETTINGS;

use crate::blocks::{Block, BlockError, parse_blocks};

pub const OBJECT_BLOCK: char = '$';
pub const TEMPLATE_BLOCK: char = '@';
pub const SETTINGS_BLOCK: char = '&';

const OBJECT_FLOATS: usize = 9;
const TEMPLATE_PARAMS: usize = 7;

/// An object block as written in the file
#[derive(Clone, Debug, PartialEq)]
pub struct WorldObject {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub model: Option<String>,
    pub texture: Option<String>,
}

/// Correction from a unit-scale model to its actual bounding box. Both
/// values are multiplied by the object's scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootprintTemplate {
    pub offset: Vec3,
    pub size: Vec3,
}

impl Default for FootprintTemplate {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            size: Vec3::ONE,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct World {
    pub objects: Vec<WorldObject>,
    pub templates: HashMap<String, FootprintTemplate>,
    /// Values from the last settings block, in block order
    pub settings: Option<Vec<f32>>,
}

impl World {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Invalid path for world {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(input: &str) -> Result<Self, BlockError> {
        let mut world = World::default();

        for block in parse_blocks(input, &[OBJECT_BLOCK, TEMPLATE_BLOCK, SETTINGS_BLOCK])? {
            match block.kind {
                OBJECT_BLOCK => world.objects.push(parse_object(&block)?),
                TEMPLATE_BLOCK => {
                    let (name, template) = parse_template(&block)?;
                    if world.templates.insert(name.clone(), template).is_some() {
                        warn!("line {}: template '{}' redefined", block.line, name);
                    }
                }
                SETTINGS_BLOCK => world.settings = Some(parse_settings(&block)?),
                other => debug!("line {}: skipping '{}' block", block.line, other),
            }
        }

        debug!(
            "Parsed {} object(s), {} template(s)",
            world.objects.len(),
            world.templates.len()
        );
        Ok(world)
    }

    /// Axis-aligned obstacles for every object, with templates applied
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.objects
            .iter()
            .map(|object| {
                let template = object
                    .model
                    .as_deref()
                    .and_then(|model| self.templates.get(model))
                    .copied()
                    .unwrap_or_default();
                resolve_object(object, &template)
            })
            .collect()
    }
}

fn parse_object(block: &Block) -> Result<WorldObject, BlockError> {
    block.require(OBJECT_FLOATS)?;
    let [px, py, pz, rx, ry, rz, sx, sy, sz] = block.floats::<OBJECT_FLOATS>(0)?;
    Ok(WorldObject {
        position: vec3(px, py, pz),
        rotation: vec3(rx, ry, rz),
        scale: vec3(sx, sy, sz),
        model: block.text(OBJECT_FLOATS).map(str::to_string),
        texture: block.text(OBJECT_FLOATS + 1).map(str::to_string),
    })
}

fn parse_template(block: &Block) -> Result<(String, FootprintTemplate), BlockError> {
    block.require(TEMPLATE_PARAMS)?;
    let name = block.params[0].clone();
    let [ox, oy, oz, sx, sy, sz] = block.floats::<6>(1)?;
    Ok((
        name,
        FootprintTemplate {
            offset: vec3(ox, oy, oz),
            size: vec3(sx, sy, sz),
        },
    ))
}

fn parse_settings(block: &Block) -> Result<Vec<f32>, BlockError> {
    (0..block.params.len().min(NUM_SETTINGS))
        .map(|i| block.float(i))
        .collect()
}

/// Number of quarter turns (0-3) closest to `degrees`
pub fn quarter_turns(degrees: f32) -> u32 {
    ((degrees / 90.0).round() as i64).rem_euclid(4) as u32
}

/// Rotate `v` by a number of quarter turns about the X, then Y, then Z axis
fn rotate_quarter_turns(v: Vec3, turns: [u32; 3]) -> Vec3 {
    let mut v = v;
    for _ in 0..turns[0] {
        v = vec3(v.x, -v.z, v.y);
    }
    for _ in 0..turns[1] {
        v = vec3(v.z, v.y, -v.x);
    }
    for _ in 0..turns[2] {
        v = vec3(-v.y, v.x, v.z);
    }
    v
}

/// Apply the template and snapped rotation to produce an axis-aligned box
pub fn resolve_object(object: &WorldObject, template: &FootprintTemplate) -> Obstacle {
    let scale = object.scale.abs();
    let turns = [
        quarter_turns(object.rotation.x),
        quarter_turns(object.rotation.y),
        quarter_turns(object.rotation.z),
    ];

    let offset = rotate_quarter_turns(template.offset * scale, turns);
    let size = rotate_quarter_turns(template.size.abs() * scale, turns).abs();
    let snapped = vec3(turns[0] as f32, turns[1] as f32, turns[2] as f32) * 90.0;

    Obstacle::new(object.position + offset, snapped, size)
}
