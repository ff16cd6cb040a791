// obstacle.rs - Static box obstacles consumed by the carving engine

use glam::{Vec2, Vec3, vec2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WalkmapError};
use crate::geometry::Rect;

/// A box-shaped blocker. Rotation has already been snapped to quarter turns
/// and folded into `scale`, so the box is axis aligned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Center of the box
    pub position: Vec3,
    /// Rotation in degrees, kept for reference only
    pub rotation: Vec3,
    /// Full extent on each axis (width, height, depth)
    pub scale: Vec3,
}

impl Obstacle {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Elevation of the top face
    pub fn top(&self) -> f32 {
        self.position.y + self.scale.y / 2.0
    }

    /// Elevation of the bottom face
    pub fn bottom(&self) -> f32 {
        self.position.y - self.scale.y / 2.0
    }

    pub fn footprint_center(&self) -> Vec2 {
        vec2(self.position.x, self.position.z)
    }

    pub fn footprint_size(&self) -> Vec2 {
        vec2(self.scale.x, self.scale.z)
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(self.footprint_center(), self.footprint_size())
    }

    /// Copy of this obstacle grown by `radius` on X and Z
    pub fn inflated(&self, radius: f32) -> Self {
        let mut scale = self.scale;
        scale.x += radius;
        scale.z += radius;
        Self { scale, ..*self }
    }

    /// `index` is only used to name the obstacle in the error
    pub fn validate(&self, index: usize) -> Result<()> {
        if !self.position.is_finite() {
            return Err(WalkmapError::InvalidObstacle {
                index,
                reason: format!("position {} is not finite", self.position),
            });
        }
        if !self.scale.is_finite() {
            return Err(WalkmapError::InvalidObstacle {
                index,
                reason: format!("scale {} is not finite", self.scale),
            });
        }
        if self.scale.min_element() < 0.0 {
            return Err(WalkmapError::InvalidObstacle {
                index,
                reason: format!("scale {} has a negative component", self.scale),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    #[test]
    fn test_faces() {
        let obstacle = Obstacle::new(vec3(0.0, 2.0, 0.0), Vec3::ZERO, vec3(2.0, 1.0, 2.0));
        assert_eq!(obstacle.top(), 2.5);
        assert_eq!(obstacle.bottom(), 1.5);
        assert_eq!(obstacle.footprint(), Rect::new(Vec2::ZERO, vec2(2.0, 2.0)));
    }

    #[test]
    fn test_inflated_grows_footprint_only() {
        let obstacle = Obstacle::new(vec3(1.0, 0.0, 1.0), Vec3::ZERO, vec3(2.0, 1.0, 3.0));
        let inflated = obstacle.inflated(0.25);
        assert_eq!(inflated.scale, vec3(2.25, 1.0, 3.25));
        assert_eq!(inflated.position, obstacle.position);
    }

    #[test]
    fn test_validate() {
        let good = Obstacle::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE);
        assert!(good.validate(0).is_ok());

        let negative = Obstacle::new(Vec3::ZERO, Vec3::ZERO, vec3(1.0, -1.0, 1.0));
        assert!(matches!(
            negative.validate(3),
            Err(WalkmapError::InvalidObstacle { index: 3, .. })
        ));

        let nan = Obstacle::new(vec3(f32::NAN, 0.0, 0.0), Vec3::ZERO, Vec3::ONE);
        assert!(nan.validate(0).is_err());
    }
}
