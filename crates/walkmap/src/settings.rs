// settings.rs - Player capsule and world settings used for walkmap generation

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalkmapError};

pub const DEFAULT_PLAYER_HEIGHT: f32 = 2.0;
pub const DEFAULT_PLAYER_RADIUS: f32 = 0.25;
pub const DEFAULT_STEP_HEIGHT: f32 = 0.4;
pub const DEFAULT_MAX_PLAYER_SPEED: f32 = 2.0;
pub const DEFAULT_HEIGHT_SPEED: f32 = 10.0;

/// Number of values carried by a settings block
pub const NUM_SETTINGS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkmapSettings {
    /// Obstacles whose bottom is at least this far above a surface do not block it
    #[serde(default = "default_player_height")]
    pub player_height: f32,
    /// Footprint growth applied to every obstacle before carving
    #[serde(default = "default_player_radius")]
    pub player_radius: f32,
    /// Largest vertical offset the player can step across
    #[serde(default = "default_step_height")]
    pub step_height: f32,
    /// Passed through to the walkmap consumer, unused by carving
    #[serde(default = "default_max_player_speed")]
    pub max_player_speed: f32,
    /// Passed through to the walkmap consumer, unused by carving
    #[serde(default = "default_height_speed")]
    pub height_speed: f32,
}

fn default_player_height() -> f32 { DEFAULT_PLAYER_HEIGHT }
fn default_player_radius() -> f32 { DEFAULT_PLAYER_RADIUS }
fn default_step_height() -> f32 { DEFAULT_STEP_HEIGHT }
fn default_max_player_speed() -> f32 { DEFAULT_MAX_PLAYER_SPEED }
fn default_height_speed() -> f32 { DEFAULT_HEIGHT_SPEED }

impl Default for WalkmapSettings {
    fn default() -> Self {
        Self {
            player_height: default_player_height(),
            player_radius: default_player_radius(),
            step_height: default_step_height(),
            max_player_speed: default_max_player_speed(),
            height_speed: default_height_speed(),
        }
    }
}

impl WalkmapSettings {
    /// Values in settings-block order
    pub fn to_array(&self) -> [f32; NUM_SETTINGS] {
        [
            self.player_height,
            self.player_radius,
            self.step_height,
            self.max_player_speed,
            self.height_speed,
        ]
    }

    /// Overwrite the leading settings with `values`, in settings-block order.
    /// Extra values are ignored.
    pub fn apply_values(&mut self, values: &[f32]) {
        let fields = [
            &mut self.player_height,
            &mut self.player_radius,
            &mut self.step_height,
            &mut self.max_player_speed,
            &mut self.height_speed,
        ];
        for (field, value) in fields.into_iter().zip(values) {
            *field = *value;
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("playerHeight", self.player_height),
            ("playerRadius", self.player_radius),
            ("stepHeight", self.step_height),
            ("maxPlayerSpeed", self.max_player_speed),
            ("heightSpeed", self.height_speed),
        ] {
            if !value.is_finite() {
                return Err(WalkmapError::InvalidSetting {
                    name,
                    reason: format!("{} is not a finite number", value),
                });
            }
        }

        if self.player_height <= 0.0 {
            return Err(WalkmapError::InvalidSetting {
                name: "playerHeight",
                reason: format!("must be greater than 0, got {}", self.player_height),
            });
        }
        if self.player_radius < 0.0 {
            return Err(WalkmapError::InvalidSetting {
                name: "playerRadius",
                reason: format!("must not be negative, got {}", self.player_radius),
            });
        }
        if self.step_height < 0.0 {
            return Err(WalkmapError::InvalidSetting {
                name: "stepHeight",
                reason: format!("must not be negative, got {}", self.step_height),
            });
        }
        Ok(())
    }
}
