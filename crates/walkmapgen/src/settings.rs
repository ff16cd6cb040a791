// settings.rs - Layered resolution of the walkmap settings
//
// Lowest precedence first: built-in defaults, config file (or `Walkmap_*`
// environment variables), the world's settings block, command-line flags.

use tracing::debug;
use walkmap::WalkmapSettings;
use walkmap_shared::config::Config;

pub const ENV_PREFIX: &str = "Walkmap_";

/// Config keys in settings-block order
const CONFIG_KEYS: [&str; 5] = [
    "PlayerHeight",
    "PlayerRadius",
    "StepHeight",
    "MaxPlayerSpeed",
    "HeightSpeed",
];

/// Values given on the command line
#[derive(Clone, Copy, Debug, Default)]
pub struct SettingOverrides {
    pub player_height: Option<f32>,
    pub player_radius: Option<f32>,
    pub step_height: Option<f32>,
    pub max_player_speed: Option<f32>,
    pub height_speed: Option<f32>,
}

impl SettingOverrides {
    fn values(&self) -> [Option<f32>; 5] {
        [
            self.player_height,
            self.player_radius,
            self.step_height,
            self.max_player_speed,
            self.height_speed,
        ]
    }
}

/// Overwrite each setting for which `values` has an entry
fn apply_optional(settings: &mut WalkmapSettings, values: [Option<f32>; 5]) {
    let mut merged = settings.to_array();
    for (slot, value) in merged.iter_mut().zip(values) {
        if let Some(value) = value {
            *slot = value;
        }
    }
    settings.apply_values(&merged);
}

pub fn resolve_settings(
    config: &Config,
    world: Option<&[f32]>,
    overrides: &SettingOverrides,
) -> WalkmapSettings {
    let mut settings = WalkmapSettings::default();

    apply_optional(&mut settings, CONFIG_KEYS.map(|key| config.get_float(key)));

    if let Some(values) = world {
        debug!("World settings block: {:?}", values);
        settings.apply_values(values);
    }

    apply_optional(&mut settings, overrides.values());
    settings
}
