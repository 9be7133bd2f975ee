use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tiltcast_kernel::{MapConfig, MovementConfig};
use tiltcast_render::{Palette, PixelFormat, Viewport};

/// Everything the controller needs, loadable from YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub map: MapConfig,
    pub movement: MovementConfig,
    pub viewport: Viewport,
    pub pixel_format: PixelFormat,
    pub palette: Palette,
    /// Fixed tick period in milliseconds.
    pub tick_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            movement: MovementConfig::default(),
            viewport: Viewport::default(),
            pixel_format: PixelFormat::default(),
            palette: Palette::default(),
            tick_ms: 50,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        anyhow::ensure!(config.map.size > 0, "map.size must be positive");
        anyhow::ensure!(
            config.viewport.width > 0 && config.viewport.height > 0,
            "viewport must be non-empty"
        );
        anyhow::ensure!(config.tick_ms > 0, "tick_ms must be positive");
        Ok(config)
    }
}
