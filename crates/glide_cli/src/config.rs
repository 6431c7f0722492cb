//! Simulation configuration file handling

use anyhow::{Context, Result};
use glide_core::Point;
use glide_layout::ScrollConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level simulation configuration (glide.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub script: ScriptConfig,
}

/// The synthetic data set
#[derive(Debug, Deserialize, Serialize)]
pub struct DataConfig {
    #[serde(default = "default_count")]
    pub count: usize,
    /// Items are labelled `{prefix}{index}`
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_count() -> usize {
    1000
}

fn default_prefix() -> String {
    "item ".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            prefix: default_prefix(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    320.0
}

fn default_height() -> f32 {
    200.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    List,
    Grid,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub kind: LayoutKind,
    /// Main-axis size of one slot
    #[serde(default = "default_slot_size")]
    pub slot_size: f32,
    /// Cross-axis size of one grid cell
    #[serde(default = "default_cell_size")]
    pub cell_cross_extent: f32,
}

fn default_slot_size() -> f32 {
    40.0
}

fn default_cell_size() -> f32 {
    100.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            kind: LayoutKind::List,
            slot_size: default_slot_size(),
            cell_cross_extent: default_cell_size(),
        }
    }
}

/// Scripted input
#[derive(Debug, Deserialize, Serialize)]
pub struct ScriptConfig {
    /// Simulated frame length (ms)
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Stop running a step after this many frames
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_frame_ms() -> f64 {
    16.0
}

fn default_max_frames() -> u32 {
    2000
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            frame_ms: default_frame_ms(),
            max_frames: default_max_frames(),
            steps: Vec::new(),
        }
    }
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    ScrollTo {
        offset: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<f64>,
    },
    Fling {
        /// Total travel
        velocity: f32,
        /// Defaults to the configured scroll duration
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<f64>,
    },
    Drag {
        from: Point,
        to: Point,
        #[serde(default = "default_drag_ms")]
        duration_ms: f64,
        #[serde(default = "default_drag_moves")]
        moves: u32,
    },
    Tap {
        at: Point,
    },
    Center {
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<f64>,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Wait {
        ms: f64,
    },
}

fn default_drag_ms() -> f64 {
    120.0
}

fn default_drag_moves() -> u32 {
    6
}

impl SimulationConfig {
    /// Load configuration from a directory (looks for glide.toml) or a file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join("glide.toml")
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No glide.toml found in {}. Run `glide init` to create one.",
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.scroll.validate()?;
        Ok(config)
    }

    /// Defaults plus a short demo script
    pub fn example() -> Self {
        Self {
            script: ScriptConfig {
                steps: vec![
                    Step::ScrollTo {
                        offset: -400.0,
                        duration_ms: None,
                    },
                    Step::Fling {
                        velocity: -200.0,
                        duration_ms: Some(500.0),
                    },
                    Step::Drag {
                        from: Point::new(100.0, 150.0),
                        to: Point::new(100.0, 30.0),
                        duration_ms: default_drag_ms(),
                        moves: default_drag_moves(),
                    },
                    Step::Center {
                        index: 500,
                        duration_ms: Some(300.0),
                    },
                ],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
