//! Shared configuration for the chalkboard
//!
//! This crate is the single source of truth for display size, board
//! limits, tool defaults, renderer limits, haptics and the analysis
//! service. Values come from the defaults below, then an optional JSON
//! file, then `CHALKBOARD_*` environment variables (see [`env`]).

pub mod env;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1920;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Largest accepted width or height, matching the raster surface limit
pub const MAX_DISPLAY_DIMENSION: u32 = 16384;

/// Boards available without an upgrade
pub const DEFAULT_MAX_BOARDS: usize = 4;

pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a friendly and helpful teacher using a \
    digital blackboard. Keep your answers concise, encouraging, and formatted with Markdown.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Display configuration for the drawing area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width in logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardsConfig {
    pub max_boards: usize,
}

impl Default for BoardsConfig {
    fn default() -> Self {
        Self {
            max_boards: DEFAULT_MAX_BOARDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Base chalk size of a new session
    pub default_size: f32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self { default_size: 4.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound on dabs rendered for one pointer segment
    pub max_dabs_per_segment: usize,
    /// Fixed texture seed; clock-seeded when absent
    pub seed: Option<u64>,
    /// Dirty tracking granularity
    pub tile_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_dabs_per_segment: 4096,
            seed: None,
            tile_size: 128,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticsConfig {
    pub enabled: bool,
    pub stroke_start_ms: u64,
    pub grain_ms: u64,
    /// Pointer travel between grain pulses
    pub grain_distance: f32,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stroke_start_ms: 10,
            grain_ms: 5,
            grain_distance: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base URL of the generateContent API
    pub endpoint: String,
    pub model: String,
    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
    pub system_instruction: String,
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ANALYSIS_ENDPOINT.to_string(),
            model: DEFAULT_ANALYSIS_MODEL.to_string(),
            api_key: None,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChalkboardConfig {
    pub display: DisplayConfig,
    pub boards: BoardsConfig,
    pub tool: ToolConfig,
    pub render: RenderConfig,
    pub haptics: HapticsConfig,
    pub analysis: AnalysisConfig,
}

impl ChalkboardConfig {
    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            "Loaded config: {}x{} display, {} boards max, analysis model {}",
            config.display.width,
            config.display.height,
            config.boards.max_boards,
            config.analysis.model
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a JSON document; missing sections and fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let display = &self.display;
        if display.width > MAX_DISPLAY_DIMENSION || display.height > MAX_DISPLAY_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "display {}x{} exceeds the {MAX_DISPLAY_DIMENSION} pixel limit",
                display.width, display.height
            )));
        }
        if self.boards.max_boards == 0 {
            return Err(ConfigError::Invalid("boards.max_boards must be at least 1".into()));
        }
        if !(self.tool.default_size.is_finite() && self.tool.default_size > 0.0) {
            return Err(ConfigError::Invalid("tool.default_size must be positive".into()));
        }
        if self.render.max_dabs_per_segment == 0 {
            return Err(ConfigError::Invalid(
                "render.max_dabs_per_segment must be at least 1".into(),
            ));
        }
        if self.render.tile_size == 0 {
            return Err(ConfigError::Invalid("render.tile_size must be at least 1".into()));
        }
        if !(self.haptics.grain_distance.is_finite() && self.haptics.grain_distance > 0.0) {
            return Err(ConfigError::Invalid("haptics.grain_distance must be positive".into()));
        }
        Ok(())
    }
}
