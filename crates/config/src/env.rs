//! Environment variable overrides
//!
//! | variable | field |
//! |----------|-------|
//! | `CHALKBOARD_WIDTH`, `CHALKBOARD_HEIGHT` | `display` |
//! | `CHALKBOARD_MAX_BOARDS` | `boards.max_boards` |
//! | `CHALKBOARD_TOOL_SIZE` | `tool.default_size` |
//! | `CHALKBOARD_MAX_DABS`, `CHALKBOARD_SEED` | `render` |
//! | `CHALKBOARD_HAPTICS` | `haptics.enabled` |
//! | `CHALKBOARD_ANALYSIS_ENDPOINT`, `CHALKBOARD_ANALYSIS_MODEL` | `analysis` |
//! | `CHALKBOARD_ANALYSIS_TIMEOUT` | `analysis.timeout_secs` |
//! | `CHALKBOARD_API_KEY`, then `GEMINI_API_KEY`, then `API_KEY` | `analysis.api_key` |

use std::str::FromStr;

use tracing::debug;

use crate::{ChalkboardConfig, ConfigError};

const API_KEY_VARS: [&str; 3] = ["CHALKBOARD_API_KEY", "GEMINI_API_KEY", "API_KEY"];

impl ChalkboardConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in production)
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        env.parse("CHALKBOARD_WIDTH", &mut self.display.width)?;
        env.parse("CHALKBOARD_HEIGHT", &mut self.display.height)?;
        env.parse("CHALKBOARD_MAX_BOARDS", &mut self.boards.max_boards)?;
        env.parse("CHALKBOARD_TOOL_SIZE", &mut self.tool.default_size)?;
        env.parse("CHALKBOARD_MAX_DABS", &mut self.render.max_dabs_per_segment)?;
        if let Some(seed) = env.get("CHALKBOARD_SEED") {
            self.render.seed = Some(parse_value("CHALKBOARD_SEED", &seed)?);
        }
        if let Some(value) = env.get("CHALKBOARD_HAPTICS") {
            self.haptics.enabled = parse_flag("CHALKBOARD_HAPTICS", &value)?;
        }
        if let Some(endpoint) = env.get("CHALKBOARD_ANALYSIS_ENDPOINT") {
            self.analysis.endpoint = endpoint;
        }
        if let Some(model) = env.get("CHALKBOARD_ANALYSIS_MODEL") {
            self.analysis.model = model;
        }
        env.parse("CHALKBOARD_ANALYSIS_TIMEOUT", &mut self.analysis.timeout_secs)?;

        if let Some(key) = API_KEY_VARS.iter().find_map(|var| env.get(var)) {
            self.analysis.api_key = Some(key);
        }
        Ok(())
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-empty, trimmed value
    fn get(&self, key: &str) -> Option<String> {
        let value = (self.lookup)(key)?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn parse<T: FromStr>(&self, key: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Some(value) = self.get(key) {
            *target = parse_value(key, &value)?;
            debug!("config override from {}", key);
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
