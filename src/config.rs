//! Optional TOML configuration shared by both binaries
//!
//! ```toml
//! [game]
//! text_format = "length-prefixed"   # or "separated"
//! seed = 1234                       # fixed random seed
//! wrap_width = 80
//! instruction_limit = 5000000
//!
//! [graphics]
//! output = "out.ppm"
//! colours = [[0, 0, 0], [255, 0, 0], ...]   # eight entries
//! ```

use crate::error::VmError;
use crate::raster::DEFAULT_COLOURS;
use crate::text::TextFormat;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "LEVELNINE_CONFIG";
/// Config file looked for in the working directory
pub const CONFIG_FILE: &str = "levelnine.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub game: GameConfig,
    pub graphics: GraphicsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub text_format: TextFormat,
    pub seed: Option<u16>,
    pub wrap_width: usize,
    pub instruction_limit: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            text_format: TextFormat::default(),
            seed: None,
            wrap_width: 80,
            instruction_limit: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GraphicsConfig {
    pub output: PathBuf,
    pub colours: [[u8; 3]; 8],
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        GraphicsConfig {
            output: PathBuf::from("out.ppm"),
            colours: DEFAULT_COLOURS,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, VmError> {
        toml::from_str(text).map_err(|e| VmError::Load(format!("invalid config: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self, VmError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| VmError::Load(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Load from `$LEVELNINE_CONFIG`, else `./levelnine.toml` if present,
    /// else defaults
    pub fn load() -> Result<Self, VmError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            debug!("config from {}", path);
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            debug!("config from {}", CONFIG_FILE);
            return Self::from_file(local);
        }
        Ok(Config::default())
    }
}
