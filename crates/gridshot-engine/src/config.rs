//! Engine configuration.
//!
//! Provides the driver settings (which map, how long, how fast, where scores
//! go) plus the nested gameplay tunables under `[sim]`. Configuration can be
//! loaded from and saved to a TOML file.

use gridshot_common::MapId;
use gridshot_gameplay::SimConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter, ParseError};

/// Configuration file name.
pub const CONFIG_FILE: &str = "gridshot.toml";

/// Log filter used when none is configured or the configured one is invalid.
pub const DEFAULT_LOG_FILTER: &str = "gridshot=info";

/// On-disk format of the high-score file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreFormat {
    /// Versioned JSON document
    #[default]
    Json,
    /// One-column CSV with a `score` header
    Csv,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Run Settings ===
    /// Canonical map to play (0, 1 or 2)
    pub map_id: u8,
    /// Maximum number of ticks before the run stops
    pub max_ticks: u32,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,

    // === Logging ===
    /// Tracing directive added on top of `RUST_LOG`, e.g. `gridshot=debug`
    pub log_filter: String,

    // === Scores ===
    /// High-score file path
    pub score_file: PathBuf,
    /// High-score file format
    pub score_format: ScoreFormat,

    // === Autopilot ===
    /// Minimum ticks between autopilot shots
    pub fire_interval: u32,

    // === Simulation ===
    /// Gameplay tunables
    pub sim: SimConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map_id: 0,
            max_ticks: 60 * 300,
            tick_rate: 60,
            realtime: false,

            log_filter: DEFAULT_LOG_FILTER.to_string(),

            score_file: PathBuf::from("highscores.json"),
            score_format: ScoreFormat::Json,

            fire_interval: 30,

            sim: SimConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_rate = self.tick_rate.clamp(1, 1000);
        self.max_ticks = self.max_ticks.max(1);
        self.fire_interval = self.fire_interval.max(1);
        if let (_, Some(e)) = self.log_directive() {
            warn!("Invalid log filter `{}` ({e}), using `{DEFAULT_LOG_FILTER}`", self.log_filter);
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        } else if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
        self.sim.validate();
    }

    /// Tracing directive for `log_filter`.
    ///
    /// A filter that does not parse yields the default directive together
    /// with the parse error, so startup never aborts on a bad config value.
    pub fn log_directive(&self) -> (Directive, Option<ParseError>) {
        if self.log_filter.trim().is_empty() {
            return (default_directive(), None);
        }
        match self.log_filter.parse() {
            Ok(directive) => (directive, None),
            Err(e) => (default_directive(), Some(e)),
        }
    }

    /// The map to play.
    #[must_use]
    pub fn map(&self) -> MapId {
        MapId::new(self.map_id)
    }

    /// Seconds per simulation tick.
    #[must_use]
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Gameplay config with the attack chance rescaled to the configured
    /// tick rate.
    #[must_use]
    pub fn effective_sim(&self) -> SimConfig {
        let mut sim = self.sim.clone();
        sim.attack_chance_per_tick = sim.attack_chance_at(self.tick_rate as f32);
        sim
    }
}

fn default_directive() -> Directive {
    DEFAULT_LOG_FILTER
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into())
}
