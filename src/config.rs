//! Runtime configuration for checkpoint-trim.
//!
//! Configuration can be loaded from a JSON file or constructed programmatically.
//! Search knobs (trim policy, candidate cap) and report settings live here.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::schedule::TrimPolicy;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "checkpoint-trim", about = "Optimal checkpoint/recompute schedules under a memory budget")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "checkpoint-trim.json")]
    pub config: PathBuf,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Trim a cache state to fit a budget and print the resulting schedule.
    Optimize {
        /// Cache state notation: 'x' resident, ' ' or '.' forgotten, position 0 first.
        state: String,

        /// Maximum number of resident positions.
        #[arg(short, long)]
        budget: u32,
    },

    /// Print the recompute cost of sweeping a fixed cache state.
    Cost {
        /// Cache state notation: 'x' resident, ' ' or '.' forgotten, position 0 first.
        state: String,

        /// Maximum number of resident positions.
        #[arg(short, long)]
        budget: u32,
    },

    /// Print the CTZ ruler eviction diagram next to the optimizer's cost.
    ///
    /// Long chains make the exhaustive search explode, so every row runs
    /// under a candidate cap; rows that hit it are reported as truncated.
    Ruler {
        /// Number of steps to print (at most 64).
        #[arg(short, long, default_value_t = 32)]
        steps: usize,

        /// Candidates scored per search when the config sets no cap.
        #[arg(long, default_value_t = 100_000)]
        max_candidates: u64,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trim search settings.
    pub search: SearchConfig,

    /// Report settings.
    pub report: ReportConfig,
}

/// Trim search settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which resident positions may never be evicted.
    pub policy: TrimPolicy,

    /// Maximum number of candidates scored per search (None = exhaustive).
    pub max_candidates: Option<u64>,
}

/// What the driver prints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Print every sweep step after optimising.
    pub show_steps: bool,

    /// Emit results as JSON instead of text.
    pub json: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_steps: true,
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}
