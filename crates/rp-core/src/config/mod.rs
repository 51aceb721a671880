//! Startup configuration.
//!
//! A plain `key = value` text format: `#` comments, booleans written as
//! T/F/1/0 (case-insensitive, Y/N accepted), signed integers, and the
//! `power_bonus` key carrying a formula (repeatable). Parsed once at
//! startup; the engine treats the result as immutable for the session.

pub mod formula;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use formula::{Expr, FormulaError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("line {line}: expected 'key = value'")]
    BadLine { line: usize },
    #[error("line {line}: invalid value for '{key}'")]
    BadValue { line: usize, key: String },
    #[error("line {line}: {source}")]
    BadFormula {
        line: usize,
        source: FormulaError,
    },
}

/// Which stockpile optimizer the planner runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HomeOptimizer {
    /// Single-substitution hill climb, the runtime default.
    #[default]
    Greedy,
    /// Full combinatorial search. Exponential; fixtures and tuning only.
    Exhaustive,
}

/// Tunable behavior flags and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotConfig {
    /// Accept more danger before retreating.
    pub plays_risky: bool,
    /// Maintain reserve weapon/armour swaps.
    pub uses_swaps: bool,
    /// Keep playing after reaching the money-scum target.
    pub self_scum: bool,
    /// Enable the stair-scum diving sub-mode.
    pub stair_scum: bool,
    /// Weight offense more heavily in the power evaluation.
    pub worships_damage: bool,
    /// Weight speed more heavily in the power evaluation.
    pub worships_speed: bool,
    pub home_optimizer: HomeOptimizer,
    /// Stop once this much gold is held in town (0 disables).
    pub money_scum_amount: i64,
    /// Stop when reaching this dungeon depth (0 disables).
    pub stop_depth: i32,
    /// Stop when reaching this character level (0 disables).
    pub stop_level: i32,
    /// Items below this value are never offered for sale.
    pub min_sell_value: i64,
    /// Danger accepted as a percentage of current HP at baseline bravery.
    pub risk_percent: i32,
    /// Extra danger tolerance added per escalation rung.
    pub bravery_step_percent: i32,
    /// Formula adjustments added to every power evaluation.
    pub power_bonus: Vec<Expr>,
}

impl Default for PilotConfig {
    fn default() -> Self {
        PilotConfig {
            plays_risky: false,
            uses_swaps: true,
            self_scum: false,
            stair_scum: false,
            worships_damage: false,
            worships_speed: false,
            home_optimizer: HomeOptimizer::Greedy,
            money_scum_amount: 0,
            stop_depth: 0,
            stop_level: 0,
            min_sell_value: 1,
            risk_percent: 60,
            bravery_step_percent: 20,
            power_bonus: Vec::new(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "T" | "TRUE" | "1" | "Y" | "YES" => Some(true),
        "F" | "FALSE" | "0" | "N" | "NO" => Some(false),
        _ => None,
    }
}

impl PilotConfig {
    pub fn load(path: &Path) -> Result<(Self, Vec<String>), ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse config text. Returns the config plus notes about ignored keys;
    /// unknown keys are tolerated so old config files keep loading.
    pub fn parse(text: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut cfg = PilotConfig::default();
        let mut notes = Vec::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or(ConfigError::BadLine { line: line_no })?;
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            let bad = |_| ConfigError::BadValue {
                line: line_no,
                key: key.clone(),
            };
            let bad_bool = || ConfigError::BadValue {
                line: line_no,
                key: key.clone(),
            };

            match key.as_str() {
                "plays_risky" => cfg.plays_risky = parse_bool(value).ok_or_else(bad_bool)?,
                "uses_swaps" => cfg.uses_swaps = parse_bool(value).ok_or_else(bad_bool)?,
                "self_scum" => cfg.self_scum = parse_bool(value).ok_or_else(bad_bool)?,
                "stair_scum" => cfg.stair_scum = parse_bool(value).ok_or_else(bad_bool)?,
                "worships_damage" => {
                    cfg.worships_damage = parse_bool(value).ok_or_else(bad_bool)?
                }
                "worships_speed" => {
                    cfg.worships_speed = parse_bool(value).ok_or_else(bad_bool)?
                }
                "home_optimizer" => {
                    cfg.home_optimizer = match value.to_ascii_lowercase().as_str() {
                        "greedy" => HomeOptimizer::Greedy,
                        "exhaustive" => HomeOptimizer::Exhaustive,
                        _ => return Err(bad_bool()),
                    }
                }
                "money_scum_amount" => {
                    cfg.money_scum_amount = value.parse().map_err(bad)?
                }
                "stop_depth" => cfg.stop_depth = value.parse().map_err(bad)?,
                "stop_level" => cfg.stop_level = value.parse().map_err(bad)?,
                "min_sell_value" => cfg.min_sell_value = value.parse().map_err(bad)?,
                "risk_percent" => cfg.risk_percent = value.parse().map_err(bad)?,
                "bravery_step_percent" => {
                    cfg.bravery_step_percent = value.parse().map_err(bad)?
                }
                "power_bonus" => {
                    let expr: Expr = value.parse().map_err(|source| ConfigError::BadFormula {
                        line: line_no,
                        source,
                    })?;
                    cfg.power_bonus.push(expr);
                }
                other => notes.push(format!("ignoring unknown config key '{other}'")),
            }
        }

        cfg.clamp();
        Ok((cfg, notes))
    }

    /// Pull out-of-range values back into sane bounds.
    fn clamp(&mut self) {
        self.risk_percent = self.risk_percent.clamp(10, 100);
        self.bravery_step_percent = self.bravery_step_percent.clamp(5, 100);
        if self.min_sell_value < 0 {
            self.min_sell_value = 0;
        }
    }
}
