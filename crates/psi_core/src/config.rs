use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::{check_non_negative, check_range, ValidationError};
use crate::motivator::{MotivatorParams, MotivatorSet};
use crate::need::{NeedTankSystem, NeedType, TankParams};
use crate::selector::MotiveSelector;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PsiConfig {
    pub needs: NeedsConfig,
    pub motivator: MotivatorParams,
    pub selector: SelectorConfig,
    pub world: WorldConfig,
    pub perception: PerceptionConfig,
    pub simulation: SimulationConfig,
}

impl PsiConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: PsiConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PSI_SEED") {
            if let Ok(n) = v.parse() {
                self.simulation.seed = n;
            }
        }
        if let Ok(v) = std::env::var("PSI_TICKS") {
            if let Ok(n) = v.parse() {
                self.simulation.ticks = n;
            }
        }
        if let Ok(v) = std::env::var("PSI_DT") {
            if let Ok(n) = v.parse() {
                self.simulation.dt = n;
            }
        }
        if let Ok(v) = std::env::var("PSI_MIN_STRENGTH") {
            if let Ok(n) = v.parse() {
                self.selector.min_strength_threshold = n;
            }
        }
        if let Ok(v) = std::env::var("PSI_TIE_BREAK_RANDOM") {
            if let Ok(b) = v.parse() {
                self.selector.tie_break_random = b;
            }
        }
    }

    /// Build every tank, motivator and the selector once so bad values fail at startup.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.needs.build()?;
        MotivatorSet::new(self.motivator)?;
        self.selector.build()?;
        self.perception.validate()?;
        self.simulation.validate()?;
        Ok(())
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

/// Partial tank override; unset fields keep the built-in default for that need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TankOverrides {
    pub target_level: Option<f64>,
    pub depletion_rate: Option<f64>,
    pub fill_rate: Option<f64>,
    pub critical_threshold: Option<f64>,
}

impl TankOverrides {
    fn apply(&self, base: TankParams) -> TankParams {
        TankParams {
            target_level: self.target_level.unwrap_or(base.target_level),
            depletion_rate: self.depletion_rate.unwrap_or(base.depletion_rate),
            fill_rate: self.fill_rate.unwrap_or(base.fill_rate),
            critical_threshold: self.critical_threshold.unwrap_or(base.critical_threshold),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub hunger: TankOverrides,
    pub thirst: TankOverrides,
    pub energy: TankOverrides,
    pub certainty: TankOverrides,
    pub competence: TankOverrides,
    pub affiliation: TankOverrides,
}

impl NeedsConfig {
    pub fn overrides(&self, need: NeedType) -> &TankOverrides {
        match need {
            NeedType::Hunger => &self.hunger,
            NeedType::Thirst => &self.thirst,
            NeedType::Energy => &self.energy,
            NeedType::Certainty => &self.certainty,
            NeedType::Competence => &self.competence,
            NeedType::Affiliation => &self.affiliation,
        }
    }

    /// Effective parameters: the static default table with overrides applied.
    pub fn params_for(&self, need: NeedType) -> TankParams {
        self.overrides(need).apply(need.default_params())
    }

    pub fn build(&self) -> Result<NeedTankSystem, ValidationError> {
        NeedTankSystem::from_params(|need| self.params_for(need))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub min_strength_threshold: f64,
    pub tie_break_random: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_strength_threshold: 0.01,
            tie_break_random: false,
        }
    }
}

impl SelectorConfig {
    pub fn build(&self) -> Result<MotiveSelector, ValidationError> {
        MotiveSelector::new(self.min_strength_threshold, self.tie_break_random)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Scan radius in tiles (circular).
    pub sensory_radius: i32,
    /// Minimum amount for a resource to be noticed.
    pub resource_detection_threshold: f64,
    /// How many percepts sensory memory keeps.
    pub memory_capacity: usize,
    /// How long (simulation time) a percept stays valid.
    pub memory_decay_time: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            sensory_radius: 5,
            resource_detection_threshold: 0.1,
            memory_capacity: 10,
            memory_decay_time: 30.0,
        }
    }
}

impl PerceptionConfig {
    /// Largest accepted `sensory_radius`.
    pub const MAX_SENSORY_RADIUS: i32 = 1024;

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range(
            "sensory_radius",
            f64::from(self.sensory_radius),
            0.0,
            f64::from(Self::MAX_SENSORY_RADIUS),
        )?;
        check_range(
            "resource_detection_threshold",
            self.resource_detection_threshold,
            0.0,
            1.0,
        )?;
        check_non_negative("memory_decay_time", self.memory_decay_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Time step per tick.
    pub dt: f64,
    pub ticks: u64,
    /// Seeds island generation and the agent's random source.
    pub seed: u64,
    /// Time to wait after an action before choosing again.
    pub action_cooldown: f64,
    /// Time to wait after a tick that produced no action.
    pub idle_cooldown: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            ticks: 200,
            seed: 42,
            action_cooldown: 0.0,
            idle_cooldown: 0.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative("dt", self.dt)?;
        check_non_negative("action_cooldown", self.action_cooldown)?;
        check_non_negative("idle_cooldown", self.idle_cooldown)
    }
}

// ============================================================================
// Tests
// ============================================================================
