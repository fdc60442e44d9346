//! Need tanks: the "Wasserkessel" model
//!
//! Every need is a leaky bucket. It drains at a fixed rate and is refilled by
//! satisfaction events. The gap between the target level (Sollmarke) and the
//! current level (Ist-Zustand) is the Bedarf that feeds the motivators.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{check_non_negative, check_range, ValidationError};

/// The six fundamental needs. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedType {
    // Material (physiological)
    Hunger,
    Thirst,
    Energy,
    // Informational (cognitive/social)
    Certainty,
    Competence,
    Affiliation,
}

impl NeedType {
    pub const COUNT: usize = 6;

    /// All needs in ordinal order.
    pub const ALL: [NeedType; Self::COUNT] = [
        NeedType::Hunger,
        NeedType::Thirst,
        NeedType::Energy,
        NeedType::Certainty,
        NeedType::Competence,
        NeedType::Affiliation,
    ];

    pub fn is_material(self) -> bool {
        matches!(self, NeedType::Hunger | NeedType::Thirst | NeedType::Energy)
    }

    pub fn is_informational(self) -> bool {
        !self.is_material()
    }

    pub fn name(self) -> &'static str {
        match self {
            NeedType::Hunger => "hunger",
            NeedType::Thirst => "thirst",
            NeedType::Energy => "energy",
            NeedType::Certainty => "certainty",
            NeedType::Competence => "competence",
            NeedType::Affiliation => "affiliation",
        }
    }

    /// Built-in tank parameters for this need.
    pub fn default_params(self) -> TankParams {
        DEFAULT_TANK_PARAMS[self.index()]
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for NeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tunable parameters of one tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankParams {
    pub target_level: f64,
    pub depletion_rate: f64,
    pub fill_rate: f64,
    pub critical_threshold: f64,
}

impl TankParams {
    pub const fn new(
        target_level: f64,
        depletion_rate: f64,
        fill_rate: f64,
        critical_threshold: f64,
    ) -> Self {
        Self {
            target_level,
            depletion_rate,
            fill_rate,
            critical_threshold,
        }
    }
}

/// Default tank parameters, indexed by `NeedType` ordinal.
///
/// Material needs drain fast (food every ~50 ticks, water sooner), the
/// informational ones slowly.
pub const DEFAULT_TANK_PARAMS: [TankParams; NeedType::COUNT] = [
    TankParams::new(1.0, 0.02, 0.8, 0.15),  // hunger
    TankParams::new(1.0, 0.03, 0.9, 0.10),  // thirst
    TankParams::new(1.0, 0.015, 0.6, 0.20), // energy
    TankParams::new(1.0, 0.005, 0.3, 0.25), // certainty
    TankParams::new(1.0, 0.008, 0.4, 0.20), // competence
    TankParams::new(1.0, 0.01, 0.5, 0.15),  // affiliation
];

/// Negative and non-finite time steps count as no time passing.
pub(crate) fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}

/// A single deficit source.
///
/// Invariant: `0 <= current_level <= target_level <= 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeedTank {
    need_type: NeedType,
    target_level: f64,
    current_level: f64,
    depletion_rate: f64,
    fill_rate: f64,
    critical_threshold: f64,
}

impl NeedTank {
    /// A full tank (`current_level == target_level`).
    pub fn new(need_type: NeedType, params: TankParams) -> Result<Self, ValidationError> {
        Self::with_level(need_type, params, params.target_level)
    }

    pub fn with_level(
        need_type: NeedType,
        params: TankParams,
        current_level: f64,
    ) -> Result<Self, ValidationError> {
        check_range("target_level", params.target_level, 0.0, 1.0)?;
        check_range("current_level", current_level, 0.0, params.target_level)?;
        check_non_negative("depletion_rate", params.depletion_rate)?;
        check_non_negative("fill_rate", params.fill_rate)?;
        check_range("critical_threshold", params.critical_threshold, 0.0, 1.0)?;

        Ok(Self {
            need_type,
            target_level: params.target_level,
            current_level,
            depletion_rate: params.depletion_rate,
            fill_rate: params.fill_rate,
            critical_threshold: params.critical_threshold,
        })
    }

    pub fn need_type(&self) -> NeedType {
        self.need_type
    }

    pub fn target_level(&self) -> f64 {
        self.target_level
    }

    pub fn current_level(&self) -> f64 {
        self.current_level
    }

    pub fn depletion_rate(&self) -> f64 {
        self.depletion_rate
    }

    pub fn fill_rate(&self) -> f64 {
        self.fill_rate
    }

    pub fn critical_threshold(&self) -> f64 {
        self.critical_threshold
    }

    /// Drain by `depletion_rate * dt`, never below zero.
    pub fn update(&mut self, dt: f64) -> &mut Self {
        let depletion = self.depletion_rate * sanitize_dt(dt);
        self.current_level = (self.current_level - depletion).max(0.0);
        self
    }

    /// Fill by `amount`, or by `fill_rate` when `None`.
    ///
    /// The level never decreases and never passes the target; a negative or
    /// NaN amount has no effect.
    pub fn satisfy(&mut self, amount: Option<f64>) -> &mut Self {
        let amount = amount.unwrap_or(self.fill_rate);
        let amount = if amount > 0.0 { amount } else { 0.0 };
        self.current_level = (self.current_level + amount).min(self.target_level);
        self
    }

    /// Deficit: `target_level - current_level`.
    pub fn bedarf(&self) -> f64 {
        self.target_level - self.current_level
    }

    pub fn is_critical(&self) -> bool {
        self.current_level < self.critical_threshold
    }

    /// `current / target`, 0 for a zero-target tank.
    pub fn satisfaction_ratio(&self) -> f64 {
        if self.target_level == 0.0 {
            0.0
        } else {
            self.current_level / self.target_level
        }
    }

    fn refill(&mut self) {
        self.current_level = self.target_level;
    }
}

/// One tank per need type, fixed for the lifetime of the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeedTankSystem {
    /// Indexed by `NeedType` ordinal.
    tanks: Vec<NeedTank>,
}

impl Default for NeedTankSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl NeedTankSystem {
    /// Full tanks built from [`DEFAULT_TANK_PARAMS`].
    pub fn new() -> Self {
        let tanks = NeedType::ALL
            .iter()
            .map(|&need_type| {
                let params = need_type.default_params();
                NeedTank {
                    need_type,
                    target_level: params.target_level,
                    current_level: params.target_level,
                    depletion_rate: params.depletion_rate,
                    fill_rate: params.fill_rate,
                    critical_threshold: params.critical_threshold,
                }
            })
            .collect();
        Self { tanks }
    }

    /// Full tanks with caller-supplied parameters, validated per need.
    pub fn from_params(
        params: impl Fn(NeedType) -> TankParams,
    ) -> Result<Self, ValidationError> {
        let tanks = NeedType::ALL
            .iter()
            .map(|&need_type| NeedTank::new(need_type, params(need_type)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tanks })
    }

    pub fn tank(&self, need_type: NeedType) -> &NeedTank {
        &self.tanks[need_type.index()]
    }

    pub fn tanks(&self) -> impl Iterator<Item = &NeedTank> {
        self.tanks.iter()
    }

    /// Deplete every tank. Tanks do not interact.
    pub fn update_all(&mut self, dt: f64) {
        for tank in &mut self.tanks {
            tank.update(dt);
        }
    }

    pub fn bedarf(&self, need_type: NeedType) -> f64 {
        self.tank(need_type).bedarf()
    }

    pub fn all_bedarfe(&self) -> BTreeMap<NeedType, f64> {
        self.tanks
            .iter()
            .map(|tank| (tank.need_type, tank.bedarf()))
            .collect()
    }

    pub fn satisfy_need(&mut self, need_type: NeedType, amount: Option<f64>) {
        self.tanks[need_type.index()].satisfy(amount);
    }

    pub fn critical_needs(&self) -> Vec<NeedType> {
        self.tanks
            .iter()
            .filter(|tank| tank.is_critical())
            .map(|tank| tank.need_type)
            .collect()
    }

    pub fn has_critical_needs(&self) -> bool {
        self.tanks.iter().any(NeedTank::is_critical)
    }

    /// Largest Bedarf; exact ties go to the lowest ordinal.
    pub fn most_urgent_need(&self) -> NeedType {
        let mut best = NeedType::Hunger;
        let mut best_bedarf = f64::NEG_INFINITY;
        for tank in &self.tanks {
            let bedarf = tank.bedarf();
            if bedarf > best_bedarf {
                best = tank.need_type;
                best_bedarf = bedarf;
            }
        }
        best
    }

    /// Sum of all deficits, a rough measure of overall distress.
    pub fn total_bedarf(&self) -> f64 {
        self.tanks.iter().map(NeedTank::bedarf).sum()
    }

    /// Refill every tank to its target.
    pub fn reset_all(&mut self) {
        for tank in &mut self.tanks {
            tank.refill();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
