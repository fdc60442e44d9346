//! Motivators turn raw Bedarf into a bounded drive signal.
//!
//! Deficits are accumulated over time and fade through a linear decay.
//! Activity is `ln(1 + accumulated)`: steep near zero, flat for large
//! deficits, so no single need can dominate selection forever.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{check_non_negative, ValidationError};
use crate::need::{sanitize_dt, NeedType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotivatorParams {
    pub decay_rate: f64,
    pub max_accumulation: f64,
}

impl Default for MotivatorParams {
    fn default() -> Self {
        Self {
            decay_rate: 0.1,
            max_accumulation: 10.0,
        }
    }
}

/// Per-need drive accumulator.
///
/// Invariant: `0 <= accumulated_bedarf <= max_accumulation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Motivator {
    need_type: NeedType,
    accumulated_bedarf: f64,
    decay_rate: f64,
    max_accumulation: f64,
}

impl Motivator {
    pub fn new(need_type: NeedType) -> Self {
        let params = MotivatorParams::default();
        Self {
            need_type,
            accumulated_bedarf: 0.0,
            decay_rate: params.decay_rate,
            max_accumulation: params.max_accumulation,
        }
    }

    pub fn with_params(
        need_type: NeedType,
        params: MotivatorParams,
    ) -> Result<Self, ValidationError> {
        check_non_negative("decay_rate", params.decay_rate)?;
        check_non_negative("max_accumulation", params.max_accumulation)?;
        Ok(Self {
            need_type,
            accumulated_bedarf: 0.0,
            decay_rate: params.decay_rate,
            max_accumulation: params.max_accumulation,
        })
    }

    pub fn need_type(&self) -> NeedType {
        self.need_type
    }

    pub fn accumulated_bedarf(&self) -> f64 {
        self.accumulated_bedarf
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn max_accumulation(&self) -> f64 {
        self.max_accumulation
    }

    /// Add a deficit signal, saturating at `max_accumulation`.
    ///
    /// Negative (and NaN) input contributes nothing; only decay lowers the total.
    pub fn accumulate(&mut self, bedarf: f64) -> f64 {
        let contribution = if bedarf > 0.0 { bedarf } else { 0.0 };
        self.accumulated_bedarf = (self.accumulated_bedarf + contribution).min(self.max_accumulation);
        self.accumulated_bedarf
    }

    pub fn decay(&mut self, dt: f64) -> f64 {
        let amount = self.decay_rate * sanitize_dt(dt);
        self.accumulated_bedarf = (self.accumulated_bedarf - amount).max(0.0);
        self.accumulated_bedarf
    }

    /// `ln(1 + accumulated_bedarf)`
    pub fn activity(&self) -> f64 {
        self.accumulated_bedarf.ln_1p()
    }

    /// Upper bound of [`Self::activity`].
    pub fn max_activity(&self) -> f64 {
        self.max_accumulation.ln_1p()
    }

    pub fn reset(&mut self) {
        self.accumulated_bedarf = 0.0;
    }
}

/// One motivator per need type, owned by a single agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotivatorSet {
    /// Indexed by `NeedType` ordinal.
    motivators: Vec<Motivator>,
}

impl Default for MotivatorSet {
    fn default() -> Self {
        Self {
            motivators: NeedType::ALL.iter().map(|&n| Motivator::new(n)).collect(),
        }
    }
}

impl MotivatorSet {
    pub fn new(params: MotivatorParams) -> Result<Self, ValidationError> {
        let motivators = NeedType::ALL
            .iter()
            .map(|&n| Motivator::with_params(n, params))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { motivators })
    }

    pub fn get(&self, need_type: NeedType) -> &Motivator {
        &self.motivators[need_type.index()]
    }

    pub fn get_mut(&mut self, need_type: NeedType) -> &mut Motivator {
        &mut self.motivators[need_type.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Motivator> {
        self.motivators.iter()
    }

    /// Accumulate each need's current Bedarf, then decay every motivator.
    ///
    /// Needs missing from `bedarfe` only decay.
    pub fn update_from_bedarfe(&mut self, bedarfe: &BTreeMap<NeedType, f64>, dt: f64) {
        for motivator in &mut self.motivators {
            if let Some(&bedarf) = bedarfe.get(&motivator.need_type) {
                motivator.accumulate(bedarf);
            }
            motivator.decay(dt);
        }
    }

    pub fn activities(&self) -> BTreeMap<NeedType, f64> {
        self.motivators
            .iter()
            .map(|m| (m.need_type, m.activity()))
            .collect()
    }

    pub fn reset_all(&mut self) {
        for motivator in &mut self.motivators {
            motivator.reset();
        }
    }
}
