//! # PSI Motivational Core
//!
//! The decision engine of a needs-driven agent, after Dörner's PSI theory.
//! Behaviour is not scripted: competing internal deficits push for action and
//! a selector picks the single strongest motive every tick.
//!
//! ## Architecture
//!
//! The motivational cascade, leaf first:
//! 1. **Need tanks** drain over time and produce a deficit (Bedarf)
//! 2. **Motivators** accumulate Bedarf into a log-compressed activity signal
//! 3. **Motives** pair a motivator with a candidate goal
//! 4. **The selector** picks the strongest motive by Expectation × Value × Activity
//!
//! ## Tick Ordering
//!
//! depletion → accumulation/decay → candidate generation → selection →
//! execution → satisfaction feedback. [`MotivationalCore`] enforces it.

pub mod config;
mod engine;
mod error;
mod goal;
mod motivator;
mod motive;
mod need;
mod selector;

pub use config::PsiConfig;
pub use engine::{IdleReason, MotivationalCore, Selection, TickResult};
pub use error::ValidationError;
pub use goal::{Goal, GoalValue, Outcome};
pub use motivator::{Motivator, MotivatorParams, MotivatorSet};
pub use motive::{build_motives, Motive};
pub use need::{NeedTank, NeedTankSystem, NeedType, TankParams, DEFAULT_TANK_PARAMS};
pub use selector::{MotiveSelector, TIE_EPSILON};
