//! Needs-driven agents on the island.
//!
//! [`Action`] is the closed set of candidate goals, [`ActionLibrary`] the
//! table a bot offers its motivational core, and [`PsiBot`] ties perception,
//! memory and the core together into one tick.

mod action;
mod bot;
mod error;

pub use action::{resource_for, Action, ActionEffect, ActionLibrary, Situation};
pub use bot::{BotReport, BotStats, PsiBot};
pub use error::AgentError;
