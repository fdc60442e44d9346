//! PsiBot: one needs-driven agent living on an island.
//!
//! Each tick follows the fixed ordering of the motivational core, with
//! perception slotted in before candidate generation:
//! depletion → accumulation/decay → perceive → candidates → selection →
//! execution → satisfaction feedback.

use psi_core::{
    IdleReason, MotivationalCore, MotivatorSet, NeedTankSystem, NeedType, PsiConfig, Selection,
    TickResult,
};
use psi_world::{AgentId, GridPos, Island, PerceptionSystem, SensoryMemory};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::action::{ActionEffect, ActionLibrary, Situation};
use crate::error::AgentError;

/// Running totals over a bot's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BotStats {
    pub ticks: u64,
    pub idle_ticks: u64,
    pub failed_actions: u64,
    /// Executions per action label.
    pub actions: BTreeMap<String, u64>,
    /// Summed action cost.
    pub effort: f64,
}

/// Serializable end-of-run view of a bot.
#[derive(Debug, Clone, Serialize)]
pub struct BotReport {
    pub agent: AgentId,
    pub position: GridPos,
    pub elapsed: f64,
    pub levels: BTreeMap<NeedType, f64>,
    pub bedarfe: BTreeMap<NeedType, f64>,
    pub activities: BTreeMap<NeedType, f64>,
    pub critical: Vec<NeedType>,
    pub last_selection: Option<Selection>,
    pub stats: BotStats,
}

#[derive(Debug, Clone)]
pub struct PsiBot {
    id: AgentId,
    position: GridPos,
    core: MotivationalCore,
    perception: PerceptionSystem,
    memory: SensoryMemory,
    library: ActionLibrary,
    /// Drives exploration; the core has its own for tie-breaks.
    rng: StdRng,
    cooldown: f64,
    action_cooldown: f64,
    idle_cooldown: f64,
    elapsed: f64,
    last_selection: Option<Selection>,
    last_message: String,
    stats: BotStats,
}

impl PsiBot {
    /// Validate `config`, place the bot on `island` and mint its id.
    pub fn spawn(island: &mut Island, position: GridPos, config: &PsiConfig) -> Result<Self, AgentError> {
        config.validate()?;
        let seed = config.simulation.seed;
        let core = MotivationalCore::from_config(config, seed.wrapping_add(1))?;
        let id = island
            .spawn_agent(position)
            .ok_or(AgentError::Occupied(position))?;

        debug!(agent = %id, %position, "spawned");
        Ok(Self {
            id,
            position,
            core,
            perception: PerceptionSystem::new(&config.perception),
            memory: SensoryMemory::new(&config.perception),
            library: ActionLibrary::default(),
            rng: StdRng::seed_from_u64(seed.wrapping_add(2)),
            cooldown: 0.0,
            action_cooldown: config.simulation.action_cooldown,
            idle_cooldown: config.simulation.idle_cooldown,
            elapsed: 0.0,
            last_selection: None,
            last_message: String::new(),
            stats: BotStats::default(),
        })
    }

    /// Spawn on the free tile closest to the island's centre.
    pub fn spawn_at_start(island: &mut Island, config: &PsiConfig) -> Result<Self, AgentError> {
        let start = island
            .find_start_position()
            .ok_or(AgentError::NoStartPosition)?;
        Self::spawn(island, start, config)
    }

    pub fn with_library(mut self, library: ActionLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> GridPos {
        self.position
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn needs(&self) -> &NeedTankSystem {
        self.core.needs()
    }

    pub fn motivators(&self) -> &MotivatorSet {
        self.core.motivators()
    }

    pub fn library(&self) -> &ActionLibrary {
        &self.library
    }

    pub fn memory(&self) -> &SensoryMemory {
        &self.memory
    }

    /// The motive that won the most recent decision, `None` after an idle one.
    pub fn last_selection(&self) -> Option<&Selection> {
        self.last_selection.as_ref()
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn stats(&self) -> &BotStats {
        &self.stats
    }

    /// Inject a satisfaction event from outside the action set.
    pub fn satisfy_need(&mut self, need: NeedType, amount: Option<f64>) {
        self.core.satisfy_need(need, amount);
    }

    /// Advance `dt` and, unless cooling down, choose and run one action.
    pub fn tick(&mut self, island: &mut Island, dt: f64) -> TickResult<ActionEffect> {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += dt;
        self.stats.ticks += 1;
        self.core.advance(dt);

        if self.cooldown > 0.0 {
            self.cooldown -= dt;
            self.stats.idle_ticks += 1;
            return TickResult::Idle(IdleReason::Cooldown);
        }

        let Some(percept) = self.perception.perceive(island, self.position) else {
            return self.go_idle(IdleReason::NoExecutableGoals);
        };
        self.memory.clear_old(self.elapsed);
        self.memory.add_percept(percept.clone(), self.elapsed);

        let urgent_need = self.core.needs().most_urgent_need();
        let mut situation = Situation {
            island,
            agent: self.id,
            position: self.position,
            percept: &percept,
            memory: &self.memory,
            urgent_need,
            rng: &mut self.rng,
            now: self.elapsed,
        };
        let result = self.core.act(&mut situation, self.library.actions());
        self.position = situation.position;

        match &result {
            TickResult::Idle(reason) => return self.go_idle(*reason),
            TickResult::Acted { selection, outcome } => {
                *self.stats.actions.entry(selection.goal.clone()).or_insert(0) += 1;
                if !outcome.success {
                    self.stats.failed_actions += 1;
                }
                if let Some(action) = self.library.get(&selection.goal) {
                    self.stats.effort += action.cost();
                }
                info!(
                    agent = %self.id,
                    t = self.elapsed,
                    action = %selection.goal,
                    need = %selection.need,
                    strength = selection.strength,
                    success = outcome.success,
                    "{}",
                    outcome.message
                );
                self.last_selection = Some(selection.clone());
                self.last_message = outcome.message.clone();
                self.cooldown = self.action_cooldown;
            }
        }
        result
    }

    fn go_idle(&mut self, reason: IdleReason) -> TickResult<ActionEffect> {
        debug!(agent = %self.id, t = self.elapsed, ?reason, "idle");
        self.stats.idle_ticks += 1;
        self.last_selection = None;
        self.last_message = match reason {
            IdleReason::Cooldown => "cooling down",
            IdleReason::NoExecutableGoals => "no executable actions",
            IdleReason::NoViableMotive => "no motive selected",
        }
        .to_string();
        self.cooldown = self.idle_cooldown;
        TickResult::Idle(reason)
    }

    pub fn report(&self) -> BotReport {
        let needs = self.core.needs();
        BotReport {
            agent: self.id,
            position: self.position,
            elapsed: self.elapsed,
            levels: needs
                .tanks()
                .map(|t| (t.need_type(), t.current_level()))
                .collect(),
            bedarfe: needs.all_bedarfe(),
            activities: self.core.motivators().activities(),
            critical: needs.critical_needs(),
            last_selection: self.last_selection.clone(),
            stats: self.stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psi_world::{ResourceType, TerrainType};

    fn meadow() -> Island {
        Island::uniform(7, 7, TerrainType::Grass)
    }

    /// Let time pass without deciding anything.
    fn starve(bot: &mut PsiBot, ticks: u32) {
        for _ in 0..ticks {
            bot.core.advance(1.0);
        }
    }

    #[test]
    fn test_spawn_rejects_bad_config_and_occupied_tile() {
        let mut island = meadow();
        let mut config = PsiConfig::default();
        config.selector.min_strength_threshold = -1.0;
        let err = PsiBot::spawn(&mut island, GridPos::new(1, 1), &config).unwrap_err();
        assert!(matches!(err, AgentError::Invalid(_)));

        let config = PsiConfig::default();
        PsiBot::spawn(&mut island, GridPos::new(1, 1), &config).unwrap();
        let err = PsiBot::spawn(&mut island, GridPos::new(1, 1), &config).unwrap_err();
        assert!(matches!(err, AgentError::Occupied(_)));
    }

    #[test]
    fn test_fresh_bot_idles() {
        let mut island = meadow();
        let mut bot = PsiBot::spawn_at_start(&mut island, &PsiConfig::default()).unwrap();
        // full tanks and silent motivators: nothing clears the threshold
        let result = bot.tick(&mut island, 0.0);
        assert_eq!(result, TickResult::Idle(IdleReason::NoViableMotive));
        assert!(bot.last_selection().is_none());
        assert_eq!(bot.stats().idle_ticks, 1);
    }

    #[test]
    fn test_hungry_bot_eats_underfoot() {
        let mut island = meadow();
        island.place_resource(GridPos::new(3, 3), ResourceType::Food, 1.0);
        let mut bot = PsiBot::spawn(&mut island, GridPos::new(3, 3), &PsiConfig::default()).unwrap();
        starve(&mut bot, 20);

        let result = bot.tick(&mut island, 1.0);
        let selection = result.selection().unwrap();
        assert_eq!(selection.goal, "eat");
        assert_eq!(selection.need, NeedType::Hunger);
        assert_eq!(bot.stats().actions["eat"], 1);
        assert_eq!(bot.last_selection().map(|s| s.goal.as_str()), Some("eat"));
    }

    #[test]
    fn test_cooldown_skips_decisions() {
        let mut island = meadow();
        island.place_resource(GridPos::new(3, 3), ResourceType::Food, 1.0);
        let mut config = PsiConfig::default();
        config.simulation.action_cooldown = 1.5;
        let mut bot = PsiBot::spawn(&mut island, GridPos::new(3, 3), &config).unwrap();
        starve(&mut bot, 20);

        assert!(!bot.tick(&mut island, 1.0).is_idle());
        assert_eq!(bot.tick(&mut island, 1.0), TickResult::Idle(IdleReason::Cooldown));
        assert_eq!(bot.tick(&mut island, 1.0), TickResult::Idle(IdleReason::Cooldown));
        assert!(!bot.tick(&mut island, 1.0).is_idle());
    }

    #[test]
    fn test_report_reflects_state() {
        let mut island = meadow();
        let mut bot = PsiBot::spawn_at_start(&mut island, &PsiConfig::default()).unwrap();
        for _ in 0..3 {
            bot.tick(&mut island, 1.0);
        }
        let report = bot.report();
        assert_eq!(report.stats.ticks, 3);
        assert_eq!(report.levels.len(), NeedType::COUNT);
        assert!((report.elapsed - 3.0).abs() < 1e-12);
        assert!(report.bedarfe[&NeedType::Thirst] > 0.0);
    }
}
