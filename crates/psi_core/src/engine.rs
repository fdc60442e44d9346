//! Core tick driver
//!
//! `MotivationalCore` owns one agent's tanks and motivators and runs the
//! fixed per-tick ordering:
//! depletion → accumulation/decay → candidate generation → selection →
//! execution → satisfaction feedback.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use crate::config::PsiConfig;
use crate::error::ValidationError;
use crate::goal::{Goal, GoalValue, Outcome};
use crate::motivator::MotivatorSet;
use crate::motive::build_motives;
use crate::need::{NeedTankSystem, NeedType};
use crate::selector::MotiveSelector;

/// Why a tick produced no action. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleReason {
    /// The host is still waiting out a previous action.
    Cooldown,
    NoExecutableGoals,
    NoViableMotive,
}

/// The motive that won a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub goal: String,
    pub need: NeedType,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickResult<T> {
    Idle(IdleReason),
    Acted {
        selection: Selection,
        outcome: Outcome<T>,
    },
}

impl<T> TickResult<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, TickResult::Idle(_))
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            TickResult::Acted { selection, .. } => Some(selection),
            TickResult::Idle(_) => None,
        }
    }

    pub fn outcome(&self) -> Option<&Outcome<T>> {
        match self {
            TickResult::Acted { outcome, .. } => Some(outcome),
            TickResult::Idle(_) => None,
        }
    }
}

/// Per-agent decision state. Never shared between agents.
#[derive(Debug, Clone)]
pub struct MotivationalCore {
    needs: NeedTankSystem,
    motivators: MotivatorSet,
    selector: MotiveSelector,
    /// Only consulted for random tie-breaks.
    rng: StdRng,
}

impl Default for MotivationalCore {
    fn default() -> Self {
        Self::new(
            NeedTankSystem::new(),
            MotivatorSet::default(),
            MotiveSelector::default(),
            0,
        )
    }
}

impl MotivationalCore {
    pub fn new(
        needs: NeedTankSystem,
        motivators: MotivatorSet,
        selector: MotiveSelector,
        seed: u64,
    ) -> Self {
        Self {
            needs,
            motivators,
            selector,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_config(config: &PsiConfig, seed: u64) -> Result<Self, ValidationError> {
        Ok(Self::new(
            config.needs.build()?,
            MotivatorSet::new(config.motivator)?,
            config.selector.build()?,
            seed,
        ))
    }

    pub fn needs(&self) -> &NeedTankSystem {
        &self.needs
    }

    pub fn motivators(&self) -> &MotivatorSet {
        &self.motivators
    }

    pub fn selector(&self) -> &MotiveSelector {
        &self.selector
    }

    /// Depletion, then accumulate-then-decay from the fresh Bedarfe.
    pub fn advance(&mut self, dt: f64) {
        self.needs.update_all(dt);
        let bedarfe = self.needs.all_bedarfe();
        self.motivators.update_from_bedarfe(&bedarfe, dt);
    }

    /// Score every (goal, need) pair and return the winning goal.
    pub fn choose<'g, G>(&mut self, goals: &[&'g G]) -> Option<(&'g G, NeedType, f64)>
    where
        G: GoalValue + ?Sized,
    {
        let motives = build_motives(goals.iter().copied(), &self.motivators);
        let chosen = self.selector.select_with_rng(&motives, &mut self.rng)?;
        Some((chosen.goal(), chosen.need_type(), chosen.strength()))
    }

    /// Feed a successful outcome back into the tanks.
    pub fn apply<T>(&mut self, outcome: &Outcome<T>) {
        if !outcome.success {
            return;
        }
        for (&need, &amount) in &outcome.needs_satisfied {
            self.needs.satisfy_need(need, Some(amount));
        }
    }

    /// Candidate generation through satisfaction feedback, without advancing time.
    pub fn act<E, G>(&mut self, env: &mut E, goals: &[G]) -> TickResult<G::Effect>
    where
        E: ?Sized,
        G: Goal<E>,
    {
        let executable: Vec<&G> = goals.iter().filter(|g| g.is_executable(&*env)).collect();
        if executable.is_empty() {
            debug!("no executable goals");
            return TickResult::Idle(IdleReason::NoExecutableGoals);
        }

        let Some((goal, need, strength)) = self.choose(&executable) else {
            debug!(candidates = executable.len(), "no motive cleared the threshold");
            return TickResult::Idle(IdleReason::NoViableMotive);
        };

        let outcome = goal.execute(env);
        debug!(
            goal = goal.name(),
            need = %need,
            strength,
            success = outcome.success,
            "executed"
        );
        self.apply(&outcome);

        TickResult::Acted {
            selection: Selection {
                goal: goal.name().to_string(),
                need,
                strength,
            },
            outcome,
        }
    }

    /// One full tick.
    pub fn step<E, G>(&mut self, dt: f64, env: &mut E, goals: &[G]) -> TickResult<G::Effect>
    where
        E: ?Sized,
        G: Goal<E>,
    {
        self.advance(dt);
        self.act(env, goals)
    }

    pub fn satisfy_need(&mut self, need: NeedType, amount: Option<f64>) {
        self.needs.satisfy_need(need, amount);
    }

    /// Full tanks and silent motivators.
    pub fn reset(&mut self) {
        self.needs.reset_all();
        self.motivators.reset_all();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::need::TankParams;

    /// A pantry with a fixed stock; eating takes one unit.
    #[derive(Default)]
    struct Pantry {
        food: u32,
        water: u32,
        log: Vec<&'static str>,
    }

    enum Chore {
        Eat,
        Drink,
        Idle,
    }

    impl GoalValue for Chore {
        fn value_for_need(&self, need: NeedType) -> f64 {
            match (self, need) {
                (Chore::Eat, NeedType::Hunger) => 1.0,
                (Chore::Drink, NeedType::Thirst) => 1.0,
                _ => 0.0,
            }
        }
    }

    impl Goal<Pantry> for Chore {
        type Effect = ();

        fn name(&self) -> &str {
            match self {
                Chore::Eat => "eat",
                Chore::Drink => "drink",
                Chore::Idle => "idle",
            }
        }

        fn is_executable(&self, env: &Pantry) -> bool {
            match self {
                Chore::Eat => env.food > 0,
                Chore::Drink => env.water > 0,
                Chore::Idle => true,
            }
        }

        fn execute(&self, env: &mut Pantry) -> Outcome<()> {
            match self {
                Chore::Eat => {
                    env.food -= 1;
                    env.log.push("eat");
                    Outcome::succeeded((), "ate").satisfies(NeedType::Hunger, 0.5)
                }
                Chore::Drink => {
                    env.water -= 1;
                    env.log.push("drink");
                    Outcome::succeeded((), "drank").satisfies(NeedType::Thirst, 0.5)
                }
                Chore::Idle => Outcome::succeeded((), "idled"),
            }
        }
    }

    fn hungry_core() -> MotivationalCore {
        // Only hunger drains.
        let needs = NeedTankSystem::from_params(|need| {
            let rate = if need == NeedType::Hunger { 0.2 } else { 0.0 };
            TankParams::new(1.0, rate, 0.5, 0.1)
        })
        .unwrap();
        MotivationalCore::new(needs, MotivatorSet::default(), MotiveSelector::default(), 3)
    }

    #[test]
    fn test_advance_depletes_then_accumulates() {
        let mut core = hungry_core();
        core.advance(1.0);
        assert!((core.needs().bedarf(NeedType::Hunger) - 0.2).abs() < 1e-12);
        // 0.2 accumulated, 0.1 decayed
        let acc = core.motivators().get(NeedType::Hunger).accumulated_bedarf();
        assert!((acc - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_step_selects_and_feeds_back() {
        let mut core = hungry_core();
        let mut pantry = Pantry {
            food: 3,
            ..Default::default()
        };
        let goals = [Chore::Idle, Chore::Eat, Chore::Drink];

        let result = core.step(1.0, &mut pantry, &goals);
        let selection = result.selection().unwrap();
        assert_eq!(selection.goal, "eat");
        assert_eq!(selection.need, NeedType::Hunger);
        assert!(selection.strength > 0.0);
        assert_eq!(pantry.food, 2);
        // the tank was refilled by the outcome
        assert_eq!(core.needs().bedarf(NeedType::Hunger), 0.0);
    }

    #[test]
    fn test_no_executable_goals_is_idle() {
        let mut core = hungry_core();
        let mut pantry = Pantry::default();
        let goals = [Chore::Eat, Chore::Drink];
        let result = core.step(1.0, &mut pantry, &goals);
        assert_eq!(result, TickResult::Idle(IdleReason::NoExecutableGoals));
    }

    #[test]
    fn test_sated_agent_does_nothing() {
        let mut core = MotivationalCore::default();
        let mut pantry = Pantry {
            food: 1,
            water: 1,
            ..Default::default()
        };
        let goals = [Chore::Eat, Chore::Drink];
        let result = core.step(0.0, &mut pantry, &goals);
        assert_eq!(result, TickResult::Idle(IdleReason::NoViableMotive));
        assert!(pantry.log.is_empty());
    }

    #[test]
    fn test_failed_outcome_is_not_applied() {
        let mut core = hungry_core();
        core.advance(2.0);
        let before = core.needs().bedarf(NeedType::Hunger);
        let failed: Outcome<()> = Outcome::failed((), "nope").satisfies(NeedType::Hunger, 1.0);
        core.apply(&failed);
        assert_eq!(core.needs().bedarf(NeedType::Hunger), before);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut core = hungry_core();
        for _ in 0..5 {
            core.advance(1.0);
        }
        core.reset();
        assert_eq!(core.needs().total_bedarf(), 0.0);
        assert!(core.motivators().iter().all(|m| m.activity() == 0.0));
    }

    #[test]
    fn test_from_config_uses_sections() {
        let mut config = PsiConfig::default();
        config.selector.min_strength_threshold = 0.5;
        let core = MotivationalCore::from_config(&config, 0).unwrap();
        assert_eq!(core.selector().min_strength_threshold(), 0.5);

        config.motivator.decay_rate = -1.0;
        assert!(MotivationalCore::from_config(&config, 0).is_err());
    }
}
