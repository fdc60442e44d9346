//! Action schemas: the closed set of things an agent can do on the island.
//!
//! Every action is a candidate goal for the motivational core. The library
//! is the registration table the bot offers to the core each tick.

use psi_core::{Goal, GoalValue, NeedType, Outcome};
use psi_world::{AgentId, Direction, GridPos, Island, Percept, ResourceType, SensoryMemory};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

// ============================================================================
// Consumption constants
// ============================================================================

const EAT_PORTION: f64 = 0.3;
const EAT_EFFICIENCY: f64 = 0.8;
const DRINK_PORTION: f64 = 0.4;
const DRINK_EFFICIENCY: f64 = 0.9;
const REST_RECOVERY: f64 = 0.3;
const EXPLORE_CERTAINTY_VALUE: f64 = 0.5;

// ============================================================================
// Environment handed to actions
// ============================================================================

/// Everything an action may read or change during one tick.
pub struct Situation<'w> {
    pub island: &'w mut Island,
    pub agent: AgentId,
    /// Updated in place when an action moves the agent.
    pub position: GridPos,
    pub percept: &'w Percept,
    pub memory: &'w SensoryMemory,
    /// Need with the largest deficit; steers exploration.
    pub urgent_need: NeedType,
    pub rng: &'w mut StdRng,
    pub now: f64,
}

impl Situation<'_> {
    fn relocate(&mut self, to: GridPos) -> bool {
        if self.island.move_agent(self.position, to, self.agent) {
            self.position = to;
            true
        } else {
            false
        }
    }
}

/// What executing an action did to the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionEffect {
    Moved { from: GridPos, to: GridPos },
    Consumed { resource: ResourceType, amount: f64 },
    Rested,
    Nothing,
}

// ============================================================================
// Actions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move(Direction),
    Eat,
    Drink,
    Rest,
    /// Walk toward whatever serves the most urgent need, or anywhere open.
    Explore,
}

impl Action {
    /// Energy-style expenditure of one execution.
    pub fn cost(&self) -> f64 {
        match self {
            Action::Move(_) | Action::Explore => 0.1,
            Action::Eat | Action::Drink => 0.05,
            Action::Rest => 0.0,
        }
    }

    /// Stable identifier, also the key in [`ActionLibrary::get`].
    pub fn label(&self) -> &'static str {
        match self {
            Action::Move(direction) => Self::move_label(*direction),
            Action::Eat => "eat",
            Action::Drink => "drink",
            Action::Rest => "rest",
            Action::Explore => "explore",
        }
    }

    fn move_label(direction: Direction) -> &'static str {
        match direction {
            Direction::North => "move_north",
            Direction::NorthEast => "move_northeast",
            Direction::East => "move_east",
            Direction::SouthEast => "move_southeast",
            Direction::South => "move_south",
            Direction::SouthWest => "move_southwest",
            Direction::West => "move_west",
            Direction::NorthWest => "move_northwest",
        }
    }

    fn consume(
        env: &mut Situation<'_>,
        resource: ResourceType,
        portion: f64,
        efficiency: f64,
        need: NeedType,
    ) -> Outcome<ActionEffect> {
        let consumed = env
            .island
            .tile_mut(env.position)
            .filter(|tile| tile.resource() == Some(resource))
            .map_or(0.0, |tile| tile.consume_resource(portion));

        if consumed <= 0.0 {
            return Outcome::failed(ActionEffect::Nothing, format!("no {} here", resource_label(resource)));
        }

        let satisfaction = consumed * efficiency;
        Outcome::succeeded(
            ActionEffect::Consumed {
                resource,
                amount: consumed,
            },
            format!("{need} +{satisfaction:.2}"),
        )
        .satisfies(need, satisfaction)
    }

    fn explore(env: &mut Situation<'_>) -> Outcome<ActionEffect> {
        let from = env.position;
        let open: Vec<Direction> = env.percept.open_directions().collect();
        if open.is_empty() {
            return Outcome::failed(ActionEffect::Nothing, "nowhere to explore");
        }

        let target = resource_for(env.urgent_need).and_then(|kind| {
            env.percept
                .nearest_resource(kind)
                .map(|r| r.pos)
                .or_else(|| env.memory.find_last_seen_resource(kind, env.now))
        });

        // Head for the target when a step gets closer, otherwise wander.
        let toward = target.and_then(|target| {
            let here = from.manhattan_distance(target);
            open.iter()
                .copied()
                .map(|d| (d, from.step(d).manhattan_distance(target)))
                .filter(|&(_, dist)| dist < here)
                .min_by_key(|&(_, dist)| dist)
                .map(|(d, _)| d)
        });
        let direction = match toward.or_else(|| open.choose(&mut *env.rng).copied()) {
            Some(d) => d,
            None => return Outcome::failed(ActionEffect::Nothing, "nowhere to explore"),
        };

        let to = from.step(direction);
        if env.relocate(to) {
            Outcome::succeeded(ActionEffect::Moved { from, to }, format!("explored {}", direction.name()))
        } else {
            Outcome::failed(ActionEffect::Nothing, format!("could not explore {}", direction.name()))
        }
    }
}

fn resource_label(kind: ResourceType) -> &'static str {
    match kind {
        ResourceType::Food => "food",
        ResourceType::Water => "water",
        ResourceType::Shelter => "shelter",
    }
}

/// The resource that serves a material need.
pub fn resource_for(need: NeedType) -> Option<ResourceType> {
    match need {
        NeedType::Hunger => Some(ResourceType::Food),
        NeedType::Thirst => Some(ResourceType::Water),
        NeedType::Energy => Some(ResourceType::Shelter),
        _ => None,
    }
}

impl GoalValue for Action {
    fn value_for_need(&self, need: NeedType) -> f64 {
        match (self, need) {
            (Action::Eat, NeedType::Hunger)
            | (Action::Drink, NeedType::Thirst)
            | (Action::Rest, NeedType::Energy) => 1.0,
            (Action::Explore, NeedType::Certainty) => EXPLORE_CERTAINTY_VALUE,
            _ => 0.0,
        }
    }
}

impl<'w> Goal<Situation<'w>> for Action {
    type Effect = ActionEffect;

    fn name(&self) -> &str {
        self.label()
    }

    fn is_executable(&self, env: &Situation<'w>) -> bool {
        let percept = env.percept;
        match self {
            Action::Move(direction) => percept.can_move(*direction),
            Action::Eat => percept.stands_on(ResourceType::Food),
            Action::Drink => percept.stands_on(ResourceType::Water),
            Action::Rest => percept.stands_on(ResourceType::Shelter),
            Action::Explore => percept.any_move(),
        }
    }

    fn execute(&self, env: &mut Situation<'w>) -> Outcome<ActionEffect> {
        match self {
            Action::Move(direction) => {
                let from = env.position;
                let to = from.step(*direction);
                if env.relocate(to) {
                    Outcome::succeeded(ActionEffect::Moved { from, to }, format!("moved {}", direction.name()))
                } else {
                    Outcome::failed(ActionEffect::Nothing, format!("failed to move {}", direction.name()))
                }
            }
            Action::Eat => Self::consume(env, ResourceType::Food, EAT_PORTION, EAT_EFFICIENCY, NeedType::Hunger),
            Action::Drink => Self::consume(
                env,
                ResourceType::Water,
                DRINK_PORTION,
                DRINK_EFFICIENCY,
                NeedType::Thirst,
            ),
            Action::Rest => {
                let sheltered = env
                    .island
                    .tile(env.position)
                    .is_some_and(|tile| tile.resource() == Some(ResourceType::Shelter));
                if sheltered {
                    // shelter is used, not consumed
                    Outcome::succeeded(ActionEffect::Rested, format!("energy +{REST_RECOVERY:.2}"))
                        .satisfies(NeedType::Energy, REST_RECOVERY)
                } else {
                    Outcome::failed(ActionEffect::Nothing, "no shelter here")
                }
            }
            Action::Explore => Self::explore(env),
        }
    }
}

// ============================================================================
// Registration table
// ============================================================================

/// The actions a bot offers the core, in candidate order.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionLibrary {
    actions: Vec<Action>,
}

impl Default for ActionLibrary {
    fn default() -> Self {
        let mut library = Self::empty();
        for direction in Direction::CARDINAL {
            library.register(Action::Move(direction));
        }
        library.register(Action::Eat);
        library.register(Action::Drink);
        library.register(Action::Rest);
        library.register(Action::Explore);
        library
    }
}

impl ActionLibrary {
    pub fn empty() -> Self {
        Self { actions: Vec::new() }
    }

    /// Add an action; registering one twice keeps its first slot.
    pub fn register(&mut self, action: Action) {
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions
            .iter()
            .find(|a| a.label() == name)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
