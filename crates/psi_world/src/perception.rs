//! Perception: turns raw island state into a bounded per-tick snapshot.

use psi_core::config::PerceptionConfig;
use serde::Serialize;

use crate::island::{Direction, GridPos, Island, ResourceType, TerrainType};

/// A resource noticed within sensory range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceSighting {
    pub kind: ResourceType,
    pub pos: GridPos,
    /// Euclidean distance from the observer.
    pub distance: f64,
}

/// What an agent senses at its position on one tick. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percept {
    pub position: GridPos,
    pub terrain: TerrainType,
    pub nearby_resources: Vec<ResourceSighting>,
    /// Indexed like [`Direction::CARDINAL`].
    moves: [bool; 4],
    pub current_resource: Option<ResourceType>,
    pub resource_amount: f64,
}

impl Percept {
    pub fn can_move(&self, direction: Direction) -> bool {
        Direction::CARDINAL
            .iter()
            .position(|&d| d == direction)
            .is_some_and(|i| self.moves[i])
    }

    pub fn can_move_north(&self) -> bool {
        self.can_move(Direction::North)
    }

    pub fn can_move_south(&self) -> bool {
        self.can_move(Direction::South)
    }

    pub fn can_move_east(&self) -> bool {
        self.can_move(Direction::East)
    }

    pub fn can_move_west(&self) -> bool {
        self.can_move(Direction::West)
    }

    pub fn any_move(&self) -> bool {
        self.moves.iter().any(|&m| m)
    }

    /// Open cardinal directions in N, S, E, W order.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::CARDINAL
            .iter()
            .zip(self.moves)
            .filter(|&(_, open)| open)
            .map(|(&d, _)| d)
    }

    /// Resource of `kind` with amount left on the agent's own tile.
    pub fn stands_on(&self, kind: ResourceType) -> bool {
        self.current_resource == Some(kind) && self.resource_amount > 0.0
    }

    pub fn has_nearby_resource(&self, kind: ResourceType) -> bool {
        self.nearby_resources.iter().any(|r| r.kind == kind)
    }

    /// Closest sighting of `kind`; the earliest scanned wins on equal distance.
    pub fn nearest_resource(&self, kind: ResourceType) -> Option<&ResourceSighting> {
        self.nearby_resources
            .iter()
            .filter(|r| r.kind == kind)
            .fold(None, |best: Option<&ResourceSighting>, r| match best {
                Some(b) if b.distance <= r.distance => Some(b),
                _ => Some(r),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptionSystem {
    sensory_radius: i32,
    resource_detection_threshold: f64,
}

impl Default for PerceptionSystem {
    fn default() -> Self {
        Self::new(&PerceptionConfig::default())
    }
}

impl PerceptionSystem {
    pub fn new(config: &PerceptionConfig) -> Self {
        Self {
            sensory_radius: config.sensory_radius.max(0),
            resource_detection_threshold: config.resource_detection_threshold,
        }
    }

    pub fn sensory_radius(&self) -> i32 {
        self.sensory_radius
    }

    /// Snapshot at `position`, `None` if it lies outside the island.
    pub fn perceive(&self, island: &Island, position: GridPos) -> Option<Percept> {
        let here = island.tile(position)?;

        let mut moves = [false; 4];
        for (open, direction) in moves.iter_mut().zip(Direction::CARDINAL) {
            *open = island.is_valid_position(position.step(direction));
        }

        Some(Percept {
            position,
            terrain: here.terrain(),
            nearby_resources: self.detect_resources(island, position),
            moves,
            current_resource: here.resource(),
            resource_amount: here.resource_amount(),
        })
    }

    /// Every in-bounds tile inside the circular radius, own tile included.
    pub fn visible_tiles(&self, island: &Island, position: GridPos) -> Vec<(GridPos, TerrainType)> {
        self.scan(island, position)
            .filter_map(|pos| island.tile(pos).map(|t| (pos, t.terrain())))
            .collect()
    }

    fn detect_resources(&self, island: &Island, position: GridPos) -> Vec<ResourceSighting> {
        self.scan(island, position)
            .filter(|&pos| pos != position)
            .filter_map(|pos| {
                let tile = island.tile(pos)?;
                let kind = tile.resource()?;
                (tile.resource_amount() >= self.resource_detection_threshold).then(|| {
                    ResourceSighting {
                        kind,
                        pos,
                        distance: pos.distance_to(position),
                    }
                })
            })
            .collect()
    }

    /// Positions within the circle, row by row.
    ///
    /// The radius never exceeds the island's larger side, so the walk stays
    /// proportional to the island.
    fn scan(&self, island: &Island, center: GridPos) -> impl Iterator<Item = GridPos> {
        let extent = i32::try_from(island.width().max(island.height())).unwrap_or(i32::MAX);
        let r = self.sensory_radius.clamp(0, extent);
        let reach = i64::from(r) * i64::from(r);
        (-r..=r).flat_map(move |dy| {
            (-r..=r)
                .filter(move |&dx| i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy) <= reach)
                .map(move |dx| GridPos::new(center.x + dx, center.y + dy))
        })
    }
}
