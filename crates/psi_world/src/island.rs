//! Grid island: terrain, consumable resources and tile occupancy.
//!
//! The island is generated in concentric bands around the centre (deep water
//! outside, then shallows, beach, grassland and a forest core). Resources are
//! rolled from a seeded RNG, so the same seed always yields the same island.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::ops::Add;

// ============================================================================
// Coordinates
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    pub fn distance_to(self, other: GridPos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn step(self, direction: Direction) -> GridPos {
        self + direction.offset()
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, other: GridPos) -> GridPos {
        GridPos::new(self.x + other.x, self.y + other.y)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass directions. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// The four directions an agent can walk, in the order they are checked.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn offset(self) -> GridPos {
        let (dx, dy) = self.delta();
        GridPos::new(dx, dy)
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::NorthEast => "northeast",
            Direction::East => "east",
            Direction::SouthEast => "southeast",
            Direction::South => "south",
            Direction::SouthWest => "southwest",
            Direction::West => "west",
            Direction::NorthWest => "northwest",
        }
    }
}

// ============================================================================
// Tiles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    /// Deep water, impassable.
    Water,
    Shallow,
    Sand,
    Grass,
    Forest,
    /// Impassable.
    Mountain,
}

impl TerrainType {
    pub fn is_passable(self) -> bool {
        !matches!(self, TerrainType::Water | TerrainType::Mountain)
    }

    /// Cost of walking onto a tile of this terrain; infinite when impassable.
    pub fn movement_cost(self) -> f64 {
        match self {
            TerrainType::Water | TerrainType::Mountain => f64::INFINITY,
            TerrainType::Shallow => 2.0,
            TerrainType::Sand | TerrainType::Grass => 1.0,
            TerrainType::Forest => 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Food,
    /// Fresh water, distinct from water terrain.
    Water,
    Shelter,
}

/// Island-scoped agent handle, minted by [`Island::spawn_agent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AgentId(u32);

impl AgentId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pos: GridPos,
    terrain: TerrainType,
    resource: Option<ResourceType>,
    resource_amount: f64,
    occupied_by: Option<AgentId>,
}

impl Tile {
    pub fn new(pos: GridPos, terrain: TerrainType) -> Self {
        Self {
            pos,
            terrain,
            resource: None,
            resource_amount: 0.0,
            occupied_by: None,
        }
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn terrain(&self) -> TerrainType {
        self.terrain
    }

    /// The resource on this tile, if any is left.
    pub fn resource(&self) -> Option<ResourceType> {
        self.resource.filter(|_| self.resource_amount > 0.0)
    }

    pub fn resource_amount(&self) -> f64 {
        self.resource_amount
    }

    pub fn occupied_by(&self) -> Option<AgentId> {
        self.occupied_by
    }

    pub fn is_passable(&self) -> bool {
        self.terrain.is_passable()
    }

    pub fn has_resource(&self) -> bool {
        self.resource().is_some()
    }

    pub fn movement_cost(&self) -> f64 {
        self.terrain.movement_cost()
    }

    /// Take up to `amount` and return what was actually taken.
    ///
    /// The resource disappears once its amount reaches zero.
    pub fn consume_resource(&mut self, amount: f64) -> f64 {
        if !self.has_resource() || amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        let consumed = self.resource_amount.min(amount);
        self.resource_amount -= consumed;
        if self.resource_amount <= 0.0 {
            self.resource = None;
            self.resource_amount = 0.0;
        }
        consumed
    }
}

// ============================================================================
// Island
// ============================================================================

const FOOD_CHANCE: f64 = 0.05;
const SHELTER_CHANCE: f64 = 0.10;
const FRESH_WATER_CHANCE: f64 = 0.02;

#[derive(Debug, Clone, Serialize)]
pub struct Island {
    width: usize,
    height: usize,
    /// Row-major, `y * width + x`.
    tiles: Vec<Tile>,
    #[serde(skip)]
    next_agent_id: u32,
}

impl Island {
    /// Concentric island with seeded resource placement.
    pub fn generate(width: usize, height: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut island = Self::uniform(width, height, TerrainType::Water);

        let center_x = (width / 2) as f64;
        let center_y = (height / 2) as f64;
        let max_radius = width.min(height) as f64 * 0.45;

        for tile in &mut island.tiles {
            let dx = f64::from(tile.pos.x) - center_x;
            let dy = f64::from(tile.pos.y) - center_y;
            let dist = (dx * dx + dy * dy).sqrt();

            tile.terrain = if dist > max_radius {
                TerrainType::Water
            } else if dist > max_radius * 0.9 {
                TerrainType::Shallow
            } else if dist > max_radius * 0.75 {
                TerrainType::Sand
            } else if dist > max_radius * 0.4 {
                TerrainType::Grass
            } else {
                TerrainType::Forest
            };

            let roll = match tile.terrain {
                TerrainType::Grass => Some((ResourceType::Food, FOOD_CHANCE)),
                TerrainType::Sand => Some((ResourceType::Shelter, SHELTER_CHANCE)),
                _ => None,
            };
            if let Some((kind, chance)) = roll {
                if rng.gen_bool(chance) {
                    tile.resource = Some(kind);
                    tile.resource_amount = 1.0;
                }
            }
        }

        // Fresh water pass; a spring replaces any food rolled on the same tile.
        for tile in &mut island.tiles {
            if matches!(tile.terrain, TerrainType::Grass | TerrainType::Forest)
                && rng.gen_bool(FRESH_WATER_CHANCE)
            {
                tile.resource = Some(ResourceType::Water);
                tile.resource_amount = 1.0;
            }
        }

        tracing::debug!(
            width,
            height,
            seed,
            food = island.tiles_with_resource(ResourceType::Food).count(),
            water = island.tiles_with_resource(ResourceType::Water).count(),
            shelter = island.tiles_with_resource(ResourceType::Shelter).count(),
            "island generated"
        );
        island
    }

    /// A resource-free island of a single terrain.
    pub fn uniform(width: usize, height: usize, terrain: TerrainType) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(GridPos::new(x as i32, y as i32), terrain));
            }
        }
        Self {
            width,
            height,
            tiles,
            next_agent_id: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn tile(&self, pos: GridPos) -> Option<&Tile> {
        self.tiles.get(self.index(pos)?)
    }

    pub fn tile_mut(&mut self, pos: GridPos) -> Option<&mut Tile> {
        let i = self.index(pos)?;
        self.tiles.get_mut(i)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Returns `false` for out-of-bounds positions.
    pub fn set_terrain(&mut self, pos: GridPos, terrain: TerrainType) -> bool {
        match self.tile_mut(pos) {
            Some(tile) => {
                tile.terrain = terrain;
                true
            }
            None => false,
        }
    }

    /// Returns `false` for out-of-bounds positions.
    pub fn place_resource(&mut self, pos: GridPos, kind: ResourceType, amount: f64) -> bool {
        match self.tile_mut(pos) {
            Some(tile) => {
                tile.resource = Some(kind);
                tile.resource_amount = amount.max(0.0);
                true
            }
            None => false,
        }
    }

    /// In bounds, passable and unoccupied.
    pub fn is_valid_position(&self, pos: GridPos) -> bool {
        self.tile(pos)
            .is_some_and(|t| t.is_passable() && t.occupied_by.is_none())
    }

    /// Passable neighbours (occupancy ignored). Cardinal order is N, E, S, W.
    pub fn neighbors(&self, pos: GridPos, diagonal: bool) -> Vec<(GridPos, Direction)> {
        const CARDINAL_RING: [Direction; 4] = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];
        let directions: &[Direction] = if diagonal {
            &Direction::ALL
        } else {
            &CARDINAL_RING
        };
        directions
            .iter()
            .map(|&d| (pos.step(d), d))
            .filter(|(p, _)| self.tile(*p).is_some_and(Tile::is_passable))
            .collect()
    }

    /// Nearest tile holding `kind`, by breadth-first search over passable
    /// cardinal neighbours up to `max_distance` steps.
    pub fn find_resource(
        &self,
        start: GridPos,
        kind: ResourceType,
        max_distance: u32,
    ) -> Option<GridPos> {
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0u32)]);

        while let Some((pos, dist)) = queue.pop_front() {
            if self.tile(pos).and_then(Tile::resource) == Some(kind) {
                return Some(pos);
            }
            if dist < max_distance {
                for (next, _) in self.neighbors(pos, false) {
                    if visited.insert(next) {
                        queue.push_back((next, dist + 1));
                    }
                }
            }
        }
        None
    }

    pub fn tiles_with_resource(&self, kind: ResourceType) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |t| t.resource() == Some(kind))
    }

    /// Place a new agent and mint its id. `None` if the tile cannot hold it.
    pub fn spawn_agent(&mut self, pos: GridPos) -> Option<AgentId> {
        let id = AgentId(self.next_agent_id);
        if self.occupy_tile(pos, id) {
            self.next_agent_id += 1;
            Some(id)
        } else {
            None
        }
    }

    pub fn occupy_tile(&mut self, pos: GridPos, agent: AgentId) -> bool {
        match self.tile_mut(pos) {
            Some(tile) if tile.occupied_by.is_none() && tile.is_passable() => {
                tile.occupied_by = Some(agent);
                true
            }
            _ => false,
        }
    }

    pub fn vacate_tile(&mut self, pos: GridPos) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.occupied_by = None;
        }
    }

    pub fn move_agent(&mut self, from: GridPos, to: GridPos, agent: AgentId) -> bool {
        if !self.is_valid_position(to) {
            return false;
        }
        self.vacate_tile(from);
        self.occupy_tile(to, agent)
    }

    /// The free passable tile closest to the centre, searched ring by ring.
    pub fn find_start_position(&self) -> Option<GridPos> {
        let cx = (self.width / 2) as i32;
        let cy = (self.height / 2) as i32;
        let max_ring = self.width.max(self.height) as i32;

        for radius in 0..=max_ring {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs() != radius && dy.abs() != radius {
                        continue;
                    }
                    let pos = GridPos::new(cx + dx, cy + dy);
                    if self.is_valid_position(pos) {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }
}
