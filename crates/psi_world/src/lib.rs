//! Island world for PSI agents: a grid of terrain and consumable resources,
//! the perception scan agents read it through, and a short sensory memory.

pub mod island;
pub mod memory;
pub mod perception;

pub use island::{AgentId, Direction, GridPos, Island, ResourceType, TerrainType, Tile};
pub use memory::SensoryMemory;
pub use perception::{Percept, PerceptionSystem, ResourceSighting};
