//! Short-term sensory memory
//!
//! Keeps the last few percepts so an agent stays aware of resources that have
//! just left its sensory range.

use psi_core::config::PerceptionConfig;
use std::collections::VecDeque;

use crate::island::{GridPos, ResourceType};
use crate::perception::Percept;

#[derive(Debug, Clone)]
pub struct SensoryMemory {
    /// Oldest first, each stamped with the time it was perceived.
    memories: VecDeque<(f64, Percept)>,
    capacity: usize,
    decay_time: f64,
}

impl Default for SensoryMemory {
    fn default() -> Self {
        Self::new(&PerceptionConfig::default())
    }
}

impl SensoryMemory {
    pub fn new(config: &PerceptionConfig) -> Self {
        Self {
            memories: VecDeque::with_capacity(config.memory_capacity),
            capacity: config.memory_capacity,
            decay_time: config.memory_decay_time,
        }
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// Remember `percept`, evicting the oldest entry once full.
    pub fn add_percept(&mut self, percept: Percept, timestamp: f64) {
        if self.capacity == 0 {
            return;
        }
        while self.memories.len() >= self.capacity {
            self.memories.pop_front();
        }
        self.memories.push_back((timestamp, percept));
    }

    fn is_fresh(&self, timestamp: f64, now: f64) -> bool {
        now - timestamp < self.decay_time
    }

    /// Percepts that have not decayed yet, oldest first.
    pub fn recent_percepts(&self, now: f64) -> Vec<&Percept> {
        self.memories
            .iter()
            .filter(|(t, _)| self.is_fresh(*t, now))
            .map(|(_, p)| p)
            .collect()
    }

    pub fn clear_old(&mut self, now: f64) {
        let decay_time = self.decay_time;
        self.memories.retain(|(t, _)| now - *t < decay_time);
    }

    /// Where `kind` was most recently seen, newest percept first.
    ///
    /// Within one percept nearby sightings are checked before the observer's
    /// own tile.
    pub fn find_last_seen_resource(&self, kind: ResourceType, now: f64) -> Option<GridPos> {
        self.memories
            .iter()
            .rev()
            .filter(|(t, _)| self.is_fresh(*t, now))
            .find_map(|(_, percept)| {
                percept
                    .nearby_resources
                    .iter()
                    .find(|r| r.kind == kind)
                    .map(|r| r.pos)
                    .or_else(|| (percept.current_resource == Some(kind)).then_some(percept.position))
            })
    }
}
