/// Wave progression: an ordered queue of enemy groups.
///
/// The queue only observes emptiness.  Removing individual enemies
/// (offscreen, defeated, expired) is the caller's job.

use std::collections::VecDeque;

use tracing::info;

use crate::entities::Entity;
use crate::sequencer::ActionSequence;

/// An enemy and the script that drives it.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub entity: Entity,
    pub sequence: ActionSequence,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Wave {
    pub enemies: Vec<Enemy>,
}

impl Wave {
    pub fn new(enemies: Vec<Enemy>) -> Self {
        Wave { enemies }
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Keep the enemies matching `keep`, preserving order.  Returns the
    /// number removed.
    pub fn retain_enemies(&mut self, keep: impl FnMut(&Enemy) -> bool) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(keep);
        before - self.enemies.len()
    }
}

#[derive(Clone, Debug, Default)]
pub struct WaveQueue {
    waves: VecDeque<Wave>,
    retired: u32,
}

impl WaveQueue {
    pub fn new(waves: Vec<Wave>) -> Self {
        WaveQueue {
            waves: waves.into(),
            retired: 0,
        }
    }

    pub fn current(&self) -> Option<&Wave> {
        self.waves.front()
    }

    pub fn current_mut(&mut self) -> Option<&mut Wave> {
        self.waves.front_mut()
    }

    /// Pop empty waves off the front until the front has a live enemy or
    /// the queue is exhausted.  Returns how many were popped.
    pub fn retire_empty_waves(&mut self) -> usize {
        let mut popped = 0;
        while self.waves.front().map_or(false, Wave::is_empty) {
            self.waves.pop_front();
            self.retired += 1;
            popped += 1;
            info!(
                wave = self.retired,
                remaining = self.waves.len(),
                "wave cleared"
            );
        }
        popped
    }

    /// Waves still queued, including the current one.
    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Waves retired so far.
    pub fn retired(&self) -> u32 {
        self.retired
    }
}
