//! Scripted player input
//!
//! Replays a level's script steps as per-frame input. A step's walk
//! direction holds until the next step; an attack press lasts one frame.

use crate::level::ScriptStep;
use destroyer_combat::Vec2;
use destroyer_sim::PlayerInput;

/// Walks through script steps as time advances
#[derive(Debug, Clone)]
pub struct ScriptCursor {
    steps: Vec<ScriptStep>,
    next: usize,
    direction: Vec2,
}

impl ScriptCursor {
    /// Steps must be ordered by time
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            next: 0,
            direction: Vec2::ZERO,
        }
    }

    /// Input for the frame at `now`
    pub fn input_at(&mut self, now: f64) -> PlayerInput {
        let mut attack = false;

        while let Some(step) = self.steps.get(self.next).filter(|s| s.at <= now) {
            self.direction = step
                .walk
                .map(|[x, z]| Vec2::new(x, z).normalize())
                .unwrap_or(Vec2::ZERO);
            attack |= step.attack;
            log::debug!("Script step at {:.2}s: walk {:?} attack {}", step.at, step.walk, step.attack);
            self.next += 1;
        }

        PlayerInput {
            direction: self.direction,
            attack,
        }
    }
}
