//! Timed animation playback
//!
//! The headless runtime has no skeletons to animate. [`TimedAnimator`]
//! only keeps track of which one-shot clips are running and reports a
//! clip's completion tag once its duration has passed, which is all the
//! simulation needs to end attacks.

use destroyer_combat::{AnimationSink, ClipId, EntityId, PlayParams};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct Running {
    owner: EntityId,
    clip: ClipId,
    tag: ClipId,
    ends_at: f64,
}

/// Animation sink driven by the simulation clock
#[derive(Debug, Default)]
pub struct TimedAnimator {
    durations: HashMap<ClipId, f64>,
    running: Vec<Running>,
    now: f64,
}

impl TimedAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how long a clip plays
    pub fn with_clip(mut self, clip: ClipId, seconds: f64) -> Self {
        self.durations.insert(clip, seconds);
        self
    }

    /// Move the clock to `now`; clips started afterwards begin here
    pub fn set_time(&mut self, now: f64) {
        self.now = now;
    }

    /// Tags of clips that finished by `now`, in the order they end
    pub fn completed(&mut self, now: f64) -> Vec<(EntityId, ClipId)> {
        self.now = now;

        let (mut done, running): (Vec<_>, Vec<_>) = self.running.drain(..).partition(|r| r.ends_at <= now);
        self.running = running;

        done.sort_by(|a, b| a.ends_at.total_cmp(&b.ends_at));
        done.into_iter().map(|r| (r.owner, r.tag)).collect()
    }
}

impl AnimationSink for TimedAnimator {
    fn play(&mut self, owner: EntityId, clip: ClipId, params: PlayParams) {
        log::trace!("{} plays {}", owner, clip);

        let Some(tag) = params.tag else {
            return;
        };
        if params.looping {
            return;
        }
        let Some(&duration) = self.durations.get(clip) else {
            log::warn!("No duration for tagged clip '{}', completion never reported", clip);
            return;
        };

        self.running.retain(|r| !(r.owner == owner && r.clip == clip));
        self.running.push(Running {
            owner,
            clip,
            tag,
            ends_at: self.now + duration,
        });
    }

    fn stop(&mut self, owner: EntityId, clip: ClipId, _fade_out: f32) {
        self.running.retain(|r| !(r.owner == owner && r.clip == clip));
    }

    fn stop_all(&mut self, owner: EntityId) {
        self.running.retain(|r| r.owner != owner);
    }
}
