//! Animation playback sink
//!
//! Clip data lives outside the simulation. Actors only ask a sink to play
//! or stop clips by name, and the host reports tagged completions back.

use crate::entity::EntityId;

/// Name of an animation clip
pub type ClipId = &'static str;

/// Clip names and timings used by every character
pub mod clips {
    use super::ClipId;

    /// Looping walk cycle
    pub const WALK: ClipId = "walk";
    /// One-shot melee attack; its completion tag ends the attack
    pub const ATTACK: ClipId = "attack1";
    /// One-shot death, held on the last frame
    pub const DEAD: ClipId = "dead";
    /// Fade in/out for walk and attack clips, seconds
    pub const FADE: f32 = 0.2;
}

/// How a clip should be played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayParams {
    pub looping: bool,
    pub fade_in: f32,
    /// Keep the last frame on screen when the clip ends
    pub hold_last_frame: bool,
    /// Completion is reported with this tag
    pub tag: Option<ClipId>,
}

impl PlayParams {
    /// Looping clip
    pub fn looping(fade_in: f32) -> Self {
        Self {
            looping: true,
            fade_in,
            hold_last_frame: false,
            tag: None,
        }
    }

    /// One-shot clip
    pub fn once(fade_in: f32) -> Self {
        Self {
            looping: false,
            ..Self::looping(fade_in)
        }
    }

    /// Report completion with `tag`
    pub fn tagged(mut self, tag: ClipId) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Hold the last frame
    pub fn held(mut self) -> Self {
        self.hold_last_frame = true;
        self
    }
}

/// Receiver of play/stop requests
pub trait AnimationSink {
    /// Start a clip on an entity
    fn play(&mut self, owner: EntityId, clip: ClipId, params: PlayParams);

    /// Fade out a clip
    fn stop(&mut self, owner: EntityId, clip: ClipId, fade_out: f32);

    /// Stop everything an entity is playing
    fn stop_all(&mut self, owner: EntityId);
}

/// Sink that drops every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnimationSink for NullSink {
    fn play(&mut self, _owner: EntityId, _clip: ClipId, _params: PlayParams) {}
    fn stop(&mut self, _owner: EntityId, _clip: ClipId, _fade_out: f32) {}
    fn stop_all(&mut self, _owner: EntityId) {}
}

/// A recorded sink request
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationCall {
    Play {
        owner: EntityId,
        clip: ClipId,
        params: PlayParams,
    },
    Stop {
        owner: EntityId,
        clip: ClipId,
        fade_out: f32,
    },
    StopAll {
        owner: EntityId,
    },
}

/// Sink that records every request in order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub calls: Vec<AnimationCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `clip` was ever played on `owner`
    pub fn played(&self, owner: EntityId, clip: ClipId) -> bool {
        self.calls.iter().any(|call| {
            matches!(call, AnimationCall::Play { owner: o, clip: c, .. } if *o == owner && *c == clip)
        })
    }

    /// Number of times `clip` was played on `owner`
    pub fn play_count(&self, owner: EntityId, clip: ClipId) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(call, AnimationCall::Play { owner: o, clip: c, .. } if *o == owner && *c == clip)
            })
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl AnimationSink for RecordingSink {
    fn play(&mut self, owner: EntityId, clip: ClipId, params: PlayParams) {
        self.calls.push(AnimationCall::Play { owner, clip, params });
    }

    fn stop(&mut self, owner: EntityId, clip: ClipId, fade_out: f32) {
        self.calls.push(AnimationCall::Stop { owner, clip, fade_out });
    }

    fn stop_all(&mut self, owner: EntityId) {
        self.calls.push(AnimationCall::StopAll { owner });
    }
}
