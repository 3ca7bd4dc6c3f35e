//! Health overlay
//!
//! The overlay is the only state shared across threads. A listener thread
//! drains the simulation's health channel into [`HudState`]; the frame
//! loop reads it back through the same lock.

use crossbeam_channel::Receiver;
use destroyer_combat::{HealthBar, HealthChanged};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::JoinHandle;

/// What the overlay currently shows
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudState {
    pub reading: Option<HealthChanged>,
    pub bar: Option<HealthBar>,
    /// Health updates received so far
    pub updates: u64,
}

impl HudState {
    fn apply(&mut self, reading: HealthChanged) {
        self.reading = Some(reading);
        self.bar = Some(reading.bar());
        self.updates += 1;
    }
}

/// Overlay fed by a listener thread
pub struct Hud {
    state: Arc<RwLock<HudState>>,
    listener: Option<JoinHandle<()>>,
}

impl Hud {
    /// Start listening; the thread exits once every sender is dropped
    pub fn spawn(health: Receiver<HealthChanged>) -> Self {
        let state = Arc::new(RwLock::new(HudState::default()));
        let shared = Arc::clone(&state);

        let listener = std::thread::Builder::new()
            .name("hud".into())
            .spawn(move || {
                for reading in health.iter() {
                    let bar = reading.bar();
                    log::info!(
                        "HUD health {:.0}/{:.0} bar {:.1}px {:?}",
                        reading.current,
                        reading.max,
                        bar.width,
                        bar.color
                    );
                    shared.write().apply(reading);
                }
                log::debug!("HUD listener stopped");
            });

        let listener = match listener {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Failed to start HUD listener: {}", e);
                None
            }
        };

        Self { state, listener }
    }

    /// Copy of the current overlay
    pub fn snapshot(&self) -> HudState {
        *self.state.read()
    }

    /// Wait for the listener to drain its channel and return the final state
    pub fn join(mut self) -> HudState {
        if let Some(handle) = self.listener.take() {
            if handle.join().is_err() {
                log::error!("HUD listener panicked");
            }
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use destroyer_combat::HealthColor;

    #[test]
    fn test_listener_tracks_latest_reading() {
        let (tx, rx) = unbounded();
        let hud = Hud::spawn(rx);

        tx.send(HealthChanged { max: 300.0, current: 300.0 }).unwrap();
        tx.send(HealthChanged { max: 300.0, current: 60.0 }).unwrap();
        drop(tx);

        let state = hud.join();
        assert_eq!(state.updates, 2);
        assert_eq!(state.reading.map(|r| r.current), Some(60.0));
        assert_eq!(state.bar.map(|b| b.color), Some(HealthColor::Red));
    }

    #[test]
    fn test_empty_overlay() {
        let (tx, rx) = unbounded::<HealthChanged>();
        let hud = Hud::spawn(rx);
        assert_eq!(hud.snapshot().updates, 0);
        drop(tx);

        assert_eq!(hud.join(), HudState::default());
    }
}
