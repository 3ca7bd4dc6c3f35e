//! Hit points, death and the health bar model

use serde::{Deserialize, Serialize};

/// Result of applying damage to a [`Health`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    /// Already dead, nothing changed
    Ignored,
    /// Hit points dropped
    Damaged,
    /// Hit points reached zero with this hit
    Died,
}

/// Hit points of an actor.
///
/// Hit points only go down, and death is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current health, may go negative on the killing blow
    pub current: f32,
    /// Maximum health
    pub max: f32,
    /// Whether this actor is dead
    #[serde(skip)]
    pub is_dead: bool,
}

impl Health {
    /// Create a full health pool
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            is_dead: false,
        }
    }

    /// Apply damage
    pub fn apply_damage(&mut self, amount: f32) -> HealthOutcome {
        if self.is_dead {
            return HealthOutcome::Ignored;
        }

        self.current -= amount;
        if self.current <= 0.0 {
            self.is_dead = true;
            HealthOutcome::Died
        } else {
            HealthOutcome::Damaged
        }
    }

    /// Remaining health as a fraction of max
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }

    /// Snapshot for subscribers
    pub fn changed(&self) -> HealthChanged {
        HealthChanged {
            max: self.max,
            current: self.current,
        }
    }
}

/// Notification sent on every player health change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthChanged {
    pub max: f32,
    pub current: f32,
}

impl HealthChanged {
    /// Bar model for this update
    pub fn bar(&self) -> HealthBar {
        HealthBar::from_points(self.max, self.current)
    }
}

/// Health bar colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthColor {
    Green,
    Orange,
    Red,
}

/// Overlay health bar: width out of a fixed reference width, plus colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    pub width: f32,
    pub color: HealthColor,
}

impl HealthBar {
    /// Width of a full bar
    pub const REFERENCE_WIDTH: f32 = 150.0;

    /// Build the bar for a health reading
    pub fn from_points(max: f32, current: f32) -> Self {
        let width = if max > 0.0 {
            (Self::REFERENCE_WIDTH * current / max).max(0.0)
        } else {
            0.0
        };

        let color = if width <= Self::REFERENCE_WIDTH / 3.5 {
            HealthColor::Red
        } else if width <= Self::REFERENCE_WIDTH / 2.0 {
            HealthColor::Orange
        } else {
            HealthColor::Green
        };

        Self { width, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_damage_and_death() {
        let mut health = Health::new(70.0);

        assert_eq!(health.apply_damage(30.0), HealthOutcome::Damaged);
        assert_relative_eq!(health.current, 40.0);
        assert_eq!(health.apply_damage(40.0), HealthOutcome::Died);
        assert!(health.is_dead);

        let after = health;
        assert_eq!(health.apply_damage(30.0), HealthOutcome::Ignored);
        assert_eq!(health, after);
    }

    #[test]
    fn test_bar_colors() {
        assert_eq!(HealthBar::from_points(100.0, 60.0).color, HealthColor::Green);
        assert_eq!(HealthBar::from_points(100.0, 40.0).color, HealthColor::Orange);
        assert_eq!(HealthBar::from_points(100.0, 20.0).color, HealthColor::Red);
    }

    #[test]
    fn test_bar_width() {
        assert_relative_eq!(HealthBar::from_points(300.0, 150.0).width, 75.0);
        // Overkill never draws a negative bar
        let bar = HealthBar::from_points(70.0, -20.0);
        assert_eq!(bar.width, 0.0);
        assert_eq!(bar.color, HealthColor::Red);
        // Exactly half is already orange
        assert_eq!(HealthBar::from_points(100.0, 50.0).color, HealthColor::Orange);
    }

    #[test]
    fn test_fraction() {
        let mut health = Health::new(300.0);
        health.apply_damage(75.0);
        assert_relative_eq!(health.fraction(), 0.75);
        assert_eq!(health.changed(), HealthChanged { max: 300.0, current: 225.0 });
    }
}
