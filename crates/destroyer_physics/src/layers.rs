//! Shape categories and contact filtering
//!
//! Every collider carries one of four categories. A category occupies one
//! bit of a group mask; [`CollisionMatrix`] decides which category pairs
//! report contacts at all.

use serde::{Deserialize, Serialize};

/// Category tag the simulation uses to classify contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeCategory {
    /// Static level geometry, walls and walkable ground alike
    Wall,
    EnemyBody,
    PlayerBody,
    PlayerWeapon,
}

impl ShapeCategory {
    pub const ALL: [Self; 4] = [Self::Wall, Self::EnemyBody, Self::PlayerBody, Self::PlayerWeapon];

    /// Single-bit group mask
    #[inline]
    pub fn mask(&self) -> u32 {
        1 << self.to_bits()
    }

    /// Groups for a query that should only see this category
    pub fn query_groups(&self) -> CollisionGroups {
        CollisionGroups::new(u32::MAX, self.mask())
    }

    /// Whether this is a character hit-volume (body, not weapon)
    pub fn is_character_body(&self) -> bool {
        matches!(self, Self::EnemyBody | Self::PlayerBody)
    }

    /// Encode into the low bits of collider user data
    pub fn to_bits(&self) -> u8 {
        *self as u8
    }

    /// Decode from collider user data bits
    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.get(bits as usize).copied()
    }
}

/// Membership and filter masks of a collider or query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    /// Categories the object belongs to
    pub memberships: u32,
    /// Categories the object interacts with
    pub filter: u32,
}

impl CollisionGroups {
    pub fn new(memberships: u32, filter: u32) -> Self {
        Self { memberships, filter }
    }

    /// Both sides accept each other
    pub fn can_collide(&self, other: &CollisionGroups) -> bool {
        self.memberships & other.filter != 0 && other.memberships & self.filter != 0
    }
}

/// Symmetric table of category pairs that report contacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionMatrix {
    /// Per category (by bit index), mask of the categories it touches
    masks: [u32; 4],
}

impl Default for CollisionMatrix {
    fn default() -> Self {
        use ShapeCategory::*;

        let mut matrix = Self::empty();
        // Character bodies are pushed out of walls
        matrix.allow(Wall, EnemyBody);
        matrix.allow(Wall, PlayerBody);
        // Golems attack on body contact and are hit by the weapon
        matrix.allow(PlayerBody, EnemyBody);
        matrix.allow(PlayerWeapon, EnemyBody);
        matrix
    }
}

impl CollisionMatrix {
    /// Matrix where nothing touches
    pub fn empty() -> Self {
        Self { masks: [0; 4] }
    }

    /// Let two categories report contacts with each other
    pub fn allow(&mut self, a: ShapeCategory, b: ShapeCategory) {
        self.masks[a.to_bits() as usize] |= b.mask();
        self.masks[b.to_bits() as usize] |= a.mask();
    }

    /// Stop two categories from reporting contacts
    pub fn deny(&mut self, a: ShapeCategory, b: ShapeCategory) {
        self.masks[a.to_bits() as usize] &= !b.mask();
        self.masks[b.to_bits() as usize] &= !a.mask();
    }

    /// Groups a collider of `category` is created with
    pub fn groups(&self, category: ShapeCategory) -> CollisionGroups {
        CollisionGroups::new(category.mask(), self.masks[category.to_bits() as usize])
    }

    /// Check if two categories report contacts
    pub fn categories_collide(&self, a: ShapeCategory, b: ShapeCategory) -> bool {
        self.groups(a).can_collide(&self.groups(b))
    }
}
