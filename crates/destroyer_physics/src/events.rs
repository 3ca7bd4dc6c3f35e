//! Contact events between tagged shapes

use crate::layers::ShapeCategory;
use destroyer_math::Vec3;

/// Identifies the shape on one side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeTag {
    /// Entity owning the shape (`None` for level geometry)
    pub owner: Option<u64>,
    /// Category the simulation classifies the shape by
    pub category: ShapeCategory,
}

impl ShapeTag {
    /// Tag for static level geometry
    pub const WALL: Self = Self {
        owner: None,
        category: ShapeCategory::Wall,
    };

    /// Tag for a shape owned by an entity
    pub fn owned(owner: u64, category: ShapeCategory) -> Self {
        Self {
            owner: Some(owner),
            category,
        }
    }

    /// Pack into collider user data: owner in the high bits, category low
    pub fn to_user_data(&self) -> u128 {
        let owner = self.owner.map(|o| o as u128 + 1).unwrap_or(0);
        (owner << 8) | self.category.to_bits() as u128
    }

    /// Unpack from collider user data
    pub fn from_user_data(data: u128) -> Option<Self> {
        let category = ShapeCategory::from_bits((data & 0xff) as u8)?;
        let owner = match data >> 8 {
            0 => None,
            o => Some((o - 1) as u64),
        };
        Some(Self { owner, category })
    }
}

/// Phase of a contact between two shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// Shapes started touching this step
    Begin,
    /// Shapes are still touching
    Update,
    /// Shapes stopped touching
    End,
}

/// A contact between two shapes.
///
/// `normal` points from shape `a` towards shape `b`: moving `b` along
/// `normal * penetration` separates the shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: ShapeTag,
    pub b: ShapeTag,
    /// Overlap depth, zero for end events
    pub penetration: f32,
    pub normal: Vec3,
}

impl Contact {
    /// Return the contact seen from the side with `category`, if any.
    ///
    /// The returned contact has the matching shape as `a`; the normal is
    /// flipped when the sides are swapped so it still points from `a`
    /// to `b`.
    pub fn matching(&self, category: ShapeCategory) -> Option<Contact> {
        if self.a.category == category {
            Some(*self)
        } else if self.b.category == category {
            Some(self.swapped())
        } else {
            None
        }
    }

    /// Same contact with the two sides exchanged
    pub fn swapped(&self) -> Contact {
        Contact {
            a: self.b,
            b: self.a,
            penetration: self.penetration,
            normal: -self.normal,
        }
    }

    /// Whether the contact involves both categories (in either order)
    pub fn is_between(&self, first: ShapeCategory, second: ShapeCategory) -> bool {
        (self.a.category == first && self.b.category == second)
            || (self.a.category == second && self.b.category == first)
    }
}

/// Receiver of contact callbacks.
///
/// Callbacks are synchronous and arrive on the thread that called
/// [`crate::WorldQuery::step_contacts`].
pub trait ContactListener {
    /// Shapes started touching
    fn begin_contact(&mut self, contact: &Contact);

    /// Shapes are still touching
    fn update_contact(&mut self, contact: &Contact);

    /// Shapes stopped touching
    fn end_contact(&mut self, contact: &Contact);

    /// Dispatch by phase
    fn on_contact(&mut self, phase: ContactPhase, contact: &Contact) {
        match phase {
            ContactPhase::Begin => self.begin_contact(contact),
            ContactPhase::Update => self.update_contact(contact),
            ContactPhase::End => self.end_contact(contact),
        }
    }
}

/// Listener that collects contacts into a buffer
#[derive(Debug, Default)]
pub struct ContactCollector {
    /// Contacts received this step, in delivery order
    pub contacts: Vec<(ContactPhase, Contact)>,
}

impl ContactCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all collected contacts
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Contacts in a given phase
    pub fn in_phase(&self, phase: ContactPhase) -> impl Iterator<Item = &Contact> {
        self.contacts
            .iter()
            .filter(move |(p, _)| *p == phase)
            .map(|(_, c)| c)
    }
}

impl ContactListener for ContactCollector {
    fn begin_contact(&mut self, contact: &Contact) {
        self.contacts.push((ContactPhase::Begin, *contact));
    }

    fn update_contact(&mut self, contact: &Contact) {
        self.contacts.push((ContactPhase::Update, *contact));
    }

    fn end_contact(&mut self, contact: &Contact) {
        self.contacts.push((ContactPhase::End, *contact));
    }
}
