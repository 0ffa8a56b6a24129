use bitflags::bitflags;
use rapier2d::prelude::*;

/// A single collision category a body can belong to
///
/// Every player slot owns one category so hitboxes can be told apart from
/// the hurtboxes they are allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionCategory {
    Player1,
    Player2,
    Player3,
    Player4,
    /// Static platforms and walls
    Stage,
}

impl CollisionCategory {
    /// Categories reserved for characters, in player order
    pub const PLAYERS: [CollisionCategory; 4] = [
        CollisionCategory::Player1,
        CollisionCategory::Player2,
        CollisionCategory::Player3,
        CollisionCategory::Player4,
    ];

    /// Category owned by the given player slot (0-3)
    pub fn player(index: usize) -> Option<Self> {
        Self::PLAYERS.get(index).copied()
    }

    /// The one-element set containing this category
    pub fn as_set(self) -> CategorySet {
        match self {
            CollisionCategory::Player1 => CategorySet::PLAYER_1,
            CollisionCategory::Player2 => CategorySet::PLAYER_2,
            CollisionCategory::Player3 => CategorySet::PLAYER_3,
            CollisionCategory::Player4 => CategorySet::PLAYER_4,
            CollisionCategory::Stage => CategorySet::STAGE,
        }
    }
}

bitflags! {
    /// A finite set of collision categories
    ///
    /// Combine with `union` / `difference`, never with raw bit arithmetic.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CategorySet: u32 {
        const PLAYER_1 = 1 << 0;
        const PLAYER_2 = 1 << 1;
        const PLAYER_3 = 1 << 2;
        const PLAYER_4 = 1 << 3;
        const STAGE = 1 << 4;
    }
}

impl CategorySet {
    /// Every character category
    pub fn players() -> Self {
        CollisionCategory::PLAYERS
            .iter()
            .fold(Self::empty(), |set, category| set.union(category.as_set()))
    }

    /// Every character category except `own`
    pub fn opponents_of(own: CollisionCategory) -> Self {
        Self::players().difference(own.as_set())
    }

    /// Build a set from any list of categories
    pub fn from_categories(categories: &[CollisionCategory]) -> Self {
        categories
            .iter()
            .fold(Self::empty(), |set, category| set.union(category.as_set()))
    }

    /// Check membership of a single category
    pub fn includes(self, category: CollisionCategory) -> bool {
        self.contains(category.as_set())
    }

    /// Convert to rapier's group representation
    pub fn to_group(self) -> Group {
        Group::from_bits_truncate(self.bits())
    }
}

/// Interaction groups for a character's persistent hurtbox
///
/// The hurtbox collides with the stage and with other characters but not
/// with bodies of its own category (its own hitboxes).
pub fn hurtbox_groups(own: CollisionCategory) -> InteractionGroups {
    let filter = CategorySet::all().difference(own.as_set());
    InteractionGroups::new(own.as_set().to_group(), filter.to_group())
}

/// Interaction groups for a transient hitbox
pub fn hitbox_groups(own: CollisionCategory, mask: CategorySet) -> InteractionGroups {
    InteractionGroups::new(own.as_set().to_group(), mask.to_group())
}

/// Interaction groups for stage geometry
pub fn stage_groups() -> InteractionGroups {
    InteractionGroups::new(CategorySet::STAGE.to_group(), CategorySet::players().to_group())
}
