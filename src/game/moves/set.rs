// The eight moves of one character and the move selection state machine

use super::asset::{MoveAsset, MoveTemplate, TickContext};
use super::{Facing, MoveSlot};
use crate::engine::physics::{CategorySet, CollisionCategory, PhysicsWorld, RigidBodyHandle};
use crate::engine::renderer::SpriteCanvas;
use glam::Vec2;
use std::sync::Arc;
use std::time::Instant;

/// One character's move table
///
/// Exactly one slot is active at a time. A running move keeps getting
/// updates until it reports finished; only then (or when an idle/jump is
/// requested again while already idling/jumping) is the desired move
/// honoured. Attacks cannot be cancelled by new input.
#[derive(Debug)]
pub struct MoveSet {
    moves: [MoveAsset; MoveSlot::COUNT],
    /// Category of the owning character, once in a world
    category: Option<CollisionCategory>,
    /// Categories this character's hitboxes touch
    mask: CategorySet,
    active: MoveSlot,
}

impl MoveSet {
    /// Create a move set from one template per slot, in slot order
    pub fn new(templates: [Arc<MoveTemplate>; MoveSlot::COUNT]) -> Self {
        Self {
            moves: templates.map(MoveAsset::new),
            category: None,
            mask: CategorySet::empty(),
            active: MoveSlot::Idle,
        }
    }

    pub fn active(&self) -> MoveSlot {
        self.active
    }

    pub fn category(&self) -> Option<CollisionCategory> {
        self.category
    }

    pub fn mask(&self) -> CategorySet {
        self.mask
    }

    pub fn get(&self, slot: MoveSlot) -> &MoveAsset {
        &self.moves[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveAsset> {
        self.moves.iter()
    }

    /// Every hitbox body owned by the set
    pub fn bodies(&self) -> impl Iterator<Item = RigidBodyHandle> + '_ {
        self.moves.iter().flat_map(MoveAsset::bodies)
    }

    /// Build hitbox bodies for every move, touching every other player category
    pub fn construct_bodies(&mut self, world: &mut PhysicsWorld, own: CollisionCategory) {
        let opposing: Vec<CollisionCategory> = CollisionCategory::PLAYERS
            .into_iter()
            .filter(|&category| category != own)
            .collect();

        for asset in &mut self.moves {
            asset.construct_bodies(world, own, &opposing);
        }
        self.category = Some(own);
        self.mask = CategorySet::from_categories(&opposing);
    }

    /// Remove every hitbox body from the world
    pub fn destroy_bodies(&mut self, world: &mut PhysicsWorld) {
        for asset in &mut self.moves {
            asset.destroy_bodies(world);
        }
        self.category = None;
        self.mask = CategorySet::empty();
    }

    /// Make `slot` the active move and start it
    pub fn start(&mut self, slot: MoveSlot, ctx: &mut TickContext) {
        self.active = slot;
        self.moves[slot.index()].start_move(ctx.now, &mut *ctx.audio);
    }

    /// Run the active move for one tick, then apply the transition rule
    ///
    /// Returns the slot that is active afterwards.
    pub fn update(
        &mut self,
        ctx: &mut TickContext,
        desired: MoveSlot,
        facing: Facing,
        position: Vec2,
        own_body: RigidBodyHandle,
    ) -> MoveSlot {
        let active = self.active;
        let finished = self.moves[active.index()].update_move(
            ctx,
            facing,
            position,
            own_body,
            active.acts_on_own_body(),
        );

        if finished || (desired == active && active.is_reenterable()) {
            if desired == active && active.acts_on_own_body() {
                // Continuous locomotion keeps its animation running
                self.moves[active.index()].resume_move(ctx.now);
            } else {
                log::debug!("Move {:?} -> {:?}", active, desired);
                self.start(desired, ctx);
            }
        }

        self.active
    }

    /// Whether the active move could be replaced at `now`
    pub fn is_active_finished(&self, now: Instant) -> bool {
        self.get(self.active)
            .is_finished(now, self.active.acts_on_own_body())
    }

    /// Draw the active move's current frame
    pub fn draw(&self, canvas: &mut dyn SpriteCanvas, position: Vec2, facing: Facing) {
        self.get(self.active).draw(canvas, position, facing);
    }

    /// A copy sharing every template but owning no bodies
    pub fn clone_unbound(&self) -> Self {
        Self {
            moves: std::array::from_fn(|i| self.moves[i].clone_unbound()),
            category: None,
            mask: CategorySet::empty(),
            active: MoveSlot::Idle,
        }
    }
}
