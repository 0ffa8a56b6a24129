// Character rig: hurtbox, move set and input decoding for one player

use super::decoder::InputDecoder;
use super::stats::CharacterStats;
use crate::engine::input::InputSnapshot;
use crate::engine::physics::body::{compound_from_polygons, presets};
use crate::engine::physics::collision::hurtbox_groups;
use crate::engine::physics::{
    ColliderBuilder2D, CollisionCategory, PhysicsWorld, RigidBodyHandle, SharedShape,
};
use crate::engine::renderer::SpriteCanvas;
use crate::game::moves::{Facing, MoveSet, MoveSlot, TickContext};
use glam::Vec2;

/// What the save/load collaborator needs to rebuild a rig
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRecord {
    /// Name of the template in the roster
    pub template: String,
    /// Hurtbox position
    pub x: f32,
    pub y: f32,
}

/// A playable character
///
/// Rigs are created unbound (no physics bodies). `enter_world` builds the
/// hurtbox and every hitbox body; `leave_world` removes them again.
#[derive(Debug)]
pub struct CharacterRig {
    /// Template name
    name: String,
    /// Physical properties
    stats: CharacterStats,
    /// The eight moves and the selection state machine
    moves: MoveSet,
    /// Hurtbox shape taken from the first idle frame, if it has geometry
    hurtbox_shape: Option<SharedShape>,
    /// Handle to the persistent hurtbox body while in a world
    hurtbox: Option<RigidBodyHandle>,
    /// Collision category while in a world
    category: Option<CollisionCategory>,
    decoder: InputDecoder,
    deaths: u32,
}

impl CharacterRig {
    /// Create an unbound rig
    pub fn new(name: &str, stats: CharacterStats, moves: MoveSet) -> Self {
        let idle = moves.get(MoveSlot::Idle).template();
        let hurtbox_shape =
            compound_from_polygons(idle.geometry().frame(0).iter().map(|p| p.points()));
        if hurtbox_shape.is_none() {
            log::warn!("'{}' has an empty first idle frame, using a capsule hurtbox", name);
        }

        Self {
            name: name.to_string(),
            stats,
            moves,
            hurtbox_shape,
            hurtbox: None,
            category: None,
            decoder: InputDecoder::default(),
            deaths: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn moves(&self) -> &MoveSet {
        &self.moves
    }

    pub fn active_move(&self) -> MoveSlot {
        self.moves.active()
    }

    pub fn facing(&self) -> Facing {
        self.decoder.facing()
    }

    pub fn hurtbox(&self) -> Option<RigidBodyHandle> {
        self.hurtbox
    }

    pub fn category(&self) -> Option<CollisionCategory> {
        self.category
    }

    pub fn is_in_world(&self) -> bool {
        self.hurtbox.is_some()
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn record_death(&mut self) {
        self.deaths += 1;
    }

    pub fn reset_deaths(&mut self) {
        self.deaths = 0;
    }

    /// Build the hurtbox at `spawn` and every hitbox body
    ///
    /// A rig that is already in a world leaves it first.
    pub fn enter_world(
        &mut self,
        world: &mut PhysicsWorld,
        category: CollisionCategory,
        spawn: Vec2,
    ) {
        self.leave_world(world);

        let body = world.add_rigid_body(presets::character_body(spawn.x, spawn.y));
        let builder = match &self.hurtbox_shape {
            Some(shape) => ColliderBuilder2D::shape(shape.clone()),
            None => presets::character_capsule(self.stats.width, self.stats.height),
        };
        let collider = builder
            .collision_groups(hurtbox_groups(category))
            .friction(self.stats.friction)
            .restitution(self.stats.restitution)
            .mass(self.stats.mass)
            .build();
        world.add_collider(collider, body);

        self.moves.construct_bodies(world, category);
        self.hurtbox = Some(body);
        self.category = Some(category);

        log::info!("'{}' entered the world as {:?} at {}", self.name, category, spawn);
    }

    /// Remove the hurtbox and every hitbox body
    pub fn leave_world(&mut self, world: &mut PhysicsWorld) {
        if let Some(body) = self.hurtbox.take() {
            world.remove_rigid_body(body);
        }
        self.moves.destroy_bodies(world);
        self.category = None;
    }

    /// Run one tick: decode input, then drive the move state machine
    ///
    /// Returns the active move after the tick. An unbound rig does nothing.
    pub fn update_character(&mut self, ctx: &mut TickContext, input: &InputSnapshot) -> MoveSlot {
        let desired = self.decoder.decode(input);

        let Some(body) = self.hurtbox else {
            return self.moves.active();
        };
        let Some(position) = ctx.physics.body_position(body) else {
            log::warn!("Hurtbox of '{}' is missing from the world", self.name);
            return self.moves.active();
        };

        self.moves
            .update(ctx, desired, self.decoder.facing(), position, body)
    }

    /// Move the hurtbox to `position` and stop it
    pub fn respawn(&mut self, world: &mut PhysicsWorld, position: Vec2) {
        if let Some(body) = self.hurtbox {
            world.teleport(body, position);
        }
    }

    /// Hurtbox position, if the rig is in a world
    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        self.hurtbox.and_then(|body| world.body_position(body))
    }

    /// Draw the active move's frame at the hurtbox
    pub fn draw(&self, world: &PhysicsWorld, canvas: &mut dyn SpriteCanvas) {
        if let Some(position) = self.position(world) {
            self.moves.draw(canvas, position, self.decoder.facing());
        }
    }

    /// Template name and position for the save/load collaborator
    pub fn save_record(&self, world: &PhysicsWorld) -> Option<SaveRecord> {
        self.position(world).map(|position| SaveRecord {
            template: self.name.clone(),
            x: position.x,
            y: position.y,
        })
    }

    /// A fresh copy of this rig that owns no physics bodies
    ///
    /// Used to hand each player their own instance of a roster template.
    pub fn clone_unbound(&self) -> Self {
        Self {
            name: self.name.clone(),
            stats: self.stats.clone(),
            moves: self.moves.clone_unbound(),
            hurtbox_shape: self.hurtbox_shape.clone(),
            hurtbox: None,
            category: None,
            decoder: InputDecoder::default(),
            deaths: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{SpriteSheet, TextureHandle};
    use crate::engine::audio::SilentOutput;
    use crate::engine::input::Button;
    use crate::engine::renderer::RecordingCanvas;
    use crate::game::moves::{AnimationClip, EffectInput, MoveTemplate};
    use approx::assert_relative_eq;
    use image::{Rgba, RgbaImage};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn template(slot: MoveSlot, opaque: bool) -> Arc<MoveTemplate> {
        let pixels = RgbaImage::from_fn(32 * 2, 32, |x, y| {
            if opaque && (8..24).contains(&(x % 32)) && (0..32).contains(&y) {
                Rgba([30, 200, 90, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let texture = TextureHandle::named(slot.name());
        let sheet = SpriteSheet::new(texture, pixels, 32, 32, None).unwrap();
        let clip = AnimationClip::looping(sheet, 8.0, 32.0);
        let template = MoveTemplate::new("test", slot, clip, 1.0 / 32.0);

        let template = match slot {
            MoveSlot::Walk => template.with_effect(|world: &mut PhysicsWorld, input: &EffectInput| {
                let velocity = Vec2::new(input.facing.sign() * 3.0, 0.0);
                world.set_linear_velocity(input.own_body, velocity);
            }),
            _ => template.with_effect(|_: &mut PhysicsWorld, _: &EffectInput| {}),
        };
        Arc::new(template)
    }

    fn rig(idle_opaque: bool) -> CharacterRig {
        let moves = MoveSet::new(MoveSlot::ALL.map(|slot| {
            template(slot, slot != MoveSlot::Idle || idle_opaque)
        }));
        CharacterRig::new("test", CharacterStats::default(), moves)
    }

    fn tick(
        rig: &mut CharacterRig,
        world: &mut PhysicsWorld,
        input: &InputSnapshot,
        now: Instant,
    ) -> MoveSlot {
        let mut audio = SilentOutput;
        let mut ctx = TickContext {
            physics: world,
            audio: &mut audio,
            now,
        };
        rig.update_character(&mut ctx, input)
    }

    #[test]
    fn test_enter_and_leave_world() {
        let mut world = PhysicsWorld::new();
        let mut rig = rig(true);
        assert!(!rig.is_in_world());

        rig.enter_world(&mut world, CollisionCategory::Player1, Vec2::new(1.0, 2.0));
        assert!(rig.is_in_world());
        assert_eq!(rig.position(&world), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(world.body_count(), 1 + 8 * 2);

        rig.leave_world(&mut world);
        assert_eq!(world.body_count(), 0);
        assert_eq!(rig.position(&world), None);
    }

    #[test]
    fn test_capsule_fallback_for_empty_idle() {
        let mut world = PhysicsWorld::new();
        let mut rig = rig(false);
        rig.enter_world(&mut world, CollisionCategory::Player2, Vec2::ZERO);
        assert!(rig.hurtbox().is_some());
    }

    #[test]
    fn test_respawn_resets_motion() {
        let mut world = PhysicsWorld::new();
        let mut rig = rig(true);
        rig.enter_world(&mut world, CollisionCategory::Player1, Vec2::ZERO);
        let body = rig.hurtbox().unwrap();
        world.set_linear_velocity(body, Vec2::new(5.0, -3.0));
        world.get_rigid_body_mut(body).unwrap().set_angvel(2.0, true);

        let target = Vec2::new(-4.0, 6.5);
        rig.respawn(&mut world, target);

        let rb = world.get_rigid_body(body).unwrap();
        assert_eq!(rig.position(&world), Some(target));
        assert_eq!(world.linear_velocity(body), Some(Vec2::ZERO));
        assert_eq!(rb.angvel(), 0.0);
    }

    #[test]
    fn test_walk_moves_and_turns() {
        let mut world = PhysicsWorld::new();
        let mut rig = rig(true);
        rig.enter_world(&mut world, CollisionCategory::Player1, Vec2::ZERO);
        let t0 = Instant::now();

        let left = InputSnapshot::neutral().with_stick(-1.0, 0.0);
        assert_eq!(tick(&mut rig, &mut world, &left, t0), MoveSlot::Walk);
        // Walk is now active; its effect runs on the next tick
        tick(&mut rig, &mut world, &left, t0 + Duration::from_millis(16));

        assert_eq!(rig.facing(), Facing::Left);
        let velocity = world.linear_velocity(rig.hurtbox().unwrap()).unwrap();
        assert_relative_eq!(velocity.x, -3.0);

        tick(&mut rig, &mut world, &InputSnapshot::neutral(), t0 + Duration::from_millis(32));
        assert_eq!(rig.facing(), Facing::Left);
    }

    #[test]
    fn test_unbound_rig_ignores_input() {
        let mut world = PhysicsWorld::new();
        let mut rig = rig(true);
        let jump = InputSnapshot::neutral().with_button(Button::A);
        assert_eq!(tick(&mut rig, &mut world, &jump, Instant::now()), MoveSlot::Idle);
    }

    #[test]
    fn test_clone_shares_no_bodies() {
        let mut world = PhysicsWorld::new();
        let mut first = rig(true);
        let mut second = first.clone_unbound();
        first.enter_world(&mut world, CollisionCategory::Player1, Vec2::ZERO);
        second.enter_world(&mut world, CollisionCategory::Player2, Vec2::new(3.0, 0.0));

        let mut first_bodies: HashSet<_> = first.moves().bodies().collect();
        first_bodies.insert(first.hurtbox().unwrap());

        assert!(!first_bodies.contains(&second.hurtbox().unwrap()));
        assert!(second.moves().bodies().all(|body| !first_bodies.contains(&body)));
        assert_eq!(second.name(), first.name());
        assert_eq!(second.stats(), first.stats());
    }

    #[test]
    fn test_save_record() {
        let mut world = PhysicsWorld::new();
        let mut rig = rig(true);
        assert_eq!(rig.save_record(&world), None);

        rig.enter_world(&mut world, CollisionCategory::Player3, Vec2::new(2.5, -1.0));
        assert_eq!(
            rig.save_record(&world),
            Some(SaveRecord {
                template: "test".to_string(),
                x: 2.5,
                y: -1.0,
            })
        );
    }

    #[test]
    fn test_draw_at_hurtbox() {
        let mut world = PhysicsWorld::new();
        let mut rig = rig(true);
        let mut canvas = RecordingCanvas::default();

        rig.draw(&world, &mut canvas);
        assert!(canvas.sprites.is_empty());

        rig.enter_world(&mut world, CollisionCategory::Player1, Vec2::new(0.5, 0.5));
        rig.draw(&world, &mut canvas);
        assert_eq!(canvas.sprites.len(), 1);
        assert_eq!(canvas.sprites[0].position, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_death_count() {
        let mut rig = rig(true);
        rig.record_death();
        rig.record_death();
        assert_eq!(rig.deaths(), 2);
        assert_eq!(rig.clone_unbound().deaths(), 0);
        rig.reset_deaths();
        assert_eq!(rig.deaths(), 0);
    }
}
