// Move templates and per-player move instances
//
// A `MoveTemplate` holds everything about a move that never changes: its
// clip, hitbox geometry, sounds and effect. Templates are shared through
// `Arc`. A `MoveAsset` is one player's copy of a move: it owns the physics
// bodies built for that player and the move's playback state.

use super::animation::{AnimationClip, AnimationClock};
use super::polygon::HitboxGeometry;
use super::resolver;
use super::{Facing, MoveSlot};
use crate::engine::assets::SoundHandle;
use crate::engine::audio::{AudioOutput, SoundSet};
use crate::engine::physics::body::{compound_from_polygons, presets};
use crate::engine::physics::collision::hitbox_groups;
use crate::engine::physics::{
    CategorySet, ColliderBuilder2D, ColliderHandle, CollisionCategory, PhysicsWorld,
    RigidBodyHandle, SharedShape,
};
use crate::engine::renderer::SpriteCanvas;
use glam::Vec2;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What an effect gets to see when it runs
#[derive(Debug)]
pub struct EffectInput<'a> {
    /// Move the effect belongs to
    pub slot: MoveSlot,
    /// Animation frame shown this tick
    pub frame: usize,
    /// Direction the character faces
    pub facing: Facing,
    /// Bodies the move affects this tick: touched opponents, or the own
    /// hurtbox for locomotion moves
    pub affected: &'a [RigidBodyHandle],
    /// The character's own hurtbox
    pub own_body: RigidBodyHandle,
}

/// Gameplay logic of a move, run once per tick while the move is active
pub type MoveEffect = Arc<dyn Fn(&mut PhysicsWorld, &EffectInput) + Send + Sync>;

/// Per-tick collaborators handed down from the arena
pub struct TickContext<'a> {
    pub physics: &'a mut PhysicsWorld,
    pub audio: &'a mut dyn AudioOutput,
    pub now: Instant,
}

/// Compound hitbox shapes of one frame, for both facings
#[derive(Clone)]
struct FrameShapes {
    right: SharedShape,
    left: SharedShape,
}

impl FrameShapes {
    fn facing(&self, facing: Facing) -> &SharedShape {
        match facing {
            Facing::Right => &self.right,
            Facing::Left => &self.left,
        }
    }
}

/// Immutable definition of one move
pub struct MoveTemplate {
    slot: MoveSlot,
    clip: AnimationClip,
    geometry: HitboxGeometry,
    /// One entry per frame; `None` where the frame has no geometry
    shapes: Vec<Option<FrameShapes>>,
    play_duration: Duration,
    sounds: Vec<SoundHandle>,
    effect: Option<MoveEffect>,
}

impl MoveTemplate {
    /// Create a move from its clip, extracting hitbox geometry from the sheet
    ///
    /// `scale` converts sprite pixels into simulation units. The play
    /// duration defaults to one pass of the clip.
    pub fn new(character: &str, slot: MoveSlot, clip: AnimationClip, scale: f32) -> Self {
        let label = format!("{}_{}", character, slot.name());
        let geometry = HitboxGeometry::from_sheet(clip.sheet(), scale, &label);

        let shapes = geometry
            .frames()
            .iter()
            .map(|polygons| {
                let right = compound_from_polygons(polygons.iter().map(|p| p.points()))?;
                let mirrored: Vec<_> = polygons.iter().map(|p| p.mirrored()).collect();
                let left = compound_from_polygons(mirrored.iter().map(|p| p.points()))?;
                Some(FrameShapes { right, left })
            })
            .collect();

        Self {
            slot,
            play_duration: clip.total_duration(),
            clip,
            geometry,
            shapes,
            sounds: Vec::new(),
            effect: None,
        }
    }

    /// Force-expire the move after `duration` regardless of animation progress
    pub fn with_play_duration(mut self, duration: Duration) -> Self {
        self.play_duration = duration;
        self
    }

    /// Clips to pick from when the move starts
    pub fn with_sounds(mut self, sounds: Vec<SoundHandle>) -> Self {
        self.sounds = sounds;
        self
    }

    /// Set the gameplay effect
    pub fn with_effect<F>(mut self, effect: F) -> Self
    where
        F: Fn(&mut PhysicsWorld, &EffectInput) + Send + Sync + 'static,
    {
        self.effect = Some(Arc::new(effect));
        self
    }

    pub fn slot(&self) -> MoveSlot {
        self.slot
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn geometry(&self) -> &HitboxGeometry {
        &self.geometry
    }

    pub fn play_duration(&self) -> Duration {
        self.play_duration
    }

    pub fn sounds(&self) -> &[SoundHandle] {
        &self.sounds
    }

    pub fn has_effect(&self) -> bool {
        self.effect.is_some()
    }

    /// Whether a move in this state may be replaced
    ///
    /// Depends only on its arguments, so asking twice gives the same answer.
    pub fn is_finished(&self, elapsed: Duration, frame: usize, on_own_body: bool) -> bool {
        elapsed >= self.play_duration || self.clip.is_last_frame(frame) || on_own_body
    }
}

impl fmt::Debug for MoveTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveTemplate")
            .field("slot", &self.slot)
            .field("frames", &self.clip.frame_count())
            .field("play_duration", &self.play_duration)
            .field("sounds", &self.sounds.len())
            .field("has_effect", &self.has_effect())
            .finish()
    }
}

/// The physics body of one frame's hitbox
#[derive(Debug)]
struct HitboxBody {
    body: RigidBodyHandle,
    /// Missing for frames without geometry
    collider: Option<ColliderHandle>,
    /// Facing the collider's shape currently matches
    facing: Facing,
}

/// One player's instance of a move
#[derive(Debug)]
pub struct MoveAsset {
    template: Arc<MoveTemplate>,
    /// One body per frame once the move is in a world, empty otherwise
    hitboxes: Vec<HitboxBody>,
    mask: CategorySet,
    sound_set: SoundSet,
    clock: AnimationClock,
    started_at: Option<Instant>,
    current_frame: usize,
}

impl MoveAsset {
    pub fn new(template: Arc<MoveTemplate>) -> Self {
        let sound_set = SoundSet::new(template.sounds.clone());
        Self {
            template,
            hitboxes: Vec::new(),
            mask: CategorySet::empty(),
            sound_set,
            clock: AnimationClock::default(),
            started_at: None,
            current_frame: 0,
        }
    }

    pub fn template(&self) -> &Arc<MoveTemplate> {
        &self.template
    }

    pub fn slot(&self) -> MoveSlot {
        self.template.slot
    }

    /// Frame chosen by the last update
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Handles of the per-frame hitbox bodies, in frame order
    pub fn bodies(&self) -> impl Iterator<Item = RigidBodyHandle> + '_ {
        self.hitboxes.iter().map(|hitbox| hitbox.body)
    }

    pub fn body_count(&self) -> usize {
        self.hitboxes.len()
    }

    pub fn has_bodies(&self) -> bool {
        !self.hitboxes.is_empty()
    }

    /// Build one disabled hitbox body per frame
    ///
    /// The hitboxes belong to `own` and touch the union of `opposing`.
    /// Bodies from an earlier call are removed first.
    pub fn construct_bodies(
        &mut self,
        world: &mut PhysicsWorld,
        own: CollisionCategory,
        opposing: &[CollisionCategory],
    ) {
        self.destroy_bodies(world);
        self.mask = CategorySet::from_categories(opposing);
        let groups = hitbox_groups(own, self.mask);

        for shapes in &self.template.shapes {
            let body = world.add_rigid_body(presets::hitbox_body());
            let collider = shapes.as_ref().map(|shapes| {
                let collider = ColliderBuilder2D::shape(shapes.right.clone())
                    .collision_groups(groups)
                    .sensor(true)
                    .build();
                world.add_collider(collider, body)
            });

            self.hitboxes.push(HitboxBody {
                body,
                collider,
                facing: Facing::Right,
            });
        }

        log::debug!(
            "Built {} hitbox bodies for {:?}",
            self.hitboxes.len(),
            self.template.slot
        );
    }

    /// Remove this move's bodies from the world
    pub fn destroy_bodies(&mut self, world: &mut PhysicsWorld) {
        for hitbox in self.hitboxes.drain(..) {
            world.remove_rigid_body(hitbox.body);
        }
    }

    /// Begin the move at `now` and play one of its sounds
    pub fn start_move(&mut self, now: Instant, audio: &mut dyn AudioOutput) {
        self.clock.restart(now);
        self.started_at = Some(now);
        self.current_frame = 0;
        self.sound_set.play(audio);
    }

    /// Re-arm a move that is already running without rewinding its animation
    pub fn resume_move(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    /// Time since the move last started
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start))
    }

    /// Whether the move may be replaced at `now`
    pub fn is_finished(&self, now: Instant, on_own_body: bool) -> bool {
        let frame = self.clock.frame(&self.template.clip, now);
        self.template
            .is_finished(self.elapsed(now), frame, on_own_body)
    }

    /// Run one tick of the move and report whether it has finished
    ///
    /// Outside `on_own_body` mode the current frame's hitbox is opened at
    /// `position` for a single query and closed again before the effect
    /// runs. In `on_own_body` mode the effect acts on `own_body` alone.
    pub fn update_move(
        &mut self,
        ctx: &mut TickContext,
        facing: Facing,
        position: Vec2,
        own_body: RigidBodyHandle,
        on_own_body: bool,
    ) -> bool {
        let frame = self.clock.frame(&self.template.clip, ctx.now);
        self.current_frame = frame;

        let affected = if on_own_body {
            vec![own_body]
        } else {
            self.hit_opponents(&mut *ctx.physics, frame, facing, position)
        };

        if let Some(effect) = &self.template.effect {
            let input = EffectInput {
                slot: self.template.slot,
                frame,
                facing,
                affected: &affected,
                own_body,
            };
            effect(&mut *ctx.physics, &input);
        }

        self.template
            .is_finished(self.elapsed(ctx.now), frame, on_own_body)
    }

    fn hit_opponents(
        &mut self,
        world: &mut PhysicsWorld,
        frame: usize,
        facing: Facing,
        position: Vec2,
    ) -> Vec<RigidBodyHandle> {
        let Some(hitbox) = self.hitboxes.get_mut(frame) else {
            return Vec::new();
        };
        let Some(collider) = hitbox.collider else {
            return Vec::new();
        };

        if hitbox.facing != facing {
            if let (Some(shapes), Some(collider)) = (
                self.template.shapes[frame].as_ref(),
                world.get_collider_mut(collider),
            ) {
                collider.set_shape(shapes.facing(facing).clone());
            }
            hitbox.facing = facing;
        }

        resolver::resolve_contacts(world, hitbox.body, position, self.mask)
    }

    /// Draw the frame chosen by the last update
    pub fn draw(&self, canvas: &mut dyn SpriteCanvas, position: Vec2, facing: Facing) {
        self.template
            .clip
            .draw(canvas, self.current_frame, position, facing);
    }

    /// A copy sharing the template but owning no bodies
    ///
    /// The copy gets its own sound-set state and builds its own bodies when it
    /// enters a world.
    pub fn clone_unbound(&self) -> Self {
        Self {
            template: Arc::clone(&self.template),
            hitboxes: Vec::new(),
            mask: CategorySet::empty(),
            sound_set: self.sound_set.fork(),
            clock: AnimationClock::default(),
            started_at: None,
            current_frame: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{SpriteSheet, TextureHandle};
    use crate::engine::audio::{AudioError, SilentOutput};
    use crate::engine::physics::collision::hurtbox_groups;
    use image::{Rgba, RgbaImage};
    use std::collections::HashSet;
    use std::sync::Mutex;

    const CELL: u32 = 32;
    const SCALE: f32 = 1.0 / 32.0;

    /// Sheet of `frames` cells; cells listed in `blank` stay transparent.
    /// Solid cells hold a column on the left and an arm reaching right.
    fn sheet(frames: u32, blank: &[u32]) -> SpriteSheet {
        let pixels = RgbaImage::from_fn(CELL * frames, CELL, |x, y| {
            let frame = x / CELL;
            let (cx, cy) = (x % CELL, y);
            let column = cx < 4;
            let arm = (12..20).contains(&cy);
            if !blank.contains(&frame) && (column || arm) {
                Rgba([90, 160, 220, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        SpriteSheet::new(TextureHandle::named("test_move.png"), pixels, CELL, CELL, None).unwrap()
    }

    type Log = Arc<Mutex<Vec<(usize, Vec<RigidBodyHandle>)>>>;

    fn recording_template(slot: MoveSlot, frames: u32, blank: &[u32]) -> (Arc<MoveTemplate>, Log) {
        let log: Log = Arc::default();
        let sink = Arc::clone(&log);
        let clip = AnimationClip::one_shot(sheet(frames, blank), 10.0, 32.0);
        let template = MoveTemplate::new("tester", slot, clip, SCALE).with_effect(
            move |_world: &mut PhysicsWorld, input: &EffectInput| {
                sink.lock()
                    .unwrap()
                    .push((input.frame, input.affected.to_vec()));
            },
        );
        (Arc::new(template), log)
    }

    fn add_victim(
        world: &mut PhysicsWorld,
        category: CollisionCategory,
        at: Vec2,
    ) -> RigidBodyHandle {
        let body = world.add_rigid_body(presets::character_body(at.x, at.y));
        let collider = ColliderBuilder2D::box_shape(0.05, 0.05)
            .collision_groups(hurtbox_groups(category))
            .build();
        world.add_collider(collider, body);
        body
    }

    fn opponents() -> Vec<CollisionCategory> {
        vec![CollisionCategory::Player2]
    }

    #[test]
    fn test_one_body_per_frame() {
        let (template, _) = recording_template(MoveSlot::Basic, 4, &[2]);
        let mut world = PhysicsWorld::new();
        let mut asset = MoveAsset::new(Arc::clone(&template));
        asset.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());

        assert_eq!(asset.body_count(), template.geometry().len());
        assert_eq!(asset.body_count(), template.clip().frame_count());
        assert!(asset.bodies().all(|body| !world.is_body_enabled(body)));
    }

    #[test]
    fn test_construct_twice_replaces_bodies() {
        let (template, _) = recording_template(MoveSlot::Basic, 3, &[]);
        let mut world = PhysicsWorld::new();
        let mut asset = MoveAsset::new(template);
        asset.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());
        asset.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());

        assert_eq!(world.body_count(), 3);
        asset.destroy_bodies(&mut world);
        assert_eq!(world.body_count(), 0);
        assert!(!asset.has_bodies());
    }

    #[test]
    fn test_hit_reaches_opponent_in_front() {
        let (template, log) = recording_template(MoveSlot::Basic, 4, &[]);
        let mut world = PhysicsWorld::new();
        let own = add_victim(&mut world, CollisionCategory::Player1, Vec2::ZERO);
        let victim = add_victim(&mut world, CollisionCategory::Player2, Vec2::new(0.5, 0.0));
        let mut asset = MoveAsset::new(template);
        asset.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());

        let now = Instant::now();
        let mut audio = SilentOutput;
        asset.start_move(now, &mut audio);
        let mut ctx = TickContext {
            physics: &mut world,
            audio: &mut audio,
            now,
        };
        asset.update_move(&mut ctx, Facing::Right, Vec2::ZERO, own, false);

        let calls = log.lock().unwrap();
        assert_eq!(calls[0], (0, vec![victim]));
        assert!(asset.bodies().all(|body| !world.is_body_enabled(body)));
    }

    #[test]
    fn test_facing_left_mirrors_hitbox() {
        let (template, log) = recording_template(MoveSlot::Basic, 4, &[]);
        let mut world = PhysicsWorld::new();
        let own = add_victim(&mut world, CollisionCategory::Player1, Vec2::new(0.0, 5.0));
        let behind = add_victim(&mut world, CollisionCategory::Player2, Vec2::new(-0.5, 0.0));
        let mut asset = MoveAsset::new(template);
        asset.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());

        let now = Instant::now();
        let mut audio = SilentOutput;
        asset.start_move(now, &mut audio);
        let mut ctx = TickContext {
            physics: &mut world,
            audio: &mut audio,
            now,
        };
        asset.update_move(&mut ctx, Facing::Right, Vec2::ZERO, own, false);
        asset.update_move(&mut ctx, Facing::Left, Vec2::ZERO, own, false);

        let calls = log.lock().unwrap();
        assert!(calls[0].1.is_empty());
        assert_eq!(calls[1].1, vec![behind]);
    }

    #[test]
    fn test_blank_frame_whiffs() {
        let (template, log) = recording_template(MoveSlot::Basic, 4, &[0]);
        assert!(template.geometry().frame(0).is_empty());

        let mut world = PhysicsWorld::new();
        let own = add_victim(&mut world, CollisionCategory::Player1, Vec2::new(0.0, 5.0));
        add_victim(&mut world, CollisionCategory::Player2, Vec2::ZERO);
        let mut asset = MoveAsset::new(template);
        asset.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());

        let now = Instant::now();
        let mut audio = SilentOutput;
        asset.start_move(now, &mut audio);
        let mut ctx = TickContext {
            physics: &mut world,
            audio: &mut audio,
            now,
        };
        let finished = asset.update_move(&mut ctx, Facing::Right, Vec2::ZERO, own, false);

        assert!(!finished);
        assert_eq!(log.lock().unwrap()[0], (0, Vec::new()));
    }

    #[test]
    fn test_own_body_mode_affects_only_self() {
        let (template, log) = recording_template(MoveSlot::Walk, 4, &[]);
        let mut world = PhysicsWorld::new();
        let own = add_victim(&mut world, CollisionCategory::Player1, Vec2::ZERO);
        add_victim(&mut world, CollisionCategory::Player2, Vec2::new(0.5, 0.0));
        let mut asset = MoveAsset::new(template);
        asset.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());

        let now = Instant::now();
        let mut audio = SilentOutput;
        let mut ctx = TickContext {
            physics: &mut world,
            audio: &mut audio,
            now,
        };
        assert!(asset.update_move(&mut ctx, Facing::Right, Vec2::ZERO, own, true));
        assert_eq!(log.lock().unwrap()[0].1, vec![own]);
    }

    #[test]
    fn test_play_duration_timeout() {
        // Ten frames at 10 fps never reach the last frame within 500 ms
        let (template, _) = recording_template(MoveSlot::Basic, 10, &[]);
        let template = Arc::new(
            MoveTemplate::new("tester", MoveSlot::Basic, template.clip().clone(), SCALE)
                .with_play_duration(Duration::from_millis(500)),
        );
        let mut asset = MoveAsset::new(template);

        let t0 = Instant::now();
        asset.start_move(t0, &mut SilentOutput);

        assert!(!asset.is_finished(t0 + Duration::from_millis(400), false));
        assert!(asset.is_finished(t0 + Duration::from_millis(500), false));
    }

    #[test]
    fn test_finished_flag_is_pure() {
        let (template, _) = recording_template(MoveSlot::Basic, 6, &[]);
        let cases = [
            (Duration::from_millis(100), 1, false),
            (Duration::from_millis(100), 5, false),
            (Duration::from_millis(700), 2, false),
            (Duration::ZERO, 0, true),
        ];
        for (elapsed, frame, own) in cases {
            let first = template.is_finished(elapsed, frame, own);
            assert_eq!(first, template.is_finished(elapsed, frame, own));
        }
        assert!(!template.is_finished(Duration::from_millis(100), 1, false));
        assert!(template.is_finished(Duration::from_millis(100), 5, false));
        assert!(template.is_finished(Duration::ZERO, 0, true));
    }

    #[test]
    fn test_update_reports_finish_on_last_frame() {
        let (template, _) = recording_template(MoveSlot::Basic, 3, &[]);
        let mut world = PhysicsWorld::new();
        let own = add_victim(&mut world, CollisionCategory::Player1, Vec2::new(0.0, 5.0));
        let mut asset = MoveAsset::new(template);
        asset.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());

        let t0 = Instant::now();
        let mut audio = SilentOutput;
        asset.start_move(t0, &mut audio);
        let mut ctx = TickContext {
            physics: &mut world,
            audio: &mut audio,
            now: t0 + Duration::from_millis(150),
        };
        assert!(!asset.update_move(&mut ctx, Facing::Right, Vec2::ZERO, own, false));

        ctx.now = t0 + Duration::from_millis(210);
        assert!(asset.update_move(&mut ctx, Facing::Right, Vec2::ZERO, own, false));
        assert_eq!(asset.current_frame(), 2);
    }

    #[test]
    fn test_clones_never_share_bodies() {
        let (template, _) = recording_template(MoveSlot::Basic, 4, &[]);
        let mut world = PhysicsWorld::new();
        let mut original = MoveAsset::new(template);
        original.construct_bodies(&mut world, CollisionCategory::Player1, &opponents());

        let mut clone = original.clone_unbound();
        assert!(!clone.has_bodies());
        assert!(Arc::ptr_eq(clone.template(), original.template()));

        clone.construct_bodies(
            &mut world,
            CollisionCategory::Player2,
            &[CollisionCategory::Player1],
        );
        let originals: HashSet<_> = original.bodies().collect();
        assert_eq!(clone.body_count(), original.body_count());
        assert!(clone.bodies().all(|body| !originals.contains(&body)));
    }

    #[derive(Default)]
    struct CountingOutput {
        played: usize,
    }

    impl AudioOutput for CountingOutput {
        fn play(&mut self, _clip: SoundHandle) -> Result<(), AudioError> {
            self.played += 1;
            Ok(())
        }
    }

    #[test]
    fn test_start_plays_sound_and_resume_does_not() {
        let clip = AnimationClip::looping(sheet(2, &[]), 10.0, 32.0);
        let sounds = vec![
            SoundHandle::named("jump_1.wav"),
            SoundHandle::named("jump_2.wav"),
        ];
        let template = MoveTemplate::new("tester", MoveSlot::Jump, clip, SCALE).with_sounds(sounds);
        let mut asset = MoveAsset::new(Arc::new(template));
        let mut output = CountingOutput::default();

        let now = Instant::now();
        asset.start_move(now, &mut output);
        asset.resume_move(now + Duration::from_millis(16));
        assert_eq!(output.played, 1);
    }

    #[test]
    fn test_missing_sounds_are_silent() {
        let (template, _) = recording_template(MoveSlot::Basic, 2, &[]);
        let mut asset = MoveAsset::new(template);
        let mut output = CountingOutput::default();
        asset.start_move(Instant::now(), &mut output);
        assert_eq!(output.played, 0);
    }
}
