// Arena: the physics world, the stage and up to four players

use crate::engine::audio::AudioOutput;
use crate::engine::input::{InputSnapshot, MAX_PLAYERS};
use crate::engine::physics::body::presets;
use crate::engine::physics::collision::stage_groups;
use crate::engine::physics::{CollisionCategory, PhysicsWorld, RigidBodyHandle, Vector};
use crate::engine::renderer::SpriteCanvas;
use crate::game::characters::{CharacterRig, Roster, SaveRecord};
use crate::game::moves::TickContext;
use crate::game::ConfigurationError;
use glam::Vec2;
use std::time::Instant;

/// A static rectangle of stage geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub center: Vec2,
    pub size: Vec2,
}

/// Axis-aligned region a character must stay inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastZone {
    pub min: Vec2,
    pub max: Vec2,
}

impl BlastZone {
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Stage layout and world settings
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub gravity: Vec2,
    /// Where each player slot enters and respawns
    pub spawn_points: [Vec2; MAX_PLAYERS],
    pub blast_zone: BlastZone,
    pub platforms: Vec<Platform>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            spawn_points: [
                Vec2::new(-4.0, 2.0),
                Vec2::new(4.0, 2.0),
                Vec2::new(-1.5, 4.0),
                Vec2::new(1.5, 4.0),
            ],
            blast_zone: BlastZone {
                min: Vec2::new(-16.0, -10.0),
                max: Vec2::new(16.0, 14.0),
            },
            platforms: vec![
                Platform {
                    center: Vec2::new(0.0, -1.0),
                    size: Vec2::new(14.0, 1.0),
                },
                Platform {
                    center: Vec2::new(-4.0, 2.5),
                    size: Vec2::new(3.0, 0.3),
                },
                Platform {
                    center: Vec2::new(4.0, 2.5),
                    size: Vec2::new(3.0, 0.3),
                },
            ],
        }
    }
}

/// Runs a match
///
/// Player slots are either unassigned (`None`) or hold a rig cloned from the
/// roster. During a match every assigned rig has its bodies in the world.
pub struct Arena {
    physics: PhysicsWorld,
    roster: Roster,
    config: ArenaConfig,
    slots: [Option<CharacterRig>; MAX_PLAYERS],
    /// Restored positions waiting for the next `begin_match`
    pending_spawns: [Option<Vec2>; MAX_PLAYERS],
    platforms: Vec<RigidBodyHandle>,
    in_match: bool,
}

impl Arena {
    /// Create an arena and build its stage
    pub fn new(roster: Roster, config: ArenaConfig) -> Self {
        let gravity = Vector::new(config.gravity.x, config.gravity.y);
        let mut arena = Self {
            physics: PhysicsWorld::with_gravity(gravity),
            roster,
            config: config.clone(),
            slots: Default::default(),
            pending_spawns: [None; MAX_PLAYERS],
            platforms: Vec::new(),
            in_match: false,
        };

        for platform in &config.platforms {
            arena.add_platform(platform.center, platform.size);
        }

        arena
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn is_in_match(&self) -> bool {
        self.in_match
    }

    pub fn platforms(&self) -> &[RigidBodyHandle] {
        &self.platforms
    }

    /// Rig in a player slot, if assigned
    pub fn player(&self, index: usize) -> Option<&CharacterRig> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of assigned slots
    pub fn player_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Add a fixed box of stage geometry
    pub fn add_platform(&mut self, center: Vec2, size: Vec2) -> RigidBodyHandle {
        let body = self
            .physics
            .add_rigid_body(presets::platform_body(center.x, center.y));
        let collider = presets::platform_collider(size.x, size.y, stage_groups());
        self.physics.add_collider(collider, body);
        self.platforms.push(body);
        body
    }

    /// Put a fresh copy of the named template into a player slot
    ///
    /// During a match the new rig enters the world at the slot's spawn point.
    pub fn select(&mut self, player: usize, name: &str) -> Result<(), ConfigurationError> {
        let rig = self.roster.instantiate(name)?;
        self.assign(player, rig, None)
    }

    /// Rebuild a saved character into a player slot
    ///
    /// Outside a match the saved position is kept for the next `begin_match`.
    pub fn restore(
        &mut self,
        player: usize,
        record: &SaveRecord,
    ) -> Result<(), ConfigurationError> {
        let rig = self.roster.instantiate_record(record)?;
        self.assign(player, rig, Some(Vec2::new(record.x, record.y)))
    }

    fn assign(
        &mut self,
        player: usize,
        mut rig: CharacterRig,
        position: Option<Vec2>,
    ) -> Result<(), ConfigurationError> {
        let category =
            CollisionCategory::player(player).ok_or(ConfigurationError::PlayerOutOfRange(player))?;

        self.unassign(player);
        if self.in_match {
            let spawn = position.unwrap_or(self.config.spawn_points[player]);
            rig.enter_world(&mut self.physics, category, spawn);
        } else {
            self.pending_spawns[player] = position;
        }

        log::info!("Player {} is '{}'", player + 1, rig.name());
        self.slots[player] = Some(rig);
        Ok(())
    }

    /// Empty a player slot, removing its bodies from the world
    pub fn unassign(&mut self, player: usize) {
        if let Some(mut rig) = self.slots.get_mut(player).and_then(Option::take) {
            rig.leave_world(&mut self.physics);
        }
        if let Some(pending) = self.pending_spawns.get_mut(player) {
            *pending = None;
        }
    }

    /// Unassign every player and leave the match
    pub fn restart(&mut self) {
        for player in 0..MAX_PLAYERS {
            self.unassign(player);
        }
        self.in_match = false;
        log::info!("Arena restarted");
    }

    /// Reset death counts and bring every assigned rig into the world
    ///
    /// A restored rig enters at its saved position, the rest at their spawn
    /// points.
    pub fn begin_match(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(rig) = slot else {
                continue;
            };
            let Some(category) = CollisionCategory::player(index) else {
                continue;
            };

            let spawn = self.pending_spawns[index]
                .take()
                .unwrap_or(self.config.spawn_points[index]);
            rig.reset_deaths();
            rig.enter_world(&mut self.physics, category, spawn);
        }

        self.in_match = true;
        log::info!("Match started with {} players", self.player_count());
    }

    /// Remove every rig's bodies; slots stay assigned
    pub fn end_match(&mut self) {
        for rig in self.slots.iter_mut().flatten() {
            rig.leave_world(&mut self.physics);
        }
        self.in_match = false;
        log::info!("Match ended");
    }

    /// Advance the match by one tick
    ///
    /// Players update in slot order, each finishing its hitbox query before
    /// the next starts. The world then steps once and anyone outside the
    /// blast zone loses a life and respawns.
    pub fn tick(
        &mut self,
        audio: &mut dyn AudioOutput,
        inputs: &[InputSnapshot; MAX_PLAYERS],
        now: Instant,
    ) {
        if !self.in_match {
            return;
        }

        let mut ctx = TickContext {
            physics: &mut self.physics,
            audio,
            now,
        };
        for (rig, input) in self.slots.iter_mut().zip(inputs) {
            if let Some(rig) = rig {
                rig.update_character(&mut ctx, input);
            }
        }

        self.physics.step();
        self.check_blast_zone();
    }

    fn check_blast_zone(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(rig) = slot else {
                continue;
            };
            let Some(position) = rig.position(&self.physics) else {
                continue;
            };

            if !self.config.blast_zone.contains(position) {
                rig.record_death();
                rig.respawn(&mut self.physics, self.config.spawn_points[index]);
                log::info!(
                    "Player {} ('{}') left the arena, deaths: {}",
                    index + 1,
                    rig.name(),
                    rig.deaths()
                );
            }
        }
    }

    /// Draw every player in the world
    pub fn draw(&self, canvas: &mut dyn SpriteCanvas) {
        for rig in self.slots.iter().flatten() {
            rig.draw(&self.physics, canvas);
        }
    }

    /// What the save/load collaborator stores per slot
    pub fn save_records(&self) -> [Option<SaveRecord>; MAX_PLAYERS] {
        std::array::from_fn(|i| {
            self.slots[i]
                .as_ref()
                .and_then(|rig| rig.save_record(&self.physics))
        })
    }
}
