/// Fixed timestep tick scheduling
///
/// Characters and the physics world advance in whole ticks of
/// `FIXED_TIMESTEP`; the scheduler turns wall-clock frame times into a
/// number of ticks to run.
use std::time::{Duration, Instant};

/// Target simulation rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Tick scheduling state
pub struct GameLoop {
    /// Simulation time of tick zero
    epoch: Instant,

    /// Time not yet consumed by a tick
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Total ticks scheduled
    tick_count: u64,
}

impl GameLoop {
    pub fn new(now: Instant) -> Self {
        Self {
            epoch: now,
            accumulator: Duration::ZERO,
            last_frame_time: now,
            paused: false,
            tick_count: 0,
        }
    }

    /// Begin a new frame at `now`, returns the number of ticks to run
    pub fn begin_frame(&mut self, now: Instant) -> u32 {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Drop whatever could not be caught up instead of bursting next frame
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks as u64;
        ticks
    }

    /// Total number of ticks scheduled so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulation time at the end of tick number `tick`
    ///
    /// Advances by exactly one timestep per tick and stands still while
    /// paused, so move clocks driven by it never run ahead of the simulation.
    pub fn tick_instant(&self, tick: u64) -> Instant {
        self.epoch + FIXED_TIMESTEP_DURATION * u32::try_from(tick).unwrap_or(u32::MAX)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            log::info!("Game paused");
        } else {
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Game resumed");
        }
    }
}
