// Audio playback seam and per-move sound sets

use crate::engine::assets::SoundHandle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Errors an audio device may report for a single clip
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Sound clip {0:?} is not loaded")]
    NotLoaded(SoundHandle),

    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// The audio device, implemented outside the engine
pub trait AudioOutput {
    fn play(&mut self, clip: SoundHandle) -> Result<(), AudioError>;
}

/// Output that drops every clip
#[derive(Debug, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play(&mut self, _clip: SoundHandle) -> Result<(), AudioError> {
        Ok(())
    }
}

/// The clips a move may play when it starts
///
/// With several clips one is picked at random each time, so repeated
/// attacks don't all sound the same.
#[derive(Debug)]
pub struct SoundSet {
    clips: Vec<SoundHandle>,
    rng: StdRng,
}

impl SoundSet {
    pub fn new(clips: Vec<SoundHandle>) -> Self {
        Self {
            clips,
            rng: StdRng::from_entropy(),
        }
    }

    /// Sound set with a fixed seed, for reproducible clip selection
    pub fn with_seed(clips: Vec<SoundHandle>, seed: u64) -> Self {
        Self {
            clips,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn clips(&self) -> &[SoundHandle] {
        &self.clips
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Pick the clip to play next, if any
    pub fn pick(&mut self) -> Option<SoundHandle> {
        match self.clips.len() {
            0 => None,
            1 => Some(self.clips[0]),
            n => Some(self.clips[self.rng.gen_range(0..n)]),
        }
    }

    /// Play one clip; device errors are logged and skipped
    pub fn play(&mut self, output: &mut dyn AudioOutput) {
        let Some(clip) = self.pick() else {
            return;
        };

        if let Err(e) = output.play(clip) {
            log::warn!("Skipping sound playback: {}", e);
        }
    }

    /// A copy with the same clips and its own random state
    pub fn fork(&self) -> Self {
        Self::new(self.clips.clone())
    }
}
