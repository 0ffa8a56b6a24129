// Sprite-sheet animation clips and wall-clock playback

use super::Facing;
use crate::engine::assets::SpriteSheet;
use crate::engine::renderer::{SpriteCanvas, SpriteDraw};
use glam::Vec2;
use std::time::{Duration, Instant};

/// A single animation clip backed by a sprite sheet
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Sheet the frames are cut from
    sheet: SpriteSheet,
    /// How long each frame stays on screen
    frame_duration: Duration,
    /// Whether playback wraps back to the first frame
    looping: bool,
    /// Drawn size in world units
    size: Vec2,
}

impl AnimationClip {
    /// Create a new clip playing at `fps`, drawn at `pixels_per_unit`
    pub fn new(sheet: SpriteSheet, fps: f32, looping: bool, pixels_per_unit: f32) -> Self {
        let (width, height) = sheet.frame_size();
        Self {
            sheet,
            frame_duration: Duration::from_secs_f64(1.0 / f64::from(fps.max(1.0))),
            looping,
            size: Vec2::new(width as f32, height as f32) / pixels_per_unit,
        }
    }

    /// Create a looping clip
    pub fn looping(sheet: SpriteSheet, fps: f32, pixels_per_unit: f32) -> Self {
        Self::new(sheet, fps, true, pixels_per_unit)
    }

    /// Create a one-shot clip (holds its last frame)
    pub fn one_shot(sheet: SpriteSheet, fps: f32, pixels_per_unit: f32) -> Self {
        Self::new(sheet, fps, false, pixels_per_unit)
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn frame_count(&self) -> usize {
        self.sheet.frame_count()
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Drawn size in world units
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Get the total duration of one animation cycle
    pub fn total_duration(&self) -> Duration {
        self.frame_duration * self.frame_count() as u32
    }

    /// Frame shown after `elapsed` of playback
    pub fn frame_at(&self, elapsed: Duration) -> usize {
        let count = self.frame_count();
        let step = self.frame_duration.as_nanos().max(1);
        let advanced = (elapsed.as_nanos() / step) as usize;

        if self.looping {
            advanced % count
        } else {
            advanced.min(count - 1)
        }
    }

    /// Check if `frame` is the clip's final frame
    pub fn is_last_frame(&self, frame: usize) -> bool {
        frame + 1 >= self.frame_count()
    }

    /// Submit one frame to a canvas, mirrored when facing left
    pub fn draw(
        &self,
        canvas: &mut dyn SpriteCanvas,
        frame: usize,
        position: Vec2,
        facing: Facing,
    ) {
        canvas.draw_sprite(SpriteDraw {
            texture: self.sheet.texture(),
            region: self.sheet.region(frame),
            position,
            size: self.size,
            flip_horizontal: facing == Facing::Left,
        });
    }
}

/// Playback position of a clip, measured from a monotonic start instant
///
/// Frames advance with wall-clock time, independent of how many physics
/// ticks ran in between.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationClock {
    started_at: Option<Instant>,
}

impl AnimationClock {
    /// Rewind to the first frame at `now`
    pub fn restart(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Time since the last restart; zero if never started
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start))
    }

    /// Frame of `clip` showing at `now`
    pub fn frame(&self, clip: &AnimationClip, now: Instant) -> usize {
        clip.frame_at(self.elapsed(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::TextureHandle;
    use crate::engine::renderer::RecordingCanvas;
    use image::RgbaImage;

    fn clip(frames: u32, looping: bool) -> AnimationClip {
        let sheet = SpriteSheet::new(
            TextureHandle::named("clip.png"),
            RgbaImage::new(16 * frames, 16),
            16,
            16,
            None,
        )
        .unwrap();
        AnimationClip::new(sheet, 10.0, looping, 16.0)
    }

    #[test]
    fn test_frame_advances_with_time() {
        let clip = clip(4, false);
        assert_eq!(clip.frame_at(Duration::ZERO), 0);
        assert_eq!(clip.frame_at(Duration::from_millis(99)), 0);
        assert_eq!(clip.frame_at(Duration::from_millis(100)), 1);
        assert_eq!(clip.frame_at(Duration::from_millis(250)), 2);
    }

    #[test]
    fn test_one_shot_holds_last_frame() {
        let clip = clip(4, false);
        assert_eq!(clip.frame_at(Duration::from_secs(10)), 3);
        assert!(clip.is_last_frame(3));
        assert!(!clip.is_last_frame(2));
    }

    #[test]
    fn test_looping_wraps() {
        let clip = clip(4, true);
        assert_eq!(clip.frame_at(Duration::from_millis(400)), 0);
        assert_eq!(clip.frame_at(Duration::from_millis(530)), 1);
    }

    #[test]
    fn test_clock_across_second_boundary() {
        // A start late in one second must keep advancing into the next
        let clip = clip(8, false);
        let mut clock = AnimationClock::default();
        let start = Instant::now();
        clock.restart(start);

        assert_eq!(clock.frame(&clip, start + Duration::from_millis(950)), 7);
        assert_eq!(clock.elapsed(start + Duration::from_millis(1150)), Duration::from_millis(1150));
    }

    #[test]
    fn test_unstarted_clock_shows_first_frame() {
        let clip = clip(4, true);
        let clock = AnimationClock::default();
        assert_eq!(clock.frame(&clip, Instant::now()), 0);
    }

    #[test]
    fn test_draw_mirrors_left() {
        let clip = clip(2, true);
        let mut canvas = RecordingCanvas::default();
        clip.draw(&mut canvas, 1, Vec2::new(3.0, 1.0), Facing::Left);

        let sprite = &canvas.sprites[0];
        assert!(sprite.flip_horizontal);
        assert_eq!(sprite.region.x, 16);
        assert_eq!(sprite.size, Vec2::ONE);
        assert_eq!(sprite.position, Vec2::new(3.0, 1.0));
    }
}
