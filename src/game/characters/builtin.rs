// Built-in characters
//
// Both characters are drawn procedurally so a match can run without any
// asset files. Their attacks differ only through the effect table below;
// there is no per-character code anywhere else.

use super::roster::CharacterTemplate;
use super::stats::{CharacterStats, PIXELS_PER_UNIT};
use crate::engine::assets::{AssetError, SoundHandle, SpriteSheet, TextureHandle};
use crate::engine::physics::PhysicsWorld;
use crate::game::moves::{AnimationClip, EffectInput, MoveSlot, MoveTemplate};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::ops::RangeInclusive;

/// Cell size of the built-in sheets, in pixels
const CELL: u32 = 32;

/// All built-in character templates
pub fn templates() -> Result<Vec<CharacterTemplate>, AssetError> {
    Ok(vec![blob()?, spike()?])
}

/// Draw `frames` cells side by side; `solid(frame, x, y)` decides each pixel
fn paint<F>(name: &str, frames: u32, color: [u8; 3], solid: F) -> Result<SpriteSheet, AssetError>
where
    F: Fn(u32, u32, u32) -> bool,
{
    let pixels = RgbaImage::from_fn(CELL * frames, CELL, |x, y| {
        if solid(x / CELL, x % CELL, y) {
            Rgba([color[0], color[1], color[2], 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    SpriteSheet::new(
        TextureHandle::named(&format!("{}.png", name)),
        pixels,
        CELL,
        CELL,
        None,
    )
}

fn ellipse(x: u32, y: u32, center: (f32, f32), radius: (f32, f32)) -> bool {
    let dx = (x as f32 + 0.5 - center.0) / radius.0;
    let dy = (y as f32 + 0.5 - center.1) / radius.1;
    dx * dx + dy * dy <= 1.0
}

fn rect(x: u32, y: u32, xs: RangeInclusive<i32>, ys: RangeInclusive<i32>) -> bool {
    xs.contains(&(x as i32)) && ys.contains(&(y as i32))
}

/// Pick the value for `frame`, holding the last entry past the end
fn at(table: &[i32], frame: u32) -> i32 {
    table
        .get(frame as usize)
        .or(table.last())
        .copied()
        .unwrap_or(0)
}

struct MoveArt<F> {
    slot: MoveSlot,
    frames: u32,
    fps: f32,
    solid: F,
}

fn build_move<F>(
    character: &str,
    color: [u8; 3],
    art: MoveArt<F>,
) -> Result<MoveTemplate, AssetError>
where
    F: Fn(u32, u32, u32) -> bool,
{
    let name = format!("{}_{}", character.to_lowercase(), art.slot.name());
    let sheet = paint(&name, art.frames, color, art.solid)?;
    let clip = if art.slot.acts_on_own_body() {
        AnimationClip::looping(sheet, art.fps, PIXELS_PER_UNIT)
    } else {
        AnimationClip::one_shot(sheet, art.fps, PIXELS_PER_UNIT)
    };
    Ok(MoveTemplate::new(character, art.slot, clip, 1.0 / PIXELS_PER_UNIT))
}

fn hit_sounds(character: &str) -> Vec<SoundHandle> {
    (1..=3)
        .map(|i| SoundHandle::named(&format!("{}_hit_{}.wav", character.to_lowercase(), i)))
        .collect()
}

// Effects

/// Slow the own body down horizontally
fn brake(world: &mut PhysicsWorld, input: &EffectInput) {
    if let Some(v) = world.linear_velocity(input.own_body) {
        world.set_linear_velocity(input.own_body, Vec2::new(v.x * 0.8, v.y));
    }
}

/// Walk in the facing direction at `speed`
fn walk(speed: f32) -> impl Fn(&mut PhysicsWorld, &EffectInput) + Send + Sync {
    move |world, input| {
        if let Some(v) = world.linear_velocity(input.own_body) {
            world.set_linear_velocity(input.own_body, Vec2::new(input.facing.sign() * speed, v.y));
        }
    }
}

/// Leave the ground at `speed` when not already moving vertically
fn jump(speed: f32) -> impl Fn(&mut PhysicsWorld, &EffectInput) + Send + Sync {
    move |world, input| {
        if let Some(v) = world.linear_velocity(input.own_body) {
            if v.y.abs() < 0.05 {
                world.set_linear_velocity(input.own_body, Vec2::new(v.x, speed));
            }
        }
    }
}

/// Knock every touched body along `impulse` (x follows facing) on `active` frames
fn strike(
    active: RangeInclusive<usize>,
    impulse: Vec2,
) -> impl Fn(&mut PhysicsWorld, &EffectInput) + Send + Sync {
    move |world, input| {
        if !active.contains(&input.frame) {
            return;
        }
        let impulse = Vec2::new(impulse.x * input.facing.sign(), impulse.y);
        for &body in input.affected {
            world.apply_impulse(body, impulse);
        }
    }
}

/// Drive the own body at `velocity` (x follows facing) while also striking
fn lunge(
    active: RangeInclusive<usize>,
    velocity: Vec2,
    impulse: Vec2,
) -> impl Fn(&mut PhysicsWorld, &EffectInput) + Send + Sync {
    let hit = strike(active.clone(), impulse);
    move |world, input| {
        if active.contains(&input.frame) {
            let velocity = Vec2::new(velocity.x * input.facing.sign(), velocity.y);
            world.set_linear_velocity(input.own_body, velocity);
        }
        hit(world, input);
    }
}

/// Push touched bodies away from the own body
fn burst(
    active: RangeInclusive<usize>,
    strength: f32,
) -> impl Fn(&mut PhysicsWorld, &EffectInput) + Send + Sync {
    move |world, input| {
        if !active.contains(&input.frame) {
            return;
        }
        let Some(center) = world.body_position(input.own_body) else {
            return;
        };
        for &body in input.affected {
            if let Some(position) = world.body_position(body) {
                let away = (position - center).normalize_or_zero();
                world.apply_impulse(body, (away + Vec2::Y * 0.5) * strength);
            }
        }
    }
}

// Characters

/// Round, light and quick
fn blob() -> Result<CharacterTemplate, AssetError> {
    const NAME: &str = "Blob";
    const COLOR: [u8; 3] = [70, 190, 170];
    let stats = CharacterStats::default();

    let idle = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Idle,
        frames: 4,
        fps: 6.0,
        solid: |f: u32, x: u32, y: u32| ellipse(x, y, (16.0, 20.0), (11.0, 10.0 - (f % 2) as f32)),
    })?
    .with_effect(brake);

    let walk_art = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Walk,
        frames: 4,
        fps: 10.0,
        solid: |f: u32, x: u32, y: u32| {
            let sway = at(&[0, 1, 0, -1], f) as f32;
            ellipse(x, y, (16.0 + sway, 20.0), (11.0, 10.0))
        },
    })?
    .with_effect(walk(stats.walk_speed));

    let jump_art = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Jump,
        frames: 2,
        fps: 8.0,
        solid: |f: u32, x: u32, y: u32| ellipse(x, y, (16.0, 18.0 - f as f32), (9.0, 12.0)),
    })?
    .with_effect(jump(stats.jump_speed));

    let basic = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Basic,
        frames: 5,
        fps: 15.0,
        solid: |f: u32, x: u32, y: u32| {
            let reach = at(&[0, 4, 7, 7, 3], f);
            ellipse(x, y, (16.0, 20.0), (10.0, 10.0)) || rect(x, y, 24..=23 + reach, 17..=22)
        },
    })?
    .with_sounds(hit_sounds(NAME))
    .with_effect(strike(2..=3, Vec2::new(0.6, 0.3)));

    let special = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Special,
        frames: 6,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            let grow = at(&[0, 2, 4, 5, 3, 1], f) as f32;
            ellipse(x, y, (16.0, 16.0), (10.0 + grow, 10.0 + grow))
        },
    })?
    .with_effect(burst(2..=4, 0.8));

    let side_special = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::SideSpecial,
        frames: 6,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            let stretch = at(&[0, 3, 5, 5, 3, 0], f) as f32;
            ellipse(x, y, (16.0, 20.0), (10.0 + stretch, 10.0 - stretch / 2.0))
        },
    })?
    .with_effect(lunge(1..=3, Vec2::new(7.0, 0.0), Vec2::new(0.7, 0.2)));

    let up_special = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::UpSpecial,
        frames: 5,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            let stretch = at(&[0, 3, 5, 4, 1], f) as f32;
            ellipse(x, y, (16.0, 16.0), (10.0 - stretch / 2.0, 10.0 + stretch))
        },
    })?
    .with_effect(lunge(1..=2, Vec2::new(0.0, 8.0), Vec2::new(0.0, 0.9)));

    let down_special = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::DownSpecial,
        frames: 5,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            let squash = at(&[0, 2, 4, 4, 2], f) as f32;
            ellipse(x, y, (16.0, 22.0), (10.0 + squash, 9.0 - squash))
        },
    })?
    .with_effect(lunge(1..=3, Vec2::new(0.0, -9.0), Vec2::new(0.5, -0.4)));

    Ok(CharacterTemplate::new(NAME, stats)
        .with_move(idle)
        .with_move(walk_art)
        .with_move(jump_art)
        .with_move(basic)
        .with_move(special)
        .with_move(side_special)
        .with_move(up_special)
        .with_move(down_special))
}

/// Tall, heavy and long-reaching
fn spike() -> Result<CharacterTemplate, AssetError> {
    const NAME: &str = "Spike";
    const COLOR: [u8; 3] = [220, 120, 50];
    let stats = CharacterStats::heavy();

    // Column body with a pointed head, shifted by (dx, dy)
    fn body(x: u32, y: u32, dx: i32, dy: i32) -> bool {
        let column = rect(x, y, 11 + dx..=20 + dx, 8 + dy..=29);
        let tip = y as i32 >= 2 + dy && (y as i32) < 8 + dy && {
            let half = (y as f32 + 0.5 - (2 + dy) as f32) * 5.0 / 6.0;
            (x as f32 + 0.5 - (16 + dx) as f32).abs() <= half
        };
        column || tip
    }

    let idle = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Idle,
        frames: 4,
        fps: 5.0,
        solid: |f: u32, x: u32, y: u32| body(x, y, 0, (f % 2) as i32),
    })?
    .with_effect(brake);

    let walk_art = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Walk,
        frames: 4,
        fps: 8.0,
        solid: |f: u32, x: u32, y: u32| body(x, y, at(&[-1, 0, 1, 0], f), 0),
    })?
    .with_effect(walk(stats.walk_speed));

    let jump_art = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Jump,
        frames: 2,
        fps: 8.0,
        solid: |f: u32, x: u32, y: u32| body(x, y, 0, -(f as i32)),
    })?
    .with_effect(jump(stats.jump_speed));

    let basic = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Basic,
        frames: 5,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            let reach = at(&[0, 5, 10, 10, 4], f);
            body(x, y, 0, 0) || rect(x, y, 21..=20 + reach, 14..=17)
        },
    })?
    .with_sounds(hit_sounds(NAME))
    .with_effect(strike(2..=3, Vec2::new(0.9, 0.2)));

    let special = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::Special,
        frames: 6,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            let reach = at(&[0, 3, 6, 8, 5, 2], f);
            body(x, y, 0, 0)
                || rect(x, y, 21..=20 + reach, 12..=15)
                || rect(x, y, 11 - reach..=10, 12..=15)
        },
    })?
    .with_effect(burst(2..=4, 1.0));

    let side_special = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::SideSpecial,
        frames: 6,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            let dx = at(&[0, 2, 4, 4, 2, 0], f);
            let reach = at(&[0, 6, 10, 6, 2, 0], f);
            body(x, y, dx, 0) || rect(x, y, 21 + dx..=20 + dx + reach, 15..=18)
        },
    })?
    .with_effect(lunge(1..=3, Vec2::new(6.0, 0.0), Vec2::new(1.0, 0.1)));

    let up_special = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::UpSpecial,
        frames: 5,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            body(x, y, 0, 0) || ((1..=3).contains(&f) && rect(x, y, 14..=17, 0..=8))
        },
    })?
    .with_effect(lunge(1..=2, Vec2::new(0.0, 7.0), Vec2::new(0.0, 1.1)));

    let down_special = build_move(NAME, COLOR, MoveArt {
        slot: MoveSlot::DownSpecial,
        frames: 5,
        fps: 12.0,
        solid: |f: u32, x: u32, y: u32| {
            body(x, y, 0, 0) || ((1..=3).contains(&f) && rect(x, y, 2..=29, 28..=31))
        },
    })?
    .with_effect(strike(1..=3, Vec2::new(0.4, 0.9)));

    Ok(CharacterTemplate::new(NAME, stats)
        .with_move(idle)
        .with_move(walk_art)
        .with_move(jump_art)
        .with_move(basic)
        .with_move(special)
        .with_move(side_special)
        .with_move(up_special)
        .with_move(down_special))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_frame_has_geometry() {
        for template in templates().unwrap() {
            let rig = template.build().unwrap();
            for asset in rig.moves().iter() {
                let geometry = asset.template().geometry();
                assert_eq!(geometry.len(), asset.template().clip().frame_count());
                for frame in 0..geometry.len() {
                    assert!(
                        !geometry.frame(frame).is_empty(),
                        "{} {:?} frame {} is empty",
                        rig.name(),
                        asset.slot(),
                        frame
                    );
                }
            }
        }
    }

    #[test]
    fn test_attack_reach_grows() {
        let basic = build_move("Probe", [0, 0, 0], MoveArt {
            slot: MoveSlot::Basic,
            frames: 5,
            fps: 15.0,
            solid: |f: u32, x: u32, y: u32| {
                let reach = at(&[0, 4, 7, 7, 3], f);
                ellipse(x, y, (16.0, 20.0), (10.0, 10.0)) || rect(x, y, 24..=23 + reach, 17..=22)
            },
        })
        .unwrap();

        let sheet = basic.clip().sheet();
        let opaque = |frame: usize| sheet.cell(frame).pixels().filter(|p| p[3] > 0).count();
        assert!(opaque(2) > opaque(0));
    }

    #[test]
    fn test_table_lookup_holds_last() {
        assert_eq!(at(&[1, 2, 3], 1), 2);
        assert_eq!(at(&[1, 2, 3], 9), 3);
        assert_eq!(at(&[], 0), 0);
    }
}
