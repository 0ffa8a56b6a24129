// Move and combat engine for a 2D physics-driven arena brawler
//
// - `core`: small math helpers
// - `engine`: physics world, input, assets, audio and draw seams
// - `game`: moves, characters and the arena

pub mod core;
pub mod engine;
pub mod game;
