// Engine modules: physics, input, assets, audio and draw seams

pub mod assets;
pub mod audio;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod renderer;
