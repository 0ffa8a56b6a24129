use anyhow::Result;
use log::info;
use rusted_brawl::engine::audio::SilentOutput;
use rusted_brawl::engine::game_loop::GameLoop;
use rusted_brawl::engine::input::{Action, InputManager};
use rusted_brawl::engine::renderer::RecordingCanvas;
use rusted_brawl::game::arena::{Arena, ArenaConfig};
use rusted_brawl::game::characters::Roster;
use std::time::Instant;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Brawl...");

    let roster = Roster::with_builtins()?;
    info!("Characters: {}", roster.names().collect::<Vec<_>>().join(", "));

    let mut arena = Arena::new(roster, ArenaConfig::default());
    arena.select(0, "Blob")?;
    arena.select(1, "Spike")?;
    arena.begin_match();

    let mut input = InputManager::new();
    let mut audio = SilentOutput;
    let mut canvas = RecordingCanvas::default();
    let mut game_loop = GameLoop::new(Instant::now());
    let mut pause_held = false;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rusted Brawl")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                arena.end_match();
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => {
                input.reset_all();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                input.process_keyboard_event(&event);

                let pause = input.any_player_pressed(Action::Pause);
                if pause && !pause_held {
                    game_loop.toggle_pause();
                    info!("Paused: {}", game_loop.is_paused());
                }
                pause_held = pause;
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                let snapshots = input.snapshots();
                let first = game_loop.tick_count();
                let ticks = game_loop.begin_frame(Instant::now());
                for tick in first + 1..=first + u64::from(ticks) {
                    arena.tick(&mut audio, &snapshots, game_loop.tick_instant(tick));
                }

                canvas.sprites.clear();
                arena.draw(&mut canvas);
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        }
    }).map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
