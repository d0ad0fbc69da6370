//! Skirmish native entry point
//!
//! Runs a short scripted session headless and logs what happened. Browser
//! hosts drive `tick` and `draw_world` from their own animation loop.

use std::process::ExitCode;

use skirmish::Settings;
use skirmish::geom::Vector;
use skirmish::renderer::{DrawList, draw_world};
use skirmish::sim::{EntityKind, GameEvent, Key, SimError, TickInput, World, tick};

const DEMO_TICKS: u64 = 600;
const SETTINGS_PATH: &str = "skirmish.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Skirmish (native) starting...");

    let settings = Settings::load_or_default(SETTINGS_PATH);
    match run_demo(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Demo aborted: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() -> ExitCode {
    // The browser host links the library directly
    ExitCode::SUCCESS
}

/// Script: strafe up and down while firing at the right edge
fn scripted_input(
    tick_no: u64,
    arena_width: f64,
    arena_height: f64,
) -> Result<TickInput, SimError> {
    let strafe = if (tick_no / 120) % 2 == 0 { Key::Up } else { Key::Down };
    let target = Vector::cartesian(arena_width, arena_height / 2.0)?;
    Ok(TickInput::holding([strafe, Key::Fire]).with_pointer(target))
}

fn run_demo(settings: Settings) -> Result<(), SimError> {
    let (width, height) = (settings.arena_width, settings.arena_height);
    let mut world = World::new(0x5eed, settings)?;
    let mut frame = DrawList::new();
    let (mut shots, mut kills, mut hits) = (0u32, 0u32, 0u32);

    for tick_no in 0..DEMO_TICKS {
        if let Err(e) = tick(&mut world, &scripted_input(tick_no, width, height)?) {
            log::error!("Dropped frame {tick_no}: {e}");
            continue;
        }
        for event in world.drain_events() {
            match event {
                GameEvent::Spawned { kind: EntityKind::Projectile, .. } => shots += 1,
                GameEvent::Despawned { kind: EntityKind::Enemy, .. } => kills += 1,
                GameEvent::PlayerDamaged { .. } => hits += 1,
                _ => {}
            }
        }
        frame.clear();
        draw_world(&world, &mut frame)?;
    }

    log::info!(
        "{} ticks: {shots} shots fired, {kills} enemies gone, {hits} hits taken, phase {:?}",
        world.time_ticks,
        world.phase
    );
    log::info!("Last frame: {} draw commands", frame.len());
    Ok(())
}
