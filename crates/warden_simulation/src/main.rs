//! Headless симуляция Warden
//!
//! Guard стоит на посту, цель идёт к нему. Печатаем trace переходов.
//!
//! Usage: warden_simulation [guard_config.json]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use warden_simulation::{
    create_headless_app, log_error, spawn_guard, spawn_target_body, ActiveTarget,
    DeterministicRng, GuardCommand, GuardConfig, GuardDiagnosticEvent, GuardState,
    GuardStateChanged, SimulationPlugin, SimulationSet,
};

/// Система: печатает переходы и diagnostics
fn print_trace(
    mut changes: EventReader<GuardStateChanged>,
    mut diagnostics: EventReader<GuardDiagnosticEvent>,
    time: Res<Time<Fixed>>,
) {
    let elapsed = time.elapsed_secs();

    for change in changes.read() {
        println!(
            "[{:>6.2}s] {:?}: {:?} → {:?}",
            elapsed, change.guard, change.from, change.to
        );
    }
    for event in diagnostics.read() {
        println!(
            "[{:>6.2}s] {:?}: {:?} {}",
            elapsed, event.guard, event.diagnostic.severity, event.diagnostic.error
        );
    }
}

fn load_config() -> GuardConfig {
    let Some(path) = std::env::args().nth(1) else {
        return GuardConfig::default();
    };

    match GuardConfig::from_json_file(&path) {
        Ok(config) => config,
        Err(error) => {
            log_error(&format!("Config {}: {}, using defaults", path, error));
            GuardConfig::default()
        }
    }
}

fn main() {
    let seed = 42;
    println!("Starting Warden headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .add_systems(FixedUpdate, print_trace.after(SimulationSet::Ai));

    // Каждый update = ровно один fixed tick (не зависим от wall clock)
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));

    let config = load_config();
    let world = app.world_mut();
    let guard_seed = world.resource_mut::<DeterministicRng>().next_seed();

    let (guard, target) = {
        let mut commands = world.commands();
        let guard = match spawn_guard(&mut commands, Vec3::ZERO, config, guard_seed) {
            Ok(guard) => guard,
            Err(error) => {
                log_error(&format!("Guard spawn failed: {}", error));
                return;
            }
        };
        // Цель идёт к guard'у со стороны +X
        let target = spawn_target_body(
            &mut commands,
            Vec3::new(8.0, 0.0, 0.0),
            Vec3::new(-1.5, 0.0, 0.0),
        );
        (guard, target)
    };
    world.flush();
    world.resource_mut::<ActiveTarget>().set(target);

    // Первый update без delta; команду шлём после первого fixed tick
    app.update();
    app.update();

    // Debug trigger: guard замечает цель
    app.world_mut().send_event(GuardCommand {
        guard,
        request: GuardState::Warning,
    });

    // 10 секунд при 60Hz
    for tick in 0..600 {
        app.update();

        if tick % 120 == 0 {
            if let Some(state) = app.world().get::<GuardState>(guard) {
                println!("Tick {}: guard {:?}", tick, state);
            }
        }
    }

    println!("Simulation complete!");
}
