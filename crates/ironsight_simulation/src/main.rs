//! Headless симуляция IRONSIGHT
//!
//! Запускает Bevy App без рендера со скриптованным вводом: спринт,
//! очереди из hitscan-пушки, броски бомб. Проверка sanity всей цепочки.

use std::time::Duration;

use bevy::prelude::{Vec2, Vec3};
use bevy::time::TimeUpdateStrategy;

use ironsight_simulation::{
    create_headless_app, spawn_player, GroundContact, HudState, PlayerInput, SimulationPlugin,
};

fn main() {
    let seed = 42;
    println!("Starting IRONSIGHT headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    // Ручной шаг времени: один update == один 60Hz tick, прогон детерминирован
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));

    spawn_player(app.world_mut(), Vec3::ZERO);

    // Host engine в headless-прогоне отсутствует: считаем пол плоским
    app.world_mut().resource_mut::<GroundContact>().grounded = true;

    // Запускаем 1000 тиков симуляции со скриптованным вводом
    for tick in 0..1000 {
        {
            let mut input = app.world_mut().resource_mut::<PlayerInput>();
            input.move_axis = Vec2::new(0.0, 1.0);
            input.sprint_held = tick < 300;
            input.fire_held = (tick / 60) % 2 == 0;
            input.throw_pressed = tick % 120 == 0;
            input.look_delta = Vec2::new(0.002, 0.0);
        }

        app.update();

        if tick % 100 == 0 {
            let hud = app.world().resource::<HudState>();
            println!(
                "Tick {}: ammo {} | stamina {:.0}% | bombs {}",
                tick,
                hud.ammo_text(),
                hud.stamina_ratio * 100.0,
                hud.bomb_text()
            );
        }
    }

    println!("Simulation complete!");
}
