//! IRONSIGHT Simulation Core
//!
//! ECS-симуляция FPS-прототипа на Bevy 0.16 (gameplay layer).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = gameplay layer (ресурсные gate'ы, ammo/stamina/bomb state,
//!   look orientation, пулы инстансов, HUD snapshot)
//! - Host engine = presentation/physics layer (рендер, raycast'ы, rigid body
//!   полёт бомб, опрос устройств ввода)
//!
//! Граница — events и resources: host пишет [`PlayerInput`] и
//! [`GroundContact`], читает [`HudState`] и исходящие события
//! ([`HitscanFired`], [`BombLaunched`]), отвечает входящими
//! ([`HitscanHit`], [`BombImpacted`]).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod combat;
pub mod components;
pub mod effects;
pub mod gates;
pub mod hud;
pub mod input;
pub mod logger;
pub mod look;
pub mod movement;
pub mod pool;

// Re-export базовых типов для удобства
pub use combat::{
    BombBag, BombImpacted, BombLaunched, BombPool, DamageDealt, Dead, EntityDied, Explosion,
    HitscanFired, HitscanGun, HitscanHit, Magazine, PooledBomb,
};
pub use components::*;
pub use effects::{DespawnAfter, EffectPools, PooledEffect};
pub use gates::{BoundedResource, Cooldown};
pub use hud::HudState;
pub use input::{GroundContact, PlayerInput};
pub use look::LookOrientation;
pub use movement::Locomotion;
pub use pool::{ObjectPool, PoolError, PoolHandle, PoolHooks};

/// Главный plugin симуляции
///
/// Все системы — в FixedUpdate (60Hz) одной `.chain()`-цепочкой. Порядок
/// фиксирован и значим: gate'ы тикают ДО consume-логики, чтобы ресурс,
/// истощённый в прошлом тике, успел стать доступным в текущем; HUD снимается
/// ПОСЛЕ всех мутаций; edge-ввод сбрасывается последним.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий (граница с host engine + внутренние)
        app.add_event::<HitscanFired>()
            .add_event::<HitscanHit>()
            .add_event::<BombLaunched>()
            .add_event::<BombImpacted>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        // Ресурсы composition root'а: host-boundary state + пулы
        app.init_resource::<PlayerInput>()
            .init_resource::<GroundContact>()
            .init_resource::<HudState>()
            .init_resource::<BombPool>()
            .init_resource::<EffectPools>();

        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Composition root мог уже вставить seeded RNG (create_headless_app)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: tick всех gate'ов и отложенных возвратов
                components::regenerate_stamina,
                combat::tick_reloads,
                combat::recharge_bombs,
                combat::tick_bomb_pool,
                effects::tick_effect_pools,
                effects::despawn_after_timeout,

                // Фаза 2: ориентация и камера (нужны fire/throw ниже)
                look::apply_look_input,
                components::update_camera_rig,

                // Фаза 3: consume-логика
                movement::move_player,
                combat::fire_weapon,
                combat::throw_bomb,

                // Фаза 4: ответы host'а (raycast, collisions)
                combat::process_hitscan_hits,
                combat::process_bomb_impacts,
                combat::mark_dead,

                // Фаза 5: HUD snapshot (после всех мутаций)
                hud::sync_stats_hud,
                hud::sync_gun_hud,
                hud::sync_bomb_hud,

                // Фаза 6: сброс edge-ввода
                input::clear_frame_input,
            )
                .chain(), // Последовательное выполнение
        );
    }
}

/// Детерминистичный RNG resource (seeded) — разброс отдачи, torque бомб
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Spawn player'а со всем FPS-обвесом
///
/// Компоненты: marker, поза, health/stamina, look, locomotion, camera rig,
/// hitscan-пушка, сумка бомб.
pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((
            Player,
            Transform::from_translation(position),
            Health::default(),
            Stamina::default(),
            LookOrientation::default(),
            Locomotion::default(),
            CameraRig::default(),
            HitscanGun::default(),
            BombBag::default(),
        ))
        .id()
}

/// Snapshot мира для сравнения детерминизма
///
/// Собирает компоненты типа T в детерминированном порядке (sort по Entity ID)
/// и сериализует через Debug.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
