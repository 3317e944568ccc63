//! Брошенные бомбы: заряды с перезарядкой, пул инстансов, взрыв по импакту
//!
//! Симуляция владеет magazine-состоянием ([`BombBag`]) и пулом инстансов
//! ([`BombPool`]); полёт и столкновения — у host physics. Host получает
//! [`BombLaunched`] (куда и с каким импульсом спавнить rigid body) и
//! возвращает [`BombImpacted`] при первом столкновении.

use bevy::prelude::*;
use rand::Rng;

use crate::components::CameraRig;
use crate::effects::{DespawnAfter, EXPLOSION_LIFETIME};
use crate::gates::Cooldown;
use crate::input::PlayerInput;
use crate::logger;
use crate::look::LookOrientation;
use crate::pool::{ObjectPool, PoolHandle, PoolHooks};
use crate::{DeterministicRng, Player};

/// Задержка возврата взорвавшейся бомбы в пул (секунды)
pub const BOMB_RETURN_DELAY: f32 = 0.1;

const BOMB_POOL_CAPACITY: usize = 10;
const BOMB_POOL_MAX: usize = 20;

/// «Сумка» бомб player'а: заряды + перезарядка + throw cooldown
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BombBag {
    pub charges: u32,
    pub max_charges: u32,
    /// Время восстановления одного заряда (секунды)
    pub recharge_time: f32,
    /// Накопленное время восстановления (idle при полной сумке)
    recharge_timer: f32,
    /// Минимальный интервал между бросками
    pub throw_gate: Cooldown,
    /// Сила броска (импульс)
    pub throw_force: f32,
    /// Вертикальная добавка для навесной траектории
    pub upward_bias: f32,
    /// Насколько перед глазами спавнится бомба (метры)
    pub spawn_distance: f32,
}

impl Default for BombBag {
    fn default() -> Self {
        Self {
            charges: 5,
            max_charges: 5,
            recharge_time: 3.0,
            recharge_timer: 0.0,
            throw_gate: Cooldown::new(0.5),
            throw_force: 20.0,
            upward_bias: 3.0,
            spawn_distance: 1.5,
        }
    }
}

impl BombBag {
    /// Отсчёт перезарядки; true в tick, когда восстановился один заряд
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.charges >= self.max_charges {
            self.recharge_timer = 0.0;
            return false;
        }

        self.recharge_timer += dt;
        if self.recharge_timer >= self.recharge_time {
            self.charges += 1;
            self.recharge_timer = 0.0;
            return true;
        }
        false
    }

    /// Списать заряд (false при пустой сумке)
    pub fn take_charge(&mut self) -> bool {
        if self.charges == 0 {
            return false;
        }
        self.charges -= 1;
        true
    }

    /// Заполненность сумки [0, 1] — для HUD
    pub fn ratio(&self) -> f32 {
        self.charges as f32 / self.max_charges as f32
    }

    /// Прогресс восстановления заряда [0, 1] (1.0 при полной сумке)
    pub fn recharge_progress(&self) -> f32 {
        if self.charges >= self.max_charges {
            return 1.0;
        }
        self.recharge_timer / self.recharge_time
    }
}

/// Pooled bomb-инстанс (зеркалится host'ом в rigid body)
#[derive(Debug, Clone)]
pub struct PooledBomb {
    pub translation: Vec3,
    pub velocity: Vec3,
    /// Guard от повторного взрыва при множественных collision-событиях
    pub exploded: bool,
}

impl Default for PooledBomb {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            exploded: false,
        }
    }
}

/// Hooks пула бомб
pub struct BombHooks;

impl PoolHooks<PooledBomb> for BombHooks {
    fn create(&mut self) -> PooledBomb {
        logger::log("Bomb pool: new instance created");
        PooledBomb::default()
    }

    fn on_acquire(&mut self, item: &mut PooledBomb) {
        // Сброс состояния при каждой выдаче
        item.exploded = false;
    }

    fn on_release(&mut self, item: &mut PooledBomb) {
        // Скорость обнуляется, чтобы при переиспользовании не осталось
        // прошлой физики
        item.velocity = Vec3::ZERO;
    }

    fn on_destroy(&mut self, _item: PooledBomb) {
        logger::log("Bomb pool: instance destroyed (free list at max)");
    }
}

/// Пул бомб + отложенные возвраты
///
/// Строится composition root'ом ([`Default`] делает prewarm на
/// default capacity) и инъектируется как resource.
#[derive(Resource)]
pub struct BombPool {
    pool: ObjectPool<PooledBomb, BombHooks>,
    pending: Vec<(PoolHandle, f32)>,
}

impl Default for BombPool {
    fn default() -> Self {
        let mut pool = ObjectPool::new(BombHooks, BOMB_POOL_CAPACITY, BOMB_POOL_MAX);
        pool.prewarm_default();
        Self {
            pool,
            pending: Vec::new(),
        }
    }
}

impl BombPool {
    pub fn acquire(&mut self) -> PoolHandle {
        self.pool.acquire()
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut PooledBomb> {
        self.pool.get_mut(handle)
    }

    pub fn is_active(&self, handle: PoolHandle) -> bool {
        self.pool.is_active(handle)
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.pool.count_active(), self.pool.count_free())
    }

    /// Запланировать возврат через delay. Отмены нет: возврат сработает даже
    /// если handle успели переиспользовать (известный hazard).
    pub fn schedule_return(&mut self, handle: PoolHandle, delay: f32) {
        self.pending.push((handle, delay));
    }

    /// Отсчёт отложенных возвратов (раз в tick)
    pub fn tick(&mut self, dt: f32) {
        let mut due = Vec::new();
        self.pending.retain_mut(|(handle, remaining)| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                due.push(*handle);
                false
            } else {
                true
            }
        });

        for handle in due {
            if let Err(e) = self.pool.release(handle) {
                logger::log_error(&format!("bomb pool deferred release: {e}"));
            }
        }
    }
}

/// Event: бомба брошена (симуляция → host: спавн rigid body)
#[derive(Event, Debug, Clone)]
pub struct BombLaunched {
    pub thrower: Entity,
    pub handle: PoolHandle,
    pub origin: Vec3,
    /// Импульс броска (направление взгляда + навес)
    pub impulse: Vec3,
    /// Случайное вращение для «живости» полёта
    pub torque: Vec3,
}

/// Event: бомба столкнулась (host → симуляция)
#[derive(Event, Debug, Clone)]
pub struct BombImpacted {
    pub handle: PoolHandle,
    pub position: Vec3,
}

/// Маркер: entity взрыва (живёт EXPLOSION_LIFETIME, см. DespawnAfter)
#[derive(Component, Debug, Default)]
pub struct Explosion;

/// Система: восстановление зарядов (до consume-логики тика)
pub fn recharge_bombs(mut bags: Query<&mut BombBag>, time: Res<Time<Fixed>>) {
    let dt = time.delta_secs();

    for mut bag in bags.iter_mut() {
        if bag.tick(dt) {
            logger::log(&format!(
                "Bomb recharged ({}/{})",
                bag.charges, bag.max_charges
            ));
        }
    }
}

/// Система: отсчёт отложенных возвратов бомб
pub fn tick_bomb_pool(mut pool: ResMut<BombPool>, time: Res<Time<Fixed>>) {
    pool.tick(time.delta_secs());
}

/// Система: ввод броска → бомба из пула + событие host'у
///
/// Порядок gate-проверок: cooldown → заряды → пул. Cooldown мутируется только
/// после того, как бросок точно состоится.
pub fn throw_bomb(
    input: Res<PlayerInput>,
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut bomb_pool: Option<ResMut<BombPool>>,
    mut query: Query<(Entity, &Transform, &CameraRig, &LookOrientation, &mut BombBag), With<Player>>,
    mut launched_events: EventWriter<BombLaunched>,
) {
    let Ok((entity, transform, rig, look, mut bag)) = query.single_mut() else {
        return;
    };

    if !input.throw_pressed {
        return;
    }

    let now = time.elapsed_secs();
    if !bag.throw_gate.ready(now) {
        return;
    }

    if bag.charges == 0 {
        logger::log("No bombs — waiting for recharge");
        return;
    }

    let Some(pool) = bomb_pool.as_mut() else {
        logger::log_warning("BombPool resource missing — throw disabled");
        return;
    };

    bag.take_charge();
    bag.throw_gate.try_trigger(now);

    let eye = rig.eye_position(transform.translation, look.yaw);
    let origin = eye + look.forward() * bag.spawn_distance;
    let direction = (look.forward() + Vec3::Y * bag.upward_bias * 0.1).normalize();
    let impulse = direction * bag.throw_force;
    let torque = Vec3::new(
        rng.rng.gen_range(-5.0..=5.0),
        rng.rng.gen_range(-5.0..=5.0),
        rng.rng.gen_range(-5.0..=5.0),
    );

    let handle = pool.acquire();
    if let Some(bomb) = pool.get_mut(handle) {
        bomb.translation = origin;
        bomb.velocity = impulse;
    }

    launched_events.write(BombLaunched {
        thrower: entity,
        handle,
        origin,
        impulse,
        torque,
    });

    logger::log(&format!(
        "Bomb thrown ({}/{} left)",
        bag.charges, bag.max_charges
    ));
}

/// Система: импакты от host'а → взрыв + отложенный возврат в пул
pub fn process_bomb_impacts(
    mut commands: Commands,
    mut impact_events: EventReader<BombImpacted>,
    mut bomb_pool: Option<ResMut<BombPool>>,
) {
    let Some(pool) = bomb_pool.as_mut() else {
        return;
    };

    for impact in impact_events.read() {
        let Some(bomb) = pool.get_mut(impact.handle) else {
            logger::log_warning(&format!(
                "Bomb impact for inactive handle {}",
                impact.handle
            ));
            continue;
        };

        // Один взрыв на выдачу, сколько бы collision-событий ни пришло
        if bomb.exploded {
            continue;
        }
        bomb.exploded = true;
        bomb.translation = impact.position;

        commands.spawn((
            Explosion,
            Transform::from_translation(impact.position),
            DespawnAfter::new(EXPLOSION_LIFETIME),
        ));

        // Небольшая задержка, чтобы host успел показать взрыв до деактивации
        pool.schedule_return(impact.handle, BOMB_RETURN_DELAY);
    }
}
