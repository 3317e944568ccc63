//! Hitscan-оружие: магазин, reload, cooldown, отдача
//!
//! Flow выстрела:
//! 1. fire_weapon: gate-проверки (cooldown → reload → патроны) → decrement,
//!    событие [`HitscanFired`], отдача в LookOrientation, muzzle flash из пула
//! 2. Host выполняет ray test и отвечает [`HitscanHit`]
//! 3. process_hitscan_hits: hit-эффект из пула + урон цели

use bevy::prelude::*;
use rand::Rng;

use crate::components::{CameraRig, Health};
use crate::effects::EffectPools;
use crate::gates::Cooldown;
use crate::input::PlayerInput;
use crate::logger;
use crate::look::LookOrientation;
use crate::combat::damage::{DamageDealt, EntityDied};
use crate::{DeterministicRng, Player};

/// Магазин: текущие патроны + резерв + reload-таймер
///
/// Инварианты: rounds ≤ magazine_size, reserve ≤ max_reserve.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct Magazine {
    pub rounds: u32,
    pub magazine_size: u32,
    pub reserve: u32,
    pub max_reserve: u32,
    /// Длительность перезарядки (секунды)
    pub reload_time: f32,
    reload_timer: f32,
    reloading: bool,
}

impl Magazine {
    pub fn new(magazine_size: u32, max_reserve: u32, reload_time: f32) -> Self {
        Self {
            rounds: magazine_size,
            magazine_size,
            reserve: max_reserve,
            max_reserve,
            reload_time,
            reload_timer: 0.0,
            reloading: false,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    /// Списать один патрон (false при пустом магазине или во время reload)
    pub fn take_round(&mut self) -> bool {
        if self.reloading || self.rounds == 0 {
            return false;
        }
        self.rounds -= 1;
        true
    }

    /// Начать перезарядку.
    /// No-op: уже идёт reload / резерв пуст / магазин полон.
    pub fn try_start_reload(&mut self) -> bool {
        if self.reloading || self.reserve == 0 || self.rounds >= self.magazine_size {
            return false;
        }
        self.reloading = true;
        self.reload_timer = self.reload_time;
        true
    }

    /// Отсчёт reload-таймера; true в tick завершения (перенос из резерва)
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.reloading {
            return false;
        }

        self.reload_timer -= dt;
        if self.reload_timer > 0.0 {
            return false;
        }

        let needed = self.magazine_size - self.rounds;
        let transferred = needed.min(self.reserve);
        self.rounds += transferred;
        self.reserve -= transferred;
        self.reloading = false;
        true
    }

    /// Заполненность магазина [0, 1] — для HUD
    pub fn magazine_ratio(&self) -> f32 {
        self.rounds as f32 / self.magazine_size as f32
    }

    /// Прогресс перезарядки [0, 1] (1.0 когда не перезаряжаемся)
    pub fn reload_progress(&self) -> f32 {
        if !self.reloading {
            return 1.0;
        }
        1.0 - (self.reload_timer / self.reload_time)
    }

    /// Доля всех оставшихся патронов от максимума — для HUD
    pub fn total_ratio(&self) -> f32 {
        let total_possible = self.magazine_size + self.max_reserve;
        (self.rounds + self.reserve) as f32 / total_possible as f32
    }
}

/// Hitscan-пушка player'а
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HitscanGun {
    /// Минимальный интервал между выстрелами
    pub trigger: Cooldown,
    /// Максимальная дальность ray test'а (метры)
    pub range: f32,
    /// Урон за попадание
    pub base_damage: f32,
    /// Горизонтальная отдача (± градусы за выстрел)
    pub recoil_yaw: f32,
    /// Вертикальная отдача (0..N градусов вверх за выстрел)
    pub recoil_pitch: f32,
    pub magazine: Magazine,
}

impl Default for HitscanGun {
    fn default() -> Self {
        Self {
            trigger: Cooldown::new(0.1),
            range: 100.0,
            base_damage: 10.0,
            recoil_yaw: 2.0,
            recoil_pitch: 3.0,
            magazine: Magazine::new(30, 90, 2.0),
        }
    }
}

/// Event: выстрел сделан (симуляция → host, host выполняет raycast)
#[derive(Event, Debug, Clone)]
pub struct HitscanFired {
    pub shooter: Entity,
    /// Откуда стрелять ray (позиция глаза/камеры)
    pub origin: Vec3,
    /// Нормализованное направление взгляда
    pub direction: Vec3,
    pub range: f32,
    pub damage: f32,
}

/// Event: ray попал (host → симуляция)
#[derive(Event, Debug, Clone)]
pub struct HitscanHit {
    pub shooter: Entity,
    /// Entity под прицелом, если у него есть симуляционная сторона
    pub target: Option<Entity>,
    pub position: Vec3,
    /// Нормаль поверхности в точке попадания
    pub normal: Vec3,
    pub distance: f32,
    /// Урон выстрела (host возвращает значение из HitscanFired)
    pub damage: f32,
}

/// Система: отсчёт reload-таймеров (до consume-логики тика)
pub fn tick_reloads(mut guns: Query<&mut HitscanGun>, time: Res<Time<Fixed>>) {
    let dt = time.delta_secs();

    for mut gun in guns.iter_mut() {
        if gun.magazine.tick(dt) {
            logger::log(&format!(
                "Reload complete: {}/{} (+{} reserve)",
                gun.magazine.rounds, gun.magazine.magazine_size, gun.magazine.reserve
            ));
        }
    }
}

/// Система: ввод огня/перезарядки → выстрел
///
/// Порядок gate-проверок как в прототипе: cooldown → reload → патроны.
/// Все отказы — локальные no-op'ы.
pub fn fire_weapon(
    input: Res<PlayerInput>,
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut effects: Option<ResMut<EffectPools>>,
    mut query: Query<
        (Entity, &Transform, &CameraRig, &mut LookOrientation, &mut HitscanGun),
        With<Player>,
    >,
    mut fired_events: EventWriter<HitscanFired>,
) {
    let Ok((entity, transform, rig, mut look, mut gun)) = query.single_mut() else {
        return;
    };

    if input.reload_pressed && gun.magazine.try_start_reload() {
        logger::log(&format!(
            "Reload started ({:.1} sec)",
            gun.magazine.reload_time
        ));
    }

    if !input.fire_held {
        return;
    }

    let now = time.elapsed_secs();
    if !gun.trigger.ready(now) {
        return;
    }
    if gun.magazine.is_reloading() {
        return;
    }
    if gun.magazine.rounds == 0 {
        logger::log("Out of ammo — reload required");
        return;
    }

    // Все gate'ы пройдены: только теперь мутируем
    gun.trigger.try_trigger(now);
    gun.magazine.take_round();

    let eye = rig.eye_position(transform.translation, look.yaw);
    let direction = look.forward();

    fired_events.write(HitscanFired {
        shooter: entity,
        origin: eye,
        direction,
        range: gun.range,
        damage: gun.base_damage,
    });

    // Отдача: горизонталь ±, вертикаль только вверх. Тот же clamp-путь,
    // что и look-ввод.
    let kick_yaw = rng.rng.gen_range(-gun.recoil_yaw..=gun.recoil_yaw);
    let kick_pitch = rng.rng.gen_range(0.0..=gun.recoil_pitch);
    look.apply_impulse(kick_yaw, kick_pitch);

    if let Some(effects) = effects.as_mut() {
        let muzzle = eye + direction * 0.8;
        effects.spawn_muzzle_flash(muzzle, look.view_rotation());
    }

    logger::log(&format!(
        "Fired: {}/{} rounds left",
        gun.magazine.rounds, gun.magazine.magazine_size
    ));
}

/// Система: ответы host'а на ray test → hit-эффект + урон
pub fn process_hitscan_hits(
    mut hit_events: EventReader<HitscanHit>,
    mut effects: Option<ResMut<EffectPools>>,
    mut targets: Query<&mut Health>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
) {
    for hit in hit_events.read() {
        if let Some(effects) = effects.as_mut() {
            let rotation = Quat::from_rotation_arc(Vec3::NEG_Z, hit.normal.normalize_or_zero());
            effects.spawn_impact(hit.position, rotation);
        }

        let Some(target) = hit.target else {
            continue;
        };

        // Self-hit отбрасываем (ray начинается внутри стрелка)
        if target == hit.shooter {
            continue;
        }

        let Ok(mut health) = targets.get_mut(target) else {
            continue;
        };

        let was_dead = health.is_dead();
        health.take_damage(hit.damage);
        let died = !was_dead && health.is_dead();

        damage_events.write(DamageDealt {
            attacker: hit.shooter,
            target,
            damage: hit.damage,
            target_died: died,
        });

        if died {
            died_events.write(EntityDied {
                entity: target,
                killer: Some(hit.shooter),
            });
            logger::log_info(&format!("Entity {target:?} killed by {:?}", hit.shooter));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_round_decrements() {
        let mut mag = Magazine::new(30, 90, 2.0);

        assert!(mag.take_round());
        assert_eq!(mag.rounds, 29);

        for _ in 0..29 {
            assert!(mag.take_round());
        }
        assert_eq!(mag.rounds, 0);
        assert!(!mag.take_round());
    }

    #[test]
    fn test_reload_transfers_from_reserve() {
        let mut mag = Magazine::new(30, 90, 2.0);
        for _ in 0..30 {
            mag.take_round();
        }

        assert!(mag.try_start_reload());
        assert!(mag.is_reloading());
        assert!(!mag.take_round()); // во время reload стрелять нельзя

        // 2 sec @ 60Hz
        let mut completed = false;
        for _ in 0..121 {
            completed |= mag.tick(1.0 / 60.0);
        }

        assert!(completed);
        assert_eq!(mag.rounds, 30);
        assert_eq!(mag.reserve, 60);
    }

    #[test]
    fn test_partial_reload_caps_at_reserve() {
        let mut mag = Magazine::new(30, 90, 2.0);
        mag.reserve = 10;
        for _ in 0..30 {
            mag.take_round();
        }

        mag.try_start_reload();
        for _ in 0..121 {
            mag.tick(1.0 / 60.0);
        }

        assert_eq!(mag.rounds, 10);
        assert_eq!(mag.reserve, 0);
    }

    #[test]
    fn test_reload_noops() {
        let mut mag = Magazine::new(30, 90, 2.0);

        // Полный магазин — отказ
        assert!(!mag.try_start_reload());

        // Без резерва — отказ
        mag.reserve = 0;
        mag.rounds = 5;
        assert!(!mag.try_start_reload());

        // Повторный старт во время reload — отказ
        mag.reserve = 30;
        assert!(mag.try_start_reload());
        assert!(!mag.try_start_reload());
    }

    #[test]
    fn test_hud_ratios() {
        let mut mag = Magazine::new(30, 90, 2.0);
        assert_eq!(mag.magazine_ratio(), 1.0);
        assert_eq!(mag.total_ratio(), 1.0);
        assert_eq!(mag.reload_progress(), 1.0);

        for _ in 0..15 {
            mag.take_round();
        }
        assert_eq!(mag.magazine_ratio(), 0.5);

        mag.try_start_reload();
        mag.tick(1.0);
        assert!((mag.reload_progress() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_fire_cooldown_rate() {
        let mut gun = HitscanGun::default();

        assert!(gun.trigger.try_trigger(0.0));
        assert!(!gun.trigger.try_trigger(0.05));
        assert!(gun.trigger.try_trigger(0.1));
    }
}
