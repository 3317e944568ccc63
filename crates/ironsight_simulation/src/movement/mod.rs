//! Locomotion — перемещение player'а: walk/sprint, гравитация, double jump
//!
//! Симуляция владеет kinematic-состоянием (накопленная вертикальная скорость,
//! бюджет прыжков); host physics владеет коллизиями и каждый tick сообщает
//! grounded-флаг через [`GroundContact`].
//!
//! Спринт — continuous-трата stamina: на истощении latch отрезает спринт до
//! восстановления выше порога, скорость откатывается к walk.

use bevy::prelude::*;

use crate::components::Stamina;
use crate::input::{GroundContact, PlayerInput};
use crate::look::LookOrientation;
use crate::Player;

/// Параметры и kinematic-состояние перемещения
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    /// Базовая скорость (m/s)
    pub walk_speed: f32,
    /// Множитель скорости при спринте
    pub sprint_multiplier: f32,
    /// Трата stamina при спринте (units per second)
    pub sprint_cost: f32,
    /// Ускорение свободного падения (m/s²)
    pub gravity: f32,
    /// Вертикальный импульс прыжка (m/s)
    pub jump_force: f32,
    /// Бюджет прыжков до касания земли (2 = double jump)
    pub max_jumps: u32,

    /// Накопленная вертикальная скорость
    pub y_velocity: f32,
    /// Оставшиеся прыжки (сбрасывается при контакте с землёй)
    pub jumps_left: u32,
    /// Спринтовали ли в этом тике (для HUD/анимаций host'а)
    pub sprinting: bool,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            sprint_multiplier: 1.6,
            sprint_cost: 20.0,
            gravity: 9.81,
            jump_force: 15.0,
            max_jumps: 2,
            y_velocity: 0.0,
            jumps_left: 2,
            sprinting: false,
        }
    }
}

/// Система: перемещение player'а за один tick
///
/// Порядок внутри тика:
/// 1. контакт с землёй — сброс бюджета прыжков и вертикальной скорости
/// 2. накопление гравитации
/// 3. прыжок (edge input, пока есть бюджет)
/// 4. горизонтальное направление из yaw-базиса + спринт (stamina gate)
/// 5. интеграция Transform
pub fn move_player(
    input: Res<PlayerInput>,
    ground: Res<GroundContact>,
    time: Res<Time<Fixed>>,
    mut query: Query<(&mut Transform, &mut Locomotion, &mut Stamina, &LookOrientation), With<Player>>,
) {
    let Ok((mut transform, mut loco, mut stamina, look)) = query.single_mut() else {
        return;
    };

    let dt = time.delta_secs();

    if ground.grounded && loco.y_velocity <= 0.0 {
        loco.y_velocity = 0.0;
        loco.jumps_left = loco.max_jumps;
    }

    loco.y_velocity -= loco.gravity * dt;

    if input.jump_pressed && loco.jumps_left > 0 {
        loco.y_velocity = loco.jump_force;
        loco.jumps_left -= 1;
    }

    // Yaw-базис: ввод задан относительно взгляда
    let body = look.body_rotation();
    let forward = body * Vec3::NEG_Z;
    let right = body * Vec3::X;
    let direction =
        (right * input.move_axis.x + forward * input.move_axis.y).normalize_or_zero();

    let mut speed = loco.walk_speed;
    loco.sprinting = false;
    if input.sprint_held && direction != Vec3::ZERO {
        // consume_continuous: на нуле ставит latch, под latch'ем отказывает
        if stamina.0.consume_continuous(loco.sprint_cost * dt) {
            speed *= loco.sprint_multiplier;
            loco.sprinting = true;
        }
    }

    let velocity = direction * speed + Vec3::Y * loco.y_velocity;
    transform.translation += velocity * dt;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_budget_allows_double_jump() {
        let mut loco = Locomotion::default();

        // Земля: бюджет полон
        assert_eq!(loco.jumps_left, 2);

        // Первый прыжок
        loco.y_velocity = loco.jump_force;
        loco.jumps_left -= 1;
        assert_eq!(loco.jumps_left, 1);

        // Второй (в воздухе)
        loco.y_velocity = loco.jump_force;
        loco.jumps_left -= 1;
        assert_eq!(loco.jumps_left, 0);
    }

    #[test]
    fn test_sprint_stops_on_exhaustion() {
        let mut stamina = Stamina::default();
        let loco = Locomotion::default();
        let dt = 1.0 / 60.0;

        // Полный бак — спринт идёт: 100 / (20/sec) = 5 sec
        let mut sprint_ticks = 0;
        for _ in 0..(10 * 60) {
            if stamina.0.consume_continuous(loco.sprint_cost * dt) {
                sprint_ticks += 1;
            }
        }

        // Без регенерации спринт обрывается на истощении (~5 sec, ± tick
        // точности f32-аккумуляции)
        assert!((sprint_ticks as i32 - 5 * 60).abs() <= 1, "{sprint_ticks}");
        assert!(stamina.0.is_exhausted());
    }
}
