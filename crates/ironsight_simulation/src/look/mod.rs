//! Look orientation — накопитель yaw/pitch с глобальным clamp'ом
//!
//! Одно состояние на player'а: и мышиный ввод, и отдача оружия проходят через
//! один и тот же update-путь с одинаковым clamp'ом pitch'а — инвариант
//! «pitch всегда в [pitch_min, pitch_max]» глобален.
//!
//! Отдача НЕ затухает сама: она перманентна, пока игрок не перепишет её своим
//! look-вводом.

use bevy::prelude::*;

use crate::input::PlayerInput;
use crate::Player;

/// Накопленное направление взгляда (градусы)
///
/// Конвенция: yaw растёт при повороте вправо (без ограничений, wrap неявный);
/// pitch растёт при взгляде ВНИЗ и зажат в [pitch_min, pitch_max].
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LookOrientation {
    pub yaw: f32,
    pub pitch: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    /// Градусы на единицу axis-ввода в секунду
    pub sensitivity: f32,
}

impl Default for LookOrientation {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            pitch_min: -90.0,
            pitch_max: 90.0,
            sensitivity: 200.0,
        }
    }
}

impl LookOrientation {
    /// Look-ввод: d_pitch положителен при взгляде вверх (инвертированная
    /// конвенция — камера поднимается)
    pub fn apply_input(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch - d_pitch).clamp(self.pitch_min, self.pitch_max);
    }

    /// Импульс отдачи — тот же update-путь и тот же clamp, что и apply_input
    pub fn apply_impulse(&mut self, d_yaw: f32, d_pitch: f32) {
        self.apply_input(d_yaw, d_pitch);
    }

    /// Кватернион взгляда (yaw + pitch)
    pub fn view_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            -self.yaw.to_radians(),
            -self.pitch.to_radians(),
            0.0,
        )
    }

    /// Кватернион корпуса (только yaw) — для Transform player'а
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Направление взгляда в мире
    pub fn forward(&self) -> Vec3 {
        self.view_rotation() * Vec3::NEG_Z
    }
}

/// Система: мышиный ввод → накопление yaw/pitch, yaw → Transform корпуса
pub fn apply_look_input(
    input: Res<PlayerInput>,
    time: Res<Time<Fixed>>,
    mut query: Query<(&mut LookOrientation, &mut Transform), With<Player>>,
) {
    let Ok((mut look, mut transform)) = query.single_mut() else {
        return;
    };

    let dt = time.delta_secs();
    if input.look_delta != Vec2::ZERO {
        let sensitivity = look.sensitivity;
        look.apply_input(
            input.look_delta.x * sensitivity * dt,
            input.look_delta.y * sensitivity * dt,
        );
    }

    transform.rotation = look.body_rotation();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_clamped_on_input() {
        let mut look = LookOrientation::default();

        // Смотрим вверх дольше любого лимита
        for _ in 0..100 {
            look.apply_input(0.0, 10.0);
        }
        assert_eq!(look.pitch, -90.0);

        // И вниз
        for _ in 0..100 {
            look.apply_input(0.0, -10.0);
        }
        assert_eq!(look.pitch, 90.0);
    }

    #[test]
    fn test_yaw_unbounded() {
        let mut look = LookOrientation::default();

        for _ in 0..10 {
            look.apply_input(90.0, 0.0);
        }
        assert_eq!(look.yaw, 900.0);
    }

    #[test]
    fn test_impulse_respects_clamp() {
        let mut look = LookOrientation::default();
        look.apply_input(0.0, 89.0); // почти вертикально вверх
        assert_eq!(look.pitch, -89.0);

        // Отдача пинает вверх — clamp держит границу
        look.apply_impulse(1.5, 3.0);
        assert_eq!(look.pitch, -90.0);
        assert_eq!(look.yaw, 1.5);
    }

    #[test]
    fn test_mixed_sequence_keeps_pitch_in_range() {
        let mut look = LookOrientation::default();
        let deltas = [25.0, -70.0, 130.0, -45.0, 200.0, -200.0, 15.0];

        for (i, d) in deltas.iter().enumerate() {
            if i % 2 == 0 {
                look.apply_input(*d, *d);
            } else {
                look.apply_impulse(*d, *d);
            }
            assert!(look.pitch >= look.pitch_min && look.pitch <= look.pitch_max);
        }
    }

    #[test]
    fn test_forward_direction() {
        let mut look = LookOrientation::default();

        // По умолчанию — вперёд (-Z)
        assert!((look.forward() - Vec3::NEG_Z).length() < 1e-5);

        // yaw 90° вправо → +X
        look.yaw = 90.0;
        assert!((look.forward() - Vec3::X).length() < 1e-5);

        // Взгляд вверх поднимает y
        look.yaw = 0.0;
        look.apply_input(0.0, 45.0);
        assert!(look.forward().y > 0.7);
    }
}
