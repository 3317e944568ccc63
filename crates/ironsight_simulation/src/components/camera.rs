//! Camera rig — first/third person toggle со сглаженным переходом
//!
//! Симуляция владеет только offset'ом камеры относительно player'а;
//! сам Camera3D-узел и его рендер — на стороне host engine, который каждый
//! кадр читает [`CameraRig::current_offset`].

use bevy::prelude::*;

use crate::input::PlayerInput;
use crate::logger;
use crate::Player;

/// Режим камеры
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum CameraMode {
    /// От первого лица (offset на уровне глаз)
    FirstPerson,
    /// От третьего лица (offset сверху-сзади)
    ThirdPerson,
}

/// Переход между view-offset'ами (ease-out quad, 0.5 sec)
#[derive(Debug, Clone, Copy, Reflect)]
pub struct ViewTransition {
    pub from: Vec3,
    pub to: Vec3,
    /// 0.0 → 1.0
    pub progress: f32,
}

/// Camera rig на player entity
///
/// Toggle игнорируется пока идёт переход (как и в исходном дизайне:
/// повторное нажатие посреди transition не разворачивает его).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    pub mode: CameraMode,
    pub first_person_offset: Vec3,
    pub third_person_offset: Vec3,
    pub transition_duration: f32,
    /// Текущий offset (local space player'а; host читает для Camera3D)
    pub current_offset: Vec3,
    pub transition: Option<ViewTransition>,
}

impl Default for CameraRig {
    fn default() -> Self {
        let first = Vec3::new(0.0, 0.6, 0.0);
        Self {
            mode: CameraMode::FirstPerson,
            first_person_offset: first,
            // +Z — позади player'а (forward = -Z)
            third_person_offset: Vec3::new(0.0, 2.0, 4.0),
            transition_duration: 0.5,
            current_offset: first,
            transition: None,
        }
    }
}

impl CameraRig {
    pub fn is_first_person(&self) -> bool {
        self.mode == CameraMode::FirstPerson
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Переключить режим и начать сглаженный переход.
    /// No-op пока предыдущий переход не завершён.
    pub fn toggle(&mut self) {
        if self.transition.is_some() {
            return;
        }

        self.mode = match self.mode {
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
        };

        let to = match self.mode {
            CameraMode::FirstPerson => self.first_person_offset,
            CameraMode::ThirdPerson => self.third_person_offset,
        };

        self.transition = Some(ViewTransition {
            from: self.current_offset,
            to,
            progress: 0.0,
        });
    }

    /// Продвинуть переход (вызывается раз в tick)
    pub fn tick(&mut self, dt: f32) {
        let Some(mut tr) = self.transition else {
            return;
        };

        tr.progress = (tr.progress + dt / self.transition_duration).min(1.0);
        self.current_offset = tr.from.lerp(tr.to, ease_out_quad(tr.progress));

        if tr.progress >= 1.0 {
            self.transition = None;
        } else {
            self.transition = Some(tr);
        }
    }

    /// Позиция глаза/камеры в мире (yaw в градусах — поворот rig'а за player'ом)
    pub fn eye_position(&self, player_translation: Vec3, yaw_deg: f32) -> Vec3 {
        player_translation + Quat::from_rotation_y(-yaw_deg.to_radians()) * self.current_offset
    }
}

/// Ease-out quad: быстрый старт, мягкий финиш
///
/// Formula: 1 - (1-t)²
pub fn ease_out_quad(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv
}

/// Система: toggle view по input + tick перехода
pub fn update_camera_rig(
    input: Res<PlayerInput>,
    time: Res<Time<Fixed>>,
    mut query: Query<&mut CameraRig, With<Player>>,
) {
    let Ok(mut rig) = query.single_mut() else {
        return;
    };

    if input.toggle_view_pressed && !rig.is_transitioning() {
        rig.toggle();
        logger::log(if rig.is_first_person() {
            "Camera: first person"
        } else {
            "Camera: third person"
        });
    }

    rig.tick(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_quad_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);

        // Быстрый старт: на середине уже 75%
        assert_eq!(ease_out_quad(0.5), 0.75);
    }

    #[test]
    fn test_toggle_starts_transition() {
        let mut rig = CameraRig::default();
        assert!(rig.is_first_person());

        rig.toggle();
        assert!(!rig.is_first_person());
        assert!(rig.is_transitioning());

        // Повторный toggle посреди перехода игнорируется
        rig.toggle();
        assert_eq!(rig.mode, CameraMode::ThirdPerson);
    }

    #[test]
    fn test_transition_completes() {
        let mut rig = CameraRig::default();
        rig.toggle();

        // 0.5 sec @ 60Hz
        for _ in 0..40 {
            rig.tick(1.0 / 60.0);
        }

        assert!(!rig.is_transitioning());
        assert_eq!(rig.current_offset, rig.third_person_offset);

        // Обратно
        rig.toggle();
        for _ in 0..40 {
            rig.tick(1.0 / 60.0);
        }
        assert!(rig.is_first_person());
        assert_eq!(rig.current_offset, rig.first_person_offset);
    }

    #[test]
    fn test_eye_position_follows_yaw() {
        let mut rig = CameraRig::default();
        rig.current_offset = Vec3::new(0.0, 2.0, 4.0);

        // yaw 0: offset как есть
        let eye = rig.eye_position(Vec3::ZERO, 0.0);
        assert!((eye - Vec3::new(0.0, 2.0, 4.0)).length() < 1e-4);

        // yaw 180°: offset разворачивается за спину
        let eye = rig.eye_position(Vec3::ZERO, 180.0);
        assert!((eye - Vec3::new(0.0, 2.0, -4.0)).length() < 1e-4);
    }
}
