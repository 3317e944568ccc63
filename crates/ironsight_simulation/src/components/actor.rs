//! Базовые компоненты актора: Health, Stamina

use bevy::prelude::*;

use crate::gates::BoundedResource;

/// Здоровье актора
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).clamp(0.0, self.max);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    /// Доля здоровья [0, 1] — для HUD
    pub fn ratio(&self) -> f32 {
        self.current / self.max
    }
}

/// Выносливость: спринт, прыжки, будущие dodge/специальные атаки
///
/// Обёртка над [`BoundedResource`]: regen 15/sec после паузы 1 sec,
/// exhaustion latch снимается на 30% от max.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stamina(pub BoundedResource);

impl Default for Stamina {
    fn default() -> Self {
        Self(BoundedResource::new(100.0, 15.0, 1.0, 0.3))
    }
}

/// Система: tick всех stamina-gates
///
/// Должна выполняться ДО любых систем, которые тратят stamina в этом же тике
/// (spent-last-tick ресурс успевает стать доступным).
pub fn regenerate_stamina(mut query: Query<&mut Stamina>, time: Res<Time<Fixed>>) {
    let dt = time.delta_secs();

    for mut stamina in query.iter_mut() {
        stamina.0.tick(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_and_heal() {
        let mut health = Health::new(100.0);

        health.take_damage(30.0);
        assert_eq!(health.current, 70.0);
        assert!(!health.is_dead());

        health.take_damage(100.0); // clamp к нулю
        assert_eq!(health.current, 0.0);
        assert!(health.is_dead());

        health.heal(40.0);
        assert_eq!(health.current, 40.0);

        health.heal(100.0); // clamp к max
        assert_eq!(health.current, 100.0);
    }

    #[test]
    fn test_health_ratio() {
        let mut health = Health::new(200.0);
        health.take_damage(50.0);
        assert_eq!(health.ratio(), 0.75);
    }

    #[test]
    fn test_stamina_defaults() {
        let stamina = Stamina::default();
        assert_eq!(stamina.0.max, 100.0);
        assert_eq!(stamina.0.ratio(), 1.0);
        assert!(!stamina.0.is_exhausted());
    }
}
