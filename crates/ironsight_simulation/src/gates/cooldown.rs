//! Cooldown — timestamp-based rate limiter
//!
//! В отличие от countdown-таймеров, хранит момент последнего срабатывания и
//! сравнивает с текущим временем симуляции (`Time::elapsed_secs`). Не требует
//! tick(dt) — готовность вычисляется лениво.

use bevy::prelude::*;

/// Rate limiter для действия (выстрел, бросок, reload)
///
/// Инвариант: действие срабатывает только когда
/// `now - last_trigger >= min_interval`.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct Cooldown {
    /// Минимальный интервал между срабатываниями (секунды)
    pub min_interval: f32,
    last_trigger: f32,
}

impl Cooldown {
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            // «Никогда не срабатывал» — первый trigger всегда проходит
            last_trigger: f32::NEG_INFINITY,
        }
    }

    /// Попытка срабатывания: true и обновление timestamp, либо false без мутаций
    pub fn try_trigger(&mut self, now: f32) -> bool {
        if now - self.last_trigger < self.min_interval {
            return false;
        }
        self.last_trigger = now;
        true
    }

    pub fn ready(&self, now: f32) -> bool {
        now - self.last_trigger >= self.min_interval
    }

    /// Сколько осталось до готовности (0.0 если готов)
    pub fn remaining(&self, now: f32) -> f32 {
        (self.min_interval - (now - self.last_trigger)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_trigger_always_passes() {
        let mut cd = Cooldown::new(0.5);
        assert!(cd.ready(0.0));
        assert!(cd.try_trigger(0.0));
    }

    #[test]
    fn test_retrigger_inside_interval_rejected() {
        let mut cd = Cooldown::new(0.5);

        assert!(cd.try_trigger(0.0));
        assert!(!cd.try_trigger(0.3)); // 0.3 < 0.5
        assert!(cd.try_trigger(0.6)); // 0.6 ≥ 0.5
    }

    #[test]
    fn test_failed_trigger_does_not_mutate() {
        let mut cd = Cooldown::new(1.0);
        assert!(cd.try_trigger(0.0));

        // Отказ не сдвигает last_trigger: готовность наступает в t=1.0, не позже
        assert!(!cd.try_trigger(0.9));
        assert!(cd.try_trigger(1.0));
    }

    #[test]
    fn test_remaining() {
        let mut cd = Cooldown::new(2.0);
        cd.try_trigger(1.0);

        assert_eq!(cd.remaining(1.5), 1.5);
        assert_eq!(cd.remaining(3.0), 0.0);
        assert_eq!(cd.remaining(10.0), 0.0);
    }
}
