//! BoundedResource — ограниченный восстанавливаемый ресурс
//!
//! Семантика:
//! - consume_instant: атомарная трата (всё или ничего)
//! - consume_continuous: постепенная трата (спринт и т.п.)
//! - exhaustion latch: после полного истощения ресурс отказывает ДО тех пор,
//!   пока не восстановится выше `max * recovery_threshold` (гистерезис против
//!   дребезга на нулевой границе)
//! - regen: после любой траты запускается `regen_delay`, потом `regen_rate`/sec

use bevy::prelude::*;

/// Ограниченный ресурс с регенерацией и exhaustion latch
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Debug, Clone, Copy, Reflect)]
pub struct BoundedResource {
    pub current: f32,
    pub max: f32,
    /// Восстановление (units per second)
    pub regen_rate: f32,
    /// Пауза после траты до начала регенерации (секунды)
    pub regen_delay: f32,
    /// Доля max, после которой снимается exhaustion latch (0.3 = 30%)
    pub recovery_threshold: f32,

    regen_timer: f32,
    exhausted: bool,
}

impl BoundedResource {
    pub fn new(max: f32, regen_rate: f32, regen_delay: f32, recovery_threshold: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
            regen_delay,
            recovery_threshold,
            regen_timer: 0.0,
            exhausted: false,
        }
    }

    /// Хватает ли ресурса (без траты, без учёта latch)
    pub fn has_enough(&self, amount: f32) -> bool {
        !self.exhausted && self.current >= amount
    }

    /// Атомарная трата: либо списывается ровно `amount`, либо ничего.
    ///
    /// Отказ (false, без мутаций): exhausted latch активен или ресурса меньше
    /// `amount`. Успех взводит regen delay; достижение нуля ставит latch.
    pub fn consume_instant(&mut self, amount: f32) -> bool {
        if self.exhausted || self.current < amount {
            return false;
        }

        self.current -= amount;
        self.regen_timer = self.regen_delay;

        if self.current <= 0.0 {
            self.current = 0.0;
            self.exhausted = true;
        }

        true
    }

    /// Постепенная трата (вызывается с amount уже умноженным на dt).
    ///
    /// Списывает пока ресурс положителен; на нуле ставит exhaustion latch.
    /// Под latch'ем возвращает false без мутаций.
    pub fn consume_continuous(&mut self, amount: f32) -> bool {
        if self.exhausted {
            return false;
        }

        self.current = (self.current - amount).max(0.0);
        self.regen_timer = self.regen_delay;

        if self.current <= 0.0 {
            self.exhausted = true;
        }

        true
    }

    /// Мгновенное восстановление (пикапы и т.п.)
    pub fn recover(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
        self.check_latch_recovery();
    }

    /// Полное восстановление, latch снимается безусловно
    pub fn recover_full(&mut self) {
        self.current = self.max;
        self.exhausted = false;
    }

    /// Один simulation tick: сначала delay, потом regen.
    ///
    /// Полный ресурс сбрасывает delay timer, чтобы следующая трата честно
    /// отсчитала паузу заново.
    pub fn tick(&mut self, dt: f32) {
        if self.current >= self.max {
            self.current = self.max;
            self.regen_timer = 0.0;
            return;
        }

        if self.regen_timer > 0.0 {
            self.regen_timer -= dt;
            return;
        }

        self.current = (self.current + self.regen_rate * dt).min(self.max);
        self.check_latch_recovery();
    }

    /// Доля заполнения [0, 1] — для HUD
    pub fn ratio(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    fn check_latch_recovery(&mut self) {
        if self.exhausted && self.current >= self.max * self.recovery_threshold {
            self.exhausted = false;
        }
    }
}
