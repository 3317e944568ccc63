//! Пулы визуальных эффектов + отложенный возврат
//!
//! Симуляция владеет lifecycle'ом эффектов (какой, где, сколько живёт);
//! host engine зеркалит активные инстансы в свои particle-ноды.
//!
//! Отложенный возврат — one-shot отсчёт против tick clock, БЕЗ отмены:
//! если handle был принудительно переиспользован до истечения таймера,
//! возврат всё равно сработает и оборвёт жизнь нового инстанса. Известный
//! hazard, унаследованный от исходного дизайна; повторный release того же
//! handle при этом громко логируется и free list не портится.

use bevy::prelude::*;

use crate::logger;
use crate::pool::{ObjectPool, PoolHandle, PoolHooks};

/// Сколько живёт muzzle flash до возврата в пул (секунды)
pub const MUZZLE_FLASH_LIFETIME: f32 = 0.5;
/// Сколько живёт hit-эффект до возврата в пул (секунды)
pub const IMPACT_LIFETIME: f32 = 1.0;
/// Сколько живёт не-pooled взрыв до despawn'а (секунды)
pub const EXPLOSION_LIFETIME: f32 = 2.0;

const EFFECT_POOL_CAPACITY: usize = 10;
const EFFECT_POOL_MAX: usize = 30;

/// Вид pooled-эффекта (какой из пулов владеет handle'ом)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    MuzzleFlash,
    Impact,
}

/// Pooled particle-инстанс
#[derive(Debug, Clone)]
pub struct PooledEffect {
    pub translation: Vec3,
    pub rotation: Quat,
    /// Активен ли particle playback (host зеркалит в ParticleSystem)
    pub playing: bool,
}

impl Default for PooledEffect {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            playing: false,
        }
    }
}

/// Hooks пула эффектов: activate/deactivate playback
pub struct EffectHooks;

impl PoolHooks<PooledEffect> for EffectHooks {
    fn create(&mut self) -> PooledEffect {
        PooledEffect::default()
    }

    fn on_acquire(&mut self, item: &mut PooledEffect) {
        item.playing = true;
    }

    fn on_release(&mut self, item: &mut PooledEffect) {
        item.playing = false;
    }
}

/// Запланированный one-shot возврат в пул
#[derive(Debug, Clone, Copy)]
pub struct DeferredRelease {
    pub kind: EffectKind,
    pub handle: PoolHandle,
    pub remaining: f32,
}

/// Пулы эффектов (строятся composition root'ом, инъектируются как resource)
#[derive(Resource)]
pub struct EffectPools {
    pub muzzle_flash: ObjectPool<PooledEffect, EffectHooks>,
    pub impact: ObjectPool<PooledEffect, EffectHooks>,
    pending: Vec<DeferredRelease>,
}

impl Default for EffectPools {
    fn default() -> Self {
        let mut muzzle_flash = ObjectPool::new(EffectHooks, EFFECT_POOL_CAPACITY, EFFECT_POOL_MAX);
        let mut impact = ObjectPool::new(EffectHooks, EFFECT_POOL_CAPACITY, EFFECT_POOL_MAX);
        muzzle_flash.prewarm_default();
        impact.prewarm_default();

        Self {
            muzzle_flash,
            impact,
            pending: Vec::new(),
        }
    }
}

impl EffectPools {
    /// Muzzle flash в точке выстрела; вернётся в пул через 0.5 sec
    pub fn spawn_muzzle_flash(&mut self, translation: Vec3, rotation: Quat) -> PoolHandle {
        let handle = self.muzzle_flash.acquire();
        if let Some(effect) = self.muzzle_flash.get_mut(handle) {
            effect.translation = translation;
            effect.rotation = rotation;
        }
        self.pending.push(DeferredRelease {
            kind: EffectKind::MuzzleFlash,
            handle,
            remaining: MUZZLE_FLASH_LIFETIME,
        });
        handle
    }

    /// Hit-эффект в точке попадания (rotation — вдоль нормали поверхности);
    /// вернётся в пул через 1.0 sec
    pub fn spawn_impact(&mut self, translation: Vec3, rotation: Quat) -> PoolHandle {
        let handle = self.impact.acquire();
        if let Some(effect) = self.impact.get_mut(handle) {
            effect.translation = translation;
            effect.rotation = rotation;
        }
        self.pending.push(DeferredRelease {
            kind: EffectKind::Impact,
            handle,
            remaining: IMPACT_LIFETIME,
        });
        handle
    }

    /// Отсчёт отложенных возвратов (раз в tick)
    pub fn tick(&mut self, dt: f32) {
        let mut due = Vec::new();
        self.pending.retain_mut(|entry| {
            entry.remaining -= dt;
            if entry.remaining <= 0.0 {
                due.push(*entry);
                false
            } else {
                true
            }
        });

        for entry in due {
            let result = match entry.kind {
                EffectKind::MuzzleFlash => self.muzzle_flash.release(entry.handle),
                EffectKind::Impact => self.impact.release(entry.handle),
            };
            if let Err(e) = result {
                // Хэндл успели вернуть/уничтожить раньше таймера
                logger::log_error(&format!("effect pool deferred release: {e}"));
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Система: отсчёт отложенных возвратов эффектов
pub fn tick_effect_pools(mut pools: ResMut<EffectPools>, time: Res<Time<Fixed>>) {
    pools.tick(time.delta_secs());
}

/// Не-pooled эффект с ограниченным временем жизни (взрывы)
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    pub remaining: f32,
}

impl DespawnAfter {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }
}

/// Система: despawn entity по истечении таймера
pub fn despawn_after_timeout(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut query: Query<(Entity, &mut DespawnAfter)>,
) {
    let dt = time.delta_secs();

    for (entity, mut timer) in query.iter_mut() {
        timer.remaining -= dt;
        if timer.remaining <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
