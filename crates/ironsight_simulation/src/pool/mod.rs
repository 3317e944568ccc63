//! Generic object pool — bounded free-list переиспользуемых инстансов
//!
//! Архитектура:
//! - Пул владеет всеми инстансами, наружу отдаются только [`PoolHandle`]
//! - Lifecycle hooks — явный trait [`PoolHooks`] с четырьмя операциями
//!   (create / on_acquire / on_release / on_destroy), по одной реализации на
//!   pooled-тип
//! - Никаких глобальных реестров: composition root строит пул и кладёт его в
//!   ECS resource, потребители получают его через DI
//!
//! Семантика размеров:
//! - `default_capacity` управляет только prewarm
//! - `max_size` ограничивает free list: release поверх лимита УНИЧТОЖАЕТ
//!   инстанс вместо возврата (это не ошибка)
//! - acquire никогда не отказывает — пул растёт по требованию
//!
//! Повторный release одного handle — ошибка вызывающего: возвращается
//! [`PoolError`], free list не повреждается.

use std::fmt;

/// Lifecycle hooks для pooled-типа
///
/// Дефолтные no-op реализации — переопределяется только нужное.
pub trait PoolHooks<T> {
    /// Создать новый инстанс (пул пуст, лимит не достигнут)
    fn create(&mut self) -> T;

    /// Инстанс выдан из пула (активация, сброс transient-полей)
    fn on_acquire(&mut self, _item: &mut T) {}

    /// Инстанс вернулся в пул (деактивация)
    fn on_release(&mut self, _item: &mut T) {}

    /// Инстанс уничтожен (free list переполнен лимитом max_size)
    fn on_destroy(&mut self, _item: T) {}
}

/// Handle на pooled-инстанс (индекс слота)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(usize);

impl PoolHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ошибки release (единственный «громкий» отказ пула)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Handle уже free — двойной release со стороны вызывающего
    AlreadyReleased(PoolHandle),
    /// Инстанс был уничтожен при переполнении либо handle не существует
    InvalidHandle(PoolHandle),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::AlreadyReleased(h) => write!(f, "double release of pooled instance {h}"),
            PoolError::InvalidHandle(h) => write!(f, "invalid pool handle {h}"),
        }
    }
}

impl std::error::Error for PoolError {}

/// Состояние слота
///
/// Free → (acquire) → InUse → (release, free list < max) → Free
/// InUse → (release, free list = max) → Destroyed (терминальное)
enum Slot<T> {
    Free(T),
    InUse(T),
    Destroyed,
}

/// Bounded пул переиспользуемых инстансов
pub struct ObjectPool<T, H: PoolHooks<T>> {
    hooks: H,
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    default_capacity: usize,
    max_size: usize,
    created_total: usize,
}

impl<T, H: PoolHooks<T>> ObjectPool<T, H> {
    pub fn new(hooks: H, default_capacity: usize, max_size: usize) -> Self {
        Self {
            hooks,
            slots: Vec::with_capacity(default_capacity),
            free: Vec::with_capacity(default_capacity),
            default_capacity,
            max_size,
            created_total: 0,
        }
    }

    /// Выдать инстанс: из free list, либо создать новый.
    ///
    /// Никогда не отказывает — max_size ограничивает только free list.
    pub fn acquire(&mut self) -> PoolHandle {
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                if let Slot::Free(item) = std::mem::replace(slot, Slot::Destroyed) {
                    *slot = Slot::InUse(item);
                }
                index
            }
            None => {
                let item = self.hooks.create();
                self.created_total += 1;
                self.slots.push(Slot::InUse(item));
                self.slots.len() - 1
            }
        };

        if let Slot::InUse(item) = &mut self.slots[index] {
            self.hooks.on_acquire(item);
        }

        PoolHandle(index)
    }

    /// Вернуть инстанс. При переполнении free list инстанс уничтожается.
    ///
    /// Двойной release — ошибка вызывающего: Err, free list не трогается.
    pub fn release(&mut self, handle: PoolHandle) -> Result<(), PoolError> {
        let slot = self
            .slots
            .get_mut(handle.0)
            .ok_or(PoolError::InvalidHandle(handle))?;

        match slot {
            Slot::Free(_) => return Err(PoolError::AlreadyReleased(handle)),
            Slot::Destroyed => return Err(PoolError::InvalidHandle(handle)),
            Slot::InUse(item) => {
                self.hooks.on_release(item);
            }
        }

        if self.free.len() >= self.max_size {
            // Переполнение — терминальное уничтожение вместо возврата
            if let Slot::InUse(item) = std::mem::replace(slot, Slot::Destroyed) {
                self.hooks.on_destroy(item);
            }
        } else if let Slot::InUse(item) = std::mem::replace(slot, Slot::Destroyed) {
            *slot = Slot::Free(item);
            self.free.push(handle.0);
        }

        Ok(())
    }

    /// Prewarm: acquire × n, затем release × n — n конструкций вперёд
    pub fn prewarm(&mut self, n: usize) {
        let handles: Vec<PoolHandle> = (0..n).map(|_| self.acquire()).collect();
        for handle in handles {
            // Свежевыданные handle валидны по построению
            let _ = self.release(handle);
        }
    }

    /// Prewarm на default_capacity
    pub fn prewarm_default(&mut self) {
        self.prewarm(self.default_capacity);
    }

    /// Доступ к активному инстансу (None для free/destroyed)
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        match self.slots.get_mut(handle.0) {
            Some(Slot::InUse(item)) => Some(item),
            _ => None,
        }
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        match self.slots.get(handle.0) {
            Some(Slot::InUse(item)) => Some(item),
            _ => None,
        }
    }

    pub fn is_active(&self, handle: PoolHandle) -> bool {
        matches!(self.slots.get(handle.0), Some(Slot::InUse(_)))
    }

    pub fn count_free(&self) -> usize {
        self.free.len()
    }

    pub fn count_active(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::InUse(_)))
            .count()
    }

    /// Живые инстансы (free + in use), без уничтоженных
    pub fn count_live(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| !matches!(s, Slot::Destroyed))
            .count()
    }

    /// Сколько инстансов было создано за всё время
    pub fn created_total(&self) -> usize {
        self.created_total
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        created: usize,
        destroyed: usize,
        acquired: usize,
        released: usize,
    }

    struct CountingHooks(Counter);

    impl CountingHooks {
        fn new() -> Self {
            Self(Counter {
                created: 0,
                destroyed: 0,
                acquired: 0,
                released: 0,
            })
        }
    }

    /// Pooled-инстанс с transient-полем, сбрасываемым в on_acquire
    #[derive(Debug, PartialEq)]
    struct Dummy {
        id: usize,
        dirty: bool,
    }

    impl PoolHooks<Dummy> for CountingHooks {
        fn create(&mut self) -> Dummy {
            self.0.created += 1;
            Dummy {
                id: self.0.created,
                dirty: false,
            }
        }

        fn on_acquire(&mut self, item: &mut Dummy) {
            self.0.acquired += 1;
            item.dirty = false;
        }

        fn on_release(&mut self, item: &mut Dummy) {
            self.0.released += 1;
            item.dirty = true;
        }

        fn on_destroy(&mut self, _item: Dummy) {
            self.0.destroyed += 1;
        }
    }

    #[test]
    fn test_prewarm_then_acquire_reuses() {
        // defaultCapacity 10, maxSize 20: prewarm(10), acquire ×15
        let mut pool = ObjectPool::new(CountingHooks::new(), 10, 20);
        pool.prewarm_default();
        assert_eq!(pool.created_total(), 10);
        assert_eq!(pool.count_free(), 10);

        let handles: Vec<_> = (0..15).map(|_| pool.acquire()).collect();

        // 10 переиспользовано + 5 создано заново
        assert_eq!(pool.created_total(), 15);
        assert_eq!(pool.count_active(), 15);
        assert_eq!(pool.count_free(), 0);
        assert!(handles.iter().all(|h| pool.is_active(*h)));
    }

    #[test]
    fn test_release_recycles_and_resets() {
        let mut pool = ObjectPool::new(CountingHooks::new(), 4, 8);

        let h = pool.acquire();
        pool.get_mut(h).unwrap().dirty = true;
        pool.release(h).unwrap();

        // Тот же слот, transient-поле сброшено on_acquire
        let h2 = pool.acquire();
        assert_eq!(h2, h);
        assert!(!pool.get(h2).unwrap().dirty);
    }

    #[test]
    fn test_double_release_fails_loudly() {
        let mut pool = ObjectPool::new(CountingHooks::new(), 4, 8);

        let h = pool.acquire();
        assert!(pool.release(h).is_ok());
        assert_eq!(
            pool.release(h),
            Err(PoolError::AlreadyReleased(h))
        );

        // Free list не повреждён: один инстанс, один acquire
        assert_eq!(pool.count_free(), 1);
        pool.acquire();
        assert_eq!(pool.count_free(), 0);
    }

    #[test]
    fn test_overflow_destroys_instead_of_recycling() {
        let mut pool = ObjectPool::new(CountingHooks::new(), 2, 2);

        let handles: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        assert_eq!(pool.count_active(), 5);

        for h in handles {
            pool.release(h).unwrap();
        }

        // max_size = 2: два вернулись в free list, три уничтожено
        assert_eq!(pool.count_free(), 2);
        assert_eq!(pool.count_live(), 2);
        assert_eq!(pool.hooks.0.destroyed, 3);

        // Release уничтоженного handle — InvalidHandle
        let h = pool.acquire();
        pool.release(h).unwrap();
        assert!(matches!(
            pool.release(h),
            Err(PoolError::AlreadyReleased(_))
        ));
    }

    #[test]
    fn test_no_instance_both_free_and_in_use() {
        let mut pool = ObjectPool::new(CountingHooks::new(), 4, 4);
        pool.prewarm_default();

        // Произвольная последовательность acquire/release
        let a = pool.acquire();
        let b = pool.acquire();
        pool.release(a).unwrap();
        let c = pool.acquire();
        pool.release(b).unwrap();
        let _ = c;

        // free + in use покрывают все живые слоты без пересечений
        assert_eq!(pool.count_free() + pool.count_active(), pool.count_live());
        assert!(pool.count_live() <= pool.max_size());
    }

    #[test]
    fn test_acquire_never_fails_beyond_max() {
        let mut pool = ObjectPool::new(CountingHooks::new(), 2, 2);

        // max_size ограничивает только free list, не acquire
        let handles: Vec<_> = (0..10).map(|_| pool.acquire()).collect();
        assert_eq!(pool.count_active(), 10);
        assert_eq!(handles.len(), 10);
    }
}
