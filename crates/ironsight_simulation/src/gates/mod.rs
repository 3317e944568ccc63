//! Generic gates — переиспользуемые «ресурсные ворота»
//!
//! Все расходуемые ресурсы прототипа (stamina, патроны, заряды бомб) и все
//! rate-limit'ы (выстрел, бросок) построены на двух примитивах:
//! - [`BoundedResource`] — ограниченный ресурс с regen delay и exhaustion latch
//! - [`Cooldown`] — timestamp-based rate limiter
//!
//! Контракт ordering: `tick(dt)` каждого gate вызывается ОДИН раз за
//! simulation tick, ДО любых consume-операций этого тика (см. SimulationPlugin).

pub mod cooldown;
pub mod resource;

pub use cooldown::Cooldown;
pub use resource::BoundedResource;
