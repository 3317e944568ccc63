//! Combat — hitscan-оружие, брошенные бомбы, применение урона
//!
//! Разделение ответственности:
//! - Симуляция: ammo/reload state, cooldown gates, заряды бомб, отдача,
//!   damage calculation, пулы инстансов
//! - Host engine: ray/line intersection против мира, полёт бомбы (rigid body),
//!   collision detection
//! - Events: HitscanFired / BombLaunched (симуляция → host),
//!   HitscanHit / BombImpacted (host → симуляция)

pub mod bomb;
pub mod damage;
pub mod weapon;

pub use bomb::{
    recharge_bombs, throw_bomb, process_bomb_impacts, tick_bomb_pool, BombBag, BombImpacted,
    BombLaunched, BombPool, Explosion, PooledBomb,
};
pub use damage::{mark_dead, DamageDealt, Dead, EntityDied};
pub use weapon::{
    fire_weapon, process_hitscan_hits, tick_reloads, HitscanFired, HitscanGun, HitscanHit,
    Magazine,
};
