//! HUD state — read-only снимок для UI host'а
//!
//! UI-биндеры исходного прототипа читали компоненты каждый кадр и писали в
//! слайдеры/текст. Здесь то же самое, но наоборот: симуляция раз в tick
//! собирает [`HudState`], host рисует его как хочет (слайдеры, текст «30/90»,
//! крестик прицела).
//!
//! Системы синхронизации выполняются ПОСЛЕДНИМИ в цепочке тика — HUD видит
//! состояние после всех consume-операций.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{BombBag, HitscanFired, HitscanGun};
use crate::components::{Health, Stamina};
use crate::Player;

/// Во сколько раз раздувается крестик на выстреле
const CROSSHAIR_EXPAND_SCALE: f32 = 1.2;
/// Скорость возврата крестика к масштабу 1.0
const CROSSHAIR_RECOVER_SPEED: f32 = 10.0;

/// Снимок состояния для HUD (сериализуемый — host может слать его как есть)
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct HudState {
    // Stats panel
    pub health_ratio: f32,
    pub stamina_ratio: f32,
    pub stamina_exhausted: bool,

    // Gun panel («30/90», reload indicator)
    pub magazine_rounds: u32,
    pub reserve_rounds: u32,
    pub reloading: bool,
    pub reload_progress: f32,
    pub crosshair_scale: f32,

    // Bomb panel («3/5», recharge indicator)
    pub bomb_charges: u32,
    pub bomb_max_charges: u32,
    pub bomb_ratio: f32,
    pub recharging: bool,
    pub recharge_progress: f32,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            health_ratio: 1.0,
            stamina_ratio: 1.0,
            stamina_exhausted: false,
            magazine_rounds: 0,
            reserve_rounds: 0,
            reloading: false,
            reload_progress: 1.0,
            crosshair_scale: 1.0,
            bomb_charges: 0,
            bomb_max_charges: 0,
            bomb_ratio: 1.0,
            recharging: false,
            recharge_progress: 1.0,
        }
    }
}

impl HudState {
    /// Текст панели патронов («30/90»)
    pub fn ammo_text(&self) -> String {
        format!("{}/{}", self.magazine_rounds, self.reserve_rounds)
    }

    /// Текст панели бомб («3/5»)
    pub fn bomb_text(&self) -> String {
        format!("{}/{}", self.bomb_charges, self.bomb_max_charges)
    }
}

/// Система: health/stamina → HUD
pub fn sync_stats_hud(
    mut hud: ResMut<HudState>,
    query: Query<(&Health, &Stamina), With<Player>>,
) {
    let Ok((health, stamina)) = query.single() else {
        return;
    };

    hud.health_ratio = health.ratio();
    hud.stamina_ratio = stamina.0.ratio();
    hud.stamina_exhausted = stamina.0.is_exhausted();
}

/// Система: оружие → HUD + анимация крестика
///
/// Крестик раздувается на каждом HitscanFired и возвращается к 1.0
/// экспоненциальным lerp'ом.
pub fn sync_gun_hud(
    mut hud: ResMut<HudState>,
    time: Res<Time<Fixed>>,
    mut fired_events: EventReader<HitscanFired>,
    query: Query<&HitscanGun, With<Player>>,
) {
    let Ok(gun) = query.single() else {
        return;
    };

    hud.magazine_rounds = gun.magazine.rounds;
    hud.reserve_rounds = gun.magazine.reserve;
    hud.reloading = gun.magazine.is_reloading();
    hud.reload_progress = gun.magazine.reload_progress();

    if fired_events.read().next().is_some() {
        hud.crosshair_scale = CROSSHAIR_EXPAND_SCALE;
    }
    let t = (time.delta_secs() * CROSSHAIR_RECOVER_SPEED).min(1.0);
    hud.crosshair_scale += (1.0 - hud.crosshair_scale) * t;
}

/// Система: бомбы → HUD
pub fn sync_bomb_hud(mut hud: ResMut<HudState>, query: Query<&BombBag, With<Player>>) {
    let Ok(bag) = query.single() else {
        return;
    };

    hud.bomb_charges = bag.charges;
    hud.bomb_max_charges = bag.max_charges;
    hud.bomb_ratio = bag.ratio();
    hud.recharging = bag.charges < bag.max_charges;
    hud.recharge_progress = bag.recharge_progress();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ammo_text_format() {
        let hud = HudState {
            magazine_rounds: 30,
            reserve_rounds: 90,
            ..Default::default()
        };
        assert_eq!(hud.ammo_text(), "30/90");
    }

    #[test]
    fn test_bomb_text_format() {
        let hud = HudState {
            bomb_charges: 3,
            bomb_max_charges: 5,
            ..Default::default()
        };
        assert_eq!(hud.bomb_text(), "3/5");
    }

    #[test]
    fn test_crosshair_recovers_towards_one() {
        let mut scale = CROSSHAIR_EXPAND_SCALE;
        let dt = 1.0 / 60.0;

        for _ in 0..60 {
            let t = (dt * CROSSHAIR_RECOVER_SPEED).min(1.0);
            scale += (1.0 - scale) * t;
        }

        assert!((scale - 1.0).abs() < 1e-3);
        assert!(scale >= 1.0);
    }
}
