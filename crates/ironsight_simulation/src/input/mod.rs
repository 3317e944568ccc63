//! Input surface — сырой ввод, записываемый host engine
//!
//! Симуляция НЕ опрашивает устройства: host каждый тик заполняет
//! [`PlayerInput`] (axis deltas + button edge/level state) и [`GroundContact`]
//! (результат физики персонажа). Edge-флаги и look delta сбрасываются в конце
//! FixedUpdate-цепочки, чтобы одно нажатие срабатывало ровно один раз.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Снимок ввода player'а на текущий tick
///
/// Level-state (held) host держит true пока кнопка зажата;
/// edge-state (pressed) выставляется на один tick.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// WASD-оси: x = strafe, y = вперёд/назад, диапазон [-1, 1]
    pub move_axis: Vec2,
    /// Сырая мышиная delta за tick (ещё без sensitivity)
    pub look_delta: Vec2,

    pub fire_held: bool,
    pub sprint_held: bool,

    pub jump_pressed: bool,
    pub reload_pressed: bool,
    pub throw_pressed: bool,
    pub toggle_view_pressed: bool,
}

/// Контакт с землёй (host physics → симуляция)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct GroundContact {
    pub grounded: bool,
}

/// Сброс edge-флагов и look delta в конце tick'а
pub fn clear_frame_input(mut input: ResMut<PlayerInput>) {
    input.look_delta = Vec2::ZERO;
    input.jump_pressed = false;
    input.reload_pressed = false;
    input.throw_pressed = false;
    input.toggle_view_pressed = false;
}
