//! Player control marker component

use bevy::prelude::Component;

/// Marker для entity, управляемого игроком
///
/// Input-системы используют `With<Player>` filter; в single-player сцене
/// компонент несёт ровно один entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
