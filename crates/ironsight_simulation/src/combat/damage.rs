//! Damage events и death handling

use bevy::prelude::*;

/// Событие: урон нанесён
///
/// Генерируется ПОСЛЕ применения к Health. Для HUD, звуков, эффектов host'а.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health достиг нуля)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Маркер: entity мертв
///
/// Деспавн не автоматический — труп остаётся для host'а (death animation).
#[derive(Component, Debug)]
pub struct Dead;

/// Система: пометить умерших маркером Dead
pub fn mark_dead(mut commands: Commands, mut died_events: EventReader<EntityDied>) {
    for event in died_events.read() {
        commands.entity(event.entity).insert(Dead);
    }
}
