//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Health, Stamina)
//! - player: player control marker (Player)
//! - camera: camera rig (CameraMode, CameraRig, first/third person toggle)

pub mod actor;
pub mod camera;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use camera::*;
pub use player::*;
