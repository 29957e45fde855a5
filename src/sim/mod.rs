//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod physics;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Rect, collides};
pub use physics::advance;
pub use state::{
    Explosion, GameEvent, ObjectKind, Projectile, ProjectileKind, RngState, Session, SessionPhase,
    Weapon, World, WorldObject, random_position,
};
pub use tick::{Reaction, reaction, step};
pub use timer::{Interval, Scheduled};
