//! Round physics
//!
//! Gravity only pulls on cannon rounds; pistol and laser rounds fly straight.

use super::state::{Projectile, ProjectileKind};

/// Advance one round by `dt` seconds under `gravity` (units/s², y-up)
pub fn advance(p: &Projectile, dt: f64, gravity: f64) -> Projectile {
    let mut next = *p;
    match next.kind {
        ProjectileKind::Cannon => next.vel.y += gravity * dt,
        ProjectileKind::Pistol | ProjectileKind::Laser => {}
        ProjectileKind::PistolHitStone => {
            // Stuck in the stone, only the embed countdown moves
            next.embed_ttl -= dt;
            return next;
        }
    }

    let step = next.vel * dt;
    next.pos += step;
    next.traveled += step.length();
    next
}
