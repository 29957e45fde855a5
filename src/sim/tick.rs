//! Fixed timestep simulation tick
//!
//! Moves every round, then resolves each one against the world objects in
//! priority order (target, stone, mirror, hazards). The first overlapping
//! object decides what happens to the round.

use super::physics::advance;
use super::state::{GameEvent, ObjectKind, Projectile, ProjectileKind, Session, World};
use crate::consts::GRAVITY;

/// What a collision does to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Round is removed and the hit is reported
    Destroy,
    /// Round is removed silently
    Absorb,
    /// Round sticks in the object
    Embed,
    /// Round bounces off the vertical axis
    Reflect,
    /// No rule for this pair, round keeps flying
    PassThrough,
}

/// Reaction table indexed by (object, round)
pub fn reaction(object: ObjectKind, round: ProjectileKind) -> Reaction {
    use ObjectKind as O;
    use ProjectileKind as P;

    match (object, round) {
        // Embedded rounds are inert
        (_, P::PistolHitStone) => Reaction::PassThrough,
        (O::Target, _) => Reaction::Destroy,
        (O::Stone, P::Cannon) => Reaction::Destroy,
        (O::Stone, P::Pistol) => Reaction::Embed,
        (O::Stone, P::Laser) => Reaction::PassThrough,
        (O::Mirror, P::Laser) => Reaction::Reflect,
        (O::Mirror, P::Cannon | P::Pistol) => Reaction::Destroy,
        (O::Hazard, _) => Reaction::Absorb,
    }
}

fn hit_event(object: ObjectKind, round: &Projectile) -> Option<GameEvent> {
    let pos = round.pos;
    match object {
        ObjectKind::Target => Some(GameEvent::TargetHit { pos }),
        ObjectKind::Stone => Some(GameEvent::StoneHit { pos }),
        ObjectKind::Mirror => Some(GameEvent::MirrorHit { pos }),
        ObjectKind::Hazard => None,
    }
}

/// Resolve one round against the world. Returns false if the round is spent.
fn resolve(round: &mut Projectile, world: &World, events: &mut Vec<GameEvent>) -> bool {
    if round.kind == ProjectileKind::PistolHitStone {
        return true;
    }
    let Some(object) = world.first_hit(&round.rect()) else {
        return true;
    };

    match reaction(object.kind, round.kind) {
        Reaction::Destroy => {
            if let Some(event) = hit_event(object.kind, round) {
                log::debug!("{:?} round hit {:?} at {}", round.kind, object.kind, round.pos);
                events.push(event);
            }
            false
        }
        Reaction::Absorb => false,
        Reaction::Embed => {
            round.embed();
            true
        }
        Reaction::Reflect => {
            round.reflect_x();
            true
        }
        Reaction::PassThrough => true,
    }
}

/// Advance all rounds by one fixed timestep and collect the resulting events
///
/// Does nothing unless the session is active. Physics runs for every round
/// before any collision is resolved, so collisions see post-move positions.
/// Rounds that leave play (bounds, laser range, embed expiry) are dropped last.
pub fn step(
    session: &Session,
    projectiles: &mut Vec<Projectile>,
    world: &World,
    dt: f64,
) -> Vec<GameEvent> {
    if !session.is_active() {
        return Vec::new();
    }

    for round in projectiles.iter_mut() {
        *round = advance(round, dt, GRAVITY);
    }

    let mut events = Vec::new();
    projectiles.retain_mut(|round| resolve(round, world, &mut events));
    projectiles.retain(Projectile::in_play);

    events
}
