//! Game state and core simulation types
//!
//! Everything the renderer reads each frame lives here: the session counters,
//! the world objects and the rounds in flight.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::velocity_from_angle;

/// Player weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    Cannon,
    Pistol,
    Laser,
}

impl Weapon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weapon::Cannon => "cannon",
            Weapon::Pistol => "pistol",
            Weapon::Laser => "laser",
        }
    }

    /// Where the weapon sits on screen; shots leave from the far end of it
    pub fn mount(&self) -> Rect {
        match self {
            Weapon::Cannon => Rect::new(10.0, 40.0, 150.0, 67.0),
            Weapon::Pistol | Weapon::Laser => Rect::new(10.0, 40.0, 150.0, 50.0),
        }
    }

    pub fn round_kind(&self) -> ProjectileKind {
        match self {
            Weapon::Cannon => ProjectileKind::Cannon,
            Weapon::Pistol => ProjectileKind::Pistol,
            Weapon::Laser => ProjectileKind::Laser,
        }
    }

    /// Muzzle speed; only the cannon honours the configurable bullet speed
    pub fn muzzle_speed(&self, bullet_speed: f64) -> f64 {
        match self {
            Weapon::Cannon => bullet_speed,
            Weapon::Pistol => PISTOL_VEL,
            Weapon::Laser => LASER_VEL,
        }
    }

    /// Pistol and laser rounds fly straight; the cannon lobs
    pub fn is_straight_line(&self) -> bool {
        !matches!(self, Weapon::Cannon)
    }
}

/// Round type, drives physics and reaction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Cannon,
    Pistol,
    Laser,
    /// Pistol round stuck in the stone (stationary, no longer collides)
    PistolHitStone,
}

impl ProjectileKind {
    pub fn size(&self) -> DVec2 {
        let (w, h) = match self {
            ProjectileKind::Cannon => CANNON_ROUND_SIZE,
            _ => SMALL_ROUND_SIZE,
        };
        DVec2::new(w, h)
    }
}

/// A round in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Bottom-left corner
    pub pos: DVec2,
    pub vel: DVec2,
    pub kind: ProjectileKind,
    /// Render rotation in degrees (pistol and laser only)
    pub facing_angle: Option<f64>,
    /// Distance covered so far
    pub traveled: f64,
    /// Seconds left while embedded
    pub embed_ttl: f64,
}

impl Projectile {
    pub fn new(kind: ProjectileKind, pos: DVec2, vel: DVec2) -> Self {
        Self {
            pos,
            vel,
            kind,
            facing_angle: None,
            traveled: 0.0,
            embed_ttl: 0.0,
        }
    }

    /// Spawn a round at the muzzle of `weapon` aimed at `aim_deg`
    pub fn fire(weapon: Weapon, aim_deg: f64, bullet_speed: f64) -> Self {
        let mount = weapon.mount();
        let muzzle = mount.center() + velocity_from_angle(aim_deg, mount.w / 2.0);
        let vel = velocity_from_angle(aim_deg, weapon.muzzle_speed(bullet_speed));

        let mut round = Self::new(weapon.round_kind(), muzzle, vel);
        if weapon.is_straight_line() {
            round.facing_angle = Some(aim_deg);
        }
        round
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.kind.size()
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size())
    }

    /// Stick into the stone: stop moving and start the embed countdown
    pub fn embed(&mut self) {
        self.kind = ProjectileKind::PistolHitStone;
        self.vel = DVec2::ZERO;
        self.embed_ttl = EMBED_LIFETIME;
    }

    /// Mirror bounce (vertical mirror axis)
    pub fn reflect_x(&mut self) {
        self.vel.x = -self.vel.x;
    }

    /// Still inside play bounds and within its range/lifetime budget
    pub fn in_play(&self) -> bool {
        let r = self.rect();
        if r.right() < 0.0 || r.x > SCREEN_WIDTH || r.top() < 0.0 {
            return false;
        }
        // Cannon rounds come back down, everything else is gone for good
        if self.kind != ProjectileKind::Cannon && r.y > SCREEN_HEIGHT {
            return false;
        }
        match self.kind {
            ProjectileKind::Laser => self.traveled <= LASER_DIST,
            ProjectileKind::PistolHitStone => self.embed_ttl > 0.0,
            ProjectileKind::Cannon | ProjectileKind::Pistol => true,
        }
    }
}

/// World object types, in collision priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Target,
    Stone,
    Mirror,
    /// Decorative sink, swallows rounds silently
    Hazard,
}

/// A world object (bounding box + kind)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub kind: ObjectKind,
    pub rect: Rect,
}

impl WorldObject {
    pub fn new(kind: ObjectKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            rect: Rect::new(x, y, OBJECT_SIZE, OBJECT_SIZE),
        }
    }

    pub fn move_to(&mut self, pos: DVec2) {
        self.rect.x = pos.x;
        self.rect.y = pos.y;
    }
}

/// Pick a spawn point inside the spawn margin (integer coordinates)
pub fn random_position<R: Rng + ?Sized>(rng: &mut R) -> DVec2 {
    let x = rng.random_range(SPAWN_MARGIN as i64..=(SCREEN_WIDTH - SPAWN_MARGIN) as i64);
    let y = rng.random_range(SPAWN_MARGIN as i64..=(SCREEN_HEIGHT - SPAWN_MARGIN) as i64);
    DVec2::new(x as f64, y as f64)
}

/// The objects rounds can run into
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub target: WorldObject,
    pub stone: WorldObject,
    pub mirror: WorldObject,
    pub hazards: Vec<WorldObject>,
}

impl World {
    /// Default layout, hazards scattered with `rng`
    pub fn new<R: Rng + ?Sized>(rng: &mut R, hazard_count: usize) -> Self {
        let hazards = (0..hazard_count)
            .map(|_| {
                let pos = random_position(rng);
                WorldObject::new(ObjectKind::Hazard, pos.x, pos.y)
            })
            .collect();

        Self {
            target: WorldObject::new(ObjectKind::Target, 800.0, 300.0),
            stone: WorldObject::new(ObjectKind::Stone, 600.0, 200.0),
            mirror: WorldObject::new(ObjectKind::Mirror, 400.0, 250.0),
            hazards,
        }
    }

    /// Target, stone, mirror, then each hazard
    pub fn objects_by_priority(&self) -> impl Iterator<Item = &WorldObject> {
        [&self.target, &self.stone, &self.mirror]
            .into_iter()
            .chain(self.hazards.iter())
    }

    /// First object (by priority) overlapping `bbox`
    pub fn first_hit(&self, bbox: &Rect) -> Option<&WorldObject> {
        self.objects_by_priority().find(|o| o.rect.overlaps(bbox))
    }

    /// Move every object of `kind` to a fresh random spot
    pub fn respawn<R: Rng + ?Sized>(&mut self, kind: ObjectKind, rng: &mut R) {
        match kind {
            ObjectKind::Target => self.target.move_to(random_position(rng)),
            ObjectKind::Stone => self.stone.move_to(random_position(rng)),
            ObjectKind::Mirror => self.mirror.move_to(random_position(rng)),
            ObjectKind::Hazard => {
                for hazard in &mut self.hazards {
                    hazard.move_to(random_position(rng));
                }
            }
        }
        log::debug!("Respawned {:?}", kind);
    }
}

/// Something a round did this tick that the session reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    TargetHit { pos: DVec2 },
    StoneHit { pos: DVec2 },
    MirrorHit { pos: DVec2 },
}

impl GameEvent {
    pub fn pos(&self) -> DVec2 {
        match *self {
            GameEvent::TargetHit { pos }
            | GameEvent::StoneHit { pos }
            | GameEvent::MirrorHit { pos } => pos,
        }
    }

    /// Object that gets respawned in response
    pub fn object(&self) -> ObjectKind {
        match self {
            GameEvent::TargetHit { .. } => ObjectKind::Target,
            GameEvent::StoneHit { .. } => ObjectKind::Stone,
            GameEvent::MirrorHit { .. } => ObjectKind::Mirror,
        }
    }
}

/// Short-lived explosion marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: DVec2,
    /// Game clock (seconds) when it was armed
    pub started_at: f64,
}

impl Explosion {
    pub fn is_expired(&self, now: f64) -> bool {
        // Clock is a sum of fixed steps, allow for rounding
        now - self.started_at >= EXPLOSION_DURATION - 1e-9
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Not started yet
    Idle,
    /// Clock running, rounds flying
    Active,
    /// Back in the menu with time left on the clock
    Paused,
    /// Clock ran out
    GameOver,
}

/// Counters, aim and weapon for one play-through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: SessionPhase,
    /// Degrees, within [MIN_AIM_ANGLE, MAX_AIM_ANGLE]
    pub aim_angle: f64,
    pub weapon: Weapon,
    /// Cannon muzzle speed
    pub bullet_speed: f64,
    pub score: u32,
    pub shots: u32,
    pub hits: u32,
    /// Whole seconds left on the clock
    pub time_left: i32,
    pub explosion: Option<Explosion>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            aim_angle: 0.0,
            weapon: Weapon::Cannon,
            bullet_speed: DEFAULT_BULLET_SPEED,
            score: 0,
            shots: 0,
            hits: 0,
            time_left: GAME_TIME,
            explosion: None,
        }
    }
}

impl Session {
    pub fn new(weapon: Weapon, bullet_speed: f64) -> Self {
        Self {
            weapon,
            bullet_speed,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Fresh start: zero the counters and refill the clock
    pub fn begin(&mut self) {
        self.score = 0;
        self.shots = 0;
        self.hits = 0;
        self.time_left = GAME_TIME;
        self.explosion = None;
        self.phase = SessionPhase::Active;
    }

    pub fn set_aim_angle(&mut self, angle: f64) {
        self.aim_angle = angle.clamp(MIN_AIM_ANGLE, MAX_AIM_ANGLE);
    }

    pub fn rotate_aim(&mut self, delta: f64) {
        self.set_aim_angle(self.aim_angle + delta);
    }

    pub fn set_weapon(&mut self, weapon: Weapon) {
        self.weapon = weapon;
    }

    /// Parse a bullet speed typed by the player, falling back to the default
    pub fn set_bullet_speed(&mut self, input: &str) {
        self.bullet_speed = match input.trim().parse::<i32>() {
            Ok(speed) => speed as f64,
            Err(_) => {
                log::debug!("Invalid bullet speed {:?}, using default", input);
                DEFAULT_BULLET_SPEED
            }
        };
    }

    pub fn record_shot(&mut self) {
        self.shots += 1;
    }

    /// Score the event and arm the explosion
    pub fn apply_event(&mut self, event: &GameEvent, now: f64) {
        if let GameEvent::TargetHit { .. } = event {
            self.score += 1;
            self.hits += 1;
        }
        self.explosion = Some(Explosion {
            pos: event.pos(),
            started_at: now,
        });
    }

    pub fn clear_expired_explosion(&mut self, now: f64) {
        if self.explosion.is_some_and(|e| e.is_expired(now)) {
            self.explosion = None;
        }
    }

    /// One second off the clock. Returns true on the tick that ends the session.
    pub fn countdown_tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.time_left -= 1;
        if self.time_left <= 0 {
            self.phase = SessionPhase::GameOver;
            return true;
        }
        false
    }

    /// hits / shots, 0 when nothing was fired
    pub fn accuracy(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.hits as f64 / self.shots as f64
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
