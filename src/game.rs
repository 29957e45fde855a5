//! One owned game instance
//!
//! `Game` ties the simulation to the outside world: it owns the session, the
//! world, the rounds in flight, the seeded RNG, the session's timers and the
//! score store. The UI calls the `on_*` entry points and drives time with
//! [`Game::update`]; everything runs on the caller's thread.

use rand_pcg::Pcg32;

use crate::consts::*;
use crate::highscores::{HighScores, ScoreEntry, ScoreStore};
use crate::persistence::PersistenceError;
use crate::settings::Settings;
use crate::sim::{
    Interval, ObjectKind, Projectile, ProjectileKind, RngState, Scheduled, Session, SessionPhase,
    Weapon, World, step,
};
use crate::{format_timestamp, unix_now};

/// Which way the aim is being held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimDirection {
    /// Counter-clockwise steps (angle goes down)
    Left,
    /// Angle goes up
    Right,
}

impl AimDirection {
    fn step(&self) -> f64 {
        match self {
            AimDirection::Left => -AIM_STEP,
            AimDirection::Right => AIM_STEP,
        }
    }
}

#[derive(Debug, Clone)]
struct AimRepeat {
    direction: AimDirection,
    interval: Interval,
}

/// Game instance holding all state
pub struct Game<S: ScoreStore> {
    pub session: Session,
    pub world: World,
    pub projectiles: Vec<Projectile>,
    settings: Settings,
    seed: u64,
    rng: Pcg32,
    /// Simulated seconds since the instance was built
    clock: f64,
    accumulator: f64,
    countdown: Scheduled<Interval>,
    aim: Scheduled<AimRepeat>,
    store: S,
}

impl<S: ScoreStore> Game<S> {
    /// Build a fresh instance and make sure the score table exists
    pub fn new(settings: Settings, mut store: S) -> Result<Self, PersistenceError> {
        store.ensure_schema()?;

        let seed = settings.seed.unwrap_or_else(unix_now);
        let mut rng = RngState::new(seed).to_rng();
        let world = World::new(&mut rng, settings.hazard_count);
        let session = Session::new(settings.weapon, settings.bullet_speed as f64);
        log::info!("Game initialized with seed: {}", seed);

        Ok(Self {
            session,
            world,
            projectiles: Vec::new(),
            settings,
            seed,
            rng,
            clock: 0.0,
            accumulator: 0.0,
            countdown: Scheduled::default(),
            aim: Scheduled::default(),
            store,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direction currently held, if any
    pub fn aim_direction(&self) -> Option<AimDirection> {
        self.aim.get().map(|a| a.direction)
    }

    pub fn high_scores(&self) -> HighScores {
        HighScores::load(&self.store)
    }

    // === Input entry points ===

    pub fn on_aim_left_start(&mut self) {
        self.start_aim(AimDirection::Left);
    }

    pub fn on_aim_left_stop(&mut self) {
        self.stop_aim(AimDirection::Left);
    }

    pub fn on_aim_right_start(&mut self) {
        self.start_aim(AimDirection::Right);
    }

    pub fn on_aim_right_stop(&mut self) {
        self.stop_aim(AimDirection::Right);
    }

    /// Fire the selected weapon. Returns false when no session is running.
    pub fn on_shoot(&mut self) -> bool {
        if !self.session.is_active() {
            return false;
        }
        self.session.record_shot();
        self.projectiles.push(Projectile::fire(
            self.session.weapon,
            self.session.aim_angle,
            self.session.bullet_speed,
        ));
        true
    }

    pub fn on_set_weapon(&mut self, weapon: Weapon) {
        self.session.set_weapon(weapon);
        log::debug!("Weapon set to {}", weapon.as_str());
    }

    pub fn on_set_bullet_speed(&mut self, input: &str) {
        self.session.set_bullet_speed(input);
    }

    /// Fresh start: counters zeroed, clock refilled, countdown armed
    pub fn on_start_game(&mut self) {
        self.stop_timers();
        self.projectiles.clear();
        self.session.begin();
        self.countdown.arm(Interval::new(COUNTDOWN_INTERVAL));
        log::info!("Session started ({}s on the clock)", self.session.time_left);
    }

    /// Resume a session that still has time left. Returns false otherwise.
    pub fn on_continue_game(&mut self) -> bool {
        if self.session.is_over() || self.session.time_left <= 0 {
            return false;
        }
        self.session.phase = SessionPhase::Active;
        if !self.countdown.is_armed() {
            self.countdown.arm(Interval::new(COUNTDOWN_INTERVAL));
        }
        log::info!("Session continued ({}s left)", self.session.time_left);
        true
    }

    /// Tear the instance down to its initial layout and start over
    pub fn on_restart_game(&mut self) {
        self.stop_timers();
        self.world = World::new(&mut self.rng, self.settings.hazard_count);
        self.session = Session::new(self.settings.weapon, self.settings.bullet_speed as f64);
        self.projectiles.clear();
        self.accumulator = 0.0;
        self.on_start_game();
    }

    /// Leave the game screen; the clock stops until the session is continued
    pub fn on_return_to_menu(&mut self) {
        self.stop_timers();
        if self.session.is_active() {
            self.session.phase = SessionPhase::Paused;
        }
        log::info!("Returned to menu ({}s left)", self.session.time_left);
    }

    // === Time ===

    /// Run as many fixed ticks as `frame_dt` covers (capped per frame)
    pub fn update(&mut self, frame_dt: f64) -> Result<(), PersistenceError> {
        if !frame_dt.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", frame_dt);
            return Ok(());
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_SUBSTEPS as f64 * SIM_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.fixed_tick()?;
        }
        Ok(())
    }

    /// Advance exactly one simulation tick
    ///
    /// Order within a tick: aim repeat, round physics and collisions, event
    /// reactions, explosion expiry, countdown. The only error is a failed
    /// score save on the tick that ends the session.
    pub fn fixed_tick(&mut self) -> Result<(), PersistenceError> {
        let dt = SIM_DT;
        self.clock += dt;

        if let Some(aim) = self.aim.get_mut() {
            let steps = aim.interval.tick(dt);
            let delta = aim.direction.step() * steps as f64;
            self.session.rotate_aim(delta);
        }

        let events = step(&self.session, &mut self.projectiles, &self.world, dt);
        for event in &events {
            self.session.apply_event(event, self.clock);
            self.world.respawn(event.object(), &mut self.rng);
            if event.object() == ObjectKind::Stone {
                // Rounds stuck in the stone go with it
                self.projectiles.retain(|p| p.kind != ProjectileKind::PistolHitStone);
            }
        }

        self.session.clear_expired_explosion(self.clock);

        let fired = self.countdown.get_mut().map_or(0, |c| c.tick(dt));
        for _ in 0..fired {
            if self.session.countdown_tick() {
                return self.finish();
            }
        }
        Ok(())
    }

    fn start_aim(&mut self, direction: AimDirection) {
        // Replaces a hold in the other direction
        self.aim.arm(AimRepeat {
            direction,
            interval: Interval::new(AIM_STEP_INTERVAL),
        });
    }

    fn stop_aim(&mut self, direction: AimDirection) {
        if self.aim_direction() == Some(direction) {
            self.aim.cancel();
        }
    }

    fn stop_timers(&mut self) {
        self.countdown.cancel();
        self.aim.cancel();
    }

    /// Clock ran out: freeze and record the session
    fn finish(&mut self) -> Result<(), PersistenceError> {
        self.stop_timers();

        let entry = ScoreEntry {
            score: self.session.score,
            date: format_timestamp(unix_now()),
            shots: self.session.shots,
            hits: self.session.hits,
            accuracy: self.session.accuracy(),
        };
        log::info!(
            "Game over: score {}, {} hits from {} shots (accuracy {:.2})",
            entry.score,
            entry.hits,
            entry.shots,
            entry.accuracy
        );
        self.store.insert(entry)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryScoreStore, ScoreRecord};
    use glam::DVec2;

    fn new_game() -> Game<MemoryScoreStore> {
        let settings = Settings {
            seed: Some(1234),
            ..Settings::default()
        };
        Game::new(settings, MemoryScoreStore::new()).unwrap()
    }

    fn run_ticks<S: ScoreStore>(game: &mut Game<S>, n: usize) {
        for _ in 0..n {
            game.fixed_tick().unwrap();
        }
    }

    fn run_seconds<S: ScoreStore>(game: &mut Game<S>, secs: f64) {
        run_ticks(game, (secs * TICK_RATE as f64).round() as usize);
    }

    /// Pistol rounds at 0° fly along y 65..85
    fn put_target_in_lane<S: ScoreStore>(game: &mut Game<S>) {
        game.world.target.move_to(DVec2::new(300.0, 25.0));
    }

    fn saved(game: &Game<MemoryScoreStore>) -> &[ScoreRecord] {
        &game.store().rows
    }

    #[test]
    fn test_three_hits_then_game_over() {
        let mut game = new_game();
        game.on_set_weapon(Weapon::Pistol);
        game.on_start_game();

        for _ in 0..3 {
            put_target_in_lane(&mut game);
            assert!(game.on_shoot());
            run_ticks(&mut game, 30);
        }
        assert_eq!(
            (game.session.shots, game.session.hits, game.session.score),
            (3, 3, 3)
        );

        run_seconds(&mut game, GAME_TIME as f64 + 1.0);
        assert!(game.session.is_over());

        let rows = saved(&game);
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].shots, rows[0].hits, rows[0].score), (3, 3, 3));
        assert_eq!(rows[0].accuracy, 1.0);
    }

    #[test]
    fn test_misses_then_timer_expires() {
        let mut game = new_game();
        game.on_set_weapon(Weapon::Pistol);
        game.on_start_game();

        assert!(game.on_shoot());
        run_ticks(&mut game, 10);
        assert!(game.on_shoot());

        run_seconds(&mut game, GAME_TIME as f64 + 1.0);
        let rows = saved(&game);
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].shots, rows[0].hits, rows[0].score), (2, 0, 0));
        assert_eq!(rows[0].accuracy, 0.0);
    }

    #[test]
    fn test_no_shots_saves_zero_accuracy() {
        let mut game = new_game();
        game.on_start_game();
        run_seconds(&mut game, GAME_TIME as f64 + 1.0);
        let rows = saved(&game);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].accuracy, 0.0);
    }

    #[test]
    fn test_game_over_happens_once() {
        let mut game = new_game();
        game.on_start_game();
        run_seconds(&mut game, GAME_TIME as f64 + 5.0);
        run_seconds(&mut game, 10.0);

        assert!(game.session.is_over());
        assert_eq!(game.session.time_left, 0);
        assert_eq!(saved(&game).len(), 1);

        // Frozen: no more shots, no continue
        assert!(!game.on_shoot());
        assert_eq!(game.session.shots, 0);
        assert!(!game.on_continue_game());
    }

    #[test]
    fn test_laser_bounces_off_mirror() {
        let mut game = new_game();
        game.on_set_weapon(Weapon::Laser);
        game.on_start_game();
        game.world.mirror.move_to(DVec2::new(305.0, 40.0));

        assert!(game.on_shoot());
        assert_eq!(game.projectiles[0].vel, DVec2::new(600.0, 0.0));

        run_ticks(&mut game, 12);
        assert_eq!(game.projectiles.len(), 1);
        assert_eq!(game.projectiles[0].vel, DVec2::new(-600.0, 0.0));

        run_ticks(&mut game, 1);
        assert_eq!(game.projectiles[0].vel, DVec2::new(-600.0, 0.0));
        assert!(game.session.explosion.is_none());
    }

    #[test]
    fn test_target_hit_respawns_target_and_clears_explosion() {
        let mut game = new_game();
        game.on_set_weapon(Weapon::Pistol);
        game.on_start_game();
        put_target_in_lane(&mut game);
        game.on_shoot();

        let mut ticks = 0;
        while game.session.hits == 0 {
            run_ticks(&mut game, 1);
            ticks += 1;
            assert!(ticks < 60, "round never reached the target");
        }

        let target = game.world.target.rect;
        assert_ne!(target.pos(), DVec2::new(300.0, 25.0));
        assert!(target.x >= SPAWN_MARGIN && target.x <= SCREEN_WIDTH - SPAWN_MARGIN);
        assert!(target.y >= SPAWN_MARGIN && target.y <= SCREEN_HEIGHT - SPAWN_MARGIN);
        assert!(game.projectiles.is_empty());

        assert!(game.session.explosion.is_some());
        run_ticks(&mut game, 29);
        assert!(game.session.explosion.is_some());
        run_ticks(&mut game, 1);
        assert!(game.session.explosion.is_none());
    }

    #[test]
    fn test_hold_to_aim() {
        let mut game = new_game();
        game.on_aim_right_start();
        run_ticks(&mut game, 30);
        let angle = game.session.aim_angle;
        assert!((48.0..=51.0).contains(&angle), "angle {angle}");

        // Stopping the other direction does nothing
        game.on_aim_left_stop();
        assert_eq!(game.aim_direction(), Some(AimDirection::Right));

        // Starting left replaces right
        game.on_aim_left_start();
        assert_eq!(game.aim_direction(), Some(AimDirection::Left));
        run_ticks(&mut game, 6);
        assert!(game.session.aim_angle < angle);

        game.on_aim_left_stop();
        let held = game.session.aim_angle;
        run_ticks(&mut game, 30);
        assert_eq!(game.session.aim_angle, held);

        game.on_aim_right_start();
        run_seconds(&mut game, 3.0);
        assert_eq!(game.session.aim_angle, MAX_AIM_ANGLE);
    }

    #[test]
    fn test_shooting_needs_an_active_session() {
        let mut game = new_game();
        assert_eq!(game.session.phase, SessionPhase::Idle);
        assert!(!game.on_shoot());
        assert_eq!(game.session.shots, 0);
        assert!(game.projectiles.is_empty());
    }

    #[test]
    fn test_menu_pauses_and_continue_resumes() {
        let mut game = new_game();
        game.on_start_game();
        run_seconds(&mut game, 2.0);
        assert_eq!(game.session.time_left, GAME_TIME - 2);

        game.on_shoot();
        game.on_return_to_menu();
        assert_eq!(game.session.phase, SessionPhase::Paused);
        let parked = game.projectiles[0].pos;

        run_seconds(&mut game, 2.0);
        assert_eq!(game.session.time_left, GAME_TIME - 2);
        assert_eq!(game.projectiles[0].pos, parked);

        assert!(game.on_continue_game());
        assert!(game.session.is_active());
        run_seconds(&mut game, 1.0);
        assert_eq!(game.session.time_left, GAME_TIME - 3);
        assert_eq!(game.session.shots, 1);
    }

    #[test]
    fn test_start_resets_counters_but_keeps_loadout() {
        let mut game = new_game();
        game.on_set_weapon(Weapon::Laser);
        game.on_set_bullet_speed("420");
        game.on_start_game();
        game.on_shoot();
        run_seconds(&mut game, 1.0);

        game.on_start_game();
        assert_eq!(game.session.shots, 0);
        assert_eq!(game.session.time_left, GAME_TIME);
        assert!(game.projectiles.is_empty());
        assert_eq!(game.session.weapon, Weapon::Laser);
        assert_eq!(game.session.bullet_speed, 420.0);
    }

    #[test]
    fn test_restart_rebuilds_session() {
        let mut game = new_game();
        game.on_set_weapon(Weapon::Pistol);
        game.on_set_bullet_speed("900");
        game.on_start_game();
        game.on_shoot();
        game.on_shoot();
        game.on_aim_right_start();

        game.on_restart_game();
        assert!(game.session.is_active());
        assert_eq!(game.session.shots, 0);
        assert_eq!(game.session.time_left, GAME_TIME);
        assert_eq!(game.session.weapon, Weapon::Cannon);
        assert_eq!(game.session.bullet_speed, DEFAULT_BULLET_SPEED);
        assert_eq!(game.aim_direction(), None);
        assert!(game.projectiles.is_empty());
        assert_eq!(game.world.target.rect.pos(), DVec2::new(800.0, 300.0));
    }

    #[test]
    fn test_update_runs_fixed_ticks() {
        let mut game = new_game();
        game.on_start_game();
        for _ in 0..TICK_RATE {
            game.update(SIM_DT).unwrap();
        }
        assert_eq!(game.session.time_left, GAME_TIME - 1);

        game.update(0.0).unwrap();
        let before = game.clock();
        game.update(10.0).unwrap();
        assert!(game.clock() - before <= MAX_SUBSTEPS as f64 * SIM_DT + 1e-9);
    }

    #[test]
    fn test_non_finite_frame_is_skipped() {
        let mut game = new_game();
        game.on_start_game();
        game.update(f64::NAN).unwrap();
        game.update(f64::INFINITY).unwrap();
        assert_eq!(game.clock(), 0.0);

        for _ in 0..2 * TICK_RATE {
            game.update(SIM_DT).unwrap();
        }
        assert_eq!(game.session.time_left, GAME_TIME - 2);
    }

    #[test]
    fn test_double_shot_scores_twice_in_one_tick() {
        let mut game = new_game();
        game.on_set_weapon(Weapon::Pistol);
        game.on_start_game();
        put_target_in_lane(&mut game);
        assert!(game.on_shoot());
        assert!(game.on_shoot());

        let mut ticks = 0;
        while !game.projectiles.is_empty() {
            run_ticks(&mut game, 1);
            ticks += 1;
            assert!(ticks < 60, "rounds never reached the target");
        }
        assert_eq!((game.session.hits, game.session.score), (2, 2));
    }

    #[test]
    fn test_stone_hit_clears_embedded_rounds() {
        let mut game = new_game();
        game.on_set_weapon(Weapon::Pistol);
        game.on_start_game();
        let lane = DVec2::new(300.0, 25.0);
        game.world.stone.move_to(lane);

        game.on_shoot();
        run_ticks(&mut game, 20);
        assert_eq!(game.projectiles.len(), 1);
        assert_eq!(game.projectiles[0].kind, ProjectileKind::PistolHitStone);

        game.on_set_weapon(Weapon::Cannon);
        game.on_shoot();
        let mut ticks = 0;
        while game.world.stone.rect.pos() == lane {
            run_ticks(&mut game, 1);
            ticks += 1;
            assert!(ticks < 40, "cannon round never reached the stone");
        }
        assert!(game.projectiles.is_empty());
    }

    struct FailingStore;

    impl ScoreStore for FailingStore {
        fn ensure_schema(&mut self) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn insert(&mut self, _entry: ScoreEntry) -> Result<u64, PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::other("disk full")))
        }

        fn query_top(&self, _n: usize) -> Vec<crate::highscores::ScoreRecord> {
            Vec::new()
        }
    }

    #[test]
    fn test_save_failure_is_reported_once() {
        let settings = Settings {
            seed: Some(5),
            ..Settings::default()
        };
        let mut game = Game::new(settings, FailingStore).unwrap();
        game.on_start_game();

        let mut failures = 0;
        for _ in 0..(GAME_TIME as usize + 5) * TICK_RATE as usize {
            if game.fixed_tick().is_err() {
                failures += 1;
            }
        }
        assert_eq!(failures, 1);
        assert!(game.session.is_over());
        assert!(game.high_scores().is_empty());
    }
}
