//! Idle/demo mode - the game plays itself
//!
//! Picks a straight-line weapon, points it at the target's center and fires on
//! a fixed cadence. Used by the headless binary and as a soak test.

use glam::DVec2;

use crate::consts::{MAX_AIM_ANGLE, MIN_AIM_ANGLE};
use crate::game::Game;
use crate::highscores::ScoreStore;
use crate::sim::Weapon;

/// Aim angle (degrees, clamped) that carries a round's center through `point`
pub fn aim_at(weapon: Weapon, point: DVec2) -> f64 {
    let origin = weapon.mount().center() + weapon.round_kind().size() / 2.0;
    let d = point - origin;
    d.y.atan2(d.x).to_degrees().clamp(MIN_AIM_ANGLE, MAX_AIM_ANGLE)
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Seconds between shots
    fire_every: f64,
    cooldown: f64,
}

impl Autopilot {
    pub fn new(fire_every: f64) -> Self {
        Self {
            fire_every,
            cooldown: 0.0,
        }
    }

    /// Steer `game` for `dt` seconds of simulated time (call once per tick)
    pub fn drive<S: ScoreStore>(&mut self, game: &mut Game<S>, dt: f64) {
        if !game.session.is_active() {
            return;
        }
        // Lobbed cannon shots are not worth predicting
        if !game.session.weapon.is_straight_line() {
            game.on_set_weapon(Weapon::Pistol);
        }

        let angle = aim_at(game.session.weapon, game.world.target.rect.center());
        game.session.set_aim_angle(angle);

        self.cooldown -= dt;
        if self.cooldown <= 0.0 {
            game.on_shoot();
            self.cooldown += self.fire_every;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SIM_DT, TICK_RATE};
    use crate::highscores::MemoryScoreStore;
    use crate::settings::Settings;

    #[test]
    fn test_aim_at_level_point() {
        let weapon = Weapon::Pistol;
        let origin = weapon.mount().center() + weapon.round_kind().size() / 2.0;
        let angle = aim_at(weapon, origin + DVec2::new(200.0, 0.0));
        assert!(angle.abs() < 1e-9);

        let angle = aim_at(weapon, origin + DVec2::new(100.0, 100.0));
        assert!((angle - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_aim_at_clamps() {
        let weapon = Weapon::Laser;
        let origin = weapon.mount().center();
        assert_eq!(aim_at(weapon, origin + DVec2::new(0.0, 500.0)), MAX_AIM_ANGLE);
        assert_eq!(aim_at(weapon, origin + DVec2::new(10.0, -500.0)), MIN_AIM_ANGLE);
    }

    #[test]
    fn test_autopilot_scores() {
        let settings = Settings {
            seed: Some(7),
            hazard_count: 0,
            ..Settings::default()
        };
        let mut game = Game::new(settings, MemoryScoreStore::new()).unwrap();
        game.on_start_game();

        // Clear everything but the target out of the field
        game.world.stone.move_to(DVec2::new(2000.0, 2000.0));
        game.world.mirror.move_to(DVec2::new(2000.0, 2000.0));

        let mut pilot = Autopilot::new(1.0);
        for _ in 0..10 * TICK_RATE {
            pilot.drive(&mut game, SIM_DT);
            game.fixed_tick().unwrap();
        }

        assert_eq!(game.session.weapon, Weapon::Pistol);
        assert!(game.session.shots >= 5);
        assert!(game.session.hits >= 1);
        assert!(game.session.hits <= game.session.shots);
    }

    #[test]
    fn test_autopilot_idle_when_not_playing() {
        let mut game = Game::new(Settings::default(), MemoryScoreStore::new()).unwrap();
        let mut pilot = Autopilot::new(0.1);
        for _ in 0..TICK_RATE {
            pilot.drive(&mut game, SIM_DT);
            game.fixed_tick().unwrap();
        }
        assert_eq!(game.session.shots, 0);
    }
}
