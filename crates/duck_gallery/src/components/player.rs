//! Player component

use gallery_engine::ecs::Component;
use gallery_engine::foundation::time::GameClock;

/// Shooting cadence of the player entity
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Seconds between shots
    pub fire_rate: f32,

    /// Game time of the last shot
    pub last_fired: f64,
}

impl Component for Player {}

impl Player {
    /// Default seconds between shots
    pub const DEFAULT_FIRE_RATE: f32 = 0.3;

    /// Player created at `now`; the first shot is allowed one cooldown later
    pub const fn new(fire_rate: f32, now: f64) -> Self {
        Self {
            fire_rate,
            last_fired: now,
        }
    }

    /// Whether a full cooldown has passed since the last shot
    #[allow(clippy::cast_possible_truncation)]
    pub fn can_fire(&self, clock: &GameClock) -> bool {
        clock.elapsed_since(self.last_fired) as f32 >= self.fire_rate
    }

    /// Record a shot at the clock's current time
    pub fn fire(&mut self, clock: &GameClock) {
        self.last_fired = clock.now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_follows_game_clock() {
        let mut clock = GameClock::new();
        let mut player = Player::new(Player::DEFAULT_FIRE_RATE, clock.now());
        assert!(!player.can_fire(&clock));

        clock.advance(0.3);
        assert!(player.can_fire(&clock));

        player.fire(&clock);
        assert!(!player.can_fire(&clock));
        clock.advance(0.2);
        assert!(!player.can_fire(&clock));
        clock.advance(0.15);
        assert!(player.can_fire(&clock));
    }
}
