//! Round state of the shooting gallery
//!
//! One [`ShootingGalleryState`] lives in the world's resources. It holds the
//! score, the countdown, the shot statistics and the menu/playing/game-over
//! state machine, and writes the high score through its [`HighScoreStore`]
//! whenever it is beaten.

use crate::high_score::{HighScoreStore, MemoryHighScoreStore};
use std::fmt;
use std::str::FromStr;

/// Round state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Waiting to start
    #[default]
    Menu,
    /// Round in progress
    Playing,
    /// Round finished
    GameOver,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::GameOver => "game_over",
        })
    }
}

impl FromStr for GameState {
    type Err = std::convert::Infallible;

    /// Case-insensitive; anything unrecognised is the menu
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "playing" => Self::Playing,
            "game_over" | "gameover" => Self::GameOver,
            _ => Self::Menu,
        })
    }
}

/// Score, timer and statistics of the current round
pub struct ShootingGalleryState {
    /// Points this round
    pub score: u32,
    /// Best score ever recorded
    pub high_score: u32,
    /// Seconds left in the round
    pub time_remaining: f32,
    /// Shots fired this round
    pub shots_fired: u32,
    /// Targets hit this round
    pub targets_hit: u32,
    state: GameState,
    game_duration: f32,
    spawn_rate: f32,
    game_start_time: f64,
    last_target_spawn: f64,
    store: Box<dyn HighScoreStore>,
}

impl ShootingGalleryState {
    /// Round length in seconds
    pub const GAME_DURATION: f32 = 60.0;
    /// Ducks spawned per second
    pub const DUCK_SPAWN_RATE: f32 = 2.0;

    /// Fresh state in the menu; the high score is loaded from `store`
    ///
    /// A store that cannot be read counts as a high score of 0.
    pub fn new(store: Box<dyn HighScoreStore>) -> Self {
        let high_score = store.load().unwrap_or_else(|err| {
            log::warn!("Could not load high score, starting from 0: {err}");
            0
        });
        Self {
            score: 0,
            high_score,
            time_remaining: Self::GAME_DURATION,
            shots_fired: 0,
            targets_hit: 0,
            state: GameState::Menu,
            game_duration: Self::GAME_DURATION,
            spawn_rate: Self::DUCK_SPAWN_RATE,
            game_start_time: 0.0,
            last_target_spawn: 0.0,
            store,
        }
    }

    /// State backed by a [`MemoryHighScoreStore`]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryHighScoreStore::default()))
    }

    /// Change the round length used by the next [`Self::start_game`]
    pub fn set_game_duration(&mut self, seconds: f32) {
        self.game_duration = seconds;
    }

    /// Change how many ducks spawn per second
    pub fn set_spawn_rate(&mut self, per_second: f32) {
        self.spawn_rate = per_second;
    }

    /// Current round state
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Whether a round is running
    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    /// Whether the round has ended
    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Whether the countdown reached zero
    pub fn is_time_up(&self) -> bool {
        self.time_remaining <= 0.0
    }

    /// Game time the current round started at
    pub const fn game_start_time(&self) -> f64 {
        self.game_start_time
    }

    /// Add points for a hit; zero points are ignored
    pub fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.targets_hit += 1;
        self.record_high_score();
    }

    /// Count a shot
    pub fn record_shot(&mut self) {
        self.shots_fired += 1;
    }

    /// Reset the statistics and start a round at `now`
    pub fn start_game(&mut self, now: f64) {
        self.reset_stats();
        self.state = GameState::Playing;
        self.game_start_time = now;
        self.last_target_spawn = now;
        log::info!("Round started ({}s)", self.game_duration);
    }

    /// Finish the round and make sure the high score is saved
    pub fn end_game(&mut self) {
        self.state = GameState::GameOver;
        self.record_high_score();
        log::info!(
            "Round over: score {} (high {}), accuracy {:.1}%",
            self.score,
            self.high_score,
            self.accuracy()
        );
    }

    /// Percentage of shots that hit; 0 when nothing was fired
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            return 0.0;
        }
        self.targets_hit as f32 / self.shots_fired as f32 * 100.0
    }

    /// Count the round down; ends the round when time runs out
    ///
    /// Only acts while playing and for positive steps.
    pub fn update_timer(&mut self, delta_time: f32) {
        if !self.is_playing() || delta_time <= 0.0 {
            return;
        }
        self.time_remaining = (self.time_remaining - delta_time).max(0.0);
        if self.time_remaining <= 0.0 {
            self.end_game();
        }
    }

    /// Whether a duck is due; claims the spawn slot when it is
    pub fn should_spawn_target(&mut self, now: f64) -> bool {
        if !self.is_playing() || self.spawn_rate <= 0.0 {
            return false;
        }
        let interval = 1.0 / f64::from(self.spawn_rate);
        if now - self.last_target_spawn >= interval {
            self.last_target_spawn = now;
            return true;
        }
        false
    }

    /// Switch state; entering `Playing` starts a round at `now`, entering
    /// `GameOver` finalizes the high score
    pub fn set_state(&mut self, state: GameState, now: f64) {
        match state {
            GameState::Playing => self.start_game(now),
            GameState::GameOver => self.end_game(),
            GameState::Menu => self.state = GameState::Menu,
        }
    }

    fn reset_stats(&mut self) {
        self.score = 0;
        self.targets_hit = 0;
        self.shots_fired = 0;
        self.time_remaining = self.game_duration;
    }

    fn record_high_score(&mut self) {
        if self.score <= self.high_score {
            return;
        }
        self.high_score = self.score;
        if let Err(err) = self.store.save(self.high_score) {
            log::warn!("Failed to save high score {}: {err}", self.high_score);
        }
    }
}

impl fmt::Display for ShootingGalleryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShootingGalleryState(state={}, score={}/{}, time={:.1}s, hits={}/{}, accuracy={:.1}%)",
            self.state,
            self.score,
            self.high_score,
            self.time_remaining,
            self.targets_hit,
            self.shots_fired,
            self.accuracy()
        )
    }
}

impl fmt::Debug for ShootingGalleryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
