//! Headless duck gallery
//!
//! Usage: `duck_gallery [config.toml]`. Runs one round with the configured
//! fixed timestep, optionally steering the player with a simple autopilot,
//! and logs the result.

use duck_gallery::config::ControlsConfig;
use duck_gallery::high_score::FileHighScoreStore;
use duck_gallery::systems::{ExpiredEntitiesSystem, ProjectileSystem, TargetSpawnSystem};
use duck_gallery::{build_world, Gallery, GalleryError, GalleryWorld, GameConfig, LevelData, ShootingGalleryState};
use gallery_engine::config::Config;
use gallery_engine::events::Event;
use gallery_engine::foundation::logging;
use gallery_engine::{AppError, Application, Engine};
use std::path::PathBuf;

/// Seconds between autopilot direction changes
const STRAFE_PERIOD: f64 = 1.5;

/// Publishes key events that strafe the player and keep the trigger held
struct Autopilot {
    left: String,
    right: String,
    fire: String,
    heading_right: bool,
    next_switch: Option<f64>,
}

impl Autopilot {
    fn new(controls: &ControlsConfig) -> Self {
        Self {
            left: controls.left.clone(),
            right: controls.right.clone(),
            fire: controls.fire.clone(),
            heading_right: true,
            next_switch: None,
        }
    }

    fn heading(&self) -> &str {
        if self.heading_right {
            &self.right
        } else {
            &self.left
        }
    }

    fn drive(&mut self, world: &mut GalleryWorld) {
        let now = world.now();
        match self.next_switch {
            None => {
                world.publish(Event::key_event(self.fire.as_str(), true, now));
                world.publish(Event::key_event(self.heading(), true, now));
            }
            Some(at) if now >= at => {
                world.publish(Event::key_event(self.heading(), false, now));
                self.heading_right = !self.heading_right;
                world.publish(Event::key_event(self.heading(), true, now));
            }
            Some(_) => return,
        }
        self.next_switch = Some(now + STRAFE_PERIOD);
    }
}

struct GalleryApp {
    world: GalleryWorld,
    autopilot: Option<Autopilot>,
}

impl Application for GalleryApp {
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        let round = &self.world.resources().round;
        if !round.is_playing() {
            return Err(AppError::GameLogic(format!("round did not start: {round}")));
        }
        log::info!(
            "Gallery ready: {} entities, systems {:?}",
            self.world.entity_count(),
            self.world.systems().names()
        );
        Ok(())
    }

    fn update(&mut self, _engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        if let Some(autopilot) = &mut self.autopilot {
            autopilot.drive(&mut self.world);
        }
        self.world.frame(delta_time);
        Ok(())
    }

    fn should_exit(&self) -> bool {
        self.world.resources().round.is_game_over()
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let round = &mut self.world.resources_mut().round;
        if round.is_playing() {
            log::info!("Frame limit hit mid-round, ending it");
            round.end_game();
        }

        let round = &self.world.resources().round;
        log::info!("Final score: {}", round.score);
        log::info!("Accuracy: {:.1}% ({} of {} shots)", round.accuracy(), round.targets_hit, round.shots_fired);
        log::info!("High score: {}", round.high_score);
        log::info!("Frames: {}, game time {:.2}s", engine.frame(), self.world.now());
        if let Some(spawner) = self.world.system::<TargetSpawnSystem>() {
            log::info!("{spawner}");
        }
        if let Some(projectiles) = self.world.system::<ProjectileSystem>() {
            log::info!("{projectiles}");
        }
        if let Some(cleanup) = self.world.system::<ExpiredEntitiesSystem>() {
            log::info!("{cleanup}");
        }
    }
}

fn run() -> Result<(), GalleryError> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("gallery.toml"), PathBuf::from);
    let config = GameConfig::load_or_default(&config_path)?;
    config.validate()?;
    logging::set_level(&config.logging.level);
    log::info!("Using config {}", config_path.display());

    let level = LevelData::load(&config.paths.level)?;
    let templates = level.template_library().map_err(GalleryError::Template)?;

    let mut round = ShootingGalleryState::new(Box::new(FileHighScoreStore::new(&config.paths.high_score)));
    round.set_game_duration(config.gameplay.game_duration);
    round.set_spawn_rate(config.gameplay.spawn_rate);

    let mut world = build_world(&config, Gallery::new(level.bounds(&config), round, templates));
    level.spawn_into(&mut world, &config)?;
    if !world.resources().round.is_playing() {
        let now = world.now();
        world.resources_mut().round.start_game(now);
    }

    let mut app = GalleryApp {
        world,
        autopilot: config.runner.autopilot.then(|| Autopilot::new(&config.controls)),
    };
    Engine::run(config.engine_config(), &mut app)?;
    Ok(())
}

fn main() {
    logging::init_early();
    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("duck_gallery: {err}");
        std::process::exit(1);
    }
}
