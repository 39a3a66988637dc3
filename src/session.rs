//! Session state machine
//!
//! Configuring -> Playing (start) -> GameOver (collision)
//! GameOver -> Playing (restart) or Configuring (reconfigure).
//!
//! The session owns the held-key set, the gameplay RNG and the injected
//! audio capability. Any other transition request is rejected and logged.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioCues, Cue};
use crate::config::GameConfig;
use crate::input::HeldKeys;
use crate::sim::{GamePhase, GameState, TickOutcome, generate, tick};

/// Mutually exclusive mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Configuring,
    Playing,
    GameOver,
}

pub struct Session<A: AudioCues> {
    config: GameConfig,
    /// `None` while configuring
    game: Option<GameState>,
    keys: HeldKeys,
    rng: Pcg32,
    audio: A,
    music: bool,
}

impl<A: AudioCues> Session<A> {
    /// New session with an entropy-seeded obstacle RNG
    pub fn new(config: GameConfig, audio: A) -> Self {
        Self::with_rng(config, audio, Pcg32::from_rng(&mut rand::rng()))
    }

    /// New session with an explicit RNG (tests, headless runs)
    pub fn with_rng(config: GameConfig, audio: A, rng: Pcg32) -> Self {
        Self {
            config,
            game: None,
            keys: HeldKeys::new(),
            rng,
            audio,
            music: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.game {
            None => SessionPhase::Configuring,
            Some(game) => match game.phase {
                GamePhase::Playing => SessionPhase::Playing,
                GamePhase::GameOver => SessionPhase::GameOver,
            },
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current run, if any (frozen while GameOver)
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn music_enabled(&self) -> bool {
        self.music
    }

    /// Replace the configuration. Only allowed while configuring.
    pub fn set_config(&mut self, config: GameConfig) -> bool {
        if self.phase() != SessionPhase::Configuring {
            log::warn!("Ignoring config change during {:?}", self.phase());
            return false;
        }
        self.config = config;
        true
    }

    /// Toggle the looping chiptune
    pub fn set_music(&mut self, enabled: bool) {
        self.music = enabled;
        self.audio.set_loop_enabled(enabled);
    }

    /// Configuring -> Playing
    pub fn start(&mut self) -> bool {
        if self.phase() != SessionPhase::Configuring {
            log::warn!("Start rejected during {:?}", self.phase());
            return false;
        }
        self.begin_run();
        if self.music {
            self.audio.set_loop_enabled(true);
        }
        log::info!("Game started: {}", self.config.to_query());
        true
    }

    /// GameOver -> Playing with the same config
    pub fn restart(&mut self) -> bool {
        if self.phase() != SessionPhase::GameOver {
            log::warn!("Restart rejected during {:?}", self.phase());
            return false;
        }
        self.begin_run();
        log::info!("Game restarted");
        true
    }

    /// GameOver -> Configuring, dropping the finished run
    pub fn reconfigure(&mut self) -> bool {
        if self.phase() != SessionPhase::GameOver {
            log::warn!("Reconfigure rejected during {:?}", self.phase());
            return false;
        }
        self.game = None;
        self.keys.clear();
        log::info!("Back to configuration");
        true
    }

    fn begin_run(&mut self) {
        self.audio.play_cue(Cue::Start);
        let obstacles = generate(self.config.pattern, self.config.speed.units(), &mut self.rng);
        self.game = Some(GameState::new(obstacles));
    }

    /// Movement key went down. Blips on the first press.
    pub fn key_down(&mut self, key: &str) {
        if self.keys.press(key) {
            self.audio.play_cue(Cue::Blip);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.release(key);
    }

    /// Forget held keys (window lost focus)
    pub fn release_keys(&mut self) {
        self.keys.clear();
    }

    /// Run one simulation tick. No-op unless Playing.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(game) = self.game.as_mut() else {
            return TickOutcome::Skipped;
        };
        let input = self.keys.snapshot();
        let outcome = tick(game, &self.config, input, &mut self.rng);
        if outcome == TickOutcome::Collided {
            self.audio.play_cue(Cue::Boom);
            log::info!("Game over - survived {} seconds", game.seconds());
        }
        outcome
    }
}
