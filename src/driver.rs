//! Frame-driven game loop
//!
//! There is no timer: the host's frame callback (`requestAnimationFrame`
//! in the browser) paces the game. The driver keeps at most one frame
//! request outstanding, and only while the session is Playing and not
//! paused. Stopping cancels the pending request so no tick ever runs
//! against a discarded state.

use crate::audio::AudioCues;
use crate::session::{Session, SessionPhase};
use crate::sim::TickOutcome;

/// Host frame-callback facility
pub trait FrameScheduler {
    type Handle;

    /// Ask for one callback before the next repaint
    fn request_frame(&mut self) -> Self::Handle;

    /// Withdraw a pending request
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Schedules one simulation tick per display frame
#[derive(Debug)]
pub struct LoopDriver<H> {
    pending: Option<H>,
    paused: bool,
}

impl<H> Default for LoopDriver<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> LoopDriver<H> {
    pub fn new() -> Self {
        Self {
            pending: None,
            paused: false,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a session in `phase` should be ticking
    pub fn should_run(&self, phase: SessionPhase) -> bool {
        phase == SessionPhase::Playing && !self.paused
    }

    /// Bring scheduling in line with the session phase.
    ///
    /// Pause only applies to a run in progress, so it is dropped as soon as
    /// the session leaves Playing.
    pub fn sync<S>(&mut self, phase: SessionPhase, scheduler: &mut S)
    where
        S: FrameScheduler<Handle = H>,
    {
        if phase != SessionPhase::Playing {
            self.paused = false;
        }

        if self.should_run(phase) {
            if self.pending.is_none() {
                self.pending = Some(scheduler.request_frame());
            }
        } else if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
            log::debug!("Frame loop stopped ({:?}, paused: {})", phase, self.paused);
        }
    }

    /// Pause or resume. Ignored outside Playing.
    pub fn set_paused<S>(&mut self, paused: bool, phase: SessionPhase, scheduler: &mut S)
    where
        S: FrameScheduler<Handle = H>,
    {
        let paused = paused && phase == SessionPhase::Playing;
        if self.paused != paused {
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
        self.sync(phase, scheduler);
    }

    /// Frame callback: run one tick if still eligible, then re-arm.
    pub fn on_frame<A, S>(&mut self, session: &mut Session<A>, scheduler: &mut S) -> TickOutcome
    where
        A: AudioCues,
        S: FrameScheduler<Handle = H>,
    {
        // The request that fired is spent
        self.pending = None;

        let outcome = if self.should_run(session.phase()) {
            session.tick()
        } else {
            TickOutcome::Skipped
        };

        self.sync(session.phase(), scheduler);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::config::GameConfig;
    use crate::sim::Obstacle;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Counts requests and cancellations
    #[derive(Default)]
    struct FakeFrames {
        next_id: u32,
        requested: Vec<u32>,
        cancelled: Vec<u32>,
    }

    impl FakeFrames {
        fn outstanding(&self) -> usize {
            self.requested.len() - self.cancelled.len()
        }
    }

    impl FrameScheduler for FakeFrames {
        type Handle = u32;

        fn request_frame(&mut self) -> u32 {
            self.next_id += 1;
            self.requested.push(self.next_id);
            self.next_id
        }

        fn cancel_frame(&mut self, handle: u32) {
            self.cancelled.push(handle);
        }
    }

    fn playing_session() -> Session<SilentAudio> {
        let mut session = Session::with_rng(GameConfig::default(), SilentAudio, Pcg32::seed_from_u64(9));
        session.start();
        session
    }

    #[test]
    fn test_no_frames_while_configuring() {
        let session = Session::with_rng(GameConfig::default(), SilentAudio, Pcg32::seed_from_u64(9));
        let mut frames = FakeFrames::default();
        let mut driver = LoopDriver::new();
        driver.sync(session.phase(), &mut frames);
        assert!(!driver.is_scheduled());
        assert!(frames.requested.is_empty());
    }

    #[test]
    fn test_one_request_outstanding() {
        let mut session = playing_session();
        let mut frames = FakeFrames::default();
        let mut driver = LoopDriver::new();

        driver.sync(session.phase(), &mut frames);
        driver.sync(session.phase(), &mut frames);
        assert_eq!(frames.requested.len(), 1);

        for _ in 0..3 {
            assert_eq!(driver.on_frame(&mut session, &mut frames), TickOutcome::Survived);
            assert!(driver.is_scheduled());
        }
        assert_eq!(frames.requested.len(), 4);
        assert_eq!(session.game().unwrap().score, 3);
    }

    #[test]
    fn test_game_over_stops_loop() {
        let mut session = playing_session();
        let mut frames = FakeFrames::default();
        let mut driver = LoopDriver::new();
        driver.sync(session.phase(), &mut frames);

        // Everything lands on the player
        force_collision(&mut session);

        assert_eq!(driver.on_frame(&mut session, &mut frames), TickOutcome::Collided);
        assert!(!driver.is_scheduled());
        assert_eq!(frames.requested.len(), 1);

        // Restart re-arms
        session.restart();
        driver.sync(session.phase(), &mut frames);
        assert!(driver.is_scheduled());
        assert_eq!(frames.requested.len(), 2);
        assert!(frames.cancelled.is_empty());
    }

    #[test]
    fn test_pause_cancels_pending_frame() {
        let mut session = playing_session();
        let mut frames = FakeFrames::default();
        let mut driver = LoopDriver::new();
        driver.sync(session.phase(), &mut frames);

        driver.set_paused(true, session.phase(), &mut frames);
        assert!(!driver.is_scheduled());
        assert_eq!(frames.cancelled, vec![1]);

        // A callback that slipped through does nothing
        assert_eq!(driver.on_frame(&mut session, &mut frames), TickOutcome::Skipped);
        assert_eq!(session.game().unwrap().score, 0);
        assert!(!driver.is_scheduled());

        driver.set_paused(false, session.phase(), &mut frames);
        assert!(driver.is_scheduled());
        assert_eq!(frames.outstanding(), 1);
    }

    #[test]
    fn test_pause_on_game_over_does_not_block_restart() {
        let mut session = playing_session();
        let mut frames = FakeFrames::default();
        let mut driver = LoopDriver::new();
        driver.sync(session.phase(), &mut frames);

        force_collision(&mut session);
        driver.on_frame(&mut session, &mut frames);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        driver.set_paused(true, session.phase(), &mut frames);
        assert!(!driver.is_paused());

        assert!(session.restart());
        driver.sync(session.phase(), &mut frames);
        assert!(driver.is_scheduled());
        assert_eq!(driver.on_frame(&mut session, &mut frames), TickOutcome::Survived);
    }

    #[test]
    fn test_pause_cleared_when_run_ends() {
        let mut session = playing_session();
        let mut frames = FakeFrames::default();
        let mut driver = LoopDriver::new();
        driver.sync(session.phase(), &mut frames);
        driver.set_paused(true, session.phase(), &mut frames);
        assert!(driver.is_paused());

        // Back on the config screen, then a fresh start
        let mut configuring =
            Session::with_rng(GameConfig::default(), SilentAudio, Pcg32::seed_from_u64(9));
        driver.sync(configuring.phase(), &mut frames);
        assert!(!driver.is_paused());

        configuring.start();
        driver.sync(configuring.phase(), &mut frames);
        assert!(driver.is_scheduled());
    }

    fn force_collision(session: &mut Session<SilentAudio>) {
        let game = session.game_mut().unwrap();
        let spawn = game.player.pos;
        for o in &mut game.obstacles {
            *o = Obstacle::new(spawn.x, spawn.y, 32.0, 32.0, 0.0);
        }
    }
}
