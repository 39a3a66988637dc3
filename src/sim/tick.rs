//! Single-frame simulation tick
//!
//! Advances the game by one display frame: player movement, obstacle
//! motion and recycling, collision and score.

use rand::Rng;

use super::collision::overlaps;
use super::spawn::recycle;
use super::state::{GamePhase, GameState};
use crate::config::{GameConfig, Pattern};

/// Held directions, read once at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// State was not Playing; nothing changed
    Skipped,
    /// Player survived, score advanced by one
    Survived,
    /// Player hit an obstacle; state is now GameOver
    Collided,
}

/// Advance the game state by one frame
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    input: TickInput,
    rng: &mut R,
) -> TickOutcome {
    // Frozen after a collision
    if state.phase != GamePhase::Playing {
        return TickOutcome::Skipped;
    }

    // Left first, then right; with both held they cancel except at a wall
    if input.left {
        state.player.move_left();
    }
    if input.right {
        state.player.move_right();
    }

    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.vy;

        if let Some(vx) = obstacle.vx {
            obstacle.pos.x += vx;
            // Flip only when heading out of the field
            let outward = (obstacle.pos.x <= 0.0 && vx < 0.0)
                || (obstacle.pos.x >= obstacle.max_x() && vx > 0.0);
            if config.pattern == Pattern::Walls && outward {
                obstacle.vx = Some(-vx);
            }
        }

        if obstacle.is_below_field() {
            recycle(obstacle, config.pattern, rng);
        }
    }

    let player = state.player.rect();
    if state.obstacles.iter().any(|o| overlaps(&player, &o.rect())) {
        state.phase = GamePhase::GameOver;
        log::info!("Collision after {} ticks", state.score);
        return TickOutcome::Collided;
    }

    state.score += 1;
    TickOutcome::Survived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Background, SpeedTier, Sprite};
    use crate::sim::spawn::generate;
    use crate::sim::state::Obstacle;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn config(pattern: Pattern) -> GameConfig {
        GameConfig {
            sprite: Sprite::Robot,
            background: Background::Grid,
            pattern,
            speed: SpeedTier::Slow,
        }
    }

    /// State with a single obstacle parked far from the player
    fn lone_obstacle(obstacle: Obstacle) -> GameState {
        GameState::new(vec![obstacle])
    }

    #[test]
    fn test_tick_scores_survival() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = lone_obstacle(Obstacle::new(0.0, -500.0, 20.0, 20.0, 2.0));

        for expected in 1..=10 {
            let outcome = tick(&mut state, &config(Pattern::Blocks), TickInput::default(), &mut rng);
            assert_eq!(outcome, TickOutcome::Survived);
            assert_eq!(state.score, expected);
        }
        assert_eq!(state.obstacles[0].pos.y, -480.0);
    }

    #[test]
    fn test_movement_and_both_held() {
        let mut rng = Pcg32::seed_from_u64(3);
        let cfg = config(Pattern::Blocks);
        let mut state = lone_obstacle(Obstacle::new(0.0, -500.0, 20.0, 20.0, 2.0));

        tick(&mut state, &cfg, TickInput { left: true, right: false }, &mut rng);
        assert_eq!(state.player.pos.x, 374.0);

        tick(&mut state, &cfg, TickInput { left: false, right: true }, &mut rng);
        assert_eq!(state.player.pos.x, 384.0);

        // Left then right cancel out mid-field
        tick(&mut state, &cfg, TickInput { left: true, right: true }, &mut rng);
        assert_eq!(state.player.pos.x, 384.0);

        // At the left wall, the right step is the one that sticks
        state.player.pos.x = 0.0;
        tick(&mut state, &cfg, TickInput { left: true, right: true }, &mut rng);
        assert_eq!(state.player.pos.x, 10.0);
    }

    #[test]
    fn test_coincident_obstacle_ends_game() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = lone_obstacle(Obstacle::new(384.0, 568.0, 32.0, 32.0, 2.0));
        state.score = 42;

        let outcome = tick(&mut state, &config(Pattern::Asteroids), TickInput::default(), &mut rng);
        assert_eq!(outcome, TickOutcome::Collided);
        assert!(state.is_over());
        assert_eq!(state.score, 42);
    }

    #[test]
    fn test_game_over_is_frozen() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = lone_obstacle(Obstacle::new(384.0, 568.0, 32.0, 32.0, 2.0));
        let cfg = config(Pattern::Asteroids);
        tick(&mut state, &cfg, TickInput::default(), &mut rng);
        assert!(state.is_over());

        let frozen = state.clone();
        for _ in 0..5 {
            let outcome = tick(&mut state, &cfg, TickInput { left: true, right: false }, &mut rng);
            assert_eq!(outcome, TickOutcome::Skipped);
        }
        assert_eq!(state.score, frozen.score);
        assert_eq!(state.player, frozen.player);
        assert_eq!(state.obstacles, frozen.obstacles);
    }

    #[test]
    fn test_recycle_block_rerolls_x() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = lone_obstacle(Obstacle::new(10.0, 599.0, 20.0, 20.0, 2.0));
        // Keep the player out of the way
        state.player.pos.x = 700.0;

        tick(&mut state, &config(Pattern::Blocks), TickInput::default(), &mut rng);
        let o = &state.obstacles[0];
        assert!(o.pos.y >= -200.0 && o.pos.y < 0.0);
        assert!(o.pos.x >= 0.0 && o.pos.x < 780.0);
        assert_eq!(o.vy, 2.0);
    }

    #[test]
    fn test_recycle_wall_keeps_x() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = lone_obstacle(Obstacle::new(300.0, 598.0, 200.0, 50.0, 4.0).with_sweep(4.0));
        state.player.pos.x = 0.0;

        tick(&mut state, &config(Pattern::Walls), TickInput::default(), &mut rng);
        let o = &state.obstacles[0];
        assert_eq!(o.pos.x, 304.0);
        assert!(o.pos.y < 0.0);
        assert_eq!(o.vx, Some(4.0));
        assert_eq!(o.vy, 4.0);
    }

    #[test]
    fn test_wall_bounces_off_both_edges() {
        let mut rng = Pcg32::seed_from_u64(5);
        let cfg = config(Pattern::Walls);

        // Right edge: 600 is the last in-field x for a 200-wide wall
        let mut state = lone_obstacle(Obstacle::new(596.0, -400.0, 200.0, 50.0, 2.0).with_sweep(2.0));
        tick(&mut state, &cfg, TickInput::default(), &mut rng);
        assert_eq!(state.obstacles[0].pos.x, 598.0);
        assert_eq!(state.obstacles[0].vx, Some(2.0));
        tick(&mut state, &cfg, TickInput::default(), &mut rng);
        assert_eq!(state.obstacles[0].pos.x, 600.0);
        assert_eq!(state.obstacles[0].vx, Some(-2.0));
        tick(&mut state, &cfg, TickInput::default(), &mut rng);
        assert_eq!(state.obstacles[0].pos.x, 598.0);

        // Left edge
        let mut state = lone_obstacle(Obstacle::new(4.0, -400.0, 200.0, 50.0, 2.0).with_sweep(-2.0));
        tick(&mut state, &cfg, TickInput::default(), &mut rng);
        assert_eq!(state.obstacles[0].vx, Some(-2.0));
        tick(&mut state, &cfg, TickInput::default(), &mut rng);
        assert_eq!(state.obstacles[0].pos.x, 0.0);
        assert_eq!(state.obstacles[0].vx, Some(2.0));
    }

    #[test]
    fn test_generated_walls_all_sweep() {
        let mut rng = Pcg32::seed_from_u64(5);
        let cfg = GameConfig {
            speed: SpeedTier::Medium,
            ..config(Pattern::Walls)
        };
        let pool = generate(Pattern::Walls, cfg.speed.units(), &mut rng)
            .into_iter()
            .map(|mut o| {
                o.pos.y -= 10_000.0;
                o
            })
            .collect();
        let mut state = GameState::new(pool);

        let mut xs = Vec::new();
        for _ in 0..40 {
            assert_eq!(
                tick(&mut state, &cfg, TickInput::default(), &mut rng),
                TickOutcome::Survived
            );
            xs.push(state.obstacles[2].pos.x);
        }

        // The wall spawned on the right edge heads back across the field
        assert_eq!(xs[0], 604.0);
        assert_eq!(xs[1], 600.0);
        assert_eq!(xs[39], 604.0 - 39.0 * 4.0);
        assert!(xs.windows(2).skip(1).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_sweep_ignored_outside_walls_pattern() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = lone_obstacle(Obstacle::new(1.0, -400.0, 20.0, 20.0, 2.0).with_sweep(-2.0));
        tick(&mut state, &config(Pattern::Blocks), TickInput::default(), &mut rng);
        assert_eq!(state.obstacles[0].pos.x, -1.0);
        assert_eq!(state.obstacles[0].vx, Some(-2.0));
    }

    proptest! {
        #[test]
        fn player_stays_in_field(
            seed in any::<u64>(),
            inputs in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..300),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let cfg = config(Pattern::Blocks);
            // Obstacles far above the field so the run never ends early
            let pool = generate(Pattern::Blocks, 0.0, &mut rng)
                .into_iter()
                .map(|mut o| { o.pos.y -= 10_000.0; o })
                .collect();
            let mut state = GameState::new(pool);

            for (left, right) in inputs {
                let before = state.score;
                tick(&mut state, &cfg, TickInput { left, right }, &mut rng);
                prop_assert!(state.player.pos.x >= 0.0 && state.player.pos.x <= 768.0);
                prop_assert_eq!(state.score, before + 1);
            }
        }

        #[test]
        fn pool_size_is_stable(seed in any::<u64>(), ticks in 1usize..400) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for pattern in [Pattern::Asteroids, Pattern::Walls, Pattern::Blocks] {
                let cfg = config(pattern);
                let mut state = GameState::new(generate(pattern, 6.0, &mut rng));
                for _ in 0..ticks {
                    tick(&mut state, &cfg, TickInput::default(), &mut rng);
                }
                prop_assert_eq!(state.obstacles.len(), pattern.pool_size());
            }
        }
    }
}
