//! Obstacle pool generation
//!
//! Builds the obstacle set for a pattern once per start/restart. After
//! that the pool is only recycled by the tick, never regrown.

use rand::Rng;

use super::state::Obstacle;
use crate::config::Pattern;
use crate::consts::*;

const ASTEROID_SIZE: f32 = 32.0;
const ASTEROID_DROP_BAND: f32 = 600.0;

const WALL_WIDTH: f32 = 200.0;
const WALL_HEIGHT: f32 = 50.0;
const WALL_SPACING_X: f32 = 300.0;
const WALL_SPACING_Y: f32 = 200.0;
const WALL_FIRST_Y: f32 = -100.0;

const BLOCK_SIZE: f32 = 20.0;
const BLOCK_DROP_BAND: f32 = 300.0;

/// Generate the initial obstacle pool for `pattern` moving at `speed` units per tick
pub fn generate<R: Rng + ?Sized>(pattern: Pattern, speed: f32, rng: &mut R) -> Vec<Obstacle> {
    let obstacles: Vec<Obstacle> = match pattern {
        Pattern::Asteroids => (0..pattern.pool_size())
            .map(|_| {
                Obstacle::new(
                    rng.random_range(0.0..FIELD_WIDTH - ASTEROID_SIZE),
                    rng.random_range(-ASTEROID_DROP_BAND..0.0),
                    ASTEROID_SIZE,
                    ASTEROID_SIZE,
                    speed,
                )
            })
            .collect(),
        Pattern::Walls => (0..pattern.pool_size())
            .map(|i| {
                let sweep = if i % 2 == 0 { speed } else { -speed };
                Obstacle::new(
                    i as f32 * WALL_SPACING_X,
                    WALL_FIRST_Y - i as f32 * WALL_SPACING_Y,
                    WALL_WIDTH,
                    WALL_HEIGHT,
                    speed,
                )
                .with_sweep(sweep)
            })
            .collect(),
        Pattern::Blocks => (0..pattern.pool_size())
            .map(|_| {
                Obstacle::new(
                    rng.random_range(0.0..FIELD_WIDTH - BLOCK_SIZE),
                    rng.random_range(-BLOCK_DROP_BAND..0.0),
                    BLOCK_SIZE,
                    BLOCK_SIZE,
                    speed,
                )
            })
            .collect(),
    };

    log::debug!(
        "Generated {} {} obstacles at speed {}",
        obstacles.len(),
        pattern.as_str(),
        speed
    );
    obstacles
}

/// Move a fallen obstacle back above the field.
///
/// Walls keep their column and sweep direction; other patterns get a new x.
pub fn recycle<R: Rng + ?Sized>(obstacle: &mut Obstacle, pattern: Pattern, rng: &mut R) {
    obstacle.pos.y = rng.random_range(-RESPAWN_BAND..0.0);
    if pattern.rerolls_x() {
        obstacle.pos.x = rng.random_range(0.0..obstacle.max_x());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_asteroids_layout() {
        let mut rng = Pcg32::seed_from_u64(7);
        let pool = generate(Pattern::Asteroids, 4.0, &mut rng);
        assert_eq!(pool.len(), 8);
        for o in &pool {
            assert_eq!(o.size.x, 32.0);
            assert_eq!(o.size.y, 32.0);
            assert!(o.pos.x >= 0.0 && o.pos.x < 768.0);
            assert!(o.pos.y >= -600.0 && o.pos.y < 0.0);
            assert_eq!(o.vy, 4.0);
            assert_eq!(o.vx, None);
        }
    }

    #[test]
    fn test_walls_layout() {
        let mut rng = Pcg32::seed_from_u64(7);
        let pool = generate(Pattern::Walls, 6.0, &mut rng);
        assert_eq!(pool.len(), 3);

        let xs: Vec<f32> = pool.iter().map(|o| o.pos.x).collect();
        let ys: Vec<f32> = pool.iter().map(|o| o.pos.y).collect();
        let sweeps: Vec<Option<f32>> = pool.iter().map(|o| o.vx).collect();

        assert_eq!(xs, vec![0.0, 300.0, 600.0]);
        assert_eq!(ys, vec![-100.0, -300.0, -500.0]);
        assert_eq!(sweeps, vec![Some(6.0), Some(-6.0), Some(6.0)]);
        assert!(pool.iter().all(|o| o.size.x == 200.0 && o.size.y == 50.0));
    }

    #[test]
    fn test_blocks_layout() {
        let mut rng = Pcg32::seed_from_u64(7);
        let pool = generate(Pattern::Blocks, 2.0, &mut rng);
        assert_eq!(pool.len(), 12);
        for o in &pool {
            assert!(o.pos.x >= 0.0 && o.pos.x < 780.0);
            assert!(o.pos.y >= -300.0 && o.pos.y < 0.0);
            assert_eq!(o.vy, 2.0);
            assert_eq!(o.vx, None);
        }
    }

    #[test]
    fn test_recycle_keeps_wall_column() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut wall = Obstacle::new(300.0, 610.0, 200.0, 50.0, 4.0).with_sweep(-4.0);
        recycle(&mut wall, Pattern::Walls, &mut rng);
        assert_eq!(wall.pos.x, 300.0);
        assert_eq!(wall.vx, Some(-4.0));
        assert!(wall.pos.y >= -200.0 && wall.pos.y < 0.0);
    }

    proptest! {
        #[test]
        fn pool_size_ignores_speed(seed in any::<u64>(), tier in 0usize..3) {
            let speed = [2.0, 4.0, 6.0][tier];
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert_eq!(generate(Pattern::Asteroids, speed, &mut rng).len(), 8);
            prop_assert_eq!(generate(Pattern::Walls, speed, &mut rng).len(), 3);
            prop_assert_eq!(generate(Pattern::Blocks, speed, &mut rng).len(), 12);
        }
    }
}
