//! Pipe spawning, scrolling, and the collision/scoring queries against the bird.

use super::types::{Bird, Pipe};
use crate::config::{CollisionConfig, GameConfig, PipeConfig, SpawnDistribution};
use rand::Rng;

/// Owns the live pipes, in spawn order (which is also left-to-right order,
/// since every pipe moves at the same speed).
///
/// The random source is injected so tests can seed it.
#[derive(Debug)]
pub struct PipeManager<R: Rng> {
    pipes: Vec<Pipe>,
    /// Ticks since the last spawn.
    spawn_timer: u32,
    rng: R,
    config: PipeConfig,
    collision: CollisionConfig,
    spawn_x: f32,
    ground_y: f32,
}

impl<R: Rng> PipeManager<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            pipes: Vec::new(),
            spawn_timer: 0,
            rng,
            config: config.pipes,
            collision: config.collision,
            spawn_x: config.playfield.width,
            ground_y: config.playfield.ground_y(),
        }
    }

    /// One tick: scroll, drop pipes past the left edge, spawn on schedule.
    pub fn update(&mut self) {
        for pipe in &mut self.pipes {
            pipe.advance(self.config.speed);
        }

        self.pipes.retain(|pipe| !pipe.is_off_screen());

        self.spawn_timer += 1;
        if self.spawn_timer >= self.config.spawn_interval {
            self.spawn_pipe();
            self.spawn_timer = 0;
        }
    }

    /// Draw a gap centre according to the configured distribution.
    ///
    /// The result always lies in `[min_gap_y, max_gap_y]`.
    pub fn next_gap_center(&mut self) -> f32 {
        let min = self.config.min_gap_y;
        let max = self.config.max_gap_y;

        match self.config.distribution {
            SpawnDistribution::Uniform => self.rng.gen_range(min..=max),
            SpawnDistribution::Zoned { zones } => {
                let zones = zones.max(1);
                let zone_height = (max - min) / zones as f32;
                let zone = self.rng.gen_range(0..zones);
                let zone_top = min + zone as f32 * zone_height;
                (zone_top + self.rng.gen_range(0.0..zone_height)).min(max)
            }
        }
    }

    fn spawn_pipe(&mut self) {
        let gap_center = self.next_gap_center();
        self.pipes.push(Pipe::new(
            self.spawn_x,
            gap_center,
            self.config.width,
            self.config.gap_height,
        ));
    }

    /// Whether the bird's padded hitbox touches the solid part of any pipe.
    pub fn check_collision(&self, bird: &Bird) -> bool {
        let hitbox = bird.bounds().inset(self.collision.bird_padding);
        let pipe_padding = self.collision.pipe_padding;

        self.pipes.iter().any(|pipe| {
            let top = pipe.top_hitbox().inset(pipe_padding);
            let bottom = pipe.bottom_hitbox(self.ground_y).inset(pipe_padding);

            hitbox.overlaps(&top) || hitbox.overlaps(&bottom)
        })
    }

    /// Mark every pipe the bird has newly passed and return how many there were.
    ///
    /// A pipe counts at most once; calling again in the same state returns 0.
    pub fn check_scoring(&mut self, bird: &Bird) -> u32 {
        let bird_left = bird.x();
        let mut newly_scored = 0;
        for pipe in &mut self.pipes {
            if pipe.is_passed_by(bird_left) {
                pipe.mark_scored();
                newly_scored += 1;
            }
        }
        newly_scored
    }

    /// Empty the playfield and restart the spawn schedule.
    pub fn reset(&mut self) {
        self.pipes.clear();
        self.spawn_timer = 0;
    }

    /// Place a pipe directly, keeping left-to-right order.
    pub fn insert(&mut self, pipe: Pipe) {
        let index = self.pipes.partition_point(|p| p.x() <= pipe.x());
        self.pipes.insert(index, pipe);
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::BirdSkin;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn manager_with(config: &GameConfig, seed: u64) -> PipeManager<ChaCha8Rng> {
        PipeManager::new(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn manager() -> PipeManager<ChaCha8Rng> {
        manager_with(&GameConfig::default(), 7)
    }

    fn bird_at(y: f32) -> Bird {
        let mut bird = Bird::new(BirdSkin::Orange, GameConfig::default().bird);
        bird.place(y, 0.0);
        bird
    }

    #[test]
    fn test_first_spawn_at_interval() {
        let mut pipes = manager();
        for _ in 0..89 {
            pipes.update();
        }
        assert!(pipes.pipes().is_empty());
        assert_eq!(pipes.spawn_timer(), 89);

        pipes.update();
        assert_eq!(pipes.pipes().len(), 1);
        assert_eq!(pipes.spawn_timer(), 0);
        assert!((pipes.pipes()[0].x() - 432.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_two_pipes_after_180_ticks() {
        let mut pipes = manager();
        for _ in 0..180 {
            pipes.update();
        }
        assert_eq!(pipes.pipes().len(), 2);
        // First pipe has moved 90 ticks at speed 3
        assert!((pipes.pipes()[0].x() - 162.0).abs() < 1e-3);
        assert!((pipes.pipes()[1].x() - 432.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_one_spawn_per_interval_in_steady_state() {
        let mut config = GameConfig::default();
        config.pipes.spawn_interval = 10;
        let mut pipes = manager_with(&config, 1);

        let mut spawn_ticks = Vec::new();
        for tick in 1..=400u32 {
            let before_rightmost = pipes.pipes().last().map(|p| p.x());
            pipes.update();
            let after_rightmost = pipes.pipes().last().map(|p| p.x());
            if after_rightmost.is_some_and(|x| (x - 432.0).abs() < f32::EPSILON)
                && before_rightmost != after_rightmost
            {
                spawn_ticks.push(tick);
            }
        }
        let expected: Vec<u32> = (1..=40).map(|k| k * 10).collect();
        assert_eq!(spawn_ticks, expected);
    }

    #[test]
    fn test_pipe_moves_by_speed_until_removed() {
        let mut pipes = manager();
        pipes.insert(Pipe::new(30.0, 300.0, 52.0, 150.0));

        let mut previous = 30.0;
        let mut ticks = 0;
        while let Some(pipe) = pipes.pipes().first().filter(|p| p.gap_center() == 300.0) {
            assert!(pipe.right() >= 0.0);
            if ticks > 0 {
                assert!((previous - pipe.x() - 3.0).abs() < 1e-4);
            }
            previous = pipe.x();
            pipes.update();
            ticks += 1;
        }
        // x goes 30, 27, ..., -51 (right edge 1), then -54 (right edge -2) is removed
        assert_eq!(ticks, 28);
    }

    #[test]
    fn test_gap_centers_within_bounds_for_both_distributions() {
        for distribution in [
            SpawnDistribution::Uniform,
            SpawnDistribution::Zoned { zones: 5 },
            SpawnDistribution::Zoned { zones: 1 },
        ] {
            let mut config = GameConfig::default();
            config.pipes.distribution = distribution;
            let mut pipes = manager_with(&config, 99);
            for _ in 0..2000 {
                let y = pipes.next_gap_center();
                assert!((150.0..=568.0).contains(&y), "{distribution:?} gave {y}");
            }
        }
    }

    #[test]
    fn test_zoned_distribution_hits_every_zone() {
        let mut pipes = manager();
        let zone_height = (568.0 - 150.0) / 5.0;
        let mut counts = [0u32; 5];
        for _ in 0..5000 {
            let y = pipes.next_gap_center();
            let zone = (((y - 150.0) / zone_height) as usize).min(4);
            counts[zone] += 1;
        }
        for count in counts {
            // Expected 1000 per zone
            assert!((800..1200).contains(&count), "zone counts {counts:?}");
        }
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let mut a = manager_with(&GameConfig::default(), 42);
        let mut b = manager_with(&GameConfig::default(), 42);
        for _ in 0..20 {
            assert_eq!(a.next_gap_center(), b.next_gap_center());
        }
    }

    #[test]
    fn test_collision_with_top_pipe() {
        let mut pipes = manager();
        // Gap spans 400..550, bird at 384 overlaps the top pipe
        pipes.insert(Pipe::new(100.0, 475.0, 52.0, 150.0));
        assert!(pipes.check_collision(&bird_at(384.0)));
    }

    #[test]
    fn test_collision_with_bottom_pipe() {
        let mut pipes = manager();
        // Gap spans 225..375, bird spans 384..408
        pipes.insert(Pipe::new(100.0, 300.0, 52.0, 150.0));
        assert!(pipes.check_collision(&bird_at(384.0)));
    }

    #[test]
    fn test_no_collision_inside_gap() {
        let mut pipes = manager();
        pipes.insert(Pipe::new(100.0, 396.0, 52.0, 150.0));
        assert!(!pipes.check_collision(&bird_at(384.0)));
    }

    #[test]
    fn test_no_collision_without_horizontal_overlap() {
        let mut pipes = manager();
        // Bird hitbox is 112..138 with default padding 4; pipe starts at 138
        pipes.insert(Pipe::new(138.0, 100.0, 52.0, 150.0));
        assert!(!pipes.check_collision(&bird_at(384.0)));
        pipes.insert(Pipe::new(137.0, 100.0, 52.0, 150.0));
        assert!(pipes.check_collision(&bird_at(384.0)));
    }

    #[test]
    fn test_padding_forgives_edge_graze() {
        let mut strict = GameConfig::default();
        strict.collision.bird_padding = 0.0;
        let mut lenient = GameConfig::default();
        lenient.collision.bird_padding = 6.0;

        let pipe = Pipe::new(100.0, 300.0, 52.0, 150.0); // gap bottom at 375
        let mut strict_pipes = manager_with(&strict, 0);
        let mut lenient_pipes = manager_with(&lenient, 0);
        strict_pipes.insert(pipe.clone());
        lenient_pipes.insert(pipe);

        // Bird bottom at 378 grazes the bottom pipe by 3 units
        let bird = bird_at(354.0);
        assert!(strict_pipes.check_collision(&bird));
        assert!(!lenient_pipes.check_collision(&bird));
    }

    #[test]
    fn test_scoring_once_per_pipe() {
        let mut pipes = manager();
        pipes.insert(Pipe::new(40.0, 300.0, 52.0, 150.0)); // right edge 92 < bird x 108
        pipes.insert(Pipe::new(200.0, 300.0, 52.0, 150.0));
        let bird = bird_at(300.0);

        assert_eq!(pipes.check_scoring(&bird), 1);
        assert!(pipes.pipes()[0].is_scored());
        assert!(!pipes.pipes()[1].is_scored());
        assert_eq!(pipes.check_scoring(&bird), 0);
    }

    #[test]
    fn test_scoring_requires_strictly_past_right_edge() {
        let mut pipes = manager();
        pipes.insert(Pipe::new(56.0, 300.0, 52.0, 150.0)); // right edge exactly 108
        assert_eq!(pipes.check_scoring(&bird_at(300.0)), 0);
    }

    #[test]
    fn test_insert_keeps_spatial_order() {
        let mut pipes = manager();
        pipes.insert(Pipe::new(300.0, 300.0, 52.0, 150.0));
        pipes.insert(Pipe::new(100.0, 300.0, 52.0, 150.0));
        pipes.insert(Pipe::new(200.0, 300.0, 52.0, 150.0));
        let xs: Vec<f32> = pipes.pipes().iter().map(|p| p.x()).collect();
        assert_eq!(xs, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_reset_clears_pipes_and_timer() {
        let mut pipes = manager();
        for _ in 0..150 {
            pipes.update();
        }
        assert!(!pipes.pipes().is_empty());
        pipes.reset();
        assert!(pipes.pipes().is_empty());
        assert_eq!(pipes.spawn_timer(), 0);
    }
}
