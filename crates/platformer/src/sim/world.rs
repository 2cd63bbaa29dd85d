use rand::Rng;
use serde::Serialize;

use super::config::WorldConfig;
use super::entities::{
    Block, BlockContent, BlockKind, Cloud, Coin, Enemy, FloatingText, Particle, Platform, PowerUp,
    ENEMY_SIZE, POWER_UP_SIZE,
};

/// Owner of every world entity collection except the player.
///
/// Generation appends, behaviour passes mutate in place, and removal goes
/// through `retain` so no pass ever removes while iterating.
#[derive(Debug, Default, Clone)]
pub struct WorldStore {
    pub platforms: Vec<Platform>,
    pub blocks: Vec<Block>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
    pub clouds: Vec<Cloud>,
    pub particles: Vec<Particle>,
    pub floating_texts: Vec<FloatingText>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub platforms: usize,
    pub blocks: usize,
    pub enemies: usize,
    pub coins: usize,
    pub power_ups: usize,
    pub clouds: usize,
    pub particles: usize,
    pub floating_texts: usize,
}

impl WorldStore {
    /// Hand-placed opening stretch: solid ground up to the initial horizon,
    /// three floating platforms, two question blocks, two coins, one enemy
    /// and five clouds.
    pub fn initial<R: Rng>(config: &WorldConfig, rng: &mut R) -> Self {
        let mut world = WorldStore::default();
        let ground = config.ground_level;
        let last_tile = config.initial_horizon / config.tile_size;
        for tile in config.initial_ground_first_tile..last_tile {
            world.push_ground_column(tile, config);
        }

        world.platforms.extend([
            Platform::new(300, ground - 100, 100, 20),
            Platform::new(500, ground - 150, 100, 20),
            Platform::new(700, ground - 120, 100, 20),
        ]);
        world.blocks.extend([
            Block::new(350, ground - 200, BlockKind::Question, BlockContent::Coin),
            Block::new(550, ground - 240, BlockKind::Question, BlockContent::PowerUp),
        ]);
        world
            .coins
            .extend([Coin::new(320, ground - 130), Coin::new(520, ground - 180)]);
        world.enemies.push(Enemy::new(600, ground - ENEMY_SIZE, 1));

        for _ in 0..5 {
            let x = rng.gen_range(0..config.screen_width * 2) - config.screen_width;
            world.clouds.push(random_cloud(rng, x));
        }
        world
    }

    /// One collidable ground tile plus its purely visual filler rows.
    pub fn push_ground_column(&mut self, tile: i32, config: &WorldConfig) {
        let x = tile * config.tile_size;
        self.platforms.push(Platform::new(
            x,
            config.ground_level,
            config.tile_size,
            config.tile_size,
        ));
        for row in 1..=config.filler_rows {
            self.platforms.push(Platform::new(
                x,
                config.ground_level + row * config.tile_size,
                config.tile_size,
                config.tile_size,
            ));
        }
    }

    pub fn has_ground_at(&self, x: i32, ground_level: i32) -> bool {
        self.platforms
            .iter()
            .any(|platform| platform.is_ground(ground_level) && platform.bounds().contains_x(x))
    }

    /// Drops everything whose right edge is left of `removal_x`, plus dead
    /// particles. Ground-level tiles are kept so respawn always has footing
    /// near the camera.
    pub fn prune_behind(&mut self, removal_x: i32, ground_level: i32) -> usize {
        let before = self.entity_count();
        self.platforms.retain(|platform| {
            platform.x + platform.width >= removal_x || platform.is_ground(ground_level)
        });
        self.coins.retain(|coin| coin.bounds().right() >= removal_x);
        self.enemies.retain(|enemy| enemy.x + ENEMY_SIZE >= removal_x);
        self.blocks.retain(|block| block.bounds().right() >= removal_x);
        self.power_ups
            .retain(|power_up| power_up.x + POWER_UP_SIZE >= removal_x);
        self.particles.retain(|particle| {
            particle.x + particle.size as f32 >= removal_x as f32 && !particle.is_expired()
        });
        before - self.entity_count()
    }

    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            platforms: self.platforms.len(),
            blocks: self.blocks.len(),
            enemies: self.enemies.len(),
            coins: self.coins.len(),
            power_ups: self.power_ups.len(),
            clouds: self.clouds.len(),
            particles: self.particles.len(),
            floating_texts: self.floating_texts.len(),
        }
    }

    pub fn entity_count(&self) -> usize {
        let counts = self.counts();
        counts.platforms
            + counts.blocks
            + counts.enemies
            + counts.coins
            + counts.power_ups
            + counts.clouds
            + counts.particles
            + counts.floating_texts
    }
}

pub(crate) fn random_cloud<R: Rng>(rng: &mut R, x: i32) -> Cloud {
    Cloud {
        x,
        y: rng.gen_range(30..130),
        width: rng.gen_range(80..150),
        height: rng.gen_range(40..70),
        speed: rng.gen_range(1..=2),
    }
}
