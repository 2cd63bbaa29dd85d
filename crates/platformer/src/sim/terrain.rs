use rand::Rng;
use tracing::debug;

use super::config::WorldConfig;
use super::entities::{Block, BlockContent, BlockKind, Coin, Enemy, Platform, COIN_SIZE};
use super::geometry::Rect;
use super::world::{random_cloud, WorldStore};

const MIN_GAP_TILES: i32 = 2;
const MAX_GAP_TILES: i32 = 4;
/// Gaps at least this wide get a helper platform.
const HELPER_GAP_TILES: i32 = 3;
const MAX_HELPER_TILES: i32 = 2;
const COIN_ABOVE_PLATFORM: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapRecord {
    pub start_x: i32,
    pub width_tiles: i32,
    pub helper: Option<Rect>,
}

impl GapRecord {
    pub fn end_x(&self, tile_size: i32) -> i32 {
        self.start_x + self.width_tiles * tile_size
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentReport {
    pub start_x: i32,
    pub end_x: i32,
    pub gaps: Vec<GapRecord>,
}

pub fn needs_extension(horizon: i32, camera_x: i32, config: &WorldConfig) -> bool {
    horizon - camera_x < config.generation_trigger_distance
}

/// Appends one segment `[start_x, start_x + segment_width)` to the world.
///
/// Ground is laid tile by tile. A gap never follows another gap, never
/// opens in the first few tiles of a segment, and never runs past the
/// segment end, so every segment begins and ends on solid ground. Gaps of
/// three or more tiles get a helper platform narrower than the gap.
pub fn generate_segment<R: Rng>(
    world: &mut WorldStore,
    start_x: i32,
    config: &WorldConfig,
    rng: &mut R,
) -> SegmentReport {
    let tile = config.tile_size;
    let ground = config.ground_level;
    let end_x = start_x + config.segment_width;
    let first_tile = start_x.div_euclid(tile);
    let end_tile = end_x.div_euclid(tile);

    let mut gaps = Vec::new();
    let mut last_was_gap = false;
    let mut tile_index = first_tile;
    while tile_index < end_tile {
        let gap_allowed = !last_was_gap && tile_index > first_tile + config.gap_free_lead_tiles;
        if gap_allowed && rng.gen_range(0..100) < config.gap_chance_percent {
            let width_tiles = rng
                .gen_range(MIN_GAP_TILES..=MAX_GAP_TILES)
                .min(end_tile - tile_index);
            if width_tiles >= MIN_GAP_TILES {
                let gap_start = tile_index * tile;
                let helper = (width_tiles >= HELPER_GAP_TILES)
                    .then(|| spawn_helper_platform(world, gap_start, width_tiles, config, rng));
                gaps.push(GapRecord {
                    start_x: gap_start,
                    width_tiles,
                    helper,
                });
                tile_index += width_tiles;
                last_was_gap = true;
                continue;
            }
        }

        world.push_ground_column(tile_index, config);
        last_was_gap = false;
        tile_index += 1;
    }

    for _ in 0..rng.gen_range(2..=4) {
        let x = start_x + rng.gen_range(0..config.screen_width - 100);
        let y = ground - rng.gen_range(0..200) - 50;
        let width = rng.gen_range(2..=4) * tile;
        world.platforms.push(Platform::new(x, y, width, tile));
        maybe_coin_above(world, x, y, width, rng);
    }

    for _ in 0..rng.gen_range(1..=3) {
        let x = start_x + rng.gen_range(0..config.screen_width - 50);
        let y = ground - rng.gen_range(0..200) - 100;
        let kind = if rng.gen_bool(0.5) {
            BlockKind::Question
        } else {
            BlockKind::Brick
        };
        let content = if rng.gen_bool(0.5) {
            BlockContent::Coin
        } else {
            BlockContent::PowerUp
        };
        world.blocks.push(Block::new(x, y, kind, content));
    }

    for _ in 0..rng.gen_range(1..=3) {
        let x = start_x + rng.gen_range(0..config.screen_width - 50);
        let direction = if rng.gen_bool(0.5) { 1 } else { -1 };
        world
            .enemies
            .push(Enemy::new(x, ground - config.tile_size, direction));
    }

    for _ in 0..rng.gen_range(1..=3) {
        let x = start_x + rng.gen_range(0..config.screen_width);
        world.clouds.push(random_cloud(rng, x));
    }

    debug!(
        start_x,
        end_x,
        gap_count = gaps.len(),
        helper_count = gaps.iter().filter(|gap| gap.helper.is_some()).count(),
        "terrain_generated"
    );

    SegmentReport {
        start_x,
        end_x,
        gaps,
    }
}

fn spawn_helper_platform<R: Rng>(
    world: &mut WorldStore,
    gap_start: i32,
    width_tiles: i32,
    config: &WorldConfig,
    rng: &mut R,
) -> Rect {
    let tile = config.tile_size;
    let x = gap_start + tile;
    let y = config.ground_level - rng.gen_range(0..50) - 80;
    let width = (width_tiles - 1).min(MAX_HELPER_TILES) * tile;
    world.platforms.push(Platform::new(x, y, width, tile));
    maybe_coin_above(world, x, y, width, rng);
    Rect::new(x, y, width, tile)
}

fn maybe_coin_above<R: Rng>(world: &mut WorldStore, x: i32, y: i32, width: i32, rng: &mut R) {
    if rng.gen_bool(0.5) {
        world
            .coins
            .push(Coin::new(x + width / 2 - COIN_SIZE / 2, y - COIN_ABOVE_PLATFORM));
    }
}
