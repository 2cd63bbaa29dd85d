use tracing::{info, warn};

use super::config::WorldConfig;
use super::effects;
use super::entities::{Platform, PLAYER_WIDTH};
use super::events::{AudioCommand, MusicTrack, SoundEffect};
use super::geometry::Rect;
use super::state::GameState;
use super::world::WorldStore;
use super::TickContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Fell,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    GameOver,
    Respawned { forced_ground: bool },
}

/// Takes a life. With lives left the player is put back on solid ground
/// inside the current view; otherwise the run ends.
pub(crate) fn kill_player(ctx: &mut TickContext<'_>, cause: DeathCause) -> DeathOutcome {
    ctx.state.lives = ctx.state.lives.saturating_sub(1);
    ctx.audio.play(SoundEffect::Death);

    if ctx.state.lives == 0 {
        ctx.state.game_state = GameState::GameOver;
        ctx.audio.push(AudioCommand::Stop(MusicTrack::Theme));
        info!(score = ctx.state.score, coins = ctx.state.coins, ?cause, "game_over");
        return DeathOutcome::GameOver;
    }

    let center = (
        ctx.player.x + ctx.player.width / 2,
        ctx.player.y + ctx.player.height / 2,
    );
    effects::spawn_burst(&mut ctx.world.particles, ctx.rng, effects::death_burst(center));

    let config = ctx.config;
    let camera_x = ctx.state.camera_x;
    let desired_x = config.respawn_min_x.max(camera_x + config.respawn_offset_x);
    let (tile, forced_ground) = match find_safe_ground(ctx.world, config, camera_x, desired_x) {
        Some(tile) => (tile, false),
        None => {
            let tile = forced_ground_tile(ctx.world, config, camera_x, desired_x);
            if !ctx.world.has_ground_at(tile.x, config.ground_level) {
                ctx.world.push_ground_column(config.ground_tile_index(tile.x), config);
            }
            warn!(camera_x, tile_x = tile.x, "respawn_ground_forced");
            (tile, true)
        }
    };

    let player = &mut *ctx.player;
    player.reset_power();
    player.x = tile.x + tile.width / 2 - player.width / 2;
    player.y = config.ground_level - config.respawn_height_above_ground;
    player.vel_x = 0;
    player.vel_y = 0;
    player.on_ground = false;
    player.grant_invincibility(ctx.state.clock, config.respawn_invincibility);
    effects::spawn_respawn_sparkle(&mut ctx.world.particles, ctx.rng, player);

    info!(
        lives_left = ctx.state.lives,
        ?cause,
        respawn_x = player.x,
        forced_ground,
        "player_died"
    );
    DeathOutcome::Respawned { forced_ground }
}

/// Ground tile fully inside `[camera_x, camera_x + screen_width)` closest
/// to `desired_x` whose drop column is clear. The first tile wins ties.
pub fn find_safe_ground(
    world: &WorldStore,
    config: &WorldConfig,
    camera_x: i32,
    desired_x: i32,
) -> Option<Platform> {
    world
        .platforms
        .iter()
        .filter(|platform| {
            platform.is_ground(config.ground_level)
                && platform.x >= camera_x
                && platform.x + platform.width <= camera_x + config.screen_width
                && drop_column_is_clear(world, config, platform.x, platform.width)
        })
        .fold(None, |best: Option<&Platform>, candidate| match best {
            Some(current) if (current.x - desired_x).abs() <= (candidate.x - desired_x).abs() => {
                Some(current)
            }
            _ => Some(candidate),
        })
        .copied()
}

/// Space a respawned player centred on the tile falls through before
/// reaching the ground line.
fn drop_column(config: &WorldConfig, tile_x: i32, tile_width: i32) -> Rect {
    Rect::new(
        tile_x + tile_width / 2 - PLAYER_WIDTH / 2,
        config.ground_level - config.respawn_height_above_ground,
        PLAYER_WIDTH,
        config.respawn_height_above_ground,
    )
}

fn drop_column_is_clear(
    world: &WorldStore,
    config: &WorldConfig,
    tile_x: i32,
    tile_width: i32,
) -> bool {
    let column = drop_column(config, tile_x, tile_width);
    let platform_blocks = world.platforms.iter().any(|platform| {
        !platform.is_ground(config.ground_level) && platform.bounds().intersects(&column)
    });
    let block_blocks = world
        .blocks
        .iter()
        .any(|block| block.bounds().intersects(&column));
    !platform_blocks && !block_blocks
}

/// First tile at or right of `desired_x` still inside the view with a
/// clear drop column; the desired tile when every column is obstructed.
fn forced_ground_tile(
    world: &WorldStore,
    config: &WorldConfig,
    camera_x: i32,
    desired_x: i32,
) -> Platform {
    let tile_at = |index: i32| {
        Platform::new(
            index * config.tile_size,
            config.ground_level,
            config.tile_size,
            config.tile_size,
        )
    };
    let first = config.ground_tile_index(desired_x);
    let view_end = camera_x + config.screen_width;
    (first..)
        .map(tile_at)
        .take_while(|tile| tile.x + tile.width <= view_end)
        .find(|tile| drop_column_is_clear(world, config, tile.x, tile.width))
        .unwrap_or_else(|| tile_at(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Block, BlockContent, BlockKind};

    fn world_with(platforms: &[Platform]) -> WorldStore {
        WorldStore {
            platforms: platforms.to_vec(),
            ..WorldStore::default()
        }
    }

    #[test]
    fn nearest_ground_in_view_wins() {
        let world = world_with(&[
            Platform::new(0, 500, 32, 32),
            Platform::new(320, 500, 32, 32),
            Platform::new(288, 500, 32, 32),
            Platform::new(300, 532, 32, 32),
        ]);
        let found = find_safe_ground(&world, &WorldConfig::default(), 200, 300).expect("ground");
        assert_eq!(found.x, 288);
    }

    #[test]
    fn ground_outside_view_is_ignored() {
        let world = world_with(&[
            Platform::new(0, 500, 32, 32),
            Platform::new(990, 500, 32, 32),
        ]);
        assert_eq!(find_safe_ground(&world, &WorldConfig::default(), 200, 300), None);
    }

    #[test]
    fn tiles_must_lie_wholly_inside_the_view() {
        let config = WorldConfig::default();
        let world = world_with(&[
            Platform::new(168, 500, 32, 32),
            Platform::new(984, 500, 32, 32),
        ]);
        assert_eq!(find_safe_ground(&world, &config, 200, 990), None);

        let world = world_with(&[
            Platform::new(200, 500, 32, 32),
            Platform::new(968, 500, 32, 32),
        ]);
        let found = find_safe_ground(&world, &config, 200, 990).expect("ground");
        assert_eq!(found.x, 968);
    }

    #[test]
    fn filler_rows_are_not_ground() {
        let world = world_with(&[Platform::new(300, 532, 32, 32)]);
        assert_eq!(find_safe_ground(&world, &WorldConfig::default(), 200, 300), None);
    }

    #[test]
    fn obstructed_columns_are_skipped() {
        let config = WorldConfig::default();
        let mut world = world_with(&[
            Platform::new(288, 500, 32, 32),
            Platform::new(352, 500, 32, 32),
            Platform::new(280, 450, 50, 20),
        ]);
        let found = find_safe_ground(&world, &config, 200, 300).expect("ground");
        assert_eq!(found.x, 352);

        world.blocks.push(Block::new(352, 420, BlockKind::Brick, BlockContent::Empty));
        assert_eq!(find_safe_ground(&world, &config, 200, 300), None);
    }

    #[test]
    fn platforms_above_the_drop_column_do_not_count() {
        let config = WorldConfig::default();
        let world = world_with(&[
            Platform::new(288, 500, 32, 32),
            Platform::new(280, 360, 50, 20),
        ]);
        let found = find_safe_ground(&world, &config, 200, 300).expect("ground");
        assert_eq!(found.x, 288);
    }

    #[test]
    fn forced_tile_steps_right_past_obstructions() {
        let config = WorldConfig::default();
        let world = world_with(&[Platform::new(300, 440, 96, 32)]);
        let tile = forced_ground_tile(&world, &config, 200, 300);
        assert_eq!(tile.x, 416);
        assert_eq!(tile.y, config.ground_level);
    }
}
