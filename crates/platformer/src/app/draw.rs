//! Maps a simulation snapshot onto canvas primitives.
//!
//! Nothing here mutates the simulation. Animation phases come from the
//! run time rather than the wall clock, so a frame is a pure function of
//! the snapshot.

use engine::{text_width, with_alpha, Canvas, Rgba};

use crate::sim::backdrop::MOUNTAIN_RANGES;
use crate::sim::entities::{
    BlockKind, ParticleKind, Player, PowerUpKind, BLOCK_SIZE, COIN_SIZE, ENEMY_SIZE,
    POWER_UP_SIZE,
};
use crate::sim::state::GameState;
use crate::sim::world::WorldStore;
use crate::sim::Simulation;

const SKY_TOP: Rgba = [135, 206, 235, 255];
const SKY_BOTTOM: Rgba = [92, 148, 252, 255];
const PLATFORM_BROWN: Rgba = [139, 69, 19, 255];
const QUESTION_YELLOW: Rgba = [255, 255, 0, 255];
const USED_GRAY: Rgba = [128, 128, 128, 255];
const BRICK_ORANGE: Rgba = [210, 105, 30, 255];
const ENEMY_GREEN: Rgba = [0, 178, 0, 255];
const COIN_GOLD: Rgba = [255, 215, 0, 255];
const WATER_TOP: Rgba = [60, 170, 255, 255];
const WATER_DEEP: Rgba = [0, 100, 200, 255];
const LAVA_TOP: Rgba = [255, 100, 0, 255];
const LAVA_DEEP: Rgba = [200, 60, 0, 255];
const COMBO_ORANGE: Rgba = [255, 128, 0, 255];
const SHADE: Rgba = [0, 0, 0, 150];
const WHITE: Rgba = [255, 255, 255, 255];
const BLACK: Rgba = [0, 0, 0, 255];
const RED: Rgba = [255, 0, 0, 255];
const BLUE: Rgba = [0, 0, 255, 255];
const DARK_GRAY: Rgba = [64, 64, 64, 255];

const HUD_SCALE: i32 = 3;
const PIT_SCAN_MARGIN: i32 = 300;
const LAVA_BAND_WIDTH: i32 = 1000;
const COIN_BREATH: [f32; 4] = [1.0, 0.9, 0.8, 0.9];

/// World-to-screen mapping for one frame.
#[derive(Debug, Clone, Copy)]
struct View {
    camera_x: i32,
    shake: (i32, i32),
}

impl View {
    fn x(&self, world_x: i32) -> i32 {
        world_x - self.camera_x + self.shake.0
    }

    fn y(&self, world_y: i32) -> i32 {
        world_y + self.shake.1
    }
}

pub(crate) fn draw_frame(canvas: &mut Canvas<'_>, sim: &Simulation) {
    match sim.game_state() {
        GameState::Title => draw_title(canvas),
        GameState::Playing => draw_world(canvas, sim),
        GameState::Paused => {
            draw_world(canvas, sim);
            draw_paused(canvas, sim.sound_enabled());
        }
        GameState::GameOver => {
            draw_world(canvas, sim);
            draw_game_over(canvas, sim.state().score);
        }
    }
}

fn draw_title(canvas: &mut Canvas<'_>) {
    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    canvas.clear(SKY_BOTTOM);
    canvas.draw_text_centered(width / 2, height / 3 - 30, "SUPER PLATFORMER", 6, WHITE);
    canvas.draw_text_centered(width / 2, height / 2 + 40, "PRESS ENTER TO START", 3, WHITE);
    let controls = ["ARROWS: MOVE", "SPACE: JUMP", "P: PAUSE", "S: TOGGLE SOUND"];
    for (row, line) in controls.iter().enumerate() {
        canvas.draw_text_centered(width / 2, height / 2 + 100 + row as i32 * 25, line, 2, WHITE);
    }
}

fn draw_world(canvas: &mut Canvas<'_>, sim: &Simulation) {
    let config = sim.config();
    let world = sim.world();
    let view = View {
        camera_x: sim.camera_x(),
        shake: sim.shake_offset(),
    };
    let ticks = animation_step(sim);

    draw_sky(canvas, config.ground_level);
    for range in &MOUNTAIN_RANGES {
        for peak in range.peaks(view.camera_x, config.screen_width, config.ground_level) {
            canvas.fill_peak(
                peak.apex_x + view.shake.0,
                view.y(peak.apex_y),
                view.y(peak.base_y),
                peak.half_base,
                range.color,
            );
        }
    }
    draw_pits(canvas, world, view, config.ground_level, config.tile_size, ticks);

    let parallax_camera = view.camera_x / 2;
    for cloud in &world.clouds {
        canvas.fill_oval(
            cloud.x - parallax_camera + view.shake.0,
            view.y(cloud.y),
            cloud.width,
            cloud.height,
            WHITE,
        );
    }

    for platform in &world.platforms {
        canvas.fill_rect(
            view.x(platform.x),
            view.y(platform.y),
            platform.width,
            platform.height,
            PLATFORM_BROWN,
        );
    }

    for block in &world.blocks {
        let (x, y) = (view.x(block.x), view.y(block.y));
        canvas.fill_rect(x, y, BLOCK_SIZE, BLOCK_SIZE, block_color(block.kind));
        if block.kind == BlockKind::Question && !block.hit {
            canvas.draw_text(x + 10, y + 8, "?", 3, BLACK);
        }
    }

    for power_up in &world.power_ups {
        let (x, y) = (view.x(power_up.x), view.y(power_up.y));
        match power_up.kind {
            PowerUpKind::Mushroom => {
                canvas.fill_oval(x, y, POWER_UP_SIZE, POWER_UP_SIZE, RED);
                canvas.fill_rect(x + 8, y + 16, 16, 16, WHITE);
            }
        }
    }

    let breath = COIN_BREATH[(ticks / 6 % 4) as usize];
    let scaled = (COIN_SIZE as f32 * breath) as i32;
    for coin in &world.coins {
        let center_x = view.x(coin.x) + COIN_SIZE / 2;
        let center_y = view.y(coin.y + coin.bob_offset) + COIN_SIZE / 2;
        canvas.fill_oval(
            center_x - scaled / 2,
            center_y - scaled / 2,
            scaled,
            scaled,
            COIN_GOLD,
        );
    }

    for enemy in &world.enemies {
        let (x, y) = (view.x(enemy.x), view.y(enemy.y));
        canvas.fill_rect(x, y, ENEMY_SIZE, ENEMY_SIZE, ENEMY_GREEN);
        let (eye, pupil) = if enemy.direction > 0 { (18, 20) } else { (5, 7) };
        canvas.fill_oval(x + eye, y + 5, 7, 7, WHITE);
        canvas.fill_oval(x + pupil, y + 6, 3, 3, BLACK);
        canvas.fill_rect(x + 5, y + ENEMY_SIZE - 3, 7, 3, BLACK);
        canvas.fill_rect(x + ENEMY_SIZE - 12, y + ENEMY_SIZE - 3, 7, 3, BLACK);
    }

    for particle in &world.particles {
        let x = view.x(particle.x as i32);
        let y = view.y(particle.y as i32);
        match particle.kind {
            ParticleKind::Generic => canvas.fill_rect(
                x,
                y,
                particle.size,
                particle.size,
                with_alpha(particle.color, particle.alpha()),
            ),
            ParticleKind::CoinPop => {
                canvas.fill_oval(x, y, particle.size, particle.size, particle.color)
            }
        }
    }

    for text in &world.floating_texts {
        canvas.draw_text_centered(
            view.x(text.x as i32),
            view.y(text.y as i32),
            &text.text,
            2,
            with_alpha(WHITE, text.alpha()),
        );
    }

    if player_visible(sim.player(), ticks) {
        draw_player(canvas, sim.player(), view);
    }

    draw_hud(canvas, sim);
}

/// Sixtieths of a second since the run started.
fn animation_step(sim: &Simulation) -> u64 {
    (sim.state().run_time.as_millis() / 16) as u64
}

/// Invincible players blink at roughly 5 Hz.
fn player_visible(player: &Player, ticks: u64) -> bool {
    !player.is_invincible() || ticks / 6 % 2 == 0
}

fn block_color(kind: BlockKind) -> Rgba {
    match kind {
        BlockKind::Question => QUESTION_YELLOW,
        BlockKind::Used => USED_GRAY,
        BlockKind::Brick => BRICK_ORANGE,
    }
}

fn draw_sky(canvas: &mut Canvas<'_>, ground_level: i32) {
    canvas.clear(SKY_BOTTOM);
    let width = canvas.width() as i32;
    let rows = ground_level.max(1);
    for row in 0..rows {
        canvas.fill_rect(
            0,
            row,
            width,
            1,
            lerp_color(SKY_TOP, SKY_BOTTOM, row as f32 / rows as f32),
        );
    }
}

fn lerp_color(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|channel| {
        let (a, b) = (from[channel] as f32, to[channel] as f32);
        (a + (b - a) * t).round() as u8
    })
}

/// World-x spans without a ground tile around the view, scanned one tile
/// at a time on the tile grid. A span still open at the right edge runs to
/// the scan end.
pub(crate) fn pit_spans(
    world: &WorldStore,
    camera_x: i32,
    screen_width: i32,
    ground_level: i32,
    tile_size: i32,
) -> Vec<(i32, i32)> {
    let tile_size = tile_size.max(1);
    let scan_end = camera_x + screen_width + PIT_SCAN_MARGIN;
    let mut spans = Vec::new();
    let mut open: Option<i32> = None;
    let mut x = (camera_x - PIT_SCAN_MARGIN).div_euclid(tile_size) * tile_size;
    while x < scan_end {
        let solid = world.has_ground_at(x, ground_level);
        match (open, solid) {
            (None, false) => open = Some(x),
            (Some(start), true) => {
                spans.push((start, x));
                open = None;
            }
            _ => {}
        }
        x += tile_size;
    }
    if let Some(start) = open {
        spans.push((start, scan_end));
    }
    spans
}

fn draw_pits(
    canvas: &mut Canvas<'_>,
    world: &WorldStore,
    view: View,
    ground_level: i32,
    tile_size: i32,
    ticks: u64,
) {
    let screen_width = canvas.width() as i32;
    let screen_height = canvas.height() as i32;
    let phase = ticks as f32 / 30.0;
    let surface = ground_level + 10 + (phase.sin() * 4.0) as i32;

    for (start, end) in pit_spans(world, view.camera_x, screen_width, ground_level, tile_size) {
        let lava = start.div_euclid(LAVA_BAND_WIDTH) % 2 == 0;
        let (top, deep) = if lava {
            (LAVA_TOP, LAVA_DEEP)
        } else {
            (WATER_TOP, WATER_DEEP)
        };
        let depth = (screen_height - surface).max(1);
        for row in 0..depth {
            canvas.fill_rect(
                view.x(start),
                view.y(surface + row),
                end - start,
                1,
                lerp_color(top, deep, row as f32 / depth as f32),
            );
        }
        let ripple = with_alpha(if lava { [255, 200, 0, 255] } else { WHITE }, 0.4);
        for index in 0..(end - start) / 10 {
            let lift = ((phase + index as f32 * 0.3).sin() * 3.0) as i32;
            canvas.fill_rect(view.x(start + index * 10), view.y(surface + lift), 5, 1, ripple);
        }
    }
}

fn draw_player(canvas: &mut Canvas<'_>, player: &Player, view: View) {
    let (x, y) = (view.x(player.x), view.y(player.y));
    let (width, height) = (player.width, player.height);
    let facing_right = player.vel_x >= 0;
    let big = player.power_level > 0;
    let eye_y = if big { 10 } else { 5 };
    let overalls_top = if big { 30 } else { 20 };

    canvas.fill_rect(x, y, width, height, RED);
    canvas.fill_rect(x - 2, y, width + 4, 10, RED);
    canvas.fill_oval(x + if facing_right { 18 } else { 5 }, y + eye_y, 7, 7, WHITE);
    canvas.fill_oval(x + if facing_right { 20 } else { 7 }, y + eye_y + 1, 3, 3, BLACK);
    canvas.fill_rect(x, y + overalls_top, width, height - overalls_top, BLUE);

    let feet = y + height - 8;
    if player.vel_x != 0 && player.on_ground {
        let stride = (player.anim_frame() as i32 * 2) % 8;
        canvas.fill_rect(x + leg_shift(stride), feet, 12, 8, DARK_GRAY);
        canvas.fill_rect(
            x + width - 12 + leg_shift((stride + 4) % 8),
            feet,
            12,
            8,
            DARK_GRAY,
        );
    } else {
        canvas.fill_rect(x, feet, 12, 8, DARK_GRAY);
        canvas.fill_rect(x + width - 12, feet, 12, 8, DARK_GRAY);
    }

    if !big && !player.on_ground {
        canvas.fill_rect(x + if facing_right { 0 } else { 15 }, y + 15, 15, 5, RED);
    }
}

/// Forward for the first half of the stride, back for the second.
fn leg_shift(stride: i32) -> i32 {
    if stride < 4 {
        stride - 5
    } else {
        5 - (stride - 4)
    }
}

fn draw_hud(canvas: &mut Canvas<'_>, sim: &Simulation) {
    let hud = sim.hud();
    let width = canvas.width() as i32;

    canvas.draw_text(20, 15, &format!("SCORE {}", hud.score), HUD_SCALE, WHITE);
    canvas.fill_oval(20, 40, 20, 20, COIN_GOLD);
    canvas.draw_text(50, 43, &format!("X {}", hud.coins), HUD_SCALE, WHITE);
    canvas.fill_rect(20, 70, 20, 20, RED);
    canvas.draw_text(50, 73, &format!("X {}", hud.lives), HUD_SCALE, WHITE);

    let time = format!("TIME {}", hud.elapsed_label());
    canvas.draw_text(width - 20 - text_width(&time, HUD_SCALE), 15, &time, HUD_SCALE, WHITE);

    if let Some(combo) = hud.combo {
        let alpha = combo.remaining;
        canvas.draw_text(
            width - 200,
            65,
            &format!("{}X COMBO!", combo.count),
            HUD_SCALE,
            with_alpha(COMBO_ORANGE, alpha),
        );
        canvas.fill_rect(
            width - 200,
            90,
            (combo.remaining * 150.0) as i32,
            5,
            with_alpha(WHITE, alpha * 0.7),
        );
    }
}

fn draw_paused(canvas: &mut Canvas<'_>, sound_enabled: bool) {
    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    canvas.fill_rect(0, 0, width, height, SHADE);
    canvas.draw_text_centered(width / 2, height / 2 - 30, "PAUSED", 8, WHITE);
    canvas.draw_text_centered(width / 2, height / 2 + 40, "PRESS P TO RESUME", 3, WHITE);
    let sound = if sound_enabled {
        "SOUND: ON (S)"
    } else {
        "SOUND: OFF (S)"
    };
    canvas.draw_text_centered(width / 2, height / 2 + 90, sound, 2, WHITE);
}

fn draw_game_over(canvas: &mut Canvas<'_>, score: u32) {
    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    canvas.fill_rect(0, 0, width, height, SHADE);
    canvas.draw_text_centered(width / 2, height / 2 - 30, "GAME OVER", 8, WHITE);
    canvas.draw_text_centered(width / 2, height / 2 + 40, "PRESS R TO RESTART", 3, WHITE);
    canvas.draw_text_centered(
        width / 2,
        height / 2 + 90,
        &format!("FINAL SCORE: {score}"),
        3,
        WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::WorldConfig;

    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 600;

    fn pixel(frame: &[u8], x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * WIDTH + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn render(sim: &Simulation) -> Vec<u8> {
        let mut frame = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        let mut canvas = Canvas::new(&mut frame, WIDTH, HEIGHT);
        draw_frame(&mut canvas, sim);
        frame
    }

    fn ground_world(tiles: std::ops::Range<i32>) -> WorldStore {
        let config = WorldConfig::default();
        let mut world = WorldStore::default();
        for tile in tiles {
            world.push_ground_column(tile, &config);
        }
        world
    }

    #[test]
    fn pits_are_found_between_ground_runs() {
        let mut world = ground_world(-20..60);
        world
            .platforms
            .retain(|platform| !(320..416).contains(&platform.x));
        let spans = pit_spans(&world, 0, 800, 500, 32);
        assert_eq!(spans, vec![(320, 416)]);
    }

    #[test]
    fn pit_open_at_scan_end_runs_to_scan_end() {
        let world = ground_world(-20..20);
        let spans = pit_spans(&world, 0, 800, 500, 32);
        assert_eq!(spans, vec![(640, 1100)]);
    }

    #[test]
    fn solid_ground_has_no_pits() {
        let world = ground_world(-20..60);
        assert!(pit_spans(&world, 0, 800, 500, 32).is_empty());
    }

    #[test]
    fn title_screen_is_flat_sky() {
        let sim = Simulation::new(WorldConfig::default(), 1);
        let frame = render(&sim);
        assert_eq!(pixel(&frame, 5, 595), SKY_BOTTOM);
    }

    #[test]
    fn playing_frame_draws_sky_and_ground() {
        let mut sim = Simulation::new(WorldConfig::default(), 1);
        sim.state_mut().game_state = GameState::Playing;
        let frame = render(&sim);
        assert_eq!(pixel(&frame, 400, 0), SKY_TOP);
        assert_eq!(pixel(&frame, 790, 520), PLATFORM_BROWN);
    }

    #[test]
    fn game_over_shades_the_world() {
        let mut sim = Simulation::new(WorldConfig::default(), 1);
        sim.state_mut().game_state = GameState::GameOver;
        let frame = render(&sim);
        let shaded = pixel(&frame, 790, 520);
        assert!(shaded[0] < PLATFORM_BROWN[0]);
    }

    #[test]
    fn invincible_player_blinks() {
        let mut player = Player::new(0, 0);
        assert!(player_visible(&player, 7));
        player.grant_invincibility(std::time::Duration::ZERO, std::time::Duration::from_secs(1));
        assert!(player_visible(&player, 0));
        assert!(!player_visible(&player, 6));
        assert!(player_visible(&player, 12));
    }

    #[test]
    fn legs_swing_forward_then_back() {
        assert_eq!(leg_shift(0), -5);
        assert_eq!(leg_shift(2), -3);
        assert_eq!(leg_shift(4), 5);
        assert_eq!(leg_shift(6), 3);
    }
}
