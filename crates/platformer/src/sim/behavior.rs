use rand::Rng;
use tracing::debug;

use super::effects;
use super::entities::{
    Enemy, FloatingText, Platform, PowerUpKind, COIN_SIZE, ENEMY_SIZE, POWER_UP_SIZE,
};
use super::events::SoundEffect;
use super::geometry::Rect;
use super::physics::{any_platform_touches, probe_ground};
use super::TickContext;

const MUSHROOM_POINTS: u32 = 1000;
const COIN_POINTS: u32 = 50;
const COIN_TEXT_LIFETIME: i32 = 30;
const STOMP_TEXT_LIFETIME: i32 = 40;
const EDGE_PROBE: i32 = 5;
const CLOUD_WRAP_MARGIN: i32 = 100;

/// Drifts, drops and collects power-ups.
pub(crate) fn update_power_ups(ctx: &mut TickContext<'_>) {
    let speed = ctx.config.power_up_speed;
    for power_up in ctx.world.power_ups.iter_mut() {
        power_up.x += speed * power_up.direction;
        power_up.y += power_up.vel_y;
        power_up.vel_y += ctx.config.gravity;

        let feet = Rect::new(power_up.x, power_up.y + POWER_UP_SIZE, POWER_UP_SIZE, 1);
        if let Some(top) = probe_ground(feet, &ctx.world.platforms) {
            power_up.y = top - POWER_UP_SIZE;
            power_up.vel_y = 0;
        }
    }
    let floor = ctx.config.screen_height;
    ctx.world.power_ups.retain(|power_up| power_up.y <= floor);

    let body = ctx.player.bounds();
    let mut index = 0;
    while index < ctx.world.power_ups.len() {
        if !body.intersects(&ctx.world.power_ups[index].bounds()) {
            index += 1;
            continue;
        }
        let power_up = ctx.world.power_ups.remove(index);
        match power_up.kind {
            PowerUpKind::Mushroom => {
                ctx.player.power_up();
                ctx.state.score += MUSHROOM_POINTS;
                ctx.audio.play(SoundEffect::PowerUp);
            }
        }
    }
}

/// Moves every enemy and settles its contact with the player.
///
/// Returns true when an enemy dealt a lethal hit. Once that happens the
/// remaining enemies still move but no longer interact with the player
/// this tick.
pub(crate) fn update_enemies(ctx: &mut TickContext<'_>) -> bool {
    let speed = ctx.config.enemy_speed;
    let mut player_down = false;
    let mut index = 0;

    while index < ctx.world.enemies.len() {
        let enemy = &mut ctx.world.enemies[index];
        enemy.x += speed * enemy.direction;
        enemy.y += enemy.vel_y;
        enemy.vel_y += ctx.config.gravity;

        let feet = Rect::new(enemy.x, enemy.y + ENEMY_SIZE, ENEMY_SIZE, 1);
        let on_ground = match probe_ground(feet, &ctx.world.platforms) {
            Some(top) => {
                enemy.y = top - ENEMY_SIZE;
                enemy.vel_y = 0;
                true
            }
            None => false,
        };

        if enemy.y > ctx.config.screen_height {
            ctx.world.enemies.remove(index);
            continue;
        }

        let enemy_box = enemy.bounds();
        if !player_down && ctx.player.bounds().intersects(&enemy_box) {
            let feet_line = ctx.player.y + ctx.player.height - ctx.config.stomp_tolerance;
            if ctx.player.vel_y > 0 && feet_line < enemy_box.top() {
                let stomped = ctx.world.enemies.remove(index);
                stomp(ctx, &stomped);
                continue;
            }
            if !ctx.player.is_invincible() {
                if ctx.player.power_down() {
                    ctx.player
                        .grant_invincibility(ctx.state.clock, ctx.config.damage_invincibility);
                    ctx.audio.play(SoundEffect::PowerDown);
                } else {
                    player_down = true;
                }
            }
        }

        let enemy = &mut ctx.world.enemies[index];
        if should_turn(enemy, on_ground, &ctx.world.platforms) {
            enemy.reverse();
        }
        index += 1;
    }

    reverse_overlapping_pairs(&mut ctx.world.enemies);
    player_down
}

fn stomp(ctx: &mut TickContext<'_>, enemy: &Enemy) {
    let center = (enemy.x + ENEMY_SIZE / 2, enemy.y + ENEMY_SIZE / 2);
    effects::spawn_burst(
        &mut ctx.world.particles,
        ctx.rng,
        effects::stomp_burst(center),
    );

    ctx.player.vel_y = ctx.config.stomp_bounce();
    let points = ctx.state.combo.register_stomp(ctx.state.clock);
    ctx.state.score += points;
    ctx.world.floating_texts.push(FloatingText::new(
        format!("+{points}"),
        enemy.x + ENEMY_SIZE / 2,
        enemy.y,
        STOMP_TEXT_LIFETIME,
    ));
    ctx.state.shake.request(ctx.config.stomp_shake);
    ctx.audio.play(SoundEffect::Stomp);
    debug!(combo = ctx.state.combo.count(), points, "enemy_stomped");
}

/// Turns at a ledge while grounded, or at a wall, in the walking direction.
fn should_turn(enemy: &Enemy, on_ground: bool, platforms: &[Platform]) -> bool {
    let (ground_probe, wall_probe) = if enemy.direction > 0 {
        (
            Rect::new(enemy.x + ENEMY_SIZE, enemy.y + ENEMY_SIZE, EDGE_PROBE, EDGE_PROBE),
            Rect::new(enemy.x + ENEMY_SIZE, enemy.y, 1, ENEMY_SIZE),
        )
    } else {
        (
            Rect::new(enemy.x - EDGE_PROBE, enemy.y + ENEMY_SIZE, EDGE_PROBE, EDGE_PROBE),
            Rect::new(enemy.x - 1, enemy.y, 1, ENEMY_SIZE),
        )
    };
    let ground_ahead = any_platform_touches(ground_probe, platforms);
    let wall_ahead = any_platform_touches(wall_probe, platforms);
    (!ground_ahead && on_ground) || wall_ahead
}

/// Both members of every overlapping enemy pair turn around. Pairs are
/// collected before anything flips, so the result does not depend on list
/// order; an enemy caught in two pairs turns twice.
fn reverse_overlapping_pairs(enemies: &mut [Enemy]) {
    let mut pairs = Vec::new();
    for a in 0..enemies.len() {
        for b in (a + 1)..enemies.len() {
            if enemies[a].bounds().intersects(&enemies[b].bounds()) {
                pairs.push((a, b));
            }
        }
    }
    for (a, b) in pairs {
        enemies[a].reverse();
        enemies[b].reverse();
    }
}

pub(crate) fn update_coins(ctx: &mut TickContext<'_>) {
    for coin in ctx.world.coins.iter_mut() {
        coin.bob();
    }

    let body = ctx.player.bounds();
    let mut index = 0;
    while index < ctx.world.coins.len() {
        if !body.intersects(&ctx.world.coins[index].bounds()) {
            index += 1;
            continue;
        }
        let coin = ctx.world.coins.remove(index);
        ctx.state.score += COIN_POINTS;
        ctx.state.coins += 1;
        ctx.audio.play(SoundEffect::Coin);
        ctx.world.floating_texts.push(FloatingText::new(
            format!("+{COIN_POINTS}"),
            coin.x + COIN_SIZE / 2,
            coin.y,
            COIN_TEXT_LIFETIME,
        ));
    }
}

/// Clouds live in half-speed parallax space and wrap back in ahead of the
/// view once they drift off its left side.
pub(crate) fn update_clouds(ctx: &mut TickContext<'_>) {
    let parallax_camera = ctx.state.camera_x / 2;
    for cloud in ctx.world.clouds.iter_mut() {
        cloud.x += cloud.speed;
        if cloud.x + cloud.width < parallax_camera - CLOUD_WRAP_MARGIN {
            cloud.x = parallax_camera + ctx.config.screen_width + ctx.rng.gen_range(0..100);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_turns_at_ledge_only_when_grounded() {
        let platforms = [Platform::new(0, 500, 64, 32)];
        let mut enemy = Enemy::new(34, 470, 1);
        assert!(should_turn(&enemy, true, &platforms));
        assert!(!should_turn(&enemy, false, &platforms));

        enemy.x = 10;
        assert!(!should_turn(&enemy, true, &platforms));
    }

    #[test]
    fn enemy_turns_at_wall_in_either_direction() {
        let platforms = [
            Platform::new(-100, 500, 400, 32),
            Platform::new(100, 400, 32, 100),
        ];
        let right = Enemy::new(70, 470, 1);
        assert!(should_turn(&right, true, &platforms));

        let left = Enemy::new(132, 470, -1);
        assert!(should_turn(&left, true, &platforms));

        let away = Enemy::new(132, 470, 1);
        assert!(!should_turn(&away, true, &platforms));
    }

    #[test]
    fn overlapping_enemies_both_turn_whatever_their_heading() {
        let headings = [(1, -1), (-1, 1), (1, 1), (-1, -1)];
        for (first, second) in headings {
            let mut enemies = vec![Enemy::new(100, 470, first), Enemy::new(110, 470, second)];
            reverse_overlapping_pairs(&mut enemies);
            assert_eq!(enemies[0].direction, -first);
            assert_eq!(enemies[1].direction, -second);
        }
    }

    #[test]
    fn separated_enemies_keep_walking() {
        let mut enemies = vec![Enemy::new(100, 470, 1), Enemy::new(130, 470, -1)];
        reverse_overlapping_pairs(&mut enemies);
        assert_eq!(enemies[0].direction, 1);
        assert_eq!(enemies[1].direction, -1);
    }

    #[test]
    fn pair_reversal_ignores_list_order() {
        let cluster = [
            Enemy::new(100, 470, 1),
            Enemy::new(120, 470, -1),
            Enemy::new(145, 470, 1),
        ];
        let mut forward = cluster.to_vec();
        let mut backward: Vec<Enemy> = cluster.iter().rev().cloned().collect();
        reverse_overlapping_pairs(&mut forward);
        reverse_overlapping_pairs(&mut backward);
        backward.reverse();

        let directions: Vec<i32> = forward.iter().map(|enemy| enemy.direction).collect();
        assert_eq!(directions, vec![-1, -1, -1]);
        assert_eq!(forward, backward);
    }
}
