use tracing::debug;

use super::effects::{self, BRICK_DEBRIS_COLOR, QUESTION_DEBRIS_COLOR};
use super::entities::{
    BlockContent, BlockKind, FloatingText, PowerUp, PowerUpKind, BLOCK_SIZE, COIN_SIZE,
};
use super::events::SoundEffect;
use super::TickContext;

const BLOCK_COIN_POINTS: u32 = 50;
const COIN_POP_RISE: i32 = 20;
const BLOCK_TEXT_RISE: i32 = 30;
const BLOCK_TEXT_LIFETIME: i32 = 30;

/// Reveals the content of the block at `index`.
///
/// Returns false and changes nothing when the block was already hit, so a
/// block yields its content at most once no matter how often it is struck.
pub(crate) fn activate(ctx: &mut TickContext<'_>, index: usize) -> bool {
    let Some(block) = ctx.world.blocks.get_mut(index) else {
        return false;
    };
    if !block.can_activate() {
        return false;
    }
    block.hit = true;
    let (x, y, kind, content) = (block.x, block.y, block.kind, block.content);
    if kind == BlockKind::Question && content != BlockContent::Empty {
        block.kind = BlockKind::Used;
    }

    ctx.audio.play(SoundEffect::BlockHit);
    let debris_color = if kind == BlockKind::Question {
        QUESTION_DEBRIS_COLOR
    } else {
        BRICK_DEBRIS_COLOR
    };
    let center = (x + BLOCK_SIZE / 2, y + BLOCK_SIZE / 2);
    effects::spawn_burst(
        &mut ctx.world.particles,
        ctx.rng,
        effects::debris_burst(center, debris_color),
    );

    match content {
        BlockContent::Coin => {
            ctx.state.score += BLOCK_COIN_POINTS;
            ctx.state.coins += 1;
            ctx.world.particles.push(effects::coin_pop(
                x + BLOCK_SIZE / 2 - COIN_SIZE / 2,
                y - COIN_POP_RISE,
            ));
            ctx.world.floating_texts.push(FloatingText::new(
                format!("+{BLOCK_COIN_POINTS}"),
                x + BLOCK_SIZE / 2,
                y - BLOCK_TEXT_RISE,
                BLOCK_TEXT_LIFETIME,
            ));
            ctx.audio.play(SoundEffect::Coin);
        }
        BlockContent::PowerUp => {
            ctx.world
                .power_ups
                .push(PowerUp::new(x, y - BLOCK_SIZE, PowerUpKind::Mushroom));
            ctx.audio.play(SoundEffect::PowerUp);
        }
        BlockContent::Empty => {}
    }

    debug!(x, y, ?kind, ?content, "block_activated");
    true
}
