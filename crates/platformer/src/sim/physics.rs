use super::entities::{Platform, Player};
use super::geometry::Rect;

/// Which face of an obstacle a resolved collision pushed the player to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Pushed out sideways, horizontal speed zeroed.
    Side,
    /// Landed on top; the only contact that grounds the player.
    Top,
    /// Head bump from below.
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub landed: bool,
    /// Indices into the block list hit from below this tick, in hit order.
    pub blocks_hit_from_below: Vec<usize>,
}

/// Minimum-translation push-out of the player from one obstacle.
///
/// The axis with the smaller overlap wins; ties resolve vertically. Does
/// nothing when the boxes do not intersect.
pub fn resolve_against(player: &mut Player, obstacle: Rect) -> Option<Contact> {
    let body = player.bounds();
    if !body.intersects(&obstacle) {
        return None;
    }

    let overlap_x = body.overlap_x(&obstacle);
    let overlap_y = body.overlap_y(&obstacle);
    if overlap_x < overlap_y {
        player.x = if body.left() < obstacle.left() {
            obstacle.left() - body.width
        } else {
            obstacle.right()
        };
        player.vel_x = 0;
        return Some(Contact::Side);
    }

    player.vel_y = 0;
    if body.top() < obstacle.top() {
        player.y = obstacle.top() - body.height;
        player.on_ground = true;
        Some(Contact::Top)
    } else {
        player.y = obstacle.bottom();
        Some(Contact::Bottom)
    }
}

/// Rising player whose head is crossing the block's bottom edge while
/// horizontally overlapping it.
pub fn is_bottom_hit(player: &Player, block: Rect) -> bool {
    let body = player.bounds();
    player.vel_y < 0
        && body.top() < block.bottom()
        && body.bottom() > block.bottom()
        && body.right() > block.left()
        && body.left() < block.right()
}

/// Resolves the player against every platform, then every block.
///
/// `on_ground` is cleared first, so afterwards it is true exactly when some
/// obstacle was landed on during this pass. Bottom hits on blocks take
/// precedence over the push-out rule and are reported for activation.
pub fn resolve_player(player: &mut Player, platforms: &[Platform], blocks: &[Rect]) -> CollisionReport {
    player.on_ground = false;
    let mut report = CollisionReport::default();

    for platform in platforms {
        if resolve_against(player, platform.bounds()) == Some(Contact::Top) {
            report.landed = true;
        }
    }

    for (index, block) in blocks.iter().enumerate() {
        if !player.bounds().intersects(block) {
            continue;
        }
        if is_bottom_hit(player, *block) {
            player.y = block.bottom();
            player.vel_y = 0;
            report.blocks_hit_from_below.push(index);
            continue;
        }
        if resolve_against(player, *block) == Some(Contact::Top) {
            report.landed = true;
        }
    }

    report
}

/// Top of the first platform touched by a one-pixel strip under `feet`.
pub fn probe_ground(feet: Rect, platforms: &[Platform]) -> Option<i32> {
    platforms
        .iter()
        .find(|platform| feet.intersects(&platform.bounds()))
        .map(|platform| platform.y)
}

pub fn any_platform_touches(probe: Rect, platforms: &[Platform]) -> bool {
    platforms
        .iter()
        .any(|platform| probe.intersects(&platform.bounds()))
}
