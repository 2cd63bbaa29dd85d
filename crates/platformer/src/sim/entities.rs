use std::time::Duration;

use serde::Serialize;

use super::geometry::Rect;

pub type Color = [u8; 4];

pub const PLAYER_WIDTH: i32 = 30;
pub const PLAYER_SMALL_HEIGHT: i32 = 50;
pub const PLAYER_BIG_HEIGHT: i32 = 70;
pub const BLOCK_SIZE: i32 = 32;
pub const ENEMY_SIZE: i32 = 30;
pub const COIN_SIZE: i32 = 20;
pub const POWER_UP_SIZE: i32 = 32;

const ANIMATION_FRAMES: u8 = 4;
const TICKS_PER_ANIMATION_FRAME: u8 = 5;
const COIN_BOB_LIMIT: i32 = 5;

#[derive(Debug, Clone)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub vel_x: i32,
    pub vel_y: i32,
    pub on_ground: bool,
    pub power_level: u8,
    /// Simulation time at which invincibility ends; `None` when vulnerable.
    pub invincible_until: Option<Duration>,
    anim_frame: u8,
    anim_timer: u8,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            width: PLAYER_WIDTH,
            height: PLAYER_SMALL_HEIGHT,
            vel_x: 0,
            vel_y: 0,
            on_ground: false,
            power_level: 0,
            invincible_until: None,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    pub fn grant_invincibility(&mut self, now: Duration, length: Duration) {
        self.invincible_until = Some(now + length);
    }

    pub fn expire_invincibility(&mut self, now: Duration) {
        if matches!(self.invincible_until, Some(until) if now > until) {
            self.invincible_until = None;
        }
    }

    pub fn anim_frame(&self) -> u8 {
        self.anim_frame
    }

    /// Returns false when the player was not grounded.
    pub fn jump(&mut self, jump_force: i32) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel_y = jump_force;
        self.on_ground = false;
        true
    }

    /// Moves by the current velocity, then lets friction pull horizontal
    /// speed one step toward zero.
    pub fn integrate(&mut self) {
        self.x += self.vel_x;
        self.y += self.vel_y;
        self.vel_x -= self.vel_x.signum();
    }

    pub fn update_animation(&mut self) {
        if self.vel_x == 0 {
            self.anim_frame = 0;
            self.anim_timer = 0;
            return;
        }
        self.anim_timer += 1;
        if self.anim_timer >= TICKS_PER_ANIMATION_FRAME {
            self.anim_frame = (self.anim_frame + 1) % ANIMATION_FRAMES;
            self.anim_timer = 0;
        }
    }

    /// Grows upward keeping the feet in place. Returns false if already big.
    pub fn power_up(&mut self) -> bool {
        if self.power_level > 0 {
            return false;
        }
        self.power_level = 1;
        self.set_height_keeping_feet(PLAYER_BIG_HEIGHT);
        true
    }

    /// Returns false if the player was already small.
    pub fn power_down(&mut self) -> bool {
        if self.power_level == 0 {
            return false;
        }
        self.power_level -= 1;
        if self.power_level == 0 {
            self.set_height_keeping_feet(PLAYER_SMALL_HEIGHT);
        }
        true
    }

    pub fn reset_power(&mut self) {
        self.power_level = 0;
        self.height = PLAYER_SMALL_HEIGHT;
    }

    fn set_height_keeping_feet(&mut self, height: i32) {
        let feet = self.y + self.height;
        self.height = height;
        self.y = feet - height;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Platform {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_ground(&self, ground_level: i32) -> bool {
        self.y == ground_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Brick,
    Question,
    Used,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockContent {
    Empty,
    Coin,
    PowerUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub kind: BlockKind,
    pub content: BlockContent,
    pub hit: bool,
}

impl Block {
    pub fn new(x: i32, y: i32, kind: BlockKind, content: BlockContent) -> Self {
        Self {
            x,
            y,
            kind,
            content,
            hit: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, BLOCK_SIZE, BLOCK_SIZE)
    }

    pub fn can_activate(&self) -> bool {
        !self.hit && matches!(self.kind, BlockKind::Question | BlockKind::Brick)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub vel_y: i32,
    /// -1 walks left, +1 walks right.
    pub direction: i32,
}

impl Enemy {
    pub fn new(x: i32, y: i32, direction: i32) -> Self {
        Self {
            x,
            y,
            vel_y: 0,
            direction: if direction < 0 { -1 } else { 1 },
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, ENEMY_SIZE, ENEMY_SIZE)
    }

    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub x: i32,
    pub y: i32,
    pub bob_offset: i32,
    bob_direction: i32,
}

impl Coin {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            bob_offset: 0,
            bob_direction: 1,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, COIN_SIZE, COIN_SIZE)
    }

    pub fn bob(&mut self) {
        self.bob_offset += self.bob_direction;
        if self.bob_offset > COIN_BOB_LIMIT {
            self.bob_direction = -1;
        }
        if self.bob_offset < -COIN_BOB_LIMIT {
            self.bob_direction = 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Mushroom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerUp {
    pub x: i32,
    pub y: i32,
    pub vel_y: i32,
    pub direction: i32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(x: i32, y: i32, kind: PowerUpKind) -> Self {
        Self {
            x,
            y,
            vel_y: 0,
            direction: 1,
            kind,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, POWER_UP_SIZE, POWER_UP_SIZE)
    }
}

/// Background cloud; `x` is in parallax space (half camera speed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloud {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub speed: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Generic,
    /// Coin popping out of a block: lighter gravity, drawn round, no fade.
    CoinPop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub size: i32,
    pub lifetime: i32,
    pub initial_lifetime: i32,
    pub color: Color,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn new(
        x: f32,
        y: f32,
        velocity: (f32, f32),
        size: i32,
        lifetime: i32,
        color: Color,
    ) -> Self {
        Self {
            x,
            y,
            vel_x: velocity.0,
            vel_y: velocity.1,
            size,
            lifetime,
            initial_lifetime: lifetime.max(1),
            color,
            kind: ParticleKind::Generic,
        }
    }

    pub fn with_kind(mut self, kind: ParticleKind) -> Self {
        self.kind = kind;
        self
    }

    /// Remaining lifetime as a fraction of the initial one, clamped to 0..=1.
    pub fn alpha(&self) -> f32 {
        (self.lifetime as f32 / self.initial_lifetime as f32).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub vel_y: f32,
    pub lifetime: i32,
    pub initial_lifetime: i32,
}

impl FloatingText {
    pub const RISE_SPEED: f32 = 1.5;

    pub fn new(text: impl Into<String>, x: i32, y: i32, lifetime: i32) -> Self {
        Self {
            text: text.into(),
            x: x as f32,
            y: y as f32,
            vel_y: -Self::RISE_SPEED,
            lifetime,
            initial_lifetime: lifetime.max(1),
        }
    }

    pub fn alpha(&self) -> f32 {
        (self.lifetime as f32 / self.initial_lifetime as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friction_walks_horizontal_speed_to_zero() {
        let mut player = Player::new(0, 0);
        player.vel_x = 2;
        player.integrate();
        assert_eq!((player.x, player.vel_x), (2, 1));
        player.integrate();
        player.integrate();
        assert_eq!((player.x, player.vel_x), (3, 0));

        player.vel_x = -5;
        player.integrate();
        assert_eq!((player.x, player.vel_x), (-2, -4));
    }

    #[test]
    fn power_transitions_keep_feet_fixed() {
        let mut player = Player::new(100, 450);
        assert!(player.power_up());
        assert_eq!((player.y, player.height), (430, PLAYER_BIG_HEIGHT));
        assert!(!player.power_up());
        assert_eq!((player.y, player.height), (430, PLAYER_BIG_HEIGHT));

        assert!(player.power_down());
        assert_eq!((player.y, player.height), (450, PLAYER_SMALL_HEIGHT));
        assert!(!player.power_down());
        assert_eq!(player.y + player.height, 500);
    }

    #[test]
    fn jump_requires_ground() {
        let mut player = Player::new(0, 0);
        assert!(!player.jump(-20));
        player.on_ground = true;
        assert!(player.jump(-20));
        assert_eq!(player.vel_y, -20);
        assert!(!player.on_ground);
    }

    #[test]
    fn animation_advances_every_five_moving_ticks() {
        let mut player = Player::new(0, 0);
        player.vel_x = 5;
        for _ in 0..4 {
            player.update_animation();
        }
        assert_eq!(player.anim_frame(), 0);
        player.update_animation();
        assert_eq!(player.anim_frame(), 1);

        for _ in 0..15 {
            player.update_animation();
        }
        assert_eq!(player.anim_frame(), 0);

        player.update_animation();
        player.vel_x = 0;
        player.update_animation();
        assert_eq!(player.anim_frame(), 0);
    }

    #[test]
    fn invincibility_expires_strictly_after_deadline() {
        let mut player = Player::new(0, 0);
        player.grant_invincibility(Duration::from_secs(1), Duration::from_secs(2));
        player.expire_invincibility(Duration::from_secs(3));
        assert!(player.is_invincible());
        player.expire_invincibility(Duration::from_millis(3_001));
        assert!(!player.is_invincible());
    }

    #[test]
    fn coin_bob_stays_within_band() {
        let mut coin = Coin::new(0, 0);
        for _ in 0..100 {
            coin.bob();
            assert!((-6..=6).contains(&coin.bob_offset), "{}", coin.bob_offset);
        }
    }

    #[test]
    fn particle_alpha_tracks_remaining_lifetime() {
        let mut particle = Particle::new(0.0, 0.0, (0.0, 0.0), 4, 20, [255, 0, 0, 255]);
        assert_eq!(particle.alpha(), 1.0);
        particle.lifetime = 5;
        assert!((particle.alpha() - 0.25).abs() < f32::EPSILON);
        particle.lifetime = -3;
        assert_eq!(particle.alpha(), 0.0);
        assert!(particle.is_expired());
    }

    #[test]
    fn only_unhit_question_and_brick_blocks_activate() {
        let mut block = Block::new(0, 0, BlockKind::Question, BlockContent::Coin);
        assert!(block.can_activate());
        block.hit = true;
        assert!(!block.can_activate());
        assert!(!Block::new(0, 0, BlockKind::Used, BlockContent::Empty).can_activate());
    }
}
