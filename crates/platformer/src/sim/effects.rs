use std::f32::consts::TAU;

use rand::Rng;

use super::entities::{Color, FloatingText, Particle, ParticleKind, Player};

const PARTICLE_GRAVITY: f32 = 0.2;
const COIN_POP_EXTRA_GRAVITY: f32 = 0.5;
const COIN_POP_MAX_FALL: f32 = 5.0;

pub const STOMP_COLOR: Color = [100, 100, 100, 255];
pub const QUESTION_DEBRIS_COLOR: Color = [255, 255, 0, 255];
pub const BRICK_DEBRIS_COLOR: Color = [210, 105, 30, 255];
pub const COIN_COLOR: Color = [255, 255, 0, 255];
const DEATH_COLOR: Color = [255, 50, 50, 255];
const RESPAWN_COLOR: Color = [255, 255, 255, 255];
const SPEED_LINE_COLOR: Color = [220, 220, 220, 150];
const RAINBOW: [Color; 7] = [
    [255, 0, 0, 255],
    [255, 200, 0, 255],
    [255, 255, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [75, 0, 130, 255],
    [148, 0, 211, 255],
];

/// Radial burst from a single point. Speeds are whole pixels and the
/// per-axis velocity is truncated, so slow bursts look chunky on purpose.
#[derive(Debug, Clone)]
pub struct Burst {
    pub count: usize,
    pub origin: (i32, i32),
    pub speed: std::ops::RangeInclusive<i32>,
    pub upward_boost: f32,
    pub size: std::ops::RangeInclusive<i32>,
    pub lifetime: std::ops::RangeInclusive<i32>,
    pub color: Color,
}

pub fn spawn_burst<R: Rng>(particles: &mut Vec<Particle>, rng: &mut R, burst: Burst) {
    for _ in 0..burst.count {
        let angle = rng.gen::<f32>() * TAU;
        let speed = rng.gen_range(burst.speed.clone()) as f32;
        let vel_x = (angle.cos() * speed).trunc();
        let vel_y = (angle.sin() * speed).trunc() - burst.upward_boost;
        particles.push(Particle::new(
            burst.origin.0 as f32,
            burst.origin.1 as f32,
            (vel_x, vel_y),
            rng.gen_range(burst.size.clone()),
            rng.gen_range(burst.lifetime.clone()),
            burst.color,
        ));
    }
}

pub fn stomp_burst(center: (i32, i32)) -> Burst {
    Burst {
        count: 8,
        origin: center,
        speed: 2..=4,
        upward_boost: 4.0,
        size: 6..=6,
        lifetime: 30..=30,
        color: STOMP_COLOR,
    }
}

pub fn debris_burst(center: (i32, i32), color: Color) -> Burst {
    Burst {
        count: 5,
        origin: center,
        speed: 1..=3,
        upward_boost: 3.0,
        size: 3..=3,
        lifetime: 20..=20,
        color,
    }
}

pub fn death_burst(center: (i32, i32)) -> Burst {
    Burst {
        count: 15,
        origin: center,
        speed: 3..=7,
        upward_boost: 5.0,
        size: 2..=5,
        lifetime: 30..=49,
        color: DEATH_COLOR,
    }
}

pub fn coin_pop(x: i32, y: i32) -> Particle {
    Particle::new(x as f32, y as f32, (0.0, -5.0), 20, 30, COIN_COLOR).with_kind(ParticleKind::CoinPop)
}

/// White sparkles drifting up out of a freshly respawned player.
pub fn spawn_respawn_sparkle<R: Rng>(particles: &mut Vec<Particle>, rng: &mut R, player: &Player) {
    for _ in 0..10 {
        let x = player.x + rng.gen_range(0..player.width.max(1));
        let y = player.y + rng.gen_range(0..player.height.max(1));
        let vel_x = rng.gen::<f32>() * 4.0 - 2.0;
        let vel_y = -2.0 - rng.gen::<f32>() * 2.0;
        particles.push(Particle::new(
            x as f32,
            y as f32,
            (vel_x, vel_y),
            rng.gen_range(3..=7),
            rng.gen_range(20..=39),
            RESPAWN_COLOR,
        ));
    }
}

/// Rainbow sparkle around a big, invincible player, one roll per tick.
pub fn maybe_spawn_power_sparkle<R: Rng>(particles: &mut Vec<Particle>, rng: &mut R, player: &Player) {
    if player.power_level == 0 || !player.is_invincible() || !rng.gen_bool(0.2) {
        return;
    }
    let x = player.x + rng.gen_range(0..player.width.max(1));
    let y = player.y + rng.gen_range(0..player.height.max(1));
    let color = RAINBOW[rng.gen_range(0..RAINBOW.len())];
    let vel_x = (rng.gen::<f32>() * 2.0 - 1.0) * 2.0;
    let vel_y = (rng.gen::<f32>() * 2.0 - 1.0) * 2.0;
    particles.push(Particle::new(
        x as f32,
        y as f32,
        (vel_x, vel_y),
        rng.gen_range(2..=4),
        rng.gen_range(10..=19),
        color,
    ));
}

/// Streak trailing a grounded player running faster than 3 px/tick.
pub fn maybe_spawn_speed_line<R: Rng>(particles: &mut Vec<Particle>, rng: &mut R, player: &Player) {
    if player.vel_x.abs() <= 3 || !player.on_ground || rng.gen_range(0..10) >= 3 {
        return;
    }
    let moving_right = player.vel_x > 0;
    let x = if moving_right {
        player.x
    } else {
        player.x + player.width
    };
    let y = player.y + player.height - 10 + rng.gen_range(0..10);
    let push = 3.0 + rng.gen::<f32>() * 2.0;
    let vel_x = if moving_right { -push } else { push };
    particles.push(Particle::new(
        x as f32,
        y as f32,
        (vel_x, 0.0),
        rng.gen_range(4..=6),
        15,
        SPEED_LINE_COLOR,
    ));
}

pub fn update_particles(particles: &mut [Particle]) {
    for particle in particles {
        particle.x += particle.vel_x;
        particle.y += particle.vel_y;
        particle.vel_y += PARTICLE_GRAVITY;
        particle.lifetime -= 1;
        if particle.kind == ParticleKind::CoinPop && particle.vel_y < COIN_POP_MAX_FALL {
            particle.vel_y += COIN_POP_EXTRA_GRAVITY;
        }
    }
}

pub fn update_floating_texts(texts: &mut Vec<FloatingText>) {
    for text in texts.iter_mut() {
        text.y += text.vel_y;
        text.lifetime -= 1;
    }
    texts.retain(|text| text.lifetime > 0);
}

/// Camera shake request. Each tick produces an offset in `[-amount, amount)`
/// on both axes, then the amount decays by one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenShake {
    amount: i32,
    offset: (i32, i32),
}

impl ScreenShake {
    pub fn request(&mut self, amount: i32) {
        self.amount = self.amount.max(amount);
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        if self.amount <= 0 {
            self.offset = (0, 0);
            return;
        }
        let amount = self.amount;
        self.offset = (
            rng.gen_range(-amount..amount),
            rng.gen_range(-amount..amount),
        );
        self.amount -= 1;
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn burst_spawns_requested_count_at_origin() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut particles = Vec::new();
        spawn_burst(&mut particles, &mut rng, stomp_burst((115, 485)));

        assert_eq!(particles.len(), 8);
        for particle in &particles {
            assert_eq!((particle.x, particle.y), (115.0, 485.0));
            assert_eq!(particle.size, 6);
            assert_eq!(particle.lifetime, 30);
            assert_eq!(particle.vel_x, particle.vel_x.trunc());
            assert!(particle.vel_y <= 0.0);
        }
    }

    #[test]
    fn coin_pop_falls_with_extra_gravity_until_capped() {
        let mut particles = vec![coin_pop(0, 0)];
        update_particles(&mut particles);
        assert!((particles[0].vel_y - (-5.0 + 0.2 + 0.5)).abs() < 1e-5);

        for _ in 0..40 {
            update_particles(&mut particles);
        }
        let capped = particles[0].vel_y;
        assert!(capped >= COIN_POP_MAX_FALL);

        let mut generic = vec![Particle::new(0.0, 0.0, (0.0, -5.0), 3, 30, STOMP_COLOR)];
        update_particles(&mut generic);
        assert!((generic[0].vel_y - (-4.8)).abs() < 1e-5);
    }

    #[test]
    fn floating_texts_rise_and_expire() {
        let mut texts = vec![FloatingText::new("+50", 10, 100, 2)];
        update_floating_texts(&mut texts);
        assert_eq!(texts.len(), 1);
        assert!((texts[0].y - 98.5).abs() < f32::EPSILON);
        update_floating_texts(&mut texts);
        assert!(texts.is_empty());
    }

    #[test]
    fn shake_decays_one_per_tick_and_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shake = ScreenShake::default();
        shake.request(5);
        shake.request(2);
        assert_eq!(shake.amount(), 5);

        for remaining in (0..5).rev() {
            shake.advance(&mut rng);
            let (dx, dy) = shake.offset();
            assert!((-5..5).contains(&dx) && (-5..5).contains(&dy));
            assert_eq!(shake.amount(), remaining);
        }
        shake.advance(&mut rng);
        assert_eq!(shake.offset(), (0, 0));
    }

    #[test]
    fn speed_lines_need_ground_and_speed() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut particles = Vec::new();
        let mut player = Player::new(0, 450);
        player.vel_x = 5;
        for _ in 0..50 {
            maybe_spawn_speed_line(&mut particles, &mut rng, &player);
        }
        assert!(particles.is_empty());

        player.on_ground = true;
        for _ in 0..50 {
            maybe_spawn_speed_line(&mut particles, &mut rng, &player);
        }
        assert!(!particles.is_empty());
        assert!(particles.iter().all(|particle| particle.vel_x < 0.0));
    }

    #[test]
    fn sparkles_only_for_big_invincible_player() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut particles = Vec::new();
        let mut player = Player::new(0, 450);
        player.grant_invincibility(Default::default(), std::time::Duration::from_secs(2));
        for _ in 0..50 {
            maybe_spawn_power_sparkle(&mut particles, &mut rng, &player);
        }
        assert!(particles.is_empty());

        player.power_up();
        for _ in 0..50 {
            maybe_spawn_power_sparkle(&mut particles, &mut rng, &player);
        }
        assert!(!particles.is_empty());
    }
}
