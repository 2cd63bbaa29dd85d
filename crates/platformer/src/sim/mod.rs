//! Fixed-step platformer simulation.
//!
//! One [`Simulation::tick`] consumes a held-input snapshot and advances the
//! world by one step. Drawing and audio playback live outside this module:
//! the host reads the world through the accessors below and drains the
//! audio commands raised during the tick.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

pub mod backdrop;
mod behavior;
mod blocks;
pub mod combo;
pub mod config;
pub mod effects;
pub mod entities;
pub mod events;
pub mod geometry;
pub mod physics;
pub mod respawn;
pub mod state;
pub mod terrain;
pub mod world;

use combo::{Combo, ComboIndicator};
use config::WorldConfig;
use effects::ScreenShake;
use entities::{Block, Player};
use events::{AudioCommand, AudioQueue, MusicTrack, SoundEffect};
use geometry::Rect;
use respawn::{DeathCause, DeathOutcome};
use state::{accepts_sound_toggle, next_transition, EdgeTracker, GameState, HeldInputs, Transition};
use world::{EntityCounts, WorldStore};

/// Run-wide values every update pass may read or change.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub game_state: GameState,
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
    /// Never decreases within a run.
    pub camera_x: i32,
    /// Right edge of the generated world.
    pub horizon: i32,
    pub combo: Combo,
    pub shake: ScreenShake,
    /// Simulation time; advances only while playing.
    pub clock: Duration,
    /// Time since the world was (re)initialised, for the HUD.
    pub run_time: Duration,
}

impl SimulationState {
    fn new(config: &WorldConfig) -> Self {
        Self {
            game_state: GameState::Title,
            score: 0,
            coins: 0,
            lives: config.starting_lives,
            camera_x: 0,
            horizon: config.initial_horizon,
            combo: Combo::default(),
            shake: ScreenShake::default(),
            clock: Duration::ZERO,
            run_time: Duration::ZERO,
        }
    }
}

/// Mutable view over the simulation handed to each update pass.
pub(crate) struct TickContext<'a> {
    pub(crate) config: &'a WorldConfig,
    pub(crate) state: &'a mut SimulationState,
    pub(crate) player: &'a mut Player,
    pub(crate) world: &'a mut WorldStore,
    pub(crate) rng: &'a mut StdRng,
    pub(crate) audio: &'a mut AudioQueue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
    pub elapsed_secs: u64,
    pub game_state: GameState,
    pub sound_enabled: bool,
    pub combo: Option<ComboIndicator>,
}

impl HudSnapshot {
    /// Elapsed run time as `m:ss`.
    pub fn elapsed_label(&self) -> String {
        format!("{}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerCensus {
    pub x: i32,
    pub y: i32,
    pub vel_x: i32,
    pub vel_y: i32,
    pub on_ground: bool,
    pub power_level: u8,
    pub invincible: bool,
}

/// Debug dump of the whole simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldCensus {
    pub seed: u64,
    pub game_state: GameState,
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
    pub camera_x: i32,
    pub horizon: i32,
    pub combo: u32,
    pub player: PlayerCensus,
    pub entities: EntityCounts,
}

pub struct Simulation {
    config: WorldConfig,
    seed: u64,
    rng: StdRng,
    state: SimulationState,
    player: Player,
    world: WorldStore,
    edges: EdgeTracker,
    sound_enabled: bool,
    audio: AudioQueue,
    last_landed: bool,
}

impl Simulation {
    pub fn new(config: WorldConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let world = WorldStore::initial(&config, &mut rng);
        let (spawn_x, spawn_y) = config.player_spawn;
        let mut audio = AudioQueue::default();
        audio.push(AudioCommand::Loop(MusicTrack::Theme));
        Self {
            state: SimulationState::new(&config),
            player: Player::new(spawn_x, spawn_y),
            config,
            seed,
            rng,
            world,
            edges: EdgeTracker::default(),
            sound_enabled: true,
            audio,
            last_landed: false,
        }
    }

    /// Rebuilds the world and returns to the title screen. The RNG stream
    /// and the sound setting carry over.
    pub fn reset(&mut self) {
        self.world = WorldStore::initial(&self.config, &mut self.rng);
        let (spawn_x, spawn_y) = self.config.player_spawn;
        self.player = Player::new(spawn_x, spawn_y);
        self.state = SimulationState::new(&self.config);
        self.last_landed = false;
        self.audio.push(AudioCommand::Loop(MusicTrack::Theme));
        info!(seed = self.seed, entities = self.world.entity_count(), "world_reset");
    }

    pub fn tick(&mut self, held: &HeldInputs, dt: Duration) {
        self.state.run_time += dt;
        let edges = self.edges.update(held);

        if edges.toggle_sound && accepts_sound_toggle(self.state.game_state) {
            self.toggle_sound();
        }

        if let Some(transition) = next_transition(self.state.game_state, &edges) {
            self.apply_transition(transition, held);
            return;
        }

        if self.state.game_state == GameState::Playing {
            self.state.clock += dt;
            let mut ctx = TickContext {
                config: &self.config,
                state: &mut self.state,
                player: &mut self.player,
                world: &mut self.world,
                rng: &mut self.rng,
                audio: &mut self.audio,
            };
            self.last_landed = run_playing_tick(&mut ctx, held);
        }
    }

    fn apply_transition(&mut self, transition: Transition, held: &HeldInputs) {
        let from = self.state.game_state;
        if transition == Transition::Restart {
            self.reset();
            self.edges.absorb(held);
        }
        self.state.game_state = transition.target();
        info!(
            from = <&'static str>::from(from),
            to = <&'static str>::from(self.state.game_state),
            "state_changed"
        );
        if transition == Transition::Start {
            info!(seed = self.seed, lives = self.state.lives, "run_started");
        }
    }

    fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
        self.audio.push(AudioCommand::SetEnabled(self.sound_enabled));
        info!(enabled = self.sound_enabled, "sound_toggled");
    }

    pub fn drain_audio(&mut self) -> Vec<AudioCommand> {
        self.audio.drain()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn game_state(&self) -> GameState {
        self.state.game_state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn world(&self) -> &WorldStore {
        &self.world
    }

    pub fn camera_x(&self) -> i32 {
        self.state.camera_x
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Whether the last playing tick resolved a landing.
    pub fn last_landed(&self) -> bool {
        self.last_landed
    }

    /// Camera shake to apply when drawing; zero outside of play.
    pub fn shake_offset(&self) -> (i32, i32) {
        if self.state.game_state == GameState::Playing {
            self.state.shake.offset()
        } else {
            (0, 0)
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.state.score,
            coins: self.state.coins,
            lives: self.state.lives,
            elapsed_secs: self.state.run_time.as_secs(),
            game_state: self.state.game_state,
            sound_enabled: self.sound_enabled,
            combo: self
                .state
                .combo
                .indicator(self.state.clock, self.config.combo_timeout),
        }
    }

    pub fn census(&self) -> WorldCensus {
        WorldCensus {
            seed: self.seed,
            game_state: self.state.game_state,
            score: self.state.score,
            coins: self.state.coins,
            lives: self.state.lives,
            camera_x: self.state.camera_x,
            horizon: self.state.horizon,
            combo: self.state.combo.count(),
            player: PlayerCensus {
                x: self.player.x,
                y: self.player.y,
                vel_x: self.player.vel_x,
                vel_y: self.player.vel_y,
                on_ground: self.player.on_ground,
                power_level: self.player.power_level,
                invincible: self.player.is_invincible(),
            },
            entities: self.world.counts(),
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut WorldStore {
        &mut self.world
    }
}

/// One step of play. Returns whether the collision pass landed the player.
fn run_playing_tick(ctx: &mut TickContext<'_>, held: &HeldInputs) -> bool {
    let config = ctx.config;

    if held.move_left {
        ctx.player.vel_x = -config.player_speed;
    }
    if held.move_right {
        ctx.player.vel_x = config.player_speed;
    }
    if held.jump && ctx.player.jump(config.jump_force) {
        ctx.audio.play(SoundEffect::Jump);
    }

    ctx.player.vel_y += config.gravity;
    ctx.player.integrate();
    ctx.player.expire_invincibility(ctx.state.clock);
    ctx.player.update_animation();

    let block_boxes: Vec<Rect> = ctx.world.blocks.iter().map(Block::bounds).collect();
    let report = physics::resolve_player(ctx.player, &ctx.world.platforms, &block_boxes);
    for index in report.blocks_hit_from_below {
        blocks::activate(ctx, index);
    }

    behavior::update_power_ups(ctx);
    if behavior::update_enemies(ctx)
        && respawn::kill_player(ctx, DeathCause::Enemy) == DeathOutcome::GameOver
    {
        return report.landed;
    }
    behavior::update_coins(ctx);
    behavior::update_clouds(ctx);

    effects::update_particles(&mut ctx.world.particles);
    if ctx.state.combo.expire(ctx.state.clock, config.combo_timeout) {
        debug!("combo_reset");
    }
    effects::update_floating_texts(&mut ctx.world.floating_texts);
    effects::maybe_spawn_power_sparkle(&mut ctx.world.particles, ctx.rng, ctx.player);
    effects::maybe_spawn_speed_line(&mut ctx.world.particles, ctx.rng, ctx.player);
    ctx.state.shake.advance(ctx.rng);

    ctx.state.camera_x = ctx
        .state
        .camera_x
        .max(ctx.player.x - config.camera_lead_margin);
    while terrain::needs_extension(ctx.state.horizon, ctx.state.camera_x, config) {
        let segment = terrain::generate_segment(ctx.world, ctx.state.horizon, config, ctx.rng);
        ctx.state.horizon = segment.end_x;
    }
    ctx.world
        .prune_behind(ctx.state.camera_x - config.cull_margin, config.ground_level);

    if ctx.player.y > config.screen_height {
        respawn::kill_player(ctx, DeathCause::Fell);
    }
    report.landed
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
