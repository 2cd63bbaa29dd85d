use std::time::Duration;

use engine::{ActionStates, Canvas, InputAction, InputSnapshot, Scene, SceneCommand};
use tracing::{info, warn};

use crate::audio::SoundManager;
use crate::sim::events::{AudioCommand, MusicTrack};
use crate::sim::state::HeldInputs;
use crate::sim::Simulation;

use super::draw;

/// Engine scene hosting one simulation and its sound output.
pub(crate) struct PlatformerScene {
    sim: Simulation,
    sound: SoundManager,
    previous_actions: ActionStates,
}

impl PlatformerScene {
    pub(crate) fn new(sim: Simulation, sound: SoundManager) -> Self {
        Self {
            sim,
            sound,
            previous_actions: ActionStates::default(),
        }
    }

    fn forward_audio(&mut self) {
        for command in self.sim.drain_audio() {
            self.sound.apply(command);
        }
    }

    fn dump_state(&self) {
        match serde_json::to_string(&self.sim.census()) {
            Ok(census) => info!(census = %census, "state_dump"),
            Err(error) => warn!(error = %error, "state_dump_failed"),
        }
    }

    #[cfg(test)]
    pub(crate) fn sim(&self) -> &Simulation {
        &self.sim
    }
}

pub(crate) fn held_inputs(input: &InputSnapshot) -> HeldInputs {
    HeldInputs {
        move_left: input.is_down(InputAction::MoveLeft),
        move_right: input.is_down(InputAction::MoveRight),
        jump: input.is_down(InputAction::Jump),
        pause: input.is_down(InputAction::Pause),
        toggle_sound: input.is_down(InputAction::ToggleSound),
        confirm: input.is_down(InputAction::Confirm),
        restart: input.is_down(InputAction::Restart),
    }
}

impl Scene for PlatformerScene {
    fn load(&mut self) {
        self.forward_audio();
        info!(
            seed = self.sim.seed(),
            entity_count = self.sim.world().entity_count(),
            "world_ready"
        );
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        let actions = input.actions();
        if actions.pressed_since(&self.previous_actions, InputAction::DumpState) {
            self.dump_state();
        }
        self.previous_actions = actions;

        let dt = Duration::from_secs_f32(fixed_dt_seconds.max(0.0));
        self.sim.tick(&held_inputs(input), dt);
        self.forward_audio();
        SceneCommand::None
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        draw::draw_frame(canvas, &self.sim);
    }

    fn unload(&mut self) {
        self.sound.apply(AudioCommand::Stop(MusicTrack::Theme));
        let hud = self.sim.hud();
        info!(
            score = hud.score,
            coins = hud.coins,
            lives = hud.lives,
            "scene_unload"
        );
    }

    fn debug_title(&self) -> Option<String> {
        let hud = self.sim.hud();
        let state: &'static str = hud.game_state.into();
        Some(format!(
            "Platformer | {} | Score {} | Camera {} | Entities {}",
            state,
            hud.score,
            self.sim.camera_x(),
            self.entity_count()
        ))
    }

    fn debug_lines(&self) -> Vec<String> {
        let player = self.sim.player();
        let state = self.sim.state();
        vec![
            format!("player {} {}", player.x, player.y),
            format!("vel {} {}", player.vel_x, player.vel_y),
            format!(
                "ground {} power {} inv {}",
                player.on_ground,
                player.power_level,
                player.is_invincible()
            ),
            format!("horizon {}", state.horizon),
            format!("combo {}", state.combo.count()),
            format!("sound {}", self.sim.sound_enabled()),
        ]
    }

    fn entity_count(&self) -> usize {
        self.sim.world().entity_count() + 1
    }
}
