use serde::Serialize;
use strum_macros::IntoStaticStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameState {
    #[default]
    Title,
    Playing,
    Paused,
    GameOver,
}

/// Logical inputs held during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldInputs {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub pause: bool,
    pub toggle_sound: bool,
    pub confirm: bool,
    pub restart: bool,
}

/// Toggle inputs that went from released to held since the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressedEdges {
    pub pause: bool,
    pub toggle_sound: bool,
    pub confirm: bool,
    pub restart: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTracker {
    previous: HeldInputs,
}

impl EdgeTracker {
    pub fn update(&mut self, held: &HeldInputs) -> PressedEdges {
        let previous = self.previous;
        self.previous = *held;
        PressedEdges {
            pause: held.pause && !previous.pause,
            toggle_sound: held.toggle_sound && !previous.toggle_sound,
            confirm: held.confirm && !previous.confirm,
            restart: held.restart && !previous.restart,
        }
    }

    /// Treats every currently held input as already seen, so a key still
    /// down across a reset does not fire again.
    pub fn absorb(&mut self, held: &HeldInputs) {
        self.previous = *held;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Pause,
    Resume,
    Restart,
}

impl Transition {
    /// State entered by this transition. Restart re-creates the world and
    /// lands on the title screen.
    pub fn target(self) -> GameState {
        match self {
            Transition::Start | Transition::Resume => GameState::Playing,
            Transition::Pause => GameState::Paused,
            Transition::Restart => GameState::Title,
        }
    }
}

/// State-machine edge for the inputs pressed this tick, if any.
pub fn next_transition(state: GameState, edges: &PressedEdges) -> Option<Transition> {
    match state {
        GameState::Title if edges.confirm => Some(Transition::Start),
        GameState::Playing if edges.pause => Some(Transition::Pause),
        GameState::Paused if edges.pause => Some(Transition::Resume),
        GameState::GameOver if edges.restart => Some(Transition::Restart),
        _ => None,
    }
}

/// Sound may be toggled only while a run is live.
pub fn accepts_sound_toggle(state: GameState) -> bool {
    matches!(state, GameState::Playing | GameState::Paused)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(update: impl FnOnce(&mut PressedEdges)) -> PressedEdges {
        let mut edges = PressedEdges::default();
        update(&mut edges);
        edges
    }

    #[test]
    fn held_key_fires_once() {
        let mut tracker = EdgeTracker::default();
        let held = HeldInputs {
            pause: true,
            ..HeldInputs::default()
        };
        assert!(tracker.update(&held).pause);
        assert!(!tracker.update(&held).pause);
        assert!(!tracker.update(&HeldInputs::default()).pause);
        assert!(tracker.update(&held).pause);
    }

    #[test]
    fn absorbed_keys_do_not_fire() {
        let mut tracker = EdgeTracker::default();
        let held = HeldInputs {
            restart: true,
            confirm: true,
            ..HeldInputs::default()
        };
        tracker.absorb(&held);
        assert_eq!(tracker.update(&held), PressedEdges::default());
    }

    #[test]
    fn full_cycle_of_transitions() {
        let confirm = pressed(|edges| edges.confirm = true);
        let pause = pressed(|edges| edges.pause = true);
        let restart = pressed(|edges| edges.restart = true);

        assert_eq!(next_transition(GameState::Title, &confirm), Some(Transition::Start));
        assert_eq!(next_transition(GameState::Playing, &pause), Some(Transition::Pause));
        assert_eq!(next_transition(GameState::Paused, &pause), Some(Transition::Resume));
        assert_eq!(
            next_transition(GameState::GameOver, &restart),
            Some(Transition::Restart)
        );
        assert_eq!(Transition::Restart.target(), GameState::Title);
    }

    #[test]
    fn unrelated_inputs_do_not_transition() {
        let confirm = pressed(|edges| edges.confirm = true);
        let restart = pressed(|edges| edges.restart = true);
        assert_eq!(next_transition(GameState::Playing, &confirm), None);
        assert_eq!(next_transition(GameState::Playing, &restart), None);
        assert_eq!(next_transition(GameState::GameOver, &confirm), None);
        assert_eq!(next_transition(GameState::Title, &restart), None);
    }

    #[test]
    fn sound_toggle_only_during_a_run() {
        assert!(accepts_sound_toggle(GameState::Playing));
        assert!(accepts_sound_toggle(GameState::Paused));
        assert!(!accepts_sound_toggle(GameState::Title));
        assert!(!accepts_sound_toggle(GameState::GameOver));
    }

    #[test]
    fn state_names_are_snake_case() {
        let name: &'static str = GameState::GameOver.into();
        assert_eq!(name, "game_over");
    }
}
