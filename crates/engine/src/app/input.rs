#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    Pause,
    ToggleSound,
    Confirm,
    Restart,
    DumpState,
    Quit,
}

const ACTION_COUNT: usize = 9;

/// Held state for every logical action, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    /// Actions held now that were not held in `previous`.
    pub fn pressed_since(&self, previous: &ActionStates, action: InputAction) -> bool {
        self.is_down(action) && !previous.is_down(action)
    }
}

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Jump,
        InputAction::Pause,
        InputAction::ToggleSound,
        InputAction::Confirm,
        InputAction::Restart,
        InputAction::DumpState,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
            InputAction::Pause => 3,
            InputAction::ToggleSound => 4,
            InputAction::Confirm => 5,
            InputAction::Restart => 6,
            InputAction::DumpState => 7,
            InputAction::Quit => 8,
        }
    }
}
