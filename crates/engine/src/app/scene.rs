use super::input::{ActionStates, InputAction};
use super::rendering::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// Logical inputs held at the moment a tick was sampled.
///
/// The snapshot is level-based: a key held for ten ticks shows up in ten
/// snapshots. Scenes that need press edges compare against the previous
/// snapshot they saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn actions(&self) -> ActionStates {
        self.actions
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&mut self, canvas: &mut Canvas<'_>);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
    fn debug_lines(&self) -> Vec<String> {
        Vec::new()
    }
    fn entity_count(&self) -> usize {
        0
    }
}

/// Owns the single active scene and tracks whether it has been loaded.
pub(crate) struct SceneHost {
    scene: Box<dyn Scene>,
    loaded: bool,
}

impl SceneHost {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if !self.loaded {
            self.scene.load();
            self.loaded = true;
        }
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if !self.loaded {
            return SceneCommand::None;
        }
        self.scene.update(fixed_dt_seconds, input)
    }

    pub(crate) fn render(&mut self, canvas: &mut Canvas<'_>) {
        if self.loaded {
            self.scene.render(canvas);
        }
    }

    pub(crate) fn shutdown(&mut self) {
        if self.loaded {
            self.scene.unload();
            self.loaded = false;
        }
    }

    pub(crate) fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct CountingScene {
        loads: Rc<Cell<u32>>,
        updates: Rc<Cell<u32>>,
        unloads: Rc<Cell<u32>>,
    }

    impl Scene for CountingScene {
        fn load(&mut self) {
            self.loads.set(self.loads.get() + 1);
        }

        fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
            self.updates.set(self.updates.get() + 1);
            if input.quit_requested() {
                SceneCommand::Quit
            } else {
                SceneCommand::None
            }
        }

        fn render(&mut self, _canvas: &mut Canvas<'_>) {}

        fn unload(&mut self) {
            self.unloads.set(self.unloads.get() + 1);
        }
    }

    #[test]
    fn snapshot_builders_set_held_actions() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::Jump, true)
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::MoveRight, false);

        assert!(snapshot.is_down(InputAction::Jump));
        assert!(!snapshot.is_down(InputAction::MoveRight));
        assert!(!snapshot.quit_requested());
    }

    #[test]
    fn host_ignores_updates_before_load() {
        let scene = CountingScene::default();
        let updates = Rc::clone(&scene.updates);
        let mut host = SceneHost::new(Box::new(scene));

        host.update(1.0 / 60.0, &InputSnapshot::empty());
        assert_eq!(updates.get(), 0);

        host.load();
        host.update(1.0 / 60.0, &InputSnapshot::empty());
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn host_load_and_shutdown_are_idempotent() {
        let scene = CountingScene::default();
        let loads = Rc::clone(&scene.loads);
        let unloads = Rc::clone(&scene.unloads);
        let mut host = SceneHost::new(Box::new(scene));

        host.load();
        host.load();
        host.shutdown();
        host.shutdown();

        assert_eq!(loads.get(), 1);
        assert_eq!(unloads.get(), 1);
    }

    #[test]
    fn quit_request_is_forwarded_as_command() {
        let mut host = SceneHost::new(Box::new(CountingScene::default()));
        host.load();
        let command = host.update(
            1.0 / 60.0,
            &InputSnapshot::empty().with_quit_requested(true),
        );
        assert_eq!(command, SceneCommand::Quit);
    }
}
