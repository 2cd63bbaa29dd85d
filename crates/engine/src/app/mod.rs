mod input;
mod loop_runner;
mod metrics;
mod overlay;
mod rendering;
mod scene;

pub use input::{ActionStates, InputAction};
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{text_advance, text_line_height, text_width, with_alpha, Canvas, Renderer, Rgba};
pub use scene::{InputSnapshot, Scene, SceneCommand};
