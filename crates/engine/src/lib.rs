//! Windowed fixed-step runtime: owns the OS window, the frame buffer and
//! the tick clock, and drives a single [`Scene`] through them.

pub mod app;

pub use app::{
    run_app, text_advance, text_line_height, text_width, with_alpha, ActionStates, AppError,
    Canvas, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot, Renderer, Rgba, Scene,
    SceneCommand, SLOW_FRAME_ENV_VAR,
};
