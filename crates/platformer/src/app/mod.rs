mod bootstrap;
mod draw;
mod loop_runner;
mod scene;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
