//! Side-scrolling platformer: endless procedurally generated terrain,
//! stompable enemies, question blocks and a lives/respawn loop.

use std::process::ExitCode;

mod app;
mod audio;
mod sim;

fn main() -> ExitCode {
    app::run(app::build_app())
}
