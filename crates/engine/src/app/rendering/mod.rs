mod canvas;
mod font;
mod renderer;

pub use canvas::{text_advance, text_line_height, text_width, with_alpha, Canvas, Rgba};
pub use renderer::Renderer;
