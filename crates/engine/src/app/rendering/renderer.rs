use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use winit::window::Window;

use super::Canvas;
use crate::app::overlay::{draw_overlay, OverlayData};
use crate::app::scene::SceneHost;

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Presents scene frames through a `pixels` surface sized to the logical
/// viewport. The surface texture follows the window size; the buffer does
/// not, so scenes always draw in fixed logical pixels.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    buffer_width: u32,
    buffer_height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>, buffer_width: u32, buffer_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), Arc::clone(&window));
        let pixels = Pixels::new(buffer_width, buffer_height, surface)?;
        Ok(Self {
            window,
            pixels,
            buffer_width,
            buffer_height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn render_scene(
        &mut self,
        host: &mut SceneHost,
        overlay: Option<&OverlayData>,
    ) -> Result<(), Error> {
        let width = self.buffer_width;
        let height = self.buffer_height;
        {
            let mut canvas = Canvas::new(self.pixels.frame_mut(), width, height);
            canvas.clear(CLEAR_COLOR);
            host.render(&mut canvas);
            if let Some(data) = overlay {
                draw_overlay(&mut canvas, data);
            }
        }
        self.pixels.render()
    }
}
