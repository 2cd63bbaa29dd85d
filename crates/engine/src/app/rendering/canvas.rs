use super::font::{glyph_for, GLYPH_HEIGHT, GLYPH_WIDTH};

pub type Rgba = [u8; 4];

/// Immediate-mode drawing surface over an RGBA8 frame buffer.
///
/// Every primitive clips against the frame bounds, so callers can pass
/// coordinates that are partially or entirely off screen.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Rgba) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, rect_width: i32, rect_height: i32, color: Rgba) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(rect_width).min(self.width as i32);
        let end_y = y.saturating_add(rect_height).min(self.height as i32);
        if end_x <= start_x || end_y <= start_y {
            return;
        }
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.blend_pixel(px, py, color);
            }
        }
    }

    pub fn rect_outline(&mut self, x: i32, y: i32, rect_width: i32, rect_height: i32, color: Rgba) {
        if rect_width <= 1 || rect_height <= 1 {
            return;
        }
        self.fill_rect(x, y, rect_width, 1, color);
        self.fill_rect(x, y + rect_height - 1, rect_width, 1, color);
        self.fill_rect(x, y, 1, rect_height, color);
        self.fill_rect(x + rect_width - 1, y, 1, rect_height, color);
    }

    /// Filled ellipse inscribed in the given box.
    pub fn fill_oval(&mut self, x: i32, y: i32, oval_width: i32, oval_height: i32, color: Rgba) {
        if oval_width <= 0 || oval_height <= 0 {
            return;
        }
        let rx = oval_width as f32 * 0.5;
        let ry = oval_height as f32 * 0.5;
        let cx = x as f32 + rx;
        let cy = y as f32 + ry;
        for py in y.max(0)..(y + oval_height).min(self.height as i32) {
            let dy = (py as f32 + 0.5 - cy) / ry;
            let span = 1.0 - dy * dy;
            if span < 0.0 {
                continue;
            }
            let half = rx * span.sqrt();
            let left = (cx - half).round() as i32;
            let right = (cx + half).round() as i32;
            self.fill_rect(left, py, right - left, 1, color);
        }
    }

    /// Filled isosceles triangle with a horizontal base, apex above the base.
    pub fn fill_peak(&mut self, apex_x: i32, apex_y: i32, base_y: i32, half_base: i32, color: Rgba) {
        let rows = base_y - apex_y;
        if rows <= 0 || half_base <= 0 {
            return;
        }
        for row in 0..rows {
            let half = (half_base as i64 * row as i64 / rows as i64) as i32;
            self.fill_rect(apex_x - half, apex_y + row, half * 2 + 1, 1, color);
        }
    }

    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: i32, color: Rgba) {
        let scale = scale.max(1);
        let mut pen_x = x;
        for ch in text.chars() {
            let glyph = glyph_for(ch);
            for (row_index, row_bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    self.fill_rect(
                        pen_x + col * scale,
                        y + row_index as i32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
            pen_x += text_advance(scale);
        }
    }

    pub fn draw_text_centered(&mut self, center_x: i32, y: i32, text: &str, scale: i32, color: Rgba) {
        let width = text_width(text, scale);
        self.draw_text(center_x - width / 2, y, text, scale, color);
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(offset..offset + 4) else {
            return;
        };
        let alpha = color[3] as u32;
        if alpha == 255 {
            dst.copy_from_slice(&color);
            return;
        }
        if alpha == 0 {
            return;
        }
        for channel in 0..3 {
            let src = color[channel] as u32;
            let old = dst[channel] as u32;
            dst[channel] = ((src * alpha + old * (255 - alpha)) / 255) as u8;
        }
        dst[3] = 255;
    }
}

pub fn text_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale.max(1)
}

pub fn text_line_height(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale.max(1)
}

pub fn text_width(text: &str, scale: i32) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        return 0;
    }
    count * text_advance(scale) - scale.max(1)
}

pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    let alpha = (alpha.clamp(0.0, 1.0) * color[3] as f32).round() as u8;
    [color[0], color[1], color[2], alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.fill_rect(-2, -2, 4, 4, RED);

        assert_eq!(pixel(&frame, 4, 0, 0), RED);
        assert_eq!(pixel(&frame, 4, 1, 1), RED);
        assert_eq!(pixel(&frame, 4, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn primitives_entirely_off_screen_are_noops() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        let mut canvas = Canvas::new(&mut frame, 8, 8);
        canvas.fill_rect(100, 100, 10, 10, RED);
        canvas.fill_oval(-50, -50, 10, 10, RED);
        canvas.fill_peak(4, -40, -20, 10, RED);
        canvas.draw_text(-100, 0, "SCORE", 2, RED);

        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn half_alpha_blends_with_background() {
        let mut frame = vec![0u8; 4];
        let mut canvas = Canvas::new(&mut frame, 1, 1);
        canvas.clear([0, 0, 200, 255]);
        canvas.fill_rect(0, 0, 1, 1, with_alpha(RED, 0.5));

        let blended = pixel(&frame, 1, 0, 0);
        assert!((126..=129).contains(&blended[0]), "{blended:?}");
        assert!((98..=101).contains(&blended[2]), "{blended:?}");
    }

    #[test]
    fn oval_center_is_filled_and_corner_is_not() {
        let mut frame = vec![0u8; 10 * 10 * 4];
        let mut canvas = Canvas::new(&mut frame, 10, 10);
        canvas.fill_oval(0, 0, 10, 10, RED);

        assert_eq!(pixel(&frame, 10, 5, 5), RED);
        assert_eq!(pixel(&frame, 10, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn text_width_follows_scale() {
        assert_eq!(text_width("", 3), 0);
        assert_eq!(text_width("A", 1), 3);
        assert_eq!(text_width("AB", 2), 14);
        assert_eq!(text_line_height(3), 21);
    }
}
