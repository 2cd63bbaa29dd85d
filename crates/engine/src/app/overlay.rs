use super::metrics::LoopMetricsSnapshot;
use super::rendering::{text_line_height, text_width, Canvas};

const OVERLAY_TEXT_SCALE: i32 = 2;
const OVERLAY_MARGIN: i32 = 8;
const OVERLAY_INSET: i32 = 6;
const OVERLAY_TEXT_PRIMARY_COLOR: [u8; 4] = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 190];
const OVERLAY_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
    pub entity_count: usize,
    pub scene_lines: Vec<String>,
}

/// Debug panel anchored to the bottom-left corner of the canvas.
pub(crate) fn draw_overlay(canvas: &mut Canvas<'_>, data: &OverlayData) {
    let lines = build_overlay_lines(data);
    if lines.is_empty() || canvas.width() == 0 || canvas.height() == 0 {
        return;
    }

    let line_height = text_line_height(OVERLAY_TEXT_SCALE);
    let panel_width = lines
        .iter()
        .map(|line| text_width(line, OVERLAY_TEXT_SCALE))
        .max()
        .unwrap_or(0)
        + OVERLAY_INSET * 2;
    let panel_height = lines.len() as i32 * line_height + OVERLAY_INSET * 2;
    let panel_left = OVERLAY_MARGIN;
    let panel_top = canvas.height() as i32 - OVERLAY_MARGIN - panel_height;

    canvas.fill_rect(
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BG_COLOR,
    );
    canvas.rect_outline(
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BORDER_COLOR,
    );

    let mut y = panel_top + OVERLAY_INSET;
    for (index, line) in lines.iter().enumerate() {
        let color = if index < 2 {
            OVERLAY_TEXT_PRIMARY_COLOR
        } else {
            OVERLAY_TEXT_DIM_COLOR
        };
        canvas.draw_text(panel_left + OVERLAY_INSET, y, line, OVERLAY_TEXT_SCALE, color);
        y += line_height;
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        format_fps_line(
            data.metrics.fps,
            data.render_fps_cap,
            data.slow_frame_delay_ms,
        ),
        format!(
            "TPS: {:.1}  FRAME: {:.2}MS",
            data.metrics.tps, data.metrics.frame_time_ms
        ),
        format!("ENTITIES: {}", data.entity_count),
    ];
    lines.extend(data.scene_lines.iter().cloned());
    lines
}

fn format_fps_line(current_fps: f32, cap: Option<u32>, slow_frame_delay_ms: u64) -> String {
    let cap_text = match cap {
        Some(value) => value.to_string(),
        None => "OFF".to_string(),
    };
    if slow_frame_delay_ms > 0 {
        format!("FPS: {current_fps:.1} (CAP {cap_text}) DELAY {slow_frame_delay_ms}MS")
    } else {
        format!("FPS: {current_fps:.1} (CAP {cap_text})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> OverlayData {
        OverlayData {
            metrics: LoopMetricsSnapshot {
                fps: 59.9,
                tps: 60.0,
                frame_time_ms: 16.7,
            },
            render_fps_cap: None,
            slow_frame_delay_ms: 0,
            entity_count: 42,
            scene_lines: vec!["STATE: PLAYING".to_string()],
        }
    }

    #[test]
    fn fps_line_formats_cap_on_and_debug_delay() {
        assert_eq!(
            format_fps_line(30.0, Some(60), 12),
            "FPS: 30.0 (CAP 60) DELAY 12MS"
        );
        assert_eq!(format_fps_line(59.94, None, 0), "FPS: 59.9 (CAP OFF)");
    }

    #[test]
    fn scene_lines_follow_loop_lines() {
        let lines = build_overlay_lines(&sample_data());
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "ENTITIES: 42");
        assert_eq!(lines[3], "STATE: PLAYING");
    }

    #[test]
    fn draw_overlay_writes_backing_plate_pixels() {
        let width = 400;
        let height = 200;
        let mut frame = vec![0u8; (width * height * 4) as usize];
        {
            let mut canvas = Canvas::new(&mut frame, width, height);
            draw_overlay(&mut canvas, &sample_data());
        }
        let bottom_left_inside = ((height - OVERLAY_MARGIN as u32 - 2) * width
            + OVERLAY_MARGIN as u32
            + 2) as usize
            * 4;
        assert_ne!(&frame[bottom_left_inside..bottom_left_inside + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn tiny_canvas_never_panics() {
        for (width, height) in [(0, 0), (1, 1), (3, 2)] {
            let mut frame = vec![0u8; (width * height * 4) as usize];
            let mut canvas = Canvas::new(&mut frame, width, height);
            draw_overlay(&mut canvas, &sample_data());
        }
    }
}
