pub mod scene;

use std::f64::consts::TAU;

use crate::{
    config,
    types::{ColorId, Layer},
};

use self::scene::{Backdrop, Corner, ItemStyle, Scene};

const BACKDROP_DEPTH: f32 = -2.0;
const PULSE_DEPTH: f32 = -1.0;
const TITLE_DEPTH: f32 = 2.0;
const OVERLAY_DEPTH: f32 = 10.0;

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Bold,
    Dim,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellWidth {
    Narrow,
    /// First cell of a double-width glyph.
    WideHead,
    /// Covered by the glyph to its left.
    WideTail,
}

#[derive(Clone, Copy, Debug)]
pub struct RenderCell {
    pub ch: char,
    pub depth: f32,
    pub color: ColorId,
    pub bg: Option<ColorId>,
    pub emphasis: Emphasis,
    pub width: CellWidth,
}

const BLANK: RenderCell = RenderCell {
    ch: ' ',
    depth: f32::NEG_INFINITY,
    color: ColorId::White,
    bg: None,
    emphasis: Emphasis::Normal,
    width: CellWidth::Narrow,
};

#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<RenderCell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            cells: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize).saturating_mul(height as usize);
        if self.cells.len() != len {
            self.cells.resize(len, BLANK);
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> RenderCell {
        debug_assert!(x < self.width && y < self.height, "get() out of bounds");
        self.cells[self.index(x, y)]
    }

    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Writes a glyph if it is at least as near as what the cell holds.
    fn set(&mut self, x: i32, y: i32, ch: char, depth: f32, color: ColorId, emphasis: Emphasis) {
        let Some(idx) = self.checked_index(x, y) else {
            return;
        };
        let cell = &mut self.cells[idx];
        if depth >= cell.depth {
            cell.ch = ch;
            cell.depth = depth;
            cell.color = color;
            cell.emphasis = emphasis;
            cell.width = CellWidth::Narrow;
        }
    }

    /// Double-width glyph. Dropped unless both cells fit and accept it.
    fn set_wide(&mut self, x: i32, y: i32, ch: char, depth: f32, color: ColorId, emphasis: Emphasis) {
        let (Some(head), Some(tail)) = (self.checked_index(x, y), self.checked_index(x + 1, y))
        else {
            return;
        };
        if depth < self.cells[head].depth || depth < self.cells[tail].depth {
            return;
        }
        for (idx, ch, width) in [(head, ch, CellWidth::WideHead), (tail, ' ', CellWidth::WideTail)] {
            let cell = &mut self.cells[idx];
            cell.ch = ch;
            cell.depth = depth;
            cell.color = color;
            cell.emphasis = emphasis;
            cell.width = width;
        }
    }

    fn set_bg(&mut self, x: u16, y: u16, bg: ColorId) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx].bg = Some(bg);
        }
    }

    fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            None
        } else {
            Some(self.index(x as u16, y as u16))
        }
    }
}

/// Rasterises `scene` as it looks `t` seconds after mount.
pub fn paint(scene: &Scene, t: f64, viewport: Viewport, frame: &mut FrameBuffer) {
    if frame.width() != viewport.width || frame.height() != viewport.height {
        frame.resize(viewport.width, viewport.height);
    } else {
        frame.clear();
    }
    if viewport.width == 0 || viewport.height == 0 {
        return;
    }

    for backdrop in scene.backdrop {
        draw_backdrop(backdrop, t, frame);
    }
    draw_pulses(scene, t, frame);
    draw_title(scene, t, frame);

    for parallax in &scene.layers {
        for style in &parallax.items {
            draw_item(style, parallax.layer, t, frame);
        }
    }

    draw_overlay_text(scene, frame);

    if scene.flash_overlay {
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                frame.set_bg(x, y, ColorId::Flash);
            }
        }
    }
}

/// Where an item is in its fall cycle, in `[0, 1)`.
pub fn fall_progress(style: &ItemStyle, t: f64) -> f64 {
    ((t - style.delay_secs) / style.duration_secs).rem_euclid(1.0)
}

/// Current spin angle in `[0, 360)`.
pub fn spin_angle(style: &ItemStyle, progress: f64) -> f64 {
    (style.rotation_deg + style.rotation_speed_deg * progress).rem_euclid(360.0)
}

fn draw_item(style: &ItemStyle, layer: Layer, t: f64, frame: &mut FrameBuffer) {
    let width = frame.width() as f64;
    let height = frame.height() as f64;
    let progress = fall_progress(style, t);

    // Start one row above the top and finish one row below the bottom.
    let y = (progress * (height + 2.0) - 1.0).floor() as i32;
    let x = (style.left_pct / 100.0 * width).floor() as i32;

    let angle = spin_angle(style, progress);
    let emphasis = if (90.0..270.0).contains(&angle) {
        Emphasis::Dim
    } else if style.font_size >= config::BOLD_SIZE {
        Emphasis::Bold
    } else {
        Emphasis::Normal
    };
    // Equal-size overlaps resolve by id, not list order.
    let depth = layer.index() as f32
        + (style.font_size / 100.0) as f32
        + (style.id.0 % 1000) as f32 * 1e-7;
    let color = layer_color(layer);

    if style.kind.glyph_width() == 2 {
        frame.set_wide(x, y, style.symbol, depth, color, emphasis);
    } else {
        frame.set(x, y, style.symbol, depth, color, emphasis);
    }
}

fn layer_color(layer: Layer) -> ColorId {
    match layer {
        Layer::Far => ColorId::DimGreen,
        Layer::Mid => ColorId::Green,
        Layer::Near => ColorId::Gold,
    }
}

fn draw_backdrop(backdrop: Backdrop, t: f64, frame: &mut FrameBuffer) {
    let (w, h) = (frame.width(), frame.height());
    match backdrop {
        Backdrop::Gradient => {
            for y in 0..h {
                let shade = 8 + (40 * y as u32 / h.max(1) as u32) as u8;
                for x in 0..w {
                    frame.set_bg(x, y, ColorId::Shade(shade));
                }
            }
        }
        Backdrop::Noise => {
            let tick = (t * 12.0) as u64;
            for y in 0..h {
                for x in 0..w {
                    if noise(x, y, tick) % 97 == 0 {
                        frame.set(x as i32, y as i32, '·', BACKDROP_DEPTH, ColorId::Gray, Emphasis::Dim);
                    }
                }
            }
        }
        Backdrop::Scanlines => {
            for y in (1..h).step_by(2) {
                for x in 0..w {
                    let idx = frame.index(x, y);
                    if let Some(ColorId::Shade(shade)) = frame.cells[idx].bg {
                        frame.cells[idx].bg = Some(ColorId::Shade(shade.saturating_sub(6)));
                    }
                }
            }
        }
    }
}

fn noise(x: u16, y: u16, tick: u64) -> u64 {
    let mut z = (x as u64) << 40 ^ (y as u64) << 20 ^ tick;
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn draw_pulses(scene: &Scene, t: f64, frame: &mut FrameBuffer) {
    let cx = frame.width() as f64 / 2.0;
    let cy = frame.height() as f64 / 2.0;
    // Cells are about twice as tall as wide.
    let base = (frame.height() as f64).min(frame.width() as f64 / 2.0);
    for pulse in &scene.pulses {
        let phase = (t / pulse.period_secs * TAU).sin();
        let r = pulse.radius * base * (1.0 + 0.1 * phase);
        let steps = ((r * 8.0) as usize).max(16);
        for i in 0..steps {
            let a = i as f64 / steps as f64 * TAU;
            let x = (cx + a.cos() * r * 2.0).round() as i32;
            let y = (cy + a.sin() * r).round() as i32;
            frame.set(x, y, '·', PULSE_DEPTH, ColorId::DeepGreen, Emphasis::Dim);
        }
    }
}

fn draw_title(scene: &Scene, t: f64, frame: &mut FrameBuffer) {
    let cy = frame.height() as i32 / 2;
    let headline: Vec<char> = spaced(scene.title.headline);
    // Brief horizontal jitter a few times per second.
    let glitching = scene.title.glitch && (t * 10.0) as u64 % 13 == 0;
    let shift = if glitching { 1 } else { 0 };
    let color = if glitching { ColorId::Magenta } else { ColorId::White };
    draw_centered(frame, &headline, cy - 1, shift, TITLE_DEPTH, color, Emphasis::Bold);
    if glitching {
        draw_centered(frame, &headline, cy - 1, -1, TITLE_DEPTH - 0.1, ColorId::Cyan, Emphasis::Dim);
    }
    let subline: Vec<char> = spaced(scene.title.subline);
    draw_centered(frame, &subline, cy + 1, 0, TITLE_DEPTH, ColorId::Gold, Emphasis::Bold);
}

fn spaced(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn draw_centered(
    frame: &mut FrameBuffer,
    text: &[char],
    y: i32,
    shift: i32,
    depth: f32,
    color: ColorId,
    emphasis: Emphasis,
) {
    let x0 = (frame.width() as i32 - text.len() as i32) / 2 + shift;
    for (i, ch) in text.iter().enumerate() {
        frame.set(x0 + i as i32, y, *ch, depth, color, emphasis);
    }
}

fn draw_overlay_text(scene: &Scene, frame: &mut FrameBuffer) {
    let w = frame.width() as i32;
    let bottom = frame.height() as i32 - 1;
    for deco in &scene.corners {
        let len = deco.text.chars().count() as i32;
        let (x, y) = match deco.corner {
            Corner::TopLeft => (1, 0),
            Corner::TopRight => (w - len - 1, 0),
            Corner::BottomLeft => (1, bottom),
            Corner::BottomRight => (w - len - 1, bottom),
        };
        for (i, ch) in deco.text.chars().enumerate() {
            frame.set(x + i as i32, y, ch, OVERLAY_DEPTH, ColorId::Gold, Emphasis::Bold);
        }
    }
    let footer: Vec<char> = scene.footer.chars().collect();
    draw_centered(frame, &footer, bottom, 0, OVERLAY_DEPTH, ColorId::Gray, Emphasis::Dim);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Tuning,
        core::{population::Population, random::Scripted},
        types::{ItemId, Kind},
    };

    use super::scene::{compose, ParallaxLayer};

    fn style(kind: Kind, symbol: char, left_pct: f64, delay_secs: f64) -> ItemStyle {
        ItemStyle {
            id: ItemId(1),
            kind,
            symbol,
            left_pct,
            font_size: 40.0,
            duration_secs: 4.0,
            delay_secs,
            rotation_deg: 0.0,
            rotation_speed_deg: 0.0,
        }
    }

    fn empty_scene() -> Scene {
        let tuning = Tuning {
            seed_items: 0,
            ..Tuning::default()
        };
        compose(&Population::seeded(&mut Scripted::constant(0.5), &tuning), false)
    }

    fn scene_with(layer: Layer, items: Vec<ItemStyle>) -> Scene {
        let mut scene = empty_scene();
        scene.layers[layer.index()] = ParallaxLayer { layer, items };
        scene
    }

    fn find(frame: &FrameBuffer, ch: char) -> Option<(u16, u16)> {
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.get(x, y).ch == ch {
                    return Some((x, y));
                }
            }
        }
        None
    }

    mod framebuffer {
        use super::*;

        #[test]
        fn creates_with_correct_dimensions() {
            let fb = FrameBuffer::new(80, 24);
            assert_eq!(fb.width(), 80);
            assert_eq!(fb.height(), 24);
        }

        #[test]
        fn resize_clears_cells() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.set(1, 1, 'A', 1.0, ColorId::Gold, Emphasis::Normal);
            fb.resize(12, 8);
            assert_eq!(fb.width(), 12);
            assert_eq!(fb.get(1, 1).ch, ' ');
        }

        #[test]
        fn nearer_glyph_wins() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.set(5, 5, 'A', 2.0, ColorId::Gold, Emphasis::Normal);
            fb.set(5, 5, 'B', 1.0, ColorId::Green, Emphasis::Normal);
            assert_eq!(fb.get(5, 5).ch, 'A');
            fb.set(5, 5, 'C', 3.0, ColorId::Green, Emphasis::Normal);
            assert_eq!(fb.get(5, 5).ch, 'C');
        }

        #[test]
        fn out_of_bounds_is_ignored() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.set(-1, 3, 'X', 1.0, ColorId::Gold, Emphasis::Normal);
            fb.set(10, 3, 'X', 1.0, ColorId::Gold, Emphasis::Normal);
            fb.set_wide(9, 3, 'X', 1.0, ColorId::Gold, Emphasis::Normal);
            assert_eq!(find(&fb, 'X'), None);
        }

        #[test]
        fn wide_glyph_takes_two_cells() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.set_wide(3, 2, '💵', 1.0, ColorId::Green, Emphasis::Normal);
            assert_eq!(fb.get(3, 2).width, CellWidth::WideHead);
            assert_eq!(fb.get(4, 2).width, CellWidth::WideTail);
        }

        #[test]
        fn wide_glyph_blocked_by_nearer_tail_cell() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.set(4, 2, '$', 5.0, ColorId::Gold, Emphasis::Normal);
            fb.set_wide(3, 2, '💵', 1.0, ColorId::Green, Emphasis::Normal);
            assert_eq!(fb.get(3, 2).ch, ' ');
            assert_eq!(fb.get(4, 2).ch, '$');
        }
    }

    mod progress {
        use super::*;

        #[test]
        fn negative_delay_starts_mid_fall() {
            let s = style(Kind::Symbol, '$', 50.0, -1.0);
            assert!((fall_progress(&s, 0.0) - 0.25).abs() < 1e-12);
        }

        #[test]
        fn wraps_each_cycle() {
            let s = style(Kind::Symbol, '$', 50.0, -1.0);
            let a = fall_progress(&s, 0.5);
            let b = fall_progress(&s, 4.5);
            assert!((a - b).abs() < 1e-12);
            assert!((0.0..1.0).contains(&a));
        }

        #[test]
        fn spin_follows_speed() {
            let mut s = style(Kind::Coin, '🪙', 10.0, -1.0);
            s.rotation_deg = 350.0;
            s.rotation_speed_deg = 40.0;
            assert!((spin_angle(&s, 0.5) - 10.0).abs() < 1e-9);
            s.rotation_speed_deg = -360.0;
            assert!((spin_angle(&s, 0.5) - 170.0).abs() < 1e-9);
        }
    }

    mod paint_fn {
        use super::*;

        const VIEW: Viewport = Viewport {
            width: 40,
            height: 18,
        };

        #[test]
        fn item_is_placed_by_left_and_progress() {
            // progress 0.5 -> row 0.5 * 20 - 1 = 9; column 25% of 40 = 10
            let scene = scene_with(Layer::Near, vec![style(Kind::Symbol, '₿', 25.0, -2.0)]);
            let mut frame = FrameBuffer::new(0, 0);
            paint(&scene, 0.0, VIEW, &mut frame);
            assert_eq!(find(&frame, '₿'), Some((10, 9)));
            assert_eq!(frame.get(10, 9).color, ColorId::Gold);
        }

        #[test]
        fn item_moves_down_over_time() {
            let scene = scene_with(Layer::Far, vec![style(Kind::Symbol, '₿', 80.0, -0.4)]);
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            paint(&scene, 0.0, VIEW, &mut frame);
            let (_, before) = find(&frame, '₿').expect("visible");
            paint(&scene, 1.0, VIEW, &mut frame);
            let (_, after) = find(&frame, '₿').expect("visible");
            assert!(after > before);
        }

        #[test]
        fn emoji_items_are_wide() {
            let scene = scene_with(Layer::Mid, vec![style(Kind::Bill, '💶', 50.0, -2.0)]);
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            paint(&scene, 0.0, VIEW, &mut frame);
            let (x, y) = find(&frame, '💶').expect("visible");
            assert_eq!(frame.get(x, y).width, CellWidth::WideHead);
            assert_eq!(frame.get(x + 1, y).width, CellWidth::WideTail);
        }

        #[test]
        fn near_layer_covers_far_layer() {
            let mut scene = scene_with(Layer::Far, vec![style(Kind::Symbol, '₿', 25.0, -2.0)]);
            scene.layers[Layer::Near.index()] = ParallaxLayer {
                layer: Layer::Near,
                items: vec![style(Kind::Symbol, '¥', 25.0, -2.0)],
            };
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            paint(&scene, 0.0, VIEW, &mut frame);
            assert_eq!(frame.get(10, 9).ch, '¥');
            assert_eq!(find(&frame, '₿'), None);
        }

        #[test]
        fn back_facing_spin_is_dim() {
            let mut s = style(Kind::Symbol, '$', 25.0, -2.0);
            s.rotation_deg = 180.0;
            let scene = scene_with(Layer::Mid, vec![s]);
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            paint(&scene, 0.0, VIEW, &mut frame);
            assert_eq!(frame.get(10, 9).emphasis, Emphasis::Dim);
        }

        #[test]
        fn large_items_are_bold() {
            let mut s = style(Kind::Symbol, '$', 25.0, -2.0);
            s.font_size = 70.0;
            let scene = scene_with(Layer::Mid, vec![s]);
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            paint(&scene, 0.0, VIEW, &mut frame);
            assert_eq!(frame.get(10, 9).emphasis, Emphasis::Bold);
        }

        #[test]
        fn flash_recolours_every_cell() {
            let mut scene = empty_scene();
            scene.flash_overlay = true;
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            paint(&scene, 0.0, VIEW, &mut frame);
            for y in 0..VIEW.height {
                for x in 0..VIEW.width {
                    assert_eq!(frame.get(x, y).bg, Some(ColorId::Flash));
                }
            }
        }

        #[test]
        fn without_flash_background_is_gradient() {
            let scene = empty_scene();
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            paint(&scene, 0.0, VIEW, &mut frame);
            assert!(matches!(frame.get(0, 0).bg, Some(ColorId::Shade(_))));
        }

        #[test]
        fn corners_and_title_are_drawn() {
            let scene = empty_scene();
            let mut frame = FrameBuffer::new(VIEW.width, VIEW.height);
            paint(&scene, 0.05, VIEW, &mut frame);
            assert_eq!(frame.get(1, 0).ch, '$');
            assert_eq!(frame.get(VIEW.width - 4, 0).ch, '€');
            assert_eq!(frame.get(1, VIEW.height - 1).ch, '£');
            assert_eq!(frame.get(VIEW.width - 4, VIEW.height - 1).ch, '¥');
            assert!(find(&frame, 'M').is_some());
            assert!(find(&frame, 'R').is_some());
        }

        #[test]
        fn zero_sized_viewport_does_not_panic() {
            let scene = empty_scene();
            let mut frame = FrameBuffer::new(10, 10);
            paint(&scene, 1.0, Viewport { width: 0, height: 0 }, &mut frame);
            assert_eq!(frame.width(), 0);
        }
    }
}
