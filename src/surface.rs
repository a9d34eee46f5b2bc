use crate::config::CellMetrics;
use crate::host::Viewport;
use crate::render::{Cell, CellBuffer, Rgb};

// below this the glyph is indistinguishable from the background
const VISIBLE_INK: f32 = 0.04;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Texel {
    pub(crate) ch: char,
    pub(crate) color: Rgb,
    pub(crate) ink: f32,
}

impl Texel {
    const BLANK: Texel = Texel {
        ch: ' ',
        color: Rgb::new(0, 0, 0),
        ink: 0.0,
    };
}

/// Drawing surface in logical px, backed by one texel per terminal cell.
pub(crate) struct Surface {
    metrics: CellMetrics,
    width: f32,
    height: f32,
    cols: u16,
    rows: u16,
    texels: Vec<Texel>,
}

impl Surface {
    pub(crate) fn new(viewport: Viewport, metrics: CellMetrics) -> Self {
        let mut s = Self {
            metrics,
            width: 0.0,
            height: 0.0,
            cols: 0,
            rows: 0,
            texels: Vec::new(),
        };
        s.resize(viewport);
        s
    }

    /// Recomputes the px size from the viewport and reallocates the backing
    /// texels. Previous contents are dropped.
    pub(crate) fn resize(&mut self, viewport: Viewport) {
        self.cols = viewport.cols;
        self.rows = viewport.rows;
        self.width = viewport.width_px(self.metrics);
        self.height = viewport.height_px(self.metrics);
        self.texels = vec![Texel::BLANK; viewport.cols as usize * viewport.rows as usize];
    }

    pub(crate) fn width(&self) -> f32 {
        self.width
    }

    pub(crate) fn height(&self) -> f32 {
        self.height
    }

    /// Centre of a terminal cell in surface-local px.
    pub(crate) fn to_local(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.metrics.px_per_col,
            (row as f32 + 0.5) * self.metrics.px_per_row,
        )
    }

    fn texel_index(&self, x: f32, y: f32) -> Option<usize> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let col = (x / self.metrics.px_per_col) as usize;
        let row = (y / self.metrics.px_per_row) as usize;
        if col >= self.cols as usize || row >= self.rows as usize {
            return None;
        }
        Some(row * self.cols as usize + col)
    }

    #[cfg(test)]
    pub(crate) fn texel_at(&self, x: f32, y: f32) -> Option<Texel> {
        self.texel_index(x, y).map(|i| self.texels[i])
    }

    /// Translucent background wash over the whole surface.
    pub(crate) fn fade(&mut self, amount: f32) {
        let keep = 1.0 - amount.clamp(0.0, 1.0);
        for t in &mut self.texels {
            t.ink *= keep;
            if t.ink < VISIBLE_INK {
                *t = Texel::BLANK;
            }
        }
    }

    /// Draws `ch` centred on `(x, y)`; points off the surface are ignored.
    pub(crate) fn fill_glyph(&mut self, x: f32, y: f32, ch: char, color: Rgb, alpha: f32) {
        if let Some(i) = self.texel_index(x, y) {
            let t = &mut self.texels[i];
            t.ch = ch;
            t.color = color;
            t.ink += (1.0 - t.ink) * alpha.clamp(0.0, 1.0);
        }
    }

    #[cfg(test)]
    pub(crate) fn ink_total(&self) -> f32 {
        self.texels.iter().map(|t| t.ink).sum()
    }

    pub(crate) fn blit(&self, out: &mut CellBuffer, background: Rgb) {
        let bg = background.to_color();
        for row in 0..self.rows.min(out.h) {
            for col in 0..self.cols.min(out.w) {
                let t = self.texels[row as usize * self.cols as usize + col as usize];
                let cell = if t.ink < VISIBLE_INK {
                    Cell { ch: ' ', fg: bg, bg }
                } else {
                    Cell {
                        ch: t.ch,
                        fg: background.lerp(t.color, t.ink).to_color(),
                        bg,
                    }
                };
                out.set(col, row, cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(cols: u16, rows: u16) -> Surface {
        Surface::new(Viewport { cols, rows }, CellMetrics::default())
    }

    #[test]
    fn test_resize_tracks_viewport() {
        let mut s = surface(100, 30);
        assert_eq!(s.width(), 900.0);
        assert_eq!(s.height(), 540.0);
        s.fill_glyph(10.0, 10.0, '/', Rgb::new(255, 255, 255), 1.0);
        s.resize(Viewport { cols: 40, rows: 10 });
        assert_eq!(s.width(), 360.0);
        assert_eq!(s.height(), 180.0);
        assert_eq!(s.ink_total(), 0.0);
    }

    #[test]
    fn test_to_local_is_cell_centre() {
        let s = surface(10, 10);
        assert_eq!(s.to_local(0, 0), (4.5, 9.0));
        assert_eq!(s.to_local(3, 2), (31.5, 45.0));
    }

    #[test]
    fn test_fill_glyph_maps_px_to_texel() {
        let mut s = surface(10, 5);
        s.fill_glyph(27.0, 9.0, '\\', Rgb::new(168, 235, 255), 0.55);
        let t = s.texel_at(30.0, 1.0).unwrap();
        assert_eq!(t.ch, '\\');
        assert!((t.ink - 0.55).abs() < 1e-6);
        assert_eq!(s.texel_at(-1.0, 0.0), None);
        assert_eq!(s.texel_at(90.0, 0.0), None);
        s.fill_glyph(1000.0, 1000.0, '|', Rgb::new(1, 1, 1), 1.0);
    }

    #[test]
    fn test_fade_leaves_trails_then_clears() {
        let mut s = surface(4, 4);
        s.fill_glyph(5.0, 5.0, '|', Rgb::new(200, 200, 200), 1.0);
        s.fade(0.08);
        let t = s.texel_at(5.0, 5.0).unwrap();
        assert_eq!(t.ch, '|');
        assert!((t.ink - 0.92).abs() < 1e-6);
        for _ in 0..200 {
            s.fade(0.08);
        }
        assert_eq!(s.texel_at(5.0, 5.0).unwrap(), Texel::BLANK);
    }

    #[test]
    fn test_blit_hides_faint_texels() {
        let bg = Rgb::new(0, 18, 36);
        let mut s = surface(3, 1);
        s.fill_glyph(4.5, 9.0, '/', Rgb::new(168, 235, 255), 1.0);
        s.fill_glyph(13.5, 9.0, '|', Rgb::new(168, 235, 255), 0.01);
        let mut buf = CellBuffer::new(3, 1);
        s.blit(&mut buf, bg);
        assert_eq!(buf.cells[0].ch, '/');
        assert_eq!(buf.cells[0].fg, Rgb::new(168, 235, 255).to_color());
        assert_eq!(buf.cells[1].ch, ' ');
        assert_eq!(buf.cells[2].bg, bg.to_color());
    }
}
