//! The animated vector field: a grid of cell angles steered by the pointer.

use crate::config::FieldConfig;
use crate::glyph::{classify, normalize, wrap_signed};
use crate::surface::Surface;
use rand::{rngs::StdRng, Rng};
use std::f32::consts::{FRAC_PI_2, TAU};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Pointer {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) seen: bool,
}

impl Pointer {
    /// Records a move in surface-local px, blending the delta into the
    /// smoothed velocity once a previous position exists.
    pub(crate) fn track(&mut self, x: f32, y: f32, retain: f32) {
        if self.seen {
            let dx = x - self.x;
            let dy = y - self.y;
            self.vx = self.vx * retain + dx * (1.0 - retain);
            self.vy = self.vy * retain + dy * (1.0 - retain);
        }
        self.x = x;
        self.y = y;
        self.seen = true;
    }

    pub(crate) fn decay(&mut self, damping: f32) {
        self.vx *= damping;
        self.vy *= damping;
    }

    /// Heading and clamped magnitude of the velocity.
    pub(crate) fn motion(&self, max_speed: f32) -> (f32, f32) {
        let heading = self.vy.atan2(self.vx);
        let speed = self.vx.hypot(self.vy).min(max_speed);
        (heading, speed)
    }
}

/// Grid dimensions for a surface of `w × h` px.
pub(crate) fn grid_dims(w: f32, h: f32, cell: f32) -> (usize, usize) {
    let cols = (w / cell).ceil().max(0.0) as usize;
    let rows = (h / cell).ceil().max(0.0) as usize;
    (cols, rows)
}

/// Tangential direction at `(cx, cy)` around the focus: the focus→cell
/// direction rotated by +90°.
pub(crate) fn swirl_angle(focus: (f32, f32), cx: f32, cy: f32) -> f32 {
    (cy - focus.1).atan2(cx - focus.0) + FRAC_PI_2
}

/// Angular step toward `target` along the shorter arc, scaled by
/// `min(max_step, influence)`.
pub(crate) fn steer_step(angle: f32, target: f32, influence: f32, max_step: f32) -> f32 {
    wrap_signed(target - angle) * influence.clamp(0.0, max_step)
}

pub(crate) struct VectorField {
    cfg: FieldConfig,
    rng: StdRng,
    width: f32,
    height: f32,
    cols: usize,
    rows: usize,
    angles: Vec<f32>,
    pointer: Pointer,
    frames: u64,
}

impl VectorField {
    pub(crate) fn new(cfg: FieldConfig, rng: StdRng, width: f32, height: f32) -> Self {
        let mut field = Self {
            cfg,
            rng,
            width: 0.0,
            height: 0.0,
            cols: 0,
            rows: 0,
            angles: Vec::new(),
            pointer: Pointer::default(),
            frames: 0,
        };
        field.on_resize(width, height);
        field
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    #[cfg(test)]
    pub(crate) fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub(crate) fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    pub(crate) fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.track(x, y, self.cfg.velocity_retain);
    }

    pub(crate) fn on_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        let (cols, rows) = grid_dims(width, height, self.cfg.cell_size);
        self.cols = cols;
        self.rows = rows;
        self.ensure_grid();
    }

    fn ensure_grid(&mut self) {
        let len = self.cols * self.rows;
        if self.angles.len() != len {
            tracing::debug!(cols = self.cols, rows = self.rows, "reseeding field");
            let rng = &mut self.rng;
            self.angles = (0..len).map(|_| rng.gen_range(0.0..TAU)).collect();
        }
    }

    /// Pointer position, or the default focus before the first move.
    pub(crate) fn focus(&self) -> (f32, f32) {
        if self.pointer.seen {
            (self.pointer.x, self.pointer.y)
        } else {
            (
                self.width * self.cfg.default_focus.0,
                self.height * self.cfg.default_focus.1,
            )
        }
    }

    fn cell_centre(&self, i: usize, j: usize) -> (f32, f32) {
        let c = self.cfg.cell_size;
        (i as f32 * c + c * 0.5, j as f32 * c + c * 0.5)
    }

    /// Steers every cell for one frame. The pointer velocity is sampled once
    /// up front; decay is left to the caller.
    pub(crate) fn update(&mut self) {
        self.ensure_grid();

        let focus = self.focus();
        let (heading, speed) = self.pointer.motion(self.cfg.max_speed);
        let w = self.cfg.swirl_weight;

        for j in 0..self.rows {
            for i in 0..self.cols {
                let idx = j * self.cols + i;
                let (cx, cy) = self.cell_centre(i, j);
                let dist = (cx - focus.0)
                    .hypot(cy - focus.1)
                    .max(self.cfg.min_distance);
                let swirl = swirl_angle(focus, cx, cy);
                let influence = self.cfg.flow_strength * speed / dist;
                let target = swirl * w + heading * (1.0 - w);

                let a = self.angles[idx];
                let step = steer_step(a, target, influence, self.cfg.max_step);
                self.angles[idx] = normalize(a + step + self.cfg.drift);
            }
        }
    }

    pub(crate) fn draw(&self, surface: &mut Surface) {
        let glyphs = &self.cfg.glyphs;
        for j in 0..self.rows {
            for i in 0..self.cols {
                let stroke = classify(self.angles[j * self.cols + i], &self.cfg.bands);
                let (x, y) = self.cell_centre(i, j);
                surface.fill_glyph(
                    x,
                    y,
                    glyphs.char_for(stroke),
                    self.cfg.glyph_color,
                    self.cfg.glyph_alpha,
                );
            }
        }
    }

    /// One full frame: fade, steer, draw, then decay the pointer velocity.
    pub(crate) fn advance_frame(&mut self, surface: &mut Surface) {
        surface.fade(self.cfg.fade);
        self.update();
        self.draw(surface);
        self.pointer.decay(self.cfg.damping);
        self.frames += 1;
    }
}
