use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Which of the three strokes a cell renders as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Stroke {
    Vertical,
    Forward,
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Glyphs {
    pub(crate) vertical: char,
    pub(crate) forward: char,
    pub(crate) back: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            vertical: '|',
            forward: '/',
            back: '\\',
        }
    }
}

impl Glyphs {
    pub(crate) fn char_for(&self, stroke: Stroke) -> char {
        match stroke {
            Stroke::Vertical => self.vertical,
            Stroke::Forward => self.forward,
            Stroke::Back => self.back,
        }
    }
}

/// Half-open angular interval `[start, end)` in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Band {
    pub(crate) start: f32,
    pub(crate) end: f32,
}

impl Band {
    pub(crate) const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub(crate) fn contains(&self, a: f32) -> bool {
        a >= self.start && a < self.end
    }

    fn overlaps(&self, other: &Band) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The two diagonal bands; anything outside both renders vertical.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GlyphBands {
    pub(crate) back: Band,
    pub(crate) forward: Band,
}

impl Default for GlyphBands {
    fn default() -> Self {
        Self {
            back: Band::new(PI / 6.0, 5.0 * PI / 6.0),
            forward: Band::new(7.0 * PI / 6.0, 11.0 * PI / 6.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BandError {
    OutOfRange,
    Empty,
    Overlap,
}

impl GlyphBands {
    pub(crate) fn check(&self) -> Result<(), BandError> {
        for b in [self.back, self.forward] {
            if !(b.start.is_finite() && b.end.is_finite()) || b.start < 0.0 || b.end > TAU {
                return Err(BandError::OutOfRange);
            }
            if b.end <= b.start {
                return Err(BandError::Empty);
            }
        }
        if self.back.overlaps(&self.forward) {
            return Err(BandError::Overlap);
        }
        Ok(())
    }
}

/// Folds any finite angle into `[0, 2π)`.
pub(crate) fn normalize(a: f32) -> f32 {
    let r = a.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Signed shortest-arc difference, wrapped into `(-π, π]`.
pub(crate) fn wrap_signed(d: f32) -> f32 {
    let r = (d + PI).rem_euclid(TAU) - PI;
    if r <= -PI {
        PI
    } else {
        r
    }
}

pub(crate) fn classify(angle: f32, bands: &GlyphBands) -> Stroke {
    let a = normalize(angle);
    if bands.back.contains(a) {
        Stroke::Back
    } else if bands.forward.contains(a) {
        Stroke::Forward
    } else {
        Stroke::Vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        for a in [-1e-7_f32, -TAU, -3.0 * PI, 0.0, TAU, 7.5, 1000.0, -1000.0] {
            let n = normalize(a);
            assert!((0.0..TAU).contains(&n), "{a} -> {n}");
        }
    }

    #[test]
    fn test_wrap_signed_range_and_shortest_arc() {
        assert!((wrap_signed(0.25) - 0.25).abs() < 1e-6);
        // 350 degrees forward is 10 degrees back
        let d = wrap_signed(350f32.to_radians());
        assert!((d + 10f32.to_radians()).abs() < 1e-5);
        assert!((wrap_signed(-PI) - PI).abs() < 1e-6);
        for i in -200..200 {
            let d = wrap_signed(i as f32 * 0.1);
            assert!(d > -PI && d <= PI + 1e-6);
        }
    }

    #[test]
    fn test_classify_default_bands() {
        let b = GlyphBands::default();
        assert_eq!(classify(0.0, &b), Stroke::Vertical);
        assert_eq!(classify(PI / 2.0, &b), Stroke::Back);
        assert_eq!(classify(PI, &b), Stroke::Vertical);
        assert_eq!(classify(3.0 * PI / 2.0, &b), Stroke::Forward);
        assert_eq!(classify(-PI / 2.0, &b), Stroke::Forward);
    }

    #[test]
    fn test_classify_band_edges_are_half_open() {
        let b = GlyphBands::default();
        assert_eq!(classify(b.back.start, &b), Stroke::Back);
        assert_eq!(classify(b.back.end, &b), Stroke::Vertical);
        assert_eq!(classify(b.forward.start, &b), Stroke::Forward);
        assert_eq!(classify(b.forward.end, &b), Stroke::Vertical);
    }

    #[test]
    fn test_classify_partition_and_determinism() {
        let b = GlyphBands::default();
        let mut seen = [0usize; 3];
        let steps = 10_000;
        for i in 0..steps {
            let a = TAU * i as f32 / steps as f32;
            let s = classify(a, &b);
            assert_eq!(s, classify(a, &b));
            let hits = [b.back.contains(a), b.forward.contains(a)]
                .iter()
                .filter(|&&x| x)
                .count();
            assert!(hits <= 1);
            seen[s as usize] += 1;
        }
        assert!(seen.iter().all(|&n| n > 0));
        assert_eq!(seen.iter().sum::<usize>(), steps);
    }

    #[test]
    fn test_band_check() {
        assert_eq!(GlyphBands::default().check(), Ok(()));
        let overlap = GlyphBands {
            back: Band::new(0.5, 2.0),
            forward: Band::new(1.5, 3.0),
        };
        assert_eq!(overlap.check(), Err(BandError::Overlap));
        let out = GlyphBands {
            back: Band::new(-0.1, 1.0),
            forward: Band::new(3.0, 4.0),
        };
        assert_eq!(out.check(), Err(BandError::OutOfRange));
        let empty = GlyphBands {
            back: Band::new(1.0, 1.0),
            forward: Band::new(3.0, 4.0),
        };
        assert_eq!(empty.check(), Err(BandError::Empty));
    }

    #[test]
    fn test_glyph_lookup() {
        let g = Glyphs::default();
        assert_eq!(g.char_for(Stroke::Vertical), '|');
        assert_eq!(g.char_for(Stroke::Forward), '/');
        assert_eq!(g.char_for(Stroke::Back), '\\');
    }
}
