use crate::glyph::{BandError, GlyphBands, Glyphs};
use crate::render::Rgb;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must lie in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f32,
    },
    #[error("glyph bands must lie within [0, 2pi)")]
    BandOutOfRange,
    #[error("glyph bands must be non-empty")]
    EmptyBand,
    #[error("glyph bands overlap")]
    OverlappingBands,
    #[error("could not resolve project directories")]
    NoProjectDirs,
}

/// Tuning for the vector field. Fixed for the lifetime of one overlay session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FieldConfig {
    /// px per grid cell
    pub(crate) cell_size: f32,
    pub(crate) font_size: f32,
    pub(crate) glyphs: Glyphs,
    pub(crate) bands: GlyphBands,
    // motion feel
    pub(crate) flow_strength: f32,
    pub(crate) damping: f32,
    pub(crate) min_distance: f32,
    pub(crate) max_speed: f32,
    pub(crate) max_step: f32,
    pub(crate) drift: f32,
    pub(crate) swirl_weight: f32,
    pub(crate) velocity_retain: f32,
    /// Focus used before the pointer is first seen, as fractions of width/height.
    pub(crate) default_focus: (f32, f32),
    // visual
    pub(crate) glyph_alpha: f32,
    /// Background repaint opacity per frame; lower leaves longer trails.
    pub(crate) fade: f32,
    pub(crate) glyph_color: Rgb,
    pub(crate) background: Rgb,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            cell_size: 18.0,
            font_size: 16.0,
            glyphs: Glyphs::default(),
            bands: GlyphBands::default(),
            flow_strength: 2.2,
            damping: 0.92,
            min_distance: 30.0,
            max_speed: 60.0,
            max_step: 0.35,
            drift: 0.003,
            swirl_weight: 0.8,
            velocity_retain: 0.6,
            default_focus: (0.5, 0.35),
            glyph_alpha: 0.55,
            fade: 0.08,
            glyph_color: Rgb::new(168, 235, 255),
            background: Rgb::new(0, 18, 36),
        }
    }
}

impl FieldConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        positive("cell_size", self.cell_size)?;
        positive("font_size", self.font_size)?;
        positive("min_distance", self.min_distance)?;
        positive("max_speed", self.max_speed)?;
        if !self.flow_strength.is_finite() || self.flow_strength < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "flow_strength",
                range: "[0, inf)",
                value: self.flow_strength,
            });
        }
        if !self.drift.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "drift",
                range: "finite values",
                value: self.drift,
            });
        }
        fraction("max_step", self.max_step)?;
        fraction("glyph_alpha", self.glyph_alpha)?;
        fraction("fade", self.fade)?;
        unit("damping", self.damping)?;
        unit("swirl_weight", self.swirl_weight)?;
        unit("velocity_retain", self.velocity_retain)?;
        unit("default_focus.x", self.default_focus.0)?;
        unit("default_focus.y", self.default_focus.1)?;
        self.bands.check().map_err(|e| match e {
            BandError::OutOfRange => ConfigError::BandOutOfRange,
            BandError::Empty => ConfigError::EmptyBand,
            BandError::Overlap => ConfigError::OverlappingBands,
        })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

// (0, 1]
fn fraction(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            range: "(0, 1]",
            value,
        })
    }
}

// [0, 1]
fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            range: "[0, 1]",
            value,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GateConfig {
    /// Viewports at or below this width (px) count as small screens.
    pub(crate) min_width_px: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { min_width_px: 900.0 }
    }
}

/// Logical px covered by one terminal column and one terminal row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CellMetrics {
    pub(crate) px_per_col: f32,
    pub(crate) px_per_row: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            px_per_col: 9.0,
            px_per_row: 18.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) field: FieldConfig,
    pub(crate) gate: GateConfig,
    pub(crate) metrics: CellMetrics,
    pub(crate) fps_cap: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            gate: GateConfig::default(),
            metrics: CellMetrics::default(),
            fps_cap: 60,
            seed: None,
            show_hud: true,
        }
    }
}

impl Settings {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.field.validate()?;
        positive("metrics.px_per_col", self.metrics.px_per_col)?;
        positive("metrics.px_per_row", self.metrics.px_per_row)?;
        if !self.gate.min_width_px.is_finite() || self.gate.min_width_px < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "gate.min_width_px",
                range: "[0, inf)",
                value: self.gate.min_width_px,
            });
        }
        Ok(())
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths, ConfigError> {
    let proj =
        ProjectDirs::from("com", "streamfield", "Streamfield").ok_or(ConfigError::NoProjectDirs)?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("streamfield.log"),
    })
}

/// Reads settings from `path`. A missing file yields the defaults.
pub(crate) fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like `load_settings`, but falls back to defaults on any failure.
pub(crate) fn load_settings_or_default(path: &Path) -> Settings {
    match load_settings(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "using default settings");
            Settings::default()
        }
    }
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<(), ConfigError> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    let write_err = |source: io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, data).map_err(write_err)?;
    atomic_rename(&tmp, path).map_err(write_err)
}

fn atomic_rename(from: &Path, to: &Path) -> io::Result<()> {
    // rename-over-existing is not atomic on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)
}
