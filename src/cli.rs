use crate::config::Settings;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PointerKind {
    Fine,
    Coarse,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "streamfield")]
#[command(about = "Pointer-driven ASCII vector field for the terminal", long_about = None)]
pub(crate) struct Args {
    /// FPS cap (frame rate of the field)
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Grid cell size in px
    #[arg(long)]
    pub(crate) cell_size: Option<f32>,

    /// Per-frame background fade, 0..1 (lower = longer trails)
    #[arg(long)]
    pub(crate) fade: Option<f32>,

    /// Seed for the initial angles; random when omitted
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Viewports at or below this width (px) keep the field off
    #[arg(long)]
    pub(crate) min_width: Option<f32>,

    /// Pointer type to report; coarse behaves like a touch screen
    #[arg(long, value_enum, default_value_t = PointerKind::Fine)]
    pub(crate) pointer: PointerKind,

    /// Settings file (JSON)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Hide HUD
    #[arg(long, default_value_t = false)]
    pub(crate) no_hud: bool,

    /// Start in paused state
    #[arg(long, default_value_t = false)]
    pub(crate) paused: bool,

    /// Write the merged settings back to the settings file
    #[arg(long, default_value_t = false)]
    pub(crate) save_config: bool,
}

impl Args {
    /// Applies flags on top of file settings.
    pub(crate) fn apply(&self, s: &mut Settings) {
        if let Some(fps) = self.fps {
            s.fps_cap = fps;
        }
        if let Some(c) = self.cell_size {
            s.field.cell_size = c;
        }
        if let Some(f) = self.fade {
            s.field.fade = f;
        }
        if self.seed.is_some() {
            s.seed = self.seed;
        }
        if let Some(w) = self.min_width {
            s.gate.min_width_px = w;
        }
        if self.no_hud {
            s.show_hud = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_settings_alone() {
        let args = Args::parse_from(["streamfield"]);
        let mut s = Settings::default();
        args.apply(&mut s);
        assert_eq!(s, Settings::default());
        assert_eq!(args.pointer, PointerKind::Fine);
        assert!(!args.paused);
    }

    #[test]
    fn test_flags_override() {
        let args = Args::parse_from([
            "streamfield",
            "--fps",
            "30",
            "--cell-size",
            "24",
            "--fade",
            "0.2",
            "--seed",
            "9",
            "--min-width",
            "600",
            "--pointer",
            "coarse",
            "--no-hud",
        ]);
        let mut s = Settings::default();
        args.apply(&mut s);
        assert_eq!(s.fps_cap, 30);
        assert_eq!(s.field.cell_size, 24.0);
        assert_eq!(s.field.fade, 0.2);
        assert_eq!(s.seed, Some(9));
        assert_eq!(s.gate.min_width_px, 600.0);
        assert!(!s.show_hud);
        assert_eq!(args.pointer, PointerKind::Coarse);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
