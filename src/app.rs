use crate::cli::{Args, PointerKind};
use crate::config::{load_settings_or_default, project_paths, save_settings_atomic, Settings};
use crate::host::{Capabilities, Environment, Host, StaticEnv, Viewport};
use crate::input::{collect_input_nonblocking, Action, InputEvent};
use crate::logging::init_file_logging;
use crate::overlay::{Overlay, Phase};
use crate::render::{draw_hud, Terminal};
use anyhow::Context;
use crossterm::style::Color;
use std::time::{Duration, Instant};

// how long to wait for input when no frame is scheduled
const IDLE_WAIT: Duration = Duration::from_millis(50);

pub(crate) struct App {
    settings: Settings,
    host: Host<StaticEnv>,
    overlay: Overlay,
    term: Terminal,
    fps: u32,
    paused: bool,
    show_hud: bool,
    should_quit: bool,
}

impl App {
    fn init(settings: Settings, args: &Args) -> anyhow::Result<Self> {
        let caps = match args.pointer {
            PointerKind::Fine => Capabilities::fine(),
            PointerKind::Coarse => Capabilities::coarse(),
        };
        let term = Terminal::begin()?;
        let env = StaticEnv {
            viewport: Viewport {
                cols: term.cols,
                rows: term.rows,
            },
            caps,
        };
        let fps = settings.fps_cap.clamp(1, 240);

        let mut app = Self {
            host: Host::new(env, fps),
            overlay: Overlay::new(&settings),
            term,
            fps,
            paused: args.paused,
            show_hud: settings.show_hud,
            should_quit: false,
            settings,
        };
        app.overlay.sync_gate(&mut app.host, Instant::now());
        Ok(app)
    }

    fn run(&mut self) -> anyhow::Result<()> {
        while !self.should_quit {
            let now = Instant::now();
            let wait = self.next_wait(now);

            for ev in collect_input_nonblocking(wait)? {
                self.handle(ev, Instant::now());
                if self.should_quit {
                    break;
                }
            }

            let now = Instant::now();
            if !self.paused {
                if let Some(handle) = self.host.frames.take_due(now) {
                    self.overlay.on_frame(&mut self.host, handle, now);
                }
            }

            self.render_frame()?;
            spin_sleep(self.next_wait(Instant::now()), Instant::now());
        }
        Ok(())
    }

    fn next_wait(&self, now: Instant) -> Duration {
        match self.host.frames.next_deadline() {
            Some(due) if !self.paused => due.saturating_duration_since(now).min(IDLE_WAIT),
            _ => IDLE_WAIT,
        }
    }

    fn handle(&mut self, ev: InputEvent, now: Instant) {
        match ev {
            InputEvent::Resize { cols, rows } => {
                self.term.resize(cols, rows);
                self.host.env.viewport = Viewport { cols, rows };
                self.overlay.sync_gate(&mut self.host, now);
                self.overlay.handle_resize(&self.host);
            }
            InputEvent::PointerMove { col, row } => {
                self.overlay.handle_pointer_move(&self.host, col, row);
            }
            InputEvent::Action(action) => self.apply(action, now),
        }
    }

    fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Pause => self.paused = !self.paused,
            Action::ToggleHud => self.show_hud = !self.show_hud,
            Action::Restart => {
                self.overlay.stop(&mut self.host);
                self.overlay.sync_gate(&mut self.host, now);
            }
            Action::ToggleTouch => {
                self.host.env.caps = if self.host.env.caps.is_touch_primary() {
                    Capabilities::fine()
                } else {
                    Capabilities::coarse()
                };
                self.overlay.sync_gate(&mut self.host, now);
            }
            Action::Faster => {
                self.fps = (self.fps + 5).min(240);
                self.host.frames.set_fps(self.fps);
            }
            Action::Slower => {
                self.fps = self.fps.saturating_sub(5).max(5);
                self.host.frames.set_fps(self.fps);
            }
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let background = self.settings.field.background;
        match self.overlay.surface() {
            Some(surface) => {
                self.term.cur.clear(background.to_color());
                surface.blit(&mut self.term.cur, background);
            }
            None => self.term.cur.clear(Color::Reset),
        }

        if self.show_hud {
            let lines = self.hud_lines();
            draw_hud(&mut self.term.cur, &lines);
        }

        self.term.present(true)
    }

    fn hud_lines(&self) -> Vec<String> {
        let line1 = "streamfield  |  Q/Esc quit  Space pause  H hud  R restart  T touch  +/- fps"
            .to_string();
        let pointer = if self.host.env.caps.is_touch_primary() {
            "coarse"
        } else {
            "fine"
        };
        let line2 = match (self.overlay.phase(), self.overlay.field()) {
            (Phase::Running, Some(f)) => format!(
                "running{}  grid {}x{}  {} fps  pointer {}  speed {:.1}  frame {}",
                if self.paused { " (paused)" } else { "" },
                f.cols(),
                f.rows(),
                self.fps,
                pointer,
                f.pointer().motion(self.settings.field.max_speed).1,
                f.frames()
            ),
            _ => {
                let width = self.host.env.viewport().width_px(self.settings.metrics);
                format!(
                    "idle  viewport {:.0}px (needs > {:.0}px)  pointer {}",
                    width, self.settings.gate.min_width_px, pointer
                )
            }
        };
        vec![line1, line2]
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let paths = project_paths()?;
    if let Err(e) = init_file_logging(&paths.log_path) {
        eprintln!("warning: {e}");
    }

    let settings_path = args.config.clone().unwrap_or(paths.settings_path);
    let mut settings = load_settings_or_default(&settings_path);
    args.apply(&mut settings);
    settings
        .validate()
        .with_context(|| format!("invalid settings ({})", settings_path.display()))?;
    if args.save_config {
        save_settings_atomic(&settings_path, &settings)
            .with_context(|| format!("saving {}", settings_path.display()))?;
        tracing::info!(path = %settings_path.display(), "settings saved");
    }

    let mut app = App::init(settings, &args)?;
    let result = app.run();
    app.overlay.stop(&mut app.host);
    let restored = app.term.end();
    result.and(restored)
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
