use crate::config::{CellMetrics, FieldConfig, Settings};
use crate::field::VectorField;
use crate::frames::FrameHandle;
use crate::gate::ActivationGate;
use crate::host::{Environment, Host, ListenerId, ListenerKind};
use crate::surface::Surface;
use rand::{rngs::StdRng, SeedableRng};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Running,
}

/// Resources held while running. Acquired together in `start`, released
/// together in `stop`.
struct Session {
    field: VectorField,
    surface: Surface,
    frame: FrameHandle,
    on_pointer: ListenerId,
    on_resize: ListenerId,
}

pub(crate) struct Overlay {
    cfg: FieldConfig,
    metrics: CellMetrics,
    gate: ActivationGate,
    seed: Option<u64>,
    activations: u64,
    session: Option<Session>,
}

impl Overlay {
    pub(crate) fn new(settings: &Settings) -> Self {
        Self {
            cfg: settings.field.clone(),
            metrics: settings.metrics,
            gate: ActivationGate::new(&settings.gate, settings.metrics),
            seed: settings.seed,
            activations: 0,
            session: None,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        if self.session.is_some() {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    pub(crate) fn surface(&self) -> Option<&Surface> {
        self.session.as_ref().map(|s| &s.surface)
    }

    pub(crate) fn field(&self) -> Option<&VectorField> {
        self.session.as_ref().map(|s| &s.field)
    }

    /// Re-checks the activation gate and starts or stops to match it.
    /// Runs on every resize and whenever capabilities change.
    pub(crate) fn sync_gate<E: Environment>(&mut self, host: &mut Host<E>, now: Instant) -> Phase {
        let open = self.gate.evaluate(&host.env);
        match (open, self.phase()) {
            (true, Phase::Idle) => {
                tracing::info!("activation gate opened");
                self.start(host, now);
            }
            (false, Phase::Running) => {
                tracing::info!("activation gate closed");
                self.stop(host);
            }
            _ => {}
        }
        self.phase()
    }

    pub(crate) fn start<E: Environment>(&mut self, host: &mut Host<E>, now: Instant) {
        if self.session.is_some() {
            return;
        }
        let viewport = host.env.viewport();
        let surface = Surface::new(viewport, self.metrics);

        // seeded runs stay reproducible but differ per activation
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.activations)),
            None => StdRng::from_entropy(),
        };
        self.activations += 1;

        let field = VectorField::new(self.cfg.clone(), rng, surface.width(), surface.height());
        tracing::info!(
            cols = field.cols(),
            rows = field.rows(),
            width = surface.width(),
            height = surface.height(),
            "overlay started"
        );

        self.session = Some(Session {
            field,
            surface,
            on_pointer: host.listeners.add(ListenerKind::PointerMove),
            on_resize: host.listeners.add(ListenerKind::Resize),
            frame: host.frames.request(now),
        });
    }

    /// Cancels the pending frame and drops both listeners. No-op when idle.
    pub(crate) fn stop<E: Environment>(&mut self, host: &mut Host<E>) {
        let Some(session) = self.session.take() else {
            return;
        };
        host.frames.cancel(session.frame);
        host.listeners.remove(session.on_pointer);
        host.listeners.remove(session.on_resize);
        tracing::info!(frames = session.field.frames(), "overlay stopped");
    }

    /// Pointer position in terminal cells.
    pub(crate) fn handle_pointer_move<E: Environment>(&mut self, host: &Host<E>, col: u16, row: u16) {
        let Some(s) = self.session.as_mut() else {
            return;
        };
        if !host.listeners.is_live(s.on_pointer) {
            return;
        }
        let (x, y) = s.surface.to_local(col, row);
        s.field.on_pointer_move(x, y);
    }

    pub(crate) fn handle_resize<E: Environment>(&mut self, host: &Host<E>) {
        let Some(s) = self.session.as_mut() else {
            return;
        };
        if !host.listeners.is_live(s.on_resize) {
            return;
        }
        s.surface.resize(host.env.viewport());
        s.field.on_resize(s.surface.width(), s.surface.height());
    }

    /// Runs the frame identified by `handle` and schedules the next one.
    /// Returns false for stale handles or when idle.
    pub(crate) fn on_frame<E: Environment>(
        &mut self,
        host: &mut Host<E>,
        handle: FrameHandle,
        now: Instant,
    ) -> bool {
        let Some(s) = self.session.as_mut() else {
            return false;
        };
        if s.frame != handle {
            return false;
        }
        s.field.advance_frame(&mut s.surface);
        s.frame = host.frames.request(now);
        true
    }
}
